//! Importance tiers from question recurrence.
//!
//! Frequencies normalize against the corpus maximum, rank ascending with
//! first-occurrence tie-breaking, and split into three equal rank bins.

use std::cmp::Ordering;

use crate::model::ImportanceTier;

/// Tier per question, aligned with the input order.
///
/// Corpora with fewer than three questions cannot fill three bins and come
/// back uniformly Standard.
pub fn assign_tiers(frequencies: &[usize]) -> Vec<ImportanceTier> {
    let n = frequencies.len();
    if n < 3 {
        return vec![ImportanceTier::Standard; n];
    }

    let max = frequencies.iter().copied().max().unwrap_or(1).max(1) as f64;
    let scores: Vec<f64> = frequencies.iter().map(|&f| f as f64 / max).collect();

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(Ordering::Equal)
            .then(a.cmp(&b))
    });
    let mut ranks = vec![0f64; n];
    for (position, &index) in order.iter().enumerate() {
        ranks[index] = (position + 1) as f64;
    }

    let q1 = rank_quantile(n, 1.0 / 3.0);
    let q2 = rank_quantile(n, 2.0 / 3.0);

    ranks
        .into_iter()
        .map(|rank| {
            if rank <= q1 {
                ImportanceTier::Standard
            } else if rank <= q2 {
                ImportanceTier::Important
            } else {
                ImportanceTier::Critical
            }
        })
        .collect()
}

/// Linear-interpolated quantile over the rank values `1..=n`.
fn rank_quantile(n: usize, q: f64) -> f64 {
    1.0 + (n as f64 - 1.0) * q
}
