//! Topic discovery over segmented questions: feature extraction, seeded
//! clustering, and cluster naming.

mod cluster;
mod features;
mod label;

pub use cluster::{
    target_clusters, Assignment, ClusterConfig, DegradedAssignment, TopicAssignment,
    TopicClusterer,
};
pub use features::Vectorizer;
pub use label::TopicLabeler;
