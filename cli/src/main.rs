//! pyq CLI - question paper analysis tool

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pyq::{
    AnalyzeOptions, Analyzer, ExtractOptions, ExtractorRegistry, ImportanceTier, OcrConfig, Report,
};

#[derive(Parser)]
#[command(name = "pyq")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Analyze past exam papers into a ranked topic report", long_about = None)]
struct Cli {
    /// Input question paper files (pdf, docx, txt, csv)
    #[arg(value_name = "FILES")]
    files: Vec<PathBuf>,

    #[command(flatten)]
    args: AnalyzeArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze question papers (the default when files are given)
    Analyze {
        /// Input question paper files (pdf, docx, txt, csv)
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        args: AnalyzeArgs,
    },

    /// List supported input formats
    Formats,

    /// Show version information
    Version,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// Write the JSON report to a file
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Directory that receives extracted diagram images
    #[arg(long, value_name = "DIR", default_value = "static")]
    static_dir: PathBuf,

    /// Base URL prefixed to diagram references
    #[arg(long, value_name = "URL", default_value = "http://localhost:8000")]
    base_url: String,

    /// Skip OCR captions for extracted diagrams
    #[arg(long)]
    no_ocr: bool,

    /// Skip video lookups (topics keep their article resources)
    #[arg(long)]
    no_videos: bool,

    /// Worker threads for extraction and enrichment
    #[arg(long, value_name = "N", default_value = "4")]
    workers: usize,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Analyze { files, args }) => cmd_analyze(&files, &args),
        Some(Commands::Formats) => {
            cmd_formats();
            Ok(())
        }
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: analyze if files are provided
            if cli.files.is_empty() {
                println!(
                    "{}",
                    "Usage: pyq <FILES>... [--json] [--output report.json]".yellow()
                );
                println!("       pyq --help for more information");
                Ok(())
            } else {
                cmd_analyze(&cli.files, &cli.args)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_analyze(files: &[PathBuf], args: &AnalyzeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut extract = ExtractOptions::new()
        .with_static_dir(args.static_dir.clone())
        .with_base_url(args.base_url.clone());
    if args.no_ocr {
        extract = extract.with_ocr(OcrConfig::disabled());
    }

    let mut options = AnalyzeOptions::new()
        .with_extract(extract)
        .with_workers(args.workers);
    if args.no_videos {
        options = options.without_videos();
    }
    let analyzer = Analyzer::with_options(options);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    pb.set_message(format!("Analyzing {} file(s)...", files.len()));
    pb.enable_steady_tick(Duration::from_millis(100));

    let outcome = analyzer.analyze(files);
    pb.finish_and_clear();

    let report = match outcome {
        Ok(report) => report,
        Err(e) => {
            if args.json {
                println!("{}", e.to_payload());
                std::process::exit(1);
            }
            return Err(e.into());
        }
    };

    if let Some(path) = &args.output {
        fs::write(path, report.to_json_pretty()?)?;
        println!("{} {}", "Saved to".green(), path.display());
    }

    if args.json {
        let serialized = if args.pretty {
            report.to_json_pretty()?
        } else {
            report.to_json()?
        };
        println!("{}", serialized);
    } else if args.output.is_none() {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &Report) {
    println!("{}", "Analysis Report".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Questions".bold(), report.total_questions);
    println!("{}: {}", "Topics".bold(), report.topics_found);
    println!(
        "{}: {}",
        "Questions per topic".bold(),
        report.summary.average_questions_per_topic
    );
    println!(
        "{}: {}",
        "Resources".bold(),
        report.summary.total_resources_found
    );
    let breakdown = &report.summary.classification_breakdown;
    println!(
        "{}: {} critical / {} important / {} standard",
        "Tiers".bold(),
        breakdown.critical,
        breakdown.important,
        breakdown.standard
    );

    for topic in &report.analysis {
        println!();
        println!(
            "{} {}",
            format!("[{}]", topic.topic_id).dimmed(),
            topic.name.green().bold()
        );
        for question in &topic.questions {
            let tier = match question.importance {
                ImportanceTier::Critical => "critical".red().bold(),
                ImportanceTier::Important => "important".yellow(),
                ImportanceTier::Standard => "standard".dimmed(),
            };
            println!(
                "  {} [{}] {}",
                format!("x{}", question.frequency).dimmed(),
                tier,
                question.text
            );
        }
        println!(
            "  {} {} videos, {} articles",
            "resources:".dimmed(),
            topic.resources.videos.len(),
            topic.resources.articles.len()
        );
    }
}

fn cmd_formats() {
    let registry = ExtractorRegistry::with_defaults();
    let mut extensions = registry.supported_extensions();
    extensions.sort_unstable();

    println!("{}", "Supported input formats".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    for extension in extensions {
        println!("  .{}", extension);
    }
}

fn cmd_version() {
    println!("{} {}", "pyq".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Question paper analysis tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pyq".dimmed());
    println!("License: MIT");
}
