use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

mod buckets;
mod density;
mod models;
mod report;
mod risk;
mod roster;
mod stats;
mod summary;

use summary::Analysis;

#[derive(Parser)]
#[command(name = "gradebook-insight")]
#[command(about = "Grade roster analyzer with risk classification and score distributions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the class summary
    Summary {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// List students ordered by accumulated score
    Students {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value_t = 10)]
        limit: usize,
        #[arg(long)]
        ascending: bool,
    },
    /// Print the score distribution buckets
    Distribution {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Print the kernel density estimate of the score distribution as JSON
    Density {
        #[arg(long)]
        csv: PathBuf,
        /// Evaluation index; class-wide accumulated scores when omitted
        #[arg(long)]
        evaluation: Option<usize>,
    },
    /// Generate a markdown report
    Report {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn load_analysis(csv: &Path) -> anyhow::Result<Analysis> {
    let roster = roster::load_roster(csv)
        .with_context(|| format!("failed to load roster from {}", csv.display()))?;
    Ok(Analysis::new(roster.table, roster.description_headers))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary { csv, json } => {
            let analysis = load_analysis(&csv)?;
            let summary = analysis.summary();

            if json {
                println!("{}", serde_json::to_string_pretty(summary)?);
            } else {
                for header in analysis.description_headers() {
                    println!("{header}");
                }
                let class = &summary.class;
                println!(
                    "{} students across {} evaluations",
                    class.student_count, class.evaluation_count
                );
                println!(
                    "Overall average {:.2} (std dev {:.2}), {:.1} points assigned",
                    class.overall_average, class.overall_std_dev, class.acumulated_points
                );
                println!(
                    "Approved {}, on track {}, warning {}, critical {}, failed {}",
                    class.approved_count,
                    class.on_track_count,
                    class.warning_count,
                    class.critical_count,
                    class.failed_count
                );
            }
        }
        Commands::Students {
            csv,
            limit,
            ascending,
        } => {
            let analysis = load_analysis(&csv)?;
            let mut students = analysis.summary().students.clone();
            students.sort_by(|a, b| {
                let ordering = a
                    .accumulated_score
                    .partial_cmp(&b.accumulated_score)
                    .unwrap_or(std::cmp::Ordering::Equal);
                if ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });

            for student in students.iter().take(limit) {
                println!(
                    "- {} ({}) score {:.2}, percentile {:.1}, {}",
                    student.name,
                    student.id,
                    student.accumulated_score,
                    student.percentile,
                    student.status.label()
                );
            }
        }
        Commands::Distribution { csv, json } => {
            let analysis = load_analysis(&csv)?;

            if json {
                println!("{}", serde_json::to_string_pretty(analysis.distribution())?);
            } else {
                for bucket in analysis.distribution() {
                    let marker = if bucket.is_failing { " (failing)" } else { "" };
                    println!(
                        "{}: {} students ({:.1}%){}",
                        bucket.range_label, bucket.count, bucket.percent_of_class, marker
                    );
                }
            }
        }
        Commands::Density { csv, evaluation } => {
            let analysis = load_analysis(&csv)?;
            let curve = match evaluation {
                Some(eval_idx) => analysis
                    .evaluation_density(eval_idx)
                    .with_context(|| format!("no evaluation at index {eval_idx}"))?,
                None => analysis.class_density(),
            };

            if curve.is_empty() {
                println!("No scores to estimate a density from.");
            } else {
                println!("{}", serde_json::to_string_pretty(&curve)?);
            }
        }
        Commands::Report { csv, out } => {
            let analysis = load_analysis(&csv)?;
            let report = report::build_report(&analysis);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
