use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::LevelFilter;

use managex::attendance::{attendance_history, AttendanceBand};
use managex::dispatch::{self, Mutation};
use managex::roster::{catalog_summary, roster_summary, search_students};
use managex::seed::{self, SeedData};
use managex::{calculate_academic_performance, calculate_attendance_stats, report, RecordStore};

const SEED_ENV: &str = "MANAGEX_SEED";

#[derive(Parser)]
#[command(name = "managex")]
#[command(about = "Student, course and attendance records with derived standing", long_about = None)]
struct Cli {
    /// JSON seed file (falls back to $MANAGEX_SEED, then the demo dataset)
    #[arg(long, global = true)]
    seed: Option<PathBuf>,
    /// Extra attendance rows to import before running the command
    #[arg(long, global = true)]
    attendance_csv: Option<PathBuf>,
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List students, optionally filtered by name, email or id
    Students {
        #[arg(long)]
        search: Option<String>,
    },
    /// List courses with a catalog summary
    Courses,
    /// Attendance statistics for one student
    Stats { id: String },
    /// Weighted academic performance for one student
    Performance { id: String },
    /// Apply a JSON array of mutations and print each outcome
    Apply {
        #[arg(long)]
        file: PathBuf,
    },
    /// Generate a markdown standing report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn seed_path(cli_seed: Option<PathBuf>) -> Option<PathBuf> {
    cli_seed.or_else(|| std::env::var_os(SEED_ENV).map(PathBuf::from))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let seed = match seed_path(cli.seed) {
        Some(path) => seed::load_seed(&path)
            .with_context(|| format!("failed to load seed data from {}", path.display()))?,
        None => SeedData::demo(),
    };
    let mut store = RecordStore::from_seed(seed);

    if let Some(csv) = cli.attendance_csv {
        let imported = seed::import_attendance_csv(&mut store, &csv)
            .context("failed to import attendance csv")?;
        println!("Imported {imported} attendance records from {}.", csv.display());
    }

    match cli.command {
        Commands::Students { search } => {
            let students = search_students(&store, search.as_deref().unwrap_or(""));
            if students.is_empty() {
                println!("No students match.");
                return Ok(());
            }

            let roster = roster_summary(&store);
            println!(
                "{} students ({} male, {} female):",
                roster.total, roster.male, roster.female
            );
            for student in students {
                let stats = calculate_attendance_stats(&store, &student.id);
                println!(
                    "- [{}] {} <{}> attendance {:.1}% across {} courses",
                    student.id,
                    student.name,
                    student.email,
                    stats.percentage,
                    student.courses.len()
                );
            }
        }
        Commands::Courses => {
            let catalog = catalog_summary(&store);
            println!(
                "{} courses, {} credits, average {:.1}%:",
                catalog.course_count, catalog.total_credits, catalog.average_percentage
            );
            for course in store.courses() {
                println!(
                    "- [{}] {} {} ({} credits) {} {:.1}%",
                    course.id,
                    course.code,
                    course.name,
                    course.credits,
                    course.grade,
                    course.percentage
                );
            }
        }
        Commands::Stats { id } => {
            let stats = calculate_attendance_stats(&store, &id);
            println!(
                "Attendance for {id}: {:.1}% ({}) with {} present, {} absent, {} leave of {} days",
                stats.percentage,
                AttendanceBand::from_percentage(stats.percentage).label(),
                stats.present,
                stats.absent,
                stats.leave,
                stats.total
            );
            for record in attendance_history(&store, &id).iter().take(10) {
                println!(
                    "- {} {} {}: {}",
                    record.date,
                    record.time,
                    record.course,
                    record.status.as_str()
                );
            }
        }
        Commands::Performance { id } => {
            let performance = calculate_academic_performance(&store, &id);
            println!(
                "Overall {:.1} ({}) from attendance {:.1}% and course average {:.1}%",
                performance.overall_score,
                performance.grade,
                performance.attendance_score,
                performance.academic_score
            );
        }
        Commands::Apply { file } => {
            let raw = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let mutations: Vec<Mutation> = serde_json::from_str(&raw)
                .with_context(|| format!("invalid mutations in {}", file.display()))?;

            for mutation in mutations {
                let name = mutation.name();
                let outcome = dispatch::apply(&mut store, mutation);
                println!("{name}: {}", serde_json::to_string(&outcome)?);
            }
            println!(
                "Store now holds {} students, {} courses, {} attendance records.",
                store.students().len(),
                store.courses().len(),
                store.attendance().len()
            );
        }
        Commands::Report { out } => {
            let report = report::build_report(&store);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
