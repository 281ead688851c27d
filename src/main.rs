use clap::{Parser, Subcommand};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use okr_pulse::aggregate::{self, AggregateError, Dimension};
use okr_pulse::history::{Snapshot, SnapshotStore};
use okr_pulse::inventory::FleetCounters;
use okr_pulse::output;
use okr_pulse::trend;

const EXIT_SUCCESS: i32 = 0;
const EXIT_DATA: i32 = 1;
const EXIT_STORE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score an inventory export, save a snapshot, and show trends
    Report {
        /// Path to the inventory CSV export
        input: PathBuf,

        /// Analyze without writing a snapshot
        #[arg(long)]
        no_save: bool,
    },
    /// List stored snapshots
    History,
    /// Show burndown velocity and zero-crossing projections
    Burndown {
        /// Restrict the analysis to the last N days of history
        #[arg(long)]
        since_days: Option<i64>,
    },
    /// Write a starter config file
    Init,
}

#[derive(Parser, Debug)]
#[command(name = "okr-pulse")]
#[command(about = "Device-fleet OKR scoring and trend tracking", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/okr-pulse/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    if let Commands::Init = cli.command {
        let path = cli.config.as_ref().map(PathBuf::from);
        match okr_pulse::config::write_default_config(path) {
            Ok(written) => {
                println!("Wrote starter config to {}", written.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Init error: {}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    // Load config
    let config_path = cli.config.as_ref().map(PathBuf::from);
    let config = match okr_pulse::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    match okr_pulse::scoring::validate_scoring(&config.scoring) {
        Ok(warnings) => {
            for warning in warnings {
                eprintln!("Warning: {}", warning);
            }
        }
        Err(errors) => {
            eprintln!("Scoring config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            std::process::exit(EXIT_CONFIG);
        }
    }

    let history_dir = okr_pulse::config::get_history_dir(&config);
    let store = match SnapshotStore::new(&history_dir) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("History store error: {}", e);
            std::process::exit(EXIT_STORE);
        }
    };

    if cli.verbose {
        eprintln!("History directory: {}", history_dir.display());
    }

    let use_colors = output::should_use_colors();

    match cli.command {
        Commands::Report { input, no_save } => {
            let records = match okr_pulse::inventory::load_records(&input, &config.data) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("Data error: {:#}", e);
                    std::process::exit(EXIT_DATA);
                }
            };
            if cli.verbose {
                eprintln!("Loaded {} records from {}", records.len(), input.display());
            }

            let counters = FleetCounters::new(&config.data);
            let overall = aggregate::score_records(&records, &counters, &config.scoring);

            let mut dimensions = BTreeMap::new();
            for key in &config.dimensions {
                let dimension = match Dimension::parse(key) {
                    Ok(d) => d,
                    Err(e) => {
                        eprintln!("Config error: {}", e);
                        std::process::exit(EXIT_CONFIG);
                    }
                };
                match aggregate::aggregate_by_dimension(&records, dimension, &counters, &config.scoring) {
                    Ok(results) => {
                        dimensions.insert(dimension.key().to_string(), results);
                    }
                    Err(e @ AggregateError::UnpopulatedDimension(_)) => {
                        // Dimension column absent from this export; skip it
                        eprintln!("Warning: {}", e);
                    }
                    Err(e) => {
                        eprintln!("Aggregation error: {}", e);
                        std::process::exit(EXIT_DATA);
                    }
                }
            }

            // Fetch the comparison snapshot before saving the new one, so a
            // run never compares against itself
            let previous = match store.nearest(config.trend.compare_days_back) {
                Ok(p) => p,
                Err(e) => {
                    eprintln!("History store error: {:#}", e);
                    std::process::exit(EXIT_STORE);
                }
            };

            let snapshot = Snapshot::new(overall, dimensions);
            if !no_save {
                match store.save(&snapshot) {
                    Ok(path) => {
                        if cli.verbose {
                            eprintln!("Saved snapshot to {}", path.display());
                        }
                    }
                    Err(e) => {
                        eprintln!("History store error: {:#}", e);
                        std::process::exit(EXIT_STORE);
                    }
                }
            }

            let flat = config.trend.flat_threshold;
            let overall_trend = trend::compare(
                &snapshot.overall,
                previous.as_ref().map(|p| &p.overall),
                flat,
            );
            println!("{}", output::format_overall(&snapshot.overall, &overall_trend, use_colors));

            for key in &config.dimensions {
                let Some(results) = snapshot.dimensions.get(key.as_str()) else {
                    continue;
                };
                let previous_set = previous.as_ref().map(|p| p.dimension(key)).unwrap_or(&[]);
                let trends = trend::compare_dimension(results, previous_set, flat);
                println!();
                println!("{}", output::format_dimension_table(key, results, &trends, use_colors));
            }

            if cli.verbose {
                eprintln!();
                eprintln!("Done in {:?}", start_time.elapsed());
            }
        }
        Commands::History => {
            let snapshots = match store.all() {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("History store error: {:#}", e);
                    std::process::exit(EXIT_STORE);
                }
            };
            if snapshots.is_empty() {
                println!("No snapshots stored.");
            } else {
                for snapshot in &snapshots {
                    println!("{}", output::format_history_line(snapshot, use_colors));
                }
                println!("{} snapshots", snapshots.len());
            }
        }
        Commands::Burndown { since_days } => {
            let snapshots = match since_days {
                Some(days) => {
                    let end = chrono::Utc::now();
                    let start = end - chrono::Duration::days(days);
                    store.range(start, end)
                }
                None => store.all(),
            };
            let snapshots = match snapshots {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("History store error: {:#}", e);
                    std::process::exit(EXIT_STORE);
                }
            };
            let burndown = trend::burndown(&snapshots);
            println!("{}", output::format_burndown(&burndown, use_colors));
        }
        Commands::Init => unreachable!("handled above"),
    }

    std::process::exit(EXIT_SUCCESS);
}
