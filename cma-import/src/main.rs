//! cma-import - spreadsheet to item-store maintenance CLI
//!
//! The spreadsheet is the hand-edited source of truth; the JSON item store
//! is the derived cache the site API serves. This tool owns every write to
//! the store: full imports, single-record deletions, and description
//! repair. Batch, single-process, run-to-completion; concurrent runs over
//! the same data directory are not supported.

use anyhow::Result;
use clap::{Parser, Subcommand};
use cma_common::config::DataPaths;
use cma_import::pipeline;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "cma-import", about = "Chiang Mai activities data pipeline")]
struct Cli {
    /// Data directory holding the workbook, item store and backups
    /// (falls back to $CMA_DATA_DIR, the config file, then ./data)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import the spreadsheet into the JSON item store
    Import {
        /// Source workbook; defaults to <data-dir>/activities.xlsx
        #[arg(long)]
        workbook: Option<PathBuf>,

        /// Named worksheet; first sheet when omitted
        #[arg(long)]
        sheet: Option<String>,

        /// Also repair description duplicates before writing
        #[arg(long)]
        fix_descriptions: bool,
    },

    /// Delete one record by id or activity number (#002, 002, 2)
    Delete {
        target: String,
    },

    /// Repair description duplicates across the existing store
    FixDescriptions,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let paths = DataPaths::resolve(cli.data_dir.as_deref());
    info!(data_dir = %paths.root().display(), "Using data directory");

    match cli.command {
        Command::Import {
            workbook,
            sheet,
            fix_descriptions,
        } => {
            paths.ensure_directories()?;
            let opts = pipeline::ImportOptions {
                workbook: workbook.unwrap_or_else(|| paths.workbook_file()),
                sheet,
                store: paths.items_file(),
                backup_dir: paths.backups_dir(),
                repair_descriptions: fix_descriptions,
            };
            let summary = pipeline::run_import(&opts)?;
            println!("{summary}");
        }
        Command::Delete { target } => {
            match pipeline::delete_from_store(&paths.items_file(), &paths.backups_dir(), &target)? {
                Some(outcome) => {
                    for (id, title) in &outcome.removed {
                        println!("Deleted {id}: {title}");
                    }
                    println!(
                        "{} record(s) remain; backup at {}",
                        outcome.remaining,
                        outcome.backup.display()
                    );
                }
                None => {
                    // Matches nothing: report and exit clean, store untouched
                    warn!(delete_target = %target, "Nothing deleted");
                    println!("No record matches {target:?}");
                }
            }
        }
        Command::FixDescriptions => {
            let outcome =
                pipeline::repair_store_descriptions(&paths.items_file(), &paths.backups_dir())?;
            println!(
                "Repaired {} of {} descriptions; backup at {}",
                outcome.changed,
                outcome.total,
                outcome.backup.display()
            );
        }
    }
    Ok(())
}
