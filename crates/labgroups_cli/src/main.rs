//! Lab-group allocation front end.
//!
//! # Responsibility
//! - Parse adapter-level arguments and localized input files.
//! - Drive the core pipeline: build roster, check companions, assign
//!   groups, render reports.

mod input;
mod output;

use anyhow::Result;
use clap::Parser;
use labgroups_core::{assign_groups, default_log_level, init_logging, GroupOverrides, Roster};
use log::info;
use std::path::PathBuf;

/// Deterministic lab-group allocation from a roster export.
#[derive(Debug, Parser)]
#[command(name = "labgroups", version, about)]
struct Cli {
    /// Roster export file (JSON array of row objects).
    roster: PathBuf,

    /// Authoritative identifier -> macro-group override file (JSON array).
    #[arg(long)]
    overrides: Option<PathBuf>,

    /// Directory receiving one JSON report per room-group.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = match cli.log_level.as_deref() {
        Some(level) => level,
        None => default_log_level(),
    };
    init_logging(level).map_err(anyhow::Error::msg)?;

    let overrides = match &cli.overrides {
        Some(path) => {
            let overrides = input::load_overrides(path)?;
            info!(
                "event=overrides_loaded module=cli entries={}",
                overrides.len()
            );
            overrides
        }
        None => GroupOverrides::new(),
    };

    let rows = input::load_roster_rows(&cli.roster)?;
    info!("event=roster_rows_loaded module=cli rows={}", rows.len());

    let (mut roster, mut diagnostics) = Roster::from_rows(rows, &overrides)?;
    diagnostics.extend(roster.check_companions());

    let occupancy = assign_groups(&mut roster);

    output::print_reports(&roster);
    if let Some(directory) = &cli.output {
        output::write_reports(&roster, directory)?;
        info!(
            "event=reports_written module=cli directory={}",
            directory.display()
        );
    }
    output::print_summary(occupancy.total(), diagnostics.len());

    Ok(())
}
