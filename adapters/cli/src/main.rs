#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Farmstead session.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use farmstead_cli::session::{self, SessionOptions};
use farmstead_cli::tuning::{self, Tuning};
use farmstead_presentation::Notification;
use tracing_subscriber::EnvFilter;

/// Boots a farm board against an in-process authority and reports the
/// session outcome.
#[derive(Debug, Parser)]
#[command(name = "farmstead")]
struct Args {
    /// Override the number of plot columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Override the number of plot rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Override the number of wanderers spawned at scene start.
    #[arg(long)]
    wanderers: Option<u32>,
    /// Seed for the wander system's generator.
    #[arg(long, default_value_t = 2_024)]
    seed: u64,
    /// Number of 100 ms simulation ticks to run after building.
    #[arg(long, default_value_t = 40)]
    ticks: u32,
    /// Number of farms the session script attempts to build.
    #[arg(long, default_value_t = 2)]
    builds: u32,
    /// Optional toml file with board and wanderer tuning.
    #[arg(long)]
    tuning: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut tuning = match &args.tuning {
        Some(path) => tuning::load(path)?,
        None => Tuning::default(),
    };
    if let Some(columns) = args.columns {
        tuning.board.columns = columns;
    }
    if let Some(rows) = args.rows {
        tuning.board.rows = rows;
    }
    if let Some(wanderers) = args.wanderers {
        tuning.wanderers.count = wanderers;
    }

    let report = session::run(&SessionOptions {
        tuning,
        seed: args.seed,
        ticks: args.ticks,
        builds: args.builds,
    });

    println!(
        "session finished: {} houses, {} wanderers visible, {} hidden",
        report.houses, report.visible_wanderers, report.hidden_wanderers,
    );
    for notification in &report.notifications {
        match notification {
            Notification::SceneReady => println!("  scene ready"),
            Notification::HouseBuilt { house } => println!(
                "  built {} ({:?}) at cell {}",
                house.id.as_str(),
                house.kind,
                house.cell.get(),
            ),
            Notification::BuildFailed { cell, reason } => {
                println!("  build at cell {} failed: {reason}", cell.get());
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
