//! uplink-harness: runs a scripted flight against the flight computer and
//! prints a JSON summary.
//!
//! Usage:
//!   uplink-harness --ticks 600 --delay 2.0
//!   uplink-harness --config flight.toml --warp-index 3 --seed 7

mod scenario;
mod world;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use uplink_core::config::FlightComputerSettings;
use uplink_sim::FlightComputer;

#[derive(Parser, Debug)]
#[command(
    name = "uplink-harness",
    about = "Scripted signal-delay flight computer scenario"
)]
struct Args {
    /// Flight computer settings (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of fixed ticks to simulate
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seed for link delay jitter
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Base one-way link delay in seconds (0 for local control)
    #[arg(long, default_value_t = 2.0)]
    delay: f64,

    /// Starting time-warp rate index
    #[arg(long, default_value_t = 0)]
    warp_index: usize,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => FlightComputerSettings::from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => FlightComputerSettings::default(),
    };
    info!(
        total_delay = settings.total_delay,
        throttle_time_warp = settings.throttle_time_warp,
        ticks = args.ticks,
        seed = args.seed,
        "starting harness"
    );

    let mut host = scenario::build_world(args.seed, args.delay, args.warp_index)?;
    let mut fc = FlightComputer::new(scenario::PROCESSOR, scenario::PRIMARY, settings);

    let summary = scenario::run(&mut fc, &mut host, args.ticks)?;
    fc.dispose();

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
