//! dinner — the classic five philosophers, one OS thread each.
//!
//! Every seat prints an activity line on each phase change and the run lasts
//! until Ctrl-C / SIGTERM (or `--duration` seconds), after which a per-seat
//! meal table is printed.
//!
//! ```text
//! cargo run -p dinner -- --seats 7 --duration 20
//! cargo run -p dinner -- --config demos/dinner/config/slow.json --max-delay 3
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dp_core::{DelayConfig, SeatId};
use dp_sim::{ActivityLog, MealTally, SimBuilder, UniformDelays};

#[derive(Parser)]
#[command(name = "dinner")]
#[command(about = "Dining philosophers without a global lock or fork ordering")]
struct Cli {
    /// Number of philosophers around the table (at least 3)
    #[arg(short, long, default_value = "5")]
    seats: usize,

    /// JSON file with `min_delay_secs`, `max_delay_secs`, `eat_extra_secs`
    #[arg(long)]
    config: Option<PathBuf>,

    /// Lower bound of think/eat delays, in seconds
    #[arg(long)]
    min_delay: Option<f64>,

    /// Upper bound of think/eat delays, in seconds
    #[arg(long)]
    max_delay: Option<f64>,

    /// Extra seconds added to every meal
    #[arg(long)]
    eat_extra: Option<f64>,

    /// Seed for the per-seat delay RNGs
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Stop after this many seconds instead of waiting for a signal
    #[arg(short, long)]
    duration: Option<f64>,

    /// Enable debug output (gate wake-ups, seat exits)
    #[arg(long, short)]
    verbose: bool,
}

impl Cli {
    /// Defaults, then the JSON file, then individual flags.
    fn delay_config(&self) -> Result<DelayConfig> {
        let mut cfg = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => DelayConfig::default(),
        };
        if let Some(v) = self.min_delay {
            cfg.min_delay_secs = v;
        }
        if let Some(v) = self.max_delay {
            cfg.max_delay_secs = v;
        }
        if let Some(v) = self.eat_extra {
            cfg.eat_extra_secs = v;
        }
        Ok(cfg)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // 1. Everything that can fail on bad input fails here, before any seat runs.
    let timing = UniformDelays::new(cli.delay_config()?)?;
    let run_limit = cli
        .duration
        .map(Duration::try_from_secs_f64)
        .transpose()
        .context("--duration must be a non-negative number of seconds")?;
    let mut signals = Signals::new([SIGINT, SIGTERM])?;
    let signal_handle = signals.handle();

    let delays = timing.config();
    println!("=== dinner — rust_dp dining philosophers ===");
    println!(
        "Seats: {}  |  Delay: {:.2}–{:.2}s (+{:.2}s eating)  |  Seed: {}",
        cli.seats, delays.min_delay_secs, delays.max_delay_secs, delays.eat_extra_secs, cli.seed
    );
    match run_limit {
        Some(d) => println!("Running for {:.1}s (Ctrl-C stops early)", d.as_secs_f64()),
        None    => println!("Running until Ctrl-C"),
    }
    println!();

    // 2. Lay the table and start one thread per seat.
    let handle = SimBuilder::new(cli.seats, timing)
        .seed(cli.seed)
        .observer((ActivityLog, MealTally::new(cli.seats)))
        .build()?
        .start()?;
    let t0 = Instant::now();

    // 3. Stop triggers: first signal, and optionally a timer.
    {
        let stopper = handle.stopper();
        thread::Builder::new()
            .name("signals".into())
            .spawn(move || {
                if let Some(signal) = signals.forever().next() {
                    info!(signal, "stop requested");
                    stopper.stop();
                }
            })?;
    }
    if let Some(limit) = run_limit {
        let stopper = handle.stopper();
        thread::Builder::new()
            .name("timer".into())
            .spawn(move || {
                thread::sleep(limit);
                stopper.stop();
            })?;
    }

    // 4. Wait for every seat to leave.
    let table = Arc::clone(handle.table());
    let report = handle.join()?;
    signal_handle.close();
    let elapsed = t0.elapsed();

    // 5. Summary.
    println!();
    println!("Dinner over after {:.3} s", elapsed.as_secs_f64());
    println!("  final phases : {}", table.snapshot());
    println!(
        "  meals        : {} total, {}–{} per seat",
        report.total_meals(),
        report.min_meals(),
        report.max_meals()
    );
    println!();
    println!("{:<8} {:<8}", "Seat", "Meals");
    println!("{}", "-".repeat(16));
    for (i, meals) in report.meals.iter().enumerate() {
        println!("{:<8} {:<8}", SeatId(i as u32).position(), meals);
    }
    let starved = report.starved();
    if !starved.is_empty() {
        let seats: Vec<String> = starved.iter().map(ToString::to_string).collect();
        println!();
        println!("Never ate: {}", seats.join(", "));
    }

    Ok(())
}
