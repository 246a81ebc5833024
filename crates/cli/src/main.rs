//! Cache hierarchy simulator CLI.
//!
//! This binary drives the simulator over a memory trace. It performs:
//! 1. **Configuration:** Built-in defaults, an optional JSON file, then per-field flag overrides.
//! 2. **Trace run:** Streams the trace from a file or stdin through the hierarchy.
//! 3. **Reporting:** Prints the statistics as a text report or as JSON.

use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cachesim_core::common::SimError;
use cachesim_core::config::SimConfig;
use cachesim_core::sim::{self, Simulator, TraceReader};
use cachesim_core::stats::{CacheStats, STATS_SECTIONS};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven two-level cache hierarchy simulator",
    long_about = "Replay a memory trace against an L1/L2 hierarchy with an optional victim cache and sequential prefetcher.\n\nTrace lines are `<r|w> <hex address>`; blank lines and `#` comments are skipped.\n\nExamples:\n  cachesim -i traces/gcc.trace\n  cachesim -c 13 -s 2 -v 4 -k 0 < traces/gcc.trace\n  cachesim --config p1.json --json -i traces/gcc.trace"
)]
struct Cli {
    /// Trace file to replay (stdin when omitted).
    #[arg(short = 'i', long = "trace")]
    trace: Option<PathBuf>,

    /// JSON configuration file; flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// L1 size, log2 bytes.
    #[arg(short = 'c', long)]
    l1_c: Option<u32>,

    /// L1 associativity, log2 ways.
    #[arg(short = 's', long)]
    l1_s: Option<u32>,

    /// L2 size, log2 bytes.
    #[arg(short = 'C', long)]
    l2_c: Option<u32>,

    /// L2 associativity, log2 ways.
    #[arg(short = 'S', long)]
    l2_s: Option<u32>,

    /// Block size, log2 bytes (shared by every level).
    #[arg(short = 'b', long)]
    block: Option<u32>,

    /// Victim cache entries (0 disables it).
    #[arg(short = 'v', long)]
    victim: Option<u32>,

    /// Prefetch degree (0 disables prefetching).
    #[arg(short = 'k', long)]
    prefetch: Option<u32>,

    /// Print the statistics as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Report sections to print (summary, l1, l2, victim, memory); all when omitted.
    #[arg(long, value_delimiter = ',')]
    sections: Vec<String>,

    /// Log every access resolution (overridden by RUST_LOG).
    #[arg(long)]
    verbose: bool,
}

impl Cli {
    /// Loads the base configuration and applies the flag overrides.
    fn sim_config(&self) -> Result<SimConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => SimConfig::load(path)?,
            None => SimConfig::default(),
        };
        let overrides = [
            (self.l1_c, &mut config.l1_c),
            (self.l1_s, &mut config.l1_s),
            (self.l2_c, &mut config.l2_c),
            (self.l2_s, &mut config.l2_s),
            (self.block, &mut config.b),
            (self.victim, &mut config.v),
            (self.prefetch, &mut config.k),
        ];
        for (flag, field) in overrides {
            if let Some(value) = flag {
                *field = value;
            }
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Some(bad) = cli
        .sections
        .iter()
        .find(|s| !STATS_SECTIONS.contains(&s.as_str()))
    {
        eprintln!(
            "Error: unknown stats section '{bad}' (expected one of {})",
            STATS_SECTIONS.join(", ")
        );
        process::exit(2);
    }

    match run(&cli) {
        Ok(stats) => {
            if let Err(e) = report(&cli, &stats) {
                eprintln!("Error writing statistics: {e}");
                process::exit(1);
            }
        }
        Err(e) => {
            error!("{e}");
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr subscriber; `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Builds the simulator and replays the whole trace through it.
fn run(cli: &Cli) -> Result<CacheStats, SimError> {
    let config = cli.sim_config()?;
    let mut simulator = Simulator::new(&config)?;
    let mut stats = CacheStats::default();

    let processed = match &cli.trace {
        Some(path) => sim::run_trace(&mut simulator, sim::load_trace(path)?, &mut stats),
        None => {
            let stdin = io::stdin();
            let reader = TraceReader::new(BufReader::new(stdin.lock()));
            sim::run_trace(&mut simulator, reader, &mut stats)
        }
    }?;
    info!(processed, "trace replayed");

    simulator.finish(&mut stats);
    Ok(stats)
}

/// Writes `stats` to stdout in the format selected on the command line.
fn report(cli: &Cli, stats: &CacheStats) -> io::Result<()> {
    if cli.json {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, stats)?;
        writeln!(out)?;
        out.flush()
    } else {
        stats.print_sections(&cli.sections)
    }
}
