//! Cache hierarchy simulator CLI.
//!
//! Replays a memory trace through a split-L1 / shared-L2 hierarchy and prints
//! per-level statistics. It performs:
//! 1. **Configuration:** Optional JSON file, then per-level `sets:assoc:hit` overrides.
//! 2. **Replay:** Reads `<i|d> <hex address>` lines from a file or stdin.
//! 3. **Reporting:** Text table by default, JSON with `--json`.

use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::process;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cachesim_core::config::{CacheConfig, Config};
use cachesim_core::sim::{Simulator, TraceReader};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven split-L1 / shared-L2 cache simulator",
    long_about = "Replay a memory trace through an L1-I/L1-D/L2 hierarchy with stack LRU replacement.\n\nA level configured with zero sets is disabled and bypassed.\n\nExamples:\n  cachesim --icache 128:2:1 --dcache 128:4:1 --l2cache 1024:8:10 --inclusive trace.txt\n  cachesim --config hierarchy.json --json < trace.txt"
)]
struct Cli {
    /// JSON configuration file; flags below override its fields.
    #[arg(short, long)]
    config: Option<String>,

    /// L1 instruction cache geometry as `sets:assoc:hit`.
    #[arg(long, value_name = "SETS:ASSOC:HIT")]
    icache: Option<CacheConfig>,

    /// L1 data cache geometry as `sets:assoc:hit`.
    #[arg(long, value_name = "SETS:ASSOC:HIT")]
    dcache: Option<CacheConfig>,

    /// L2 cache geometry as `sets:assoc:hit`.
    #[arg(long, value_name = "SETS:ASSOC:HIT")]
    l2cache: Option<CacheConfig>,

    /// Back-invalidate L1 copies on L2 eviction.
    #[arg(long, overrides_with = "no_inclusive")]
    inclusive: bool,

    /// Keep L1 copies on L2 eviction, even if the config file enables inclusion.
    #[arg(long, overrides_with = "inclusive")]
    no_inclusive: bool,

    /// Block size in bytes (power of two).
    #[arg(long)]
    blocksize: Option<u64>,

    /// Main-memory latency in cycles.
    #[arg(long)]
    memspeed: Option<u64>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,

    /// Log hierarchy events (repeat for per-access tracing).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Trace file; stdin when omitted.
    trace: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("[!] FATAL: {e}");
        process::exit(1);
    }
}

/// Installs the stderr subscriber; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Merges the JSON file and the command-line overrides into one configuration.
fn build_config(cli: &Cli) -> Result<Config, Box<dyn Error>> {
    let config = match &cli.config {
        Some(path) => Config::from_json(&fs::read_to_string(path)?)?,
        None => Config::default(),
    };
    let config = apply_overrides(cli, config);
    config.validate()?;
    Ok(config)
}

/// Replaces every field of `config` that was given on the command line.
fn apply_overrides(cli: &Cli, mut config: Config) -> Config {
    if let Some(icache) = cli.icache {
        config.l1_i = icache;
    }
    if let Some(dcache) = cli.dcache {
        config.l1_d = dcache;
    }
    if let Some(l2) = cli.l2cache {
        config.l2 = l2;
    }
    if cli.inclusive {
        config.inclusive = true;
    } else if cli.no_inclusive {
        config.inclusive = false;
    }
    if let Some(block_size) = cli.blocksize {
        config.block_size = block_size;
    }
    if let Some(memory_latency) = cli.memspeed {
        config.memory_latency = memory_latency;
    }
    config
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let config = build_config(cli)?;
    let mut sim = Simulator::new(&config)?;

    let source: Box<dyn BufRead> = match &cli.trace {
        Some(path) => {
            info!(path = %path, "reading trace");
            Box::new(BufReader::new(File::open(path)?))
        }
        None => Box::new(io::stdin().lock()),
    };
    sim.run(TraceReader::new(source))?;

    let report = sim.report();
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        report.print();
    }
    Ok(())
}
