//! sectorbench - measure sector-level disk throughput with unbuffered I/O
//!
//! # Usage
//!
//! ```bash
//! # Benchmark the current directory's volume with defaults (1 GiB request)
//! sectorbench
//!
//! # Tiny volume: let autofit pick the size, 4 passes per direction
//! sectorbench --target /mnt/flash --passes 4
//!
//! # Fixed 48 KiB file, keep it afterwards
//! sectorbench --target /mnt/flash --size-kb 48 --no-autofit --keep
//!
//! # Run each direction for at least 10 seconds
//! sectorbench --target /mnt/flash --min-seconds 10
//! ```

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use console::style;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use sectorbench_core::{MeasureConfig, Measurement};

mod report;

/// Measure sector-level disk throughput using unbuffered I/O.
///
/// Creates a test file in the target directory, writes and reads it
/// sequentially with cache-bypassing transfers, and reports per-pass and
/// min/avg/max throughput for both directions.
#[derive(Parser)]
#[command(name = "sectorbench")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory or drive mount point to test; the test file is created here
    #[arg(long, default_value = ".", env = "SECTORBENCH_TARGET")]
    target: PathBuf,

    /// Test file size in MiB
    #[arg(long, default_value_t = 1024)]
    size_mb: u64,

    /// Test file size in KiB (overrides --size-mb)
    #[arg(long)]
    size_kb: Option<u64>,

    /// Test file size in bytes (overrides --size-kb/--size-mb)
    #[arg(long)]
    size_bytes: Option<u64>,

    /// I/O block size in KiB (aligned up to the sector size, reduced if larger than the file)
    #[arg(long, default_value_t = 1024)]
    block_kb: u64,

    /// Number of passes for each direction
    #[arg(long, default_value_t = 1)]
    passes: u32,

    /// Run each direction until its total time reaches this many seconds (in addition to --passes)
    #[arg(long, default_value_t = 0.0)]
    min_seconds: f64,

    /// Disable auto-fit to free space (fails if the request is too large)
    #[arg(long)]
    no_autofit: bool,

    /// Keep the test file after the run
    #[arg(long)]
    keep: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors and results
    #[arg(short, long)]
    quiet: bool,
}

impl Cli {
    /// Size precedence: bytes over KiB over MiB.
    fn requested_bytes(&self) -> u64 {
        if let Some(bytes) = self.size_bytes {
            bytes
        } else if let Some(kib) = self.size_kb {
            kib * 1024
        } else {
            self.size_mb * 1024 * 1024
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {}", style("Error:").red().bold(), e);

        // Show cause chain when backtraces are requested
        if std::env::var("RUST_BACKTRACE").is_ok() {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("  {} {}", style("Caused by:").yellow(), cause);
                source = cause.source();
            }
        }

        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else if cli.quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    if !cli.target.is_dir() {
        bail!(
            "target '{}' is not a directory; for a drive, use its mount point (e.g. /mnt/flash or X:\\)",
            cli.target.display()
        );
    }
    if cli.passes == 0 && cli.min_seconds <= 0.0 {
        bail!("nothing to measure: set --passes >= 1 or --min-seconds > 0");
    }
    if cli.block_kb == 0 {
        bail!("--block-kb must be at least 1");
    }

    let config = MeasureConfig {
        requested_bytes: cli.requested_bytes(),
        block_bytes: cli.block_kb * 1024,
        passes: cli.passes,
        min_seconds: cli.min_seconds,
        autofit: !cli.no_autofit,
        keep_file: cli.keep,
    };
    debug!(dir = %cli.target.display(), ?config, "configuration parsed");

    let measurement = Measurement::prepare(&cli.target, &config)?;
    if !cli.quiet && !cli.json {
        report::banner(&measurement, cli.passes, cli.min_seconds);
    }

    let result = measurement.run()?;
    if cli.json {
        report::json(&result)?;
    } else {
        report::human(&result);
    }

    Ok(())
}
