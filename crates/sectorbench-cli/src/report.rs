//! Human-readable and JSON rendering of a measurement run

use anyhow::Result;
use console::style;

use sectorbench_core::{DirectionReport, Measurement, MeasurementReport};

/// Print the run configuration before the timed passes start.
pub fn banner(measurement: &Measurement, passes: u32, min_seconds: f64) {
    let geometry = measurement.geometry();
    let plan = measurement.plan();

    println!("Sector size: {} bytes", geometry.sector_size);
    println!("Free space:  {} bytes", geometry.free_bytes);
    println!("Testing on:  {}", measurement.path().display());
    println!(
        "File size:   {} bytes ({:.1} KiB)",
        plan.file_size,
        plan.file_size as f64 / 1024.0
    );
    println!(
        "Block size:  {} bytes ({:.1} KiB)",
        plan.block_size,
        plan.block_size as f64 / 1024.0
    );
    println!("Passes:      {}  |  Min seconds: {:.2}", passes, min_seconds);
}

/// Print per-pass and summary results for both directions.
pub fn human(report: &MeasurementReport) {
    direction(
        "Write throughput (unbuffered, write-through)",
        &report.write,
    );
    direction("Read throughput  (unbuffered)", &report.read);
}

fn direction(title: &str, report: &DirectionReport) {
    println!();
    println!("{}", style(title).bold());
    for (i, sample) in report.samples.iter().enumerate() {
        println!("  Pass {}: {:.2} MB/s", i + 1, sample);
    }
    println!(
        "  -> min/avg/max: {:.2} / {:.2} / {:.2} MB/s",
        report.summary.min, report.summary.mean, report.summary.max
    );
}

/// Print the whole report as pretty JSON.
pub fn json(report: &MeasurementReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
