//! Integration tests for sectorbench-core
//!
//! The pipeline tests run the planner, engine, runner, and aggregator together
//! against an in-memory target, so they need no volume with unbuffered
//! support. The full measurement over a real disk is #[ignore]d (O_DIRECT is
//! unavailable on tmpfs) and can be run manually.

use std::io::Cursor;

use sectorbench_core::*;

// ============================================================================
// Engine round-trip: written pattern must read back byte-for-byte
// ============================================================================

#[test]
fn test_write_read_round_trip_preserves_pattern() {
    let plan = plan(48 * 1024, false, 10 * 1024 * 1024, 512, 4 * 1024).unwrap();
    let pattern = vec![FILL_BYTE; plan.block_size as usize];
    let mut target = Cursor::new(vec![0u8; plan.file_size as usize]);

    write_pass(&mut target, &pattern, plan.file_size, plan.block_size).unwrap();
    assert!(target.get_ref().iter().all(|&b| b == FILL_BYTE));

    let mut buffer = vec![0u8; plan.block_size as usize];
    read_pass(&mut target, &mut buffer, plan.file_size, plan.block_size).unwrap();
    assert_eq!(buffer, pattern);
}

// ============================================================================
// Planner + runner + stats pipeline
// ============================================================================

#[test]
fn test_pipeline_collects_passes_and_summarizes() {
    let plan = plan(64 * 1024, false, 10 * 1024 * 1024, 512, 16 * 1024).unwrap();
    let pattern = vec![FILL_BYTE; plan.block_size as usize];
    let mut target = Cursor::new(vec![0u8; plan.file_size as usize]);

    let policy = PassPolicy {
        passes: 4,
        min_seconds: 0.0,
    };
    let series = policy
        .run(plan.file_size, || {
            write_pass(&mut target, &pattern, plan.file_size, plan.block_size)
        })
        .unwrap();

    assert_eq!(series.len(), 4);
    let report = summarize(&series).unwrap();
    assert!(report.min <= report.mean);
    assert!(report.mean <= report.max);
    assert!(report.min > 0.0);
}

#[test]
fn test_pipeline_read_direction() {
    let plan = plan(32 * 1024, false, 10 * 1024 * 1024, 512, 8 * 1024).unwrap();
    let mut target = Cursor::new(vec![FILL_BYTE; plan.file_size as usize]);
    let mut buffer = vec![0u8; plan.block_size as usize];

    let policy = PassPolicy {
        passes: 2,
        min_seconds: 0.0,
    };
    let series = policy
        .run(plan.file_size, || {
            read_pass(&mut target, &mut buffer, plan.file_size, plan.block_size)
        })
        .unwrap();

    assert_eq!(series.len(), 2);
    assert!(summarize(&series).is_ok());
}

#[test]
fn test_pipeline_partial_transfer_surfaces_counts() {
    // Plan a file bigger than the backing store: the pass must fail with the
    // requested/transferred counts, never a silent short result.
    let plan = plan(8 * 1024, false, 10 * 1024 * 1024, 512, 4 * 1024).unwrap();
    let mut target = Cursor::new(vec![0u8; 6 * 1024]);
    let mut buffer = vec![0u8; plan.block_size as usize];

    let err = read_pass(&mut target, &mut buffer, plan.file_size, plan.block_size).unwrap_err();
    match err {
        Error::PartialTransfer {
            requested,
            transferred,
        } => {
            assert_eq!(requested, 4 * 1024);
            assert_eq!(transferred, 2 * 1024);
        }
        other => panic!("expected PartialTransfer, got {other}"),
    }
}

// ============================================================================
// Full measurement (needs a volume with unbuffered support)
// ============================================================================

#[test]
#[ignore]
fn test_measure_on_real_volume() {
    // Run manually against a real disk, e.g.:
    //   SECTORBENCH_TEST_DIR=/mnt/disk cargo test -- --ignored
    let dir = std::env::var("SECTORBENCH_TEST_DIR").expect("set SECTORBENCH_TEST_DIR");
    let dir = std::path::Path::new(&dir);

    let config = MeasureConfig {
        requested_bytes: 256 * 1024,
        block_bytes: 64 * 1024,
        passes: 2,
        min_seconds: 0.0,
        autofit: true,
        keep_file: false,
    };
    let report = measure(dir, &config).unwrap();

    assert_eq!(report.write.samples.len(), 2);
    assert_eq!(report.read.samples.len(), 2);
    assert!(report.write.summary.min <= report.write.summary.max);
    assert!(!dir.join(TEST_FILE_NAME).exists());
}
