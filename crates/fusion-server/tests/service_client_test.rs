// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Service and host client end to end over localhost

mod common;

use std::fs;
use std::path::Path;
use std::thread;

use common::{create_temp_dir, small_config, write_raw_frames, FRAME, SIDE};
use fusion_engine::{PipelineError, WindowGeometry};
use fusion_server::{stream_directory, ClientOptions, ClientSummary, FusionService, OutputFormat};

fn options(address: String, input: &Path, output: &Path) -> ClientOptions {
    let config = small_config();
    ClientOptions {
        address,
        input_dir: input.to_path_buf(),
        output_dir: output.to_path_buf(),
        side: SIDE,
        source_side: None,
        output_format: OutputFormat::Raw,
        max_cycles: None,
        geometry: WindowGeometry::try_from(&config.pipeline).unwrap(),
    }
}

fn assert_results(dir: &Path, expected: &[u8]) {
    for (n, value) in expected.iter().enumerate() {
        let path = dir.join(format!("fused_{:05}.raw", n));
        let fused = fs::read(&path).unwrap();
        assert_eq!(fused.len(), FRAME);
        assert!(fused.iter().all(|px| px == value), "result {} expected {}", n, value);
    }
    let extra = dir.join(format!("fused_{:05}.raw", expected.len()));
    assert!(!extra.exists(), "unexpected result {}", extra.display());
}

fn stream_with_service(frames: usize, value: u8) -> (ClientSummary, tempfile::TempDir) {
    let input = create_temp_dir();
    let output = create_temp_dir();
    write_raw_frames(input.path(), frames, value);

    let service = FusionService::bring_up(&small_config()).unwrap();
    let address = service.local_addr().unwrap().to_string();
    let server = thread::spawn(move || service.serve());

    let summary = stream_directory(&options(address, input.path(), output.path())).unwrap();
    assert!(server.join().unwrap().is_err());
    (summary, output)
}

#[test]
fn test_last_window_result_collected_away_from_wrap() {
    // One sending cycle (4), then a padded cycle (5) that returns its result
    let (summary, output) = stream_with_service(4, 100);

    assert_eq!(summary.cycles, 6);
    assert_eq!(summary.frames_sent, 4);
    assert_eq!(summary.frames_padded, 4);
    assert_eq!(summary.results_written, 6);
    assert_results(output.path(), &[0, 0, 0, 0, 0, 25]);
}

#[test]
fn test_partial_last_window_is_padded() {
    // Cycle 5 sends 2 inputs plus 2 repeats, cycle 6 collects its result
    let (summary, output) = stream_with_service(6, 100);

    assert_eq!(summary.cycles, 7);
    assert_eq!(summary.frames_sent, 6);
    assert_eq!(summary.frames_padded, 2 + 4);
    assert_eq!(summary.results_written, 7);
    assert_results(output.path(), &[0, 0, 0, 0, 0, 25, 50]);
}

#[test]
fn test_directory_stream_produces_window_means() {
    let input = create_temp_dir();
    let output = create_temp_dir();
    write_raw_frames(input.path(), 12, 100);

    let service = FusionService::bring_up(&small_config()).unwrap();
    let address = service.local_addr().unwrap().to_string();
    let server = thread::spawn(move || service.serve());

    let summary = stream_directory(&options(address, input.path(), output.path())).unwrap();

    // Warm-up (4 cycles), three sending cycles, then one flush cycle that
    // wraps back into warm-up and owes nothing
    assert_eq!(summary.cycles, 8);
    assert_eq!(summary.frames_sent, 12);
    assert_eq!(summary.frames_padded, 0);
    assert_eq!(summary.results_written, 8);
    assert_results(output.path(), &[0, 0, 0, 0, 0, 25, 50, 75]);

    // The service stops with a pipeline fault once the host goes away
    let err = server.join().unwrap().unwrap_err();
    assert!(err.downcast_ref::<PipelineError>().is_some());
}

#[test]
fn test_max_cycles_stops_during_warm_up() {
    let input = create_temp_dir();
    let output = create_temp_dir();
    write_raw_frames(input.path(), 4, 10);

    let service = FusionService::bring_up(&small_config()).unwrap();
    let address = service.local_addr().unwrap().to_string();
    let server = thread::spawn(move || service.serve());

    let mut opts = options(address, input.path(), output.path());
    opts.max_cycles = Some(2);
    opts.output_format = OutputFormat::Png;
    let summary = stream_directory(&opts).unwrap();

    assert_eq!(summary.cycles, 2);
    assert_eq!(summary.frames_sent, 0);
    assert!(output.path().join("fused_00001.png").exists());

    assert!(server.join().unwrap().is_err());
}

#[test]
fn test_bring_up_rejects_undersized_ring() {
    let mut config = small_config();
    config.pipeline.ring_capacity = 3;
    assert!(FusionService::bring_up(&config).is_err());
}
