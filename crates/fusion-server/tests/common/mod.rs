// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Common test utilities and helpers

#![allow(dead_code)]

use std::fs;
use std::path::Path;

use fusion_config::FusionConfig;
use tempfile::TempDir;

pub const SIDE: usize = 8;
pub const FRAME: usize = SIDE * SIDE;
pub const RING: usize = 7;
pub const WINDOW: usize = 4;

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Small geometry on an ephemeral localhost port
pub fn small_config() -> FusionConfig {
    let mut config = FusionConfig::default();
    config.pipeline.image_side = SIDE;
    config.pipeline.ring_capacity = RING;
    config.pipeline.window = WINDOW;
    config.network.host = "127.0.0.1".to_string();
    config.network.port = 0;
    config
}

/// Write `count` constant raw frames named so they sort in order
pub fn write_raw_frames(dir: &Path, count: usize, value: u8) {
    for n in 0..count {
        let path = dir.join(format!("frame_{:03}.raw", n));
        fs::write(path, vec![value; FRAME]).expect("Failed to write frame");
    }
}
