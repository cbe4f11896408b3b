// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # fusion-observability
//!
//! Logging infrastructure shared by the fusion pipeline crates, with
//! per-crate debug flag support.
//!
//! ## Features
//! - `file-logging`: JSON log file per run, next to console output

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known pipeline crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "fusion-config",
    "fusion-hal",
    "fusion-transports",
    "fusion-engine",
    "fusion-server",
];
