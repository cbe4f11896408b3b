// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fusion Server Library
//!
//! Startup plumbing shared by the `fusion-server` and `fusion-client`
//! binaries, exported for testing.

pub mod cli;
pub mod client;
pub mod frame_io;
pub mod service;

// Re-export key types for convenience
pub use client::{stream_directory, ClientOptions, ClientSummary, OutputFormat};
pub use frame_io::{FrameFormat, FrameIoError, FrameIoResult};
pub use service::{FusionService, SimulatedChannel};
