// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Fusion Engine
//!
//! The driving state machine of the fusion pipeline.
//!
//! Each cycle the [`FusionCycleController`]:
//! 1. pulls one fused frame from the accelerator into the [`FusionAccumulator`],
//! 2. feeds the accelerator `window` old/new frame pairs out of the [`FrameRing`],
//!    refilling each evicted slot from the network right after its last use,
//! 3. emits the fused frame to the peer.
//!
//! Accelerator compute and network ingestion overlap inside one window pass,
//! so the ring is replenished just in time, one slot per step.
//!
//! ## Architecture
//! - Single thread of control; the only concurrency is the accelerator's
//!   completion interrupts, which never touch frame data
//! - Fail-fast: the first accelerator or transport fault ends the pipeline
//! - Sizing is construction-time configuration ([`WindowGeometry`])

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod accelerator;
pub mod cadence;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod ring;

pub use accelerator::FusionAccelerator;
pub use cadence::FrameCadence;
pub use controller::FusionCycleController;
pub use error::{FaultSite, GeometryError, PipelineError, PipelineStage};
pub use geometry::{WindowGeometry, WindowStep};
pub use ring::{FrameRing, FusionAccumulator};
