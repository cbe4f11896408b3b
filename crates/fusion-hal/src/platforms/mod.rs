// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Platform implementations
//!
//! Each platform provides a [`crate::DmaEngine`] for its fusion accelerator.
//! Hardware platforms bind the engine's interrupt lines through their
//! interrupt controller; the simulated platform raises them from a thread.

/// Software model of the fusion core
#[cfg(feature = "simulated")]
pub mod simulated;

#[cfg(feature = "simulated")]
pub use simulated::{FaultInjector, SimulatedFusionEngine};
