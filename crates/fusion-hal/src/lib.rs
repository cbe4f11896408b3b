// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Fusion HAL
//!
//! Hardware abstraction for the block-transfer link between the host CPU and
//! the fusion accelerator.
//!
//! This crate provides:
//! - **HAL traits** (`hal` module) - DMA engine capability, cache maintenance,
//!   single-slot completion signals and the interrupt dispatch routine
//! - **`AcceleratorChannel`** - synchronous half-duplex transfers built on the traits
//! - **Platform implementations** (`platforms` module) - concrete engines
//!
//! ## Usage
//!
//! ```no_run
//! use fusion_hal::prelude::*;
//!
//! let engine = SimulatedFusionEngine::configure(0, 512 * 512, 16)?;
//! let mut channel = AcceleratorChannel::bring_up(engine, CoherentCache)?;
//!
//! let mut fused = vec![0u8; 512 * 512];
//! channel.receive(&mut fused)?;
//! # Ok::<(), fusion_hal::HalError>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `simulated` (default) - software model of the fusion core

/// Hardware abstraction traits shared by all platforms.
pub mod hal;

/// Synchronous transfer channel over a DMA engine.
pub mod channel;

/// Error types for HAL operations.
pub mod error;

/// Concrete platform implementations.
pub mod platforms;

pub use channel::{AcceleratorChannel, TransferStats};
pub use error::{HalError, HalResult, TransferError, TransferFault};
pub use hal::{
    CacheMaintenance, CoherentCache, CompletionSignal, CompletionSignals, DmaEngine, IrqStatus,
    TransferDirection, TransferOutcome,
};

#[cfg(feature = "simulated")]
pub use platforms::{FaultInjector, SimulatedFusionEngine};

/// Prelude module for convenient imports
///
/// ```no_run
/// use fusion_hal::prelude::*;
/// ```
pub mod prelude {
    pub use crate::channel::*;
    pub use crate::error::*;
    pub use crate::hal::*;

    #[cfg(feature = "simulated")]
    pub use crate::platforms::{FaultInjector, SimulatedFusionEngine};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
