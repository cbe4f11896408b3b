// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Fusion
//!
//! Multi-frame image fusion for an embedded streaming pipeline. A host streams
//! fixed-size grayscale frames over TCP; the device keeps a ring of recent
//! frames, feeds old/new pairs of a sliding window to a fusion accelerator over
//! DMA, and streams one fused frame back per cycle.
//!
//! ## Quick Start
//!
//! ```toml
//! [dependencies]
//! fusion = "0.1"  # Default: simulated accelerator + TCP
//! ```
//!
//! ## Feature Flags
//!
//! - **`simulated`** (default): software model of the fusion core
//! - **`tcp`** (default): TCP frame server and client
//! - **`tcp-server`** / **`tcp-client`**: one side only
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use fusion::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let geometry = WindowGeometry::new(512 * 512, 31, 16)?;
//!
//! let engine = SimulatedFusionEngine::configure(0, geometry.frame_bytes(), geometry.window())?;
//! let channel = AcceleratorChannel::bring_up(engine, CoherentCache)?;
//!
//! let server = TcpFrameServer::bind(TransportConfig::new("0.0.0.0:5001"))?;
//! let peer = server.accept_one()?;
//!
//! let mut controller = FusionCycleController::new(geometry, channel, peer);
//! let err = controller.run().unwrap_err();
//! eprintln!("pipeline stopped: {}", err);
//! # Ok(())
//! # }
//! ```

// Re-export foundation
pub use fusion_config as config;

// Re-export platform layer
pub use fusion_hal as hal;

// Re-export I/O layer
pub use fusion_transports as transports;

// Re-export algorithms
pub use fusion_engine as engine;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{FusionConfig, PipelineConfig};
    pub use crate::engine::{
        FrameCadence, FusionAccelerator, FusionCycleController, PipelineError, PipelineStage,
        WindowGeometry,
    };
    pub use crate::hal::{AcceleratorChannel, CoherentCache, TransferError};
    pub use crate::transports::{FrameStream, TransportConfig, TransportError};

    #[cfg(feature = "simulated")]
    pub use crate::hal::SimulatedFusionEngine;

    #[cfg(feature = "tcp-server")]
    pub use crate::transports::TcpFrameServer;

    #[cfg(feature = "tcp-client")]
    pub use crate::transports::TcpFrameClient;
}
