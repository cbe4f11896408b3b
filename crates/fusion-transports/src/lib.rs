// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # fusion-transports
//!
//! Exact-length frame transport for the fusion pipeline.
//!
//! Frames travel as raw payload with no header, length prefix or
//! acknowledgement: both ends agree on the frame size out of band. Every
//! operation blocks until the whole frame has moved or the link has failed.
//!
//! ## Features
//!
//! - `tcp-server`: single-client TCP server ([`TcpFrameServer`])
//! - `tcp-client`: host-side TCP client ([`TcpFrameClient`])
//! - `tcp` (default): both
//!
//! ## Example: Server
//!
//! ```no_run
//! use fusion_transports::prelude::*;
//!
//! let server = TcpFrameServer::bind(TransportConfig::new("0.0.0.0:5001"))?;
//! let mut conn = server.accept_one()?;
//!
//! let mut frame = vec![0u8; 512 * 512];
//! conn.receive_exact(&mut frame)?;
//! conn.send_exact(&frame)?;
//! # Ok::<(), fusion_transports::TransportError>(())
//! ```
//!
//! ## Example: Client
//!
//! ```no_run
//! use fusion_transports::prelude::*;
//!
//! let mut conn = TcpFrameClient::connect("192.168.1.10:5001")?;
//! conn.send_exact(&vec![0u8; 512 * 512])?;
//! # Ok::<(), fusion_transports::TransportError>(())
//! ```
//!
//! ## Architecture
//!
//! 1. **Common**: errors and config
//! 2. **Traits**: [`FrameStream`], the only capability the pipeline consumes
//! 3. **Implementations**: TCP server and client over [`FrameConnection`]

pub mod common;
pub mod tcp;
pub mod traits;

// Re-export commonly used types
pub use common::{TransportConfig, TransportError, TransportResult};
pub use tcp::FrameConnection;
pub use traits::{FrameStream, TransportStats};

#[cfg(feature = "tcp-server")]
pub use tcp::TcpFrameServer;

#[cfg(feature = "tcp-client")]
pub use tcp::TcpFrameClient;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::common::*;
    pub use crate::tcp::*;
    pub use crate::traits::*;
}
