// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host-side TCP frame client

use std::net::TcpStream;

use tracing::info;

use crate::common::{TransportConfig, TransportError, TransportResult};
use crate::tcp::connection::FrameConnection;

/// Connector for the host side of the frame link
pub struct TcpFrameClient;

impl TcpFrameClient {
    /// Connect to `address` with default settings
    pub fn connect(address: &str) -> TransportResult<FrameConnection<TcpStream>> {
        Self::connect_with_config(&TransportConfig::new(address))
    }

    /// Connect using a full transport config
    pub fn connect_with_config(
        config: &TransportConfig,
    ) -> TransportResult<FrameConnection<TcpStream>> {
        config.validate().map_err(TransportError::InvalidConfig)?;

        let stream = TcpStream::connect(&config.address)
            .map_err(|e| TransportError::ConnectFailed(format!("{}: {}", config.address, e)))?;
        stream.set_nodelay(config.nodelay)?;

        info!("[TCP] connected to {}", config.address);
        Ok(FrameConnection::new(stream, config.address.clone())
            .with_max_frame_bytes(config.max_frame_bytes))
    }
}
