// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Single-client TCP frame server

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};

use tracing::info;

use crate::common::{TransportConfig, TransportError, TransportResult};
use crate::tcp::connection::FrameConnection;

/// Listening socket that hands out exactly one connection
pub struct TcpFrameServer {
    listener: TcpListener,
    config: TransportConfig,
}

impl TcpFrameServer {
    /// Bind to `config.address`
    pub fn bind(config: TransportConfig) -> TransportResult<Self> {
        config.validate().map_err(TransportError::InvalidConfig)?;

        let listener = TcpListener::bind(&config.address)
            .map_err(|e| TransportError::BindFailed(format!("{}: {}", config.address, e)))?;

        info!("[TCP] listening on {}", config.address);
        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> TransportResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Block until one peer connects
    ///
    /// The listener is consumed: once a peer is accepted the port is closed
    /// and no further connections are ever accepted.
    pub fn accept_one(self) -> TransportResult<FrameConnection<TcpStream>> {
        let (stream, peer) = loop {
            match self.listener.accept() {
                Ok(accepted) => break accepted,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(TransportError::AcceptFailed(e.to_string())),
            }
        };

        stream.set_nodelay(self.config.nodelay)?;
        info!("[TCP] accepted peer {}", peer);

        Ok(FrameConnection::new(stream, peer.to_string())
            .with_max_frame_bytes(self.config.max_frame_bytes))
    }
}
