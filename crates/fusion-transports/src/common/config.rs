// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transport configuration

use serde::{Deserialize, Serialize};

/// Frame transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Address to bind (server) or connect (client), `host:port`
    pub address: String,

    /// Disable Nagle's algorithm on the connection
    pub nodelay: bool,

    /// Largest single frame accepted by `receive_exact`/`send_exact` (None = unlimited)
    pub max_frame_bytes: Option<usize>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0:5001".to_string(),
            nodelay: true,
            max_frame_bytes: None,
        }
    }
}

impl TransportConfig {
    /// Create a new config with the given address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    /// Set TCP_NODELAY
    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    /// Cap the size of a single frame
    pub fn with_max_frame_bytes(mut self, size: usize) -> Self {
        self.max_frame_bytes = Some(size);
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.address.is_empty() {
            return Err("Address cannot be empty".to_string());
        }

        if !self.address.contains(':') {
            return Err(format!("Address '{}' is missing a port", self.address));
        }

        if let Some(max_size) = self.max_frame_bytes {
            if max_size == 0 {
                return Err("Maximum frame size must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}
