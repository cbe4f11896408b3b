// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `fusion_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FusionConfig {
    pub pipeline: PipelineConfig,
    pub network: NetworkConfig,
    pub accelerator: AcceleratorConfig,
    pub logging: LoggingConfig,
}

/// Sliding-window geometry of the fusion pipeline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Width and height of one square grayscale frame, in pixels
    pub image_side: usize,
    /// Number of frame slots held in the ring
    pub ring_capacity: usize,
    /// Number of old/new pairs fed to the accelerator per fused frame
    pub window: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            image_side: 512,
            ring_capacity: 31,
            window: 16,
        }
    }
}

impl PipelineConfig {
    /// Bytes in one frame (`image_side * image_side`, one byte per pixel)
    ///
    /// `None` when the frame would not fit in `usize`.
    pub fn frame_bytes(&self) -> Option<usize> {
        self.image_side.checked_mul(self.image_side)
    }
}

/// Stream listener configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub host: String,
    pub port: u16,
    /// Disable Nagle's algorithm on the accepted connection
    pub nodelay: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            nodelay: true,
        }
    }
}

impl NetworkConfig {
    /// `host:port` string suitable for binding a listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Which accelerator platform the service drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AcceleratorBackend {
    /// Software model of the fusion core (hosted targets, CI)
    #[default]
    Simulated,
}

/// Accelerator bring-up configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AcceleratorConfig {
    /// DMA engine device identifier
    pub device_id: u32,
    pub backend: AcceleratorBackend,
    /// Artificial completion latency for the simulated backend (0 = immediate)
    pub transfer_latency_us: u64,
}

impl Default for AcceleratorConfig {
    fn default() -> Self {
        Self {
            device_id: 0,
            backend: AcceleratorBackend::Simulated,
            transfer_latency_us: 0,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base log level (trace, debug, info, warn, error)
    pub level: String,
    /// Directory for per-run log folders (file logging only)
    pub log_dir: Option<PathBuf>,
    pub file_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
            file_logging: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_geometry() {
        let pipeline = PipelineConfig::default();
        assert_eq!(pipeline.frame_bytes(), Some(262_144));
        assert_eq!(pipeline.ring_capacity, 31);
        assert_eq!(pipeline.window, 16);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: FusionConfig = toml::from_str("[pipeline]\nwindow = 4\n").unwrap();
        assert_eq!(config.pipeline.window, 4);
        assert_eq!(config.pipeline.image_side, 512);
        assert_eq!(config.network.port, 5001);
    }

    #[test]
    fn test_backend_lowercase() {
        let config: FusionConfig =
            toml::from_str("[accelerator]\nbackend = \"simulated\"\ndevice_id = 3\n").unwrap();
        assert_eq!(config.accelerator.backend, AcceleratorBackend::Simulated);
        assert_eq!(config.accelerator.device_id, 3);
    }

    #[test]
    fn test_bind_address() {
        let network = NetworkConfig {
            host: "127.0.0.1".to_string(),
            port: 6000,
            nodelay: false,
        };
        assert_eq!(network.bind_address(), "127.0.0.1:6000");
    }
}
