// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Ensures configuration values are within valid ranges and that the
//! sliding-window geometry keeps the deployed ring-to-window ratio.

use crate::{ConfigError, ConfigResult, FusionConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    InvalidPortRange { port_name: String, port: u16 },
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPortRange { port_name, port } => {
                write!(
                    f,
                    "Port {} = {} is outside valid range (1024-65535)",
                    port_name, port
                )
            }
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// All problems are collected and reported together.
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` with details if validation fails
pub fn validate_config(config: &FusionConfig) -> ConfigResult<()> {
    let errors = collect_errors(config);

    if !errors.is_empty() {
        let error_messages = errors
            .iter()
            .map(|e| format!("  - {}", e))
            .collect::<Vec<_>>()
            .join("\n");

        return Err(ConfigError::ValidationError(format!(
            "Configuration validation failed:\n{}",
            error_messages
        )));
    }

    Ok(())
}

/// Run every check and return the full list of problems
pub fn collect_errors(config: &FusionConfig) -> Vec<ConfigValidationError> {
    let mut errors = Vec::new();
    validate_network(config, &mut errors);
    validate_pipeline(config, &mut errors);
    validate_logging(config, &mut errors);
    errors
}

fn validate_network(config: &FusionConfig, errors: &mut Vec<ConfigValidationError>) {
    if config.network.port < 1024 {
        errors.push(ConfigValidationError::InvalidPortRange {
            port_name: "network.port".to_string(),
            port: config.network.port,
        });
    }
    if config.network.host.trim().is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "network.host".to_string(),
        });
    }
}

fn validate_pipeline(config: &FusionConfig, errors: &mut Vec<ConfigValidationError>) {
    let pipeline = &config.pipeline;

    if pipeline.image_side == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "pipeline.image_side".to_string(),
            reason: "must be greater than 0".to_string(),
        });
    } else if pipeline.frame_bytes().is_none() {
        errors.push(ConfigValidationError::InvalidValue {
            field: "pipeline.image_side".to_string(),
            reason: format!(
                "{} x {} pixels does not fit in memory",
                pipeline.image_side, pipeline.image_side
            ),
        });
    }
    if pipeline.window == 0 {
        errors.push(ConfigValidationError::InvalidValue {
            field: "pipeline.window".to_string(),
            reason: "must be greater than 0".to_string(),
        });
        return;
    }

    // Deployed ratio: 31 slots for a window of 16
    let Some(min_capacity) = pipeline
        .window
        .checked_mul(2)
        .map(|slots| slots - 1)
    else {
        errors.push(ConfigValidationError::InvalidValue {
            field: "pipeline.window".to_string(),
            reason: format!("{} is too large to size a ring", pipeline.window),
        });
        return;
    };
    if pipeline.ring_capacity < min_capacity {
        errors.push(ConfigValidationError::InvalidValue {
            field: "pipeline.ring_capacity".to_string(),
            reason: format!(
                "{} slots are below the deployed ratio for a window of {} (need at least {})",
                pipeline.ring_capacity, pipeline.window, min_capacity
            ),
        });
    }
}

fn validate_logging(config: &FusionConfig, errors: &mut Vec<ConfigValidationError>) {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigValidationError::InvalidValue {
            field: "logging.level".to_string(),
            reason: format!(
                "'{}' is not one of {}",
                config.logging.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }
}
