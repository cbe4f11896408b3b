// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base defaults)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, FusionConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "fusion_configuration.toml";

/// Find the fusion configuration file
///
/// Search order:
/// 1. `FUSION_CONFIG_PATH` environment variable
/// 2. Current working directory: `./fusion_configuration.toml`
/// 3. Parent directories (up to 5 levels)
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("FUSION_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        } else {
            return Err(ConfigError::FileNotFound(format!(
                "Config file specified by FUSION_CONFIG_PATH not found: {}",
                path.display()
            )));
        }
    }

    let mut search_paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));

        let mut current = cwd.clone();
        for _ in 0..5 {
            if let Some(parent) = current.parent() {
                search_paths.push(parent.join(CONFIG_FILE_NAME));
                current = parent.to_path_buf();
            }
        }
    }

    for path in &search_paths {
        if path.exists() {
            return Ok(path.clone());
        }
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "Configuration file '{}' not found in any of these locations:\n{}\n\nSet FUSION_CONFIG_PATH environment variable to specify custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Load configuration from TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides (dotted keys, e.g. `network.port`)
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Validation is a separate step (see [`crate::validate_config`]).
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<FusionConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: FusionConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);

    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `FUSION_HOST` -> `network.host`
/// - `FUSION_PORT` -> `network.port`
/// - `FUSION_IMAGE_SIDE` -> `pipeline.image_side`
/// - `FUSION_RING_CAPACITY` -> `pipeline.ring_capacity`
/// - `FUSION_WINDOW` -> `pipeline.window`
/// - `FUSION_DEVICE_ID` -> `accelerator.device_id`
/// - `FUSION_LOG_LEVEL` -> `logging.level`
///
/// Values that fail to parse are ignored.
pub fn apply_environment_overrides(config: &mut FusionConfig) {
    if let Ok(value) = env::var("FUSION_HOST") {
        config.network.host = value;
    }
    if let Ok(value) = env::var("FUSION_PORT") {
        if let Ok(port) = value.parse::<u16>() {
            config.network.port = port;
        }
    }

    if let Ok(value) = env::var("FUSION_IMAGE_SIDE") {
        if let Ok(side) = value.parse::<usize>() {
            config.pipeline.image_side = side;
        }
    }
    if let Ok(value) = env::var("FUSION_RING_CAPACITY") {
        if let Ok(capacity) = value.parse::<usize>() {
            config.pipeline.ring_capacity = capacity;
        }
    }
    if let Ok(value) = env::var("FUSION_WINDOW") {
        if let Ok(window) = value.parse::<usize>() {
            config.pipeline.window = window;
        }
    }

    if let Ok(value) = env::var("FUSION_DEVICE_ID") {
        if let Ok(device_id) = value.parse::<u32>() {
            config.accelerator.device_id = device_id;
        }
    }

    if let Ok(value) = env::var("FUSION_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"network.port": "6000"}`)
pub fn apply_cli_overrides(config: &mut FusionConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("network.host") {
        config.network.host = value.clone();
    }
    if let Some(value) = cli_args.get("network.port") {
        if let Ok(port) = value.parse::<u16>() {
            config.network.port = port;
        }
    }

    if let Some(value) = cli_args.get("pipeline.image_side") {
        if let Ok(side) = value.parse::<usize>() {
            config.pipeline.image_side = side;
        }
    }
    if let Some(value) = cli_args.get("pipeline.ring_capacity") {
        if let Ok(capacity) = value.parse::<usize>() {
            config.pipeline.ring_capacity = capacity;
        }
    }
    if let Some(value) = cli_args.get("pipeline.window") {
        if let Ok(window) = value.parse::<usize>() {
            config.pipeline.window = window;
        }
    }

    if let Some(value) = cli_args.get("accelerator.device_id") {
        if let Ok(device_id) = value.parse::<u32>() {
            config.accelerator.device_id = device_id;
        }
    }

    if let Some(value) = cli_args.get("logging.level") {
        config.logging.level = value.clone();
    }
}
