// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Command-line helpers shared by both binaries

use std::collections::HashMap;
use std::path::Path;

use fusion_config::{
    apply_cli_overrides, apply_environment_overrides, load_config, ConfigError, ConfigResult,
    FusionConfig,
};
use tracing::warn;

/// Split `--debug-*` flags from the arguments handed to clap
///
/// Debug flags are open-ended (one per crate) so they are parsed by
/// `fusion-observability` rather than declared on the clap parser.
pub fn split_debug_args<I>(args: I) -> (Vec<String>, Vec<String>)
where
    I: IntoIterator<Item = String>,
{
    args.into_iter().partition(|arg| arg.starts_with("--debug-"))
}

/// Collect the dotted-key overrides understood by `fusion_config::apply_cli_overrides`
#[derive(Debug, Default)]
pub struct CliOverrides {
    values: HashMap<String, String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `key = value` when the flag was given
    pub fn set<T: ToString>(&mut self, key: &str, value: Option<T>) -> &mut Self {
        if let Some(value) = value {
            self.values.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_map(&self) -> &HashMap<String, String> {
        &self.values
    }
}

/// Resolve the service configuration
///
/// An explicit `config_path` must exist. Without one, the usual search is
/// tried and a missing file falls back to built-in defaults; environment and
/// CLI overrides apply either way.
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: &CliOverrides,
) -> ConfigResult<FusionConfig> {
    match load_config(config_path, Some(overrides.as_map())) {
        Err(ConfigError::FileNotFound(msg)) if config_path.is_none() => {
            warn!("[CONFIG] {}; using built-in defaults", msg);
            let mut config = FusionConfig::default();
            apply_environment_overrides(&mut config);
            apply_cli_overrides(&mut config, overrides.as_map());
            Ok(config)
        }
        other => other,
    }
}
