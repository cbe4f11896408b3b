// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fusion server: accepts one host and runs the fusion cycle until a fault

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use fusion_config::{validate_config, FusionConfig};
use fusion_observability::{
    debug_flags_help, init_logging, parse_debug_flags_from, CrateDebugFlags, LoggingGuard,
};
use fusion_server::cli::{resolve_config, split_debug_args, CliOverrides};
use fusion_server::FusionService;
use tracing::{error, info};

/// Fusion Server - streams image frames through the fusion accelerator
#[derive(Parser, Debug)]
#[command(name = "fusion-server", version, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Path to fusion_configuration.toml (searched for when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen host
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Old/new pairs per fused frame
    #[arg(long)]
    window: Option<usize>,

    /// Frame ring capacity
    #[arg(long)]
    ring_capacity: Option<usize>,

    /// Frame side in pixels
    #[arg(long)]
    image_side: Option<usize>,

    /// Base log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        let mut overrides = CliOverrides::new();
        overrides
            .set("network.host", self.host.as_deref())
            .set("network.port", self.port)
            .set("pipeline.window", self.window)
            .set("pipeline.ring_capacity", self.ring_capacity)
            .set("pipeline.image_side", self.image_side)
            .set("logging.level", self.log_level.as_deref());
        overrides
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("[FUSION-SERVER] {:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let (debug_args, clap_args) = split_debug_args(std::env::args());
    let args = Args::parse_from(clap_args);
    let debug_flags = parse_debug_flags_from(debug_args);

    let config = resolve_config(args.config.as_deref(), &args.overrides())
        .context("Failed to load configuration")?;
    validate_config(&config).context("Invalid configuration")?;

    let _log_guard = start_logging(&debug_flags, &config)?;
    print_banner();
    log_summary(&config);

    let service = FusionService::bring_up(&config)?;
    info!("[FUSION-SERVER] listening on {}", service.local_addr()?);

    match service.serve()? {}
}

fn start_logging(debug_flags: &CrateDebugFlags, config: &FusionConfig) -> Result<LoggingGuard> {
    let log_dir = if config.logging.file_logging {
        Some(
            config
                .logging
                .log_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from("logs")),
        )
    } else {
        None
    };
    let guard = init_logging(debug_flags, &config.logging.level, log_dir)?;
    if let Some(dir) = guard.log_dir() {
        info!("[FUSION-SERVER] file logs in {}", dir.display());
    }
    if debug_flags.any_enabled() {
        info!(
            "[FUSION-SERVER] debug filter {}",
            debug_flags.to_filter_string(&config.logging.level)
        );
    }
    Ok(guard)
}

fn log_summary(config: &FusionConfig) {
    let pipeline = &config.pipeline;
    info!(
        "[FUSION-SERVER] frame {}x{} ({} bytes), ring {}, window {}",
        pipeline.image_side,
        pipeline.image_side,
        pipeline.frame_bytes().unwrap_or_default(),
        pipeline.ring_capacity,
        pipeline.window
    );
    info!(
        "[FUSION-SERVER] accelerator {} ({:?}), bind {}",
        config.accelerator.device_id,
        config.accelerator.backend,
        config.network.bind_address()
    );
}

fn print_banner() {
    println!();
    println!("  fusion-server v{}", env!("CARGO_PKG_VERSION"));
    println!("  multi-frame fusion over a frame ring");
    println!();
}
