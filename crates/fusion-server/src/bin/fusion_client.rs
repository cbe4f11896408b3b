// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host-side client: streams a directory of frames and saves fused results

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use fusion_config::validate_config;
use fusion_engine::WindowGeometry;
use fusion_observability::{debug_flags_help, init_logging, parse_debug_flags_from};
use fusion_server::cli::{resolve_config, split_debug_args, CliOverrides};
use fusion_server::{stream_directory, ClientOptions, OutputFormat};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// Headerless 8-bit pixels
    Raw,
    /// 8-bit grayscale PNG
    Png,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Raw => OutputFormat::Raw,
            Format::Png => OutputFormat::Png,
        }
    }
}

/// Fusion Client - feeds frame files to a fusion server
#[derive(Parser, Debug)]
#[command(name = "fusion-client", version, long_about = None, after_help = debug_flags_help())]
struct Args {
    /// Directory of input frames (.raw/.bin/.hex or image files)
    #[arg(short, long)]
    input: PathBuf,

    /// Directory receiving fused frames
    #[arg(short, long, default_value = "fused")]
    output: PathBuf,

    /// Server address; defaults to 127.0.0.1 on the configured port
    #[arg(short, long)]
    address: Option<String>,

    /// Path to the configuration shared with the server
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Frame side in pixels (must match the server)
    #[arg(long)]
    side: Option<usize>,

    /// Side of headerless inputs, when they need cropping or padding
    #[arg(long)]
    source_side: Option<usize>,

    /// Output encoding
    #[arg(short, long, value_enum, default_value_t = Format::Raw)]
    format: Format,

    /// Stop after this many cycles
    #[arg(long)]
    max_cycles: Option<usize>,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let (debug_args, clap_args) = split_debug_args(std::env::args());
    let args = Args::parse_from(clap_args);
    let debug_flags = parse_debug_flags_from(debug_args);

    let mut overrides = CliOverrides::new();
    overrides.set("pipeline.image_side", args.side);
    let config = resolve_config(args.config.as_deref(), &overrides)
        .context("Failed to load configuration")?;
    validate_config(&config).context("Invalid configuration")?;

    let _log_guard = init_logging(&debug_flags, &config.logging.level, None)?;

    let geometry = WindowGeometry::try_from(&config.pipeline)?;
    let options = ClientOptions {
        address: args
            .address
            .unwrap_or_else(|| format!("127.0.0.1:{}", config.network.port)),
        input_dir: args.input,
        output_dir: args.output,
        side: config.pipeline.image_side,
        source_side: args.source_side,
        output_format: args.format.into(),
        max_cycles: args.max_cycles,
        geometry,
    };

    let summary = stream_directory(&options)?;
    println!(
        "{} cycles, {} frames sent ({} padding), {} results written to {}",
        summary.cycles,
        summary.frames_sent,
        summary.frames_padded,
        summary.results_written,
        options.output_dir.display()
    );
    Ok(())
}
