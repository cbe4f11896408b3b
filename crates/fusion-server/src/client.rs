// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Host-side streaming client
//!
//! Streams a directory of frames to a running service, following the same
//! cycle cadence as the controller: nothing is sent during warm-up, `window`
//! frames per cycle afterwards, and exactly one fused frame comes back every
//! cycle. A fused frame covers the window sent in the previous cycle, so once
//! the inputs run out the client runs one more cycle to collect it. Frames
//! owed in that cycle, or missing from a partial last window, are filled by
//! repeating the last input frame.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fusion_engine::{FrameCadence, WindowGeometry};
use fusion_transports::{TcpFrameClient, TransportConfig};
use tracing::{debug, info};

use crate::frame_io::{list_frames, load_frame, save_frame};

/// Encoding of written fused frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Raw,
    Png,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Png => "png",
        }
    }
}

/// Streaming client options
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Service address (`host:port`)
    pub address: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Wire frame side
    pub side: usize,
    /// Side of headerless input files when it differs from `side`
    pub source_side: Option<usize>,
    pub output_format: OutputFormat,
    /// Stop after this many cycles even if inputs remain
    pub max_cycles: Option<usize>,
    /// Must match the service geometry
    pub geometry: WindowGeometry,
}

/// What a streaming run produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientSummary {
    pub cycles: usize,
    /// Input frames sent
    pub frames_sent: usize,
    /// Repeats of the last input sent to complete a cycle
    pub frames_padded: usize,
    pub results_written: usize,
}

/// Stream every frame in `input_dir` and write each fused result
pub fn stream_directory(options: &ClientOptions) -> Result<ClientSummary> {
    let inputs = list_frames(&options.input_dir)?;
    info!(
        "[FUSION-CLIENT] {} input frames in {}",
        inputs.len(),
        options.input_dir.display()
    );

    fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            options.output_dir.display()
        )
    })?;

    let transport = TransportConfig::new(options.address.as_str())
        .with_max_frame_bytes(options.geometry.frame_bytes());
    let mut conn = TcpFrameClient::connect_with_config(&transport)
        .with_context(|| format!("Failed to connect to {}", options.address))?;

    let mut cadence = FrameCadence::new(options.geometry);
    let mut remaining = inputs.iter();
    let mut fused = vec![0u8; options.geometry.frame_bytes()];
    let mut summary = ClientSummary::default();

    let mut last_frame: Option<Vec<u8>> = None;
    // Set after a cycle that sent inputs; their result arrives a cycle later
    let mut flush_pending = false;

    loop {
        if options.max_cycles.is_some_and(|max| summary.cycles >= max) {
            break;
        }
        let exhausted = remaining.as_slice().is_empty();
        if exhausted && !flush_pending {
            break;
        }

        let owed = cadence.frames_to_send();
        let mut sent = 0;
        for path in remaining.by_ref().take(owed) {
            let frame = load_frame(path, options.side, options.source_side)?;
            conn.send_exact(&frame)
                .with_context(|| format!("Failed to send {}", path.display()))?;
            last_frame = Some(frame);
            sent += 1;
        }
        summary.frames_sent += sent;

        if let Some(frame) = last_frame.as_deref() {
            for _ in sent..owed {
                conn.send_exact(frame)
                    .context("Failed to send padding frame")?;
                summary.frames_padded += 1;
            }
        }

        if exhausted {
            flush_pending = false;
        } else if sent > 0 {
            flush_pending = true;
        }

        conn.receive_exact(&mut fused)
            .with_context(|| format!("Failed to receive result of cycle {}", cadence.cycle()))?;

        let out = result_path(&options.output_dir, summary.results_written, options.output_format);
        save_frame(&out, &fused, options.side)?;
        debug!(
            "[FUSION-CLIENT] cycle {} -> {}",
            cadence.cycle(),
            out.display()
        );
        summary.results_written += 1;
        summary.cycles += 1;
        cadence.advance();
    }

    info!(
        "[FUSION-CLIENT] done: {} cycles, {} frames sent ({} padding), {} results written to {}",
        summary.cycles,
        summary.frames_sent,
        summary.frames_padded,
        summary.results_written,
        options.output_dir.display()
    );
    Ok(summary)
}

fn result_path(dir: &Path, n: usize, format: OutputFormat) -> PathBuf {
    dir.join(format!("fused_{:05}.{}", n, format.extension()))
}
