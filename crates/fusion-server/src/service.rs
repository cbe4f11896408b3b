// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Service bring-up and run loop
//!
//! Bring-up happens in two steps so that every platform failure surfaces
//! before a peer is accepted: [`FusionService::bring_up`] configures the
//! accelerator, binds its interrupts and binds the listening port;
//! [`FusionService::serve`] accepts the single peer and runs the controller.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use fusion_config::{AcceleratorBackend, FusionConfig};
use fusion_engine::{FusionCycleController, WindowGeometry};
use fusion_hal::{AcceleratorChannel, CoherentCache, DmaEngine, SimulatedFusionEngine};
use fusion_transports::{TcpFrameServer, TransportConfig};
use tracing::info;

/// Accelerator channel over the simulated fusion core
pub type SimulatedChannel = AcceleratorChannel<SimulatedFusionEngine>;

/// Everything brought up before the first peer connects
pub struct FusionService {
    geometry: WindowGeometry,
    channel: SimulatedChannel,
    server: TcpFrameServer,
}

impl FusionService {
    /// Configure the accelerator and bind the listening port
    ///
    /// The config is expected to be validated already.
    pub fn bring_up(config: &FusionConfig) -> Result<Self> {
        let geometry = WindowGeometry::try_from(&config.pipeline)
            .context("Invalid pipeline geometry")?;

        let channel = bring_up_accelerator(config, &geometry)?;

        let transport = TransportConfig::new(config.network.bind_address())
            .with_nodelay(config.network.nodelay)
            .with_max_frame_bytes(geometry.frame_bytes());
        let server = TcpFrameServer::bind(transport).context("Failed to bind frame server")?;

        Ok(Self {
            geometry,
            channel,
            server,
        })
    }

    pub fn geometry(&self) -> &WindowGeometry {
        &self.geometry
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.server.local_addr()?)
    }

    /// Accept one peer and stream until the first fault
    ///
    /// Only returns on failure; the pipeline error stays downcastable.
    pub fn serve(self) -> Result<Infallible> {
        info!("[FUSION-SERVER] waiting for peer...");
        let connection = self.server.accept_one().context("Failed to accept peer")?;
        info!("[FUSION-SERVER] peer {} connected, starting cycles", connection.peer());

        let mut controller = FusionCycleController::new(self.geometry, self.channel, connection);
        let err = match controller.run() {
            Ok(never) => match never {},
            Err(err) => err,
        };

        let stats = controller.accelerator().stats();
        info!(
            "[FUSION-SERVER] stopped after {} cycles ({} frames to device, {} fused, {} errors)",
            controller.cycles_completed(),
            stats.frames_sent,
            stats.frames_received,
            stats.errors
        );
        Err(err.into())
    }
}

fn bring_up_accelerator(config: &FusionConfig, geometry: &WindowGeometry) -> Result<SimulatedChannel> {
    let accel = &config.accelerator;
    let engine = match accel.backend {
        AcceleratorBackend::Simulated => SimulatedFusionEngine::configure(
            accel.device_id,
            geometry.frame_bytes(),
            geometry.window(),
        )
        .with_context(|| format!("Failed to configure accelerator {}", accel.device_id))?
        .with_latency(Duration::from_micros(accel.transfer_latency_us)),
    };

    info!(
        "[FUSION-SERVER] accelerator {} ({}) configured",
        engine.device_id(),
        engine.name()
    );

    AcceleratorChannel::bring_up(engine, CoherentCache)
        .context("Failed to bind accelerator interrupts")
}
