// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Fusion cycle controller
//!
//! One cycle is `AWAIT_RESULT -> (SEND_OLD, SEND_NEW, REFILL) x window ->
//! EMIT_RESULT`, executed strictly in that order. The first fault ends the
//! cycle where it happened and is returned to the caller; nothing is retried
//! and the cycle counter is left untouched.

use std::convert::Infallible;

use fusion_transports::FrameStream;
use tracing::{debug, error, info};

use crate::accelerator::FusionAccelerator;
use crate::error::{FaultSite, PipelineError, PipelineStage};
use crate::geometry::WindowGeometry;
use crate::ring::{FrameRing, FusionAccumulator};

/// Owns the frame storage and the two collaborator handles
pub struct FusionCycleController<A, T> {
    accelerator: A,
    transport: T,
    geometry: WindowGeometry,
    ring: FrameRing,
    accumulator: FusionAccumulator,
    cycle: usize,
    cycles_completed: u64,
}

impl<A: FusionAccelerator, T: FrameStream> FusionCycleController<A, T> {
    /// Allocate the ring and accumulator; starts at cycle 0 with zeroed frames
    pub fn new(geometry: WindowGeometry, accelerator: A, transport: T) -> Self {
        info!(
            "[FUSION-ENGINE] controller ready: {} slots x {} bytes, window {}",
            geometry.capacity(),
            geometry.frame_bytes(),
            geometry.window()
        );

        Self {
            accelerator,
            transport,
            ring: FrameRing::new(&geometry),
            accumulator: FusionAccumulator::new(geometry.frame_bytes()),
            geometry,
            cycle: 0,
            cycles_completed: 0,
        }
    }

    /// Execute one full cycle
    pub fn run_cycle(&mut self) -> Result<(), PipelineError> {
        let cycle = self.cycle;

        self.accelerator
            .receive(self.accumulator.as_mut_slice())
            .map_err(|source| PipelineError::Transfer {
                site: FaultSite::new(PipelineStage::AwaitResult, cycle, None),
                source,
            })?;

        let mut refills = 0;
        for step in self.geometry.steps(cycle) {
            let at = |stage| FaultSite::new(stage, cycle, Some(step.step));
            let (old_frame, new_frame) = self.ring.pair(step.old_index, step.new_index);

            self.accelerator
                .send(old_frame)
                .map_err(|source| PipelineError::Transfer {
                    site: at(PipelineStage::SendOld),
                    source,
                })?;
            self.accelerator
                .send(new_frame)
                .map_err(|source| PipelineError::Transfer {
                    site: at(PipelineStage::SendNew),
                    source,
                })?;

            // The old frame has had its last read; its slot is free
            if let Some(slot) = step.refill_slot {
                self.transport
                    .receive_exact(self.ring.slot_mut(slot))
                    .map_err(|source| PipelineError::Transport {
                        site: at(PipelineStage::Refill),
                        source,
                    })?;
                refills += 1;
            }
        }

        self.transport
            .send_exact(self.accumulator.as_slice())
            .map_err(|source| PipelineError::Transport {
                site: FaultSite::new(PipelineStage::EmitResult, cycle, None),
                source,
            })?;

        self.cycle = self.geometry.next_cycle(cycle);
        self.cycles_completed += 1;
        debug!(
            "[FUSION-ENGINE] cycle {} complete ({} refills, {} total)",
            cycle, refills, self.cycles_completed
        );
        Ok(())
    }

    /// Run cycles until the first fault
    pub fn run(&mut self) -> Result<Infallible, PipelineError> {
        loop {
            if let Err(err) = self.run_cycle() {
                error!(
                    "[FUSION-ENGINE] pipeline stopped after {} cycles: {}",
                    self.cycles_completed, err
                );
                return Err(err);
            }
        }
    }

    /// Cycle that the next `run_cycle` will execute
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn geometry(&self) -> &WindowGeometry {
        &self.geometry
    }

    pub fn ring(&self) -> &FrameRing {
        &self.ring
    }

    pub fn accumulator(&self) -> &FusionAccumulator {
        &self.accumulator
    }

    pub fn accelerator(&self) -> &A {
        &self.accelerator
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Give back the collaborator handles
    pub fn into_parts(self) -> (A, T) {
        (self.accelerator, self.transport)
    }
}
