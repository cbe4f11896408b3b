// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Peer-side view of the exchange cadence
//!
//! The link carries no headers, so the peer has to mirror the controller's
//! cycle counter to know how many frames to send before it reads a result.

use crate::geometry::WindowGeometry;

/// Tracks how many frames the peer owes the controller each cycle
#[derive(Debug, Clone)]
pub struct FrameCadence {
    geometry: WindowGeometry,
    cycle: usize,
}

impl FrameCadence {
    pub fn new(geometry: WindowGeometry) -> Self {
        Self { geometry, cycle: 0 }
    }

    /// Cycle the controller is currently in
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Frames to send before reading this cycle's fused result
    pub fn frames_to_send(&self) -> usize {
        if self.geometry.refills_in(self.cycle) {
            self.geometry.window()
        } else {
            0
        }
    }

    /// Fused frames returned per cycle
    pub fn results_per_cycle(&self) -> usize {
        1
    }

    /// Move to the next cycle (wraps with the controller)
    pub fn advance(&mut self) {
        self.cycle = self.geometry.next_cycle(self.cycle);
    }
}
