// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Sliding-window indexing
//!
//! For window step `i` of cycle `c`:
//! - `new_index = c + i`
//! - `old_index = max(new_index - window, 0)` (clamps to frame 0 during warm-up)
//! - once `c >= window`, the slot of `new_index - window` is refilled from the
//!   peer right after it has been sent as the old member of the pair
//!
//! Indices are logical; the ring maps them onto slots modulo capacity.

use fusion_config::PipelineConfig;

use crate::error::GeometryError;

/// Ring and window sizing, fixed for the life of a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    frame_bytes: usize,
    capacity: usize,
    window: usize,
}

/// One old/new pair of a window pass and its optional refill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStep {
    pub cycle: usize,
    pub step: usize,
    pub old_index: usize,
    pub new_index: usize,
    /// Ring slot to overwrite from the peer after the pair has been sent
    pub refill_slot: Option<usize>,
}

impl WindowGeometry {
    /// Validate and build a geometry
    ///
    /// Deployments keep the reference ratio of `2 * window - 1` slots (31 for a
    /// window of 16). At that size the slot refilled at step 0 of a cycle is
    /// read back, holding the frame just received, as the new member of the
    /// last step of the same cycle.
    pub fn new(frame_bytes: usize, capacity: usize, window: usize) -> Result<Self, GeometryError> {
        if frame_bytes == 0 {
            return Err(GeometryError::ZeroFrameBytes);
        }
        if window == 0 {
            return Err(GeometryError::ZeroWindow);
        }
        let required = Self::min_capacity(window).ok_or(GeometryError::WindowTooLarge { window })?;
        if capacity < required {
            return Err(GeometryError::RingTooSmall {
                capacity,
                window,
                required,
            });
        }

        Ok(Self {
            frame_bytes,
            capacity,
            window,
        })
    }

    /// Smallest ring accepted for `window`; `None` when it does not fit in `usize`
    pub fn min_capacity(window: usize) -> Option<usize> {
        window.checked_mul(2).map(|slots| slots.saturating_sub(1))
    }

    pub fn frame_bytes(&self) -> usize {
        self.frame_bytes
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// True once the ring is primed and every step refills a slot
    pub fn refills_in(&self, cycle: usize) -> bool {
        cycle >= self.window
    }

    /// Indices for step `i` of `cycle`
    pub fn step(&self, cycle: usize, i: usize) -> WindowStep {
        let new_index = cycle + i;
        let old_index = new_index.saturating_sub(self.window);
        let refill_slot = if self.refills_in(cycle) {
            Some((new_index - self.window) % self.capacity)
        } else {
            None
        };

        WindowStep {
            cycle,
            step: i,
            old_index,
            new_index,
            refill_slot,
        }
    }

    /// All `window` steps of `cycle`, in issue order
    pub fn steps(&self, cycle: usize) -> impl Iterator<Item = WindowStep> {
        let geometry = *self;
        (0..self.window).map(move |i| geometry.step(cycle, i))
    }

    /// Cycle counter after `cycle` completes (wraps at capacity)
    pub fn next_cycle(&self, cycle: usize) -> usize {
        (cycle + 1) % self.capacity
    }
}

impl TryFrom<&PipelineConfig> for WindowGeometry {
    type Error = GeometryError;

    fn try_from(config: &PipelineConfig) -> Result<Self, Self::Error> {
        let frame_bytes = config.frame_bytes().ok_or(GeometryError::FrameTooLarge {
            image_side: config.image_side,
        })?;
        Self::new(frame_bytes, config.ring_capacity, config.window)
    }
}
