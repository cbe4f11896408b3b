// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Frame storage owned by the controller
//!
//! Buffers are allocated once and overwritten in place for the life of the
//! pipeline. Neither type synchronizes; the controller is the only user.

use crate::geometry::WindowGeometry;

/// Fixed ring of frame buffers addressed by logical index modulo capacity
#[derive(Debug)]
pub struct FrameRing {
    slots: Vec<Box<[u8]>>,
    frame_bytes: usize,
}

impl FrameRing {
    /// Allocate `capacity` zeroed frames
    pub fn new(geometry: &WindowGeometry) -> Self {
        let slots = (0..geometry.capacity())
            .map(|_| vec![0u8; geometry.frame_bytes()].into_boxed_slice())
            .collect();

        Self {
            slots,
            frame_bytes: geometry.frame_bytes(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn frame_bytes(&self) -> usize {
        self.frame_bytes
    }

    /// Physical slot holding logical frame `index`
    pub fn slot_index(&self, index: usize) -> usize {
        index % self.slots.len()
    }

    pub fn slot(&self, index: usize) -> &[u8] {
        &self.slots[self.slot_index(index)]
    }

    pub fn slot_mut(&mut self, index: usize) -> &mut [u8] {
        let slot = self.slot_index(index);
        &mut self.slots[slot]
    }

    /// Old and new members of a pair (may be the same slot)
    pub fn pair(&self, old_index: usize, new_index: usize) -> (&[u8], &[u8]) {
        (self.slot(old_index), self.slot(new_index))
    }
}

/// Holds the most recent fused result until it has been emitted
#[derive(Debug)]
pub struct FusionAccumulator {
    frame: Box<[u8]>,
}

impl FusionAccumulator {
    pub fn new(frame_bytes: usize) -> Self {
        Self {
            frame: vec![0u8; frame_bytes].into_boxed_slice(),
        }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.frame
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.frame
    }

    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }
}
