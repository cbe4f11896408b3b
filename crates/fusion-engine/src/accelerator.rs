// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Accelerator capability consumed by the controller

use fusion_hal::{AcceleratorChannel, CacheMaintenance, DmaEngine, TransferError};

/// Blocking frame hand-off to and from the fusion accelerator
///
/// Both calls return only once the device has signalled completion, so at
/// most one transfer is outstanding at any time.
pub trait FusionAccelerator {
    /// Hand one frame to the accelerator
    fn send(&mut self, frame: &[u8]) -> Result<(), TransferError>;

    /// Collect one fused frame from the accelerator
    fn receive(&mut self, frame: &mut [u8]) -> Result<(), TransferError>;
}

impl<E: DmaEngine, C: CacheMaintenance> FusionAccelerator for AcceleratorChannel<E, C> {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransferError> {
        AcceleratorChannel::send(self, frame)
    }

    fn receive(&mut self, frame: &mut [u8]) -> Result<(), TransferError> {
        AcceleratorChannel::receive(self, frame)
    }
}

impl<T: FusionAccelerator + ?Sized> FusionAccelerator for &mut T {
    fn send(&mut self, frame: &[u8]) -> Result<(), TransferError> {
        (**self).send(frame)
    }

    fn receive(&mut self, frame: &mut [u8]) -> Result<(), TransferError> {
        (**self).receive(frame)
    }
}
