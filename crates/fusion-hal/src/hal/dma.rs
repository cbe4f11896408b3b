// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::sync::Arc;

use crate::error::{HalResult, TransferFault};
use crate::hal::completion::CompletionSignals;

/// Direction of a block transfer, named from the device's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferDirection {
    /// Memory to device (MM2S): a frame handed to the accelerator
    ToDevice,
    /// Device to memory (S2MM): a fused frame returned by the accelerator
    FromDevice,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToDevice => write!(f, "to-device"),
            Self::FromDevice => write!(f, "from-device"),
        }
    }
}

/// Interrupt status word latched by the DMA engine for one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IrqStatus(pub u32);

impl IrqStatus {
    /// Interrupt on complete
    pub const IOC: IrqStatus = IrqStatus(0x1000);
    /// Delay timer interrupt (unused by simple transfers)
    pub const DELAY: IrqStatus = IrqStatus(0x2000);
    /// Error interrupt
    pub const ERROR: IrqStatus = IrqStatus(0x4000);
    /// Every interrupt source
    pub const ALL: IrqStatus = IrqStatus(0x7000);

    /// Status with no interrupt source set
    pub const fn empty() -> Self {
        IrqStatus(0)
    }

    /// True when every bit of `other` is set in `self`
    pub const fn contains(self, other: IrqStatus) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    pub const fn union(self, other: IrqStatus) -> Self {
        IrqStatus(self.0 | other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 & Self::ALL.0 == 0
    }
}

/// Block-transfer engine in front of the fusion accelerator
///
/// Submission only queues a transfer. Completion is reported asynchronously
/// by the engine's interrupts, which must be routed into the
/// [`CompletionSignals`] handed over by [`DmaEngine::connect_interrupts`].
///
/// # Buffer validity
/// The buffer passed to a `submit_*` call must remain valid and untouched
/// until the matching completion has been posted. [`crate::AcceleratorChannel`]
/// upholds this by holding the borrow until it has waited for completion.
pub trait DmaEngine: Send {
    /// Get engine name/identifier
    fn name(&self) -> &'static str;

    /// Device identifier this engine was configured with
    fn device_id(&self) -> u32;

    /// Bind both completion interrupts to `signals`
    ///
    /// Called once during platform bring-up, before any transfer is issued.
    fn connect_interrupts(&mut self, signals: Arc<CompletionSignals>) -> HalResult<()>;

    /// Queue a memory-to-device transfer of `data`
    fn submit_to_device(&mut self, data: &[u8]) -> Result<(), TransferFault>;

    /// Queue a device-to-memory transfer into `data`
    fn submit_from_device(&mut self, data: &mut [u8]) -> Result<(), TransferFault>;
}
