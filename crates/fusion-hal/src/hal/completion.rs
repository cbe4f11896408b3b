// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Completion signalling between interrupt context and the transfer issuer
//!
//! Each direction owns one single-slot signal. The issuer arms it, submits a
//! transfer and blocks in [`CompletionSignal::wait`]; the interrupt routine
//! posts exactly one outcome. Only one transfer per direction is ever
//! outstanding, so a slot never holds more than one outcome.

use parking_lot::{Condvar, Mutex};
use tracing::{trace, warn};

use crate::hal::dma::{IrqStatus, TransferDirection};

/// Result of one transfer as reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferOutcome {
    Completed,
    Failed,
}

/// Single-slot, blocking completion signal
#[derive(Debug, Default)]
pub struct CompletionSignal {
    slot: Mutex<Option<TransferOutcome>>,
    ready: Condvar,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the slot before issuing a transfer
    pub fn arm(&self) {
        *self.slot.lock() = None;
    }

    /// Publish an outcome and wake the waiter (interrupt context)
    pub fn post(&self, outcome: TransferOutcome) {
        let mut slot = self.slot.lock();
        *slot = Some(outcome);
        self.ready.notify_one();
    }

    /// Block until an outcome is posted, then consume it
    pub fn wait(&self) -> TransferOutcome {
        let mut slot = self.slot.lock();
        loop {
            if let Some(outcome) = slot.take() {
                return outcome;
            }
            self.ready.wait(&mut slot);
        }
    }

    /// Consume a posted outcome without blocking
    pub fn try_take(&self) -> Option<TransferOutcome> {
        self.slot.lock().take()
    }

    pub fn is_posted(&self) -> bool {
        self.slot.lock().is_some()
    }
}

/// The pair of completion signals served by one DMA engine
#[derive(Debug, Default)]
pub struct CompletionSignals {
    pub to_device: CompletionSignal,
    pub from_device: CompletionSignal,
}

impl CompletionSignals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_direction(&self, direction: TransferDirection) -> &CompletionSignal {
        match direction {
            TransferDirection::ToDevice => &self.to_device,
            TransferDirection::FromDevice => &self.from_device,
        }
    }

    /// Interrupt service routine body for one direction
    ///
    /// The error bit takes precedence over completion. A status with neither
    /// bit set is spurious and is dropped.
    ///
    /// # Returns
    /// True if an outcome was posted
    pub fn dispatch(&self, direction: TransferDirection, status: IrqStatus) -> bool {
        let outcome = if status.contains(IrqStatus::ERROR) {
            warn!("[FUSION-HAL] {} error interrupt (status {:#06x})", direction, status.0);
            TransferOutcome::Failed
        } else if status.contains(IrqStatus::IOC) {
            TransferOutcome::Completed
        } else {
            trace!("[FUSION-HAL] spurious {} interrupt (status {:#06x})", direction, status.0);
            return false;
        };

        self.for_direction(direction).post(outcome);
        true
    }
}
