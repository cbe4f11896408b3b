// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/// Cache maintenance around device-visible buffers.
pub mod cache;
/// Single-slot completion signals and the interrupt dispatch routine.
pub mod completion;
/// DMA engine capability trait and transfer vocabulary.
pub mod dma;

pub use cache::{CacheMaintenance, CoherentCache};
pub use completion::{CompletionSignal, CompletionSignals, TransferOutcome};
pub use dma::{DmaEngine, IrqStatus, TransferDirection};
