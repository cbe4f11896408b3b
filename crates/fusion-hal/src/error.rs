// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for HAL operations

use thiserror::Error;

use crate::hal::TransferDirection;

/// Result type for HAL operations
pub type HalResult<T> = Result<T, HalError>;

/// Why a single transfer failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferFault {
    /// The device raised its error interrupt
    #[error("device reported a transfer error")]
    DeviceError,

    /// The engine refused to queue the transfer
    #[error("engine rejected the transfer: {0}")]
    Rejected(String),

    /// Buffer length does not match what the device streams
    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Zero-length transfer requested
    #[error("empty transfer buffer")]
    EmptyBuffer,

    /// Transfer issued before interrupts were connected
    #[error("completion interrupts are not connected")]
    NotConnected,
}

/// A failed accelerator transfer (fatal for the pipeline)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{direction} transfer of {length} bytes failed: {fault}")]
pub struct TransferError {
    pub direction: TransferDirection,
    pub length: usize,
    pub fault: TransferFault,
}

impl TransferError {
    pub fn new(direction: TransferDirection, length: usize, fault: TransferFault) -> Self {
        Self {
            direction,
            length,
            fault,
        }
    }
}

/// HAL errors (bring-up and transfers)
#[derive(Debug, Error)]
pub enum HalError {
    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error("no DMA engine found for device {0}")]
    DeviceNotFound(u32),

    #[error("completion interrupts already connected for device {0}")]
    InterruptsAlreadyConnected(u32),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("interrupt controller setup failed: {0}")]
    InterruptSetup(String),
}
