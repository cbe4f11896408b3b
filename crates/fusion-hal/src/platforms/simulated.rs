// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulated fusion accelerator
//!
//! Stands in for the fabric fusion core on hosted targets. Data movement
//! happens when a transfer is submitted; completion is reported from a
//! dedicated interrupt thread, so the issuer genuinely blocks on its
//! completion signal the way it does on hardware.
//!
//! **Fusion model**: the core consumes `window` old/new pairs per fused frame.
//! This model publishes the per-pixel mean of the `new` members of each
//! completed window; the `old` members are consumed but do not contribute.
//! A fused frame becomes readable on the receive that follows its window, and
//! the first receive returns an all-zero frame.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam::channel::{unbounded, Sender};
use tracing::{debug, info};

use crate::error::{HalError, HalResult, TransferFault};
use crate::hal::{CompletionSignals, DmaEngine, IrqStatus, TransferDirection};

type IrqEvent = (TransferDirection, IrqStatus);

/// Shared handle for injecting device faults into a running engine
#[derive(Debug, Clone, Default)]
pub struct FaultInjector {
    fail_to_device: Arc<AtomicBool>,
    fail_from_device: Arc<AtomicBool>,
}

impl FaultInjector {
    /// Make the next transfer in `direction` raise the error interrupt
    pub fn fail_next(&self, direction: TransferDirection) {
        self.flag(direction).store(true, Ordering::SeqCst);
    }

    fn take(&self, direction: TransferDirection) -> bool {
        self.flag(direction).swap(false, Ordering::SeqCst)
    }

    fn flag(&self, direction: TransferDirection) -> &AtomicBool {
        match direction {
            TransferDirection::ToDevice => &self.fail_to_device,
            TransferDirection::FromDevice => &self.fail_from_device,
        }
    }
}

/// Per-window state of the fusion model
struct FusionModel {
    window: usize,
    sum: Vec<u32>,
    pairs_seen: usize,
    awaiting_new: bool,
    ready: Vec<u8>,
}

impl FusionModel {
    fn new(frame_bytes: usize, window: usize) -> Self {
        Self {
            window,
            sum: vec![0; frame_bytes],
            pairs_seen: 0,
            awaiting_new: false,
            ready: vec![0; frame_bytes],
        }
    }

    fn consume(&mut self, frame: &[u8]) {
        if !self.awaiting_new {
            self.awaiting_new = true;
            return;
        }

        self.awaiting_new = false;
        for (acc, &px) in self.sum.iter_mut().zip(frame) {
            *acc += u32::from(px);
        }
        self.pairs_seen += 1;

        if self.pairs_seen == self.window {
            let window = self.window as u32;
            for (out, acc) in self.ready.iter_mut().zip(self.sum.iter_mut()) {
                *out = (*acc / window) as u8;
                *acc = 0;
            }
            self.pairs_seen = 0;
        }
    }
}

/// Software DMA engine backed by the fusion model
pub struct SimulatedFusionEngine {
    device_id: u32,
    frame_bytes: usize,
    latency: Duration,
    model: FusionModel,
    faults: FaultInjector,
    irq_tx: Option<Sender<IrqEvent>>,
    irq_thread: Option<thread::JoinHandle<()>>,
}

impl SimulatedFusionEngine {
    /// Configure the engine for `device_id`
    ///
    /// # Arguments
    /// * `frame_bytes` - Size of every transfer the core accepts
    /// * `window` - Pairs per fused frame
    pub fn configure(device_id: u32, frame_bytes: usize, window: usize) -> HalResult<Self> {
        if frame_bytes == 0 {
            return Err(HalError::InvalidConfig(
                "frame_bytes must be greater than 0".to_string(),
            ));
        }
        if window == 0 {
            return Err(HalError::InvalidConfig(
                "window must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            device_id,
            frame_bytes,
            latency: Duration::ZERO,
            model: FusionModel::new(frame_bytes, window),
            faults: FaultInjector::default(),
            irq_tx: None,
            irq_thread: None,
        })
    }

    /// Delay every completion interrupt by `latency`
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Handle for injecting faults after the engine has been moved into a channel
    pub fn fault_injector(&self) -> FaultInjector {
        self.faults.clone()
    }

    pub fn frame_bytes(&self) -> usize {
        self.frame_bytes
    }

    fn check_length(&self, actual: usize) -> Result<(), TransferFault> {
        if actual != self.frame_bytes {
            return Err(TransferFault::LengthMismatch {
                expected: self.frame_bytes,
                actual,
            });
        }
        Ok(())
    }

    fn raise(&self, direction: TransferDirection, status: IrqStatus) -> Result<(), TransferFault> {
        let tx = self.irq_tx.as_ref().ok_or(TransferFault::NotConnected)?;
        tx.send((direction, status))
            .map_err(|_| TransferFault::Rejected("interrupt line closed".to_string()))
    }
}

impl DmaEngine for SimulatedFusionEngine {
    fn name(&self) -> &'static str {
        "simulated-fusion-core"
    }

    fn device_id(&self) -> u32 {
        self.device_id
    }

    fn connect_interrupts(&mut self, signals: Arc<CompletionSignals>) -> HalResult<()> {
        if self.irq_tx.is_some() {
            return Err(HalError::InterruptsAlreadyConnected(self.device_id));
        }

        let (tx, rx) = unbounded::<IrqEvent>();
        let latency = self.latency;
        let handle = thread::Builder::new()
            .name(format!("fusion-sim-irq-{}", self.device_id))
            .spawn(move || {
                for (direction, status) in rx {
                    if !latency.is_zero() {
                        thread::sleep(latency);
                    }
                    signals.dispatch(direction, status);
                }
            })
            .map_err(|e| HalError::InterruptSetup(e.to_string()))?;

        self.irq_tx = Some(tx);
        self.irq_thread = Some(handle);

        info!(
            "[FUSION-HAL] simulated core {} ready ({} bytes/frame, {} pairs/window)",
            self.device_id, self.frame_bytes, self.model.window
        );
        Ok(())
    }

    fn submit_to_device(&mut self, data: &[u8]) -> Result<(), TransferFault> {
        self.check_length(data.len())?;
        if self.irq_tx.is_none() {
            return Err(TransferFault::NotConnected);
        }

        let direction = TransferDirection::ToDevice;
        if self.faults.take(direction) {
            debug!("[FUSION-HAL] injecting {} fault", direction);
            return self.raise(direction, IrqStatus::ERROR);
        }

        self.model.consume(data);
        self.raise(direction, IrqStatus::IOC)
    }

    fn submit_from_device(&mut self, data: &mut [u8]) -> Result<(), TransferFault> {
        self.check_length(data.len())?;
        if self.irq_tx.is_none() {
            return Err(TransferFault::NotConnected);
        }

        let direction = TransferDirection::FromDevice;
        if self.faults.take(direction) {
            debug!("[FUSION-HAL] injecting {} fault", direction);
            return self.raise(direction, IrqStatus::ERROR);
        }

        data.copy_from_slice(&self.model.ready);
        self.raise(direction, IrqStatus::IOC)
    }
}

impl Drop for SimulatedFusionEngine {
    fn drop(&mut self) {
        // Closing the sender ends the interrupt thread
        self.irq_tx = None;
        if let Some(handle) = self.irq_thread.take() {
            let _ = handle.join();
        }
    }
}
