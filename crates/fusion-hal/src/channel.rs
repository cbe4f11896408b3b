// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synchronous half-duplex transfers to and from the fusion accelerator

use std::sync::Arc;

use tracing::{error, info, trace};

use crate::error::{HalResult, TransferError, TransferFault};
use crate::hal::{
    CacheMaintenance, CoherentCache, CompletionSignals, DmaEngine, TransferDirection,
    TransferOutcome,
};

/// Transfer counters kept by an [`AcceleratorChannel`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferStats {
    pub frames_sent: u64,
    pub frames_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    pub errors: u64,
}

/// Blocking transfer channel over one DMA engine
///
/// Every call issues exactly one transfer and returns only after the device
/// has signalled its completion, so at most one transfer is ever in flight.
/// Any failure is returned immediately; nothing is retried.
pub struct AcceleratorChannel<E: DmaEngine, C: CacheMaintenance = CoherentCache> {
    engine: E,
    cache: C,
    signals: Arc<CompletionSignals>,
    stats: TransferStats,
}

impl<E: DmaEngine, C: CacheMaintenance> AcceleratorChannel<E, C> {
    /// Bind the engine's completion interrupts and return a ready channel
    ///
    /// This is the one-time platform bring-up step; it must succeed before
    /// any transfer is issued.
    pub fn bring_up(mut engine: E, cache: C) -> HalResult<Self> {
        let signals = Arc::new(CompletionSignals::new());
        engine.connect_interrupts(Arc::clone(&signals))?;

        info!(
            "[FUSION-HAL] {} (device {}) interrupts connected",
            engine.name(),
            engine.device_id()
        );

        Ok(Self {
            engine,
            cache,
            signals,
            stats: TransferStats::default(),
        })
    }

    /// Hand `buffer` to the device and block until it has been consumed
    ///
    /// The CPU-side cache covering `buffer` is flushed before the transfer is
    /// issued.
    pub fn send(&mut self, buffer: &[u8]) -> Result<(), TransferError> {
        let direction = TransferDirection::ToDevice;
        let length = buffer.len();
        if length == 0 {
            return Err(self.fail(direction, length, TransferFault::EmptyBuffer));
        }

        self.cache.flush_range(buffer);

        let signals = Arc::clone(&self.signals);
        let signal = &signals.to_device;
        signal.arm();
        if let Err(fault) = self.engine.submit_to_device(buffer) {
            return Err(self.fail(direction, length, fault));
        }

        match signal.wait() {
            TransferOutcome::Completed => {
                self.stats.frames_sent += 1;
                self.stats.bytes_sent += length as u64;
                trace!("[FUSION-HAL] sent {} bytes", length);
                Ok(())
            }
            TransferOutcome::Failed => {
                Err(self.fail(direction, length, TransferFault::DeviceError))
            }
        }
    }

    /// Fill `buffer` from the device and block until the data has landed
    ///
    /// The CPU-side cache covering `buffer` is invalidated after completion,
    /// before the caller can read it.
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<(), TransferError> {
        let direction = TransferDirection::FromDevice;
        let length = buffer.len();
        if length == 0 {
            return Err(self.fail(direction, length, TransferFault::EmptyBuffer));
        }

        let signals = Arc::clone(&self.signals);
        let signal = &signals.from_device;
        signal.arm();
        if let Err(fault) = self.engine.submit_from_device(buffer) {
            return Err(self.fail(direction, length, fault));
        }

        match signal.wait() {
            TransferOutcome::Completed => {
                self.cache.invalidate_range(buffer);
                self.stats.frames_received += 1;
                self.stats.bytes_received += length as u64;
                trace!("[FUSION-HAL] received {} bytes", length);
                Ok(())
            }
            TransferOutcome::Failed => {
                Err(self.fail(direction, length, TransferFault::DeviceError))
            }
        }
    }

    pub fn stats(&self) -> TransferStats {
        self.stats
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    fn fail(
        &mut self,
        direction: TransferDirection,
        length: usize,
        fault: TransferFault,
    ) -> TransferError {
        self.stats.errors += 1;
        let err = TransferError::new(direction, length, fault);
        error!("[FUSION-HAL] {}", err);
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HalError;
    use crate::hal::IrqStatus;
    use parking_lot::Mutex;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Event {
        Flush,
        Invalidate,
        Submit(TransferDirection),
        Irq(TransferDirection),
    }

    type Log = Arc<Mutex<Vec<Event>>>;

    struct RecordingCache {
        log: Log,
    }

    impl CacheMaintenance for RecordingCache {
        fn flush_range(&self, _buffer: &[u8]) {
            self.log.lock().push(Event::Flush);
        }

        fn invalidate_range(&self, _buffer: &[u8]) {
            self.log.lock().push(Event::Invalidate);
        }
    }

    /// Engine that completes each transfer synchronously from inside submit
    struct LoopbackEngine {
        log: Log,
        signals: Option<Arc<CompletionSignals>>,
        last_sent: Vec<u8>,
        fail_status: Option<IrqStatus>,
    }

    impl LoopbackEngine {
        fn new(log: Log) -> Self {
            Self {
                log,
                signals: None,
                last_sent: Vec::new(),
                fail_status: None,
            }
        }

        fn raise(&self, direction: TransferDirection) -> Result<(), TransferFault> {
            let signals = self.signals.as_ref().ok_or(TransferFault::NotConnected)?;
            self.log.lock().push(Event::Irq(direction));
            signals.dispatch(direction, self.fail_status.unwrap_or(IrqStatus::IOC));
            Ok(())
        }
    }

    impl DmaEngine for LoopbackEngine {
        fn name(&self) -> &'static str {
            "loopback"
        }

        fn device_id(&self) -> u32 {
            7
        }

        fn connect_interrupts(&mut self, signals: Arc<CompletionSignals>) -> HalResult<()> {
            if self.signals.is_some() {
                return Err(HalError::InterruptsAlreadyConnected(7));
            }
            self.signals = Some(signals);
            Ok(())
        }

        fn submit_to_device(&mut self, data: &[u8]) -> Result<(), TransferFault> {
            self.log.lock().push(Event::Submit(TransferDirection::ToDevice));
            self.last_sent = data.to_vec();
            self.raise(TransferDirection::ToDevice)
        }

        fn submit_from_device(&mut self, data: &mut [u8]) -> Result<(), TransferFault> {
            self.log.lock().push(Event::Submit(TransferDirection::FromDevice));
            if data.len() != self.last_sent.len() {
                return Err(TransferFault::LengthMismatch {
                    expected: self.last_sent.len(),
                    actual: data.len(),
                });
            }
            data.copy_from_slice(&self.last_sent);
            self.raise(TransferDirection::FromDevice)
        }
    }

    fn channel() -> (AcceleratorChannel<LoopbackEngine, RecordingCache>, Log) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let engine = LoopbackEngine::new(Arc::clone(&log));
        let cache = RecordingCache {
            log: Arc::clone(&log),
        };
        (AcceleratorChannel::bring_up(engine, cache).unwrap(), log)
    }

    #[test]
    fn test_flush_precedes_outbound_submit() {
        let (mut channel, log) = channel();
        channel.send(&[1, 2, 3, 4]).unwrap();

        assert_eq!(
            *log.lock(),
            vec![
                Event::Flush,
                Event::Submit(TransferDirection::ToDevice),
                Event::Irq(TransferDirection::ToDevice),
            ]
        );
    }

    #[test]
    fn test_invalidate_follows_inbound_completion() {
        let (mut channel, log) = channel();
        channel.send(&[9, 8, 7]).unwrap();
        log.lock().clear();

        let mut buffer = [0u8; 3];
        channel.receive(&mut buffer).unwrap();

        assert_eq!(buffer, [9, 8, 7]);
        assert_eq!(
            *log.lock(),
            vec![
                Event::Submit(TransferDirection::FromDevice),
                Event::Irq(TransferDirection::FromDevice),
                Event::Invalidate,
            ]
        );
    }

    #[test]
    fn test_stats_track_completed_transfers() {
        let (mut channel, _log) = channel();
        channel.send(&[0; 16]).unwrap();
        channel.send(&[0; 16]).unwrap();
        let mut buffer = [0u8; 16];
        channel.receive(&mut buffer).unwrap();

        let stats = channel.stats();
        assert_eq!(stats.frames_sent, 2);
        assert_eq!(stats.bytes_sent, 32);
        assert_eq!(stats.frames_received, 1);
        assert_eq!(stats.bytes_received, 16);
        assert_eq!(stats.errors, 0);
    }

    #[test]
    fn test_error_interrupt_is_transfer_error() {
        let (mut channel, log) = channel();
        channel.engine_mut().fail_status = Some(IrqStatus::ERROR);

        let err = channel.send(&[1]).unwrap_err();
        assert_eq!(err.direction, TransferDirection::ToDevice);
        assert_eq!(err.fault, TransferFault::DeviceError);
        assert_eq!(channel.stats().errors, 1);
        assert_eq!(channel.stats().frames_sent, 0);

        // The failed inbound transfer must not invalidate or count
        log.lock().clear();
        let mut buffer = [0u8; 1];
        let err = channel.receive(&mut buffer).unwrap_err();
        assert_eq!(err.direction, TransferDirection::FromDevice);
        assert!(!log.lock().contains(&Event::Invalidate));
    }

    #[test]
    fn test_rejected_submit_does_not_wait() {
        let (mut channel, _log) = channel();
        channel.send(&[1, 2]).unwrap();

        let mut buffer = [0u8; 5];
        let err = channel.receive(&mut buffer).unwrap_err();
        assert_eq!(
            err.fault,
            TransferFault::LengthMismatch {
                expected: 2,
                actual: 5
            }
        );
    }

    #[test]
    fn test_empty_buffer_never_reaches_engine() {
        let (mut channel, log) = channel();
        let err = channel.send(&[]).unwrap_err();
        assert_eq!(err.fault, TransferFault::EmptyBuffer);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_bring_up_fails_when_interrupts_taken() {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let mut engine = LoopbackEngine::new(Arc::clone(&log));
        engine
            .connect_interrupts(Arc::new(CompletionSignals::new()))
            .unwrap();

        let result = AcceleratorChannel::bring_up(engine, CoherentCache);
        assert!(matches!(
            result,
            Err(HalError::InterruptsAlreadyConnected(7))
        ));
    }
}
