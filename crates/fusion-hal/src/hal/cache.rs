// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{fence, Ordering};

/// Data-cache maintenance for buffers shared with a DMA master
///
/// - `flush_range` must complete before an outbound transfer reads the range,
///   so the device observes what the CPU wrote.
/// - `invalidate_range` must complete before the CPU reads a range the device
///   has just written, so no stale cache line is observed.
pub trait CacheMaintenance: Send {
    /// Write back any dirty lines covering `buffer`
    fn flush_range(&self, buffer: &[u8]);

    /// Discard any lines covering `buffer`
    fn invalidate_range(&self, buffer: &[u8]);
}

/// Cache maintenance for coherent interconnects and hosted targets
///
/// Hardware keeps the caches coherent; only compiler/CPU ordering is enforced.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoherentCache;

impl CacheMaintenance for CoherentCache {
    fn flush_range(&self, _buffer: &[u8]) {
        fence(Ordering::Release);
    }

    fn invalidate_range(&self, _buffer: &[u8]) {
        fence(Ordering::Acquire);
    }
}
