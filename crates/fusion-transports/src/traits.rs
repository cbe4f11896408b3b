// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Transport trait definitions
//!
//! The pipeline only ever needs two blocking operations from its peer link,
//! so that is all [`FrameStream`] asks for. Any reliable byte stream can be
//! wrapped in a [`crate::FrameConnection`] to provide them.

use crate::common::TransportResult;

/// Exact-length, blocking frame exchange with one peer
pub trait FrameStream {
    /// Block until exactly `buffer.len()` bytes have been read into `buffer`
    ///
    /// A partial frame is never delivered: if the peer goes away part way
    /// through, the error is returned and `buffer` contents are unspecified.
    fn receive_exact(&mut self, buffer: &mut [u8]) -> TransportResult<()>;

    /// Block until all of `buffer` has been written
    fn send_exact(&mut self, buffer: &[u8]) -> TransportResult<()>;
}

impl<T: FrameStream + ?Sized> FrameStream for &mut T {
    fn receive_exact(&mut self, buffer: &mut [u8]) -> TransportResult<()> {
        (**self).receive_exact(buffer)
    }

    fn send_exact(&mut self, buffer: &[u8]) -> TransportResult<()> {
        (**self).send_exact(buffer)
    }
}

/// Statistics tracking
///
/// For monitoring transport throughput.
pub trait TransportStats {
    /// Get total frames sent
    fn frames_sent(&self) -> u64;

    /// Get total frames received
    fn frames_received(&self) -> u64;

    /// Get total bytes sent
    fn bytes_sent(&self) -> u64;

    /// Get total bytes received
    fn bytes_received(&self) -> u64;
}
