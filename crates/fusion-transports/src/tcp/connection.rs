// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Exact-length framing over any reliable byte stream

use std::io::{ErrorKind, Read, Write};

use tracing::{trace, warn};

use crate::common::{TransportError, TransportResult};
use crate::traits::{FrameStream, TransportStats};

/// One established peer connection
///
/// Frames carry no header; both sides agree on the frame length up front.
#[derive(Debug)]
pub struct FrameConnection<S> {
    stream: S,
    peer: String,
    max_frame_bytes: Option<usize>,
    frames_sent: u64,
    frames_received: u64,
    bytes_sent: u64,
    bytes_received: u64,
}

impl<S: Read + Write> FrameConnection<S> {
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        Self {
            stream,
            peer: peer.into(),
            max_frame_bytes: None,
            frames_sent: 0,
            frames_received: 0,
            bytes_sent: 0,
            bytes_received: 0,
        }
    }

    /// Reject frames larger than `size` before touching the stream
    pub fn with_max_frame_bytes(mut self, size: Option<usize>) -> Self {
        self.max_frame_bytes = size;
        self
    }

    /// Peer address (or label) this connection talks to
    pub fn peer(&self) -> &str {
        &self.peer
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }

    /// Read exactly `buffer.len()` bytes
    ///
    /// `Interrupted` reads are retried. A zero-byte read means the peer has
    /// gone away and is reported as [`TransportError::ConnectionClosed`] even
    /// when part of the frame already arrived.
    pub fn receive_exact(&mut self, buffer: &mut [u8]) -> TransportResult<()> {
        let expected = buffer.len();
        self.check_size(expected)?;

        let mut received = 0;
        while received < expected {
            match self.stream.read(&mut buffer[received..]) {
                Ok(0) => {
                    warn!(
                        "[TCP] {} closed after {} of {} bytes",
                        self.peer, received, expected
                    );
                    return Err(TransportError::ConnectionClosed { received, expected });
                }
                Ok(n) => received += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(TransportError::Io(e)),
            }
        }

        self.frames_received += 1;
        self.bytes_received += expected as u64;
        trace!("[TCP] received {} bytes from {}", expected, self.peer);
        Ok(())
    }

    /// Write all of `buffer` and flush
    ///
    /// `Interrupted` writes are retried; a zero-byte write is
    /// [`TransportError::SendFailed`].
    pub fn send_exact(&mut self, buffer: &[u8]) -> TransportResult<()> {
        let expected = buffer.len();
        self.check_size(expected)?;

        let mut sent = 0;
        while sent < expected {
            match self.stream.write(&buffer[sent..]) {
                Ok(0) => return Err(TransportError::SendFailed { sent, expected }),
                Ok(n) => sent += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(TransportError::Io(e)),
            }
        }
        self.stream.flush()?;

        self.frames_sent += 1;
        self.bytes_sent += expected as u64;
        trace!("[TCP] sent {} bytes to {}", expected, self.peer);
        Ok(())
    }

    fn check_size(&self, size: usize) -> TransportResult<()> {
        match self.max_frame_bytes {
            Some(max_size) if size > max_size => {
                Err(TransportError::FrameTooLarge { size, max_size })
            }
            _ => Ok(()),
        }
    }
}

impl<S: Read + Write> FrameStream for FrameConnection<S> {
    fn receive_exact(&mut self, buffer: &mut [u8]) -> TransportResult<()> {
        FrameConnection::receive_exact(self, buffer)
    }

    fn send_exact(&mut self, buffer: &[u8]) -> TransportResult<()> {
        FrameConnection::send_exact(self, buffer)
    }
}

impl<S> TransportStats for FrameConnection<S> {
    fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    fn frames_received(&self) -> u64 {
        self.frames_received
    }

    fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    fn bytes_received(&self) -> u64 {
        self.bytes_received
    }
}
