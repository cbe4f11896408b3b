// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for frame transports

use std::fmt;

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;

/// Transport error type
///
/// Every variant is fatal to the pipeline; nothing here is retried.
#[derive(Debug)]
pub enum TransportError {
    /// Failed to bind the listening socket
    BindFailed(String),

    /// Failed to accept the peer connection
    AcceptFailed(String),

    /// Failed to connect to the server
    ConnectFailed(String),

    /// Peer closed the connection before a whole frame arrived
    ConnectionClosed { received: usize, expected: usize },

    /// The connection stopped accepting bytes before a whole frame was written
    SendFailed { sent: usize, expected: usize },

    /// Frame exceeds the configured maximum
    FrameTooLarge { size: usize, max_size: usize },

    /// Invalid configuration
    InvalidConfig(String),

    /// I/O error
    Io(std::io::Error),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BindFailed(msg) => write!(f, "Bind failed: {}", msg),
            Self::AcceptFailed(msg) => write!(f, "Accept failed: {}", msg),
            Self::ConnectFailed(msg) => write!(f, "Connect failed: {}", msg),
            Self::ConnectionClosed { received, expected } => write!(
                f,
                "Connection closed after {} of {} bytes",
                received, expected
            ),
            Self::SendFailed { sent, expected } => {
                write!(f, "Send failed after {} of {} bytes", sent, expected)
            }
            Self::FrameTooLarge { size, max_size } => {
                write!(f, "Frame too large: {} bytes (max: {})", size, max_size)
            }
            Self::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Self::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_reports_progress() {
        let err = TransportError::ConnectionClosed {
            received: 100,
            expected: 262_144,
        };
        assert_eq!(err.to_string(), "Connection closed after 100 of 262144 bytes");
    }

    #[test]
    fn test_io_source_is_kept() {
        let err: TransportError =
            std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
