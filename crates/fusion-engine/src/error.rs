// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pipeline error types

use std::fmt;

use fusion_hal::TransferError;
use fusion_transports::TransportError;
use thiserror::Error;

/// Invalid ring/window sizing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("frame size must be > 0")]
    ZeroFrameBytes,

    #[error("window must be > 0")]
    ZeroWindow,

    #[error("window {window} is too large to size a ring")]
    WindowTooLarge { window: usize },

    #[error("image side {image_side} gives a frame larger than the address space")]
    FrameTooLarge { image_side: usize },

    #[error("ring capacity {capacity} too small for window {window} (need at least {required})")]
    RingTooSmall {
        capacity: usize,
        window: usize,
        required: usize,
    },
}

/// Where in the cycle a fault happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Pulling the fused result from the accelerator
    AwaitResult,
    /// Sending the old member of a pair
    SendOld,
    /// Sending the new member of a pair
    SendNew,
    /// Reading a frame from the peer into an evicted slot
    Refill,
    /// Writing the fused result to the peer
    EmitResult,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AwaitResult => "await-result",
            Self::SendOld => "send-old",
            Self::SendNew => "send-new",
            Self::Refill => "refill",
            Self::EmitResult => "emit-result",
        };
        f.write_str(name)
    }
}

/// Stage, cycle and window step of a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultSite {
    pub stage: PipelineStage,
    pub cycle: usize,
    /// Window step, for faults inside the window pass
    pub step: Option<usize>,
}

impl FaultSite {
    pub fn new(stage: PipelineStage, cycle: usize, step: Option<usize>) -> Self {
        Self { stage, cycle, step }
    }
}

impl fmt::Display for FaultSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.step {
            Some(step) => write!(f, "{} (cycle {}, step {})", self.stage, self.cycle, step),
            None => write!(f, "{} (cycle {})", self.stage, self.cycle),
        }
    }
}

/// Fatal pipeline fault
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("accelerator fault at {site}: {source}")]
    Transfer {
        site: FaultSite,
        #[source]
        source: TransferError,
    },

    #[error("transport fault at {site}: {source}")]
    Transport {
        site: FaultSite,
        #[source]
        source: TransportError,
    },
}

impl PipelineError {
    pub fn site(&self) -> FaultSite {
        match self {
            Self::Transfer { site, .. } | Self::Transport { site, .. } => *site,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        self.site().stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fusion_hal::{TransferDirection, TransferFault};

    #[test]
    fn test_display_names_site() {
        let err = PipelineError::Transfer {
            site: FaultSite::new(PipelineStage::SendNew, 16, Some(3)),
            source: TransferError::new(TransferDirection::ToDevice, 64, TransferFault::DeviceError),
        };
        assert_eq!(
            err.to_string(),
            "accelerator fault at send-new (cycle 16, step 3): to-device transfer of 64 bytes failed: device reported a transfer error"
        );
        assert_eq!(err.stage(), PipelineStage::SendNew);
    }

    #[test]
    fn test_transport_site_without_step() {
        let err = PipelineError::Transport {
            site: FaultSite::new(PipelineStage::EmitResult, 2, None),
            source: TransportError::SendFailed { sent: 0, expected: 4 },
        };
        assert_eq!(err.site().step, None);
        assert!(err.to_string().starts_with("transport fault at emit-result (cycle 2)"));
    }
}
