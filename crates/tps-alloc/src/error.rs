use thiserror::Error;

use tps_core::{Capability, SegmentId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// No agent in the roster holds the capability this segment needs.
    #[error("{segment} requires {capability}, which no agent holds")]
    CapabilityCoverage {
        segment:    SegmentId,
        capability: Capability,
    },

    #[error("{0} is not part of the toolpath")]
    UnknownSegment(SegmentId),
}

pub type AllocResult<T> = Result<T, AllocError>;
