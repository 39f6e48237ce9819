use thiserror::Error;

use tps_core::SegmentId;

#[derive(Debug, Error, PartialEq)]
pub enum ToolpathError {
    #[error("segment has no points")]
    EmptySegment,

    #[error("segment contains a non-finite coordinate")]
    NonFinitePoint,

    #[error("{0} is outside the toolpath")]
    UnknownSegment(SegmentId),

    #[error("precedence {before} → {after} must point forward in path order")]
    PrecedenceOrder { before: SegmentId, after: SegmentId },

    #[error("layer tolerance must be non-negative and finite, got {0}")]
    InvalidTolerance(f64),
}

pub type ToolpathResult<T> = Result<T, ToolpathError>;
