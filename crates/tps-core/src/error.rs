//! Core error type.
//!
//! Higher crates wrap `CoreError` as one variant of their own enums via
//! `#[from]`.

use thiserror::Error;

/// Errors produced while constructing core primitives.
#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    #[error("a motion needs at least one waypoint")]
    EmptyPath,

    #[error("speed must be positive and finite, got {0}")]
    InvalidSpeed(f64),

    #[error("motion ends at {end} before it starts at {start}")]
    InvertedInterval { start: f64, end: f64 },

    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
}

/// Shorthand result type for `tps-core`.
pub type CoreResult<T> = Result<T, CoreError>;
