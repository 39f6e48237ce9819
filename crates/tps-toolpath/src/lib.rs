//! `tps-toolpath` — the path model consumed by the scheduler.
//!
//! # Crate layout
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`segment`]    | `Segment` — ordered points + one capability tag        |
//! | [`toolpath`]   | `Toolpath` — ordered segments, transforms              |
//! | [`precedence`] | `Precedence` — cross-segment start-after constraints   |
//! | [`error`]      | `ToolpathError`, `ToolpathResult<T>`                   |
//!
//! Parsing from G-code or other interchange formats is left to the
//! application; this crate only holds validated, immutable data.

pub mod error;
pub mod precedence;
pub mod segment;
pub mod toolpath;

#[cfg(test)]
mod tests;

pub use error::{ToolpathError, ToolpathResult};
pub use precedence::Precedence;
pub use segment::Segment;
pub use toolpath::Toolpath;
