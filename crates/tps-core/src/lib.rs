//! `tps-core` — foundational types for the `rust_tps` toolpath scheduler.
//!
//! This crate is a dependency of every other `tps-*` crate.  It has no
//! `tps-*` dependencies and a single required external one (`thiserror`,
//! plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                   |
//! |------------|------------------------------------------------------------|
//! | [`ids`]    | `AgentId`, `SegmentId`, `Capability`                       |
//! | [`geo`]    | `Point3`, polyline length                                  |
//! | [`time`]   | `SimTime` (totally ordered seconds)                        |
//! | [`motion`] | `Motion` — constant-speed timed polyline                   |
//! | [`error`]  | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geo;
pub mod ids;
pub mod motion;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::{Point3, path_length};
pub use ids::{AgentId, Capability, SegmentId};
pub use motion::Motion;
pub use time::SimTime;
