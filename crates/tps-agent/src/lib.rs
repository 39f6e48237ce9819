//! `tps-agent` — static per-agent configuration.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`descriptor`] | `AgentDescriptor<G>` — capabilities, poses, speeds, geometry |
//! | [`roster`]     | `AgentRoster<G>`, `RosterBuilder<G>` (validated construction) |
//! | [`error`]      | `AgentError`, `AgentResult<T>`                            |
//!
//! The geometry handle `G` is opaque here; it is only ever handed to the
//! collision predicate chosen by the application.

pub mod descriptor;
pub mod error;
pub mod roster;


pub use descriptor::AgentDescriptor;
pub use error::{AgentError, AgentResult};
pub use roster::{AgentRoster, RosterBuilder};
