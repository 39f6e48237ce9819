//! `tps-schedule` — the planner's output artifact.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`event`]    | `EventKind`, `Event`                                         |
//! | [`timeline`] | `AgentTimeline`, `Occupancy` — one agent's events + home pose |
//! | [`schedule`] | `Schedule` (read-only), `ScheduleBuilder` (planner-owned)    |
//! | [`error`]    | `ScheduleError`, `ScheduleResult<T>`                         |
//!
//! # Timeline model (summary)
//!
//! Each agent's events are stored in commit order, which is also time order:
//!
//! ```text
//! 0 ≤ start(e₀) ≤ end(e₀) ≤ start(e₁) ≤ end(e₁) ≤ …
//! ```
//!
//! Between events the agent waits at the previous event's end pose; before
//! its first event it waits at home.  The builder enforces the ordering, so
//! every lookup is a binary search.

pub mod error;
pub mod event;
pub mod schedule;
pub mod timeline;


pub use error::{ScheduleError, ScheduleResult};
pub use event::{Event, EventKind};
pub use schedule::{Schedule, ScheduleBuilder};
pub use timeline::{AgentTimeline, Occupancy};
