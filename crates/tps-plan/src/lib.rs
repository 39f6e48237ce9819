//! `tps-plan` — the collision-aware temporal scheduler.
//!
//! # Planning loop
//!
//! ```text
//! allocate(toolpath, roster)              → per-agent ordered task lists
//! for every agent with a runnable head task:
//!     tentative chain = Travel(cursor → segment start) + Process(segment)
//!                       [+ Travel depart] [+ Travel home]
//!     push (process start, AgentId, order) into TentativeQueue
//! loop:
//!   ① Select   — pop the earliest tentative process start.
//!   ② Check    — sample the chain, then its end pose held up to the latest
//!                committed end, against every other working agent:
//!                moving, waiting between events, or parked.
//!   ③ Delay    — on contact, move the chain past the blocking stretch; if
//!                the blocker is parked with work ahead, requeue behind it.
//!                Give up after `max_retries` conflicts for one task.
//!   ④ Commit   — Travel (if it moves), Process, depart and home trip;
//!                advance the cursor; enqueue the agent's next task and any
//!                newly unblocked ones.
//! ```
//!
//! Selection, checking, and committing are strictly sequential, so identical
//! inputs give bit-identical schedules.  Only the sampling inside ② may fan
//! out (`parallel` feature).
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Collision sampling on Rayon's thread pool.              |
//! | `fx-hash`  | FxHash for the segment completion index.                |
//! | `serde`    | Derives on `PlanConfig` and all re-exported data types. |
//!
//! # Quick-start
//!
//! ```rust
//! use tps_agent::{AgentDescriptor, RosterBuilder};
//! use tps_collision::NeverCollide;
//! use tps_core::{AgentId, Capability, Point3};
//! use tps_plan::{NoopObserver, PlanConfig, PlannerBuilder};
//! use tps_toolpath::{Segment, Toolpath};
//!
//! let tool = Capability(0);
//! let mut path = Toolpath::empty();
//! path.push(Segment::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0)], tool)?);
//!
//! let roster = RosterBuilder::new()
//!     .agent(AgentDescriptor::new(AgentId(0), ()).with_capability(tool))
//!     .build()?;
//! let planner = PlannerBuilder::new(roster, NeverCollide)
//!     .config(PlanConfig::default())
//!     .build()?;
//! let schedule = planner.plan(&path, &mut NoopObserver)?;
//! assert_eq!(schedule.makespan().secs(), 10.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod config;
pub mod conflict;
pub mod error;
pub mod observer;
pub mod planner;
pub mod queue;


pub use builder::PlannerBuilder;
pub use config::PlanConfig;
pub use conflict::{Conflict, Phase};
pub use error::{PlanError, PlanResult};
pub use observer::{NoopObserver, PlanObserver, PlanStats};
pub use planner::{Planner, plan};
pub use queue::TentativeQueue;
