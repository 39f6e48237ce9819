//! `tps-alloc` — who does which segment.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`task`]     | `Task`, `TaskRef`, `Allocation`                            |
//! | [`strategy`] | `AllocationStrategy` — tie-break rule among capable agents |
//! | [`allocate`] | `allocate()`, `allocate_segments()` for a subset           |
//! | [`error`]    | `AllocError`, `AllocResult<T>`                             |
//!
//! Allocation is purely combinatorial: no timing or geometry is consulted.
//! Each agent's task list keeps the toolpath's relative order, so
//! layer-by-layer deposition order survives the split.

pub mod allocate;
pub mod error;
pub mod strategy;
pub mod task;


pub use allocate::{allocate, allocate_segments};
pub use error::{AllocError, AllocResult};
pub use strategy::AllocationStrategy;
pub use task::{Allocation, Task, TaskRef};
