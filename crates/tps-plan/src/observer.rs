//! Planner observer trait for progress reporting and diagnostics.

use tps_core::SimTime;
use tps_schedule::Event;

use crate::Conflict;

/// Summary handed to [`PlanObserver::on_plan_end`] after a successful run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlanStats {
    /// Segments planned by this run (one batch under `plan_batched`).
    pub segments:  usize,
    pub agents:    usize,
    pub events:    usize,
    /// Total delays across all tasks, requeues included.
    pub conflicts: u64,
    /// Most conflicts any single task met before committing.
    pub max_attempts: u32,
    pub makespan:  SimTime,
}

/// Callbacks invoked by [`Planner::plan`][crate::Planner::plan] at key points
/// in the planning loop.
///
/// All methods have default no-op implementations.
///
/// # Example: conflict counter
///
/// ```rust
/// use tps_plan::{Conflict, PlanObserver};
///
/// #[derive(Default)]
/// struct Conflicts(usize);
///
/// impl PlanObserver for Conflicts {
///     fn on_conflict(&mut self, _conflict: &Conflict) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait PlanObserver {
    /// Called once, after allocation and before the first selection.
    fn on_plan_start(&mut self, _segments: usize, _agents: usize) {}

    /// Called for every detected contact, before the chain is delayed.
    fn on_conflict(&mut self, _conflict: &Conflict) {}

    /// Called for each event as it is committed.  A trip home may later be
    /// cut short when the agent's next task starts before it arrives.
    fn on_commit(&mut self, _event: &Event) {}

    /// Called once after the last commit.  Not called when planning fails.
    fn on_plan_end(&mut self, _stats: &PlanStats) {}
}

/// A [`PlanObserver`] that does nothing.
pub struct NoopObserver;

impl PlanObserver for NoopObserver {}
