use thiserror::Error;

use tps_alloc::{AllocError, TaskRef};
use tps_core::{AgentId, CoreError, SegmentId, SimTime};
use tps_schedule::ScheduleError;
use tps_toolpath::ToolpathError;

#[derive(Debug, Error)]
pub enum PlanError {
    #[error("planner configuration error: {0}")]
    Config(String),

    #[error("{what} covers {got} segments but the toolpath has {expected}")]
    SizeMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("{0} is not in the roster")]
    UnknownAgent(AgentId),

    #[error("allocation failed: {0}")]
    Allocation(#[from] AllocError),

    /// The delay loop gave up on `task`: either the retry bound ran out, or
    /// the blocker stays put for good and no delay can clear it.
    #[error(
        "{task} still collides with {blocker} after {attempts} attempts \
         (last process start {last_start})"
    )]
    SchedulingInfeasible {
        task:            TaskRef,
        blocker:         AgentId,
        /// Segment of the blocking event, or the one that left the blocker
        /// where it stands; `None` while it is still at home.
        blocker_segment: Option<SegmentId>,
        last_start:      SimTime,
        attempts:        u32,
    },

    #[error("no runnable task left while {segment} still waits on its predecessors")]
    PrecedenceStall { segment: SegmentId },

    #[error("motion error: {0}")]
    Core(#[from] CoreError),

    #[error("toolpath error: {0}")]
    Toolpath(#[from] ToolpathError),

    #[error("schedule error: {0}")]
    Schedule(#[from] ScheduleError),
}

pub type PlanResult<T> = Result<T, PlanError>;
