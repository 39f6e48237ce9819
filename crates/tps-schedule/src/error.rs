use thiserror::Error;

use tps_core::{AgentId, Point3, SimTime};

#[derive(Debug, Error, PartialEq)]
pub enum ScheduleError {
    #[error("{0} has no timeline in this schedule")]
    UnknownAgent(AgentId),

    #[error("{agent} event starting at {start} overlaps its previous event ending at {previous_end}")]
    NonContiguous {
        agent:        AgentId,
        previous_end: SimTime,
        start:        SimTime,
    },

    #[error("{agent} event starts before the plan origin ({start})")]
    NegativeStart { agent: AgentId, start: SimTime },

    #[error("{agent} ends one schedule at {left} but starts the next from {resumed}")]
    Discontinuous {
        agent:   AgentId,
        left:    Point3,
        resumed: Point3,
    },
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
