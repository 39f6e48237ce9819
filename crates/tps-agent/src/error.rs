use thiserror::Error;

use tps_core::AgentId;

#[derive(Debug, Error, PartialEq)]
pub enum AgentError {
    #[error("{0} appears more than once in the roster")]
    Duplicate(AgentId),

    #[error("{0} has an empty capability set")]
    NoCapabilities(AgentId),

    #[error("{agent} {what} speed must be positive and finite, got {got}")]
    InvalidSpeed {
        agent: AgentId,
        what:  &'static str,
        got:   f64,
    },

    #[error("{agent} {what} pose has a non-finite coordinate")]
    NonFinitePose {
        agent: AgentId,
        what:  &'static str,
    },
}

pub type AgentResult<T> = Result<T, AgentError>;
