//! Allocator output types.

use std::collections::BTreeMap;
use std::fmt;

use tps_core::{AgentId, SegmentId};

// ── Task ──────────────────────────────────────────────────────────────────────

/// One segment assigned to one agent.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    pub agent:   AgentId,
    pub segment: SegmentId,
    /// Position within the agent's list.
    pub order:   usize,
}

impl Task {
    pub fn task_ref(&self) -> TaskRef {
        TaskRef { agent: self.agent, segment: self.segment }
    }
}

/// The `(agent, segment)` pair identifying a task in error reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaskRef {
    pub agent:   AgentId,
    pub segment: SegmentId,
}

impl fmt::Display for TaskRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.agent, self.segment)
    }
}

// ── Allocation ────────────────────────────────────────────────────────────────

/// Per-agent ordered task lists.
///
/// Every roster agent has an entry, possibly empty.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Allocation {
    lists: BTreeMap<AgentId, Vec<Task>>,
}

impl Allocation {
    pub(crate) fn with_agents(agents: impl IntoIterator<Item = AgentId>) -> Self {
        Self {
            lists: agents.into_iter().map(|a| (a, Vec::new())).collect(),
        }
    }

    /// Append `segment` to `agent`'s list.  `agent` must be registered.
    pub(crate) fn assign(&mut self, agent: AgentId, segment: SegmentId) {
        if let Some(list) = self.lists.get_mut(&agent) {
            let order = list.len();
            list.push(Task { agent, segment, order });
        }
    }

    /// Tasks of `agent` in execution order; empty for unknown agents.
    pub fn tasks(&self, agent: AgentId) -> &[Task] {
        self.lists.get(&agent).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(agent, tasks)` in ascending agent order.
    pub fn iter(&self) -> impl Iterator<Item = (AgentId, &[Task])> + '_ {
        self.lists.iter().map(|(&a, l)| (a, l.as_slice()))
    }

    pub fn agent_count(&self) -> usize {
        self.lists.len()
    }

    pub fn task_count(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    /// The agent `segment` was assigned to.
    pub fn agent_for(&self, segment: SegmentId) -> Option<AgentId> {
        self.lists
            .iter()
            .find(|(_, l)| l.iter().any(|t| t.segment == segment))
            .map(|(&a, _)| a)
    }
}
