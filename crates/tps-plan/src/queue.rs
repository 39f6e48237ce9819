//! `TentativeQueue` — agents ordered by their tentative process start.
//!
//! Each agent with a runnable head task has exactly one entry.  The key is
//!
//! ```text
//! (process start, AgentId, task order)
//! ```
//!
//! so ties on time go to the lower agent id, then the earlier task.  A task's
//! tentative timing depends only on its own agent's cursor and its committed
//! predecessors, neither of which changes while it waits, so entries never go
//! stale.  A chain that has to wait for another agent to move is pushed back
//! under its delayed start.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use tps_core::{AgentId, SimTime};

/// Min-heap of `(start, agent, order)`.
#[derive(Debug, Default)]
pub struct TentativeQueue {
    heap: BinaryHeap<Reverse<(SimTime, AgentId, usize)>>,
}

impl TentativeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, start: SimTime, agent: AgentId, order: usize) {
        self.heap.push(Reverse((start, agent, order)));
    }

    /// Remove and return the earliest entry.
    pub fn pop(&mut self) -> Option<(SimTime, AgentId, usize)> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }
}
