//! Atomic scheduled actions.

use std::fmt;

use tps_core::{AgentId, Motion, Point3, SegmentId, SimTime};

// ── EventKind ─────────────────────────────────────────────────────────────────

/// What the agent is doing during an event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// Rapid move with the tool off: approach, retract, or return home.
    Travel,
    /// Traversal of a segment with the tool on.
    Process,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EventKind::Travel => "travel",
            EventKind::Process => "process",
        })
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// One timed motion of one agent.
///
/// `segment` is the segment being processed.  For `Travel` it is the segment
/// being approached, or for a retract or homing move the segment just left.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub kind:    EventKind,
    pub agent:   AgentId,
    pub segment: SegmentId,
    pub motion:  Motion,
}

impl Event {
    pub fn travel(agent: AgentId, segment: SegmentId, motion: Motion) -> Self {
        Self { kind: EventKind::Travel, agent, segment, motion }
    }

    pub fn process(agent: AgentId, segment: SegmentId, motion: Motion) -> Self {
        Self { kind: EventKind::Process, agent, segment, motion }
    }

    #[inline]
    pub fn start(&self) -> SimTime {
        self.motion.start()
    }

    #[inline]
    pub fn end(&self) -> SimTime {
        self.motion.end()
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.motion.duration()
    }

    #[inline]
    pub fn start_pose(&self) -> Point3 {
        self.motion.start_pose()
    }

    #[inline]
    pub fn end_pose(&self) -> Point3 {
        self.motion.end_pose()
    }

    pub fn pose_at(&self, t: SimTime) -> Point3 {
        self.motion.pose_at(t)
    }

    /// The same event moved `dt` seconds later.
    pub fn shifted(&self, dt: f64) -> Event {
        Event { motion: self.motion.shifted(dt), ..self.clone() }
    }

    #[inline]
    pub fn is_process(&self) -> bool {
        self.kind == EventKind::Process
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} [{:.3}s, {:.3}s]",
            self.agent,
            self.kind,
            self.segment,
            self.start().secs(),
            self.end().secs(),
        )
    }
}
