//! Feasibility check of a tentative chain against the other agents' timelines.

use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

use tps_agent::AgentRoster;
use tps_alloc::TaskRef;
use tps_collision::{CollisionPredicate, first_contact, sample_step};
use tps_core::{AgentId, Motion, SegmentId, SimTime};
use tps_schedule::{EventKind, Occupancy, ScheduleBuilder};

use crate::PlanResult;

// ── Phase ─────────────────────────────────────────────────────────────────────

/// What an agent is doing over the stretch involved in a conflict.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Travel,
    Process,
    /// Standing still: at home, between events, or after its last event.
    Holding,
}

impl From<EventKind> for Phase {
    fn from(kind: EventKind) -> Self {
        match kind {
            EventKind::Travel => Phase::Travel,
            EventKind::Process => Phase::Process,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Travel => "travel",
            Phase::Process => "process",
            Phase::Holding => "holding",
        })
    }
}

// ── Conflict ──────────────────────────────────────────────────────────────────

/// A sampled contact between part of a tentative chain and another agent.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Conflict {
    /// Task being scheduled.
    pub task:            TaskRef,
    /// Which part of its chain hit.
    pub phase:           Phase,
    /// Start of that part.
    pub start:           SimTime,
    /// Agent that was hit, and what it was doing.
    pub blocker:         AgentId,
    pub blocker_phase:   Phase,
    /// Segment of the blocking event, or the one that left the blocker where
    /// it stands; `None` while it is still at home.
    pub blocker_segment: Option<SegmentId>,
    /// End of the blocking stretch; `None` when the blocker stands still with
    /// nothing later committed.
    pub blocker_until:   Option<SimTime>,
    /// First sampled instant in contact.
    pub at:              SimTime,
}

impl Conflict {
    /// How far the hit part must move to start where the blocking stretch
    /// ends.
    pub fn required_shift(&self) -> Option<f64> {
        self.blocker_until.map(|until| until - self.start)
    }

    /// The delay to apply: the required shift, or `fallback` when that is not
    /// positive (the two stretches only touch).  `None` if the blocker has no
    /// committed end.
    pub fn delay(&self, fallback: f64) -> Option<f64> {
        self.required_shift().map(|shift| if shift > 0.0 { shift } else { fallback })
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} hits {} {}", self.task, self.phase, self.blocker, self.blocker_phase)?;
        if let Some(segment) = self.blocker_segment {
            write!(f, " ({segment})")?;
        }
        write!(f, " at {}", self.at)
    }
}

// ── Check ─────────────────────────────────────────────────────────────────────

/// One tentative motion to check.
pub(crate) struct Stretch<'a> {
    pub phase:  Phase,
    pub motion: &'a Motion,
}

/// Everything a chain is checked against.
pub(crate) struct Checker<'a, P: CollisionPredicate> {
    pub predicate: &'a P,
    pub roster:    &'a AgentRoster<P::Geometry>,
    pub committed: &'a ScheduleBuilder,
    /// Agents with at least one task; the rest never move and are ignored.
    pub working:   &'a BTreeSet<AgentId>,
    pub dt:        f64,
    pub max_gap:   Option<f64>,
}

impl<P: CollisionPredicate> Checker<'_, P> {
    /// First contact between any stretch and any other working agent.
    ///
    /// Stretches are checked in order, other agents in ascending id, and each
    /// agent's occupancy in time order, so the reported conflict is
    /// deterministic.  Every instant of a stretch is compared with wherever the
    /// other agent is: moving, waiting between events, or parked for good.
    pub fn find_conflict(
        &self,
        task:   TaskRef,
        own:    &P::Geometry,
        stretches: &[Stretch<'_>],
    ) -> PlanResult<Option<Conflict>> {
        for stretch in stretches {
            let (lo, hi) = (stretch.motion.start(), stretch.motion.end());
            for &other in self.working.iter().filter(|&&a| a != task.agent) {
                let Some(theirs) = self.roster.get(other).map(|a| &a.geometry) else { continue };
                let timeline = self.committed.timeline(other)?;

                for piece in timeline.occupancy(lo, hi) {
                    let (motion, phase, segment, until) = match piece {
                        Occupancy::Moving(event) => (
                            Cow::Borrowed(&event.motion),
                            Phase::from(event.kind),
                            Some(event.segment),
                            Some(event.end()),
                        ),
                        Occupancy::Holding { pose, from, until, after } => {
                            let hold = Motion::timed(vec![pose], from, until.unwrap_or(hi).max(from))?;
                            (Cow::Owned(hold), Phase::Holding, after, until)
                        }
                    };
                    let dt = sample_step(stretch.motion, &motion, self.dt, self.max_gap);
                    if let Some(at) = first_contact(self.predicate, stretch.motion, own, &motion, theirs, dt) {
                        return Ok(Some(Conflict {
                            task,
                            phase: stretch.phase,
                            start: lo,
                            blocker: other,
                            blocker_phase: phase,
                            blocker_segment: segment,
                            blocker_until: until,
                            at,
                        }));
                    }
                }
            }
        }
        Ok(None)
    }
}
