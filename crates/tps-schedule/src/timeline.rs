//! One agent's committed event stream.

use tps_core::{Point3, SegmentId, SimTime};

use crate::Event;

// ── Occupancy ─────────────────────────────────────────────────────────────────

/// What an agent does over one stretch of its timeline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Occupancy<'a> {
    /// Executing a committed event.
    Moving(&'a Event),
    /// Standing still at `pose` from `from` until `until`.  `until` is
    /// `None` when nothing later is committed.  `after` is the segment whose
    /// event left the agent here, `None` while still at home.
    Holding {
        pose:  Point3,
        from:  SimTime,
        until: Option<SimTime>,
        after: Option<SegmentId>,
    },
}

// ── AgentTimeline ─────────────────────────────────────────────────────────────

/// Chronologically ordered, non-overlapping events of one agent.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentTimeline {
    home:   Point3,
    events: Vec<Event>,
}

impl AgentTimeline {
    pub(crate) fn new(home: Point3) -> Self {
        Self { home, events: Vec::new() }
    }

    pub(crate) fn push_unchecked(&mut self, event: Event) {
        self.events.push(event);
    }

    pub(crate) fn cut_last(&mut self, at: SimTime) -> Option<Event> {
        let last = self.events.pop()?;
        if at > last.start() {
            self.events.push(Event { motion: last.motion.until(at), ..last.clone() });
        }
        Some(last)
    }

    pub fn home(&self) -> Point3 {
        self.home
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Start of the first event.
    pub fn start_time(&self) -> Option<SimTime> {
        self.events.first().map(Event::start)
    }

    /// End of the last event.
    pub fn end_time(&self) -> Option<SimTime> {
        self.events.last().map(Event::end)
    }

    /// Where the agent is once its committed events are done, and when.
    pub fn cursor(&self) -> (SimTime, Point3) {
        match self.events.last() {
            Some(e) => (e.end(), e.end_pose()),
            None => (SimTime::ZERO, self.home),
        }
    }

    /// The event in progress at `t`, if any.
    ///
    /// Intervals are closed, so at the instant one event hands over to the
    /// next both contain `t`; the later event is returned.
    pub fn active_event(&self, t: SimTime) -> Option<&Event> {
        let idx = self.events.partition_point(|e| e.start() <= t);
        let candidate = self.events.get(idx.checked_sub(1)?)?;
        (t <= candidate.end()).then_some(candidate)
    }

    /// Pose at `t`: home before the first event, interpolated inside an
    /// event, the previous end pose while idle.
    pub fn pose_at(&self, t: SimTime) -> Point3 {
        let idx = self.events.partition_point(|e| e.start() <= t);
        match idx.checked_sub(1).and_then(|i| self.events.get(i)) {
            None => self.home,
            Some(e) => e.pose_at(t),
        }
    }

    /// Every stretch intersecting `[lo, hi]`, in time order, with no gaps:
    /// holding at home before the first event, at each end pose between
    /// events, and indefinitely after the last one.
    pub fn occupancy(&self, lo: SimTime, hi: SimTime) -> Vec<Occupancy<'_>> {
        let mut out = Vec::new();
        if hi < lo {
            return out;
        }
        let first = self.events.partition_point(|e| e.end() < lo);
        let (mut pose, mut from, mut after) = match first.checked_sub(1).and_then(|i| self.events.get(i)) {
            Some(prev) => (prev.end_pose(), prev.end(), Some(prev.segment)),
            None => (self.home, SimTime::ZERO, None),
        };

        for event in &self.events[first..] {
            if event.start() > from && event.start() >= lo && from <= hi {
                out.push(Occupancy::Holding { pose, from, until: Some(event.start()), after });
            }
            if event.start() > hi {
                return out;
            }
            out.push(Occupancy::Moving(event));
            (pose, from, after) = (event.end_pose(), event.end(), Some(event.segment));
        }
        if from <= hi {
            out.push(Occupancy::Holding { pose, from, until: None, after });
        }
        out
    }

    /// Events whose closed interval intersects `[lo, hi]`.
    pub fn overlapping(&self, lo: SimTime, hi: SimTime) -> &[Event] {
        // Contiguity makes `end` monotone too, so both bounds are binary
        // searches.
        let first = self.events.partition_point(|e| e.end() < lo);
        let last = self.events.partition_point(|e| e.start() <= hi);
        if first >= last { &[] } else { &self.events[first..last] }
    }
}
