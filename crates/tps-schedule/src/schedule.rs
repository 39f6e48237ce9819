//! The immutable `Schedule` and the builder the planner fills.

use std::collections::BTreeMap;

use tps_core::{AgentId, Point3, SimTime};

use crate::{AgentTimeline, Event, ScheduleError, ScheduleResult};

// ── Schedule ──────────────────────────────────────────────────────────────────

/// A committed, time-stamped execution plan.
///
/// There are no mutation methods; once returned by the planner a `Schedule`
/// can be shared freely between dispatch threads (`Send + Sync`).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    timelines: BTreeMap<AgentId, AgentTimeline>,
    makespan:  SimTime,
}

impl Schedule {
    /// Latest end time across all agents; `0` for an empty schedule.
    pub fn makespan(&self) -> SimTime {
        self.makespan
    }

    /// Agents in the schedule, ascending, including idle ones.
    pub fn agents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.timelines.keys().copied()
    }

    pub fn timeline(&self, agent: AgentId) -> ScheduleResult<&AgentTimeline> {
        self.timelines.get(&agent).ok_or(ScheduleError::UnknownAgent(agent))
    }

    pub fn timelines(&self) -> impl Iterator<Item = (AgentId, &AgentTimeline)> + '_ {
        self.timelines.iter().map(|(&id, tl)| (id, tl))
    }

    /// Ordered events of `agent`; empty for unknown agents.
    pub fn events(&self, agent: AgentId) -> &[Event] {
        self.timelines.get(&agent).map(AgentTimeline::events).unwrap_or(&[])
    }

    /// Total number of events across all agents.
    pub fn event_count(&self) -> usize {
        self.timelines.values().map(|tl| tl.events().len()).sum()
    }

    /// Every `Process` event, grouped by agent in ascending id order.
    pub fn process_events(&self) -> impl Iterator<Item = &Event> + '_ {
        self.timelines
            .values()
            .flat_map(|tl| tl.events().iter())
            .filter(|e| e.is_process())
    }

    /// The event `agent` is executing at `t`.  At a hand-over instant the
    /// later event wins.
    pub fn active_event(&self, agent: AgentId, t: SimTime) -> ScheduleResult<Option<&Event>> {
        Ok(self.timeline(agent)?.active_event(t))
    }

    /// Where `agent` is at `t`, including while idle.
    pub fn pose_at(&self, agent: AgentId, t: SimTime) -> ScheduleResult<Point3> {
        Ok(self.timeline(agent)?.pose_at(t))
    }

    /// Events of any agent intersecting the closed window `[t0, t1]`, grouped
    /// by agent in ascending id order.
    pub fn slice(&self, t0: SimTime, t1: SimTime) -> Vec<&Event> {
        self.timelines
            .values()
            .flat_map(|tl| tl.overlapping(t0, t1).iter())
            .collect()
    }

    /// Earliest event start across all agents.
    pub fn start_time(&self) -> Option<SimTime> {
        self.timelines.values().filter_map(AgentTimeline::start_time).min()
    }

    /// Latest event end across all agents (`None` if nothing was scheduled).
    pub fn end_time(&self) -> Option<SimTime> {
        self.timelines.values().filter_map(AgentTimeline::end_time).max()
    }

    /// The working agent that finishes first; ties go to the lower id.
    pub fn first_finished(&self) -> Option<(AgentId, SimTime)> {
        self.finish_times().min_by_key(|&(id, t)| (t, id))
    }

    /// The working agent that finishes last; ties go to the lower id.
    pub fn last_finished(&self) -> Option<(AgentId, SimTime)> {
        self.finish_times()
            .min_by_key(|&(id, t)| (std::cmp::Reverse(t), id))
    }

    /// Run `parts` back to back: each one is shifted to start at the
    /// makespan of everything before it.
    ///
    /// Every agent must resume each part where it left the previous one
    /// (home for parts planned from home), otherwise
    /// [`ScheduleError::Discontinuous`] is returned.  Agents missing from
    /// earlier parts join at their home pose.
    pub fn merge(parts: impl IntoIterator<Item = Schedule>) -> ScheduleResult<Schedule> {
        let mut merged = Schedule::default();
        for part in parts {
            let offset = merged.makespan.secs();
            for (agent, timeline) in part.timelines {
                let target = merged
                    .timelines
                    .entry(agent)
                    .or_insert_with(|| AgentTimeline::new(timeline.home()));
                let (_, left) = target.cursor();
                if left != timeline.home() {
                    return Err(ScheduleError::Discontinuous { agent, left, resumed: timeline.home() });
                }
                for event in timeline.events() {
                    target.push_unchecked(event.shifted(offset));
                }
            }
            merged.makespan = merged
                .timelines
                .values()
                .filter_map(AgentTimeline::end_time)
                .max()
                .unwrap_or(SimTime::ZERO);
        }
        Ok(merged)
    }

    fn finish_times(&self) -> impl Iterator<Item = (AgentId, SimTime)> + '_ {
        self.timelines
            .iter()
            .filter_map(|(&id, tl)| tl.end_time().map(|t| (id, t)))
    }
}

// ── ScheduleBuilder ───────────────────────────────────────────────────────────

/// Incrementally assembled schedule, exclusively owned by one planning call.
///
/// `push` rejects events that would break per-agent ordering, so a finished
/// builder always satisfies the timeline invariants.
#[derive(Debug, Default)]
pub struct ScheduleBuilder {
    timelines: BTreeMap<AgentId, AgentTimeline>,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `agent` with its home pose.  Re-registering keeps the
    /// existing timeline.
    pub fn add_agent(&mut self, agent: AgentId, home: Point3) -> &mut Self {
        self.timelines
            .entry(agent)
            .or_insert_with(|| AgentTimeline::new(home));
        self
    }

    pub fn timeline(&self, agent: AgentId) -> ScheduleResult<&AgentTimeline> {
        self.timelines.get(&agent).ok_or(ScheduleError::UnknownAgent(agent))
    }

    /// Committed timelines of every agent except `agent`.
    pub fn others(&self, agent: AgentId) -> impl Iterator<Item = (AgentId, &AgentTimeline)> + '_ {
        self.timelines
            .iter()
            .filter(move |&(&id, _)| id != agent)
            .map(|(&id, tl)| (id, tl))
    }

    /// Append `event` to its agent's timeline.
    pub fn push(&mut self, event: Event) -> ScheduleResult<()> {
        let agent = event.agent;
        let timeline = self
            .timelines
            .get_mut(&agent)
            .ok_or(ScheduleError::UnknownAgent(agent))?;

        let start = event.start();
        if start < SimTime::ZERO {
            return Err(ScheduleError::NegativeStart { agent, start });
        }
        if let Some(previous_end) = timeline.end_time() {
            if start < previous_end {
                return Err(ScheduleError::NonContiguous { agent, previous_end, start });
            }
        }
        timeline.push_unchecked(event);
        Ok(())
    }

    /// Stop `agent`'s last event at `at`: it keeps the part before `at` and
    /// is dropped entirely if it had not started by then.  Returns the event
    /// as it was, or `None` if the agent has no events.
    pub fn cut_short(&mut self, agent: AgentId, at: SimTime) -> ScheduleResult<Option<Event>> {
        let timeline = self
            .timelines
            .get_mut(&agent)
            .ok_or(ScheduleError::UnknownAgent(agent))?;
        Ok(timeline.cut_last(at))
    }

    pub fn event_count(&self) -> usize {
        self.timelines.values().map(|tl| tl.events().len()).sum()
    }

    pub fn finish(self) -> Schedule {
        let makespan = self
            .timelines
            .values()
            .filter_map(AgentTimeline::end_time)
            .max()
            .unwrap_or(SimTime::ZERO);
        Schedule { timelines: self.timelines, makespan }
    }
}
