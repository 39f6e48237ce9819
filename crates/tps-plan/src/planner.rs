//! The `Planner` and its selection / check / delay / commit loop.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, info_span, trace, warn};

use tps_agent::{AgentDescriptor, AgentRoster};
use tps_alloc::{Allocation, Task, TaskRef, allocate_segments};
use tps_collision::CollisionPredicate;
use tps_core::{AgentId, Motion, Point3, SegmentId, SimTime, path_length};
use tps_schedule::{Event, Schedule, ScheduleBuilder};
use tps_toolpath::{Precedence, Segment, Toolpath};

use crate::conflict::{Checker, Phase, Stretch};
use crate::{
    Conflict, NoopObserver, PlanConfig, PlanError, PlanObserver, PlanResult, PlanStats,
    TentativeQueue,
};

#[cfg(feature = "fx-hash")]
type CompletionIndex = rustc_hash::FxHashMap<SegmentId, SimTime>;
#[cfg(not(feature = "fx-hash"))]
type CompletionIndex = std::collections::HashMap<SegmentId, SimTime>;

// ── Planner ───────────────────────────────────────────────────────────────────

/// Turns a toolpath into a collision-free [`Schedule`] for a fixed roster.
///
/// A `Planner` holds no per-call state: `plan` can be called repeatedly (and
/// from several threads on a shared `&Planner`) with identical results for
/// identical inputs.
///
/// Create via [`PlannerBuilder`][crate::PlannerBuilder].
pub struct Planner<P: CollisionPredicate> {
    pub(crate) roster:    AgentRoster<P::Geometry>,
    pub(crate) predicate: P,
    pub(crate) config:    PlanConfig,
}

impl<P: CollisionPredicate> Planner<P> {
    pub fn roster(&self) -> &AgentRoster<P::Geometry> {
        &self.roster
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Plan `toolpath` with no cross-segment precedence.
    pub fn plan<O: PlanObserver>(&self, toolpath: &Toolpath, observer: &mut O) -> PlanResult<Schedule> {
        let precedence = Precedence::unconstrained(toolpath.len());
        self.plan_with(toolpath, &precedence, observer)
    }

    /// Plan `toolpath` honouring `precedence`.
    pub fn plan_with<O: PlanObserver>(
        &self,
        toolpath:   &Toolpath,
        precedence: &Precedence,
        observer:   &mut O,
    ) -> PlanResult<Schedule> {
        let scope = every_segment(toolpath);
        run(&self.roster, &self.predicate, &self.config, toolpath, precedence, &scope, observer)
    }

    /// Plan `toolpath` in batches of `batch_size` precedence strata (see
    /// [`Precedence::strata`]).  Each batch is allocated and planned on its
    /// own, starting with every agent at home, and runs once the previous
    /// batch has finished.
    ///
    /// Requires `return_home`, so that each batch leaves every agent where
    /// the next one expects it.  The observer sees one start/end pair per
    /// batch.
    pub fn plan_batched<O: PlanObserver>(
        &self,
        toolpath:   &Toolpath,
        precedence: &Precedence,
        batch_size: usize,
        observer:   &mut O,
    ) -> PlanResult<Schedule> {
        if batch_size == 0 {
            return Err(PlanError::Config("batch_size must be at least 1".into()));
        }
        if !self.config.return_home {
            return Err(PlanError::Config(
                "batched planning needs return_home so each batch starts from home".into(),
            ));
        }

        let mut batches: Vec<Vec<SegmentId>> = precedence
            .strata()
            .chunks(batch_size)
            .map(|group| {
                let mut ids = group.concat();
                ids.sort_unstable();
                ids
            })
            .collect();
        if batches.is_empty() {
            batches.push(Vec::new());
        }

        let _span = info_span!("tps.plan_batched", batches = batches.len(), batch_size).entered();
        let mut parts = Vec::with_capacity(batches.len());
        for scope in &batches {
            parts.push(run(&self.roster, &self.predicate, &self.config, toolpath, precedence, scope, observer)?);
        }
        let schedule = Schedule::merge(parts)?;
        info!(
            event = "plan.batched",
            batches = batches.len(),
            makespan = schedule.makespan().secs(),
            events = schedule.event_count(),
        );
        Ok(schedule)
    }
}

/// One-shot planning without building a [`Planner`].
///
/// ```rust
/// use tps_agent::{AgentDescriptor, RosterBuilder};
/// use tps_collision::NeverCollide;
/// use tps_core::{AgentId, Capability};
/// use tps_plan::{PlanConfig, plan};
/// use tps_toolpath::Toolpath;
///
/// let roster = RosterBuilder::new()
///     .agent(AgentDescriptor::new(AgentId(0), ()).with_capability(Capability(0)))
///     .build()
///     .unwrap();
/// let schedule = plan(&Toolpath::empty(), &roster, &NeverCollide, &PlanConfig::default()).unwrap();
/// assert_eq!(schedule.event_count(), 0);
/// ```
pub fn plan<P: CollisionPredicate>(
    toolpath:  &Toolpath,
    roster:    &AgentRoster<P::Geometry>,
    predicate: &P,
    config:    &PlanConfig,
) -> PlanResult<Schedule> {
    config.validate()?;
    let precedence = Precedence::unconstrained(toolpath.len());
    let scope = every_segment(toolpath);
    run(roster, predicate, config, toolpath, &precedence, &scope, &mut NoopObserver)
}

fn every_segment(toolpath: &Toolpath) -> Vec<SegmentId> {
    toolpath.iter().map(|(id, _)| id).collect()
}

// ── Tentative chain ───────────────────────────────────────────────────────────

/// The motions proposed for one task, in execution order:
///
/// ```text
/// travel → process → [depart] → [back home]
/// ```
struct Chain {
    task:    Task,
    /// Earliest process start allowed by precedence.
    ready:   SimTime,
    travel:  Motion,
    process: Motion,
    depart:  Option<Motion>,
    back:    Option<Motion>,
}

impl Chain {
    fn start(&self) -> SimTime {
        self.travel.start()
    }

    fn last(&self) -> &Motion {
        self.back.as_ref().or(self.depart.as_ref()).unwrap_or(&self.process)
    }

    fn end(&self) -> SimTime {
        self.last().end()
    }

    /// Travel is only committed when it moves, but a stationary travel that
    /// lasts is still a wait on the spot and gets checked.
    fn moves(&self) -> bool {
        self.travel.length() > 0.0
    }

    fn task_ref(&self) -> TaskRef {
        self.task.task_ref()
    }

    fn stretches(&self) -> Vec<Stretch<'_>> {
        let mut stretches = Vec::with_capacity(5);
        if self.moves() || self.travel.duration() > 0.0 {
            stretches.push(Stretch { phase: Phase::Travel, motion: &self.travel });
        }
        stretches.push(Stretch { phase: Phase::Process, motion: &self.process });
        for motion in self.depart.iter().chain(self.back.iter()) {
            stretches.push(Stretch { phase: Phase::Travel, motion });
        }
        stretches
    }
}

/// Approach polyline from `from` to `target`, optionally via a point
/// `retract` above the target.  Coincident consecutive points are dropped;
/// a single remaining point means no movement.
pub(crate) fn approach_path(from: Point3, target: Point3, retract: f64) -> Vec<Point3> {
    let mut path = vec![from];
    if from == target {
        return path;
    }
    if retract > 0.0 {
        let above = target.raised(retract);
        if above != from {
            path.push(above);
        }
    }
    if path.last() != Some(&target) {
        path.push(target);
    }
    path
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Resolution {
    /// No contact left; commit.
    Clear,
    /// Delayed behind an agent that has yet to move; back into the queue.
    Deferred,
}

// ── Per-call state ────────────────────────────────────────────────────────────

struct Run<'a, P: CollisionPredicate, O> {
    roster:     &'a AgentRoster<P::Geometry>,
    predicate:  &'a P,
    config:     &'a PlanConfig,
    toolpath:   &'a Toolpath,
    precedence: &'a Precedence,
    observer:   &'a mut O,

    allocation: Allocation,
    builder:    ScheduleBuilder,
    queue:      TentativeQueue,
    /// Agents with at least one task.
    working:    BTreeSet<AgentId>,
    /// Index of each agent's next task in its allocation list.
    cursors:    BTreeMap<AgentId, usize>,
    /// Chains currently in the queue, one per agent.
    pending:    BTreeMap<AgentId, Chain>,
    /// Conflicts met by each agent's head task so far.
    attempts:   BTreeMap<AgentId, u32>,
    /// Agents whose head task waits on uncommitted predecessors.
    blocked:    BTreeSet<AgentId>,
    /// Agents whose last committed event is a trip home.
    homing:     BTreeSet<AgentId>,
    /// Process end time of every committed segment.
    completed:  CompletionIndex,
    stats:      PlanStats,
}

fn run<P: CollisionPredicate, O: PlanObserver>(
    roster:     &AgentRoster<P::Geometry>,
    predicate:  &P,
    config:     &PlanConfig,
    toolpath:   &Toolpath,
    precedence: &Precedence,
    scope:      &[SegmentId],
    observer:   &mut O,
) -> PlanResult<Schedule> {
    if precedence.segment_count() != toolpath.len() {
        return Err(PlanError::SizeMismatch {
            expected: toolpath.len(),
            got:      precedence.segment_count(),
            what:     "precedence graph",
        });
    }

    let _span = info_span!("tps.plan", segments = scope.len(), agents = roster.len()).entered();

    let allocation = allocate_segments(toolpath, scope, roster, config.allocation)?;
    info!(
        event = "plan.started",
        segments = scope.len(),
        agents = roster.len(),
        strategy = ?config.allocation,
    );

    let mut builder = ScheduleBuilder::new();
    for agent in roster.iter() {
        builder.add_agent(agent.id, agent.home);
    }

    // Predecessors outside the scope were planned by an earlier call.
    let in_scope: BTreeSet<SegmentId> = scope.iter().copied().collect();
    let mut completed = CompletionIndex::default();
    for &segment in scope {
        for &pred in precedence.predecessors(segment) {
            if !in_scope.contains(&pred) {
                completed.insert(pred, SimTime::ZERO);
            }
        }
    }

    let mut state = Run {
        roster,
        predicate,
        config,
        toolpath,
        precedence,
        observer,
        working: roster.ids().filter(|&a| !allocation.tasks(a).is_empty()).collect(),
        cursors: roster.ids().map(|a| (a, 0)).collect(),
        allocation,
        builder,
        queue: TentativeQueue::new(),
        pending: BTreeMap::new(),
        attempts: BTreeMap::new(),
        blocked: BTreeSet::new(),
        homing: BTreeSet::new(),
        completed,
        stats: PlanStats {
            segments: scope.len(),
            agents: roster.len(),
            ..PlanStats::default()
        },
    };
    state.observer.on_plan_start(scope.len(), roster.len());
    state.execute()
}

impl<P: CollisionPredicate, O: PlanObserver> Run<'_, P, O> {
    fn execute(mut self) -> PlanResult<Schedule> {
        let agents: Vec<AgentId> = self.roster.ids().collect();
        for &agent in &agents {
            self.enqueue(agent)?;
        }

        while let Some((_, agent, _)) = self.queue.pop() {
            let Some(mut chain) = self.pending.remove(&agent) else {
                continue;
            };
            if self.resolve_conflicts(&mut chain)? == Resolution::Deferred {
                self.queue.push(chain.process.start(), agent, chain.task.order);
                self.pending.insert(agent, chain);
                continue;
            }

            let attempts = self.attempts.remove(&agent).unwrap_or(0);
            self.stats.max_attempts = self.stats.max_attempts.max(attempts);
            self.commit(chain)?;

            if let Some(cursor) = self.cursors.get_mut(&agent) {
                *cursor += 1;
            }
            self.enqueue(agent)?;
            self.release_blocked()?;
        }

        if let Some(&agent) = self.blocked.iter().next() {
            let segment = self
                .head_task(agent)
                .map(|t| t.segment)
                .unwrap_or(SegmentId(0));
            return Err(PlanError::PrecedenceStall { segment });
        }

        let schedule = self.builder.finish();
        self.stats.events = schedule.event_count();
        self.stats.makespan = schedule.makespan();
        info!(
            event = "plan.finished",
            makespan = schedule.makespan().secs(),
            events = self.stats.events,
            conflicts = self.stats.conflicts,
        );
        self.observer.on_plan_end(&self.stats);
        Ok(schedule)
    }

    fn descriptor(&self, agent: AgentId) -> PlanResult<&AgentDescriptor<P::Geometry>> {
        self.roster.get(agent).ok_or(PlanError::UnknownAgent(agent))
    }

    fn head_task(&self, agent: AgentId) -> Option<Task> {
        let idx = *self.cursors.get(&agent)?;
        self.allocation.tasks(agent).get(idx).copied()
    }

    /// Earliest instant the process of `segment` may start, or `None` while a
    /// predecessor is still uncommitted.
    fn ready_time(&self, segment: SegmentId) -> Option<SimTime> {
        self.precedence
            .predecessors(segment)
            .iter()
            .try_fold(SimTime::ZERO, |acc, pred| self.completed.get(pred).map(|&t| acc.max(t)))
    }

    /// Queue `agent`'s head task, or park it if its predecessors are pending.
    fn enqueue(&mut self, agent: AgentId) -> PlanResult<()> {
        let Some(task) = self.head_task(agent) else {
            return Ok(());
        };
        let Some(ready) = self.ready_time(task.segment) else {
            self.blocked.insert(agent);
            return Ok(());
        };
        let chain = self.tentative(task, ready, SimTime::ZERO)?;
        self.queue.push(chain.process.start(), agent, task.order);
        self.pending.insert(agent, chain);
        Ok(())
    }

    /// Re-examine parked agents after a commit.
    fn release_blocked(&mut self) -> PlanResult<()> {
        let parked: Vec<AgentId> = self.blocked.iter().copied().collect();
        for agent in parked {
            let Some(task) = self.head_task(agent) else { continue };
            if self.ready_time(task.segment).is_some() {
                self.blocked.remove(&agent);
                self.enqueue(agent)?;
            }
        }
        Ok(())
    }

    /// Build the chain for `task` leaving no earlier than `not_before`.
    ///
    /// ```text
    /// chain start   = max(cursor time, ready - travel duration, not_before)
    /// process start = max(chain start + travel duration, ready)
    /// ```
    ///
    /// An agent on its way home counts as free from the start of that trip
    /// and sets off from wherever the trip has taken it by the chain start.
    fn tentative(&self, task: Task, ready: SimTime, not_before: SimTime) -> PlanResult<Chain> {
        let agent = self.descriptor(task.agent)?;
        let segment: &Segment = self.toolpath.get(task.segment)?;
        let timeline = self.builder.timeline(task.agent)?;
        let retract = self.config.retract_height;

        let homing = if self.homing.contains(&task.agent) { timeline.last() } else { None };
        let (now, pose) = match homing {
            Some(trip) => (trip.start(), trip.start_pose()),
            None => timeline.cursor(),
        };
        let estimate = path_length(&approach_path(pose, segment.start(), retract)) / agent.travel_speed;
        let chain_start = now.max(SimTime(ready.secs() - estimate)).max(not_before);
        let pose = homing.map_or(pose, |trip| trip.pose_at(chain_start));

        let approach = approach_path(pose, segment.start(), retract);
        let travel_secs = path_length(&approach) / agent.travel_speed;
        let process_start = (chain_start + travel_secs).max(ready);
        let travel = Motion::timed(approach, chain_start, process_start)?;
        let process = Motion::at_speed(segment.points().to_vec(), process_start, agent.process_speed)?;

        let depart = if retract > 0.0 {
            let from = process.end_pose();
            Some(Motion::at_speed(vec![from, from.raised(retract)], process.end(), agent.travel_speed)?)
        } else {
            None
        };
        let (left_at, left_from) = depart
            .as_ref()
            .map_or((process.end(), process.end_pose()), |m| (m.end(), m.end_pose()));
        let back = if self.config.return_home && left_from != agent.home {
            Some(Motion::at_speed(vec![left_from, agent.home], left_at, agent.travel_speed)?)
        } else {
            None
        };

        Ok(Chain { task, ready, travel, process, depart, back })
    }

    /// Latest committed end among the other working agents, or `end` if
    /// that is later.  A chain must stay clear of everyone up to here.
    fn horizon(&self, agent: AgentId, end: SimTime) -> SimTime {
        self.working
            .iter()
            .filter(|&&a| a != agent)
            .filter_map(|&a| self.builder.timeline(a).ok()?.end_time())
            .fold(end, SimTime::max)
    }

    /// Delay `chain` until it clears every other working agent.
    ///
    /// A blocker with a committed end moves the chain past that end.  A
    /// blocker parked for good with work still ahead is waited out; one
    /// with nothing left to do can never be cleared.
    fn resolve_conflicts(&mut self, chain: &mut Chain) -> PlanResult<Resolution> {
        let roster = self.roster;
        let agent = chain.task.agent;
        let own = &roster.get(agent).ok_or(PlanError::UnknownAgent(agent))?.geometry;
        let dt = self.config.sample_dt;

        loop {
            let horizon = self.horizon(agent, chain.end());
            let tail = if horizon > chain.end() {
                Some(Motion::timed(vec![chain.last().end_pose()], chain.end(), horizon)?)
            } else {
                None
            };
            let mut stretches = chain.stretches();
            if let Some(tail) = &tail {
                stretches.push(Stretch { phase: Phase::Holding, motion: tail });
            }
            let checker = Checker {
                predicate: self.predicate,
                roster,
                committed: &self.builder,
                working: &self.working,
                dt,
                max_gap: self.config.max_sample_gap,
            };
            let Some(conflict) = checker.find_conflict(chain.task_ref(), own, &stretches)? else {
                return Ok(Resolution::Clear);
            };

            let attempts = {
                let n = self.attempts.entry(agent).or_insert(0);
                *n += 1;
                *n
            };
            self.observer.on_conflict(&conflict);
            trace!(
                event = "plan.conflict",
                task = %conflict.task,
                phase = %conflict.phase,
                blocker = %conflict.blocker,
                at = conflict.at.secs(),
                attempt = attempts,
            );

            if attempts > self.config.max_retries {
                return Err(self.infeasible(&conflict, chain, attempts));
            }

            match conflict.delay(dt) {
                Some(delay) => {
                    *chain = self.tentative(chain.task, chain.ready, chain.start() + delay)?;
                    self.stats.conflicts += 1;
                }
                None => {
                    let Some(delay) = self.wait_for(conflict.blocker, chain) else {
                        return Err(self.infeasible(&conflict, chain, attempts));
                    };
                    *chain = self.tentative(chain.task, chain.ready, chain.start() + delay)?;
                    self.stats.conflicts += 1;
                    debug!(
                        event = "plan.deferred",
                        task = %conflict.task,
                        blocker = %conflict.blocker,
                        until = chain.process.start().secs(),
                    );
                    return Ok(Resolution::Deferred);
                }
            }
        }
    }

    /// Delay that lets a parked `blocker` go first: past the process start of
    /// its queued chain, or one sample step while it waits on precedence.
    /// `None` if it has no task left.
    fn wait_for(&self, blocker: AgentId, chain: &Chain) -> Option<f64> {
        let dt = self.config.sample_dt;
        if let Some(theirs) = self.pending.get(&blocker) {
            return Some((theirs.process.start() - chain.process.start()).max(0.0) + dt);
        }
        self.head_task(blocker).map(|_| dt)
    }

    fn infeasible(&self, conflict: &Conflict, chain: &Chain, attempts: u32) -> PlanError {
        warn!(
            event = "plan.infeasible",
            task = %conflict.task,
            blocker = %conflict.blocker,
            attempts,
        );
        PlanError::SchedulingInfeasible {
            task: conflict.task,
            blocker: conflict.blocker,
            blocker_segment: conflict.blocker_segment,
            last_start: chain.process.start(),
            attempts,
        }
    }

    fn commit(&mut self, chain: Chain) -> PlanResult<()> {
        let Chain { task, travel, process, depart, back, .. } = chain;
        let agent = task.agent;

        if self.homing.remove(&agent) {
            self.builder.cut_short(agent, travel.start())?;
        }

        let moves = travel.length() > 0.0;
        if moves {
            self.push(Event::travel(agent, task.segment, travel))?;
        }

        let end = process.end();
        let event = Event::process(agent, task.segment, process);
        debug!(
            event = "plan.commit",
            agent = %agent,
            segment = %task.segment,
            start = event.start().secs(),
            end = end.secs(),
            travel = moves,
        );
        self.push(event)?;
        self.completed.insert(task.segment, end);

        if back.is_some() {
            self.homing.insert(agent);
        }
        for motion in depart.into_iter().chain(back) {
            self.push(Event::travel(agent, task.segment, motion))?;
        }
        Ok(())
    }

    fn push(&mut self, event: Event) -> PlanResult<()> {
        self.builder.push(event.clone())?;
        self.observer.on_commit(&event);
        Ok(())
    }
}
