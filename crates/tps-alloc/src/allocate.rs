//! The allocation pass.

use std::collections::BTreeMap;

use tracing::debug;

use tps_agent::{AgentDescriptor, AgentRoster};
use tps_core::{AgentId, SegmentId};
use tps_toolpath::{Segment, Toolpath};

use crate::{AllocError, AllocResult, Allocation, AllocationStrategy};

/// Running totals used by the load-balancing strategies.
#[derive(Copy, Clone, Default)]
struct Load {
    segments: usize,
    work:     f64,
}

/// Partition `toolpath` across `roster`.
///
/// Coverage is checked for every segment before anything is assigned, so an
/// error never comes with a half-built allocation.  Segments are then
/// assigned in path order, which keeps each agent's list in path order.
pub fn allocate<G>(
    toolpath: &Toolpath,
    roster:   &AgentRoster<G>,
    strategy: AllocationStrategy,
) -> AllocResult<Allocation> {
    let all: Vec<SegmentId> = toolpath.iter().map(|(id, _)| id).collect();
    allocate_segments(toolpath, &all, roster, strategy)
}

/// Like [`allocate`], restricted to `segments` (taken in the order given).
/// Loads start from zero, so each call balances its subset on its own.
pub fn allocate_segments<G>(
    toolpath: &Toolpath,
    segments: &[SegmentId],
    roster:   &AgentRoster<G>,
    strategy: AllocationStrategy,
) -> AllocResult<Allocation> {
    // ── Coverage pre-pass ─────────────────────────────────────────────────
    let mut picked = Vec::with_capacity(segments.len());
    for &segment in segments {
        let s = toolpath.get(segment).map_err(|_| AllocError::UnknownSegment(segment))?;
        let capability = s.capability();
        if roster.capable_of(capability).next().is_none() {
            return Err(AllocError::CapabilityCoverage { segment, capability });
        }
        picked.push((segment, s));
    }

    // ── Greedy assignment ─────────────────────────────────────────────────
    let mut allocation = Allocation::with_agents(roster.ids());
    let mut loads: BTreeMap<AgentId, Load> = roster.ids().map(|a| (a, Load::default())).collect();

    for (segment, s) in picked {
        let Some(agent) = select(roster, &loads, s, strategy) else {
            // Unreachable after the coverage pass.
            return Err(AllocError::CapabilityCoverage { segment, capability: s.capability() });
        };
        if let Some(load) = loads.get_mut(&agent.id) {
            load.segments += 1;
            load.work += s.length() / agent.process_speed;
        }
        allocation.assign(agent.id, segment);
        debug!(event = "alloc.assign", segment = %segment, agent = %agent.id, ?strategy);
    }

    Ok(allocation)
}

/// Pick one capable agent for `segment`.  Candidates arrive in ascending id
/// order and only a strictly better score replaces the incumbent, so ties go
/// to the lowest id.
fn select<'r, G>(
    roster:   &'r AgentRoster<G>,
    loads:    &BTreeMap<AgentId, Load>,
    segment:  &Segment,
    strategy: AllocationStrategy,
) -> Option<&'r AgentDescriptor<G>> {
    let mut candidates = roster.capable_of(segment.capability());
    if strategy == AllocationStrategy::FirstCapable {
        return candidates.next();
    }

    let score = |a: &AgentDescriptor<G>| -> f64 {
        let load = loads.get(&a.id).copied().unwrap_or_default();
        match strategy {
            AllocationStrategy::LeastWork => load.work,
            _ => load.segments as f64,
        }
    };

    let mut best = candidates.next()?;
    let mut best_score = score(best);
    for candidate in candidates {
        let s = score(candidate);
        if s < best_score {
            best = candidate;
            best_score = s;
        }
    }
    Some(best)
}

