//! Per-agent static configuration.

use std::collections::BTreeSet;

use tps_core::{AgentId, Capability, Point3};

use crate::{AgentError, AgentResult};

/// Everything the planner needs to know about one agent.
///
/// Configured once before planning and never mutated by the planner.
/// Construct with [`AgentDescriptor::new`] and the `with_*` setters; the
/// [`RosterBuilder`][crate::RosterBuilder] validates it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentDescriptor<G> {
    pub id: AgentId,

    /// Tags this agent can process.  Must be non-empty.
    pub capabilities: BTreeSet<Capability>,

    /// Origin of the agent's own frame (robot base) in the cell frame.
    pub base: Point3,

    /// Resting pose; every agent starts the plan here.
    pub home: Point3,

    /// Speed while traversing a segment (units per second).
    pub process_speed: f64,

    /// Rapid, non-processing speed between segments.
    pub travel_speed: f64,

    /// Opaque collision geometry, passed through to the predicate.
    pub geometry: G,
}

impl<G> AgentDescriptor<G> {
    /// A descriptor with unit speeds, base and home at the origin, and no
    /// capabilities yet.
    pub fn new(id: AgentId, geometry: G) -> Self {
        Self {
            id,
            capabilities:  BTreeSet::new(),
            base:          Point3::ORIGIN,
            home:          Point3::ORIGIN,
            process_speed: 1.0,
            travel_speed:  1.0,
            geometry,
        }
    }

    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capabilities.insert(capability);
        self
    }

    pub fn with_capabilities(mut self, caps: impl IntoIterator<Item = Capability>) -> Self {
        self.capabilities.extend(caps);
        self
    }

    pub fn with_base(mut self, base: Point3) -> Self {
        self.base = base;
        self
    }

    pub fn with_home(mut self, home: Point3) -> Self {
        self.home = home;
        self
    }

    pub fn with_speeds(mut self, process_speed: f64, travel_speed: f64) -> Self {
        self.process_speed = process_speed;
        self.travel_speed = travel_speed;
        self
    }

    /// `true` if this agent holds `capability`.
    #[inline]
    pub fn can_perform(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Check the invariants the planner relies on.
    pub fn validate(&self) -> AgentResult<()> {
        if self.capabilities.is_empty() {
            return Err(AgentError::NoCapabilities(self.id));
        }
        for (what, got) in [("process", self.process_speed), ("travel", self.travel_speed)] {
            if !(got.is_finite() && got > 0.0) {
                return Err(AgentError::InvalidSpeed { agent: self.id, what, got });
            }
        }
        for (what, pose) in [("base", self.base), ("home", self.home)] {
            if !pose.is_finite() {
                return Err(AgentError::NonFinitePose { agent: self.id, what });
            }
        }
        Ok(())
    }
}
