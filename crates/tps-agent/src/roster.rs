//! The validated set of agents taking part in one planning call.

use std::collections::BTreeMap;

use tps_core::{AgentId, Capability};

use crate::{AgentDescriptor, AgentError, AgentResult};

/// Agents keyed by id.  Iteration is always in ascending `AgentId` order,
/// which every deterministic tie-break downstream relies on.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentRoster<G> {
    agents: BTreeMap<AgentId, AgentDescriptor<G>>,
}

impl<G> AgentRoster<G> {
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentDescriptor<G>> {
        self.agents.get(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentDescriptor<G>> + '_ {
        self.agents.values()
    }

    /// Agents holding `capability`, ascending by id.
    pub fn capable_of(&self, capability: Capability) -> impl Iterator<Item = &AgentDescriptor<G>> + '_ {
        self.agents.values().filter(move |a| a.can_perform(capability))
    }
}

/// Fluent builder for [`AgentRoster`].
///
/// ```rust
/// use tps_agent::{AgentDescriptor, RosterBuilder};
/// use tps_core::{AgentId, Capability};
///
/// let roster = RosterBuilder::new()
///     .agent(AgentDescriptor::new(AgentId(0), ()).with_capability(Capability(0)))
///     .agent(AgentDescriptor::new(AgentId(1), ()).with_capability(Capability(1)))
///     .build()
///     .unwrap();
/// assert_eq!(roster.len(), 2);
/// ```
pub struct RosterBuilder<G> {
    agents: Vec<AgentDescriptor<G>>,
}

impl<G> Default for RosterBuilder<G> {
    fn default() -> Self {
        Self { agents: Vec::new() }
    }
}

impl<G> RosterBuilder<G> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agent(mut self, descriptor: AgentDescriptor<G>) -> Self {
        self.agents.push(descriptor);
        self
    }

    /// Validate every descriptor and reject duplicate ids.
    pub fn build(self) -> AgentResult<AgentRoster<G>> {
        let mut agents = BTreeMap::new();
        for descriptor in self.agents {
            descriptor.validate()?;
            let id = descriptor.id;
            if agents.insert(id, descriptor).is_some() {
                return Err(AgentError::Duplicate(id));
            }
        }
        Ok(AgentRoster { agents })
    }
}
