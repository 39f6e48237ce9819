//! Fluent builder for constructing a [`Planner`].

use tps_agent::AgentRoster;
use tps_alloc::AllocationStrategy;
use tps_collision::CollisionPredicate;

use crate::{PlanConfig, PlanResult, Planner};

/// Fluent builder for [`Planner<P>`].
///
/// # Required inputs
///
/// - [`AgentRoster`] — from [`tps_agent::RosterBuilder`]
/// - `P: CollisionPredicate` — whose `Geometry` matches the roster's
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                 |
/// |-------------------|-------------------------|
/// | `.config(c)`      | `PlanConfig::default()` |
/// | `.sample_dt(dt)`  | `0.1`                   |
/// | `.max_retries(k)` | `1000`                  |
/// | `.return_home(b)` | `false`                 |
///
/// # Example
///
/// ```rust,ignore
/// let planner = PlannerBuilder::new(roster, SphereClearance::default())
///     .sample_dt(0.05)
///     .build()?;
/// let schedule = planner.plan(&toolpath, &mut NoopObserver)?;
/// ```
pub struct PlannerBuilder<P: CollisionPredicate> {
    roster:    AgentRoster<P::Geometry>,
    predicate: P,
    config:    PlanConfig,
}

impl<P: CollisionPredicate> PlannerBuilder<P> {
    pub fn new(roster: AgentRoster<P::Geometry>, predicate: P) -> Self {
        Self { roster, predicate, config: PlanConfig::default() }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: PlanConfig) -> Self {
        self.config = config;
        self
    }

    pub fn sample_dt(mut self, dt: f64) -> Self {
        self.config.sample_dt = dt;
        self
    }

    pub fn max_retries(mut self, k: u32) -> Self {
        self.config.max_retries = k;
        self
    }

    pub fn retract_height(mut self, height: f64) -> Self {
        self.config.retract_height = height;
        self
    }

    pub fn return_home(mut self, yes: bool) -> Self {
        self.config.return_home = yes;
        self
    }

    pub fn max_sample_gap(mut self, gap: f64) -> Self {
        self.config.max_sample_gap = Some(gap);
        self
    }

    pub fn allocation(mut self, strategy: AllocationStrategy) -> Self {
        self.config.allocation = strategy;
        self
    }

    /// Validate the configuration and return a ready-to-use [`Planner`].
    pub fn build(self) -> PlanResult<Planner<P>> {
        self.config.validate()?;
        Ok(Planner {
            roster:    self.roster,
            predicate: self.predicate,
            config:    self.config,
        })
    }
}
