//! Per-call planner configuration.

use tps_alloc::AllocationStrategy;

use crate::{PlanError, PlanResult};

/// Tunables for one planning call.
///
/// Every field has a default, and with the `serde` feature missing JSON keys
/// fall back to it:
///
/// ```json
/// { "sample_dt": 0.05, "max_retries": 200 }
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlanConfig {
    /// Collision sampling resolution in seconds.  Smaller is safer and slower.
    pub sample_dt: f64,

    /// Delay attempts allowed per task before planning fails.
    pub max_retries: u32,

    /// When positive, Travel rises to this height above the target segment's
    /// start before descending onto it, and every Process is followed by a
    /// vertical depart of the same height.
    pub retract_height: f64,

    /// Send each agent home after every task.  A later task cuts the homing
    /// move short, so agents only end up home when they have nothing left.
    pub return_home: bool,

    /// Largest distance either motion may cover between two collision
    /// samples.  Tightens `sample_dt` for fast motions; `None` leaves it as
    /// is.
    pub max_sample_gap: Option<f64>,

    /// Tie-break rule among agents that can all perform a segment.
    pub allocation: AllocationStrategy,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            sample_dt:      0.1,
            max_retries:    1000,
            retract_height: 0.0,
            return_home:    false,
            max_sample_gap: None,
            allocation:     AllocationStrategy::LeastLoaded,
        }
    }
}

impl PlanConfig {
    pub fn validate(&self) -> PlanResult<()> {
        if !(self.sample_dt.is_finite() && self.sample_dt > 0.0) {
            return Err(PlanError::Config(format!(
                "sample_dt must be positive and finite, got {}",
                self.sample_dt
            )));
        }
        if !(self.retract_height.is_finite() && self.retract_height >= 0.0) {
            return Err(PlanError::Config(format!(
                "retract_height must be non-negative and finite, got {}",
                self.retract_height
            )));
        }
        if let Some(gap) = self.max_sample_gap {
            if !(gap.is_finite() && gap > 0.0) {
                return Err(PlanError::Config(format!(
                    "max_sample_gap must be positive and finite, got {gap}"
                )));
            }
        }
        Ok(())
    }
}
