//! Discrete sampling of two motions over their common time window.
//!
//! # Sample grid
//!
//! For an overlap window `[lo, hi]` and resolution `dt` the instants are
//!
//! ```text
//! lo, lo + dt, lo + 2·dt, …  (all strictly below hi),  hi
//! ```
//!
//! Both endpoints are always included, and a degenerate window (`lo == hi`)
//! is sampled exactly once.  Coarser `dt` plans faster but can miss contacts
//! shorter than `dt`; [`sample_step`] tightens `dt` so neither motion moves
//! further than a distance cap between two samples.

use tps_core::{Motion, SimTime};

use crate::CollisionPredicate;

// ── Grid ──────────────────────────────────────────────────────────────────────

/// Lazy iterator over the sample instants of one window.
///
/// Created by [`sample_instants`].
#[derive(Clone, Debug)]
pub struct SampleInstants {
    lo:    SimTime,
    hi:    SimTime,
    dt:    f64,
    k:     usize,
    steps: usize,
    done:  bool,
}

impl Iterator for SampleInstants {
    type Item = SimTime;

    fn next(&mut self) -> Option<SimTime> {
        if self.done {
            return None;
        }
        if self.k < self.steps {
            // Multiplying rather than accumulating keeps the grid free of drift.
            let t = self.lo + self.k as f64 * self.dt;
            self.k += 1;
            if t < self.hi {
                return Some(t);
            }
            self.k = self.steps;
        }
        self.done = true;
        Some(self.hi)
    }
}

/// Sample instants across the closed window `[lo, hi]`.
///
/// Yields nothing if `hi < lo`.  A non-positive or non-finite `dt` degrades
/// to sampling the two endpoints only.
pub fn sample_instants(lo: SimTime, hi: SimTime, dt: f64) -> SampleInstants {
    let valid = dt.is_finite() && dt > 0.0;
    let steps = if hi <= lo {
        0
    } else if valid {
        ((hi - lo) / dt).ceil() as usize
    } else {
        1
    };
    SampleInstants {
        lo,
        hi,
        dt: if valid { dt } else { 0.0 },
        k: 0,
        steps,
        done: hi < lo,
    }
}

/// Resolution for one pair of motions: `dt`, shortened when `max_gap` is
/// set so the faster motion covers at most `max_gap` between samples.
pub fn sample_step(a: &Motion, b: &Motion, dt: f64, max_gap: Option<f64>) -> f64 {
    let Some(gap) = max_gap.filter(|g| g.is_finite() && *g > 0.0) else {
        return dt;
    };
    let fastest = a.speed().max(b.speed());
    if fastest > 0.0 { dt.min(gap / fastest) } else { dt }
}

// ── Contact search ────────────────────────────────────────────────────────────

/// Earliest sampled instant at which the two agents collide, or `None` if
/// their motions do not overlap in time or every sample is clear.
///
/// Poses come from [`Motion::pose_at`], which holds the endpoint poses
/// outside each motion's own interval.
pub fn first_contact<P: CollisionPredicate>(
    predicate: &P,
    a:         &Motion,
    geom_a:    &P::Geometry,
    b:         &Motion,
    geom_b:    &P::Geometry,
    dt:        f64,
) -> Option<SimTime> {
    let (lo, hi) = a.overlap(b)?;
    let hits = |t: &SimTime| predicate.in_collision(geom_a, a.pose_at(*t), geom_b, b.pose_at(*t));

    #[cfg(not(feature = "parallel"))]
    {
        sample_instants(lo, hi, dt).find(hits)
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        let instants: Vec<SimTime> = sample_instants(lo, hi, dt).collect();
        instants.into_par_iter().find_first(hits)
    }
}
