//! The collision oracle consumed by the scheduler.

use tps_core::Point3;

// ── CollisionPredicate trait ──────────────────────────────────────────────────

/// Pluggable geometric overlap test between two agents at fixed poses.
///
/// Implementations must be pure: the same inputs always give the same answer
/// and calls have no side effects the planner can observe.  The planner calls
/// this many times per run (once per sample instant per overlapping event
/// pair), so it should be cheap.
///
/// # Thread safety
///
/// `Send + Sync` so sampling can fan out across Rayon workers with the
/// `parallel` feature.
pub trait CollisionPredicate: Send + Sync {
    /// Per-agent geometry handle (tool envelope, link model…).  Opaque to the
    /// planner; it is stored on the agent descriptor and passed back here.
    type Geometry: Send + Sync;

    /// `true` if agent A at `pose_a` and agent B at `pose_b` overlap.
    fn in_collision(
        &self,
        a:      &Self::Geometry,
        pose_a: Point3,
        b:      &Self::Geometry,
        pose_b: Point3,
    ) -> bool;
}

impl<P: CollisionPredicate + ?Sized> CollisionPredicate for &P {
    type Geometry = P::Geometry;

    #[inline]
    fn in_collision(
        &self,
        a:      &Self::Geometry,
        pose_a: Point3,
        b:      &Self::Geometry,
        pose_b: Point3,
    ) -> bool {
        (**self).in_collision(a, pose_a, b, pose_b)
    }
}
