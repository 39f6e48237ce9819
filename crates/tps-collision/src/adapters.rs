//! Reference predicate implementations.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use tps_core::Point3;

use crate::CollisionPredicate;

// ── NeverCollide ──────────────────────────────────────────────────────────────

/// Agents never collide.  Useful for cells with physically separated work
/// envelopes and for timing-only tests.
#[derive(Copy, Clone, Debug, Default)]
pub struct NeverCollide;

impl CollisionPredicate for NeverCollide {
    type Geometry = ();

    #[inline]
    fn in_collision(&self, _a: &(), _pose_a: Point3, _b: &(), _pose_b: Point3) -> bool {
        false
    }
}

// ── SphereClearance ───────────────────────────────────────────────────────────

/// Bounding sphere around the tool centre point.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub radius: f64,
}

impl Sphere {
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }
}

/// Two spheres collide when their centres are closer than the sum of their
/// radii plus `margin`.  Touching spheres (distance exactly equal) are clear.
#[derive(Copy, Clone, Debug, Default)]
pub struct SphereClearance {
    pub margin: f64,
}

impl SphereClearance {
    pub fn with_margin(margin: f64) -> Self {
        Self { margin }
    }
}

impl CollisionPredicate for SphereClearance {
    type Geometry = Sphere;

    #[inline]
    fn in_collision(&self, a: &Sphere, pose_a: Point3, b: &Sphere, pose_b: Point3) -> bool {
        pose_a.distance(pose_b) < a.radius + b.radius + self.margin
    }
}

// ── FnPredicate ───────────────────────────────────────────────────────────────

/// Adapts a closure into a [`CollisionPredicate`].
///
/// ```rust
/// use tps_collision::{CollisionPredicate, FnPredicate};
/// use tps_core::Point3;
///
/// // Agents collide whenever they are on the same side of x = 0.
/// let same_side = FnPredicate::new(|_: &(), a: Point3, _: &(), b: Point3| (a.x < 0.0) == (b.x < 0.0));
/// assert!(same_side.in_collision(&(), Point3::new(1.0, 0.0, 0.0), &(), Point3::new(2.0, 0.0, 0.0)));
/// ```
pub struct FnPredicate<G, F> {
    f:         F,
    _geometry: PhantomData<fn(&G)>,
}

impl<G, F> FnPredicate<G, F>
where
    F: Fn(&G, Point3, &G, Point3) -> bool + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f, _geometry: PhantomData }
    }
}

impl<G, F> CollisionPredicate for FnPredicate<G, F>
where
    G: Send + Sync,
    F: Fn(&G, Point3, &G, Point3) -> bool + Send + Sync,
{
    type Geometry = G;

    #[inline]
    fn in_collision(&self, a: &G, pose_a: Point3, b: &G, pose_b: Point3) -> bool {
        (self.f)(a, pose_a, b, pose_b)
    }
}

// ── CountingPredicate ─────────────────────────────────────────────────────────

/// Wraps another predicate and counts how many times it was queried.
///
/// The counter is atomic so the wrapper stays usable under the `parallel`
/// feature.  Pass it to the planner by reference to read the count after
/// planning.
pub struct CountingPredicate<P> {
    inner:   P,
    queries: AtomicU64,
}

impl<P: CollisionPredicate> CountingPredicate<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, queries: AtomicU64::new(0) }
    }

    /// Number of `in_collision` calls so far.
    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.queries.store(0, Ordering::Relaxed);
    }

    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: CollisionPredicate> CollisionPredicate for CountingPredicate<P> {
    type Geometry = P::Geometry;

    fn in_collision(
        &self,
        a:      &Self::Geometry,
        pose_a: Point3,
        b:      &Self::Geometry,
        pose_b: Point3,
    ) -> bool {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.inner.in_collision(a, pose_a, b, pose_b)
    }
}
