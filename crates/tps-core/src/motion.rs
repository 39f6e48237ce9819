//! Timed polyline motion.
//!
//! A `Motion` is the physical content of one scheduled event: the tool
//! centre point moves along `waypoints` at constant speed, leaving the first
//! waypoint at `start` and reaching the last one at `end`.
//!
//! ```text
//! pose_at(t) = point at arc length  L · (t - start) / (end - start)
//! ```
//!
//! Outside `[start, end]` the pose is clamped to the nearest endpoint, which
//! is where the agent physically waits.

use crate::{CoreError, CoreResult, Point3, SimTime, path_length};

/// Constant-speed traversal of a polyline over a closed time interval.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMotion"))]
pub struct Motion {
    waypoints: Vec<Point3>,
    start:     SimTime,
    end:       SimTime,
    length:    f64,
}

impl Motion {
    /// Traverse `waypoints` at `speed` (units per second) from `start`.
    pub fn at_speed(waypoints: Vec<Point3>, start: SimTime, speed: f64) -> CoreResult<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(CoreError::InvalidSpeed(speed));
        }
        let length = path_length(&waypoints);
        Self::timed(waypoints, start, start + length / speed)
    }

    /// Traverse `waypoints` between explicit `start` and `end` instants.
    pub fn timed(waypoints: Vec<Point3>, start: SimTime, end: SimTime) -> CoreResult<Self> {
        if waypoints.is_empty() {
            return Err(CoreError::EmptyPath);
        }
        if !waypoints.iter().all(|p| p.is_finite()) {
            return Err(CoreError::NonFinite("waypoints"));
        }
        if !(start.secs().is_finite() && end.secs().is_finite()) {
            return Err(CoreError::NonFinite("motion interval"));
        }
        if end < start {
            return Err(CoreError::InvertedInterval { start: start.secs(), end: end.secs() });
        }
        let length = path_length(&waypoints);
        Ok(Self { waypoints, start, end, length })
    }

    #[inline]
    pub fn start(&self) -> SimTime {
        self.start
    }

    #[inline]
    pub fn end(&self) -> SimTime {
        self.end
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Arc length of the polyline.
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Travel speed along the polyline; `0` for an instantaneous or
    /// stationary motion.
    pub fn speed(&self) -> f64 {
        let duration = self.duration();
        if duration > 0.0 { self.length / duration } else { 0.0 }
    }

    pub fn waypoints(&self) -> &[Point3] {
        &self.waypoints
    }

    #[inline]
    pub fn start_pose(&self) -> Point3 {
        self.waypoints[0]
    }

    #[inline]
    pub fn end_pose(&self) -> Point3 {
        self.waypoints[self.waypoints.len() - 1]
    }

    /// The same motion moved `dt` seconds later.
    pub fn shifted(&self, dt: f64) -> Motion {
        Motion {
            waypoints: self.waypoints.clone(),
            start:     self.start + dt,
            end:       self.end + dt,
            length:    self.length,
        }
    }

    /// The part of this motion up to `t`: same start and speed, ending at
    /// `pose_at(t)`.  Returns a copy when `t` is at or past the end.
    pub fn until(&self, t: SimTime) -> Motion {
        if t >= self.end {
            return self.clone();
        }
        let t = t.max(self.start);
        let cut = self.pose_at(t);
        let duration = self.duration();
        let target = if duration > 0.0 { self.length * ((t - self.start) / duration) } else { 0.0 };

        let mut waypoints = vec![self.start_pose()];
        let mut walked = 0.0;
        for w in self.waypoints.windows(2) {
            let leg = w[0].distance(w[1]);
            if walked + leg >= target {
                break;
            }
            walked += leg;
            waypoints.push(w[1]);
        }
        if waypoints.last() != Some(&cut) {
            waypoints.push(cut);
        }
        let length = path_length(&waypoints);
        Motion { waypoints, start: self.start, end: t, length }
    }

    /// `true` if `t` lies in the closed interval `[start, end]`.
    #[inline]
    pub fn contains(&self, t: SimTime) -> bool {
        self.start <= t && t <= self.end
    }

    /// The closed intersection of the two intervals, or `None` if disjoint.
    ///
    /// Intervals that merely touch (`a.end == b.start`) overlap at that
    /// single instant.
    pub fn overlap(&self, other: &Motion) -> Option<(SimTime, SimTime)> {
        let lo = self.start.max(other.start);
        let hi = self.end.min(other.end);
        (lo <= hi).then_some((lo, hi))
    }

    /// Interpolated pose at `t`, clamped to the endpoints outside the interval.
    pub fn pose_at(&self, t: SimTime) -> Point3 {
        if t <= self.start {
            return self.start_pose();
        }
        let duration = self.duration();
        if t >= self.end || duration <= 0.0 || self.length <= 0.0 {
            return self.end_pose();
        }

        let mut remaining = self.length * ((t - self.start) / duration);
        for w in self.waypoints.windows(2) {
            let leg = w[0].distance(w[1]);
            if remaining <= leg {
                let s = if leg > 0.0 { remaining / leg } else { 0.0 };
                return w[0].lerp(w[1], s);
            }
            remaining -= leg;
        }
        self.end_pose()
    }
}

/// Wire form of [`Motion`]; deserialization goes back through
/// [`Motion::timed`] so a decoded motion is never empty or inverted.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMotion {
    waypoints: Vec<Point3>,
    start:     SimTime,
    end:       SimTime,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMotion> for Motion {
    type Error = CoreError;

    fn try_from(raw: RawMotion) -> CoreResult<Self> {
        Motion::timed(raw.waypoints, raw.start, raw.end)
    }
}
