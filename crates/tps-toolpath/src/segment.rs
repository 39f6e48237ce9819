//! One contiguous contour traversed with a single tool.

use tps_core::{Capability, Point3, path_length};

use crate::{ToolpathError, ToolpathResult};

/// An immutable, non-empty ordered point sequence plus the capability
/// required to traverse it.
///
/// A single-point segment is legal: it is a zero-length contour (a spot
/// operation) and schedules as an instantaneous process event.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawSegment"))]
pub struct Segment {
    points:     Vec<Point3>,
    capability: Capability,
}

impl Segment {
    pub fn new(points: Vec<Point3>, capability: Capability) -> ToolpathResult<Self> {
        if points.is_empty() {
            return Err(ToolpathError::EmptySegment);
        }
        if !points.iter().all(|p| p.is_finite()) {
            return Err(ToolpathError::NonFinitePoint);
        }
        Ok(Self { points, capability })
    }

    #[inline]
    pub fn capability(&self) -> Capability {
        self.capability
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    /// First point: where an agent must be to begin processing.
    #[inline]
    pub fn start(&self) -> Point3 {
        self.points[0]
    }

    /// Last point: where the agent is when processing finishes.
    #[inline]
    pub fn end(&self) -> Point3 {
        self.points[self.points.len() - 1]
    }

    pub fn length(&self) -> f64 {
        path_length(&self.points)
    }

    // Transforms keep the invariant (non-empty, finite for finite inputs)
    // so they skip re-validation.

    pub(crate) fn map_points(&self, f: impl Fn(Point3) -> Point3) -> Segment {
        Segment {
            points:     self.points.iter().copied().map(f).collect(),
            capability: self.capability,
        }
    }

    pub(crate) fn with_capability(&self, capability: Capability) -> Segment {
        Segment { points: self.points.clone(), capability }
    }
}

/// Wire form of [`Segment`]; decoding re-runs [`Segment::new`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawSegment {
    points:     Vec<Point3>,
    capability: Capability,
}

#[cfg(feature = "serde")]
impl TryFrom<RawSegment> for Segment {
    type Error = ToolpathError;

    fn try_from(raw: RawSegment) -> ToolpathResult<Self> {
        Segment::new(raw.points, raw.capability)
    }
}
