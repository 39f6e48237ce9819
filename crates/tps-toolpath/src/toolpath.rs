//! The ordered segment collection handed to the allocator.
//!
//! Segment order matters: when two segments end up on the same agent, the
//! earlier one is processed first (layer-by-layer deposition relies on it).

use std::collections::{BTreeMap, BTreeSet};

use tps_core::{Capability, Point3, SegmentId};

use crate::{Segment, ToolpathError, ToolpathResult};

/// An ordered sequence of [`Segment`]s addressed by [`SegmentId`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Toolpath {
    segments: Vec<Segment>,
}

impl Toolpath {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Append a segment and return its id.
    pub fn push(&mut self, segment: Segment) -> SegmentId {
        let id = SegmentId(self.segments.len() as u32);
        self.segments.push(segment);
        id
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, id: SegmentId) -> ToolpathResult<&Segment> {
        self.segments
            .get(id.index())
            .ok_or(ToolpathError::UnknownSegment(id))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// `(SegmentId, &Segment)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentId, &Segment)> + '_ {
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| (SegmentId(i as u32), s))
    }

    /// The distinct capabilities required by this toolpath.
    pub fn capabilities(&self) -> BTreeSet<Capability> {
        self.segments.iter().map(Segment::capability).collect()
    }

    /// Total processing length over all segments.
    pub fn total_length(&self) -> f64 {
        self.segments.iter().map(Segment::length).sum()
    }

    // ── Transforms ────────────────────────────────────────────────────────

    /// Concatenate several toolpaths; ids are renumbered in the new order.
    pub fn combine<'a>(parts: impl IntoIterator<Item = &'a Toolpath>) -> Toolpath {
        Toolpath {
            segments: parts
                .into_iter()
                .flat_map(|t| t.segments.iter().cloned())
                .collect(),
        }
    }

    /// Every point scaled uniformly about the origin.
    pub fn scaled(&self, factor: f64) -> ToolpathResult<Toolpath> {
        if !factor.is_finite() {
            return Err(ToolpathError::NonFinitePoint);
        }
        Ok(self.map_points(|p| p.scaled(factor)))
    }

    /// Every point offset by `delta`.
    pub fn translated(&self, delta: Point3) -> ToolpathResult<Toolpath> {
        if !delta.is_finite() {
            return Err(ToolpathError::NonFinitePoint);
        }
        Ok(self.map_points(|p| p + delta))
    }

    /// Re-tag segments whose capability appears in `map`; others keep theirs.
    ///
    /// Used when a cell swaps one tool for an equivalent one.
    pub fn with_capability_map(&self, map: &BTreeMap<Capability, Capability>) -> Toolpath {
        Toolpath {
            segments: self
                .segments
                .iter()
                .map(|s| match map.get(&s.capability()) {
                    Some(&to) => s.with_capability(to),
                    None => s.clone(),
                })
                .collect(),
        }
    }

    fn map_points(&self, f: impl Fn(Point3) -> Point3 + Copy) -> Toolpath {
        Toolpath {
            segments: self.segments.iter().map(|s| s.map_points(f)).collect(),
        }
    }
}

impl FromIterator<Segment> for Toolpath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Toolpath { segments: iter.into_iter().collect() }
    }
}
