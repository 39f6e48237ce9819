//! Cross-segment precedence constraints.
//!
//! A constraint `before → after` means the *process* motion of `after` may
//! not start until the process motion of `before` has ended, regardless of
//! which agents perform them.  The typical source is additive manufacturing:
//! a contour may only be deposited once every contour of the layer beneath
//! it is finished.
//!
//! # Ordering rule
//!
//! Edges must point forward in path order (`before < after`).  Because the
//! allocator keeps every agent's list in path order, this guarantees the
//! pending task with the smallest `SegmentId` always has all predecessors
//! committed, so the scheduler can never stall.

use tps_core::SegmentId;

use crate::{ToolpathError, ToolpathResult, Toolpath};

/// Predecessor lists indexed by `SegmentId`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawPrecedence"))]
pub struct Precedence {
    preds: Vec<Vec<SegmentId>>,
}

impl Precedence {
    /// No constraints over `segment_count` segments.
    pub fn unconstrained(segment_count: usize) -> Self {
        Self { preds: vec![Vec::new(); segment_count] }
    }

    /// Number of segments this graph covers.
    pub fn segment_count(&self) -> usize {
        self.preds.len()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.preds.iter().map(Vec::len).sum()
    }

    /// Require `before` to finish processing before `after` starts.
    ///
    /// Duplicate edges are ignored.
    pub fn add(&mut self, before: SegmentId, after: SegmentId) -> ToolpathResult<()> {
        let n = self.preds.len();
        for id in [before, after] {
            if id.index() >= n {
                return Err(ToolpathError::UnknownSegment(id));
            }
        }
        if before >= after {
            return Err(ToolpathError::PrecedenceOrder { before, after });
        }
        let preds = &mut self.preds[after.index()];
        if !preds.contains(&before) {
            preds.push(before);
        }
        Ok(())
    }

    /// Segments that must finish before `id` may start.  Empty for ids
    /// outside the graph.
    pub fn predecessors(&self, id: SegmentId) -> &[SegmentId] {
        self.preds.get(id.index()).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Depth of every segment: `0` without predecessors, otherwise one more
    /// than its deepest predecessor.
    pub fn depths(&self) -> Vec<usize> {
        let mut depth = vec![0usize; self.preds.len()];
        // Forward edges: every predecessor's depth is final before it is read.
        for (i, preds) in self.preds.iter().enumerate() {
            depth[i] = preds
                .iter()
                .filter_map(|p| depth.get(p.index()))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
        }
        depth
    }

    /// Segments grouped by [`depth`](Self::depths), shallowest first, each
    /// group in path order.  Every predecessor of a group lies in an earlier
    /// group.
    pub fn strata(&self) -> Vec<Vec<SegmentId>> {
        let depths = self.depths();
        let mut strata: Vec<Vec<SegmentId>> = Vec::new();
        for (i, d) in depths.into_iter().enumerate() {
            if strata.len() <= d {
                strata.resize_with(d + 1, Vec::new);
            }
            strata[d].push(SegmentId(i as u32));
        }
        strata
    }

    /// Layer-by-layer dependencies from the z height of each segment's first
    /// point.
    ///
    /// Heights within `tolerance` of the current layer's first height join
    /// that layer.  Every segment of layer `k + 1` depends on every segment
    /// of layer `k`.  The toolpath must already be sorted by layer, otherwise
    /// [`ToolpathError::PrecedenceOrder`] is returned.
    pub fn by_layers(toolpath: &Toolpath, tolerance: f64) -> ToolpathResult<Self> {
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(ToolpathError::InvalidTolerance(tolerance));
        }

        // Sort ids by height (stable, so path order breaks ties).
        let mut by_z: Vec<(f64, SegmentId)> = toolpath
            .iter()
            .map(|(id, s)| (s.start().z, id))
            .collect();
        by_z.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut layers: Vec<Vec<SegmentId>> = Vec::new();
        let mut layer_z = f64::NEG_INFINITY;
        for (z, id) in by_z {
            match layers.last_mut() {
                Some(layer) if z - layer_z <= tolerance => layer.push(id),
                _ => {
                    layer_z = z;
                    layers.push(vec![id]);
                }
            }
        }

        let mut graph = Self::unconstrained(toolpath.len());
        for pair in layers.windows(2) {
            for &upper in &pair[1] {
                for &lower in &pair[0] {
                    graph.add(lower, upper)?;
                }
            }
        }
        Ok(graph)
    }
}

/// Wire form of [`Precedence`]; decoding re-checks the forward-edge rule.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawPrecedence {
    preds: Vec<Vec<SegmentId>>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawPrecedence> for Precedence {
    type Error = ToolpathError;

    fn try_from(raw: RawPrecedence) -> ToolpathResult<Self> {
        let mut graph = Precedence::unconstrained(raw.preds.len());
        for (i, preds) in raw.preds.into_iter().enumerate() {
            for before in preds {
                graph.add(before, SegmentId(i as u32))?;
            }
        }
        Ok(graph)
    }
}
