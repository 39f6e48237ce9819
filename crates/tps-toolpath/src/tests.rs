//! Unit tests for tps-toolpath.

use tps_core::{Capability, Point3, SegmentId};

use crate::{Precedence, Segment, Toolpath, ToolpathError};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn line(from: (f64, f64, f64), to: (f64, f64, f64), tool: u32) -> Segment {
    Segment::new(
        vec![Point3::new(from.0, from.1, from.2), Point3::new(to.0, to.1, to.2)],
        Capability(tool),
    )
    .unwrap()
}

/// Two square-ish layers: two contours at z = 0, two at z = 1.
fn two_layers() -> Toolpath {
    Toolpath::new(vec![
        line((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), 0),
        line((0.0, 1.0, 0.0), (1.0, 1.0, 0.0), 1),
        line((0.0, 0.0, 1.0), (1.0, 0.0, 1.0), 0),
        line((0.0, 1.0, 1.0), (1.0, 1.0, 1.0), 1),
    ])
}

// ── Segment ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod segment {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert_eq!(
            Segment::new(vec![], Capability(0)),
            Err(ToolpathError::EmptySegment)
        );
    }

    #[test]
    fn rejects_non_finite() {
        let p = Point3::new(f64::NAN, 0.0, 0.0);
        assert_eq!(
            Segment::new(vec![p], Capability(0)),
            Err(ToolpathError::NonFinitePoint)
        );
    }

    #[test]
    fn endpoints_and_length() {
        let s = Segment::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
                Point3::new(3.0, 4.0, 0.0),
            ],
            Capability(2),
        )
        .unwrap();
        assert_eq!(s.start(), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(s.end(), Point3::new(3.0, 4.0, 0.0));
        assert_eq!(s.length(), 7.0);
        assert_eq!(s.capability(), Capability(2));
    }

    #[test]
    fn single_point_is_zero_length() {
        let s = Segment::new(vec![Point3::new(1.0, 1.0, 1.0)], Capability(0)).unwrap();
        assert_eq!(s.length(), 0.0);
        assert_eq!(s.start(), s.end());
    }
}

// ── Toolpath ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod toolpath {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn push_assigns_sequential_ids() {
        let mut tp = Toolpath::empty();
        assert_eq!(tp.push(line((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), 0)), SegmentId(0));
        assert_eq!(tp.push(line((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), 0)), SegmentId(1));
        assert_eq!(tp.len(), 2);
    }

    #[test]
    fn get_out_of_range() {
        let tp = two_layers();
        assert!(tp.get(SegmentId(3)).is_ok());
        assert_eq!(tp.get(SegmentId(4)), Err(ToolpathError::UnknownSegment(SegmentId(4))));
    }

    #[test]
    fn capabilities_are_distinct() {
        let caps: Vec<Capability> = two_layers().capabilities().into_iter().collect();
        assert_eq!(caps, vec![Capability(0), Capability(1)]);
    }

    #[test]
    fn combine_renumbers() {
        let a = two_layers();
        let b = Toolpath::new(vec![line((5.0, 5.0, 5.0), (6.0, 5.0, 5.0), 3)]);
        let c = Toolpath::combine([&a, &b]);
        assert_eq!(c.len(), 5);
        assert_eq!(c.get(SegmentId(4)).unwrap().capability(), Capability(3));
    }

    #[test]
    fn scale_and_translate() {
        let tp = Toolpath::new(vec![line((1.0, 0.0, 0.0), (2.0, 0.0, 0.0), 0)]);
        let scaled = tp.scaled(10.0).unwrap();
        assert_eq!(scaled.get(SegmentId(0)).unwrap().end(), Point3::new(20.0, 0.0, 0.0));
        let moved = tp.translated(Point3::new(0.0, 0.0, 5.0)).unwrap();
        assert_eq!(moved.get(SegmentId(0)).unwrap().start(), Point3::new(1.0, 0.0, 5.0));
        assert!(tp.scaled(f64::INFINITY).is_err());
    }

    #[test]
    fn capability_substitution() {
        let mut map = BTreeMap::new();
        map.insert(Capability(1), Capability(9));
        let tp = two_layers().with_capability_map(&map);
        let caps: Vec<Capability> = tp.capabilities().into_iter().collect();
        assert_eq!(caps, vec![Capability(0), Capability(9)]);
    }
}

// ── Precedence ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod precedence {
    use super::*;

    #[test]
    fn add_requires_forward_edges() {
        let mut p = Precedence::unconstrained(3);
        assert!(p.add(SegmentId(0), SegmentId(2)).is_ok());
        assert_eq!(
            p.add(SegmentId(2), SegmentId(1)),
            Err(ToolpathError::PrecedenceOrder { before: SegmentId(2), after: SegmentId(1) })
        );
        assert_eq!(
            p.add(SegmentId(1), SegmentId(1)),
            Err(ToolpathError::PrecedenceOrder { before: SegmentId(1), after: SegmentId(1) })
        );
        assert_eq!(
            p.add(SegmentId(0), SegmentId(7)),
            Err(ToolpathError::UnknownSegment(SegmentId(7)))
        );
    }

    #[test]
    fn duplicate_edges_ignored() {
        let mut p = Precedence::unconstrained(2);
        p.add(SegmentId(0), SegmentId(1)).unwrap();
        p.add(SegmentId(0), SegmentId(1)).unwrap();
        assert_eq!(p.edge_count(), 1);
        assert_eq!(p.predecessors(SegmentId(1)), &[SegmentId(0)]);
        assert!(p.predecessors(SegmentId(0)).is_empty());
        assert!(p.predecessors(SegmentId(99)).is_empty());
    }

    #[test]
    fn layers_depend_on_layer_below() {
        let p = Precedence::by_layers(&two_layers(), 1e-6).unwrap();
        assert!(p.predecessors(SegmentId(0)).is_empty());
        assert!(p.predecessors(SegmentId(1)).is_empty());
        assert_eq!(p.predecessors(SegmentId(2)), &[SegmentId(0), SegmentId(1)]);
        assert_eq!(p.predecessors(SegmentId(3)), &[SegmentId(0), SegmentId(1)]);
        assert_eq!(p.edge_count(), 4);
    }

    #[test]
    fn layer_tolerance_merges_close_heights() {
        let tp = Toolpath::new(vec![
            line((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), 0),
            line((0.0, 0.0, 0.01), (1.0, 0.0, 0.01), 0),
            line((0.0, 0.0, 1.0), (1.0, 0.0, 1.0), 0),
        ]);
        let p = Precedence::by_layers(&tp, 0.05).unwrap();
        assert!(p.predecessors(SegmentId(1)).is_empty());
        assert_eq!(p.predecessors(SegmentId(2)), &[SegmentId(0), SegmentId(1)]);
    }

    #[test]
    fn unsorted_layers_rejected() {
        let tp = Toolpath::new(vec![
            line((0.0, 0.0, 1.0), (1.0, 0.0, 1.0), 0),
            line((0.0, 0.0, 0.0), (1.0, 0.0, 0.0), 0),
        ]);
        assert!(matches!(
            Precedence::by_layers(&tp, 0.0),
            Err(ToolpathError::PrecedenceOrder { .. })
        ));
    }

    #[test]
    fn depths_follow_longest_chain() {
        // 0 → 2, 1 → 2, 2 → 3, 0 → 3: segment 3 sits two levels deep.
        let mut p = Precedence::unconstrained(5);
        p.add(SegmentId(0), SegmentId(2)).unwrap();
        p.add(SegmentId(1), SegmentId(2)).unwrap();
        p.add(SegmentId(2), SegmentId(3)).unwrap();
        p.add(SegmentId(0), SegmentId(3)).unwrap();
        assert_eq!(p.depths(), vec![0, 0, 1, 2, 0]);
        assert_eq!(
            p.strata(),
            vec![
                vec![SegmentId(0), SegmentId(1), SegmentId(4)],
                vec![SegmentId(2)],
                vec![SegmentId(3)],
            ]
        );
    }

    #[test]
    fn layer_strata_match_layers() {
        let p = Precedence::by_layers(&two_layers(), 1e-6).unwrap();
        assert_eq!(
            p.strata(),
            vec![vec![SegmentId(0), SegmentId(1)], vec![SegmentId(2), SegmentId(3)]]
        );
        assert!(Precedence::unconstrained(0).strata().is_empty());
    }

    #[test]
    fn negative_tolerance_rejected() {
        assert_eq!(
            Precedence::by_layers(&two_layers(), -1.0),
            Err(ToolpathError::InvalidTolerance(-1.0))
        );
    }
}

// ── Wire format ───────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "serde"))]
mod wire {
    use super::*;

    #[test]
    fn toolpath_roundtrips() {
        let tp = two_layers();
        let json = serde_json::to_string(&tp).unwrap();
        assert_eq!(serde_json::from_str::<Toolpath>(&json).unwrap(), tp);
    }

    #[test]
    fn empty_segment_fails_to_decode() {
        let json = r#"{"segments":[{"points":[],"capability":0}]}"#;
        assert!(serde_json::from_str::<Toolpath>(json).is_err());
    }

    #[test]
    fn non_finite_point_fails_to_decode() {
        // JSON has no NaN literal; an out-of-range exponent is the closest.
        let json = r#"{"points":[{"x":1e999,"y":0.0,"z":0.0}],"capability":0}"#;
        assert!(serde_json::from_str::<Segment>(json).is_err());
    }

    #[test]
    fn backward_precedence_fails_to_decode() {
        let ok = r#"{"preds":[[],[0]]}"#;
        assert_eq!(serde_json::from_str::<Precedence>(ok).unwrap().edge_count(), 1);
        let backward = r#"{"preds":[[1],[]]}"#;
        assert!(serde_json::from_str::<Precedence>(backward).is_err());
        let dangling = r#"{"preds":[[],[7]]}"#;
        assert!(serde_json::from_str::<Precedence>(dangling).is_err());
    }
}
