//! Unit tests for tps-core primitives.

#[cfg(test)]
mod ids {
    use crate::{AgentId, Capability, SegmentId};

    #[test]
    fn index_roundtrip() {
        let id = SegmentId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(SegmentId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(AgentId(0) < AgentId(1));
        assert!(Capability(7) > Capability(3));
    }

    #[test]
    fn display() {
        assert_eq!(AgentId(7).to_string(), "AgentId(7)");
        assert_eq!(SegmentId(2).to_string(), "SegmentId(2)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Point3, path_length};

    #[test]
    fn distance_345() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(3.0, 4.0, 0.0);
        assert_eq!(a.distance(b), 5.0);
    }

    #[test]
    fn lerp_midpoint() {
        let a = Point3::new(0.0, 0.0, 0.0);
        let b = Point3::new(2.0, -2.0, 4.0);
        assert_eq!(a.lerp(b, 0.5), Point3::new(1.0, -1.0, 2.0));
    }

    #[test]
    fn path_length_sums_legs() {
        let pts = [
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        assert_eq!(path_length(&pts), 2.0);
        assert_eq!(path_length(&pts[..1]), 0.0);
        assert_eq!(path_length(&[]), 0.0);
    }

    #[test]
    fn raised_only_moves_z() {
        let p = Point3::new(1.0, 2.0, 3.0).raised(10.0);
        assert_eq!(p, Point3::new(1.0, 2.0, 13.0));
    }
}

#[cfg(test)]
mod time {
    use crate::SimTime;

    #[test]
    fn arithmetic() {
        let t = SimTime(1.5);
        assert_eq!(t + 2.0, SimTime(3.5));
        assert_eq!(SimTime(3.5) - SimTime(1.5), 2.0);
        assert_eq!(SimTime(3.0).since(SimTime(1.0)), 2.0);
    }

    #[test]
    fn total_order() {
        let mut v = vec![SimTime(2.0), SimTime(0.0), SimTime(1.0)];
        v.sort();
        assert_eq!(v, vec![SimTime(0.0), SimTime(1.0), SimTime(2.0)]);
        assert_eq!(SimTime(1.0).max(SimTime(2.0)), SimTime(2.0));
        assert_eq!(SimTime(1.0).min(SimTime(2.0)), SimTime(1.0));
    }

    #[test]
    fn display() {
        assert_eq!(SimTime(1.25).to_string(), "t=1.250s");
    }
}

#[cfg(test)]
mod motion {
    use crate::{CoreError, Motion, Point3, SimTime};

    /// Two-leg vertical polyline:
    /// (0,1,0) → (0,0,0) → (0,-1,0), length 2.
    fn vertical_line() -> Vec<Point3> {
        vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ]
    }

    #[test]
    fn at_speed_sets_duration() {
        let m = Motion::at_speed(vertical_line(), SimTime(5.0), 2.0).unwrap();
        assert_eq!(m.start(), SimTime(5.0));
        assert_eq!(m.end(), SimTime(6.0));
        assert_eq!(m.length(), 2.0);
    }

    #[test]
    fn pose_interpolates_along_legs() {
        let m = Motion::at_speed(vertical_line(), SimTime(0.0), 1.0).unwrap();
        assert_eq!(m.pose_at(SimTime(0.5)), Point3::new(0.0, 0.5, 0.0));
        assert_eq!(m.pose_at(SimTime(1.0)), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(m.pose_at(SimTime(1.5)), Point3::new(0.0, -0.5, 0.0));
    }

    #[test]
    fn pose_clamps_outside_interval() {
        let m = Motion::at_speed(vertical_line(), SimTime(1.0), 1.0).unwrap();
        assert_eq!(m.pose_at(SimTime(-1.0)), Point3::new(0.0, 1.0, 0.0));
        assert_eq!(m.pose_at(SimTime(10.0)), Point3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn zero_length_is_instantaneous() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let m = Motion::at_speed(vec![p], SimTime(3.0), 10.0).unwrap();
        assert_eq!(m.duration(), 0.0);
        assert_eq!(m.pose_at(SimTime(3.0)), p);
    }

    #[test]
    fn rejects_bad_inputs() {
        assert_eq!(
            Motion::at_speed(vec![], SimTime::ZERO, 1.0),
            Err(CoreError::EmptyPath)
        );
        assert_eq!(
            Motion::at_speed(vertical_line(), SimTime::ZERO, 0.0),
            Err(CoreError::InvalidSpeed(0.0))
        );
        assert!(matches!(
            Motion::timed(vertical_line(), SimTime(2.0), SimTime(1.0)),
            Err(CoreError::InvertedInterval { .. })
        ));
    }

    #[test]
    fn speed_is_length_over_duration() {
        let m = Motion::at_speed(vertical_line(), SimTime(0.0), 4.0).unwrap();
        assert_eq!(m.speed(), 4.0);
        let hold = Motion::timed(vec![Point3::ORIGIN], SimTime(0.0), SimTime(9.0)).unwrap();
        assert_eq!(hold.speed(), 0.0);
        let spot = Motion::at_speed(vec![Point3::ORIGIN], SimTime(1.0), 1.0).unwrap();
        assert_eq!(spot.speed(), 0.0);
    }

    #[test]
    fn until_keeps_prefix_at_same_speed() {
        let m = Motion::at_speed(vertical_line(), SimTime(0.0), 1.0).unwrap();
        let cut = m.until(SimTime(1.5));
        assert_eq!(
            cut.waypoints(),
            &[Point3::new(0.0, 1.0, 0.0), Point3::ORIGIN, Point3::new(0.0, -0.5, 0.0)]
        );
        assert_eq!(cut.end(), SimTime(1.5));
        assert_eq!(cut.length(), 1.5);
        assert!(cut.pose_at(SimTime(0.5)).distance(m.pose_at(SimTime(0.5))) < 1e-12);

        // Cut on a waypoint: no duplicate point.
        assert_eq!(m.until(SimTime(1.0)).waypoints(), &[Point3::new(0.0, 1.0, 0.0), Point3::ORIGIN]);
        assert_eq!(m.until(SimTime(9.0)), m);

        let none = m.until(SimTime(-1.0));
        assert_eq!(none.duration(), 0.0);
        assert_eq!(none.waypoints(), &[Point3::new(0.0, 1.0, 0.0)]);
    }

    #[test]
    fn overlap_is_closed() {
        let a = Motion::at_speed(vertical_line(), SimTime(0.0), 1.0).unwrap(); // [0, 2]
        let b = a.shifted(2.0); // [2, 4]
        let c = a.shifted(2.5); // [2.5, 4.5]
        assert_eq!(a.overlap(&b), Some((SimTime(2.0), SimTime(2.0))));
        assert_eq!(a.overlap(&c), None);
        assert_eq!(b.overlap(&c), Some((SimTime(2.5), SimTime(4.0))));
    }
}

#[cfg(all(test, feature = "serde"))]
mod wire {
    use crate::{Motion, Point3, SimTime};

    #[test]
    fn decoded_motion_is_revalidated() {
        let m = Motion::at_speed(
            vec![Point3::new(0.0, 0.0, 0.0), Point3::new(3.0, 4.0, 0.0)],
            SimTime(1.0),
            5.0,
        )
        .unwrap();
        let json = serde_json::to_string(&m).unwrap();
        let back: Motion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn empty_or_inverted_motion_rejected() {
        let empty = r#"{"waypoints":[],"start":0.0,"end":1.0,"length":0.0}"#;
        assert!(serde_json::from_str::<Motion>(empty).is_err());
        let inverted = r#"{"waypoints":[{"x":0.0,"y":0.0,"z":0.0}],"start":2.0,"end":1.0}"#;
        assert!(serde_json::from_str::<Motion>(inverted).is_err());
    }
}
