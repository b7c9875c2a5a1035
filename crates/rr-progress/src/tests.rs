//! Unit tests for rr-progress.

#[cfg(test)]
mod helpers {
    use rr_core::SegmentId;
    use rr_topology::{TopologyBuilder, TopologyGraph};

    pub fn seg(n: u32) -> SegmentId {
        SegmentId(n)
    }

    /// A directed ring `r0 → r1 → r2 → r3 → r0` with a spur `r2 → x`.
    pub fn ring() -> TopologyGraph {
        let mut b = TopologyBuilder::new();
        for n in ["r0", "r1", "r2", "r3", "x"] {
            b.add_node(n, false).unwrap();
        }
        b.add_segment("a", "r0", "r1", 10.0).unwrap();
        b.add_segment("b", "r1", "r2", 10.0).unwrap();
        b.add_segment("c", "r2", "r3", 10.0).unwrap();
        b.add_segment("d", "r3", "r0", 10.0).unwrap();
        b.add_segment("e", "r2", "x", 10.0).unwrap();
        b.build()
    }
}

// ── ProgressTracker state machine ─────────────────────────────────────────────

#[cfg(test)]
mod tracker {
    use rr_core::AgentId;

    use super::helpers::seg;
    use crate::{ProgressState, ProgressTracker};

    const A: AgentId = AgentId(7);

    #[test]
    fn unknown_agent_has_no_route() {
        let mut t = ProgressTracker::new();
        assert_eq!(t.state(A), ProgressState::NoRoute);
        assert_eq!(t.next_target(A, seg(0)), None);
        assert!(!t.needs_decision(A, seg(0)));
    }

    #[test]
    fn observe_starts_at_zero_and_is_idempotent() {
        let mut t = ProgressTracker::new();
        assert_eq!(t.observe(A, vec![seg(1), seg(2), seg(3)]), ProgressState::EnRoute(0));
        t.next_target(A, seg(1));
        // A second observation with a different route changes nothing.
        assert_eq!(t.observe(A, vec![seg(9)]), ProgressState::EnRoute(1));
        assert_eq!(t.progress(A).unwrap().route, vec![seg(1), seg(2), seg(3)]);
    }

    #[test]
    fn empty_route_is_finished() {
        let mut t = ProgressTracker::new();
        assert_eq!(t.observe(A, vec![]), ProgressState::Finished);
        assert_eq!(t.next_target(A, seg(0)), None);
    }

    #[test]
    fn walks_the_route() {
        let mut t = ProgressTracker::new();
        t.observe(A, vec![seg(1), seg(2), seg(3)]);

        // Departing on the first segment aims at the second.
        assert_eq!(t.next_target(A, seg(1)), Some(seg(2)));
        assert_eq!(t.state(A), ProgressState::EnRoute(1));

        // Off-route positions keep the current target.
        assert_eq!(t.next_target(A, seg(8)), Some(seg(2)));
        assert_eq!(t.state(A), ProgressState::EnRoute(1));

        assert_eq!(t.next_target(A, seg(2)), Some(seg(3)));
        assert_eq!(t.state(A), ProgressState::EnRoute(2));
    }

    #[test]
    fn reaching_last_segment_finishes() {
        let mut t = ProgressTracker::new();
        t.observe(A, vec![seg(1), seg(2)]);
        t.next_target(A, seg(1));
        assert_eq!(t.next_target(A, seg(2)), None);
        assert_eq!(t.state(A), ProgressState::Finished);

        // Terminal: no way back.
        assert_eq!(t.next_target(A, seg(1)), None);
        assert_eq!(t.state(A), ProgressState::Finished);
    }

    #[test]
    fn repeated_reports_advance_once() {
        let mut t = ProgressTracker::new();
        t.observe(A, vec![seg(1), seg(2), seg(3), seg(4)]);

        let mut indices = Vec::new();
        for current in [1, 1, 1, 5, 2, 2, 6, 3, 3] {
            t.next_target(A, seg(current));
            if let ProgressState::EnRoute(i) = t.state(A) {
                indices.push(i);
            }
        }
        assert!(indices.windows(2).all(|w| w[0] <= w[1]), "{indices:?}");

        let mut transitions = indices.clone();
        transitions.dedup();
        assert_eq!(transitions, vec![1, 2, 3]);
    }

    #[test]
    fn decision_latch_holds_for_one_stay() {
        let mut t = ProgressTracker::new();
        t.observe(A, vec![seg(1), seg(2), seg(3)]);
        t.next_target(A, seg(1));

        assert!(t.needs_decision(A, seg(1)));
        t.mark_decided(A, seg(1));
        assert!(!t.needs_decision(A, seg(1)));

        // Still on the same segment: latched.
        t.next_target(A, seg(1));
        assert!(!t.needs_decision(A, seg(1)));

        // Moving on clears it.
        t.next_target(A, seg(2));
        assert!(t.needs_decision(A, seg(2)));
    }

    #[test]
    fn finished_agent_needs_no_decision() {
        let mut t = ProgressTracker::new();
        t.observe(A, vec![seg(1)]);
        t.next_target(A, seg(1));
        assert!(t.state(A).is_finished());
        assert!(!t.needs_decision(A, seg(1)));
    }

    #[test]
    fn forget_and_retain() {
        let mut t = ProgressTracker::new();
        for i in 0..4 {
            t.observe(AgentId(i), vec![seg(i)]);
        }
        assert_eq!(t.len(), 4);

        assert!(t.forget(AgentId(0)).is_some());
        assert!(t.forget(AgentId(0)).is_none());

        let dropped = t.retain_active(&[AgentId(2), AgentId(9)]);
        assert_eq!(dropped, 2);
        assert!(t.is_tracked(AgentId(2)));
        assert!(!t.is_tracked(AgentId(1)));
        assert_eq!(t.state(AgentId(3)), ProgressState::NoRoute);
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use rr_core::AgentId;
    use rr_topology::TopologyError;

    use super::helpers::ring;
    use crate::{ProgressError, load_routes_reader, resolve_route};

    #[test]
    fn parses_routes() {
        let csv = "agent_id,route\n0,a b c\n3,e\n5,\n";
        let table = load_routes_reader(Cursor::new(csv)).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table[&AgentId(0)], vec!["a", "b", "c"]);
        assert_eq!(table[&AgentId(3)], vec!["e"]);
        assert!(table[&AgentId(5)].is_empty());
    }

    #[test]
    fn extra_whitespace_ignored() {
        let csv = "agent_id,route\n1,\"  a   b \"\n";
        let table = load_routes_reader(Cursor::new(csv)).unwrap();
        assert_eq!(table[&AgentId(1)], vec!["a", "b"]);
    }

    #[test]
    fn duplicate_agent_rejected() {
        let csv = "agent_id,route\n1,a\n1,b\n";
        let err = load_routes_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, ProgressError::DuplicateAgent { agent: 1 }));
    }

    #[test]
    fn bad_agent_id_rejected() {
        let csv = "agent_id,route\nnope,a\n";
        let err = load_routes_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, ProgressError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = crate::load_routes_csv(std::path::Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, ProgressError::Io(_)));
    }

    #[test]
    fn resolve_against_graph() {
        let graph = ring();
        let ids = resolve_route(&graph, &["a", "b"]).unwrap();
        assert_eq!(ids, vec![graph.segment_id("a").unwrap(), graph.segment_id("b").unwrap()]);

        let err = resolve_route(&graph, &["a", "zz"]).unwrap_err();
        assert_eq!(err, TopologyError::UnknownSegment("zz".into()));
    }
}

// ── Random routes ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod generate {
    use std::collections::HashSet;

    use rr_topology::TopologyBuilder;

    use super::helpers::ring;
    use crate::{ProgressError, RouteShape, random_routes};

    #[test]
    fn routes_are_connected_and_bounded() {
        let graph = ring();
        let shape = RouteShape { min_segments: 2, max_segments: 4 };
        let routes = random_routes(&graph, 50, shape, 42).unwrap();
        assert!(!routes.is_empty());

        for route in routes.values() {
            assert!((2..=4).contains(&route.len()), "{route:?}");
            for pair in route.windows(2) {
                let (_, end)   = graph.segment_nodes(pair[0]);
                let (start, _) = graph.segment_nodes(pair[1]);
                assert_eq!(end, start);
            }
            let unique: HashSet<_> = route.iter().collect();
            assert_eq!(unique.len(), route.len());
        }
    }

    #[test]
    fn same_seed_same_routes() {
        let graph = ring();
        let a = random_routes(&graph, 20, RouteShape::default(), 7).unwrap();
        let b = random_routes(&graph, 20, RouteShape::default(), 7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn agent_routes_independent_of_count() {
        let graph = ring();
        let few  = random_routes(&graph, 5, RouteShape::default(), 3).unwrap();
        let many = random_routes(&graph, 50, RouteShape::default(), 3).unwrap();
        for (agent, route) in &few {
            assert_eq!(many.get(agent), Some(route));
        }
    }

    #[test]
    fn dead_ends_skip_agents() {
        // One isolated segment: no walk can reach two segments.
        let mut b = TopologyBuilder::new();
        b.add_node("p", false).unwrap();
        b.add_node("q", false).unwrap();
        b.add_segment("only", "p", "q", 1.0).unwrap();
        let graph = b.build();

        let routes = random_routes(&graph, 3, RouteShape::default(), 1).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn invalid_inputs_rejected() {
        let empty = TopologyBuilder::new().build();
        assert!(matches!(
            random_routes(&empty, 1, RouteShape::default(), 0),
            Err(ProgressError::Generate(_))
        ));

        let graph = ring();
        let shape = RouteShape { min_segments: 5, max_segments: 3 };
        assert!(matches!(random_routes(&graph, 1, shape, 0), Err(ProgressError::Generate(_))));
    }
}
