//! Unit tests for rr-topology.
//!
//! Every network here is hand-built; segment lengths are chosen so the
//! expected path order can be worked out on paper.

#[cfg(test)]
mod helpers {
    use crate::{Path, TopologyBuilder, TopologyGraph};

    /// Two routes from A to D, fed by `in` (X→A) and drained by `out` (D→Y).
    ///
    /// ```text
    ///          1     1
    ///      ┌── B ───┐
    /// X ─▶ A        D ─▶ Y
    ///      └── C ───┘
    ///          5     5
    /// ```
    pub fn diamond() -> TopologyGraph {
        let mut b = TopologyBuilder::new();
        for n in ["X", "A", "B", "C", "D", "Y"] {
            b.add_node(n, false).unwrap();
        }
        b.add_segment("in",  "X", "A", 3.0).unwrap();
        b.add_segment("A_B", "A", "B", 1.0).unwrap();
        b.add_segment("B_D", "B", "D", 1.0).unwrap();
        b.add_segment("A_C", "A", "C", 5.0).unwrap();
        b.add_segment("C_D", "C", "D", 5.0).unwrap();
        b.add_segment("out", "D", "Y", 3.0).unwrap();
        b.build()
    }

    /// `size × size` grid of bidirectional 100 m segments, with `in` entering
    /// the top-left corner and `out` leaving the bottom-right one.
    pub fn grid(size: usize) -> TopologyGraph {
        let mut b = TopologyBuilder::new();
        b.add_node("src", false).unwrap();
        b.add_node("sink", false).unwrap();
        for r in 0..size {
            for c in 0..size {
                b.add_node(&format!("n{r}_{c}"), (r + c) % 2 == 0).unwrap();
            }
        }
        for r in 0..size {
            for c in 0..size {
                let here = format!("n{r}_{c}");
                if c + 1 < size {
                    let right = format!("n{r}_{}", c + 1);
                    b.add_segment(&format!("{here}>{right}"), &here, &right, 100.0).unwrap();
                    b.add_segment(&format!("{right}>{here}"), &right, &here, 100.0).unwrap();
                }
                if r + 1 < size {
                    let down = format!("n{}_{c}", r + 1);
                    b.add_segment(&format!("{here}>{down}"), &here, &down, 100.0).unwrap();
                    b.add_segment(&format!("{down}>{here}"), &down, &here, 100.0).unwrap();
                }
            }
        }
        let last = size - 1;
        b.add_segment("in", "src", "n0_0", 50.0).unwrap();
        b.add_segment("out", &format!("n{last}_{last}"), "sink", 50.0).unwrap();
        b.build()
    }

    pub fn seg(graph: &TopologyGraph, name: &str) -> rr_core::SegmentId {
        graph.segment_id(name).unwrap()
    }

    /// Each segment must start where the previous one ended.
    pub fn assert_chained(graph: &TopologyGraph, path: &Path) {
        for pair in path.segments.windows(2) {
            let (_, end)   = graph.segment_nodes(pair[0]);
            let (start, _) = graph.segment_nodes(pair[1]);
            assert_eq!(
                end, start,
                "{} does not feed {}",
                graph.segment_name(pair[0]),
                graph.segment_name(pair[1])
            );
        }
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use crate::{TopologyBuilder, TopologyError, TopologyGraph, TopologySpec, NodeSpec, SegmentSpec};

    #[test]
    fn empty_build() {
        let graph = TopologyBuilder::new().build();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn csr_rows_follow_nodes() {
        let graph = super::helpers::diamond();
        let a = graph.node_id("A").unwrap();
        let d = graph.node_id("D").unwrap();
        let y = graph.node_id("Y").unwrap();

        assert_eq!(graph.out_degree(a), 2);
        assert_eq!(graph.out_degree(d), 1);
        assert_eq!(graph.out_degree(y), 0);
        assert_eq!(graph.node_out_start.len(), graph.node_count() + 1);

        for edge in graph.out_edges(a) {
            assert_eq!(graph.edge_from[edge.index()], a);
        }
    }

    #[test]
    fn successors_of_segment() {
        let graph = super::helpers::diamond();
        let inbound = graph.segment_id("in").unwrap();
        let mut next: Vec<&str> = graph.successors(inbound).map(|s| graph.segment_name(s)).collect();
        next.sort_unstable();
        assert_eq!(next, vec!["A_B", "A_C"]);
    }

    #[test]
    fn signal_flag_is_kept() {
        let mut b = TopologyBuilder::new();
        let plain = b.add_node("P", false).unwrap();
        let light = b.add_node("L", true).unwrap();
        let graph = b.build();
        assert!(!graph.is_signalized(plain));
        assert!(graph.is_signalized(light));
    }

    #[test]
    fn unknown_node_rejected() {
        let mut b = TopologyBuilder::new();
        b.add_node("A", false).unwrap();
        let err = b.add_segment("A_Z", "A", "Z", 10.0).unwrap_err();
        assert_eq!(
            err,
            TopologyError::UnknownNode { segment: "A_Z".into(), node: "Z".into() }
        );
        assert!(err.is_malformed());
    }

    #[test]
    fn bad_weights_rejected() {
        let mut b = TopologyBuilder::new();
        b.add_node("A", false).unwrap();
        b.add_node("B", false).unwrap();
        for w in [-1.0, f64::NAN, f64::INFINITY] {
            let err = b.add_segment("A_B", "A", "B", w).unwrap_err();
            assert!(matches!(err, TopologyError::InvalidWeight { .. }), "{w} accepted");
        }
        // Zero is a valid length.
        b.add_segment("A_B", "A", "B", 0.0).unwrap();
    }

    #[test]
    fn duplicates_rejected() {
        let mut b = TopologyBuilder::new();
        b.add_node("A", false).unwrap();
        b.add_node("B", false).unwrap();
        assert_eq!(b.add_node("A", true).unwrap_err(), TopologyError::DuplicateNode("A".into()));

        b.add_segment("s", "A", "B", 1.0).unwrap();
        assert_eq!(
            b.add_segment("s", "B", "A", 1.0).unwrap_err(),
            TopologyError::DuplicateSegment("s".into())
        );
    }

    #[test]
    fn build_from_spec_stops_at_first_error() {
        let spec = TopologySpec {
            nodes: vec![NodeSpec { id: "A".into(), signalized: false }],
            segments: vec![SegmentSpec {
                id:     "A_B".into(),
                from:   "A".into(),
                to:     "B".into(),
                length: 10.0,
            }],
        };
        let err = TopologyGraph::build(&spec).unwrap_err();
        assert!(matches!(err, TopologyError::UnknownNode { .. }));
    }

    #[test]
    fn parallel_segments_keep_last() {
        let mut b = TopologyBuilder::new();
        b.add_node("A", false).unwrap();
        b.add_node("B", false).unwrap();
        let first  = b.add_segment("p1", "A", "B", 1.0).unwrap();
        let second = b.add_segment("p2", "A", "B", 5.0).unwrap();
        let graph = b.build();

        assert_eq!(graph.segment_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edge_segment[0], second);
        assert_eq!(graph.edge_weight[0], 5.0);
        // The replaced segment is still addressable.
        assert_eq!(graph.segment_id("p1"), Some(first));
    }

    #[test]
    fn unknown_segment_is_not_malformed() {
        let graph = super::helpers::diamond();
        let err = graph.require_segment("nope").unwrap_err();
        assert_eq!(err, TopologyError::UnknownSegment("nope".into()));
        assert!(!err.is_malformed());
    }
}

// ── Boundary resolution ───────────────────────────────────────────────────────

#[cfg(test)]
mod boundary {
    use rr_core::SegmentId;

    use super::helpers::{diamond, seg};
    use crate::TopologyError;

    #[test]
    fn start_exit_and_end_entry() {
        let graph = diamond();
        let (source, target) = graph
            .resolve_boundary_nodes(seg(&graph, "in"), seg(&graph, "out"))
            .unwrap();
        assert_eq!(graph.node_name(source), "A");
        assert_eq!(graph.node_name(target), "D");
    }

    #[test]
    fn out_of_range_id_rejected() {
        let graph = diamond();
        let err = graph
            .resolve_boundary_nodes(seg(&graph, "in"), SegmentId(99))
            .unwrap_err();
        assert!(matches!(err, TopologyError::UnknownSegment(_)));
    }
}

// ── K-shortest paths ──────────────────────────────────────────────────────────

#[cfg(test)]
mod ksp {
    use std::collections::HashSet;

    use rr_core::SegmentId;

    use super::helpers::{assert_chained, diamond, grid, seg};
    use crate::{TopologyBuilder, TopologyError, find_k_shortest, shortest_path};

    #[test]
    fn diamond_yields_both_routes() {
        let graph = diamond();
        let paths = find_k_shortest(&graph, seg(&graph, "in"), seg(&graph, "out"), 3).unwrap();

        assert_eq!(paths.len(), 2, "only two loopless routes exist");
        assert_eq!(paths[0].names(&graph), vec!["in", "A_B", "B_D", "out"]);
        assert_eq!(paths[1].names(&graph), vec!["in", "A_C", "C_D", "out"]);
        assert_eq!(paths[0].weight, 2.0);
        assert_eq!(paths[1].weight, 10.0);
    }

    #[test]
    fn k_zero_is_empty() {
        let graph = diamond();
        let paths = find_k_shortest(&graph, seg(&graph, "in"), seg(&graph, "out"), 0).unwrap();
        assert!(paths.is_empty());
    }

    #[test]
    fn k_one_matches_shortest_path() {
        let graph = grid(3);
        let (start, end) = (seg(&graph, "in"), seg(&graph, "out"));
        let one  = find_k_shortest(&graph, start, end, 1).unwrap();
        let best = shortest_path(&graph, start, end).unwrap().unwrap();
        assert_eq!(one, vec![best]);
    }

    #[test]
    fn grid_paths_sorted_loopless_distinct() {
        let graph = grid(3);
        let paths = find_k_shortest(&graph, seg(&graph, "in"), seg(&graph, "out"), 8).unwrap();
        assert_eq!(paths.len(), 8);

        // C(4,2) = 6 monotone corner-to-corner routes of four blocks each.
        for p in &paths[..6] {
            assert_eq!(p.weight, 400.0);
        }
        for p in &paths[6..] {
            assert_eq!(p.weight, 600.0);
        }

        let mut seen = HashSet::new();
        for pair in paths.windows(2) {
            assert!(pair[0].weight <= pair[1].weight);
        }
        for p in &paths {
            assert!(p.is_loopless(), "loop in {:?}", p.names(&graph));
            assert!(seen.insert(p.segments.clone()), "duplicate {:?}", p.names(&graph));
            assert_eq!(p.segments.first(), Some(&seg(&graph, "in")));
            assert_eq!(p.segments.last(), Some(&seg(&graph, "out")));
            assert_chained(&graph, p);
        }
    }

    #[test]
    fn fewer_paths_than_requested() {
        // Directed only: 0→1→2→4 and 0→3→4.
        let mut b = TopologyBuilder::new();
        for n in ["s", "n0", "n1", "n2", "n3", "n4", "t"] {
            b.add_node(n, false).unwrap();
        }
        b.add_segment("in",  "s",  "n0", 1.0).unwrap();
        b.add_segment("a",   "n0", "n1", 100.0).unwrap();
        b.add_segment("b",   "n1", "n2", 100.0).unwrap();
        b.add_segment("c",   "n2", "n4", 100.0).unwrap();
        b.add_segment("d",   "n0", "n3", 500.0).unwrap();
        b.add_segment("e",   "n3", "n4", 100.0).unwrap();
        b.add_segment("out", "n4", "t",  1.0).unwrap();
        let graph = b.build();

        let paths = find_k_shortest(&graph, seg(&graph, "in"), seg(&graph, "out"), 5).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].weight, 300.0);
        assert_eq!(paths[1].weight, 600.0);
    }

    #[test]
    fn equal_weights_prefer_earlier_deviation() {
        //   S→a→T = 2,  S→b→T = 4,  S→a→b→T = 4
        let mut b = TopologyBuilder::new();
        for n in ["x", "S", "a", "b", "T", "y"] {
            b.add_node(n, false).unwrap();
        }
        b.add_segment("in",  "x", "S", 1.0).unwrap();
        b.add_segment("S_a", "S", "a", 1.0).unwrap();
        b.add_segment("a_T", "a", "T", 1.0).unwrap();
        b.add_segment("S_b", "S", "b", 2.0).unwrap();
        b.add_segment("b_T", "b", "T", 2.0).unwrap();
        b.add_segment("a_b", "a", "b", 1.0).unwrap();
        b.add_segment("out", "T", "y", 1.0).unwrap();
        let graph = b.build();

        let (start, end) = (seg(&graph, "in"), seg(&graph, "out"));
        let paths = find_k_shortest(&graph, start, end, 5).unwrap();
        let names: Vec<_> = paths.iter().map(|p| p.names(&graph)).collect();
        assert_eq!(
            names,
            vec![
                vec!["in", "S_a", "a_T", "out"],
                vec!["in", "S_b", "b_T", "out"],
                vec!["in", "S_a", "a_b", "b_T", "out"],
            ]
        );

        // Same answer every time.
        for _ in 0..5 {
            assert_eq!(find_k_shortest(&graph, start, end, 5).unwrap(), paths);
        }
    }

    #[test]
    fn directly_connected_segments() {
        let mut b = TopologyBuilder::new();
        for n in ["X", "A", "Y"] {
            b.add_node(n, false).unwrap();
        }
        b.add_segment("in",  "X", "A", 10.0).unwrap();
        b.add_segment("out", "A", "Y", 10.0).unwrap();
        let graph = b.build();

        let paths = find_k_shortest(&graph, seg(&graph, "in"), seg(&graph, "out"), 3).unwrap();
        assert_eq!(paths.len(), 1);
        assert!(paths[0].is_direct());
        assert_eq!(paths[0].names(&graph), vec!["in", "out"]);
        assert_eq!(paths[0].weight, 0.0);
    }

    #[test]
    fn unreachable_end_is_empty() {
        let mut b = TopologyBuilder::new();
        for n in ["X", "A", "B", "Y"] {
            b.add_node(n, false).unwrap();
        }
        b.add_segment("in",  "X", "A", 1.0).unwrap();
        b.add_segment("out", "B", "Y", 1.0).unwrap();
        let graph = b.build();

        let paths = find_k_shortest(&graph, seg(&graph, "in"), seg(&graph, "out"), 3).unwrap();
        assert!(paths.is_empty());
        assert_eq!(shortest_path(&graph, seg(&graph, "in"), seg(&graph, "out")).unwrap(), None);
    }

    #[test]
    fn unknown_segment_errors() {
        let graph = diamond();
        let err = find_k_shortest(&graph, SegmentId(42), seg(&graph, "out"), 3).unwrap_err();
        assert_eq!(err, TopologyError::UnknownSegment(SegmentId(42).to_string()));
    }

    #[test]
    fn search_leaves_graph_untouched() {
        let graph = grid(4);
        let before = graph.clone();

        find_k_shortest(&graph, seg(&graph, "in"), seg(&graph, "out"), 10).unwrap();
        let _ = find_k_shortest(&graph, SegmentId(9_999), seg(&graph, "out"), 10);
        find_k_shortest(&graph, seg(&graph, "out"), seg(&graph, "in"), 10).unwrap();

        assert_eq!(graph, before);
    }

    #[test]
    fn parallel_segment_used_by_search() {
        let mut b = TopologyBuilder::new();
        for n in ["X", "A", "B", "Y"] {
            b.add_node(n, false).unwrap();
        }
        b.add_segment("in",   "X", "A", 1.0).unwrap();
        b.add_segment("fast", "A", "B", 1.0).unwrap();
        b.add_segment("slow", "A", "B", 9.0).unwrap();
        b.add_segment("out",  "B", "Y", 1.0).unwrap();
        let graph = b.build();

        let paths = find_k_shortest(&graph, seg(&graph, "in"), seg(&graph, "out"), 3).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].names(&graph), vec!["in", "slow", "out"]);
    }

    #[test]
    fn concurrent_searches_share_graph() {
        let graph = grid(4);
        let (start, end) = (seg(&graph, "in"), seg(&graph, "out"));
        let expected = find_k_shortest(&graph, start, end, 5).unwrap();

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| find_k_shortest(&graph, start, end, 5).unwrap()))
                .collect();
            for h in handles {
                assert_eq!(h.join().unwrap(), expected);
            }
        });
    }
}

// ── Spec loading ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "serde"))]
mod spec_json {
    use crate::{TopologyGraph, TopologySpec};

    #[test]
    fn load_from_json() {
        let json = r#"{
            "nodes": [
                {"id": "A"},
                {"id": "B", "signalized": true}
            ],
            "segments": [
                {"id": "A_B", "from": "A", "to": "B", "length": 42.5}
            ]
        }"#;
        let spec: TopologySpec = serde_json::from_str(json).unwrap();
        let graph = TopologyGraph::build(&spec).unwrap();

        let b = graph.node_id("B").unwrap();
        assert!(graph.is_signalized(b));
        assert_eq!(graph.segment_length[0], 42.5);
    }
}
