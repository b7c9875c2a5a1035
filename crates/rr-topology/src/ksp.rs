//! K-shortest loopless paths between two segments (Yen's deviation search).
//!
//! # Algorithm
//!
//! 1. Dijkstra between the boundary nodes gives the first path.  No path
//!    means an empty result, not an error.
//! 2. For every prefix of the most recently accepted path, the node at the
//!    end of the prefix becomes the *spur node*.  Every edge leaving the spur
//!    node along an accepted path that shares the prefix is suppressed, as
//!    are the prefix nodes before the spur node.  A Dijkstra run from the
//!    spur node to the target, spliced onto the prefix, is a deviation
//!    candidate.
//! 3. The cheapest unaccepted candidate is accepted.  Repeat until `k` paths
//!    are accepted or no candidates remain.
//!
//! Suppression never touches the [`TopologyGraph`]: it lives in a
//! [`SearchMask`] owned by the call, and each prefix's suppressions are
//! scoped to a [`Suppression`] guard that clears exactly what it set when it
//! is dropped.  The graph can therefore be shared read-only by any number of
//! concurrent searches.
//!
//! # Ordering
//!
//! Candidates are ranked by `(weight, deviation index, discovery order)`.
//! Equal-weight alternatives that deviate earlier come first; nothing
//! depends on hash iteration order.

use std::cmp::{Ordering, Reverse};
use std::collections::{BinaryHeap, HashSet};

use rr_core::{EdgeId, NodeId, SegmentId};

use crate::{TopologyGraph, TopologyResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// One candidate route, expressed in segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    /// `[start, …intermediate…, end]`.  Always at least two entries.
    pub segments: Vec<SegmentId>,
    /// Node sequence from the start segment's exit to the end segment's
    /// entry.  A single node means the two segments are directly connected.
    pub nodes: Vec<NodeId>,
    /// Total weight of the intermediate route (boundary segments excluded).
    pub weight: f64,
}

impl Path {
    /// `true` if no node appears twice.
    pub fn is_loopless(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        self.nodes.iter().all(|n| seen.insert(*n))
    }

    /// `true` if the start segment feeds the end segment directly.
    pub fn is_direct(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Segment names in order, as the simulator expects them.
    pub fn names<'g>(&self, graph: &'g TopologyGraph) -> Vec<&'g str> {
        self.segments.iter().map(|&s| graph.segment_name(s)).collect()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Up to `k` loopless paths from `start_segment` to `end_segment`, cheapest
/// first.
///
/// Every path begins with `start_segment` and ends with `end_segment`; only
/// the route between them is searched.  Fewer than `k` results (including
/// none) means fewer alternatives exist.
///
/// # Errors
///
/// [`TopologyError::UnknownSegment`](crate::TopologyError::UnknownSegment)
/// if either segment is not part of `graph`.
pub fn find_k_shortest(
    graph:         &TopologyGraph,
    start_segment: SegmentId,
    end_segment:   SegmentId,
    k:             usize,
) -> TopologyResult<Vec<Path>> {
    let (source, target) = graph.resolve_boundary_nodes(start_segment, end_segment)?;
    if k == 0 {
        return Ok(vec![]);
    }

    let mut mask = SearchMask::new(graph);
    let Some(first) = dijkstra(graph, source, target, &mask) else {
        return Ok(vec![]);
    };

    let mut seen: HashSet<Vec<NodeId>> = HashSet::new();
    seen.insert(first.nodes.clone());
    let mut accepted = vec![first];
    let mut candidates: BinaryHeap<Reverse<Deviation>> = BinaryHeap::new();
    let mut discovered = 0u64;

    while accepted.len() < k {
        let last = &accepted[accepted.len() - 1];

        for i in 0..last.nodes.len() - 1 {
            let spur       = last.nodes[i];
            let root_nodes = &last.nodes[..=i];
            let root_edges = &last.edges[..i];

            let mut guard = Suppression::new(&mut mask);
            for path in &accepted {
                if path.nodes.len() > i + 1 && path.nodes[..=i] == *root_nodes {
                    guard.suppress_edge(path.edges[i]);
                }
            }
            for &node in &root_nodes[..i] {
                guard.suppress_node(node);
            }

            let Some(spur_route) = dijkstra(graph, spur, target, guard.mask()) else {
                continue;
            };

            let mut nodes = root_nodes[..i].to_vec();
            nodes.extend_from_slice(&spur_route.nodes);
            if !seen.insert(nodes.clone()) {
                continue;
            }

            let mut edges = root_edges.to_vec();
            edges.extend_from_slice(&spur_route.edges);
            let root_weight: f64 = root_edges.iter().map(|e| graph.edge_weight[e.index()]).sum();

            candidates.push(Reverse(Deviation {
                weight: Cost(root_weight + spur_route.weight),
                prefix: i,
                order:  discovered,
                route:  NodeRoute { nodes, edges, weight: root_weight + spur_route.weight },
            }));
            discovered += 1;
        }

        match candidates.pop() {
            Some(Reverse(next)) => accepted.push(next.route),
            None => break,
        }
    }

    Ok(accepted
        .into_iter()
        .map(|route| route.into_path(graph, start_segment, end_segment))
        .collect())
}

/// The single cheapest path, or `None` if the end is unreachable.
pub fn shortest_path(
    graph:         &TopologyGraph,
    start_segment: SegmentId,
    end_segment:   SegmentId,
) -> TopologyResult<Option<Path>> {
    Ok(find_k_shortest(graph, start_segment, end_segment, 1)?.into_iter().next())
}

// ── Node-level route ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct NodeRoute {
    nodes:  Vec<NodeId>,
    edges:  Vec<EdgeId>,
    weight: f64,
}

impl NodeRoute {
    fn into_path(self, graph: &TopologyGraph, start: SegmentId, end: SegmentId) -> Path {
        let mut segments = Vec::with_capacity(self.edges.len() + 2);
        segments.push(start);
        segments.extend(self.edges.iter().map(|e| graph.edge_segment[e.index()]));
        segments.push(end);
        Path { segments, nodes: self.nodes, weight: self.weight }
    }
}

// ── Candidate ordering ────────────────────────────────────────────────────────

/// Total order over validated (finite, non-negative) weights.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

struct Deviation {
    weight: Cost,
    /// Index of the spur node in the path it deviated from.
    prefix: usize,
    order:  u64,
    route:  NodeRoute,
}

impl Deviation {
    fn key(&self) -> (Cost, usize, u64) {
        (self.weight, self.prefix, self.order)
    }
}

impl PartialEq for Deviation {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Deviation {}

impl PartialOrd for Deviation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Deviation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

// ── Suppression mask ──────────────────────────────────────────────────────────

/// Edges and nodes temporarily hidden from the search.
struct SearchMask {
    edges: Vec<bool>,
    nodes: Vec<bool>,
}

impl SearchMask {
    fn new(graph: &TopologyGraph) -> Self {
        Self {
            edges: vec![false; graph.edge_count()],
            nodes: vec![false; graph.node_count()],
        }
    }

    #[inline]
    fn edge_open(&self, edge: EdgeId) -> bool {
        !self.edges[edge.index()]
    }

    #[inline]
    fn node_open(&self, node: NodeId) -> bool {
        !self.nodes[node.index()]
    }
}

/// Scoped set of suppressions.  Dropping it restores the mask to the state
/// it had when the guard was created, on every exit path.
struct Suppression<'m> {
    mask:  &'m mut SearchMask,
    edges: Vec<EdgeId>,
    nodes: Vec<NodeId>,
}

impl<'m> Suppression<'m> {
    fn new(mask: &'m mut SearchMask) -> Self {
        Self { mask, edges: Vec::new(), nodes: Vec::new() }
    }

    fn suppress_edge(&mut self, edge: EdgeId) {
        if !self.mask.edges[edge.index()] {
            self.mask.edges[edge.index()] = true;
            self.edges.push(edge);
        }
    }

    fn suppress_node(&mut self, node: NodeId) {
        if !self.mask.nodes[node.index()] {
            self.mask.nodes[node.index()] = true;
            self.nodes.push(node);
        }
    }

    fn mask(&self) -> &SearchMask {
        &*self.mask
    }
}

impl Drop for Suppression<'_> {
    fn drop(&mut self) {
        for e in self.edges.drain(..) {
            self.mask.edges[e.index()] = false;
        }
        for n in self.nodes.drain(..) {
            self.mask.nodes[n.index()] = false;
        }
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(
    graph: &TopologyGraph,
    from:  NodeId,
    to:    NodeId,
    mask:  &SearchMask,
) -> Option<NodeRoute> {
    if from == to {
        return Some(NodeRoute { nodes: vec![from], edges: vec![], weight: 0.0 });
    }

    let n = graph.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap: (cost, node).  Secondary key NodeId keeps ties deterministic.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(graph, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            if !mask.edge_open(edge) {
                continue;
            }
            let neighbor = graph.edge_to[edge.index()];
            if !mask.node_open(neighbor) {
                continue;
            }
            let new_cost = cost + graph.edge_weight[edge.index()];
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()]      = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    None
}

fn reconstruct(
    graph:     &TopologyGraph,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    weight:    f64,
) -> NodeRoute {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();

    let mut nodes = Vec::with_capacity(edges.len() + 1);
    nodes.push(from);
    nodes.extend(edges.iter().map(|e| graph.edge_to[e.index()]));
    NodeRoute { nodes, edges, weight }
}
