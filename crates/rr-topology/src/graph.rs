//! Road topology representation and builder.
//!
//! # Data layout
//!
//! Segments are stored in input order and indexed by `SegmentId`.  The
//! search graph uses **Compressed Sparse Row (CSR)** format: outgoing edges
//! of `NodeId n` occupy
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Every edge maps to exactly one segment and carries that segment's length
//! as its weight.  A node pair carries at most one edge; when the input has
//! parallel segments between the same nodes in the same direction, the last
//! one supplied becomes the edge.  The others stay addressable as segments
//! (an agent can still stand on them) but are never produced by a search.
//!
//! The graph is immutable once built.

use std::collections::HashMap;

use rr_core::{EdgeId, NodeId, SegmentId};
use tracing::warn;

use crate::{TopologyError, TopologyResult};

// ── Input description ─────────────────────────────────────────────────────────

/// An intersection or terminus in the pre-parsed topology source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeSpec {
    pub id: String,
    /// `true` if the node is controlled by a traffic signal.
    #[cfg_attr(feature = "serde", serde(default))]
    pub signalized: bool,
}

/// A directed road segment in the pre-parsed topology source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentSpec {
    pub id:     String,
    pub from:   String,
    pub to:     String,
    /// Length in metres; used as the search weight.
    pub length: f64,
}

/// Pre-parsed `(nodes, segments)` structure handed over by the network
/// loader.  File formats are the loader's business, not ours.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TopologySpec {
    pub nodes:    Vec<NodeSpec>,
    pub segments: Vec<SegmentSpec>,
}

// ── TopologyGraph ─────────────────────────────────────────────────────────────

/// Directed weighted road graph in CSR format plus segment/node name tables.
///
/// All array fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`TopologyGraph::build`] or [`TopologyBuilder`].
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyGraph {
    // ── Node data (indexed by NodeId) ─────────────────────────────────────
    pub node_names:      Vec<String>,
    pub node_signalized: Vec<bool>,

    // ── Segment data (indexed by SegmentId) ───────────────────────────────
    pub segment_names:  Vec<String>,
    pub segment_from:   Vec<NodeId>,
    pub segment_to:     Vec<NodeId>,
    pub segment_length: Vec<f64>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge, needed to walk `prev_edge` back to the source.
    pub edge_from:    Vec<NodeId>,
    pub edge_to:      Vec<NodeId>,
    /// The segment this edge stands for.
    pub edge_segment: Vec<SegmentId>,
    /// Non-negative, finite search weight.
    pub edge_weight:  Vec<f64>,

    node_lookup:    HashMap<String, NodeId>,
    segment_lookup: HashMap<String, SegmentId>,
}

impl TopologyGraph {
    /// Validate `spec` and build the graph.
    ///
    /// # Errors
    ///
    /// Any [malformed](TopologyError::is_malformed) input: a segment naming a
    /// node absent from `spec.nodes`, a negative or non-finite length, or a
    /// repeated node/segment id.
    pub fn build(spec: &TopologySpec) -> TopologyResult<Self> {
        let mut b = TopologyBuilder::with_capacity(spec.nodes.len(), spec.segments.len());
        for node in &spec.nodes {
            b.add_node(&node.id, node.signalized)?;
        }
        for seg in &spec.segments {
            b.add_segment(&seg.id, &seg.from, &seg.to, seg.length)?;
        }
        Ok(b.build())
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_names.len()
    }

    pub fn segment_count(&self) -> usize {
        self.segment_names.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_names.is_empty()
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// A contiguous index range; no heap allocation.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Segments that can be entered from the end of `segment`.
    pub fn successors(&self, segment: SegmentId) -> impl Iterator<Item = SegmentId> + '_ {
        let to = self.segment_to[segment.index()];
        self.out_edges(to).map(|e| self.edge_segment[e.index()])
    }

    // ── Lookups ───────────────────────────────────────────────────────────

    pub fn segment_id(&self, name: &str) -> Option<SegmentId> {
        self.segment_lookup.get(name).copied()
    }

    /// Like [`segment_id`](Self::segment_id) but reports absence as
    /// [`TopologyError::UnknownSegment`].
    pub fn require_segment(&self, name: &str) -> TopologyResult<SegmentId> {
        self.segment_id(name)
            .ok_or_else(|| TopologyError::UnknownSegment(name.to_owned()))
    }

    pub fn segment_name(&self, segment: SegmentId) -> &str {
        &self.segment_names[segment.index()]
    }

    pub fn contains_segment(&self, segment: SegmentId) -> bool {
        segment.index() < self.segment_count()
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.node_lookup.get(name).copied()
    }

    pub fn node_name(&self, node: NodeId) -> &str {
        &self.node_names[node.index()]
    }

    #[inline]
    pub fn is_signalized(&self, node: NodeId) -> bool {
        self.node_signalized[node.index()]
    }

    /// `(from, to)` nodes of `segment`.
    #[inline]
    pub fn segment_nodes(&self, segment: SegmentId) -> (NodeId, NodeId) {
        (self.segment_from[segment.index()], self.segment_to[segment.index()])
    }

    // ── Segment ↔ node translation ────────────────────────────────────────

    /// Map a route's boundary segments onto the nodes the search runs between.
    ///
    /// The start segment resolves to the node at its end (where the agent
    /// leaves it); the end segment resolves to the node at its start (where
    /// the agent enters it).
    ///
    /// # Errors
    ///
    /// [`TopologyError::UnknownSegment`] if either id is not in this graph.
    pub fn resolve_boundary_nodes(
        &self,
        start_segment: SegmentId,
        end_segment:   SegmentId,
    ) -> TopologyResult<(NodeId, NodeId)> {
        for seg in [start_segment, end_segment] {
            if !self.contains_segment(seg) {
                return Err(TopologyError::UnknownSegment(seg.to_string()));
            }
        }
        Ok((self.segment_to[start_segment.index()], self.segment_from[end_segment.index()]))
    }
}

// ── TopologyBuilder ───────────────────────────────────────────────────────────

/// Construct a [`TopologyGraph`] incrementally, then call [`build`](Self::build).
///
/// Validation happens as items are added, so `build()` itself cannot fail.
///
/// # Example
///
/// ```
/// use rr_topology::TopologyBuilder;
///
/// let mut b = TopologyBuilder::new();
/// b.add_node("A", false).unwrap();
/// b.add_node("B", true).unwrap();
/// b.add_segment("A_B", "A", "B", 120.0).unwrap();
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub struct TopologyBuilder {
    node_names:     Vec<String>,
    signalized:     Vec<bool>,
    node_lookup:    HashMap<String, NodeId>,
    segments:       Vec<RawSegment>,
    segment_lookup: HashMap<String, SegmentId>,
}

struct RawSegment {
    name:   String,
    from:   NodeId,
    to:     NodeId,
    length: f64,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self::with_capacity(0, 0)
    }

    /// Pre-allocate for the expected number of nodes and segments.
    pub fn with_capacity(nodes: usize, segments: usize) -> Self {
        Self {
            node_names:     Vec::with_capacity(nodes),
            signalized:     Vec::with_capacity(nodes),
            node_lookup:    HashMap::with_capacity(nodes),
            segments:       Vec::with_capacity(segments),
            segment_lookup: HashMap::with_capacity(segments),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, name: &str, signalized: bool) -> TopologyResult<NodeId> {
        if self.node_lookup.contains_key(name) {
            return Err(TopologyError::DuplicateNode(name.to_owned()));
        }
        let id = NodeId(self.node_names.len() as u32);
        self.node_names.push(name.to_owned());
        self.signalized.push(signalized);
        self.node_lookup.insert(name.to_owned(), id);
        Ok(id)
    }

    /// Add a **directed** segment from node `from` to node `to`.
    ///
    /// Both nodes must have been added already.
    pub fn add_segment(
        &mut self,
        name:   &str,
        from:   &str,
        to:     &str,
        length: f64,
    ) -> TopologyResult<SegmentId> {
        if self.segment_lookup.contains_key(name) {
            return Err(TopologyError::DuplicateSegment(name.to_owned()));
        }
        if !length.is_finite() || length < 0.0 {
            return Err(TopologyError::InvalidWeight { segment: name.to_owned(), weight: length });
        }
        let resolve = |node: &str| {
            self.node_lookup.get(node).copied().ok_or_else(|| TopologyError::UnknownNode {
                segment: name.to_owned(),
                node:    node.to_owned(),
            })
        };
        let from = resolve(from)?;
        let to   = resolve(to)?;

        let id = SegmentId(self.segments.len() as u32);
        self.segments.push(RawSegment { name: name.to_owned(), from, to, length });
        self.segment_lookup.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn node_count(&self) -> usize { self.node_names.len() }
    pub fn segment_count(&self) -> usize { self.segments.len() }

    /// Consume the builder and produce a [`TopologyGraph`].
    ///
    /// Time complexity: O(S log S) for the edge sort, S = segments.
    pub fn build(self) -> TopologyGraph {
        let node_count = self.node_names.len();

        // One edge per (from, to); a later segment replaces an earlier one.
        let mut by_pair: HashMap<(NodeId, NodeId), usize> = HashMap::with_capacity(self.segments.len());
        let mut edge_segments: Vec<SegmentId> = Vec::with_capacity(self.segments.len());
        for (i, seg) in self.segments.iter().enumerate() {
            let id = SegmentId(i as u32);
            match by_pair.get(&(seg.from, seg.to)) {
                Some(&slot) => {
                    let replaced = edge_segments[slot];
                    warn!(
                        kept    = %seg.name,
                        dropped = %self.segments[replaced.index()].name,
                        "parallel segments between the same nodes; keeping the last one"
                    );
                    edge_segments[slot] = id;
                }
                None => {
                    by_pair.insert((seg.from, seg.to), edge_segments.len());
                    edge_segments.push(id);
                }
            }
        }

        // Stable sort keeps input order within a node's row, so searches are
        // reproducible for a given input.
        edge_segments.sort_by_key(|s| self.segments[s.index()].from.0);

        let edge_from:   Vec<NodeId> = edge_segments.iter().map(|s| self.segments[s.index()].from).collect();
        let edge_to:     Vec<NodeId> = edge_segments.iter().map(|s| self.segments[s.index()].to).collect();
        let edge_weight: Vec<f64>    = edge_segments.iter().map(|s| self.segments[s.index()].length).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for from in &edge_from {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_segments.len());

        TopologyGraph {
            node_names:      self.node_names,
            node_signalized: self.signalized,
            segment_from:    self.segments.iter().map(|s| s.from).collect(),
            segment_to:      self.segments.iter().map(|s| s.to).collect(),
            segment_length:  self.segments.iter().map(|s| s.length).collect(),
            segment_names:   self.segments.into_iter().map(|s| s.name).collect(),
            node_out_start,
            edge_from,
            edge_to,
            edge_segment:    edge_segments,
            edge_weight,
            node_lookup:     self.node_lookup,
            segment_lookup:  self.segment_lookup,
        }
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
