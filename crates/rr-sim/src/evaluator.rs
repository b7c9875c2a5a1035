//! Per-path metrics for the oracle.

use rr_core::{AgentId, NodeId};
use rr_oracle::{Candidate, CandidateSet, PathMetrics};
use rr_topology::{Path, TopologyGraph};

use crate::NetworkState;

/// Turns search results into a [`CandidateSet`], reading static figures
/// from the topology and live ones from a [`NetworkState`].
pub struct CandidateEvaluator<'g> {
    graph: &'g TopologyGraph,
}

impl<'g> CandidateEvaluator<'g> {
    pub fn new(graph: &'g TopologyGraph) -> Self {
        Self { graph }
    }

    /// Metrics for one path.
    ///
    /// | Metric           | Definition                                           |
    /// |------------------|------------------------------------------------------|
    /// | `weight`         | the search weight                                    |
    /// | `estimated_time` | Σ live travel time over every segment               |
    /// | `signal_count`   | distinct signalized nodes at either end of a segment |
    /// | `density`        | Σ occupancy / segment count, 0 for an empty path     |
    pub fn metrics<N: NetworkState + ?Sized>(&self, path: &Path, net: &N) -> PathMetrics {
        let names: Vec<&str> = path.names(self.graph);

        let estimated_time = names.iter().map(|s| net.segment_travel_time(s)).sum();
        let occupancy: f64 = names.iter().map(|s| net.segment_occupancy(s)).sum();
        let density = if names.is_empty() { 0.0 } else { occupancy / names.len() as f64 };

        PathMetrics {
            weight: path.weight,
            estimated_time,
            signal_count: self.signal_count(path),
            density,
        }
    }

    fn signal_count(&self, path: &Path) -> u32 {
        let mut seen: Vec<NodeId> = Vec::new();
        for &segment in &path.segments {
            let (from, to) = self.graph.segment_nodes(segment);
            for node in [from, to] {
                if self.graph.is_signalized(node) && !seen.contains(&node) {
                    seen.push(node);
                }
            }
        }
        seen.len() as u32
    }

    /// Candidate set for one decision, in search order.
    pub fn candidate_set<N: NetworkState + ?Sized>(
        &self,
        agent:   AgentId,
        current: &str,
        target:  &str,
        paths:   &[Path],
        net:     &N,
    ) -> CandidateSet {
        let candidates = paths
            .iter()
            .map(|p| Candidate {
                route:   p.names(self.graph).into_iter().map(str::to_owned).collect(),
                metrics: self.metrics(p, net),
            })
            .collect();
        CandidateSet {
            agent,
            current: current.to_owned(),
            target: target.to_owned(),
            candidates,
        }
    }
}
