//! Candidate routes and their metrics, as handed to an oracle.

use rr_core::AgentId;
use serde::Serialize;

/// Per-route figures an oracle ranks on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PathMetrics {
    /// Static weight (total length) of the intermediate route.
    pub weight:         f64,
    /// Sum of live travel times over every segment of the route, in seconds.
    pub estimated_time: f64,
    /// Distinct signalized intersections touched by the route.
    pub signal_count:   u32,
    /// Mean occupancy per segment.
    pub density:        f64,
}

/// One route an agent could take, as simulator segment ids.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub route:   Vec<String>,
    pub metrics: PathMetrics,
}

/// The alternatives for one rerouting decision, cheapest static weight first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateSet {
    pub agent:      AgentId,
    /// Segment the agent is on.
    pub current:    String,
    /// Segment every candidate ends on.
    pub target:     String,
    pub candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Position of the candidate whose route equals `route`.
    pub fn position<S: AsRef<str>>(&self, route: &[S]) -> Option<usize> {
        self.candidates.iter().position(|c| {
            c.route.len() == route.len()
                && c.route.iter().zip(route).all(|(a, b)| a == b.as_ref())
        })
    }

    /// Index of the candidate minimising `key`; the first one on ties.
    pub fn argmin_by<F: Fn(&PathMetrics) -> f64>(&self, key: F) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, c) in self.candidates.iter().enumerate() {
            let k = key(&c.metrics);
            if best.is_none_or(|(_, b)| k < b) {
                best = Some((i, k));
            }
        }
        best.map(|(i, _)| i)
    }
}
