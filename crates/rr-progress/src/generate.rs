//! Random-walk route generation.
//!
//! Each agent starts on a uniformly chosen segment and repeatedly steps to a
//! random successor until the walk reaches `max_segments` or runs out of
//! unvisited successors.  Walks shorter than `min_segments` are retried from
//! a fresh start; an agent whose walks keep coming up short is left out.
//!
//! Every agent draws from its own [`AgentRng`], so the route of agent *n*
//! does not depend on how many agents are generated.

use std::collections::BTreeMap;

use rr_core::{AgentId, AgentRng, SegmentId};
use rr_topology::TopologyGraph;
use tracing::warn;

use crate::{ProgressError, ProgressResult};

/// Fresh starts tried per agent before giving up on it.
const MAX_ATTEMPTS: usize = 32;

/// Length bounds for generated routes, in segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteShape {
    pub min_segments: usize,
    pub max_segments: usize,
}

impl Default for RouteShape {
    /// At least two segments, at most ten.
    fn default() -> Self {
        Self { min_segments: 2, max_segments: 10 }
    }
}

/// Generate up to `count` random routes over `graph`, keyed by `AgentId(0..count)`.
///
/// Consecutive segments in each route are adjacent and no segment repeats.
///
/// # Errors
///
/// [`ProgressError::Generate`] if `graph` has no segments or `shape` is
/// empty (`min_segments == 0` or `min_segments > max_segments`).
pub fn random_routes(
    graph: &TopologyGraph,
    count: usize,
    shape: RouteShape,
    seed:  u64,
) -> ProgressResult<BTreeMap<AgentId, Vec<SegmentId>>> {
    if graph.segment_count() == 0 {
        return Err(ProgressError::Generate("topology has no segments".into()));
    }
    if shape.min_segments == 0 || shape.min_segments > shape.max_segments {
        return Err(ProgressError::Generate(format!(
            "invalid route length bounds {}..={}",
            shape.min_segments, shape.max_segments
        )));
    }

    let mut routes = BTreeMap::new();
    for i in 0..count {
        let agent = AgentId(i as u32);
        let mut rng = AgentRng::new(seed, agent);

        let walk = (0..MAX_ATTEMPTS)
            .map(|_| random_walk(graph, shape.max_segments, &mut rng))
            .find(|walk| walk.len() >= shape.min_segments);

        match walk {
            Some(walk) => {
                routes.insert(agent, walk);
            }
            None => warn!(%agent, "no random walk long enough; agent skipped"),
        }
    }
    Ok(routes)
}

fn random_walk(graph: &TopologyGraph, max_segments: usize, rng: &mut AgentRng) -> Vec<SegmentId> {
    let start = SegmentId(rng.gen_range(0..graph.segment_count() as u32));
    let mut walk = vec![start];
    let mut options: Vec<SegmentId> = Vec::new();

    while walk.len() < max_segments {
        let last = walk[walk.len() - 1];
        options.clear();
        options.extend(graph.successors(last).filter(|s| !walk.contains(s)));
        match rng.choose(&options) {
            Some(&next) => walk.push(next),
            None => break,
        }
    }
    walk
}
