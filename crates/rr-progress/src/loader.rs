//! CSV intended-route loader.
//!
//! # CSV format
//!
//! One row per agent.  `route` is a space-separated list of segment ids in
//! travel order; consecutive entries are waypoints and need not be adjacent.
//!
//! ```csv
//! agent_id,route
//! 0,E1 E4 -E9
//! 1,E2 E3
//! ```
//!
//! Rows with an empty route are kept: the agent is tracked but finishes
//! immediately.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use rr_core::{AgentId, SegmentId};
use rr_topology::{TopologyGraph, TopologyResult};

use crate::{ProgressError, ProgressResult};

/// Intended routes by agent, as segment names.  Ordered by `AgentId`.
pub type RouteTable = BTreeMap<AgentId, Vec<String>>;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    agent_id: u32,
    route:    String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load intended routes from a CSV file.
pub fn load_routes_csv(path: &Path) -> ProgressResult<RouteTable> {
    let file = std::fs::File::open(path)?;
    load_routes_reader(file)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
pub fn load_routes_reader<R: Read>(reader: R) -> ProgressResult<RouteTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut table = RouteTable::new();

    for result in csv_reader.deserialize::<RouteRecord>() {
        let row = result.map_err(|e| ProgressError::Parse(e.to_string()))?;
        let segments = row.route.split_whitespace().map(str::to_owned).collect();
        if table.insert(AgentId(row.agent_id), segments).is_some() {
            return Err(ProgressError::DuplicateAgent { agent: row.agent_id });
        }
    }

    Ok(table)
}

/// Intern a route's segment names against `graph`.
///
/// # Errors
///
/// [`TopologyError::UnknownSegment`](rr_topology::TopologyError::UnknownSegment)
/// for the first name not in the graph.
pub fn resolve_route<S: AsRef<str>>(graph: &TopologyGraph, route: &[S]) -> TopologyResult<Vec<SegmentId>> {
    route.iter().map(|name| graph.require_segment(name.as_ref())).collect()
}
