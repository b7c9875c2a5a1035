//! The `DecisionOracle` trait and the static heuristics.

use crate::{CandidateSet, OracleError, OracleResult};

/// Picks one route out of a [`CandidateSet`].
///
/// Implementations must return the `route` of one of the supplied
/// candidates.  Calls are synchronous and may block (network oracles); the
/// controller calls them one at a time, never concurrently for one agent.
pub trait DecisionOracle: Send + Sync {
    /// Short name for logs and output rows.
    fn name(&self) -> &str;

    /// Choose a route from `set`.  `set` is never empty when called by the
    /// controller.
    fn choose(&self, set: &CandidateSet) -> OracleResult<Vec<String>>;
}

impl<O: DecisionOracle + ?Sized> DecisionOracle for Box<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn choose(&self, set: &CandidateSet) -> OracleResult<Vec<String>> {
        (**self).choose(set)
    }
}

// ── Static heuristics ─────────────────────────────────────────────────────────

/// Lowest static weight; earliest candidate on ties.
///
/// Candidate sets come out of the search ordered by weight, so in practice
/// this returns the first candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShortestWeightOracle;

impl DecisionOracle for ShortestWeightOracle {
    fn name(&self) -> &str {
        "shortest-weight"
    }

    fn choose(&self, set: &CandidateSet) -> OracleResult<Vec<String>> {
        pick(set, set.argmin_by(|m| m.weight))
    }
}

/// Lowest estimated travel time under current traffic; earliest on ties.
#[derive(Debug, Default, Clone, Copy)]
pub struct FastestOracle;

impl DecisionOracle for FastestOracle {
    fn name(&self) -> &str {
        "fastest"
    }

    fn choose(&self, set: &CandidateSet) -> OracleResult<Vec<String>> {
        pick(set, set.argmin_by(|m| m.estimated_time))
    }
}

fn pick(set: &CandidateSet, index: Option<usize>) -> OracleResult<Vec<String>> {
    index
        .map(|i| set.candidates[i].route.clone())
        .ok_or(OracleError::EmptyCandidates)
}
