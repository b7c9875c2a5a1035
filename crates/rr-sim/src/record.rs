//! Records emitted by the controller: one per decision, one per tick, one
//! per run.

use rr_core::{AgentId, Tick};

/// How a decision's route was picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecisionOutcome {
    /// The oracle answered with one of the candidates.
    Chosen,
    /// The oracle failed (error, timeout); candidate 0 was used.
    OracleFailed,
    /// The oracle answered with a route outside the set; candidate 0 was used.
    ContractViolation,
    /// No path to the target exists; the agent keeps its route.
    NoCandidates,
}

impl DecisionOutcome {
    /// `true` when candidate 0 was substituted for the oracle's answer.
    pub fn is_fallback(self) -> bool {
        matches!(self, DecisionOutcome::OracleFailed | DecisionOutcome::ContractViolation)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DecisionOutcome::Chosen            => "chosen",
            DecisionOutcome::OracleFailed      => "oracle_failed",
            DecisionOutcome::ContractViolation => "contract_violation",
            DecisionOutcome::NoCandidates      => "no_candidates",
        }
    }
}

/// One reroute decision.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionRecord {
    pub tick:         Tick,
    pub agent:        AgentId,
    pub current:      String,
    pub target:       String,
    /// Size of the candidate set.
    pub candidates:   usize,
    /// Index of the committed candidate; `None` with no candidates.
    pub chosen_index: Option<usize>,
    /// The committed route; empty with no candidates.
    pub route:        Vec<String>,
    pub outcome:      DecisionOutcome,
    /// `false` if the simulator rejected the route.
    pub committed:    bool,
}

/// Per-tick counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickStats {
    pub active:    usize,
    pub decisions: usize,
    pub commits:   usize,
    pub fallbacks: usize,
}

/// End-of-run metrics.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    pub steps:              u64,
    pub simulated_secs:     f64,
    /// Sum over steps of active agents × Δt, in seconds.
    pub total_travel_time:  f64,
    /// Sum of each agent's last reported waiting time.
    pub total_waiting_time: f64,
    /// Sum of each agent's last reported time loss.
    pub total_time_loss:    f64,
    pub decisions:          u64,
    pub fallbacks:          u64,
}
