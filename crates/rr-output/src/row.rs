//! Plain data row types written by output backends.

use rr_sim::{DecisionRecord, RunSummary, TickStats};
use rr_core::Tick;

/// One reroute decision, flattened for tabular output.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRow {
    pub tick:         u64,
    pub agent_id:     u32,
    pub current:      String,
    pub target:       String,
    pub candidates:   u32,
    /// `None` when there were no candidates.
    pub chosen_index: Option<u32>,
    pub outcome:      &'static str,
    pub fallback:     bool,
    pub committed:    bool,
    /// Segment ids joined by single spaces.
    pub route:        String,
}

impl From<&DecisionRecord> for DecisionRow {
    fn from(r: &DecisionRecord) -> Self {
        Self {
            tick:         r.tick.0,
            agent_id:     r.agent.0,
            current:      r.current.clone(),
            target:       r.target.clone(),
            candidates:   r.candidates as u32,
            chosen_index: r.chosen_index.map(|i| i as u32),
            outcome:      r.outcome.as_str(),
            fallback:     r.outcome.is_fallback(),
            committed:    r.committed,
            route:        r.route.join(" "),
        }
    }
}

/// Counters for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRow {
    pub tick:      u64,
    pub active:    u64,
    pub decisions: u64,
    pub commits:   u64,
    pub fallbacks: u64,
}

impl TickRow {
    pub fn new(tick: Tick, stats: &TickStats) -> Self {
        Self {
            tick:      tick.0,
            active:    stats.active as u64,
            decisions: stats.decisions as u64,
            commits:   stats.commits as u64,
            fallbacks: stats.fallbacks as u64,
        }
    }
}

/// End-of-run totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryRow {
    pub steps:              u64,
    pub simulated_secs:     f64,
    pub total_travel_time:  f64,
    pub total_waiting_time: f64,
    pub total_time_loss:    f64,
    pub decisions:          u64,
    pub fallbacks:          u64,
}

impl From<&RunSummary> for SummaryRow {
    fn from(s: &RunSummary) -> Self {
        Self {
            steps:              s.steps,
            simulated_secs:     s.simulated_secs,
            total_travel_time:  s.total_travel_time,
            total_waiting_time: s.total_waiting_time,
            total_time_loss:    s.total_time_loss,
            decisions:          s.decisions,
            fallbacks:          s.fallbacks,
        }
    }
}
