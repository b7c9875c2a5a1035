//! The `ProgressTracker` — route progress for every agent in the run.

use rr_core::{AgentId, SegmentId};
use tracing::trace;

use crate::{ProgressState, RouteProgress};

#[cfg(feature = "fx-hash")]
type AgentMap<V> = rustc_hash::FxHashMap<AgentId, V>;
#[cfg(not(feature = "fx-hash"))]
type AgentMap<V> = std::collections::HashMap<AgentId, V>;

#[cfg(feature = "fx-hash")]
type AgentSet = rustc_hash::FxHashSet<AgentId>;
#[cfg(not(feature = "fx-hash"))]
type AgentSet = std::collections::HashSet<AgentId>;

/// Owns the [`RouteProgress`] of every tracked agent.
///
/// Agents appear on first [`observe`](Self::observe) and disappear only
/// through [`forget`](Self::forget) or [`retain_active`](Self::retain_active).
#[derive(Debug, Default)]
pub struct ProgressTracker {
    entries: AgentMap<RouteProgress>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn is_tracked(&self, agent: AgentId) -> bool {
        self.entries.contains_key(&agent)
    }

    /// Start tracking `agent` with `route`.
    ///
    /// A no-op for an agent that is already tracked: the first observed route
    /// is the intended one, and later route overrides do not reset progress.
    /// Returns the agent's state after the call.
    pub fn observe(&mut self, agent: AgentId, route: Vec<SegmentId>) -> ProgressState {
        self.entries
            .entry(agent)
            .or_insert_with(|| {
                trace!(%agent, segments = route.len(), "tracking route");
                RouteProgress::new(route)
            })
            .state()
    }

    /// Report `agent` on `current` and return the segment it should now be
    /// heading toward.
    ///
    /// `None` when the agent is finished or has no route.
    pub fn next_target(&mut self, agent: AgentId, current: SegmentId) -> Option<SegmentId> {
        let progress = self.entries.get_mut(&agent)?;
        let before = progress.target_index;
        let target = progress.advance(current);
        if progress.target_index != before {
            trace!(%agent, from = before, to = progress.target_index, "route target advanced");
        }
        target
    }

    pub fn state(&self, agent: AgentId) -> ProgressState {
        self.entries
            .get(&agent)
            .map_or(ProgressState::NoRoute, RouteProgress::state)
    }

    pub fn progress(&self, agent: AgentId) -> Option<&RouteProgress> {
        self.entries.get(&agent)
    }

    // ── Decision latch ────────────────────────────────────────────────────

    /// `true` unless a decision was already taken for `agent` on `segment`
    /// during its current stay there.
    ///
    /// Untracked and finished agents never need a decision.
    pub fn needs_decision(&self, agent: AgentId, segment: SegmentId) -> bool {
        match self.entries.get(&agent) {
            Some(p) => !p.finished && p.decided_on != Some(segment),
            None => false,
        }
    }

    /// Latch the decision for `agent` on `segment`.  The latch clears once the
    /// agent is reported on a different segment.
    pub fn mark_decided(&mut self, agent: AgentId, segment: SegmentId) {
        if let Some(p) = self.entries.get_mut(&agent) {
            p.decided_on = Some(segment);
        }
    }

    // ── Removal ───────────────────────────────────────────────────────────

    /// Drop `agent` (it left the simulation).  Returns its last progress.
    pub fn forget(&mut self, agent: AgentId) -> Option<RouteProgress> {
        self.entries.remove(&agent)
    }

    /// Drop every agent not in `active`.  Returns how many were dropped.
    pub fn retain_active(&mut self, active: &[AgentId]) -> usize {
        let keep: AgentSet = active.iter().copied().collect();
        let before = self.entries.len();
        self.entries.retain(|agent, _| keep.contains(agent));
        before - self.entries.len()
    }
}
