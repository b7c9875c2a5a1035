//! Run observer for progress reporting and result collection.

use rr_core::Tick;

use crate::{DecisionRecord, RunSummary, TickStats};

/// Callbacks invoked by [`RerouteController::run`][crate::RerouteController::run].
///
/// All methods default to no-ops.
///
/// # Example — decision counter
///
/// ```rust,ignore
/// struct Counter(usize);
///
/// impl RerouteObserver for Counter {
///     fn on_decision(&mut self, _record: &DecisionRecord) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait RerouteObserver {
    /// Called before the simulator steps.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per decision, after the commit attempt.
    fn on_decision(&mut self, _record: &DecisionRecord) {}

    /// Called after every decision of the tick.
    fn on_tick_end(&mut self, _tick: Tick, _stats: &TickStats) {}

    /// Called once when the run is over.
    fn on_run_end(&mut self, _summary: &RunSummary) {}
}

/// A [`RerouteObserver`] that does nothing.
pub struct NoopObserver;

impl RerouteObserver for NoopObserver {}
