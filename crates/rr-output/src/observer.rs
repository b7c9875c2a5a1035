//! `RerouteOutputObserver<W>` — bridges `RerouteObserver` to an `OutputWriter`.

use rr_core::Tick;
use rr_sim::{DecisionRecord, RerouteObserver, RunSummary, TickStats};

use crate::row::{DecisionRow, SummaryRow, TickRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`RerouteObserver`] that writes decisions, tick counters and the run
/// summary to any [`OutputWriter`].
///
/// Decisions are buffered and written once per tick.  Writer errors are
/// stored because observer methods have no return value; check
/// [`take_error`][Self::take_error] after `controller.run()` returns.
pub struct RerouteOutputObserver<W: OutputWriter> {
    writer:     W,
    pending:    Vec<DecisionRow>,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> RerouteOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, pending: Vec::new(), last_error: None }
    }

    /// Take the stored write error (if any) after the run.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn flush_decisions(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.writer.write_decisions(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }
}

impl<W: OutputWriter> RerouteObserver for RerouteOutputObserver<W> {
    fn on_decision(&mut self, record: &DecisionRecord) {
        self.pending.push(DecisionRow::from(record));
    }

    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        self.flush_decisions();
        let result = self.writer.write_tick(&TickRow::new(tick, stats));
        self.store_err(result);
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        self.flush_decisions();
        let result = self.writer.write_summary(&SummaryRow::from(summary));
        self.store_err(result);
        let result = self.writer.finish();
        self.store_err(result);
    }
}
