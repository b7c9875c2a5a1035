//! The `OutputWriter` trait implemented by backend writers.

use crate::{DecisionRow, OutputResult, SummaryRow, TickRow};

/// A sink for run output.
///
/// Errors surface through [`RerouteOutputObserver::take_error`][crate::RerouteOutputObserver::take_error]
/// when the writer is driven by the observer.
pub trait OutputWriter {
    /// Write a batch of decisions.
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()>;

    /// Write one tick's counters.
    fn write_tick(&mut self, row: &TickRow) -> OutputResult<()>;

    /// Write the end-of-run totals.
    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
