//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `decisions.csv`
//! - `tick_stats.csv`
//! - `run_summary.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DecisionRow, OutputResult, SummaryRow, TickRow};

/// Writes run output to three CSV files.
pub struct CsvWriter {
    decisions: Writer<File>,
    ticks:     Writer<File>,
    summary:   Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut decisions = Writer::from_path(dir.join("decisions.csv"))?;
        decisions.write_record([
            "tick", "agent_id", "current", "target", "candidates", "chosen_index",
            "outcome", "fallback", "committed", "route",
        ])?;

        let mut ticks = Writer::from_path(dir.join("tick_stats.csv"))?;
        ticks.write_record(["tick", "active", "decisions", "commits", "fallbacks"])?;

        let mut summary = Writer::from_path(dir.join("run_summary.csv"))?;
        summary.write_record([
            "steps", "simulated_secs", "total_travel_time", "total_waiting_time",
            "total_time_loss", "decisions", "fallbacks",
        ])?;

        Ok(Self { decisions, ticks, summary, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
        for row in rows {
            self.decisions.write_record(&[
                row.tick.to_string(),
                row.agent_id.to_string(),
                row.current.clone(),
                row.target.clone(),
                row.candidates.to_string(),
                row.chosen_index.map(|i| i.to_string()).unwrap_or_default(),
                row.outcome.to_owned(),
                (row.fallback as u8).to_string(),
                (row.committed as u8).to_string(),
                row.route.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_tick(&mut self, row: &TickRow) -> OutputResult<()> {
        self.ticks.write_record(&[
            row.tick.to_string(),
            row.active.to_string(),
            row.decisions.to_string(),
            row.commits.to_string(),
            row.fallbacks.to_string(),
        ])?;
        Ok(())
    }

    fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
        self.summary.write_record(&[
            row.steps.to_string(),
            row.simulated_secs.to_string(),
            row.total_travel_time.to_string(),
            row.total_waiting_time.to_string(),
            row.total_time_loss.to_string(),
            row.decisions.to_string(),
            row.fallbacks.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.decisions.flush()?;
        self.ticks.flush()?;
        self.summary.flush()?;
        Ok(())
    }
}
