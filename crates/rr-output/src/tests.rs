//! Integration tests for rr-output.

#[cfg(test)]
mod helpers {
    use rr_core::{AgentId, Tick};
    use rr_sim::{DecisionOutcome, DecisionRecord, RunSummary};

    pub fn decision(tick: u64, agent: u32, outcome: DecisionOutcome) -> DecisionRecord {
        let none = outcome == DecisionOutcome::NoCandidates;
        DecisionRecord {
            tick:         Tick(tick),
            agent:        AgentId(agent),
            current:      "in".into(),
            target:       "out".into(),
            candidates:   if none { 0 } else { 2 },
            chosen_index: if none { None } else { Some(0) },
            route:        if none { vec![] } else { vec!["in".into(), "mid".into(), "out".into()] },
            outcome,
            committed:    !none,
        }
    }

    pub fn summary() -> RunSummary {
        RunSummary {
            steps:              120,
            simulated_secs:     60.0,
            total_travel_time:  845.5,
            total_waiting_time: 42.0,
            total_time_loss:    97.25,
            decisions:          9,
            fallbacks:          2,
        }
    }

    pub fn read_rows(path: &std::path::Path) -> Vec<csv::StringRecord> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.records().map(|r| r.unwrap()).collect()
    }
}

#[cfg(test)]
mod csv_tests {
    use rr_sim::DecisionOutcome;
    use tempfile::TempDir;

    use super::helpers::{decision, read_rows, summary};
    use crate::csv::CsvWriter;
    use crate::row::{DecisionRow, SummaryRow, TickRow};
    use crate::writer::OutputWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("decisions.csv").exists());
        assert!(dir.path().join("tick_stats.csv").exists());
        assert!(dir.path().join("run_summary.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("run_summary.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, [
            "steps", "simulated_secs", "total_travel_time", "total_waiting_time",
            "total_time_loss", "decisions", "fallbacks",
        ]);

        let mut rdr = csv::Reader::from_path(dir.path().join("tick_stats.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "active", "decisions", "commits", "fallbacks"]);
    }

    #[test]
    fn decision_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let rows = [
            DecisionRow::from(&decision(4, 7, DecisionOutcome::ContractViolation)),
            DecisionRow::from(&decision(4, 9, DecisionOutcome::NoCandidates)),
        ];
        w.write_decisions(&rows).unwrap();
        w.finish().unwrap();

        let read = read_rows(&dir.path().join("decisions.csv"));
        assert_eq!(read.len(), 2);
        assert_eq!(&read[0][1], "7");                  // agent_id
        assert_eq!(&read[0][5], "0");                  // chosen_index
        assert_eq!(&read[0][6], "contract_violation"); // outcome
        assert_eq!(&read[0][7], "1");                  // fallback
        assert_eq!(&read[0][9], "in mid out");         // route
        assert_eq!(&read[1][5], "");
        assert_eq!(&read[1][8], "0");                  // committed
    }

    #[test]
    fn summary_row_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_summary(&SummaryRow::from(&summary())).unwrap();
        w.write_tick(&TickRow { tick: 3, active: 5, decisions: 2, commits: 1, fallbacks: 1 }).unwrap();
        w.finish().unwrap();

        let read = read_rows(&dir.path().join("run_summary.csv"));
        assert_eq!(read.len(), 1);
        assert_eq!(&read[0][2], "845.5");
        assert_eq!(&read[0][3], "42");
        assert_eq!(&read[0][4], "97.25");

        let ticks = read_rows(&dir.path().join("tick_stats.csv"));
        assert_eq!(&ticks[0][1], "5");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}

#[cfg(test)]
mod observer_tests {
    use rr_core::Tick;
    use rr_sim::{DecisionOutcome, RerouteObserver, TickStats};

    use super::helpers::{decision, summary};
    use crate::{DecisionRow, OutputError, OutputResult, OutputWriter, RerouteOutputObserver, SummaryRow, TickRow};

    /// Keeps everything in memory; optionally fails decision writes.
    #[derive(Default)]
    struct MemWriter {
        decision_batches: Vec<Vec<DecisionRow>>,
        ticks:            Vec<TickRow>,
        summary:          Option<SummaryRow>,
        finished:         u32,
        fail:             bool,
    }

    impl OutputWriter for MemWriter {
        fn write_decisions(&mut self, rows: &[DecisionRow]) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.decision_batches.push(rows.to_vec());
            Ok(())
        }

        fn write_tick(&mut self, row: &TickRow) -> OutputResult<()> {
            self.ticks.push(*row);
            Ok(())
        }

        fn write_summary(&mut self, row: &SummaryRow) -> OutputResult<()> {
            self.summary = Some(*row);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    #[test]
    fn decisions_batched_per_tick() {
        let mut obs = RerouteOutputObserver::new(MemWriter::default());
        obs.on_decision(&decision(0, 1, DecisionOutcome::Chosen));
        obs.on_decision(&decision(0, 2, DecisionOutcome::OracleFailed));
        obs.on_tick_end(Tick(0), &TickStats { active: 2, decisions: 2, commits: 2, fallbacks: 1 });
        obs.on_tick_end(Tick(1), &TickStats::default());
        obs.on_run_end(&summary());

        assert!(obs.take_error().is_none());
        let w = obs.into_writer();
        assert_eq!(w.decision_batches.len(), 1);
        assert_eq!(w.decision_batches[0].len(), 2);
        assert_eq!(w.ticks.len(), 2);
        assert_eq!(w.ticks[0].fallbacks, 1);
        assert_eq!(w.summary.unwrap().decisions, 9);
        assert_eq!(w.finished, 1);
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = RerouteOutputObserver::new(MemWriter { fail: true, ..MemWriter::default() });
        obs.on_decision(&decision(0, 1, DecisionOutcome::Chosen));
        obs.on_tick_end(Tick(0), &TickStats::default());
        obs.on_decision(&decision(1, 1, DecisionOutcome::Chosen));
        obs.on_run_end(&summary());

        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
        // The summary is still written after a failed decision batch.
        assert!(obs.into_writer().summary.is_some());
    }
}
