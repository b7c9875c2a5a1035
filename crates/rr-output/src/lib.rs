//! `rr-output` — run output writers for the reroute workspace.
//!
//! | Backend | Files created                                         |
//! |---------|-------------------------------------------------------|
//! | CSV     | `decisions.csv`, `tick_stats.csv`, `run_summary.csv` |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`RerouteOutputObserver`], which implements `rr_sim::RerouteObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use rr_output::{CsvWriter, RerouteOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = RerouteOutputObserver::new(writer);
//! controller.run(&mut sim, &mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::RerouteOutputObserver;
pub use row::{DecisionRow, SummaryRow, TickRow};
pub use writer::OutputWriter;
