//! `rr-progress` — where each agent is along its intended route.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`state`]    | `ProgressState`, `RouteProgress` — per-agent state machine   |
//! | [`tracker`]  | `ProgressTracker` — all agents, plus the decision latch      |
//! | [`loader`]   | `load_routes_csv` / `load_routes_reader`, `resolve_route`    |
//! | [`generate`] | `random_routes` — random-walk routes over a topology         |
//! | [`error`]    | `ProgressError`, `ProgressResult<T>`                         |
//!
//! # State machine
//!
//! ```text
//!  NoRoute ──observe──▶ EnRoute(0) ──reach route[i]──▶ EnRoute(i+1)
//!                            │                              │
//!                            └──── reach last / overrun ────┴──▶ Finished
//! ```
//!
//! `Finished` is terminal.  The entry stays until the caller removes it
//! with [`ProgressTracker::forget`] or [`ProgressTracker::retain_active`],
//! so a finished agent is never re-observed as new.

pub mod error;
pub mod generate;
pub mod loader;
pub mod state;
pub mod tracker;

#[cfg(test)]
mod tests;

pub use error::{ProgressError, ProgressResult};
pub use generate::{RouteShape, random_routes};
pub use loader::{RouteTable, load_routes_csv, load_routes_reader, resolve_route};
pub use state::{ProgressState, RouteProgress};
pub use tracker::ProgressTracker;
