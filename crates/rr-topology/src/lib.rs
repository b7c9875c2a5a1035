//! `rr-topology` — road topology and k-shortest-paths search.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`graph`]   | `TopologySpec`, `TopologyBuilder`, `TopologyGraph` (CSR)      |
//! | [`ksp`]     | `find_k_shortest`, `shortest_path`, `Path`                    |
//! | [`error`]   | `TopologyError`, `TopologyResult<T>`                          |
//!
//! Callers reason in **segments** (the simulator's road ids); search runs on
//! **nodes**.  [`TopologyGraph::resolve_boundary_nodes`] is the single place
//! where one is translated into the other.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                        |
//! |---------|---------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `TopologySpec` and parts. |

pub mod error;
pub mod graph;
pub mod ksp;

#[cfg(test)]
mod tests;

pub use error::{TopologyError, TopologyResult};
pub use graph::{NodeSpec, SegmentSpec, TopologyBuilder, TopologyGraph, TopologySpec};
pub use ksp::{Path, find_k_shortest, shortest_path};
