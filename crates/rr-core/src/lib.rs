//! `rr-core` — foundational types for the `reroute` workspace.
//!
//! Every other `rr-*` crate depends on this one.  It has no `rr-*`
//! dependencies and a single external one (`rand`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                           |
//! |----------|----------------------------------------------------|
//! | [`ids`]  | `AgentId`, `NodeId`, `SegmentId`, `EdgeId`         |
//! | [`time`] | `Tick`, `StepClock`                                |
//! | [`rng`]  | `AgentRng` (per-agent), `SimRng` (global)          |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use ids::{AgentId, EdgeId, NodeId, SegmentId};
pub use rng::{AgentRng, SimRng};
pub use time::{StepClock, Tick};
