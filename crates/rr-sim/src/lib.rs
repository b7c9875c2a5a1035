//! `rr-sim` — the rerouting controller and its simulator-facing seams.
//!
//! # Per-tick loop
//!
//! ```text
//! while simulator.pending_agents() > 0:
//!   ① Step      — advance the simulator one step.
//!   ② Account   — travel time += active × Δt; remember each agent's last
//!                 waiting time and time loss; forget agents that left.
//!   ③ Classify  — for each active agent, ascending AgentId:
//!                   junction segment             → skip
//!                   unknown segment              → skip (logged)
//!                   tracker.next_target == None  → skip (finished / no route)
//!                   remaining distance > limit   → skip
//!                   already decided on segment   → skip
//!                   otherwise                    → pending decision
//!   ④ Search    — k-shortest paths per pending decision
//!                 (parallel with the `parallel` feature).
//!   ⑤ Decide    — sequential, ascending AgentId: evaluate metrics, ask the
//!                 oracle, fall back to candidate 0 on error or a foreign
//!                 answer, commit exactly once, latch the decision.
//! ```
//!
//! # Crate layout
//!
//! | Module        | Contents                                                   |
//! |---------------|------------------------------------------------------------|
//! | [`simulator`] | `NetworkState`, `Simulator` — what the controller consumes |
//! | [`evaluator`] | `CandidateEvaluator` — per-path metrics                    |
//! | [`controller`]| `RerouteController` — the loop above                       |
//! | [`builder`]   | `ControllerBuilder`                                        |
//! | [`record`]    | `DecisionRecord`, `TickStats`, `RunSummary`                |
//! | [`observer`]  | `RerouteObserver`, `NoopObserver`                          |
//! | [`config`]    | `RerouteConfig`                                            |
//! | [`error`]     | `SimError`, `SimResult<T>`                                 |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs phase ④ on Rayon's thread pool.                   |
//! | `serde`    | Derives on `RerouteConfig` and the run records.        |
//! | `fx-hash`  | FxHash for per-agent maps.                             |

pub mod builder;
pub mod config;
pub mod controller;
pub mod error;
pub mod evaluator;
pub mod observer;
pub mod record;
pub mod simulator;


pub use builder::ControllerBuilder;
pub use config::RerouteConfig;
pub use controller::RerouteController;
pub use error::{SimError, SimResult};
pub use evaluator::CandidateEvaluator;
pub use observer::{NoopObserver, RerouteObserver};
pub use record::{DecisionOutcome, DecisionRecord, RunSummary, TickStats};
pub use simulator::{NetworkState, Simulator};
