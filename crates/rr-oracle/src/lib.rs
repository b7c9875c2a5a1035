//! `rr-oracle` — candidate route types and the decision oracles that pick one.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`candidate`] | `PathMetrics`, `Candidate`, `CandidateSet`                    |
//! | [`oracle`]    | `DecisionOracle` trait, `ShortestWeightOracle`, `FastestOracle` |
//! | [`llm`]       | `LlmOracle` — OpenAI-compatible chat-completions oracle       |
//! | [`config`]    | `LlmConfig` — endpoint, credentials, timeout from the env     |
//! | [`prompt`]    | `PromptTemplate` — minijinja prompt rendering                 |
//! | [`parse`]     | `parse_choice` — route extraction from free-form replies      |
//! | [`error`]     | `OracleError`, `OracleResult<T>`                              |
//!
//! # Contract
//!
//! An oracle receives one non-empty [`CandidateSet`] and returns the route of
//! one of its members.  The oracle is not trusted to honour that: callers
//! check membership and fall back to the first candidate on any error or
//! foreign answer.

pub mod candidate;
pub mod config;
pub mod error;
pub mod llm;
pub mod oracle;
pub mod parse;
pub mod prompt;


pub use candidate::{Candidate, CandidateSet, PathMetrics};
pub use config::LlmConfig;
pub use error::{OracleError, OracleResult};
pub use llm::LlmOracle;
pub use oracle::{DecisionOracle, FastestOracle, ShortestWeightOracle};
pub use parse::parse_choice;
pub use prompt::PromptTemplate;
