//! Oracle error type.

use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong while asking an oracle for a choice.
///
/// None of these are fatal to a run: the controller falls back to the first
/// candidate.
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("candidate set is empty")]
    EmptyCandidates,

    #[error("oracle did not answer within {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("oracle endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unparseable oracle reply: {0}")]
    Parse(String),

    #[error("prompt template error: {0}")]
    Template(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type OracleResult<T> = Result<T, OracleError>;
