use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("route file parse error: {0}")]
    Parse(String),

    #[error("agent {agent} is listed more than once")]
    DuplicateAgent { agent: u32 },

    #[error("route generation failed: {0}")]
    Generate(String),
}

pub type ProgressResult<T> = Result<T, ProgressError>;
