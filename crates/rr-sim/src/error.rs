use rr_core::AgentId;
use rr_progress::ProgressError;
use rr_topology::TopologyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("controller configuration error: {0}")]
    Config(String),

    #[error("topology error: {0}")]
    Topology(#[from] TopologyError),

    #[error("route input error: {0}")]
    Routes(#[from] ProgressError),

    #[error("simulator error: {0}")]
    Simulator(String),

    #[error("simulator does not know agent {0}")]
    UnknownAgent(AgentId),
}

pub type SimResult<T> = Result<T, SimError>;
