//! Topology error type.

use thiserror::Error;

/// Errors produced by `rr-topology`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TopologyError {
    #[error("segment {segment} references unknown node {node}")]
    UnknownNode { segment: String, node: String },

    #[error("segment {segment} has invalid weight {weight}")]
    InvalidWeight { segment: String, weight: f64 },

    #[error("duplicate segment id {0}")]
    DuplicateSegment(String),

    #[error("duplicate node id {0}")]
    DuplicateNode(String),

    #[error("segment {0} not found in topology")]
    UnknownSegment(String),
}

impl TopologyError {
    /// `true` for errors that make the input topology unusable.
    ///
    /// These are fatal at startup; `UnknownSegment` is only fatal to the
    /// call that raised it.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, TopologyError::UnknownSegment(_))
    }
}

pub type TopologyResult<T> = Result<T, TopologyError>;
