//! Controller configuration.

use crate::{SimError, SimResult};

/// Tunables for [`RerouteController`](crate::RerouteController).
///
/// ```
/// use rr_sim::RerouteConfig;
///
/// let cfg = RerouteConfig { k: 5, ..RerouteConfig::default() };
/// assert_eq!(cfg.decision_distance_m, 2.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RerouteConfig {
    /// Alternatives requested per decision.  Default: 3.
    pub k: usize,

    /// An agent is at a decision point once its remaining distance on the
    /// current segment is at or below this.  Metres.  Default: 2.0.
    pub decision_distance_m: f64,

    /// Segment ids starting with this are junction internals, never rerouted
    /// from.  Default: `":"`.
    pub junction_prefix: String,

    /// Stop after this many steps even if agents remain.  Default: no limit.
    pub max_steps: Option<u64>,
}

impl Default for RerouteConfig {
    fn default() -> Self {
        Self {
            k:                   3,
            decision_distance_m: 2.0,
            junction_prefix:     ":".to_owned(),
            max_steps:           None,
        }
    }
}

impl RerouteConfig {
    /// Reject values the controller cannot work with.
    pub fn validate(&self) -> SimResult<()> {
        if self.k == 0 {
            return Err(SimError::Config("k must be at least 1".into()));
        }
        if !self.decision_distance_m.is_finite() || self.decision_distance_m < 0.0 {
            return Err(SimError::Config(format!(
                "decision_distance_m must be a non-negative number, got {}",
                self.decision_distance_m
            )));
        }
        if self.junction_prefix.is_empty() {
            return Err(SimError::Config("junction_prefix must not be empty".into()));
        }
        Ok(())
    }

    #[inline]
    pub fn is_junction(&self, segment: &str) -> bool {
        segment.starts_with(self.junction_prefix.as_str())
    }
}
