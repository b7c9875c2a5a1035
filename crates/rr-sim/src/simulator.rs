//! What the controller needs from the traffic simulator.
//!
//! Segment ids cross this boundary as the simulator's own strings, so
//! junction-internal segments (which are not part of the topology) can be
//! recognised by name.

use rr_core::AgentId;

use crate::SimResult;

/// Live per-segment traffic figures.
pub trait NetworkState {
    /// Current expected traversal time of `segment`, in seconds.
    fn segment_travel_time(&self, segment: &str) -> f64;

    /// Occupancy of `segment` during the last step (vehicles per segment,
    /// or a fraction, as the simulator reports it).
    fn segment_occupancy(&self, segment: &str) -> f64;
}

/// A step-driven traffic simulator the controller can steer.
///
/// Agent queries return neutral values (`None`, `0.0`) for agents the
/// simulator does not know.
pub trait Simulator: NetworkState {
    /// Agents still driving or waiting to depart.  The run ends at zero.
    fn pending_agents(&self) -> usize;

    /// Advance one step.  An error here ends the run.
    fn step(&mut self) -> SimResult<()>;

    /// Simulated seconds per step.
    fn delta_t(&self) -> f64;

    /// Agents currently on the network.
    fn active_agents(&self) -> Vec<AgentId>;

    /// Segment the agent is on, possibly a junction-internal one.
    fn current_segment(&self, agent: AgentId) -> Option<String>;

    /// Distance left to the end of the agent's current lane, in metres.
    fn lane_remaining_distance(&self, agent: AgentId) -> f64;

    /// The agent's full intended route, as first planned.
    fn intended_route(&self, agent: AgentId) -> Option<Vec<String>>;

    /// Accumulated waiting time so far, in seconds.
    fn waiting_time(&self, agent: AgentId) -> f64;

    /// Accumulated time loss so far, in seconds.
    fn time_loss(&self, agent: AgentId) -> f64;

    /// Replace the agent's route with `route`, which starts on its current
    /// segment.  Failures are reported per agent and do not stop the run.
    fn commit_route(&mut self, agent: AgentId, route: &[String]) -> SimResult<()>;
}
