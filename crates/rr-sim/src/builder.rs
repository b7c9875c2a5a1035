//! Fluent builder for constructing a [`RerouteController`].

use rr_oracle::DecisionOracle;
use rr_progress::{ProgressTracker, RouteTable, resolve_route};
use rr_topology::TopologyGraph;
use tracing::info;

use crate::{RerouteConfig, RerouteController, SimError, SimResult};

/// Fluent builder for [`RerouteController<O>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                  | Default                                         |
/// |-------------------------|-------------------------------------------------|
/// | `.config(c)`            | `RerouteConfig::default()`                      |
/// | `.intended_routes(t)`   | none; routes are read from the simulator lazily |
///
/// # Example
///
/// ```rust,ignore
/// let mut controller = ControllerBuilder::new(graph, FastestOracle)
///     .config(RerouteConfig { k: 5, ..RerouteConfig::default() })
///     .intended_routes(load_routes_csv("routes.csv")?)
///     .build()?;
/// controller.run(&mut sim, &mut NoopObserver)?;
/// ```
pub struct ControllerBuilder<O: DecisionOracle> {
    graph:  TopologyGraph,
    oracle: O,
    config: Option<RerouteConfig>,
    routes: Option<RouteTable>,
}

impl<O: DecisionOracle> ControllerBuilder<O> {
    pub fn new(graph: TopologyGraph, oracle: O) -> Self {
        Self { graph, oracle, config: None, routes: None }
    }

    pub fn config(mut self, config: RerouteConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Preload intended routes, keyed by agent.
    ///
    /// Agents listed here are tracked from the start; the simulator's
    /// `intended_route` is only consulted for the rest.  Every segment must
    /// exist in the topology.
    pub fn intended_routes(mut self, routes: RouteTable) -> Self {
        self.routes = Some(routes);
        self
    }

    /// Validate the configuration, resolve preloaded routes and return a
    /// ready-to-run controller.
    pub fn build(self) -> SimResult<RerouteController<O>> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        if self.graph.segment_count() == 0 {
            return Err(SimError::Config("topology has no segments".into()));
        }

        let mut tracker = ProgressTracker::new();
        if let Some(routes) = self.routes {
            for (agent, names) in routes {
                let route = resolve_route(&self.graph, &names)?;
                tracker.observe(agent, route);
            }
        }

        info!(
            k         = config.k,
            oracle    = self.oracle.name(),
            preloaded = tracker.len(),
            "controller built"
        );

        Ok(RerouteController::new(self.graph, self.oracle, config, tracker))
    }
}
