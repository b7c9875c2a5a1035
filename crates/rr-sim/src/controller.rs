//! The `RerouteController` and its tick loop.

use std::collections::BTreeMap;

use rr_core::{AgentId, SegmentId, StepClock, Tick};
use rr_oracle::DecisionOracle;
use rr_progress::{ProgressTracker, resolve_route};
use rr_topology::{Path, TopologyGraph, TopologyResult, find_k_shortest};
use tracing::{debug, info, trace, warn};

use crate::{
    CandidateEvaluator, DecisionOutcome, DecisionRecord, RerouteConfig, RerouteObserver,
    RunSummary, SimResult, Simulator, TickStats,
};

#[cfg(feature = "fx-hash")]
type AgentSet = rustc_hash::FxHashSet<AgentId>;
#[cfg(not(feature = "fx-hash"))]
type AgentSet = std::collections::HashSet<AgentId>;

// ── Per-tick working data ─────────────────────────────────────────────────────

/// An agent that passed classification this tick.
struct Pending {
    agent:   AgentId,
    current: SegmentId,
    target:  SegmentId,
}

/// Last figures the simulator reported for an agent.
#[derive(Clone, Copy, Default)]
struct AgentReport {
    waiting_time: f64,
    time_loss:    f64,
}

// ── RerouteController ─────────────────────────────────────────────────────────

/// Owns the topology, the oracle and all per-agent routing state for one run.
///
/// Create via [`ControllerBuilder`][crate::ControllerBuilder].
pub struct RerouteController<O: DecisionOracle> {
    pub config: RerouteConfig,

    /// Step counter; `step_secs` is taken from the simulator at run start.
    pub clock: StepClock,

    pub(crate) graph:   TopologyGraph,
    pub(crate) oracle:  O,
    pub(crate) tracker: ProgressTracker,

    /// Agents whose intended route names segments outside the topology.
    unresolved: AgentSet,

    /// Agents active on the previous tick.
    on_network: AgentSet,

    /// Keyed by agent so the final sums are taken in a fixed order.
    reports: BTreeMap<AgentId, AgentReport>,

    travel_time: f64,
    decisions:   u64,
    fallbacks:   u64,
}

impl<O: DecisionOracle> RerouteController<O> {
    pub(crate) fn new(
        graph:   TopologyGraph,
        oracle:  O,
        config:  RerouteConfig,
        tracker: ProgressTracker,
    ) -> Self {
        Self {
            config,
            clock: StepClock::new(1.0),
            graph,
            oracle,
            tracker,
            unresolved:  AgentSet::default(),
            on_network:  AgentSet::default(),
            reports:     BTreeMap::new(),
            travel_time: 0.0,
            decisions:   0,
            fallbacks:   0,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn graph(&self) -> &TopologyGraph {
        &self.graph
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Step `sim` until it reports no pending agents (or `max_steps` is hit),
    /// rerouting agents as they reach decision points.
    ///
    /// Only a simulator `step` failure ends the run early; every per-agent
    /// problem is logged and skipped.
    pub fn run<S, B>(&mut self, sim: &mut S, observer: &mut B) -> SimResult<RunSummary>
    where
        S: Simulator + ?Sized,
        B: RerouteObserver,
    {
        self.clock.step_secs = sim.delta_t();
        info!(
            k        = self.config.k,
            oracle   = self.oracle.name(),
            segments = self.graph.segment_count(),
            "reroute run starting"
        );

        while sim.pending_agents() > 0 {
            if self.config.max_steps.is_some_and(|max| self.clock.current_tick.0 >= max) {
                info!(steps = self.clock.current_tick.0, "step limit reached");
                break;
            }
            let now = self.clock.current_tick;
            observer.on_tick_start(now);
            sim.step()?;
            let stats = self.process_tick(sim, observer);
            observer.on_tick_end(now, &stats);
            self.clock.advance();
        }

        let summary = self.summary();
        info!(
            steps        = summary.steps,
            decisions    = summary.decisions,
            fallbacks    = summary.fallbacks,
            travel_time  = summary.total_travel_time,
            waiting_time = summary.total_waiting_time,
            time_loss    = summary.total_time_loss,
            "reroute run finished"
        );
        observer.on_run_end(&summary);
        Ok(summary)
    }

    /// Handle the current tick against the simulator's present state.
    ///
    /// Does not step the simulator or advance the clock; [`run`](Self::run)
    /// does both around this call.
    pub fn process_tick<S, B>(&mut self, sim: &mut S, observer: &mut B) -> TickStats
    where
        S: Simulator + ?Sized,
        B: RerouteObserver,
    {
        let now = self.clock.current_tick;

        let mut active = sim.active_agents();
        active.sort_unstable();
        active.dedup();

        self.account(&*sim, &active);

        // ── Classify (sequential, ascending AgentId) ─────────────────────
        let mut pending = Vec::new();
        for &agent in &active {
            if let Some(p) = self.classify(&*sim, agent) {
                pending.push(p);
            }
        }

        // ── Search (pure reads of the topology) ──────────────────────────
        let searches = self.search(&pending);

        // ── Decide and commit (sequential, ascending AgentId) ────────────
        let mut stats = TickStats { active: active.len(), ..TickStats::default() };
        for (p, result) in pending.iter().zip(searches) {
            let Some(record) = self.decide(sim, now, p, result) else {
                continue;
            };
            stats.decisions += 1;
            stats.commits   += usize::from(record.committed);
            stats.fallbacks += usize::from(record.outcome.is_fallback());
            observer.on_decision(&record);
        }
        stats
    }

    /// Metrics accumulated so far.
    pub fn summary(&self) -> RunSummary {
        RunSummary {
            steps:              self.clock.current_tick.0,
            simulated_secs:     self.clock.elapsed_secs(),
            total_travel_time:  self.travel_time,
            total_waiting_time: self.reports.values().map(|r| r.waiting_time).sum(),
            total_time_loss:    self.reports.values().map(|r| r.time_loss).sum(),
            decisions:          self.decisions,
            fallbacks:          self.fallbacks,
        }
    }

    // ── Phases ────────────────────────────────────────────────────────────

    /// Travel-time accounting and departure bookkeeping.
    fn account<S: Simulator + ?Sized>(&mut self, sim: &S, active: &[AgentId]) {
        self.travel_time += active.len() as f64 * sim.delta_t();

        for &agent in active {
            self.reports.insert(agent, AgentReport {
                waiting_time: sim.waiting_time(agent),
                time_loss:    sim.time_loss(agent),
            });
        }

        let current: AgentSet = active.iter().copied().collect();
        for &gone in self.on_network.difference(&current) {
            trace!(agent = %gone, "agent left the network");
            self.tracker.forget(gone);
            self.unresolved.remove(&gone);
        }
        self.on_network = current;
    }

    fn classify<S: Simulator + ?Sized>(&mut self, sim: &S, agent: AgentId) -> Option<Pending> {
        let name = sim.current_segment(agent)?;
        if self.config.is_junction(&name) {
            return None;
        }

        let at_decision_point = sim.lane_remaining_distance(agent) <= self.config.decision_distance_m;

        let Some(current) = self.graph.segment_id(&name) else {
            if at_decision_point {
                warn!(%agent, segment = %name, "segment not in topology; agent not rerouted");
            }
            return None;
        };

        if !self.ensure_tracked(sim, agent) {
            return None;
        }

        // The tracker sees every position, decision point or not.
        let target = self.tracker.next_target(agent, current)?;

        if !at_decision_point || !self.tracker.needs_decision(agent, current) {
            return None;
        }
        Some(Pending { agent, current, target })
    }

    /// Start tracking `agent` from the simulator's intended route if needed.
    fn ensure_tracked<S: Simulator + ?Sized>(&mut self, sim: &S, agent: AgentId) -> bool {
        if self.tracker.is_tracked(agent) {
            return true;
        }
        if self.unresolved.contains(&agent) {
            return false;
        }
        let Some(route) = sim.intended_route(agent) else {
            return false;
        };
        match resolve_route(&self.graph, &route) {
            Ok(ids) => {
                self.tracker.observe(agent, ids);
                true
            }
            Err(e) => {
                warn!(%agent, error = %e, "intended route outside topology; agent will not be rerouted");
                self.unresolved.insert(agent);
                false
            }
        }
    }

    fn search(&self, pending: &[Pending]) -> Vec<TopologyResult<Vec<Path>>> {
        let graph = &self.graph;
        let k     = self.config.k;

        #[cfg(not(feature = "parallel"))]
        {
            pending
                .iter()
                .map(|p| find_k_shortest(graph, p.current, p.target, k))
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            pending
                .par_iter()
                .map(|p| find_k_shortest(graph, p.current, p.target, k))
                .collect()
        }
    }

    fn decide<S: Simulator + ?Sized>(
        &mut self,
        sim:    &mut S,
        now:    Tick,
        p:      &Pending,
        result: TopologyResult<Vec<Path>>,
    ) -> Option<DecisionRecord> {
        let agent = p.agent;
        let paths = match result {
            Ok(paths) => paths,
            Err(e) => {
                warn!(%agent, error = %e, "candidate search failed; agent skipped this tick");
                return None;
            }
        };

        self.tracker.mark_decided(agent, p.current);
        self.decisions += 1;

        let current = self.graph.segment_name(p.current).to_owned();
        let target  = self.graph.segment_name(p.target).to_owned();

        if paths.is_empty() {
            debug!(%agent, %current, %target, "no path to target; keeping current route");
            return Some(DecisionRecord {
                tick:         now,
                agent,
                current,
                target,
                candidates:   0,
                chosen_index: None,
                route:        Vec::new(),
                outcome:      DecisionOutcome::NoCandidates,
                committed:    false,
            });
        }

        let mut set = CandidateEvaluator::new(&self.graph)
            .candidate_set(agent, &current, &target, &paths, &*sim);
        let candidates = set.len();

        let (index, outcome) = match self.oracle.choose(&set) {
            Ok(route) => match set.position(&route) {
                Some(i) => (i, DecisionOutcome::Chosen),
                None => {
                    warn!(
                        %agent,
                        oracle = self.oracle.name(),
                        ?route,
                        "oracle contract violation: answer not in candidate set; using candidate 0"
                    );
                    (0, DecisionOutcome::ContractViolation)
                }
            },
            Err(e) => {
                warn!(%agent, oracle = self.oracle.name(), error = %e, "oracle failed; using candidate 0");
                (0, DecisionOutcome::OracleFailed)
            }
        };
        if outcome.is_fallback() {
            self.fallbacks += 1;
        }

        let route = set.candidates.swap_remove(index).route;
        let committed = match sim.commit_route(agent, &route) {
            Ok(()) => true,
            Err(e) => {
                warn!(%agent, error = %e, "simulator rejected route");
                false
            }
        };
        debug!(%agent, %current, %target, candidates, index, ?outcome, "rerouted");

        Some(DecisionRecord {
            tick: now,
            agent,
            current,
            target,
            candidates,
            chosen_index: Some(index),
            route,
            outcome,
            committed,
        })
    }
}
