//! grid — rerouting demo on a synthetic city grid.
//!
//! Generates random trips over a 6 × 6 grid, drives them with a small
//! congestion model, and lets the controller reroute vehicles at every
//! intersection.  The LLM oracle is used when `REROUTE_LLM_API_URL` and
//! `REROUTE_LLM_API_KEY` are set; otherwise the fastest-route oracle decides.
//!
//! ```text
//! cargo run -p grid --release [config.json]
//! ```
//!
//! `config.json` holds a `RerouteConfig`; missing fields take defaults.

mod network;
mod traffic;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use rr_core::{AgentId, SimRng, Tick};
use rr_oracle::{DecisionOracle, FastestOracle, LlmConfig, LlmOracle};
use rr_output::{CsvWriter, OutputWriter, RerouteOutputObserver};
use rr_progress::{RouteShape, random_routes};
use rr_sim::{ControllerBuilder, DecisionRecord, RerouteConfig, RerouteObserver, RunSummary, TickStats};

use network::build_grid;
use traffic::ToyTraffic;

// ── Constants ─────────────────────────────────────────────────────────────────

const GRID_ROWS:        usize = 6;
const GRID_COLS:        usize = 6;
const BLOCK_METRES:     f64   = 120.0;
const SIGNAL_EVERY:     usize = 3;
const VEHICLE_COUNT:    usize = 60;
const SEED:             u64   = 42;
const STEP_SECS:        f64   = 1.0;
const FREE_SPEED_MPS:   f64   = 13.9; // 50 km/h
const DEPART_WINDOW:    u64   = 120;
/// Every n-th segment of a trip becomes a waypoint of its intended route.
const WAYPOINT_STRIDE:  usize = 3;
const OUTPUT_DIR:       &str  = "output/grid";

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: OutputWriter> {
    inner:     RerouteOutputObserver<W>,
    decisions: usize,
    ticks:     usize,
}

impl<W: OutputWriter> CountingObserver<W> {
    fn new(inner: RerouteOutputObserver<W>) -> Self {
        Self { inner, decisions: 0, ticks: 0 }
    }
}

impl<W: OutputWriter> RerouteObserver for CountingObserver<W> {
    fn on_decision(&mut self, record: &DecisionRecord) {
        self.decisions += 1;
        self.inner.on_decision(record);
    }

    fn on_tick_end(&mut self, tick: Tick, stats: &TickStats) {
        self.ticks += 1;
        self.inner.on_tick_end(tick, stats);
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        self.inner.on_run_end(summary);
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

fn load_config() -> Result<RerouteConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            serde_json::from_str(&text).with_context(|| format!("parsing {path}"))
        }
        None => Ok(RerouteConfig::default()),
    }
}

fn pick_oracle() -> Result<Box<dyn DecisionOracle>> {
    match LlmConfig::from_env() {
        Ok(config) => {
            info!(model = %config.model, url = %config.api_url, "using LLM oracle");
            Ok(Box::new(LlmOracle::new(config)?))
        }
        Err(e) => {
            info!(reason = %e, "LLM oracle not configured; using fastest-route oracle");
            Ok(Box::new(FastestOracle))
        }
    }
}

/// Every `stride`-th segment plus the last one.
fn waypoints(route: &[String], stride: usize) -> Vec<String> {
    let last = route.len().saturating_sub(1);
    route
        .iter()
        .enumerate()
        .filter(|&(i, _)| i % stride == 0 || i == last)
        .map(|(_, s)| s.clone())
        .collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .init();

    println!("=== grid — dynamic k-shortest-path rerouting ===");
    println!("Grid: {GRID_ROWS} × {GRID_COLS}  |  Vehicles: {VEHICLE_COUNT}  |  Seed: {SEED}");
    println!();

    // 1. Configuration and oracle.
    let config = load_config()?;
    let oracle = pick_oracle()?;
    println!("Oracle: {}  |  k = {}", oracle.name(), config.k);

    // 2. Road network.
    let graph = build_grid(GRID_ROWS, GRID_COLS, BLOCK_METRES, SIGNAL_EVERY)?;
    println!("Road network: {} nodes, {} segments", graph.node_count(), graph.segment_count());

    // 3. Trips: a random walk to drive, thinned to waypoints as the plan.
    let shape = RouteShape { min_segments: 4, max_segments: 14 };
    let trips = random_routes(&graph, VEHICLE_COUNT, shape, SEED)?;
    let mut rng = SimRng::new(SEED);
    let mut traffic = ToyTraffic::new(&graph, FREE_SPEED_MPS, STEP_SECS);
    for (&agent, route) in &trips {
        let names: Vec<String> = route.iter().map(|&s| graph.segment_name(s).to_owned()).collect();
        let intended = waypoints(&names, WAYPOINT_STRIDE);
        traffic.add_vehicle(agent, rng.gen_range(0..DEPART_WINDOW), names, intended);
    }
    println!("Generated {} trips", trips.len());
    println!();

    // 4. Controller.
    let mut controller = ControllerBuilder::new(graph, oracle).config(config).build()?;

    // 5. Output.
    std::fs::create_dir_all(OUTPUT_DIR)?;
    let writer = CsvWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(RerouteOutputObserver::new(writer));

    // 6. Run.
    let t0 = Instant::now();
    let summary = controller.run(&mut traffic, &mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 7. Summary.
    println!("Run complete in {:.3} s", elapsed.as_secs_f64());
    println!("  decisions.csv   : {} rows", obs.decisions);
    println!("  tick_stats.csv  : {} rows", obs.ticks);
    println!("  run_summary.csv : 1 row");
    println!();

    println!("{:<22} {:>12}", "Metric", "Value");
    println!("{}", "-".repeat(35));
    println!("{:<22} {:>12}", "steps", summary.steps);
    println!("{:<22} {:>12.1}", "total travel time (s)", summary.total_travel_time);
    println!("{:<22} {:>12.1}", "total waiting time (s)", summary.total_waiting_time);
    println!("{:<22} {:>12.1}", "total time loss (s)", summary.total_time_loss);
    println!("{:<22} {:>12}", "decisions", summary.decisions);
    println!("{:<22} {:>12}", "fallbacks", summary.fallbacks);

    let stuck: Vec<AgentId> = trips
        .keys()
        .copied()
        .filter(|&a| controller.tracker().progress(a).is_some_and(|p| !p.finished))
        .collect();
    if !stuck.is_empty() {
        println!();
        println!("{} vehicles still en route at the step limit", stuck.len());
    }

    Ok(())
}
