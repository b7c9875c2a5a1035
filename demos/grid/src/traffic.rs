//! A deliberately small traffic model for driving the controller.
//!
//! Vehicles move along their route at a speed that drops with the number of
//! vehicles on the same segment, and stop for one step at the end of each
//! segment.  Crossing an intersection takes one step on a junction-internal
//! segment named `:<node>_0`.

use std::collections::{BTreeMap, HashMap};

use rr_core::AgentId;
use rr_sim::{NetworkState, SimError, SimResult, Simulator};
use rr_topology::TopologyGraph;

/// Road length per queued vehicle, used for segment capacity.
const VEHICLE_SPACING_M: f64 = 7.5;

/// Speed never drops below this share of free-flow speed.
const MIN_SPEED_FACTOR: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Scheduled,
    Driving,
    Arrived,
}

struct Vehicle {
    depart:       u64,
    phase:        Phase,
    intended:     Vec<String>,
    route:        Vec<String>,
    index:        usize,
    position:     f64,
    junction:     Option<String>,
    waiting_time: f64,
    time_loss:    f64,
}

impl Vehicle {
    fn segment(&self) -> Option<&str> {
        match &self.junction {
            Some(j) => Some(j.as_str()),
            None => self.route.get(self.index).map(String::as_str),
        }
    }
}

struct Road {
    length:   f64,
    end_node: String,
}

/// Congestion-sensitive toy simulator over a [`TopologyGraph`].
pub struct ToyTraffic {
    roads:      HashMap<String, Road>,
    free_speed: f64,
    dt:         f64,
    step:       u64,
    vehicles:   BTreeMap<AgentId, Vehicle>,
    /// Vehicles per segment after the last step.
    occupancy:  HashMap<String, usize>,
}

impl ToyTraffic {
    pub fn new(graph: &TopologyGraph, free_speed: f64, dt: f64) -> Self {
        let roads = (0..graph.segment_count())
            .map(|i| {
                let (_, to) = graph.segment_nodes(rr_core::SegmentId(i as u32));
                let road = Road {
                    length:   graph.segment_length[i],
                    end_node: graph.node_name(to).to_owned(),
                };
                (graph.segment_names[i].clone(), road)
            })
            .collect();
        Self {
            roads,
            free_speed,
            dt,
            step: 0,
            vehicles: BTreeMap::new(),
            occupancy: HashMap::new(),
        }
    }

    /// Schedule a vehicle to enter `route[0]` after step `depart`.
    ///
    /// `intended` is what the vehicle reports as its planned route.
    pub fn add_vehicle(&mut self, agent: AgentId, depart: u64, route: Vec<String>, intended: Vec<String>) {
        self.vehicles.insert(agent, Vehicle {
            depart,
            phase: Phase::Scheduled,
            intended,
            route,
            index: 0,
            position: 0.0,
            junction: None,
            waiting_time: 0.0,
            time_loss: 0.0,
        });
    }

    /// Vehicles on `segment` as a share of its capacity.
    fn load(&self, segment: &str) -> f64 {
        let Some(road) = self.roads.get(segment) else {
            return 0.0;
        };
        let capacity = (road.length / VEHICLE_SPACING_M).max(1.0);
        self.occupancy.get(segment).copied().unwrap_or(0) as f64 / capacity
    }

    fn speed_factor(&self, segment: &str) -> f64 {
        (1.0 - self.load(segment)).max(MIN_SPEED_FACTOR)
    }

    fn driving(&self, agent: AgentId) -> Option<&Vehicle> {
        self.vehicles.get(&agent).filter(|v| v.phase == Phase::Driving)
    }

    fn recount(&mut self) {
        self.occupancy.clear();
        for v in self.vehicles.values().filter(|v| v.phase == Phase::Driving) {
            if let Some(seg) = v.segment() {
                *self.occupancy.entry(seg.to_owned()).or_default() += 1;
            }
        }
    }
}

impl NetworkState for ToyTraffic {
    fn segment_travel_time(&self, segment: &str) -> f64 {
        match self.roads.get(segment) {
            Some(road) => road.length / (self.free_speed * self.speed_factor(segment)),
            None => 0.0,
        }
    }

    fn segment_occupancy(&self, segment: &str) -> f64 {
        self.load(segment)
    }
}

impl Simulator for ToyTraffic {
    fn pending_agents(&self) -> usize {
        self.vehicles.values().filter(|v| v.phase != Phase::Arrived).count()
    }

    fn step(&mut self) -> SimResult<()> {
        self.step += 1;

        let factors: HashMap<AgentId, f64> = self
            .vehicles
            .iter()
            .filter(|(_, v)| v.phase == Phase::Driving && v.junction.is_none())
            .filter_map(|(&id, v)| Some((id, self.speed_factor(v.segment()?))))
            .collect();

        for (id, v) in self.vehicles.iter_mut() {
            match v.phase {
                Phase::Arrived => continue,
                Phase::Scheduled => {
                    if self.step > v.depart {
                        v.phase = Phase::Driving;
                    }
                    continue;
                }
                Phase::Driving => {}
            }

            if v.junction.take().is_some() {
                v.index += 1;
                v.position = 0.0;
                continue;
            }

            let segment = v
                .route
                .get(v.index)
                .ok_or_else(|| SimError::Simulator(format!("vehicle {id} has no segment to drive")))?;
            let road = self
                .roads
                .get(segment)
                .ok_or_else(|| SimError::Simulator(format!("vehicle {id} on unknown segment {segment}")))?;

            // A vehicle at the stop line crosses on the following step.
            if v.position >= road.length {
                if v.index + 1 < v.route.len() {
                    v.junction = Some(format!(":{}_0", road.end_node));
                } else {
                    v.phase = Phase::Arrived;
                }
                continue;
            }

            let factor = factors.get(id).copied().unwrap_or(1.0);
            v.position = (v.position + self.free_speed * factor * self.dt).min(road.length);
            v.time_loss += self.dt * (1.0 - factor);
            if factor <= MIN_SPEED_FACTOR {
                v.waiting_time += self.dt;
            }
        }

        self.recount();
        Ok(())
    }

    fn delta_t(&self) -> f64 {
        self.dt
    }

    fn active_agents(&self) -> Vec<AgentId> {
        self.vehicles
            .iter()
            .filter(|(_, v)| v.phase == Phase::Driving)
            .map(|(&id, _)| id)
            .collect()
    }

    fn current_segment(&self, agent: AgentId) -> Option<String> {
        self.driving(agent)?.segment().map(str::to_owned)
    }

    fn lane_remaining_distance(&self, agent: AgentId) -> f64 {
        let Some(v) = self.driving(agent) else {
            return 0.0;
        };
        if v.junction.is_some() {
            return 0.0;
        }
        v.route
            .get(v.index)
            .and_then(|s| self.roads.get(s))
            .map_or(0.0, |road| (road.length - v.position).max(0.0))
    }

    fn intended_route(&self, agent: AgentId) -> Option<Vec<String>> {
        self.vehicles.get(&agent).map(|v| v.intended.clone())
    }

    fn waiting_time(&self, agent: AgentId) -> f64 {
        self.vehicles.get(&agent).map_or(0.0, |v| v.waiting_time)
    }

    fn time_loss(&self, agent: AgentId) -> f64 {
        self.vehicles.get(&agent).map_or(0.0, |v| v.time_loss)
    }

    /// Replace the route from the current segment on.  The old route's tail
    /// after the new route's last segment is kept.
    fn commit_route(&mut self, agent: AgentId, route: &[String]) -> SimResult<()> {
        let v = self
            .vehicles
            .get_mut(&agent)
            .filter(|v| v.phase == Phase::Driving)
            .ok_or(SimError::UnknownAgent(agent))?;
        if v.junction.is_some() || route.first() != v.route.get(v.index) {
            return Err(SimError::Simulator(format!(
                "route for {agent} does not start on its current segment"
            )));
        }

        let ahead = &v.route[v.index..];
        let tail = match route.last().and_then(|last| ahead.iter().position(|s| s == last)) {
            Some(i) => ahead[i + 1..].to_vec(),
            None => Vec::new(),
        };
        let mut next = route.to_vec();
        next.extend(tail);
        v.route = next;
        v.index = 0;
        Ok(())
    }
}
