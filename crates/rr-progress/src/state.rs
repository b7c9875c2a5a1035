//! Per-agent route progress.

use rr_core::SegmentId;

/// Where an agent stands relative to its intended route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProgressState {
    /// No intended route has been observed for this agent.
    NoRoute,
    /// Heading toward `route[i]`.
    EnRoute(usize),
    /// The last route segment has been reached.  Terminal.
    Finished,
}

impl ProgressState {
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, ProgressState::Finished)
    }
}

/// Intended route and cursor for one agent.
///
/// `route` is a sequence of waypoint segments; consecutive entries need not
/// be adjacent in the topology.  `target_index` only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteProgress {
    pub route:        Vec<SegmentId>,
    pub target_index: usize,
    pub finished:     bool,
    /// Segment on which the last reroute decision was taken, while the agent
    /// is still on it.
    pub decided_on:   Option<SegmentId>,
}

impl RouteProgress {
    /// Fresh progress at `EnRoute(0)`, or `Finished` for an empty route.
    pub fn new(route: Vec<SegmentId>) -> Self {
        let finished = route.is_empty();
        Self { route, target_index: 0, finished, decided_on: None }
    }

    pub fn state(&self) -> ProgressState {
        if self.finished {
            ProgressState::Finished
        } else {
            ProgressState::EnRoute(self.target_index)
        }
    }

    /// The segment currently aimed at, if any.
    #[inline]
    pub fn target(&self) -> Option<SegmentId> {
        if self.finished {
            None
        } else {
            self.route.get(self.target_index).copied()
        }
    }

    /// Apply one position report and return the new target.
    ///
    /// Reaching `route[i]` moves the cursor to `i + 1`; reaching the last
    /// segment (or finding the cursor past the end) finishes the route.  A
    /// position that is not the current target leaves the cursor alone, so
    /// repeated reports of the same segment advance at most once.
    pub fn advance(&mut self, current: SegmentId) -> Option<SegmentId> {
        if self.finished {
            return None;
        }
        if self.decided_on.is_some_and(|s| s != current) {
            self.decided_on = None;
        }

        let Some(&target) = self.route.get(self.target_index) else {
            self.finished = true;
            return None;
        };
        if current != target {
            return Some(target);
        }

        self.target_index += 1;
        match self.route.get(self.target_index) {
            Some(&next) => Some(next),
            None => {
                self.finished = true;
                None
            }
        }
    }
}
