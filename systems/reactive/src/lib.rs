#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that reinforces the most recent breach location.
//!
//! Breaches are recorded by the action-frame callback into a [`BreachLog`],
//! which keeps the latest event for planning and a bounded history for
//! diagnostics. Only the latest event ever drives placements.

use std::collections::VecDeque;

use lane_defence_core::{BreachEvent, Coord, PlacementIntent, UnitKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of breaches retained for diagnostics.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Record of breaches suffered during the match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BreachLog {
    latest: Option<BreachEvent>,
    history: VecDeque<BreachEvent>,
    capacity: usize,
}

impl Default for BreachLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl BreachLog {
    /// Creates an empty log retaining at most `capacity` historic events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            latest: None,
            history: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends a breach, evicting the oldest history entry when full.
    pub fn record(&mut self, event: BreachEvent) {
        self.latest = Some(event);
        if self.capacity == 0 {
            return;
        }
        if self.history.len() == self.capacity {
            let _ = self.history.pop_front();
        }
        self.history.push_back(event);
    }

    /// Most recent breach, if any.
    #[must_use]
    pub fn latest(&self) -> Option<BreachEvent> {
        self.latest
    }

    /// Retained breaches from oldest to newest.
    pub fn history(&self) -> impl Iterator<Item = &BreachEvent> {
        self.history.iter()
    }

    /// Number of retained breaches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Reports whether no breach was ever recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }
}

/// Offsets of the local cluster built around a breach.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactiveConfig {
    /// Turret offsets relative to the breach cell.
    pub turret_offsets: Vec<[i32; 2]>,
    /// Shift applied to every turret cell to obtain the soak wall line.
    pub soak_shift: [i32; 2],
}

impl Default for ReactiveConfig {
    fn default() -> Self {
        Self {
            turret_offsets: vec![[0, 1], [1, 0], [-1, 0]],
            soak_shift: [0, 1],
        }
    }
}

/// Builder that reacts to the latest breach.
#[derive(Clone, Debug, Default)]
pub struct ReactiveDefence {
    config: ReactiveConfig,
}

impl ReactiveDefence {
    /// Creates a builder using the provided cluster layout.
    #[must_use]
    pub fn new(config: ReactiveConfig) -> Self {
        Self { config }
    }

    /// Emits the reinforcement cluster for the latest breach in `breaches`.
    pub fn handle(&self, breaches: &BreachLog, out: &mut Vec<PlacementIntent>) {
        let Some(breach) = breaches.latest() else {
            return;
        };

        let turrets: Vec<Coord> = self
            .config
            .turret_offsets
            .iter()
            .map(|[dx, dy]| breach.coord.offset(*dx, *dy))
            .collect();
        let [shift_x, shift_y] = self.config.soak_shift;
        let walls: Vec<Coord> = turrets
            .iter()
            .map(|cell| cell.offset(shift_x, shift_y))
            .collect();

        debug!(breach = %breach.coord, turn = breach.turn, "reinforcing latest breach");
        out.push(PlacementIntent::spawn(UnitKind::Turret, turrets));
        out.push(PlacementIntent::spawn(UnitKind::Wall, walls));
    }
}
