//! Scripted [`Battlefield`] used by tests and replay tooling.
//!
//! The board answers geometry queries from an explicit unit list and
//! pre-recorded paths. It never simulates combat or computes paths on its own.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Battlefield, Coord, Side, UnitKind, UnitRecord};

const DEFAULT_TURRET_RANGE: f32 = 3.5;

/// Pre-recorded path from a launch cell to the opposing edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptedPath {
    /// Launch cell the path starts from.
    pub start: Coord,
    /// Ordered cells traversed by the path.
    pub cells: Vec<Coord>,
}

/// Battlefield whose answers are fully determined by scripted data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptedBattlefield {
    units: Vec<UnitRecord>,
    blocked: BTreeSet<Coord>,
    paths: Vec<ScriptedPath>,
    turret_range: f32,
}

impl Default for ScriptedBattlefield {
    fn default() -> Self {
        Self {
            units: Vec::new(),
            blocked: BTreeSet::new(),
            paths: Vec::new(),
            turret_range: DEFAULT_TURRET_RANGE,
        }
    }
}

impl ScriptedBattlefield {
    /// Creates an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit to the board.
    #[must_use]
    pub fn with_unit(mut self, kind: UnitKind, side: Side, coord: Coord, health: f32) -> Self {
        self.units.push(UnitRecord {
            kind,
            side,
            coord,
            health,
        });
        self
    }

    /// Marks a cell as unavailable for any placement.
    #[must_use]
    pub fn with_blocked(mut self, cell: Coord) -> Self {
        let _ = self.blocked.insert(cell);
        self
    }

    /// Records the path a mobile unit launched from `start` would follow.
    #[must_use]
    pub fn with_path(mut self, start: Coord, cells: Vec<Coord>) -> Self {
        self.paths.retain(|path| path.start != start);
        self.paths.push(ScriptedPath { start, cells });
        self
    }

    /// Overrides the distance at which turrets can attack a cell.
    #[must_use]
    pub fn with_turret_range(mut self, range: f32) -> Self {
        self.turret_range = range;
        self
    }

    /// Units placed on the board.
    #[must_use]
    pub fn units(&self) -> &[UnitRecord] {
        &self.units
    }
}

impl Battlefield for ScriptedBattlefield {
    fn can_spawn(&self, kind: UnitKind, cell: Coord) -> bool {
        if self.blocked.contains(&cell) {
            return false;
        }

        self.units
            .iter()
            .filter(|unit| unit.coord == cell)
            .all(|unit| !kind.is_stationary() && !unit.kind.is_stationary())
    }

    fn path_to_edge(&self, cell: Coord) -> Option<Vec<Coord>> {
        self.paths
            .iter()
            .find(|path| path.start == cell)
            .map(|path| path.cells.clone())
    }

    fn attackers_of(&self, cell: Coord, side: Side) -> Vec<UnitRecord> {
        self.units
            .iter()
            .filter(|unit| unit.kind == UnitKind::Turret && unit.side == side)
            .filter(|unit| unit.coord.distance_to(cell) <= self.turret_range)
            .copied()
            .collect()
    }

    fn cells_within_radius(&self, cell: Coord, radius: f32) -> Vec<Coord> {
        if radius < 0.0 {
            return Vec::new();
        }

        let reach = radius.floor() as i32;
        let mut cells = Vec::new();
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let candidate = cell.offset(dx, dy);
                if candidate.x() < 0 || candidate.y() < 0 {
                    continue;
                }
                if candidate.distance_to(cell) <= radius {
                    cells.push(candidate);
                }
            }
        }
        cells
    }

    fn units_at(&self, cell: Coord) -> Vec<UnitRecord> {
        self.units
            .iter()
            .filter(|unit| unit.coord == cell)
            .copied()
            .collect()
    }
}
