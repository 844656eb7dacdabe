#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that maintains the fixed defensive perimeter.
//!
//! The perimeter is re-issued every turn. Placements the engine rejects are
//! simply absent until a later turn attempts them again. Forward-line walls
//! that were destroyed are re-placed and queued for an upgrade. The queue is
//! flushed once per turn after every other system has run, and a cell leaves
//! it only once the snapshot shows the wall upgraded.

use lane_defence_core::{coords, Battlefield, Coord, PlacementIntent, Side, UnitKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Static cell layout of the perimeter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerimeterLayout {
    /// Turrets guarding the corners and flanks.
    pub turrets: Vec<Coord>,
    /// Turrets placed one row behind the perimeter.
    pub anchors: Vec<Coord>,
    /// Sacrificial wall line funnelling opposing units.
    pub forward_line: Vec<Coord>,
    /// Walls that receive an upgrade every turn.
    pub reinforced_walls: Vec<Coord>,
    /// Number of opening turns on which the forward line is placed unconditionally.
    pub opening_turns: u32,
    /// Cells whose worn-out stationary unit is removed to make room for a fresh one.
    pub salvage: Vec<Coord>,
    /// Health below which a unit on a salvage cell is removed.
    pub salvage_health: f32,
}

impl Default for PerimeterLayout {
    fn default() -> Self {
        Self {
            turrets: coords(&[[0, 13], [2, 12], [25, 12], [26, 12], [4, 12]]),
            anchors: coords(&[[2, 11], [24, 11]]),
            forward_line: coords(&[
                [1, 13],
                [25, 13],
                [26, 13],
                [27, 13],
                [5, 12],
                [6, 11],
                [25, 11],
                [7, 10],
                [24, 10],
                [8, 9],
                [23, 9],
                [9, 8],
                [22, 8],
                [10, 7],
                [21, 7],
                [11, 6],
                [20, 6],
                [12, 5],
                [19, 5],
                [13, 4],
                [18, 4],
                [14, 3],
                [17, 3],
                [15, 2],
                [16, 2],
            ]),
            reinforced_walls: coords(&[[1, 13], [25, 13], [26, 13], [27, 13], [5, 12]]),
            opening_turns: 2,
            salvage: coords(&[[1, 13], [27, 13]]),
            salvage_health: 25.0,
        }
    }
}

/// Ordered set of cells awaiting an upgrade.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpgradeQueue {
    cells: Vec<Coord>,
}

impl UpgradeQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a cell, ignoring duplicates.
    pub fn push(&mut self, cell: Coord) {
        if !self.cells.contains(&cell) {
            self.cells.push(cell);
        }
    }

    /// Cells currently queued in insertion order.
    #[must_use]
    pub fn cells(&self) -> &[Coord] {
        &self.cells
    }

    /// Number of queued cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no cell is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Emits a single upgrade intent ordered by row.
    ///
    /// Cells sharing a row keep their insertion order. Cells stay queued
    /// until [`UpgradeQueue::retire`] sees them upgraded, so an upgrade the
    /// engine rejected is requested again on the next flush.
    pub fn flush(&self, out: &mut Vec<PlacementIntent>) {
        if self.cells.is_empty() {
            return;
        }

        let mut cells = self.cells.clone();
        cells.sort_by_key(|cell| cell.y());
        out.push(PlacementIntent::upgrade(cells));
    }

    /// Drops every queued cell listed in `upgraded`.
    pub fn retire(&mut self, upgraded: &[Coord]) {
        self.cells.retain(|cell| !upgraded.contains(cell));
    }
}

/// Builder that re-issues and repairs the perimeter every turn.
#[derive(Clone, Debug, Default)]
pub struct BaselineDefence {
    layout: PerimeterLayout,
    upgrades: UpgradeQueue,
}

impl BaselineDefence {
    /// Creates a builder for the provided layout.
    #[must_use]
    pub fn new(layout: PerimeterLayout) -> Self {
        Self {
            layout,
            upgrades: UpgradeQueue::new(),
        }
    }

    /// Layout maintained by the builder.
    #[must_use]
    pub fn layout(&self) -> &PerimeterLayout {
        &self.layout
    }

    /// Upgrades queued by the repair pass and not yet flushed.
    #[must_use]
    pub fn pending_upgrades(&self) -> &UpgradeQueue {
        &self.upgrades
    }

    /// Emits the perimeter intents for `turn`.
    pub fn handle<B: Battlefield + ?Sized>(
        &mut self,
        turn: u32,
        board: &B,
        out: &mut Vec<PlacementIntent>,
    ) {
        self.salvage(board, out);

        out.push(PlacementIntent::spawn(
            UnitKind::Turret,
            self.layout.turrets.clone(),
        ));
        out.push(PlacementIntent::spawn(
            UnitKind::Turret,
            self.layout.anchors.clone(),
        ));

        if turn < self.layout.opening_turns {
            out.push(PlacementIntent::spawn(
                UnitKind::Wall,
                self.layout.forward_line.clone(),
            ));
        } else {
            let mut repaired = 0usize;
            for &cell in &self.layout.forward_line {
                if board.can_spawn(UnitKind::Wall, cell) {
                    self.upgrades.push(cell);
                    out.push(PlacementIntent::spawn(UnitKind::Wall, [cell]));
                    repaired += 1;
                }
            }
            if repaired > 0 {
                debug!(turn, repaired, "forward line repaired");
            }
        }

        out.push(PlacementIntent::upgrade(
            self.layout.reinforced_walls.clone(),
        ));
    }

    /// Flushes queued upgrades; called once per turn after all other systems.
    pub fn flush_upgrades(&self, out: &mut Vec<PlacementIntent>) {
        self.upgrades.flush(out);
    }

    /// Forgets queued cells that the snapshot reports as upgraded.
    pub fn retire_upgrades(&mut self, upgraded: &[Coord]) {
        let before = self.upgrades.len();
        self.upgrades.retire(upgraded);
        let retired = before - self.upgrades.len();
        if retired > 0 {
            debug!(retired, "queued upgrades completed");
        }
    }

    fn salvage<B: Battlefield + ?Sized>(&self, board: &B, out: &mut Vec<PlacementIntent>) {
        for &cell in &self.layout.salvage {
            let worn = board.units_at(cell).into_iter().any(|unit| {
                unit.side == Side::Own
                    && unit.kind.is_stationary()
                    && unit.health < self.layout.salvage_health
            });
            if worn {
                out.push(PlacementIntent::remove(cell));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_ignores_duplicates() {
        let mut queue = UpgradeQueue::new();
        queue.push(Coord::new(5, 12));
        queue.push(Coord::new(5, 12));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn empty_queue_flushes_nothing() {
        let queue = UpgradeQueue::new();
        let mut out = Vec::new();
        queue.flush(&mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn default_layout_keeps_reinforced_walls_on_forward_line() {
        let layout = PerimeterLayout::default();
        assert_eq!(layout.forward_line.len(), 25);
        assert!(layout
            .reinforced_walls
            .iter()
            .all(|cell| layout.forward_line.contains(cell)));
    }
}
