#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the lane defence agent.
//!
//! This crate defines the vocabulary that connects the agent, its pure
//! planning systems, and the external simulation engine. The engine owns the
//! battlefield and answers queries through the [`Battlefield`] trait. Systems
//! read those queries together with per-turn values and respond exclusively
//! with [`PlacementIntent`] batches that the engine resolves at turn end.

use std::fmt;

use serde::{Deserialize, Serialize};

#[cfg(feature = "scaffolding")]
pub mod scaffolding;

/// Location of a single battlefield cell.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct Coord {
    x: i32,
    y: i32,
}

impl Coord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal position of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical position of the cell, increasing toward the opposing side.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the coordinate shifted by the provided deltas.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x.saturating_add(dx), self.y.saturating_add(dy))
    }

    /// Euclidean distance between two cells.
    #[must_use]
    pub fn distance_to(self, other: Coord) -> f32 {
        let dx = self.x as f32 - other.x as f32;
        let dy = self.y as f32 - other.y as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Builds a coordinate list from literal `[x, y]` pairs.
#[must_use]
pub fn coords(pairs: &[[i32; 2]]) -> Vec<Coord> {
    pairs.iter().copied().map(Coord::from).collect()
}

impl From<[i32; 2]> for Coord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl From<Coord> for [i32; 2] {
    fn from(coord: Coord) -> Self {
        [coord.x, coord.y]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Fixed horizontal partitions used to aggregate incoming damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// Cells at or left of the left boundary.
    Left,
    /// Cells between the two boundaries.
    Mid,
    /// Cells right of the mid boundary.
    Right,
}

impl Zone {
    /// Every zone in left-to-right order.
    pub const ALL: [Zone; 3] = [Zone::Left, Zone::Mid, Zone::Right];

    /// Lower-case label used in logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Mid => "mid",
            Self::Right => "right",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inclusive upper `x` bounds of the left and mid zones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneBounds {
    /// Largest `x` that still belongs to the left zone.
    pub left_max: i32,
    /// Largest `x` that still belongs to the mid zone.
    pub mid_max: i32,
}

impl ZoneBounds {
    /// Creates zone bounds from explicit boundaries.
    #[must_use]
    pub const fn new(left_max: i32, mid_max: i32) -> Self {
        Self { left_max, mid_max }
    }

    /// Buckets a coordinate into its zone by horizontal position.
    #[must_use]
    pub const fn zone_of(&self, coord: Coord) -> Zone {
        if coord.x() <= self.left_max {
            Zone::Left
        } else if coord.x() <= self.mid_max {
            Zone::Mid
        } else {
            Zone::Right
        }
    }
}

impl Default for ZoneBounds {
    fn default() -> Self {
        Self::new(9, 18)
    }
}

/// One value per zone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerZone<T> {
    /// Value for [`Zone::Left`].
    pub left: T,
    /// Value for [`Zone::Mid`].
    pub mid: T,
    /// Value for [`Zone::Right`].
    pub right: T,
}

impl<T> PerZone<T> {
    /// Creates a per-zone value from its three parts.
    #[must_use]
    pub const fn new(left: T, mid: T, right: T) -> Self {
        Self { left, mid, right }
    }

    /// Value stored for the provided zone.
    #[must_use]
    pub const fn get(&self, zone: Zone) -> &T {
        match zone {
            Zone::Left => &self.left,
            Zone::Mid => &self.mid,
            Zone::Right => &self.right,
        }
    }

    /// Mutable value stored for the provided zone.
    pub fn get_mut(&mut self, zone: Zone) -> &mut T {
        match zone {
            Zone::Left => &mut self.left,
            Zone::Mid => &mut self.mid,
            Zone::Right => &mut self.right,
        }
    }

    /// Iterates zones in left-to-right order alongside their values.
    pub fn iter(&self) -> impl Iterator<Item = (Zone, &T)> {
        Zone::ALL.into_iter().map(move |zone| (zone, self.get(zone)))
    }
}

/// Player perspective relative to the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Units and resources controlled by the agent.
    Own,
    /// Units and resources controlled by the opposing player.
    Opponent,
}

/// Resource pools consumed by placements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Consumed by stationary units and upgrades.
    Structure,
    /// Regenerating pool consumed by mobile units.
    Tempo,
}

/// Resource levels held by one player at the start of a turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePool {
    structure: f32,
    tempo: f32,
}

impl ResourcePool {
    /// Creates a pool snapshot from explicit levels.
    #[must_use]
    pub const fn new(structure: f32, tempo: f32) -> Self {
        Self { structure, tempo }
    }

    /// Available structure resource.
    #[must_use]
    pub const fn structure(&self) -> f32 {
        self.structure
    }

    /// Available tempo resource.
    #[must_use]
    pub const fn tempo(&self) -> f32 {
        self.tempo
    }

    /// Level of the requested resource.
    #[must_use]
    pub const fn level(&self, kind: ResourceKind) -> f32 {
        match kind {
            ResourceKind::Structure => self.structure,
            ResourceKind::Tempo => self.tempo,
        }
    }
}

/// Closed set of unit kinds the agent can place or observe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Cheapest stationary unit, used to soak damage.
    Wall,
    /// Stationary unit that boosts the health of passing friendly mobile units.
    Support,
    /// Standard ranged stationary unit.
    Turret,
    /// Cheap fast mobile unit.
    Runner,
    /// Heavy ranged mobile unit.
    Demolisher,
    /// Mobile interceptor that hunts opposing mobile units.
    Scout,
}

impl UnitKind {
    /// Every kind in wire type-index order.
    pub const ALL: [UnitKind; 6] = [
        UnitKind::Wall,
        UnitKind::Support,
        UnitKind::Turret,
        UnitKind::Runner,
        UnitKind::Demolisher,
        UnitKind::Scout,
    ];

    /// Resolves the kind encoded at the provided wire type index.
    #[must_use]
    pub fn from_type_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Wire type index of the kind.
    #[must_use]
    pub const fn type_index(self) -> usize {
        match self {
            Self::Wall => 0,
            Self::Support => 1,
            Self::Turret => 2,
            Self::Runner => 3,
            Self::Demolisher => 4,
            Self::Scout => 5,
        }
    }

    /// Reports whether the kind occupies its cell permanently once placed.
    #[must_use]
    pub const fn is_stationary(self) -> bool {
        matches!(self, Self::Wall | Self::Support | Self::Turret)
    }

    /// Resource pool the kind is paid from.
    #[must_use]
    pub const fn resource(self) -> ResourceKind {
        if self.is_stationary() {
            ResourceKind::Structure
        } else {
            ResourceKind::Tempo
        }
    }

    /// Lower-case label used in logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Support => "support",
            Self::Turret => "turret",
            Self::Runner => "runner",
            Self::Demolisher => "demolisher",
            Self::Scout => "scout",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pseudo-entries that share unit lists with real units in engine snapshots.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnitMarker {
    /// A stationary unit scheduled for removal.
    PendingRemoval,
    /// A stationary unit carrying an upgrade.
    Upgraded,
}

impl UnitMarker {
    /// Resolves the marker encoded at the provided wire type index.
    #[must_use]
    pub const fn from_type_index(index: usize) -> Option<Self> {
        match index {
            6 => Some(Self::PendingRemoval),
            7 => Some(Self::Upgraded),
            _ => None,
        }
    }
}

/// Cost and combat figures for a single unit kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitStats {
    /// Wire shorthand identifying the kind in engine messages.
    pub shorthand: String,
    /// Structure resource required to place one unit.
    pub structure_cost: f32,
    /// Tempo resource required to place one unit.
    pub tempo_cost: f32,
    /// Damage dealt per hit to mobile units.
    pub damage_to_mobile: f32,
    /// Health of a freshly placed unit.
    pub start_health: f32,
}

impl UnitStats {
    fn new(
        shorthand: &str,
        structure_cost: f32,
        tempo_cost: f32,
        damage_to_mobile: f32,
        start_health: f32,
    ) -> Self {
        Self {
            shorthand: shorthand.to_owned(),
            structure_cost,
            tempo_cost,
            damage_to_mobile,
            start_health,
        }
    }
}

/// Lookup from [`UnitKind`] to its cost and behaviour figures.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitCatalog {
    stats: [UnitStats; 6],
}

impl UnitCatalog {
    /// Figures for the provided kind.
    #[must_use]
    pub fn stats(&self, kind: UnitKind) -> &UnitStats {
        &self.stats[kind.type_index()]
    }

    /// Replaces the figures of one kind, returning the updated catalog.
    #[must_use]
    pub fn with_stats(mut self, kind: UnitKind, stats: UnitStats) -> Self {
        self.stats[kind.type_index()] = stats;
        self
    }

    /// Resolves a kind from its wire shorthand.
    #[must_use]
    pub fn kind_for_shorthand(&self, shorthand: &str) -> Option<UnitKind> {
        UnitKind::ALL
            .into_iter()
            .find(|kind| self.stats(*kind).shorthand == shorthand)
    }

    /// Cost of one unit of the provided kind in its own resource pool.
    #[must_use]
    pub fn cost(&self, kind: UnitKind) -> f32 {
        let stats = self.stats(kind);
        match kind.resource() {
            ResourceKind::Structure => stats.structure_cost,
            ResourceKind::Tempo => stats.tempo_cost,
        }
    }
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self {
            stats: [
                UnitStats::new("FF", 1.0, 0.0, 0.0, 60.0),
                UnitStats::new("EF", 4.0, 0.0, 0.0, 30.0),
                UnitStats::new("DF", 6.0, 0.0, 16.0, 75.0),
                UnitStats::new("PI", 0.0, 1.0, 2.0, 15.0),
                UnitStats::new("EI", 0.0, 3.0, 8.0, 5.0),
                UnitStats::new("SI", 0.0, 1.0, 20.0, 40.0),
            ],
        }
    }
}

/// Health of one observed unit in the current turn.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitObservation {
    /// Cell occupied by the unit.
    pub coord: Coord,
    /// Remaining health reported by the engine.
    pub health: f32,
}

impl UnitObservation {
    /// Creates a new observation.
    #[must_use]
    pub const fn new(coord: Coord, health: f32) -> Self {
        Self { coord, health }
    }
}

/// Fully described unit as reported by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    /// Kind of unit.
    pub kind: UnitKind,
    /// Owner of the unit.
    pub side: Side,
    /// Cell occupied by the unit.
    pub coord: Coord,
    /// Remaining health.
    pub health: f32,
}

impl UnitRecord {
    /// Projects the record onto the fields used for damage tracking.
    #[must_use]
    pub const fn observation(&self) -> UnitObservation {
        UnitObservation::new(self.coord, self.health)
    }
}

/// An opposing unit reaching the agent's edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BreachEvent {
    /// Edge cell where the breach happened.
    pub coord: Coord,
    /// Turn during which the breach was resolved.
    pub turn: u32,
}

/// Best-effort requests handed to the engine at the end of a turn.
///
/// The engine may reject any single cell, for example when the cell is
/// occupied or the owning resource pool is exhausted, without failing the
/// rest of the batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum PlacementIntent {
    /// Requests `count` units of `kind` at each of the provided cells.
    Spawn {
        /// Kind of unit to place.
        kind: UnitKind,
        /// Cells receiving the units.
        cells: Vec<Coord>,
        /// Number of units requested per cell.
        count: u32,
    },
    /// Requests an upgrade of the agent's units at each of the provided cells.
    Upgrade {
        /// Cells whose units should be upgraded.
        cells: Vec<Coord>,
    },
    /// Requests removal of the agent's unit at the provided cell.
    Remove {
        /// Cell holding the unit to remove.
        cell: Coord,
    },
}

impl PlacementIntent {
    /// Requests a single unit of `kind` at each cell.
    #[must_use]
    pub fn spawn(kind: UnitKind, cells: impl Into<Vec<Coord>>) -> Self {
        Self::spawn_many(kind, cells, 1)
    }

    /// Requests `count` units of `kind` at each cell.
    #[must_use]
    pub fn spawn_many(kind: UnitKind, cells: impl Into<Vec<Coord>>, count: u32) -> Self {
        Self::Spawn {
            kind,
            cells: cells.into(),
            count,
        }
    }

    /// Requests upgrades at each cell.
    #[must_use]
    pub fn upgrade(cells: impl Into<Vec<Coord>>) -> Self {
        Self::Upgrade {
            cells: cells.into(),
        }
    }

    /// Requests removal of the unit at `cell`.
    #[must_use]
    pub const fn remove(cell: Coord) -> Self {
        Self::Remove { cell }
    }

    /// Cells targeted by the intent.
    #[must_use]
    pub fn cells(&self) -> &[Coord] {
        match self {
            Self::Spawn { cells, .. } | Self::Upgrade { cells } => cells,
            Self::Remove { cell } => std::slice::from_ref(cell),
        }
    }
}

impl fmt::Display for PlacementIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn { kind, count, .. } => write!(f, "spawn {kind} x{count} at")?,
            Self::Upgrade { .. } => write!(f, "upgrade at")?,
            Self::Remove { .. } => write!(f, "remove at")?,
        }
        for cell in self.cells() {
            write!(f, " {cell}")?;
        }
        Ok(())
    }
}

/// Query surface answered by the external simulation engine.
///
/// Implementations reflect the battlefield at the start of the current turn;
/// intents emitted during the turn are not visible through these queries.
pub trait Battlefield {
    /// Reports whether a unit of `kind` could currently be placed at `cell`.
    fn can_spawn(&self, kind: UnitKind, cell: Coord) -> bool;

    /// Ordered cells a mobile unit launched from `cell` would traverse to the
    /// opposing edge, or `None` when no path exists.
    fn path_to_edge(&self, cell: Coord) -> Option<Vec<Coord>>;

    /// Stationary units owned by `side` that are able to attack `cell`.
    fn attackers_of(&self, cell: Coord, side: Side) -> Vec<UnitRecord>;

    /// Cells whose distance from `cell` does not exceed `radius`.
    fn cells_within_radius(&self, cell: Coord, radius: f32) -> Vec<Coord>;

    /// Units currently occupying `cell`.
    fn units_at(&self, cell: Coord) -> Vec<UnitRecord>;
}
