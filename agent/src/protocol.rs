//! Decoding of the engine's JSON messages.
//!
//! Decoding is lenient: absent lists and unreadable unit entries are skipped
//! with a warning so a partially malformed snapshot still yields a usable
//! [`TurnState`]. Only payloads that are not JSON at all are rejected.

use lane_defence_core::{
    Coord, ResourcePool, Side, UnitCatalog, UnitKind, UnitMarker, UnitObservation, UnitRecord,
    UnitStats,
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{trace, warn};

/// Errors raised while decoding engine messages.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The message was empty or contained only whitespace.
    #[error("engine message was empty")]
    EmptyPayload,
    /// The message was not valid JSON for the expected shape.
    #[error("malformed engine message: {0}")]
    Json(#[from] serde_json::Error),
}

fn decode<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T, ProtocolError> {
    if raw.trim().is_empty() {
        return Err(ProtocolError::EmptyPayload);
    }
    Ok(serde_json::from_str(raw)?)
}

/// Match-wide configuration delivered once at match start.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawMatchConfig")]
pub struct MatchConfig {
    catalog: UnitCatalog,
}

impl MatchConfig {
    /// Wraps an explicit catalog.
    #[must_use]
    pub fn new(catalog: UnitCatalog) -> Self {
        Self { catalog }
    }

    /// Decodes the engine's configuration message.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        decode(raw)
    }

    /// Unit costs and figures for the match.
    #[must_use]
    pub fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawMatchConfig {
    #[serde(rename = "unitInformation", default)]
    unit_information: Vec<RawUnitInformation>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUnitInformation {
    #[serde(default)]
    shorthand: Option<String>,
    #[serde(default)]
    cost1: Option<f32>,
    #[serde(default)]
    cost2: Option<f32>,
    #[serde(rename = "attackDamageWalker", default)]
    attack_damage_walker: Option<f32>,
    #[serde(rename = "startHealth", default)]
    start_health: Option<f32>,
}

impl From<RawMatchConfig> for MatchConfig {
    fn from(raw: RawMatchConfig) -> Self {
        let mut catalog = UnitCatalog::default();
        for (index, info) in raw.unit_information.into_iter().enumerate() {
            let Some(kind) = UnitKind::from_type_index(index) else {
                continue;
            };
            let base = catalog.stats(kind).clone();
            let stats = UnitStats {
                shorthand: info.shorthand.unwrap_or(base.shorthand),
                structure_cost: info.cost1.unwrap_or(base.structure_cost),
                tempo_cost: info.cost2.unwrap_or(base.tempo_cost),
                damage_to_mobile: info.attack_damage_walker.unwrap_or(base.damage_to_mobile),
                start_health: info.start_health.unwrap_or(base.start_health),
            };
            catalog = catalog.with_stats(kind, stats);
        }
        Self { catalog }
    }
}

/// Health, resources and units of one player.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlayerState {
    /// Remaining health.
    pub health: f32,
    /// Resource levels at the start of the turn.
    pub resources: ResourcePool,
    /// Units on the battlefield.
    pub units: Vec<UnitRecord>,
    /// Cells whose stationary unit carries an upgrade.
    pub upgraded: Vec<Coord>,
}

impl PlayerState {
    /// Projects the units onto damage-tracking observations.
    #[must_use]
    pub fn observations(&self) -> Vec<UnitObservation> {
        self.units.iter().map(UnitRecord::observation).collect()
    }
}

/// Battlefield snapshot delivered at the start of every turn.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(from = "RawTurnState")]
pub struct TurnState {
    /// Turn number, starting at zero.
    pub turn: u32,
    /// The agent's own state.
    pub own: PlayerState,
    /// The opposing player's state.
    pub opponent: PlayerState,
}

impl TurnState {
    /// Decodes the engine's per-turn snapshot.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        decode(raw)
    }

    /// State of the requested player.
    #[must_use]
    pub fn player(&self, side: Side) -> &PlayerState {
        match side {
            Side::Own => &self.own,
            Side::Opponent => &self.opponent,
        }
    }
}

type RawUnitLists = Vec<Vec<Vec<Value>>>;

#[derive(Debug, Default, Deserialize)]
struct RawTurnState {
    #[serde(rename = "turnInfo", default)]
    turn_info: Option<Vec<f64>>,
    #[serde(rename = "p1Stats", default)]
    p1_stats: Option<Vec<f64>>,
    #[serde(rename = "p2Stats", default)]
    p2_stats: Option<Vec<f64>>,
    #[serde(rename = "p1Units", default)]
    p1_units: Option<RawUnitLists>,
    #[serde(rename = "p2Units", default)]
    p2_units: Option<RawUnitLists>,
}

impl From<RawTurnState> for TurnState {
    fn from(raw: RawTurnState) -> Self {
        Self {
            turn: turn_number(raw.turn_info.as_deref()),
            own: player_state(Side::Own, raw.p1_stats, raw.p1_units),
            opponent: player_state(Side::Opponent, raw.p2_stats, raw.p2_units),
        }
    }
}

fn turn_number(turn_info: Option<&[f64]>) -> u32 {
    turn_info
        .and_then(|info| info.get(1))
        .filter(|turn| turn.is_finite() && **turn >= 0.0)
        .map_or(0, |turn| *turn as u32)
}

fn player_state(side: Side, stats: Option<Vec<f64>>, lists: Option<RawUnitLists>) -> PlayerState {
    let stats = stats.unwrap_or_default();
    let stat = |index: usize| stats.get(index).copied().unwrap_or(0.0) as f32;

    let mut units = Vec::new();
    let mut upgraded = Vec::new();
    for (type_index, entries) in lists.unwrap_or_default().into_iter().enumerate() {
        if let Some(marker) = UnitMarker::from_type_index(type_index) {
            if marker != UnitMarker::Upgraded {
                trace!(?marker, count = entries.len(), "skipping unit markers");
                continue;
            }
            for entry in entries {
                match decode_unit(&entry) {
                    Some((coord, _)) => upgraded.push(coord),
                    None => warn!(?entry, "unreadable upgrade marker"),
                }
            }
            continue;
        }
        let Some(kind) = UnitKind::from_type_index(type_index) else {
            warn!(type_index, "unknown unit type in snapshot");
            continue;
        };
        for entry in entries {
            match decode_unit(&entry) {
                Some((coord, health)) => units.push(UnitRecord {
                    kind,
                    side,
                    coord,
                    health,
                }),
                None => warn!(?entry, "unreadable unit entry"),
            }
        }
    }

    PlayerState {
        health: stat(0),
        resources: ResourcePool::new(stat(1), stat(2)),
        units,
        upgraded,
    }
}

/// Largest coordinate magnitude accepted from the engine.
const COORD_LIMIT: f64 = 4096.0;

fn decode_coord(x: &Value, y: &Value) -> Option<Coord> {
    let x = x.as_f64()?;
    let y = y.as_f64()?;
    let in_range = |value: f64| value.is_finite() && value.abs() <= COORD_LIMIT;
    if !in_range(x) || !in_range(y) {
        return None;
    }
    Some(Coord::new(x as i32, y as i32))
}

fn decode_unit(entry: &[Value]) -> Option<(Coord, f32)> {
    let coord = decode_coord(entry.first()?, entry.get(1)?)?;
    let health = entry.get(2)?.as_f64()?;
    Some((coord, health as f32))
}

/// An edge breach reported inside an action frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Breach {
    /// Edge cell that was reached.
    pub coord: Coord,
    /// Owner of the unit that reached the edge.
    pub owner: Side,
}

/// Intra-turn combat frame; only breach events are decoded.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawActionFrame")]
pub struct ActionFrame {
    /// Turn the frame belongs to.
    pub turn: u32,
    /// Breaches that happened during the frame.
    pub breaches: Vec<Breach>,
}

impl ActionFrame {
    /// Decodes one action frame message.
    pub fn from_json(raw: &str) -> Result<Self, ProtocolError> {
        decode(raw)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawActionFrame {
    #[serde(rename = "turnInfo", default)]
    turn_info: Option<Vec<f64>>,
    #[serde(default)]
    events: Option<RawEvents>,
}

#[derive(Debug, Default, Deserialize)]
struct RawEvents {
    #[serde(default)]
    breach: Option<Vec<Vec<Value>>>,
}

impl From<RawActionFrame> for ActionFrame {
    fn from(raw: RawActionFrame) -> Self {
        let entries = raw
            .events
            .and_then(|events| events.breach)
            .unwrap_or_default();

        let mut breaches = Vec::with_capacity(entries.len());
        for entry in entries {
            match decode_breach(&entry) {
                Some(breach) => breaches.push(breach),
                None => warn!(?entry, "unreadable breach entry"),
            }
        }

        Self {
            turn: turn_number(raw.turn_info.as_deref()),
            breaches,
        }
    }
}

fn decode_breach(entry: &[Value]) -> Option<Breach> {
    let location = entry.first()?.as_array()?;
    let coord = decode_coord(location.first()?, location.get(1)?)?;
    let owner = match entry.get(4)?.as_i64()? {
        1 => Side::Own,
        2 => Side::Opponent,
        _ => return None,
    };
    Some(Breach { coord, owner })
}
