#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that allocates the mobile-unit budget into attack waves.

use lane_defence_core::{coords, Battlefield, Coord, PlacementIntent, UnitKind};
use lane_defence_system_spawn_safety::SpawnSafety;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fixed placements of the first turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningConfig {
    /// Cells receiving one scout each.
    pub scouts: Vec<Coord>,
    /// Cell receiving the opening runner burst.
    pub runner_cell: Coord,
    /// Size of the opening runner burst.
    pub runner_count: u32,
}

impl Default for OpeningConfig {
    fn default() -> Self {
        Self {
            scouts: coords(&[[18, 4], [16, 2]]),
            runner_cell: Coord::new(16, 2),
            runner_count: 4,
        }
    }
}

/// Wave sizing and launch cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Tempo consumed per unit of wave size.
    pub tempo_per_unit: f32,
    /// Minimum wave size in regular play.
    pub base_threshold: u32,
    /// Minimum wave size once the late-game condition holds.
    pub escalated_threshold: u32,
    /// Turn after which escalation may apply.
    pub escalation_turn: u32,
    /// Opponent health above which escalation applies.
    pub escalation_health: f32,
    /// Runners launched per unit of wave size.
    pub runner_multiplier: u32,
    /// Launch cells considered for runners, ranked by path risk.
    pub runner_candidates: Vec<Coord>,
    /// Runner launch cell used when no candidate has a path.
    pub runner_fallback: Coord,
    /// Launch cell for demolishers.
    pub demolisher_cell: Coord,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            tempo_per_unit: 5.0,
            base_threshold: 2,
            escalated_threshold: 4,
            escalation_turn: 30,
            escalation_health: 25.0,
            runner_multiplier: 2,
            runner_candidates: coords(&[[15, 1], [14, 0], [13, 0], [12, 1]]),
            runner_fallback: Coord::new(15, 1),
            demolisher_cell: Coord::new(13, 0),
        }
    }
}

/// Tuning of the offense planner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffenseConfig {
    /// Placements of the first turn.
    pub opening: OpeningConfig,
    /// Cell receiving a scout when the opponent hoards tempo.
    pub interceptor_cell: Coord,
    /// Opponent tempo at or above which an interceptor scout is sent.
    pub interceptor_trigger: f32,
    /// Ordered cells receiving upgraded support units.
    pub support_diagonal: Vec<Coord>,
    /// Structure reserved per support unit.
    pub support_reserve: f32,
    /// Wave sizing.
    pub wave: WaveConfig,
}

impl Default for OffenseConfig {
    fn default() -> Self {
        Self {
            opening: OpeningConfig::default(),
            interceptor_cell: Coord::new(8, 5),
            interceptor_trigger: 10.0,
            support_diagonal: coords(&[
                [5, 10],
                [6, 10],
                [6, 9],
                [7, 9],
                [7, 8],
                [8, 8],
                [8, 7],
                [9, 7],
                [9, 6],
                [10, 6],
                [10, 5],
                [11, 5],
                [11, 4],
                [12, 4],
            ]),
            support_reserve: 12.0,
            wave: WaveConfig::default(),
        }
    }
}

/// Per-turn values consumed by the planner.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OffenseInput {
    /// Current turn number.
    pub turn: u32,
    /// Opponent's remaining health.
    pub opponent_health: f32,
    /// Own tempo resource.
    pub tempo: f32,
    /// Own structure resource.
    pub structure: f32,
    /// Opponent tempo resource.
    pub opponent_tempo: f32,
}

/// Planner for supports and attack waves.
#[derive(Clone, Debug)]
pub struct OffensePlanner {
    config: OffenseConfig,
    safety: SpawnSafety,
}

impl OffensePlanner {
    /// Creates a planner ranking runner launch cells with `safety`.
    #[must_use]
    pub fn new(config: OffenseConfig, safety: SpawnSafety) -> Self {
        Self { config, safety }
    }

    /// Wave size affordable with `tempo`, saturating at `u32::MAX`.
    #[must_use]
    pub fn wave_size(&self, tempo: f32) -> u32 {
        let per_unit = self.config.wave.tempo_per_unit;
        if per_unit <= 0.0 || tempo <= 0.0 {
            return 0;
        }
        (tempo / per_unit).floor() as u32
    }

    /// Minimum wave size required to launch on `turn`.
    #[must_use]
    pub fn required_wave(&self, turn: u32, opponent_health: f32) -> u32 {
        let wave = &self.config.wave;
        if turn > wave.escalation_turn && opponent_health > wave.escalation_health {
            wave.escalated_threshold
        } else {
            wave.base_threshold
        }
    }

    /// Emits the offense intents for one turn.
    pub fn handle<B: Battlefield + ?Sized>(
        &self,
        input: &OffenseInput,
        board: &B,
        out: &mut Vec<PlacementIntent>,
    ) {
        if input.turn == 0 {
            self.opening(out);
            return;
        }

        if input.opponent_tempo >= self.config.interceptor_trigger {
            out.push(PlacementIntent::spawn(
                UnitKind::Scout,
                [self.config.interceptor_cell],
            ));
        }

        self.supports(input.structure, out);
        self.wave(input, board, out);
    }

    fn opening(&self, out: &mut Vec<PlacementIntent>) {
        let opening = &self.config.opening;
        if !opening.scouts.is_empty() {
            out.push(PlacementIntent::spawn(UnitKind::Scout, opening.scouts.clone()));
        }
        if opening.runner_count > 0 {
            out.push(PlacementIntent::spawn_many(
                UnitKind::Runner,
                [opening.runner_cell],
                opening.runner_count,
            ));
        }
    }

    fn supports(&self, structure: f32, out: &mut Vec<PlacementIntent>) {
        let reserve = self.config.support_reserve;
        if reserve <= 0.0 {
            return;
        }

        let mut remaining = structure;
        for &cell in &self.config.support_diagonal {
            if remaining < reserve {
                break;
            }
            out.push(PlacementIntent::spawn(UnitKind::Support, [cell]));
            out.push(PlacementIntent::upgrade([cell]));
            remaining -= reserve;
        }
    }

    fn wave<B: Battlefield + ?Sized>(
        &self,
        input: &OffenseInput,
        board: &B,
        out: &mut Vec<PlacementIntent>,
    ) {
        let wave = &self.config.wave;
        let size = self.wave_size(input.tempo);
        let required = self.required_wave(input.turn, input.opponent_health);
        if size < required || size == 0 {
            debug!(turn = input.turn, size, required, "holding wave");
            return;
        }

        let runner_cell = self
            .safety
            .safest(board, &wave.runner_candidates)
            .unwrap_or(wave.runner_fallback);
        debug!(turn = input.turn, size, %runner_cell, "launching wave");

        out.push(PlacementIntent::spawn_many(
            UnitKind::Runner,
            [runner_cell],
            size.saturating_mul(wave.runner_multiplier),
        ));
        out.push(PlacementIntent::spawn_many(
            UnitKind::Demolisher,
            [wave.demolisher_cell],
            size,
        ));
    }
}
