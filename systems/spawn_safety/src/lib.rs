#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that ranks mobile-unit launch cells by estimated path risk.

use lane_defence_core::{Battlefield, Coord, Side, UnitCatalog, UnitKind};
use serde::{Deserialize, Serialize};
use tracing::trace;

const DEFAULT_SOAK_RADIUS: f32 = 3.5;

/// Tunable figures for the risk estimate.
///
/// Damage figures left unset are taken from the match's unit catalog: the
/// per-hit damage of the opponent's [`UnitKind::Turret`] and the soak value of
/// the [`UnitKind::Wall`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSafetyConfig {
    /// Radius around the launch cell searched for soaking units.
    pub soak_radius: f32,
    /// Damage charged per attacker per path cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hit_damage: Option<f32>,
    /// Discount granted per unit found within the soak radius.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soak_discount: Option<f32>,
    /// Restricts discounted units to one owner; any owner when unset.
    ///
    /// The unset default counts the agent's own units as well as opposing
    /// ones, which deliberately departs from discounting opposing units only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub soak_side: Option<Side>,
}

impl Default for SpawnSafetyConfig {
    fn default() -> Self {
        Self {
            soak_radius: DEFAULT_SOAK_RADIUS,
            hit_damage: None,
            soak_discount: None,
            soak_side: None,
        }
    }
}

/// Evaluator that picks the launch cell with the lowest estimated damage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnSafety {
    soak_radius: f32,
    hit_damage: f32,
    soak_discount: f32,
    soak_side: Option<Side>,
}

impl SpawnSafety {
    /// Resolves the configuration against the match catalog.
    #[must_use]
    pub fn new(config: SpawnSafetyConfig, catalog: &UnitCatalog) -> Self {
        Self {
            soak_radius: config.soak_radius,
            hit_damage: config
                .hit_damage
                .unwrap_or(catalog.stats(UnitKind::Turret).damage_to_mobile),
            soak_discount: config
                .soak_discount
                .unwrap_or(catalog.stats(UnitKind::Wall).damage_to_mobile),
            soak_side: config.soak_side,
        }
    }

    /// Estimated damage taken by a unit launched from `candidate`.
    ///
    /// Returns `None` when the engine reports no path to the opposing edge.
    #[must_use]
    pub fn score<B: Battlefield + ?Sized>(&self, board: &B, candidate: Coord) -> Option<f32> {
        let path = board.path_to_edge(candidate)?;

        let mut score = 0.0;
        for cell in &path {
            let attackers = board.attackers_of(*cell, Side::Opponent).len();
            score += attackers as f32 * self.hit_damage;
        }

        for cell in board.cells_within_radius(candidate, self.soak_radius) {
            let soaking = board
                .units_at(cell)
                .into_iter()
                .filter(|unit| self.soak_side.map_or(true, |side| unit.side == side))
                .count();
            score -= soaking as f32 * self.soak_discount;
        }

        Some(score)
    }

    /// Candidate with the minimal score, ties resolved to the earliest one.
    ///
    /// Candidates without a path are skipped; `None` is returned when no
    /// candidate remains.
    #[must_use]
    pub fn safest<B: Battlefield + ?Sized>(
        &self,
        board: &B,
        candidates: &[Coord],
    ) -> Option<Coord> {
        let mut best: Option<(Coord, f32)> = None;

        for &candidate in candidates {
            let Some(score) = self.score(board, candidate) else {
                trace!(%candidate, "launch cell has no path");
                continue;
            };
            trace!(%candidate, score, "launch cell scored");

            match best {
                Some((_, best_score)) if score >= best_score => {}
                _ => best = Some((candidate, score)),
            }
        }

        best.map(|(candidate, _)| candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_figures_come_from_catalog() {
        let catalog = UnitCatalog::default();
        let safety = SpawnSafety::new(SpawnSafetyConfig::default(), &catalog);
        assert_eq!(safety.hit_damage, catalog.stats(UnitKind::Turret).damage_to_mobile);
        assert_eq!(safety.soak_discount, catalog.stats(UnitKind::Wall).damage_to_mobile);
        assert_eq!(safety.soak_radius, 3.5);
    }

    #[test]
    fn explicit_figures_override_catalog() {
        let config = SpawnSafetyConfig {
            hit_damage: Some(20.0),
            soak_discount: Some(4.0),
            ..SpawnSafetyConfig::default()
        };
        let safety = SpawnSafety::new(config, &UnitCatalog::default());
        assert_eq!(safety.hit_damage, 20.0);
        assert_eq!(safety.soak_discount, 4.0);
    }
}
