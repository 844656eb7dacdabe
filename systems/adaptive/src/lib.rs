#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that reinforces the zone taking the most damage.
//!
//! The planner picks the zone with strictly the largest positive damage. When
//! no zone qualifies, either because nothing was damaged or because the
//! maximum is shared, the previous decision persists. Reinforcement is skipped
//! entirely while the structure resource sits at or below a floor so the
//! remaining budget stays available to the other systems.

use lane_defence_core::{coords, Coord, PerZone, PlacementIntent, UnitKind, Zone};
use lane_defence_system_zone_damage::DamageAttribution;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stationary layout placed when a zone is selected for reinforcement.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReinforcementTemplate {
    /// Cells receiving turrets.
    pub turrets: Vec<Coord>,
    /// Turrets requested per turret cell.
    pub turret_count: u32,
    /// Cells receiving walls.
    pub walls: Vec<Coord>,
    /// Cells whose units are upgraded.
    pub upgrades: Vec<Coord>,
}

impl ReinforcementTemplate {
    /// Appends the template's intents to `out`.
    pub fn emit(&self, out: &mut Vec<PlacementIntent>) {
        if !self.turrets.is_empty() {
            out.push(PlacementIntent::spawn_many(
                UnitKind::Turret,
                self.turrets.clone(),
                self.turret_count.max(1),
            ));
        }
        if !self.walls.is_empty() {
            out.push(PlacementIntent::spawn(UnitKind::Wall, self.walls.clone()));
        }
        if !self.upgrades.is_empty() {
            out.push(PlacementIntent::upgrade(self.upgrades.clone()));
        }
    }
}

/// Tuning of the adaptive planner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptiveConfig {
    /// Structure level at or below which no reinforcement is emitted.
    pub structure_floor: f32,
    /// Layout placed for each zone.
    pub templates: PerZone<ReinforcementTemplate>,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            structure_floor: 5.0,
            templates: PerZone::new(
                ReinforcementTemplate {
                    turrets: coords(&[
                        [2, 12], [4, 12], [1, 12], [4, 11], [5, 11], [7, 11], [6, 12],
                    ]),
                    turret_count: 2,
                    walls: coords(&[[6, 11], [7, 10], [8, 9]]),
                    upgrades: coords(&[[6, 11], [7, 10], [8, 9]]),
                },
                ReinforcementTemplate {
                    turrets: coords(&[[7, 11], [8, 8], [9, 7], [10, 6], [11, 5], [12, 4]]),
                    turret_count: 2,
                    walls: Vec::new(),
                    upgrades: coords(&[[9, 8], [10, 7], [11, 6], [12, 5]]),
                },
                ReinforcementTemplate {
                    turrets: coords(&[[23, 12], [24, 12], [23, 11], [22, 10], [22, 9]]),
                    turret_count: 1,
                    walls: coords(&[[24, 13], [23, 13], [22, 11], [23, 12], [21, 10]]),
                    upgrades: coords(&[[24, 13], [23, 13], [22, 11], [23, 12], [21, 10]]),
                },
            ),
        }
    }
}

/// Planner holding the hysteresis memory of the last decision.
#[derive(Clone, Debug, Default)]
pub struct AdaptivePlanner {
    config: AdaptiveConfig,
    decision: Option<Zone>,
}

impl AdaptivePlanner {
    /// Creates a planner with no prior decision.
    #[must_use]
    pub fn new(config: AdaptiveConfig) -> Self {
        Self {
            config,
            decision: None,
        }
    }

    /// Zone currently selected for reinforcement.
    #[must_use]
    pub fn decision(&self) -> Option<Zone> {
        self.decision
    }

    /// Updates the decision from this turn's attribution and returns it.
    pub fn decide(&mut self, attribution: &DamageAttribution) -> Option<Zone> {
        if let Some(zone) = attribution.strongest() {
            if self.decision != Some(zone) {
                debug!(%zone, "reinforcement target changed");
            }
            self.decision = Some(zone);
        }
        self.decision
    }

    /// Decides the target zone and, when affordable, emits its template.
    pub fn handle(
        &mut self,
        attribution: &DamageAttribution,
        structure: f32,
        out: &mut Vec<PlacementIntent>,
    ) -> Option<Zone> {
        let decision = self.decide(attribution);

        if structure <= self.config.structure_floor {
            debug!(structure, "structure too low for reinforcement");
            return decision;
        }

        if let Some(zone) = decision {
            self.config.templates.get(zone).emit(out);
        }
        decision
    }
}
