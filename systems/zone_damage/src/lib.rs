#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that attributes observed health losses to battlefield zones.
//!
//! Each call to [`ZoneDamageTracker::observe`] compares the current turn's unit
//! observations with the health recorded on the previous turn and sums the
//! positive decreases per zone. The per-zone state is replaced wholesale on
//! every call, so units that vanish are forgotten after one turn.

use std::collections::BTreeMap;

use lane_defence_core::{Coord, PerZone, UnitObservation, Zone, ZoneBounds};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// How a unit that disappears between two turns is credited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DestroyedUnitCredit {
    /// Only health decreases observed at a surviving coordinate count.
    #[default]
    Ignore,
    /// A coordinate present last turn and absent now is credited with its
    /// full last-observed health.
    LastHealth,
}

/// Aggregate damage observed per zone during one turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageAttribution {
    totals: PerZone<f32>,
}

impl DamageAttribution {
    /// Creates an attribution from explicit per-zone totals.
    ///
    /// Negative inputs are clamped to zero.
    #[must_use]
    pub fn new(left: f32, mid: f32, right: f32) -> Self {
        Self {
            totals: PerZone::new(left.max(0.0), mid.max(0.0), right.max(0.0)),
        }
    }

    /// Damage attributed to the provided zone.
    #[must_use]
    pub fn get(&self, zone: Zone) -> f32 {
        *self.totals.get(zone)
    }

    /// Sum over all zones.
    #[must_use]
    pub fn total(&self) -> f32 {
        self.totals.left + self.totals.mid + self.totals.right
    }

    /// Zone with strictly the largest positive damage, if any.
    ///
    /// Returns `None` when every zone is zero or when the maximum is shared.
    #[must_use]
    pub fn strongest(&self) -> Option<Zone> {
        Zone::ALL.into_iter().find(|&zone| {
            let value = self.get(zone);
            value > 0.0
                && Zone::ALL
                    .into_iter()
                    .filter(|other| *other != zone)
                    .all(|other| value > self.get(other))
        })
    }
}

/// Tracker that owns the per-zone health maps of the previous turn.
#[derive(Clone, Debug, Default)]
pub struct ZoneDamageTracker {
    bounds: ZoneBounds,
    credit: DestroyedUnitCredit,
    states: PerZone<BTreeMap<Coord, f32>>,
}

impl ZoneDamageTracker {
    /// Creates a tracker with empty history.
    #[must_use]
    pub fn new(bounds: ZoneBounds, credit: DestroyedUnitCredit) -> Self {
        Self {
            bounds,
            credit,
            states: PerZone::default(),
        }
    }

    /// Health recorded for each coordinate of `zone` on the latest turn.
    #[must_use]
    pub fn state(&self, zone: Zone) -> &BTreeMap<Coord, f32> {
        self.states.get(zone)
    }

    /// Consumes the current turn's observations and returns the damage
    /// attributed to each zone relative to the previous turn.
    pub fn observe(&mut self, observations: &[UnitObservation]) -> DamageAttribution {
        let mut fresh: PerZone<BTreeMap<Coord, f32>> = PerZone::default();
        let mut deltas: PerZone<BTreeMap<Coord, f32>> = PerZone::default();

        for observation in observations {
            let zone = self.bounds.zone_of(observation.coord);
            if let Some(previous) = self.states.get(zone).get(&observation.coord) {
                let delta = previous - observation.health;
                if delta > 0.0 {
                    let _ = deltas.get_mut(zone).insert(observation.coord, delta);
                }
            }
            let _ = fresh
                .get_mut(zone)
                .insert(observation.coord, observation.health);
        }

        if self.credit == DestroyedUnitCredit::LastHealth {
            for zone in Zone::ALL {
                for (coord, health) in self.states.get(zone) {
                    if !fresh.get(zone).contains_key(coord) && *health > 0.0 {
                        let _ = deltas.get_mut(zone).insert(*coord, *health);
                    }
                }
            }
        }

        self.states = fresh;

        let sum = |zone: Zone| deltas.get(zone).values().sum::<f32>();
        let attribution = DamageAttribution::new(sum(Zone::Left), sum(Zone::Mid), sum(Zone::Right));
        trace!(
            left = attribution.get(Zone::Left),
            mid = attribution.get(Zone::Mid),
            right = attribution.get(Zone::Right),
            "zone damage attributed"
        );
        attribution
    }
}
