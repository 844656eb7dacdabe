//! Agent tuning loaded from TOML.

use std::{
    fs,
    path::{Path, PathBuf},
};

use lane_defence_core::{Side, ZoneBounds};
use lane_defence_system_adaptive::AdaptiveConfig;
use lane_defence_system_baseline::PerimeterLayout;
use lane_defence_system_offense::OffenseConfig;
use lane_defence_system_reactive::{ReactiveConfig, DEFAULT_HISTORY_CAPACITY};
use lane_defence_system_spawn_safety::SpawnSafetyConfig;
use lane_defence_system_zone_damage::DestroyedUnitCredit;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating an [`AgentConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The TOML document could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The configuration could not be rendered as TOML.
    #[error("failed to render config: {0}")]
    Render(#[from] toml::ser::Error),
    /// A value was parsed but is unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Every tunable of the agent, grouped per system.
///
/// All sections are optional in the TOML document; missing values keep the
/// hand-tuned defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    /// Player whose units feed zone damage tracking.
    pub tracked_side: Side,
    /// Crediting of units that vanish between turns.
    pub destroyed_units: DestroyedUnitCredit,
    /// Number of breaches kept in history.
    pub breach_history: usize,
    /// Horizontal zone boundaries.
    pub zones: ZoneBounds,
    /// Adaptive reinforcement tuning.
    pub adaptive: AdaptiveConfig,
    /// Baseline perimeter layout.
    pub perimeter: PerimeterLayout,
    /// Breach response offsets.
    pub reactive: ReactiveConfig,
    /// Offense planner tuning.
    pub offense: OffenseConfig,
    /// Spawn path scoring.
    pub spawn_safety: SpawnSafetyConfig,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            tracked_side: Side::Opponent,
            destroyed_units: DestroyedUnitCredit::default(),
            breach_history: DEFAULT_HISTORY_CAPACITY,
            zones: ZoneBounds::default(),
            adaptive: AdaptiveConfig::default(),
            perimeter: PerimeterLayout::default(),
            reactive: ReactiveConfig::default(),
            offense: OffenseConfig::default(),
            spawn_safety: SpawnSafetyConfig::default(),
        }
    }
}

impl AgentConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    /// Renders the configuration as a TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Rejects values that would make a system misbehave.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.zones.left_max >= self.zones.mid_max {
            return Err(ConfigError::Invalid(format!(
                "zones.left_max ({}) must be below zones.mid_max ({})",
                self.zones.left_max, self.zones.mid_max
            )));
        }
        if self.breach_history == 0 {
            return Err(ConfigError::Invalid(
                "breach_history must keep at least one breach".to_owned(),
            ));
        }
        if !(self.offense.wave.tempo_per_unit > 0.0) {
            return Err(ConfigError::Invalid(
                "offense.wave.tempo_per_unit must be positive".to_owned(),
            ));
        }
        if !(self.spawn_safety.soak_radius >= 0.0) {
            return Err(ConfigError::Invalid(
                "spawn_safety.soak_radius must not be negative".to_owned(),
            ));
        }
        Ok(())
    }
}
