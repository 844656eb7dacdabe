#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn-based lane defence agent.
//!
//! The [`Agent`] owns every piece of state that survives between turns: the
//! zone damage history, the reinforcement decision, the breach log and the
//! queued upgrades. Each turn it runs the planning systems in a fixed order
//! and returns the concatenated [`PlacementIntent`] batch for the engine.
//!
//! Pipeline order per turn:
//!
//! 1. zone damage tracking,
//! 2. adaptive reinforcement of the most damaged zone,
//! 3. reaction to the latest breach,
//! 4. the baseline perimeter,
//! 5. supports and attack waves,
//! 6. the queued upgrades of repaired walls, kept until the snapshot
//!    reports them upgraded.

pub mod config;
pub mod protocol;
#[cfg(feature = "replay")]
pub mod replay;

use lane_defence_core::{Battlefield, BreachEvent, PlacementIntent, Side, UnitCatalog, Zone};
use lane_defence_system_adaptive::AdaptivePlanner;
use lane_defence_system_baseline::BaselineDefence;
use lane_defence_system_offense::{OffenseInput, OffensePlanner};
use lane_defence_system_reactive::{BreachLog, ReactiveDefence};
use lane_defence_system_spawn_safety::SpawnSafety;
use lane_defence_system_zone_damage::ZoneDamageTracker;
use serde::Serialize;
use tracing::{debug, info};

pub use config::{AgentConfig, ConfigError};
pub use lane_defence_system_zone_damage::DamageAttribution;
pub use protocol::{ActionFrame, Breach, MatchConfig, PlayerState, ProtocolError, TurnState};

/// Outcome of one turn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnPlan {
    /// Turn the plan was computed for.
    pub turn: u32,
    /// Damage observed per zone since the previous turn.
    pub attribution: DamageAttribution,
    /// Zone selected for reinforcement after this turn.
    pub decision: Option<Zone>,
    /// Placement requests in submission order.
    pub intents: Vec<PlacementIntent>,
}

/// Stateful agent driving the planning systems.
#[derive(Clone, Debug)]
pub struct Agent {
    config: AgentConfig,
    catalog: UnitCatalog,
    tracker: ZoneDamageTracker,
    adaptive: AdaptivePlanner,
    reactive: ReactiveDefence,
    baseline: BaselineDefence,
    offense: OffensePlanner,
    breaches: BreachLog,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

impl Agent {
    /// Creates an agent using the default unit catalog until a match starts.
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        Self::with_catalog(config, UnitCatalog::default())
    }

    fn with_catalog(config: AgentConfig, catalog: UnitCatalog) -> Self {
        let safety = SpawnSafety::new(config.spawn_safety, &catalog);
        Self {
            tracker: ZoneDamageTracker::new(config.zones, config.destroyed_units),
            adaptive: AdaptivePlanner::new(config.adaptive.clone()),
            reactive: ReactiveDefence::new(config.reactive.clone()),
            baseline: BaselineDefence::new(config.perimeter.clone()),
            offense: OffensePlanner::new(config.offense.clone(), safety),
            breaches: BreachLog::with_capacity(config.breach_history),
            catalog,
            config,
        }
    }

    /// Tuning the agent was created with.
    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Unit figures of the current match.
    #[must_use]
    pub fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }

    /// Opponent breaches recorded so far.
    #[must_use]
    pub fn breaches(&self) -> &BreachLog {
        &self.breaches
    }

    /// Zone currently selected for reinforcement.
    #[must_use]
    pub fn decision(&self) -> Option<Zone> {
        self.adaptive.decision()
    }

    /// Resets all per-match state and adopts the match's unit figures.
    pub fn on_match_start(&mut self, match_config: &MatchConfig) {
        info!("match started");
        *self = Self::with_catalog(self.config.clone(), match_config.catalog().clone());
    }

    /// Decodes the engine's configuration message and starts the match.
    pub fn on_match_start_json(&mut self, raw: &str) -> Result<(), ProtocolError> {
        let match_config = MatchConfig::from_json(raw)?;
        self.on_match_start(&match_config);
        Ok(())
    }

    /// Plans one turn against the engine's battlefield queries.
    pub fn on_turn<B: Battlefield + ?Sized>(&mut self, state: &TurnState, board: &B) -> TurnPlan {
        let turn = state.turn;
        let own = &state.own;
        let mut intents = Vec::new();

        let observations = state.player(self.config.tracked_side).observations();
        let attribution = self.tracker.observe(&observations);

        let decision = self
            .adaptive
            .handle(&attribution, own.resources.structure(), &mut intents);
        self.reactive.handle(&self.breaches, &mut intents);
        self.baseline.retire_upgrades(&own.upgraded);
        self.baseline.handle(turn, board, &mut intents);

        let input = OffenseInput {
            turn,
            opponent_health: state.opponent.health,
            tempo: own.resources.tempo(),
            structure: own.resources.structure(),
            opponent_tempo: state.opponent.resources.tempo(),
        };
        self.offense.handle(&input, board, &mut intents);
        self.baseline.flush_upgrades(&mut intents);

        debug!(
            turn,
            intents = intents.len(),
            decision = decision.map(Zone::name),
            "turn planned"
        );

        TurnPlan {
            turn,
            attribution,
            decision,
            intents,
        }
    }

    /// Decodes a turn snapshot and plans the turn.
    pub fn on_turn_json<B: Battlefield + ?Sized>(
        &mut self,
        raw: &str,
        board: &B,
    ) -> Result<TurnPlan, ProtocolError> {
        let state = TurnState::from_json(raw)?;
        Ok(self.on_turn(&state, board))
    }

    /// Records the opponent breaches reported by an action frame.
    pub fn on_action_frame(&mut self, frame: &ActionFrame) {
        for breach in &frame.breaches {
            if breach.owner != Side::Opponent {
                continue;
            }
            info!(coord = %breach.coord, turn = frame.turn, "opponent breach");
            self.breaches.record(BreachEvent {
                coord: breach.coord,
                turn: frame.turn,
            });
        }
    }

    /// Decodes an action frame and records its opponent breaches.
    pub fn on_action_frame_json(&mut self, raw: &str) -> Result<(), ProtocolError> {
        let frame = ActionFrame::from_json(raw)?;
        self.on_action_frame(&frame);
        Ok(())
    }
}
