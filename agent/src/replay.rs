//! Deterministic replay of recorded turns against scripted battlefields.

use std::{
    fs,
    path::{Path, PathBuf},
};

use lane_defence_core::scaffolding::ScriptedBattlefield;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::{ActionFrame, Agent, MatchConfig, TurnPlan, TurnState};

/// Errors raised while loading a replay script.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The script file could not be read.
    #[error("failed to read replay script {path}: {source}")]
    Read {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The script is not valid JSON for the expected shape.
    #[error("malformed replay script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One recorded turn: the snapshot, the battlefield answers and the frames
/// observed while the turn resolved.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReplayTurn {
    /// Snapshot in the engine's wire format.
    pub state: TurnState,
    /// Scripted battlefield queried while planning.
    pub board: ScriptedBattlefield,
    /// Action frames delivered after the plan was submitted.
    pub frames: Vec<ActionFrame>,
}

/// A whole recorded match.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    /// Match configuration in the engine's wire format.
    pub config: MatchConfig,
    /// Turns in playing order.
    pub turns: Vec<ReplayTurn>,
}

impl ReplayScript {
    /// Parses a script from JSON.
    pub fn from_json(raw: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Reads and parses a script file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ReplayError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }
}

/// Starts a match on `agent` and plays every scripted turn in order.
///
/// Frames of a turn are applied after its plan is computed, so breaches only
/// influence the following turns.
pub fn replay(agent: &mut Agent, script: &ReplayScript) -> Vec<TurnPlan> {
    agent.on_match_start(&script.config);

    let mut plans = Vec::with_capacity(script.turns.len());
    for recorded in &script.turns {
        let plan = agent.on_turn(&recorded.state, &recorded.board);
        debug!(turn = plan.turn, frames = recorded.frames.len(), "replayed turn");
        plans.push(plan);
        for frame in &recorded.frames {
            agent.on_action_frame(frame);
        }
    }
    plans
}
