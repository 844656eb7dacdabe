#![cfg(feature = "replay")]

use lane_defence_agent::{
    replay::{replay, ReplayError, ReplayScript},
    Agent,
};
use lane_defence_core::{Coord, PlacementIntent, UnitKind, Zone};

const SCRIPT: &str = r#"{
    "config": {"unitInformation": [{"shorthand": "FF"}, {"shorthand": "EF"}, {"shorthand": "DF", "attackDamageWalker": 16.0}]},
    "turns": [
        {
            "state": {
                "turnInfo": [0, 1, -1],
                "p1Stats": [30, 20, 4, 0],
                "p2Stats": [30, 8, 2, 0],
                "p2Units": [[], [], [[22, 14, 75, "3"]], [], [], [], [], []]
            },
            "frames": [
                {"turnInfo": [1, 1, 7], "events": {"breach": [[[24, 10], 1, 3, "20", 1]]}},
                {"turnInfo": [1, 1, 9], "events": {"breach": [[[3, 13], 1, 3, "21", 2]]}}
            ]
        },
        {
            "state": {
                "turnInfo": [0, 2, -1],
                "p1Stats": [29, 20, 12, 0],
                "p2Stats": [30, 8, 2, 0],
                "p2Units": [[], [], [[22, 14, 50, "3"]], [], [], [], [], []]
            },
            "board": {
                "units": [{"kind": "turret", "side": "opponent", "coord": [16, 4], "health": 75}],
                "paths": [
                    {"start": [15, 1], "cells": [[15, 2], [15, 3], [15, 4]]},
                    {"start": [14, 0], "cells": [[14, 1], [13, 2], [12, 3]]}
                ]
            }
        }
    ]
}"#;

#[test]
fn replays_are_deterministic() {
    let script = ReplayScript::from_json(SCRIPT).expect("script parses");

    let first = replay(&mut Agent::default(), &script);
    let second = replay(&mut Agent::default(), &script);
    assert_eq!(first, second);
    assert_eq!(first.len(), 2);
}

#[test]
fn frames_apply_after_their_turn() {
    let script = ReplayScript::from_json(SCRIPT).expect("script parses");
    let mut agent = Agent::default();
    let plans = replay(&mut agent, &script);

    let reactive_cluster = PlacementIntent::spawn(
        UnitKind::Turret,
        vec![Coord::new(3, 14), Coord::new(4, 13), Coord::new(2, 13)],
    );
    assert!(!plans[0].intents.contains(&reactive_cluster));
    assert!(plans[1].intents.contains(&reactive_cluster));
    assert_eq!(agent.breaches().len(), 1, "own breaches are ignored");
}

#[test]
fn scripted_board_steers_runner_launch() {
    let script = ReplayScript::from_json(SCRIPT).expect("script parses");
    let plans = replay(&mut Agent::default(), &script);

    let second = &plans[1];
    assert_eq!(second.attribution.get(Zone::Right), 25.0);
    assert_eq!(second.decision, Some(Zone::Right));
    assert!(second.intents.contains(&PlacementIntent::spawn_many(
        UnitKind::Runner,
        vec![Coord::new(14, 0)],
        4,
    )));
}

#[test]
fn restarting_a_replay_resets_the_agent() {
    let script = ReplayScript::from_json(SCRIPT).expect("script parses");
    let mut agent = Agent::default();
    let first = replay(&mut agent, &script);
    let again = replay(&mut agent, &script);
    assert_eq!(first, again);
}

#[test]
fn missing_script_is_reported() {
    assert!(matches!(
        ReplayScript::load("/nonexistent/replay.json"),
        Err(ReplayError::Read { .. })
    ));
}
