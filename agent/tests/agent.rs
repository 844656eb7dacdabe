use lane_defence_agent::{Agent, AgentConfig, ProtocolError};
use lane_defence_core::{
    scaffolding::ScriptedBattlefield, Coord, PlacementIntent, UnitKind, Zone,
};
use lane_defence_system_baseline::PerimeterLayout;
use lane_defence_system_zone_damage::DamageAttribution;

fn snapshot(turn: u32, structure: f32, tempo: f32, opponent_units: &str) -> String {
    snapshot_with(turn, structure, tempo, "[[], [], [], [], [], [], [], []]", opponent_units)
}

fn snapshot_with(
    turn: u32,
    structure: f32,
    tempo: f32,
    own_units: &str,
    opponent_units: &str,
) -> String {
    format!(
        r#"{{
            "turnInfo": [0, {turn}, -1],
            "p1Stats": [30.0, {structure}, {tempo}, 0],
            "p2Stats": [30.0, 10.0, 0.0, 0],
            "p1Units": {own_units},
            "p2Units": {opponent_units}
        }}"#
    )
}

fn upgraded_markers(cells: &[Coord]) -> String {
    let entries = cells
        .iter()
        .map(|cell| format!(r#"[{}, {}, 0, "u"]"#, cell.x(), cell.y()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("[[], [], [], [], [], [], [], [{entries}]]")
}

fn opponent_turret(x: i32, y: i32, health: f32) -> String {
    format!(r#"[[], [], [[{x}, {y}, {health}, "1"]], [], [], [], [], []]"#)
}

fn spawns(intents: &[PlacementIntent], wanted: UnitKind) -> Vec<(Vec<Coord>, u32)> {
    intents
        .iter()
        .filter_map(|intent| match intent {
            PlacementIntent::Spawn { kind, cells, count } if *kind == wanted => {
                Some((cells.clone(), *count))
            }
            _ => None,
        })
        .collect()
}

#[test]
fn quiet_opening_turn_plans_no_reinforcement() {
    let mut agent = Agent::default();
    let board = ScriptedBattlefield::new();
    let plan = agent
        .on_turn_json(&snapshot(0, 40.0, 5.0, "[]"), &board)
        .expect("snapshot decodes");

    assert_eq!(plan.turn, 0);
    assert_eq!(plan.attribution, DamageAttribution::default());
    assert_eq!(plan.decision, None);
    assert_eq!(
        plan.intents.first(),
        Some(&PlacementIntent::spawn(
            UnitKind::Turret,
            PerimeterLayout::default().turrets,
        )),
        "the perimeter comes first when no zone is reinforced"
    );
}

#[test]
fn damaged_opponent_unit_drives_left_reinforcement() {
    let mut agent = Agent::default();
    let board = ScriptedBattlefield::new();

    let first = agent
        .on_turn_json(&snapshot(1, 40.0, 0.0, &opponent_turret(5, 5, 10.0)), &board)
        .expect("snapshot decodes");
    assert_eq!(first.attribution.total(), 0.0);
    assert_eq!(first.decision, None);

    let second = agent
        .on_turn_json(&snapshot(2, 40.0, 0.0, &opponent_turret(5, 5, 4.0)), &board)
        .expect("snapshot decodes");
    assert_eq!(second.attribution.get(Zone::Left), 6.0);
    assert_eq!(second.decision, Some(Zone::Left));
    match second.intents.first() {
        Some(PlacementIntent::Spawn { kind, cells, count }) => {
            assert_eq!(*kind, UnitKind::Turret);
            assert_eq!(cells.first(), Some(&Coord::new(2, 12)));
            assert_eq!(*count, 2);
        }
        other => panic!("expected the left template first, got {other:?}"),
    }

    let quiet = agent
        .on_turn_json(&snapshot(3, 40.0, 0.0, &opponent_turret(5, 5, 4.0)), &board)
        .expect("snapshot decodes");
    assert_eq!(quiet.decision, Some(Zone::Left), "decision persists");
}

#[test]
fn latest_breach_is_reinforced_on_later_turns() {
    let mut agent = Agent::default();
    let board = ScriptedBattlefield::new();

    agent
        .on_action_frame_json(r#"{"turnInfo": [1, 2, 4], "events": {"breach": [[[20, 13], 1, 3, "4", 2]]}}"#)
        .expect("frame decodes");
    agent
        .on_action_frame_json(r#"{"turnInfo": [1, 5, 9], "events": {"breach": [[[3, 13], 1, 3, "8", 2]]}}"#)
        .expect("frame decodes");

    let plan = agent
        .on_turn_json(&snapshot(6, 0.0, 0.0, "[]"), &board)
        .expect("snapshot decodes");

    let turrets = spawns(&plan.intents, UnitKind::Turret);
    assert!(turrets.contains(&(
        vec![Coord::new(3, 14), Coord::new(4, 13), Coord::new(2, 13)],
        1
    )));
    assert!(
        !turrets
            .iter()
            .any(|(cells, _)| cells.contains(&Coord::new(20, 14))),
        "older breaches are not reinforced"
    );
    assert!(spawns(&plan.intents, UnitKind::Wall).contains(&(
        vec![Coord::new(3, 15), Coord::new(4, 14), Coord::new(2, 14)],
        1
    )));
}

#[test]
fn tempo_surplus_launches_wave() {
    let mut agent = Agent::default();
    let plan = agent
        .on_turn_json(&snapshot(10, 0.0, 17.0, "[]"), &ScriptedBattlefield::new())
        .expect("snapshot decodes");

    assert_eq!(
        spawns(&plan.intents, UnitKind::Runner),
        vec![(vec![Coord::new(15, 1)], 6)]
    );
    assert_eq!(
        spawns(&plan.intents, UnitKind::Demolisher),
        vec![(vec![Coord::new(13, 0)], 3)]
    );
}

#[test]
fn repaired_walls_are_upgraded_last() {
    let mut agent = Agent::default();
    let plan = agent
        .on_turn_json(&snapshot(4, 0.0, 0.0, "[]"), &ScriptedBattlefield::new())
        .expect("snapshot decodes");

    match plan.intents.last() {
        Some(PlacementIntent::Upgrade { cells }) => {
            assert_eq!(cells.len(), PerimeterLayout::default().forward_line.len());
            assert!(cells.windows(2).all(|pair| pair[0].y() <= pair[1].y()));
        }
        other => panic!("expected the queued upgrades last, got {other:?}"),
    }

    let next = agent
        .on_turn_json(&snapshot(5, 0.0, 0.0, "[]"), &ScriptedBattlefield::new())
        .expect("snapshot decodes");
    match next.intents.last() {
        Some(PlacementIntent::Upgrade { cells }) => assert_eq!(
            cells.len(),
            PerimeterLayout::default().forward_line.len(),
            "requeued cells are not duplicated"
        ),
        other => panic!("expected the queued upgrades last, got {other:?}"),
    }
}

#[test]
fn rejected_wall_upgrade_is_retried_until_reported() {
    let mut agent = Agent::default();
    let forward_line = PerimeterLayout::default().forward_line;
    let _ = agent
        .on_turn_json(&snapshot(4, 0.0, 0.0, "[]"), &ScriptedBattlefield::new())
        .expect("snapshot decodes");

    let intact = forward_line
        .iter()
        .fold(ScriptedBattlefield::new(), |board, &cell| board.with_blocked(cell));
    let rejected = Coord::new(9, 8);
    let accepted: Vec<Coord> = forward_line
        .iter()
        .copied()
        .filter(|cell| *cell != rejected)
        .collect();

    let retry = agent
        .on_turn_json(
            &snapshot_with(5, 0.0, 0.0, &upgraded_markers(&accepted), "[]"),
            &intact,
        )
        .expect("snapshot decodes");
    assert!(spawns(&retry.intents, UnitKind::Wall).is_empty());
    assert_eq!(
        retry.intents.last(),
        Some(&PlacementIntent::upgrade([rejected])),
        "only the upgrade missing from the snapshot is requested again"
    );

    let done = agent
        .on_turn_json(
            &snapshot_with(6, 0.0, 0.0, &upgraded_markers(&forward_line), "[]"),
            &intact,
        )
        .expect("snapshot decodes");
    assert!(!done.intents.iter().any(|intent| matches!(
        intent,
        PlacementIntent::Upgrade { cells } if cells.contains(&rejected)
    )));
}

#[test]
fn out_of_range_breach_is_ignored() {
    let mut agent = Agent::default();
    agent
        .on_action_frame_json(
            r#"{"turnInfo": [1, 2, 4], "events": {"breach": [[[3e10, 13], 1, 3, "4", 2]]}}"#,
        )
        .expect("frame decodes");
    assert!(agent.breaches().is_empty());

    let plan = agent
        .on_turn_json(&snapshot(3, 40.0, 1e12, "[]"), &ScriptedBattlefield::new())
        .expect("snapshot decodes");
    assert!(spawns(&plan.intents, UnitKind::Runner)
        .iter()
        .all(|(_, count)| *count > 0));
}

#[test]
fn tracking_own_units_ignores_opponent_damage() {
    let config = AgentConfig {
        tracked_side: lane_defence_core::Side::Own,
        ..AgentConfig::default()
    };
    let mut agent = Agent::new(config);
    let board = ScriptedBattlefield::new();
    let _ = agent
        .on_turn_json(&snapshot(1, 0.0, 0.0, &opponent_turret(5, 5, 10.0)), &board)
        .expect("snapshot decodes");
    let plan = agent
        .on_turn_json(&snapshot(2, 0.0, 0.0, &opponent_turret(5, 5, 4.0)), &board)
        .expect("snapshot decodes");
    assert_eq!(plan.attribution.total(), 0.0);
}

#[test]
fn match_start_resets_damage_history() {
    let mut agent = Agent::default();
    let board = ScriptedBattlefield::new();
    let _ = agent
        .on_turn_json(&snapshot(1, 0.0, 0.0, &opponent_turret(5, 5, 10.0)), &board)
        .expect("snapshot decodes");

    agent
        .on_match_start_json(r#"{"unitInformation": []}"#)
        .expect("config decodes");
    let plan = agent
        .on_turn_json(&snapshot(0, 0.0, 0.0, &opponent_turret(5, 5, 4.0)), &board)
        .expect("snapshot decodes");
    assert_eq!(plan.attribution.total(), 0.0, "previous match is forgotten");
}

#[test]
fn malformed_messages_surface_protocol_errors() {
    let mut agent = Agent::default();
    let board = ScriptedBattlefield::new();
    assert!(matches!(
        agent.on_turn_json("", &board),
        Err(ProtocolError::EmptyPayload)
    ));
    assert!(matches!(
        agent.on_action_frame_json("[1, 2"),
        Err(ProtocolError::Json(_))
    ));
    assert!(agent.breaches().is_empty());
}
