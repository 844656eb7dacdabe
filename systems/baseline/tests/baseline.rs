use lane_defence_core::{
    scaffolding::ScriptedBattlefield, Coord, PlacementIntent, Side, UnitKind,
};
use lane_defence_system_baseline::{BaselineDefence, PerimeterLayout, UpgradeQueue};

/// Board where every forward-line cell except `missing` holds an own wall.
fn board_with_gaps(layout: &PerimeterLayout, missing: &[Coord]) -> ScriptedBattlefield {
    layout
        .forward_line
        .iter()
        .filter(|cell| !missing.contains(cell))
        .fold(ScriptedBattlefield::new(), |board, cell| {
            board.with_unit(UnitKind::Wall, Side::Own, *cell, 60.0)
        })
}

fn wall_spawns(out: &[PlacementIntent]) -> Vec<Coord> {
    out.iter()
        .filter_map(|intent| match intent {
            PlacementIntent::Spawn {
                kind: UnitKind::Wall,
                cells,
                ..
            } => Some(cells.clone()),
            _ => None,
        })
        .flatten()
        .collect()
}

#[test]
fn opening_turns_place_full_forward_line() {
    let layout = PerimeterLayout::default();
    let board = board_with_gaps(&layout, &[]);

    for turn in 0..2 {
        let mut baseline = BaselineDefence::new(layout.clone());
        let mut out = Vec::new();
        baseline.handle(turn, &board, &mut out);

        assert_eq!(wall_spawns(&out), layout.forward_line);
        assert!(
            baseline.pending_upgrades().is_empty(),
            "opening placements are not queued for upgrades"
        );
    }
}

#[test]
fn perimeter_turrets_and_reinforced_upgrades_are_always_emitted() {
    let layout = PerimeterLayout::default();
    let board = board_with_gaps(&layout, &[]);
    let mut baseline = BaselineDefence::new(layout.clone());
    let mut out = Vec::new();
    baseline.handle(7, &board, &mut out);

    assert!(out.contains(&PlacementIntent::spawn(
        UnitKind::Turret,
        layout.turrets.clone()
    )));
    assert!(out.contains(&PlacementIntent::spawn(
        UnitKind::Turret,
        layout.anchors.clone()
    )));
    assert_eq!(
        out.last(),
        Some(&PlacementIntent::upgrade(layout.reinforced_walls.clone()))
    );
    assert!(wall_spawns(&out).is_empty(), "intact line needs no repair");
}

#[test]
fn destroyed_walls_are_replaced_and_queued() {
    let layout = PerimeterLayout::default();
    let missing = [Coord::new(9, 8), Coord::new(22, 8), Coord::new(16, 2)];
    let board = board_with_gaps(&layout, &missing);
    let mut baseline = BaselineDefence::new(layout);
    let mut out = Vec::new();
    baseline.handle(2, &board, &mut out);

    assert_eq!(wall_spawns(&out), missing.to_vec());
    assert_eq!(baseline.pending_upgrades().cells(), &missing[..]);
}

#[test]
fn flush_sorts_by_row_and_keeps_cells_until_upgraded() {
    let layout = PerimeterLayout::default();
    let missing = [Coord::new(9, 8), Coord::new(22, 8), Coord::new(16, 2)];
    let board = board_with_gaps(&layout, &missing);
    let mut baseline = BaselineDefence::new(layout);
    let mut out = Vec::new();
    baseline.handle(3, &board, &mut out);

    let mut flushed = Vec::new();
    baseline.flush_upgrades(&mut flushed);
    assert_eq!(
        flushed,
        vec![PlacementIntent::upgrade(vec![
            Coord::new(16, 2),
            Coord::new(9, 8),
            Coord::new(22, 8),
        ])]
    );
    assert_eq!(baseline.pending_upgrades().len(), 3);

    baseline.retire_upgrades(&[Coord::new(9, 8), Coord::new(16, 2), Coord::new(1, 13)]);
    let mut second = Vec::new();
    baseline.flush_upgrades(&mut second);
    assert_eq!(
        second,
        vec![PlacementIntent::upgrade(vec![Coord::new(22, 8)])]
    );
}

#[test]
fn rejected_upgrade_is_requested_again_next_turn() {
    let layout = PerimeterLayout::default();
    let gap = Coord::new(9, 8);
    let mut baseline = BaselineDefence::new(layout.clone());

    let mut first = Vec::new();
    baseline.handle(2, &board_with_gaps(&layout, &[gap]), &mut first);
    baseline.flush_upgrades(&mut first);
    assert_eq!(first.last(), Some(&PlacementIntent::upgrade(vec![gap])));

    // The wall was rebuilt but the upgrade did not go through.
    baseline.retire_upgrades(&[]);
    let mut second = Vec::new();
    baseline.handle(3, &board_with_gaps(&layout, &[]), &mut second);
    baseline.flush_upgrades(&mut second);
    assert!(wall_spawns(&second).is_empty());
    assert_eq!(second.last(), Some(&PlacementIntent::upgrade(vec![gap])));

    baseline.retire_upgrades(&[gap]);
    let mut third = Vec::new();
    baseline.handle(4, &board_with_gaps(&layout, &[]), &mut third);
    baseline.flush_upgrades(&mut third);
    assert_eq!(
        third.last(),
        Some(&PlacementIntent::upgrade(layout.reinforced_walls.clone())),
        "upgraded walls leave the queue"
    );
}

#[test]
fn blocked_cells_are_not_retried() {
    let layout = PerimeterLayout::default();
    let board = board_with_gaps(&layout, &[Coord::new(12, 5)]).with_blocked(Coord::new(12, 5));
    let mut baseline = BaselineDefence::new(layout);
    let mut out = Vec::new();
    baseline.handle(4, &board, &mut out);

    assert!(wall_spawns(&out).is_empty());
    assert!(baseline.pending_upgrades().is_empty());
}

#[test]
fn worn_salvage_units_are_removed() {
    let layout = PerimeterLayout::default();
    let board = ScriptedBattlefield::new()
        .with_unit(UnitKind::Wall, Side::Own, Coord::new(1, 13), 12.0)
        .with_unit(UnitKind::Wall, Side::Own, Coord::new(27, 13), 40.0);
    let mut baseline = BaselineDefence::new(layout);
    let mut out = Vec::new();
    baseline.handle(5, &board, &mut out);

    let removals: Vec<_> = out
        .iter()
        .filter(|intent| matches!(intent, PlacementIntent::Remove { .. }))
        .collect();
    assert_eq!(removals, vec![&PlacementIntent::remove(Coord::new(1, 13))]);
}

#[test]
fn queue_preserves_insertion_order_within_a_row() {
    let mut queue = UpgradeQueue::new();
    queue.push(Coord::new(20, 6));
    queue.push(Coord::new(11, 6));
    queue.push(Coord::new(15, 2));
    let mut out = Vec::new();
    queue.flush(&mut out);
    assert_eq!(
        out,
        vec![PlacementIntent::upgrade(vec![
            Coord::new(15, 2),
            Coord::new(20, 6),
            Coord::new(11, 6),
        ])]
    );
}
