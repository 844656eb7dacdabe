//! Human-readable rendering of turn plans.

use std::io::{self, Write};

use lane_defence_agent::TurnPlan;
use lane_defence_core::Zone;

/// Writes one block per plan: a summary line followed by its intents.
pub(crate) fn write_text<W: Write>(out: &mut W, plans: &[TurnPlan]) -> io::Result<()> {
    for plan in plans {
        let decision = plan.decision.map_or("none", Zone::name);
        let damage = Zone::ALL
            .into_iter()
            .map(|zone| format!("{zone} {}", plan.attribution.get(zone)))
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "turn {}: reinforce {decision} ({damage})", plan.turn)?;
        for intent in &plan.intents {
            writeln!(out, "  {intent}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lane_defence_agent::DamageAttribution;
    use lane_defence_core::{Coord, PlacementIntent, UnitKind};

    #[test]
    fn renders_summary_and_intents() {
        let plan = TurnPlan {
            turn: 3,
            attribution: DamageAttribution::new(6.0, 0.0, 0.0),
            decision: Some(Zone::Left),
            intents: vec![PlacementIntent::spawn_many(
                UnitKind::Turret,
                vec![Coord::new(2, 12), Coord::new(4, 12)],
                2,
            )],
        };
        let mut rendered = Vec::new();
        write_text(&mut rendered, &[plan]).expect("writing to a vec succeeds");
        let rendered = String::from_utf8(rendered).expect("output is utf-8");
        assert_eq!(
            rendered,
            "turn 3: reinforce left (left 6, mid 0, right 0)\n  spawn turret x2 at (2, 12) (4, 12)\n"
        );
    }
}
