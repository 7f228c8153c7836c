use crate::models::battle::{BattleState, Combatant};
use crate::models::pokemon::{capitalize, MoveDescriptor, Stat, StatSpread};

const HP_BAR_CELLS: u32 = 10;

pub const HUNT_HINT: &str =
    "Available commands:\n/battle - Start battle\n/evyield - Check EV yields";

/// `█` per filled tenth, `▒` for the rest.
pub fn hp_bar(current: u32, max: u32) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((current as f64 / max as f64) * HP_BAR_CELLS as f64).floor() as u32
    }
    .min(HP_BAR_CELLS);
    let mut bar = "█".repeat(filled as usize);
    bar.push_str(&"▒".repeat((HP_BAR_CELLS - filled) as usize));
    bar
}

fn type_list(combatant: &Combatant) -> String {
    combatant
        .types
        .iter()
        .map(|t| capitalize(t.name()))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn combatant_block(label: &str, combatant: &Combatant) -> Vec<String> {
    vec![
        format!("{label} {} [{}]", capitalize(&combatant.name), type_list(combatant)),
        format!(
            "Lv. {}  •  HP {}/{}",
            combatant.level, combatant.current_hp, combatant.max_hp
        ),
        hp_bar(combatant.current_hp, combatant.max_hp),
    ]
}

fn optional(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// The battle screen. `moves` lines up with the trainer's move list; moves whose data could not be
/// fetched are skipped but keep their number.
pub fn format_battle_state(state: &BattleState, moves: &[Option<MoveDescriptor>]) -> String {
    let wild = &state.wild;
    let mut lines = combatant_block("Opponent's", wild);
    if wild.current_hp as f64 <= wild.max_hp as f64 / 2.0 {
        lines.push("✓ CATCH AVAILABLE - Type /catch to attempt capture!".to_string());
    }
    lines.push(String::new());
    lines.extend(combatant_block("Your", &state.trainer));
    lines.push(String::new());
    lines.push("Available Moves:".to_string());

    for (i, descriptor) in moves.iter().enumerate() {
        if let Some(m) = descriptor {
            lines.push(format!(
                "{}. {} [{}]  Power: {}  Accuracy: {}",
                i + 1,
                m.name,
                capitalize(m.move_type.name()),
                optional(m.power),
                optional(m.accuracy)
            ));
        }
    }
    lines.join("\n")
}

pub fn format_ev_yields(yields: &StatSpread) -> String {
    let entries = yields.non_zero();
    if entries.is_empty() {
        return "This Pokémon gives no EV points when defeated.".to_string();
    }
    let mut lines = vec!["EV Yields:".to_string()];
    lines.extend(
        entries
            .iter()
            .map(|(stat, value)| format!("  {}: +{}", stat.label(), value)),
    );
    lines.join("\n")
}

/// `{"HP": 1, ...}` for the stats with a non-zero yield.
pub fn ev_yield_map(yields: &StatSpread) -> serde_json::Map<String, serde_json::Value> {
    yields
        .non_zero()
        .into_iter()
        .map(|(stat, value): (Stat, u32)| (stat.label().to_string(), value.into()))
        .collect()
}
