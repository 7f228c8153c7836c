use serde::{Deserialize, Serialize};

use super::type_data::CreatureType;
use crate::error::{GameError, Result};

/// Full detail from /pokemon/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct PokemonDetail {
    pub id: u32,
    pub name: String,
    pub types: Vec<PokemonTypeSlot>,
    pub stats: Vec<StatEntry>,
    pub moves: Vec<MoveEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PokemonTypeSlot {
    pub slot: u32,
    #[serde(rename = "type")]
    pub type_info: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatEntry {
    pub base_stat: u32,
    #[serde(default)]
    pub effort: u32,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveEntry {
    #[serde(rename = "move")]
    pub move_info: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Move detail from /move/{name}
#[derive(Debug, Clone, Deserialize)]
pub struct MoveDetail {
    pub name: String,
    pub power: Option<u32>,
    pub accuracy: Option<u32>,
    pub pp: Option<u32>,
    #[serde(rename = "type")]
    pub move_type: NamedResource,
}

// ── Stats ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Hp,
    Attack,
    Defense,
    SpecialAttack,
    SpecialDefense,
    Speed,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Hp,
        Stat::Attack,
        Stat::Defense,
        Stat::SpecialAttack,
        Stat::SpecialDefense,
        Stat::Speed,
    ];

    pub fn from_api_name(name: &str) -> Option<Stat> {
        match name {
            "hp" => Some(Stat::Hp),
            "attack" => Some(Stat::Attack),
            "defense" => Some(Stat::Defense),
            "special-attack" => Some(Stat::SpecialAttack),
            "special-defense" => Some(Stat::SpecialDefense),
            "speed" => Some(Stat::Speed),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Stat::Hp => "HP",
            Stat::Attack => "Attack",
            Stat::Defense => "Defense",
            Stat::SpecialAttack => "Sp. Attack",
            Stat::SpecialDefense => "Sp. Defense",
            Stat::Speed => "Speed",
        }
    }
}

/// One value per stat. Used for base stats, EV yields, IVs and EVs alike.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatSpread {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    #[serde(rename = "sp_attack")]
    pub special_attack: u32,
    #[serde(rename = "sp_defense")]
    pub special_defense: u32,
    pub speed: u32,
}

impl StatSpread {
    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Hp => self.hp,
            Stat::Attack => self.attack,
            Stat::Defense => self.defense,
            Stat::SpecialAttack => self.special_attack,
            Stat::SpecialDefense => self.special_defense,
            Stat::Speed => self.speed,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Hp => self.hp = value,
            Stat::Attack => self.attack = value,
            Stat::Defense => self.defense = value,
            Stat::SpecialAttack => self.special_attack = value,
            Stat::SpecialDefense => self.special_defense = value,
            Stat::Speed => self.speed = value,
        }
    }

    /// Non-zero entries in display order.
    pub fn non_zero(&self) -> Vec<(Stat, u32)> {
        Stat::ALL
            .into_iter()
            .map(|s| (s, self.get(s)))
            .filter(|(_, v)| *v > 0)
            .collect()
    }
}

// Attack/defense fall back to this when the payload omits them.
const DEFAULT_BATTLE_STAT: u32 = 50;

// ── Gateway-facing data ─────────────────────────────────────────────

/// Immutable reference data for one species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesData {
    pub id: u32,
    pub name: String,
    pub types: Vec<CreatureType>,
    pub base_stats: StatSpread,
    pub effort_yield: StatSpread,
    /// Move pool in API order.
    pub moves: Vec<String>,
}

impl TryFrom<PokemonDetail> for SpeciesData {
    type Error = GameError;

    fn try_from(detail: PokemonDetail) -> Result<Self> {
        let mut slots = detail.types;
        slots.sort_by_key(|s| s.slot);
        let types = slots
            .iter()
            .map(|s| s.type_info.name.parse::<CreatureType>())
            .collect::<Result<Vec<_>>>()?;

        let mut base_stats = StatSpread {
            attack: DEFAULT_BATTLE_STAT,
            defense: DEFAULT_BATTLE_STAT,
            ..StatSpread::default()
        };
        let mut effort_yield = StatSpread::default();
        let mut has_hp = false;
        for entry in &detail.stats {
            if let Some(stat) = Stat::from_api_name(&entry.stat.name) {
                has_hp |= stat == Stat::Hp;
                base_stats.set(stat, entry.base_stat);
                effort_yield.set(stat, entry.effort);
            }
        }
        if !has_hp {
            return Err(GameError::NotFound(format!("hp stat for {}", detail.name)));
        }

        Ok(SpeciesData {
            id: detail.id,
            name: detail.name,
            types,
            base_stats,
            effort_yield,
            moves: detail.moves.into_iter().map(|m| m.move_info.name).collect(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDescriptor {
    /// Display name, e.g. "Thunder Punch".
    pub name: String,
    pub move_type: CreatureType,
    /// `None` for status moves; damage treats it as 0.
    pub power: Option<u32>,
    /// Carried for display only. Moves never miss.
    pub accuracy: Option<u32>,
    pub pp: Option<u32>,
}

impl MoveDescriptor {
    /// Substituted when the opponent's chosen move can't be fetched.
    pub fn struggle() -> Self {
        Self {
            name: "Struggle".to_string(),
            move_type: CreatureType::Normal,
            power: Some(50),
            accuracy: Some(100),
            pp: None,
        }
    }
}

impl TryFrom<MoveDetail> for MoveDescriptor {
    type Error = GameError;

    fn try_from(detail: MoveDetail) -> Result<Self> {
        Ok(MoveDescriptor {
            name: display_move_name(&detail.name),
            move_type: detail.move_type.name.parse()?,
            power: detail.power,
            accuracy: detail.accuracy,
            pp: detail.pp,
        })
    }
}

/// "thunder-punch" -> "Thunder Punch"
pub fn display_move_name(api_name: &str) -> String {
    title_case(&api_name.replace('-', " "))
}

/// Upper-case every letter that follows a non-letter, lower-case the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// "mr-mime" -> "Mr-mime"
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIKACHU: &str = r#"{
        "id": 25,
        "name": "pikachu",
        "types": [
            {"slot": 1, "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}}
        ],
        "stats": [
            {"base_stat": 35, "effort": 0, "stat": {"name": "hp", "url": ""}},
            {"base_stat": 55, "effort": 0, "stat": {"name": "attack", "url": ""}},
            {"base_stat": 40, "effort": 0, "stat": {"name": "defense", "url": ""}},
            {"base_stat": 50, "effort": 0, "stat": {"name": "special-attack", "url": ""}},
            {"base_stat": 50, "effort": 0, "stat": {"name": "special-defense", "url": ""}},
            {"base_stat": 90, "effort": 2, "stat": {"name": "speed", "url": ""}}
        ],
        "moves": [
            {"move": {"name": "mega-punch", "url": ""}},
            {"move": {"name": "pay-day", "url": ""}},
            {"move": {"name": "thunder-punch", "url": ""}},
            {"move": {"name": "slam", "url": ""}},
            {"move": {"name": "double-kick", "url": ""}}
        ]
    }"#;

    #[test]
    fn test_species_from_pokemon_detail() {
        let detail: PokemonDetail = serde_json::from_str(PIKACHU).unwrap();
        let species = SpeciesData::try_from(detail).unwrap();

        assert_eq!(species.id, 25);
        assert_eq!(species.name, "pikachu");
        assert_eq!(species.types, vec![CreatureType::Electric]);
        assert_eq!(species.base_stats.hp, 35);
        assert_eq!(species.base_stats.attack, 55);
        assert_eq!(species.base_stats.defense, 40);
        assert_eq!(species.base_stats.speed, 90);
        assert_eq!(species.effort_yield.non_zero(), vec![(Stat::Speed, 2)]);
        assert_eq!(species.moves.len(), 5);
        assert_eq!(species.moves[2], "thunder-punch");
    }

    #[test]
    fn test_types_follow_slot_order() {
        let json = r#"{
            "id": 6,
            "name": "charizard",
            "types": [
                {"slot": 2, "type": {"name": "flying"}},
                {"slot": 1, "type": {"name": "fire"}}
            ],
            "stats": [{"base_stat": 78, "effort": 0, "stat": {"name": "hp"}}],
            "moves": []
        }"#;
        let detail: PokemonDetail = serde_json::from_str(json).unwrap();
        let species = SpeciesData::try_from(detail).unwrap();
        assert_eq!(
            species.types,
            vec![CreatureType::Fire, CreatureType::Flying]
        );
    }

    #[test]
    fn test_missing_attack_and_defense_default_to_fifty() {
        let json = r#"{
            "id": 132,
            "name": "ditto",
            "types": [{"slot": 1, "type": {"name": "normal"}}],
            "stats": [{"base_stat": 48, "effort": 1, "stat": {"name": "hp"}}],
            "moves": [{"move": {"name": "transform"}}]
        }"#;
        let detail: PokemonDetail = serde_json::from_str(json).unwrap();
        let species = SpeciesData::try_from(detail).unwrap();
        assert_eq!(species.base_stats.attack, 50);
        assert_eq!(species.base_stats.defense, 50);
        assert_eq!(species.base_stats.hp, 48);
    }

    #[test]
    fn test_species_without_hp_is_rejected() {
        let json = r#"{
            "id": 1,
            "name": "bulbasaur",
            "types": [{"slot": 1, "type": {"name": "grass"}}],
            "stats": [],
            "moves": []
        }"#;
        let detail: PokemonDetail = serde_json::from_str(json).unwrap();
        assert!(matches!(
            SpeciesData::try_from(detail),
            Err(GameError::NotFound(_))
        ));
    }

    #[test]
    fn test_species_with_unknown_type_is_rejected() {
        let json = r#"{
            "id": 10001,
            "name": "odd",
            "types": [{"slot": 1, "type": {"name": "shadow"}}],
            "stats": [{"base_stat": 10, "stat": {"name": "hp"}}],
            "moves": []
        }"#;
        let detail: PokemonDetail = serde_json::from_str(json).unwrap();
        assert_eq!(
            SpeciesData::try_from(detail),
            Err(GameError::UnknownType("shadow".into()))
        );
    }

    #[test]
    fn test_move_detail_to_descriptor() {
        let json = r#"{
            "id": 9,
            "name": "thunder-punch",
            "power": 75,
            "accuracy": 100,
            "pp": 15,
            "type": {"name": "electric", "url": "https://pokeapi.co/api/v2/type/13/"}
        }"#;
        let detail: MoveDetail = serde_json::from_str(json).unwrap();
        let descriptor = MoveDescriptor::try_from(detail).unwrap();
        assert_eq!(descriptor.name, "Thunder Punch");
        assert_eq!(descriptor.move_type, CreatureType::Electric);
        assert_eq!(descriptor.power, Some(75));
        assert_eq!(descriptor.accuracy, Some(100));
        assert_eq!(descriptor.pp, Some(15));
    }

    #[test]
    fn test_status_move_has_no_power() {
        let json = r#"{
            "name": "growl",
            "power": null,
            "accuracy": 100,
            "pp": 40,
            "type": {"name": "normal"}
        }"#;
        let detail: MoveDetail = serde_json::from_str(json).unwrap();
        let descriptor = MoveDescriptor::try_from(detail).unwrap();
        assert_eq!(descriptor.name, "Growl");
        assert_eq!(descriptor.power, None);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(display_move_name("u-turn"), "U Turn");
        assert_eq!(display_move_name("double-edge"), "Double Edge");
        assert_eq!(display_move_name("tackle"), "Tackle");
        assert_eq!(title_case("king's shield"), "King'S Shield");
        assert_eq!(capitalize("pikachu"), "Pikachu");
        assert_eq!(capitalize("MR-MIME"), "Mr-mime");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_struggle_fallback() {
        let s = MoveDescriptor::struggle();
        assert_eq!(s.name, "Struggle");
        assert_eq!(s.move_type, CreatureType::Normal);
        assert_eq!(s.power, Some(50));
        assert_eq!(s.accuracy, Some(100));
    }

    #[test]
    fn test_stat_spread_serde_keys() {
        let spread = StatSpread {
            hp: 1,
            attack: 2,
            defense: 3,
            special_attack: 4,
            special_defense: 5,
            speed: 6,
        };
        let json = serde_json::to_value(spread).unwrap();
        assert_eq!(json["sp_attack"], 4);
        assert_eq!(json["sp_defense"], 5);
    }
}
