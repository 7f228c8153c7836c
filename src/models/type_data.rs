use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

pub const TYPE_COUNT: usize = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatureType {
    Normal,
    Fire,
    Water,
    Electric,
    Grass,
    Ice,
    Fighting,
    Poison,
    Ground,
    Flying,
    Psychic,
    Bug,
    Rock,
    Ghost,
    Dragon,
    Dark,
    Steel,
    Fairy,
}

impl CreatureType {
    pub const ALL: [CreatureType; TYPE_COUNT] = [
        CreatureType::Normal,
        CreatureType::Fire,
        CreatureType::Water,
        CreatureType::Electric,
        CreatureType::Grass,
        CreatureType::Ice,
        CreatureType::Fighting,
        CreatureType::Poison,
        CreatureType::Ground,
        CreatureType::Flying,
        CreatureType::Psychic,
        CreatureType::Bug,
        CreatureType::Rock,
        CreatureType::Ghost,
        CreatureType::Dragon,
        CreatureType::Dark,
        CreatureType::Steel,
        CreatureType::Fairy,
    ];

    /// API name, e.g. `"fire"`.
    pub fn name(&self) -> &'static str {
        match self {
            CreatureType::Normal => "normal",
            CreatureType::Fire => "fire",
            CreatureType::Water => "water",
            CreatureType::Electric => "electric",
            CreatureType::Grass => "grass",
            CreatureType::Ice => "ice",
            CreatureType::Fighting => "fighting",
            CreatureType::Poison => "poison",
            CreatureType::Ground => "ground",
            CreatureType::Flying => "flying",
            CreatureType::Psychic => "psychic",
            CreatureType::Bug => "bug",
            CreatureType::Rock => "rock",
            CreatureType::Ghost => "ghost",
            CreatureType::Dragon => "dragon",
            CreatureType::Dark => "dark",
            CreatureType::Steel => "steel",
            CreatureType::Fairy => "fairy",
        }
    }
}

impl fmt::Display for CreatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CreatureType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        CreatureType::ALL
            .into_iter()
            .find(|t| t.name() == lowered)
            .ok_or_else(|| GameError::UnknownType(s.to_string()))
    }
}

// ── Type chart ──────────────────────────────────────────────────────
//
// attacking type -> (defending type, multiplier). Pairs not listed are neutral.

use CreatureType::*;

pub const TYPE_CHART: &[(CreatureType, &[(CreatureType, f64)])] = &[
    (Normal, &[(Ghost, 0.0), (Rock, 0.5), (Steel, 0.5)]),
    (
        Fire,
        &[
            (Fire, 0.5),
            (Water, 0.5),
            (Grass, 2.0),
            (Ice, 2.0),
            (Bug, 2.0),
            (Rock, 0.5),
            (Dragon, 0.5),
            (Steel, 2.0),
        ],
    ),
    (
        Water,
        &[
            (Fire, 2.0),
            (Water, 0.5),
            (Grass, 0.5),
            (Ground, 2.0),
            (Rock, 2.0),
            (Dragon, 0.5),
        ],
    ),
    (
        Electric,
        &[
            (Water, 2.0),
            (Electric, 0.5),
            (Grass, 0.5),
            (Ground, 0.0),
            (Flying, 2.0),
            (Dragon, 0.5),
        ],
    ),
    (
        Grass,
        &[
            (Fire, 0.5),
            (Water, 2.0),
            (Grass, 0.5),
            (Poison, 0.5),
            (Ground, 2.0),
            (Flying, 0.5),
            (Bug, 0.5),
            (Rock, 2.0),
            (Dragon, 0.5),
            (Steel, 0.5),
        ],
    ),
    (
        Ice,
        &[
            (Fire, 0.5),
            (Water, 0.5),
            (Grass, 2.0),
            (Ice, 0.5),
            (Ground, 2.0),
            (Flying, 2.0),
            (Dragon, 2.0),
            (Steel, 0.5),
        ],
    ),
    (
        Fighting,
        &[
            (Normal, 2.0),
            (Ice, 2.0),
            (Poison, 0.5),
            (Flying, 0.5),
            (Psychic, 0.5),
            (Bug, 0.5),
            (Rock, 2.0),
            (Ghost, 0.0),
            (Dark, 2.0),
            (Steel, 2.0),
            (Fairy, 0.5),
        ],
    ),
    (
        Poison,
        &[
            (Grass, 2.0),
            (Poison, 0.5),
            (Ground, 0.5),
            (Rock, 0.5),
            (Ghost, 0.5),
            (Steel, 0.0),
            (Fairy, 2.0),
        ],
    ),
    (
        Ground,
        &[
            (Fire, 2.0),
            (Electric, 2.0),
            (Grass, 0.5),
            (Poison, 2.0),
            (Flying, 0.0),
            (Bug, 0.5),
            (Rock, 2.0),
            (Steel, 2.0),
        ],
    ),
    (
        Flying,
        &[
            (Electric, 0.5),
            (Grass, 2.0),
            (Fighting, 2.0),
            (Bug, 2.0),
            (Rock, 0.5),
            (Steel, 0.5),
        ],
    ),
    (
        Psychic,
        &[
            (Fighting, 2.0),
            (Poison, 2.0),
            (Psychic, 0.5),
            (Dark, 0.0),
            (Steel, 0.5),
        ],
    ),
    (
        Bug,
        &[
            (Fire, 0.5),
            (Grass, 2.0),
            (Fighting, 0.5),
            (Poison, 0.5),
            (Flying, 0.5),
            (Psychic, 2.0),
            (Ghost, 0.5),
            (Dark, 2.0),
            (Steel, 0.5),
            (Fairy, 0.5),
        ],
    ),
    (
        Rock,
        &[
            (Fire, 2.0),
            (Ice, 2.0),
            (Fighting, 0.5),
            (Ground, 0.5),
            (Flying, 2.0),
            (Bug, 2.0),
            (Steel, 0.5),
        ],
    ),
    (
        Ghost,
        &[(Normal, 0.0), (Psychic, 2.0), (Ghost, 2.0), (Dark, 0.5)],
    ),
    (Dragon, &[(Dragon, 2.0), (Steel, 0.5), (Fairy, 0.0)]),
    (
        Dark,
        &[
            (Fighting, 0.5),
            (Psychic, 2.0),
            (Ghost, 2.0),
            (Dark, 0.5),
            (Fairy, 0.5),
        ],
    ),
    (
        Steel,
        &[
            (Fire, 0.5),
            (Water, 0.5),
            (Electric, 0.5),
            (Ice, 2.0),
            (Rock, 2.0),
            (Steel, 0.5),
            (Fairy, 2.0),
        ],
    ),
    (
        Fairy,
        &[
            (Fire, 0.5),
            (Fighting, 2.0),
            (Poison, 0.5),
            (Dragon, 2.0),
            (Dark, 2.0),
            (Steel, 0.5),
        ],
    ),
];

/// Dense `[attack][defend]` view of [`TYPE_CHART`], built at compile time.
static MATRIX: [[f64; TYPE_COUNT]; TYPE_COUNT] = build_matrix();

const fn build_matrix() -> [[f64; TYPE_COUNT]; TYPE_COUNT] {
    let mut matrix = [[1.0; TYPE_COUNT]; TYPE_COUNT];
    let mut row = 0;
    while row < TYPE_CHART.len() {
        let (attack, matchups) = TYPE_CHART[row];
        let mut col = 0;
        while col < matchups.len() {
            let (defend, multiplier) = matchups[col];
            matrix[attack as usize][defend as usize] = multiplier;
            col += 1;
        }
        row += 1;
    }
    matrix
}

pub fn type_effectiveness(attack_type: CreatureType, defend_type: CreatureType) -> f64 {
    MATRIX[attack_type as usize][defend_type as usize]
}

/// Product of the single-type multipliers against every defender type.
pub fn effectiveness(attack_type: CreatureType, defender_types: &[CreatureType]) -> f64 {
    defender_types
        .iter()
        .map(|&t| type_effectiveness(attack_type, t))
        .product()
}

pub fn effectiveness_message(multiplier: f64) -> Option<&'static str> {
    if multiplier > 1.0 {
        Some("It's super effective!")
    } else if multiplier > 0.0 && multiplier < 1.0 {
        Some("It's not very effective...")
    } else if multiplier == 0.0 {
        Some("It had no effect...")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listed(attack: CreatureType, defend: CreatureType) -> Option<f64> {
        TYPE_CHART
            .iter()
            .find(|(a, _)| *a == attack)
            .and_then(|(_, row)| row.iter().find(|(d, _)| *d == defend))
            .map(|(_, m)| *m)
    }

    #[test]
    fn test_single_type_matches_chart_or_neutral() {
        for attack in CreatureType::ALL {
            for defend in CreatureType::ALL {
                let expected = listed(attack, defend).unwrap_or(1.0);
                assert_eq!(
                    effectiveness(attack, &[defend]),
                    expected,
                    "{attack} vs {defend}"
                );
            }
        }
    }

    #[test]
    fn test_chart_covers_every_attacking_type_once() {
        assert_eq!(TYPE_CHART.len(), TYPE_COUNT);
        for t in CreatureType::ALL {
            assert_eq!(TYPE_CHART.iter().filter(|(a, _)| *a == t).count(), 1);
        }
    }

    #[test]
    fn test_dual_type_is_product() {
        // fire: 2x vs grass, 0.5x vs water
        assert_eq!(effectiveness(Fire, &[Grass, Water]), 1.0);
        assert_eq!(effectiveness(Ice, &[Grass, Ground]), 4.0);
        assert_eq!(effectiveness(Grass, &[Fire, Flying]), 0.25);
        assert_eq!(effectiveness(Electric, &[Water, Ground]), 0.0);
    }

    #[test]
    fn test_no_defender_types_is_neutral() {
        assert_eq!(effectiveness(Dragon, &[]), 1.0);
    }

    #[test]
    fn test_immunities() {
        assert_eq!(type_effectiveness(Normal, Ghost), 0.0);
        assert_eq!(type_effectiveness(Ghost, Normal), 0.0);
        assert_eq!(type_effectiveness(Ground, Flying), 0.0);
        assert_eq!(type_effectiveness(Psychic, Dark), 0.0);
        assert_eq!(type_effectiveness(Dragon, Fairy), 0.0);
        assert_eq!(type_effectiveness(Poison, Steel), 0.0);
    }

    #[test]
    fn test_parse_type_names() {
        assert_eq!("fire".parse::<CreatureType>().unwrap(), Fire);
        assert_eq!("Psychic".parse::<CreatureType>().unwrap(), Psychic);
        assert_eq!(
            "shadow".parse::<CreatureType>(),
            Err(GameError::UnknownType("shadow".into()))
        );
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Fairy).unwrap(), r#""fairy""#);
        let parsed: CreatureType = serde_json::from_str(r#""steel""#).unwrap();
        assert_eq!(parsed, Steel);
    }

    #[test]
    fn test_effectiveness_message() {
        assert_eq!(effectiveness_message(2.0), Some("It's super effective!"));
        assert_eq!(effectiveness_message(4.0), Some("It's super effective!"));
        assert_eq!(
            effectiveness_message(0.5),
            Some("It's not very effective...")
        );
        assert_eq!(effectiveness_message(0.0), Some("It had no effect..."));
        assert_eq!(effectiveness_message(1.0), None);
    }
}
