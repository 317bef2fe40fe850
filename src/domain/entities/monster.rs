//! Monster templates - compendium data consumed read-only by the engine

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DiceNotation, MonsterTemplateId};

/// A monster as authored in the compendium.
///
/// The engine never writes templates; it instantiates combatant slots from
/// them and resolves attacks against their attack table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterTemplate {
    pub id: MonsterTemplateId,
    pub name: String,
    pub stats: MonsterStats,
    /// Ordered d6 action table. Entries must be authored non-overlapping;
    /// resolution takes the first match.
    pub attack_table: Vec<AttackEntry>,
}

impl MonsterTemplate {
    /// Find the attack entry matching a d6 roll, if any.
    ///
    /// An unmatched roll is a valid outcome (the monster does nothing
    /// special), not an error.
    pub fn attack_for_roll(&self, roll: u8) -> Option<&AttackEntry> {
        self.attack_table.iter().find(|e| e.roll_match.contains(roll))
    }
}

/// Stat block subset the engine cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterStats {
    /// How many simultaneous turn slots this monster occupies per round.
    /// Always at least 1.
    pub ferocity: i32,
    pub hp: i32,
    #[serde(default)]
    pub wp: Option<i32>,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub movement: i32,
}

impl MonsterStats {
    pub fn ferocity(&self) -> i32 {
        self.ferocity.max(1)
    }
}

/// One row of a monster's d6 action table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackEntry {
    pub roll_match: RollMatch,
    pub name: String,
    /// Free text; may embed dice notation such as "2d6+1".
    pub description: String,
    /// Nested follow-up table, one level deep.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_table: Option<Vec<AttackEntry>>,
}

impl AttackEntry {
    /// Dice notation embedded in the description, flagged for the companion
    /// roll utility. Never evaluated during attack resolution.
    pub fn embedded_dice(&self) -> Vec<DiceNotation> {
        DiceNotation::find_all(&self.description)
    }
}

/// A single d6 face or an inclusive face range, as authored ("4", "2-3").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RollMatch {
    Face(u8),
    Range(u8, u8),
}

impl RollMatch {
    pub fn contains(&self, roll: u8) -> bool {
        match self {
            RollMatch::Face(face) => *face == roll,
            RollMatch::Range(lo, hi) => (*lo..=*hi).contains(&roll),
        }
    }

    pub fn parse(text: &str) -> Result<Self, RollMatchError> {
        let text = text.trim();
        if let Some((lo, hi)) = text.split_once('-') {
            let lo = parse_face(lo)?;
            let hi = parse_face(hi)?;
            if lo > hi {
                return Err(RollMatchError::InvertedRange(lo, hi));
            }
            Ok(RollMatch::Range(lo, hi))
        } else {
            Ok(RollMatch::Face(parse_face(text)?))
        }
    }
}

fn parse_face(text: &str) -> Result<u8, RollMatchError> {
    let face: u8 = text
        .trim()
        .parse()
        .map_err(|_| RollMatchError::NotAFace(text.trim().to_string()))?;
    if (1..=6).contains(&face) {
        Ok(face)
    } else {
        Err(RollMatchError::NotAFace(face.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RollMatchError {
    #[error("'{0}' is not a d6 face")]
    NotAFace(String),
    #[error("range {0}-{1} is inverted")]
    InvertedRange(u8, u8),
}

impl TryFrom<String> for RollMatch {
    type Error = RollMatchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RollMatch::parse(&value)
    }
}

impl From<RollMatch> for String {
    fn from(value: RollMatch) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for RollMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RollMatch::Face(face) => write!(f, "{}", face),
            RollMatch::Range(lo, hi) => write!(f, "{}-{}", lo, hi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(roll_match: &str, name: &str) -> AttackEntry {
        AttackEntry {
            roll_match: RollMatch::parse(roll_match).expect("valid roll match"),
            name: name.to_string(),
            description: String::new(),
            effect_table: None,
        }
    }

    #[test]
    fn range_matches_its_faces_only() {
        let m = RollMatch::parse("2-3").expect("parses");
        assert!(!m.contains(1));
        assert!(m.contains(2));
        assert!(m.contains(3));
        assert!(!m.contains(4));
    }

    #[test]
    fn face_matches_one_roll() {
        let m = RollMatch::parse("4").expect("parses");
        assert!(m.contains(4));
        assert!(!m.contains(3));
    }

    #[test]
    fn rejects_bad_faces() {
        assert!(RollMatch::parse("0").is_err());
        assert!(RollMatch::parse("7").is_err());
        assert!(RollMatch::parse("5-2").is_err());
        assert!(RollMatch::parse("bite").is_err());
    }

    #[test]
    fn unmatched_roll_returns_none() {
        let template = MonsterTemplate {
            id: MonsterTemplateId::new(),
            name: "Goblin".to_string(),
            stats: MonsterStats {
                ferocity: 1,
                hp: 6,
                wp: None,
                armor: 0,
                movement: 8,
            },
            attack_table: vec![entry("2-3", "Stab"), entry("5", "Shriek")],
        };
        assert_eq!(template.attack_for_roll(2).map(|e| e.name.as_str()), Some("Stab"));
        assert_eq!(template.attack_for_roll(3).map(|e| e.name.as_str()), Some("Stab"));
        assert_eq!(template.attack_for_roll(5).map(|e| e.name.as_str()), Some("Shriek"));
        assert!(template.attack_for_roll(1).is_none());
        assert!(template.attack_for_roll(4).is_none());
        assert!(template.attack_for_roll(6).is_none());
    }

    #[test]
    fn roll_match_round_trips_through_serde() {
        let json = serde_json::to_string(&RollMatch::Range(2, 3)).expect("serializes");
        assert_eq!(json, "\"2-3\"");
        let back: RollMatch = serde_json::from_str(&json).expect("deserializes");
        assert_eq!(back, RollMatch::Range(2, 3));
    }
}
