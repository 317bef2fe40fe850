//! Dice notation recognition
//!
//! Attack and effect descriptions embed dice notation ("2d6+1", "d8"). The
//! attack resolver only recognizes these tokens and hands them to the
//! companion roll endpoint; it never evaluates them as part of resolving an
//! attack.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};

static DICE_RE: Lazy<Regex> = Lazy::new(|| {
    // "2d6", "d8", "3D10+2", "1d4-1"
    Regex::new(r"\b(\d*)[dD](\d+)\s*([+-]\s*\d+)?").expect("dice regex is valid")
});

/// Largest dice pool a single expression may describe. Anything bigger is
/// not treated as notation; the roll endpoint evaluates pools synchronously.
const MAX_COUNT: u32 = 100;
const MAX_SIDES: u32 = 1000;

/// A dice expression recognized inside free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceNotation {
    /// Number of dice ("2" in "2d6"); a bare "d6" counts as one die.
    pub count: u32,
    /// Die sides ("6" in "2d6").
    pub sides: u32,
    /// Flat modifier ("+1" in "2d6+1").
    pub modifier: i32,
    /// The matched source text, unmodified.
    pub raw: String,
}

impl DiceNotation {
    /// Find every dice expression embedded in `text`, in order of appearance.
    pub fn find_all(text: &str) -> Vec<DiceNotation> {
        DICE_RE
            .captures_iter(text)
            .filter_map(|caps| {
                let count: u32 = match caps.get(1).map(|m| m.as_str()) {
                    Some("") | None => 1,
                    Some(s) => s.parse().ok()?,
                };
                if count == 0 || count > MAX_COUNT {
                    return None;
                }
                let sides: u32 = caps.get(2)?.as_str().parse().ok()?;
                if sides == 0 || sides > MAX_SIDES {
                    return None;
                }
                let modifier = caps
                    .get(3)
                    .map(|m| m.as_str().replace(' ', ""))
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
                Some(DiceNotation {
                    count,
                    sides,
                    modifier,
                    raw: caps.get(0)?.as_str().trim().to_string(),
                })
            })
            .collect()
    }

    /// Parse a standalone expression like "2d6+1".
    pub fn parse(text: &str) -> Option<DiceNotation> {
        let found = Self::find_all(text);
        match found.as_slice() {
            [single] if single.raw.len() == text.trim().len() => Some(single.clone()),
            _ => None,
        }
    }

    /// Evaluate the expression. Used by the companion roll endpoint only.
    pub fn roll<R: Rng>(&self, rng: &mut R) -> DiceRoll {
        let rolls: Vec<u32> = (0..self.count)
            .map(|_| rng.gen_range(1..=self.sides))
            .collect();
        let total = rolls.iter().map(|r| *r as i64).sum::<i64>() + self.modifier as i64;
        DiceRoll {
            notation: self.clone(),
            rolls,
            total,
        }
    }

}

impl std::fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{}", m),
            m => write!(f, "{}", m),
        }
    }
}

/// Result of evaluating one dice expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiceRoll {
    pub notation: DiceNotation,
    pub rolls: Vec<u32>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn finds_notation_inside_prose() {
        let found =
            DiceNotation::find_all("The bite deals 2d6+1 damage and 1d4 poison each round.");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].count, 2);
        assert_eq!(found[0].sides, 6);
        assert_eq!(found[0].modifier, 1);
        assert_eq!(found[1].raw, "1d4");
    }

    #[test]
    fn bare_die_counts_as_one() {
        let found = DiceNotation::find_all("roll d8 for damage");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].count, 1);
        assert_eq!(found[0].sides, 8);
    }

    #[test]
    fn negative_modifier_parses() {
        let n = DiceNotation::parse("1d4-1").expect("parses");
        assert_eq!(n.count, 1);
        assert_eq!(n.sides, 4);
        assert_eq!(n.modifier, -1);
    }

    #[test]
    fn absurd_pools_are_not_notation() {
        assert!(DiceNotation::parse("4000000000d6").is_none());
        assert!(DiceNotation::parse("101d6").is_none());
        assert!(DiceNotation::parse("0d6").is_none());
        assert!(DiceNotation::parse("2d100000").is_none());
        // The caps themselves are still fine.
        assert!(DiceNotation::parse("100d1000").is_some());
    }

    #[test]
    fn plain_text_has_no_notation() {
        assert!(DiceNotation::find_all("slams the door shut").is_empty());
        assert!(DiceNotation::parse("no dice here").is_none());
    }

    #[test]
    fn roll_stays_in_bounds() {
        let n = DiceNotation::parse("2d6+1").expect("parses");
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..100 {
            let roll = n.roll(&mut rng);
            assert_eq!(roll.rolls.len(), 2);
            assert!((3..=13).contains(&roll.total));
        }
    }
}
