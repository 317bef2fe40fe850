//! Initiative card dealing
//!
//! Initiative is modelled as a deck of cards numbered 1-10, dealt without
//! replacement within one deal. A combatant can pin a card it is keeping from
//! the previous round; pinned cards are pulled from the deck before the
//! shuffle so nobody else can draw them.
//!
//! The older quick-roll variant (uniform d10 per character, max-of-d10s for
//! monsters) is kept as an alternate strategy but is not part of the round
//! flow.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::value_objects::CombatantId;

/// Lowest card in the initiative deck.
pub const CARD_MIN: i32 = 1;
/// Highest card in the initiative deck.
pub const CARD_MAX: i32 = 10;

/// One combatant's seat at the deal, with an optional pinned card.
#[derive(Debug, Clone, Copy)]
pub struct InitiativeSlot {
    pub combatant_id: CombatantId,
    /// Card this combatant keeps from the previous round, if any.
    pub pinned: Option<i32>,
}

impl InitiativeSlot {
    pub fn new(combatant_id: CombatantId) -> Self {
        Self {
            combatant_id,
            pinned: None,
        }
    }
}

/// Deal one card to every slot.
///
/// The deck holds `ceil(n / 10)` copies of 1..=10. Each pinned card removes
/// one matching copy from the deck before the shuffle; pinned slots keep
/// their card, every other slot pops one shuffled card.
pub fn deal<R: Rng>(rng: &mut R, slots: &[InitiativeSlot]) -> Vec<(CombatantId, i32)> {
    if slots.is_empty() {
        return Vec::new();
    }

    let copies = slots.len().div_ceil(10);
    let mut deck: Vec<i32> = Vec::with_capacity(copies * 10);
    for _ in 0..copies {
        deck.extend(CARD_MIN..=CARD_MAX);
    }

    // Pull pinned cards out of the deck so they cannot be dealt twice.
    for slot in slots {
        if let Some(card) = slot.pinned {
            if let Some(pos) = deck.iter().position(|c| *c == card) {
                deck.remove(pos);
            }
        }
    }

    deck.shuffle(rng);

    let mut dealt = Vec::with_capacity(slots.len());
    for slot in slots {
        let card = match slot.pinned {
            Some(card) => card,
            // Deck sized to the slot count, so a card is always available.
            None => deck.pop().unwrap_or(CARD_MAX),
        };
        dealt.push((slot.combatant_id, card));
    }
    dealt
}

/// Quick-roll variant for a character: uniform 1-10.
pub fn quick_roll_character<R: Rng>(rng: &mut R) -> i32 {
    rng.gen_range(CARD_MIN..=CARD_MAX)
}

/// Number of d10s a monster rolls in the quick-roll variant.
///
/// Ferocity is clipped to 1..=5 so a high-ferocity monster never rolls more
/// than five dice.
pub fn ferocity_dice(ferocity: i32) -> u32 {
    ferocity.clamp(1, 5) as u32
}

/// Quick-roll variant for a monster: the best of `ferocity_dice` d10 rolls.
pub fn quick_roll_monster<R: Rng>(rng: &mut R, ferocity: i32) -> i32 {
    (0..ferocity_dice(ferocity))
        .map(|_| rng.gen_range(CARD_MIN..=CARD_MAX))
        .max()
        .unwrap_or(CARD_MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn slots(n: usize) -> Vec<InitiativeSlot> {
        (0..n).map(|_| InitiativeSlot::new(CombatantId::new())).collect()
    }

    #[test]
    fn deal_is_without_replacement_up_to_ten() {
        let mut rng = StdRng::seed_from_u64(7);
        for n in 1..=10 {
            let slots = slots(n);
            let dealt = deal(&mut rng, &slots);
            assert_eq!(dealt.len(), n);
            let mut cards: Vec<i32> = dealt.iter().map(|(_, c)| *c).collect();
            cards.sort_unstable();
            cards.dedup();
            assert_eq!(cards.len(), n, "duplicate card dealt for n={}", n);
            assert!(cards.iter().all(|c| (CARD_MIN..=CARD_MAX).contains(c)));
        }
    }

    #[test]
    fn deal_respects_pinned_cards() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut s = slots(8);
        s[0].pinned = Some(3);
        s[5].pinned = Some(7);

        for _ in 0..50 {
            let dealt = deal(&mut rng, &s);
            assert_eq!(dealt[0].1, 3);
            assert_eq!(dealt[5].1, 7);
            // Nobody else may hold a pinned card.
            for (i, (_, card)) in dealt.iter().enumerate() {
                if i != 0 {
                    assert_ne!(*card, 3);
                }
                if i != 5 {
                    assert_ne!(*card, 7);
                }
            }
        }
    }

    #[test]
    fn deal_grows_deck_beyond_ten_combatants() {
        let mut rng = StdRng::seed_from_u64(1);
        let s = slots(14);
        let dealt = deal(&mut rng, &s);
        assert_eq!(dealt.len(), 14);
        // Two copies of the deck: no card appears more than twice.
        for card in CARD_MIN..=CARD_MAX {
            let count = dealt.iter().filter(|(_, c)| *c == card).count();
            assert!(count <= 2, "card {} dealt {} times", card, count);
        }
    }

    #[test]
    fn ferocity_clips_dice_count() {
        assert_eq!(ferocity_dice(1), 1);
        assert_eq!(ferocity_dice(3), 3);
        assert_eq!(ferocity_dice(5), 5);
        assert_eq!(ferocity_dice(10), 5);
    }

    #[test]
    fn quick_roll_monster_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..100 {
            let roll = quick_roll_monster(&mut rng, 10);
            assert!((CARD_MIN..=CARD_MAX).contains(&roll));
        }
    }
}
