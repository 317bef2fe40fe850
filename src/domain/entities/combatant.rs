//! Combatant entity - one turn-order slot in an encounter

use serde::{Deserialize, Serialize};

use crate::domain::entities::CharacterSheet;
use crate::domain::value_objects::{
    CharacterId, CombatantId, EncounterId, GroupId, MonsterTemplateId,
};

/// What a combatant slot stands for: a player's character, or one turn slot
/// of a monster instance group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CombatantKind {
    Player {
        character_ref: CharacterId,
        /// User id of the owning player.
        owner: String,
    },
    Monster {
        template_ref: MonsterTemplateId,
        /// Explicit sibling-group key. Every slot created for one logical
        /// monster shares this id.
        group_id: GroupId,
    },
}

/// One participant in the turn order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: CombatantId,
    pub encounter_id: EncounterId,
    pub kind: CombatantKind,
    pub display_name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    pub max_wp: Option<i32>,
    pub current_wp: Option<i32>,
    /// Initiative card for the current round. None until dealt.
    pub initiative: Option<i32>,
    /// Whether this combatant has taken its turn this round.
    pub has_acted: bool,
}

impl Combatant {
    /// Seat a player character, at full HP/WP.
    pub fn player(encounter_id: EncounterId, sheet: &CharacterSheet) -> Self {
        Self {
            id: CombatantId::new(),
            encounter_id,
            kind: CombatantKind::Player {
                character_ref: sheet.id,
                owner: sheet.owner.clone(),
            },
            display_name: sheet.name.clone(),
            max_hp: sheet.max_hp,
            current_hp: sheet.max_hp,
            max_wp: sheet.max_wp,
            current_wp: sheet.max_wp,
            initiative: None,
            has_acted: false,
        }
    }

    /// Create one turn slot of a monster instance group.
    pub fn monster_slot(
        encounter_id: EncounterId,
        template_ref: MonsterTemplateId,
        group_id: GroupId,
        display_name: impl Into<String>,
        max_hp: i32,
        max_wp: Option<i32>,
    ) -> Self {
        Self {
            id: CombatantId::new(),
            encounter_id,
            kind: CombatantKind::Monster {
                template_ref,
                group_id,
            },
            display_name: display_name.into(),
            max_hp,
            current_hp: max_hp,
            max_wp,
            current_wp: max_wp,
            initiative: None,
            has_acted: false,
        }
    }

    pub fn with_initiative(mut self, initiative: Option<i32>) -> Self {
        self.initiative = initiative;
        self
    }

    pub fn character_ref(&self) -> Option<CharacterId> {
        match &self.kind {
            CombatantKind::Player { character_ref, .. } => Some(*character_ref),
            CombatantKind::Monster { .. } => None,
        }
    }

    pub fn template_ref(&self) -> Option<MonsterTemplateId> {
        match &self.kind {
            CombatantKind::Monster { template_ref, .. } => Some(*template_ref),
            CombatantKind::Player { .. } => None,
        }
    }

    pub fn group_id(&self) -> Option<GroupId> {
        match &self.kind {
            CombatantKind::Monster { group_id, .. } => Some(*group_id),
            CombatantKind::Player { .. } => None,
        }
    }

    pub fn is_conscious(&self) -> bool {
        self.current_hp > 0
    }

    /// Apply signed damage (negative heals) and return the new HP.
    ///
    /// HP is clamped to `[0, max_hp]`.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        self.current_hp = (self.current_hp - amount).clamp(0, self.max_hp);
        self.current_hp
    }

    /// Overwrite HP with an already-clamped sibling value.
    pub fn sync_hp(&mut self, hp: i32) {
        self.current_hp = hp.clamp(0, self.max_hp);
    }

    /// Apply signed WP loss (negative restores) and return the new WP, or
    /// None when this combatant has no willpower track.
    pub fn apply_willpower(&mut self, amount: i32) -> Option<i32> {
        let max_wp = self.max_wp?;
        let current = self.current_wp.unwrap_or(max_wp);
        let new_wp = (current - amount).clamp(0, max_wp);
        self.current_wp = Some(new_wp);
        Some(new_wp)
    }

    pub fn sync_wp(&mut self, wp: i32) {
        if let Some(max_wp) = self.max_wp {
            self.current_wp = Some(wp.clamp(0, max_wp));
        }
    }
}

/// Sort combatants into turn order: ascending initiative (1 acts first),
/// ties broken by display name. Undealt combatants sort last.
pub fn sort_turn_order(combatants: &mut [Combatant]) {
    combatants.sort_by(|a, b| turn_order_key(a).cmp(&turn_order_key(b)));
}

fn turn_order_key(c: &Combatant) -> (i32, &str) {
    (c.initiative.unwrap_or(i32::MAX), c.display_name.as_str())
}

/// The combatant that should act next: lowest card among those still
/// standing that have not acted. Client convenience, not authoritative.
pub fn next_actor(combatants: &[Combatant]) -> Option<&Combatant> {
    combatants
        .iter()
        .filter(|c| !c.has_acted && c.is_conscious())
        .min_by(|a, b| turn_order_key(a).cmp(&turn_order_key(b)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combatant(name: &str, initiative: Option<i32>) -> Combatant {
        Combatant::monster_slot(
            EncounterId::new(),
            MonsterTemplateId::new(),
            GroupId::new(),
            name,
            10,
            None,
        )
        .with_initiative(initiative)
    }

    #[test]
    fn damage_clamps_to_zero_and_max() {
        let mut c = combatant("Goblin", None);
        assert_eq!(c.apply_damage(4), 6);
        assert_eq!(c.apply_damage(100), 0);
        // Healing past max clamps to max.
        assert_eq!(c.apply_damage(-100), 10);
    }

    #[test]
    fn willpower_requires_a_track() {
        let mut c = combatant("Goblin", None);
        assert_eq!(c.apply_willpower(3), None);

        c.max_wp = Some(8);
        c.current_wp = Some(8);
        assert_eq!(c.apply_willpower(3), Some(5));
        assert_eq!(c.apply_willpower(20), Some(0));
    }

    #[test]
    fn turn_order_sorts_by_card_then_name() {
        let mut all = vec![
            combatant("Wolf", Some(4)),
            combatant("Aldric", Some(4)),
            combatant("Goblin", Some(1)),
            combatant("Mara", None),
        ];
        sort_turn_order(&mut all);
        let names: Vec<&str> = all.iter().map(|c| c.display_name.as_str()).collect();
        assert_eq!(names, vec!["Goblin", "Aldric", "Wolf", "Mara"]);

        let values: Vec<Option<i32>> = all.iter().map(|c| c.initiative).collect();
        // Non-decreasing among dealt combatants.
        assert!(values[..3].windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn next_actor_skips_acted_and_downed() {
        let mut first = combatant("Goblin", Some(1));
        first.has_acted = true;
        let mut downed = combatant("Wolf", Some(2));
        downed.current_hp = 0;
        let ready = combatant("Aldric", Some(5));

        let all = vec![first, downed, ready];
        assert_eq!(next_actor(&all).map(|c| c.display_name.as_str()), Some("Aldric"));
    }

    #[test]
    fn next_actor_none_when_everyone_acted() {
        let mut c = combatant("Goblin", Some(1));
        c.has_acted = true;
        assert!(next_actor(&[c]).is_none());
    }
}
