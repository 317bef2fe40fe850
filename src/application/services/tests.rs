//! Service-level tests over the in-memory backend

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;

use crate::application::ports::outbound::{
    ChangeNotifierPort, ChangeTopic, CharacterProviderPort, CombatLogRepositoryPort,
    CombatantRepositoryPort, EncounterRepositoryPort, MonsterTemplateProviderPort,
    PartyProviderPort,
};
use crate::application::services::{
    AttackError, AttackService, CombatLogService, EncounterService, InitiativeError,
    InitiativeService, RosterError, RosterService, TurnError, TurnService,
};
use crate::domain::entities::{
    AttackEntry, CharacterSheet, Combatant, Encounter, EncounterStatus, MonsterStats,
    MonsterTemplate, RollMatch,
};
use crate::domain::events::LogEventKind;
use crate::domain::value_objects::{
    CharacterId, CombatantId, EncounterId, GroupId, MonsterTemplateId, PartyId,
};
use crate::infrastructure::persistence::{InMemoryCompendium, InMemoryStore};

struct NullNotifier;

impl ChangeNotifierPort for NullNotifier {
    fn notify(&self, _encounter_id: EncounterId, _topic: ChangeTopic) {}
}

/// Combatant repository decorator that fails `update` for chosen ids, to
/// exercise the partial sibling-sync path.
struct FailingUpdates {
    inner: Arc<InMemoryStore>,
    fail: Mutex<HashSet<CombatantId>>,
}

impl FailingUpdates {
    fn new(inner: Arc<InMemoryStore>) -> Arc<Self> {
        Arc::new(Self {
            inner,
            fail: Mutex::new(HashSet::new()),
        })
    }

    fn fail_updates_for(&self, id: CombatantId) {
        self.fail.lock().expect("lock").insert(id);
    }
}

#[async_trait]
impl CombatantRepositoryPort for FailingUpdates {
    async fn create(&self, combatant: &Combatant) -> Result<()> {
        CombatantRepositoryPort::create(&*self.inner, combatant).await
    }

    async fn create_many(&self, combatants: &[Combatant]) -> Result<()> {
        self.inner.create_many(combatants).await
    }

    async fn get(&self, id: CombatantId) -> Result<Option<Combatant>> {
        CombatantRepositoryPort::get(&*self.inner, id).await
    }

    async fn list(&self, encounter_id: EncounterId) -> Result<Vec<Combatant>> {
        CombatantRepositoryPort::list(&*self.inner, encounter_id).await
    }

    async fn update(&self, combatant: &Combatant) -> Result<()> {
        if self.fail.lock().expect("lock").contains(&combatant.id) {
            bail!("simulated write failure for {}", combatant.id);
        }
        CombatantRepositoryPort::update(&*self.inner, combatant).await
    }

    async fn delete(&self, id: CombatantId) -> Result<()> {
        self.inner.delete(id).await
    }

    async fn delete_group(&self, encounter_id: EncounterId, group_id: GroupId) -> Result<u64> {
        self.inner.delete_group(encounter_id, group_id).await
    }

    async fn set_initiatives(&self, values: &[(CombatantId, i32)]) -> Result<()> {
        self.inner.set_initiatives(values).await
    }

    async fn swap_initiative(&self, a: CombatantId, b: CombatantId) -> Result<()> {
        self.inner.swap_initiative(a, b).await
    }
}

struct World {
    compendium: Arc<InMemoryCompendium>,
    encounters: Arc<EncounterService>,
    roster: Arc<RosterService>,
    initiative: Arc<InitiativeService>,
    turns: Arc<TurnService>,
    attacks: Arc<AttackService>,
    log: Arc<CombatLogService>,
    party_id: PartyId,
}

fn world() -> World {
    let store = InMemoryStore::new();
    world_with(store.clone(), store)
}

fn world_with(store: Arc<InMemoryStore>, combatants: Arc<dyn CombatantRepositoryPort>) -> World {
    let compendium = InMemoryCompendium::new();
    let encounters_repo: Arc<dyn EncounterRepositoryPort> = store.clone();
    let log_repo: Arc<dyn CombatLogRepositoryPort> = store;
    let characters: Arc<dyn CharacterProviderPort> = compendium.clone();
    let templates: Arc<dyn MonsterTemplateProviderPort> = compendium.clone();
    let parties: Arc<dyn PartyProviderPort> = compendium.clone();
    let notifier: Arc<dyn ChangeNotifierPort> = Arc::new(NullNotifier);

    let log = Arc::new(CombatLogService::new(log_repo));
    World {
        compendium,
        encounters: Arc::new(EncounterService::new(
            encounters_repo.clone(),
            notifier.clone(),
        )),
        roster: Arc::new(RosterService::new(
            encounters_repo.clone(),
            combatants.clone(),
            characters,
            templates.clone(),
            parties,
            notifier.clone(),
        )),
        initiative: Arc::new(InitiativeService::new(
            encounters_repo.clone(),
            combatants.clone(),
            notifier.clone(),
        )),
        turns: Arc::new(TurnService::new(
            encounters_repo.clone(),
            combatants.clone(),
            log.clone(),
            notifier.clone(),
        )),
        attacks: Arc::new(AttackService::new(
            encounters_repo,
            combatants,
            templates,
            log.clone(),
            notifier,
        )),
        log,
        party_id: PartyId::new(),
    }
}

impl World {
    async fn encounter(&self) -> Encounter {
        self.encounters
            .create(self.party_id, "Bridge Ambush", None)
            .await
            .expect("create encounter")
    }

    async fn seed_character(&self, name: &str, max_hp: i32) -> CharacterId {
        let sheet = CharacterSheet {
            id: CharacterId::new(),
            name: name.to_string(),
            max_hp,
            max_wp: Some(10),
            owner: "player-1".to_string(),
        };
        let id = sheet.id;
        self.compendium.insert_character(sheet).await;
        self.compendium.set_party(self.party_id, vec![id]).await;
        id
    }

    async fn seed_goblin(&self, ferocity: i32, hp: i32) -> MonsterTemplateId {
        let template = MonsterTemplate {
            id: MonsterTemplateId::new(),
            name: "Goblin".to_string(),
            stats: MonsterStats {
                ferocity,
                hp,
                wp: None,
                armor: 0,
                movement: 8,
            },
            attack_table: vec![
                AttackEntry {
                    roll_match: RollMatch::Range(1, 5),
                    name: "Stab".to_string(),
                    description: "A rusty blade for 1d6 damage.".to_string(),
                    effect_table: None,
                },
                AttackEntry {
                    roll_match: RollMatch::Face(6),
                    name: "Shriek".to_string(),
                    description: "Calls for help.".to_string(),
                    effect_table: None,
                },
            ],
        };
        let id = template.id;
        self.compendium.insert_template(template).await;
        id
    }
}

fn round_advances(events: &[crate::domain::events::LogEvent]) -> Vec<u32> {
    events
        .iter()
        .filter_map(|e| match e.kind {
            LogEventKind::RoundAdvanced { round } => Some(round),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn character_seats_once() {
    let w = world();
    let encounter = w.encounter().await;
    let aldric = w.seed_character("Aldric", 12).await;

    let seated = w
        .roster
        .add_character(encounter.id, aldric, None)
        .await
        .expect("seat character");
    assert_eq!(seated.display_name, "Aldric");
    assert_eq!(seated.current_hp, 12);

    let err = w
        .roster
        .add_character(encounter.id, aldric, None)
        .await
        .expect_err("second seat rejected");
    assert!(matches!(err, RosterError::AlreadySeated(id) if id == aldric));

    let err = w
        .roster
        .add_character(encounter.id, CharacterId::new(), None)
        .await
        .expect_err("unknown character rejected");
    assert!(matches!(err, RosterError::CharacterNotFound(_)));
}

#[tokio::test]
async fn non_party_member_is_rejected() {
    let w = world();
    let encounter = w.encounter().await;
    let stranger = CharacterId::new();
    let sheet = CharacterSheet {
        id: stranger,
        name: "Stranger".to_string(),
        max_hp: 9,
        max_wp: None,
        owner: "player-9".to_string(),
    };
    w.compendium.insert_character(sheet).await;

    let err = w
        .roster
        .add_character(encounter.id, stranger, None)
        .await
        .expect_err("not in party");
    assert!(matches!(err, RosterError::NotInParty(id) if id == stranger));
}

#[tokio::test]
async fn monster_group_shares_one_group_id() {
    let w = world();
    let encounter = w.encounter().await;
    let goblin = w.seed_goblin(3, 6).await;

    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");
    assert_eq!(group.len(), 3);
    let names: Vec<&str> = group.iter().map(|c| c.display_name.as_str()).collect();
    assert_eq!(names, vec!["Goblin (Act 1)", "Goblin (Act 2)", "Goblin (Act 3)"]);

    let group_id = group[0].group_id().expect("monster slot has a group");
    assert!(group.iter().all(|c| c.group_id() == Some(group_id)));

    // A second seating gets its own group.
    let second = w
        .roster
        .add_monster(encounter.id, goblin, Some("Elite Goblin".to_string()), None, None)
        .await
        .expect("seat second group");
    assert_ne!(second[0].group_id(), Some(group_id));
    assert_eq!(second[0].display_name, "Elite Goblin (Act 1)");
}

#[tokio::test]
async fn count_multiplies_ferocity_slots() {
    let w = world();
    let encounter = w.encounter().await;
    let goblin = w.seed_goblin(2, 6).await;

    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, Some(3), None)
        .await
        .expect("seat monsters");
    assert_eq!(group.len(), 6);
}

#[tokio::test]
async fn damage_mirrors_onto_group_siblings() {
    let w = world();
    let encounter = w.encounter().await;
    let goblin = w.seed_goblin(3, 10).await;
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");

    let outcome = w
        .attacks
        .apply_damage(group[1].id, 5, Some("Aldric".to_string()))
        .await
        .expect("apply damage");
    assert_eq!(outcome.new_value, 5);
    assert_eq!(outcome.synced_siblings, 2);
    assert!(!outcome.is_partial());

    let roster = w.roster.list(encounter.id).await.expect("list");
    assert!(roster.iter().all(|c| c.current_hp == 5));
}

#[tokio::test]
async fn failed_sibling_write_reports_partial_sync() {
    let store = InMemoryStore::new();
    let failing = FailingUpdates::new(store.clone());
    let w = world_with(store, failing.clone());

    let encounter = w.encounter().await;
    let goblin = w.seed_goblin(3, 10).await;
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");

    failing.fail_updates_for(group[2].id);

    let outcome = w
        .attacks
        .apply_damage(group[0].id, 4, None)
        .await
        .expect("damage still succeeds");
    assert!(outcome.is_partial());
    assert_eq!(outcome.synced_siblings, 1);
    assert_eq!(outcome.failed_siblings, vec![group[2].id]);

    // The divergence is announced in the log, never rolled back.
    let roster = w.roster.list(encounter.id).await.expect("list");
    let divergent = roster.iter().find(|c| c.id == group[2].id).expect("slot");
    assert_eq!(divergent.current_hp, 10);

    let events = w.log.list(encounter.id).await.expect("log");
    assert!(events
        .iter()
        .any(|e| matches!(&e.kind, LogEventKind::Generic { message } if message.contains("manual correction"))));
}

#[tokio::test]
async fn round_advance_resets_flags_and_logs_once() {
    let w = world();
    let encounter = w.encounter().await;
    let aldric = w.seed_character("Aldric", 12).await;
    let goblin = w.seed_goblin(2, 6).await;
    w.roster
        .add_character(encounter.id, aldric, None)
        .await
        .expect("seat character");
    w.roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");

    let started = w.turns.start(encounter.id).await.expect("start");
    assert_eq!(started.status, EncounterStatus::Active);
    assert_eq!(started.current_round, 1);

    let roster = w.roster.list(encounter.id).await.expect("list");
    assert!(roster.iter().all(|c| c.initiative.is_some()));

    let someone = roster[0].id;
    let flipped = w.turns.flip(someone).await.expect("flip");
    assert!(flipped.has_acted);

    let advanced = w.turns.advance_round(encounter.id).await.expect("advance");
    assert_eq!(advanced.current_round, 2);

    let roster = w.roster.list(encounter.id).await.expect("list");
    assert!(roster.iter().all(|c| !c.has_acted));
    assert!(roster.iter().all(|c| c.initiative.is_some()));

    // Starting is implicit; only the explicit advance is logged.
    let events = w.log.list(encounter.id).await.expect("log");
    assert_eq!(round_advances(&events), vec![2]);
}

#[tokio::test]
async fn start_requires_planning() {
    let w = world();
    let encounter = w.encounter().await;
    w.turns.start(encounter.id).await.expect("start");

    let err = w.turns.start(encounter.id).await.expect_err("second start");
    assert!(matches!(
        err,
        TurnError::InvalidState {
            expected: EncounterStatus::Planning,
            actual: EncounterStatus::Active,
        }
    ));

    let err = w
        .turns
        .advance_round(EncounterId::new())
        .await
        .expect_err("unknown encounter");
    assert!(matches!(err, TurnError::EncounterNotFound(_)));
}

#[tokio::test]
async fn completed_encounter_is_frozen() {
    let w = world();
    let encounter = w.encounter().await;
    let aldric = w.seed_character("Aldric", 12).await;
    let seated = w
        .roster
        .add_character(encounter.id, aldric, None)
        .await
        .expect("seat character");

    w.turns.start(encounter.id).await.expect("start");
    let ended = w.turns.end(encounter.id).await.expect("end");
    assert_eq!(ended.status, EncounterStatus::Completed);

    let err = w
        .attacks
        .apply_damage(seated.id, 3, None)
        .await
        .expect_err("frozen");
    assert!(matches!(err, AttackError::EncounterCompleted(_)));

    let goblin = w.seed_goblin(1, 6).await;
    let err = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect_err("roster frozen");
    assert!(matches!(err, RosterError::EncounterCompleted(_)));
}

#[tokio::test]
async fn group_removal_clears_every_slot() {
    let w = world();
    let encounter = w.encounter().await;
    let goblin = w.seed_goblin(3, 6).await;
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");

    let removed = w
        .roster
        .remove_group(group[1].id)
        .await
        .expect("remove group");
    assert_eq!(removed, 3);
    assert!(w.roster.list(encounter.id).await.expect("list").is_empty());
}

#[tokio::test]
async fn roster_lists_in_turn_order() {
    let w = world();
    let encounter = w.encounter().await;
    let aldric = w.seed_character("Aldric", 12).await;
    let goblin = w.seed_goblin(3, 6).await;

    w.roster
        .add_character(encounter.id, aldric, None)
        .await
        .expect("seat character");
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");
    let (a, b, c) = (group[0].id, group[1].id, group[2].id);

    // Pin every card so the order is deterministic.
    w.initiative
        .roll_initiative(encounter.id, &[a, b, c], &[(a, 9), (b, 2), (c, 5)])
        .await
        .expect("deal");

    let roster = w.roster.list(encounter.id).await.expect("list");
    let names: Vec<&str> = roster.iter().map(|c| c.display_name.as_str()).collect();
    // Lowest card acts first; the undealt character sorts last.
    assert_eq!(
        names,
        vec!["Goblin (Act 2)", "Goblin (Act 3)", "Goblin (Act 1)", "Aldric"]
    );
}

#[tokio::test]
async fn swap_exchanges_initiative_cards() {
    let w = world();
    let encounter = w.encounter().await;
    let goblin = w.seed_goblin(2, 6).await;
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");
    let (a, b) = (group[0].id, group[1].id);

    let dealt = w
        .initiative
        .roll_initiative(encounter.id, &[a, b], &[(a, 7)])
        .await
        .expect("deal");
    assert_eq!(dealt[0].initiative, Some(7));
    let card_b = dealt[1].initiative.expect("dealt");

    w.initiative.swap_initiative(a, b).await.expect("swap");
    let roster = w.roster.list(encounter.id).await.expect("list");
    let find = |id| {
        roster
            .iter()
            .find(|c| c.id == id)
            .and_then(|c| c.initiative)
    };
    assert_eq!(find(a), Some(card_b));
    assert_eq!(find(b), Some(7));

    let err = w
        .initiative
        .swap_initiative(a, a)
        .await
        .expect_err("self swap");
    assert!(matches!(err, InitiativeError::Validation(_)));
}

#[tokio::test]
async fn pinned_card_must_belong_to_the_deal() {
    let w = world();
    let encounter = w.encounter().await;
    let goblin = w.seed_goblin(1, 6).await;
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");

    let err = w
        .initiative
        .roll_initiative(encounter.id, &[group[0].id], &[(CombatantId::new(), 4)])
        .await
        .expect_err("stray pin");
    assert!(matches!(err, InitiativeError::Validation(_)));

    let err = w
        .initiative
        .roll_initiative(encounter.id, &[group[0].id], &[(group[0].id, 11)])
        .await
        .expect_err("card out of range");
    assert!(matches!(err, InitiativeError::Validation(_)));
}

#[tokio::test]
async fn duplicate_yields_a_fresh_planning_copy() {
    let w = world();
    let encounter = w.encounter().await;
    let aldric = w.seed_character("Aldric", 12).await;
    let goblin = w.seed_goblin(2, 6).await;
    let seated = w
        .roster
        .add_character(encounter.id, aldric, None)
        .await
        .expect("seat character");
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");

    w.turns.start(encounter.id).await.expect("start");
    w.turns.flip(seated.id).await.expect("flip");
    w.attacks
        .apply_damage(group[0].id, 4, None)
        .await
        .expect("damage");

    let copy = w.turns.duplicate(encounter.id).await.expect("duplicate");
    assert_eq!(copy.status, EncounterStatus::Planning);
    assert_eq!(copy.current_round, 0);
    assert_ne!(copy.id, encounter.id);

    let copied = w.roster.list(copy.id).await.expect("list copy");
    assert_eq!(copied.len(), 3);
    assert!(copied.iter().all(|c| c.current_hp == c.max_hp));
    assert!(copied.iter().all(|c| c.initiative.is_none() && !c.has_acted));

    let original_group = group[0].group_id();
    assert!(copied
        .iter()
        .filter_map(|c| c.group_id())
        .all(|g| Some(g) != original_group));

    // The source is untouched.
    let roster = w.roster.list(encounter.id).await.expect("list source");
    assert!(roster.iter().any(|c| c.current_hp < c.max_hp));
}

#[tokio::test]
async fn attack_roll_resolves_the_table_and_logs() {
    let w = world();
    let encounter = w.encounter().await;
    let goblin = w.seed_goblin(1, 6).await;
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");

    let mut rng = {
        use rand::SeedableRng;
        rand::rngs::StdRng::seed_from_u64(11)
    };
    let outcome = w
        .attacks
        .roll_attack_with(group[0].id, &mut rng)
        .await
        .expect("roll");
    assert!((1..=6).contains(&outcome.roll));
    let resolved = outcome.attack.expect("table covers every face");
    if resolved.entry.name == "Stab" {
        assert_eq!(resolved.dice.len(), 1);
        assert_eq!(resolved.dice[0].sides, 6);
    }

    let events = w.log.list(encounter.id).await.expect("log");
    assert!(events
        .iter()
        .any(|e| matches!(&e.kind, LogEventKind::MonsterAttack { roll, .. } if *roll == outcome.roll)));
}

#[tokio::test]
async fn attack_roll_runs_on_a_spawned_task() {
    let w = world();
    let encounter = w.encounter().await;
    let goblin = w.seed_goblin(1, 6).await;
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");

    // Spawning requires the roll future to be Send, like the HTTP
    // handlers that drive it.
    let attacks = w.attacks.clone();
    let target = group[0].id;
    let outcome = tokio::spawn(async move { attacks.roll_attack(target).await })
        .await
        .expect("task joins")
        .expect("roll succeeds");
    assert!((1..=6).contains(&outcome.roll));
}

#[tokio::test]
async fn players_have_no_attack_table() {
    let w = world();
    let encounter = w.encounter().await;
    let aldric = w.seed_character("Aldric", 12).await;
    let seated = w
        .roster
        .add_character(encounter.id, aldric, None)
        .await
        .expect("seat character");

    let err = w
        .attacks
        .roll_attack(seated.id)
        .await
        .expect_err("no table");
    assert!(matches!(err, AttackError::Validation(_)));
}

#[tokio::test]
async fn willpower_needs_a_track() {
    let w = world();
    let encounter = w.encounter().await;
    let goblin = w.seed_goblin(1, 6).await;
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");

    let err = w
        .attacks
        .apply_willpower(group[0].id, 2)
        .await
        .expect_err("no wp track");
    assert!(matches!(err, AttackError::Validation(_)));

    let aldric = w.seed_character("Aldric", 12).await;
    let seated = w
        .roster
        .add_character(encounter.id, aldric, None)
        .await
        .expect("seat character");
    let outcome = w
        .attacks
        .apply_willpower(seated.id, 3)
        .await
        .expect("wp loss");
    assert_eq!(outcome.new_value, 7);
}

#[tokio::test]
async fn set_hp_logs_the_implied_delta() {
    let w = world();
    let encounter = w.encounter().await;
    let aldric = w.seed_character("Aldric", 12).await;
    let seated = w
        .roster
        .add_character(encounter.id, aldric, None)
        .await
        .expect("seat character");

    let outcome = w.attacks.set_hp(seated.id, 9).await.expect("set hp");
    assert_eq!(outcome.new_value, 9);

    let events = w.log.list(encounter.id).await.expect("log");
    assert!(events.iter().any(|e| matches!(
        &e.kind,
        LogEventKind::HpChange { delta: 3, new_value: 9, .. }
    )));
}

/// The whole table session in one pass: seat a character and a ferocity-2
/// monster, start, advance a round, resolve damage, read the log back.
#[tokio::test]
async fn full_session_flow() {
    let w = world();
    let encounter = w.encounter().await;
    let aldric = w.seed_character("Aldric", 12).await;
    let goblin = w.seed_goblin(2, 6).await;

    w.roster
        .add_character(encounter.id, aldric, None)
        .await
        .expect("seat character");
    let group = w
        .roster
        .add_monster(encounter.id, goblin, None, None, None)
        .await
        .expect("seat monster");
    assert_eq!(group.len(), 2);

    w.turns.start(encounter.id).await.expect("start");
    let roster = w.roster.list(encounter.id).await.expect("list");
    assert_eq!(roster.len(), 3);
    assert!(roster.iter().all(|c| c.initiative.is_some()));

    w.turns.advance_round(encounter.id).await.expect("advance");

    let act_one = roster
        .iter()
        .find(|c| c.display_name == "Goblin (Act 1)")
        .expect("slot exists");
    let outcome = w
        .attacks
        .apply_damage(act_one.id, 4, Some("Aldric".to_string()))
        .await
        .expect("damage");
    assert_eq!(outcome.new_value, 2);

    let roster = w.roster.list(encounter.id).await.expect("list");
    for slot in roster.iter().filter(|c| c.group_id().is_some()) {
        assert_eq!(slot.current_hp, 2);
    }

    let events = w.log.list(encounter.id).await.expect("log");
    let tags: Vec<&str> = events.iter().map(|e| e.kind.tag()).collect();
    assert_eq!(tags, vec!["round_advanced", "attack_resolve"]);
    assert!(matches!(
        &events[1].kind,
        LogEventKind::AttackResolve { attacker, target, amount: 4 }
            if attacker == "Aldric" && target == "Goblin (Act 1)"
    ));
}
