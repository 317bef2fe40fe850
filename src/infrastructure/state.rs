//! Application state - wires repositories, services and the broadcaster

use std::sync::Arc;

use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;

use crate::application::ports::outbound::{
    ChangeNotifierPort, CharacterProviderPort, CombatLogRepositoryPort, CombatantRepositoryPort,
    EncounterRepositoryPort, MonsterTemplateProviderPort, PartyProviderPort,
};
use crate::application::services::{
    AttackService, CombatLogService, EncounterService, InitiativeService, RosterService,
    TurnService,
};
use crate::infrastructure::config::{AppConfig, StorageBackend};
use crate::infrastructure::persistence::{
    InMemoryCompendium, InMemoryStore, SqliteCombatLogRepository, SqliteCombatantRepository,
    SqliteCompendium, SqliteEncounterRepository,
};
use crate::infrastructure::sync::SyncBroadcaster;

pub struct AppState {
    pub config: AppConfig,
    pub broadcaster: Arc<SyncBroadcaster>,
    pub encounter_service: Arc<EncounterService>,
    pub roster_service: Arc<RosterService>,
    pub initiative_service: Arc<InitiativeService>,
    pub turn_service: Arc<TurnService>,
    pub attack_service: Arc<AttackService>,
    pub log_service: Arc<CombatLogService>,
    /// Used by the roster routes to resolve template names best-effort.
    pub templates: Arc<dyn MonsterTemplateProviderPort>,
}

impl AppState {
    pub async fn new(config: AppConfig) -> Result<Self> {
        let (encounters, combatants, log, characters, templates, parties) =
            match config.storage {
                StorageBackend::Sqlite => {
                    let pool = SqlitePoolOptions::new()
                        .max_connections(5)
                        .connect(&config.database_url)
                        .await?;
                    tracing::info!("Connected to SQLite at {}", config.database_url);

                    let encounters: Arc<dyn EncounterRepositoryPort> =
                        Arc::new(SqliteEncounterRepository::new(pool.clone()).await?);
                    let combatants: Arc<dyn CombatantRepositoryPort> =
                        Arc::new(SqliteCombatantRepository::new(pool.clone()).await?);
                    let log: Arc<dyn CombatLogRepositoryPort> =
                        Arc::new(SqliteCombatLogRepository::new(pool.clone()).await?);
                    let compendium = Arc::new(SqliteCompendium::new(pool).await?);
                    let characters: Arc<dyn CharacterProviderPort> = compendium.clone();
                    let templates: Arc<dyn MonsterTemplateProviderPort> = compendium.clone();
                    let parties: Arc<dyn PartyProviderPort> = compendium;
                    (encounters, combatants, log, characters, templates, parties)
                }
                StorageBackend::Memory => {
                    tracing::info!("Using in-memory storage (state is lost on restart)");
                    let store = InMemoryStore::new();
                    let compendium = InMemoryCompendium::new();
                    let encounters: Arc<dyn EncounterRepositoryPort> = store.clone();
                    let combatants: Arc<dyn CombatantRepositoryPort> = store.clone();
                    let log: Arc<dyn CombatLogRepositoryPort> = store;
                    let characters: Arc<dyn CharacterProviderPort> = compendium.clone();
                    let templates: Arc<dyn MonsterTemplateProviderPort> = compendium.clone();
                    let parties: Arc<dyn PartyProviderPort> = compendium;
                    (encounters, combatants, log, characters, templates, parties)
                }
            };

        let broadcaster = Arc::new(SyncBroadcaster::new());
        let notifier: Arc<dyn ChangeNotifierPort> = broadcaster.clone();

        let log_service = Arc::new(CombatLogService::new(log));
        let encounter_service = Arc::new(EncounterService::new(
            encounters.clone(),
            notifier.clone(),
        ));
        let roster_service = Arc::new(RosterService::new(
            encounters.clone(),
            combatants.clone(),
            characters,
            templates.clone(),
            parties,
            notifier.clone(),
        ));
        let initiative_service = Arc::new(InitiativeService::new(
            encounters.clone(),
            combatants.clone(),
            notifier.clone(),
        ));
        let turn_service = Arc::new(TurnService::new(
            encounters.clone(),
            combatants.clone(),
            log_service.clone(),
            notifier.clone(),
        ));
        let attack_service = Arc::new(AttackService::new(
            encounters,
            combatants,
            templates.clone(),
            log_service.clone(),
            notifier,
        ));

        Ok(Self {
            config,
            broadcaster,
            encounter_service,
            roster_service,
            initiative_service,
            turn_service,
            attack_service,
            log_service,
            templates,
        })
    }
}
