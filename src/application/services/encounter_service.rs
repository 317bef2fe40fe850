//! Encounter service - creating and describing encounters
//!
//! Lifecycle transitions live in the turn service; this one covers the
//! plain CRUD surface the host uses while planning.

use std::sync::Arc;

use crate::application::ports::outbound::{
    ChangeNotifierPort, ChangeTopic, EncounterRepositoryPort,
};
use crate::domain::entities::Encounter;
use crate::domain::value_objects::{EncounterId, PartyId};

#[derive(Debug, thiserror::Error)]
pub enum EncounterError {
    #[error("encounter not found: {0}")]
    NotFound(EncounterId),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

pub struct EncounterService {
    encounters: Arc<dyn EncounterRepositoryPort>,
    notifier: Arc<dyn ChangeNotifierPort>,
}

impl EncounterService {
    pub fn new(
        encounters: Arc<dyn EncounterRepositoryPort>,
        notifier: Arc<dyn ChangeNotifierPort>,
    ) -> Self {
        Self {
            encounters,
            notifier,
        }
    }

    pub async fn create(
        &self,
        party_id: PartyId,
        name: &str,
        description: Option<String>,
    ) -> Result<Encounter, EncounterError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EncounterError::Validation(
                "encounter name must not be empty".to_string(),
            ));
        }

        let encounter = Encounter::new(party_id, name)
            .with_description(description.unwrap_or_default());
        self.encounters.create(&encounter).await?;
        tracing::info!(encounter_id = %encounter.id, "Created encounter: {}", encounter.name);
        Ok(encounter)
    }

    pub async fn get(&self, id: EncounterId) -> Result<Encounter, EncounterError> {
        self.encounters
            .get(id)
            .await?
            .ok_or(EncounterError::NotFound(id))
    }

    pub async fn list_by_party(&self, party_id: PartyId) -> Result<Vec<Encounter>, EncounterError> {
        Ok(self.encounters.list_by_party(party_id).await?)
    }

    /// Rename or re-describe an encounter. Allowed in any state; cosmetic
    /// fields only.
    pub async fn update_details(
        &self,
        id: EncounterId,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Encounter, EncounterError> {
        let mut encounter = self.get(id).await?;
        if let Some(name) = name {
            let name = name.trim().to_string();
            if name.is_empty() {
                return Err(EncounterError::Validation(
                    "encounter name must not be empty".to_string(),
                ));
            }
            encounter.name = name;
        }
        if let Some(description) = description {
            encounter.description = description;
        }
        self.encounters.update(&encounter).await?;
        self.notifier.notify(id, ChangeTopic::Encounter);
        Ok(encounter)
    }
}
