//! Combat log service - the append-only audit trail of an encounter

use std::sync::Arc;

use crate::application::ports::outbound::CombatLogRepositoryPort;
use crate::domain::events::{LogEvent, LogEventKind};
use crate::domain::value_objects::EncounterId;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("combat log storage error: {0}")]
    Repository(#[from] anyhow::Error),
}

/// Thin service over the log repository. Everything that happens in an
/// encounter funnels through `append`; nothing ever edits the log.
pub struct CombatLogService {
    log: Arc<dyn CombatLogRepositoryPort>,
}

impl CombatLogService {
    pub fn new(log: Arc<dyn CombatLogRepositoryPort>) -> Self {
        Self { log }
    }

    /// Timestamp and append one event.
    pub async fn append(
        &self,
        encounter_id: EncounterId,
        kind: LogEventKind,
    ) -> Result<LogEvent, LogError> {
        let event = LogEvent::now(encounter_id, kind);
        self.log.append(&event).await?;
        tracing::debug!(
            encounter_id = %encounter_id,
            kind = event.kind.tag(),
            "Appended combat log event"
        );
        Ok(event)
    }

    /// The encounter's log in insertion order.
    pub async fn list(&self, encounter_id: EncounterId) -> Result<Vec<LogEvent>, LogError> {
        Ok(self.log.list(encounter_id).await?)
    }
}
