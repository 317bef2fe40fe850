//! Combat log repository implementation for SQLite
//!
//! Append-only by construction: the table gains rows and is only ever read
//! back in insertion order.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::application::ports::outbound::CombatLogRepositoryPort;
use crate::domain::events::{LogEvent, LogEventKind};
use crate::domain::value_objects::EncounterId;

pub struct SqliteCombatLogRepository {
    pool: SqlitePool,
}

impl SqliteCombatLogRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS combat_log (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL,
                encounter_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                kind TEXT NOT NULL,
                payload TEXT NOT NULL
            )
        "#,
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_combat_log_encounter ON combat_log (encounter_id)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CombatLogRepositoryPort for SqliteCombatLogRepository {
    async fn append(&self, event: &LogEvent) -> Result<()> {
        let payload = serde_json::to_string(&event.kind)?;
        sqlx::query(
            "INSERT INTO combat_log (id, encounter_id, timestamp, kind, payload)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(event.id.to_string())
        .bind(event.encounter_id.to_string())
        .bind(event.timestamp.to_rfc3339())
        .bind(event.kind.tag())
        .bind(payload)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list(&self, encounter_id: EncounterId) -> Result<Vec<LogEvent>> {
        let rows = sqlx::query("SELECT * FROM combat_log WHERE encounter_id = ? ORDER BY seq")
            .bind(encounter_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_event).collect()
    }
}

fn row_to_event(row: &SqliteRow) -> Result<LogEvent> {
    let id: String = row.try_get("id")?;
    let encounter_id: String = row.try_get("encounter_id")?;
    let timestamp: String = row.try_get("timestamp")?;
    let payload: String = row.try_get("payload")?;

    let kind: LogEventKind =
        serde_json::from_str(&payload).context("invalid combat log payload")?;
    Ok(LogEvent {
        id: id.parse().context("invalid event id")?,
        encounter_id: encounter_id.parse().context("invalid encounter id")?,
        timestamp: DateTime::parse_from_rfc3339(&timestamp)
            .context("invalid event timestamp")?
            .into(),
        kind,
    })
}
