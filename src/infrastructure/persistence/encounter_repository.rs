//! Encounter repository implementation for SQLite

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::application::ports::outbound::EncounterRepositoryPort;
use crate::domain::entities::{Combatant, Encounter, EncounterStatus};
use crate::domain::value_objects::{CombatantId, EncounterId, PartyId};
use crate::infrastructure::persistence::combatant_repository::{
    bind_combatant_insert, COMBATANT_INSERT,
};

pub struct SqliteEncounterRepository {
    pool: SqlitePool,
}

impl SqliteEncounterRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS encounters (
                id TEXT PRIMARY KEY,
                party_id TEXT NOT NULL,
                name TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL,
                current_round INTEGER NOT NULL DEFAULT 0,
                active_combatant_id TEXT,
                created_at TEXT NOT NULL
            )
        "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl EncounterRepositoryPort for SqliteEncounterRepository {
    async fn create(&self, encounter: &Encounter) -> Result<()> {
        sqlx::query(
            "INSERT INTO encounters (id, party_id, name, description, status, current_round, active_combatant_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(encounter.id.to_string())
        .bind(encounter.party_id.to_string())
        .bind(&encounter.name)
        .bind(&encounter.description)
        .bind(encounter.status.as_str())
        .bind(encounter.current_round as i64)
        .bind(encounter.active_combatant_id.map(|id| id.to_string()))
        .bind(encounter.created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        tracing::debug!(encounter_id = %encounter.id, "Created encounter row");
        Ok(())
    }

    async fn get(&self, id: EncounterId) -> Result<Option<Encounter>> {
        let row = sqlx::query("SELECT * FROM encounters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_encounter(&r)).transpose()
    }

    async fn list_by_party(&self, party_id: PartyId) -> Result<Vec<Encounter>> {
        let rows = sqlx::query("SELECT * FROM encounters WHERE party_id = ? ORDER BY created_at")
            .bind(party_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(row_to_encounter).collect()
    }

    async fn update(&self, encounter: &Encounter) -> Result<()> {
        let result = sqlx::query(
            "UPDATE encounters
             SET name = ?, description = ?, status = ?, current_round = ?, active_combatant_id = ?
             WHERE id = ?",
        )
        .bind(&encounter.name)
        .bind(&encounter.description)
        .bind(encounter.status.as_str())
        .bind(encounter.current_round as i64)
        .bind(encounter.active_combatant_id.map(|id| id.to_string()))
        .bind(encounter.id.to_string())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            anyhow::bail!("encounter not found: {}", encounter.id);
        }
        Ok(())
    }

    async fn create_with_combatants(
        &self,
        encounter: &Encounter,
        combatants: &[Combatant],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO encounters (id, party_id, name, description, status, current_round, active_combatant_id, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(encounter.id.to_string())
        .bind(encounter.party_id.to_string())
        .bind(&encounter.name)
        .bind(&encounter.description)
        .bind(encounter.status.as_str())
        .bind(encounter.current_round as i64)
        .bind(encounter.active_combatant_id.map(|id| id.to_string()))
        .bind(encounter.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        for combatant in combatants {
            bind_combatant_insert(sqlx::query(COMBATANT_INSERT), combatant)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn advance_round(
        &self,
        encounter: &Encounter,
        initiatives: &[(CombatantId, i32)],
    ) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "UPDATE encounters SET status = ?, current_round = ?, active_combatant_id = NULL WHERE id = ?",
        )
        .bind(encounter.status.as_str())
        .bind(encounter.current_round as i64)
        .bind(encounter.id.to_string())
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE combatants SET has_acted = 0 WHERE encounter_id = ?")
            .bind(encounter.id.to_string())
            .execute(&mut *tx)
            .await?;

        for (id, card) in initiatives {
            sqlx::query("UPDATE combatants SET initiative = ? WHERE id = ?")
                .bind(*card as i64)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

fn row_to_encounter(row: &SqliteRow) -> Result<Encounter> {
    let id: String = row.try_get("id")?;
    let party_id: String = row.try_get("party_id")?;
    let status: String = row.try_get("status")?;
    let active: Option<String> = row.try_get("active_combatant_id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Encounter {
        id: id.parse().context("invalid encounter id")?,
        party_id: party_id.parse().context("invalid party id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        status: EncounterStatus::parse(&status)
            .with_context(|| format!("unknown encounter status '{}'", status))?,
        current_round: row.try_get::<i64, _>("current_round")? as u32,
        active_combatant_id: active
            .map(|s| s.parse().context("invalid active combatant id"))
            .transpose()?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .context("invalid created_at timestamp")?
            .into(),
    })
}
