//! Combatant repository implementation for SQLite
//!
//! Every method is a single statement or a single transaction; sibling
//! writes arrive here as individual `update` calls from the attack service.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{Row, SqlitePool};

use crate::application::ports::outbound::CombatantRepositoryPort;
use crate::domain::entities::{Combatant, CombatantKind};
use crate::domain::value_objects::{CombatantId, EncounterId, GroupId};

pub(crate) const COMBATANT_INSERT: &str =
    "INSERT INTO combatants (id, encounter_id, kind, character_ref, owner, template_ref, group_id,
                             display_name, max_hp, current_hp, max_wp, current_wp, initiative, has_acted, seated_at)
     VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)";

/// Bind a combatant's columns onto the shared insert statement.
pub(crate) fn bind_combatant_insert<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    c: &'q Combatant,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    let (kind, character_ref, owner, template_ref, group_id) = match &c.kind {
        CombatantKind::Player {
            character_ref,
            owner,
        } => (
            "player",
            Some(character_ref.to_string()),
            Some(owner.clone()),
            None,
            None,
        ),
        CombatantKind::Monster {
            template_ref,
            group_id,
        } => (
            "monster",
            None,
            None,
            Some(template_ref.to_string()),
            Some(group_id.to_string()),
        ),
    };
    query
        .bind(c.id.to_string())
        .bind(c.encounter_id.to_string())
        .bind(kind)
        .bind(character_ref)
        .bind(owner)
        .bind(template_ref)
        .bind(group_id)
        .bind(&c.display_name)
        .bind(c.max_hp as i64)
        .bind(c.current_hp as i64)
        .bind(c.max_wp.map(|v| v as i64))
        .bind(c.current_wp.map(|v| v as i64))
        .bind(c.initiative.map(|v| v as i64))
        .bind(c.has_acted as i64)
}

pub struct SqliteCombatantRepository {
    pool: SqlitePool,
}

impl SqliteCombatantRepository {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS combatants (
                id TEXT PRIMARY KEY,
                encounter_id TEXT NOT NULL,
                kind TEXT NOT NULL,
                character_ref TEXT,
                owner TEXT,
                template_ref TEXT,
                group_id TEXT,
                display_name TEXT NOT NULL,
                max_hp INTEGER NOT NULL,
                current_hp INTEGER NOT NULL,
                max_wp INTEGER,
                current_wp INTEGER,
                initiative INTEGER,
                has_acted INTEGER NOT NULL DEFAULT 0,
                seated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )
        "#,
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_combatants_encounter ON combatants (encounter_id)",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CombatantRepositoryPort for SqliteCombatantRepository {
    async fn create(&self, combatant: &Combatant) -> Result<()> {
        bind_combatant_insert(sqlx::query(COMBATANT_INSERT), combatant)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn create_many(&self, combatants: &[Combatant]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for combatant in combatants {
            bind_combatant_insert(sqlx::query(COMBATANT_INSERT), combatant)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn get(&self, id: CombatantId) -> Result<Option<Combatant>> {
        let row = sqlx::query("SELECT * FROM combatants WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_combatant(&r)).transpose()
    }

    async fn list(&self, encounter_id: EncounterId) -> Result<Vec<Combatant>> {
        let rows = sqlx::query(
            "SELECT * FROM combatants WHERE encounter_id = ? ORDER BY rowid",
        )
        .bind(encounter_id.to_string())
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_combatant).collect()
    }

    async fn update(&self, combatant: &Combatant) -> Result<()> {
        let result = sqlx::query(
            "UPDATE combatants
             SET display_name = ?, max_hp = ?, current_hp = ?, max_wp = ?, current_wp = ?,
                 initiative = ?, has_acted = ?
             WHERE id = ?",
        )
        .bind(&combatant.display_name)
        .bind(combatant.max_hp as i64)
        .bind(combatant.current_hp as i64)
        .bind(combatant.max_wp.map(|v| v as i64))
        .bind(combatant.current_wp.map(|v| v as i64))
        .bind(combatant.initiative.map(|v| v as i64))
        .bind(combatant.has_acted as i64)
        .bind(combatant.id.to_string())
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            anyhow::bail!("combatant not found: {}", combatant.id);
        }
        Ok(())
    }

    async fn delete(&self, id: CombatantId) -> Result<()> {
        sqlx::query("DELETE FROM combatants WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_group(&self, encounter_id: EncounterId, group_id: GroupId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM combatants WHERE encounter_id = ? AND group_id = ?")
            .bind(encounter_id.to_string())
            .bind(group_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn set_initiatives(&self, values: &[(CombatantId, i32)]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        for (id, card) in values {
            let result = sqlx::query("UPDATE combatants SET initiative = ? WHERE id = ?")
                .bind(*card as i64)
                .bind(id.to_string())
                .execute(&mut *tx)
                .await?;
            if result.rows_affected() == 0 {
                anyhow::bail!("combatant not found: {}", id);
            }
        }
        tx.commit().await?;
        Ok(())
    }

    async fn swap_initiative(&self, a: CombatantId, b: CombatantId) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let first: Option<i64> = sqlx::query_scalar("SELECT initiative FROM combatants WHERE id = ?")
            .bind(a.to_string())
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("combatant not found: {}", a))?;
        let second: Option<i64> = sqlx::query_scalar("SELECT initiative FROM combatants WHERE id = ?")
            .bind(b.to_string())
            .fetch_one(&mut *tx)
            .await
            .with_context(|| format!("combatant not found: {}", b))?;

        sqlx::query("UPDATE combatants SET initiative = ? WHERE id = ?")
            .bind(second)
            .bind(a.to_string())
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE combatants SET initiative = ? WHERE id = ?")
            .bind(first)
            .bind(b.to_string())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

fn row_to_combatant(row: &SqliteRow) -> Result<Combatant> {
    let id: String = row.try_get("id")?;
    let encounter_id: String = row.try_get("encounter_id")?;
    let kind: String = row.try_get("kind")?;

    let kind = match kind.as_str() {
        "player" => {
            let character_ref: String = row
                .try_get::<Option<String>, _>("character_ref")?
                .context("player combatant missing character_ref")?;
            CombatantKind::Player {
                character_ref: character_ref.parse().context("invalid character_ref")?,
                owner: row
                    .try_get::<Option<String>, _>("owner")?
                    .unwrap_or_default(),
            }
        }
        "monster" => {
            let template_ref: String = row
                .try_get::<Option<String>, _>("template_ref")?
                .context("monster combatant missing template_ref")?;
            let group_id: String = row
                .try_get::<Option<String>, _>("group_id")?
                .context("monster combatant missing group_id")?;
            CombatantKind::Monster {
                template_ref: template_ref.parse().context("invalid template_ref")?,
                group_id: group_id.parse().context("invalid group_id")?,
            }
        }
        other => anyhow::bail!("unknown combatant kind '{}'", other),
    };

    Ok(Combatant {
        id: id.parse().context("invalid combatant id")?,
        encounter_id: encounter_id.parse().context("invalid encounter id")?,
        kind,
        display_name: row.try_get("display_name")?,
        max_hp: row.try_get::<i64, _>("max_hp")? as i32,
        current_hp: row.try_get::<i64, _>("current_hp")? as i32,
        max_wp: row.try_get::<Option<i64>, _>("max_wp")?.map(|v| v as i32),
        current_wp: row.try_get::<Option<i64>, _>("current_wp")?.map(|v| v as i32),
        initiative: row
            .try_get::<Option<i64>, _>("initiative")?
            .map(|v| v as i32),
        has_acted: row.try_get::<i64, _>("has_acted")? != 0,
    })
}
