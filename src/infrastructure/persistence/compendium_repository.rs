//! SQLite-backed read-only providers
//!
//! Character sheets, monster templates and party membership are authored
//! elsewhere in the product; this adapter reads the tables they maintain.
//! Stats and attack tables are stored as JSON columns.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::application::ports::outbound::{
    CharacterProviderPort, MonsterTemplateProviderPort, PartyProviderPort,
};
use crate::domain::entities::{CharacterSheet, MonsterStats, MonsterTemplate};
use crate::domain::value_objects::{CharacterId, MonsterTemplateId, PartyId};

pub struct SqliteCompendium {
    pool: SqlitePool,
}

impl SqliteCompendium {
    pub async fn new(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS characters (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                max_hp INTEGER NOT NULL,
                max_wp INTEGER,
                owner TEXT NOT NULL DEFAULT ''
            )
        "#,
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS monster_templates (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                stats TEXT NOT NULL,
                attack_table TEXT NOT NULL DEFAULT '[]'
            )
        "#,
        )
        .execute(&pool)
        .await?;
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS party_members (
                party_id TEXT NOT NULL,
                character_id TEXT NOT NULL,
                PRIMARY KEY (party_id, character_id)
            )
        "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl CharacterProviderPort for SqliteCompendium {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterSheet>> {
        let row = sqlx::query("SELECT * FROM characters WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| {
            let id: String = r.try_get("id")?;
            Ok(CharacterSheet {
                id: id.parse().context("invalid character id")?,
                name: r.try_get("name")?,
                max_hp: r.try_get::<i64, _>("max_hp")? as i32,
                max_wp: r.try_get::<Option<i64>, _>("max_wp")?.map(|v| v as i32),
                owner: r.try_get("owner")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl MonsterTemplateProviderPort for SqliteCompendium {
    async fn get(&self, id: MonsterTemplateId) -> Result<Option<MonsterTemplate>> {
        let row = sqlx::query("SELECT * FROM monster_templates WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| {
            let id: String = r.try_get("id")?;
            let stats_json: String = r.try_get("stats")?;
            let stats: MonsterStats =
                serde_json::from_str(&stats_json).context("invalid template stats")?;
            let attack_table: String = r.try_get("attack_table")?;
            Ok(MonsterTemplate {
                id: id.parse().context("invalid template id")?,
                name: r.try_get("name")?,
                stats,
                attack_table: serde_json::from_str(&attack_table)
                    .context("invalid attack table")?,
            })
        })
        .transpose()
    }
}

#[async_trait]
impl PartyProviderPort for SqliteCompendium {
    async fn members(&self, party_id: PartyId) -> Result<Vec<CharacterId>> {
        let rows = sqlx::query("SELECT character_id FROM party_members WHERE party_id = ?")
            .bind(party_id.to_string())
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|r| {
                let id: String = r.try_get("character_id")?;
                id.parse().context("invalid character id")
            })
            .collect()
    }
}
