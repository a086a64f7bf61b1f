//! Repository for `teams`.

use postboard_core::types::EntityId;
use sqlx::PgPool;

use crate::models::people::{CreateTeam, Team};

/// Column list for `teams` queries.
const COLUMNS: &str = "uuid, name, description, is_approved, created_at";

pub struct TeamRepo;

impl TeamRepo {
    pub async fn create(pool: &PgPool, input: &CreateTeam) -> Result<Team, sqlx::Error> {
        let query = format!(
            "INSERT INTO teams (name, description, is_approved) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Team>(&query)
            .bind(input.name.trim())
            .bind(&input.description)
            .bind(input.is_approved)
            .fetch_one(pool)
            .await
    }

    /// Every team, alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams ORDER BY name");
        sqlx::query_as::<_, Team>(&query).fetch_all(pool).await
    }

    pub async fn find_by_uuid(pool: &PgPool, uuid: EntityId) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE uuid = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Team>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM teams WHERE name = $1");
        sqlx::query_as::<_, Team>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    pub async fn member_count(pool: &PgPool, uuid: EntityId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles WHERE team_uuid = $1")
                .bind(uuid)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }
}
