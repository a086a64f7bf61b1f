//! Repository for the shared `skills` catalogue.

use postboard_core::types::EntityId;
use sqlx::PgPool;

use crate::models::people::Skill;

const COLUMNS: &str = "uuid, name, created_at";

pub struct SkillRepo;

impl SkillRepo {
    /// Every skill, alphabetically.
    pub async fn list(pool: &PgPool) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skills ORDER BY name");
        sqlx::query_as::<_, Skill>(&query).fetch_all(pool).await
    }

    /// Skills matching the given names exactly. Unknown names are absent
    /// from the result.
    pub async fn find_by_names(pool: &PgPool, names: &[String]) -> Result<Vec<Skill>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM skills WHERE name = ANY($1) ORDER BY name");
        sqlx::query_as::<_, Skill>(&query)
            .bind(names)
            .fetch_all(pool)
            .await
    }

    pub async fn create(pool: &PgPool, name: &str) -> Result<Skill, sqlx::Error> {
        let query = format!("INSERT INTO skills (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Skill>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Rename a skill. `None` if it does not exist.
    pub async fn rename(
        pool: &PgPool,
        uuid: EntityId,
        name: &str,
    ) -> Result<Option<Skill>, sqlx::Error> {
        let query = format!("UPDATE skills SET name = $2 WHERE uuid = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Skill>(&query)
            .bind(uuid)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Number of ideas calling for a skill.
    pub async fn idea_count(pool: &PgPool, uuid: EntityId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT COUNT(*) FROM idea_skills WHERE skill_uuid = $1")
                .bind(uuid)
                .fetch_one(pool)
                .await?;
        Ok(count.unwrap_or(0))
    }

    /// Delete a skill. User skill links cascade; idea links block the delete.
    pub async fn delete(pool: &PgPool, uuid: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM skills WHERE uuid = $1")
            .bind(uuid)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
