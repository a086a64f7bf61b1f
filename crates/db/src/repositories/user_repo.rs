//! Repository for `user_profiles` and `user_skills`.

use postboard_core::types::EntityId;
use sqlx::PgPool;

use crate::models::people::{UpsertUserProfile, UserProfile};
use crate::DbTx;

/// Column list for `user_profiles` queries.
const COLUMNS: &str = "email, name, role, team_uuid, managed_team_uuid, is_admin, created_at";

pub struct UserRepo;

impl UserRepo {
    /// Create a profile, or replace every field of an existing one.
    pub async fn upsert(
        tx: &mut DbTx<'_>,
        input: &UpsertUserProfile,
    ) -> Result<UserProfile, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_profiles \
                (email, name, role, team_uuid, managed_team_uuid, is_admin) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (email) DO UPDATE SET \
                name = EXCLUDED.name, role = EXCLUDED.role, \
                team_uuid = EXCLUDED.team_uuid, \
                managed_team_uuid = EXCLUDED.managed_team_uuid, \
                is_admin = EXCLUDED.is_admin \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(input.role.map(|r| r.as_str()))
            .bind(input.team_uuid)
            .bind(input.managed_team_uuid)
            .bind(input.is_admin)
            .fetch_one(&mut **tx)
            .await
    }

    /// Change the display name only.
    pub async fn rename(
        tx: &mut DbTx<'_>,
        email: &str,
        name: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!(
            "UPDATE user_profiles SET name = $2 WHERE LOWER(email) = LOWER($1) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(email)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Look a profile up by email, ignoring case.
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_profiles WHERE LOWER(email) = LOWER($1)");
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// The manager responsible for a team, if one is assigned.
    pub async fn find_team_manager(
        pool: &PgPool,
        team_uuid: EntityId,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_profiles \
             WHERE managed_team_uuid = $1 AND role = 'manager' \
             ORDER BY created_at \
             LIMIT 1"
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(team_uuid)
            .fetch_optional(pool)
            .await
    }

    /// The manager of the team with the given name, if any.
    pub async fn find_manager_by_team_name(
        pool: &PgPool,
        team_name: &str,
    ) -> Result<Option<UserProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM user_profiles u \
             JOIN teams t ON t.uuid = u.managed_team_uuid \
             WHERE t.name = $1 AND u.role = 'manager' \
             ORDER BY u.created_at \
             LIMIT 1",
            cols = prefixed("u")
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(team_name)
            .fetch_optional(pool)
            .await
    }

    /// Profiles of every claimer of an idea.
    pub async fn list_claimers(
        pool: &PgPool,
        idea_uuid: EntityId,
    ) -> Result<Vec<UserProfile>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM user_profiles u \
             JOIN claims c ON LOWER(c.claimer_email) = LOWER(u.email) \
             WHERE c.idea_uuid = $1 \
             ORDER BY c.claim_date",
            cols = prefixed("u")
        );
        sqlx::query_as::<_, UserProfile>(&query)
            .bind(idea_uuid)
            .fetch_all(pool)
            .await
    }

    /// Skill names of a user, alphabetically.
    pub async fn skill_names(pool: &PgPool, email: &str) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT s.name FROM user_skills us \
             JOIN skills s ON s.uuid = us.skill_uuid \
             WHERE LOWER(us.user_email) = LOWER($1) \
             ORDER BY s.name",
        )
        .bind(email)
        .fetch_all(pool)
        .await
    }

    /// Replace a user's skill links with the given set.
    pub async fn set_skills(
        tx: &mut DbTx<'_>,
        email: &str,
        skill_uuids: &[EntityId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM user_skills WHERE LOWER(user_email) = LOWER($1)")
            .bind(email)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO user_skills (user_email, skill_uuid) \
             SELECT $1, UNNEST($2::UUID[])",
        )
        .bind(email)
        .bind(skill_uuids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

fn prefixed(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{c}"))
        .collect::<Vec<_>>()
        .join(", ")
}
