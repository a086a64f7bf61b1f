//! Skills catalogue, teams and user profiles.

use postboard_core::actor::ActorContext;
use postboard_core::claim;
use postboard_core::error::CoreError;
use postboard_core::roles::{self, UserRole};
use postboard_core::types::EntityId;
use postboard_db::models::people::{CreateTeam, Skill, Team, UpsertUserProfile, UserProfile};
use postboard_db::repositories::{SkillRepo, TeamRepo, UserRepo};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A profile with its skill names.
#[derive(Debug, Serialize)]
pub struct ProfileDetail {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub skills: Vec<String>,
}

/// Admin create-or-update of someone's profile. The email comes from the path.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    pub name: String,
    pub role: Option<UserRole>,
    pub team_uuid: Option<EntityId>,
    pub managed_team_uuid: Option<EntityId>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Self-service edit. Role and team stay under admin control.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnProfileUpdate {
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Body for creating or renaming a skill.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillName {
    pub name: String,
}

/// Resolve skill names to catalogue entries, refusing unknown names.
pub async fn resolve_skills(pool: &PgPool, names: &[String]) -> AppResult<Vec<EntityId>> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let found = SkillRepo::find_by_names(pool, names).await?;
    if let Some(missing) = names.iter().find(|n| !found.iter().any(|s| &s.name == *n)) {
        return Err(CoreError::Validation(format!("Unknown skill '{missing}'")).into());
    }
    Ok(found.into_iter().map(|s| s.uuid).collect())
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

pub async fn list_skills(pool: &PgPool) -> AppResult<Vec<Skill>> {
    Ok(SkillRepo::list(pool).await?)
}

pub async fn create_skill(pool: &PgPool, actor: &ActorContext, name: &str) -> AppResult<Skill> {
    claim::require_admin(actor, "manage skills")?;
    roles::validate_skill_name(name)?;
    let skill = SkillRepo::create(pool, name.trim()).await?;
    tracing::info!(skill_uuid = %skill.uuid, name = %skill.name, actor = %actor.email, "Skill created");
    Ok(skill)
}

pub async fn rename_skill(
    pool: &PgPool,
    actor: &ActorContext,
    skill_uuid: EntityId,
    name: &str,
) -> AppResult<Skill> {
    claim::require_admin(actor, "manage skills")?;
    roles::validate_skill_name(name)?;
    let skill = SkillRepo::rename(pool, skill_uuid, name.trim())
        .await?
        .ok_or_else(|| AppError::not_found("Skill", skill_uuid))?;
    tracing::info!(skill_uuid = %skill.uuid, name = %skill.name, actor = %actor.email, "Skill renamed");
    Ok(skill)
}

/// Delete a skill nobody's idea calls for. Profiles simply lose it.
pub async fn delete_skill(pool: &PgPool, actor: &ActorContext, skill_uuid: EntityId) -> AppResult<()> {
    claim::require_admin(actor, "manage skills")?;
    let in_use = SkillRepo::idea_count(pool, skill_uuid).await?;
    if in_use > 0 {
        return Err(CoreError::Validation(format!(
            "Cannot delete skill. It is used by {in_use} ideas."
        ))
        .into());
    }
    if !SkillRepo::delete(pool, skill_uuid).await? {
        return Err(AppError::not_found("Skill", skill_uuid));
    }
    tracing::info!(skill_uuid = %skill_uuid, actor = %actor.email, "Skill deleted");
    Ok(())
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

pub async fn list_teams(pool: &PgPool) -> AppResult<Vec<Team>> {
    Ok(TeamRepo::list(pool).await?)
}

pub async fn create_team(pool: &PgPool, actor: &ActorContext, input: &CreateTeam) -> AppResult<Team> {
    claim::require_admin(actor, "manage teams")?;
    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Team name is required".to_string()).into());
    }
    let team = TeamRepo::create(pool, input).await?;
    tracing::info!(team_uuid = %team.uuid, name = %team.name, actor = %actor.email, "Team created");
    Ok(team)
}

async fn ensure_team_exists(pool: &PgPool, team_uuid: Option<EntityId>) -> AppResult<()> {
    if let Some(uuid) = team_uuid {
        TeamRepo::find_by_uuid(pool, uuid)
            .await?
            .ok_or_else(|| AppError::not_found("Team", uuid))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

async fn detail(pool: &PgPool, profile: UserProfile) -> AppResult<ProfileDetail> {
    let skills = UserRepo::skill_names(pool, &profile.email).await?;
    Ok(ProfileDetail { profile, skills })
}

/// Create or replace a profile on behalf of an admin.
pub async fn upsert_profile(
    state: &AppState,
    actor: &ActorContext,
    email: &str,
    input: &ProfileRequest,
) -> AppResult<ProfileDetail> {
    claim::require_admin(actor, "manage user profiles")?;
    let skills = roles::profile_skills(&input.name, input.role, &input.skills)?;
    ensure_team_exists(&state.pool, input.team_uuid).await?;
    ensure_team_exists(&state.pool, input.managed_team_uuid).await?;
    let skill_uuids = resolve_skills(&state.pool, &skills).await?;

    // Keep the stored spelling of an existing address.
    let email = match UserRepo::find_by_email(&state.pool, email).await? {
        Some(existing) => existing.email,
        None => email.trim().to_string(),
    };

    let mut tx = state.pool.begin().await?;
    let profile = UserRepo::upsert(
        &mut tx,
        &UpsertUserProfile {
            email,
            name: input.name.trim().to_string(),
            role: input.role,
            team_uuid: input.team_uuid,
            managed_team_uuid: roles::managed_team(input.role, input.team_uuid, input.managed_team_uuid),
            is_admin: input.is_admin,
        },
    )
    .await?;
    UserRepo::set_skills(&mut tx, &profile.email, &skill_uuids).await?;
    tx.commit().await?;

    tracing::info!(
        email = %profile.email,
        role = ?input.role,
        skills = skill_uuids.len(),
        actor = %actor.email,
        "Profile saved"
    );
    detail(&state.pool, profile).await
}

/// The caller's own profile.
pub async fn own_profile(pool: &PgPool, actor: &ActorContext) -> AppResult<ProfileDetail> {
    let profile = UserRepo::find_by_email(pool, &actor.email)
        .await?
        .ok_or_else(|| AppError::not_found("UserProfile", &actor.email))?;
    detail(pool, profile).await
}

/// Update the caller's display name and skills.
pub async fn update_own_profile(
    state: &AppState,
    actor: &ActorContext,
    input: &OwnProfileUpdate,
) -> AppResult<ProfileDetail> {
    let skills = roles::profile_skills(&input.name, actor.role, &input.skills)?;
    let skill_uuids = resolve_skills(&state.pool, &skills).await?;

    let mut tx = state.pool.begin().await?;
    let profile = UserRepo::rename(&mut tx, &actor.email, input.name.trim())
        .await?
        .ok_or_else(|| AppError::not_found("UserProfile", &actor.email))?;
    UserRepo::set_skills(&mut tx, &profile.email, &skill_uuids).await?;
    tx.commit().await?;

    tracing::info!(email = %profile.email, skills = skill_uuids.len(), "Own profile updated");
    detail(&state.pool, profile).await
}
