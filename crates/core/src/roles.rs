//! User roles, well-known actor identities and profile rules.

use crate::error::CoreError;
use crate::types::EntityId;

/// Maximum length of a skill name.
pub const MAX_SKILL_NAME_LENGTH: usize = 100;

/// Actor recorded for decisions the system makes on its own (for example the
/// manager-side auto-approval when a claimer has no manager).
pub const SYSTEM_ACTOR: &str = "system";

define_text_enum! {
    /// Role stored on a user profile.
    UserRole ("role") {
        Manager => "manager",
        Developer => "developer",
        CitizenDeveloper => "citizen_developer",
        IdeaSubmitter => "idea_submitter",
    }
}

impl UserRole {
    /// Only developers and citizen developers may request to claim an idea.
    pub fn can_claim(self) -> bool {
        matches!(self, UserRole::Developer | UserRole::CitizenDeveloper)
    }
}

/// Validate a skill name for the shared catalogue.
pub fn validate_skill_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Skill name is required".to_string()));
    }
    if trimmed.chars().count() > MAX_SKILL_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Skill name exceeds maximum length of {MAX_SKILL_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Check a profile edit and return the skills to store.
///
/// Developer roles must list at least one skill; every other role keeps none.
pub fn profile_skills(
    name: &str,
    role: Option<UserRole>,
    skills: &[String],
) -> Result<Vec<String>, CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name is required".to_string()));
    }
    match role {
        Some(role) if role.can_claim() => {
            if skills.is_empty() {
                return Err(CoreError::Validation(
                    "Please select at least one skill".to_string(),
                ));
            }
            let mut kept: Vec<String> = skills.iter().map(|s| s.trim().to_string()).collect();
            kept.sort();
            kept.dedup();
            Ok(kept)
        }
        _ => Ok(Vec::new()),
    }
}

/// The team a profile manages: managers default to their own team, other
/// roles manage nothing.
pub fn managed_team(
    role: Option<UserRole>,
    team_uuid: Option<EntityId>,
    managed_team_uuid: Option<EntityId>,
) -> Option<EntityId> {
    match role {
        Some(UserRole::Manager) => managed_team_uuid.or(team_uuid),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_developer_roles_can_claim() {
        assert!(UserRole::Developer.can_claim());
        assert!(UserRole::CitizenDeveloper.can_claim());
        assert!(!UserRole::Manager.can_claim());
        assert!(!UserRole::IdeaSubmitter.can_claim());
    }

    #[test]
    fn role_parses_from_wire_name() {
        assert_eq!(
            "citizen_developer".parse::<UserRole>().unwrap(),
            UserRole::CitizenDeveloper
        );
        assert!("admin".parse::<UserRole>().is_err());
    }

    #[test]
    fn developers_need_a_skill() {
        let err = profile_skills("David Dev", Some(UserRole::Developer), &[]).unwrap_err();
        assert!(err.to_string().contains("at least one skill"));
    }

    #[test]
    fn non_developer_skills_are_dropped() {
        let kept = profile_skills("Bob", Some(UserRole::Manager), &["SQL".to_string()]).unwrap();
        assert!(kept.is_empty());
    }

    #[test]
    fn skills_are_trimmed_and_deduplicated() {
        let skills = vec!["SQL ".to_string(), "Python".to_string(), "SQL".to_string()];
        let kept = profile_skills("David", Some(UserRole::CitizenDeveloper), &skills).unwrap();
        assert_eq!(kept, vec!["Python".to_string(), "SQL".to_string()]);
    }

    #[test]
    fn manager_defaults_to_managing_own_team() {
        let team = uuid::Uuid::new_v4();
        assert_eq!(managed_team(Some(UserRole::Manager), Some(team), None), Some(team));
        assert_eq!(managed_team(Some(UserRole::Developer), Some(team), Some(team)), None);
    }

    #[test]
    fn blank_skill_name_rejected() {
        assert!(validate_skill_name("  ").is_err());
        assert!(validate_skill_name("Power Automate").is_ok());
    }
}
