//! Project lifecycle and membership model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{ProjectId, UserId};

/// Hard cap on concurrently active projects per user.
pub const MAX_ACTIVE_PROJECTS: u32 = 2;

/// Maximum length of a project name, in characters.
pub const PROJECT_NAME_MAX: usize = 120;

/// Lifecycle state of a project. The only transition is
/// `Active -> Completed`, and it is irreversible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active,
    Completed,
}

impl ProjectStatus {
    /// Whether the project still counts against its members' cap.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Role a member holds inside a project. The creator's membership is always
/// `Leader` and is created atomically with the project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipRole {
    Leader,
    Member,
}

/// Validation errors for [`ProjectName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectNameError {
    Empty,
    TooLong { max: usize },
}

impl fmt::Display for ProjectNameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "project name must not be empty"),
            Self::TooLong { max } => {
                write!(f, "project name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for ProjectNameError {}

/// Validated, trimmed project name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate and construct a project name. Surrounding whitespace is
    /// stripped before validation.
    pub fn new(name: impl Into<String>) -> Result<Self, ProjectNameError> {
        let trimmed = name.into().trim().to_owned();
        if trimmed.is_empty() {
            return Err(ProjectNameError::Empty);
        }
        if trimmed.chars().count() > PROJECT_NAME_MAX {
            return Err(ProjectNameError::TooLong {
                max: PROJECT_NAME_MAX,
            });
        }
        Ok(Self(trimmed))
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<ProjectName> for String {
    fn from(value: ProjectName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ProjectName {
    type Error = ProjectNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A collaboration project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub creator_id: UserId,
    pub name: ProjectName,
    pub description: String,
    pub status: ProjectStatus,
    pub created_at: DateTime<Utc>,
}

/// Membership of a user in a project; unique per (project, user) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMembership {
    pub project_id: ProjectId,
    pub user_id: UserId,
    pub role: MembershipRole,
    pub joined_at: DateTime<Utc>,
}

/// A project together with its current memberships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRoster {
    pub project: Project,
    pub members: Vec<ProjectMembership>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Weekend Hack", "Weekend Hack")]
    #[case("  padded  ", "padded")]
    fn accepts_and_trims_valid_names(#[case] input: &str, #[case] expected: &str) {
        let name = ProjectName::new(input).expect("valid name");
        assert_eq!(name.as_ref(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn rejects_blank_names(#[case] input: &str) {
        assert_eq!(ProjectName::new(input), Err(ProjectNameError::Empty));
    }

    #[test]
    fn rejects_over_long_names() {
        let input = "x".repeat(PROJECT_NAME_MAX + 1);
        assert_eq!(
            ProjectName::new(input),
            Err(ProjectNameError::TooLong {
                max: PROJECT_NAME_MAX
            })
        );
    }

    #[test]
    fn completed_projects_do_not_count_as_active() {
        assert!(ProjectStatus::Active.is_active());
        assert!(!ProjectStatus::Completed.is_active());
    }
}
