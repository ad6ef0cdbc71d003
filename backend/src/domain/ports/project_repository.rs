//! Port for project lifecycle and membership persistence.
//!
//! The repository owns the consistency-critical transitions: every method
//! that touches a user's `active_project_count` performs its precondition
//! check and the mutation as one indivisible unit (per-user serializability),
//! and `complete_project` applies the status flip plus every member
//! decrement all-or-nothing. Adapters that cannot provide those guarantees
//! must not implement this trait.

use async_trait::async_trait;

use crate::domain::ids::{ProjectId, UserId};
use crate::domain::project::{Project, ProjectMembership, ProjectName, ProjectRoster};

use super::define_port_error;

define_port_error! {
    /// Errors raised by project repository adapters.
    pub enum ProjectRepositoryError {
        /// The project does not exist.
        ProjectNotFound { project_id: ProjectId } =>
            "project {project_id} not found",
        /// The user holds no membership in the project.
        MembershipNotFound { project_id: ProjectId, user_id: UserId } =>
            "user {user_id} has no membership in project {project_id}",
        /// The project is no longer accepting membership changes.
        NotActive { project_id: ProjectId } =>
            "project {project_id} is not active",
        /// A membership already exists for the (project, user) pair.
        AlreadyMember { project_id: ProjectId, user_id: UserId } =>
            "user {user_id} already belongs to project {project_id}",
        /// The user is at the active-project cap.
        CapacityExceeded { user_id: UserId } =>
            "user {user_id} already holds the maximum number of active projects",
        /// The project was completed earlier; the transition is one-way.
        AlreadyCompleted { project_id: ProjectId } =>
            "project {project_id} is already completed",
        /// Only the creator may complete a project.
        NotCreator { project_id: ProjectId, user_id: UserId } =>
            "user {user_id} did not create project {project_id}",
        /// The user has no registered profile.
        UnknownUser { user_id: UserId } =>
            "user {user_id} is not registered",
        /// The underlying store failed.
        Storage { message: String } =>
            "project store failure: {message}",
    }
}

/// Input for creating a project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectDraft {
    pub creator_id: UserId,
    pub name: ProjectName,
    pub description: String,
}

/// Result of a successful join, with the project for follow-up effects.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    pub membership: ProjectMembership,
    pub project: Project,
}

/// Result of a successful leave.
#[derive(Debug, Clone, PartialEq)]
pub struct LeaveOutcome {
    pub project: Project,
}

/// Result of a successful completion: the completed project and every
/// member whose active count was decremented.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    pub project: Project,
    pub member_ids: Vec<UserId>,
}

/// Port for the membership state machine's durable transitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Create a project in Active status together with the creator's
    /// Leader membership, incrementing the creator's active count.
    /// Fails with `CapacityExceeded` before any effect when the creator is
    /// at the cap.
    async fn create_project(&self, draft: ProjectDraft)
        -> Result<Project, ProjectRepositoryError>;

    /// Add a Member membership and increment the user's active count; the
    /// cap check and increment are one atomic step.
    async fn join_project(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> Result<JoinOutcome, ProjectRepositoryError>;

    /// Remove the user's membership. The active count is decremented only
    /// while the project is still Active; leaving a Completed project does
    /// not decrement (completion already did).
    async fn leave_project(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> Result<LeaveOutcome, ProjectRepositoryError>;

    /// Flip the project to Completed and decrement every current member's
    /// active count, all-or-nothing.
    async fn complete_project(
        &self,
        requester_id: UserId,
        project_id: ProjectId,
    ) -> Result<CompletionOutcome, ProjectRepositoryError>;

    /// Read a project together with its memberships.
    async fn roster(&self, project_id: ProjectId)
        -> Result<ProjectRoster, ProjectRepositoryError>;
}
