//! Driving port for the membership state machine.
//!
//! The embedding CRUD layer translates its transport requests into these
//! calls; responses and errors come back as domain types for it to map
//! onto the wire.

use async_trait::async_trait;

use crate::domain::error::DomainResult;
use crate::domain::ids::{ProjectId, UserId};
use crate::domain::project::{Project, ProjectMembership, ProjectRoster};

/// Request to create a project. The name is validated by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateProjectRequest {
    pub creator_id: UserId,
    pub name: String,
    pub description: String,
}

/// Driving port for project lifecycle operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipCommand: Send + Sync {
    /// Create an Active project with the creator as Leader.
    async fn create_project(&self, request: CreateProjectRequest) -> DomainResult<Project>;

    /// Join an Active project as a Member.
    async fn join_project(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> DomainResult<ProjectMembership>;

    /// Leave a project.
    async fn leave_project(&self, user_id: UserId, project_id: ProjectId) -> DomainResult<()>;

    /// Complete a project; creator only, one-way.
    async fn complete_project(
        &self,
        requester_id: UserId,
        project_id: ProjectId,
    ) -> DomainResult<Project>;

    /// Read a project with its memberships.
    async fn roster(&self, project_id: ProjectId) -> DomainResult<ProjectRoster>;
}
