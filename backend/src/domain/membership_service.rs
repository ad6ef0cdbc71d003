//! Membership state machine service.
//!
//! Orchestrates project lifecycle transitions over the project repository
//! (which owns the atomicity guarantees) and emits the follow-up
//! notifications as secondary effects.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::{DomainResult, Error};
use crate::domain::ids::{ProjectId, UserId};
use crate::domain::notification::NotificationKind;
use crate::domain::ports::{
    CreateProjectRequest, LiveDelivery, MembershipCommand, ProjectDraft, ProjectRepository,
    ProjectRepositoryError,
};
use crate::domain::project::{Project, ProjectMembership, ProjectName, ProjectRoster};

fn map_repository_error(error: ProjectRepositoryError) -> Error {
    match &error {
        ProjectRepositoryError::ProjectNotFound { .. }
        | ProjectRepositoryError::MembershipNotFound { .. }
        | ProjectRepositoryError::UnknownUser { .. } => Error::not_found(error.to_string()),
        ProjectRepositoryError::NotActive { .. } => Error::invalid_state(error.to_string()),
        ProjectRepositoryError::AlreadyMember { .. }
        | ProjectRepositoryError::AlreadyCompleted { .. } => Error::conflict(error.to_string()),
        ProjectRepositoryError::CapacityExceeded { .. } => {
            Error::capacity_exceeded(error.to_string())
        }
        ProjectRepositoryError::NotCreator { .. } => Error::forbidden(error.to_string()),
        ProjectRepositoryError::Storage { .. } => Error::internal(error.to_string()),
    }
}

/// Membership service implementing the project lifecycle driving port.
#[derive(Clone)]
pub struct MembershipService<R> {
    projects: Arc<R>,
    live: Arc<dyn LiveDelivery>,
}

impl<R> MembershipService<R> {
    /// Create the service over a project repository and the delivery hub.
    pub fn new(projects: Arc<R>, live: Arc<dyn LiveDelivery>) -> Self {
        Self { projects, live }
    }
}

#[async_trait]
impl<R> MembershipCommand for MembershipService<R>
where
    R: ProjectRepository,
{
    async fn create_project(&self, request: CreateProjectRequest) -> DomainResult<Project> {
        let name = ProjectName::new(request.name)
            .map_err(|err| Error::validation(err.to_string()))?;

        self.projects
            .create_project(ProjectDraft {
                creator_id: request.creator_id,
                name,
                description: request.description,
            })
            .await
            .map_err(map_repository_error)
    }

    async fn join_project(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> DomainResult<ProjectMembership> {
        let outcome = self
            .projects
            .join_project(user_id, project_id)
            .await
            .map_err(map_repository_error)?;

        self.live
            .notify(
                outcome.project.creator_id,
                NotificationKind::ProjectUpdate,
                "New teammate",
                &format!("A teammate joined your project \"{}\".", outcome.project.name),
            )
            .await;

        Ok(outcome.membership)
    }

    async fn leave_project(&self, user_id: UserId, project_id: ProjectId) -> DomainResult<()> {
        let outcome = self
            .projects
            .leave_project(user_id, project_id)
            .await
            .map_err(map_repository_error)?;

        if outcome.project.creator_id != user_id {
            self.live
                .notify(
                    outcome.project.creator_id,
                    NotificationKind::ProjectUpdate,
                    "Teammate left",
                    &format!("A teammate left your project \"{}\".", outcome.project.name),
                )
                .await;
        }

        Ok(())
    }

    async fn complete_project(
        &self,
        requester_id: UserId,
        project_id: ProjectId,
    ) -> DomainResult<Project> {
        let outcome = self
            .projects
            .complete_project(requester_id, project_id)
            .await
            .map_err(map_repository_error)?;

        for member_id in &outcome.member_ids {
            if *member_id == requester_id {
                continue;
            }
            self.live
                .notify(
                    *member_id,
                    NotificationKind::ProjectUpdate,
                    "Project completed",
                    &format!("Project \"{}\" was marked completed.", outcome.project.name),
                )
                .await;
        }

        Ok(outcome.project)
    }

    async fn roster(&self, project_id: ProjectId) -> DomainResult<ProjectRoster> {
        self.projects
            .roster(project_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "membership_service_tests.rs"]
mod tests;
