//! Project repository over the shared in-process store.
//!
//! Each method takes the store lock once and performs every precondition
//! check before the first mutation, so a failed operation leaves the state
//! untouched and a successful one commits all its effects together.

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    CompletionOutcome, JoinOutcome, LeaveOutcome, ProjectDraft, ProjectRepository,
    ProjectRepositoryError,
};
use crate::domain::{
    MembershipRole, Project, ProjectId, ProjectMembership, ProjectRoster, ProjectStatus, UserId,
    MAX_ACTIVE_PROJECTS,
};

use super::store::CollaborationStore;

/// In-process implementation of the project repository port.
#[derive(Debug, Clone)]
pub struct MemoryProjectRepository {
    store: CollaborationStore,
}

impl MemoryProjectRepository {
    /// Create the repository over a shared store.
    #[must_use]
    pub fn new(store: CollaborationStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProjectRepository for MemoryProjectRepository {
    async fn create_project(
        &self,
        draft: ProjectDraft,
    ) -> Result<Project, ProjectRepositoryError> {
        let mut state = self.store.lock().await;

        let creator = state
            .profiles
            .get(&draft.creator_id)
            .ok_or_else(|| ProjectRepositoryError::unknown_user(draft.creator_id))?;
        if creator.active_project_count >= MAX_ACTIVE_PROJECTS {
            return Err(ProjectRepositoryError::capacity_exceeded(draft.creator_id));
        }

        let project = Project {
            id: ProjectId::random(),
            creator_id: draft.creator_id,
            name: draft.name,
            description: draft.description,
            status: ProjectStatus::Active,
            created_at: Utc::now(),
        };
        let membership = ProjectMembership {
            project_id: project.id,
            user_id: draft.creator_id,
            role: MembershipRole::Leader,
            joined_at: project.created_at,
        };

        state.projects.insert(project.id, project.clone());
        state.memberships.push(membership);
        if let Some(profile) = state.profiles.get_mut(&draft.creator_id) {
            profile.active_project_count += 1;
        }

        Ok(project)
    }

    async fn join_project(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> Result<JoinOutcome, ProjectRepositoryError> {
        let mut state = self.store.lock().await;

        let project = state
            .projects
            .get(&project_id)
            .ok_or_else(|| ProjectRepositoryError::project_not_found(project_id))?
            .clone();
        if !project.status.is_active() {
            return Err(ProjectRepositoryError::not_active(project_id));
        }
        if state
            .memberships
            .iter()
            .any(|m| m.project_id == project_id && m.user_id == user_id)
        {
            return Err(ProjectRepositoryError::already_member(project_id, user_id));
        }
        let joiner = state
            .profiles
            .get(&user_id)
            .ok_or_else(|| ProjectRepositoryError::unknown_user(user_id))?;
        if joiner.active_project_count >= MAX_ACTIVE_PROJECTS {
            return Err(ProjectRepositoryError::capacity_exceeded(user_id));
        }

        let membership = ProjectMembership {
            project_id,
            user_id,
            role: MembershipRole::Member,
            joined_at: Utc::now(),
        };
        state.memberships.push(membership.clone());
        if let Some(profile) = state.profiles.get_mut(&user_id) {
            profile.active_project_count += 1;
        }

        Ok(JoinOutcome {
            membership,
            project,
        })
    }

    async fn leave_project(
        &self,
        user_id: UserId,
        project_id: ProjectId,
    ) -> Result<LeaveOutcome, ProjectRepositoryError> {
        let mut state = self.store.lock().await;

        let position = state
            .memberships
            .iter()
            .position(|m| m.project_id == project_id && m.user_id == user_id)
            .ok_or_else(|| ProjectRepositoryError::membership_not_found(project_id, user_id))?;
        let project = state
            .projects
            .get(&project_id)
            .ok_or_else(|| ProjectRepositoryError::project_not_found(project_id))?
            .clone();

        state.memberships.remove(position);
        // Completion already released the member's slot; only an Active
        // project still counts against the cap.
        if project.status.is_active() {
            if let Some(profile) = state.profiles.get_mut(&user_id) {
                profile.active_project_count = profile.active_project_count.saturating_sub(1);
            }
        }

        Ok(LeaveOutcome { project })
    }

    async fn complete_project(
        &self,
        requester_id: UserId,
        project_id: ProjectId,
    ) -> Result<CompletionOutcome, ProjectRepositoryError> {
        let mut state = self.store.lock().await;

        let project = state
            .projects
            .get(&project_id)
            .ok_or_else(|| ProjectRepositoryError::project_not_found(project_id))?;
        if project.creator_id != requester_id {
            return Err(ProjectRepositoryError::not_creator(project_id, requester_id));
        }
        if !project.status.is_active() {
            return Err(ProjectRepositoryError::already_completed(project_id));
        }

        let member_ids: Vec<UserId> = state
            .memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .map(|m| m.user_id)
            .collect();
        // Validate the whole batch before mutating anything; the status
        // flip and every decrement must land together or not at all.
        if let Some(missing) = member_ids
            .iter()
            .find(|member_id| !state.profiles.contains_key(*member_id))
        {
            return Err(ProjectRepositoryError::storage(format!(
                "member profile {missing} vanished during completion"
            )));
        }

        if let Some(project) = state.projects.get_mut(&project_id) {
            project.status = ProjectStatus::Completed;
        }
        for member_id in &member_ids {
            if let Some(profile) = state.profiles.get_mut(member_id) {
                profile.active_project_count = profile.active_project_count.saturating_sub(1);
            }
        }

        let project = state
            .projects
            .get(&project_id)
            .ok_or_else(|| ProjectRepositoryError::project_not_found(project_id))?
            .clone();
        Ok(CompletionOutcome {
            project,
            member_ids,
        })
    }

    async fn roster(
        &self,
        project_id: ProjectId,
    ) -> Result<ProjectRoster, ProjectRepositoryError> {
        let state = self.store.lock().await;
        let project = state
            .projects
            .get(&project_id)
            .ok_or_else(|| ProjectRepositoryError::project_not_found(project_id))?
            .clone();
        let members = state
            .memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect();
        Ok(ProjectRoster { project, members })
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::{MembershipCommand, CreateProjectRequest};
    use crate::domain::{CollaboratorProfile, MembershipService};
    use crate::domain::ports::FixtureLiveDelivery;
    use std::sync::Arc;

    use super::*;

    async fn store_with_users(count: usize) -> (CollaborationStore, Vec<UserId>) {
        let store = CollaborationStore::new();
        let mut users = Vec::with_capacity(count);
        for _ in 0..count {
            let user_id = UserId::random();
            store.upsert_profile(CollaboratorProfile::new(user_id)).await;
            users.push(user_id);
        }
        (store, users)
    }

    fn draft(creator_id: UserId, name: &str) -> ProjectDraft {
        ProjectDraft {
            creator_id,
            name: crate::domain::ProjectName::new(name).expect("valid name"),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn creating_a_project_registers_the_leader_membership() {
        let (store, users) = store_with_users(1).await;
        let repo = MemoryProjectRepository::new(store.clone());

        let project = repo
            .create_project(draft(users[0], "First"))
            .await
            .expect("create succeeds");

        let roster = repo.roster(project.id).await.expect("roster");
        assert_eq!(roster.members.len(), 1);
        assert_eq!(roster.members[0].role, MembershipRole::Leader);
        let profile = store.profile(users[0]).await.expect("profile");
        assert_eq!(profile.active_project_count, 1);
    }

    #[tokio::test]
    async fn the_cap_blocks_a_third_active_project() {
        let (store, users) = store_with_users(1).await;
        let repo = MemoryProjectRepository::new(store.clone());

        repo.create_project(draft(users[0], "First"))
            .await
            .expect("first");
        repo.create_project(draft(users[0], "Second"))
            .await
            .expect("second");
        let error = repo
            .create_project(draft(users[0], "Third"))
            .await
            .expect_err("cap reached");

        assert_eq!(error, ProjectRepositoryError::capacity_exceeded(users[0]));
        let profile = store.profile(users[0]).await.expect("profile");
        assert_eq!(profile.active_project_count, 2);
    }

    #[tokio::test]
    async fn the_cap_blocks_joining_a_third_active_project() {
        let (store, users) = store_with_users(2).await;
        let repo = MemoryProjectRepository::new(store.clone());

        repo.create_project(draft(users[0], "First")).await.expect("first");
        repo.create_project(draft(users[0], "Second")).await.expect("second");
        let third = repo
            .create_project(draft(users[1], "Third"))
            .await
            .expect("third");

        let error = repo
            .join_project(users[0], third.id)
            .await
            .expect_err("cap reached");
        assert_eq!(error, ProjectRepositoryError::capacity_exceeded(users[0]));
    }

    #[tokio::test]
    async fn concurrent_joins_never_overshoot_the_cap() {
        let (store, users) = store_with_users(5).await;
        let repo = Arc::new(MemoryProjectRepository::new(store.clone()));
        let joiner = users[0];

        // One slot already used; the remaining slot is contended by four
        // concurrent joins, of which exactly one may win.
        repo.create_project(draft(joiner, "Own")).await.expect("own project");
        let mut targets = Vec::new();
        for (index, creator) in users[1..].iter().enumerate() {
            let project = repo
                .create_project(draft(*creator, &format!("Target {index}")))
                .await
                .expect("target project");
            targets.push(project.id);
        }

        let mut tasks = Vec::new();
        for project_id in targets {
            let repo = Arc::clone(&repo);
            tasks.push(tokio::spawn(async move {
                repo.join_project(joiner, project_id).await
            }));
        }
        let mut successes = 0;
        for task in tasks {
            if task.await.expect("task completes").is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        let profile = store.profile(joiner).await.expect("profile");
        assert_eq!(profile.active_project_count, 2);
        assert_eq!(store.active_memberships(joiner).await, 2);
    }

    #[tokio::test]
    async fn duplicate_joins_conflict() {
        let (store, users) = store_with_users(2).await;
        let repo = MemoryProjectRepository::new(store);

        let project = repo
            .create_project(draft(users[0], "Shared"))
            .await
            .expect("create");
        repo.join_project(users[1], project.id).await.expect("join");
        let error = repo
            .join_project(users[1], project.id)
            .await
            .expect_err("duplicate join");

        assert_eq!(
            error,
            ProjectRepositoryError::already_member(project.id, users[1])
        );
    }

    #[tokio::test]
    async fn joining_a_completed_project_is_invalid() {
        let (store, users) = store_with_users(2).await;
        let repo = MemoryProjectRepository::new(store);

        let project = repo
            .create_project(draft(users[0], "Done Soon"))
            .await
            .expect("create");
        repo.complete_project(users[0], project.id)
            .await
            .expect("complete");
        let error = repo
            .join_project(users[1], project.id)
            .await
            .expect_err("not active");

        assert_eq!(error, ProjectRepositoryError::not_active(project.id));
    }

    #[tokio::test]
    async fn completion_decrements_every_member_atomically() {
        let (store, users) = store_with_users(3).await;
        let repo = MemoryProjectRepository::new(store.clone());

        let project = repo
            .create_project(draft(users[0], "Group Work"))
            .await
            .expect("create");
        repo.join_project(users[1], project.id).await.expect("join b");
        repo.join_project(users[2], project.id).await.expect("join c");

        let outcome = repo
            .complete_project(users[0], project.id)
            .await
            .expect("complete");

        assert_eq!(outcome.project.status, ProjectStatus::Completed);
        assert_eq!(outcome.member_ids.len(), 3);
        for user_id in &users {
            let profile = store.profile(*user_id).await.expect("profile");
            assert_eq!(profile.active_project_count, 0);
            assert_eq!(store.active_memberships(*user_id).await, 0);
        }
    }

    #[tokio::test]
    async fn a_failed_completion_leaves_the_pre_transition_state() {
        let (store, users) = store_with_users(2).await;
        let repo = MemoryProjectRepository::new(store.clone());

        let project = repo
            .create_project(draft(users[0], "Guarded"))
            .await
            .expect("create");
        repo.join_project(users[1], project.id).await.expect("join");

        let error = repo
            .complete_project(users[1], project.id)
            .await
            .expect_err("not the creator");
        assert_eq!(
            error,
            ProjectRepositoryError::not_creator(project.id, users[1])
        );

        let roster = repo.roster(project.id).await.expect("roster");
        assert_eq!(roster.project.status, ProjectStatus::Active);
        for user_id in &users {
            let profile = store.profile(*user_id).await.expect("profile");
            assert_eq!(profile.active_project_count, 1);
        }
    }

    #[tokio::test]
    async fn completing_twice_conflicts() {
        let (store, users) = store_with_users(1).await;
        let repo = MemoryProjectRepository::new(store);

        let project = repo
            .create_project(draft(users[0], "Once"))
            .await
            .expect("create");
        repo.complete_project(users[0], project.id)
            .await
            .expect("complete");
        let error = repo
            .complete_project(users[0], project.id)
            .await
            .expect_err("already completed");

        assert_eq!(error, ProjectRepositoryError::already_completed(project.id));
    }

    #[tokio::test]
    async fn leaving_an_active_project_releases_the_slot() {
        let (store, users) = store_with_users(2).await;
        let repo = MemoryProjectRepository::new(store.clone());

        let project = repo
            .create_project(draft(users[0], "Revolving Door"))
            .await
            .expect("create");
        repo.join_project(users[1], project.id).await.expect("join");
        repo.leave_project(users[1], project.id).await.expect("leave");

        let profile = store.profile(users[1]).await.expect("profile");
        assert_eq!(profile.active_project_count, 0);
        assert_eq!(store.active_memberships(users[1]).await, 0);
    }

    #[tokio::test]
    async fn leaving_a_completed_project_does_not_double_decrement() {
        let (store, users) = store_with_users(2).await;
        let repo = MemoryProjectRepository::new(store.clone());

        let project = repo
            .create_project(draft(users[0], "Wrapped Up"))
            .await
            .expect("create");
        // Park the second slot so a double decrement would be visible.
        let parked = repo
            .create_project(draft(users[0], "Side Gig"))
            .await
            .expect("parked project");
        repo.join_project(users[1], project.id).await.expect("join");
        repo.join_project(users[1], parked.id)
            .await
            .expect("second join");

        repo.complete_project(users[0], project.id)
            .await
            .expect("complete");
        repo.leave_project(users[1], project.id)
            .await
            .expect("leave completed");

        let profile = store.profile(users[1]).await.expect("profile");
        assert_eq!(profile.active_project_count, 1);
        assert_eq!(store.active_memberships(users[1]).await, 1);
    }

    #[tokio::test]
    async fn leaving_without_membership_is_not_found() {
        let (store, users) = store_with_users(2).await;
        let repo = MemoryProjectRepository::new(store);

        let project = repo
            .create_project(draft(users[0], "Private"))
            .await
            .expect("create");
        let error = repo
            .leave_project(users[1], project.id)
            .await
            .expect_err("no membership");

        assert_eq!(
            error,
            ProjectRepositoryError::membership_not_found(project.id, users[1])
        );
    }

    #[tokio::test]
    async fn the_service_surfaces_capacity_with_the_stable_code() {
        // End-to-end through the service layer over the real adapter.
        let (store, users) = store_with_users(1).await;
        let repo = Arc::new(MemoryProjectRepository::new(store));
        let service = MembershipService::new(repo, Arc::new(FixtureLiveDelivery));

        for name in ["First", "Second"] {
            service
                .create_project(CreateProjectRequest {
                    creator_id: users[0],
                    name: name.to_owned(),
                    description: String::new(),
                })
                .await
                .expect("under the cap");
        }
        let error = service
            .create_project(CreateProjectRequest {
                creator_id: users[0],
                name: "Third".to_owned(),
                description: String::new(),
            })
            .await
            .expect_err("cap reached");

        assert_eq!(error.code(), ErrorCode::CapacityExceeded);
    }
}
