//! Project service
//!
//! Handles project creation and updates, the owner-is-participant rule,
//! and participant suggestions. Ownership checks for writes are the
//! caller's job.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::entities::{
    validate_project_name, AccountId, NewProject, Project, ProjectId, ProjectUpdate, User, UserId,
};
use crate::domain::ports::{AccountRepository, ProjectRepository, UserDirectory};
use crate::error::DomainError;

use super::resolve_users;

/// Service for managing projects
pub struct ProjectService<AR, PR, UD>
where
    AR: AccountRepository,
    PR: ProjectRepository,
    UD: UserDirectory,
{
    accounts: Arc<AR>,
    projects: Arc<PR>,
    users: Arc<UD>,
}

impl<AR, PR, UD> ProjectService<AR, PR, UD>
where
    AR: AccountRepository,
    PR: ProjectRepository,
    UD: UserDirectory,
{
    pub fn new(accounts: Arc<AR>, projects: Arc<PR>, users: Arc<UD>) -> Self {
        Self {
            accounts,
            projects,
            users,
        }
    }

    /// Create a new project under an account
    ///
    /// - `owner`: defaults to `acting_user` when unset
    /// - `participants`: every ID must resolve; the owner is always added
    pub async fn create(
        &self,
        acting_user: &UserId,
        account_id: &AccountId,
        name: &str,
        description: &str,
        owner: Option<UserId>,
        participants: &[UserId],
    ) -> Result<Project, DomainError> {
        let name = name.trim();
        validate_project_name(name).map_err(DomainError::Validation)?;

        if self.accounts.find_by_id(account_id).await?.is_none() {
            return Err(DomainError::NotFound(format!(
                "Account {} not found",
                account_id
            )));
        }

        let owner = owner.unwrap_or(*acting_user);
        let mut ids = participants.to_vec();
        ids.push(owner);
        resolve_users(self.users.as_ref(), &ids).await?;
        let participants: BTreeSet<UserId> = ids.into_iter().collect();

        if self
            .projects
            .find_by_account_and_name(account_id, name)
            .await?
            .is_some()
        {
            tracing::warn!(account_id = %account_id, name, "Rejected duplicate project name");
            return Err(duplicate_project(name));
        }

        let project = self
            .projects
            .create(&NewProject {
                name: name.to_string(),
                description: description.to_string(),
                account_id: *account_id,
                owner: Some(owner),
                participants,
            })
            .await
            .map_err(|e| normalize_duplicate(e, name))?;

        tracing::info!(
            project_id = %project.id,
            account_id = %project.account_id,
            owner = %owner,
            "Project created"
        );
        Ok(project)
    }

    /// Get a project by ID
    pub async fn get(&self, id: &ProjectId) -> Result<Project, DomainError> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Project {} not found", id)))
    }

    /// Projects under an account
    pub async fn list_for_account(
        &self,
        account_id: &AccountId,
    ) -> Result<Vec<Project>, DomainError> {
        self.projects.find_by_account(account_id).await
    }

    /// Apply a partial update
    ///
    /// Uniqueness of `(account, name)` is re-checked when either changes.
    pub async fn update(
        &self,
        id: &ProjectId,
        update: ProjectUpdate,
    ) -> Result<Project, DomainError> {
        let mut project = self.get(id).await?;

        if update.is_empty() {
            return Ok(project);
        }

        let name = match update.name {
            Some(name) => {
                let name = name.trim().to_string();
                validate_project_name(&name).map_err(DomainError::Validation)?;
                name
            }
            None => project.name.clone(),
        };

        let account_id = update.account_id.unwrap_or(project.account_id);
        if account_id != project.account_id
            && self.accounts.find_by_id(&account_id).await?.is_none()
        {
            return Err(DomainError::NotFound(format!(
                "Account {} not found",
                account_id
            )));
        }

        if name != project.name || account_id != project.account_id {
            if let Some(existing) = self
                .projects
                .find_by_account_and_name(&account_id, &name)
                .await?
            {
                if existing.id != project.id {
                    tracing::warn!(
                        account_id = %account_id,
                        name = %name,
                        "Rejected duplicate project name"
                    );
                    return Err(duplicate_project(&name));
                }
            }
        }

        let owner = update.owner.or(project.owner);
        let mut participants = update
            .participants
            .unwrap_or_else(|| project.participants.clone());
        if let Some(owner) = owner {
            participants.insert(owner);
        }
        let ids: Vec<UserId> = participants.iter().copied().collect();
        resolve_users(self.users.as_ref(), &ids).await?;

        project.name = name;
        project.account_id = account_id;
        if let Some(description) = update.description {
            project.description = description;
        }
        project.owner = owner;
        project.participants = participants;

        let project = self
            .projects
            .update(&project)
            .await
            .map_err(|e| normalize_duplicate(e, &project.name))?;

        tracing::info!(project_id = %project.id, "Project updated");
        Ok(project)
    }

    /// Delete a project with its sprints and tasks
    pub async fn delete(&self, id: &ProjectId) -> Result<(), DomainError> {
        self.projects.delete(id).await?;
        tracing::info!(project_id = %id, "Project deleted");
        Ok(())
    }

    /// Participants other than the owner whose name matches `query`
    ///
    /// A project without an owner yields no suggestions.
    pub async fn search_participants(
        &self,
        id: &ProjectId,
        query: &str,
    ) -> Result<Vec<User>, DomainError> {
        let project = self.get(id).await?;

        if project.owner.is_none() {
            return Ok(Vec::new());
        }

        let ids: Vec<UserId> = project.non_owner_participants().copied().collect();
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut users: Vec<User> = self
            .users
            .find_many(&ids)
            .await?
            .into_iter()
            .filter(|u| u.matches_name(query))
            .collect();
        users.sort_by(|a, b| a.display_name().cmp(b.display_name()));

        Ok(users)
    }
}

fn duplicate_project(name: &str) -> DomainError {
    DomainError::AlreadyExists(format!(
        "A project named '{}' already exists in this account",
        name
    ))
}

fn normalize_duplicate(err: DomainError, name: &str) -> DomainError {
    match err {
        DomainError::AlreadyExists(_) => duplicate_project(name),
        e => e,
    }
}
