//! Mock implementations of port traits
//!
//! `InMemoryStore` keeps every table behind one lock and implements all
//! repository ports plus `UserDirectory`, so services under test share one
//! consistent view, including unique constraints and cascading deletes.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::{
    Account, AccountId, NewAccount, NewProject, NewSprint, NewTask, Project, ProjectId, Sprint,
    SprintId, Task, TaskId, User, UserId,
};
use crate::domain::ports::{
    AccountRepository, ProjectRepository, SprintRepository, TaskRepository, UserDirectory,
    USER_SEARCH_LIMIT,
};
use crate::error::DomainError;

#[derive(Default)]
struct Tables {
    accounts: HashMap<AccountId, Account>,
    projects: HashMap<ProjectId, Project>,
    sprints: HashMap<SprintId, Sprint>,
    tasks: HashMap<TaskId, Task>,
    users: HashMap<UserId, User>,
}

impl Tables {
    fn remove_sprint_cascade(&mut self, id: &SprintId) {
        self.tasks.retain(|_, t| t.sprint_id != *id);
        self.sprints.remove(id);
    }

    fn remove_project_cascade(&mut self, id: &ProjectId) {
        let sprint_ids: Vec<SprintId> = self
            .sprints
            .values()
            .filter(|s| s.project_id == *id)
            .map(|s| s.id)
            .collect();
        for sprint_id in sprint_ids {
            self.remove_sprint_cascade(&sprint_id);
        }
        self.projects.remove(id);
    }

    fn project_name_taken(
        &self,
        account_id: &AccountId,
        name: &str,
        except: Option<ProjectId>,
    ) -> bool {
        self.projects
            .values()
            .any(|p| p.account_id == *account_id && p.name == name && Some(p.id) != except)
    }

    fn task_title_taken(
        &self,
        sprint_id: &SprintId,
        title: &str,
        except: Option<TaskId>,
    ) -> bool {
        self.tasks
            .values()
            .any(|t| t.sprint_id == *sprint_id && t.title == title && Some(t.id) != except)
    }

    fn sprint_name_taken(&self, project_id: &ProjectId, name: &str) -> bool {
        self.sprints
            .values()
            .any(|s| s.project_id == *project_id && s.name == name)
    }
}

/// In-memory stand-in for the relational store and the identity store
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with a user
    pub fn with_user(self, user: User) -> Self {
        self.tables.write().unwrap().users.insert(user.id, user);
        self
    }

    /// Pre-populate with an account
    pub fn with_account(self, account: Account) -> Self {
        self.tables
            .write()
            .unwrap()
            .accounts
            .insert(account.id, account);
        self
    }

    /// Pre-populate with a project
    pub fn with_project(self, project: Project) -> Self {
        self.tables
            .write()
            .unwrap()
            .projects
            .insert(project.id, project);
        self
    }

    /// Pre-populate with a sprint
    pub fn with_sprint(self, sprint: Sprint) -> Self {
        self.tables
            .write()
            .unwrap()
            .sprints
            .insert(sprint.id, sprint);
        self
    }

    /// Pre-populate with a task
    pub fn with_task(self, task: Task) -> Self {
        self.tables.write().unwrap().tasks.insert(task.id, task);
        self
    }

    /// Number of tasks across all sprints
    pub fn task_count(&self) -> usize {
        self.tables.read().unwrap().tasks.len()
    }

    /// Number of sprints across all projects
    pub fn sprint_count(&self) -> usize {
        self.tables.read().unwrap().sprints.len()
    }

    /// Number of projects across all accounts
    pub fn project_count(&self) -> usize {
        self.tables.read().unwrap().projects.len()
    }
}

fn unique_violation(constraint: &str) -> DomainError {
    DomainError::AlreadyExists(format!(
        "duplicate key value violates unique constraint \"{}\"",
        constraint
    ))
}

// ============================================================================
// Accounts
// ============================================================================

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, DomainError> {
        Ok(self.tables.read().unwrap().accounts.get(id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Account>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables.accounts.values().find(|a| a.name == name).cloned())
    }

    async fn find_by_owner(&self, owner: &UserId) -> Result<Vec<Account>, DomainError> {
        let tables = self.tables.read().unwrap();
        let mut accounts: Vec<Account> = tables
            .accounts
            .values()
            .filter(|a| a.owner.as_ref() == Some(owner))
            .cloned()
            .collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    async fn create(&self, new_account: &NewAccount) -> Result<Account, DomainError> {
        let mut tables = self.tables.write().unwrap();
        if tables.accounts.values().any(|a| a.name == new_account.name) {
            return Err(unique_violation("accounts_name_key"));
        }

        let account = Account {
            id: AccountId::new(),
            name: new_account.name.clone(),
            description: new_account.description.clone(),
            owner: new_account.owner,
            created_at: Utc::now(),
        };
        tables.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn delete(&self, id: &AccountId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        if !tables.accounts.contains_key(id) {
            return Err(DomainError::NotFound(format!("Account {} not found", id)));
        }

        let project_ids: Vec<ProjectId> = tables
            .projects
            .values()
            .filter(|p| p.account_id == *id)
            .map(|p| p.id)
            .collect();
        for project_id in project_ids {
            tables.remove_project_cascade(&project_id);
        }
        tables.accounts.remove(id);
        Ok(())
    }
}

// ============================================================================
// Projects
// ============================================================================

#[async_trait]
impl ProjectRepository for InMemoryStore {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        Ok(self.tables.read().unwrap().projects.get(id).cloned())
    }

    async fn find_by_account_and_name(
        &self,
        account_id: &AccountId,
        name: &str,
    ) -> Result<Option<Project>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .projects
            .values()
            .find(|p| p.account_id == *account_id && p.name == name)
            .cloned())
    }

    async fn find_by_account(&self, account_id: &AccountId) -> Result<Vec<Project>, DomainError> {
        let tables = self.tables.read().unwrap();
        let mut projects: Vec<Project> = tables
            .projects
            .values()
            .filter(|p| p.account_id == *account_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(projects)
    }

    async fn create(&self, new_project: &NewProject) -> Result<Project, DomainError> {
        let mut tables = self.tables.write().unwrap();
        if tables.project_name_taken(&new_project.account_id, &new_project.name, None) {
            return Err(unique_violation("unique_project_per_account"));
        }

        let project = Project {
            id: ProjectId::new(),
            name: new_project.name.clone(),
            description: new_project.description.clone(),
            account_id: new_project.account_id,
            owner: new_project.owner,
            participants: new_project.participants.clone(),
            created_at: Utc::now(),
        };
        tables.projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn update(&self, project: &Project) -> Result<Project, DomainError> {
        let mut tables = self.tables.write().unwrap();
        if !tables.projects.contains_key(&project.id) {
            return Err(DomainError::NotFound(format!(
                "Project {} not found",
                project.id
            )));
        }
        if tables.project_name_taken(&project.account_id, &project.name, Some(project.id)) {
            return Err(unique_violation("unique_project_per_account"));
        }

        tables.projects.insert(project.id, project.clone());
        Ok(project.clone())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        if !tables.projects.contains_key(id) {
            return Err(DomainError::NotFound(format!("Project {} not found", id)));
        }
        tables.remove_project_cascade(id);
        Ok(())
    }
}

// ============================================================================
// Sprints
// ============================================================================

#[async_trait]
impl SprintRepository for InMemoryStore {
    async fn find_by_id(&self, id: &SprintId) -> Result<Option<Sprint>, DomainError> {
        Ok(self.tables.read().unwrap().sprints.get(id).cloned())
    }

    async fn exists_by_name(
        &self,
        project_id: &ProjectId,
        name: &str,
    ) -> Result<bool, DomainError> {
        Ok(self
            .tables
            .read()
            .unwrap()
            .sprint_name_taken(project_id, name))
    }

    async fn find_by_project(&self, project_id: &ProjectId) -> Result<Vec<Sprint>, DomainError> {
        let tables = self.tables.read().unwrap();
        let mut sprints: Vec<Sprint> = tables
            .sprints
            .values()
            .filter(|s| s.project_id == *project_id)
            .cloned()
            .collect();
        sprints.sort_by(|a, b| a.start_date.cmp(&b.start_date).then(a.name.cmp(&b.name)));
        Ok(sprints)
    }

    async fn create(&self, new_sprint: &NewSprint) -> Result<Sprint, DomainError> {
        let (sprint, _) = self.create_with_tasks(new_sprint, &[]).await?;
        Ok(sprint)
    }

    async fn create_with_tasks(
        &self,
        new_sprint: &NewSprint,
        task_titles: &[String],
    ) -> Result<(Sprint, Vec<Task>), DomainError> {
        let mut tables = self.tables.write().unwrap();
        if tables.sprint_name_taken(&new_sprint.project_id, &new_sprint.name) {
            return Err(unique_violation("unique_sprint_per_project"));
        }
        let distinct: BTreeSet<&String> = task_titles.iter().collect();
        if distinct.len() != task_titles.len() {
            return Err(unique_violation("unique_task_per_sprint"));
        }

        let sprint = Sprint {
            id: SprintId::new(),
            project_id: new_sprint.project_id,
            name: new_sprint.name.clone(),
            start_date: new_sprint.start_date,
            end_date: new_sprint.end_date,
            created_at: Utc::now(),
        };
        let tasks: Vec<Task> = task_titles
            .iter()
            .map(|title| new_task_row(&NewTask::bare(sprint.id, title.clone())))
            .collect();

        tables.sprints.insert(sprint.id, sprint.clone());
        for task in &tasks {
            tables.tasks.insert(task.id, task.clone());
        }
        Ok((sprint, tasks))
    }

    async fn delete(&self, id: &SprintId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        if !tables.sprints.contains_key(id) {
            return Err(DomainError::NotFound(format!("Sprint {} not found", id)));
        }
        tables.remove_sprint_cascade(id);
        Ok(())
    }
}

// ============================================================================
// Tasks
// ============================================================================

fn new_task_row(new_task: &NewTask) -> Task {
    Task {
        id: TaskId::new(),
        sprint_id: new_task.sprint_id,
        title: new_task.title.clone(),
        description: new_task.description.clone(),
        due_date: new_task.due_date,
        status: new_task.status,
        assigned_to: new_task.assigned_to.clone(),
        comments: new_task.comments.clone(),
        screenshots: new_task.screenshots.clone(),
        created_at: Utc::now(),
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn find_by_id(&self, id: &TaskId) -> Result<Option<Task>, DomainError> {
        Ok(self.tables.read().unwrap().tasks.get(id).cloned())
    }

    async fn find_by_sprint_and_title(
        &self,
        sprint_id: &SprintId,
        title: &str,
    ) -> Result<Option<Task>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(tables
            .tasks
            .values()
            .find(|t| t.sprint_id == *sprint_id && t.title == title)
            .cloned())
    }

    async fn find_by_sprint(&self, sprint_id: &SprintId) -> Result<Vec<Task>, DomainError> {
        let tables = self.tables.read().unwrap();
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|t| t.sprint_id == *sprint_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.title.cmp(&b.title)));
        Ok(tasks)
    }

    async fn create(&self, new_task: &NewTask) -> Result<Task, DomainError> {
        let mut tables = self.tables.write().unwrap();
        if tables.task_title_taken(&new_task.sprint_id, &new_task.title, None) {
            return Err(unique_violation("unique_task_per_sprint"));
        }

        let task = new_task_row(new_task);
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, task: &Task) -> Result<Task, DomainError> {
        let mut tables = self.tables.write().unwrap();
        if !tables.tasks.contains_key(&task.id) {
            return Err(DomainError::NotFound(format!("Task {} not found", task.id)));
        }
        if tables.task_title_taken(&task.sprint_id, &task.title, Some(task.id)) {
            return Err(unique_violation("unique_task_per_sprint"));
        }

        tables.tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn set_assignees(
        &self,
        id: &TaskId,
        assignees: &BTreeSet<UserId>,
    ) -> Result<Task, DomainError> {
        let mut tables = self.tables.write().unwrap();
        let task = tables
            .tasks
            .get_mut(id)
            .ok_or_else(|| DomainError::NotFound(format!("Task {} not found", id)))?;
        task.assigned_to = assignees.clone();
        Ok(task.clone())
    }

    async fn delete(&self, id: &TaskId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().unwrap();
        match tables.tasks.remove(id) {
            Some(_) => Ok(()),
            None => Err(DomainError::NotFound(format!("Task {} not found", id))),
        }
    }
}

// ============================================================================
// Users
// ============================================================================

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.tables.read().unwrap().users.get(id).cloned())
    }

    async fn find_many(&self, ids: &[UserId]) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| tables.users.get(id).cloned())
            .collect())
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<User>, DomainError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let tables = self.tables.read().unwrap();
        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| u.matches_name(query))
            .cloned()
            .collect();
        users.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        users.truncate(USER_SEARCH_LIMIT as usize);
        Ok(users)
    }
}
