//! Domain entities
//!
//! Pure domain models representing core business concepts.
//! These are separate from the SeaORM entities in the `entity` module.

pub mod account;
pub mod project;
pub mod sprint;
pub mod task;
pub mod user;

pub use account::{Account, AccountId, NewAccount};
pub use project::{validate_project_name, NewProject, Project, ProjectId, ProjectUpdate};
pub use sprint::{validate_sprint_dates, validate_sprint_name, NewSprint, Sprint, SprintId};
pub use task::{NewTask, Task, TaskId, TaskStatus, TaskUpdate};
pub use user::{User, UserId};
