//! Domain ports (traits)
//!
//! Port traits define interfaces that the domain layer requires.
//! Adapters provide concrete implementations of these traits.

pub mod identity;
pub mod repositories;

pub use identity::{UserDirectory, USER_SEARCH_LIMIT};
pub use repositories::{AccountRepository, ProjectRepository, SprintRepository, TaskRepository};
