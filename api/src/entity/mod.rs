//! SeaORM entity definitions
//!
//! Table models mirroring the PostgreSQL schema. Domain code never sees
//! these; the postgres adapters convert them into domain entities.

pub mod accounts;
pub mod project_participants;
pub mod projects;
pub mod sprints;
pub mod task_assignees;
pub mod tasks;
pub mod users;
