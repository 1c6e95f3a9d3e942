//! Sprint domain entity
//!
//! A time-boxed iteration inside a project.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::project::ProjectId;

/// Unique identifier for a sprint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SprintId(pub Uuid);

impl SprintId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SprintId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for SprintId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for SprintId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sprint within a project
#[derive(Debug, Clone, Serialize)]
pub struct Sprint {
    pub id: SprintId,
    pub project_id: ProjectId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Sprint {
    /// Length of the sprint in days, both ends inclusive
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Data needed to create a new sprint
#[derive(Debug, Clone)]
pub struct NewSprint {
    pub project_id: ProjectId,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

fn sprint_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9 ]{3,30}$").expect("valid sprint name regex"))
}

/// Check a (trimmed) sprint name: 3-30 letters, digits or spaces
pub fn validate_sprint_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Sprint name cannot be empty".to_string());
    }
    if !sprint_name_pattern().is_match(name) {
        return Err(
            "Sprint name must have 3-30 characters with only letters, numbers, and spaces"
                .to_string(),
        );
    }
    Ok(())
}

/// Check that the sprint does not end before it starts
pub fn validate_sprint_dates(start_date: NaiveDate, end_date: NaiveDate) -> Result<(), String> {
    if start_date > end_date {
        return Err(format!(
            "Sprint end date {} is before start date {}",
            end_date, start_date
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sprint_duration_is_inclusive() {
        let sprint = Sprint {
            id: SprintId::new(),
            project_id: ProjectId::new(),
            name: "Sprint 1".to_string(),
            start_date: date(2024, 1, 1),
            end_date: date(2024, 1, 14),
            created_at: Utc::now(),
        };
        assert_eq!(sprint.duration_days(), 14);
    }

    #[test]
    fn sprint_name_accepts_letters_digits_spaces() {
        assert!(validate_sprint_name("Sprint 1").is_ok());
        assert!(validate_sprint_name("abc").is_ok());
    }

    #[test]
    fn sprint_name_rejects_bad_input() {
        assert!(validate_sprint_name("").is_err());
        assert!(validate_sprint_name("ab").is_err());
        assert!(validate_sprint_name("Sprint #1").is_err());
        assert!(validate_sprint_name(&"a".repeat(31)).is_err());
    }

    #[test]
    fn sprint_dates_must_be_ordered() {
        assert!(validate_sprint_dates(date(2024, 1, 1), date(2024, 1, 14)).is_ok());
        assert!(validate_sprint_dates(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
        assert!(validate_sprint_dates(date(2024, 1, 14), date(2024, 1, 1)).is_err());
    }
}
