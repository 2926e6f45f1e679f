use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use crate::TasktrackError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating a task. Every field is optional on the wire so
/// that a missing title is reported as invalid input rather than a decode
/// failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTask {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// A validated task with defaults filled in, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

impl CreateTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            completed: None,
        }
    }

    pub fn resolve(&self, now: DateTime<Utc>) -> Result<NewTask, TasktrackError> {
        let title = match self.title.as_deref() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return Err(TasktrackError::InvalidInput("title is required".into())),
        };
        Ok(NewTask {
            title,
            completed: self.completed.unwrap_or(false),
            created_at: now.trunc_subsecs(3),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_defaults_to_false() {
        let new = CreateTask::new("Water the plants").resolve(Utc::now()).unwrap();
        assert_eq!(new.title, "Water the plants");
        assert!(!new.completed);
    }

    #[test]
    fn explicit_completed_is_kept() {
        let input = CreateTask {
            title: Some("Done already".into()),
            completed: Some(true),
        };
        assert!(input.resolve(Utc::now()).unwrap().completed);
    }

    #[test]
    fn empty_or_missing_title_is_rejected() {
        let empty = CreateTask::new("");
        assert!(matches!(
            empty.resolve(Utc::now()),
            Err(TasktrackError::InvalidInput(_))
        ));

        let missing: CreateTask = serde_json::from_str(r#"{"completed": true}"#).unwrap();
        assert!(missing.resolve(Utc::now()).is_err());
    }
}
