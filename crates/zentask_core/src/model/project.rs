//! Project domain model.
//!
//! # Invariants
//! - `name` is never blank.
//! - `description` is `None` rather than an empty string.
//! - Tasks reference projects by id; a project never embeds its tasks.

use super::time::now_millis;
use super::user::UserId;
use super::{non_blank, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProjectId = Uuid;

/// A named container that tasks reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub description: Option<String>,
    /// Account that created the project, when known.
    pub owner: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload as received from callers; fields are checked by [`NewProject::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            description: None,
        }
    }

    /// Builds a fresh project record, stamped with a new id and timestamps.
    ///
    /// # Errors
    /// - `MissingField` when `name` is absent or blank.
    pub fn validate(&self, owner: Option<UserId>) -> Result<Project, ValidationError> {
        let name = non_blank(self.name.as_deref())
            .ok_or(ValidationError::MissingField("Project name is required"))?;
        let now = now_millis();
        Ok(Project {
            id: Uuid::new_v4(),
            name,
            description: non_blank(self.description.as_deref()),
            owner,
            created_at: now,
            updated_at: now,
        })
    }
}
