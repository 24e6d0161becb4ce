//! Data models for the credential store.

use crate::error::{PassError, Result};
use serde::{Deserialize, Serialize};

/// A single saved credential.
///
/// Serialized camelCase so the persisted JSON array matches the historical
/// on-disk format (`createdAt`, not `created_at`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    /// Opaque unique id, unique within the collection.
    pub id: String,
    pub title: String,
    /// Username or email for the account.
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl Credential {
    /// Create a credential with a fresh id and creation timestamp.
    pub fn new(title: String, username: String, password: String, notes: Option<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title,
            username,
            password,
            notes,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Check the required fields. Callers run this before handing the
    /// credential to the store; the store itself never validates.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PassError::MissingField("title"));
        }
        if self.username.trim().is_empty() {
            return Err(PassError::MissingField("username"));
        }
        if self.password.is_empty() {
            return Err(PassError::MissingField("password"));
        }
        Ok(())
    }
}
