//! Entity documents as they are stored.
//!
//! Every entity has a `New*` counterpart without an `id`: that is the body
//! written at insert time, before the backend assigns an identifier.

use std::fmt;

use {
    chrono::{DateTime, Utc, serde::ts_milliseconds},
    serde::{Deserialize, Serialize},
};

/// Storage-assigned document identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// A fresh random identifier (UUID v4, 32 lowercase hex characters).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for DocumentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for DocumentId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Links ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: DocumentId,
    pub url: String,
    pub description: String,
    #[serde(with = "ts_milliseconds")]
    pub date_created: DateTime<Utc>,
    #[serde(default)]
    pub posted_by_id: Option<DocumentId>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    pub url: String,
    pub description: String,
    #[serde(with = "ts_milliseconds")]
    pub date_created: DateTime<Utc>,
    pub posted_by_id: Option<DocumentId>,
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: DocumentId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Argon2 PHC string, never the plaintext.
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: Option<String>,
    pub password_hash: String,
}

// ── Votes ────────────────────────────────────────────────────────────────────

/// One user's endorsement of one link. Duplicates are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub id: DocumentId,
    #[serde(default)]
    pub user_id: Option<DocumentId>,
    pub link_id: DocumentId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVote {
    pub user_id: Option<DocumentId>,
    pub link_id: DocumentId,
}

// ── Sessions ─────────────────────────────────────────────────────────────────

/// Bearer token issued to a user at sign-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: DocumentId,
    pub token: String,
    pub user_id: DocumentId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSession {
    pub token: String,
    pub user_id: DocumentId,
}
