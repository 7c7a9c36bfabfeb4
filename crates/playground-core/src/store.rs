//! Contracts for the storage / identity collaborator.
//!
//! The playground never owns its data: prompts and media rows live in a
//! relational store, binaries in an object store, and users are authenticated
//! by an external session provider. These traits describe exactly the
//! operations the route handler needs (fetch-by-id, insert, delete,
//! upload-blob, sign-url) so any backend (a hosted BaaS, an in-memory fake)
//! can be plugged in.

use std::{fmt, future::Future, pin::Pin, str::FromStr, time::Duration};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{
    error::{PlaygroundError, Result},
    model::{GenerationType, MediaKind, Position},
};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// An authenticated end user.
#[derive(Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    /// Session token, forwarded to the store so row-level security applies.
    pub access_token: String,
    /// The user's own generative-API credential, if they saved one.
    pub runway_api_key: Option<String>,
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caller")
            .field("user_id", &self.user_id)
            .field("runway_api_key", &self.runway_api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    pub id: String,
    pub prompt_text: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub generation_type: Option<GenerationType>,
    #[serde(default)]
    pub ratio: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaCategory {
    Input,
    Output,
}

impl MediaCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaCategory::Input => "input",
            MediaCategory::Output => "output",
        }
    }
}

impl FromStr for MediaCategory {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "input" => Ok(MediaCategory::Input),
            "output" => Ok(MediaCategory::Output),
            other => Err(PlaygroundError::Invalid(format!("unknown media category `{other}`"))),
        }
    }
}

/// A stored media row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: String,
    pub prompt_id: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub category: MediaCategory,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
    pub user_id: String,
}

/// A media row about to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMediaRecord {
    pub prompt_id: String,
    pub path: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    pub category: MediaCategory,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    pub user_id: String,
}

/// Session / auth mechanism.
pub trait IdentityProvider: Send + Sync {
    /// Resolve a session token. `Ok(None)` means the token is not valid.
    fn authenticate<'a>(&'a self, access_token: &'a str) -> BoxFuture<'a, Option<Caller>>;
}

/// Relational rows plus object storage.
pub trait MediaStore: Send + Sync {
    fn fetch_prompt<'a>(
        &'a self,
        caller: &'a Caller,
        prompt_id: &'a str,
    ) -> BoxFuture<'a, Option<PromptRecord>>;

    fn fetch_media<'a>(
        &'a self,
        caller: &'a Caller,
        prompt_id: &'a str,
        category: MediaCategory,
    ) -> BoxFuture<'a, Vec<MediaRecord>>;

    fn insert_media<'a>(&'a self, caller: &'a Caller, record: NewMediaRecord) -> BoxFuture<'a, MediaRecord>;

    fn delete_media<'a>(&'a self, caller: &'a Caller, media_id: &'a str) -> BoxFuture<'a, ()>;

    fn upload_object<'a>(
        &'a self,
        caller: &'a Caller,
        path: &'a str,
        data: Bytes,
        content_type: &'a str,
    ) -> BoxFuture<'a, ()>;

    fn remove_object<'a>(&'a self, caller: &'a Caller, path: &'a str) -> BoxFuture<'a, ()>;

    /// A time-limited URL for reading the object at `path`.
    fn sign_url<'a>(&'a self, caller: &'a Caller, path: &'a str, ttl: Duration) -> BoxFuture<'a, String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_rows_use_storage_column_names() {
        let row: MediaRecord = serde_json::from_value(serde_json::json!({
            "id": "m1",
            "prompt_id": "p1",
            "path": "u1/p1.mp4",
            "type": "video",
            "category": "output",
            "tag": null,
            "user_id": "u1"
        }))
        .unwrap();
        assert_eq!(row.kind, MediaKind::Video);
        assert_eq!(row.category, MediaCategory::Output);
        assert_eq!(row.position, None);
    }

    #[test]
    fn caller_debug_hides_secrets() {
        let caller = Caller {
            user_id: "u1".into(),
            access_token: "jwt".into(),
            runway_api_key: Some("key_123".into()),
        };
        let rendered = format!("{caller:?}");
        assert!(!rendered.contains("jwt"));
        assert!(!rendered.contains("key_123"));
    }
}
