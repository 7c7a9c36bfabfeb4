//! Wire types of the Supabase auth, PostgREST and storage endpoints used by
//! the store.

use serde::{Deserialize, Serialize};

/// `GET /auth/v1/user`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserMetadata {
    /// Saved from the settings page.
    #[serde(default)]
    pub runway_api_key: Option<String>,
}

/// Body of `DELETE /storage/v1/object/{bucket}`.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveObjects<'a> {
    pub prefixes: Vec<&'a str>,
}

/// Body of `POST /storage/v1/object/sign/{bucket}/{path}`.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignObject {
    pub expires_in: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignedObject {
    /// Path relative to `/storage/v1`, query string included.
    #[serde(rename = "signedURL")]
    pub signed_url: String,
}
