use playground_core::error::PlaygroundError;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t (de)serialise body: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Supabase returned non-success status {status}: {body}")]
    Api { status: StatusCode, body: String },

    #[error("Supabase format error: {0}")]
    Format(String),
}

impl From<SupabaseError> for PlaygroundError {
    fn from(value: SupabaseError) -> Self {
        PlaygroundError::Storage(Box::new(value))
    }
}
