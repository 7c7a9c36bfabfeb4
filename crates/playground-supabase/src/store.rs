use std::{env, future::Future, pin::Pin, sync::Arc, time::Duration};

use bytes::Bytes;
use playground_core::{
    error::{PlaygroundError, Result},
    store::{
        Caller, IdentityProvider, MediaCategory, MediaRecord, MediaStore, NewMediaRecord,
        PromptRecord,
    },
};

use crate::client::SupabaseClient;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

const PROMPT_COLUMNS: &str = "id,prompt_text,model,generation_type,ratio";
const MEDIA_COLUMNS: &str = "id,prompt_id,path,type,category,tag,position,user_id";

/// Prompts, media rows and media objects kept in a Supabase project.
#[derive(Clone)]
pub struct SupabaseStore {
    client: Arc<SupabaseClient>,
}

impl SupabaseStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn client(&self) -> &SupabaseClient {
        &self.client
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

impl IdentityProvider for SupabaseStore {
    fn authenticate<'a>(&'a self, access_token: &'a str) -> BoxFuture<'a, Option<Caller>> {
        Box::pin(async move {
            let Some(user) = self.client.user(access_token).await? else {
                tracing::debug!("session token rejected");
                return Ok(None);
            };

            Ok(Some(Caller {
                user_id: user.id,
                access_token: access_token.to_owned(),
                runway_api_key: user
                    .user_metadata
                    .runway_api_key
                    .filter(|key| !key.is_empty()),
            }))
        })
    }
}

impl MediaStore for SupabaseStore {
    fn fetch_prompt<'a>(&'a self, caller: &'a Caller, prompt_id: &'a str) -> BoxFuture<'a, Option<PromptRecord>> {
        Box::pin(async move {
            let query = [("id", eq(prompt_id)), ("select", PROMPT_COLUMNS.to_owned())];
            let mut rows: Vec<PromptRecord> = self
                .client
                .select(&caller.access_token, "prompts", &query)
                .await?;
            Ok(rows.pop())
        })
    }

    fn fetch_media<'a>(
        &'a self,
        caller: &'a Caller,
        prompt_id: &'a str,
        category: MediaCategory,
    ) -> BoxFuture<'a, Vec<MediaRecord>> {
        Box::pin(async move {
            let query = [
                ("prompt_id", eq(prompt_id)),
                ("category", eq(category.as_str())),
                ("select", MEDIA_COLUMNS.to_owned()),
            ];
            Ok(self.client.select(&caller.access_token, "media", &query).await?)
        })
    }

    fn insert_media<'a>(&'a self, caller: &'a Caller, record: NewMediaRecord) -> BoxFuture<'a, MediaRecord> {
        Box::pin(async move {
            let row: MediaRecord = self
                .client
                .insert(&caller.access_token, "media", &record)
                .await?;
            tracing::debug!(media_id = %row.id, path = %row.path, "inserted media row");
            Ok(row)
        })
    }

    fn delete_media<'a>(&'a self, caller: &'a Caller, media_id: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            Ok(self
                .client
                .delete(&caller.access_token, "media", &[("id", eq(media_id))])
                .await?)
        })
    }

    fn upload_object<'a>(
        &'a self,
        caller: &'a Caller,
        path: &'a str,
        data: Bytes,
        content_type: &'a str,
    ) -> BoxFuture<'a, ()> {
        Box::pin(async move {
            let size = data.len();
            self.client
                .upload(&caller.access_token, path, data, content_type)
                .await?;
            tracing::debug!(path, size, content_type, "uploaded object");
            Ok(())
        })
    }

    fn remove_object<'a>(&'a self, caller: &'a Caller, path: &'a str) -> BoxFuture<'a, ()> {
        Box::pin(async move { Ok(self.client.remove(&caller.access_token, &[path]).await?) })
    }

    fn sign_url<'a>(&'a self, caller: &'a Caller, path: &'a str, ttl: Duration) -> BoxFuture<'a, String> {
        Box::pin(async move { Ok(self.client.sign(&caller.access_token, path, ttl).await?) })
    }
}

/// Builder for [`SupabaseStore`].
///
/// ```rust,no_run
/// use playground_supabase::SupabaseStoreBuilder;
///
/// let store = SupabaseStoreBuilder::new_from_env()
///     .build()
///     .expect("SUPABASE_URL and SUPABASE_ANON_KEY must be set");
/// ```
#[derive(Debug, Default, Clone)]
pub struct SupabaseStoreBuilder {
    pub(crate) url: Option<String>,
    pub(crate) anon_key: Option<String>,
    pub(crate) bucket: Option<String>,
}

impl SupabaseStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `SUPABASE_MEDIA_BUCKET`.
    /// Missing values only surface during [`Self::build`].
    pub fn new_from_env() -> Self {
        Self {
            url: env::var("SUPABASE_URL").ok(),
            anon_key: env::var("SUPABASE_ANON_KEY").ok(),
            bucket: env::var("SUPABASE_MEDIA_BUCKET").ok(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_anon_key(mut self, anon_key: impl Into<String>) -> Self {
        self.anon_key = Some(anon_key.into());
        self
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// # Errors
    ///
    /// * [`PlaygroundError::Invalid`] – URL or anon key missing.
    /// * [`PlaygroundError::Storage`] – the HTTP client can't be built.
    pub fn build(self) -> Result<SupabaseStore> {
        let url = self.url.ok_or(PlaygroundError::Invalid(
            "missing env variable: `SUPABASE_URL`".into(),
        ))?;
        let anon_key = self.anon_key.ok_or(PlaygroundError::Invalid(
            "missing env variable: `SUPABASE_ANON_KEY`".into(),
        ))?;

        let mut client = SupabaseClient::new(url, anon_key).map_err(PlaygroundError::from)?;
        if let Some(bucket) = self.bucket.filter(|bucket| !bucket.is_empty()) {
            client = client.with_bucket(bucket);
        }
        Ok(SupabaseStore::new(client))
    }
}

impl From<SupabaseClient> for SupabaseStore {
    fn from(client: SupabaseClient) -> Self {
        Self::new(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SupabaseError;

    #[test]
    fn builder_requires_url_and_key() {
        assert!(matches!(
            SupabaseStoreBuilder::new().with_anon_key("anon").build(),
            Err(PlaygroundError::Invalid(message)) if message.contains("SUPABASE_URL")
        ));
        assert!(SupabaseStoreBuilder::new().with_url("http://localhost").build().is_err());
    }

    #[test]
    fn bucket_defaults_to_media() {
        let store = SupabaseStoreBuilder::new()
            .with_url("http://localhost:54321/")
            .with_anon_key("anon")
            .build()
            .unwrap();
        assert_eq!(store.client().bucket(), "media");
    }

    #[test]
    fn storage_errors_map_to_storage_failures() {
        let err: PlaygroundError = SupabaseError::Format("x".into()).into();
        assert!(matches!(err, PlaygroundError::Storage(_)));
    }
}
