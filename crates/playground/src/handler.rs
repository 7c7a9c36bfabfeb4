//! The generate route: authenticate the caller, resolve the model and the
//! prompt, validate, run the generation on the caller's own Runway key, and
//! persist the output next to the prompt.
//!
//! The handler is transport-agnostic. A web layer deserialises
//! [`GenerateRequest`], calls [`GenerationHandler::generate`] and renders
//! either [`GenerateResponse`] or [`HandlerError::body`] with
//! [`HandlerError::status_code`].

use std::{sync::Arc, time::Duration};

use playground_core::{
    PlaygroundClient,
    client::GenerationRequest,
    error::PlaygroundError,
    model::{AdditionalParams, GenerationType, MediaKind},
    provider::{Asset, BackendFactory, GenerationProvider},
    registry::ModelRegistry,
    schema_util::derive_schema,
    store::{Caller, IdentityProvider, MediaCategory, MediaStore, NewMediaRecord},
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PlaygroundConfig;

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt_id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub generation_type: Option<GenerationType>,
    /// Media inputs. When empty, the prompt's stored input media are used.
    #[serde(default)]
    pub assets: Vec<Asset>,
    /// Falls back to the ratio stored with the prompt.
    #[serde(default)]
    pub ratio: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_params: Option<AdditionalParams>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Runway API key not set in settings")]
    MissingApiKey,

    #[error("Missing required parameters")]
    MissingParameters,

    #[error("Prompt not found")]
    PromptNotFound,

    #[error(transparent)]
    Playground(#[from] PlaygroundError),
}

impl HandlerError {
    /// HTTP status the web layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::Unauthorized => 401,
            HandlerError::MissingApiKey | HandlerError::MissingParameters => 400,
            HandlerError::PromptNotFound => 404,
            HandlerError::Playground(
                PlaygroundError::Validation(_) | PlaygroundError::InvalidRequest(_),
            ) => 400,
            HandlerError::Playground(_) => 500,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            message: self.to_string(),
        }
    }
}

/// JSON schema of [`GenerateRequest`], for API docs and client-side checks.
pub fn request_schema() -> Result<serde_json::Value, PlaygroundError> {
    derive_schema::<GenerateRequest>()
}

/// Where a generated output ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedOutput {
    pub media_id: String,
    pub path: String,
    pub media_kind: MediaKind,
}

/// Route handler over an identity provider `I`, a media store `S` and a
/// backend factory `F` that connects with each caller's API key.
pub struct GenerationHandler<I, S, F> {
    identity: I,
    store: S,
    factory: F,
    registry: Arc<ModelRegistry>,
    signed_url_ttl: Duration,
}

impl<I, S, F> GenerationHandler<I, S, F>
where
    I: IdentityProvider,
    S: MediaStore,
    F: BackendFactory,
{
    pub fn new(identity: I, store: S, factory: F, registry: Arc<ModelRegistry>) -> Self {
        Self {
            identity,
            store,
            factory,
            registry,
            signed_url_ttl: PlaygroundConfig::default().signed_url_ttl,
        }
    }

    pub fn with_config(mut self, config: &PlaygroundConfig) -> Self {
        self.signed_url_ttl = config.signed_url_ttl;
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    async fn caller(&self, access_token: &str) -> Result<Caller, HandlerError> {
        self.identity
            .authenticate(access_token)
            .await?
            .ok_or(HandlerError::Unauthorized)
    }

    /// Run one generation and persist its output under
    /// `{user_id}/{prompt_id}.{ext}`.
    pub async fn generate(
        &self,
        access_token: &str,
        request: GenerateRequest,
    ) -> Result<GenerateResponse, HandlerError> {
        self.generate_output(access_token, request).await?;
        Ok(GenerateResponse { success: true })
    }

    /// Like [`Self::generate`], returning the stored row.
    pub async fn generate_output(
        &self,
        access_token: &str,
        request: GenerateRequest,
    ) -> Result<PersistedOutput, HandlerError> {
        let caller = self.caller(access_token).await?;
        let api_key = caller
            .runway_api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or(HandlerError::MissingApiKey)?;

        let generation_type = match request.generation_type {
            Some(generation_type) if !request.prompt_id.is_empty() && !request.model.is_empty() => {
                generation_type
            }
            _ => return Err(HandlerError::MissingParameters),
        };

        let model = self
            .registry
            .resolve(&request.model)
            .map_err(PlaygroundError::from)?;

        let prompt = self
            .store
            .fetch_prompt(&caller, &request.prompt_id)
            .await?
            .ok_or(HandlerError::PromptNotFound)?;

        let assets = if request.assets.is_empty() {
            self.stored_inputs(&caller, &request.prompt_id).await?
        } else {
            request.assets
        };

        let ratio = if request.ratio.is_empty() {
            prompt.ratio.unwrap_or_default()
        } else {
            request.ratio
        };

        let generation = GenerationRequest::new(model.as_str(), generation_type, prompt.prompt_text)
            .with_assets(assets)
            .with_ratio(ratio)
            .with_additional_params(request.additional_params.unwrap_or_default());

        let client = PlaygroundClient::new(self.factory.connect(&api_key)?, Arc::clone(&self.registry));
        let outcome = client.generate(generation).await?;
        let media_kind = outcome.result.media_kind;

        let media = client.backend().download(&outcome.result.url).await?;
        let content_type = media
            .content_type
            .clone()
            .unwrap_or_else(|| default_content_type(media_kind).to_owned());
        let path = format!(
            "{}/{}.{}",
            caller.user_id,
            request.prompt_id,
            extension_for(media.content_type.as_deref(), media_kind)
        );

        // Regeneration overwrites the object an earlier output row points at.
        let replaces_output = self
            .store
            .fetch_media(&caller, &request.prompt_id, MediaCategory::Output)
            .await?
            .iter()
            .any(|row| row.path == path);

        self.store
            .upload_object(&caller, &path, media.data, &content_type)
            .await?;

        let record = NewMediaRecord {
            prompt_id: request.prompt_id.clone(),
            path: path.clone(),
            kind: media_kind,
            category: MediaCategory::Output,
            tag: None,
            position: None,
            user_id: caller.user_id.clone(),
        };

        let row = match self.store.insert_media(&caller, record).await {
            Ok(row) => row,
            Err(err) if replaces_output => {
                tracing::warn!(%path, error = %err, "media row insert failed, keeping object of the earlier output");
                return Err(err.into());
            }
            Err(err) => {
                tracing::warn!(%path, error = %err, "media row insert failed, removing uploaded object");
                if let Err(cleanup) = self.store.remove_object(&caller, &path).await {
                    tracing::warn!(%path, error = %cleanup, "could not remove orphaned object");
                }
                return Err(err.into());
            }
        };

        tracing::info!(
            prompt_id = %request.prompt_id,
            model = %outcome.plan.model,
            task_id = %outcome.result.task_id,
            %path,
            "generation persisted"
        );

        Ok(PersistedOutput {
            media_id: row.id,
            path,
            media_kind,
        })
    }

    async fn stored_inputs(&self, caller: &Caller, prompt_id: &str) -> Result<Vec<Asset>, HandlerError> {
        let rows = self
            .store
            .fetch_media(caller, prompt_id, MediaCategory::Input)
            .await?;

        let mut assets = Vec::with_capacity(rows.len());
        for row in rows {
            let url = self.store.sign_url(caller, &row.path, self.signed_url_ttl).await?;
            assets.push(Asset {
                url,
                kind: row.kind,
                tag: row.tag,
                position: row.position,
            });
        }
        Ok(assets)
    }

    /// Remove a prompt's generated outputs (rows and objects) before it is
    /// regenerated. Returns how many outputs were removed.
    pub async fn discard_outputs(&self, access_token: &str, prompt_id: &str) -> Result<usize, HandlerError> {
        let caller = self.caller(access_token).await?;
        if prompt_id.is_empty() {
            return Err(HandlerError::MissingParameters);
        }

        let outputs = self
            .store
            .fetch_media(&caller, prompt_id, MediaCategory::Output)
            .await?;

        for output in &outputs {
            self.store.remove_object(&caller, &output.path).await?;
            self.store.delete_media(&caller, &output.id).await?;
        }

        tracing::debug!(prompt_id, removed = outputs.len(), "discarded outputs");
        Ok(outputs.len())
    }
}

#[cfg(feature = "runway")]
mod organization {
    use chrono::{NaiveDate, Utc};
    use playground_core::{provider::BackendFactory, store::IdentityProvider, store::MediaStore};
    use playground_runway::{
        RunwayBackendFactory,
        api_v1::{OrganizationDetails, OrganizationUsage, UsageQuery},
    };
    use serde::Serialize;

    use super::{GenerationHandler, HandlerError};

    /// Organization tier, credit balance and credit usage.
    #[derive(Debug, Clone, PartialEq, Serialize)]
    pub struct OrganizationReport {
        pub organization: OrganizationDetails,
        pub usage: OrganizationUsage,
    }

    impl<I, S> GenerationHandler<I, S, RunwayBackendFactory>
    where
        I: IdentityProvider,
        S: MediaStore,
    {
        /// Organization details and usage for the caller's key, without
        /// retired models. Missing bounds default to the trailing month.
        pub async fn organization_report(
            &self,
            access_token: &str,
            start_date: Option<NaiveDate>,
            before_date: Option<NaiveDate>,
        ) -> Result<OrganizationReport, HandlerError> {
            let caller = self.caller(access_token).await?;
            let api_key = caller
                .runway_api_key
                .filter(|key| !key.is_empty())
                .ok_or(HandlerError::MissingApiKey)?;

            let adapter = self.factory.connect(&api_key)?;
            let query = UsageQuery::with_defaults(start_date, before_date, Utc::now().date_naive());

            Ok(OrganizationReport {
                organization: adapter.organization_details().await?,
                usage: adapter.organization_usage(query).await?,
            })
        }
    }
}

#[cfg(feature = "runway")]
pub use organization::OrganizationReport;

fn default_content_type(kind: MediaKind) -> &'static str {
    match kind {
        MediaKind::Image => "image/jpeg",
        MediaKind::Video => "video/mp4",
    }
}

/// File extension for a downloaded output, from its `Content-Type` when
/// recognised.
pub fn extension_for(content_type: Option<&str>, kind: MediaKind) -> &'static str {
    let essence = content_type
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase());

    match essence.as_deref() {
        Some("image/jpeg" | "image/jpg") => "jpg",
        Some("image/png") => "png",
        Some("image/webp") => "webp",
        Some("image/gif") => "gif",
        Some("video/mp4") => "mp4",
        Some("video/webm") => "webm",
        Some("video/quicktime") => "mov",
        _ => match kind {
            MediaKind::Image => "jpg",
            MediaKind::Video => "mp4",
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_follows_content_type() {
        assert_eq!(extension_for(Some("image/png"), MediaKind::Image), "png");
        assert_eq!(extension_for(Some("Video/WebM; codecs=vp9"), MediaKind::Video), "webm");
        assert_eq!(extension_for(Some("application/octet-stream"), MediaKind::Video), "mp4");
        assert_eq!(extension_for(None, MediaKind::Image), "jpg");
    }

    #[test]
    fn status_codes() {
        assert_eq!(HandlerError::Unauthorized.status_code(), 401);
        assert_eq!(HandlerError::MissingApiKey.status_code(), 400);
        assert_eq!(HandlerError::PromptNotFound.status_code(), 404);

        let validation: HandlerError = PlaygroundError::from(
            playground_core::error::ValidationError::UnknownModel { model: "x".into() },
        )
        .into();
        assert_eq!(validation.status_code(), 400);

        let remote: HandlerError = PlaygroundError::RemoteGenerationFailed {
            task_id: "t".into(),
            failure: "moderated".into(),
            code: None,
        }
        .into();
        assert_eq!(remote.status_code(), 500);
        assert_eq!(remote.body().message, "generation failed: moderated");
    }

    #[test]
    fn request_uses_camel_case_and_defaults() {
        let request: GenerateRequest = serde_json::from_value(serde_json::json!({
            "promptId": "p1",
            "model": "gen4_image",
            "generationType": "image",
            "assets": [{"url": "https://x/a.png", "type": "image", "tag": "cat"}]
        }))
        .unwrap();

        assert_eq!(request.prompt_id, "p1");
        assert_eq!(request.generation_type, Some(GenerationType::Image));
        assert_eq!(request.assets[0].tag.as_deref(), Some("cat"));
        assert!(request.ratio.is_empty());
        assert!(request.additional_params.is_none());
    }

    #[test]
    fn schema_lists_request_fields() {
        let schema = request_schema().unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for field in ["promptId", "model", "generationType", "assets", "ratio", "additionalParams"] {
            assert!(properties.contains_key(field), "{field}");
        }
    }
}
