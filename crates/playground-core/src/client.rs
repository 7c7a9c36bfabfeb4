//! Generic, lightweight client that validates a generation request against the
//! [`ModelRegistry`] and executes it on a single concrete backend.
//!
//! The client is **generic over the backend type `B`**, so no dynamic dispatch
//! appears in user code and any crate implementing [`GenerationProvider`]
//! (the Runway adapter, a test double, …) works out of the box.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use playground_core::{
//!     PlaygroundClient,
//!     client::GenerationRequest,
//!     model::GenerationType,
//!     provider::GenerationProvider,
//!     registry::ModelRegistry,
//! };
//!
//! async fn render<B: GenerationProvider>(backend: B) -> playground_core::error::Result<String> {
//!     let client = PlaygroundClient::new(backend, Arc::new(ModelRegistry::builtin()));
//!     let request = GenerationRequest::new("gen4_image", GenerationType::Image, "a lighthouse at dusk")
//!         .with_ratio("1920:1080");
//!     Ok(client.generate(request).await?.result.url)
//! }
//! ```
use std::sync::Arc;

use crate::{
    error::Result,
    model::{AdditionalParams, GenerationType, ModelId},
    provider::{Asset, GenerationParams, GenerationProvider, GenerationResult},
    registry::{GenerationPlan, ModelRegistry},
    validation::{ValidationInput, Validator},
};

/// Everything a caller supplies for one generation.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub model: String,
    pub generation_type: GenerationType,
    pub prompt_text: String,
    pub assets: Vec<Asset>,
    pub ratio: String,
    pub additional_params: AdditionalParams,
}

impl GenerationRequest {
    pub fn new(
        model: impl Into<String>,
        generation_type: GenerationType,
        prompt_text: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            generation_type,
            prompt_text: prompt_text.into(),
            assets: Vec::new(),
            ratio: String::new(),
            additional_params: AdditionalParams::new(),
        }
    }

    pub fn with_assets(mut self, assets: Vec<Asset>) -> Self {
        self.assets = assets;
        self
    }

    pub fn with_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.ratio = ratio.into();
        self
    }

    pub fn with_additional_params(mut self, params: AdditionalParams) -> Self {
        self.additional_params = params;
        self
    }
}

/// What was requested, what actually ran, and what came out.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub requested: ModelId,
    pub plan: GenerationPlan,
    pub result: GenerationResult,
}

/// A client bound to a single provider and a shared registry.
///
/// Clone the client if you need to share it across tasks; both halves sit
/// behind an `Arc`.
#[derive(Debug)]
pub struct PlaygroundClient<B> {
    backend: Arc<B>,
    registry: Arc<ModelRegistry>,
}

impl<B> Clone for PlaygroundClient<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<B> PlaygroundClient<B>
where
    B: GenerationProvider,
{
    /// Create a new client that delegates all calls to `backend`.
    pub fn new(backend: B, registry: Arc<ModelRegistry>) -> Self {
        Self {
            backend: Arc::new(backend),
            registry,
        }
    }

    /// Access the underlying backend (e.g. to tweak provider-specific settings).
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Validate `request`, apply the model's substitution rules and run the
    /// matching strategy on the backend.
    ///
    /// Validation failures are returned before any network call is made.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationOutcome> {
        let inputs: Vec<ValidationInput> = request.assets.iter().map(Into::into).collect();

        let requested = Validator::new(&self.registry).validate(
            &request.model,
            request.generation_type,
            &request.prompt_text,
            &inputs,
            &request.ratio,
            Some(&request.additional_params),
        )?;

        let plan = self.registry.plan(requested, !request.assets.is_empty())?;
        if plan.model != requested {
            tracing::debug!(
                requested = %requested,
                model = %plan.model,
                "substituting reference variant"
            );
        }

        let additional_params = self
            .registry
            .definition_of(plan.model)?
            .params_with_defaults(&request.additional_params);

        let params = GenerationParams::new(plan.model, request.prompt_text)
            .with_assets(request.assets)
            .with_ratio(request.ratio)
            .with_additional_params(additional_params);

        tracing::debug!(model = %plan.model, endpoint = %plan.endpoint, "dispatching generation");
        let result = self.backend.generate(plan.endpoint, params).await?;

        Ok(GenerationOutcome {
            requested,
            plan,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::{future::Future, pin::Pin, sync::Mutex};

    use bytes::Bytes;

    use super::*;
    use crate::{
        error::PlaygroundError,
        model::{EndpointKind, MediaKind},
        provider::DownloadedMedia,
    };

    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<(EndpointKind, String, usize)>>,
        params: Mutex<Vec<AdditionalParams>>,
    }

    impl GenerationProvider for Recording {
        fn generate<'p>(
            &'p self,
            endpoint: EndpointKind,
            params: GenerationParams,
        ) -> Pin<Box<dyn Future<Output = Result<GenerationResult>> + Send + 'p>> {
            self.calls.lock().unwrap().push((
                endpoint,
                params.model.as_str().to_owned(),
                params.assets.len(),
            ));
            self.params.lock().unwrap().push(params.additional_params);
            Box::pin(async move {
                Ok(GenerationResult {
                    url: "https://cdn.example/out".into(),
                    media_kind: MediaKind::Image,
                    task_id: "task-1".into(),
                })
            })
        }

        fn download<'p>(
            &'p self,
            _url: &'p str,
        ) -> Pin<Box<dyn Future<Output = Result<DownloadedMedia>> + Send + 'p>> {
            Box::pin(async move {
                Ok(DownloadedMedia {
                    data: Bytes::from_static(b"img"),
                    content_type: None,
                })
            })
        }
    }

    fn client() -> PlaygroundClient<Recording> {
        PlaygroundClient::new(Recording::default(), Arc::new(ModelRegistry::builtin()))
    }

    #[tokio::test]
    async fn invalid_requests_never_reach_the_backend() {
        let client = client();
        let request = GenerationRequest::new("gen4_image_turbo", GenerationType::Image, "")
            .with_ratio("1920:1080");

        let err = client.generate(request).await.unwrap_err();
        assert!(err.is_validation());
        assert!(client.backend().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn references_switch_gen4_image_to_turbo() {
        let client = client();
        let request = GenerationRequest::new("gen4_image", GenerationType::Image, "a fox")
            .with_ratio("1024:1024")
            .with_assets(vec![Asset::new(MediaKind::Image, "https://x/ref.png").with_tag("fox")]);

        let outcome = client.generate(request).await.unwrap();
        assert_eq!(outcome.requested.as_str(), "gen4_image");
        assert_eq!(outcome.plan.model.as_str(), "gen4_image_turbo");
        assert_eq!(
            client.backend().calls.lock().unwrap()[0],
            (EndpointKind::TextToImage, "gen4_image_turbo".to_owned(), 1)
        );
    }

    #[tokio::test]
    async fn text_only_video_uses_text_endpoint() {
        let client = client();
        let request = GenerationRequest::new("veo3_text", GenerationType::Video, "waves")
            .with_ratio("1280:720");

        let outcome = client.generate(request).await.unwrap();
        assert_eq!(outcome.plan.endpoint, EndpointKind::TextToVideo);
        assert_eq!(outcome.requested.as_str(), "veo3");
    }

    #[tokio::test]
    async fn declared_param_defaults_are_dispatched() {
        let client = client();
        let request = GenerationRequest::new("gen4.5", GenerationType::Video, "rain")
            .with_ratio("1280:720");

        let outcome = client.generate(request).await.unwrap();
        assert_eq!(outcome.plan.endpoint, EndpointKind::TextToVideo);
        assert_eq!(
            client.backend().params.lock().unwrap()[0]["duration"],
            crate::model::ParamValue::Number(10.0)
        );
    }

    #[tokio::test]
    async fn unknown_model_is_a_validation_error() {
        let err = client()
            .generate(GenerationRequest::new("dalle", GenerationType::Image, "x"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlaygroundError::Validation(_)));
    }
}
