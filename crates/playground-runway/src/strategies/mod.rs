//! One request-building routine per Runway endpoint kind.
//!
//! Every strategy receives the same [`GenerationParams`] bundle (model,
//! prompt, assets, ratio, additional params) and returns the single output
//! of the task it created. Strategies never rewrite the model: substitution
//! rules are already applied by [`playground_core::registry::ModelRegistry::plan`].

mod character_performance;
mod image_to_video;
mod text_to_image;
mod text_to_video;
mod video_to_video;
mod video_upscale;

use std::{collections::BTreeMap, fmt, future::Future, pin::Pin};

use playground_core::{
    error::{PlaygroundError, Result},
    model::{EndpointKind, MediaKind},
    provider::{GenerationParams, GenerationResult},
};
use serde::Serialize;

use crate::client::RunwayClient;

pub use character_performance::CharacterPerformance;
pub use image_to_video::ImageToVideo;
pub use text_to_image::TextToImage;
pub use text_to_video::TextToVideo;
pub use video_to_video::VideoToVideo;
pub use video_upscale::VideoUpscale;

pub type StrategyFuture<'s> = Pin<Box<dyn Future<Output = Result<GenerationResult>> + Send + 's>>;

/// Builds the request for one endpoint kind and waits for its output.
pub trait GenerationStrategy: Send + Sync {
    fn endpoint(&self) -> EndpointKind;

    fn execute<'s>(&'s self, client: &'s RunwayClient, params: GenerationParams) -> StrategyFuture<'s>;
}

/// Fixed lookup from endpoint kind to strategy.
pub struct StrategyTable {
    strategies: BTreeMap<EndpointKind, Box<dyn GenerationStrategy>>,
}

impl StrategyTable {
    pub fn empty() -> Self {
        Self {
            strategies: BTreeMap::new(),
        }
    }

    /// All six Runway endpoints.
    pub fn builtin() -> Self {
        Self::empty()
            .with(TextToImage)
            .with(ImageToVideo)
            .with(TextToVideo)
            .with(VideoToVideo)
            .with(VideoUpscale)
            .with(CharacterPerformance)
    }

    /// Register `strategy` under its endpoint, replacing any previous one.
    pub fn with(mut self, strategy: impl GenerationStrategy + 'static) -> Self {
        self.strategies.insert(strategy.endpoint(), Box::new(strategy));
        self
    }

    pub fn dispatch(&self, endpoint: EndpointKind) -> Result<&dyn GenerationStrategy> {
        self.strategies
            .get(&endpoint)
            .map(|strategy| &**strategy)
            .ok_or_else(|| PlaygroundError::NoStrategyForEndpoint {
                endpoint: endpoint.as_str().to_owned(),
            })
    }

    /// Look a strategy up by its wire name (`text_to_image`, …).
    pub fn dispatch_name(&self, endpoint: &str) -> Result<&dyn GenerationStrategy> {
        self.dispatch(endpoint.parse()?)
    }

    pub fn endpoints(&self) -> impl Iterator<Item = EndpointKind> + '_ {
        self.strategies.keys().copied()
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for StrategyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.strategies.keys()).finish()
    }
}

/// Create a task on `endpoint`, wait for it, and take its first output.
pub(crate) async fn run_for_output<B>(
    client: &RunwayClient,
    endpoint: EndpointKind,
    body: &B,
    media_kind: MediaKind,
) -> Result<GenerationResult>
where
    B: Serialize + Sync,
{
    let task = client.run_task(endpoint, body).await?;

    let Some(url) = task.first_output() else {
        return Err(PlaygroundError::NoOutputProduced { endpoint });
    };

    tracing::info!(task_id = %task.id, %endpoint, "Runway task succeeded");
    Ok(GenerationResult {
        url: url.to_owned(),
        media_kind,
        task_id: task.id.clone(),
    })
}

/// Duration in whole seconds, falling back to `default` when the caller
/// did not set one.
pub(crate) fn duration_or(params: &GenerationParams, default: u32) -> u32 {
    params
        .number_param("duration")
        .map(|seconds| seconds as u32)
        .unwrap_or(default)
}
