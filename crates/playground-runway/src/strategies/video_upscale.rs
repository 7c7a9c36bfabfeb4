use playground_core::{
    error::PlaygroundError,
    model::{EndpointKind, MediaKind},
    provider::GenerationParams,
};

use crate::{api_v1::VideoUpscaleRequest, client::RunwayClient};

use super::{GenerationStrategy, StrategyFuture, run_for_output};

/// Upscale exactly one source video.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoUpscale;

impl VideoUpscale {
    pub fn request(params: &GenerationParams) -> Result<VideoUpscaleRequest, PlaygroundError> {
        let [video] = params.assets.as_slice() else {
            return Err(PlaygroundError::InvalidRequest(format!(
                "video upscale requires exactly one video input, got {}",
                params.assets.len()
            )));
        };

        Ok(VideoUpscaleRequest {
            model: params.model.as_str().to_owned(),
            video_uri: video.url.clone(),
        })
    }
}

impl GenerationStrategy for VideoUpscale {
    fn endpoint(&self) -> EndpointKind {
        EndpointKind::VideoUpscale
    }

    fn execute<'s>(&'s self, client: &'s RunwayClient, params: GenerationParams) -> StrategyFuture<'s> {
        Box::pin(async move {
            let request = Self::request(&params)?;
            run_for_output(client, EndpointKind::VideoUpscale, &request, MediaKind::Video).await
        })
    }
}
