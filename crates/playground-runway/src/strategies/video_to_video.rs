use playground_core::{
    error::PlaygroundError,
    model::{EndpointKind, MediaKind},
    provider::GenerationParams,
};

use crate::{
    api_v1::{MediaReference, VideoToVideoRequest},
    client::RunwayClient,
};

use super::{GenerationStrategy, StrategyFuture, run_for_output};

/// Restyle a source video. The first asset is the video; any further assets
/// are image references.
#[derive(Debug, Clone, Copy, Default)]
pub struct VideoToVideo;

impl VideoToVideo {
    pub fn request(params: &GenerationParams) -> Result<VideoToVideoRequest, PlaygroundError> {
        let Some((video, references)) = params.assets.split_first() else {
            return Err(PlaygroundError::InvalidRequest(
                "video-to-video requires at least one video input".into(),
            ));
        };

        let references = references
            .iter()
            .map(|asset| MediaReference::new(MediaKind::Image, asset.url.clone()))
            .collect();

        let request = VideoToVideoRequest::new(params.model.as_str(), params.prompt_text.clone(), video.url.clone())
            .references(references);

        Ok(match &params.ratio {
            Some(ratio) => request.ratio(ratio.clone()),
            None => request,
        })
    }
}

impl GenerationStrategy for VideoToVideo {
    fn endpoint(&self) -> EndpointKind {
        EndpointKind::VideoToVideo
    }

    fn execute<'s>(&'s self, client: &'s RunwayClient, params: GenerationParams) -> StrategyFuture<'s> {
        Box::pin(async move {
            let request = Self::request(&params)?;
            run_for_output(client, EndpointKind::VideoToVideo, &request, MediaKind::Video).await
        })
    }
}
