use playground_core::{
    error::Result,
    model::{EndpointKind, MediaKind},
    provider::{Asset, GenerationParams},
};

use crate::{
    api_v1::{ImageToVideoRequest, PromptImage, PromptKeyframe, TextToImageRequest},
    client::RunwayClient,
};

use super::{GenerationStrategy, StrategyFuture, duration_or, run_for_output};

const DEFAULT_DURATION: u32 = 10;
const INTERMEDIATE_IMAGE_MODEL: &str = "gen4_image";

/// Animate one or more keyframes. Without any asset a first frame is
/// generated from the prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageToVideo;

impl ImageToVideo {
    pub fn request(params: &GenerationParams, prompt_image: PromptImage) -> ImageToVideoRequest {
        let mut request = ImageToVideoRequest::new(params.model.as_str(), prompt_image)
            .duration(duration_or(params, DEFAULT_DURATION));

        if !params.prompt_text.is_empty() {
            request = request.prompt_text(params.prompt_text.clone());
        }
        if let Some(ratio) = &params.ratio {
            request = request.ratio(ratio.clone());
        }
        if let Some(seed) = params.whole_param("seed") {
            request = request.seed(seed);
        }
        request
    }
}

/// Positioned assets become keyframes; otherwise the first asset is the
/// single prompt image.
fn prompt_image(assets: &[Asset]) -> Option<PromptImage> {
    let first = assets.first()?;

    if assets.iter().all(|asset| asset.position.is_none()) {
        return Some(PromptImage::Uri(first.url.clone()));
    }

    let keyframes = assets
        .iter()
        .filter_map(|asset| {
            asset.position.map(|position| PromptKeyframe {
                uri: asset.url.clone(),
                position,
            })
        })
        .collect();
    Some(PromptImage::Keyframes(keyframes))
}

async fn intermediate_image(client: &RunwayClient, params: &GenerationParams) -> Result<String> {
    let mut request = TextToImageRequest::new(INTERMEDIATE_IMAGE_MODEL, params.prompt_text.clone());
    if let Some(ratio) = &params.ratio {
        request = request.ratio(ratio.clone());
    }

    tracing::debug!(model = %params.model, "generating intermediate first frame");
    let image = run_for_output(client, EndpointKind::TextToImage, &request, MediaKind::Image).await?;
    Ok(image.url)
}

impl GenerationStrategy for ImageToVideo {
    fn endpoint(&self) -> EndpointKind {
        EndpointKind::ImageToVideo
    }

    fn execute<'s>(&'s self, client: &'s RunwayClient, params: GenerationParams) -> StrategyFuture<'s> {
        Box::pin(async move {
            let prompt_image = match prompt_image(&params.assets) {
                Some(prompt_image) => prompt_image,
                None => PromptImage::Uri(intermediate_image(client, &params).await?),
            };

            let request = Self::request(&params, prompt_image);
            run_for_output(client, EndpointKind::ImageToVideo, &request, MediaKind::Video).await
        })
    }
}
