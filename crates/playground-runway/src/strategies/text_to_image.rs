use playground_core::{
    model::{EndpointKind, MediaKind},
    provider::{Asset, GenerationParams},
};

use crate::{
    api_v1::{ReferenceImage, TextToImageRequest},
    client::RunwayClient,
};

use super::{GenerationStrategy, StrategyFuture, run_for_output};

/// Text prompt plus up to three tagged reference images.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextToImage;

impl TextToImage {
    pub fn request(params: &GenerationParams) -> TextToImageRequest {
        let mut request = TextToImageRequest::new(params.model.as_str(), params.prompt_text.clone())
            .reference_images(reference_images(&params.assets));

        if let Some(ratio) = &params.ratio {
            request = request.ratio(ratio.clone());
        }
        if let Some(seed) = params.whole_param("seed") {
            request = request.seed(seed);
        }
        request
    }
}

/// Untagged references are named `ref1`, `ref2`, … by position.
fn reference_images(assets: &[Asset]) -> Vec<ReferenceImage> {
    assets
        .iter()
        .enumerate()
        .map(|(index, asset)| ReferenceImage {
            uri: asset.url.clone(),
            tag: Some(
                asset
                    .tag()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("ref{}", index + 1)),
            ),
        })
        .collect()
}

impl GenerationStrategy for TextToImage {
    fn endpoint(&self) -> EndpointKind {
        EndpointKind::TextToImage
    }

    fn execute<'s>(&'s self, client: &'s RunwayClient, params: GenerationParams) -> StrategyFuture<'s> {
        Box::pin(async move {
            let request = Self::request(&params);
            run_for_output(client, EndpointKind::TextToImage, &request, MediaKind::Image).await
        })
    }
}
