use playground_core::{
    model::{EndpointKind, MediaKind},
    provider::GenerationParams,
};

use crate::{api_v1::TextToVideoRequest, client::RunwayClient};

use super::{GenerationStrategy, StrategyFuture, duration_or, run_for_output};

const DEFAULT_DURATION: u32 = 8;

/// Video from a text prompt alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextToVideo;

impl TextToVideo {
    pub fn request(params: &GenerationParams) -> TextToVideoRequest {
        let request = TextToVideoRequest::new(params.model.as_str(), params.prompt_text.clone())
            .duration(duration_or(params, DEFAULT_DURATION));

        match &params.ratio {
            Some(ratio) => request.ratio(ratio.clone()),
            None => request,
        }
    }
}

impl GenerationStrategy for TextToVideo {
    fn endpoint(&self) -> EndpointKind {
        EndpointKind::TextToVideo
    }

    fn execute<'s>(&'s self, client: &'s RunwayClient, params: GenerationParams) -> StrategyFuture<'s> {
        Box::pin(async move {
            let request = Self::request(&params);
            run_for_output(client, EndpointKind::TextToVideo, &request, MediaKind::Video).await
        })
    }
}

#[cfg(test)]
mod tests {
    use playground_core::{model::ParamValue, registry::ModelRegistry};

    use super::*;

    #[test]
    fn duration_defaults_to_eight_seconds() {
        let registry = ModelRegistry::builtin();
        let params = GenerationParams::new(registry.resolve("veo3.1").unwrap(), "surf").with_ratio("1280:720");
        let request = TextToVideo::request(&params);
        assert_eq!(request.duration, Some(8));
        assert_eq!(request.ratio.as_deref(), Some("1280:720"));
    }

    #[test]
    fn explicit_duration_wins() {
        let registry = ModelRegistry::builtin();
        let params = GenerationParams::new(registry.resolve("gen4.5").unwrap(), "surf")
            .with_additional_params([("duration".to_owned(), ParamValue::Number(5.0))].into());
        assert_eq!(TextToVideo::request(&params).duration, Some(5));
    }
}
