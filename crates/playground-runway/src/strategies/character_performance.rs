use playground_core::{
    error::PlaygroundError,
    model::{EndpointKind, MediaKind},
    provider::{Asset, GenerationParams},
};

use crate::{
    api_v1::{CharacterPerformanceRequest, MediaReference},
    client::RunwayClient,
};

use super::{GenerationStrategy, StrategyFuture, run_for_output};

const CHARACTER_TAG: &str = "character";
const REFERENCE_TAG: &str = "reference";

/// Drive a character (image or video) with the performance in a reference
/// video.
#[derive(Debug, Clone, Copy, Default)]
pub struct CharacterPerformance;

fn single_tagged<'a>(assets: &'a [Asset], tag: &str) -> Result<&'a Asset, PlaygroundError> {
    let mut tagged = assets.iter().filter(|asset| asset.tag() == Some(tag));
    match (tagged.next(), tagged.next()) {
        (Some(asset), None) => Ok(asset),
        (None, _) => Err(PlaygroundError::InvalidRequest(format!(
            "character performance requires a `{tag}` input"
        ))),
        (Some(_), Some(_)) => Err(PlaygroundError::InvalidRequest(format!(
            "character performance accepts a single `{tag}` input"
        ))),
    }
}

impl CharacterPerformance {
    pub fn request(params: &GenerationParams) -> Result<CharacterPerformanceRequest, PlaygroundError> {
        let character = single_tagged(&params.assets, CHARACTER_TAG)?;
        let reference = single_tagged(&params.assets, REFERENCE_TAG)?;

        let mut request = CharacterPerformanceRequest::new(
            params.model.as_str(),
            MediaReference::new(character.kind, character.url.clone()),
            MediaReference::new(MediaKind::Video, reference.url.clone()),
        );

        if let Some(ratio) = &params.ratio {
            request = request.ratio(ratio.clone());
        }
        if let Some(body_control) = params.bool_param("bodyControl") {
            request = request.body_control(body_control);
        }
        if let Some(intensity) = params.number_param("expressionIntensity") {
            request = request.expression_intensity(intensity.round() as u32);
        }
        Ok(request)
    }
}

impl GenerationStrategy for CharacterPerformance {
    fn endpoint(&self) -> EndpointKind {
        EndpointKind::CharacterPerformance
    }

    fn execute<'s>(&'s self, client: &'s RunwayClient, params: GenerationParams) -> StrategyFuture<'s> {
        Box::pin(async move {
            let request = Self::request(&params)?;
            run_for_output(client, EndpointKind::CharacterPerformance, &request, MediaKind::Video).await
        })
    }
}

#[cfg(test)]
mod tests {
    use playground_core::{model::ParamValue, registry::ModelRegistry};
    use serde_json::json;

    use super::*;

    fn params(assets: Vec<Asset>) -> GenerationParams {
        let registry = ModelRegistry::builtin();
        GenerationParams::new(registry.resolve("act_two").unwrap(), "")
            .with_ratio("1280:720")
            .with_assets(assets)
    }

    #[test]
    fn character_kind_comes_from_the_asset() {
        let params = params(vec![
            Asset::new(MediaKind::Video, "https://x/ref.mp4").with_tag("reference"),
            Asset::new(MediaKind::Video, "https://x/actor").with_tag("character"),
        ])
        .with_additional_params(
            [
                ("bodyControl".to_owned(), ParamValue::Bool(true)),
                ("expressionIntensity".to_owned(), ParamValue::Number(3.0)),
            ]
            .into(),
        );

        let body = serde_json::to_value(CharacterPerformance::request(&params).unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "model": "act_two",
                "character": {"type": "video", "uri": "https://x/actor"},
                "reference": {"type": "video", "uri": "https://x/ref.mp4"},
                "ratio": "1280:720",
                "bodyControl": true,
                "expressionIntensity": 3
            })
        );
    }

    #[test]
    fn image_character_without_params() {
        let params = params(vec![
            Asset::new(MediaKind::Image, "https://x/face.mp4").with_tag("character"),
            Asset::new(MediaKind::Video, "https://x/ref.mp4").with_tag("reference"),
        ]);

        let request = CharacterPerformance::request(&params).unwrap();
        assert_eq!(request.character.kind, MediaKind::Image);
        assert_eq!(request.body_control, None);
        assert_eq!(request.expression_intensity, None);
    }

    #[test]
    fn missing_or_duplicate_roles_fail() {
        let character = Asset::new(MediaKind::Image, "https://x/face.png").with_tag("character");
        let reference = Asset::new(MediaKind::Video, "https://x/ref.mp4").with_tag("reference");

        let missing = params(vec![character.clone()]);
        assert!(matches!(
            CharacterPerformance::request(&missing),
            Err(PlaygroundError::InvalidRequest(message)) if message.contains("reference")
        ));

        let duplicate = params(vec![character.clone(), character, reference]);
        assert!(CharacterPerformance::request(&duplicate).is_err());
    }

    #[test]
    fn fractional_intensity_is_rounded() {
        let assets = vec![
            Asset::new(MediaKind::Image, "https://x/face.png").with_tag("character"),
            Asset::new(MediaKind::Video, "https://x/ref.mp4").with_tag("reference"),
        ];
        let request = |intensity: f64| {
            let params = params(assets.clone()).with_additional_params(
                [("expressionIntensity".to_owned(), ParamValue::Number(intensity))].into(),
            );
            CharacterPerformance::request(&params).unwrap().expression_intensity
        };

        assert_eq!(request(3.6), Some(4));
        assert_eq!(request(2.4), Some(2));
        assert_eq!(request(4.5), Some(5));
    }
}
