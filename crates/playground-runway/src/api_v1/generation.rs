use playground_core::model::Position;
use serde::Serialize;

use crate::impl_builder_methods;

use super::common::MediaReference;

/// `POST /text_to_image`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToImageRequest {
    pub model: String,
    pub prompt_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_images: Vec<ReferenceImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl TextToImageRequest {
    pub fn new(model: impl Into<String>, prompt_text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt_text: prompt_text.into(),
            ratio: None,
            reference_images: Vec::new(),
            seed: None,
        }
    }

    pub fn reference_images(mut self, reference_images: Vec<ReferenceImage>) -> Self {
        self.reference_images = reference_images;
        self
    }
}

impl_builder_methods!(TextToImageRequest, ratio: String, seed: u32);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceImage {
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// First frame(s) of an image-to-video job: a single URI, or keyframes with
/// explicit positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PromptImage {
    Uri(String),
    Keyframes(Vec<PromptKeyframe>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptKeyframe {
    pub uri: String,
    pub position: Position,
}

/// `POST /image_to_video`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageToVideoRequest {
    pub model: String,
    pub prompt_image: PromptImage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
}

impl ImageToVideoRequest {
    pub fn new(model: impl Into<String>, prompt_image: PromptImage) -> Self {
        Self {
            model: model.into(),
            prompt_image,
            prompt_text: None,
            ratio: None,
            duration: None,
            seed: None,
        }
    }
}

impl_builder_methods!(
    ImageToVideoRequest,
    prompt_text: String,
    ratio: String,
    duration: u32,
    seed: u32
);

/// `POST /text_to_video`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextToVideoRequest {
    pub model: String,
    pub prompt_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
}

impl TextToVideoRequest {
    pub fn new(model: impl Into<String>, prompt_text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt_text: prompt_text.into(),
            ratio: None,
            duration: None,
        }
    }
}

impl_builder_methods!(TextToVideoRequest, ratio: String, duration: u32);

/// `POST /video_to_video`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoToVideoRequest {
    pub model: String,
    pub prompt_text: String,
    pub video_uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<MediaReference>,
}

impl VideoToVideoRequest {
    pub fn new(
        model: impl Into<String>,
        prompt_text: impl Into<String>,
        video_uri: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            prompt_text: prompt_text.into(),
            video_uri: video_uri.into(),
            ratio: None,
            references: Vec::new(),
        }
    }

    pub fn references(mut self, references: Vec<MediaReference>) -> Self {
        self.references = references;
        self
    }
}

impl_builder_methods!(VideoToVideoRequest, ratio: String);

/// `POST /video_upscale`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoUpscaleRequest {
    pub model: String,
    pub video_uri: String,
}

/// `POST /character_performance`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterPerformanceRequest {
    pub model: String,
    pub character: MediaReference,
    pub reference: MediaReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_control: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression_intensity: Option<u32>,
}

impl CharacterPerformanceRequest {
    pub fn new(model: impl Into<String>, character: MediaReference, reference: MediaReference) -> Self {
        Self {
            model: model.into(),
            character,
            reference,
            ratio: None,
            body_control: None,
            expression_intensity: None,
        }
    }
}

impl_builder_methods!(
    CharacterPerformanceRequest,
    ratio: String,
    body_control: bool,
    expression_intensity: u32
);

#[cfg(test)]
mod tests {
    use playground_core::model::MediaKind;
    use serde_json::json;

    use super::*;

    #[test]
    fn keyframes_serialise_as_list() {
        let request = ImageToVideoRequest::new(
            "gen4_turbo",
            PromptImage::Keyframes(vec![PromptKeyframe {
                uri: "https://x/a.png".into(),
                position: Position::First,
            }]),
        )
        .duration(5);

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gen4_turbo",
                "promptImage": [{"uri": "https://x/a.png", "position": "first"}],
                "duration": 5
            })
        );
    }

    #[test]
    fn character_performance_uses_camel_case_options() {
        let request = CharacterPerformanceRequest::new(
            "act_two",
            MediaReference::new(MediaKind::Image, "https://x/c.png"),
            MediaReference::new(MediaKind::Video, "https://x/r.mp4"),
        )
        .body_control(false)
        .expression_intensity(4);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["character"], json!({"type": "image", "uri": "https://x/c.png"}));
        assert_eq!(body["bodyControl"], json!(false));
        assert_eq!(body["expressionIntensity"], json!(4));
        assert!(body.get("ratio").is_none());
    }
}
