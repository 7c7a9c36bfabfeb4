use std::{future::Future, pin::Pin};

use bytes::Bytes;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    error::Result,
    model::{AdditionalParams, EndpointKind, MediaKind, ModelId, Position},
    validation::ValidationInput,
};

/// A media reference handed to a generation back-end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Asset {
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Asset {
    pub fn new(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            tag: None,
            position: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// The tag, treating an empty string as no tag.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|tag| !tag.is_empty())
    }
}

impl From<&Asset> for ValidationInput {
    fn from(asset: &Asset) -> Self {
        ValidationInput {
            kind: asset.kind,
            tag: asset.tag.clone(),
            position: asset.position,
            source: crate::validation::MediaSource::Url(asset.url.clone()),
        }
    }
}

/// Uniform parameter bundle every strategy receives.
#[derive(Debug, Clone)]
pub struct GenerationParams {
    /// Model the request is executed with (after substitution rules).
    pub model: ModelId,
    pub prompt_text: String,
    pub assets: Vec<Asset>,
    pub ratio: Option<String>,
    pub additional_params: AdditionalParams,
}

impl GenerationParams {
    pub fn new(model: ModelId, prompt_text: impl Into<String>) -> Self {
        Self {
            model,
            prompt_text: prompt_text.into(),
            assets: Vec::new(),
            ratio: None,
            additional_params: AdditionalParams::new(),
        }
    }

    pub fn with_assets(mut self, assets: Vec<Asset>) -> Self {
        self.assets = assets;
        self
    }

    /// Empty ratios are dropped; models without a ratio concept receive none.
    pub fn with_ratio(mut self, ratio: impl Into<String>) -> Self {
        let ratio = ratio.into();
        self.ratio = (!ratio.is_empty()).then_some(ratio);
        self
    }

    pub fn with_additional_params(mut self, params: AdditionalParams) -> Self {
        self.additional_params = params;
        self
    }

    pub fn number_param(&self, name: &str) -> Option<f64> {
        self.additional_params.get(name).and_then(|value| value.as_f64())
    }

    pub fn bool_param(&self, name: &str) -> Option<bool> {
        self.additional_params.get(name).and_then(|value| value.as_bool())
    }

    /// A numeric parameter that is a whole number in `u32` range. Fractions,
    /// negatives and oversized values yield `None`.
    pub fn whole_param(&self, name: &str) -> Option<u32> {
        self.number_param(name)
            .filter(|number| number.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(number))
            .map(|number| number as u32)
    }
}

/// Exactly one output of a finished generation job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub url: String,
    pub media_kind: MediaKind,
    pub task_id: String,
}

/// Bytes of a downloaded output together with the served content type.
#[derive(Debug, Clone)]
pub struct DownloadedMedia {
    pub data: Bytes,
    pub content_type: Option<String>,
}

/// A **backend** turns a generation request into calls against a concrete
/// generative-media API and waits for the job's single output.
///
/// The method returns a [`Pin<Box<dyn Future>>`] so we stay object-safe
/// without pulling in `async_trait`.
pub trait GenerationProvider: Send + Sync {
    /// Run the strategy registered for `endpoint` and suspend until the remote
    /// job completes or fails.
    fn generate<'p>(
        &'p self,
        endpoint: EndpointKind,
        params: GenerationParams,
    ) -> Pin<Box<dyn Future<Output = Result<GenerationResult>> + Send + 'p>>;

    /// Fetch a generated output so it can be persisted.
    fn download<'p>(
        &'p self,
        url: &'p str,
    ) -> Pin<Box<dyn Future<Output = Result<DownloadedMedia>> + Send + 'p>>;
}

/// Builds a backend bound to one caller's API credential.
pub trait BackendFactory: Send + Sync {
    type Backend: GenerationProvider;

    fn connect(&self, api_key: &str) -> Result<Self::Backend>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::ParamValue, registry::ModelRegistry};

    fn with_param(value: ParamValue) -> GenerationParams {
        let registry = ModelRegistry::builtin();
        GenerationParams::new(registry.resolve("gen4_image").unwrap(), "a cat")
            .with_additional_params([("seed".to_owned(), value)].into())
    }

    #[test]
    fn whole_param_accepts_only_integers_in_range() {
        assert_eq!(with_param(ParamValue::Number(42.0)).whole_param("seed"), Some(42));
        assert_eq!(with_param(ParamValue::Number(0.0)).whole_param("seed"), Some(0));
        assert_eq!(
            with_param(ParamValue::Number(f64::from(u32::MAX))).whole_param("seed"),
            Some(u32::MAX)
        );

        assert_eq!(with_param(ParamValue::Number(4.5)).whole_param("seed"), None);
        assert_eq!(with_param(ParamValue::Number(-1.0)).whole_param("seed"), None);
        assert_eq!(with_param(ParamValue::Number(5e9)).whole_param("seed"), None);
        assert_eq!(with_param(ParamValue::Bool(true)).whole_param("seed"), None);
        assert_eq!(with_param(ParamValue::Number(7.0)).whole_param("other"), None);
    }
}
