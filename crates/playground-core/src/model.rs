//! Identifiers and small value types shared by the registry, the validator
//! and every backend crate.
//!
//! Wire names are fixed by the generative API and the storage schema, so the
//! enums render themselves (`Display`, `serde`) in exactly that spelling and
//! parse back from it via [`FromStr`].
//!
//! ```rust
//! use playground_core::model::EndpointKind;
//!
//! let kind: EndpointKind = "video_upscale".parse().unwrap();
//! assert_eq!(kind, EndpointKind::VideoUpscale);
//! assert_eq!(kind.to_string(), "video_upscale");
//! ```

use std::{collections::BTreeMap, fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{PlaygroundError, Result};

/// What the caller asks the model to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerationType {
    Image,
    Video,
}

impl GenerationType {
    pub fn as_str(self) -> &'static str {
        match self {
            GenerationType::Image => "image",
            GenerationType::Video => "video",
        }
    }
}

impl fmt::Display for GenerationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationType {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "image" => Ok(GenerationType::Image),
            "video" => Ok(GenerationType::Video),
            other => Err(PlaygroundError::InvalidRequest(format!(
                "unknown generation type `{other}`"
            ))),
        }
    }
}

/// Kind of a media file, used for inputs as well as generated outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<GenerationType> for MediaKind {
    fn from(value: GenerationType) -> Self {
        match value {
            GenerationType::Image => MediaKind::Image,
            GenerationType::Video => MediaKind::Video,
        }
    }
}

/// The abstract operation shape a model uses, independent of the concrete
/// model selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKind {
    TextToImage,
    ImageToVideo,
    TextToVideo,
    VideoToVideo,
    VideoUpscale,
    CharacterPerformance,
}

impl EndpointKind {
    pub const ALL: [EndpointKind; 6] = [
        EndpointKind::TextToImage,
        EndpointKind::ImageToVideo,
        EndpointKind::TextToVideo,
        EndpointKind::VideoToVideo,
        EndpointKind::VideoUpscale,
        EndpointKind::CharacterPerformance,
    ];

    /// Wire name, which doubles as the API path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            EndpointKind::TextToImage => "text_to_image",
            EndpointKind::ImageToVideo => "image_to_video",
            EndpointKind::TextToVideo => "text_to_video",
            EndpointKind::VideoToVideo => "video_to_video",
            EndpointKind::VideoUpscale => "video_upscale",
            EndpointKind::CharacterPerformance => "character_performance",
        }
    }
}

impl fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EndpointKind {
    type Err = PlaygroundError;

    fn from_str(s: &str) -> Result<Self> {
        EndpointKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| PlaygroundError::NoStrategyForEndpoint {
                endpoint: s.to_owned(),
            })
    }
}

/// Coarse grouping used by model pickers and usage charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Video,
    Image,
    Upscale,
}

/// Unit the credit cost of a model is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreditUnit {
    Second,
    Image,
}

/// Keyframe position of an image input for image-to-video models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    First,
    Last,
}

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::First => "first",
            Position::Last => "last",
        }
    }
}

/// Upper bound on an input count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaxCount {
    Limited(usize),
    Unlimited,
}

impl MaxCount {
    pub fn admits(self, count: usize) -> bool {
        match self {
            MaxCount::Limited(max) => count <= max,
            MaxCount::Unlimited => true,
        }
    }
}

impl fmt::Display for MaxCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxCount::Limited(max) => write!(f, "{max}"),
            MaxCount::Unlimited => f.write_str("unlimited"),
        }
    }
}

/// Value of a tunable model parameter (`duration`, `bodyControl`, …).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
}

impl ParamValue {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(n),
            ParamValue::Bool(_) => None,
        }
    }

    pub fn as_bool(self) -> Option<bool> {
        match self {
            ParamValue::Bool(b) => Some(b),
            ParamValue::Number(_) => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Caller-supplied tunables keyed by parameter name. Ordered so validation
/// reports the same violation for the same input every time.
pub type AdditionalParams = BTreeMap<String, ParamValue>;

/// A model identifier that has been resolved against a
/// [`ModelRegistry`](crate::registry::ModelRegistry).
///
/// Only the registry hands these out, so holding one proves the key exists in
/// that registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId {
    key: &'static str,
    pub(crate) slot: usize,
}

impl ModelId {
    pub(crate) fn new(key: &'static str, slot: usize) -> Self {
        Self { key, slot }
    }

    pub fn as_str(&self) -> &'static str {
        self.key
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key)
    }
}

impl Serialize for ModelId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_kinds_parse_from_their_wire_names() {
        for kind in EndpointKind::ALL {
            assert_eq!(kind.as_str().parse::<EndpointKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_endpoint_has_no_strategy() {
        let err = "image_to_audio".parse::<EndpointKind>().unwrap_err();
        assert!(matches!(
            err,
            PlaygroundError::NoStrategyForEndpoint { endpoint } if endpoint == "image_to_audio"
        ));
    }

    #[test]
    fn param_values_deserialize_untagged() {
        let params: AdditionalParams =
            serde_json::from_str(r#"{"duration": 5, "bodyControl": true}"#).unwrap();
        assert_eq!(params["duration"], ParamValue::Number(5.0));
        assert_eq!(params["bodyControl"], ParamValue::Bool(true));
    }

    #[test]
    fn unlimited_max_admits_anything() {
        assert!(MaxCount::Unlimited.admits(usize::MAX));
        assert!(MaxCount::Limited(3).admits(3));
        assert!(!MaxCount::Limited(3).admits(4));
    }
}
