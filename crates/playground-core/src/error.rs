//! Unified error types exposed by **`playground-core`**.
//!
//! Backend crates convert their internal errors into one of the
//! [`PlaygroundError`] variants before bubbling them up. Everything the
//! validator can reject lives in [`ValidationError`]; those failures are
//! always detected before any network or storage call and are recoverable by
//! re-prompting the user.

use std::fmt;

use thiserror::Error;

use crate::model::{EndpointKind, GenerationType, MaxCount, MediaKind};

/// Convenient alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, PlaygroundError>;

#[derive(Debug, Error)]
pub enum PlaygroundError {
    /// The request violated the contract declared by the model definition.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No strategy is registered for the endpoint kind (or the kind itself is
    /// not recognised).
    #[error("no generation strategy found for endpoint `{endpoint}`")]
    NoStrategyForEndpoint { endpoint: String },

    /// The remote job finished without yielding an output URL.
    #[error("{endpoint} produced no output")]
    NoOutputProduced { endpoint: EndpointKind },

    /// The generative API reported a terminal job failure.
    #[error("generation failed: {failure}")]
    RemoteGenerationFailed {
        task_id: String,
        failure: String,
        code: Option<String>,
    },

    /// Downstream persistence (rows, objects, signed URLs) failed.
    #[error("storage failure: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// Failure while serialising or deserialising JSON payloads.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic forwarding of any backend-specific error that doesn't fit
    /// another category.
    #[error("backend returned an error: {0}")]
    Backend(Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid: {0}")]
    Invalid(String),
}

impl PlaygroundError {
    /// `true` for failures raised before any network call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, PlaygroundError::Validation(_))
    }

    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        PlaygroundError::Storage(err.into())
    }
}

/// Every rule violation the validator can report.
///
/// Messages always name the model (by display name) and the offending
/// constraint so they can be shown to the end user verbatim.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("unknown model: {model}")]
    UnknownModel { model: String },

    #[error("generation type \"{generation_type}\" is not allowed for {model}")]
    UnsupportedGenerationType {
        model: &'static str,
        generation_type: GenerationType,
    },

    #[error("prompt text is required for {model}")]
    MissingPrompt { model: &'static str },

    #[error("prompt text exceeds max length ({max}) for {model} (got {actual})")]
    PromptTooLong {
        model: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("invalid ratio \"{ratio}\" for {model}")]
    InvalidRatio { model: &'static str, ratio: String },

    #[error("{model} requires between {min} and {max} {kind} inputs (got {actual})")]
    InputCountOutOfRange {
        model: &'static str,
        kind: MediaKind,
        min: usize,
        max: MaxCount,
        actual: usize,
    },

    #[error("input {index} must be {expected} for {model} (got {actual})")]
    WrongInputType {
        model: &'static str,
        index: usize,
        expected: MediaKind,
        actual: MediaKind,
    },

    #[error("tags are not allowed for input {index} in {model}")]
    TagsNotAllowed { model: &'static str, index: usize },

    #[error("position is required for input {index} in {model}")]
    MissingPosition { model: &'static str, index: usize },

    #[error("invalid file type \"{mime}\" for input {index} in {model}")]
    InvalidFileType {
        model: &'static str,
        index: usize,
        mime: String,
    },

    #[error("{model} requires between {min} and {max} \"{slot}\" input(s) (got {actual})")]
    SlotCountOutOfRange {
        model: &'static str,
        slot: &'static str,
        min: usize,
        max: MaxCount,
        actual: usize,
    },

    #[error("\"{slot}\" input must be {} for {model}", KindList(.allowed))]
    WrongSlotType {
        model: &'static str,
        slot: &'static str,
        allowed: &'static [MediaKind],
    },

    #[error("invalid value for \"{param}\" in {model}. Allowed: {allowed}")]
    InvalidParamValue {
        model: &'static str,
        param: String,
        allowed: String,
    },

    #[error("\"{param}\" must be {} for {model} (got {value})", Bounds(.min, .max))]
    ParamOutOfRange {
        model: &'static str,
        param: String,
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
}

struct KindList<'a>(&'a [MediaKind]);

impl fmt::Display for KindList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" or ")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

struct Bounds<'a>(&'a Option<f64>, &'a Option<f64>);

impl fmt::Display for Bounds<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (*self.0, *self.1) {
            (Some(min), Some(max)) => write!(f, "between {min} and {max}"),
            (Some(min), None) => write!(f, "at least {min}"),
            (None, Some(max)) => write!(f, "at most {max}"),
            (None, None) => f.write_str("within bounds"),
        }
    }
}
