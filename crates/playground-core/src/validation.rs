//! Gate every generation request against its model's declared contract.
//!
//! The [`Validator`] performs no I/O and has no side effects: it either
//! returns the resolved [`ModelId`] or the first [`ValidationError`] it finds.
//! Checks run in a fixed order (model, generation type, prompt, ratio,
//! inputs, additional parameters) so the same request always reports the same
//! violation.
//!
//! ```rust
//! use playground_core::{
//!     model::{GenerationType, MediaKind},
//!     registry::ModelRegistry,
//!     validation::{ValidationInput, Validator},
//! };
//!
//! let registry = ModelRegistry::builtin();
//! let validator = Validator::new(&registry);
//!
//! let inputs = [ValidationInput::url(MediaKind::Video, "https://cdn.example/clip.mp4")];
//! let model = validator
//!     .validate("upscale_v1", GenerationType::Video, "", &inputs, "", None)
//!     .unwrap();
//! assert_eq!(model.as_str(), "upscale_v1");
//! ```

use crate::{
    definition::{InputConfig, ModelDefinition, NamedInputs, StandardInputs},
    error::ValidationError,
    model::{AdditionalParams, GenerationType, MediaKind, ModelId, Position},
    registry::ModelRegistry,
};

type Result<T> = std::result::Result<T, ValidationError>;

/// Where a caller-supplied input comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    /// A raw upload; only its declared MIME type matters here.
    File { mime: String },
    /// Media that already lives at a remote URL.
    Url(String),
}

/// One caller-supplied media reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationInput {
    pub kind: MediaKind,
    pub tag: Option<String>,
    pub position: Option<Position>,
    pub source: MediaSource,
}

impl ValidationInput {
    pub fn url(kind: MediaKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            tag: None,
            position: None,
            source: MediaSource::Url(url.into()),
        }
    }

    pub fn file(kind: MediaKind, mime: impl Into<String>) -> Self {
        Self {
            kind,
            tag: None,
            position: None,
            source: MediaSource::File { mime: mime.into() },
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

    fn has_tag(&self) -> bool {
        self.tag.as_deref().is_some_and(|tag| !tag.is_empty())
    }

    fn mime(&self) -> Option<&str> {
        match &self.source {
            MediaSource::File { mime } => Some(mime),
            MediaSource::Url(_) => None,
        }
    }
}

/// Validates requests against a borrowed [`ModelRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r ModelRegistry,
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r ModelRegistry) -> Self {
        Self { registry }
    }

    /// Check a request and return the resolved model on success.
    pub fn validate(
        &self,
        model: &str,
        generation_type: GenerationType,
        prompt_text: &str,
        inputs: &[ValidationInput],
        ratio: &str,
        additional_params: Option<&AdditionalParams>,
    ) -> Result<ModelId> {
        let id = self.registry.resolve(model)?;
        let definition = self.registry.definition_of(id)?;
        let name = definition.display_name;

        if !definition.supports(generation_type) {
            return Err(ValidationError::UnsupportedGenerationType {
                model: name,
                generation_type,
            });
        }

        check_prompt(definition, prompt_text)?;

        if !definition.ratios.is_empty() && !definition.ratios.iter().any(|allowed| *allowed == ratio) {
            return Err(ValidationError::InvalidRatio {
                model: name,
                ratio: ratio.to_owned(),
            });
        }

        match &definition.inputs {
            InputConfig::Standard(config) => check_standard(config, inputs, name)?,
            InputConfig::Named(config) => check_named(config, inputs, name)?,
            InputConfig::None => {}
        }

        if let Some(params) = additional_params {
            check_params(definition, params)?;
        }

        Ok(id)
    }
}

fn check_prompt(definition: &ModelDefinition, prompt_text: &str) -> Result<()> {
    let name = definition.display_name;
    if definition.prompt.required && prompt_text.is_empty() {
        return Err(ValidationError::MissingPrompt { model: name });
    }
    if let Some(max) = definition.prompt.max_length {
        let actual = prompt_text.chars().count();
        if actual > max {
            return Err(ValidationError::PromptTooLong {
                model: name,
                max,
                actual,
            });
        }
    }
    Ok(())
}

fn check_standard(config: &StandardInputs, inputs: &[ValidationInput], name: &'static str) -> Result<()> {
    let references = config.additional_references.as_ref();
    let is_reference = |input: &ValidationInput| {
        references.is_some_and(|refs| refs.kind != config.kind && input.kind == refs.kind)
    };

    let primary_count = inputs.iter().filter(|input| !is_reference(input)).count();
    if primary_count < config.min_count || !config.max_count.admits(primary_count) {
        return Err(ValidationError::InputCountOutOfRange {
            model: name,
            kind: config.kind,
            min: config.min_count,
            max: config.max_count,
            actual: primary_count,
        });
    }

    if let Some(refs) = references {
        let reference_count = inputs.len() - primary_count;
        if reference_count < refs.min_count || !refs.max_count.admits(reference_count) {
            return Err(ValidationError::InputCountOutOfRange {
                model: name,
                kind: refs.kind,
                min: refs.min_count,
                max: refs.max_count,
                actual: reference_count,
            });
        }
    }

    for (i, input) in inputs.iter().enumerate() {
        let index = i + 1;
        let reference = references.filter(|_| is_reference(input));

        if reference.is_none() && input.kind != config.kind {
            return Err(ValidationError::WrongInputType {
                model: name,
                index,
                expected: config.kind,
                actual: input.kind,
            });
        }

        let tags_allowed = reference.map_or(config.tags_allowed, |refs| refs.tags_allowed);
        if input.has_tag() && !tags_allowed {
            return Err(ValidationError::TagsNotAllowed { model: name, index });
        }

        if reference.is_none() && config.positions_required && input.position.is_none() {
            return Err(ValidationError::MissingPosition { model: name, index });
        }

        let allowed_file_types =
            reference.map_or(config.allowed_file_types, |refs| refs.allowed_file_types);
        check_file_type(input, allowed_file_types, name, index)?;
    }

    Ok(())
}

fn check_named(config: &NamedInputs, inputs: &[ValidationInput], name: &'static str) -> Result<()> {
    for (slot, slot_config) in config.slots {
        let slot = *slot;
        let slot_inputs: Vec<(usize, &ValidationInput)> = inputs
            .iter()
            .enumerate()
            .filter(|(_, input)| input.tag.as_deref() == Some(slot))
            .collect();

        let actual = slot_inputs.len();
        if actual < slot_config.min_count || !slot_config.max_count.admits(actual) {
            return Err(ValidationError::SlotCountOutOfRange {
                model: name,
                slot,
                min: slot_config.min_count,
                max: slot_config.max_count,
                actual,
            });
        }

        for (i, input) in slot_inputs {
            if !slot_config.kinds.contains(&input.kind) {
                return Err(ValidationError::WrongSlotType {
                    model: name,
                    slot,
                    allowed: slot_config.kinds,
                });
            }
            check_file_type(input, slot_config.allowed_file_types, name, i + 1)?;
        }
    }
    Ok(())
}

fn check_params(definition: &ModelDefinition, params: &AdditionalParams) -> Result<()> {
    let name = definition.display_name;

    for (key, value) in params {
        let Some(spec) = definition.param(key) else {
            continue;
        };

        if let Some(options) = spec.options {
            if !value.as_f64().is_some_and(|v| options.contains(&v)) {
                let allowed = options
                    .iter()
                    .map(f64::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ValidationError::InvalidParamValue {
                    model: name,
                    param: key.clone(),
                    allowed,
                });
            }
        }

        if spec.min.is_some() || spec.max.is_some() {
            let Some(number) = value.as_f64() else {
                return Err(ValidationError::InvalidParamValue {
                    model: name,
                    param: key.clone(),
                    allowed: "a number".into(),
                });
            };
            let below = spec.min.is_some_and(|min| number < min);
            let above = spec.max.is_some_and(|max| number > max);
            if below || above {
                return Err(ValidationError::ParamOutOfRange {
                    model: name,
                    param: key.clone(),
                    value: number,
                    min: spec.min,
                    max: spec.max,
                });
            }
        }
    }
    Ok(())
}

fn check_file_type(
    input: &ValidationInput,
    allowed: &[&str],
    name: &'static str,
    index: usize,
) -> Result<()> {
    let Some(mime) = input.mime() else {
        return Ok(());
    };
    if allowed.is_empty() || allowed.iter().any(|pattern| mime_matches(pattern, mime)) {
        return Ok(());
    }
    Err(ValidationError::InvalidFileType {
        model: name,
        index,
        mime: mime.to_owned(),
    })
}

/// Wildcard MIME match: `image/*` accepts `image/` followed by any subtype,
/// including none. Anything else must match literally. Case-insensitive;
/// parameters after `;` are ignored.
pub fn mime_matches(pattern: &str, mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or_default().trim();
    match pattern.strip_suffix('*') {
        Some(prefix) => {
            essence.len() >= prefix.len()
                && essence.is_char_boundary(prefix.len())
                && essence[..prefix.len()].eq_ignore_ascii_case(prefix)
        }
        None => essence.eq_ignore_ascii_case(pattern),
    }
}
