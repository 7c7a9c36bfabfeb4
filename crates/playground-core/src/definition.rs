//! Declarative description of what a single model accepts and costs.
//!
//! Definitions are plain data built from `'static` slices, so the built-in
//! table in [`crate::registry`] is a `static` and never allocates.

use crate::model::{
    AdditionalParams, Category, CreditUnit, EndpointKind, GenerationType, MaxCount, MediaKind,
    ParamValue,
};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelDefinition {
    pub display_name: &'static str,
    pub endpoint: EndpointKind,
    /// Endpoint used instead of [`Self::endpoint`] when no media inputs are
    /// supplied (e.g. text-only video).
    pub text_only_endpoint: Option<EndpointKind>,
    /// Registry key of the model that serves requests carrying reference
    /// media in place of this one.
    pub reference_variant: Option<&'static str>,
    pub category: Category,
    pub credits_per_unit: u32,
    pub credit_unit: CreditUnit,
    pub generation_types: &'static [GenerationType],
    pub prompt: PromptRules,
    pub inputs: InputConfig,
    /// Allowed aspect ratios. Empty means the model has no ratio concept.
    pub ratios: &'static [&'static str],
    pub additional_params: &'static [(&'static str, ParamSpec)],
}

impl ModelDefinition {
    pub fn supports(&self, generation_type: GenerationType) -> bool {
        self.generation_types.contains(&generation_type)
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.additional_params
            .iter()
            .find_map(|(key, spec)| (*key == name).then_some(spec))
    }

    /// `supplied` completed with the declared default of every parameter the
    /// caller left out.
    pub fn params_with_defaults(&self, supplied: &AdditionalParams) -> AdditionalParams {
        let mut params = supplied.clone();
        for (name, spec) in self.additional_params {
            params.entry((*name).to_owned()).or_insert(spec.default);
        }
        params
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptRules {
    pub required: bool,
    pub max_length: Option<usize>,
}

/// The three shapes a model's media-input requirements can take.
#[derive(Debug, Clone, PartialEq)]
pub enum InputConfig {
    Standard(StandardInputs),
    Named(NamedInputs),
    None,
}

/// Single-type inputs with count constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardInputs {
    pub kind: MediaKind,
    pub min_count: usize,
    pub max_count: MaxCount,
    pub tags_allowed: bool,
    pub positions_required: bool,
    pub allowed_file_types: &'static [&'static str],
    /// Secondary reference inputs of a different kind (video plus image
    /// references, for instance).
    pub additional_references: Option<ReferenceInputs>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceInputs {
    pub kind: MediaKind,
    pub min_count: usize,
    pub max_count: MaxCount,
    pub tags_allowed: bool,
    pub allowed_file_types: &'static [&'static str],
}

/// Inputs that play structurally different roles, matched by tag.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedInputs {
    pub slots: &'static [(&'static str, InputSlot)],
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputSlot {
    pub kinds: &'static [MediaKind],
    pub min_count: usize,
    pub max_count: MaxCount,
    pub allowed_file_types: &'static [&'static str],
}

/// A tunable parameter. `options` and `min`/`max` are independent; a
/// parameter with neither accepts any value (e.g. a boolean toggle).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    pub default: ParamValue,
    pub options: Option<&'static [f64]>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ParamSpec {
    pub const fn toggle(default: bool) -> Self {
        Self {
            default: ParamValue::Bool(default),
            options: None,
            min: None,
            max: None,
        }
    }

    pub const fn choice(default: f64, options: &'static [f64]) -> Self {
        Self {
            default: ParamValue::Number(default),
            options: Some(options),
            min: None,
            max: None,
        }
    }

    pub const fn range(default: f64, min: f64, max: f64) -> Self {
        Self {
            default: ParamValue::Number(default),
            options: None,
            min: Some(min),
            max: Some(max),
        }
    }
}
