//! Single source of truth for what each model accepts and costs.
//!
//! The registry is an immutable table constructed once at startup and passed
//! by reference into the validator, the client and the route handler. There
//! is no global instance: build one with [`ModelRegistry::builtin`] (or
//! [`ModelRegistry::new`] for a custom table) and hand it around.
//!
//! # Adding more models
//!
//! 1. Append an entry to `BUILTIN_MODELS` below.
//! 2. If the model was renamed, map the old key in `BUILTIN_ALIASES`.
//! 3. If it needs a new request shape, add an [`EndpointKind`] and a matching
//!    strategy in the backend crate.
//!
//! ```rust
//! use playground_core::{model::GenerationType, registry::ModelRegistry};
//!
//! let registry = ModelRegistry::builtin();
//! let veo = registry.resolve("veo3_text").unwrap();
//! assert_eq!(veo.as_str(), "veo3");
//! assert_eq!(registry.display_name_of("veo3_text"), "Veo 3");
//! assert!(registry.list_by_generation_type(GenerationType::Image).len() >= 3);
//! ```

use std::collections::HashMap;

use crate::{
    definition::{
        InputConfig, InputSlot, ModelDefinition, NamedInputs, ParamSpec, PromptRules,
        ReferenceInputs, StandardInputs,
    },
    error::{PlaygroundError, Result, ValidationError},
    model::{Category, CreditUnit, EndpointKind, GenerationType, MaxCount, MediaKind, ModelId},
};

/// A registry key together with its definition.
#[derive(Debug, Clone)]
pub struct ModelEntry {
    pub id: ModelId,
    pub definition: ModelDefinition,
}

/// Model and endpoint a request is actually executed with, after the
/// per-model substitution rules have been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPlan {
    pub model: ModelId,
    pub endpoint: EndpointKind,
}

#[derive(Debug, Clone)]
pub struct ModelRegistry {
    entries: Vec<ModelEntry>,
    index: HashMap<&'static str, usize>,
    aliases: HashMap<&'static str, usize>,
}

impl ModelRegistry {
    /// Build a registry from `(key, definition)` pairs and `(alias, key)`
    /// pairs. Declaration order is kept for listings.
    ///
    /// # Errors
    ///
    /// * [`PlaygroundError::Invalid`] – duplicate keys, an alias shadowing a
    ///   key, or an alias / reference variant pointing at a missing key.
    pub fn new(
        models: impl IntoIterator<Item = (&'static str, ModelDefinition)>,
        aliases: impl IntoIterator<Item = (&'static str, &'static str)>,
    ) -> Result<Self> {
        let mut entries = Vec::new();
        let mut index = HashMap::new();

        for (slot, (key, definition)) in models.into_iter().enumerate() {
            if index.insert(key, slot).is_some() {
                return Err(PlaygroundError::Invalid(format!("duplicate model key `{key}`")));
            }
            entries.push(ModelEntry {
                id: ModelId::new(key, slot),
                definition,
            });
        }

        let mut alias_index = HashMap::new();
        for (alias, target) in aliases {
            if index.contains_key(alias) {
                return Err(PlaygroundError::Invalid(format!(
                    "alias `{alias}` shadows a registered model"
                )));
            }
            let slot = *index.get(target).ok_or_else(|| {
                PlaygroundError::Invalid(format!("alias `{alias}` points at unknown model `{target}`"))
            })?;
            alias_index.insert(alias, slot);
        }

        for entry in &entries {
            if let Some(variant) = entry.definition.reference_variant {
                if !index.contains_key(variant) {
                    return Err(PlaygroundError::Invalid(format!(
                        "reference variant `{variant}` of `{}` is not registered",
                        entry.id
                    )));
                }
            }
        }

        Ok(Self {
            entries,
            index,
            aliases: alias_index,
        })
    }

    /// The models offered by the Runway API playground.
    pub fn builtin() -> Self {
        let mut entries = Vec::with_capacity(BUILTIN_MODELS.len());
        let mut index = HashMap::with_capacity(BUILTIN_MODELS.len());
        for (slot, (key, definition)) in BUILTIN_MODELS.iter().enumerate() {
            let key: &'static str = *key;
            index.insert(key, slot);
            entries.push(ModelEntry {
                id: ModelId::new(key, slot),
                definition: definition.clone(),
            });
        }
        let aliases = BUILTIN_ALIASES
            .iter()
            .filter_map(|(alias, target)| index.get(target).map(|slot| (*alias, *slot)))
            .collect();

        Self {
            entries,
            index,
            aliases,
        }
    }

    /// Exact key match first, then the alias table.
    pub fn resolve(&self, identifier: &str) -> std::result::Result<ModelId, ValidationError> {
        self.index
            .get(identifier)
            .or_else(|| self.aliases.get(identifier))
            .and_then(|slot| self.entries.get(*slot))
            .map(|entry| entry.id)
            .ok_or_else(|| ValidationError::UnknownModel {
                model: identifier.to_owned(),
            })
    }

    pub fn is_valid(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier) || self.aliases.contains_key(identifier)
    }

    /// The entry `id` names in *this* registry. Ids handed out by another
    /// registry are looked up again by key.
    fn entry(&self, id: ModelId) -> std::result::Result<&ModelEntry, ValidationError> {
        self.entries
            .get(id.slot)
            .filter(|entry| entry.id == id)
            .or_else(|| {
                self.index
                    .get(id.as_str())
                    .and_then(|slot| self.entries.get(*slot))
            })
            .ok_or_else(|| ValidationError::UnknownModel {
                model: id.as_str().to_owned(),
            })
    }

    /// Definition of `id`.
    ///
    /// # Errors
    ///
    /// * [`ValidationError::UnknownModel`] – `id` came from a registry that
    ///   has a model this one lacks.
    pub fn definition_of(&self, id: ModelId) -> std::result::Result<&ModelDefinition, ValidationError> {
        self.entry(id).map(|entry| &entry.definition)
    }

    /// Display name for `identifier`, falling back to the raw identifier when
    /// it is wholly unknown. Only meant for display, never for dispatch.
    pub fn display_name_of<'a>(&'a self, identifier: &'a str) -> &'a str {
        self.resolve(identifier)
            .and_then(|id| self.definition_of(id))
            .map_or(identifier, |definition| definition.display_name)
    }

    pub fn list_by_generation_type(&self, generation_type: GenerationType) -> Vec<ModelId> {
        self.entries
            .iter()
            .filter(|entry| entry.definition.supports(generation_type))
            .map(|entry| entry.id)
            .collect()
    }

    pub fn list_by_category(&self, category: Category) -> Vec<ModelId> {
        self.entries
            .iter()
            .filter(|entry| entry.definition.category == category)
            .map(|entry| entry.id)
            .collect()
    }

    pub fn all(&self) -> impl Iterator<Item = &ModelEntry> {
        self.entries.iter()
    }

    /// Alias keys that resolve to `id`.
    pub fn aliases_of(&self, id: ModelId) -> Vec<&'static str> {
        let Ok(entry) = self.entry(id) else {
            return Vec::new();
        };
        let mut aliases: Vec<_> = self
            .aliases
            .iter()
            .filter(|(_, slot)| **slot == entry.id.slot)
            .map(|(alias, _)| *alias)
            .collect();
        aliases.sort_unstable();
        aliases
    }

    /// Apply the model's declared substitution rules.
    ///
    /// * without assets, `text_only_endpoint` (if declared) replaces the
    ///   endpoint;
    /// * with assets, `reference_variant` (if declared) replaces the model.
    pub fn plan(&self, id: ModelId, has_assets: bool) -> std::result::Result<GenerationPlan, ValidationError> {
        let entry = self.entry(id)?;
        let definition = &entry.definition;

        if !has_assets {
            return Ok(GenerationPlan {
                model: entry.id,
                endpoint: definition.text_only_endpoint.unwrap_or(definition.endpoint),
            });
        }

        let target = definition
            .reference_variant
            .and_then(|variant| self.index.get(variant))
            .and_then(|slot| self.entries.get(*slot))
            .unwrap_or(entry);

        Ok(GenerationPlan {
            model: target.id,
            endpoint: target.definition.endpoint,
        })
    }

    /// Credits a generation costs. `units` is seconds for per-second models
    /// and images for per-image models; when omitted the `duration`
    /// parameter's default (or a single unit) is assumed.
    pub fn estimate_credits(&self, id: ModelId, units: Option<u32>) -> std::result::Result<u64, ValidationError> {
        let definition = self.definition_of(id)?;
        let units = units.unwrap_or_else(|| match definition.credit_unit {
            CreditUnit::Second => definition
                .param("duration")
                .and_then(|spec| spec.default.as_f64())
                .map(|seconds| seconds as u32)
                .unwrap_or(1),
            CreditUnit::Image => 1,
        });
        Ok(u64::from(definition.credits_per_unit) * u64::from(units))
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Built-in table
// ---------------------------------------------------------------------------

const IMAGE_FILES: &[&str] = &["image/*"];
const VIDEO_FILES: &[&str] = &["video/*"];

const VIDEO_ONLY: &[GenerationType] = &[GenerationType::Video];
const IMAGE_ONLY: &[GenerationType] = &[GenerationType::Image];

const PROMPT_OPTIONAL: PromptRules = PromptRules {
    required: false,
    max_length: Some(1000),
};
const PROMPT_REQUIRED: PromptRules = PromptRules {
    required: true,
    max_length: Some(1000),
};
const PROMPT_UNUSED: PromptRules = PromptRules {
    required: false,
    max_length: None,
};

const KEYFRAMES_REQUIRED: InputConfig = keyframes(1);
const KEYFRAMES_OPTIONAL: InputConfig = keyframes(0);

const fn keyframes(min_count: usize) -> InputConfig {
    InputConfig::Standard(StandardInputs {
        kind: MediaKind::Image,
        min_count,
        max_count: MaxCount::Unlimited,
        tags_allowed: false,
        positions_required: true,
        allowed_file_types: IMAGE_FILES,
        additional_references: None,
    })
}

const fn reference_images(min_count: usize) -> InputConfig {
    InputConfig::Standard(StandardInputs {
        kind: MediaKind::Image,
        min_count,
        max_count: MaxCount::Limited(3),
        tags_allowed: true,
        positions_required: false,
        allowed_file_types: IMAGE_FILES,
        additional_references: None,
    })
}

const DURATION_5_OR_10: &[(&str, ParamSpec)] = &[("duration", ParamSpec::choice(10.0, &[5.0, 10.0]))];
const DURATION_8: &[(&str, ParamSpec)] = &[("duration", ParamSpec::choice(8.0, &[8.0]))];

const GEN4_VIDEO_RATIOS: &[&str] = &["1280:720", "720:1280", "1104:832", "832:1104", "960:960", "1584:672"];
const ACT_TWO_RATIOS: &[&str] = &["1280:720", "720:1280", "960:960", "1104:832", "832:1104", "1584:672"];
const VEO_RATIOS: &[&str] = &["1280:720", "720:1280"];
const GEN4_IMAGE_RATIOS: &[&str] = &[
    "1920:1080", "1080:1920", "1024:1024", "1360:768", "1080:1080", "1168:880", "1440:1080",
    "1080:1440", "1808:768", "2112:912", "1280:720", "720:1280", "720:720", "960:720", "720:960",
    "1680:720",
];

static BUILTIN_MODELS: [(&str, ModelDefinition); 12] = [
    // Video: image to video
    (
        "gen4_turbo",
        ModelDefinition {
            display_name: "Gen-4 Turbo",
            endpoint: EndpointKind::ImageToVideo,
            text_only_endpoint: None,
            reference_variant: None,
            category: Category::Video,
            credits_per_unit: 5,
            credit_unit: CreditUnit::Second,
            generation_types: VIDEO_ONLY,
            prompt: PROMPT_OPTIONAL,
            inputs: KEYFRAMES_REQUIRED,
            ratios: GEN4_VIDEO_RATIOS,
            additional_params: DURATION_5_OR_10,
        },
    ),
    (
        "gen3a_turbo",
        ModelDefinition {
            display_name: "Gen-3a Turbo",
            endpoint: EndpointKind::ImageToVideo,
            text_only_endpoint: None,
            reference_variant: None,
            category: Category::Video,
            credits_per_unit: 5,
            credit_unit: CreditUnit::Second,
            generation_types: VIDEO_ONLY,
            prompt: PROMPT_OPTIONAL,
            inputs: KEYFRAMES_REQUIRED,
            ratios: &["1280:768", "768:1280"],
            additional_params: DURATION_5_OR_10,
        },
    ),
    (
        "gen4.5",
        ModelDefinition {
            display_name: "Gen-4.5",
            endpoint: EndpointKind::ImageToVideo,
            text_only_endpoint: Some(EndpointKind::TextToVideo),
            reference_variant: None,
            category: Category::Video,
            credits_per_unit: 12,
            credit_unit: CreditUnit::Second,
            generation_types: VIDEO_ONLY,
            prompt: PROMPT_REQUIRED,
            inputs: KEYFRAMES_OPTIONAL,
            ratios: &[
                "1280:720", "720:1280", "1104:832", "832:1104", "960:960", "1584:672", "672:1584",
            ],
            additional_params: DURATION_5_OR_10,
        },
    ),
    (
        "veo3",
        ModelDefinition {
            display_name: "Veo 3",
            endpoint: EndpointKind::ImageToVideo,
            text_only_endpoint: Some(EndpointKind::TextToVideo),
            reference_variant: None,
            category: Category::Video,
            credits_per_unit: 40,
            credit_unit: CreditUnit::Second,
            generation_types: VIDEO_ONLY,
            prompt: PROMPT_OPTIONAL,
            inputs: KEYFRAMES_OPTIONAL,
            ratios: VEO_RATIOS,
            additional_params: DURATION_8,
        },
    ),
    (
        "veo3.1",
        ModelDefinition {
            display_name: "Veo 3.1",
            endpoint: EndpointKind::ImageToVideo,
            text_only_endpoint: Some(EndpointKind::TextToVideo),
            reference_variant: None,
            category: Category::Video,
            credits_per_unit: 40,
            credit_unit: CreditUnit::Second,
            generation_types: VIDEO_ONLY,
            prompt: PROMPT_OPTIONAL,
            inputs: KEYFRAMES_OPTIONAL,
            ratios: VEO_RATIOS,
            additional_params: DURATION_8,
        },
    ),
    (
        "veo3.1_fast",
        ModelDefinition {
            display_name: "Veo 3.1 Fast",
            endpoint: EndpointKind::ImageToVideo,
            text_only_endpoint: Some(EndpointKind::TextToVideo),
            reference_variant: None,
            category: Category::Video,
            credits_per_unit: 15,
            credit_unit: CreditUnit::Second,
            generation_types: VIDEO_ONLY,
            prompt: PROMPT_OPTIONAL,
            inputs: KEYFRAMES_OPTIONAL,
            ratios: VEO_RATIOS,
            additional_params: DURATION_8,
        },
    ),
    // Video: special endpoints
    (
        "gen4_aleph",
        ModelDefinition {
            display_name: "Gen-4 Aleph",
            endpoint: EndpointKind::VideoToVideo,
            text_only_endpoint: None,
            reference_variant: None,
            category: Category::Video,
            credits_per_unit: 15,
            credit_unit: CreditUnit::Second,
            generation_types: VIDEO_ONLY,
            prompt: PROMPT_REQUIRED,
            inputs: InputConfig::Standard(StandardInputs {
                kind: MediaKind::Video,
                min_count: 1,
                max_count: MaxCount::Limited(1),
                tags_allowed: false,
                positions_required: false,
                allowed_file_types: VIDEO_FILES,
                additional_references: Some(ReferenceInputs {
                    kind: MediaKind::Image,
                    min_count: 0,
                    max_count: MaxCount::Limited(1),
                    tags_allowed: false,
                    allowed_file_types: IMAGE_FILES,
                }),
            }),
            ratios: &[
                "1280:720", "720:1280", "1104:832", "960:960", "832:1104", "1584:672", "848:480",
                "640:480",
            ],
            additional_params: &[],
        },
    ),
    (
        "act_two",
        ModelDefinition {
            display_name: "Act-Two",
            endpoint: EndpointKind::CharacterPerformance,
            text_only_endpoint: None,
            reference_variant: None,
            category: Category::Video,
            credits_per_unit: 5,
            credit_unit: CreditUnit::Second,
            generation_types: VIDEO_ONLY,
            prompt: PROMPT_UNUSED,
            inputs: InputConfig::Named(NamedInputs {
                slots: &[
                    (
                        "character",
                        InputSlot {
                            kinds: &[MediaKind::Image, MediaKind::Video],
                            min_count: 1,
                            max_count: MaxCount::Limited(1),
                            allowed_file_types: &["image/*", "video/*"],
                        },
                    ),
                    (
                        "reference",
                        InputSlot {
                            kinds: &[MediaKind::Video],
                            min_count: 1,
                            max_count: MaxCount::Limited(1),
                            allowed_file_types: VIDEO_FILES,
                        },
                    ),
                ],
            }),
            ratios: ACT_TWO_RATIOS,
            additional_params: &[
                ("bodyControl", ParamSpec::toggle(true)),
                ("expressionIntensity", ParamSpec::range(3.0, 1.0, 5.0)),
            ],
        },
    ),
    (
        "upscale_v1",
        ModelDefinition {
            display_name: "Upscale V1",
            endpoint: EndpointKind::VideoUpscale,
            text_only_endpoint: None,
            reference_variant: None,
            category: Category::Upscale,
            credits_per_unit: 5,
            credit_unit: CreditUnit::Second,
            generation_types: VIDEO_ONLY,
            prompt: PROMPT_UNUSED,
            inputs: InputConfig::Standard(StandardInputs {
                kind: MediaKind::Video,
                min_count: 1,
                max_count: MaxCount::Limited(1),
                tags_allowed: false,
                positions_required: false,
                allowed_file_types: VIDEO_FILES,
                additional_references: None,
            }),
            ratios: &[],
            additional_params: &[],
        },
    ),
    // Image: text to image
    (
        "gen4_image_turbo",
        ModelDefinition {
            display_name: "Gen-4 Image Turbo",
            endpoint: EndpointKind::TextToImage,
            text_only_endpoint: None,
            reference_variant: None,
            category: Category::Image,
            credits_per_unit: 2,
            credit_unit: CreditUnit::Image,
            generation_types: IMAGE_ONLY,
            prompt: PROMPT_REQUIRED,
            inputs: reference_images(1),
            ratios: GEN4_IMAGE_RATIOS,
            additional_params: &[],
        },
    ),
    (
        "gen4_image",
        ModelDefinition {
            display_name: "Gen-4 Image",
            endpoint: EndpointKind::TextToImage,
            text_only_endpoint: None,
            reference_variant: Some("gen4_image_turbo"),
            category: Category::Image,
            credits_per_unit: 5,
            credit_unit: CreditUnit::Image,
            generation_types: IMAGE_ONLY,
            prompt: PROMPT_REQUIRED,
            inputs: reference_images(0),
            ratios: GEN4_IMAGE_RATIOS,
            additional_params: &[],
        },
    ),
    (
        "gemini_2.5_flash",
        ModelDefinition {
            display_name: "Gemini 2.5 Flash",
            endpoint: EndpointKind::TextToImage,
            text_only_endpoint: None,
            reference_variant: None,
            category: Category::Image,
            credits_per_unit: 5,
            credit_unit: CreditUnit::Image,
            generation_types: IMAGE_ONLY,
            prompt: PROMPT_REQUIRED,
            inputs: reference_images(0),
            ratios: &["1344:768", "768:1344", "1024:1024", "1184:864", "864:1184", "1536:672"],
            additional_params: &[],
        },
    ),
];

/// Legacy keys still stored in old prompt rows.
static BUILTIN_ALIASES: [(&str, &str); 1] = [("veo3_text", "veo3")];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_every_model_in_declaration_order() {
        let registry = ModelRegistry::builtin();
        let keys: Vec<_> = registry.all().map(|entry| entry.id.as_str()).collect();
        assert_eq!(
            keys,
            [
                "gen4_turbo",
                "gen3a_turbo",
                "gen4.5",
                "veo3",
                "veo3.1",
                "veo3.1_fast",
                "gen4_aleph",
                "act_two",
                "upscale_v1",
                "gen4_image_turbo",
                "gen4_image",
                "gemini_2.5_flash",
            ]
        );
    }

    #[test]
    fn unknown_model_is_rejected_not_substituted() {
        let registry = ModelRegistry::builtin();
        assert_eq!(
            registry.resolve("gen5_ultra"),
            Err(ValidationError::UnknownModel {
                model: "gen5_ultra".into()
            })
        );
        assert!(!registry.is_valid("gen5_ultra"));
    }

    #[test]
    fn display_name_falls_back_to_raw_identifier() {
        let registry = ModelRegistry::builtin();
        assert_eq!(registry.display_name_of("act_two"), "Act-Two");
        assert_eq!(registry.display_name_of("mystery"), "mystery");
    }

    #[test]
    fn listing_filters_by_generation_type_and_category() {
        let registry = ModelRegistry::builtin();
        let images: Vec<_> = registry
            .list_by_generation_type(GenerationType::Image)
            .iter()
            .map(ModelId::as_str)
            .collect();
        assert_eq!(images, ["gen4_image_turbo", "gen4_image", "gemini_2.5_flash"]);

        let upscalers = registry.list_by_category(Category::Upscale);
        assert_eq!(upscalers.len(), 1);
        assert_eq!(upscalers[0].as_str(), "upscale_v1");
    }

    #[test]
    fn plan_uses_text_only_endpoint_without_assets() {
        let registry = ModelRegistry::builtin();
        let veo = registry.resolve("veo3.1").unwrap();

        assert_eq!(registry.plan(veo, false).unwrap().endpoint, EndpointKind::TextToVideo);
        assert_eq!(registry.plan(veo, true).unwrap().endpoint, EndpointKind::ImageToVideo);

        let gen4_turbo = registry.resolve("gen4_turbo").unwrap();
        assert_eq!(registry.plan(gen4_turbo, false).unwrap().endpoint, EndpointKind::ImageToVideo);
    }

    #[test]
    fn plan_switches_to_reference_variant_with_assets() {
        let registry = ModelRegistry::builtin();
        let gen4_image = registry.resolve("gen4_image").unwrap();

        assert_eq!(registry.plan(gen4_image, false).unwrap().model, gen4_image);
        assert_eq!(registry.plan(gen4_image, true).unwrap().model.as_str(), "gen4_image_turbo");
    }

    #[test]
    fn credit_estimate_uses_duration_default() {
        let registry = ModelRegistry::builtin();
        let veo = registry.resolve("veo3").unwrap();
        assert_eq!(registry.estimate_credits(veo, None), Ok(320));
        assert_eq!(registry.estimate_credits(veo, Some(4)), Ok(160));

        let image = registry.resolve("gen4_image_turbo").unwrap();
        assert_eq!(registry.estimate_credits(image, None), Ok(2));
    }

    #[test]
    fn act_two_lists_its_ratios_in_declared_order() {
        let registry = ModelRegistry::builtin();
        let act_two = registry.definition_of(registry.resolve("act_two").unwrap()).unwrap();
        assert_eq!(
            act_two.ratios,
            ["1280:720", "720:1280", "960:960", "1104:832", "832:1104", "1584:672"]
        );
    }

    #[test]
    fn credit_estimate_does_not_overflow() {
        let registry = ModelRegistry::builtin();
        let veo = registry.resolve("veo3").unwrap();
        assert_eq!(registry.estimate_credits(veo, Some(200_000_000)), Ok(8_000_000_000));
        assert_eq!(
            registry.estimate_credits(veo, Some(u32::MAX)),
            Ok(40 * u64::from(u32::MAX))
        );
    }

    #[test]
    fn ids_from_another_registry_are_checked_by_key() {
        let builtin = ModelRegistry::builtin();
        let upscale = builtin.resolve("upscale_v1").unwrap();
        let gen4_image = builtin.resolve("gen4_image").unwrap();

        let definition = BUILTIN_MODELS[10].1.clone();
        let mut narrow = definition.clone();
        narrow.reference_variant = None;
        let custom = ModelRegistry::new([("gen4_image", narrow)], []).unwrap();

        // Same key, different slot: found by key.
        assert_eq!(custom.definition_of(gen4_image).unwrap().display_name, definition.display_name);
        assert_eq!(custom.plan(gen4_image, true).unwrap().model.as_str(), "gen4_image");

        // Unknown to this registry.
        assert_eq!(
            custom.definition_of(upscale),
            Err(ValidationError::UnknownModel {
                model: "upscale_v1".into()
            })
        );
        assert!(custom.estimate_credits(upscale, None).is_err());
        assert!(custom.aliases_of(upscale).is_empty());
    }

    #[test]
    fn new_rejects_dangling_aliases() {
        let definition = BUILTIN_MODELS[0].1.clone();
        let err = ModelRegistry::new([("a", definition)], [("b", "missing")]).unwrap_err();
        assert!(matches!(err, PlaygroundError::Invalid(_)));
    }

    #[test]
    fn new_rejects_dangling_reference_variant() {
        let mut definition = BUILTIN_MODELS[10].1.clone();
        definition.reference_variant = Some("nowhere");
        let err = ModelRegistry::new([("gen4_image", definition)], []).unwrap_err();
        assert!(matches!(err, PlaygroundError::Invalid(_)));
    }
}
