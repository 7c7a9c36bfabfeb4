//! # Validated generation against Runway
//!
//! Builds the model registry, validates a request against it and lets the
//! Runway adapter run the matching strategy:
//!
//! ```text
//! ┌───────────────────┐      ┌──────────────┐      ┌───────────────┐
//! │ GenerationRequest │ ===► │  Validator   │ ===► │ RunwayAdapter │ ===► output URL
//! └───────────────────┘      └──────────────┘      └───────────────┘
//! ```
//!
//! ## Running the example
//!
//! ```bash
//! export RUNWAYML_API_SECRET=key_…   # mandatory
//! RUST_LOG=playground=debug,playground_runway=debug \
//!     cargo run -p playground --example runway_generate -- gen4_image "a paper boat"
//! ```
//!
//! An invalid combination (try `gen4_turbo` without an image) is rejected
//! before any request leaves the machine.

use std::{env, sync::Arc};

use playground::{
    PlaygroundClient,
    client::GenerationRequest,
    model::GenerationType,
    registry::ModelRegistry,
    runway::RunwayAdapterBuilder,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = env::args().skip(1);
    let model = args.next().unwrap_or_else(|| "gen4_image".to_owned());
    let prompt = args.next().unwrap_or_else(|| "a lighthouse at dusk, volumetric fog".to_owned());

    let registry = Arc::new(ModelRegistry::builtin());
    let id = registry.resolve(&model)?;
    let definition = registry.definition_of(id)?;
    let generation_type = definition.generation_types[0];
    let ratio = definition.ratios.first().copied().unwrap_or_default();

    println!(
        "{} ({}) · ~{} credits",
        definition.display_name,
        generation_type,
        registry.estimate_credits(id, None)?
    );

    let backend = RunwayAdapterBuilder::new_from_env().build()?;
    let client = PlaygroundClient::new(backend, registry);

    let request = GenerationRequest::new(model, generation_type, prompt).with_ratio(ratio);
    let outcome = client.generate(request).await?;

    println!("{} via {}: {}", outcome.plan.model, outcome.plan.endpoint, outcome.result.url);
    if generation_type == GenerationType::Video {
        println!("(video outputs expire; download them soon)");
    }
    Ok(())
}
