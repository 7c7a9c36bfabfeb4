//! # `playground` – The umbrella crate
//!
//! One import for the whole generation playground:
//!
//! | Crate                     | What it provides                                                              |
//! |---------------------------|-------------------------------------------------------------------------------|
//! | **`playground-core`**     | Model registry, validator, provider / storage traits, generic client, errors  |
//! | **`playground-runway`**   | Runway task client, per-endpoint strategies, usage reports *(optional)*       |
//! | **`playground-supabase`** | Supabase identity, rows and object storage *(optional)*                       |
//!
//! On top of the re-exports this crate owns the [`handler::GenerationHandler`]
//! (authenticate → validate → generate → persist), its configuration, and an
//! in-memory [`memory::MemoryStore`] for local runs and tests.
//!
//! ## Quick example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use playground::{
//!     PlaygroundClient,
//!     client::GenerationRequest,
//!     model::GenerationType,
//!     registry::ModelRegistry,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = playground::runway::RunwayAdapterBuilder::new_from_env().build()?;
//!     let client = PlaygroundClient::new(backend, Arc::new(ModelRegistry::builtin()));
//!
//!     let request = GenerationRequest::new("gen4_image", GenerationType::Image, "a paper boat")
//!         .with_ratio("1920:1080");
//!     println!("{}", client.generate(request).await?.result.url);
//!     Ok(())
//! }
//! ```

pub use playground_core::*;

pub mod config;
pub mod handler;
pub mod memory;

#[cfg(feature = "runway")]
pub use playground_runway as runway;

#[cfg(feature = "supabase")]
pub use playground_supabase as supabase;
