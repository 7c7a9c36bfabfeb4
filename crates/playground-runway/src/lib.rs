//! Runway API backend for the generation playground.
//!
//! The crate is split the same way for every endpoint: typed request /
//! response structs live in [`api_v1`], the HTTP plumbing (auth headers,
//! task polling, downloads) in [`client::RunwayClient`], and one
//! [`strategies::GenerationStrategy`] per endpoint kind turns uniform
//! [`playground_core::provider::GenerationParams`] into a concrete request.
//! [`RunwayAdapter`] ties them together and implements the core
//! [`playground_core::provider::GenerationProvider`] trait.

mod adapter;
mod provider_impl_generate;

pub use adapter::{RunwayAdapter, RunwayAdapterBuilder, RunwayBackendFactory};
pub mod api_v1;
pub mod client;
pub mod error;
pub mod strategies;
