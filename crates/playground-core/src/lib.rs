//! Provider-agnostic core of the Runway API playground: the model registry,
//! the input validator, the generation and storage traits, and a generic
//! client tying them together. Nothing in this crate performs I/O.

pub mod client;
pub mod definition;
pub mod error;
pub mod model;
pub mod provider;
pub mod registry;
pub mod schema_util;
pub mod store;
pub mod validation;

pub use client::PlaygroundClient;
