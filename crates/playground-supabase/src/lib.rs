//! Supabase implementation of the playground's identity and storage
//! contracts ([`playground_core::store::IdentityProvider`] and
//! [`playground_core::store::MediaStore`]).
//!
//! Every call is made with the caller's own session token so the project's
//! row-level security policies stay in charge of access control.

mod store;

pub use store::{SupabaseStore, SupabaseStoreBuilder};
pub mod api;
pub mod client;
pub mod error;
