//! forge
//!
//! Forge backends (GitHub, GitLab) behind one capability.
//!
//! # Architecture
//!
//! Each backend is a [`RemoteClient`]: it fetches from the forge API and
//! normalizes the native response into [`ChangesetRecord`]s. A
//! [`CachedForge`] binds a client to a name and the changeset cache and
//! implements [`Forge`], the capability the dispatcher drives. The CLI
//! obtains its forges from [`create_forges`] and never names a backend.
//!
//! # Modules
//!
//! - `traits`: `RemoteClient`, `Forge` and `ForgeError`
//! - `cached`: the cache-coherent `Forge` implementation
//! - [`github`]: GraphQL search client
//! - [`gitlab`]: REST merge request client
//! - [`mock`]: in-memory client for deterministic testing
//! - `factory`: forge selection and creation
//!
//! [`ChangesetRecord`]: crate::core::types::ChangesetRecord

mod cached;
mod factory;
pub mod github;
pub mod gitlab;
mod http;
pub mod mock;
mod traits;

pub use cached::CachedForge;
pub use factory::{
    create_forge, create_forges, create_forges_with, valid_forge_names, ForgeDeps, ForgeProvider,
};
pub use http::build_client;
pub use traits::*;
