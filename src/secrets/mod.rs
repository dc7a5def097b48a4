//! secrets
//!
//! Credential lookup for forge clients.
//!
//! # Architecture
//!
//! Credentials are read through the `SecretStore` trait. The only
//! implementation, [`FileSecretStore`], reads one trimmed file per value
//! from `<config-root>/<forge>/<key>`:
//!
//! - `github/username` and `github/token` (Basic auth for GraphQL)
//! - `gitlab/token` (Bearer auth for REST)
//!
//! Credentials are read lazily, at fetch time, so a fresh cache can be
//! served without any credentials present.
//!
//! # Security
//!
//! Secrets are **never** logged or included in error messages.

mod file_store;
mod traits;

pub use file_store::FileSecretStore;
pub use traits::{SecretError, SecretStore};
