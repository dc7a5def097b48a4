//! gitforge - open changesets from several code forges in one menu
//!
//! gitforge lists every open pull/merge request relevant to the user
//! (authored, assigned, mentioning them, or awaiting their review) across
//! GitHub and GitLab, and feeds them to rofi in script mode.
//!
//! # Architecture
//!
//! - [`cli`] - Invocation mode detection, delegates to the engine
//! - [`engine`] - Dispatches list/refresh to the configured forges
//! - [`forge`] - Forge clients behind one cache-coherent capability
//! - [`cache`] - Time-bounded changeset cache
//! - [`secrets`] - Credential files
//! - [`core`] - Domain types, paths, configuration
//! - [`ui`] - Menu protocol, launcher, diagnostics
//!
//! # Invariants
//!
//! 1. A fresh cache entry is served without touching the network
//! 2. Each forge is fetched at most once per invocation
//! 3. Cache files are replaced atomically
//! 4. Stdout carries only menu rows

pub mod cache;
pub mod cli;
pub mod core;
pub mod engine;
pub mod forge;
pub mod secrets;
pub mod ui;
