//! core
//!
//! Core domain types, configuration, and storage paths.
//!
//! # Modules
//!
//! - [`types`] - The normalized `ChangesetRecord`
//! - [`config`] - Configuration schema and loading
//! - [`paths`] - Centralized path routing for config and cache roots
//!
//! # Design Principles
//!
//! - No global state: roots and settings are resolved once and passed down
//! - Schemas are strict and self-describing

pub mod config;
pub mod paths;
pub mod types;
