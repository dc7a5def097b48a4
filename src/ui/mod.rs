//! ui
//!
//! User interaction utilities.
//!
//! # Modules
//!
//! - [`menu`] - Menu line protocol rendering (stdout)
//! - [`launcher`] - Starting the menu program and opening URLs
//! - [`output`] - Diagnostics (stderr)
//!
//! # Design
//!
//! Stdout carries nothing but menu rows. Everything meant for a human goes
//! through [`output`] on stderr.

pub mod launcher;
pub mod menu;
pub mod output;
