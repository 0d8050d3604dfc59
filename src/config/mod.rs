//! Configuration module
//!
//! Handles user configuration (`<config dir>/randquote/config.toml`),
//! layered with `RANDQUOTE_*` environment variables.

mod settings;

pub use settings::*;
