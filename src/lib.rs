//! randquote - store, delete and print labelled quotes
//!
//! Quotes live in a single JSON file (`quotes.db.json` by default) in the
//! working directory. Each command loads the file, applies one change in
//! memory and writes the whole file back.
//!
//! # Modules
//!
//! - [`store`] - Quote collection and its backing file
//! - [`config`] - Layered configuration
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod store;

pub use config::Config;
pub use error::{Error, Result};
pub use store::{QuoteCollection, QuoteStore};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
