//! Quote storage
//!
//! - [`QuoteCollection`] - the label → quote mapping and its JSON form
//! - [`QuoteStore`] - load/mutate/persist cycle around the backing file

mod collection;
mod quote_store;

pub use collection::QuoteCollection;
pub use quote_store::QuoteStore;
