//! # Scour
//!
//! A single pipeline step that fetches a tabular dataset from a versioned
//! artifact store, drops rows whose coordinates fall outside a fixed
//! bounding box or whose price falls outside a configured range, and
//! publishes the survivors as a new artifact version.
//!
//! ## Modules
//!
//! - `clean` - The cleaning step: command type, row filters, orchestration
//! - `dataset` - Ordered in-memory record table backed by CSV
//! - `error` - Error taxonomy and crate `Result` alias
//! - `store` - Artifact store trait with on-disk and in-memory backends

pub mod clean;
pub mod dataset;
pub mod error;
pub mod store;

pub use error::{Error, Result};
