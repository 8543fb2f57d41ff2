//! Versioned artifact store abstraction
//!
//! The cleaning step only ever talks to the [`ArtifactStore`] trait:
//! resolve a reference to a local path, publish a local file as a new
//! immutable version. [`LocalStore`] is the on-disk implementation the
//! binary wires in; [`MemoryStore`] is the in-process fake for tests.

pub mod backends;
pub mod config;
pub mod traits;
pub mod types;

pub use backends::{LocalStore, MemoryStore};
pub use config::{StoreConfig, STORE_DIR_ENV};
pub use traits::ArtifactStore;
pub use types::{ArtifactRef, ArtifactSpec, ArtifactVersion, VersionSpec};
