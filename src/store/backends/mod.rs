//! Artifact store backend implementations

pub mod local;
pub mod memory;

pub use local::LocalStore;
pub use memory::MemoryStore;
