//! Core trait definition for the artifact store abstraction

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::Result;

use super::types::{ArtifactRef, ArtifactSpec, ArtifactVersion};

/// Versioned artifact storage as seen by the cleaning step.
///
/// Two operations only: turn a reference into a readable local path, and
/// publish a local file as a new immutable version. `publish` must not
/// return until the new version is durable.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Resolve an artifact reference to a local file path.
    async fn resolve(&self, reference: &ArtifactRef) -> Result<PathBuf>;

    /// Publish a local file as a new version of the named artifact.
    async fn publish(&self, path: &Path, spec: &ArtifactSpec) -> Result<ArtifactVersion>;
}
