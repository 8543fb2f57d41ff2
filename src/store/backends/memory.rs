//! In-memory artifact store for testing
//!
//! Versions the same way the local store does, but keeps bytes in a map
//! behind an async lock. Because the trait contract deals in file paths,
//! `resolve` materializes the requested bytes into a temp directory owned
//! by the store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tempfile::TempDir;
use tokio::fs;
use tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::store::traits::ArtifactStore;
use crate::store::types::{
    validate_artifact_name, ArtifactRef, ArtifactSpec, ArtifactVersion, VersionSpec,
};

struct StoredVersion {
    handle: ArtifactVersion,
    bytes: Vec<u8>,
}

/// In-memory fake store with seed and inspection helpers.
pub struct MemoryStore {
    artifacts: Mutex<HashMap<String, Vec<StoredVersion>>>,
    publish_failure: Mutex<Option<String>>,
    scratch: TempDir,
}

impl MemoryStore {
    pub fn new() -> Result<Self> {
        Ok(Self {
            artifacts: Mutex::new(HashMap::new()),
            publish_failure: Mutex::new(None),
            scratch: TempDir::new()?,
        })
    }

    /// Seed an artifact version directly from bytes.
    pub async fn seed(
        &self,
        name: &str,
        artifact_type: &str,
        description: &str,
        bytes: impl Into<Vec<u8>>,
    ) -> ArtifactVersion {
        let bytes = bytes.into();
        let mut artifacts = self.artifacts.lock().await;
        let versions = artifacts.entry(name.to_string()).or_default();
        let handle = ArtifactVersion {
            name: name.to_string(),
            version: versions.len() as u64 + 1,
            artifact_type: artifact_type.to_string(),
            description: description.to_string(),
            digest: format!("{:x}", Sha256::digest(&bytes)),
            size_bytes: bytes.len() as u64,
            created_at: Utc::now(),
        };
        versions.push(StoredVersion {
            handle: handle.clone(),
            bytes,
        });
        handle
    }

    /// Make the next (and every later) publish fail with the given message.
    pub async fn fail_publishes(&self, message: &str) {
        *self.publish_failure.lock().await = Some(message.to_string());
    }

    /// All published version handles for an artifact, oldest first.
    pub async fn versions(&self, name: &str) -> Vec<ArtifactVersion> {
        self.artifacts
            .lock()
            .await
            .get(name)
            .map(|versions| versions.iter().map(|v| v.handle.clone()).collect())
            .unwrap_or_default()
    }

    /// Stored bytes for a specific version, if present.
    pub async fn contents(&self, name: &str, version: u64) -> Option<Vec<u8>> {
        self.artifacts
            .lock()
            .await
            .get(name)
            .and_then(|versions| versions.iter().find(|v| v.handle.version == version))
            .map(|v| v.bytes.clone())
    }
}

#[async_trait]
impl ArtifactStore for MemoryStore {
    async fn resolve(&self, reference: &ArtifactRef) -> Result<PathBuf> {
        let artifacts = self.artifacts.lock().await;
        let versions = artifacts
            .get(&reference.name)
            .ok_or_else(|| Error::resolution(reference, "unknown artifact"))?;
        let stored = match reference.version {
            VersionSpec::Latest => versions.last(),
            VersionSpec::Number(n) => versions.iter().find(|v| v.handle.version == n),
        }
        .ok_or_else(|| Error::resolution(reference, "unknown version"))?;

        let path = self
            .scratch
            .path()
            .join(format!("{}-v{}", reference.name, stored.handle.version));
        fs::write(&path, &stored.bytes)
            .await
            .map_err(|e| Error::resolution_with(reference, "materializing artifact", e))?;
        Ok(path)
    }

    async fn publish(&self, path: &Path, spec: &ArtifactSpec) -> Result<ArtifactVersion> {
        if let Some(message) = self.publish_failure.lock().await.clone() {
            return Err(Error::publish(&spec.name, message));
        }
        validate_artifact_name(&spec.name).map_err(|msg| Error::publish(&spec.name, msg))?;

        let bytes = fs::read(path).await?;
        Ok(self
            .seed(&spec.name, &spec.artifact_type, &spec.description, bytes)
            .await)
    }
}
