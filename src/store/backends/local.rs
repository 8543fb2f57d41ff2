//! Filesystem-backed artifact store
//!
//! Layout: `<root>/<artifact-name>/v<N>/` holding the artifact file (named
//! after the artifact) plus a `metadata.json`. Version directories are
//! created with create-new semantics and never modified afterwards, so a
//! concurrent publish of the same name loses the race with a publish error
//! instead of clobbering anything.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::store::config::StoreConfig;
use crate::store::traits::ArtifactStore;
use crate::store::types::{
    validate_artifact_name, ArtifactRef, ArtifactSpec, ArtifactVersion, VersionSpec,
};

const METADATA_FILE: &str = "metadata.json";

/// Versioned on-disk artifact store.
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    /// Create a store rooted at the configured directory.
    pub fn new(config: StoreConfig) -> Self {
        Self { root: config.root }
    }

    /// Create a store rooted per the environment (`SCOUR_STORE_DIR` or
    /// `~/.scour`).
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(StoreConfig::from_env()?))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn version_dir(&self, name: &str, version: u64) -> PathBuf {
        self.artifact_dir(name).join(format!("v{version}"))
    }

    /// Highest version number present for an artifact, if any.
    async fn latest_version(&self, name: &str) -> Result<Option<u64>> {
        let dir = self.artifact_dir(name);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };

        let mut latest = None;
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(number) = file_name
                .to_str()
                .and_then(|s| s.strip_prefix('v'))
                .and_then(|s| s.parse::<u64>().ok())
            else {
                continue;
            };
            if latest.is_none_or(|n| number > n) {
                latest = Some(number);
            }
        }
        Ok(latest)
    }

    async fn read_metadata(&self, reference: &ArtifactRef, dir: &Path) -> Result<ArtifactVersion> {
        let content = fs::read_to_string(dir.join(METADATA_FILE))
            .await
            .map_err(|e| Error::resolution_with(reference, "version metadata unreadable", e))?;
        serde_json::from_str(&content)
            .map_err(|e| Error::resolution_with(reference, "version metadata corrupt", e))
    }

    async fn sync_path(path: &Path) -> std::io::Result<()> {
        fs::File::open(path).await?.sync_all().await
    }
}

#[async_trait]
impl ArtifactStore for LocalStore {
    async fn resolve(&self, reference: &ArtifactRef) -> Result<PathBuf> {
        validate_artifact_name(&reference.name)
            .map_err(|msg| Error::resolution(reference, msg))?;

        let version = match reference.version {
            VersionSpec::Number(n) => n,
            VersionSpec::Latest => self
                .latest_version(&reference.name)
                .await?
                .ok_or_else(|| Error::resolution(reference, "unknown artifact"))?,
        };

        let dir = self.version_dir(&reference.name, version);
        let metadata = self.read_metadata(reference, &dir).await?;
        let path = dir.join(&metadata.name);
        if fs::metadata(&path).await.is_err() {
            return Err(Error::resolution(reference, "artifact file missing"));
        }

        info!(
            artifact = %metadata.qualified_name(),
            artifact_type = %metadata.artifact_type,
            "resolved input artifact"
        );
        Ok(path)
    }

    async fn publish(&self, path: &Path, spec: &ArtifactSpec) -> Result<ArtifactVersion> {
        validate_artifact_name(&spec.name).map_err(|msg| Error::publish(&spec.name, msg))?;

        let bytes = fs::read(path).await?;
        let digest = format!("{:x}", Sha256::digest(&bytes));

        fs::create_dir_all(self.artifact_dir(&spec.name))
            .await
            .map_err(|e| Error::publish_with(&spec.name, "store root unwritable", e))?;

        let version = self.latest_version(&spec.name).await?.unwrap_or(0) + 1;
        let dir = self.version_dir(&spec.name, version);
        match fs::create_dir(&dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(Error::publish(
                    &spec.name,
                    format!("version v{version} already exists"),
                ));
            }
            Err(e) => return Err(Error::publish_with(&spec.name, "version directory", e)),
        }
        debug!(dir = %dir.display(), "allocated version directory");

        let handle = ArtifactVersion {
            name: spec.name.clone(),
            version,
            artifact_type: spec.artifact_type.clone(),
            description: spec.description.clone(),
            digest,
            size_bytes: bytes.len() as u64,
            created_at: Utc::now(),
        };

        let file_path = dir.join(&spec.name);
        fs::write(&file_path, &bytes)
            .await
            .map_err(|e| Error::publish_with(&spec.name, "writing artifact file", e))?;

        let metadata_path = dir.join(METADATA_FILE);
        let metadata = serde_json::to_string_pretty(&handle)
            .map_err(|e| Error::publish_with(&spec.name, "encoding metadata", e))?;
        fs::write(&metadata_path, metadata)
            .await
            .map_err(|e| Error::publish_with(&spec.name, "writing metadata", e))?;

        // Durability barrier: file, metadata, then the directory entry.
        for target in [file_path.as_path(), metadata_path.as_path(), dir.as_path()] {
            Self::sync_path(target)
                .await
                .map_err(|e| Error::publish_with(&spec.name, "fsync", e))?;
        }

        info!(
            artifact = %handle.qualified_name(),
            artifact_type = %handle.artifact_type,
            size_bytes = handle.size_bytes,
            "published artifact version"
        );
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> LocalStore {
        LocalStore::new(StoreConfig::with_root(dir.path()))
    }

    async fn write_source(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).await.unwrap();
        path
    }

    #[tokio::test]
    async fn test_publish_allocates_increasing_versions() {
        let root = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let store = store(&root);
        let source = write_source(&scratch, "data.csv", "a,b\n1,2\n").await;

        let spec = ArtifactSpec::new("sample.csv", "raw_data", "first upload");
        let v1 = store.publish(&source, &spec).await.unwrap();
        let v2 = store.publish(&source, &spec).await.unwrap();
        assert_eq!(v1.version, 1);
        assert_eq!(v2.version, 2);
        assert_eq!(v1.size_bytes, 8);
        assert_eq!(v1.digest.len(), 64);
    }

    #[tokio::test]
    async fn test_resolve_latest_and_numbered() {
        let root = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let store = store(&root);

        let first = write_source(&scratch, "one.csv", "a\n1\n").await;
        let second = write_source(&scratch, "two.csv", "a\n2\n").await;
        let spec = ArtifactSpec::new("sample.csv", "raw_data", "upload");
        store.publish(&first, &spec).await.unwrap();
        store.publish(&second, &spec).await.unwrap();

        let latest = store.resolve(&ArtifactRef::latest("sample.csv")).await.unwrap();
        assert_eq!(fs::read_to_string(&latest).await.unwrap(), "a\n2\n");

        let pinned = store
            .resolve(&ArtifactRef::version("sample.csv", 1))
            .await
            .unwrap();
        assert_eq!(fs::read_to_string(&pinned).await.unwrap(), "a\n1\n");
    }

    #[tokio::test]
    async fn test_metadata_persisted_on_disk() {
        let root = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let store = store(&root);
        let source = write_source(&scratch, "data.csv", "a,b\n1,2\n").await;

        let spec = ArtifactSpec::new("sample.csv", "raw_data", "rows as uploaded");
        let published = store.publish(&source, &spec).await.unwrap();

        let metadata_path = root.path().join("sample.csv/v1/metadata.json");
        let content = fs::read_to_string(&metadata_path).await.unwrap();
        let read_back: ArtifactVersion = serde_json::from_str(&content).unwrap();
        assert_eq!(read_back, published);
        assert_eq!(read_back.artifact_type, "raw_data");
        assert_eq!(read_back.description, "rows as uploaded");
    }

    #[tokio::test]
    async fn test_resolve_unknown_artifact() {
        let root = TempDir::new().unwrap();
        let store = store(&root);
        let err = store
            .resolve(&ArtifactRef::latest("absent.csv"))
            .await
            .unwrap_err();
        assert!(err.is_resolution());
        assert!(err.to_string().contains("unknown artifact"));
    }

    #[tokio::test]
    async fn test_resolve_missing_version() {
        let root = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let store = store(&root);
        let source = write_source(&scratch, "data.csv", "a\n1\n").await;
        let spec = ArtifactSpec::new("sample.csv", "raw_data", "upload");
        store.publish(&source, &spec).await.unwrap();

        let err = store
            .resolve(&ArtifactRef::version("sample.csv", 9))
            .await
            .unwrap_err();
        assert!(err.is_resolution());
    }

    #[tokio::test]
    async fn test_publish_rejects_invalid_names() {
        let root = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let store = store(&root);
        let source = write_source(&scratch, "data.csv", "a\n1\n").await;

        for name in ["", "a/b", "..", r"a\b"] {
            let spec = ArtifactSpec::new(name, "raw_data", "upload");
            let err = store.publish(&source, &spec).await.unwrap_err();
            assert!(err.is_publish(), "name {name:?} should be rejected");
        }
    }

    #[tokio::test]
    async fn test_in_flight_version_directory_not_clobbered() {
        let root = TempDir::new().unwrap();
        let scratch = TempDir::new().unwrap();
        let store = store(&root);
        let source = write_source(&scratch, "data.csv", "a\n1\n").await;

        // a racing publisher has already claimed v1
        fs::create_dir_all(root.path().join("sample.csv/v1"))
            .await
            .unwrap();
        let spec = ArtifactSpec::new("sample.csv", "raw_data", "upload");
        let published = store.publish(&source, &spec).await.unwrap();
        assert_eq!(published.version, 2);
        // the claimed directory stays untouched
        let mut entries = fs::read_dir(root.path().join("sample.csv/v1")).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }
}
