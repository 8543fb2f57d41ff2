//! Type definitions for the artifact store

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Which version of an artifact a reference points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionSpec {
    /// Highest version currently in the store
    Latest,
    /// An explicit version number
    Number(u64),
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Number(n) => write!(f, "v{n}"),
        }
    }
}

/// A reference to an existing artifact: `name`, `name:latest`, or `name:vN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRef {
    pub name: String,
    pub version: VersionSpec,
}

impl ArtifactRef {
    pub fn latest(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: VersionSpec::Latest,
        }
    }

    pub fn version(name: impl Into<String>, number: u64) -> Self {
        Self {
            name: name.into(),
            version: VersionSpec::Number(number),
        }
    }
}

impl fmt::Display for ArtifactRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

impl FromStr for ArtifactRef {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, spec) = match s.rsplit_once(':') {
            Some((name, spec)) => (name, Some(spec)),
            None => (s, None),
        };
        validate_artifact_name(name).map_err(|msg| Error::resolution(s, msg))?;

        let version = match spec {
            None | Some("latest") => VersionSpec::Latest,
            Some(spec) => {
                let digits = spec.strip_prefix('v').unwrap_or(spec);
                let number: u64 = digits
                    .parse()
                    .map_err(|_| Error::resolution(s, format!("invalid version '{spec}'")))?;
                VersionSpec::Number(number)
            }
        };

        Ok(Self {
            name: name.to_string(),
            version,
        })
    }
}

/// The three caller-supplied fields a new artifact version is created from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub name: String,
    pub artifact_type: String,
    pub description: String,
}

impl ArtifactSpec {
    pub fn new(
        name: impl Into<String>,
        artifact_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            artifact_type: artifact_type.into(),
            description: description.into(),
        }
    }
}

/// Handle to a published artifact version.
///
/// These are exactly the fields `LocalStore` persists as `metadata.json`
/// inside each version directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactVersion {
    pub name: String,
    pub version: u64,
    pub artifact_type: String,
    pub description: String,
    /// Hex SHA-256 of the contained file
    pub digest: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

impl ArtifactVersion {
    /// The `name:vN` form of this version, as logged for lineage.
    pub fn qualified_name(&self) -> String {
        format!("{}:v{}", self.name, self.version)
    }
}

/// Reject names that would escape the store layout or be empty.
pub(crate) fn validate_artifact_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("artifact name is empty".to_string());
    }
    if name.contains('/') || name.contains('\\') || name == "." || name == ".." {
        return Err(format!("invalid artifact name '{name}'"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_name_means_latest() {
        let r: ArtifactRef = "sample.csv".parse().unwrap();
        assert_eq!(r, ArtifactRef::latest("sample.csv"));
    }

    #[test]
    fn test_parse_explicit_latest() {
        let r: ArtifactRef = "sample.csv:latest".parse().unwrap();
        assert_eq!(r.version, VersionSpec::Latest);
    }

    #[test]
    fn test_parse_numbered_versions() {
        let r: ArtifactRef = "sample.csv:v3".parse().unwrap();
        assert_eq!(r, ArtifactRef::version("sample.csv", 3));
        // bare number also accepted
        let r: ArtifactRef = "sample.csv:7".parse().unwrap();
        assert_eq!(r.version, VersionSpec::Number(7));
    }

    #[test]
    fn test_parse_rejects_bad_inputs() {
        assert!("".parse::<ArtifactRef>().unwrap_err().is_resolution());
        assert!(":latest".parse::<ArtifactRef>().unwrap_err().is_resolution());
        assert!("a/b:v1".parse::<ArtifactRef>().unwrap_err().is_resolution());
        assert!("../up".parse::<ArtifactRef>().unwrap_err().is_resolution());
        assert!("x:vNaN".parse::<ArtifactRef>().unwrap_err().is_resolution());
    }

    #[test]
    fn test_display_round_trips() {
        let r = ArtifactRef::version("sample.csv", 12);
        assert_eq!(r.to_string(), "sample.csv:v12");
        assert_eq!(r.to_string().parse::<ArtifactRef>().unwrap(), r);
    }

    #[test]
    fn test_qualified_name() {
        let v = ArtifactVersion {
            name: "clean_sample.csv".to_string(),
            version: 2,
            artifact_type: "clean_sample".to_string(),
            description: "cleaned".to_string(),
            digest: "00".to_string(),
            size_bytes: 1,
            created_at: Utc::now(),
        };
        assert_eq!(v.qualified_name(), "clean_sample.csv:v2");
    }

    #[test]
    fn test_metadata_serde_round_trip() {
        let v = ArtifactVersion {
            name: "clean_sample.csv".to_string(),
            version: 1,
            artifact_type: "clean_sample".to_string(),
            description: "rows inside bounds".to_string(),
            digest: "ab".repeat(32),
            size_bytes: 42,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&v).unwrap();
        let back: ArtifactVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
