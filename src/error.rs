//! Error types for the cleaning step

use std::fmt;
use thiserror::Error;

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Failure taxonomy for the cleaning step
#[derive(Error, Debug)]
pub enum Error {
    /// Input artifact reference could not be turned into a readable table
    #[error("resolution error: {reference}: {message}")]
    Resolution {
        reference: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Required column missing or holding a non-numeric value
    #[error("schema error: {0}")]
    Schema(String),

    /// Store rejected the new artifact version
    #[error("publish error: {name}: {message}")]
    Publish {
        name: String,
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// Scratch I/O failed (temp file, local reads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Table serialization failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// Create a resolution error
    pub fn resolution<R: fmt::Display, M: fmt::Display>(reference: R, message: M) -> Self {
        Self::Resolution {
            reference: reference.to_string(),
            message: message.to_string(),
            source: None,
        }
    }

    /// Create a resolution error with an underlying cause
    pub fn resolution_with<R: fmt::Display, M: fmt::Display>(
        reference: R,
        message: M,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Resolution {
            reference: reference.to_string(),
            message: message.to_string(),
            source: Some(source.into()),
        }
    }

    /// Create a schema error
    pub fn schema<M: fmt::Display>(message: M) -> Self {
        Self::Schema(message.to_string())
    }

    /// Create a publish error
    pub fn publish<N: fmt::Display, M: fmt::Display>(name: N, message: M) -> Self {
        Self::Publish {
            name: name.to_string(),
            message: message.to_string(),
            source: None,
        }
    }

    /// Create a publish error with an underlying cause
    pub fn publish_with<N: fmt::Display, M: fmt::Display>(
        name: N,
        message: M,
        source: impl Into<anyhow::Error>,
    ) -> Self {
        Self::Publish {
            name: name.to_string(),
            message: message.to_string(),
            source: Some(source.into()),
        }
    }

    /// Check if this is a resolution error
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }

    /// Check if this is a schema error
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Check if this is a publish error
    pub fn is_publish(&self) -> bool {
        matches!(self, Self::Publish { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::resolution("raw_data:latest", "unknown artifact");
        assert_eq!(
            err.to_string(),
            "resolution error: raw_data:latest: unknown artifact"
        );

        let err = Error::schema("required column 'price' not found");
        assert_eq!(
            err.to_string(),
            "schema error: required column 'price' not found"
        );

        let err = Error::publish("clean_sample.csv", "version directory already exists");
        assert_eq!(
            err.to_string(),
            "publish error: clean_sample.csv: version directory already exists"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(Error::resolution("x", "y").is_resolution());
        assert!(!Error::resolution("x", "y").is_schema());
        assert!(Error::schema("x").is_schema());
        assert!(Error::publish("x", "y").is_publish());
    }

    #[test]
    fn test_source_chain_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::resolution_with("raw_data:v3", "file unreadable", io);
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert!(source.unwrap().to_string().contains("gone"));
    }
}
