use std::path::PathBuf;
use thiserror::Error;

/// An optional metadata file was present but could not be understood.
///
/// Missing files never produce this error; only files that exist and are
/// malformed do. It travels inside the `anyhow::Error` chain returned by a
/// build, so callers can `downcast_ref::<MetadataError>()`.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Invalid JSON in {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid properties file {path:?} at line {line}: {message}")]
    Properties {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Invalid layers index {path:?}: {source}")]
    LayersIndex {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid TOML in {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl MetadataError {
    pub fn path(&self) -> &PathBuf {
        match self {
            MetadataError::Json { path, .. }
            | MetadataError::Properties { path, .. }
            | MetadataError::LayersIndex { path, .. }
            | MetadataError::Toml { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties_error_display() {
        let err = MetadataError::Properties {
            path: PathBuf::from("META-INF/dataflow-configuration-metadata.properties"),
            line: 3,
            message: "malformed \\uxxxx encoding".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("line 3"));
        assert!(msg.contains("malformed"));
        assert_eq!(
            err.path(),
            &PathBuf::from("META-INF/dataflow-configuration-metadata.properties")
        );
    }

    #[test]
    fn test_json_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = MetadataError::Json {
            path: PathBuf::from("META-INF/spring-configuration-metadata.json"),
            source,
        };

        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("Invalid JSON"));
    }
}
