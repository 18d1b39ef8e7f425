//! Spring Boot `layers.idx` reader

use crate::error::MetadataError;
use crate::fs::FileSystem;
use anyhow::Result;
use indexmap::IndexMap;
use std::path::Path;

/// Ordered layer groups of a layers index file.
///
/// The file is a YAML sequence of single-key maps:
///
/// ```text
/// - "dependencies":
///   - "BOOT-INF/lib/"
/// - "application":
///   - "BOOT-INF/classes/"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayersIndex {
    layers: Vec<(String, Vec<String>)>,
}

impl LayersIndex {
    pub fn read(fs: &dyn FileSystem, path: &Path) -> Result<Option<Self>> {
        if !fs.is_file(path) {
            return Ok(None);
        }

        let content = fs.read_to_string(path)?;
        let index = Self::parse(&content).map_err(|source| MetadataError::LayersIndex {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Some(index))
    }

    pub fn parse(content: &str) -> serde_yaml::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let groups: Vec<IndexMap<String, Option<Vec<String>>>> = serde_yaml::from_str(content)?;
        let layers = groups
            .into_iter()
            .flat_map(|group| group.into_iter())
            .map(|(name, paths)| (name, paths.unwrap_or_default()))
            .collect();

        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[(String, Vec<String>)] {
        &self.layers
    }

    pub fn into_layers(self) -> Vec<(String, Vec<String>)> {
        self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
