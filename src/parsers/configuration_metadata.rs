//! Spring configuration metadata (`spring-configuration-metadata.json`)
//!
//! The document is kept as an order-preserving `serde_json::Value` so that
//! re-serializing it only removes insignificant whitespace and never moves
//! object keys around.

use super::properties::Properties;
use crate::error::MetadataError;
use crate::fs::FileSystem;
use anyhow::Result;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

pub const CONFIGURATION_METADATA_PATH: &str = "META-INF/spring-configuration-metadata.json";
pub const DATAFLOW_METADATA_PATH: &str = "META-INF/dataflow-configuration-metadata.properties";
pub const DATAFLOW_CLASSES_KEY: &str = "configuration-properties.classes";

const GROUPS: &str = "groups";
const PROPERTIES: &str = "properties";
const HINTS: &str = "hints";
const SOURCE_TYPE: &str = "sourceType";
const NAME: &str = "name";

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationMetadata {
    document: Value,
}

impl ConfigurationMetadata {
    /// Read the application's configuration metadata, if it ships one.
    pub fn read(fs: &dyn FileSystem, application_path: &Path) -> Result<Option<Self>> {
        let path = application_path.join(CONFIGURATION_METADATA_PATH);
        if !fs.is_file(&path) {
            return Ok(None);
        }

        let content = fs.read_to_string(&path)?;
        let metadata =
            Self::parse(&content).map_err(|source| MetadataError::Json { path, source })?;

        Ok(Some(metadata))
    }

    pub fn parse(content: &str) -> serde_json::Result<Self> {
        Ok(Self {
            document: serde_json::from_str(content)?,
        })
    }

    /// Canonical single-line form of the document.
    pub fn to_compact_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.document)?)
    }

    pub fn groups(&self) -> &[Value] {
        self.array(GROUPS)
    }

    pub fn properties(&self) -> &[Value] {
        self.array(PROPERTIES)
    }

    /// Restrict the document to the entries contributed by `classes`.
    ///
    /// Groups and properties are kept when their `sourceType` is one of
    /// `classes`; hints are kept when they describe a kept property. Returns
    /// `None` when nothing matches.
    pub fn filter_source_types(&self, classes: &[String]) -> Option<Self> {
        let classes: HashSet<&str> = classes.iter().map(String::as_str).collect();
        let by_source_type = |entry: &&Value| {
            entry
                .get(SOURCE_TYPE)
                .and_then(Value::as_str)
                .map(|source| classes.contains(source))
                .unwrap_or(false)
        };

        let groups: Vec<Value> = self.groups().iter().filter(by_source_type).cloned().collect();
        let properties: Vec<Value> = self
            .properties()
            .iter()
            .filter(by_source_type)
            .cloned()
            .collect();

        if groups.is_empty() && properties.is_empty() {
            return None;
        }

        let property_names: HashSet<&str> = properties
            .iter()
            .filter_map(|p| p.get(NAME).and_then(Value::as_str))
            .collect();
        let hints: Vec<Value> = self
            .array(HINTS)
            .iter()
            .filter(|h| {
                h.get(NAME)
                    .and_then(Value::as_str)
                    .map(|name| property_names.contains(name))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();

        let mut filtered = Map::new();
        let mut sections = [(GROUPS, groups), (PROPERTIES, properties), (HINTS, hints)];
        if let Some(object) = self.document.as_object() {
            // Keep the section order of the source document.
            for key in object.keys() {
                if let Some((name, values)) = sections.iter_mut().find(|(name, _)| name == key) {
                    if !values.is_empty() {
                        filtered.insert(name.to_string(), Value::Array(std::mem::take(values)));
                    }
                }
            }
        }

        Some(Self {
            document: Value::Object(filtered),
        })
    }

    fn array(&self, key: &str) -> &[Value] {
        self.document
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Classes named by `dataflow-configuration-metadata.properties`.
///
/// `None` when the file is absent; an empty list when it names no classes.
pub fn read_dataflow_classes(
    fs: &dyn FileSystem,
    application_path: &Path,
) -> Result<Option<Vec<String>>> {
    let path = application_path.join(DATAFLOW_METADATA_PATH);
    let Some(properties) = Properties::read(fs, &path)? else {
        return Ok(None);
    };

    let classes = properties.get_list(DATAFLOW_CLASSES_KEY);
    debug!(?classes, "Dataflow configuration classes");
    Ok(Some(classes))
}
