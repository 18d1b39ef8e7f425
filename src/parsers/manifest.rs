//! `META-INF/MANIFEST.MF` reader

use crate::fs::FileSystem;
use anyhow::Result;
use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

pub const MANIFEST_PATH: &str = "META-INF/MANIFEST.MF";

pub const SPRING_BOOT_VERSION: &str = "Spring-Boot-Version";
pub const SPRING_BOOT_CLASSES: &str = "Spring-Boot-Classes";
pub const SPRING_BOOT_LIB: &str = "Spring-Boot-Lib";
pub const SPRING_BOOT_LAYERS_INDEX: &str = "Spring-Boot-Layers-Index";
pub const IMPLEMENTATION_TITLE: &str = "Implementation-Title";
pub const IMPLEMENTATION_VERSION: &str = "Implementation-Version";

/// Main-section attributes of a JAR manifest, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    attributes: IndexMap<String, String>,
}

impl Manifest {
    /// Read the manifest of an unpacked application.
    ///
    /// A missing manifest is not an error: it yields an empty `Manifest`.
    pub fn read(fs: &dyn FileSystem, application_path: &Path) -> Result<Self> {
        let path = application_path.join(MANIFEST_PATH);
        if !fs.is_file(&path) {
            debug!("No manifest at {:?}", path);
            return Ok(Self::default());
        }

        let content = fs.read_to_string(&path)?;
        let manifest = Self::parse(&content);
        debug!(attributes = manifest.len(), "Parsed {:?}", path);
        Ok(manifest)
    }

    /// Parse manifest text. Malformed lines are skipped.
    ///
    /// Parsing stops at the first blank line after an attribute, which ends
    /// the main section; per-entry sections that follow are not read.
    pub fn parse(content: &str) -> Self {
        let mut attributes: IndexMap<String, String> = IndexMap::new();
        let mut current: Option<String> = None;

        for raw in content.split('\n') {
            let line = raw.strip_suffix('\r').unwrap_or(raw);

            if line.is_empty() {
                if attributes.is_empty() {
                    continue;
                }
                break;
            }

            if let Some(rest) = line.strip_prefix(' ') {
                if let Some(value) = current.as_ref().and_then(|k| attributes.get_mut(k)) {
                    value.push_str(rest);
                }
                continue;
            }

            match line.split_once(':') {
                Some((key, value)) if is_valid_name(key) => {
                    let value = value.strip_prefix(' ').unwrap_or(value);
                    attributes.insert(key.to_string(), value.to_string());
                    current = Some(key.to_string());
                }
                _ => current = None,
            }
        }

        Self { attributes }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

fn is_valid_name(key: &str) -> bool {
    !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}
