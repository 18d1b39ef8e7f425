//! Image labels derived from the manifest and configuration metadata

use crate::buildpack::Label;
use crate::fs::FileSystem;
use crate::parsers::configuration_metadata::read_dataflow_classes;
use crate::parsers::manifest::{IMPLEMENTATION_TITLE, IMPLEMENTATION_VERSION, SPRING_BOOT_VERSION};
use crate::parsers::{ConfigurationMetadata, Manifest};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

pub const BOOT_VERSION_LABEL: &str = "org.springframework.boot.version";
pub const CONFIGURATION_METADATA_LABEL: &str =
    "org.springframework.boot.spring-configuration-metadata.json";
pub const DATAFLOW_CONFIGURATION_METADATA_LABEL: &str =
    "org.springframework.cloud.dataflow.spring-configuration-metadata.json";
pub const IMAGE_TITLE_LABEL: &str = "org.opencontainers.image.title";
pub const IMAGE_VERSION_LABEL: &str = "org.opencontainers.image.version";

pub fn execute(
    fs: &dyn FileSystem,
    application_path: &Path,
    manifest: &Manifest,
) -> Result<Vec<Label>> {
    let mut labels = Vec::new();

    if let Some(version) = manifest.get(SPRING_BOOT_VERSION) {
        labels.push(Label::new(BOOT_VERSION_LABEL, version));
    }

    let metadata = ConfigurationMetadata::read(fs, application_path)
        .context("Failed to read configuration metadata")?;

    if let Some(metadata) = &metadata {
        labels.push(Label::new(
            CONFIGURATION_METADATA_LABEL,
            metadata.to_compact_string()?,
        ));

        let classes = read_dataflow_classes(fs, application_path)
            .context("Failed to read dataflow configuration metadata")?;
        if let Some(classes) = classes {
            match metadata.filter_source_types(&classes) {
                Some(dataflow) => labels.push(Label::new(
                    DATAFLOW_CONFIGURATION_METADATA_LABEL,
                    dataflow.to_compact_string()?,
                )),
                None => debug!(?classes, "No configuration metadata matches dataflow classes"),
            }
        }
    }

    if let Some(title) = manifest.get(IMPLEMENTATION_TITLE) {
        labels.push(Label::new(IMAGE_TITLE_LABEL, title));
    }

    if let Some(version) = manifest.get(IMPLEMENTATION_VERSION) {
        labels.push(Label::new(IMAGE_VERSION_LABEL, version));
    }

    debug!(count = labels.len(), "Generated image labels");
    Ok(labels)
}
