//! Application slices from the Spring Boot layers index

use super::manifest_path;
use crate::buildpack::Slice;
use crate::fs::FileSystem;
use crate::parsers::manifest::SPRING_BOOT_LAYERS_INDEX;
use crate::parsers::{LayersIndex, Manifest};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, warn};

pub fn execute(
    fs: &dyn FileSystem,
    application_path: &Path,
    manifest: &Manifest,
) -> Result<Vec<Slice>> {
    let Some(index_path) = manifest_path(manifest, SPRING_BOOT_LAYERS_INDEX) else {
        debug!("No usable {} in manifest", SPRING_BOOT_LAYERS_INDEX);
        return Ok(Vec::new());
    };

    let path = application_path.join(index_path);
    let Some(index) = LayersIndex::read(fs, &path).context("Failed to read layers index")? else {
        warn!("Layers index {:?} named in manifest does not exist", path);
        return Ok(Vec::new());
    };

    let slices: Vec<Slice> = index
        .into_layers()
        .into_iter()
        .map(|(name, paths)| {
            debug!(slice = %name, paths = paths.len(), "Slice");
            Slice { paths }
        })
        .collect();

    debug!(count = slices.len(), "Contributed slices");
    Ok(slices)
}
