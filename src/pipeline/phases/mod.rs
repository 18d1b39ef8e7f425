//! Build phases, in the order the orchestrator runs them

pub mod dependencies;
pub mod labels;
pub mod layers;
pub mod native_image;
pub mod slices;

use crate::parsers::Manifest;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// Relative path named by a manifest attribute.
///
/// Blank values are treated as absent. Absolute paths and paths with `..`
/// would leave the application tree, so they are ignored with a warning.
pub(crate) fn manifest_path(manifest: &Manifest, attribute: &str) -> Option<PathBuf> {
    let value = manifest
        .get(attribute)
        .map(|v| v.trim().trim_end_matches('/'))
        .filter(|v| !v.is_empty())?;

    let path = Path::new(value);
    let contained = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !contained {
        warn!("Ignoring {}: {:?} is outside the application", attribute, value);
        return None;
    }

    Some(path.to_path_buf())
}

/// Resolve a directory named by a manifest attribute against the application root.
pub(crate) fn manifest_dir(
    application_path: &Path,
    manifest: &Manifest,
    attribute: &str,
    default: &str,
) -> PathBuf {
    let relative = manifest_path(manifest, attribute).unwrap_or_else(|| PathBuf::from(default));
    application_path.join(relative)
}
