use super::phases::{dependencies, labels, layers, native_image, slices};
use crate::buildpack::{BuildContext, BuildResult};
use crate::config::BuildpackConfig;
use crate::fs::{FileSystem, RealFileSystem};
use crate::parsers::manifest::SPRING_BOOT_VERSION;
use crate::parsers::Manifest;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Build step of the Spring Boot buildpack.
///
/// Reads the unpacked application once per call and returns the labels, BOM
/// entries, layers and slices the lifecycle should materialize. Nothing is
/// cached between calls.
pub struct SpringBootBuild {
    file_system: Arc<dyn FileSystem>,
    config: BuildpackConfig,
}

impl SpringBootBuild {
    pub fn new(file_system: Arc<dyn FileSystem>, config: BuildpackConfig) -> Self {
        Self {
            file_system,
            config,
        }
    }

    pub fn config(&self) -> &BuildpackConfig {
        &self.config
    }

    /// Run the build.
    ///
    /// Returns an empty result when the manifest carries no
    /// `Spring-Boot-Version`. Any error aborts the whole build; no partial
    /// result is returned.
    pub fn build(&self, context: &BuildContext) -> Result<BuildResult> {
        let start = Instant::now();
        let fs = self.file_system.as_ref();
        let app = context.application_path.as_path();

        let manifest = Manifest::read(fs, app).context("Failed to read application manifest")?;
        let Some(version) = manifest.get(SPRING_BOOT_VERSION) else {
            debug!("No {} in manifest, nothing to contribute", SPRING_BOOT_VERSION);
            return Ok(BuildResult::default());
        };
        info!(version, "Spring Boot application detected");

        let mut result = BuildResult {
            labels: labels::execute(fs, app, &manifest)?,
            ..Default::default()
        };
        result.bom.push(dependencies::execute(fs, app, &manifest)?);

        if native_image::execute(&context.plan) {
            info!("Native image build, skipping layers and slices");
            return Ok(result);
        }

        let plan = layers::execute(context, &manifest, &self.config);
        result.layers = plan.layers;
        result.bom.extend(plan.bom);

        result.slices = slices::execute(fs, app, &manifest)?;

        debug!(
            labels = result.labels.len(),
            layers = result.layers.len(),
            bom = result.bom.len(),
            slices = result.slices.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Build complete"
        );
        Ok(result)
    }
}

impl Default for SpringBootBuild {
    fn default() -> Self {
        Self::new(Arc::new(RealFileSystem::new()), BuildpackConfig::default())
    }
}
