//! Launch layers contributed for a Spring Boot application
//!
//! Order is part of the contract: helper, web-application-type, then the
//! bindings dependency. BOM entries follow the same order.

use super::dependencies::DEFAULT_LIB;
use super::manifest_dir;
use crate::buildpack::{BomEntry, BuildContext, DependencyResolver, Layer};
use crate::config::BuildpackConfig;
use crate::parsers::manifest::{SPRING_BOOT_CLASSES, SPRING_BOOT_LIB};
use crate::parsers::Manifest;
use tracing::{debug, info};

pub const BINDINGS_DEPENDENCY_ID: &str = "spring-cloud-bindings";
pub const BINDINGS_HELPER: &str = "spring-cloud-bindings";
pub const DEFAULT_CLASSES: &str = "BOOT-INF/classes";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerPlan {
    pub layers: Vec<Layer>,
    pub bom: Vec<BomEntry>,
}

pub fn execute(context: &BuildContext, manifest: &Manifest, config: &BuildpackConfig) -> LayerPlan {
    let bindings = if config.bindings_disabled {
        info!("Spring Cloud Bindings disabled, skipping helper and bindings layers");
        None
    } else {
        let resolver = DependencyResolver::new(&context.dependencies, &context.stack_id);
        let resolved = resolver.resolve(BINDINGS_DEPENDENCY_ID, &config.bindings_version);
        if resolved.is_none() {
            debug!(
                stack = %context.stack_id,
                "No {} dependency for this stack",
                BINDINGS_DEPENDENCY_ID
            );
        }
        resolved
    };

    let mut layers = Vec::new();

    if bindings.is_some() {
        layers.push(Layer::helper(vec![BINDINGS_HELPER.to_string()]));
    }

    let app = &context.application_path;
    layers.push(Layer::web_application_type(
        manifest_dir(app, manifest, SPRING_BOOT_CLASSES, DEFAULT_CLASSES),
        manifest_dir(app, manifest, SPRING_BOOT_LIB, DEFAULT_LIB),
    ));

    if let Some(dependency) = bindings {
        info!(version = %dependency.version, "Contributing {}", dependency.id);
        layers.push(Layer::dependency(dependency.clone()));
    }

    let bom = layers.iter().filter_map(Layer::bom_entry).collect();
    LayerPlan { layers, bom }
}
