use super::context::BuildpackDependency;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::PathBuf;

/// Image label to be written to the output image config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub value: String,
}

impl Label {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomEntry {
    pub name: String,
    pub metadata: Map<String, Value>,
    pub build: bool,
    pub launch: bool,
}

impl BomEntry {
    /// Entry describing something present in the launch image only.
    pub fn launch(name: impl Into<String>, metadata: Map<String, Value>) -> Self {
        Self {
            name: name.into(),
            metadata,
            build: false,
            launch: true,
        }
    }
}

/// Group of application paths that should land in their own image layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    pub paths: Vec<String>,
}

/// What a layer carries. The lifecycle side turns this into files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LayerContribution {
    /// Launch-time helper programs
    Helper { names: Vec<String> },
    /// Classifies the application as reactive, servlet or none
    WebApplicationType { classes: PathBuf, lib: PathBuf },
    /// A buildpack dependency copied into the image
    Dependency { dependency: BuildpackDependency },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layer {
    pub name: String,
    pub launch: bool,
    pub build: bool,
    pub cache: bool,
    #[serde(flatten)]
    pub contribution: LayerContribution,
}

impl Layer {
    pub fn helper(names: Vec<String>) -> Self {
        Self::launch("helper", LayerContribution::Helper { names })
    }

    pub fn web_application_type(classes: PathBuf, lib: PathBuf) -> Self {
        Self::launch(
            "web-application-type",
            LayerContribution::WebApplicationType { classes, lib },
        )
    }

    pub fn dependency(dependency: BuildpackDependency) -> Self {
        Self::launch(
            dependency.id.clone(),
            LayerContribution::Dependency { dependency },
        )
    }

    fn launch(name: impl Into<String>, contribution: LayerContribution) -> Self {
        Self {
            name: name.into(),
            launch: true,
            build: false,
            cache: false,
            contribution,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the helper programs, for helper layers.
    pub fn helper_names(&self) -> Option<&[String]> {
        match &self.contribution {
            LayerContribution::Helper { names } => Some(names),
            _ => None,
        }
    }

    /// BOM entry recorded for this layer, if it contributes one.
    ///
    /// The web-application-type layer only carries generated environment and
    /// has nothing to account for.
    pub fn bom_entry(&self) -> Option<BomEntry> {
        let metadata = match &self.contribution {
            LayerContribution::Helper { names } => json!({
                "layer": self.name,
                "names": names,
            }),
            LayerContribution::WebApplicationType { .. } => return None,
            LayerContribution::Dependency { dependency } => {
                let mut metadata = json!({
                    "id": dependency.id,
                    "name": dependency.name.as_deref().unwrap_or(&dependency.id),
                    "version": dependency.version,
                    "stacks": dependency.stacks,
                    "layer": self.name,
                });
                if let Some(uri) = &dependency.uri {
                    metadata["uri"] = json!(uri);
                }
                if let Some(sha256) = &dependency.sha256 {
                    metadata["sha256"] = json!(sha256);
                }
                metadata
            }
        };

        let metadata = match metadata {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        Some(BomEntry {
            name: self.name.clone(),
            metadata,
            build: self.build,
            launch: self.launch,
        })
    }
}

/// Declarative outcome of a build.
///
/// An empty result means the buildpack does not apply to the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildResult {
    pub labels: Vec<Label>,
    pub layers: Vec<Layer>,
    pub bom: Vec<BomEntry>,
    pub slices: Vec<Slice>,
}

impl BuildResult {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.layers.is_empty()
            && self.bom.is_empty()
            && self.slices.is_empty()
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .iter()
            .find(|l| l.key == key)
            .map(|l| l.value.as_str())
    }

    pub fn bom_entry(&self, name: &str) -> Option<&BomEntry> {
        self.bom.iter().find(|e| e.name == name)
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(Layer::name).collect()
    }
}
