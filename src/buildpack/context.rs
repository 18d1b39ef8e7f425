use crate::error::MetadataError;
use crate::fs::FileSystem;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Wildcard stack id accepted in a dependency's `stacks` list.
pub const ANY_STACK: &str = "*";

/// Everything a single build invocation needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildContext {
    /// Root of the unpacked application
    pub application_path: PathBuf,

    /// Dependencies declared in the buildpack's `buildpack.toml`
    pub dependencies: Vec<BuildpackDependency>,

    /// Identifier of the stack the image is built on
    pub stack_id: String,

    /// Entries resolved for this buildpack during detection
    pub plan: BuildPlan,
}

impl BuildContext {
    pub fn new(application_path: impl Into<PathBuf>, stack_id: impl Into<String>) -> Self {
        Self {
            application_path: application_path.into(),
            stack_id: stack_id.into(),
            ..Default::default()
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<BuildpackDependency>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn with_plan(mut self, plan: BuildPlan) -> Self {
        self.plan = plan;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildpackDependency {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default)]
    pub stacks: Vec<String>,
}

impl BuildpackDependency {
    pub fn new(id: impl Into<String>, version: impl Into<String>, stacks: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: None,
            version: version.into(),
            uri: None,
            sha256: None,
            stacks: stacks.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn supports_stack(&self, stack_id: &str) -> bool {
        self.stacks.iter().any(|s| s == stack_id || s == ANY_STACK)
    }
}

/// The subset of `buildpack.toml` this buildpack reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BuildpackDescriptor {
    #[serde(default)]
    pub metadata: BuildpackMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BuildpackMetadata {
    #[serde(default)]
    pub dependencies: Vec<BuildpackDependency>,
}

impl BuildpackDescriptor {
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn read(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        read_toml(fs, path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildPlan {
    #[serde(default)]
    pub entries: Vec<BuildPlanEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildPlanEntry {
    pub name: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl BuildPlan {
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn read(fs: &dyn FileSystem, path: &Path) -> Result<Self> {
        read_toml(fs, path)
    }

    pub fn entries_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a BuildPlanEntry> {
        self.entries.iter().filter(move |e| e.name == name)
    }
}

impl BuildPlanEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            metadata: Map::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(fs: &dyn FileSystem, path: &Path) -> Result<T> {
    let content = fs.read_to_string(path)?;
    let parsed = toml::from_str(&content).map_err(|source| MetadataError::Toml {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    const BUILDPACK_TOML: &str = r#"
api = "0.5"

[buildpack]
id = "example/spring-boot"
version = "1.0.0"

[[metadata.dependencies]]
id = "spring-cloud-bindings"
name = "Spring Cloud Bindings"
version = "1.1.0"
uri = "https://repo.example.com/spring-cloud-bindings-1.1.0.jar"
sha256 = "0000000000000000000000000000000000000000000000000000000000000000"
stacks = ["io.buildpacks.stacks.bionic", "*"]
"#;

    #[test]
    fn test_descriptor_from_toml() {
        let descriptor = BuildpackDescriptor::from_toml_str(BUILDPACK_TOML).unwrap();
        let deps = &descriptor.metadata.dependencies;

        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].id, "spring-cloud-bindings");
        assert_eq!(deps[0].name.as_deref(), Some("Spring Cloud Bindings"));
        assert_eq!(deps[0].version, "1.1.0");
        assert_eq!(deps[0].stacks.len(), 2);
    }

    #[test]
    fn test_descriptor_without_metadata() {
        let descriptor = BuildpackDescriptor::from_toml_str("api = \"0.5\"\n").unwrap();
        assert!(descriptor.metadata.dependencies.is_empty());
    }

    #[test]
    fn test_supports_stack() {
        let dep = BuildpackDependency::new("spring-cloud-bindings", "1.1.0", &["test-stack-id"]);
        assert!(dep.supports_stack("test-stack-id"));
        assert!(!dep.supports_stack("other-stack"));

        let any = BuildpackDependency::new("spring-cloud-bindings", "1.1.0", &["*"]);
        assert!(any.supports_stack("other-stack"));
    }

    #[test]
    fn test_plan_from_toml() {
        let plan = BuildPlan::from_toml_str(
            r#"
[[entries]]
name = "spring-boot"

[entries.metadata]
native-image = true

[[entries]]
name = "jvm-application"
"#,
        )
        .unwrap();

        assert_eq!(plan.entries.len(), 2);
        assert_eq!(
            plan.entries[0].metadata.get("native-image"),
            Some(&Value::Bool(true))
        );
        assert!(plan.entries[1].metadata.is_empty());
        assert_eq!(plan.entries_named("spring-boot").count(), 1);
    }

    #[test]
    fn test_read_invalid_toml_is_metadata_error() {
        let fs = MockFileSystem::new();
        fs.add_file("plan.toml", "[[entries]\nname = ");

        let err = BuildPlan::read(&fs, Path::new("plan.toml")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MetadataError>(),
            Some(MetadataError::Toml { .. })
        ));
    }

    #[test]
    fn test_context_builder() {
        let context = BuildContext::new("/workspace", "test-stack-id")
            .with_dependencies(vec![BuildpackDependency::new("a", "1.0", &["*"])])
            .with_plan(BuildPlan {
                entries: vec![BuildPlanEntry::new("spring-boot")],
            });

        assert_eq!(context.application_path, PathBuf::from("/workspace"));
        assert_eq!(context.stack_id, "test-stack-id");
        assert_eq!(context.dependencies.len(), 1);
        assert_eq!(context.plan.entries.len(), 1);
    }
}
