//! spring-boot-buildpack - build step of a Spring Boot container-image buildpack
//!
//! Given an unpacked Spring Boot application this library decides which image
//! labels, bill-of-materials entries, launch layers and layer slices the build
//! should contribute. It only reads the application; contributing the layers
//! is left to the caller.
//!
//! # Example Usage
//!
//! ```no_run
//! use spring_boot_buildpack::{BuildContext, SpringBootBuild};
//!
//! # fn main() -> anyhow::Result<()> {
//! let build = SpringBootBuild::default();
//! let context = BuildContext::new("/workspace", "io.buildpacks.stacks.bionic");
//! let result = build.build(&context)?;
//!
//! for label in &result.labels {
//!     println!("{} = {}", label.key, label.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`parsers`]: manifest, properties, configuration metadata and layers index readers
//! - [`buildpack`]: build inputs, result types and dependency resolution
//! - [`pipeline`]: the build phases and the orchestrator running them
//! - [`fs`]: file system abstraction with a real and an in-memory implementation

pub mod buildpack;
pub mod cli;
pub mod config;
pub mod error;
pub mod fs;
pub mod parsers;
pub mod pipeline;
pub mod util;

pub use buildpack::{
    BomEntry, BuildContext, BuildPlan, BuildResult, BuildpackDependency, Label, Layer, Slice,
};
pub use config::{BuildpackConfig, ConfigError};
pub use error::MetadataError;
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use pipeline::SpringBootBuild;
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
