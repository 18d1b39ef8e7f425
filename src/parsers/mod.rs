//! Parsers for the files a packaged Spring Boot application carries
//!
//! Every parser treats a missing file as "feature absent" and only fails on
//! I/O errors or on content that is present but malformed.

pub mod configuration_metadata;
pub mod layers_index;
pub mod manifest;
pub mod properties;

pub use configuration_metadata::ConfigurationMetadata;
pub use layers_index::LayersIndex;
pub use manifest::Manifest;
pub use properties::Properties;
