//! Utility modules
//!
//! Currently only structured logging setup.

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
