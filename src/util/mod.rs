//! Utility modules for partialgen

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
