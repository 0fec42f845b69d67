//! partialgen - Sass manifest generation for partial-based stylesheets
//!
//! Style sources are commonly split into partials (`_button.scss`,
//! `components/_card.scss`, ...) that are pulled into one entry point. This
//! crate keeps such entry points up to date: every manifest file
//! (`__all.scss` by default) is rewritten to `@import` each partial found in
//! its directory and sub-directories, behind a banner warning against hand
//! edits.
//!
//! # Example Usage
//!
//! ```no_run
//! use partialgen::{Aggregator, AggregatorConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let aggregator = Aggregator::new(AggregatorConfig::default());
//! let report = aggregator.aggregate_all("src/scss/**/__all.scss").await?;
//!
//! for manifest in &report.manifests {
//!     println!("{}: {} imports", manifest.manifest.display(), manifest.imports);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Project Structure
//!
//! - [`aggregator`]: partial discovery, manifest rendering and batch runs
//! - [`fs`]: file system abstraction with real and in-memory implementations
//! - [`config`]: environment-driven configuration
//! - [`cli`]: command-line interface and output formatting

pub mod aggregator;
pub mod cli;
pub mod config;
pub mod fs;
pub mod util;

pub use aggregator::{
    AggregateError, AggregateReport, Aggregator, AggregatorConfig, ManifestReport, ManifestStatus,
    Partial, PartialOrdering,
};
pub use config::{ConfigError, PartialgenConfig};
pub use fs::{FileSystem, MockFileSystem, RealFileSystem};
pub use util::{init_logging, LoggingConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
