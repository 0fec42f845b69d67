pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{AggregateArgs, CliArgs, Commands, ConfigArgs, ListArgs, OrderArg};
pub use output::{OutputFormat, OutputFormatter, PartialListing};
