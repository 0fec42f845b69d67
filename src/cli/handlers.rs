use super::commands::{AggregateArgs, ConfigArgs, ListArgs};
use super::output::{OutputFormat, OutputFormatter, PartialListing};
use crate::aggregator::{Aggregator, AggregatorConfig};
use crate::config::PartialgenConfig;
use tracing::{debug, error};

fn load_aggregator_config(config: &PartialgenConfig) -> Option<AggregatorConfig> {
    match config.aggregator_config() {
        Ok(c) => Some(c),
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            None
        }
    }
}

fn emit(output: anyhow::Result<String>, quiet: bool, format: OutputFormat) -> bool {
    match output {
        Ok(text) => {
            if !(quiet && format == OutputFormat::Human) {
                print!("{}", text);
                if !text.ends_with('\n') {
                    println!();
                }
            }
            true
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            false
        }
    }
}

pub async fn handle_aggregate(
    args: &AggregateArgs,
    config: &PartialgenConfig,
    quiet: bool,
) -> i32 {
    let Some(mut aggregator_config) = load_aggregator_config(config) else {
        return 1;
    };
    if let Some(order) = args.order {
        aggregator_config.ordering = order.into();
    }
    aggregator_config.dry_run = args.check;

    let pattern = args.pattern.as_deref().unwrap_or(&config.pattern);
    debug!(pattern, check = args.check, "Running aggregate command");

    let aggregator = Aggregator::new(aggregator_config);
    let report = match aggregator.aggregate_all(pattern).await {
        Ok(report) => report,
        Err(e) => {
            error!(pattern, error = %e, "Aggregation failed");
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let format = OutputFormat::from(args.format);
    let formatter = OutputFormatter::new(format);
    if !emit(formatter.format_report(&report), quiet, format) {
        return 1;
    }

    if report.has_failures() || (args.check && report.has_stale()) {
        1
    } else {
        0
    }
}

pub fn handle_list(args: &ListArgs, config: &PartialgenConfig, quiet: bool) -> i32 {
    let Some(mut aggregator_config) = load_aggregator_config(config) else {
        return 1;
    };
    if let Some(order) = args.order {
        aggregator_config.ordering = order.into();
    }

    let aggregator = Aggregator::new(aggregator_config);
    let partials = match aggregator.discover_partials(&args.root) {
        Ok(partials) => partials,
        Err(e) => {
            error!(root = %args.root.display(), error = %e, "Partial discovery failed");
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let listing = PartialListing {
        root: args.root.clone(),
        partials,
    };

    let format = OutputFormat::from(args.format);
    let formatter = OutputFormatter::new(format);
    if emit(formatter.format_listing(&listing), quiet, format) {
        0
    } else {
        1
    }
}

pub fn handle_config(args: &ConfigArgs, config: &PartialgenConfig) -> i32 {
    let formatter = OutputFormatter::new(args.format.into());
    let printed = emit(formatter.format_config(config), false, args.format.into());

    match config.validate() {
        Ok(()) if printed => 0,
        Ok(()) => 1,
        Err(e) => {
            eprintln!("Warning: {}", e);
            1
        }
    }
}
