use partialgen::cli::commands::{CliArgs, Commands};
use partialgen::cli::handlers::{handle_aggregate, handle_config, handle_list};
use partialgen::util::logging::{init_logging, parse_level, LoggingConfig};
use partialgen::{PartialgenConfig, VERSION};

use clap::Parser;
use tracing::{debug, Level};

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    init_logging_from_args(&args);

    debug!("partialgen v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let config = PartialgenConfig::default();

    let exit_code = match &args.command {
        Commands::Aggregate(aggregate_args) => {
            handle_aggregate(aggregate_args, &config, args.quiet).await
        }
        Commands::List(list_args) => handle_list(list_args, &config, args.quiet),
        Commands::Config(config_args) => handle_config(config_args, &config),
    };

    std::process::exit(exit_code);
}

fn init_logging_from_args(args: &CliArgs) {
    let mut config = LoggingConfig::from_env();

    if let Some(level_str) = &args.log_level {
        config.level = parse_level(level_str);
    } else if args.verbose {
        config.level = Level::DEBUG;
    } else if args.quiet {
        config.level = Level::ERROR;
    }

    init_logging(config);
}
