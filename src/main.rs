use spring_boot_buildpack::cli::commands::{CliArgs, Commands};
use spring_boot_buildpack::cli::handlers::handle_build;
use spring_boot_buildpack::util::logging::{init_logging, LoggingConfig};
use spring_boot_buildpack::{BuildpackConfig, VERSION};

use clap::Parser;
use tracing::{debug, error};

fn main() {
    let args = CliArgs::parse();
    let config = BuildpackConfig::from_env();

    let configured_level = config.as_ref().ok().map(|c| c.log_level.as_str());
    init_logging(LoggingConfig::from_env(
        args.effective_log_level(configured_level),
    ));

    debug!("spring-boot-build v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid buildpack configuration: {}", e);
            if !args.quiet {
                eprintln!("Error: Invalid buildpack configuration: {}", e);
            }
            std::process::exit(1);
        }
    };

    let exit_code = match &args.command {
        Commands::Build(build_args) => handle_build(build_args, &config, args.quiet),
    };

    std::process::exit(exit_code);
}
