use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;

use crate::util::logging::parse_level;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Build step of the Spring Boot buildpack
#[derive(Parser, Debug)]
#[command(
    name = "spring-boot-build",
    about = "Decide labels, BOM entries, layers and slices for a Spring Boot application",
    version,
    long_about = "spring-boot-build inspects an unpacked Spring Boot application and prints \
                  the image labels, bill-of-materials entries, launch layers and layer slices \
                  the build lifecycle should contribute. Nothing is downloaded or executed."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        value_parser = LOG_LEVELS,
        ignore_case = true,
        help = "Set logging level"
    )]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

impl CliArgs {
    /// Effective log level: `--log-level`, then `-v`/`-q`, then the configured
    /// `BP_LOG_LEVEL`, then INFO.
    pub fn effective_log_level(&self, configured: Option<&str>) -> Level {
        if let Some(level) = &self.log_level {
            parse_level(level)
        } else if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::ERROR
        } else {
            configured.map(parse_level).unwrap_or(Level::INFO)
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Run the build step against an application directory",
        long_about = "Reads META-INF/MANIFEST.MF and related metadata from the application \
                      directory and prints the build result.\n\n\
                      Examples:\n  \
                      spring-boot-build build /workspace\n  \
                      spring-boot-build build /workspace --buildpack buildpack.toml --stack-id io.buildpacks.stacks.bionic\n  \
                      spring-boot-build build /workspace --plan plan.toml --format yaml"
    )]
    Build(BuildArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct BuildArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the unpacked application (defaults to current directory)"
    )]
    pub application_path: Option<PathBuf>,

    #[arg(
        short = 'b',
        long,
        value_name = "FILE",
        help = "buildpack.toml declaring [[metadata.dependencies]]"
    )]
    pub buildpack: Option<PathBuf>,

    #[arg(short = 'p', long, value_name = "FILE", help = "Build plan TOML with [[entries]]")]
    pub plan: Option<PathBuf>,

    #[arg(
        short = 's',
        long,
        value_name = "ID",
        help = "Stack id (defaults to CNB_STACK_ID)"
    )]
    pub stack_id: Option<String>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "json",
        help = "Output format"
    )]
    pub format: OutputFormatArg,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write output to file instead of stdout"
    )]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
