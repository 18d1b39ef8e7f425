use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

use super::commands::BuildArgs;
use super::output::{OutputFormat, OutputFormatter};
use crate::buildpack::{BuildContext, BuildPlan, BuildResult, BuildpackDescriptor};
use crate::config::BuildpackConfig;
use crate::fs::{FileSystem, RealFileSystem};
use crate::pipeline::SpringBootBuild;

pub const STACK_ID_ENV: &str = "CNB_STACK_ID";

/// Runs the `build` subcommand and returns the process exit code.
pub fn handle_build(args: &BuildArgs, config: &BuildpackConfig, quiet: bool) -> i32 {
    match run_build(args, config, quiet) {
        Ok(_) => 0,
        Err(e) => {
            error!("Build failed: {:#}", e);
            if !quiet {
                eprintln!("Error: {:#}", e);
            }
            1
        }
    }
}

fn run_build(args: &BuildArgs, config: &BuildpackConfig, quiet: bool) -> Result<BuildResult> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let context = build_context(args, fs.as_ref())?;
    info!(
        application = %context.application_path.display(),
        stack = %context.stack_id,
        "Inspecting application"
    );

    let result = SpringBootBuild::new(fs, config.clone()).build(&context)?;
    if result.is_empty() {
        info!("No Spring-Boot-Version in manifest, nothing to contribute");
    }

    let rendered = OutputFormatter::new(OutputFormat::from(args.format)).format(&result)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            if !quiet {
                eprintln!("Build result written to {}", path.display());
            }
        }
        None => println!("{}", rendered),
    }

    Ok(result)
}

fn build_context(args: &BuildArgs, fs: &dyn FileSystem) -> Result<BuildContext> {
    let application_path = args
        .application_path
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    if !fs.is_dir(&application_path) {
        anyhow::bail!(
            "Application path {} is not a directory",
            application_path.display()
        );
    }

    let stack_id = args
        .stack_id
        .clone()
        .or_else(|| env::var(STACK_ID_ENV).ok())
        .unwrap_or_default();

    let dependencies = match &args.buildpack {
        Some(path) => BuildpackDescriptor::read(fs, path)?.metadata.dependencies,
        None => Vec::new(),
    };
    debug!("{} buildpack dependencies declared", dependencies.len());

    let plan = match &args.plan {
        Some(path) => BuildPlan::read(fs, path)?,
        None => BuildPlan::default(),
    };

    Ok(BuildContext::new(application_path, stack_id)
        .with_dependencies(dependencies)
        .with_plan(plan))
}
