// SPDX-License-Identifier: GPL-3.0-or-later

mod pipeline;

use crate::context::Context;
use crate::output::{DescriptionWriter, ProjectWriter};
use crate::project::{Roots, application_root_of};
use crate::{args, config};
use std::path::PathBuf;
use std::process::ExitCode;

pub use pipeline::{DescribePipeline, ProjectPipeline, RuntimeError};

/// Represent the modes the application can run in.
///
/// - project: read the build log and write the aggregated project model.
/// - describe: read the build log and write the settings of every record.
///
/// Both modes need the roots to place the source files into groups, so the
/// roots are resolved before any record is read.
pub enum Mode {
    Project(ProjectPipeline),
    Describe(DescribePipeline),
}

impl Mode {
    /// Configure the application mode based on the command line arguments,
    /// the configuration and the environment (in this order of precedence).
    ///
    /// Missing roots or toolchain prefix are reported here, before the build
    /// log is opened.
    pub fn configure(
        context: Context,
        args: args::Arguments,
        config: config::Main,
    ) -> Result<Self, ConfigurationError> {
        match args.mode {
            args::Mode::Project { input, output } => {
                log::debug!("Mode: aggregate the build log into a project model");

                let input = resolve_input(&context, &input)?;
                let roots = resolve_roots(&context, &config, &input)?;
                let prefix = config
                    .toolchain
                    .prefix
                    .or_else(|| context.toolchain_prefix())
                    .ok_or(ConfigurationError::MissingToolchainPrefix)?;
                let name = output
                    .name
                    .or(config.project.name)
                    .unwrap_or_else(|| args::DEFAULT_PROJECT_NAME.to_string());
                let tool = output
                    .tool
                    .or(config.project.tool)
                    .unwrap_or_else(|| args::DEFAULT_TOOL.to_string());
                log::info!(
                    "Project {name} for {tool}, SDK root: {}, application root: {}",
                    roots.sdk().display(),
                    roots.application().display()
                );

                let writer = ProjectWriter::new(&output.file_name);
                Ok(Self::Project(ProjectPipeline::new(input, roots, name, tool, prefix, writer)))
            }
            args::Mode::Describe { input, output } => {
                log::debug!("Mode: describe the records of the build log");

                let input = resolve_input(&context, &input)?;
                let roots = resolve_roots(&context, &config, &input)?;

                let writer = DescriptionWriter::new(&output.file_name);
                Ok(Self::Describe(DescribePipeline::new(input, roots, writer)))
            }
        }
    }

    /// It actually runs the application mode.
    ///
    /// These errors are all run-time errors: problems of the build log
    /// content or of writing the output.
    pub fn run(self) -> ExitCode {
        let status = match self {
            Self::Project(pipeline) => pipeline.run(),
            Self::Describe(pipeline) => pipeline.run(),
        };
        status.map(|_| ExitCode::SUCCESS).unwrap_or_else(|error| {
            log::error!("comp2proj: {error}");
            ExitCode::FAILURE
        })
    }
}

fn resolve_input(context: &Context, input: &args::BuildRecords) -> Result<PathBuf, ConfigurationError> {
    let path = context.absolute(&input.file_name);
    if !path.is_file() {
        return Err(ConfigurationError::MissingInput(path));
    }
    Ok(path)
}

fn resolve_roots(
    context: &Context,
    config: &config::Main,
    input: &std::path::Path,
) -> Result<Roots, ConfigurationError> {
    let sdk = config
        .roots
        .sdk
        .clone()
        .or_else(|| context.sdk_root())
        .map(|path| context.absolute(path))
        .ok_or(ConfigurationError::MissingSdkRoot)?;
    let application = match &config.roots.application {
        Some(path) => path.clone(),
        None => application_root_of(input)
            .ok_or_else(|| ConfigurationError::UnderivableApplicationRoot(input.to_path_buf()))?,
    };
    Ok(Roots::new(sdk, application))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Build log not found: {0}")]
    MissingInput(PathBuf),
    #[error("SDK root is not set (configure it or export IDF_PATH)")]
    MissingSdkRoot,
    #[error("Toolchain prefix is not set (configure it or export CROSS_COMPILE)")]
    MissingToolchainPrefix,
    #[error("Application root can't be derived from {0}: no 'build' directory in the path")]
    UnderivableApplicationRoot(PathBuf),
}
