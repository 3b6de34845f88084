// SPDX-License-Identifier: GPL-3.0-or-later

//! This module contains the command line interface of the application.
//!
//! The command line parsing is implemented using the `clap` library.
//! The module is defining types to represent a structured form of the
//! program invocation. The `Arguments` type is used to represent all
//! possible invocations of the program.

use anyhow::anyhow;
use clap::builder::PossibleValuesParser;
use clap::{ArgAction, ArgMatches, Command, arg, command};
use std::fmt;

/// Common constants used in the module.
const MODE_DESCRIBE_SUBCOMMAND: &str = "describe";
const DEFAULT_PROJECT_FILE: &str = "project.json";
const DEFAULT_DESCRIPTION_FILE: &str = "records.json";

/// The output file name which means the standard output.
pub const STDOUT_FILE_NAME: &str = "-";

/// The exporters the project model can be labeled for.
pub const EXPORTER_TOOLS: &[&str] = &[
    "gnu_mcu_eclipse",
    "eclipse_make_gcc",
    "st_cube_eclipse",
    "coide",
    "visual_studio",
    "visual_studio_make_gcc_arm",
];
pub const DEFAULT_TOOL: &str = "gnu_mcu_eclipse";
pub const DEFAULT_PROJECT_NAME: &str = "App";

/// Represents the command line arguments of the application.
#[derive(Debug, PartialEq)]
pub struct Arguments {
    // The path of the configuration file.
    pub config: Option<String>,
    // The requested level of verbosity.
    pub verbose: u8,
    // The mode of the application.
    pub mode: Mode,
}

/// Represents the mode of the application.
#[derive(Debug, PartialEq)]
pub enum Mode {
    Project { input: BuildRecords, output: ProjectOutput },
    Describe { input: BuildRecords, output: DescriptionOutput },
}

/// The build log to read.
#[derive(Debug, PartialEq)]
pub struct BuildRecords {
    pub file_name: String,
}

#[derive(Debug, PartialEq)]
pub struct ProjectOutput {
    pub file_name: String,
    pub name: Option<String>,
    pub tool: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct DescriptionOutput {
    pub file_name: String,
}

impl TryFrom<ArgMatches> for Arguments {
    type Error = anyhow::Error;

    fn try_from(matches: ArgMatches) -> Result<Self, Self::Error> {
        let config = matches.get_one::<String>("config").map(String::to_string);
        let verbose = matches.get_count("verbose");

        match matches.subcommand() {
            Some((MODE_DESCRIBE_SUBCOMMAND, describe_matches)) => {
                let input = BuildRecords::try_from(describe_matches)?;
                let output = DescriptionOutput { file_name: output_file_name(describe_matches)? };
                let mode = Mode::Describe { input, output };
                Ok(Arguments { config, verbose, mode })
            }
            None => {
                let input = BuildRecords::try_from(&matches)?;
                let output = ProjectOutput::try_from(&matches)?;
                let mode = Mode::Project { input, output };
                Ok(Arguments { config, verbose, mode })
            }
            _ => Err(anyhow!("unrecognized subcommand")),
        }
    }
}

impl TryFrom<&ArgMatches> for BuildRecords {
    type Error = anyhow::Error;

    fn try_from(matches: &ArgMatches) -> Result<Self, Self::Error> {
        let file_name = matches
            .get_one::<String>("INPUT")
            .map(String::to_string)
            .ok_or_else(|| anyhow!("missing input file"))?;
        Ok(BuildRecords { file_name })
    }
}

impl TryFrom<&ArgMatches> for ProjectOutput {
    type Error = anyhow::Error;

    fn try_from(matches: &ArgMatches) -> Result<Self, Self::Error> {
        let file_name = output_file_name(matches)?;
        let name = matches.get_one::<String>("project").map(String::to_string);
        let tool = matches.get_one::<String>("tool").map(String::to_string);
        Ok(ProjectOutput { file_name, name, tool })
    }
}

fn output_file_name(matches: &ArgMatches) -> anyhow::Result<String> {
    matches
        .get_one::<String>("output")
        .map(String::to_string)
        .ok_or_else(|| anyhow!("output is not defaulted"))
}

impl fmt::Display for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Arguments:")?;
        writeln!(f, "  config: {}", self.config.as_deref().unwrap_or("(search)"))?;
        writeln!(f, "  verbose: {}", self.verbose)?;
        match &self.mode {
            Mode::Project { input, output } => {
                writeln!(f, "  mode: project")?;
                writeln!(f, "  input: {}", input.file_name)?;
                writeln!(f, "  output: {}", output.file_name)?;
                writeln!(f, "  project: {}", output.name.as_deref().unwrap_or("(default)"))?;
                write!(f, "  tool: {}", output.tool.as_deref().unwrap_or("(default)"))
            }
            Mode::Describe { input, output } => {
                writeln!(f, "  mode: describe")?;
                writeln!(f, "  input: {}", input.file_name)?;
                write!(f, "  output: {}", output.file_name)
            }
        }
    }
}

/// Represents the command line interface of the application.
///
/// The default mode converts the build log into a project model. The
/// `describe` subcommand writes the settings of each record instead.
pub fn cli() -> Command {
    command!()
        .subcommand_required(false)
        .subcommand_negates_reqs(true)
        .arg_required_else_help(true)
        .args(&[
            arg!(-v --verbose ... "Sets the level of verbosity")
                .action(ArgAction::Count)
                .global(true),
            arg!(-c --config <FILE> "Path of the config file").global(true),
        ])
        .subcommand(
            Command::new(MODE_DESCRIBE_SUBCOMMAND)
                .about("describe the settings of each record of the build log")
                .args(&[
                    arg!(<INPUT> "Path of the build log").required(true),
                    arg!(-o --output <FILE> "Path of the description file, '-' for stdout")
                        .default_value(DEFAULT_DESCRIPTION_FILE)
                        .hide_default_value(false),
                ])
                .arg_required_else_help(true),
        )
        .args(&[
            arg!(<INPUT> "Path of the build log").required(true),
            arg!(-o --output <FILE> "Path of the project file, '-' for stdout")
                .default_value(DEFAULT_PROJECT_FILE)
                .hide_default_value(false),
            arg!(-p --project <NAME> "Name of the project"),
            arg!(-t --tool <TOOL> "Exporter the project is generated for")
                .value_parser(PossibleValuesParser::new(EXPORTER_TOOLS.iter().copied())),
        ])
}
