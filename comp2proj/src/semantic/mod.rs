// SPDX-License-Identifier: GPL-3.0-or-later

//! This module gives meaning to the recorded compiler and linker invocations.
//!
//! A record is one line of the build log. The arguments of the record are
//! classified by a static rule table into a handful of semantic buckets
//! (macros, include directories, output paths, linker inputs), everything
//! else is kept verbatim as a passthrough flag. The classified options are
//! then folded into a descriptor:
//! - `FileDescriptor`: the settings of a single compiled source file.
//! - `LinkerDescriptor`: the settings of the link step.
//!
//! The descriptors are plain values; how they are grouped and merged into
//! a project model is the business of the `project` module.

pub mod compile;
pub mod language;
pub mod link;
pub mod matchers;
pub mod record;

use std::fmt;

pub use compile::FileDescriptor;
pub use language::Language;
pub use link::LinkerDescriptor;
pub use matchers::{ClassificationError, OptionAnalyzer, OptionMatch};
pub use record::{Descriptor, Record, RecordError, RecordReader};

/// Marker of the macro which is injected by the build to make the name of
/// the current file visible to the preprocessor. It is a build artifact and
/// must not show up in the project settings.
pub const SENTINEL_MARKER: &str = "__ESP_FILE__";

/// Checks if the macro definition carries the per-file sentinel marker.
pub fn is_sentinel(definition: &str) -> bool {
    definition.contains(SENTINEL_MARKER)
}

/// A preprocessor macro definition as it was given on the command line.
///
/// `-DNAME` defines a macro without value, `-DNAME=VALUE` with value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MacroDefinition {
    pub name: String,
    pub value: Option<String>,
}

impl MacroDefinition {
    /// Splits the definition at the first `=` sign.
    pub fn parse(definition: &str) -> Self {
        match definition.split_once('=') {
            Some((name, value)) => Self { name: name.to_string(), value: Some(value.to_string()) },
            None => Self { name: definition.to_string(), value: None },
        }
    }
}

impl fmt::Display for MacroDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}={}", self.name, value),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Represents the meaning of a single argument (or argument pair) of a
/// compiler or linker invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedOption {
    Macro(MacroDefinition),
    ForcedInclude(String),
    IncludeDir(String),
    OutputPath(String),
    LinkerScript(String),
    LibrarySearchDir(String),
    LibraryName(String),
    Passthrough { flag: String, argument: Option<String> },
}

/// Renders the option in its canonical command line form.
///
/// Passthrough flags with an argument are joined with a single space, this
/// is how they appear in the flag sets of the project model.
impl fmt::Display for ClassifiedOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifiedOption::Macro(definition) => write!(f, "-D{definition}"),
            ClassifiedOption::ForcedInclude(path) => write!(f, "-include {path}"),
            ClassifiedOption::IncludeDir(path) => write!(f, "-I{path}"),
            ClassifiedOption::OutputPath(path) => write!(f, "-o {path}"),
            ClassifiedOption::LinkerScript(path) => write!(f, "-T{path}"),
            ClassifiedOption::LibrarySearchDir(path) => write!(f, "-L{path}"),
            ClassifiedOption::LibraryName(name) => write!(f, "-l{name}"),
            ClassifiedOption::Passthrough { flag, argument: Some(argument) } => {
                write!(f, "{flag} {argument}")
            }
            ClassifiedOption::Passthrough { flag, argument: None } => write!(f, "{flag}"),
        }
    }
}
