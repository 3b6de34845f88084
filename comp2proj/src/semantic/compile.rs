// SPDX-License-Identifier: GPL-3.0-or-later

use super::matchers::{ClassificationError, OptionAnalyzer};
use super::{ClassifiedOption, Language};
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// The settings of a single compiled source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDescriptor {
    pub source_path: PathBuf,
    pub component_name: String,
    pub output_path: Option<String>,
    pub macros: BTreeSet<String>,
    pub forced_includes: IndexSet<String>,
    pub include_dirs: Vec<String>,
    pub other_options: Vec<String>,
}

impl FileDescriptor {
    /// Fold the classified options of a compiler invocation.
    ///
    /// The last output path wins. Options which are not meaningful for a
    /// compiler invocation are kept in their rendered form.
    pub fn new(component: &str, source: &Path, options: Vec<ClassifiedOption>) -> Self {
        let mut descriptor = Self {
            source_path: source.to_path_buf(),
            component_name: component.to_string(),
            output_path: None,
            macros: BTreeSet::new(),
            forced_includes: IndexSet::new(),
            include_dirs: Vec::new(),
            other_options: Vec::new(),
        };

        for option in options {
            match option {
                ClassifiedOption::Macro(definition) => {
                    descriptor.macros.insert(definition.to_string());
                }
                ClassifiedOption::ForcedInclude(name) => {
                    descriptor.forced_includes.insert(name);
                }
                ClassifiedOption::IncludeDir(path) => descriptor.include_dirs.push(path),
                ClassifiedOption::OutputPath(path) => descriptor.output_path = Some(path),
                other => descriptor.other_options.push(other.to_string()),
            }
        }
        descriptor
    }

    pub fn language(&self) -> Option<Language> {
        Language::from_path(&self.source_path)
    }
}

/// Classify the arguments of a compiler invocation and build the descriptor.
pub fn extract(
    component: &str,
    arguments: &[String],
    source: &Path,
) -> Result<FileDescriptor, ClassificationError> {
    let options = OptionAnalyzer::compiler().classify(arguments)?;
    Ok(FileDescriptor::new(component, source, options))
}
