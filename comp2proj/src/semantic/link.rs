// SPDX-License-Identifier: GPL-3.0-or-later

use super::ClassifiedOption;
use super::matchers::{ClassificationError, OptionAnalyzer};
use serde::Serialize;
use std::collections::BTreeSet;

/// The settings of a link step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkerDescriptor {
    pub output_path: Option<String>,
    pub other_options: BTreeSet<String>,
    pub library_search_dirs: BTreeSet<String>,
    pub libraries: BTreeSet<String>,
    pub linker_scripts: BTreeSet<String>,
}

impl From<Vec<ClassifiedOption>> for LinkerDescriptor {
    fn from(options: Vec<ClassifiedOption>) -> Self {
        let mut descriptor = Self::default();
        for option in options {
            match option {
                ClassifiedOption::OutputPath(path) => descriptor.output_path = Some(path),
                ClassifiedOption::LinkerScript(path) => {
                    descriptor.linker_scripts.insert(path);
                }
                ClassifiedOption::LibrarySearchDir(path) => {
                    descriptor.library_search_dirs.insert(path);
                }
                ClassifiedOption::LibraryName(name) => {
                    descriptor.libraries.insert(name);
                }
                other => {
                    descriptor.other_options.insert(other.to_string());
                }
            }
        }
        descriptor
    }
}

/// Classify the arguments of a linker invocation and build the descriptor.
///
/// The arguments shall not contain the component label and the map file.
pub fn extract(arguments: &[String]) -> Result<LinkerDescriptor, ClassificationError> {
    let options = OptionAnalyzer::linker().classify(arguments)?;
    Ok(LinkerDescriptor::from(options))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    fn set(values: &[&str]) -> BTreeSet<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_extract_link_settings() {
        let arguments = strings(&["-T/sdk/ld/app.ld", "-Lbuild/lib", "-lm", "-o", "build/app.elf"]);
        let sut = extract(&arguments).unwrap();

        assert_eq!(sut.linker_scripts, set(&["/sdk/ld/app.ld"]));
        assert_eq!(sut.library_search_dirs, set(&["build/lib"]));
        assert_eq!(sut.libraries, set(&["m"]));
        assert_eq!(sut.output_path.as_deref(), Some("build/app.elf"));
        assert!(sut.other_options.is_empty());
    }

    #[test]
    fn test_object_files_and_groups_are_dropped() {
        let arguments = strings(&[
            "-nostdlib",
            "build/main.o",
            "-Wl,--start-group",
            "-lc",
            "-lgcc",
            "-Wl,--end-group",
            "-u",
            "call_user_start_cpu0",
        ]);
        let sut = extract(&arguments).unwrap();

        assert_eq!(sut.libraries, set(&["c", "gcc"]));
        assert_eq!(sut.other_options, set(&["-nostdlib", "-u call_user_start_cpu0"]));
    }

    #[test]
    fn test_separate_forms() {
        let arguments = strings(&["-T", "esp32.ld", "-L", "/sdk/ld", "-l", "hal"]);
        let sut = extract(&arguments).unwrap();

        assert_eq!(sut.linker_scripts, set(&["esp32.ld"]));
        assert_eq!(sut.library_search_dirs, set(&["/sdk/ld"]));
        assert_eq!(sut.libraries, set(&["hal"]));
    }

    #[test]
    fn test_extract_fails_on_missing_value() {
        let arguments = strings(&["-lm", "-T"]);
        assert!(extract(&arguments).is_err());
    }
}
