// SPDX-License-Identifier: GPL-3.0-or-later

//! Command line option recognition for the recorded invocations.
//!
//! The recognition is driven by static rule tables. A rule names a prefix
//! and the semantic kind of the value it carries. The value is either glued
//! to the prefix (`-DFOO`) or given as the next argument (`-D FOO`). Which
//! form is used is decided by the argument itself, never by guessing about
//! the following argument.
//!
//! Arguments which are not covered by the rule table are kept as passthrough
//! flags. A few passthrough flags are known to take a separate argument, and
//! a few flags are known to be irrelevant for the project settings.

use super::{ClassifiedOption, MacroDefinition, is_sentinel};
use thiserror::Error;

/// What the value of a recognized option represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Macro,
    ForcedInclude,
    IncludeDir,
    OutputPath,
    LinkerScript,
    LibrarySearchDir,
    LibraryName,
}

impl OptionKind {
    /// Attach the semantic meaning to the value of the option.
    ///
    /// Returns `None` for values that are recognized but shall not appear
    /// in the result (the per-file sentinel macro).
    fn classify(self, value: &str) -> Option<ClassifiedOption> {
        let value = value.to_string();
        match self {
            OptionKind::Macro if is_sentinel(&value) => None,
            OptionKind::Macro => Some(ClassifiedOption::Macro(MacroDefinition::parse(&value))),
            OptionKind::ForcedInclude => Some(ClassifiedOption::ForcedInclude(value)),
            OptionKind::IncludeDir => Some(ClassifiedOption::IncludeDir(value)),
            OptionKind::OutputPath => Some(ClassifiedOption::OutputPath(value)),
            OptionKind::LinkerScript => Some(ClassifiedOption::LinkerScript(value)),
            OptionKind::LibrarySearchDir => Some(ClassifiedOption::LibrarySearchDir(value)),
            OptionKind::LibraryName => Some(ClassifiedOption::LibraryName(value)),
        }
    }
}

/// A rule combining the option prefix with the kind of its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionRule {
    pub prefix: &'static str,
    pub kind: OptionKind,
}

/// Rules for compiler invocations, checked in this order.
pub static COMPILE_RULES: &[OptionRule] = &[
    OptionRule { prefix: "-D", kind: OptionKind::Macro },
    OptionRule { prefix: "-include", kind: OptionKind::ForcedInclude },
    OptionRule { prefix: "-I", kind: OptionKind::IncludeDir },
    OptionRule { prefix: "-o", kind: OptionKind::OutputPath },
];

/// Rules for linker invocations, checked in this order.
pub static LINK_RULES: &[OptionRule] = &[
    OptionRule { prefix: "-o", kind: OptionKind::OutputPath },
    OptionRule { prefix: "-T", kind: OptionKind::LinkerScript },
    OptionRule { prefix: "-L", kind: OptionKind::LibrarySearchDir },
    OptionRule { prefix: "-l", kind: OptionKind::LibraryName },
];

/// Flags which are recognized and dropped.
pub static EXCLUDED_FLAGS: &[&str] = &["-c", "-Wl,--start-group", "-Wl,--end-group"];

/// Flags which take the next argument as their value when the analyzer has
/// no rule for them. Every rule prefix of both tables is listed, so a bare
/// `-L` keeps its value on a compile line and a bare `-I` on a link line.
pub static FLAGS_WITH_ARGUMENT: &[&str] =
    &["-D", "-include", "-I", "-o", "-T", "-L", "-l", "-u", "-Xlinker"];

/// Extension of object files given to the linker as plain inputs.
const OBJECT_FILE_SUFFIX: &str = ".o";

/// Result of matching the arguments at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionMatch {
    /// The meaning of the consumed arguments, `None` when they were dropped.
    pub option: Option<ClassifiedOption>,

    /// The arguments consumed from the command line.
    pub consumed_args: Vec<String>,
}

impl OptionMatch {
    pub fn consumed_args_count(&self) -> usize {
        self.consumed_args.len()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClassificationError {
    #[error("Option '{flag}' at position {position} expects a value, but it is the last argument")]
    MissingValue { flag: String, position: usize },
}

/// Classifies argument vectors of one kind of invocation.
#[derive(Debug, Clone, Copy)]
pub struct OptionAnalyzer {
    rules: &'static [OptionRule],
    skip_object_files: bool,
}

impl OptionAnalyzer {
    pub fn new(rules: &'static [OptionRule], skip_object_files: bool) -> Self {
        Self { rules, skip_object_files }
    }

    /// Analyzer for compiler invocations.
    pub fn compiler() -> Self {
        Self::new(COMPILE_RULES, false)
    }

    /// Analyzer for linker invocations. Object file inputs are skipped.
    pub fn linker() -> Self {
        Self::new(LINK_RULES, true)
    }

    /// Match the option at the beginning of the given arguments.
    ///
    /// Every call consumes one or two arguments. An empty argument slice
    /// yields `Ok(None)`.
    pub fn match_option(
        &self,
        args: &[String],
        position: usize,
    ) -> Result<Option<OptionMatch>, ClassificationError> {
        let Some(current) = args.first() else {
            return Ok(None);
        };

        if EXCLUDED_FLAGS.contains(&current.as_str())
            || (self.skip_object_files && current.ends_with(OBJECT_FILE_SUFFIX))
        {
            return Ok(Some(OptionMatch { option: None, consumed_args: vec![current.clone()] }));
        }

        if let Some(rule) = self.rules.iter().find(|rule| current.starts_with(rule.prefix)) {
            return if current.len() == rule.prefix.len() {
                let value = Self::separate_value(args, position)?;
                Ok(Some(OptionMatch {
                    option: rule.kind.classify(value),
                    consumed_args: vec![current.clone(), value.to_string()],
                }))
            } else {
                Ok(Some(OptionMatch {
                    option: rule.kind.classify(&current[rule.prefix.len()..]),
                    consumed_args: vec![current.clone()],
                }))
            };
        }

        if FLAGS_WITH_ARGUMENT.contains(&current.as_str()) {
            let value = Self::separate_value(args, position)?;
            return Ok(Some(OptionMatch {
                option: Some(ClassifiedOption::Passthrough {
                    flag: current.clone(),
                    argument: Some(value.to_string()),
                }),
                consumed_args: vec![current.clone(), value.to_string()],
            }));
        }

        Ok(Some(OptionMatch {
            option: Some(ClassifiedOption::Passthrough { flag: current.clone(), argument: None }),
            consumed_args: vec![current.clone()],
        }))
    }

    /// Walk the arguments from left to right and match every option.
    pub fn analyze(&self, args: &[String]) -> Result<Vec<OptionMatch>, ClassificationError> {
        let mut matches = Vec::new();
        let mut cursor = 0;
        while let Some(found) = self.match_option(&args[cursor..], cursor)? {
            cursor += found.consumed_args_count();
            matches.push(found);
        }
        Ok(matches)
    }

    /// The classified options of the arguments, dropped ones left out.
    pub fn classify(&self, args: &[String]) -> Result<Vec<ClassifiedOption>, ClassificationError> {
        let matches = self.analyze(args)?;
        Ok(matches.into_iter().filter_map(|found| found.option).collect())
    }

    fn separate_value(args: &[String], position: usize) -> Result<&str, ClassificationError> {
        args.get(1).map(String::as_str).ok_or_else(|| ClassificationError::MissingValue {
            flag: args[0].clone(),
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_glued_and_separate_forms() {
        let sut = OptionAnalyzer::compiler();

        let glued = sut.classify(&strings(&["-DFOO", "-I/sdk/inc", "-obuild/a.o"])).unwrap();
        let separate = sut.classify(&strings(&["-D", "FOO", "-I", "/sdk/inc", "-o", "build/a.o"])).unwrap();

        assert_eq!(glued, separate);
        assert_eq!(
            glued,
            vec![
                ClassifiedOption::Macro(MacroDefinition::parse("FOO")),
                ClassifiedOption::IncludeDir("/sdk/inc".to_string()),
                ClassifiedOption::OutputPath("build/a.o".to_string()),
            ]
        );
    }

    #[test]
    fn test_forced_include_is_checked_before_include_dir() {
        let sut = OptionAnalyzer::compiler();

        let result = sut.classify(&strings(&["-include", "sdkconfig.h", "-Iinc"])).unwrap();
        assert_eq!(
            result,
            vec![
                ClassifiedOption::ForcedInclude("sdkconfig.h".to_string()),
                ClassifiedOption::IncludeDir("inc".to_string()),
            ]
        );
    }

    #[test]
    fn test_cursor_advances() {
        let sut = OptionAnalyzer::compiler();

        let result = sut.analyze(&strings(&["-D", "A", "-DB", "-c", "-u", "sym", "-Os"])).unwrap();
        let counts: Vec<usize> = result.iter().map(OptionMatch::consumed_args_count).collect();
        assert_eq!(counts, vec![2, 1, 1, 2, 1]);
    }

    #[test]
    fn test_excluded_flags_are_dropped() {
        let sut = OptionAnalyzer::compiler();

        let result =
            sut.classify(&strings(&["-c", "-Wl,--start-group", "-Wall", "-Wl,--end-group"])).unwrap();
        assert_eq!(
            result,
            vec![ClassifiedOption::Passthrough { flag: "-Wall".to_string(), argument: None }]
        );
    }

    #[test]
    fn test_flags_with_argument() {
        let sut = OptionAnalyzer::linker();

        let result = sut.classify(&strings(&["-Xlinker", "--gc-sections", "-u", "app_main"])).unwrap();
        let rendered: Vec<String> = result.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["-Xlinker --gc-sections", "-u app_main"]);
    }

    #[test]
    fn test_sentinel_macro_is_consumed_and_dropped() {
        let sut = OptionAnalyzer::compiler();

        let result = sut.analyze(&strings(&["-D", "__ESP_FILE__=__FILE__", "-DKEEP"])).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].option, None);
        assert_eq!(result[0].consumed_args_count(), 2);
        assert_eq!(result[1].option, Some(ClassifiedOption::Macro(MacroDefinition::parse("KEEP"))));
    }

    #[test]
    fn test_missing_value_is_an_error() {
        let sut = OptionAnalyzer::compiler();

        let result = sut.classify(&strings(&["-Wall", "-I"]));
        assert_eq!(
            result,
            Err(ClassificationError::MissingValue { flag: "-I".to_string(), position: 1 })
        );

        let result = OptionAnalyzer::linker().classify(&strings(&["-u"]));
        assert_eq!(
            result,
            Err(ClassificationError::MissingValue { flag: "-u".to_string(), position: 0 })
        );
    }

    #[test]
    fn test_linker_skips_object_files() {
        let sut = OptionAnalyzer::linker();

        let result = sut.classify(&strings(&["main.o", "-lm", "build/esp32/libmain.a.o"])).unwrap();
        assert_eq!(result, vec![ClassifiedOption::LibraryName("m".to_string())]);

        // object files are plain passthrough for the compiler
        let result = OptionAnalyzer::compiler().classify(&strings(&["main.o"])).unwrap();
        assert_eq!(
            result,
            vec![ClassifiedOption::Passthrough { flag: "main.o".to_string(), argument: None }]
        );
    }

    #[test]
    fn test_link_table_does_not_know_compile_options() {
        let sut = OptionAnalyzer::linker();

        let result = sut.classify(&strings(&["-DFOO", "-T", "app.ld", "-Lbuild/lib"])).unwrap();
        assert_eq!(
            result,
            vec![
                ClassifiedOption::Passthrough { flag: "-DFOO".to_string(), argument: None },
                ClassifiedOption::LinkerScript("app.ld".to_string()),
                ClassifiedOption::LibrarySearchDir("build/lib".to_string()),
            ]
        );
    }

    #[test]
    fn test_bare_prefix_of_the_other_table_keeps_its_value() {
        let result = OptionAnalyzer::compiler().classify(&strings(&["-L", "/x", "-T", "a.ld"])).unwrap();
        let rendered: Vec<String> = result.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["-L /x", "-T a.ld"]);

        let result = OptionAnalyzer::linker().classify(&strings(&["-I", "/inc", "-D", "X"])).unwrap();
        let rendered: Vec<String> = result.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["-I /inc", "-D X"]);

        let result = OptionAnalyzer::compiler().classify(&strings(&["-Wall", "-L"]));
        assert_eq!(
            result,
            Err(ClassificationError::MissingValue { flag: "-L".to_string(), position: 1 })
        );
    }

    fn argument_strategy() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("-D".to_string()),
            Just("-I".to_string()),
            Just("-include".to_string()),
            Just("-o".to_string()),
            Just("-c".to_string()),
            Just("-u".to_string()),
            Just("-Xlinker".to_string()),
            "-[DIof][A-Za-z_/=.0-9]{1,8}",
            "-[Wfm][a-z-]{1,8}",
            "[a-z/_.]{1,10}",
        ]
    }

    fn value_strategy() -> impl Strategy<Value = String> {
        "[A-Za-z_/][A-Za-z_/=.0-9]{0,8}"
    }

    proptest! {
        #[test]
        fn classification_is_idempotent(args in prop::collection::vec(argument_strategy(), 0..12)) {
            let sut = OptionAnalyzer::compiler();

            let first = sut.analyze(&args);
            let second = sut.analyze(&args);
            prop_assert_eq!(&first, &second);

            if let Ok(matches) = first {
                let consumed: usize = matches.iter().map(OptionMatch::consumed_args_count).sum();
                prop_assert_eq!(consumed, args.len());
                prop_assert!(matches.iter().all(|m| (1..=2).contains(&m.consumed_args_count())));
            }
        }

        #[test]
        fn glued_and_separate_forms_are_equivalent(
            prefix in prop::sample::select(vec!["-D", "-include", "-I", "-o"]),
            value in value_strategy(),
        ) {
            let sut = OptionAnalyzer::compiler();

            let glued = sut.classify(&[format!("{prefix}{value}")]);
            let separate = sut.classify(&[prefix.to_string(), value.clone()]);
            prop_assert_eq!(glued, separate);
        }

        #[test]
        fn link_glued_and_separate_forms_are_equivalent(
            prefix in prop::sample::select(vec!["-o", "-T", "-L", "-l"]),
            value in "[A-Za-z_/][A-Za-z_/=0-9]{0,8}",
        ) {
            let sut = OptionAnalyzer::linker();

            let glued = sut.classify(&[format!("{prefix}{value}")]);
            let separate = sut.classify(&[prefix.to_string(), value.clone()]);
            prop_assert_eq!(glued, separate);
        }
    }
}
