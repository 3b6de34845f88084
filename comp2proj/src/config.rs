// SPDX-License-Identifier: GPL-3.0-or-later

//! This module defines the configuration of the application.
//!
//! The configuration is either loaded from a file or used with default
//! values. Every value of the configuration is optional: what is not given
//! here is taken from the command line or the environment.
//!
//! The configuration file syntax is based on the YAML format.
//! The default configuration file name is `comp2proj.yml`.
//!
//! The configuration file location is searched in the following order:
//! 1. The current working directory
//! 2. The local configuration directory of the user
//! 3. The configuration directory of the user
//! 4. The local configuration directory of the application
//! 5. The configuration directory of the application
//!
//! ```yaml
//! schema: "1.0"
//!
//! roots:
//!   sdk: /opt/esp-idf
//!   application: /work/app
//!
//! toolchain:
//!   prefix: xtensa-esp32-elf-
//!
//! project:
//!   name: App
//!   tool: gnu_mcu_eclipse
//! ```

// Re-Export the types and the loader module content.
pub use loader::{ConfigError, Loader};
pub use types::*;
pub use validation::Validator;

mod types {
    use serde::Deserialize;
    use std::fmt;
    use std::path::PathBuf;

    /// Represents the application configuration.
    #[derive(Debug, PartialEq, Deserialize)]
    pub struct Main {
        #[serde(deserialize_with = "validate_schema_version")]
        pub schema: String,
        #[serde(default)]
        pub roots: Roots,
        #[serde(default)]
        pub toolchain: Toolchain,
        #[serde(default)]
        pub project: Project,
    }

    impl Default for Main {
        fn default() -> Self {
            Self {
                schema: String::from(SUPPORTED_SCHEMA_VERSION),
                roots: Roots::default(),
                toolchain: Toolchain::default(),
                project: Project::default(),
            }
        }
    }

    impl fmt::Display for Main {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            fn show<T: fmt::Display>(value: Option<T>) -> String {
                value.map(|value| value.to_string()).unwrap_or_else(|| "~".to_string())
            }

            writeln!(f, "Configuration:")?;
            writeln!(f, "schema: {}", self.schema)?;
            writeln!(f, "roots:")?;
            writeln!(f, "  sdk: {}", show(self.roots.sdk.as_ref().map(|path| path.display())))?;
            writeln!(
                f,
                "  application: {}",
                show(self.roots.application.as_ref().map(|path| path.display()))
            )?;
            writeln!(f, "toolchain:")?;
            writeln!(f, "  prefix: {}", show(self.toolchain.prefix.as_ref()))?;
            writeln!(f, "project:")?;
            writeln!(f, "  name: {}", show(self.project.name.as_ref()))?;
            write!(f, "  tool: {}", show(self.project.tool.as_ref()))
        }
    }

    /// The directory trees of the project.
    #[derive(Debug, Default, PartialEq, Deserialize)]
    pub struct Roots {
        /// Overrides the SDK root from the environment.
        #[serde(default)]
        pub sdk: Option<PathBuf>,
        /// Overrides the application root derived from the build log location.
        #[serde(default)]
        pub application: Option<PathBuf>,
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    pub struct Toolchain {
        /// Overrides the toolchain prefix from the environment.
        #[serde(default)]
        pub prefix: Option<String>,
    }

    #[derive(Debug, Default, PartialEq, Deserialize)]
    pub struct Project {
        #[serde(default)]
        pub name: Option<String>,
        #[serde(default)]
        pub tool: Option<String>,
    }

    pub(super) const SUPPORTED_SCHEMA_VERSION: &str = "1.0";

    // Custom deserialization function to validate the schema version.
    //
    // The version is accepted both as a string and as a number.
    fn validate_schema_version<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct SchemaVisitor;

        impl serde::de::Visitor<'_> for SchemaVisitor {
            type Value = String;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a schema version")
            }

            fn visit_str<E: serde::de::Error>(self, value: &str) -> Result<String, E> {
                Ok(value.to_string())
            }

            fn visit_f64<E: serde::de::Error>(self, value: f64) -> Result<String, E> {
                Ok(format!("{value:?}"))
            }

            fn visit_u64<E: serde::de::Error>(self, value: u64) -> Result<String, E> {
                Ok(value.to_string())
            }

            fn visit_i64<E: serde::de::Error>(self, value: i64) -> Result<String, E> {
                Ok(value.to_string())
            }
        }

        let schema = deserializer.deserialize_any(SchemaVisitor)?;
        if schema != SUPPORTED_SCHEMA_VERSION {
            use serde::de::Error;
            Err(Error::custom(format!(
                "Unsupported schema version: {schema}. Expected: {SUPPORTED_SCHEMA_VERSION}"
            )))
        } else {
            Ok(schema)
        }
    }
}

pub mod validation {

    use super::types::*;
    use crate::args::EXPORTER_TOOLS;
    use std::path::PathBuf;
    use thiserror::Error;

    /// Trait for validating configuration objects
    pub trait Validator<T> {
        type Error: std::error::Error;

        fn validate(config: &T) -> Result<(), Self::Error>;
    }

    /// Validation errors for configuration
    #[derive(Debug, Error, PartialEq)]
    pub enum ValidationError {
        #[error("Empty string value for field '{field}'")]
        EmptyString { field: &'static str },
        #[error("Path of field '{field}' shall be absolute: '{path}'")]
        RelativePath { field: &'static str, path: String },
        #[error("Unknown exporter tool '{tool}', expected one of: {}", EXPORTER_TOOLS.join(", "))]
        UnknownTool { tool: String },
        #[error("Multiple validation errors: {}", join(.errors))]
        Multiple { errors: Vec<ValidationError> },
    }

    fn join(errors: &[ValidationError]) -> String {
        errors.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
    }

    /// Combinator for collecting and handling validation errors
    #[derive(Default)]
    struct ValidationCollector {
        errors: Vec<ValidationError>,
    }

    impl ValidationCollector {
        fn new() -> Self {
            Self { errors: Vec::new() }
        }

        fn add_result(&mut self, result: Result<(), ValidationError>) {
            if let Err(error) = result {
                match error {
                    ValidationError::Multiple { errors } => {
                        self.errors.extend(errors);
                    }
                    single_error => self.errors.push(single_error),
                }
            }
        }

        fn finish(self) -> Result<(), ValidationError> {
            let mut errors = self.errors;
            match errors.pop() {
                None => Ok(()),
                Some(error) if errors.is_empty() => Err(error),
                Some(error) => {
                    errors.push(error);
                    Err(ValidationError::Multiple { errors })
                }
            }
        }
    }

    fn absolute(field: &'static str, path: &Option<PathBuf>) -> Result<(), ValidationError> {
        match path {
            Some(path) if path.as_os_str().is_empty() => Err(ValidationError::EmptyString { field }),
            Some(path) if !path.is_absolute() => Err(ValidationError::RelativePath {
                field,
                path: path.display().to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn non_empty(field: &'static str, value: &Option<String>) -> Result<(), ValidationError> {
        match value {
            Some(value) if value.trim().is_empty() => Err(ValidationError::EmptyString { field }),
            _ => Ok(()),
        }
    }

    impl Validator<Main> for Main {
        type Error = ValidationError;

        fn validate(config: &Main) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::new();

            collector.add_result(Roots::validate(&config.roots));
            collector.add_result(Toolchain::validate(&config.toolchain));
            collector.add_result(Project::validate(&config.project));

            collector.finish()
        }
    }

    impl Validator<Roots> for Roots {
        type Error = ValidationError;

        fn validate(config: &Roots) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::new();

            collector.add_result(absolute("roots.sdk", &config.sdk));
            collector.add_result(absolute("roots.application", &config.application));

            collector.finish()
        }
    }

    impl Validator<Toolchain> for Toolchain {
        type Error = ValidationError;

        fn validate(config: &Toolchain) -> Result<(), Self::Error> {
            non_empty("toolchain.prefix", &config.prefix)
        }
    }

    impl Validator<Project> for Project {
        type Error = ValidationError;

        fn validate(config: &Project) -> Result<(), Self::Error> {
            let mut collector = ValidationCollector::new();

            collector.add_result(non_empty("project.name", &config.name));
            if let Some(tool) = &config.tool {
                if !EXPORTER_TOOLS.contains(&tool.as_str()) {
                    collector.add_result(Err(ValidationError::UnknownTool { tool: tool.clone() }));
                }
            }

            collector.finish()
        }
    }

}

pub mod loader {
    use super::{Main, Validator};
    use directories::{BaseDirs, ProjectDirs};
    use log::{debug, info};
    use std::fs;
    use std::path::{Path, PathBuf};
    use thiserror::Error;

    const CONFIG_FILE_NAME: &str = "comp2proj.yml";

    pub struct Loader {}

    impl Loader {
        /// Loads the configuration from the specified file or the default locations.
        ///
        /// If the configuration file is specified, it will be used. Otherwise, the default locations
        /// will be searched for the configuration file. If the configuration file is not found, the
        /// default configuration will be returned.
        pub fn load(
            context: &crate::context::Context,
            filename: &Option<String>,
        ) -> Result<Main, ConfigError> {
            if let Some(path) = filename {
                Self::from_file(&context.absolute(path))
            } else {
                let locations = Self::file_locations(context);
                for location in locations {
                    debug!("Checking configuration file: {}", location.display());
                    if location.exists() {
                        return Self::from_file(location.as_path());
                    }
                }
                debug!("Configuration file not found. Using the default configuration.");
                Ok(Main::default())
            }
        }

        /// The default locations where the configuration file can be found.
        fn file_locations(context: &crate::context::Context) -> Vec<PathBuf> {
            let mut locations = Vec::new();

            locations.push(context.current_directory.clone());
            if let Some(base_dirs) = BaseDirs::new() {
                locations.push(base_dirs.config_local_dir().to_path_buf());
                locations.push(base_dirs.config_dir().to_path_buf());
            }

            if let Some(proj_dirs) = ProjectDirs::from("io.github", "comp2proj", "comp2proj") {
                locations.push(proj_dirs.config_local_dir().to_path_buf());
                locations.push(proj_dirs.config_dir().to_path_buf());
            }
            // filter out duplicate elements from the list
            locations.dedup();
            // append the default configuration file name to the locations
            locations.iter().map(|p| p.join(CONFIG_FILE_NAME)).collect()
        }

        /// Loads the configuration from the specified file.
        pub fn from_file(path: &Path) -> Result<Main, ConfigError> {
            info!("Loading configuration file: {}", path.display());

            let content = fs::read_to_string(path)
                .map_err(|source| ConfigError::FileAccess { path: path.to_path_buf(), source })?;

            let config = Self::from_content(&content)
                .map_err(|source| ConfigError::ParseError { path: path.to_path_buf(), source })?;

            Main::validate(&config)
                .map_err(|source| ConfigError::ValidationError { path: path.to_path_buf(), source })?;

            Ok(config)
        }

        /// Define the deserialization format of the config file.
        fn from_content(content: &str) -> Result<Main, serde_saphyr::Error> {
            serde_saphyr::from_str(content)
        }
    }

    /// Represents all possible configuration-related errors.
    #[derive(Debug, Error)]
    pub enum ConfigError {
        /// Error when opening or reading a configuration file.
        #[error("Failed to access configuration file '{path}': {source}")]
        FileAccess {
            path: PathBuf,
            #[source]
            source: std::io::Error,
        },
        /// Error when parsing the configuration file format.
        #[error("Failed to parse configuration from file '{path}': {source}")]
        ParseError {
            path: PathBuf,
            #[source]
            source: serde_saphyr::Error,
        },
        /// Error when configuration validation fails.
        #[error("Configuration validation failed for file '{path}': {source}")]
        ValidationError {
            path: PathBuf,
            #[source]
            source: crate::config::validation::ValidationError,
        },
    }

}
