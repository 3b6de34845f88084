// SPDX-License-Identifier: GPL-3.0-or-later

use crate::environment;
use crate::environment::{KEY_SDK__ROOT, KEY_TOOLCHAIN__PREFIX};
use anyhow::{Context as AnyhowContext, Result};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::PathBuf;

/// Application context containing runtime environment information.
///
/// The context is captured once at startup, the later phases (configuration,
/// conversion) read the environment only through it.
#[derive(Debug, Clone)]
pub struct Context {
    /// Current working directory when the program was invoked
    pub current_directory: PathBuf,
    /// All environment variables at startup
    pub environment: HashMap<String, String>,
}

impl Context {
    /// Capture the current application context.
    pub fn capture() -> Result<Self> {
        let current_directory =
            env::current_dir().with_context(|| "Failed to get current working directory")?;

        let environment = env::vars().collect::<HashMap<String, String>>();

        Ok(Context { current_directory, environment })
    }

    /// The SDK root from the environment, when it is set and not empty.
    pub fn sdk_root(&self) -> Option<PathBuf> {
        self.non_empty(KEY_SDK__ROOT).map(PathBuf::from)
    }

    /// The cross toolchain prefix from the environment, when it is set and not empty.
    pub fn toolchain_prefix(&self) -> Option<String> {
        self.non_empty(KEY_TOOLCHAIN__PREFIX).map(str::to_string)
    }

    /// Make the path absolute against the current directory.
    pub fn absolute(&self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();
        if path.is_absolute() { path } else { self.current_directory.join(path) }
    }

    fn non_empty(&self, key: &str) -> Option<&str> {
        self.environment.get(key).map(String::as_str).filter(|value| !value.trim().is_empty())
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Application Context:")?;
        writeln!(f, "Current Directory: {}", self.current_directory.display())?;
        writeln!(f, "Total Environment Variables: {} entries", self.environment.len())?;

        writeln!(f, "Relevant Environment Variables:")?;
        for (key, value) in &self.environment {
            if environment::relevant_env(key) {
                writeln!(f, "  {}={}", key, value)?;
            }
        }

        Ok(())
    }
}
