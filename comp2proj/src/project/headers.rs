// SPDX-License-Identifier: GPL-3.0-or-later

//! Best effort collection of macros from the forced include headers.
//!
//! Forced includes (typically the generated `sdkconfig.h`) define macros
//! which are visible to every translation unit. They are looked up in the
//! include directories of the project, and the simple object-like macro
//! definitions are collected. This is not a preprocessor: conditionals,
//! nested includes and multi-line definitions are not followed.

use regex_lite::Regex;
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use std::sync::LazyLock;

static DEFINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#define\s+(\w+)\s+(\S.*?)\s*$").expect("Invalid define regex pattern")
});

/// Collect the macro definitions of every forced include that exists in
/// one of the include directories. Missing files are silently skipped.
pub fn scrape_macros<'d, 'n>(
    directories: impl IntoIterator<Item = &'d Path>,
    names: impl IntoIterator<Item = &'n str> + Clone,
) -> BTreeSet<String> {
    let mut macros = BTreeSet::new();
    for directory in directories {
        for name in names.clone() {
            let candidate = directory.join(name);
            if !candidate.is_file() {
                continue;
            }
            match scan_file(&candidate) {
                Ok(found) => {
                    log::debug!("Found {} macros in {}", found.len(), candidate.display());
                    macros.extend(found);
                }
                Err(error) => {
                    log::warn!("Failed to read header {}: {}", candidate.display(), error);
                }
            }
        }
    }
    macros
}

fn scan_file(path: &Path) -> io::Result<Vec<String>> {
    let file = fs::File::open(path)?;
    scan_defines(BufReader::new(file))
}

/// Scan the content line by line for `#define NAME VALUE` lines.
///
/// The result is in `NAME=VALUE` form. Definitions without value are ignored.
pub fn scan_defines(reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut result = Vec::new();
    for line in reader.split(b'\n') {
        let line = line?;
        let line = String::from_utf8_lossy(&line);
        if let Some(captures) = DEFINE_PATTERN.captures(&line) {
            result.push(format!("{}={}", &captures[1], &captures[2]));
        }
    }
    Ok(result)
}
