// SPDX-License-Identifier: GPL-3.0-or-later

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// The language of a compiled source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cxx,
    Asm,
}

#[rustfmt::skip]
static C_EXTENSIONS: &[&str] = &["c"];
#[rustfmt::skip]
static CXX_EXTENSIONS: &[&str] = &["cc", "cpp", "cxx"];
#[rustfmt::skip]
static ASM_EXTENSIONS: &[&str] = &["s"];

impl Language {
    /// Detect the language from the file extension, ignoring the case.
    ///
    /// Returns `None` for extensions which are not compiled by any of the
    /// known language settings (headers, linker inputs, etc.).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        let extension = extension.as_str();

        if C_EXTENSIONS.contains(&extension) {
            Some(Language::C)
        } else if CXX_EXTENSIONS.contains(&extension) {
            Some(Language::Cxx)
        } else if ASM_EXTENSIONS.contains(&extension) {
            Some(Language::Asm)
        } else {
            None
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::C => write!(f, "C"),
            Language::Cxx => write!(f, "C++"),
            Language::Asm => write!(f, "assembly"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_path(Path::new("/sdk/main.c")), Some(Language::C));
        assert_eq!(Language::from_path(Path::new("/sdk/main.cc")), Some(Language::Cxx));
        assert_eq!(Language::from_path(Path::new("/sdk/main.cpp")), Some(Language::Cxx));
        assert_eq!(Language::from_path(Path::new("/sdk/main.cxx")), Some(Language::Cxx));
        assert_eq!(Language::from_path(Path::new("/sdk/start.s")), Some(Language::Asm));
    }

    #[test]
    fn test_language_detection_ignores_case() {
        assert_eq!(Language::from_path(Path::new("/sdk/start.S")), Some(Language::Asm));
        assert_eq!(Language::from_path(Path::new("/sdk/main.C")), Some(Language::C));
        assert_eq!(Language::from_path(Path::new("/sdk/main.CPP")), Some(Language::Cxx));
    }

    #[test]
    fn test_unknown_extensions() {
        assert_eq!(Language::from_path(Path::new("/sdk/main.h")), None);
        assert_eq!(Language::from_path(Path::new("/sdk/blob.bin")), None);
        assert_eq!(Language::from_path(Path::new("/sdk/Makefile")), None);
    }
}
