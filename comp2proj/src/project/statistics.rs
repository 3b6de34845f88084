// SPDX-License-Identifier: GPL-3.0-or-later

//! Counters of a conversion run.
//!
//! The counters are updated while the records flow through the pipeline
//! and logged once the run is over, to give insight into what was taken
//! from the build log and what was left out.

use crate::semantic::Language;
use std::fmt;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStatistics {
    /// Number of compiler invocations read.
    pub compile_records: usize,

    /// Number of linker invocations read.
    pub link_records: usize,

    pub c_files: usize,
    pub cxx_files: usize,
    pub asm_files: usize,

    /// Number of compiled files which don't belong to any language settings.
    pub unrecognized_files: usize,

    /// Number of distinct include directories outside of the roots.
    pub skipped_include_dirs: usize,

    /// Number of distinct macros collected from the forced include headers.
    pub scraped_macros: usize,
}

impl RunStatistics {
    pub fn records(&self) -> usize {
        self.compile_records + self.link_records
    }

    pub fn count_file(&mut self, language: Option<Language>) {
        match language {
            Some(Language::C) => self.c_files += 1,
            Some(Language::Cxx) => self.cxx_files += 1,
            Some(Language::Asm) => self.asm_files += 1,
            None => self.unrecognized_files += 1,
        }
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run statistics:")?;
        writeln!(f, "  records: {}", self.records())?;
        writeln!(f, "  compile records: {}", self.compile_records)?;
        writeln!(f, "  link records: {}", self.link_records)?;
        writeln!(
            f,
            "  files by language: C {}, C++ {}, assembly {}",
            self.c_files, self.cxx_files, self.asm_files
        )?;
        writeln!(f, "  unrecognized files: {}", self.unrecognized_files)?;
        writeln!(f, "  skipped include directories: {}", self.skipped_include_dirs)?;
        write!(f, "  scraped macros: {}", self.scraped_macros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_file() {
        let mut stats = RunStatistics::default();
        stats.count_file(Some(Language::C));
        stats.count_file(Some(Language::C));
        stats.count_file(Some(Language::Asm));
        stats.count_file(None);

        assert_eq!(stats.c_files, 2);
        assert_eq!(stats.cxx_files, 0);
        assert_eq!(stats.asm_files, 1);
        assert_eq!(stats.unrecognized_files, 1);
    }

    #[test]
    fn test_display_format() {
        let stats = RunStatistics {
            compile_records: 12,
            link_records: 1,
            c_files: 10,
            cxx_files: 1,
            asm_files: 0,
            unrecognized_files: 1,
            skipped_include_dirs: 2,
            scraped_macros: 40,
        };

        let output = format!("{}", stats);
        assert!(output.contains("Run statistics:"));
        assert!(output.contains("records: 13"));
        assert!(output.contains("compile records: 12"));
        assert!(output.contains("link records: 1"));
        assert!(output.contains("files by language: C 10, C++ 1, assembly 0"));
        assert!(output.contains("unrecognized files: 1"));
        assert!(output.contains("skipped include directories: 2"));
        assert!(output.contains("scraped macros: 40"));
    }
}
