// SPDX-License-Identifier: GPL-3.0-or-later

//! Folding the per-file settings into the project settings.
//!
//! The settings of the files are merged per language by set union. Once
//! every record was fed, the settings shared by all contributing scopes
//! are moved into the common bucket:
//!
//! - common macros are the macros of every contributing language,
//! - common flags are the flags of every contributing language and the
//!   linker (when a link step was fed).
//!
//! A language contributes once a source file of that language was fed.
//! Without a contributing language nothing is common. The macros scraped
//! from the forced include headers are common too. Each scope keeps only
//! what is not common.

use super::groups::PathGrouper;
use super::headers;
use super::model::{AggregateModel, LinkerSettings, Settings};
use super::roots::{GroupingError, Roots};
use super::statistics::RunStatistics;
use crate::semantic::{FileDescriptor, Language, LinkerDescriptor, is_sentinel};
use indexmap::IndexSet;
use std::collections::BTreeSet;

#[derive(Debug, Default)]
struct Scope {
    flags: BTreeSet<String>,
    macros: BTreeSet<String>,
    contributing: bool,
}

impl Scope {
    fn feed(&mut self, file: &FileDescriptor) {
        self.contributing = true;
        self.flags.extend(file.other_options.iter().cloned());
        self.macros
            .extend(file.macros.iter().filter(|definition| !is_sentinel(definition)).cloned());
    }
}

/// Accumulates the records of a build log into a project model.
#[derive(Debug)]
pub struct Aggregator {
    grouper: PathGrouper,
    c: Scope,
    cxx: Scope,
    asm: Scope,
    linker: Option<LinkerDescriptor>,
    forced_includes: IndexSet<String>,
    statistics: RunStatistics,
}

impl Aggregator {
    pub fn new(roots: Roots) -> Self {
        Self {
            grouper: PathGrouper::new(roots),
            c: Scope::default(),
            cxx: Scope::default(),
            asm: Scope::default(),
            linker: None,
            forced_includes: IndexSet::new(),
            statistics: RunStatistics::default(),
        }
    }

    /// Feed the settings of a compiled file.
    ///
    /// Fails when the source file can't be placed into a group. In that case
    /// the aggregator state shall not be used to produce a model.
    pub fn feed_file(&mut self, file: &FileDescriptor) -> Result<(), GroupingError> {
        self.grouper.add_source(&file.source_path)?;

        let language = file.language();
        self.statistics.compile_records += 1;
        self.statistics.count_file(language);
        match language {
            Some(Language::C) => self.c.feed(file),
            Some(Language::Cxx) => self.cxx.feed(file),
            Some(Language::Asm) => self.asm.feed(file),
            None => log::debug!(
                "Source file {} is not compiled by any known language settings.",
                file.source_path.display()
            ),
        }

        self.forced_includes.extend(file.forced_includes.iter().cloned());
        for directory in &file.include_dirs {
            self.grouper.add_include_dir(directory);
        }
        Ok(())
    }

    /// Feed the settings of a link step. It replaces the previous link step.
    pub fn feed_linker(&mut self, linker: LinkerDescriptor) {
        self.statistics.link_records += 1;
        if let Some(previous) = &self.linker {
            log::warn!(
                "Link step {} replaces the settings of the previous link step {}.",
                linker.output_path.as_deref().unwrap_or("(unnamed)"),
                previous.output_path.as_deref().unwrap_or("(unnamed)")
            );
        }
        self.linker = Some(linker);
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Compute the project settings.
    pub fn finish(self, name: &str) -> (AggregateModel, RunStatistics) {
        let Self { grouper, c, cxx, asm, linker, forced_includes, mut statistics } = self;

        let languages: Vec<&Scope> =
            [&c, &cxx, &asm].into_iter().filter(|scope| scope.contributing).collect();

        let common_macros = intersection(languages.iter().map(|scope| &scope.macros));
        // The linker alone never makes flags common.
        let common_flags = if languages.is_empty() {
            BTreeSet::new()
        } else {
            intersection(
                languages
                    .iter()
                    .map(|scope| &scope.flags)
                    .chain(linker.as_ref().map(|linker| &linker.other_options)),
            )
        };

        let scraped = headers::scrape_macros(
            grouper.include_directories(),
            forced_includes.iter().map(String::as_str),
        );
        statistics.scraped_macros = scraped.len();
        statistics.skipped_include_dirs = grouper.skipped_count();

        let mut common = Settings {
            flags: common_flags,
            macros: common_macros.union(&scraped).cloned().collect(),
        };
        common.macros.retain(|definition| !is_sentinel(definition));

        let reduce = |scope: &Scope| Settings {
            flags: scope.flags.difference(&common.flags).cloned().collect(),
            macros: scope.macros.difference(&common.macros).cloned().collect(),
        };
        let c = reduce(&c);
        let cxx = reduce(&cxx);
        let asm = reduce(&asm);

        let linker = linker
            .map(|linker| LinkerSettings {
                flags: linker.other_options.difference(&common.flags).cloned().collect(),
                script_files: linker.linker_scripts,
                libraries: linker.libraries,
                search_paths: linker.library_search_dirs,
            })
            .unwrap_or_default();

        let model = AggregateModel {
            name: name.to_string(),
            common,
            c,
            cxx,
            asm,
            linker,
            files: grouper.into_groups(),
        };
        (model, statistics)
    }
}

/// The intersection of the sets, empty when there are no sets.
fn intersection<'a>(mut sets: impl Iterator<Item = &'a BTreeSet<String>>) -> BTreeSet<String> {
    let Some(first) = sets.next() else {
        return BTreeSet::new();
    };
    sets.fold(first.clone(), |result, set| result.intersection(set).cloned().collect())
}
