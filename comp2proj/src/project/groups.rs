// SPDX-License-Identifier: GPL-3.0-or-later

use super::model::FileGroups;
use super::roots::{GroupingError, Location, Roots, normalize};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Collects the source files and include directories of the project into
/// groups, in the order they were seen.
#[derive(Debug)]
pub struct PathGrouper {
    roots: Roots,
    includes: IndexMap<String, Vec<String>>,
    sources: IndexMap<String, Vec<String>>,
    registered: IndexSet<PathBuf>,
    skipped: HashSet<PathBuf>,
}

impl PathGrouper {
    pub fn new(roots: Roots) -> Self {
        Self {
            roots,
            includes: IndexMap::new(),
            sources: IndexMap::new(),
            registered: IndexSet::new(),
            skipped: HashSet::new(),
        }
    }

    /// Add a source file to its group.
    ///
    /// A source file which is outside of both roots can't be represented
    /// in the project, the error is fatal for the caller.
    pub fn add_source(&mut self, source: &Path) -> Result<Location, GroupingError> {
        let location = self.roots.locate_source(source)?;
        insert_unique(&mut self.sources, &location);
        Ok(location)
    }

    /// Add an include directory to its group.
    ///
    /// Returns `false` when the directory is outside of both roots. These are
    /// reported once and left out of the project.
    pub fn add_include_dir(&mut self, directory: &str) -> bool {
        let directory = normalize(Path::new(directory));
        if self.registered.contains(&directory) {
            return true;
        }
        if self.skipped.contains(&directory) {
            return false;
        }

        match self.roots.locate_directory(&directory) {
            Some(location) => {
                insert_unique(&mut self.includes, &location);
                self.registered.insert(directory);
                true
            }
            None => {
                log::warn!(
                    "Include directory {} is neither under {} nor under {}, it is left out.",
                    directory.display(),
                    self.roots.sdk().display(),
                    self.roots.application().display()
                );
                self.skipped.insert(directory);
                false
            }
        }
    }

    /// The include directories which were added to a group, in insertion order.
    pub fn include_directories(&self) -> impl Iterator<Item = &Path> {
        self.registered.iter().map(PathBuf::as_path)
    }

    /// The number of distinct include directories which were left out.
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn into_groups(self) -> FileGroups {
        FileGroups { includes: self.includes, sources: self.sources }
    }
}

fn insert_unique(groups: &mut IndexMap<String, Vec<String>>, location: &Location) {
    let entries = groups.entry(location.group.clone()).or_default();
    if !entries.contains(&location.path) {
        entries.push(location.path.clone());
    }
}
