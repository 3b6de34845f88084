// SPDX-License-Identifier: GPL-3.0-or-later

//! The canonical project model.
//!
//! This is the interface towards the IDE exporters. The exporters know
//! nothing about the build log the model was derived from, they only see
//! the settings and the file groups.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

/// Compiler settings of one scope (common or one of the languages).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    pub flags: BTreeSet<String>,
    pub macros: BTreeSet<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkerSettings {
    pub flags: BTreeSet<String>,
    pub script_files: BTreeSet<String>,
    pub libraries: BTreeSet<String>,
    pub search_paths: BTreeSet<String>,
}

/// Group name to paths mappings, in the order the groups were seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileGroups {
    pub includes: IndexMap<String, Vec<String>>,
    pub sources: IndexMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AggregateModel {
    pub name: String,
    pub common: Settings,
    pub c: Settings,
    pub cxx: Settings,
    pub asm: Settings,
    pub linker: LinkerSettings,
    pub files: FileGroups,
}
