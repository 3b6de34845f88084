// SPDX-License-Identifier: GPL-3.0-or-later

//! The two directory trees a project is made of.
//!
//! Every source file of the project lives either in the SDK tree or in the
//! application tree. The position of a file inside its tree names the group
//! it belongs to. Paths which are stored in the project are relative to an
//! anchor directory one level below the application root, this is where
//! the IDE exporters put the generated project files.

use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// The directory name which separates the application from its build output.
pub const BUILD_DIRECTORY: &str = "build";

/// The directory name of the anchor below the application root.
pub const ANCHOR_DIRECTORY: &str = "dummy";

/// Group name of the files which are directly in one of the roots.
pub const ROOT_GROUP: &str = ".";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupingError {
    #[error("Source file {0} is neither under the SDK root nor under the application root")]
    UnresolvableSource(PathBuf),
}

/// Where a file of the project belongs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub group: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roots {
    sdk: PathBuf,
    application: PathBuf,
}

impl Roots {
    pub fn new(sdk: impl AsRef<Path>, application: impl AsRef<Path>) -> Self {
        Self { sdk: normalize(sdk.as_ref()), application: normalize(application.as_ref()) }
    }

    pub fn sdk(&self) -> &Path {
        &self.sdk
    }

    pub fn application(&self) -> &Path {
        &self.application
    }

    pub fn anchor(&self) -> PathBuf {
        self.application.join(ANCHOR_DIRECTORY)
    }

    /// The group name of a directory. The SDK root is tried first.
    pub fn group_of(&self, directory: &Path) -> Option<String> {
        let directory = normalize(directory);
        [&self.sdk, &self.application]
            .into_iter()
            .find_map(|root| directory.strip_prefix(root).ok())
            .map(group_name)
    }

    /// The path as it is stored in the project: relative to the anchor.
    pub fn relative_to_anchor(&self, path: &Path) -> String {
        let path = normalize(path);
        pathdiff::diff_paths(&path, self.anchor())
            .unwrap_or(path)
            .to_string_lossy()
            .into_owned()
    }

    /// Locate a source file, the group is named after its directory.
    pub fn locate_source(&self, source: &Path) -> Result<Location, GroupingError> {
        let source = normalize(source);
        let directory = source.parent().unwrap_or(&source);
        let group = self
            .group_of(directory)
            .ok_or_else(|| GroupingError::UnresolvableSource(source.clone()))?;

        Ok(Location { group, path: self.relative_to_anchor(&source) })
    }

    /// Locate an include directory, the group is named after the directory itself.
    pub fn locate_directory(&self, directory: &Path) -> Option<Location> {
        let group = self.group_of(directory)?;
        Some(Location { group, path: self.relative_to_anchor(directory) })
    }
}

fn group_name(relative: &Path) -> String {
    if relative.as_os_str().is_empty() {
        ROOT_GROUP.to_string()
    } else {
        relative.to_string_lossy().into_owned()
    }
}

/// Lexically normalize the path: `.` components are removed, `..` components
/// are resolved against the preceding component. The filesystem is not
/// consulted, symbolic links are not followed.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match result.components().next_back() {
                Some(Component::Normal(_)) => {
                    result.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => result.push(Component::ParentDir),
            },
            other => result.push(other),
        }
    }
    result
}

/// Derive the application root from the path of the build log.
///
/// The build log is written into the build directory of the application,
/// so the application root is the path before the last `build` component.
pub fn application_root_of(path: &Path) -> Option<PathBuf> {
    let path = normalize(path);
    let components: Vec<Component> = path.components().collect();
    let position = components
        .iter()
        .rposition(|component| component.as_os_str() == BUILD_DIRECTORY)?;

    let root: PathBuf = components[..position].iter().collect();
    if root.as_os_str().is_empty() { None } else { Some(root) }
}
