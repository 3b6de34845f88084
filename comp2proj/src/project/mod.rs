// SPDX-License-Identifier: GPL-3.0-or-later

//! This module builds the project model from the descriptors of the records.
//!
//! Source files and include directories are placed into groups relative to
//! the SDK or the application root. The settings of the files are reduced
//! into common and per-language settings, and the settings of the link step
//! are attached.

pub mod aggregate;
pub mod groups;
pub mod headers;
pub mod model;
pub mod roots;
pub mod statistics;

pub use aggregate::Aggregator;
pub use model::{AggregateModel, FileGroups, LinkerSettings, Settings};
pub use roots::{GroupingError, Location, Roots, application_root_of};
pub use statistics::RunStatistics;
