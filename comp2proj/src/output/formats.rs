// SPDX-License-Identifier: GPL-3.0-or-later

//! This module declares the file formats used by this project.
//! The following formats are declared:
//!
//! - The project document: the canonical project model, labeled with the
//!   exporter tool and the toolchain. It is a single pretty printed JSON
//!   object.
//! - The record description format: one JSON object per record, as a
//!   [JSON line format](https://jsonlines.org/). The format reflects the
//!   internal representation of the descriptors and is not stable.

use crate::project::AggregateModel;
use crate::semantic::{FileDescriptor, Language, LinkerDescriptor};
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// Represents errors that can occur while writing the file formats.
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Generic IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Format syntax error: {0}")]
    Syntax(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toolchain {
    pub prefix: String,
}

/// The document handed over to the exporters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDocument {
    pub tool: String,
    pub toolchain: Toolchain,
    #[serde(flatten)]
    pub project: AggregateModel,
}

/// The description of a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RecordDescription {
    Compile {
        line: usize,
        language: Option<Language>,
        group: String,
        #[serde(rename = "relativePath")]
        relative_path: String,
        #[serde(flatten)]
        file: FileDescriptor,
    },
    Link {
        line: usize,
        #[serde(flatten)]
        linker: LinkerDescriptor,
    },
}

/// Writes the project document as pretty printed JSON.
pub struct ProjectFormat;

impl ProjectFormat {
    pub fn write(mut writer: impl Write, document: &ProjectDocument) -> Result<(), SerializationError> {
        serde_json::to_writer_pretty(&mut writer, document)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Writes the record descriptions as JSON lines.
pub struct DescriptionFormat;

impl DescriptionFormat {
    pub fn write<'a>(
        mut writer: impl Write,
        descriptions: impl IntoIterator<Item = &'a RecordDescription>,
    ) -> Result<(), SerializationError> {
        for description in descriptions {
            serde_json::to_writer(&mut writer, description)?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }
}
