// SPDX-License-Identifier: GPL-3.0-or-later

//! This module is responsible for writing the results of a run.
//!
//! The project document is written as a single JSON object, the record
//! descriptions as JSON lines. Files are replaced atomically, and the
//! `-` file name writes to the standard output instead.

mod formats;
mod writers;

use crate::args::STDOUT_FILE_NAME;
use std::path::PathBuf;
use thiserror::Error;
use writers::Destination;

// Re-export types for convenience.
pub use formats::{
    DescriptionFormat, ProjectDocument, ProjectFormat, RecordDescription, SerializationError, Toolchain,
};

/// Writes the project document.
pub struct ProjectWriter {
    destination: Destination,
}

impl ProjectWriter {
    pub fn new(file_name: &str) -> Self {
        Self { destination: Destination::new(file_name, STDOUT_FILE_NAME) }
    }

    pub fn write(&self, document: &ProjectDocument) -> Result<(), WriterError> {
        self.destination.write(|output| ProjectFormat::write(output, document))
    }
}

/// Writes the record descriptions.
pub struct DescriptionWriter {
    destination: Destination,
}

impl DescriptionWriter {
    pub fn new(file_name: &str) -> Self {
        Self { destination: Destination::new(file_name, STDOUT_FILE_NAME) }
    }

    pub fn write(&self, descriptions: &[RecordDescription]) -> Result<(), WriterError> {
        self.destination.write(|output| DescriptionFormat::write(output, descriptions))
    }
}

/// Represents errors that can occur while writing output.
#[derive(Error, Debug)]
pub enum WriterError {
    #[error("Serialization error {0}: {1}")]
    Io(PathBuf, SerializationError),
}
