// SPDX-License-Identifier: GPL-3.0-or-later

//! Reading the build log.
//!
//! Every non-blank line of the log is one record: the component label, the
//! arguments of the invocation, and a terminal path. When the terminal path
//! is a linker map file, the record is a link step; otherwise it is the
//! compilation of the source file named by the terminal path.

use super::{ClassificationError, FileDescriptor, LinkerDescriptor, compile, link};
use std::io::BufRead;
use std::path::PathBuf;
use thiserror::Error;

const MAP_FILE_SUFFIX: &str = ".map";

/// One invocation of the build log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Compile { component: String, arguments: Vec<String>, source: PathBuf },
    Link { component: String, arguments: Vec<String>, map_file: PathBuf },
}

/// The settings a record describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Descriptor {
    File(FileDescriptor),
    Linker(LinkerDescriptor),
}

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to read line {line}: {source}")]
    Io { line: usize, source: std::io::Error },
    #[error("Line {line} is malformed: expected a label and a path, found {tokens} token(s)")]
    Malformed { line: usize, tokens: usize },
    #[error("Line {line} has an invalid option: {source}")]
    Classification { line: usize, source: ClassificationError },
}

impl Record {
    /// Split a line into a record. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str, number: usize) -> Result<Option<Self>, RecordError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let (label, terminal, arguments) = match tokens.as_slice() {
            [] => return Ok(None),
            [label, arguments @ .., terminal] => (*label, *terminal, arguments),
            [_] => return Err(RecordError::Malformed { line: number, tokens: 1 }),
        };

        let component = label.to_string();
        let arguments = arguments.iter().map(|token| token.to_string()).collect();
        let record = if terminal.ends_with(MAP_FILE_SUFFIX) {
            Record::Link { component, arguments, map_file: PathBuf::from(terminal) }
        } else {
            Record::Compile { component, arguments, source: PathBuf::from(terminal) }
        };
        Ok(Some(record))
    }

    /// Classify the arguments of the record.
    pub fn describe(&self) -> Result<Descriptor, ClassificationError> {
        match self {
            Record::Compile { component, arguments, source } => {
                compile::extract(component, arguments, source).map(Descriptor::File)
            }
            Record::Link { arguments, .. } => link::extract(arguments).map(Descriptor::Linker),
        }
    }
}

/// Iterates over the records of a build log.
///
/// The items carry the (one based) line number of the record.
pub struct RecordReader<R: BufRead> {
    lines: std::io::Lines<R>,
    line: usize,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self { lines: reader.lines(), line: 0 }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<(usize, Record), RecordError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line += 1;

            let parsed = line
                .map_err(|source| RecordError::Io { line: self.line, source })
                .and_then(|line| Record::parse(&line, self.line));
            match parsed {
                Ok(Some(record)) => return Some(Ok((self.line, record))),
                Ok(None) => continue,
                Err(error) => return Some(Err(error)),
            }
        }
    }
}
