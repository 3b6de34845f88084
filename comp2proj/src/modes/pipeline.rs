// SPDX-License-Identifier: GPL-3.0-or-later

//! The conversion pipelines: read the build log record by record, describe
//! the records, then write the result once every record was processed.
//!
//! Any error stops the pipeline before the output is written, so a failed
//! run leaves the previous output untouched.

use crate::output::{
    DescriptionWriter, ProjectDocument, ProjectWriter, RecordDescription, Toolchain, WriterError,
};
use crate::project::{Aggregator, GroupingError, Roots, RunStatistics};
use crate::semantic::{Descriptor, Record, RecordError, RecordReader};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Failed to open build log {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Record(#[from] RecordError),
    #[error("Line {line}: {source}")]
    Grouping { line: usize, source: GroupingError },
    #[error(transparent)]
    Writer(#[from] WriterError),
}

/// Aggregates the build log into the project document.
pub struct ProjectPipeline {
    input: PathBuf,
    roots: Roots,
    name: String,
    tool: String,
    prefix: String,
    writer: ProjectWriter,
}

impl ProjectPipeline {
    pub fn new(
        input: PathBuf,
        roots: Roots,
        name: String,
        tool: String,
        prefix: String,
        writer: ProjectWriter,
    ) -> Self {
        Self { input, roots, name, tool, prefix, writer }
    }

    pub fn roots(&self) -> &Roots {
        &self.roots
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tool(&self) -> &str {
        &self.tool
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn run(self) -> Result<(), RuntimeError> {
        let mut aggregator = Aggregator::new(self.roots);
        for item in open(&self.input)? {
            let (line, record) = item?;
            match describe(line, &record)? {
                Descriptor::File(file) => aggregator
                    .feed_file(&file)
                    .map_err(|source| RuntimeError::Grouping { line, source })?,
                Descriptor::Linker(linker) => aggregator.feed_linker(linker),
            }
        }
        log::debug!("Build log is consumed after {} records", aggregator.statistics().records());

        let (project, statistics) = aggregator.finish(&self.name);
        log::info!("{statistics}");

        let document =
            ProjectDocument { tool: self.tool, toolchain: Toolchain { prefix: self.prefix }, project };
        self.writer.write(&document)?;
        Ok(())
    }
}

/// Writes the settings of every record of the build log.
pub struct DescribePipeline {
    input: PathBuf,
    roots: Roots,
    writer: DescriptionWriter,
}

impl DescribePipeline {
    pub fn new(input: PathBuf, roots: Roots, writer: DescriptionWriter) -> Self {
        Self { input, roots, writer }
    }

    pub fn run(self) -> Result<(), RuntimeError> {
        let mut statistics = RunStatistics::default();
        let mut descriptions = Vec::new();
        for item in open(&self.input)? {
            let (line, record) = item?;
            let description = match describe(line, &record)? {
                Descriptor::File(file) => {
                    let location = self
                        .roots
                        .locate_source(&file.source_path)
                        .map_err(|source| RuntimeError::Grouping { line, source })?;
                    statistics.compile_records += 1;
                    statistics.count_file(file.language());
                    RecordDescription::Compile {
                        line,
                        language: file.language(),
                        group: location.group,
                        relative_path: location.path,
                        file,
                    }
                }
                Descriptor::Linker(linker) => {
                    statistics.link_records += 1;
                    RecordDescription::Link { line, linker }
                }
            };
            descriptions.push(description);
        }
        log::info!("{statistics}");

        self.writer.write(&descriptions)?;
        Ok(())
    }
}

fn open(path: &Path) -> Result<RecordReader<BufReader<File>>, RuntimeError> {
    let file = File::open(path)
        .map_err(|source| RuntimeError::Input { path: path.to_path_buf(), source })?;
    Ok(RecordReader::new(BufReader::new(file)))
}

fn describe(line: usize, record: &Record) -> Result<Descriptor, RecordError> {
    log::debug!("Line {line}: {record:?}");
    record.describe().map_err(|source| RecordError::Classification { line, source })
}
