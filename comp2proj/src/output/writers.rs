// SPDX-License-Identifier: GPL-3.0-or-later

use super::WriterError;
use super::formats::SerializationError;
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::{fs, io};

/// Where the serialized content goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub(super) fn new(file_name: &str, stdout_name: &str) -> Self {
        if file_name == stdout_name {
            Destination::Stdout
        } else {
            Destination::File(PathBuf::from(file_name))
        }
    }

    /// Run the serialization against the destination.
    pub(super) fn write<F>(&self, serialize: F) -> Result<(), WriterError>
    where
        F: FnOnce(&mut dyn Write) -> Result<(), SerializationError>,
    {
        match self {
            Destination::Stdout => {
                let stdout = io::stdout();
                let mut output = io::BufWriter::new(stdout.lock());
                serialize(&mut output)
                    .and_then(|_| output.flush().map_err(SerializationError::from))
                    .map_err(|err| WriterError::Io(PathBuf::from("<stdout>"), err))
            }
            Destination::File(path) => AtomicFileWriter::new(path).write(serialize),
        }
    }
}

/// Writes a file by writing a sibling temporary file first and renaming it
/// to the final name.
///
/// The final file is either the complete new content or untouched.
pub(super) struct AtomicFileWriter {
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl AtomicFileWriter {
    pub(super) fn new(final_path: &Path) -> Self {
        Self { temp_path: temp_path_of(final_path), final_path: final_path.to_path_buf() }
    }

    pub(super) fn write<F>(self, serialize: F) -> Result<(), WriterError>
    where
        F: FnOnce(&mut dyn Write) -> Result<(), SerializationError>,
    {
        if let Err(err) = self.write_temporary(serialize) {
            self.discard();
            return Err(WriterError::Io(self.temp_path, err));
        }

        if let Err(err) = fs::rename(&self.temp_path, &self.final_path) {
            self.discard();
            return Err(WriterError::Io(self.final_path, SerializationError::Io(err)));
        }
        Ok(())
    }

    fn write_temporary<F>(&self, serialize: F) -> Result<(), SerializationError>
    where
        F: FnOnce(&mut dyn Write) -> Result<(), SerializationError>,
    {
        let file = fs::File::create(&self.temp_path)?;
        let mut output = io::BufWriter::new(file);
        serialize(&mut output)?;
        output.flush()?;
        Ok(())
    }

    fn discard(&self) {
        match fs::remove_file(&self.temp_path) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => {
                log::warn!("Failed to remove temporary file {}: {err}", self.temp_path.display());
            }
            _ => {}
        }
    }
}

/// The temporary file name: the final name with `.tmp` appended.
fn temp_path_of(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
