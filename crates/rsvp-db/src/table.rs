use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::codec;
use crate::error::{Result, StoreError};

/// One table file on disk. Callers are responsible for holding the guard.
#[derive(Debug)]
pub(crate) struct TableFile {
    name: &'static str,
    path: PathBuf,
}

impl TableFile {
    pub fn new(dir: &Path, name: &'static str) -> Self {
        Self {
            name,
            path: dir.join(name),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and decode every row with `arity` fields. A missing file is an
    /// empty table.
    pub fn read_rows(&self, arity: usize) -> Result<Vec<Vec<String>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, treating as empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let decoded = codec::decode_table(&bytes, arity);
        if decoded.skipped > 0 {
            warn!(
                "{}: skipped {} malformed row(s)",
                self.name, decoded.skipped
            );
        }
        Ok(decoded.rows)
    }

    /// Replace the whole file with `rows`.
    pub fn write_rows(&self, rows: &[Vec<String>]) -> Result<()> {
        let bytes = self.encode(rows)?;
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;
        file.write_all(&bytes).map_err(|e| self.io_error(e))?;
        file.flush().map_err(|e| self.io_error(e))?;
        Ok(())
    }

    /// Add `rows` after the existing content. Only the last byte of the file
    /// is read: if the previous row was left unterminated it gets its `\n`
    /// first, so the new rows start on a line of their own.
    pub fn append_rows(&self, rows: &[Vec<String>]) -> Result<()> {
        let mut bytes = self.encode(rows)?;
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|e| self.io_error(e))?;

        if !ends_with_newline(&mut file).map_err(|e| self.io_error(e))? {
            debug!("{}: terminating unfinished last row", self.name);
            bytes.insert(0, b'\n');
        }

        file.write_all(&bytes).map_err(|e| self.io_error(e))?;
        file.flush().map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn encode(&self, rows: &[Vec<String>]) -> Result<Vec<u8>> {
        codec::encode(rows).map_err(|source| StoreError::Encode {
            table: self.name,
            source,
        })
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            table: self.name,
            path: self.path.clone(),
            source,
        }
    }
}

/// True for an empty file or one whose last byte is `\n`.
fn ends_with_newline(file: &mut fs::File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}
