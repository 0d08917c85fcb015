use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use encoding_rs::UTF_8;
use tempfile::NamedTempFile;
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl PersistError {
    fn file(path: &Path, source: io::Error) -> Self {
        PersistError::File {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Writability probe; the temp file is removed on drop.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Read a UTF-8 text file as lines. A leading BOM is dropped and invalid
/// sequences are replaced rather than rejected.
pub fn read_text_lines(path: &Path) -> Result<Vec<String>, PersistError> {
    let bytes = fs::read(path).map_err(|e| PersistError::file(path, e))?;
    let (text, _had_errors) = UTF_8.decode_with_bom_removal(&bytes);
    Ok(text.lines().map(ToOwned::to_owned).collect())
}

/// Append `line` to a BOM text file as its new last line.
///
/// An empty file gets the BOM first; a file not ending in a newline gets one
/// before `line`.
pub fn append_text_line(path: &Path, line: &str) -> Result<(), PersistError> {
    let existing = fs::read(path).map_err(|e| PersistError::file(path, e))?;
    let mut buffer = Vec::with_capacity(UTF8_BOM.len() + line.len() + 1);
    if existing.is_empty() {
        buffer.extend_from_slice(UTF8_BOM);
    } else if !existing.ends_with(b"\n") {
        buffer.push(b'\n');
    }
    buffer.extend_from_slice(line.as_bytes());

    let mut file = OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| PersistError::file(path, e))?;
    file.write_all(&buffer)
        .and_then(|_| file.flush())
        .map_err(|e| PersistError::file(path, e))
}

/// Atomically write BOM-prefixed text files by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Writer for the directory containing `path` (the working directory for bare names).
    pub fn for_path(path: &Path) -> Self {
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir)
    }

    /// Write `lines` joined by `\n` (no trailing newline) to `{dir}/{filename}`.
    pub fn write_lines<S: AsRef<str>>(
        &self,
        filename: &str,
        lines: &[S],
    ) -> Result<PathBuf, PersistError> {
        let content = lines
            .iter()
            .map(|line| line.as_ref())
            .collect::<Vec<_>>()
            .join("\n");
        self.write(filename, &content)
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(UTF8_BOM)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Windows refuses to rename over an existing file.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}
