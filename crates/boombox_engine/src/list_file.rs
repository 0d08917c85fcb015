use std::path::{Path, PathBuf};

use boombox_core::{is_completed, parse_work_list, ParsedWorkList, SENTINEL};
use engine_logging::{engine_info, engine_warn};

use crate::persist::{append_text_line, read_text_lines, AtomicFileWriter, PersistError};

/// A work list as read from disk, kept verbatim so it can be marked completed later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkListFile {
    path: PathBuf,
    lines: Vec<String>,
}

impl WorkListFile {
    pub fn load(path: &Path) -> Result<Self, PersistError> {
        let lines = read_text_lines(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            lines,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The list already ends with the sentinel and must not be processed again.
    pub fn is_completed(&self) -> bool {
        is_completed(&self.lines)
    }

    pub fn parse(&self) -> ParsedWorkList {
        parse_work_list(&self.lines)
    }

    /// Append the sentinel, falling back to rewriting the whole file.
    ///
    /// Best effort: returns whether the list is now marked, never an error.
    pub fn mark_completed(&self) -> bool {
        if self.is_completed() {
            return true;
        }
        let appended = match append_text_line(&self.path, SENTINEL) {
            Ok(()) => true,
            Err(err) => {
                engine_warn!("Could not append marker to {:?}: {}", self.path, err);
                false
            }
        };
        if appended {
            engine_info!("Marked {:?} as completed", self.path);
            return true;
        }

        let mut lines = self.lines.clone();
        lines.push(SENTINEL.to_string());
        let Some(filename) = self.path.file_name().and_then(|name| name.to_str()) else {
            engine_warn!("Cannot rewrite {:?}: unusable file name", self.path);
            return false;
        };
        match AtomicFileWriter::for_path(&self.path).write_lines(filename, &lines) {
            Ok(_) => {
                engine_info!("Rewrote {:?} with completion marker", self.path);
                true
            }
            Err(err) => {
                engine_warn!("Could not rewrite {:?}: {}", self.path, err);
                false
            }
        }
    }
}
