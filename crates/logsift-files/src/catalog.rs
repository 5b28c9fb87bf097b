//! Catalog: which files in the log directory belong to the rotation scheme.

use logsift_core::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix of compressed rotated archives.
pub const ARCHIVE_SUFFIX: &str = ".gz";

/// The live log file `<name>` plus its archives `<name>.<suffix>.gz`, where
/// `<suffix>` is a rotation counter or date made of digits, `-`, `_`, or `.`.
#[derive(Debug, Clone)]
pub struct Catalog {
    dir: PathBuf,
    live_name: String,
}

impl Catalog {
    pub fn new(dir: impl Into<PathBuf>, live_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            live_name: live_name.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every catalog file in the directory, sorted by file name.
    ///
    /// Subdirectories are skipped even when their name matches. An existing
    /// directory with no matching files yields an empty list.
    pub fn list(&self) -> Result<Vec<PathBuf>, Error> {
        let directory_error = |source| Error::Directory {
            path: self.dir.clone(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir).map_err(directory_error)? {
            let entry = entry.map_err(directory_error)?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !self.is_member(&name) {
                continue;
            }
            let path = entry.path();
            if path.is_dir() {
                continue;
            }
            files.push(path);
        }
        files.sort();
        Ok(files)
    }

    /// Whether a file name is the live log or one of its archives.
    pub fn is_member(&self, name: &str) -> bool {
        if name == self.live_name {
            return true;
        }
        let Some(rest) = name
            .strip_prefix(self.live_name.as_str())
            .and_then(|rest| rest.strip_prefix('.'))
            .and_then(|rest| rest.strip_suffix(ARCHIVE_SUFFIX))
        else {
            return false;
        };
        !rest.is_empty()
            && rest
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'-' | b'_' | b'.'))
    }
}
