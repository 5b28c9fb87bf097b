//! File reader: streams one log file through the line parser.
//!
//! Gzip archives are decompressed transparently based on their suffix. Lines
//! are split on `\n` with no upper bound on length, and decoded lossily so a
//! request line full of binary garbage still reaches the parser.

use crate::catalog::ARCHIVE_SUFFIX;
use flate2::read::MultiGzDecoder;
use logsift_core::{parse_line, Error, IngestObserver, LogRecord};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// More malformed lines than this in one file aborts the whole file.
pub const MALFORMED_LINE_LIMIT: usize = 1000;

const READ_BUFFER: usize = 1024 * 1024;

/// Loads every record of one file. The cache calls this on a miss.
pub trait RecordSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<FileRecords, Error>;
}

/// Records parsed from one file, plus how many lines were skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileRecords {
    pub records: Vec<LogRecord>,
    pub malformed: usize,
}

/// Reads plain and gzip-compressed access logs from disk.
#[derive(Clone)]
pub struct FileReader {
    observer: Arc<dyn IngestObserver>,
}

impl FileReader {
    pub fn new(observer: Arc<dyn IngestObserver>) -> Self {
        Self { observer }
    }

    pub fn read_file(&self, path: &Path) -> Result<FileRecords, Error> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;

        let compressed = is_compressed(path);
        let stream: Box<dyn Read> = if compressed {
            Box::new(MultiGzDecoder::new(file))
        } else {
            Box::new(file)
        };

        let result = self
            .read_lines(BufReader::with_capacity(READ_BUFFER, stream), path)
            .map_err(|err| match err {
                ReadError::Io(source) if compressed => Error::Decode {
                    path: path.to_path_buf(),
                    source,
                },
                ReadError::Io(source) => Error::Read {
                    path: path.to_path_buf(),
                    source,
                },
                ReadError::Ingest(err) => err,
            });

        match result {
            Ok(records) => {
                if records.malformed > 0 {
                    self.observer.malformed_summary(path, records.malformed);
                }
                Ok(records)
            }
            Err(err) => {
                self.observer.file_rejected(path, &err);
                Err(err)
            }
        }
    }

    /// Parse every line of `reader`. `path` is only used for reporting.
    pub fn read_lines<R: BufRead>(
        &self,
        mut reader: R,
        path: &Path,
    ) -> Result<FileRecords, ReadError> {
        let mut out = FileRecords::default();
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            if line.trim().is_empty() {
                continue;
            }

            match parse_line(line) {
                Ok(record) => out.records.push(record),
                Err(err) => {
                    out.malformed += 1;
                    if out.malformed > MALFORMED_LINE_LIMIT {
                        return Err(ReadError::Ingest(Error::TooManyMalformedLines {
                            path: path.to_path_buf(),
                            line: line_no,
                            malformed: out.malformed,
                        }));
                    }
                    self.observer.malformed_line(path, line_no, &err);
                }
            }
        }

        Ok(out)
    }
}

impl RecordSource for FileReader {
    fn load(&self, path: &Path) -> Result<FileRecords, Error> {
        self.read_file(path)
    }
}

/// Failure from [`FileReader::read_lines`], before the caller knows whether
/// an I/O error came from a decompressor.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Ingest(Error),
}

fn is_compressed(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(ARCHIVE_SUFFIX))
}
