//! Log corpora and on-disk fixtures used across harnesses.
//!
//! [`LogDir`] owns a temporary log directory laid out like a rotated nginx
//! log: a live `access_security.log` plus `access_security.log.<n>.gz`
//! archives. Files are written synchronously so a query issued right after
//! sees them.

use flate2::write::GzEncoder;
use flate2::Compression;
use logsift::{
    Catalog, Error, FileReader, IngestObserver, LineError, QueryEngine, RecordCache,
};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::SystemTime;
use tempfile::TempDir;

/// Live file name used by every fixture directory.
pub const LIVE_NAME: &str = "access_security.log";

// ---------------------------------------------------------------------------
// Corpora
// ---------------------------------------------------------------------------

/// Lines in the exact production layout. Each one matches the strict grammar.
pub const CORPUS_WELL_FORMED: &[&str] = &[
    r#"203.0.113.9:51234 - shop.example.com:443 [10/Oct/2023:13:55:36 +0800] "GET /cart?id=7 HTTP/1.1" 200 5120 431 rt=0.012 uct=0.001 urt=0.011 ust=200 ua=10.0.0.4:8080 "https://shop.example.com/" "Mozilla/5.0 (X11; Linux x86_64)" TLSv1.3 TLS_AES_128_GCM_SHA256 rid=9f86d081884c7d65"#,
    r#"198.51.100.23:40112 - api.example.com:443 [10/Oct/2023:13:56:01 +0800] "POST /v1/orders HTTP/2.0" 201 88 2048 rt=0.140 uct=0.002 urt=0.138 ust=201 ua=10.0.0.5:9000 "-" "okhttp/4.12.0" TLSv1.3 TLS_AES_256_GCM_SHA384 rid=5e884898da280471"#,
    r#"192.0.2.44:33000 - shop.example.com:443 [10/Oct/2023:13:57:12 +0800] "GET /favicon.ico HTTP/1.1" 404 153 389 rt=0.000 uct=- urt=- ust=- ua=- "https://shop.example.com/cart" "Mozilla/5.0" TLSv1.2 ECDHE-RSA-AES128-GCM-SHA256 rid=6b86b273ff34fce1"#,
    r#"2001:db8::17:60001 - shop.example.com:443 [10/Oct/2023:13:58:40 +0800] "GET /search?q=a\"b HTTP/1.1" 200 7001 512 rt=0.051 uct=0.001 urt=0.050 ust=200 ua=10.0.0.4:8080 "-" "curl/8.4.0" TLSv1.3 TLS_AES_128_GCM_SHA256 rid=d4735e3a265e16ee"#,
    r#"45.155.205.2:41000 - shop.example.com:443 [10/Oct/2023:13:59:03 +0800] "\x16\x03\x01" 400 157 0 rt=0.001 uct=- urt=- ust=- ua=- "-" "-" - - rid=4e07408562bedb8b"#,
];

/// Lines the strict grammar rejects but the fallback split still reads.
pub const CORPUS_FALLBACK: &[&str] = &[
    r#"10.1.1.1:5000  -  web:80  [05/Mar/2024:08:00:00 -0500]  "POST /login HTTP/2.0"  401 12 300  rid=r-1 rt=0.250 ust=401 uct=0.000 urt=0.249 ua=127.0.0.1:9000  "-"  "okhttp/4.9"  TLSv1.3  TLS_CHACHA20_POLY1305_SHA256"#,
    r#"10.1.1.2:5001 - web:80 [05/Mar/2024:08:00:01 +0000] "GET / HTTP/1.1" 502 0 90 rt=1.002 uct=0.001, 0.001 urt=0.500, 0.501 ust=502, 502 ua=10.0.0.1:80, 10.0.0.2:80 "-" "curl" TLSv1.2 AES rid=x"#,
    r#"10.0.0.9 [05/Mar/2024:08:00:02 +0000] "GET /healthz HTTP/1.1" 204"#,
];

/// Lines that yield no record at all.
pub const CORPUS_MALFORMED: &[&str] = &[
    "garbage",
    "GET / HTTP/1.1",
    r#"10.0.0.9 "GET /" 200"#,
    r#"10.0.0.9 [05/Mar/2024:08:00:00 +0000] "GET /" OK"#,
    r#"10.0.0.9:1 - web:80 [not a time] "GET / HTTP/1.1" 200 0 0 rt=0.001 uct=- urt=- ust=- ua=- "-" "-" - - rid=-"#,
];

// ---------------------------------------------------------------------------
// LogDir
// ---------------------------------------------------------------------------

/// A temporary log directory, removed on drop.
pub struct LogDir {
    dir: TempDir,
}

impl LogDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp log dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn live(&self) -> PathBuf {
        self.path().join(LIVE_NAME)
    }

    /// `access_security.log.<suffix>.gz`
    pub fn archive(&self, suffix: &str) -> PathBuf {
        self.path().join(format!("{LIVE_NAME}.{suffix}.gz"))
    }

    pub fn write_live<S: AsRef<str>>(&self, lines: &[S]) -> PathBuf {
        let path = self.live();
        write_plain(&path, lines);
        path
    }

    pub fn write_archive<S: AsRef<str>>(&self, suffix: &str, lines: &[S]) -> PathBuf {
        let path = self.archive(suffix);
        write_gzip(&path, lines);
        path
    }

    pub fn catalog(&self) -> Catalog {
        Catalog::new(self.path(), LIVE_NAME)
    }

    /// A query engine over this directory reporting to `observer`.
    pub fn engine_with(&self, observer: Arc<dyn IngestObserver>) -> QueryEngine {
        let reader = FileReader::new(Arc::clone(&observer));
        QueryEngine::new(self.catalog(), RecordCache::new(reader, observer))
    }

    pub fn engine(&self) -> QueryEngine {
        self.engine_with(Arc::new(logsift::NullObserver))
    }
}

impl Default for LogDir {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// File helpers
// ---------------------------------------------------------------------------

fn joined<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().fold(String::new(), |mut out, line| {
        out.push_str(line.as_ref());
        out.push('\n');
        out
    })
}

pub fn write_plain<S: AsRef<str>>(path: &Path, lines: &[S]) {
    fs::write(path, joined(lines)).expect("write plain log file");
}

pub fn write_gzip<S: AsRef<str>>(path: &Path, lines: &[S]) {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(joined(lines).as_bytes())
        .expect("compress log lines");
    let bytes = encoder.finish().expect("finish gzip stream");
    fs::write(path, bytes).expect("write gzip log file");
}

/// Force a file's modification time, so cache keys change deterministically
/// regardless of filesystem timestamp granularity.
pub fn set_mtime(path: &Path, modified: SystemTime) {
    File::options()
        .write(true)
        .open(path)
        .and_then(|file| file.set_modified(modified))
        .expect("set file mtime");
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

/// One ingestion event, with paths reduced to file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    MalformedLine { file: String, line: usize },
    MalformedSummary { file: String, count: usize },
    FileRejected { file: String },
    CacheMiss { file: String },
}

/// Observer that records every event it receives, in order.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("observer lock").clone()
    }

    pub fn misses(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::CacheMiss { .. }))
            .count()
    }

    fn push(&self, event: Event) {
        self.events.lock().expect("observer lock").push(event);
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl IngestObserver for RecordingObserver {
    fn malformed_line(&self, path: &Path, line: usize, _error: &LineError) {
        self.push(Event::MalformedLine {
            file: file_name(path),
            line,
        });
    }

    fn malformed_summary(&self, path: &Path, count: usize) {
        self.push(Event::MalformedSummary {
            file: file_name(path),
            count,
        });
    }

    fn file_rejected(&self, path: &Path, _error: &Error) {
        self.push(Event::FileRejected {
            file: file_name(path),
        });
    }

    fn cache_miss(&self, path: &Path) {
        self.push(Event::CacheMiss {
            file: file_name(path),
        });
    }
}
