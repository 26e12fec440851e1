//! Shared helpers for snapshot ingest tests.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// Header row carried by every snapshot.
pub const SNAPSHOT_HEADER: &str =
    "COUNTRY ISO2 CODE,SWIFT CODE,CODE TYPE,NAME,ADDRESS,TOWN NAME,COUNTRY NAME,TIME ZONE";

/// Directory holding checked-in test fixtures.
pub fn fixtures_dir() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

/// UTF-8 view of a temporary directory.
pub fn utf8_dir(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
        .unwrap_or_else(|path| panic!("temporary directory {path:?} is not UTF-8"))
}

/// Write a snapshot made of the header followed by `rows` into `dir`.
pub fn write_snapshot(dir: &Utf8Path, rows: &[&str]) -> Utf8PathBuf {
    let path = dir.join("snapshot.csv");
    let mut body = String::from(SNAPSHOT_HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    std::fs::write(&path, body)
        .unwrap_or_else(|err| panic!("failed to write snapshot {path}: {err}"));
    path
}
