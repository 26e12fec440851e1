//! Test helpers for composing catalog CLI workspaces.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use tempfile::TempDir;

/// Snapshot rows shared by CLI tests.
pub(super) const SNAPSHOT: &str = "\
COUNTRY ISO2 CODE,SWIFT CODE,CODE TYPE,NAME,ADDRESS,TOWN NAME,COUNTRY NAME,TIME ZONE
PL,ABCABCABXXX,BIC11,ABC BANK,Main Street,Warsaw,POLAND,Europe/Warsaw
PL,ABCABCABCAB,BIC11,ABC BANK,Side Street,Warsaw,POLAND,Europe/Warsaw
US,DEFDUS33XXX,BIC11,DEF BANK,Wall Street,New York,UNITED STATES,America/New_York
";

/// Temporary directory holding a catalog database and its inputs.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("catalog/swift_codes.db")
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.root.join(name);
        write_utf8(&path, contents.as_bytes());
        path
    }

    pub(super) fn snapshot(&self) -> Utf8PathBuf {
        self.write("SWIFT_CODES.csv", SNAPSHOT)
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    fs::write(path.as_std_path(), contents).expect("write test file");
}

/// Run `write` against an in-memory buffer and decode the output as JSON.
pub(super) fn capture_json<F, E>(write: F) -> Result<serde_json::Value, E>
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), E>,
{
    let mut buffer = Vec::new();
    write(&mut buffer)?;
    Ok(serde_json::from_slice(&buffer).expect("command output is JSON"))
}
