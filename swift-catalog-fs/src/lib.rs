//! Capability-scoped filesystem helpers shared by the catalog crates.
//!
//! Paths are `camino` UTF-8 paths. Every helper anchors the path at its root
//! (or the working directory for relative paths) and performs the operation
//! through a `cap-std` directory handle opened with ambient authority.
#![forbid(unsafe_code)]

use std::io::{self, Read};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};

/// Open a UTF-8 file path for reading.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read a whole UTF-8 text file into memory.
pub fn read_utf8_file(path: &Utf8Path) -> io::Result<String> {
    let mut contents = String::new();
    open_utf8_file(path)?.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Create the parent directory of `path`, and any missing ancestors.
///
/// Paths without a parent, or whose parent is the filesystem root, need no
/// work and succeed immediately.
pub fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    let (anchor, relative) = split_anchor(parent);
    if relative.as_str().is_empty() {
        return Ok(());
    }
    fs_utf8::Dir::open_ambient_dir(&anchor, ambient_authority())?.create_dir_all(&relative)
}

/// Return whether `path` names an existing regular file.
///
/// A missing file is reported as an error so callers can distinguish it from
/// a directory or other non-file entry.
pub fn file_is_file(path: &Utf8Path) -> io::Result<bool> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.metadata(name).map(|metadata| metadata.is_file())
}

/// Split `path` into the directory it is anchored at and the remainder.
///
/// Absolute paths are anchored at their root (including any Windows drive
/// prefix); relative paths at the working directory.
fn split_anchor(path: &Utf8Path) -> (Utf8PathBuf, Utf8PathBuf) {
    let mut anchor = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir => anchor.push(component.as_str()),
            other => relative.push(other.as_str()),
        }
    }
    if anchor.as_str().is_empty() {
        anchor.push(".");
    }
    (anchor, relative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
    }

    #[rstest]
    #[case("/var/lib/catalog.db", "/", "var/lib/catalog.db")]
    #[case("data/catalog.db", ".", "data/catalog.db")]
    #[case("catalog.db", ".", "catalog.db")]
    fn anchors_paths(#[case] path: &str, #[case] anchor: &str, #[case] relative: &str) {
        let (actual_anchor, actual_relative) = split_anchor(Utf8Path::new(path));
        assert_eq!(actual_anchor, Utf8PathBuf::from(anchor));
        assert_eq!(actual_relative, Utf8PathBuf::from(relative));
    }

    #[rstest]
    fn creates_missing_ancestors(temp_dir: TempDir) {
        let target = utf8(&temp_dir).join("a/b/catalog.db");
        ensure_parent_dir(&target).expect("create parents");
        assert!(target.parent().expect("parent").is_dir());
    }

    #[rstest]
    fn distinguishes_files_from_directories(temp_dir: TempDir) {
        let root = utf8(&temp_dir);
        let file = root.join("snapshot.csv");
        std::fs::write(&file, "header\n").expect("write file");
        assert!(file_is_file(&file).expect("inspect file"));
        std::fs::create_dir(root.join("nested")).expect("create dir");
        assert!(!file_is_file(&root.join("nested")).expect("inspect dir"));
        assert!(file_is_file(&root.join("missing.csv")).is_err());
    }

    #[rstest]
    fn reads_text_files(temp_dir: TempDir) {
        let file = utf8(&temp_dir).join("request.json");
        std::fs::write(&file, "{}").expect("write file");
        assert_eq!(read_utf8_file(&file).expect("read file"), "{}");
    }
}
