//! Filesystem helpers built on `cap-std` and `camino`.
//!
//! Every helper anchors the given path at the nearest ambient root (the
//! filesystem root for absolute paths, the working directory otherwise) and
//! performs the operation through a capability handle on that root.
#![forbid(unsafe_code)]

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io::{self, Write};

/// Open a UTF-8 file path for reading.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Read the whole file at `path` as UTF-8 text.
pub fn read_to_string(path: &Utf8Path) -> io::Result<String> {
    let (dir, name) = open_parent(path)?;
    dir.read_to_string(name.as_str())
}

/// Whether `path` exists and is a regular file.
pub fn is_file(path: &Utf8Path) -> io::Result<bool> {
    let (dir, name) = open_parent(path)?;
    dir.metadata(name.as_str()).map(|meta| meta.is_file())
}

/// Whether `path` exists and is a directory. A missing path is `Ok(false)`.
pub fn dir_exists(path: &Utf8Path) -> io::Result<bool> {
    let (base, relative) = anchor(path)?;
    if relative.as_str().is_empty() {
        return Ok(true);
    }
    match base.metadata(&relative) {
        Ok(meta) => Ok(meta.is_dir()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Create `path` and any missing ancestors.
pub fn create_dir_all(path: &Utf8Path) -> io::Result<()> {
    let (base, relative) = anchor(path)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base.create_dir_all(&relative)
}

/// Replace the file at `path` with `contents`.
///
/// The bytes are written to a hidden sibling first and renamed into place, so
/// readers never observe a half-written file.
pub fn write_atomically(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let (dir, name) = open_parent(path)?;
    let staging = format!(".{name}.partial");
    let mut file = dir.create(staging.as_str())?;
    file.write_all(contents)?;
    file.sync_all()?;
    dir.rename(staging.as_str(), &dir, name.as_str())
}

/// Open the directory containing `path` and return it with the file name.
fn open_parent(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("{path} does not name a file")))?
        .to_owned();
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

/// Split `path` into an ambient root directory and the remainder below it.
///
/// Drive prefixes and the root separator form the root; a relative path is
/// anchored at the working directory.
fn anchor(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let mut root = Utf8PathBuf::new();
    let mut relative = Utf8PathBuf::new();
    for component in path.components() {
        match component {
            Utf8Component::Prefix(_) | Utf8Component::RootDir if relative.as_str().is_empty() => {
                root.push(component);
            }
            Utf8Component::CurDir => {}
            other => relative.push(other),
        }
    }
    if root.as_str().is_empty() {
        root.push(".");
    }
    let dir = fs_utf8::Dir::open_ambient_dir(&root, ambient_authority())?;
    Ok((dir, relative))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn workspace() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        (dir, root)
    }

    #[rstest]
    fn creates_nested_directories(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let nested = root.join("public/maps/v1");
        assert!(!dir_exists(&nested).expect("inspect"));
        create_dir_all(&nested).expect("create");
        assert!(dir_exists(&nested).expect("inspect"));
        create_dir_all(&nested).expect("creating twice is fine");
    }

    #[rstest]
    fn atomic_writes_replace_existing_files(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let target = root.join("campus.geojson");
        write_atomically(&target, b"first").expect("write");
        write_atomically(&target, b"second").expect("overwrite");
        assert_eq!(read_to_string(&target).expect("read"), "second");
        assert!(is_file(&target).expect("inspect"));
        assert!(!is_file(&root.join(".campus.geojson.partial")).unwrap_or(false));
    }

    #[rstest]
    fn directories_are_not_files(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        create_dir_all(&root.join("out")).expect("create");
        assert!(!is_file(&root.join("out")).expect("inspect"));
    }

    #[rstest]
    fn missing_files_surface_not_found(workspace: (TempDir, Utf8PathBuf)) {
        let (_guard, root) = workspace;
        let err = open_utf8_file(&root.join("absent.json")).expect_err("missing");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
