//! Directory creation and non-clobbering file writes

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Permissions for directories created by the scaffolder (rwxrwxr-x)
pub const DIR_MODE: u32 = 0o775;

/// Create `path` and any missing parents.
///
/// Returns every directory that was actually created, outermost first. An
/// existing directory is not an error and yields an empty list.
pub fn ensure_directory(path: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    let missing: Vec<PathBuf> = path
        .ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && !p.exists())
        .map(Path::to_path_buf)
        .collect();

    if missing.is_empty() {
        return Ok(missing);
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
        .create(path)
        .map_err(|e| Error::file_io(path, e))?;

    let created: Vec<PathBuf> = missing.into_iter().rev().collect();
    for dir in &created {
        log::info!("Created directory: {}", dir.display());
    }
    Ok(created)
}

/// Write a file that must not exist yet.
///
/// An existing file is left untouched and reported as
/// [`Error::FileAlreadyExists`].
pub fn write_new_file(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    let mut file = match fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
    {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(Error::FileAlreadyExists(path.to_path_buf()));
        }
        Err(e) => return Err(Error::file_io(path, e)),
    };
    file.write_all(content.as_bytes())
        .map_err(|e| Error::file_io(path, e))?;
    log::info!("Created file: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_ensure_directory_reports_each_created_dir() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("a").join("b").join("c");

        let created = ensure_directory(&target).unwrap();
        assert_eq!(
            created,
            vec![
                temp.path().join("a"),
                temp.path().join("a/b"),
                temp.path().join("a/b/c"),
            ]
        );
        assert!(target.is_dir());
    }

    #[test]
    fn test_ensure_directory_is_idempotent() {
        let temp = tempdir().unwrap();
        let target = temp.path().join("Block").join("Widget");

        assert_eq!(ensure_directory(&target).unwrap().len(), 2);
        assert!(ensure_directory(&target).unwrap().is_empty());
        assert!(ensure_directory(temp.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_ensure_directory_mode() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let target = temp.path().join("moded");
        ensure_directory(&target).unwrap();
        let mode = fs::metadata(&target).unwrap().permissions().mode() & 0o777;
        // The process umask may only remove bits.
        assert_eq!(mode & !DIR_MODE, 0);
        assert_ne!(mode & 0o700, 0);
    }

    #[test]
    fn test_write_new_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("Block.php");

        write_new_file(&path, "<?php\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<?php\n");
    }

    #[test]
    fn test_write_new_file_never_clobbers() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("Block.php");
        fs::write(&path, "original").unwrap();

        match write_new_file(&path, "replacement") {
            Err(Error::FileAlreadyExists(p)) => assert_eq!(p, path),
            other => panic!("expected FileAlreadyExists, got {other:?}"),
        }
        assert_eq!(fs::read(&path).unwrap(), b"original");
    }

    #[test]
    fn test_write_new_file_missing_parent() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("missing").join("file.txt");
        assert!(matches!(
            write_new_file(&path, "x"),
            Err(Error::FileIo { .. })
        ));
    }
}
