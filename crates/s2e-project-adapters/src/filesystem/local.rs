//! Local filesystem adapter using std::fs.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use s2e_project_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ProjectError, ProjectResult},
};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir(&self, path: &Path) -> ProjectResult<()> {
        fs::create_dir(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn create_dir_all(&self, path: &Path) -> ProjectResult<()> {
        fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ProjectResult<()> {
        fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> ProjectResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = fs::metadata(path).map_err(|e| map_io_error(path, e, "get metadata"))?;
            let mut perms = metadata.permissions();
            let mode = if executable {
                perms.mode() | 0o111
            } else {
                perms.mode() & !0o111
            };
            perms.set_mode(mode);
            fs::set_permissions(path, perms)
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(not(unix))]
        {
            let _ = (path, executable);
        }
        Ok(())
    }

    fn symlink(&self, original: &Path, link: &Path) -> ProjectResult<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(original, link)
                .map_err(|e| map_io_error(link, e, "create symlink"))
        }
        #[cfg(windows)]
        {
            std::os::windows::fs::symlink_dir(original, link)
                .map_err(|e| map_io_error(link, e, "create symlink"))
        }
        #[cfg(not(any(unix, windows)))]
        {
            let _ = original;
            Err(symlinks_unsupported(link))
        }
    }

    fn exists(&self, path: &Path) -> bool {
        // Dangling symlinks still occupy the path
        fs::symlink_metadata(path).is_ok()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_header(&self, path: &Path, len: usize) -> ProjectResult<Vec<u8>> {
        let file = fs::File::open(path).map_err(|e| map_io_error(path, e, "open file"))?;
        let mut header = Vec::with_capacity(len);
        file.take(len as u64)
            .read_to_end(&mut header)
            .map_err(|e| map_io_error(path, e, "read file"))?;
        Ok(header)
    }

    fn canonicalize(&self, path: &Path) -> ProjectResult<PathBuf> {
        fs::canonicalize(path).map_err(|e| map_io_error(path, e, "resolve path"))
    }

    fn remove_dir_all(&self, path: &Path) -> ProjectResult<()> {
        fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ProjectError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg_attr(any(unix, windows), allow(dead_code))]
fn symlinks_unsupported(link: &Path) -> ProjectError {
    map_io_error(
        link,
        io::Error::new(io::ErrorKind::Unsupported, "symbolic links are not supported"),
        "create symlink",
    )
}

#[cfg(test)]
mod portable_tests {
    use super::*;

    #[test]
    fn missing_symlink_support_is_a_filesystem_error() {
        let err = symlinks_unsupported(Path::new("/env/projects/CADET_00001/recipes"));
        assert!(matches!(
            err,
            ProjectError::Application(ApplicationError::FilesystemError { ref path, .. })
                if path == Path::new("/env/projects/CADET_00001/recipes")
        ));
        assert!(err.to_string().contains("not supported"));
    }
}
