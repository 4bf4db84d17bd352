//! Output destination policy.
//!
//! Exports land at a fixed filename inside an application-private directory
//! and overwrite the previous result on every run. The directory is created
//! on demand; stale-file removal failures are logged and do not fail the
//! export (the muxer truncates on open anyway).

use std::path::{Path, PathBuf};

use crate::export::engine::ExportError;

/// Fixed output filename, overwritten on each export.
pub const DEFAULT_FILENAME: &str = "output.mp4";

/// A managed output directory with a fixed result filename.
#[derive(Debug, Clone)]
pub struct OutputLocation {
    dir: PathBuf,
}

impl OutputLocation {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// The destination path exports write to.
    pub fn path(&self) -> PathBuf {
        self.dir.join(DEFAULT_FILENAME)
    }

    /// Create the directory and clear any previous result.
    pub fn prepare(&self) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path();
        remove_if_exists(&path);
        Ok(path)
    }
}

/// Remove a file if present, logging (not failing) on cleanup errors.
pub fn remove_if_exists(path: &Path) {
    if !path.exists() {
        return;
    }
    if let Err(err) = std::fs::remove_file(path) {
        log::warn!("could not remove existing file {:?}: {}", path, err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join("cliptrim-tests")
            .join(name)
            .join(format!("{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_path_uses_fixed_filename() {
        let location = OutputLocation::new("/tmp/clips");
        assert_eq!(location.path(), PathBuf::from("/tmp/clips/output.mp4"));
    }

    #[test]
    fn test_prepare_creates_directory() {
        let dir = temp_dir("prepare-creates");
        let location = OutputLocation::new(&dir);

        let path = location.prepare().unwrap();
        assert!(dir.is_dir());
        assert!(!path.exists());
    }

    #[test]
    fn test_prepare_removes_previous_result() {
        let dir = temp_dir("prepare-removes");
        let location = OutputLocation::new(&dir);

        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(location.path(), b"old export").unwrap();

        let path = location.prepare().unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_remove_if_exists_is_quiet_on_missing() {
        remove_if_exists(Path::new("/no/such/cliptrim/file.mp4"));
    }
}
