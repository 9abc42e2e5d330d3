//! Per-run scratch directory.
//!
//! Every intermediate asset of a run (downloaded audio, generated images,
//! rendered segments) is created inside one [`WorkDir`]. The directory and
//! everything registered in it is removed when the `WorkDir` is dropped,
//! whether the run finished or bailed out with an error.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::SitcomResult;

/// Scoped scratch directory for one pipeline run.
#[derive(Debug)]
pub struct WorkDir {
    dir: TempDir,
}

impl WorkDir {
    /// Create a fresh scratch directory under `parent`, or under the system
    /// temp directory when `parent` is `None`.
    pub fn create(parent: Option<&Path>) -> SitcomResult<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("sitcom-run-");
        let dir = match parent {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };
        tracing::debug!(path = %dir.path().display(), "Created run work directory");
        Ok(Self { dir })
    }

    /// Directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Reserve a new, empty file inside the work directory.
    ///
    /// The file outlives this call and is removed together with the
    /// directory.
    pub fn scratch_file(&self, prefix: &str, suffix: &str) -> SitcomResult<PathBuf> {
        let file = tempfile::Builder::new()
            .prefix(prefix)
            .suffix(suffix)
            .tempfile_in(self.dir.path())?;
        let path = file.into_temp_path().keep().map_err(|e| e.error)?;
        Ok(path)
    }

    /// A not-yet-created path inside the work directory.
    pub fn child(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}
