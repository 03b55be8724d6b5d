//! Directory materialization for stage outputs and source enumeration.
//!
//! Every stage owns its output directories outright: before writing, it calls
//! [`ensure_dir`] then [`clear_dir`], so outputs of sources that were removed
//! or renamed since the last run never survive.
//!
//! Source discovery comes in two shapes:
//!
//! - [`list_top_level_files`]: styles and scripts, non-recursive, sorted by name
//! - [`list_all_files`]: images, the whole subtree, paths relative to the root

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum FsError {
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FsError {
    fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            FsError::NotFound(path.to_path_buf())
        } else {
            FsError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Create `path` and any missing ancestors. Existing directories are fine.
pub fn ensure_dir(path: &Path) -> Result<(), FsError> {
    fs::create_dir_all(path).map_err(|e| FsError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Delete every direct child of `path`, keeping `path` itself.
///
/// Children that disappear while we work are not an error.
pub fn clear_dir(path: &Path) -> Result<(), FsError> {
    let entries = fs::read_dir(path).map_err(|e| FsError::io(path, e))?;

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => return Err(FsError::io(path, e)),
        };
        let child = entry.path();
        // file_type() does not follow symlinks, so a link to a directory is
        // unlinked rather than emptied.
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let removed = if is_dir {
            fs::remove_dir_all(&child)
        } else {
            fs::remove_file(&child)
        };
        match removed {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(FsError::Io {
                    path: child,
                    source: e,
                });
            }
        }
    }
    Ok(())
}

/// Ensure `path` exists and is empty.
pub fn reset_dir(path: &Path) -> Result<(), FsError> {
    ensure_dir(path)?;
    clear_dir(path)
}

/// Every regular file under `root`, as paths relative to `root`.
///
/// Each file appears exactly once. Entries are sorted by name within each
/// directory so runs are reproducible, but callers must not rely on order.
pub fn list_all_files(root: &Path) -> Result<Vec<PathBuf>, FsError> {
    if !root.is_dir() {
        return Err(FsError::NotFound(root.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            FsError::io(&path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    Ok(files)
}

/// Names of the regular files directly inside `dir`, sorted.
///
/// Sorting is what gives squash-prefixed styles their numeric order.
pub fn list_top_level_files(dir: &Path) -> Result<Vec<String>, FsError> {
    let entries = fs::read_dir(dir).map_err(|e| FsError::io(dir, e))?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FsError::io(dir, e))?;
        if entry.path().is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
