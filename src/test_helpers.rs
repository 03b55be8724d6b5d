//! Shared test utilities.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_tree(&tmp.path().join("styles"), &[
//!     ("_vars.scss", "$c: red;"),
//!     ("partials/nav.scss", "nav {}"),
//! ]);
//! assert_eq!(file_names(&tmp.path().join("styles")), vec!["_vars.scss", "partials"]);
//! ```

use std::fs;
use std::path::Path;

/// Write each `(relative path, content)` pair under `root`, creating
/// directories as needed.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    fs::create_dir_all(root).unwrap();
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
    }
}

/// Sorted names of the direct children of `dir` (files and directories).
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
