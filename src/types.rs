//! Shared types used across all pipeline stages.

use crate::fsutil::FsError;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// One of the three independent asset classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Styles,
    Scripts,
    Images,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Styles, Stage::Scripts, Stage::Images];

    pub fn label(self) -> &'static str {
        match self {
            Stage::Styles => "Styles",
            Stage::Scripts => "Scripts",
            Stage::Images => "Images",
        }
    }

    /// Images live in nested directories; styles and scripts are flat.
    pub fn is_recursive(self) -> bool {
        matches!(self, Stage::Images)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Setup failure that aborts a whole stage invocation.
///
/// Per-item failures never surface here; they land in
/// [`StageReport::failures`].
#[derive(Error, Debug)]
pub enum StageError {
    #[error("{stage} stage failed: {source}")]
    Fs {
        stage: Stage,
        #[source]
        source: FsError,
    },
}

impl StageError {
    pub fn fs(stage: Stage) -> impl FnOnce(FsError) -> StageError {
        move |source| StageError::Fs { stage, source }
    }
}

/// One item that was skipped because its transform failed.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFailure {
    /// Source path of the item that was skipped.
    pub item: PathBuf,
    pub error: String,
}

impl ItemFailure {
    /// Build a failure for `item` and log it. Failures are terminal for the
    /// item only; the caller carries on with its siblings.
    pub fn logged(item: &Path, error: impl Display) -> Self {
        log::error!("Failed {}: {}", item.display(), error);
        Self {
            item: item.to_path_buf(),
            error: error.to_string(),
        }
    }
}

/// Write `contents` to `path`, logging the result.
pub(crate) fn write_output(path: &Path, contents: &str) -> ItemResult {
    match std::fs::write(path, contents) {
        Ok(()) => {
            log::info!("Wrote {}", path.display());
            Ok(path.to_path_buf())
        }
        Err(e) => Err(ItemFailure::logged(path, e)),
    }
}

/// Outcome of one completed stage invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Succeeded,
    FailedPartial { failed: usize },
}

/// What a stage run wrote and what it had to skip.
///
/// Outputs are never rolled back: after a partial failure the output
/// directory holds exactly the `written` files.
#[derive(Debug, Clone, PartialEq)]
pub struct StageReport {
    pub stage: Stage,
    pub written: Vec<PathBuf>,
    pub failures: Vec<ItemFailure>,
}

impl StageReport {
    pub fn new(stage: Stage) -> Self {
        Self {
            stage,
            written: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn outcome(&self) -> StageOutcome {
        if self.failures.is_empty() {
            StageOutcome::Succeeded
        } else {
            StageOutcome::FailedPartial {
                failed: self.failures.len(),
            }
        }
    }

    pub(crate) fn record(&mut self, item: ItemResult) {
        match item {
            Ok(path) => self.written.push(path),
            Err(failure) => self.failures.push(failure),
        }
    }
}

/// Result of transforming a single item: the written output, or why not.
pub(crate) type ItemResult = Result<PathBuf, ItemFailure>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_succeeds() {
        assert_eq!(
            StageReport::new(Stage::Styles).outcome(),
            StageOutcome::Succeeded
        );
    }

    #[test]
    fn failures_make_outcome_partial() {
        let mut report = StageReport::new(Stage::Scripts);
        report.record(Ok(PathBuf::from("assets/js/util.js")));
        report.record(Err(ItemFailure {
            item: PathBuf::from("scripts/app.js"),
            error: "Syntax error: unexpected token".to_string(),
        }));

        assert_eq!(report.written.len(), 1);
        assert_eq!(report.outcome(), StageOutcome::FailedPartial { failed: 1 });
    }

    #[test]
    fn only_images_are_recursive() {
        assert!(Stage::Images.is_recursive());
        assert!(!Stage::Styles.is_recursive());
        assert!(!Stage::Scripts.is_recursive());
    }

    #[test]
    fn stage_error_names_the_stage() {
        let err = StageError::fs(Stage::Images)(FsError::NotFound(PathBuf::from("gone")));
        assert_eq!(
            err.to_string(),
            "Images stage failed: Directory not found: gone"
        );
    }
}
