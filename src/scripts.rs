//! Script stage: every top-level file in the source directory is minified to
//! the same filename in the output directory.
//!
//! A syntax error or I/O failure in one script is logged and that script is
//! skipped; its siblings are unaffected.

use crate::fsutil::{ensure_dir, list_top_level_files, reset_dir};
use crate::tooling::Toolchain;
use crate::types::{ItemFailure, ItemResult, Stage, StageError, StageReport, write_output};
use rayon::prelude::*;
use std::path::Path;

const STAGE: Stage = Stage::Scripts;

pub fn run_scripts(
    toolchain: &impl Toolchain,
    source_dir: &Path,
    out_dir: &Path,
) -> Result<StageReport, StageError> {
    ensure_dir(source_dir).map_err(StageError::fs(STAGE))?;
    reset_dir(out_dir).map_err(StageError::fs(STAGE))?;
    let names = list_top_level_files(source_dir).map_err(StageError::fs(STAGE))?;

    let results: Vec<ItemResult> = names
        .par_iter()
        .map(|name| minify_one(toolchain, &source_dir.join(name), &out_dir.join(name)))
        .collect();

    let mut report = StageReport::new(STAGE);
    for result in results {
        report.record(result);
    }
    Ok(report)
}

fn minify_one(toolchain: &impl Toolchain, source: &Path, output: &Path) -> ItemResult {
    log::info!("Processing script {}", source.display());
    let code = std::fs::read_to_string(source).map_err(|e| ItemFailure::logged(source, e))?;
    let minified = toolchain
        .minify_script(&code)
        .map_err(|e| ItemFailure::logged(source, e))?;
    write_output(output, &minified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{file_names, write_tree};
    use crate::tooling::backend::tests::MockToolchain;
    use crate::types::StageOutcome;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn syntax_error_skips_only_that_script() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("scripts");
        let out = tmp.path().join("assets/js");
        write_tree(
            &source,
            &[
                ("app.js", "let x = ; // syntax error"),
                ("util.js", "export const add = (a, b) =>\n    a + b;"),
            ],
        );

        let report = run_scripts(&MockToolchain::new(), &source, &out).unwrap();

        assert_eq!(file_names(&out), vec!["util.js"]);
        assert_eq!(
            fs::read_to_string(out.join("util.js")).unwrap(),
            "export const add = (a, b) => a + b;"
        );
        assert_eq!(report.outcome(), StageOutcome::FailedPartial { failed: 1 });
        assert!(report.failures[0].item.ends_with("app.js"));
        assert!(report.failures[0].error.contains("Syntax error"));
    }

    #[test]
    fn output_keeps_the_source_filename() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("scripts");
        let out = tmp.path().join("out");
        write_tree(&source, &[("menu.mjs", "a"), ("vendor.min.js", "b")]);

        run_scripts(&MockToolchain::new(), &source, &out).unwrap();

        assert_eq!(file_names(&out), vec!["menu.mjs", "vendor.min.js"]);
    }

    #[test]
    fn subdirectories_are_not_descended() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("scripts");
        let out = tmp.path().join("out");
        write_tree(&source, &[("main.js", "a"), ("lib/inner.js", "b")]);

        let report = run_scripts(&MockToolchain::new(), &source, &out).unwrap();

        assert_eq!(file_names(&out), vec!["main.js"]);
        assert_eq!(report.written.len(), 1);
    }

    #[test]
    fn previous_outputs_are_removed() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("scripts");
        let out = tmp.path().join("out");
        write_tree(&source, &[("keep.js", "a")]);
        write_tree(&out, &[("deleted.js", "old")]);

        run_scripts(&MockToolchain::new(), &source, &out).unwrap();

        assert_eq!(file_names(&out), vec!["keep.js"]);
    }

    #[test]
    fn out_dir_that_is_a_file_fails_the_stage() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("scripts");
        let out = tmp.path().join("out");
        fs::write(&out, "not a directory").unwrap();

        let result = run_scripts(&MockToolchain::new(), &source, &out);

        assert!(matches!(result, Err(StageError::Fs { stage: Stage::Scripts, .. })));
    }
}
