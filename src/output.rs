//! CLI output formatting for stage runs.
//!
//! Per-file progress goes through the `log` facade as it happens; this module
//! renders the end-of-run summary. Each summary is a header line followed by
//! indented detail lines:
//!
//! ```text
//! Styles: 2 written, 1 failed
//!     assets/css/main.css
//!     assets/css/styles.css
//!     FAILED styles/broken.scss: Compile failed: Undefined variable.
//! ```
//!
//! Format functions are pure (return `Vec<String>`) for testability; the
//! `print_*` wrappers write to stdout.

use crate::tooling::{Capabilities, ImageFormat};
use crate::types::StageReport;
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display `path` relative to `root` when it lives underneath it.
fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// Summary of one stage run. Paths are shown relative to `root`.
pub fn format_stage_report(report: &StageReport, root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    let header = if report.failures.is_empty() {
        format!("{}: {} written", report.stage, report.written.len())
    } else {
        format!(
            "{}: {} written, {} failed",
            report.stage,
            report.written.len(),
            report.failures.len()
        )
    };
    lines.push(header);

    let mut written: Vec<String> = report
        .written
        .iter()
        .map(|p| display_path(p, root))
        .collect();
    written.sort();
    for path in written {
        lines.push(format!("{}{}", indent(1), path));
    }

    for failure in &report.failures {
        lines.push(format!(
            "{}FAILED {}: {}",
            indent(1),
            display_path(&failure.item, root),
            failure.error
        ));
    }

    lines
}

pub fn print_stage_report(report: &StageReport, root: &Path) {
    for line in format_stage_report(report, root) {
        println!("{}", line);
    }
}

/// One line naming the encoders found at startup.
pub fn format_capabilities(capabilities: Capabilities) -> String {
    let status = |format: ImageFormat| {
        let state = if capabilities.supports(format) {
            "found"
        } else {
            "missing"
        };
        format!("{} ({}) {}", format, format.encoder(), state)
    };
    format!(
        "Encoders: {}, {}",
        status(ImageFormat::WebP),
        status(ImageFormat::Avif)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ItemFailure, Stage};
    use std::path::PathBuf;

    #[test]
    fn clean_run_lists_written_files_sorted() {
        let report = StageReport {
            stage: Stage::Styles,
            written: vec![
                PathBuf::from("/site/assets/css/styles.css"),
                PathBuf::from("/site/assets/css/main.css"),
            ],
            failures: vec![],
        };

        let lines = format_stage_report(&report, Path::new("/site"));

        assert_eq!(
            lines,
            vec![
                "Styles: 2 written",
                "    assets/css/main.css",
                "    assets/css/styles.css",
            ]
        );
    }

    #[test]
    fn failures_are_counted_and_listed() {
        let report = StageReport {
            stage: Stage::Scripts,
            written: vec![PathBuf::from("/site/assets/js/util.js")],
            failures: vec![ItemFailure {
                item: PathBuf::from("/site/scripts/app.js"),
                error: "Syntax error: unexpected token".to_string(),
            }],
        };

        let lines = format_stage_report(&report, Path::new("/site"));

        assert_eq!(lines[0], "Scripts: 1 written, 1 failed");
        assert_eq!(
            lines[2],
            "    FAILED scripts/app.js: Syntax error: unexpected token"
        );
    }

    #[test]
    fn paths_outside_root_are_shown_in_full() {
        let report = StageReport {
            stage: Stage::Images,
            written: vec![PathBuf::from("/srv/webp/a.webp")],
            failures: vec![],
        };

        let lines = format_stage_report(&report, Path::new("/site"));

        assert_eq!(lines[1], "    /srv/webp/a.webp");
    }

    #[test]
    fn capabilities_line() {
        let line = format_capabilities(Capabilities {
            webp: true,
            avif: false,
        });
        assert_eq!(
            line,
            "Encoders: WebP (cwebp) found, AVIF (avifenc) missing"
        );
    }
}
