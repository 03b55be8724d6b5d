//! Style stage: Sass sources to minified CSS.
//!
//! ```text
//! styles/                      assets/css/
//! ├── _vars.scss        →      (nothing, partial)
//! ├── 01-reset.scss     ─┐
//! ├── 02-layout.scss    ─┴→    styles.css   (aggregate, listing order)
//! └── main.scss         →      main.css
//! ```
//!
//! Squash files are concatenated unminified, newline-joined, then the whole
//! bundle is minified once. The aggregate is written on every run, even when
//! no squash file compiled.
//!
//! Files compile in parallel. A compile failure skips that file only; the
//! aggregate and every sibling still complete.

use crate::fsutil::{ensure_dir, list_top_level_files, reset_dir};
use crate::naming::{self, StyleKind};
use crate::tooling::Toolchain;
use crate::types::{ItemFailure, ItemResult, Stage, StageError, StageReport, write_output};
use rayon::prelude::*;
use std::path::Path;

const STAGE: Stage = Stage::Styles;

enum Compiled {
    Standalone(ItemResult),
    Squash(Result<String, ItemFailure>),
}

/// Compile every style in `source_dir` into `out_dir`.
pub fn run_styles(
    toolchain: &impl Toolchain,
    source_dir: &Path,
    out_dir: &Path,
    aggregate_name: &str,
) -> Result<StageReport, StageError> {
    ensure_dir(source_dir).map_err(StageError::fs(STAGE))?;
    reset_dir(out_dir).map_err(StageError::fs(STAGE))?;
    let names = list_top_level_files(source_dir).map_err(StageError::fs(STAGE))?;

    let inputs: Vec<(String, StyleKind)> = names
        .into_iter()
        .map(|name| {
            let kind = naming::classify_style(&name);
            (name, kind)
        })
        .filter(|(_, kind)| *kind != StyleKind::Partial)
        .collect();

    let compiled: Vec<Compiled> = inputs
        .par_iter()
        .map(|(name, kind)| {
            let source = source_dir.join(name);
            log::info!("Processing style {}", source.display());
            match kind {
                StyleKind::Squash => Compiled::Squash(
                    toolchain
                        .compile_style(&source)
                        .map_err(|e| ItemFailure::logged(&source, e)),
                ),
                _ => Compiled::Standalone(compile_standalone(toolchain, &source, name, out_dir)),
            }
        })
        .collect();

    let mut report = StageReport::new(STAGE);
    let mut bundle = Vec::new();
    for item in compiled {
        match item {
            Compiled::Standalone(result) => report.record(result),
            Compiled::Squash(Ok(css)) => bundle.push(css),
            Compiled::Squash(Err(failure)) => report.failures.push(failure),
        }
    }

    let aggregate_path = out_dir.join(aggregate_name);
    let joined = bundle.join("\n");
    let minified = match toolchain.minify_css(&joined) {
        Ok(css) => css,
        Err(e) => {
            // Ship the bundle unminified rather than dropping it.
            report.failures.push(ItemFailure::logged(&aggregate_path, e));
            joined
        }
    };
    report.record(write_output(&aggregate_path, &minified));

    Ok(report)
}

fn compile_standalone(
    toolchain: &impl Toolchain,
    source: &Path,
    name: &str,
    out_dir: &Path,
) -> ItemResult {
    let css = toolchain
        .compile_style(source)
        .and_then(|css| toolchain.minify_css(&css))
        .map_err(|e| ItemFailure::logged(source, e))?;
    let output = out_dir.join(format!("{}.css", naming::stem(name)));
    write_output(&output, &css)
}
