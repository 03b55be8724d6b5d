//! Image stage: transcode every source image to WebP and/or AVIF.
//!
//! ## Output Structure
//!
//! The relative directory of each source is mirrored under every enabled
//! output root:
//!
//! ```text
//! assets/images/original/        assets/images/webp/      assets/images/avif/
//! ├── hero.png            →      ├── hero.webp            ├── hero.avif
//! └── travel/                    └── travel/              └── travel/
//!     └── rome.jpg        →          └── rome.webp            └── rome.avif
//! ```
//!
//! ## Parallel Processing
//!
//! Every file, and both encode jobs of a file, run on rayon's pool. Each job
//! has its own timeout; a failed or timed-out job is logged and recorded
//! without touching any other job.
//!
//! Formats whose encoder was not found at startup are skipped entirely, and
//! their output roots are left alone.

use crate::fsutil::{ensure_dir, list_all_files, reset_dir};
use crate::naming;
use crate::tooling::{Capabilities, EncodeJob, ImageFormat, Toolchain};
use crate::types::{ItemFailure, ItemResult, Stage, StageError, StageReport};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

const STAGE: Stage = Stage::Images;

/// Where each format is written and how long its encoder may run.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTargets {
    pub webp_root: PathBuf,
    pub avif_root: PathBuf,
    pub webp_timeout: Duration,
    pub avif_timeout: Duration,
}

impl ImageTargets {
    pub fn root(&self, format: ImageFormat) -> &Path {
        match format {
            ImageFormat::WebP => &self.webp_root,
            ImageFormat::Avif => &self.avif_root,
        }
    }

    pub fn timeout(&self, format: ImageFormat) -> Duration {
        match format {
            ImageFormat::WebP => self.webp_timeout,
            ImageFormat::Avif => self.avif_timeout,
        }
    }
}

/// Transcode the whole tree under `source_root`.
pub fn run_images(
    toolchain: &impl Toolchain,
    source_root: &Path,
    capabilities: Capabilities,
    targets: &ImageTargets,
) -> Result<StageReport, StageError> {
    ensure_dir(source_root).map_err(StageError::fs(STAGE))?;

    let formats = capabilities.formats();
    for format in &formats {
        reset_dir(targets.root(*format)).map_err(StageError::fs(STAGE))?;
    }

    let mut report = StageReport::new(STAGE);
    if formats.is_empty() {
        log::warn!(
            "Neither {} nor {} is installed; skipping image conversion",
            ImageFormat::WebP.encoder(),
            ImageFormat::Avif.encoder()
        );
        return Ok(report);
    }

    let files = list_all_files(source_root).map_err(StageError::fs(STAGE))?;
    let results: Vec<Vec<ItemResult>> = files
        .par_iter()
        .map(|relative| transcode(toolchain, source_root, relative, &formats, targets))
        .collect();

    for result in results.into_iter().flatten() {
        report.record(result);
    }
    Ok(report)
}

/// Encode one source file into every enabled format.
fn transcode(
    toolchain: &impl Toolchain,
    source_root: &Path,
    relative: &Path,
    formats: &[ImageFormat],
    targets: &ImageTargets,
) -> Vec<ItemResult> {
    let input = source_root.join(relative);
    log::info!("Processing image {}", input.display());

    formats
        .par_iter()
        .map(|format| {
            let job = plan_job(*format, &input, relative, targets)?;
            run_job(toolchain, &job)
        })
        .collect()
}

fn plan_job(
    format: ImageFormat,
    input: &Path,
    relative: &Path,
    targets: &ImageTargets,
) -> Result<EncodeJob, ItemFailure> {
    let out_dir = match relative.parent() {
        Some(parent) => targets.root(format).join(parent),
        None => targets.root(format).to_path_buf(),
    };
    ensure_dir(&out_dir).map_err(|e| ItemFailure::logged(input, e))?;

    let name = relative
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let output = out_dir.join(format!("{}.{}", naming::stem(&name), format.extension()));
    Ok(EncodeJob::new(format, input, &output, targets.timeout(format)))
}

fn run_job(toolchain: &impl Toolchain, job: &EncodeJob) -> ItemResult {
    match toolchain.encode(job) {
        Ok(()) => {
            log::info!("Wrote {}", job.output.display());
            Ok(job.output.clone())
        }
        Err(e) => Err(ItemFailure::logged(&job.input, format!("{}: {}", job.format, e))),
    }
}
