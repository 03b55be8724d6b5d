//! Stage dispatch.
//!
//! A [`Pipeline`] bundles the resolved configuration, the toolchain, and the
//! encoder capabilities probed at construction. It runs one stage on demand
//! (the watch coordinator's entry point) or all three at once (startup).

use crate::config::PipelineConfig;
use crate::images::run_images;
use crate::scripts::run_scripts;
use crate::styles::run_styles;
use crate::tooling::{Capabilities, Toolchain};
use crate::types::{Stage, StageError, StageReport};
use std::path::PathBuf;

pub struct Pipeline<T: Toolchain> {
    config: PipelineConfig,
    toolchain: T,
    capabilities: Capabilities,
}

impl<T: Toolchain> Pipeline<T> {
    /// Probe encoder availability once and keep it for the process lifetime.
    pub fn new(config: PipelineConfig, toolchain: T) -> Self {
        let capabilities = Capabilities::probe(&toolchain);
        Self::with_capabilities(config, toolchain, capabilities)
    }

    pub fn with_capabilities(
        config: PipelineConfig,
        toolchain: T,
        capabilities: Capabilities,
    ) -> Self {
        Self {
            config,
            toolchain,
            capabilities,
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Directory whose changes should re-run `stage`.
    pub fn source_root(&self, stage: Stage) -> PathBuf {
        match stage {
            Stage::Styles => self.config.styles_source(),
            Stage::Scripts => self.config.scripts_source(),
            Stage::Images => self.config.images_source(),
        }
    }

    pub fn run(&self, stage: Stage) -> Result<StageReport, StageError> {
        let config = &self.config;
        match stage {
            Stage::Styles => run_styles(
                &self.toolchain,
                &config.styles_source(),
                &config.style_out_dir,
                &config.style_out_file,
            ),
            Stage::Scripts => run_scripts(
                &self.toolchain,
                &config.scripts_source(),
                &config.script_out_dir,
            ),
            Stage::Images => run_images(
                &self.toolchain,
                &config.images_source(),
                self.capabilities,
                &config.images,
            ),
        }
    }

    /// Run styles, scripts, and images concurrently.
    ///
    /// Every stage runs to completion. Results come back in stage order, so a
    /// setup failure in one stage never hides the reports of the others.
    pub fn run_all(&self) -> Vec<Result<StageReport, StageError>> {
        let (styles, (scripts, images)) = rayon::join(
            || self.run(Stage::Styles),
            || rayon::join(|| self.run(Stage::Scripts), || self.run(Stage::Images)),
        );
        vec![styles, scripts, images]
    }
}
