//! Build configuration.
//!
//! Everything tunable comes from the environment and is read exactly once at
//! startup into a [`PipelineConfig`] that is handed to each stage. Stages
//! never read the environment themselves.
//!
//! ## Environment
//!
//! ```text
//! STYLEOUTDIR          = assets/css      # style output directory
//! SCRIPTSOUTDIR        = assets/js       # script output directory
//! IMAGESOUTDIR         = assets/images   # shared base: <base>/webp, <base>/avif
//! WEBPOUTDIR           =                 # overrides the WebP root
//! AVIFOUTDIR           =                 # overrides the AVIF root
//! STYLEOUTFILE         = styles.css      # aggregate bundle name
//! WEBP_TIMEOUT_MS      = 30000           # per-job encoder timeout
//! AVIF_TIMEOUT_MS      = 30000
//! ASSET_MAX_PROCESSES  =                 # worker cap (omit for CPU cores)
//! ```
//!
//! Relative output paths resolve against the project root. Source roots are
//! fixed and not configurable: `styles/`, `scripts/`, `assets/images/original/`.

use crate::images::ImageTargets;
use confique::Config;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const STYLES_DIR: &str = "styles";
pub const SCRIPTS_DIR: &str = "scripts";
pub const IMAGES_DIR: &str = "assets/images/original";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment error: {0}")]
    Env(#[from] confique::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Raw settings as they arrive from the environment.
#[derive(Config, Debug)]
pub struct EnvConfig {
    /// Style output directory.
    #[config(env = "STYLEOUTDIR", default = "assets/css")]
    pub style_out_dir: PathBuf,

    /// Script output directory.
    #[config(env = "SCRIPTSOUTDIR", default = "assets/js")]
    pub script_out_dir: PathBuf,

    /// Base directory for both image formats.
    #[config(env = "IMAGESOUTDIR", default = "assets/images")]
    pub image_out_dir: PathBuf,

    #[config(env = "WEBPOUTDIR")]
    pub webp_out_dir: Option<PathBuf>,

    #[config(env = "AVIFOUTDIR")]
    pub avif_out_dir: Option<PathBuf>,

    /// Filename of the aggregated squash bundle.
    #[config(env = "STYLEOUTFILE", default = "styles.css")]
    pub style_out_file: String,

    #[config(env = "WEBP_TIMEOUT_MS", default = 30000)]
    pub webp_timeout_ms: u64,

    #[config(env = "AVIF_TIMEOUT_MS", default = 30000)]
    pub avif_timeout_ms: u64,

    /// Maximum number of parallel workers. Clamped to the core count.
    #[config(env = "ASSET_MAX_PROCESSES")]
    pub max_processes: Option<usize>,
}

/// Fully resolved configuration for one process lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Project root; source roots and relative outputs hang off it.
    pub root: PathBuf,
    pub style_out_dir: PathBuf,
    pub script_out_dir: PathBuf,
    pub style_out_file: String,
    pub images: ImageTargets,
    pub max_processes: Option<usize>,
}

impl PipelineConfig {
    /// Read the environment and resolve against `root`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let env = EnvConfig::builder().env().load()?;
        Self::resolve(root, env)
    }

    /// Stock settings, as if no variable were set.
    pub fn defaults(root: &Path) -> Result<Self, ConfigError> {
        let env = EnvConfig::builder().load()?;
        Self::resolve(root, env)
    }

    pub fn resolve(root: &Path, env: EnvConfig) -> Result<Self, ConfigError> {
        if env.webp_timeout_ms == 0 || env.avif_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "encoder timeouts must be greater than zero".into(),
            ));
        }
        if env.style_out_file.is_empty() {
            return Err(ConfigError::Validation("STYLEOUTFILE must not be empty".into()));
        }
        if env.style_out_file.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "STYLEOUTFILE must be a file name, not a path".into(),
            ));
        }
        if env.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "ASSET_MAX_PROCESSES must be at least 1".into(),
            ));
        }

        let image_base = root.join(&env.image_out_dir);
        let webp_root = match &env.webp_out_dir {
            Some(dir) => root.join(dir),
            None => image_base.join("webp"),
        };
        let avif_root = match &env.avif_out_dir {
            Some(dir) => root.join(dir),
            None => image_base.join("avif"),
        };

        Ok(Self {
            root: root.to_path_buf(),
            style_out_dir: root.join(&env.style_out_dir),
            script_out_dir: root.join(&env.script_out_dir),
            style_out_file: env.style_out_file,
            images: ImageTargets {
                webp_root,
                avif_root,
                webp_timeout: Duration::from_millis(env.webp_timeout_ms),
                avif_timeout: Duration::from_millis(env.avif_timeout_ms),
            },
            max_processes: env.max_processes,
        })
    }

    pub fn styles_source(&self) -> PathBuf {
        self.root.join(STYLES_DIR)
    }

    pub fn scripts_source(&self) -> PathBuf {
        self.root.join(SCRIPTS_DIR)
    }

    pub fn images_source(&self) -> PathBuf {
        self.root.join(IMAGES_DIR)
    }
}

/// Resolve the effective thread count.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(max_processes: Option<usize>) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}
