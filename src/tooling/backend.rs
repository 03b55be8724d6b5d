//! Toolchain trait and shared error type.
//!
//! The [`Toolchain`] trait is the narrow seam between stage runners and the
//! collaborators that actually transform bytes: the Sass compiler, the CSS and
//! script minifiers, and the external image encoders.
//!
//! The production implementation is
//! [`NativeToolchain`](super::native::NativeToolchain).

use super::params::EncodeJob;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Compile failed: {0}")]
    Compile(String),
    #[error("Minify failed: {0}")]
    Minify(String),
    #[error("Syntax error: {0}")]
    Syntax(String),
    #[error("{program} timed out after {}ms", .timeout.as_millis())]
    EncodeTimeout { program: String, timeout: Duration },
    #[error("{program} exited with {}", exit_label(.code))]
    EncodeProcess { program: String, code: Option<i32> },
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {code}"),
        None => "a signal".to_string(),
    }
}

/// Collaborators used by the stage runners.
///
/// `Sync` because stages fan work out over rayon's pool.
pub trait Toolchain: Sync {
    /// Compile a style sheet to CSS text.
    fn compile_style(&self, path: &Path) -> Result<String, ToolError>;

    /// Minify CSS text.
    fn minify_css(&self, css: &str) -> Result<String, ToolError>;

    /// Minify script source.
    fn minify_script(&self, source: &str) -> Result<String, ToolError>;

    /// Run one encoder process to completion, bounded by `job.timeout`.
    fn encode(&self, job: &EncodeJob) -> Result<(), ToolError>;

    /// Whether an external tool can be launched.
    fn exists(&self, tool: &str) -> bool;
}
