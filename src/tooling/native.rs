//! Production toolchain.
//!
//! | Operation | Implementation |
//! |---|---|
//! | **Compile style** | `grass::from_path` |
//! | **Minify CSS** | lightningcss parse → minify → print (`minify: true`) |
//! | **Minify script** | oxc parse (script or module) → compress → mangle locals → print |
//! | **Encode** | spawn `cwebp` / `avifenc`, bounded wait, kill on timeout |
//! | **Exists** | spawn the bare tool name; success means it is on `PATH` |

use super::backend::{ToolError, Toolchain};
use super::params::EncodeJob;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{CompressOptions, MangleOptions, Minifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

#[derive(Debug, Default, Clone, Copy)]
pub struct NativeToolchain;

impl NativeToolchain {
    pub fn new() -> Self {
        Self
    }
}

impl Toolchain for NativeToolchain {
    fn compile_style(&self, path: &Path) -> Result<String, ToolError> {
        grass::from_path(path, &grass::Options::default())
            .map_err(|e| ToolError::Compile(e.to_string()))
    }

    fn minify_css(&self, css: &str) -> Result<String, ToolError> {
        let mut sheet = StyleSheet::parse(css, ParserOptions::default())
            .map_err(|e| ToolError::Minify(e.to_string()))?;
        sheet
            .minify(MinifyOptions::default())
            .map_err(|e| ToolError::Minify(e.to_string()))?;
        let printed = sheet
            .to_css(PrinterOptions {
                minify: true,
                ..PrinterOptions::default()
            })
            .map_err(|e| ToolError::Minify(e.to_string()))?;
        Ok(printed.code)
    }

    fn minify_script(&self, source: &str) -> Result<String, ToolError> {
        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, source, SourceType::unambiguous()).parse();
        if let Some(error) = parsed.errors.first() {
            return Err(ToolError::Syntax(error.to_string()));
        }
        if parsed.panicked {
            return Err(ToolError::Syntax("unrecoverable parse error".to_string()));
        }

        // Top-level names may be read by other scripts on the page, so they
        // are neither dropped nor renamed.
        let mut program = parsed.program;
        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::safest()),
        };
        let minified = Minifier::new(options).minify(&allocator, &mut program);

        let printed = Codegen::new()
            .with_options(CodegenOptions::minify())
            .with_scoping(minified.scoping)
            .with_private_member_mappings(minified.class_private_mappings)
            .build(&program);
        Ok(printed.code)
    }

    fn encode(&self, job: &EncodeJob) -> Result<(), ToolError> {
        run_process(job.program(), &job.args(), job.timeout)
    }

    fn exists(&self, tool: &str) -> bool {
        match quiet(Command::new(tool)).spawn() {
            Ok(mut child) => {
                let _ = child.kill();
                let _ = child.wait();
                true
            }
            Err(_) => false,
        }
    }
}

fn quiet(mut command: Command) -> Command {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    command
}

/// Spawn `program` and wait at most `timeout` for it to exit successfully.
///
/// On timeout the child is killed and reaped before the error is returned.
pub fn run_process(program: &str, args: &[String], timeout: Duration) -> Result<(), ToolError> {
    let mut command = Command::new(program);
    command.args(args);
    let mut child = quiet(command).spawn()?;

    match child.wait_timeout(timeout)? {
        Some(status) if status.success() => Ok(()),
        Some(status) => Err(ToolError::EncodeProcess {
            program: program.to_string(),
            code: status.code(),
        }),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(ToolError::EncodeTimeout {
                program: program.to_string(),
                timeout,
            })
        }
    }
}
