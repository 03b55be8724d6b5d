use assetforge::config::{self, PipelineConfig};
use assetforge::pipeline::Pipeline;
use assetforge::tooling::NativeToolchain;
use assetforge::{output, watch};
use clap::Parser;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Parser)]
#[command(name = "assetforge")]
#[command(version, about = "Build site assets: styles, scripts, and images")]
#[command(long_about = "\
Build site assets: styles, scripts, and images

Sources are read from fixed directories under the current directory:

  styles/                    Sass/CSS
  ├── _vars.scss             # Partial: include-only, never emitted
  ├── 01-reset.scss          # Squash: bundled into styles.css in name order
  └── main.scss              # Standalone: assets/css/main.css
  scripts/                   # Each file minified to assets/js/<same name>
  assets/images/original/    # Mirrored to assets/images/{webp,avif}/

Images need cwebp and/or avifenc on PATH; a missing encoder skips its format.

Environment:
  STYLEOUTDIR, SCRIPTSOUTDIR        output directories
  IMAGESOUTDIR                      shared image base (webp/, avif/ beneath)
  WEBPOUTDIR, AVIFOUTDIR            per-format image output overrides
  STYLEOUTFILE                      squash bundle name (default styles.css)
  WEBP_TIMEOUT_MS, AVIF_TIMEOUT_MS  per-image encoder timeout (default 30000)
  ASSET_MAX_PROCESSES               worker cap (default: CPU cores)")]
struct Cli {
    /// Keep running and rebuild a stage whenever its sources change
    #[arg(long)]
    watch: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let root = std::env::current_dir()?;
    let config = PipelineConfig::load(&root)?;
    init_thread_pool(config.max_processes);

    let pipeline = Pipeline::new(config, NativeToolchain::new());
    println!("{}", output::format_capabilities(pipeline.capabilities()));

    println!("==> Building assets");
    let mut setup_failure = None;
    for result in pipeline.run_all() {
        match result {
            Ok(report) => output::print_stage_report(&report, &root),
            Err(e) => {
                log::error!("{}", e);
                setup_failure.get_or_insert(e);
            }
        }
    }
    if let Some(e) = setup_failure {
        return Err(e.into());
    }

    if cli.watch {
        let running = Arc::new(AtomicBool::new(true));
        let handler_flag = Arc::clone(&running);
        ctrlc::set_handler(move || handler_flag.store(false, Ordering::SeqCst))?;

        println!("==> Watching for changes (Ctrl+C to stop)");
        watch::watch(&pipeline, &running, |report| {
            output::print_stage_report(report, &root)
        })?;
    }

    Ok(())
}

/// Initialize the rayon thread pool from `ASSET_MAX_PROCESSES`.
///
/// Capped at the number of available CPU cores; the user can constrain down, not up.
fn init_thread_pool(max_processes: Option<usize>) {
    let threads = config::effective_threads(max_processes);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
