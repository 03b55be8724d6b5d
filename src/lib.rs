//! # Assetforge
//!
//! An asset pipeline for static sites: compiles Sass to minified CSS, minifies
//! scripts, and transcodes images to WebP and AVIF. With `--watch`, each
//! stage re-runs when its source directory changes.
//!
//! # Architecture: Three Independent Stages
//!
//! ```text
//! styles/                   →  assets/css/           (compile + minify, squash bundle)
//! scripts/                  →  assets/js/            (minify)
//! assets/images/original/   →  assets/images/webp/   (cwebp)
//!                           →  assets/images/avif/   (avifenc)
//! ```
//!
//! No stage reads another stage's output, so all three run concurrently. Each
//! stage owns its output directories and empties them before writing; there
//! is no caching, every run reprocesses everything.
//!
//! Within a stage every file is transformed in parallel. A failure on one
//! item is logged and recorded in the [`types::StageReport`]; it never stops
//! its siblings. Only setup failures (output directory cannot be created or
//! cleared) abort a stage.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`styles`] | Style stage: partials, squash bundle, standalone sheets |
//! | [`scripts`] | Script stage: one minified output per source |
//! | [`images`] | Image stage: mirrored tree, WebP/AVIF encode jobs with timeouts |
//! | [`pipeline`] | Runs one stage or all three; holds probed encoder capabilities |
//! | [`watch`] | Per-root change consumers that re-run stages |
//! | [`tooling`] | [`tooling::Toolchain`] seam: Sass, CSS/JS minifiers, encoder processes |
//! | [`fsutil`] | Ensure/clear output directories, enumerate sources |
//! | [`naming`] | Partial (`_x`) and squash (`NN-x`) filename conventions |
//! | [`config`] | Environment-derived settings, read once at startup |
//! | [`types`] | Stage identifiers, reports, and errors shared by all stages |
//! | [`output`] | CLI summary formatting |
//!
//! # Design Decisions
//!
//! ## Encoders Are Optional
//!
//! `cwebp` and `avifenc` are probed once at startup. A missing encoder
//! disables its format for the lifetime of the process; with neither present
//! the image stage only prepares its source directory and warns.
//!
//! ## Listing Order Is Bundle Order
//!
//! Style sources are listed sorted by filename, and squash files are
//! concatenated in that order. Zero-pad the numeric prefixes (`01-`, `02-`,
//! `10-`) to get the intended order.

pub mod config;
pub mod fsutil;
pub mod images;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod scripts;
pub mod styles;
pub mod tooling;
pub mod types;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;
