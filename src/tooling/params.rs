//! Encode job descriptions.
//!
//! These structs describe *what* an encoder should do. The
//! [`Toolchain`](super::Toolchain) decides *how* (spawning the real process or
//! recording the call in tests).
//!
//! ## Argument policy
//!
//! | Format | JPEG source | Anything else |
//! |---|---|---|
//! | WebP (`cwebp`) | `-mt -q 60` | `-mt -near_lossless 55` |
//! | AVIF (`avifenc`) | `cq-level=28 -q 40 --yuv 420` | `cq-level=30 -q 45 --yuv 444` |
//!
//! AVIF always carries the baseline `--speed 6 --jobs all --depth 8
//! --cicp 1/13/6 --codec aom`.

use crate::naming;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Output formats of the image stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    WebP,
    Avif,
}

impl ImageFormat {
    pub const ALL: [ImageFormat; 2] = [ImageFormat::WebP, ImageFormat::Avif];

    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::WebP => "webp",
            ImageFormat::Avif => "avif",
        }
    }

    /// Name of the external encoder binary.
    pub fn encoder(self) -> &'static str {
        match self {
            ImageFormat::WebP => "cwebp",
            ImageFormat::Avif => "avifenc",
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageFormat::WebP => write!(f, "WebP"),
            ImageFormat::Avif => write!(f, "AVIF"),
        }
    }
}

/// One encoder invocation: a single source image to a single output file.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodeJob {
    pub format: ImageFormat,
    pub input: PathBuf,
    pub output: PathBuf,
    pub timeout: Duration,
    /// Format-specific quality settings, without input/output paths.
    pub settings: Vec<String>,
}

impl EncodeJob {
    pub fn new(format: ImageFormat, input: &Path, output: &Path, timeout: Duration) -> Self {
        let jpeg = input
            .file_name()
            .map(|n| naming::is_jpeg(&n.to_string_lossy()))
            .unwrap_or(false);
        let settings = match format {
            ImageFormat::WebP => webp_settings(jpeg),
            ImageFormat::Avif => avif_settings(jpeg),
        };
        Self {
            format,
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            timeout,
            settings,
        }
    }

    pub fn program(&self) -> &'static str {
        self.format.encoder()
    }

    /// Full argument list, paths included.
    pub fn args(&self) -> Vec<String> {
        let mut args = self.settings.clone();
        let input = self.input.to_string_lossy().into_owned();
        let output = self.output.to_string_lossy().into_owned();
        match self.format {
            ImageFormat::WebP => args.extend([input, "-o".to_string(), output]),
            ImageFormat::Avif => args.extend([input, output]),
        }
        args
    }
}

fn webp_settings(jpeg: bool) -> Vec<String> {
    let quality: &[&str] = if jpeg {
        &["-q", "60"]
    } else {
        &["-near_lossless", "55"]
    };
    std::iter::once("-mt")
        .chain(quality.iter().copied())
        .map(String::from)
        .collect()
}

fn avif_settings(jpeg: bool) -> Vec<String> {
    let (cq_level, quality, yuv) = if jpeg { (28, 40, "420") } else { (30, 45, "444") };
    let mut settings: Vec<String> = [
        "--speed", "6", "--jobs", "all", "--depth", "8", "--cicp", "1/13/6", "--codec", "aom",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    settings.extend([
        "-a".to_string(),
        format!("cq-level={cq_level}"),
        "-q".to_string(),
        quality.to_string(),
        "--yuv".to_string(),
        yuv.to_string(),
    ]);
    settings
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(30);

    #[test]
    fn webp_jpeg_is_lossy_q60() {
        let job = EncodeJob::new(
            ImageFormat::WebP,
            Path::new("in/photo.JPG"),
            Path::new("out/photo.webp"),
            TIMEOUT,
        );
        assert_eq!(job.settings, vec!["-mt", "-q", "60"]);
        assert_eq!(
            job.args(),
            vec!["-mt", "-q", "60", "in/photo.JPG", "-o", "out/photo.webp"]
        );
        assert_eq!(job.program(), "cwebp");
    }

    #[test]
    fn webp_png_is_near_lossless_55() {
        let job = EncodeJob::new(
            ImageFormat::WebP,
            Path::new("logo.png"),
            Path::new("logo.webp"),
            TIMEOUT,
        );
        assert_eq!(job.settings, vec!["-mt", "-near_lossless", "55"]);
    }

    #[test]
    fn avif_jpeg_uses_cq28_and_420() {
        let job = EncodeJob::new(
            ImageFormat::Avif,
            Path::new("a.jpeg"),
            Path::new("a.avif"),
            TIMEOUT,
        );
        let args = job.args();
        assert_eq!(job.program(), "avifenc");
        assert!(args.windows(2).any(|w| w == ["-a", "cq-level=28"]));
        assert!(args.windows(2).any(|w| w == ["-q", "40"]));
        assert!(args.windows(2).any(|w| w == ["--yuv", "420"]));
        assert_eq!(&args[args.len() - 2..], ["a.jpeg", "a.avif"]);
    }

    #[test]
    fn avif_png_uses_cq30_and_444() {
        let job = EncodeJob::new(
            ImageFormat::Avif,
            Path::new("a.png"),
            Path::new("a.avif"),
            TIMEOUT,
        );
        assert!(job.settings.windows(2).any(|w| w == ["-a", "cq-level=30"]));
        assert!(job.settings.windows(2).any(|w| w == ["-q", "45"]));
        assert!(job.settings.windows(2).any(|w| w == ["--yuv", "444"]));
    }

    #[test]
    fn avif_baseline_is_shared() {
        let jpeg = EncodeJob::new(ImageFormat::Avif, Path::new("a.jpg"), Path::new("a.avif"), TIMEOUT);
        let png = EncodeJob::new(ImageFormat::Avif, Path::new("a.png"), Path::new("a.avif"), TIMEOUT);
        assert_eq!(jpeg.settings[..10], png.settings[..10]);
        assert_eq!(
            jpeg.settings[..10],
            ["--speed", "6", "--jobs", "all", "--depth", "8", "--cicp", "1/13/6", "--codec", "aom"]
        );
    }
}
