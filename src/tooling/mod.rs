//! External tooling adapter.
//!
//! - **Backend**: [`Toolchain`] trait + [`ToolError`]
//! - **Native**: [`NativeToolchain`], the production collaborators
//! - **Parameters**: [`EncodeJob`] and the per-format argument policy
//!
//! Encoder availability is probed once at startup into [`Capabilities`] and
//! reused for every image stage run, watch-triggered ones included.

pub mod backend;
pub mod native;
mod params;

pub use backend::{ToolError, Toolchain};
pub use native::NativeToolchain;
pub use params::{EncodeJob, ImageFormat};

/// Which image encoders are installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    pub webp: bool,
    pub avif: bool,
}

impl Capabilities {
    pub fn probe(toolchain: &impl Toolchain) -> Self {
        Self {
            webp: toolchain.exists(ImageFormat::WebP.encoder()),
            avif: toolchain.exists(ImageFormat::Avif.encoder()),
        }
    }

    pub fn supports(self, format: ImageFormat) -> bool {
        match format {
            ImageFormat::WebP => self.webp,
            ImageFormat::Avif => self.avif,
        }
    }

    /// Enabled formats, WebP first.
    pub fn formats(self) -> Vec<ImageFormat> {
        ImageFormat::ALL
            .into_iter()
            .filter(|f| self.supports(*f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::backend::tests::MockToolchain;
    use super::*;

    #[test]
    fn probe_checks_each_encoder() {
        let caps = Capabilities::probe(&MockToolchain::with_tools(&["avifenc"]));
        assert_eq!(
            caps,
            Capabilities {
                webp: false,
                avif: true
            }
        );
        assert_eq!(caps.formats(), vec![ImageFormat::Avif]);
    }

    #[test]
    fn no_encoders_means_no_formats() {
        let caps = Capabilities::probe(&MockToolchain::new());
        assert!(caps.formats().is_empty());
    }
}
