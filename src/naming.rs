//! Filename conventions shared by the stage runners.
//!
//! ## Style files
//!
//! - `_vars.scss` → **partial**: include-only, never emitted
//! - `01-reset.scss` → **squash**: compiled into the aggregate bundle, in
//!   listing order
//! - `main.scss` → **standalone**: compiled and minified to `main.css`
//!
//! The partial check wins: `_01-reset.scss` is a partial.
//!
//! ## Extensions and stems
//!
//! The extension is whatever follows the last `.`, lowercased. The stem is
//! everything before it; a name with no dot is its own stem.

/// How a style file participates in the style stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Partial,
    Squash,
    Standalone,
}

/// Classify a style filename.
pub fn classify_style(name: &str) -> StyleKind {
    if name.starts_with('_') {
        StyleKind::Partial
    } else if has_squash_prefix(name) {
        StyleKind::Squash
    } else {
        StyleKind::Standalone
    }
}

/// True for names beginning with one or more ASCII digits followed by `-`.
pub fn has_squash_prefix(name: &str) -> bool {
    match name.find('-') {
        Some(dash_pos) => {
            let prefix = &name[..dash_pos];
            !prefix.is_empty() && prefix.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// Lowercased text after the last `.`, or the whole lowercased name if there is none.
pub fn extension(name: &str) -> String {
    match name.rfind('.') {
        Some(pos) => name[pos + 1..].to_lowercase(),
        None => name.to_lowercase(),
    }
}

/// Text before the last `.`; the whole name if there is no dot.
pub fn stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) => &name[..pos],
        None => name,
    }
}

/// JPEG sources get lossy encoder settings; everything else near-lossless.
pub fn is_jpeg(name: &str) -> bool {
    matches!(extension(name).as_str(), "jpg" | "jpeg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_names() {
        assert_eq!(classify_style("_vars.scss"), StyleKind::Partial);
        assert_eq!(classify_style("_01-reset.scss"), StyleKind::Partial);
    }

    #[test]
    fn squash_names() {
        assert_eq!(classify_style("01-reset.scss"), StyleKind::Squash);
        assert_eq!(classify_style("9-x.css"), StyleKind::Squash);
        assert_eq!(classify_style("0010-grid-layout.scss"), StyleKind::Squash);
    }

    #[test]
    fn standalone_names() {
        assert_eq!(classify_style("main.scss"), StyleKind::Standalone);
        assert_eq!(classify_style("-01.scss"), StyleKind::Standalone);
        assert_eq!(classify_style("v2-theme.scss"), StyleKind::Standalone);
        assert_eq!(classify_style("2024.scss"), StyleKind::Standalone);
    }

    #[test]
    fn squash_prefix_tolerates_long_digit_runs() {
        assert!(has_squash_prefix("000000000000000000001-huge.scss"));
    }

    #[test]
    fn extension_is_lowercased_last_segment() {
        assert_eq!(extension("photo.JPG"), "jpg");
        assert_eq!(extension("archive.tar.gz"), "gz");
        assert_eq!(extension("README"), "readme");
    }

    #[test]
    fn stem_strips_last_extension_only() {
        assert_eq!(stem("main.scss"), "main");
        assert_eq!(stem("photo.final.png"), "photo.final");
        assert_eq!(stem("README"), "README");
    }

    #[test]
    fn jpeg_detection() {
        assert!(is_jpeg("a.jpg"));
        assert!(is_jpeg("b.JPEG"));
        assert!(!is_jpeg("c.png"));
    }
}
