//! mdpost — markdown post-image rendering engine
//!
//! Renders a titled, markdown-formatted "post" onto a portrait raster
//! canvas and exports it as PNG. The core is a small text-layout engine:
//! an inline markdown parser (bold / italic / code spans) feeding a greedy
//! word-wrapping block layout with heading and list support, drawing
//! through a surface capability trait. Around it sit the visual templates,
//! the theme palettes and a saved-configuration store.
//!
//! # Example
//!
//! ```
//! use mdpost::PostConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PostConfig {
//!     title: "Rust".to_string(),
//!     content: "# Ownership\n\nMove semantics are **checked** at `compile` time.".to_string(),
//!     footer: "@YourBrand".to_string(),
//!     ..Default::default()
//! };
//!
//! let image = mdpost::render_post(&config)?;
//! let png = image.to_png()?;
//! assert!(!png.is_empty());
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod layout;
pub mod markdown;
pub mod rendering;
pub mod storage;
pub mod template;
pub mod theme;

pub use layout::render_markdown;
pub use markdown::{classify_line, parse_inline, LineKind, TextSegment};
pub use rendering::{Canvas, FontFamily, PostImage, TextSurface};
pub use storage::{ConfigStore, ExportBundle};
pub use template::TemplateName;
pub use theme::{Theme, ThemeName};

/// Output dimensions in pixels.
///
/// The default is the portrait post size the templates are designed
/// around; templates scale their chrome from fixed offsets, so other sizes
/// mainly suit tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1350,
        }
    }
}

/// Complete description of one post
///
/// This is also the persisted configuration record; field names serialize
/// in camelCase to stay byte-compatible with previously exported files.
///
/// ```
/// let cfg = mdpost::PostConfig::default();
/// assert_eq!(cfg.template.as_str(), "modern");
/// assert_eq!(cfg.theme.as_str(), "dark");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostConfig {
    /// Display name in the saved-config list
    pub name: String,
    pub title: String,
    /// Markdown body (headings, lists, bold / italic / code spans)
    pub content: String,
    pub footer: String,
    pub theme: ThemeName,
    pub template: TemplateName,
    pub title_font_size: f32,
    pub content_font_size: f32,
    /// CSS-style weight string ("400", "700", "bold")
    pub title_font_weight: String,
    pub content_font_weight: String,
    /// Baseline of the first title line
    pub title_y: f32,
    /// Baseline the markdown block starts at
    pub content_y: f32,
    pub show_next_arrow: bool,
    pub show_code_section: bool,
    pub code_box_height: f32,
    /// Verbatim code lines for the optional code box
    pub code: String,
    /// Assigned by the store on save
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Default for PostConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: "JavaScript".to_string(),
            content: "# Main Title\n\nThis is **bold** and *italic* with `code` formatting.\n\n## Features\n- **Bold text** support\n- *Italic text* support\n- `Code blocks` support\n- Headers and lists".to_string(),
            footer: "@YourBrand".to_string(),
            theme: ThemeName::Dark,
            template: TemplateName::Modern,
            title_font_size: 72.0,
            content_font_size: 40.0,
            title_font_weight: "700".to_string(),
            content_font_weight: "400".to_string(),
            title_y: 130.0,
            content_y: 250.0,
            show_next_arrow: false,
            show_code_section: false,
            code_box_height: 220.0,
            code: "const api = fetch(\"/data\")\n  .then(res => res.json())".to_string(),
            id: None,
            created_at: None,
        }
    }
}

impl PostConfig {
    fn validate(&self, viewport: Viewport) -> Result<()> {
        if viewport.width == 0 || viewport.height == 0 {
            return Err(Error::Config("viewport must be non-empty".to_string()));
        }
        if self.title_font_size <= 0.0 || self.content_font_size <= 0.0 {
            return Err(Error::Config("font sizes must be positive".to_string()));
        }
        if self.code_box_height < 0.0 {
            return Err(Error::Config("code box height must not be negative".to_string()));
        }
        Ok(())
    }
}

/// Renders `config` at the default portrait size.
pub fn render_post(config: &PostConfig) -> Result<PostImage> {
    render_post_with_viewport(config, Viewport::default())
}

/// Renders `config` at an explicit size. Each call is a full
/// clear-and-redraw; identical inputs produce identical frames.
pub fn render_post_with_viewport(config: &PostConfig, viewport: Viewport) -> Result<PostImage> {
    config.validate(viewport)?;
    let theme = Theme::palette(config.theme);
    let mut canvas = Canvas::new(viewport.width, viewport.height);
    log::debug!(
        "rendering {}x{} {} post, theme {}",
        viewport.width,
        viewport.height,
        config.template,
        config.theme
    );
    template::draw_template(&mut canvas, config, &theme);
    Ok(canvas.into_image())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_editor_initial_state() {
        let config = PostConfig::default();
        assert_eq!(config.title, "JavaScript");
        assert_eq!(config.template, TemplateName::Modern);
        assert_eq!(config.theme, ThemeName::Dark);
        assert_eq!(config.title_font_size, 72.0);
        assert_eq!(config.content_font_size, 40.0);
        assert!(!config.show_next_arrow);
        assert!(!config.show_code_section);
    }

    #[test]
    fn default_viewport_is_portrait_post() {
        let v = Viewport::default();
        assert_eq!((v.width, v.height), (1080, 1350));
    }

    #[test]
    fn render_rejects_bad_sizes() {
        let mut config = PostConfig::default();
        config.title_font_size = 0.0;
        assert!(matches!(render_post(&config), Err(Error::Config(_))));

        let config = PostConfig::default();
        let empty = Viewport { width: 0, height: 10 };
        assert!(matches!(
            render_post_with_viewport(&config, empty),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn identical_inputs_render_identical_frames() {
        let config = PostConfig::default();
        let viewport = Viewport { width: 108, height: 135 };
        let a = render_post_with_viewport(&config, viewport).unwrap();
        let b = render_post_with_viewport(&config, viewport).unwrap();
        assert_eq!(a.pixels, b.pixels);
    }

    #[test]
    fn config_survives_a_serde_round_trip() {
        let config = PostConfig {
            name: "demo".to_string(),
            show_code_section: true,
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: PostConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "demo");
        assert_eq!(back.theme, config.theme);
        assert!(back.show_code_section);
    }
}
