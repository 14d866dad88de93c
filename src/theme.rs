//! Color palettes for the post templates
//!
//! A `Theme` is a plain record of five CSS-style hex colors. The core never
//! mutates it; one is built from the palette table per render pass.

use serde::{Deserialize, Serialize};

/// Five-color palette consumed by the layout engine and template painters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Background fill
    pub bg: String,
    /// Primary accent (code spans, footer chrome, decorative circles)
    pub accent1: String,
    /// Secondary accent (code box fill)
    pub accent2: String,
    /// Primary text color
    pub text: String,
    /// Secondary text color (taglines)
    pub sub_text: String,
}

/// Built-in palette names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Dark,
    Light,
    Teal,
}

impl ThemeName {
    /// All built-in palettes, in UI order.
    pub const ALL: [ThemeName; 3] = [ThemeName::Dark, ThemeName::Light, ThemeName::Teal];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
            ThemeName::Teal => "teal",
        }
    }
}

impl std::str::FromStr for ThemeName {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "dark" => Ok(ThemeName::Dark),
            "light" => Ok(ThemeName::Light),
            "teal" => Ok(ThemeName::Teal),
            other => Err(crate::Error::Config(format!("unknown theme '{other}'"))),
        }
    }
}

impl std::fmt::Display for ThemeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Theme {
    /// Returns the palette for a built-in theme name.
    pub fn palette(name: ThemeName) -> Theme {
        let (bg, accent1, accent2, text, sub_text) = match name {
            ThemeName::Dark => ("#1a1d2e", "#00BFA6", "#2d3748", "#ffffff", "#cbd5e0"),
            ThemeName::Light => ("#ffffff", "#00BFA6", "#e2e8f0", "#1a202c", "#4a5568"),
            ThemeName::Teal => ("#00BFA6", "#ffffff", "#009688", "#ffffff", "#e0f2f1"),
        };
        Theme {
            bg: bg.to_string(),
            accent1: accent1.to_string(),
            accent2: accent2.to_string(),
            text: text.to_string(),
            sub_text: sub_text.to_string(),
        }
    }

    /// Muted variant of the text color used for italic runs.
    ///
    /// The table special-cases exactly the two built-in text colors; any
    /// other color passes through unchanged.
    pub fn italic_variant(&self) -> &str {
        match self.text.as_str() {
            "#ffffff" => "#cccccc",
            "#1a202c" => "#4a5568",
            other => other,
        }
    }
}

/// Parses a `#rrggbb` hex color into RGB bytes.
///
/// Returns `None` for anything that is not a 7-character hash-prefixed hex
/// triple; callers degrade by keeping their previous color.
pub fn parse_hex_color(s: &str) -> Option<[u8; 3]> {
    let digits = s.strip_prefix('#')?;
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some([r, g, b])
}
