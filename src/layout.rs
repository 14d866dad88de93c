//! Markdown block layout engine
//!
//! Walks a multi-line markdown block line by line, classifies each line
//! (blank, heading, list item, paragraph), delegates inline content to the
//! formatting parser, word-wraps greedily against a pixel width budget and
//! advances a vertical cursor. Returns the final cursor position so callers
//! can stack further content beneath the text.
//!
//! The engine is pure with respect to its inputs apart from drawing onto
//! the supplied surface, draws strictly left-to-right top-to-bottom in one
//! pass, and never fails on any input.

use crate::markdown::{classify_line, parse_inline, LineKind, TextSegment};
use crate::rendering::{FontFamily, TextSurface};
use crate::theme::Theme;

/// Bold segments render at this CSS weight regardless of the base weight.
const BOLD_WEIGHT: &str = "800";
/// Hanging-indent gap between a list prefix and its content, in pixels.
const LIST_INDENT_GAP: f32 = 8.0;
/// Kerning pad appended after every drawn segment run.
const SEGMENT_PAD: f32 = 2.0;
/// Extra margin after a formatted segment followed by plain text.
const FORMATTED_MARGIN: f32 = 10.0;

fn line_advance(font_size: f32) -> f32 {
    (font_size * 1.3).round()
}

fn heading_advance(font_size: f32) -> f32 {
    (font_size * 1.2).round()
}

/// Heading font size for a 1-6 heading level: level 1 renders largest,
/// deeper levels shrink, floored at 80% of the base size.
fn heading_font_size(base: f32, level: usize) -> f32 {
    (base * (2.5 - level as f32 * 0.3)).max(base * 0.8)
}

/// Lays out `text` onto `surface` and returns the final vertical cursor.
///
/// `origin_x`/`origin_y` anchor the block's top-left baseline, `max_width`
/// is the pixel budget each wrapped line is measured against, and
/// `base_font_size`/`base_font_weight` style unformatted runs. Empty input
/// returns `origin_y` unchanged without touching the surface.
#[allow(clippy::too_many_arguments)]
pub fn render_markdown(
    surface: &mut dyn TextSurface,
    text: &str,
    origin_x: f32,
    origin_y: f32,
    max_width: f32,
    base_font_size: f32,
    base_font_weight: &str,
    theme: &Theme,
) -> f32 {
    if text.is_empty() {
        return origin_y;
    }

    let mut current_y = origin_y;
    for line in text.split('\n') {
        match classify_line(line) {
            LineKind::Blank => {
                current_y += line_advance(base_font_size);
            }
            LineKind::Heading { level, text } => {
                current_y = draw_heading(
                    surface,
                    text,
                    level,
                    origin_x,
                    current_y,
                    max_width,
                    base_font_size,
                    base_font_weight,
                    theme,
                );
            }
            LineKind::Bullet { text } => {
                current_y = draw_content_line(
                    surface,
                    Some("\u{2022} ".to_string()),
                    text,
                    origin_x,
                    current_y,
                    max_width,
                    base_font_size,
                    base_font_weight,
                    theme,
                );
            }
            LineKind::Numbered { number, text } => {
                current_y = draw_content_line(
                    surface,
                    Some(format!("{number}. ")),
                    text,
                    origin_x,
                    current_y,
                    max_width,
                    base_font_size,
                    base_font_weight,
                    theme,
                );
            }
            LineKind::Paragraph { text } => {
                current_y = draw_content_line(
                    surface,
                    None,
                    text,
                    origin_x,
                    current_y,
                    max_width,
                    base_font_size,
                    base_font_weight,
                    theme,
                );
            }
        }
    }
    current_y
}

/// Headings wrap with the same greedy algorithm as paragraphs but draw in a
/// single style; inline formatting is not applied inside them.
#[allow(clippy::too_many_arguments)]
fn draw_heading(
    surface: &mut dyn TextSurface,
    text: &str,
    level: usize,
    origin_x: f32,
    start_y: f32,
    max_width: f32,
    base_font_size: f32,
    base_font_weight: &str,
    theme: &Theme,
) -> f32 {
    let size = heading_font_size(base_font_size, level);
    surface.set_font(base_font_weight, size, FontFamily::Sans);
    surface.set_fill_color(&theme.text);

    let mut run = String::new();
    let mut y = start_y;
    for word in text.split(' ') {
        let test = join_run(&run, word);
        if surface.measure_text(&test) > max_width && !run.is_empty() {
            surface.fill_text(&run, origin_x, y);
            run = word.to_string();
            y += heading_advance(size);
        } else {
            run = test;
        }
    }
    if run.is_empty() {
        return start_y;
    }
    surface.fill_text(&run, origin_x, y);
    y + heading_advance(size)
}

/// Paragraph or list-item content: optional prefix glyph, then inline
/// segments with per-segment styling and greedy word wrap.
#[allow(clippy::too_many_arguments)]
fn draw_content_line(
    surface: &mut dyn TextSurface,
    prefix: Option<String>,
    content: &str,
    origin_x: f32,
    start_y: f32,
    max_width: f32,
    base_font_size: f32,
    base_font_weight: &str,
    theme: &Theme,
) -> f32 {
    let mut current_y = start_y;
    surface.set_font(base_font_weight, base_font_size, FontFamily::Sans);

    let mut line_x = origin_x;
    if let Some(prefix) = &prefix {
        surface.set_fill_color(&theme.text);
        surface.fill_text(prefix, origin_x, current_y);
        line_x = origin_x + surface.measure_text(prefix) + LIST_INDENT_GAP;
    }

    let segments = parse_inline(content);
    let mut segment_x = line_x;
    for (index, segment) in segments.iter().enumerate() {
        apply_segment_style(surface, segment, base_font_size, base_font_weight, theme);

        let mut run = String::new();
        for word in segment.text.split(' ') {
            let test = join_run(&run, word);
            if segment_x + surface.measure_text(&test) > origin_x + max_width && !run.is_empty() {
                surface.fill_text(&run, segment_x, current_y);
                run = word.to_string();
                segment_x = line_x;
                current_y += line_advance(base_font_size);
            } else {
                run = test;
            }
        }

        if !run.is_empty() {
            surface.fill_text(&run, segment_x, current_y);
            let next_is_plain = segments
                .get(index + 1)
                .map_or(true, |next| !next.is_formatted());
            let margin = if segment.is_formatted() && next_is_plain {
                FORMATTED_MARGIN
            } else {
                0.0
            };
            segment_x += surface.measure_text(&run) + SEGMENT_PAD + margin;
        }
    }

    current_y + line_advance(base_font_size)
}

fn apply_segment_style(
    surface: &mut dyn TextSurface,
    segment: &TextSegment,
    base_font_size: f32,
    base_font_weight: &str,
    theme: &Theme,
) {
    let weight = if segment.is_bold {
        BOLD_WEIGHT
    } else {
        base_font_weight
    };
    let family = if segment.is_code {
        FontFamily::Mono
    } else {
        FontFamily::Sans
    };
    surface.set_font(weight, base_font_size, family);

    let color = if segment.is_code {
        theme.accent1.as_str()
    } else if segment.is_italic {
        theme.italic_variant()
    } else {
        theme.text.as_str()
    };
    surface.set_fill_color(color);
}

fn join_run(run: &str, word: &str) -> String {
    if run.is_empty() {
        word.to_string()
    } else {
        format!("{run} {word}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::ThemeName;

    /// Recording surface with deterministic metrics: every character is 10px
    /// wide regardless of font, so wrap boundaries are easy to construct.
    #[derive(Default)]
    struct MockSurface {
        draws: Vec<(String, f32, f32)>,
        fonts: Vec<(String, f32, FontFamily)>,
        colors: Vec<String>,
    }

    const CHAR_W: f32 = 10.0;

    impl TextSurface for MockSurface {
        fn set_font(&mut self, weight: &str, size_px: f32, family: FontFamily) {
            self.fonts.push((weight.to_string(), size_px, family));
        }

        fn measure_text(&self, s: &str) -> f32 {
            s.chars().count() as f32 * CHAR_W
        }

        fn set_fill_color(&mut self, color: &str) {
            self.colors.push(color.to_string());
        }

        fn fill_text(&mut self, s: &str, x: f32, y: f32) {
            self.draws.push((s.to_string(), x, y));
        }
    }

    fn theme() -> Theme {
        Theme::palette(ThemeName::Dark)
    }

    fn layout(text: &str, max_width: f32) -> (MockSurface, f32) {
        let mut surface = MockSurface::default();
        let end = render_markdown(&mut surface, text, 0.0, 100.0, max_width, 40.0, "400", &theme());
        (surface, end)
    }

    #[test]
    fn empty_input_returns_origin_unchanged() {
        let (surface, end) = layout("", 500.0);
        assert!(surface.draws.is_empty());
        assert!(surface.fonts.is_empty());
        assert_eq!(end, 100.0);
    }

    #[test]
    fn blank_line_advances_one_line_height_without_drawing() {
        let (surface, end) = layout("   ", 500.0);
        assert!(surface.draws.is_empty());
        assert_eq!(end, 100.0 + 52.0); // round(40 * 1.3)
    }

    #[test]
    fn heading_sizes_match_the_level_formula() {
        assert_eq!(heading_font_size(40.0, 1), 88.0);
        assert_eq!(heading_font_size(40.0, 6), 32.0); // floored at 0.8 * base
    }

    #[test]
    fn level_one_heading_uses_heading_font_and_advance() {
        let (surface, end) = layout("# Title", 500.0);
        assert_eq!(surface.fonts[0], ("400".to_string(), 88.0, FontFamily::Sans));
        assert_eq!(surface.draws, vec![("Title".to_string(), 0.0, 100.0)]);
        assert_eq!(end, 100.0 + (88.0f32 * 1.2).round());
    }

    #[test]
    fn heading_wraps_against_the_width_budget() {
        // Each word is 50px; two words plus the joining space exceed 100px.
        let (surface, _) = layout("# aaaaa bbbbb", 100.0);
        assert_eq!(surface.draws.len(), 2);
        assert_eq!(surface.draws[0].0, "aaaaa");
        assert_eq!(surface.draws[1].0, "bbbbb");
        assert_eq!(surface.draws[1].2 - surface.draws[0].2, (88.0f32 * 1.2).round());
    }

    #[test]
    fn paragraph_wrap_breaks_before_the_overflowing_word() {
        // "aaaaaaaa bbbbbbbb" measures 170px; budget 120px forces a break
        // before the second word, advancing exactly one line height.
        let (surface, _) = layout("aaaaaaaa bbbbbbbb", 120.0);
        assert_eq!(surface.draws.len(), 2);
        assert_eq!(surface.draws[0], ("aaaaaaaa".to_string(), 0.0, 100.0));
        assert_eq!(surface.draws[1], ("bbbbbbbb".to_string(), 0.0, 152.0));
    }

    #[test]
    fn bullet_prefix_and_hanging_indent() {
        let (surface, _) = layout("- item", 500.0);
        assert_eq!(surface.draws[0].0, "\u{2022} ");
        // Content starts after prefix width (2 chars * 10) + 8px gap.
        assert_eq!(surface.draws[1], ("item".to_string(), 28.0, 100.0));
    }

    #[test]
    fn numbered_prefix_keeps_the_literal_number() {
        let (surface, _) = layout("3. item two", 500.0);
        assert_eq!(surface.draws[0].0, "3. ");
        let (surface, _) = layout("12. renumber me not", 500.0);
        assert_eq!(surface.draws[0].0, "12. ");
    }

    #[test]
    fn bold_segment_selects_weight_800_and_code_selects_mono_accent() {
        let (surface, _) = layout("a **b** `c`", 500.0);
        assert!(surface
            .fonts
            .iter()
            .any(|(w, _, f)| w == "800" && *f == FontFamily::Sans));
        assert!(surface
            .fonts
            .iter()
            .any(|(w, _, f)| w == "400" && *f == FontFamily::Mono));
        assert!(surface.colors.iter().any(|c| c == "#00BFA6"));
    }

    #[test]
    fn italic_uses_muted_variant_of_white_text() {
        let (surface, _) = layout("*soft*", 500.0);
        assert!(surface.colors.iter().any(|c| c == "#cccccc"));
    }

    #[test]
    fn formatted_segment_gets_margin_before_plain_text() {
        let (surface, _) = layout("**ab** cd", 500.0);
        // bold "ab" at x=0, then plain " cd": 2 + 10px margin after the
        // 20px bold run.
        assert_eq!(surface.draws[0], ("ab".to_string(), 0.0, 100.0));
        assert_eq!(surface.draws[1].1, 20.0 + 2.0 + 10.0);
    }

    #[test]
    fn plain_segments_get_only_the_kerning_pad() {
        let (surface, _) = layout("ab`cd`", 500.0);
        // plain "ab" then code "cd": plain gets 2px pad only.
        assert_eq!(surface.draws[1].1, 20.0 + 2.0);
    }

    #[test]
    fn cursor_is_monotonically_non_decreasing() {
        let text = "# Head\n\npara one with several words\n- item\n- item two\n\n## Sub\nmore";
        let (surface, end) = layout(text, 150.0);
        let mut last = f32::MIN;
        for (_, _, y) in &surface.draws {
            assert!(*y >= last, "cursor moved up: {y} after {last}");
            last = *y;
        }
        assert!(end >= last);
    }

    #[test]
    fn each_source_line_advances_at_least_one_line_height() {
        let (_, end) = layout("one\ntwo\nthree", 500.0);
        assert_eq!(end, 100.0 + 3.0 * 52.0);
    }

    #[test]
    fn final_y_accounts_for_internal_wraps() {
        // One logical line wrapping into two drawn lines advances twice.
        let (surface, end) = layout("aaaaaaaa bbbbbbbb", 120.0);
        assert_eq!(surface.draws.len(), 2);
        assert_eq!(end, 100.0 + 2.0 * 52.0);
    }
}
