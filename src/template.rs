//! Post template painters
//!
//! Each template clears and redraws the whole canvas in a single pass:
//! background, decorative chrome, wrapped title, markdown content (via the
//! layout engine), optional code box stacked beneath the content's final
//! cursor, footer block and the optional "next" arrow badge.

use serde::{Deserialize, Serialize};

use crate::layout::render_markdown;
use crate::rendering::{Canvas, FontFamily, TextSurface};
use crate::theme::Theme;
use crate::PostConfig;

/// Built-in template names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateName {
    Modern,
    Minimal,
    Gradient,
}

impl TemplateName {
    /// All built-in templates, in UI order.
    pub const ALL: [TemplateName; 3] = [
        TemplateName::Modern,
        TemplateName::Minimal,
        TemplateName::Gradient,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::Modern => "modern",
            TemplateName::Minimal => "minimal",
            TemplateName::Gradient => "gradient",
        }
    }
}

impl std::str::FromStr for TemplateName {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s {
            "modern" => Ok(TemplateName::Modern),
            "minimal" => Ok(TemplateName::Minimal),
            "gradient" => Ok(TemplateName::Gradient),
            other => Err(crate::Error::Config(format!("unknown template '{other}'"))),
        }
    }
}

impl std::fmt::Display for TemplateName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paints `config` onto `canvas` with the selected template.
pub fn draw_template(canvas: &mut Canvas, config: &PostConfig, theme: &Theme) {
    match config.template {
        TemplateName::Modern => draw_modern(canvas, config, theme),
        TemplateName::Minimal => draw_minimal(canvas, config, theme),
        TemplateName::Gradient => draw_gradient(canvas, config, theme),
    }
}

/// Six translucent accent circles, several centered off-canvas.
fn draw_decorative_circles(canvas: &mut Canvas, theme: &Theme) {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    canvas.set_fill_color(&theme.accent1);
    let circles: [(f32, f32, f32, f32); 6] = [
        (w + 300.0, h + 250.0, 400.0, 0.12),
        (w + 100.0, -50.0, 250.0, 0.14),
        (w - 50.0, h - 100.0, 350.0, 0.12),
        (w / 2.0, h / 2.0, 300.0, 0.08),
        (-80.0, h / 2.0, 180.0, 0.11),
        (100.0, h + 150.0, 150.0, 0.09),
    ];
    for (cx, cy, r, alpha) in circles {
        canvas.set_global_alpha(alpha);
        canvas.fill_circle(cx, cy, r);
    }
    canvas.set_global_alpha(1.0);
}

/// Circular "next slide" badge with a chevron, bottom-right corner.
fn draw_next_arrow(canvas: &mut Canvas, theme: &Theme) {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let ax = w - 100.0;
    let ay = h - 150.0;
    let r = 40.0 + 10.0;

    canvas.set_fill_color(&theme.accent1);
    canvas.set_global_alpha(0.3);
    canvas.fill_circle(ax, ay, r);

    canvas.set_stroke_color(&theme.accent1);
    canvas.set_line_width(2.0);
    canvas.set_global_alpha(0.6);
    canvas.stroke_circle(ax, ay, r);

    canvas.set_fill_color("#ffffff");
    canvas.set_global_alpha(0.3);
    canvas.fill_circle(ax - 8.0, ay - 8.0, 8.0);

    // Chevron color follows the background, not the text color, so the
    // badge stays legible on the teal and light palettes.
    let chevron = match theme.bg.as_str() {
        "#00BFA6" => "#ffffff",
        "#ffffff" => "#1a202c",
        _ => theme.text.as_str(),
    };
    canvas.set_stroke_color(chevron);
    canvas.set_line_width(4.0);
    canvas.set_global_alpha(1.0);
    canvas.stroke_polyline(&[
        (ax - 12.0, ay - 12.0),
        (ax + 12.0, ay),
        (ax - 12.0, ay + 12.0),
    ]);
    canvas.set_global_alpha(1.0);
}

/// Greedy word-wrap for the plain title block (no markdown inside titles).
fn draw_wrapped_title(
    canvas: &mut Canvas,
    title: &str,
    x: f32,
    start_y: f32,
    max_width: f32,
    line_advance: f32,
) {
    let mut run = String::new();
    let mut y = start_y;
    for word in title.split(' ') {
        let test = if run.is_empty() {
            word.to_string()
        } else {
            format!("{run} {word}")
        };
        if canvas.measure_text(&test) > max_width && !run.is_empty() {
            canvas.fill_text(&run, x, y);
            run = word.to_string();
            y += line_advance;
        } else {
            run = test;
        }
    }
    if !run.is_empty() {
        canvas.fill_text(&run, x, y);
    }
}

/// Truncates one code line to 40 characters + ellipsis when it overflows
/// the box. `None` threshold disables truncation.
fn clip_code_line(canvas: &Canvas, line: &str, threshold: Option<f32>) -> String {
    if let Some(max) = threshold {
        if canvas.measure_text(line) > max {
            let head: String = line.chars().take(40).collect();
            return format!("{head}...");
        }
    }
    line.to_string()
}

fn draw_modern(canvas: &mut Canvas, config: &PostConfig, theme: &Theme) {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;

    canvas.set_fill_color(&theme.bg);
    canvas.fill_rect(0.0, 0.0, w, h);
    canvas.fill_rounded_rect(0.0, 0.0, w, h, 40.0);

    draw_decorative_circles(canvas, theme);

    canvas.set_fill_color(&theme.text);
    canvas.set_font(&config.title_font_weight, config.title_font_size, FontFamily::Sans);
    draw_wrapped_title(canvas, &config.title, 80.0, config.title_y, w - 130.0, 85.0);

    let end_y = render_markdown(
        canvas,
        &config.content,
        80.0,
        config.content_y,
        w - 130.0,
        config.content_font_size,
        &config.content_font_weight,
        theme,
    );

    let footer_start_y = h - 130.0;

    if config.show_code_section {
        let box_y = end_y + 70.0;
        let padding = 20.0;

        canvas.set_fill_color(&theme.accent2);
        canvas.set_global_alpha(0.3);
        canvas.fill_rect(80.0, box_y, w - 130.0, config.code_box_height);
        canvas.set_global_alpha(1.0);

        canvas.set_stroke_color(&theme.accent1);
        canvas.set_line_width(2.0);
        canvas.stroke_rect(80.0, box_y, w - 130.0, config.code_box_height);

        canvas.set_fill_color(&theme.accent1);
        canvas.set_font("bold", 22.0, FontFamily::Mono);

        let mut code_y = box_y + padding + 20.0;
        for line in config.code.split('\n') {
            if code_y >= box_y + config.code_box_height - padding {
                break;
            }
            let display = clip_code_line(canvas, line, Some(w - 170.0));
            canvas.fill_text(&display, 80.0 + padding, code_y);
            code_y += 32.0;
        }
    }

    canvas.set_stroke_color(&theme.accent1);
    canvas.set_line_width(2.0);
    canvas.stroke_segment(80.0, footer_start_y, 150.0, footer_start_y);

    canvas.set_fill_color(&theme.accent1);
    canvas.set_font("400", 20.0, FontFamily::Sans);
    canvas.fill_text(&config.footer, 80.0, footer_start_y + 20.0);

    canvas.set_fill_color(&theme.sub_text);
    canvas.set_font("400", 16.0, FontFamily::Sans);
    canvas.fill_text("Tech Tips & Learning Resources", 80.0, footer_start_y + 55.0);

    if config.show_next_arrow {
        draw_next_arrow(canvas, theme);
    }
}

fn draw_minimal(canvas: &mut Canvas, config: &PostConfig, theme: &Theme) {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;

    canvas.set_fill_color(&theme.bg);
    canvas.fill_rect(0.0, 0.0, w, h);

    draw_decorative_circles(canvas, theme);

    canvas.set_fill_color(&theme.accent1);
    canvas.fill_rect(0.0, 0.0, 12.0, h);

    canvas.set_font(&config.title_font_weight, 24.0, FontFamily::Sans);
    canvas.fill_text_centered(&config.title.to_uppercase(), w / 2.0 + 30.0, config.title_y);

    let end_y = render_markdown(
        canvas,
        &config.content,
        w / 2.0 + 30.0,
        config.content_y,
        w - 130.0,
        config.content_font_size,
        &config.content_font_weight,
        theme,
    );

    if config.show_code_section {
        let box_y = end_y + 70.0;
        let padding = 20.0;

        canvas.set_fill_color(&theme.accent2);
        canvas.set_global_alpha(0.2);
        canvas.fill_rect(80.0, box_y, w - 130.0, config.code_box_height);
        canvas.set_global_alpha(1.0);

        canvas.set_fill_color(&theme.accent1);
        canvas.set_font("bold", 20.0, FontFamily::Mono);

        let mut code_y = box_y + 25.0;
        for line in config.code.split('\n') {
            if code_y >= box_y + config.code_box_height - padding {
                break;
            }
            let display = clip_code_line(canvas, line, Some(w - 130.0 - 40.0));
            canvas.fill_text(&display, 100.0, code_y);
            code_y += 30.0;
        }
    }

    canvas.set_fill_color(&theme.accent1);
    canvas.set_font("400", 18.0, FontFamily::Sans);
    canvas.fill_text_centered(&config.footer, w / 2.0 + 30.0, h - 50.0);

    if config.show_next_arrow {
        draw_next_arrow(canvas, theme);
    }
}

fn draw_gradient(canvas: &mut Canvas, config: &PostConfig, theme: &Theme) {
    let w = canvas.width() as f32;
    let h = canvas.height() as f32;
    let box_padding = 40.0;

    canvas.set_fill_color(&theme.bg);
    canvas.fill_rect(0.0, 0.0, w, h);
    canvas.fill_diagonal_gradient(&theme.accent1, &theme.bg);

    // Near-opaque card the content sits on.
    canvas.set_fill_color(&theme.text);
    canvas.set_global_alpha(0.95);
    canvas.fill_rect(box_padding, 40.0, w - 2.0 * box_padding, h - 100.0);
    canvas.set_global_alpha(1.0);

    canvas.set_fill_color(&theme.accent1);
    canvas.set_font(
        &config.title_font_weight,
        config.title_font_size * 0.67,
        FontFamily::Sans,
    );
    canvas.fill_text(&config.title, box_padding + 60.0, config.title_y);

    let end_y = render_markdown(
        canvas,
        &config.content,
        box_padding + 60.0,
        config.content_y,
        w - 2.0 * box_padding - 120.0,
        config.content_font_size,
        &config.content_font_weight,
        theme,
    );

    if config.show_code_section {
        let box_y = end_y + 40.0;

        canvas.set_fill_color(&theme.accent1);
        canvas.set_global_alpha(0.1);
        canvas.fill_rect(
            box_padding + 60.0,
            box_y,
            w - 2.0 * box_padding - 120.0,
            config.code_box_height,
        );
        canvas.set_global_alpha(1.0);

        canvas.set_fill_color(&theme.accent1);
        canvas.set_font("bold", 18.0, FontFamily::Mono);

        let mut code_y = box_y + 25.0;
        for line in config.code.split('\n') {
            if code_y >= box_y + config.code_box_height - 20.0 {
                break;
            }
            canvas.fill_text(line, box_padding + 75.0, code_y);
            code_y += 28.0;
        }
    }

    canvas.set_fill_color(&theme.text);
    canvas.set_font("400", 18.0, FontFamily::Sans);
    canvas.fill_text_centered(&config.footer, w / 2.0 + 30.0, h - 30.0);

    if config.show_next_arrow {
        draw_next_arrow(canvas, theme);
    }
}
