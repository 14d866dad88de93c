use criterion::{criterion_group, criterion_main, Criterion};

use mdpost::{parse_inline, render_markdown, Canvas, PostConfig, Theme, ThemeName, Viewport};

fn bench_parse_inline(c: &mut Criterion) {
    let line = "Mix of **bold**, *italic*, `code()` and ***both*** in one line of text";
    c.bench_function("parse_inline", |b| {
        b.iter(|| {
            let segments = parse_inline(line);
            assert!(!segments.is_empty());
        })
    });
}

fn bench_render_markdown(c: &mut Criterion) {
    let theme = Theme::palette(ThemeName::Dark);
    let text = "# Heading\n\nA paragraph with **bold** and `code` that wraps over \
                several lines once the width budget runs out.\n\n- item one\n- item two\n3. item three";
    c.bench_function("render_markdown", |b| {
        b.iter(|| {
            let mut canvas = Canvas::new(1080, 1350);
            let end = render_markdown(&mut canvas, text, 80.0, 250.0, 950.0, 40.0, "400", &theme);
            assert!(end > 250.0);
        })
    });
}

fn bench_render_post(c: &mut Criterion) {
    let config = PostConfig {
        show_code_section: true,
        show_next_arrow: true,
        ..Default::default()
    };
    let viewport = Viewport {
        width: 540,
        height: 675,
    };
    c.bench_function("render_post", |b| {
        b.iter(|| {
            let image = mdpost::render_post_with_viewport(&config, viewport).unwrap();
            assert!(!image.pixels.is_empty());
        })
    });
}

criterion_group!(
    benches,
    bench_parse_inline,
    bench_render_markdown,
    bench_render_post
);
criterion_main!(benches);
