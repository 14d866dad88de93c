use std::fs;
use std::path::PathBuf;

use sha2::{Digest, Sha256};

use mdpost::{PostConfig, TemplateName, ThemeName, Viewport};

fn golden_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("tests/goldens/expected");
    p.push(name);
    p
}

fn frame_digest(config: &PostConfig) -> String {
    let viewport = Viewport {
        width: 270,
        height: 338,
    };
    let image = mdpost::render_post_with_viewport(config, viewport).expect("render failed");
    hex::encode(Sha256::digest(&image.pixels))
}

fn check_golden(name: &str, config: &PostConfig) {
    let digest = frame_digest(config);
    let expected_path = golden_path(name);

    if std::env::var("UPDATE_GOLDENS").is_ok() {
        fs::create_dir_all("tests/goldens/expected").ok();
        fs::write(&expected_path, &digest).expect("write golden");
        println!("Updated golden: {expected_path:?}");
        return;
    }

    if !expected_path.exists() {
        println!(
            "No golden at {expected_path:?}; run with UPDATE_GOLDENS=1 to create it. Skipping."
        );
        return;
    }

    let expected = fs::read_to_string(&expected_path).expect("unable to read golden");
    assert_eq!(digest, expected.trim(), "frame digest changed for {name}");
}

#[test]
fn golden_modern_dark() {
    check_golden("modern_dark.sha256", &PostConfig::default());
}

#[test]
fn golden_minimal_light_with_code() {
    let config = PostConfig {
        template: TemplateName::Minimal,
        theme: ThemeName::Light,
        show_code_section: true,
        ..Default::default()
    };
    check_golden("minimal_light_code.sha256", &config);
}

#[test]
fn golden_gradient_teal_with_arrow() {
    let config = PostConfig {
        template: TemplateName::Gradient,
        theme: ThemeName::Teal,
        show_next_arrow: true,
        ..Default::default()
    };
    check_golden("gradient_teal_arrow.sha256", &config);
}
