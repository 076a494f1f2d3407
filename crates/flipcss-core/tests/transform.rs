use flipcss_core::{clean, emitter, flip, parser, transform, Config, Direction, FlipOptions};
use std::fs;
use std::path::PathBuf;

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).expect("read fixture")
}

#[test]
fn fixtures_round_trip_untouched() {
    for name in ["layout.css", "layout.flipped.css", "directional.css"] {
        let css = fixture(name);
        assert_eq!(emitter::render(&parser::parse(&css)), css, "fixture {}", name);
    }
}

#[test]
fn flips_layout_fixture() {
    let flipped = flip(&fixture("layout.css"), &FlipOptions::default());
    assert_eq!(flipped.css, fixture("layout.flipped.css"));
    assert!(flipped.diagnostics.is_empty());
}

#[test]
fn flipping_back_restores_layout_fixture() {
    let flipped = flip(&fixture("layout.flipped.css"), &FlipOptions::default());
    assert_eq!(flipped.css, fixture("layout.css"));
}

#[test]
fn cleans_directional_fixture_for_ltr() {
    let cleaned = clean(&fixture("directional.css"), Direction::Ltr);
    assert_eq!(
        cleaned,
        "body{direction:ltr;}.panel { padding: 0 1em; }\n\
         .panel .close { right: 4px; }\n\
         \n\
         .panel .title {\n  \n  font-weight: bold;\n}\n"
    );
}

#[test]
fn cleans_directional_fixture_for_rtl_and_flips() {
    let config = Config {
        direction: Some(Direction::Rtl),
        ..Config::default()
    };
    let out = transform(&fixture("directional.css"), &config);
    assert_eq!(
        out.css,
        "body{direction:rtl;}.panel { padding: 0 1em; }\n\
         \n\
         .panel .close { right: 4px; }\n\
         .panel .title {\n  font-family: \"Noto Naskh Arabic\";\n  font-weight: bold;\n}\n"
    );
}

#[test]
fn warnings_are_reported_per_rule() {
    let css = ".a{float:left;display:inline}\n.b{display:inline}\n.c{float:none;display:inline}\n\
               .d{background-position:0 0}";
    let options = FlipOptions {
        warnings: true,
        ..FlipOptions::default()
    };
    let out = flip(css, &options);
    let selectors: Vec<_> = out.diagnostics.iter().map(|d| d.selector.as_str()).collect();
    assert_eq!(selectors, vec![".a", ".d"]);
    assert!(out.diagnostics.iter().all(|d| d.to_string().starts_with("Warning: ")));
    assert_eq!(out.diagnostics[0].location.map(|span| span.line), Some(1));
}

#[test]
fn malformed_input_passes_through() {
    let css = "a { float: left; } } b { float: left";
    let out = flip(css, &FlipOptions::default());
    assert_eq!(out.css, "a { float: right; } } b { float: left");
}
