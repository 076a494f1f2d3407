//! Mirror CSS between left-to-right and right-to-left layouts.
//!
//! ```
//! use flipcss_core::{flip, FlipOptions};
//!
//! let flipped = flip(".foo{float:left;}", &FlipOptions::default());
//! assert_eq!(flipped.css, ".foo{float:right;}");
//! ```

pub mod ast;
pub mod clean;
pub mod diagnostic;
pub mod emitter;
pub mod error;
pub mod flip;
pub mod options;
pub mod parser;
pub mod tables;
pub mod token;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use error::{Error, Result, Span};
pub use options::{Config, Direction, FlipOptions};

/// Output of a flip: the mirrored CSS plus any diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flipped {
    pub css: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Drop rules meant for the other direction and add a leading
/// `body{direction:<dir>;}`.
pub fn clean(css: &str, direction: Direction) -> String {
    let mut sheet = parser::parse(css);
    clean::clean_stylesheet(&mut sheet, direction);
    emitter::render(&sheet)
}

/// Mirror every direction-sensitive construct of `css`.
pub fn flip(css: &str, options: &FlipOptions) -> Flipped {
    let mut sheet = parser::parse(css);
    let diagnostics = flip::flip_stylesheet(&mut sheet, options);
    Flipped {
        css: emitter::render(&sheet),
        diagnostics,
    }
}

/// Clean (when a direction is configured) and then flip (unless clean-only).
///
/// Both passes work on one parse, so diagnostic locations point into `css`.
pub fn transform(css: &str, config: &Config) -> Flipped {
    let mut sheet = parser::parse(css);
    if let Some(direction) = config.direction {
        clean::clean_stylesheet(&mut sheet, direction);
    }

    let diagnostics = if config.clean_only {
        Vec::new()
    } else {
        flip::flip_stylesheet(&mut sheet, &config.flip)
    };
    Flipped {
        css: emitter::render(&sheet),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(direction: Option<Direction>) -> Config {
        Config {
            direction,
            clean_only: false,
            flip: FlipOptions {
                warnings: true,
                ..FlipOptions::default()
            },
        }
    }

    #[test]
    fn flips_without_direction() {
        let out = transform(".foo{float:left;}", &config(None));
        assert_eq!(out.css, ".foo{float:right;}");
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn cleans_then_flips() {
        let out = transform(".foo{float:left;}", &config(Some(Direction::Ltr)));
        assert_eq!(out.css, "body{direction:ltr;}.foo{float:right;}");
        let out = transform(".foo{float:left;}", &config(Some(Direction::Rtl)));
        assert_eq!(out.css, "body{direction:rtl;}.foo{float:right;}");
    }

    #[test]
    fn clean_only_skips_flipping() {
        let mut cfg = config(Some(Direction::Rtl));
        cfg.clean_only = true;
        let out = transform(".foo{float:right;display:inline;}", &cfg);
        assert_eq!(out.css, "body{direction:rtl;}.foo{float:right;display:inline;}");
        assert!(out.diagnostics.is_empty());
    }

    #[test]
    fn warns_once_for_inline_float() {
        let out = transform(
            ".foo{float:right;display:inline;}",
            &config(Some(Direction::Ltr)),
        );
        assert_eq!(out.diagnostics.len(), 1);
        assert!(out.diagnostics[0].to_string().contains("Warning: Inline"));
        assert_eq!(out.css, "body{direction:ltr;}.foo{float:left;display:inline;}");
    }

    #[test]
    fn diagnostics_point_into_the_source_after_cleaning() {
        let out = transform(
            ".foo{float:right;display:inline;}",
            &config(Some(Direction::Ltr)),
        );
        let at = out.diagnostics[0].location.map(|span| (span.line, span.column));
        assert_eq!(at, Some((1, 6)));
        assert!(out.diagnostics[0].to_string().ends_with("(1:6)"));
    }
}
