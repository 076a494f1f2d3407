use crate::error::Span;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// A rule floats an element that is also `display: inline`.
    InlineFloat,
    /// A position uses a numeric horizontal offset that was left as is.
    AmbiguousPosition,
}

/// Advisory produced by the flip pass when a rewrite may not mirror the
/// layout faithfully. Never stops the transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Selector of the rule the diagnostic belongs to, trimmed.
    pub selector: String,
    pub location: Option<Span>,
}

impl Diagnostic {
    pub fn inline_float(selector: &str, location: Span) -> Self {
        Self {
            kind: DiagnosticKind::InlineFloat,
            message: "Inline element with float, the mirrored layout may differ".to_string(),
            selector: selector.to_string(),
            location: Some(location).filter(|span| !span.is_dummy()),
        }
    }

    pub fn ambiguous_position(selector: &str, property: &str, value: &str, location: Span) -> Self {
        Self {
            kind: DiagnosticKind::AmbiguousPosition,
            message: format!(
                "Numeric horizontal offset in '{}: {}' was not mirrored",
                property, value
            ),
            selector: selector.to_string(),
            location: Some(location).filter(|span| !span.is_dummy()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Warning: {} in '{}'", self.message, self.selector)?;
        if let Some(location) = self.location {
            write!(f, " ({})", location)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_starts_with_warning() {
        let span = Span {
            start: 5,
            end: 16,
            line: 1,
            column: 6,
        };
        let diag = Diagnostic::inline_float(".foo", span);
        assert_eq!(
            diag.to_string(),
            "Warning: Inline element with float, the mirrored layout may differ in '.foo' (1:6)"
        );
    }

    #[test]
    fn dummy_location_is_dropped() {
        let diag = Diagnostic::ambiguous_position("a", "background-position", "10px 0", Span::dummy());
        assert_eq!(diag.location, None);
        assert!(diag.to_string().ends_with("in 'a'"));
    }
}
