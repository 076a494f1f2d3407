use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised around the engine. The transforms themselves never fail.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A byte range of the source text plus the 1-based position of its start.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    /// Span of synthesized content that never existed in the source.
    pub const fn dummy() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 0,
            column: 0,
        }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(&self, other: Span) -> Self {
        if self.is_dummy() {
            return other;
        }
        if other.is_dummy() {
            return *self;
        }
        let first = if self.start <= other.start {
            *self
        } else {
            other
        };
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
            line: first.line,
            column: first.column,
        }
    }

    pub fn is_dummy(&self) -> bool {
        self.line == 0 && self.column == 0
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dummy() {
            write!(f, "<unknown>")
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_dummy_span() {
        assert_eq!(Span::dummy().to_string(), "<unknown>");
    }

    #[test]
    fn join_spans_keeps_earliest_position() {
        let a = Span {
            start: 10,
            end: 14,
            line: 2,
            column: 3,
        };
        let b = Span {
            start: 2,
            end: 5,
            line: 1,
            column: 3,
        };
        let joined = a.to(b);
        assert_eq!((joined.start, joined.end), (2, 14));
        assert_eq!(joined.to_string(), "1:3");
        assert_eq!(Span::dummy().to(a), a);
    }
}
