//! Structural model of a stylesheet.
//!
//! Every node keeps the exact source text it was built from (whitespace and
//! comments included), so rendering an untouched tree reproduces the input
//! byte for byte.

use crate::error::Span;
use crate::options::Direction;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Stylesheet {
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Rule(Rule),
    AtRule(AtRule),
    Comment(Comment),
    Whitespace(String),
    /// Text the parser could not structure; emitted verbatim.
    Raw(Raw),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Full comment text including the `/*` and `*/` delimiters.
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Raw {
    pub text: String,
    pub span: Span,
}

/// Authoring annotation carried by a comment in front of a rule or
/// declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `/*@noflip*/`
    NoFlip,
    /// `/*@ltr-only*/` or `/*@rtl-only*/`
    Only(Direction),
}

impl Comment {
    pub fn marker(&self) -> Option<Marker> {
        let body = self.text.strip_prefix("/*")?.strip_suffix("*/")?.trim();
        let body = body.strip_prefix('!').unwrap_or(body).trim_start();
        match body.to_ascii_lowercase().as_str() {
            "@noflip" => Some(Marker::NoFlip),
            "@ltr-only" => Some(Marker::Only(Direction::Ltr)),
            "@rtl-only" => Some(Marker::Only(Direction::Rtl)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: Selector,
    pub body: Vec<BodyItem>,
    pub span: Span,
    /// Source text of the whole rule, dropped once the rule is rewritten.
    pub(crate) raw: Option<String>,
}

impl Rule {
    pub fn new(selector: Selector, body: Vec<BodyItem>) -> Self {
        Self {
            selector,
            body,
            span: Span::dummy(),
            raw: None,
        }
    }

    /// `body{direction:<dir>;}`
    pub fn direction_preface(direction: Direction) -> Self {
        Self::new(
            Selector {
                tokens: vec![SelectorToken::Type("body".to_string())],
            },
            vec![BodyItem::Declaration(Declaration::new(
                "direction",
                direction.as_str(),
            ))],
        )
    }

    /// Marks the rule as rewritten so it is rendered from its parts.
    pub fn touch(&mut self) {
        self.raw = None;
    }

    pub fn is_touched(&self) -> bool {
        self.raw.is_none()
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.body.iter().filter_map(|item| match item {
            BodyItem::Declaration(decl) => Some(decl),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selector {
    pub tokens: Vec<SelectorToken>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectorToken {
    Whitespace(String),
    Comment(String),
    /// Element name, e.g. `div`.
    Type(String),
    /// Class name without the leading `.`.
    Class(String),
    /// Id without the leading `#`.
    Id(String),
    Attribute(Attribute),
    /// Pseudo-class or pseudo-element with its colons, e.g. `::before`.
    Pseudo(String),
    /// Functional pseudo-class kept whole, e.g. `:not(.left)`.
    PseudoFunction(String),
    /// `>`, `+` or `~`.
    Combinator(String),
    Comma,
    /// Anything else (`*`, `&`, `|`, percentages in keyframes...).
    Other(String),
}

/// `[name matcher value flags]`, each part holding its own source text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Attribute {
    pub name: String,
    pub matcher: String,
    pub value: String,
    pub flags: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Declaration(Declaration),
    Comment(Comment),
    Whitespace(String),
    Raw(Raw),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub property: String,
    /// Source between the property and the value: the colon with any
    /// surrounding whitespace.
    pub colon: String,
    pub value: Vec<ValueToken>,
    pub semicolon: bool,
    pub span: Span,
}

impl Declaration {
    pub fn new(property: &str, value: &str) -> Self {
        Self {
            property: property.to_string(),
            colon: ":".to_string(),
            value: vec![ValueToken::Ident(value.to_string())],
            semicolon: true,
            span: Span::dummy(),
        }
    }

    /// Whether the value contains the keyword (ASCII case-insensitive) as a
    /// top-level component.
    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.value
            .iter()
            .any(|token| matches!(token, ValueToken::Ident(word) if word.eq_ignore_ascii_case(keyword)))
    }

    pub fn value_text(&self) -> String {
        let mut out = String::new();
        for token in &self.value {
            token.write_to(&mut out);
        }
        out.trim().to_string()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValueToken {
    Whitespace(String),
    Comment(String),
    Ident(String),
    Number(String),
    Hash(String),
    Str(String),
    /// Whole `url(...)` literal.
    Url(String),
    /// `name(args)`; an empty name is a bare parenthesized group.
    Function {
        name: String,
        args: Vec<ValueToken>,
        closed: bool,
    },
    Delim(String),
}

impl ValueToken {
    pub fn is_trivia(&self) -> bool {
        matches!(self, ValueToken::Whitespace(_) | ValueToken::Comment(_))
    }

    pub fn is_delim(&self, delim: &str) -> bool {
        matches!(self, ValueToken::Delim(d) if d == delim)
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        match self {
            ValueToken::Whitespace(text)
            | ValueToken::Comment(text)
            | ValueToken::Ident(text)
            | ValueToken::Number(text)
            | ValueToken::Hash(text)
            | ValueToken::Str(text)
            | ValueToken::Url(text)
            | ValueToken::Delim(text) => out.push_str(text),
            ValueToken::Function { name, args, closed } => {
                out.push_str(name);
                out.push('(');
                for arg in args {
                    arg.write_to(out);
                }
                if *closed {
                    out.push(')');
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// Name without the `@`.
    pub name: String,
    /// Source between the name and the block or terminator.
    pub prelude: String,
    pub block: AtRuleBlock,
    pub span: Span,
}

impl AtRule {
    /// Lowercased name with any vendor prefix removed.
    pub fn unprefixed_name(&self) -> String {
        unprefixed(&self.name)
    }
}

/// Lowercases a CSS name and drops a `-vendor-` prefix.
pub(crate) fn unprefixed(name: &str) -> String {
    let name = name.to_ascii_lowercase();
    match name.strip_prefix('-').and_then(|rest| rest.split_once('-')) {
        Some((_, base)) => base.to_string(),
        None => name,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AtRuleBlock {
    /// `@import ...;`, possibly missing the `;` at end of input.
    Statement { semicolon: bool },
    /// Grouping rule whose body holds nested items.
    Rules(Vec<Item>),
    /// Block kept verbatim, without its braces.
    Opaque(String),
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                SelectorToken::Whitespace(text)
                | SelectorToken::Comment(text)
                | SelectorToken::Type(text)
                | SelectorToken::Pseudo(text)
                | SelectorToken::PseudoFunction(text)
                | SelectorToken::Combinator(text)
                | SelectorToken::Other(text) => f.write_str(text)?,
                SelectorToken::Class(name) => write!(f, ".{}", name)?,
                SelectorToken::Id(name) => write!(f, "#{}", name)?,
                SelectorToken::Attribute(attr) => write!(
                    f,
                    "[{}{}{}{}]",
                    attr.name, attr.matcher, attr.value, attr.flags
                )?,
                SelectorToken::Comma => f.write_str(",")?,
            }
        }
        Ok(())
    }
}
