use crate::ast::{
    unprefixed, AtRule, AtRuleBlock, Attribute, BodyItem, Comment, Declaration, Item, Raw, Rule,
    Selector, SelectorToken, Stylesheet, ValueToken,
};
use crate::error::Span;
use crate::token::{tokenize, Token, TokenKind};

/// At-rules whose block holds rules rather than declarations.
const GROUPING_AT_RULES: &[&str] = &[
    "media",
    "supports",
    "document",
    "layer",
    "container",
    "scope",
    "starting-style",
    "keyframes",
];

/// Parse CSS into a [`Stylesheet`].
///
/// Never fails: anything that does not look like a rule, at-rule or
/// declaration becomes a raw item that is written back untouched.
pub fn parse(input: &str) -> Stylesheet {
    let tokens = tokenize(input);
    let parser = Parser {
        src: input,
        tokens: &tokens,
    };
    Stylesheet {
        items: parser.parse_items(0, tokens.len()),
    }
}

struct Parser<'s, 't> {
    src: &'s str,
    tokens: &'t [Token<'s>],
}

impl<'s> Parser<'s, '_> {
    fn parse_items(&self, lo: usize, hi: usize) -> Vec<Item> {
        let mut items = Vec::new();
        let mut pos = lo;

        while pos < hi {
            let token = &self.tokens[pos];
            match token.kind {
                TokenKind::Whitespace => {
                    items.push(Item::Whitespace(token.text.to_string()));
                    pos += 1;
                }
                TokenKind::Comment => {
                    items.push(Item::Comment(Comment {
                        text: token.text.to_string(),
                        span: token.span,
                    }));
                    pos += 1;
                }
                TokenKind::RBrace => {
                    tracing::trace!(at = %token.span, "stray '}}' kept as raw text");
                    items.push(Item::Raw(self.raw(pos, pos + 1)));
                    pos += 1;
                }
                TokenKind::AtKeyword => pos = self.parse_at_rule(pos, hi, &mut items),
                _ => pos = self.parse_rule(pos, hi, &mut items),
            }
        }

        items
    }

    fn parse_rule(&self, start: usize, hi: usize, items: &mut Vec<Item>) -> usize {
        let open = match self.find_prelude_end(start, hi) {
            (idx, Some(TokenKind::LBrace)) => idx,
            (idx, Some(TokenKind::Semicolon)) => {
                tracing::trace!(at = %self.tokens[start].span, "selector without block kept as raw text");
                items.push(Item::Raw(self.raw(start, idx + 1)));
                return idx + 1;
            }
            (idx, _) => {
                tracing::trace!(at = %self.tokens[start].span, "unterminated rule kept as raw text");
                items.push(Item::Raw(self.raw(start, idx)));
                return idx;
            }
        };

        let Some(close) = self.find_block_end(open, hi) else {
            tracing::trace!(at = %self.tokens[start].span, "unclosed block kept as raw text");
            items.push(Item::Raw(self.raw(start, hi)));
            return hi;
        };

        let span = self.span(start, close + 1);
        items.push(Item::Rule(Rule {
            selector: self.parse_selector(start, open),
            body: self.parse_body(open + 1, close),
            span,
            raw: Some(self.src[span.start..span.end].to_string()),
        }));
        close + 1
    }

    fn parse_at_rule(&self, start: usize, hi: usize, items: &mut Vec<Item>) -> usize {
        let name = self.tokens[start].text[1..].to_string();
        let (end, stop) = self.find_prelude_end(start + 1, hi);
        let prelude = self.text(start + 1, end);

        let (block, next) = match stop {
            Some(TokenKind::Semicolon) => (AtRuleBlock::Statement { semicolon: true }, end + 1),
            None => (AtRuleBlock::Statement { semicolon: false }, end),
            Some(TokenKind::LBrace) => {
                let Some(close) = self.find_block_end(end, hi) else {
                    tracing::trace!(at = %self.tokens[start].span, "unclosed at-rule kept as raw text");
                    items.push(Item::Raw(self.raw(start, hi)));
                    return hi;
                };
                let base = unprefixed(&name);
                let block = if GROUPING_AT_RULES.contains(&base.as_str()) {
                    AtRuleBlock::Rules(self.parse_items(end + 1, close))
                } else {
                    AtRuleBlock::Opaque(self.text(end + 1, close))
                };
                (block, close + 1)
            }
            Some(_) => {
                items.push(Item::Raw(self.raw(start, end)));
                return end;
            }
        };

        items.push(Item::AtRule(AtRule {
            name,
            prelude,
            block,
            span: self.span(start, next),
        }));
        next
    }

    /// Finds the `{` or `;` ending a prelude, skipping bracketed groups.
    /// Stops early in front of a `}` that would close an enclosing block.
    fn find_prelude_end(&self, lo: usize, hi: usize) -> (usize, Option<TokenKind>) {
        let mut depth = 0usize;
        for idx in lo..hi {
            match self.tokens[idx].kind {
                TokenKind::Function | TokenKind::LParen | TokenKind::LBracket => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                kind @ (TokenKind::LBrace | TokenKind::Semicolon) if depth == 0 => {
                    return (idx, Some(kind));
                }
                TokenKind::RBrace => return (idx, Some(TokenKind::RBrace)),
                _ => {}
            }
        }
        (hi, None)
    }

    fn find_block_end(&self, open: usize, hi: usize) -> Option<usize> {
        let mut depth = 0usize;
        for idx in open..hi {
            match self.tokens[idx].kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(idx);
                    }
                }
                _ => {}
            }
        }
        None
    }

    fn parse_body(&self, lo: usize, hi: usize) -> Vec<BodyItem> {
        let mut body = Vec::new();
        let mut pos = lo;

        while pos < hi {
            let token = &self.tokens[pos];
            match token.kind {
                TokenKind::Whitespace => {
                    body.push(BodyItem::Whitespace(token.text.to_string()));
                    pos += 1;
                }
                TokenKind::Comment => {
                    body.push(BodyItem::Comment(Comment {
                        text: token.text.to_string(),
                        span: token.span,
                    }));
                    pos += 1;
                }
                _ => {
                    let (end, nested) = self.find_declaration_end(pos, hi);
                    let semicolon = end < hi && self.tokens[end].is(TokenKind::Semicolon);
                    let decl = if nested {
                        None
                    } else {
                        self.parse_declaration(pos, end, semicolon)
                    };
                    let next = if semicolon { end + 1 } else { end };
                    match decl {
                        Some(decl) => body.push(BodyItem::Declaration(decl)),
                        None => {
                            tracing::trace!(at = %token.span, "unrecognized declaration kept as raw text");
                            body.push(BodyItem::Raw(self.raw(pos, next)));
                        }
                    }
                    pos = next;
                }
            }
        }

        body
    }

    /// End of the declaration starting at `lo`: the index of its `;`, or the
    /// index after a nested block, or `hi`. The flag reports a nested block.
    fn find_declaration_end(&self, lo: usize, hi: usize) -> (usize, bool) {
        let mut parens = 0usize;
        let mut braces = 0usize;
        let mut nested = false;
        for idx in lo..hi {
            match self.tokens[idx].kind {
                TokenKind::Function | TokenKind::LParen | TokenKind::LBracket => parens += 1,
                TokenKind::RParen | TokenKind::RBracket => parens = parens.saturating_sub(1),
                TokenKind::LBrace => {
                    braces += 1;
                    nested = true;
                }
                TokenKind::RBrace => {
                    braces = braces.saturating_sub(1);
                    if braces == 0 {
                        return (idx + 1, nested);
                    }
                }
                TokenKind::Semicolon if parens == 0 && braces == 0 => return (idx, nested),
                _ => {}
            }
        }
        (hi, nested)
    }

    fn parse_declaration(&self, lo: usize, hi: usize, semicolon: bool) -> Option<Declaration> {
        let property = &self.tokens[lo];
        if !property.is(TokenKind::Ident) {
            return None;
        }

        let mut pos = lo + 1;
        while pos < hi && self.tokens[pos].is_trivia() {
            pos += 1;
        }
        if pos >= hi || !self.tokens[pos].is(TokenKind::Colon) {
            return None;
        }
        pos += 1;
        while pos < hi && self.tokens[pos].is(TokenKind::Whitespace) {
            pos += 1;
        }

        Some(Declaration {
            property: property.text.to_string(),
            colon: self.text(lo + 1, pos),
            value: self.parse_values(pos, hi),
            semicolon,
            span: self.span(lo, hi),
        })
    }

    fn parse_values(&self, lo: usize, hi: usize) -> Vec<ValueToken> {
        let mut values = Vec::new();
        let mut pos = lo;

        while pos < hi {
            let token = &self.tokens[pos];
            let text = token.text.to_string();
            let value = match token.kind {
                TokenKind::Whitespace => ValueToken::Whitespace(text),
                TokenKind::Comment => ValueToken::Comment(text),
                TokenKind::Ident => ValueToken::Ident(text),
                TokenKind::Number => ValueToken::Number(text),
                TokenKind::Hash => ValueToken::Hash(text),
                TokenKind::Str => ValueToken::Str(text),
                TokenKind::Url => ValueToken::Url(text),
                TokenKind::Function | TokenKind::LParen => {
                    let close = self.find_paren_end(pos, hi);
                    let closed = close < hi;
                    values.push(ValueToken::Function {
                        name: token.text[..token.text.len() - 1].to_string(),
                        args: self.parse_values(pos + 1, close),
                        closed,
                    });
                    pos = if closed { close + 1 } else { hi };
                    continue;
                }
                _ => ValueToken::Delim(text),
            };
            values.push(value);
            pos += 1;
        }

        values
    }

    fn find_paren_end(&self, open: usize, hi: usize) -> usize {
        let mut depth = 0usize;
        for idx in open..hi {
            match self.tokens[idx].kind {
                TokenKind::Function | TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return idx;
                    }
                }
                _ => {}
            }
        }
        hi
    }

    fn parse_selector(&self, lo: usize, hi: usize) -> Selector {
        let mut tokens = Vec::new();
        let mut pos = lo;

        while pos < hi {
            let token = &self.tokens[pos];
            let text = token.text.to_string();
            let next_is = |kind: TokenKind| pos + 1 < hi && self.tokens[pos + 1].is(kind);

            let (selector_token, consumed) = match token.kind {
                TokenKind::Whitespace => (SelectorToken::Whitespace(text), 1),
                TokenKind::Comment => (SelectorToken::Comment(text), 1),
                TokenKind::Ident => (SelectorToken::Type(text), 1),
                TokenKind::Hash => (SelectorToken::Id(text[1..].to_string()), 1),
                TokenKind::Comma => (SelectorToken::Comma, 1),
                TokenKind::Delim if token.is_delim('.') && next_is(TokenKind::Ident) => (
                    SelectorToken::Class(self.tokens[pos + 1].text.to_string()),
                    2,
                ),
                TokenKind::Delim
                    if token.is_delim('>') || token.is_delim('+') || token.is_delim('~') =>
                {
                    (SelectorToken::Combinator(text), 1)
                }
                TokenKind::Colon => self.parse_pseudo(pos, hi),
                TokenKind::LBracket => {
                    let close = (pos + 1..hi)
                        .find(|&idx| self.tokens[idx].is(TokenKind::RBracket))
                        .unwrap_or(hi);
                    if close == hi {
                        (SelectorToken::Other(self.text(pos, hi)), hi - pos)
                    } else {
                        (
                            SelectorToken::Attribute(self.parse_attribute(pos + 1, close)),
                            close + 1 - pos,
                        )
                    }
                }
                _ => (SelectorToken::Other(text), 1),
            };

            tokens.push(selector_token);
            pos += consumed;
        }

        Selector { tokens }
    }

    fn parse_pseudo(&self, lo: usize, hi: usize) -> (SelectorToken, usize) {
        let mut pos = lo + 1;
        if pos < hi && self.tokens[pos].is(TokenKind::Colon) {
            pos += 1;
        }
        if pos >= hi {
            return (SelectorToken::Other(self.text(lo, pos)), pos - lo);
        }
        match self.tokens[pos].kind {
            TokenKind::Ident => (SelectorToken::Pseudo(self.text(lo, pos + 1)), pos + 1 - lo),
            TokenKind::Function => {
                let close = self.find_paren_end(pos, hi);
                let end = (close + 1).min(hi);
                (SelectorToken::PseudoFunction(self.text(lo, end)), end - lo)
            }
            _ => (SelectorToken::Other(self.text(lo, pos)), pos - lo),
        }
    }

    fn parse_attribute(&self, lo: usize, hi: usize) -> Attribute {
        let Some(eq) = (lo..hi).find(|&idx| self.tokens[idx].is_delim('=')) else {
            return Attribute {
                name: self.text(lo, hi),
                ..Attribute::default()
            };
        };

        let matcher_start = if eq > lo
            && ["~", "|", "^", "$", "*"]
                .iter()
                .any(|d| self.tokens[eq - 1].text == *d)
        {
            eq - 1
        } else {
            eq
        };

        let mut value_start = eq + 1;
        while value_start < hi && self.tokens[value_start].is_trivia() {
            value_start += 1;
        }
        let value_end = (value_start + 1).min(hi);

        Attribute {
            name: self.text(lo, matcher_start),
            matcher: self.text(matcher_start, value_start),
            value: self.text(value_start, value_end),
            flags: self.text(value_end, hi),
        }
    }

    fn text(&self, lo: usize, hi: usize) -> String {
        if lo >= hi {
            return String::new();
        }
        self.src[self.tokens[lo].span.start..self.tokens[hi - 1].span.end].to_string()
    }

    fn span(&self, lo: usize, hi: usize) -> Span {
        if lo >= hi {
            return Span::dummy();
        }
        self.tokens[lo].span.to(self.tokens[hi - 1].span)
    }

    fn raw(&self, lo: usize, hi: usize) -> Raw {
        Raw {
            text: self.text(lo, hi),
            span: self.span(lo, hi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::render;

    fn first_rule(sheet: &Stylesheet) -> &Rule {
        sheet
            .items
            .iter()
            .find_map(|item| match item {
                Item::Rule(rule) => Some(rule),
                _ => None,
            })
            .expect("rule")
    }

    #[test]
    fn parses_rule_with_declarations() {
        let sheet = parse(".foo { float: left; margin : 0 1px 2px 3px }");
        let rule = first_rule(&sheet);
        assert_eq!(rule.selector.to_string(), ".foo ");
        let decls: Vec<_> = rule.declarations().collect();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].property, "float");
        assert_eq!(decls[0].colon, ": ");
        assert!(decls[0].semicolon);
        assert_eq!(decls[1].property, "margin");
        assert_eq!(decls[1].colon, " : ");
        assert_eq!(decls[1].value_text(), "0 1px 2px 3px");
        assert!(!decls[1].semicolon);
    }

    #[test]
    fn round_trips_untouched_input() {
        let css = "@charset \"utf-8\";\n/* head */\na.go-left:before, [dir=\"left\"] > b::after {\n  background: url(left.png) no-repeat left top !important;\n  border-radius: 1px 2px / 3px;\n}\n@media screen and (max-width: 10px) { .x { padding: 0 1px } }\n@font-face { font-family: x; src: url(a.woff) }\n";
        let sheet = parse(css);
        assert_eq!(render(&sheet), css);
    }

    #[test]
    fn round_trips_malformed_input() {
        for css in [
            "a { color: red",
            "} a { float: left }",
            "a { *zoom: 1; float: left }",
            "a; b { }",
            "a { &:hover { color: red } float: left }",
            "@media screen { a { float: left }",
            "@import url(x.css)",
            "a { color: red; ; }",
            "/* open",
        ] {
            assert_eq!(render(&parse(css)), css, "input: {}", css);
        }
    }

    #[test]
    fn selector_distinguishes_pseudo_elements_and_functions() {
        let sheet = parse("a.left:before:not(:after)::after{}");
        let tokens = &first_rule(&sheet).selector.tokens;
        assert_eq!(
            tokens,
            &vec![
                SelectorToken::Type("a".to_string()),
                SelectorToken::Class("left".to_string()),
                SelectorToken::Pseudo(":before".to_string()),
                SelectorToken::PseudoFunction(":not(:after)".to_string()),
                SelectorToken::Pseudo("::after".to_string()),
            ]
        );
    }

    #[test]
    fn parses_attribute_parts() {
        let sheet = parse("[ data-side ~= \"left\" i]{}");
        match &first_rule(&sheet).selector.tokens[0] {
            SelectorToken::Attribute(attr) => {
                assert_eq!(attr.name, " data-side ");
                assert_eq!(attr.matcher, "~= ");
                assert_eq!(attr.value, "\"left\"");
                assert_eq!(attr.flags, " i");
            }
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn grouping_at_rules_hold_rules() {
        let sheet = parse("@media print { a { float: left } } @font-face { src: x }");
        let blocks: Vec<_> = sheet
            .items
            .iter()
            .filter_map(|item| match item {
                Item::AtRule(at) => Some(&at.block),
                _ => None,
            })
            .collect();
        assert!(matches!(blocks[0], AtRuleBlock::Rules(items) if items.iter().any(|i| matches!(i, Item::Rule(_)))));
        assert!(matches!(blocks[1], AtRuleBlock::Opaque(body) if body == " src: x "));
    }

    #[test]
    fn nested_functions_become_value_trees() {
        let sheet = parse("a{background:rgba(0,0,0,.5) url(x.png) calc((1px + 2px))}");
        let decl = first_rule(&sheet).declarations().next().expect("decl").clone();
        assert!(matches!(&decl.value[0], ValueToken::Function { name, closed: true, .. } if name == "rgba"));
        assert!(matches!(&decl.value[2], ValueToken::Url(url) if url == "url(x.png)"));
        match &decl.value[4] {
            ValueToken::Function { name, args, .. } => {
                assert_eq!(name, "calc");
                assert!(matches!(&args[0], ValueToken::Function { name, .. } if name.is_empty()));
            }
            other => panic!("unexpected token {:?}", other),
        }
    }

    #[test]
    fn invalid_segments_become_raw_body_items() {
        let sheet = parse("a { *zoom: 1; float: left }");
        let rule = first_rule(&sheet);
        assert!(rule
            .body
            .iter()
            .any(|item| matches!(item, BodyItem::Raw(raw) if raw.text == "*zoom: 1;")));
        assert_eq!(rule.declarations().count(), 1);
    }
}
