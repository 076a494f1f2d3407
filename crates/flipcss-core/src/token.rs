//! Lossless CSS tokenizer.
//!
//! Every byte of the input belongs to exactly one token, so concatenating the
//! token texts reproduces the source. Comments, strings and `url(...)` are
//! single tokens; the structural parser never looks inside them.

use crate::error::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Ident,
    /// `name(`, the text includes the opening parenthesis.
    Function,
    AtKeyword,
    Hash,
    Str,
    /// Whole `url(...)` literal, quoted or not.
    Url,
    /// Number, percentage or dimension.
    Number,
    Colon,
    Semicolon,
    Comma,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Delim,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub span: Span,
}

impl Token<'_> {
    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_delim(&self, ch: char) -> bool {
        self.kind == TokenKind::Delim && self.text.len() == ch.len_utf8() && self.text.starts_with(ch)
    }

    /// Whitespace and comments carry no structure.
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }
}

pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Tokenizer::new(input).collect()
}

pub struct Tokenizer<'a> {
    src: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.src[self.pos..].chars().nth(offset)
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.peek() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.src[self.pos..].starts_with(pat)
    }

    fn scan(&mut self) -> Option<TokenKind> {
        let ch = self.peek()?;

        if is_whitespace(ch) {
            self.eat_while(is_whitespace);
            return Some(TokenKind::Whitespace);
        }

        if self.starts_with("/*") {
            self.pos += 2;
            match self.src[self.pos..].find("*/") {
                Some(rel) => self.pos += rel + 2,
                None => self.pos = self.src.len(),
            }
            return Some(TokenKind::Comment);
        }

        if ch == '"' || ch == '\'' {
            self.bump();
            self.consume_string_body(ch);
            return Some(TokenKind::Str);
        }

        if self.starts_number() {
            self.consume_number();
            return Some(TokenKind::Number);
        }

        if self.starts_ident() {
            let start = self.pos;
            self.consume_name();
            if self.peek() == Some('(') {
                self.bump();
                if self.src[start..self.pos - 1].eq_ignore_ascii_case("url") {
                    self.consume_url_body();
                    return Some(TokenKind::Url);
                }
                return Some(TokenKind::Function);
            }
            return Some(TokenKind::Ident);
        }

        self.bump();
        let kind = match ch {
            '@' if self.starts_ident() => {
                self.consume_name();
                TokenKind::AtKeyword
            }
            '#' if self.peek().is_some_and(|c| is_name_char(c) || c == '\\') => {
                self.consume_name();
                TokenKind::Hash
            }
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            _ => TokenKind::Delim,
        };
        Some(kind)
    }

    fn consume_string_body(&mut self, quote: char) {
        while let Some(ch) = self.peek() {
            match ch {
                '\\' => {
                    self.bump();
                    self.bump();
                }
                '\n' => return,
                c if c == quote => {
                    self.bump();
                    return;
                }
                _ => {
                    self.bump();
                }
            }
        }
    }

    /// Everything up to and including the closing parenthesis.
    fn consume_url_body(&mut self) {
        self.eat_while(is_whitespace);
        if let Some(quote @ ('"' | '\'')) = self.peek() {
            self.bump();
            self.consume_string_body(quote);
        }
        while let Some(ch) = self.bump() {
            match ch {
                '\\' => {
                    self.bump();
                }
                ')' => return,
                _ => {}
            }
        }
    }

    fn consume_name(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\\' {
                self.bump();
                self.bump();
            } else if is_name_char(ch) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn consume_number(&mut self) {
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        self.eat_while(|c| c.is_ascii_digit());
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        if matches!(self.peek(), Some('e' | 'E'))
            && self.peek_at(1).is_some_and(|c| c.is_ascii_digit())
        {
            self.bump();
            self.eat_while(|c| c.is_ascii_digit());
        }
        if self.peek() == Some('%') {
            self.bump();
        } else if self.starts_ident() {
            self.consume_name();
        }
    }

    fn starts_number(&self) -> bool {
        let digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        match self.peek() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => digit(self.peek_at(1)),
            Some('+' | '-') => {
                digit(self.peek_at(1)) || (self.peek_at(1) == Some('.') && digit(self.peek_at(2)))
            }
            _ => false,
        }
    }

    fn starts_ident(&self) -> bool {
        match self.peek() {
            Some('-') => matches!(self.peek_at(1), Some(c) if is_name_start(c) || c == '-' || c == '\\'),
            Some('\\') => self.peek_at(1).is_some_and(|c| c != '\n'),
            Some(c) => is_name_start(c),
            None => false,
        }
    }

    fn position_after(&self, text: &str) -> (usize, usize) {
        let mut line = self.line;
        let mut column = self.column;
        for ch in text.chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        (line, column)
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let start = self.pos;
        let kind = self.scan()?;
        let src = self.src;
        let text = &src[start..self.pos];
        let span = Span {
            start,
            end: self.pos,
            line: self.line,
            column: self.column,
        };
        (self.line, self.column) = self.position_after(text);
        Some(Token { kind, text, span })
    }
}

fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0c')
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || !ch.is_ascii()
}

fn is_name_char(ch: char) -> bool {
    is_name_start(ch) || ch.is_ascii_digit() || ch == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokens_cover_the_whole_input() {
        let css = "a.go-left:before{margin:0 1px -2.5em 3%;background:url( 'x.png' ) #fff}/* c */ @media";
        let joined: String = tokenize(css).iter().map(|t| t.text).collect();
        assert_eq!(joined, css);
    }

    #[test]
    fn url_and_strings_are_single_tokens() {
        let tokens = tokenize("url(left;{}.png) \"a;b}\"");
        assert_eq!(tokens[0].kind, TokenKind::Url);
        assert_eq!(tokens[0].text, "url(left;{}.png)");
        assert_eq!(tokens[2].kind, TokenKind::Str);
        assert_eq!(tokens[2].text, "\"a;b}\"");
    }

    #[test]
    fn distinguishes_numbers_idents_and_functions() {
        assert_eq!(
            kinds("-webkit-x -1px rgba(.5"),
            vec![
                TokenKind::Ident,
                TokenKind::Whitespace,
                TokenKind::Number,
                TokenKind::Whitespace,
                TokenKind::Function,
                TokenKind::Number,
            ]
        );
    }

    #[test]
    fn unterminated_comment_runs_to_end() {
        let tokens = tokenize("a{} /* open");
        let last = tokens.last().expect("token");
        assert_eq!(last.kind, TokenKind::Comment);
        assert_eq!(last.text, "/* open");
    }

    #[test]
    fn tracks_line_and_column() {
        let tokens = tokenize("a {\n  float: left;\n}");
        let float = tokens.iter().find(|t| t.text == "float").expect("float");
        assert_eq!((float.span.line, float.span.column), (2, 3));
    }

    #[test]
    fn at_keywords_and_hashes() {
        let tokens = tokenize("@media #left # x");
        assert_eq!(tokens[0].kind, TokenKind::AtKeyword);
        assert_eq!(tokens[2].kind, TokenKind::Hash);
        assert_eq!(tokens[2].text, "#left");
        assert_eq!(tokens[4].kind, TokenKind::Delim);
    }
}
