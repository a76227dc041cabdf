//! Tokenizer for Rego source text.
//!
//! Newlines are kept as tokens because they terminate rules and single-line bodies.
//! Comments are not tokens: they are collected on the side in source order.

use crate::ast::{Comment, Location};
use crate::error::SyntaxError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Keyword {
    Package,
    Import,
    As,
    Default,
    Else,
    Not,
    Some,
    Every,
    In,
    With,
    If,
    Contains,
    True,
    False,
    Null,
}

impl Keyword {
    fn from_ident(s: &str) -> Option<Self> {
        Some(match s {
            "package" => Keyword::Package,
            "import" => Keyword::Import,
            "as" => Keyword::As,
            "default" => Keyword::Default,
            "else" => Keyword::Else,
            "not" => Keyword::Not,
            "some" => Keyword::Some,
            "every" => Keyword::Every,
            "in" => Keyword::In,
            "with" => Keyword::With,
            "if" => Keyword::If,
            "contains" => Keyword::Contains,
            "true" => Keyword::True,
            "false" => Keyword::False,
            "null" => Keyword::Null,
            _ => return None,
        })
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Keyword::Package => "package",
            Keyword::Import => "import",
            Keyword::As => "as",
            Keyword::Default => "default",
            Keyword::Else => "else",
            Keyword::Not => "not",
            Keyword::Some => "some",
            Keyword::Every => "every",
            Keyword::In => "in",
            Keyword::With => "with",
            Keyword::If => "if",
            Keyword::Contains => "contains",
            Keyword::True => "true",
            Keyword::False => "false",
            Keyword::Null => "null",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Punct {
    Assign,
    Unify,
    Equal,
    NotEqual,
    Lt,
    Lte,
    Gt,
    Gte,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pipe,
    Amp,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semicolon,
    Colon,
    Dot,
}

impl Punct {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Punct::Assign => ":=",
            Punct::Unify => "=",
            Punct::Equal => "==",
            Punct::NotEqual => "!=",
            Punct::Lt => "<",
            Punct::Lte => "<=",
            Punct::Gt => ">",
            Punct::Gte => ">=",
            Punct::Plus => "+",
            Punct::Minus => "-",
            Punct::Star => "*",
            Punct::Slash => "/",
            Punct::Percent => "%",
            Punct::Pipe => "|",
            Punct::Amp => "&",
            Punct::LParen => "(",
            Punct::RParen => ")",
            Punct::LBrack => "[",
            Punct::RBrack => "]",
            Punct::LBrace => "{",
            Punct::RBrace => "}",
            Punct::Comma => ",",
            Punct::Semicolon => ";",
            Punct::Colon => ":",
            Punct::Dot => ".",
        }
    }

    /// Operators that join two terms into an expression.
    pub(crate) fn is_infix(self) -> bool {
        matches!(
            self,
            Punct::Assign
                | Punct::Unify
                | Punct::Equal
                | Punct::NotEqual
                | Punct::Lt
                | Punct::Lte
                | Punct::Gt
                | Punct::Gte
                | Punct::Plus
                | Punct::Minus
                | Punct::Star
                | Punct::Slash
                | Punct::Percent
                | Punct::Pipe
                | Punct::Amp
        )
    }

    pub(crate) fn is_closing(self) -> bool {
        matches!(self, Punct::RParen | Punct::RBrack | Punct::RBrace)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident(String),
    Keyword(Keyword),
    /// Decoded string value (quoted and raw strings alike).
    String(String),
    /// Number literal exactly as written.
    Number(String),
    Punct(Punct),
    Newline,
    Eof,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub loc: Location,
}

impl Token {
    pub(crate) fn is_punct(&self, p: Punct) -> bool {
        self.kind == TokenKind::Punct(p)
    }

    pub(crate) fn is_keyword(&self, k: Keyword) -> bool {
        self.kind == TokenKind::Keyword(k)
    }

    /// Short description used in error messages.
    pub(crate) fn describe(&self) -> String {
        match &self.kind {
            TokenKind::Ident(s) => format!("identifier `{s}`"),
            TokenKind::Keyword(k) => format!("keyword `{}`", k.as_str()),
            TokenKind::String(_) => "string".to_string(),
            TokenKind::Number(n) => format!("number `{n}`"),
            TokenKind::Punct(p) => format!("`{}`", p.as_str()),
            TokenKind::Newline => "newline".to_string(),
            TokenKind::Eof => "eof".to_string(),
        }
    }
}

#[derive(Debug)]
pub(crate) struct Lexed {
    pub tokens: Vec<Token>,
    pub comments: Vec<Comment>,
}

pub(crate) fn tokenize(path: &str, text: &str) -> Result<Lexed, SyntaxError> {
    Lexer {
        path,
        chars: text.chars().collect(),
        pos: 0,
        line: 1,
        col: 1,
        tokens: Vec::new(),
        comments: Vec::new(),
    }
    .run()
}

struct Lexer<'a> {
    path: &'a str,
    chars: Vec<char>,
    pos: usize,
    line: u32,
    col: u32,
    tokens: Vec<Token>,
    comments: Vec<Comment>,
}

impl Lexer<'_> {
    fn run(mut self) -> Result<Lexed, SyntaxError> {
        while let Some(c) = self.peek() {
            let loc = self.loc();
            match c {
                ' ' | '\t' | '\r' => {
                    self.bump();
                }
                '\n' => {
                    self.bump();
                    self.push(TokenKind::Newline, loc);
                }
                '#' => self.comment(loc),
                '"' => {
                    let s = self.quoted_string(loc)?;
                    self.push(TokenKind::String(s), loc);
                }
                '`' => {
                    let s = self.raw_string(loc)?;
                    self.push(TokenKind::String(s), loc);
                }
                c if c.is_ascii_digit() => {
                    let n = self.number();
                    self.push(TokenKind::Number(n), loc);
                }
                c if c.is_ascii_alphabetic() || c == '_' => {
                    let ident = self.ident();
                    let kind = match Keyword::from_ident(&ident) {
                        Some(k) => TokenKind::Keyword(k),
                        None => TokenKind::Ident(ident),
                    };
                    self.push(kind, loc);
                }
                _ => {
                    let p = self.punct(loc)?;
                    self.push(TokenKind::Punct(p), loc);
                }
            }
        }
        let loc = self.loc();
        self.push(TokenKind::Eof, loc);
        Ok(Lexed {
            tokens: self.tokens,
            comments: self.comments,
        })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn loc(&self) -> Location {
        Location {
            line: self.line,
            col: self.col,
        }
    }

    fn push(&mut self, kind: TokenKind, loc: Location) {
        self.tokens.push(Token { kind, loc });
    }

    fn error(&self, loc: Location, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.path, loc, message)
    }

    fn comment(&mut self, loc: Location) {
        self.bump();
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            text.push(c);
            self.bump();
        }
        // A CRLF line ending is not part of the comment.
        if text.ends_with('\r') {
            text.pop();
        }
        self.comments.push(Comment {
            text,
            location: loc,
        });
    }

    fn ident(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn number(&mut self) -> String {
        let mut s = String::new();
        self.digits(&mut s);
        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            s.push('.');
            self.bump();
            self.digits(&mut s);
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            let sign = matches!(self.peek_next(), Some('+' | '-'));
            let digit_at = if sign { self.pos + 2 } else { self.pos + 1 };
            if self.chars.get(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                for _ in 0..(if sign { 2 } else { 1 }) {
                    if let Some(c) = self.bump() {
                        s.push(c);
                    }
                }
                self.digits(&mut s);
            }
        }
        s
    }

    fn digits(&mut self, out: &mut String) {
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                out.push(c);
                self.bump();
            } else {
                break;
            }
        }
    }

    fn quoted_string(&mut self, start: Location) -> Result<String, SyntaxError> {
        self.bump();
        let mut out = String::new();
        loop {
            let loc = self.loc();
            match self.bump() {
                None | Some('\n') => return Err(self.error(start, "non-terminated string")),
                Some('"') => return Ok(out),
                Some('\\') => {
                    let escaped = match self.bump() {
                        Some('"') => '"',
                        Some('\\') => '\\',
                        Some('/') => '/',
                        Some('b') => '\u{8}',
                        Some('f') => '\u{c}',
                        Some('n') => '\n',
                        Some('r') => '\r',
                        Some('t') => '\t',
                        Some('u') => self.unicode_escape(loc)?,
                        _ => return Err(self.error(loc, "illegal escape sequence")),
                    };
                    out.push(escaped);
                }
                Some(c) => out.push(c),
            }
        }
    }

    fn unicode_escape(&mut self, loc: Location) -> Result<char, SyntaxError> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self
                .bump()
                .and_then(|c| c.to_digit(16))
                .ok_or_else(|| self.error(loc, "illegal unicode escape"))?;
            code = code * 16 + digit;
        }
        // Lone surrogates have no char representation; keep them visible.
        Ok(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
    }

    fn raw_string(&mut self, start: Location) -> Result<String, SyntaxError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(start, "non-terminated raw string")),
                Some('`') => return Ok(out),
                Some(c) => out.push(c),
            }
        }
    }

    fn punct(&mut self, loc: Location) -> Result<Punct, SyntaxError> {
        let Some(c) = self.bump() else {
            return Err(self.error(loc, "unexpected eof"));
        };
        let next = self.peek();
        let two = |lexer: &mut Self, p: Punct| {
            lexer.bump();
            p
        };
        let p = match (c, next) {
            (':', Some('=')) => two(self, Punct::Assign),
            ('=', Some('=')) => two(self, Punct::Equal),
            ('!', Some('=')) => two(self, Punct::NotEqual),
            ('<', Some('=')) => two(self, Punct::Lte),
            ('>', Some('=')) => two(self, Punct::Gte),
            (':', _) => Punct::Colon,
            ('=', _) => Punct::Unify,
            ('<', _) => Punct::Lt,
            ('>', _) => Punct::Gt,
            ('+', _) => Punct::Plus,
            ('-', _) => Punct::Minus,
            ('*', _) => Punct::Star,
            ('/', _) => Punct::Slash,
            ('%', _) => Punct::Percent,
            ('|', _) => Punct::Pipe,
            ('&', _) => Punct::Amp,
            ('(', _) => Punct::LParen,
            (')', _) => Punct::RParen,
            ('[', _) => Punct::LBrack,
            (']', _) => Punct::RBrack,
            ('{', _) => Punct::LBrace,
            ('}', _) => Punct::RBrace,
            (',', _) => Punct::Comma,
            (';', _) => Punct::Semicolon,
            ('.', _) => Punct::Dot,
            (other, _) => return Err(self.error(loc, format!("illegal token `{other}`"))),
        };
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        tokenize("t.rego", text)
            .expect("tokenize")
            .tokens
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn keywords_identifiers_and_punctuation() {
        assert_eq!(
            kinds("deny[msg] {\n"),
            vec![
                TokenKind::Ident("deny".to_string()),
                TokenKind::Punct(Punct::LBrack),
                TokenKind::Ident("msg".to_string()),
                TokenKind::Punct(Punct::RBrack),
                TokenKind::Punct(Punct::LBrace),
                TokenKind::Newline,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("x := 1 != 2.5e3"),
            vec![
                TokenKind::Ident("x".to_string()),
                TokenKind::Punct(Punct::Assign),
                TokenKind::Number("1".to_string()),
                TokenKind::Punct(Punct::NotEqual),
                TokenKind::Number("2.5e3".to_string()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("package")[0],
            TokenKind::Keyword(Keyword::Package)
        );
    }

    #[test]
    fn strings_are_decoded() {
        assert_eq!(
            kinds(r#""a\"b\nA""#)[0],
            TokenKind::String("a\"b\nA".to_string())
        );
        assert_eq!(
            kinds("`raw\\n\nline`")[0],
            TokenKind::String("raw\\n\nline".to_string())
        );
    }

    #[test]
    fn comments_are_collected_not_tokenized() {
        let lexed = tokenize("t.rego", "# first\nx = 1 # trailing\r\n#\n").expect("tokenize");
        let texts: Vec<&str> = lexed.comments.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec![" first", " trailing", ""]);
        assert_eq!(lexed.comments[1].location, Location { line: 2, col: 7 });
        assert!(
            lexed
                .tokens
                .iter()
                .all(|t| !matches!(&t.kind, TokenKind::Ident(s) if s == "first"))
        );
    }

    #[test]
    fn hash_inside_string_is_not_a_comment() {
        let lexed = tokenize("t.rego", "x = \"a # b\"").expect("tokenize");
        assert!(lexed.comments.is_empty());
    }

    #[test]
    fn unterminated_string_is_rejected() {
        let err = tokenize("t.rego", "x = \"abc\n").unwrap_err();
        assert_eq!(err.message, "non-terminated string");
        assert_eq!((err.line, err.col), (1, 5));
    }

    #[test]
    fn illegal_character_is_rejected() {
        let err = tokenize("t.rego", "x = 1\ny = $").unwrap_err();
        assert_eq!(err.message, "illegal token `$`");
        assert_eq!((err.line, err.col), (2, 5));
    }

    #[test]
    fn positions_are_one_based() {
        let lexed = tokenize("t.rego", "a\n  b").expect("tokenize");
        assert_eq!(lexed.tokens[0].loc, Location { line: 1, col: 1 });
        assert_eq!(lexed.tokens[2].loc, Location { line: 2, col: 3 });
    }
}
