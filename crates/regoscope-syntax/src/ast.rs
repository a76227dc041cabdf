//! Structural Rego AST.
//!
//! Only the module skeleton is modelled: package, imports, rule heads and comments.
//! Rule bodies and head values are kept as token runs that render canonically.

use crate::lexer::{Keyword, Punct, Token, TokenKind};
use std::fmt;

/// 1-based source position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: u32,
    pub col: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    pub package: Package,
    pub imports: Vec<Import>,
    pub rules: Vec<Rule>,
    pub comments: Vec<Comment>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
    /// Package path rooted at `data`.
    pub path: Ref,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
    pub path: Ref,
    pub alias: Option<String>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Comment {
    /// Text after the `#` marker, verbatim.
    pub text: String,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rule {
    pub default: bool,
    pub head: Head,
    pub body: Option<Body>,
    pub else_chain: Vec<Else>,
    pub location: Location,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Unify,
    /// `:=`
    Assign,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignOp::Unify => "=",
            AssignOp::Assign => ":=",
        }
    }
}

/// Declarative part of a rule: `name[key]`, `name(args) = value`, `name contains key`, ...
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head {
    pub reference: Ref,
    pub args: Option<Vec<Term>>,
    pub contains: Option<Term>,
    pub value: Option<(AssignOp, Term)>,
}

impl Head {
    /// Leading variable of the head reference (`deny` for `deny[msg]`).
    pub fn name(&self) -> &str {
        self.reference.root()
    }

    /// The key of a `name[key]` or `name contains key` head, if any.
    pub fn key(&self) -> Option<&Term> {
        if let Some(t) = &self.contains {
            return Some(t);
        }
        match self.reference.parts.last() {
            Some(RefPart::Term(t)) if self.reference.parts.len() > 1 => Some(t),
            _ => None,
        }
    }
}

impl fmt::Display for Head {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reference)?;
        if let Some(args) = &self.args {
            f.write_str("(")?;
            for (i, a) in args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{a}")?;
            }
            f.write_str(")")?;
        }
        if let Some(key) = &self.contains {
            write!(f, " contains {key}")?;
        }
        if let Some((op, value)) = &self.value {
            write!(f, " {} {value}", op.as_str())?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Else {
    pub value: Option<(AssignOp, Term)>,
    pub body: Option<Body>,
    pub location: Location,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefPart {
    /// Leading variable, e.g. `data` or `deny`.
    Var(String),
    /// String key, written `.key` or `["key"]`.
    Key(String),
    /// Any other bracketed term, e.g. `[x]`.
    Term(Term),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ref {
    pub parts: Vec<RefPart>,
}

impl Ref {
    pub fn root(&self) -> &str {
        match self.parts.first() {
            Some(RefPart::Var(v)) => v,
            _ => "",
        }
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            match part {
                RefPart::Var(v) if i == 0 => f.write_str(v)?,
                RefPart::Var(v) => write!(f, "[{v}]")?,
                RefPart::Key(k) if is_ident(k) => write!(f, ".{k}")?,
                RefPart::Key(k) => write!(f, "[{}]", quote(k))?,
                RefPart::Term(t) => write!(f, "[{t}]")?,
            }
        }
        Ok(())
    }
}

/// A term kept as its token run; renders with canonical spacing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Term {
    tokens: Vec<Token>,
}

impl Term {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .filter(|t| t.kind != TokenKind::Newline)
                .collect(),
        }
    }

    /// The variable name, if the term is a single variable.
    pub fn as_var(&self) -> Option<&str> {
        match self.tokens.as_slice() {
            [Token {
                kind: TokenKind::Ident(v),
                ..
            }] => Some(v),
            _ => None,
        }
    }

    /// The string value, if the term is a single string literal.
    pub fn as_string(&self) -> Option<&str> {
        match self.tokens.as_slice() {
            [Token {
                kind: TokenKind::String(s),
                ..
            }] => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_tokens(&self.tokens))
    }
}

/// A rule body: a brace-delimited or single-line run of expressions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Body {
    tokens: Vec<Token>,
    pub location: Location,
}

impl Body {
    pub(crate) fn new(tokens: Vec<Token>, location: Location) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .filter(|t| t.kind != TokenKind::Newline)
                .collect(),
            location,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tokens.is_empty() {
            return f.write_str("{}");
        }
        write!(f, "{{ {} }}", render_tokens(&self.tokens))
    }
}

pub(crate) fn is_ident(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quote a string the way Rego prints string literals.
pub(crate) fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn is_wordlike(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_) | TokenKind::Keyword(_) | TokenKind::String(_) | TokenKind::Number(_)
    )
}

/// A `-` is unary when nothing that can end an operand precedes it.
fn is_unary_position(prev: Option<&TokenKind>) -> bool {
    match prev {
        None => true,
        Some(TokenKind::Punct(p)) => !matches!(p, Punct::RParen | Punct::RBrack | Punct::RBrace),
        Some(TokenKind::Keyword(k)) => !matches!(k, Keyword::True | Keyword::False | Keyword::Null),
        _ => false,
    }
}

fn render_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&TokenKind> = None;
    for tok in tokens {
        let kind = &tok.kind;
        match kind {
            TokenKind::Punct(Punct::Minus) if is_unary_position(prev) => {
                if prev.is_some_and(is_wordlike) || matches!(prev, Some(TokenKind::Punct(p)) if p.is_infix()) {
                    out.push(' ');
                }
                out.push('-');
                // The operand follows directly: `-1`.
                prev = Some(kind);
                continue;
            }
            TokenKind::Punct(p) if p.is_infix() => {
                out.push(' ');
                out.push_str(p.as_str());
                out.push(' ');
            }
            TokenKind::Punct(Punct::Comma) => out.push_str(", "),
            TokenKind::Punct(Punct::Semicolon) => out.push_str("; "),
            TokenKind::Punct(Punct::Colon) => out.push_str(": "),
            TokenKind::Punct(p) => out.push_str(p.as_str()),
            TokenKind::Keyword(k) => {
                if needs_space_before(prev) {
                    out.push(' ');
                }
                out.push_str(k.as_str());
            }
            TokenKind::Ident(s) => {
                if needs_space_before(prev) {
                    out.push(' ');
                }
                out.push_str(s);
            }
            TokenKind::String(s) => {
                if needs_space_before(prev) {
                    out.push(' ');
                }
                out.push_str(&quote(s));
            }
            TokenKind::Number(n) => {
                if needs_space_before(prev) && !matches!(prev, Some(TokenKind::Punct(Punct::Minus))) {
                    out.push(' ');
                }
                out.push_str(n);
            }
            TokenKind::Newline | TokenKind::Eof => {}
        }
        prev = Some(kind);
    }
    // Infix operators pad both sides; collapse doubled spaces and trim the ends.
    let mut collapsed = String::with_capacity(out.len());
    let mut last_space = false;
    for c in out.trim().chars() {
        if c == ' ' {
            if !last_space {
                collapsed.push(c);
            }
            last_space = true;
        } else {
            collapsed.push(c);
            last_space = false;
        }
    }
    collapsed
}

fn needs_space_before(prev: Option<&TokenKind>) -> bool {
    match prev {
        Some(k) if is_wordlike(k) => true,
        Some(TokenKind::Punct(p)) if p.is_closing() => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn term(src: &str) -> Term {
        let lexed = tokenize("t.rego", src).expect("tokenize");
        let tokens = lexed
            .tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Eof)
            .collect();
        Term::new(tokens)
    }

    #[test]
    fn renders_collections_with_canonical_spacing() {
        assert_eq!(term(r#"{"msg":msg,"id" : 1}"#).to_string(), r#"{"msg": msg, "id": 1}"#);
        assert_eq!(term("[1,2,  3]").to_string(), "[1, 2, 3]");
        assert_eq!(term("count(x)+1").to_string(), "count(x) + 1");
        assert_eq!(term("input.a[_].b").to_string(), "input.a[_].b");
    }

    #[test]
    fn renders_unary_minus_attached() {
        assert_eq!(term("-1").to_string(), "-1");
        assert_eq!(term("[-1, x - 2]").to_string(), "[-1, x - 2]");
        assert_eq!(term("a == -1").to_string(), "a == -1");
    }

    #[test]
    fn renders_comprehensions_and_keywords() {
        assert_eq!(
            term("{x|some x in input.items;x.ok}").to_string(),
            "{x | some x in input.items; x.ok}"
        );
    }

    #[test]
    fn raw_strings_render_quoted() {
        assert_eq!(term("`a\"b`").to_string(), r#""a\"b""#);
    }

    #[test]
    fn ref_renders_identifier_keys_with_dots() {
        let r = Ref {
            parts: vec![
                RefPart::Var("data".to_string()),
                RefPart::Key("lib".to_string()),
                RefPart::Key("k8s-utils".to_string()),
                RefPart::Term(term("x")),
            ],
        };
        assert_eq!(r.to_string(), r#"data.lib["k8s-utils"][x]"#);
        assert_eq!(r.root(), "data");
    }

    #[test]
    fn head_renders_all_shapes() {
        let name = |n: &str| Ref {
            parts: vec![RefPart::Var(n.to_string())],
        };
        let bracket = Head {
            reference: Ref {
                parts: vec![RefPart::Var("deny".to_string()), RefPart::Term(term("msg"))],
            },
            args: None,
            contains: None,
            value: None,
        };
        assert_eq!(bracket.to_string(), "deny[msg]");
        assert_eq!(bracket.key().and_then(Term::as_var), Some("msg"));
        assert_eq!(bracket.name(), "deny");

        let contains = Head {
            reference: name("deny"),
            args: None,
            contains: Some(term("msg")),
            value: None,
        };
        assert_eq!(contains.to_string(), "deny contains msg");

        let func = Head {
            reference: name("f"),
            args: Some(vec![term("x"), term("y")]),
            contains: None,
            value: Some((AssignOp::Assign, term("x+y"))),
        };
        assert_eq!(func.to_string(), "f(x, y) := x + y");
        assert!(func.key().is_none());
    }

    #[test]
    fn quote_escapes_control_characters() {
        assert_eq!(quote("a\u{1}b"), "\"a\\u0001b\"");
        assert_eq!(quote("tab\there"), "\"tab\\there\"");
    }
}
