use crate::ast::{
    AssignOp, Body, Else, Head, Import, Module, Package, Ref, RefPart, Rule, Term,
};
use crate::error::SyntaxError;
use crate::lexer::{Keyword, Punct, Token, TokenKind, tokenize};

/// Deepest allowed nesting of collections, calls and bodies.
const MAX_NESTING: usize = 128;

/// Roots an import path may start from.
const IMPORT_ROOTS: [&str; 4] = ["data", "input", "future", "rego"];

pub(crate) fn parse_module(path: &str, text: &str) -> Result<Module, SyntaxError> {
    let lexed = tokenize(path, text)?;
    let mut p = Parser {
        path,
        tokens: lexed.tokens,
        pos: 0,
        grouped: false,
        depth: 0,
    };

    p.skip_separators();
    let package = p.package()?;

    let mut imports = Vec::new();
    let mut rules = Vec::new();
    loop {
        p.skip_separators();
        let tok = p.peek().clone();
        match &tok.kind {
            TokenKind::Eof => break,
            TokenKind::Keyword(Keyword::Import) => imports.push(p.import()?),
            TokenKind::Keyword(Keyword::Package) => {
                return Err(p.error_at(&tok, "unexpected package, expected import or rule"));
            }
            _ => rules.extend(p.rule()?),
        }
    }

    Ok(Module {
        package,
        imports,
        rules,
        comments: lexed.comments,
    })
}

struct Parser<'a> {
    path: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    /// Inside `()`, `[]` or a collection, where newlines carry no meaning.
    grouped: bool,
    depth: usize,
}

/// Which infix operators may continue an expression.
#[derive(Clone, Copy)]
struct ExprCtx {
    /// `:=` and `=`.
    assign: bool,
    /// `|`, which also opens a comprehension body.
    pipe: bool,
    /// `in`.
    membership: bool,
}

impl ExprCtx {
    /// A body literal.
    const LITERAL: ExprCtx = ExprCtx {
        assign: true,
        pipe: true,
        membership: true,
    };
    /// A value: head values, arguments, collection elements.
    const VALUE: ExprCtx = ExprCtx {
        assign: false,
        pipe: true,
        membership: true,
    };
    /// First element of a collection, which may be a comprehension head.
    const COLLECTION: ExprCtx = ExprCtx {
        assign: false,
        pipe: false,
        membership: true,
    };
    /// Variables of `some` and `every`.
    const ITERATION: ExprCtx = ExprCtx {
        assign: false,
        pipe: false,
        membership: false,
    };
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        // The lexer always terminates the stream with `Eof`.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Eof {
            self.pos += 1;
        }
        tok
    }

    fn eat_punct(&mut self, p: Punct) -> bool {
        if self.peek().is_punct(p) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, k: Keyword) -> bool {
        if self.peek().is_keyword(k) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn skip_newlines(&mut self) {
        while *self.peek_kind() == TokenKind::Newline {
            self.pos += 1;
        }
    }

    fn skip_separators(&mut self) {
        while matches!(
            self.peek_kind(),
            TokenKind::Newline | TokenKind::Punct(Punct::Semicolon)
        ) {
            self.pos += 1;
        }
    }

    /// Next non-newline token, without consuming anything.
    fn peek_past_newlines(&self) -> &Token {
        let mut i = self.pos;
        while i < self.tokens.len() - 1 && self.tokens[i].kind == TokenKind::Newline {
            i += 1;
        }
        &self.tokens[i]
    }

    fn error_at(&self, tok: &Token, message: impl Into<String>) -> SyntaxError {
        SyntaxError::at(self.path, tok.loc, message)
    }

    fn unexpected(&self, expected: &str) -> SyntaxError {
        let tok = self.peek();
        self.error_at(tok, format!("unexpected {}, expected {expected}", tok.describe()))
    }

    fn package(&mut self) -> Result<Package, SyntaxError> {
        let tok = self.peek().clone();
        if !tok.is_keyword(Keyword::Package) {
            return Err(self.error_at(&tok, "package expected"));
        }
        self.advance();
        let mut path = self.reference()?;
        // Package paths are always rooted at `data`.
        if let Some(RefPart::Var(name)) = path.parts.first().cloned() {
            path.parts[0] = RefPart::Key(name);
        }
        path.parts.insert(0, RefPart::Var("data".to_string()));
        self.end_of_statement()?;
        Ok(Package {
            path,
            location: tok.loc,
        })
    }

    fn import(&mut self) -> Result<Import, SyntaxError> {
        let tok = self.advance();
        let path = self.reference()?;
        if !IMPORT_ROOTS.contains(&path.root()) {
            return Err(self.error_at(
                &tok,
                format!(
                    "unexpected import path `{path}`, must begin with one of: {}",
                    IMPORT_ROOTS.join(", ")
                ),
            ));
        }
        let alias = if self.eat_keyword(Keyword::As) {
            match self.advance() {
                Token {
                    kind: TokenKind::Ident(name),
                    ..
                } => Some(name),
                other => {
                    return Err(
                        self.error_at(&other, format!("unexpected {}, expected alias", other.describe()))
                    );
                }
            }
        } else {
            None
        };
        self.end_of_statement()?;
        Ok(Import {
            path,
            alias,
            location: tok.loc,
        })
    }

    /// `name(.name | [term])*`
    fn reference(&mut self) -> Result<Ref, SyntaxError> {
        let root = match self.peek_kind() {
            TokenKind::Ident(name) => name.clone(),
            _ => return Err(self.unexpected("name")),
        };
        self.advance();
        let mut parts = vec![RefPart::Var(root)];
        loop {
            if self.eat_punct(Punct::Dot) {
                match self.advance() {
                    Token {
                        kind: TokenKind::Ident(name),
                        ..
                    } => parts.push(RefPart::Key(name)),
                    // Keywords are valid ref segments after a dot (`future.keywords.in`).
                    Token {
                        kind: TokenKind::Keyword(k),
                        ..
                    } => parts.push(RefPart::Key(k.as_str().to_string())),
                    other => {
                        return Err(self.error_at(
                            &other,
                            format!("unexpected {}, expected name after `.`", other.describe()),
                        ));
                    }
                }
            } else if self.peek().is_punct(Punct::LBrack) {
                let term = self.ref_segment()?;
                match term.as_string() {
                    Some(s) => parts.push(RefPart::Key(s.to_string())),
                    None => parts.push(RefPart::Term(term)),
                }
            } else {
                break;
            }
        }
        Ok(Ref { parts })
    }

    /// Run `f` with newlines made insignificant (`true`) or statement separators (`false`).
    fn grouping<T>(
        &mut self,
        grouped: bool,
        f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        if self.depth >= MAX_NESTING {
            let tok = self.peek().clone();
            return Err(self.error_at(&tok, "expression nested too deeply"));
        }
        self.depth += 1;
        let saved = std::mem::replace(&mut self.grouped, grouped);
        let result = f(self);
        self.grouped = saved;
        self.depth -= 1;
        result
    }

    fn expect_punct(&mut self, p: Punct, expected: &str) -> Result<Token, SyntaxError> {
        if self.peek().is_punct(p) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn slice(&self, start: usize) -> Vec<Token> {
        self.tokens[start..self.pos].to_vec()
    }

    /// `[term]` after a ref; the brackets are consumed, the term is returned.
    fn ref_segment(&mut self) -> Result<Term, SyntaxError> {
        let open = self.advance();
        self.grouping(true, |p| {
            p.skip_newlines();
            if p.peek().is_punct(Punct::RBrack) {
                return Err(p.error_at(&open, "empty ref segment"));
            }
            let term = p.expr(ExprCtx::VALUE)?;
            p.skip_newlines();
            p.expect_punct(Punct::RBrack, "`]`")?;
            Ok(term)
        })
    }

    /// One operand: literal, ref, call, collection, comprehension or parenthesised
    /// expression, with any `.name`, `[..]` or `(..)` suffixes.
    fn operand(&mut self) -> Result<(), SyntaxError> {
        // Unary minus.
        while self.eat_punct(Punct::Minus) {}
        let tok = self.peek().clone();
        match &tok.kind {
            TokenKind::Ident(_)
            | TokenKind::String(_)
            | TokenKind::Number(_)
            | TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Null) => {
                self.advance();
            }
            TokenKind::Punct(Punct::LBrack) => self.array()?,
            TokenKind::Punct(Punct::LBrace) => self.object_or_set()?,
            TokenKind::Punct(Punct::LParen) => {
                self.advance();
                self.grouping(true, |p| {
                    p.skip_newlines();
                    p.expr(ExprCtx::VALUE)?;
                    p.skip_newlines();
                    p.expect_punct(Punct::RParen, "`)`")
                })?;
            }
            _ => return Err(self.unexpected("term")),
        }
        loop {
            match self.peek_kind() {
                TokenKind::Punct(Punct::Dot) => {
                    self.advance();
                    match self.peek_kind() {
                        TokenKind::Ident(_) | TokenKind::Keyword(_) => {
                            self.advance();
                        }
                        _ => return Err(self.unexpected("name after `.`")),
                    }
                }
                TokenKind::Punct(Punct::LBrack) => {
                    self.ref_segment()?;
                }
                TokenKind::Punct(Punct::LParen) => {
                    self.advance();
                    self.grouping(true, |p| p.call_args())?;
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Arguments after `(`, including the closing `)`.
    fn call_args(&mut self) -> Result<(), SyntaxError> {
        self.skip_newlines();
        if self.eat_punct(Punct::RParen) {
            return Ok(());
        }
        loop {
            self.expr(ExprCtx::VALUE)?;
            self.skip_newlines();
            if self.eat_punct(Punct::Comma) {
                self.skip_newlines();
                continue;
            }
            self.expect_punct(Punct::RParen, "`,` or `)`")?;
            return Ok(());
        }
    }

    /// `[a, b]` or `[x | query]`.
    fn array(&mut self) -> Result<(), SyntaxError> {
        let open = self.advance();
        self.grouping(true, |p| {
            p.skip_newlines();
            if p.eat_punct(Punct::RBrack) {
                return Ok(());
            }
            p.expr(ExprCtx::COLLECTION)?;
            p.skip_newlines();
            if p.eat_punct(Punct::Pipe) {
                return p.query(Punct::RBrack, &open);
            }
            p.elements(Punct::RBrack, "`,` or `]`", false)
        })
    }

    /// `{}`, `{k: v}`, `{a, b}`, `{k: v | query}` or `{x | query}`.
    fn object_or_set(&mut self) -> Result<(), SyntaxError> {
        let open = self.advance();
        self.grouping(true, |p| {
            p.skip_newlines();
            if p.eat_punct(Punct::RBrace) {
                return Ok(());
            }
            p.expr(ExprCtx::COLLECTION)?;
            p.skip_newlines();
            let object = p.eat_punct(Punct::Colon);
            if object {
                p.skip_newlines();
                p.expr(ExprCtx::COLLECTION)?;
                p.skip_newlines();
            }
            if p.eat_punct(Punct::Pipe) {
                return p.query(Punct::RBrace, &open);
            }
            p.elements(Punct::RBrace, "`,` or `}`", object)
        })
    }

    /// Remaining `, element` entries of a collection whose first element was just parsed.
    /// A trailing comma is allowed.
    fn elements(&mut self, close: Punct, expected: &str, pairs: bool) -> Result<(), SyntaxError> {
        loop {
            if self.eat_punct(close) {
                return Ok(());
            }
            self.expect_punct(Punct::Comma, expected)?;
            self.skip_newlines();
            if self.eat_punct(close) {
                return Ok(());
            }
            self.expr(ExprCtx::VALUE)?;
            self.skip_newlines();
            if pairs {
                self.expect_punct(Punct::Colon, "`:`")?;
                self.skip_newlines();
                self.expr(ExprCtx::VALUE)?;
                self.skip_newlines();
            }
        }
    }

    /// Operands joined by infix operators, as allowed by `ctx`.
    fn expr(&mut self, ctx: ExprCtx) -> Result<Term, SyntaxError> {
        let start = self.pos;
        self.operand()?;
        loop {
            if self.grouped {
                self.skip_newlines();
            }
            let joins = match self.peek_kind() {
                TokenKind::Punct(Punct::Assign | Punct::Unify) => ctx.assign,
                TokenKind::Punct(Punct::Pipe) => ctx.pipe,
                TokenKind::Punct(p) => p.is_infix(),
                TokenKind::Keyword(Keyword::In) => ctx.membership,
                _ => false,
            };
            if !joins {
                break;
            }
            self.advance();
            self.skip_newlines();
            self.operand()?;
        }
        Ok(Term::new(self.slice(start)))
    }

    /// A value term: `x`, `count(a) + 1`, `a | b`.
    fn term(&mut self) -> Result<Term, SyntaxError> {
        self.expr(ExprCtx::VALUE)
    }

    /// Literals up to and including `close`. At least one literal is required.
    fn query(&mut self, close: Punct, open: &Token) -> Result<(), SyntaxError> {
        self.grouping(false, |p| {
            let mut literals = 0usize;
            loop {
                p.skip_separators();
                let tok = p.peek().clone();
                if tok.is_punct(close) {
                    p.advance();
                    break;
                }
                if tok.kind == TokenKind::Eof {
                    return Err(p.error_at(
                        open,
                        format!("unexpected eof, expected `{}`", close.as_str()),
                    ));
                }
                p.literal()?;
                literals += 1;
                match p.peek_kind() {
                    TokenKind::Newline | TokenKind::Eof | TokenKind::Punct(Punct::Semicolon) => {}
                    TokenKind::Punct(c) if *c == close => {}
                    _ => return Err(p.unexpected("end of expression")),
                }
            }
            if literals == 0 {
                return Err(p.error_at(open, "found empty body"));
            }
            Ok(())
        })
    }

    /// `some ...`, `every ...`, `not expr` or `expr`, followed by `with` modifiers.
    fn literal(&mut self) -> Result<(), SyntaxError> {
        let tok = self.peek().clone();
        match &tok.kind {
            TokenKind::Keyword(Keyword::Some) => {
                self.advance();
                return self.some_decl(&tok);
            }
            TokenKind::Keyword(Keyword::Every) => {
                self.advance();
                return self.every(&tok);
            }
            TokenKind::Keyword(Keyword::Not) => {
                self.advance();
                self.expr(ExprCtx::LITERAL)?;
            }
            _ => {
                self.expr(ExprCtx::LITERAL)?;
            }
        }
        while self.eat_keyword(Keyword::With) {
            self.reference()?;
            if !self.eat_keyword(Keyword::As) {
                return Err(self.unexpected("`as`"));
            }
            self.expr(ExprCtx::VALUE)?;
        }
        Ok(())
    }

    /// `some x, y` or `some [k,] v in domain`.
    fn some_decl(&mut self, some: &Token) -> Result<(), SyntaxError> {
        let mut terms = vec![self.expr(ExprCtx::ITERATION)?];
        while self.eat_punct(Punct::Comma) {
            terms.push(self.expr(ExprCtx::ITERATION)?);
        }
        if self.eat_keyword(Keyword::In) {
            if terms.len() > 2 {
                return Err(self.error_at(some, "unexpected `,` in some declaration"));
            }
            self.expr(ExprCtx::VALUE)?;
            return Ok(());
        }
        if let Some(bad) = terms.iter().find(|t| t.as_var().is_none()) {
            return Err(self.error_at(some, format!("expected var in some declaration, found `{bad}`")));
        }
        Ok(())
    }

    /// `every [k,] v in domain { query }`.
    fn every(&mut self, every: &Token) -> Result<(), SyntaxError> {
        let mut vars = vec![self.expr(ExprCtx::ITERATION)?];
        if self.eat_punct(Punct::Comma) {
            vars.push(self.expr(ExprCtx::ITERATION)?);
        }
        if let Some(bad) = vars.iter().find(|t| t.as_var().is_none()) {
            return Err(self.error_at(every, format!("expected var in every declaration, found `{bad}`")));
        }
        if !self.eat_keyword(Keyword::In) {
            return Err(self.unexpected("`in`"));
        }
        self.expr(ExprCtx::VALUE)?;
        let open = self.expect_punct(Punct::LBrace, "`{`")?;
        self.query(Punct::RBrace, &open)
    }

    fn head(&mut self) -> Result<Head, SyntaxError> {
        let reference = self.reference()?;

        let args = if self.peek().is_punct(Punct::LParen) {
            self.advance();
            let mut args = Vec::new();
            if !self.eat_punct(Punct::RParen) {
                loop {
                    self.skip_newlines();
                    args.push(self.term()?);
                    self.skip_newlines();
                    if self.eat_punct(Punct::Comma) {
                        continue;
                    }
                    if self.eat_punct(Punct::RParen) {
                        break;
                    }
                    return Err(self.unexpected("`,` or `)`"));
                }
            }
            Some(args)
        } else {
            None
        };

        let contains = if self.eat_keyword(Keyword::Contains) {
            Some(self.term()?)
        } else {
            None
        };

        let value = self.assigned_value()?;

        Ok(Head {
            reference,
            args,
            contains,
            value,
        })
    }

    fn assigned_value(&mut self) -> Result<Option<(AssignOp, Term)>, SyntaxError> {
        let op = if self.eat_punct(Punct::Unify) {
            AssignOp::Unify
        } else if self.eat_punct(Punct::Assign) {
            AssignOp::Assign
        } else {
            return Ok(None);
        };
        Ok(Some((op, self.term()?)))
    }

    /// Body after an optional `if`: `{ ... }` or, with `if`, a single literal.
    fn body(&mut self, has_if: bool) -> Result<Option<Body>, SyntaxError> {
        if self.peek().is_punct(Punct::LBrace) {
            let open = self.advance();
            let start = self.pos;
            self.query(Punct::RBrace, &open)?;
            // Drop the closing brace.
            let tokens = self.tokens[start..self.pos - 1].to_vec();
            return Ok(Some(Body::new(tokens, open.loc)));
        }
        if !has_if {
            return Ok(None);
        }
        let start_tok = self.peek().clone();
        if matches!(start_tok.kind, TokenKind::Newline | TokenKind::Eof) {
            return Err(self.error_at(&start_tok, "expected rule body after `if`"));
        }
        let start = self.pos;
        self.grouping(false, |p| p.literal())?;
        Ok(Some(Body::new(self.slice(start), start_tok.loc)))
    }

    /// A rule statement. Extra bodies (`p { a } { b }`) yield one rule per body.
    fn rule(&mut self) -> Result<Vec<Rule>, SyntaxError> {
        let start = self.peek().clone();
        let default = self.eat_keyword(Keyword::Default);
        let head = self.head()?;

        if default {
            if head.value.is_none() {
                return Err(self.error_at(&start, "default rule must have a value"));
            }
            if head.args.is_some() {
                return Err(self.error_at(&start, "default rule must not have arguments"));
            }
        }

        let has_if = self.eat_keyword(Keyword::If);
        let body = self.body(has_if)?;

        if default && body.is_some() {
            return Err(self.error_at(&start, "default rule must not have a body"));
        }
        let has_key = head.reference.parts.len() > 1 || head.contains.is_some();
        if body.is_none() && head.value.is_none() && !has_key {
            return Err(self.error_at(
                &start,
                format!("rule `{}` must have a body or value", head.reference),
            ));
        }

        let mut extra_bodies = Vec::new();
        while body.is_some() && self.peek().is_punct(Punct::LBrace) {
            if let Some(b) = self.body(false)? {
                extra_bodies.push(b);
            }
        }

        let mut else_chain = Vec::new();
        while body.is_some() && self.peek_past_newlines().is_keyword(Keyword::Else) {
            self.skip_newlines();
            let else_tok = self.advance();
            if head.contains.is_some() || (head.reference.parts.len() > 1 && head.value.is_none()) {
                return Err(self.error_at(&else_tok, "else keyword cannot be used on multi-value rules"));
            }
            let value = self.assigned_value()?;
            let has_if = self.eat_keyword(Keyword::If);
            let else_body = self.body(has_if)?;
            if value.is_none() && else_body.is_none() {
                return Err(self.unexpected("`=`, `:=` or `{` after else"));
            }
            else_chain.push(Else {
                value,
                body: else_body,
                location: else_tok.loc,
            });
        }

        self.end_of_statement()?;

        let mut rules = vec![Rule {
            default,
            head: head.clone(),
            body,
            else_chain,
            location: start.loc,
        }];
        for b in extra_bodies {
            rules.push(Rule {
                default: false,
                head: head.clone(),
                location: b.location,
                body: Some(b),
                else_chain: Vec::new(),
            });
        }
        Ok(rules)
    }

    fn end_of_statement(&mut self) -> Result<(), SyntaxError> {
        match self.peek_kind() {
            TokenKind::Newline | TokenKind::Eof | TokenKind::Punct(Punct::Semicolon) => Ok(()),
            _ => Err(self.unexpected("end of statement")),
        }
    }
}
