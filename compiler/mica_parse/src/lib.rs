//! Recursive descent parser for Mica.
//!
//! Consumes the lexer's token stream and produces the [`mica_ir::ast`]
//! tree. Parsing fails fast on the first grammar violation; diagnosis of
//! semantic problems (unknown modules, unresolved members) happens later,
//! in code generation.

mod cursor;
mod error;

pub use cursor::Cursor;
pub use error::ParseError;

use mica_ir::ast::{
    BinaryOp, Expr, FunctionDecl, GlobalDecl, Item, ModuleDecl, Param, Program, Stmt, TypeName,
    UseDecl,
};
use mica_ir::{Span, Token, TokenKind};

/// Parse a full program from source text.
pub fn parse_source(source: &str) -> Result<Program, ParseError> {
    let tokens = mica_lexer::tokenize(source);
    parse_tokens(&tokens)
}

/// Parse a full program from an `Eof`-terminated token stream.
pub fn parse_tokens(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}

/// Parser state.
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    #[must_use]
    pub fn new(tokens: &'a [Token]) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
        }
    }

    /// program := module*
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut modules = Vec::new();
        while !self.cursor.is_at_end() {
            modules.push(self.parse_module()?);
        }
        tracing::debug!(modules = modules.len(), "parsed program");
        Ok(Program::new(modules))
    }

    /// module := 'module' IDENT '{' item* '}'
    fn parse_module(&mut self) -> Result<ModuleDecl, ParseError> {
        let start = self.cursor.current_span();
        self.expect(&TokenKind::Module, "`module`")?;
        let name = self.expect_ident("module name")?;
        self.expect(&TokenKind::LBrace, "`{`")?;

        let mut body = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(self.unexpected("`}` closing the module body"));
            }
            body.push(self.parse_item()?);
        }
        let end = self.cursor.advance().span;

        Ok(ModuleDecl {
            name,
            body,
            span: start.merge(end),
        })
    }

    /// item := use_directive | function | global
    fn parse_item(&mut self) -> Result<Item, ParseError> {
        if self.cursor.check(&TokenKind::AtUse) {
            return Ok(Item::Use(self.parse_use()?));
        }

        let is_private = self.cursor.eat(&TokenKind::Priv);
        match self.cursor.current_kind() {
            TokenKind::Fn => Ok(Item::Function(self.parse_function(is_private)?)),
            TokenKind::Let => Ok(Item::Global(self.parse_global(is_private)?)),
            _ => Err(self.unexpected("`fn`, `let` or `@use`")),
        }
    }

    /// use_directive := '@use' IDENT ('as' IDENT)? ';'
    fn parse_use(&mut self) -> Result<UseDecl, ParseError> {
        let start = self.cursor.current_span();
        self.expect(&TokenKind::AtUse, "`@use`")?;
        let module = self.expect_ident("module name")?;
        let alias = if self.cursor.eat(&TokenKind::As) {
            Some(self.expect_ident("alias name")?)
        } else {
            None
        };
        let end = self.cursor.current_span();
        self.expect(&TokenKind::Semicolon, "`;`")?;
        Ok(UseDecl {
            module,
            alias,
            span: start.merge(end),
        })
    }

    /// function := 'fn' IDENT '(' params? ')' ('->' type)? block
    fn parse_function(&mut self, is_private: bool) -> Result<FunctionDecl, ParseError> {
        let start = self.cursor.current_span();
        self.expect(&TokenKind::Fn, "`fn`")?;
        let name = self.expect_ident("function name")?;
        self.expect(&TokenKind::LParen, "`(`")?;

        let mut params = Vec::new();
        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        self.expect(&TokenKind::RParen, "`)`")?;

        let ret = if self.cursor.eat(&TokenKind::Arrow) {
            self.parse_type()?
        } else {
            TypeName::Void
        };

        self.expect(&TokenKind::LBrace, "`{`")?;
        let mut body = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) {
            if self.cursor.is_at_end() {
                return Err(self.unexpected("`}` closing the function body"));
            }
            body.push(self.parse_stmt()?);
        }
        let end = self.cursor.advance().span;

        Ok(FunctionDecl {
            name,
            params,
            ret,
            body,
            is_private,
            span: start.merge(end),
        })
    }

    /// param := IDENT ':' type
    fn parse_param(&mut self) -> Result<Param, ParseError> {
        let start = self.cursor.current_span();
        let name = self.expect_ident("parameter name")?;
        self.expect(&TokenKind::Colon, "`:`")?;
        let ty = self.parse_type()?;
        Ok(Param {
            name,
            ty,
            span: start,
        })
    }

    /// global := 'let' IDENT (':' type)? '=' expr ';'
    fn parse_global(&mut self, is_private: bool) -> Result<GlobalDecl, ParseError> {
        let start = self.cursor.current_span();
        self.expect(&TokenKind::Let, "`let`")?;
        let name = self.expect_ident("binding name")?;
        let ty = if self.cursor.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        self.expect(&TokenKind::Assign, "`=`")?;
        let init = self.parse_expr()?;
        let end = self.cursor.current_span();
        self.expect(&TokenKind::Semicolon, "`;`")?;
        Ok(GlobalDecl {
            name,
            ty,
            init,
            is_private,
            span: start.merge(end),
        })
    }

    fn parse_type(&mut self) -> Result<TypeName, ParseError> {
        let ty = match self.cursor.current_kind() {
            TokenKind::IntType => TypeName::Int,
            TokenKind::FloatType => TypeName::Float,
            TokenKind::BoolType => TypeName::Bool,
            TokenKind::VoidType => TypeName::Void,
            _ => return Err(self.unexpected("a type (`int`, `float`, `bool`, `void`)")),
        };
        self.cursor.advance();
        Ok(ty)
    }

    /// stmt := let | return | expr ';'
    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Let => {
                let start = self.cursor.advance().span;
                let name = self.expect_ident("binding name")?;
                let ty = if self.cursor.eat(&TokenKind::Colon) {
                    Some(self.parse_type()?)
                } else {
                    None
                };
                self.expect(&TokenKind::Assign, "`=`")?;
                let init = self.parse_expr()?;
                let end = self.cursor.current_span();
                self.expect(&TokenKind::Semicolon, "`;`")?;
                Ok(Stmt::Let {
                    name,
                    ty,
                    init,
                    span: start.merge(end),
                })
            }
            TokenKind::Return => {
                let start = self.cursor.advance().span;
                let value = if self.cursor.check(&TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                let end = self.cursor.current_span();
                self.expect(&TokenKind::Semicolon, "`;`")?;
                Ok(Stmt::Return {
                    value,
                    span: start.merge(end),
                })
            }
            _ => {
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::Semicolon, "`;`")?;
                Ok(Stmt::Expr(expr))
            }
        }
    }

    /// expr := equality
    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_comparison()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::EqEq => BinaryOp::Eq,
                TokenKind::NotEq => BinaryOp::NotEq,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_comparison()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_additive()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Lt => BinaryOp::Lt,
                TokenKind::LtEq => BinaryOp::LtEq,
                TokenKind::Gt => BinaryOp::Gt,
                TokenKind::GtEq => BinaryOp::GtEq,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_additive()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_postfix()?;
        loop {
            let op = match self.cursor.current_kind() {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Rem,
                _ => break,
            };
            self.cursor.advance();
            let rhs = self.parse_postfix()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    /// postfix := primary ( '(' args? ')' | '.' IDENT )*
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.cursor.check(&TokenKind::LParen) {
                self.cursor.advance();
                let mut args = Vec::new();
                if !self.cursor.check(&TokenKind::RParen) {
                    loop {
                        args.push(self.parse_expr()?);
                        if !self.cursor.eat(&TokenKind::Comma) {
                            break;
                        }
                    }
                }
                let end = self.cursor.current_span();
                self.expect(&TokenKind::RParen, "`)`")?;
                let span = expr.span().merge(end);
                expr = Expr::Call {
                    callee: Box::new(expr),
                    args,
                    span,
                };
            } else if self.cursor.check(&TokenKind::Dot) {
                self.cursor.advance();
                let member_span = self.cursor.current_span();
                let member = self.expect_ident("member name")?;
                let span = expr.span().merge(member_span);
                expr = Expr::Member {
                    object: Box::new(expr),
                    member,
                    span,
                };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.cursor.current_span();
        match self.cursor.current_kind() {
            TokenKind::Int(v) => {
                let v = *v;
                self.cursor.advance();
                Ok(Expr::Int(v, span))
            }
            TokenKind::Float(v) => {
                let v = *v;
                self.cursor.advance();
                Ok(Expr::Float(v, span))
            }
            TokenKind::True => {
                self.cursor.advance();
                Ok(Expr::Bool(true, span))
            }
            TokenKind::False => {
                self.cursor.advance();
                Ok(Expr::Bool(false, span))
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.cursor.advance();
                Ok(Expr::Ident(name, span))
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(expr)
            }
            TokenKind::Error => Err(ParseError::InvalidToken { span }),
            _ => Err(self.unexpected("an expression")),
        }
    }

    // -- Helpers --

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<Span, ParseError> {
        if self.cursor.check(kind) {
            Ok(self.cursor.advance().span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<String, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.cursor.advance();
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::UnexpectedToken {
            expected: expected.to_owned(),
            found: self.cursor.current_kind().to_string(),
            span: self.cursor.current_span(),
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    let span = lhs.span().merge(rhs.span());
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        span,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn empty_program() {
        let program = parse_source("").expect("parse");
        assert!(program.modules.is_empty());
    }

    #[test]
    fn single_module_single_function() {
        let program = parse_source("module m { fn f() {} }").expect("parse");
        assert_eq!(program.modules.len(), 1);
        let module = &program.modules[0];
        assert_eq!(module.name, "m");
        assert_eq!(module.body.len(), 1);
        match &module.body[0] {
            Item::Function(f) => {
                assert_eq!(f.name, "f");
                assert_eq!(f.ret, TypeName::Void);
                assert!(!f.is_private);
            }
            other => panic!("expected function, got {other:?}"),
        }
    }

    #[test]
    fn use_with_and_without_alias() {
        let program =
            parse_source("module b { @use a as x; @use c; }").expect("parse");
        let body = &program.modules[0].body;
        match (&body[0], &body[1]) {
            (Item::Use(u1), Item::Use(u2)) => {
                assert_eq!(u1.module, "a");
                assert_eq!(u1.alias.as_deref(), Some("x"));
                assert_eq!(u2.module, "c");
                assert_eq!(u2.alias, None);
            }
            other => panic!("expected two use directives, got {other:?}"),
        }
    }

    #[test]
    fn priv_marks_function_private() {
        let program = parse_source("module m { priv fn g() {} fn f() {} }").expect("parse");
        match (&program.modules[0].body[0], &program.modules[0].body[1]) {
            (Item::Function(g), Item::Function(f)) => {
                assert!(g.is_private);
                assert!(!f.is_private);
            }
            other => panic!("expected functions, got {other:?}"),
        }
    }

    #[test]
    fn qualified_call_parses_as_member_callee() {
        let program =
            parse_source("module b { fn g() { x.hello(); } }").expect("parse");
        let Item::Function(f) = &program.modules[0].body[0] else {
            panic!("expected function");
        };
        let Stmt::Expr(Expr::Call { callee, args, .. }) = &f.body[0] else {
            panic!("expected call statement, got {:?}", f.body[0]);
        };
        assert!(args.is_empty());
        let Expr::Member { object, member, .. } = callee.as_ref() else {
            panic!("expected member callee, got {callee:?}");
        };
        assert_eq!(member, "hello");
        assert_eq!(object.as_ref(), &Expr::Ident("x".into(), object.span()));
    }

    #[test]
    fn precedence_mul_binds_tighter_than_add() {
        let program = parse_source("module m { fn f() -> int { return 1 + 2 * 3; } }")
            .expect("parse");
        let Item::Function(f) = &program.modules[0].body[0] else {
            panic!("expected function");
        };
        let Stmt::Return {
            value: Some(Expr::Binary { op, rhs, .. }),
            ..
        } = &f.body[0]
        else {
            panic!("expected return of a binary expression");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(
            rhs.as_ref(),
            Expr::Binary {
                op: BinaryOp::Mul,
                ..
            }
        ));
    }

    #[test]
    fn typed_params_and_return() {
        let program =
            parse_source("module m { fn add(a: int, b: int) -> int { return a + b; } }")
                .expect("parse");
        let Item::Function(f) = &program.modules[0].body[0] else {
            panic!("expected function");
        };
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[0].ty, TypeName::Int);
        assert_eq!(f.ret, TypeName::Int);
    }

    #[test]
    fn global_let_at_module_scope() {
        let program = parse_source("module m { let answer: int = 42; }").expect("parse");
        let Item::Global(g) = &program.modules[0].body[0] else {
            panic!("expected global");
        };
        assert_eq!(g.name, "answer");
        assert_eq!(g.ty, Some(TypeName::Int));
        assert_eq!(g.init, Expr::Int(42, g.init.span()));
    }

    #[test]
    fn missing_semicolon_is_an_error() {
        let err = parse_source("module m { @use a as x }").expect_err("should fail");
        assert!(matches!(err, ParseError::UnexpectedToken { .. }));
    }

    #[test]
    fn stray_byte_reports_invalid_token() {
        let err = parse_source("module m { fn f() { let x = #; } }").expect_err("should fail");
        assert!(matches!(err, ParseError::InvalidToken { .. }));
    }

    proptest! {
        // Parsing arbitrary junk never panics; it returns Ok or Err.
        #[test]
        fn never_panics(input in ".{0,80}") {
            let _ = parse_source(&input);
        }

        // A module wrapper around a well-formed use list always parses, and
        // the directive order survives.
        #[test]
        fn use_directives_preserve_order(names in proptest::collection::vec("[a-z][a-z0-9_]{0,6}", 1..6)) {
            const KEYWORDS: &[&str] = &[
                "module", "fn", "let", "return", "priv", "true", "false", "as",
                "int", "float", "bool", "void",
            ];
            prop_assume!(names.iter().all(|n| !KEYWORDS.contains(&n.as_str())));
            let body: String = names.iter().map(|n| format!("@use {n}; ")).collect();
            let source = format!("module host {{ {body} }}");
            let program = parse_source(&source).expect("parse");
            let parsed: Vec<_> = program.modules[0]
                .body
                .iter()
                .map(|item| match item {
                    Item::Use(u) => u.module.clone(),
                    other => panic!("expected use, got {other:?}"),
                })
                .collect();
            prop_assert_eq!(parsed, names);
        }
    }
}
