//! Abstract syntax tree for Mica programs.
//!
//! A program is an ordered sequence of module declarations. Module bodies
//! mix `@use` directives, function definitions and global bindings; the
//! code generator walks them in textual order.

use std::fmt;

use crate::span::Span;

/// A whole program: every module declared in the source, in textual order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub modules: Vec<ModuleDecl>,
}

impl Program {
    #[must_use]
    pub fn new(modules: Vec<ModuleDecl>) -> Self {
        Program { modules }
    }
}

/// `module <name> { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleDecl {
    pub name: String,
    pub body: Vec<Item>,
    pub span: Span,
}

impl ModuleDecl {
    /// Whether this module defines a top-level function named `main`.
    ///
    /// The module that does is the program's main module.
    #[must_use]
    pub fn defines_main(&self) -> bool {
        self.body.iter().any(|item| {
            matches!(item, Item::Function(f) if f.name == "main")
        })
    }
}

/// A module-body item.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `@use other as alias;`
    Use(UseDecl),
    /// `fn name(params) -> type { ... }`
    Function(FunctionDecl),
    /// Module-level `let name: type = expr;`
    Global(GlobalDecl),
}

/// `@use <module> (as <alias>)? ;`
#[derive(Debug, Clone, PartialEq)]
pub struct UseDecl {
    pub module: String,
    pub alias: Option<String>,
    pub span: Span,
}

/// A function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    pub ret: TypeName,
    pub body: Vec<Stmt>,
    /// `priv fn` gets internal linkage; everything else is external.
    pub is_private: bool,
    pub span: Span,
}

/// A typed function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: TypeName,
    pub span: Span,
}

/// A module-level binding, lowered to an IR global.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalDecl {
    pub name: String,
    pub ty: Option<TypeName>,
    pub init: Expr,
    pub is_private: bool,
    pub span: Span,
}

/// Surface type names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Float,
    Bool,
    Void,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::Bool => "bool",
            TypeName::Void => "void",
        };
        write!(f, "{s}")
    }
}

/// A statement inside a function body.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `let name (: type)? = expr;`
    Let {
        name: String,
        ty: Option<TypeName>,
        init: Expr,
        span: Span,
    },
    /// `return expr?;`
    Return { value: Option<Expr>, span: Span },
    /// Expression evaluated for effect.
    Expr(Expr),
}

impl Stmt {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Stmt::Let { span, .. } | Stmt::Return { span, .. } => *span,
            Stmt::Expr(e) => e.span(),
        }
    }
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(i64, Span),
    Float(f64, Span),
    Bool(bool, Span),
    Ident(String, Span),
    /// `object.member`: either a module-qualified reference or a plain
    /// member access; disambiguated during lowering.
    Member {
        object: Box<Expr>,
        member: String,
        span: Span,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        span: Span,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
        span: Span,
    },
}

impl Expr {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Expr::Int(_, span)
            | Expr::Float(_, span)
            | Expr::Bool(_, span)
            | Expr::Ident(_, span)
            | Expr::Member { span, .. }
            | Expr::Call { span, .. }
            | Expr::Binary { span, .. } => *span,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
}

impl BinaryOp {
    /// Whether the operator yields `bool` regardless of operand type.
    #[must_use]
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
        };
        write!(f, "{s}")
    }
}
