//! Closed syntax tree the summarizer walks.
//!
//! Only the shapes the summary renders are modelled in detail; every other
//! statement or expression collapses to an `Other` variant, keeping just the
//! nested blocks that may still hold definitions.

use crate::literal::Constant;

/// A parsed source file
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    FunctionDef(FunctionDef),
    ClassDef {
        name: String,
        body: Vec<Stmt>,
    },
    /// `a = b = value`; targets in source order
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    /// `if`/`elif`/`else`; an `elif` is a nested `If` in `orelse`
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
        is_async: bool,
    },
    /// `while`, `with`, `try` and `match`: only their blocks, in source order
    Compound {
        blocks: Vec<Vec<Stmt>>,
    },
    Expr(Expr),
    Return(Option<Expr>),
    Other,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: String,
    pub params: Parameters,
    pub body: Vec<Stmt>,
    pub is_async: bool,
}

/// Parameter names grouped the way Python binds them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    /// Before `/`
    pub posonly: Vec<String>,
    /// Positional-or-keyword
    pub args: Vec<String>,
    pub vararg: Option<String>,
    /// After `*` or `*args`
    pub kwonly: Vec<String>,
    pub kwarg: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(String),
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    /// Keyword arguments are not kept
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
    },
    Constant(Constant),
    BinOp {
        left: Box<Expr>,
        op: BinOperator,
        right: Box<Expr>,
    },
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOperator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
}

impl BinOperator {
    pub fn from_token(token: &str) -> Option<Self> {
        let op = match token {
            "+" => BinOperator::Add,
            "-" => BinOperator::Sub,
            "*" => BinOperator::Mult,
            "@" => BinOperator::MatMult,
            "/" => BinOperator::Div,
            "%" => BinOperator::Mod,
            "**" => BinOperator::Pow,
            "<<" => BinOperator::LShift,
            ">>" => BinOperator::RShift,
            "|" => BinOperator::BitOr,
            "^" => BinOperator::BitXor,
            "&" => BinOperator::BitAnd,
            "//" => BinOperator::FloorDiv,
            _ => return None,
        };
        Some(op)
    }

    /// Symbol used in summaries; only the four arithmetic basics are spelled out.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinOperator::Add => "+",
            BinOperator::Sub => "-",
            BinOperator::Mult => "*",
            BinOperator::Div => "/",
            _ => "?",
        }
    }
}
