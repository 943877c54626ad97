use std::sync::atomic::{AtomicUsize, Ordering};

use crate::token::Token;

/// Stable identity for the expression nodes the resolver binds.
///
/// Ids come from a process-global monotonic counter, so nodes parsed on a
/// later REPL line can never collide with ids already recorded in the
/// interpreter's locals table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprId(usize);

impl ExprId {
    pub fn next() -> Self {
        static NEXT: AtomicUsize = AtomicUsize::new(0);

        ExprId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Expression nodes.  Only variable-referencing variants (`Variable`,
/// `Assign`, `This`, `Super`) carry an [`ExprId`]; the rest are looked up
/// structurally.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Literal value, still carried as its source token.
    Literal(Token),

    /// Parenthesized grouping.
    Grouping(Box<Expr>),

    Unary {
        operator: Token,
        right: Box<Expr>,
    },

    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// Short-circuiting `and` / `or`.
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    Variable {
        id: ExprId,
        name: Token,
    },

    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    Call {
        callee: Box<Expr>,
        /// Closing paren; carries the line for arity and native errors.
        paren: Token,
        arguments: Vec<Expr>,
    },

    /// Property read: `object.name`.
    Get {
        object: Box<Expr>,
        name: Token,
    },

    /// Property write: `object.name = value`.
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },

    This {
        id: ExprId,
        keyword: Token,
    },

    Super {
        id: ExprId,
        keyword: Token,
        method: Token,
    },
}
