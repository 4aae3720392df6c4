//! Abstract syntax tree for Lox.
//!
//! Two closed enums, [`Expr`] and [`Stmt`], cover every construct the parser
//! can produce; every later pass (resolver, interpreter, printer) matches on
//! them exhaustively.  Nodes are never mutated after construction.
//!
//! Expressions that name a binding (`Variable`, `Assign`, `This`, `Super`)
//! carry an [`ExprId`] handed out by the parser.  The resolver records scope
//! distances against that id, so two textually identical references at
//! different places in the source resolve independently.

use std::rc::Rc;

use serde::Serialize;

use crate::token::Token;

/// Stable identity of a resolvable expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ExprId(pub usize);

/// A **literal constant** that appears directly in the source code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LiteralValue {
    /// Numeric literal ‑ stored as IEEE‑754 `f64`.
    /// Integral lexemes such as `"3"` are still parsed as `3.0`.
    Number(f64),

    /// String literal without surrounding quotes.
    Str(String),

    /// The boolean constant `true`.
    True,

    /// The boolean constant `false`.
    False,

    /// The `nil` literal.
    Nil,
}

/// **Abstract‑Syntax‑Tree node** representing every kind of *expression*.
#[derive(Debug, Clone, Serialize)]
pub enum Expr {
    /// A literal constant: number, string, `true`, `false`, or `nil`.
    Literal(LiteralValue),

    /// Prefix unary operator expression
    /// *Example:* `!isReady` or `-42`
    Unary {
        /// The operator token (`!` or `-`).
        operator: Token,
        right: Box<Expr>,
    },

    /// Infix binary operator expression
    /// *Example:* `a + b`, `x <= y`
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },

    /// Short‑circuiting logical operators `and` / `or`.
    Logical {
        left: Box<Expr>,
        operator: Token, // `AND` or `OR`
        right: Box<Expr>,
    },

    /// Parenthesised sub‑expression: `"(" expression ")"`.
    Grouping(Box<Expr>),

    /// Variable access.
    Variable { id: ExprId, name: Token },

    /// Assignment expression: `identifier "=" expression`
    Assign {
        id: ExprId,
        name: Token,
        value: Box<Expr>,
    },

    /// Function‑, method‑ or constructor‑call expression
    /// *Example:* `clock()` or `add(1, 2)`
    Call {
        callee: Box<Expr>,
        /// The closing `)` token ‑ retained for error reporting.
        paren: Token,
        arguments: Vec<Expr>,
    },

    /// `object.name`
    Get { object: Box<Expr>, name: Token },

    /// `object.name = value`
    Set {
        object: Box<Expr>,
        name: Token,
        value: Box<Expr>,
    },

    /// The `this` keyword inside a method.
    This { id: ExprId, keyword: Token },

    /// `super.method`
    Super {
        id: ExprId,
        keyword: Token,
        method: Token,
    },
}

/// Name, parameters and body of a function or method.
///
/// Shared behind an `Rc` so runtime function objects can hold on to their
/// declaration without copying the body.
#[derive(Debug, Serialize)]
pub struct FunctionDecl {
    pub name: Token,

    /// Parameter name tokens (arity ≤ 255).
    pub params: Vec<Token>,

    pub body: Vec<Stmt>,
}

/// **Abstract‑Syntax‑Tree node** for *statements*.  A program is a sequence
/// of these nodes returned by [`crate::parser::Parser::parse`].
#[derive(Debug, Clone, Serialize)]
pub enum Stmt {
    /// Braced scope containing zero or more declarations/statements.
    Block(Vec<Stmt>),

    /// Stand‑alone expression terminated by a semicolon.
    Expression(Expr),

    /// `print` statement used for output.
    Print(Expr),

    /// Variable declaration: `"var" IDENT ("=" initializer)? ";"`.
    Var {
        name: Token,
        initializer: Option<Expr>,
    },

    /// `if` / `else` conditional.
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    /// `while` loop; `for` loops are desugared into this.
    While { condition: Expr, body: Box<Stmt> },

    /// Function declaration ‑ becomes a first‑class callable value.
    Function(Rc<FunctionDecl>),

    /// `return` statement inside a function body.
    Return {
        /// The `return` keyword token (for error locations).
        keyword: Token,

        /// Absent ⇒ `nil` is returned.
        value: Option<Expr>,
    },

    /// Class declaration with an optional single superclass.
    Class {
        name: Token,
        /// Always an [`Expr::Variable`] when present.
        superclass: Option<Expr>,
        methods: Vec<Rc<FunctionDecl>>,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Teardown
// ─────────────────────────────────────────────────────────────────────────────
//
// A chain like `1 + 1 + … + 1` nests one box per operator, and the derived drop
// glue would recurse once per level.  Both trees are instead taken apart
// through an explicit work list, so releasing a tree uses constant stack.

/// Detached subtrees still waiting to be released.
#[derive(Default)]
struct Teardown {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
}

impl Teardown {
    fn expr(&mut self, slot: &mut Expr) {
        if !slot.is_leaf() {
            self.exprs
                .push(std::mem::replace(slot, Expr::Literal(LiteralValue::Nil)));
        }
    }

    fn stmt(&mut self, slot: &mut Stmt) {
        self.stmts.push(std::mem::replace(slot, Stmt::Block(Vec::new())));
    }

    /// Only declarations nobody else holds are taken apart here; a shared one
    /// is released by its last owner.
    fn function(&mut self, declaration: &mut Rc<FunctionDecl>) {
        if let Some(declaration) = Rc::get_mut(declaration) {
            self.stmts.append(&mut declaration.body);
        }
    }

    fn run(mut self) {
        loop {
            // Each popped node has its children moved out before it drops.
            if let Some(mut expr) = self.exprs.pop() {
                expr.detach_children(&mut self);
            } else if let Some(mut stmt) = self.stmts.pop() {
                stmt.detach_children(&mut self);
            } else {
                break;
            }
        }
    }
}

impl Expr {
    fn is_leaf(&self) -> bool {
        matches!(
            self,
            Expr::Literal(_) | Expr::Variable { .. } | Expr::This { .. } | Expr::Super { .. }
        )
    }

    fn detach_children(&mut self, teardown: &mut Teardown) {
        match self {
            Expr::Literal(_) | Expr::Variable { .. } | Expr::This { .. } | Expr::Super { .. } => {}

            Expr::Unary { right, .. } => teardown.expr(right),

            Expr::Binary { left, right, .. } | Expr::Logical { left, right, .. } => {
                teardown.expr(left);
                teardown.expr(right);
            }

            Expr::Grouping(inner) => teardown.expr(inner),

            Expr::Assign { value, .. } => teardown.expr(value),

            Expr::Call {
                callee, arguments, ..
            } => {
                teardown.expr(callee);
                teardown.exprs.append(arguments);
            }

            Expr::Get { object, .. } => teardown.expr(object),

            Expr::Set { object, value, .. } => {
                teardown.expr(object);
                teardown.expr(value);
            }
        }
    }
}

impl Drop for Expr {
    fn drop(&mut self) {
        if self.is_leaf() {
            return;
        }

        let mut teardown = Teardown::default();
        self.detach_children(&mut teardown);
        teardown.run();
    }
}

impl Stmt {
    /// Moves out nested statements.  Expressions are left in place: their own
    /// `Drop` already releases them iteratively.
    fn detach_children(&mut self, teardown: &mut Teardown) {
        match self {
            Stmt::Expression(_) | Stmt::Print(_) | Stmt::Var { .. } | Stmt::Return { .. } => {}

            Stmt::Block(statements) => teardown.stmts.append(statements),

            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                teardown.stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    teardown.stmt(else_branch);
                }
            }

            Stmt::While { body, .. } => teardown.stmt(body),

            Stmt::Function(declaration) => teardown.function(declaration),

            Stmt::Class { methods, .. } => {
                for method in methods {
                    teardown.function(method);
                }
            }
        }
    }
}

impl Drop for Stmt {
    fn drop(&mut self) {
        let mut teardown = Teardown::default();
        self.detach_children(&mut teardown);
        teardown.run();
    }
}
