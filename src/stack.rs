//! Stack safety for the recursive passes.
//!
//! Parsing, resolution and evaluation all recurse once per level of syntactic
//! (or Lox call) nesting.  Wrapping those recursion points in
//! [`ensure_sufficient_stack`] lets the native stack grow on the heap instead
//! of aborting the process, so runaway Lox recursion is caught by the
//! interpreter's call‑depth limit and reported as `Stack overflow.`.
//!
//! Releasing a syntax tree needs no guard: `Expr` and `Stmt` are dropped
//! through a work list (see [`crate::ast`]).

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Ensure sufficient stack space is available before executing `f`.
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
