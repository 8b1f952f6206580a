//! Lexical analysis for the Javelin core.
//!
//! This crate is deliberately compiler-free: everything here works on the
//! token stream of a single file and is cheap enough to run on every
//! keystroke. It provides:
//!
//! - a lossless Java lexer (every byte of the input is covered by exactly
//!   one token),
//! - `search`: the lexical pre-qualification helpers (package extraction,
//!   class-declaration detection, import lists),
//! - `context`: completion-context classification for a cursor,
//! - `prune`: the equal-length source eraser that makes focused
//!   compilation fast,
//! - `expr`: the small partial-expression grammar the type checker in
//!   `javelin-ide` reasons about.

mod context;
mod expr;
mod lexer;
mod prune;
pub mod search;
mod structure;
mod token;

pub use context::{completion_context, switch_subject_end, CompletionContext, ContextKind};
pub use expr::{expression_ending_at, receiver_before, ExprKind, PartialExpr};
pub use lexer::lex;
pub use prune::{prune, prune_word};
pub use search::{contains_class, contains_word, package_name};
pub use token::{Token, TokenKind};
