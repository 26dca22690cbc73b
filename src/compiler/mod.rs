//! Expression compiler
//!
//! This module turns the flat token stream of one statement into a typed
//! expression tree:
//! - [`lexer`]: Tokenization (statement text → tokens)
//! - [`token`]: Token nodes and the arena-backed [`token::TokenList`]
//! - [`operators`]: Operator set, priorities and associativity
//! - [`casting`]: Implicit cast costs, operator signatures, overload ranking
//! - [`processing`]: The [`processing::TokenProcessor`] pipeline
//! - [`errors`]: Compile error types
//!
//! # Supported Expressions
//!
//! - Integer literals (decimal and `0x` hex), local and global variables
//! - Local declarations (`u8 x`), memory accesses (`u16[addr]`), casts (`s32(x)`)
//! - Function calls with overload resolution, and `base.<name>(...)` calls
//! - Unary, binary and ternary operators; constant arithmetic is folded
//!
//! Control flow, statement keywords and code generation belong to the
//! statement compiler that drives this pipeline.

pub mod casting;
pub mod errors;
mod expressions;
pub mod lexer;
pub mod operators;
pub mod processing;
mod recognition;
mod structure;
pub mod token;
mod type_assign;

pub use expressions::fold_constants;
