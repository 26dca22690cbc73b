//! # Introduction
//!
//! exprforge is the expression-compilation stage of an embedded game scripting
//! language. It takes the flat token sequence of one statement and rewrites it
//! into a fully typed expression tree, ready for code generation.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Structuring → Recognition → Folding → Typing
//! ```
//!
//! 1. [`compiler`]: lexes statement text and runs the token pipeline
//!    ([`compiler::processing::TokenProcessor`]), which nests groups, binds
//!    identifiers, folds operators by precedence, selects overloads and
//!    inserts casts.
//! 2. [`program`]: the declarations the pipeline resolves against: primitive
//!    [`program::types::DataType`]s, the [`program::globals::GlobalsLookup`]
//!    symbol table and the enclosing function's
//!    [`program::scope::FunctionScope`].
//! 3. [`script`]: the directive format read by the command-line driver.
//!
//! ## Example
//!
//! ```
//! use exprforge::compiler::processing::TokenProcessor;
//! use exprforge::compiler::token::TokenList;
//! use exprforge::program::globals::{Function, GlobalsLookup};
//! use exprforge::program::scope::FunctionScope;
//! use exprforge::program::types::DataType;
//!
//! let mut globals = GlobalsLookup::new();
//! globals.add_global_variable("frame", DataType::U32);
//! let mut scope = FunctionScope::new(Function::new("main", vec![], DataType::Void));
//!
//! let mut tokens = TokenList::parse("u32 x = frame * 2 + 1").unwrap();
//! TokenProcessor::new(&globals, &mut scope)
//!     .process_tokens(&mut tokens, 1, None)
//!     .unwrap();
//! assert_eq!(tokens.render(), "(= x (+ (* frame 2) 1))");
//! ```
//!
//! ## Supported language subset
//!
//! Types: `u8`..`u64`, `s8`..`s64`, `bool`, `void`.
//! Expressions: literals, variables, declarations, memory accesses, casts,
//! calls (overloaded and `base.` calls), unary, binary and ternary operators.

pub mod compiler;
pub mod program;
pub mod script;
