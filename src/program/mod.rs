//! Program-level declarations the compiler resolves against
//!
//! - [`types`]: the primitive data types and their properties
//! - [`globals`]: defines, global variables and function overloads
//! - [`scope`]: local variables of the function being compiled

pub mod globals;
pub mod scope;
pub mod types;
