//! Token pipeline coordinator
//!
//! This module provides the [`TokenProcessor`] struct and the two pipeline
//! entry points. The passes themselves are split across modules using
//! `impl TokenProcessor` blocks:
//! - `structure`: define substitution, parenthesis nesting, comma splitting
//! - `recognition`: declarations, calls, memory accesses, casts, identifiers
//! - `expressions`: unary and binary operator folding
//! - `type_assign`: data types, overload selection, implicit casts
//!
//! # Pipeline
//!
//! ```text
//! defines → parentheses → commas → per unit: recognition → unary → binary
//!         → type assignment on the remaining root statement
//! ```
//!
//! Parenthesis structuring yields a flat worklist of units (one per group
//! content, innermost first, root last), so nested groups are folded before
//! the unit that contains them without recursive descent.

use super::errors::CompileError;
use super::token::{SequenceId, TokenList};
use crate::program::globals::GlobalsLookup;
use crate::program::scope::FunctionScope;
use crate::program::types::DataType;
use log::debug;

/// Type every memory access address is checked against
pub const ADDRESS_TYPE: DataType = DataType::U32;

/// Name prefix of a call delegating to the overridden version of the current function
pub const BASE_CALL_PREFIX: &str = "base.";

/// Compiles one statement's tokens into a typed expression tree
pub struct TokenProcessor<'a> {
    pub(crate) globals: &'a GlobalsLookup,
    pub(crate) scope: &'a mut FunctionScope,
    pub(crate) line_number: u32,
}

impl<'a> TokenProcessor<'a> {
    pub fn new(globals: &'a GlobalsLookup, scope: &'a mut FunctionScope) -> Self {
        TokenProcessor {
            globals,
            scope,
            line_number: 0,
        }
    }

    /// Run the full pipeline on a statement.
    ///
    /// On success the root sequence of `tokens` holds exactly one statement
    /// token and every statement below it has a data type. `result_type` is
    /// the type the enclosing statement expects, if any.
    pub fn process_tokens(
        &mut self,
        tokens: &mut TokenList,
        line_number: u32,
        result_type: Option<DataType>,
    ) -> Result<(), CompileError> {
        self.line_number = line_number;
        let root = tokens.root();

        self.process_defines(tokens, root);

        let mut units = self.process_parentheses(tokens, root)?;
        self.process_comma_separators(tokens, &mut units)?;
        debug!(
            "line {}: processing {} token units",
            line_number,
            units.len()
        );

        for &unit in &units {
            self.process_variable_definitions(tokens, unit)?;
            self.process_function_calls(tokens, unit)?;
            self.process_memory_accesses(tokens, unit)?;
            self.process_explicit_casts(tokens, unit);
            self.process_identifiers(tokens, unit)?;

            self.process_unary_operations(tokens, unit)?;
            self.process_binary_operations(tokens, unit)?;
        }

        let statement = tokens
            .root_statement()
            .ok_or_else(|| self.grammar_error("Statement does not form a single expression"))?;
        let data_type = self.assign_statement_data_type(tokens, statement, result_type)?;
        debug!("line {}: statement typed as {}", line_number, data_type);

        debug_assert!(tokens.is_fully_typed());
        Ok(())
    }

    /// Fold a preprocessor condition.
    ///
    /// Only nesting and operator folding run: identifiers stay unresolved and
    /// no types are assigned, but constant sub-expressions are evaluated.
    pub fn process_for_preprocessor(
        &mut self,
        tokens: &mut TokenList,
        line_number: u32,
    ) -> Result<(), CompileError> {
        self.line_number = line_number;
        let root = tokens.root();

        let units = self.process_parentheses(tokens, root)?;
        for unit in units {
            self.process_unary_operations(tokens, unit)?;
            self.process_binary_operations(tokens, unit)?;
        }
        Ok(())
    }

    pub(crate) fn structure_error(&self, message: impl Into<String>) -> CompileError {
        CompileError::Structure {
            message: message.into(),
            line: self.line_number,
        }
    }

    pub(crate) fn declaration_error(&self, message: impl Into<String>) -> CompileError {
        CompileError::Declaration {
            message: message.into(),
            line: self.line_number,
        }
    }

    pub(crate) fn resolution_error(&self, message: impl Into<String>) -> CompileError {
        CompileError::Resolution {
            message: message.into(),
            line: self.line_number,
        }
    }

    pub(crate) fn grammar_error(&self, message: impl Into<String>) -> CompileError {
        CompileError::Grammar {
            message: message.into(),
            line: self.line_number,
        }
    }

    pub(crate) fn type_error(&self, message: impl Into<String>) -> CompileError {
        CompileError::Type {
            message: message.into(),
            line: self.line_number,
        }
    }
}

/// Units that still need processing, in processing order
pub(crate) type Worklist = Vec<SequenceId>;

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::program::globals::{Function, Parameter};

    /// Globals shared by the pipeline tests
    pub fn globals() -> GlobalsLookup {
        let mut globals = GlobalsLookup::new();
        globals.add_global_variable("frame", DataType::U32);
        globals.add_function(Function::new(
            "abs",
            vec![Parameter::new("value", DataType::S32)],
            DataType::S32,
        ));
        globals
    }

    pub fn scope() -> FunctionScope {
        FunctionScope::new(Function::new(
            "update",
            vec![
                Parameter::new("a", DataType::U16),
                Parameter::new("b", DataType::S32),
            ],
            DataType::U8,
        ))
    }

    /// Run the full pipeline on `source`
    pub fn compile(
        globals: &GlobalsLookup,
        scope: &mut FunctionScope,
        source: &str,
        result_type: Option<DataType>,
    ) -> Result<TokenList, CompileError> {
        let mut tokens = TokenList::parse(source).unwrap();
        TokenProcessor::new(globals, scope).process_tokens(&mut tokens, 1, result_type)?;
        Ok(tokens)
    }

    pub fn render(source: &str) -> String {
        let globals = globals();
        let mut scope = scope();
        compile(&globals, &mut scope, source, None).unwrap().render()
    }

    pub fn error(source: &str) -> CompileError {
        let globals = globals();
        let mut scope = scope();
        compile(&globals, &mut scope, source, None).unwrap_err()
    }
}
