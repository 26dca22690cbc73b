//! Declaration scripts for the command-line driver
//!
//! A script is a plain text file, one item per line:
//!
//! ```text
//! #define SPEED 4 * 2
//! #global u32 frame
//! #function s32 abs(s32)
//! u16 offset = frame + SPEED
//! ```
//!
//! Directive lines register symbols; every other non-empty line is one
//! statement, compiled in order inside a synthetic `main` function so that
//! locals declared by earlier lines stay visible.

use crate::compiler::errors::{CompileError, LexError};
use crate::compiler::lexer::Lexer;
use crate::compiler::processing::TokenProcessor;
use crate::compiler::token::TokenList;
use crate::program::globals::{Function, GlobalsLookup, Parameter};
use crate::program::scope::FunctionScope;
use crate::program::types::DataType;
use thiserror::Error;

/// Name of the function statements are compiled in
pub const MAIN_FUNCTION: &str = "main";

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Directive error at line {line}: {message}")]
    Directive { message: String, line: u32 },

    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

/// A statement line waiting to be compiled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementLine {
    pub line: u32,
    pub text: String,
}

/// Symbols declared by a script plus its statement lines
#[derive(Debug, Default)]
pub struct Script {
    pub globals: GlobalsLookup,
    pub statements: Vec<StatementLine>,
}

impl Script {
    pub fn parse(source: &str) -> Result<Script, ScriptError> {
        let mut script = Script::default();

        for (index, raw) in source.lines().enumerate() {
            let line = index as u32 + 1;
            let text = raw.trim();
            if text.is_empty() || text.starts_with("//") {
                continue;
            }

            let Some(directive) = text.strip_prefix('#') else {
                script.statements.push(StatementLine {
                    line,
                    text: text.to_string(),
                });
                continue;
            };

            let (keyword, rest) = directive
                .split_once(char::is_whitespace)
                .map(|(keyword, rest)| (keyword, rest.trim()))
                .unwrap_or((directive, ""));
            match keyword {
                "define" => script.parse_define(rest, line)?,
                "global" => script.parse_global(rest, line)?,
                "function" => script.parse_function(rest, line)?,
                _ => {
                    return Err(directive_error(format!("Unknown directive '#{}'", keyword), line));
                }
            }
        }

        Ok(script)
    }

    /// `#define NAME tokens...`
    fn parse_define(&mut self, rest: &str, line: u32) -> Result<(), ScriptError> {
        let (name, content) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if name.is_empty() {
            return Err(directive_error("Define needs a name", line));
        }
        let tokens = Lexer::with_line(content, line).tokenize()?;
        self.globals.add_define(name, tokens);
        Ok(())
    }

    /// `#global TYPE NAME`
    fn parse_global(&mut self, rest: &str, line: u32) -> Result<(), ScriptError> {
        let mut words = rest.split_whitespace();
        let (Some(type_name), Some(name), None) = (words.next(), words.next(), words.next()) else {
            return Err(directive_error("Expected '#global TYPE NAME'", line));
        };
        let data_type = parse_type(type_name, line)?;
        self.globals.add_global_variable(name, data_type);
        Ok(())
    }

    /// `#function RET NAME(TYPE, ...)`
    fn parse_function(&mut self, rest: &str, line: u32) -> Result<(), ScriptError> {
        let malformed = || directive_error("Expected '#function RET NAME(TYPE, ...)'", line);

        let (head, parameters) = rest.split_once('(').ok_or_else(malformed)?;
        let parameters = parameters.trim_end().strip_suffix(')').ok_or_else(malformed)?;
        let mut words = head.split_whitespace();
        let (Some(return_type), Some(name), None) = (words.next(), words.next(), words.next()) else {
            return Err(malformed());
        };

        let return_type = parse_type(return_type, line)?;
        let mut params = Vec::new();
        if !parameters.trim().is_empty() {
            for (index, type_name) in parameters.split(',').map(str::trim).enumerate() {
                params.push(Parameter::new(format!("p{}", index), parse_type(type_name, line)?));
            }
        }

        self.globals.add_function(Function::new(name, params, return_type));
        Ok(())
    }

    /// Fresh scope of the synthetic function statements are compiled in
    pub fn main_scope() -> FunctionScope {
        FunctionScope::new(Function::new(MAIN_FUNCTION, Vec::new(), DataType::Void))
    }
}

/// Lex and compile one statement
pub fn compile_statement(
    globals: &GlobalsLookup,
    scope: &mut FunctionScope,
    statement: &StatementLine,
) -> Result<TokenList, ScriptError> {
    let tokens = Lexer::with_line(&statement.text, statement.line).tokenize()?;
    let mut tokens = TokenList::from_tokens(tokens);
    TokenProcessor::new(globals, scope).process_tokens(&mut tokens, statement.line, None)?;
    Ok(tokens)
}

fn parse_type(name: &str, line: u32) -> Result<DataType, ScriptError> {
    DataType::from_name(name).ok_or_else(|| directive_error(format!("Unknown type '{}'", name), line))
}

fn directive_error(message: impl Into<String>, line: u32) -> ScriptError {
    ScriptError::Directive {
        message: message.into(),
        line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_register_symbols() {
        let script = Script::parse(
            "#define TWO 1 + 1\n\
             #global u32 frame\n\
             #function s32 abs(s32)\n\
             #function void reset()\n\
             \n\
             // comment\n\
             frame = abs(TWO)\n",
        )
        .unwrap();

        assert!(script.globals.define_by_name("TWO").is_some());
        assert!(script.globals.global_variable_by_name("frame").is_some());
        let abs = script.globals.functions_by_name("abs")[0];
        assert_eq!(script.globals.function(abs).parameters.len(), 1);
        let reset = script.globals.functions_by_name("reset")[0];
        assert!(script.globals.function(reset).parameters.is_empty());
        assert_eq!(
            script.statements,
            vec![StatementLine {
                line: 7,
                text: "frame = abs(TWO)".to_string()
            }]
        );
    }

    #[test]
    fn test_malformed_directives() {
        let err = Script::parse("#global frame").unwrap_err();
        assert_eq!(err.to_string(), "Directive error at line 1: Expected '#global TYPE NAME'");

        let err = Script::parse("\n#function u8 f(u9)").unwrap_err();
        assert_eq!(err.to_string(), "Directive error at line 2: Unknown type 'u9'");

        assert!(matches!(
            Script::parse("#include x").unwrap_err(),
            ScriptError::Directive { .. }
        ));
        assert!(matches!(
            Script::parse("#define X $").unwrap_err(),
            ScriptError::Lex(_)
        ));
    }

    #[test]
    fn test_statements_share_main_scope() {
        let script = Script::parse("#global u32 frame\nu16 x = 3\nframe = x * 2").unwrap();
        let mut scope = Script::main_scope();

        compile_statement(&script.globals, &mut scope, &script.statements[0]).unwrap();
        let tokens = compile_statement(&script.globals, &mut scope, &script.statements[1]).unwrap();
        assert_eq!(tokens.render(), "(= frame (* (u32 x) 2))");
    }

    #[test]
    fn test_compile_error_keeps_line() {
        let script = Script::parse("\n\nmissing + 1").unwrap();
        let mut scope = Script::main_scope();
        let err = compile_statement(&script.globals, &mut scope, &script.statements[0]).unwrap_err();
        assert!(matches!(err, ScriptError::Compile(ref e) if e.line() == 3));
    }
}
