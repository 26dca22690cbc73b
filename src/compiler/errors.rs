//! Compile error types
//!
//! Every failure of the token pipeline is fatal to the statement being
//! compiled. Errors are grouped by the stage that detects them; each carries a
//! human-readable message and the source line of the statement.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Mismatched or unmatched delimiters, malformed comma lists
    #[error("Structure error at line {line}: {message}")]
    Structure { message: String, line: u32 },

    /// Redeclared or `void` variables, malformed declarations
    #[error("Declaration error at line {line}: {message}")]
    Declaration { message: String, line: u32 },

    /// Unknown identifiers or function names
    #[error("Resolution error at line {line}: {message}")]
    Resolution { message: String, line: u32 },

    /// Operators or tokens in a position where they cannot be used
    #[error("Syntax error at line {line}: {message}")]
    Grammar { message: String, line: u32 },

    /// No viable cast, overload or signature
    #[error("Type error at line {line}: {message}")]
    Type { message: String, line: u32 },
}

impl CompileError {
    pub fn line(&self) -> u32 {
        match self {
            CompileError::Structure { line, .. }
            | CompileError::Declaration { line, .. }
            | CompileError::Resolution { line, .. }
            | CompileError::Grammar { line, .. }
            | CompileError::Type { line, .. } => *line,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CompileError::Structure { message, .. }
            | CompileError::Declaration { message, .. }
            | CompileError::Resolution { message, .. }
            | CompileError::Grammar { message, .. }
            | CompileError::Type { message, .. } => message,
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {line}, column {column}: {message}")]
pub struct LexError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_line() {
        let err = CompileError::Resolution {
            message: "Unable to resolve identifier: foo".to_string(),
            line: 12,
        };
        assert_eq!(
            err.to_string(),
            "Resolution error at line 12: Unable to resolve identifier: foo"
        );
        assert_eq!(err.line(), 12);
        assert_eq!(err.message(), "Unable to resolve identifier: foo");
    }
}
