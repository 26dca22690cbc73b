//! Recognition passes
//!
//! Run on one unit at a time, after structuring and before operator folding.
//! Each pass collapses a fixed token pattern into a statement token:
//!
//! | Pattern                      | Result                                  |
//! |------------------------------|-----------------------------------------|
//! | `VarType Identifier`         | newly declared local variable           |
//! | `Identifier (group)`         | function call                           |
//! | `VarType [bracket]`          | memory access of that type              |
//! | `VarType (group)`            | explicit cast to that type              |
//! | `Identifier`                 | local or global variable                |

use super::errors::CompileError;
use super::processing::{TokenProcessor, BASE_CALL_PREFIX};
use super::token::{
    Keyword, ParenthesisType, SequenceId, Statement, StatementKind, Token, TokenList,
    VariableBinding, VariableLocation,
};
use crate::program::types::{DataType, TypeClass};
use log::trace;

/// Content of a group token of the given kind
fn group_content(token: &Token, wanted: ParenthesisType) -> Option<SequenceId> {
    match token {
        Token::Statement(Statement {
            kind: StatementKind::Parenthesis { kind, content },
            ..
        }) if *kind == wanted => Some(*content),
        _ => None,
    }
}

impl<'a> TokenProcessor<'a> {
    pub(crate) fn process_variable_definitions(
        &mut self,
        tokens: &mut TokenList,
        unit: SequenceId,
    ) -> Result<(), CompileError> {
        let mut i = 0;
        while i < tokens.len(unit) {
            let next = (i + 1 < tokens.len(unit)).then(|| tokens.at(unit, i + 1));

            let declaration: Option<(DataType, String)> = match tokens.at(unit, i) {
                Token::Keyword(Keyword::Function) => {
                    if !matches!(next, Some(Token::Identifier(_))) {
                        return Err(self.declaration_error(
                            "Function keyword must be followed by an identifier",
                        ));
                    }
                    None
                }
                Token::VarType(data_type) => match next {
                    None => return Err(self.declaration_error("Type name must not be the last token")),
                    Some(Token::Identifier(name)) => Some((*data_type, name.clone())),
                    Some(_) => None,
                },
                _ => None,
            };

            if let Some((data_type, name)) = declaration {
                if data_type.class() == TypeClass::Void {
                    return Err(self.declaration_error("void variables not allowed"));
                }
                if self.scope.find_visible(&name).is_some() {
                    return Err(self.declaration_error("Variable name already used"));
                }

                let id = self.scope.declare(&name, data_type, self.line_number);
                trace!("line {}: declared local {} {}", self.line_number, data_type, name);

                let binding = VariableBinding {
                    name,
                    data_type,
                    location: VariableLocation::Local(id),
                };
                tokens.replace_at(unit, i, Token::statement(StatementKind::Variable(binding), None));
                tokens.erase(unit, i + 1);
            }
            i += 1;
        }
        Ok(())
    }

    pub(crate) fn process_function_calls(
        &self,
        tokens: &mut TokenList,
        unit: SequenceId,
    ) -> Result<(), CompileError> {
        let mut i = 0;
        while i + 1 < tokens.len(unit) {
            let call = match tokens.at(unit, i) {
                Token::Identifier(name) => group_content(tokens.at(unit, i + 1), ParenthesisType::Parenthesis)
                    .map(|arguments| (name.clone(), arguments)),
                _ => None,
            };

            if let Some((name, arguments)) = call {
                if self.globals.functions_by_name(&name).is_empty()
                    && !name.starts_with(BASE_CALL_PREFIX)
                {
                    return Err(self.resolution_error(format!("Unknown function name '{}'", name)));
                }

                let kind = StatementKind::FunctionCall {
                    name,
                    arguments,
                    function: None,
                    is_base_call: false,
                };
                tokens.replace_at(unit, i, Token::statement(kind, None));
                tokens.erase(unit, i + 1);
            }
            i += 1;
        }
        Ok(())
    }

    pub(crate) fn process_memory_accesses(
        &self,
        tokens: &mut TokenList,
        unit: SequenceId,
    ) -> Result<(), CompileError> {
        let mut i = 0;
        while i + 1 < tokens.len(unit) {
            let access = match tokens.at(unit, i) {
                Token::VarType(data_type) => {
                    group_content(tokens.at(unit, i + 1), ParenthesisType::Bracket)
                        .map(|content| (*data_type, content))
                }
                _ => None,
            };

            if let Some((data_type, content)) = access {
                let address = match tokens.sequence(content) {
                    [address] => *address,
                    _ => return Err(self.grammar_error("Expected exactly one token inside brackets")),
                };
                if !tokens.token(address).is_statement() {
                    return Err(self.grammar_error("Expected statement token inside brackets"));
                }

                tokens.replace_at(
                    unit,
                    i,
                    Token::statement(StatementKind::MemoryAccess { address }, Some(data_type)),
                );
                tokens.erase(unit, i + 1);
            }
            i += 1;
        }
        Ok(())
    }

    pub(crate) fn process_explicit_casts(&self, tokens: &mut TokenList, unit: SequenceId) {
        let mut i = 0;
        while i + 1 < tokens.len(unit) {
            let target = match tokens.at(unit, i) {
                Token::VarType(data_type) => {
                    group_content(tokens.at(unit, i + 1), ParenthesisType::Parenthesis)
                        .map(|_| *data_type)
                }
                _ => None,
            };

            if let Some(data_type) = target {
                let argument = tokens.id_at(unit, i + 1);
                tokens.replace_at(
                    unit,
                    i,
                    Token::statement(StatementKind::ValueCast { argument }, Some(data_type)),
                );
                tokens.erase(unit, i + 1);
            }
            i += 1;
        }
    }

    /// Bind the remaining identifiers, local variables shadowing globals
    pub(crate) fn process_identifiers(
        &self,
        tokens: &mut TokenList,
        unit: SequenceId,
    ) -> Result<(), CompileError> {
        for i in 0..tokens.len(unit) {
            let Token::Identifier(name) = tokens.at(unit, i) else {
                continue;
            };

            let binding = if let Some(id) = self.scope.find_visible(name) {
                VariableBinding {
                    name: name.clone(),
                    data_type: self.scope.variable(id).data_type,
                    location: VariableLocation::Local(id),
                }
            } else if let Some((id, global)) = self.globals.global_variable_by_name(name) {
                VariableBinding {
                    name: name.clone(),
                    data_type: global.data_type,
                    location: VariableLocation::Global(id),
                }
            } else {
                return Err(self.resolution_error(format!("Unable to resolve identifier: {}", name)));
            };

            tokens.replace_at(unit, i, Token::statement(StatementKind::Variable(binding), None));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::processing::test_support::*;
    use crate::program::scope::FunctionScope;

    /// Structure `source` and run the recognition passes on every unit
    fn recognize(scope: &mut FunctionScope, source: &str) -> Result<TokenList, CompileError> {
        let globals = globals();
        let mut tokens = TokenList::parse(source).unwrap();
        let mut processor = TokenProcessor::new(&globals, scope);
        let root = tokens.root();
        let mut units = processor.process_parentheses(&mut tokens, root)?;
        processor.process_comma_separators(&mut tokens, &mut units)?;
        for unit in units {
            processor.process_variable_definitions(&mut tokens, unit)?;
            processor.process_function_calls(&mut tokens, unit)?;
            processor.process_memory_accesses(&mut tokens, unit)?;
            processor.process_explicit_casts(&mut tokens, unit);
            processor.process_identifiers(&mut tokens, unit)?;
        }
        Ok(tokens)
    }

    #[test]
    fn test_declaration_registers_local() {
        let mut scope = scope();
        let tokens = recognize(&mut scope, "s16 offset = a").unwrap();

        let id = scope.find_visible("offset").unwrap();
        assert_eq!(scope.variable(id).data_type, DataType::S16);
        let Some(Statement {
            kind: StatementKind::Variable(binding),
            ..
        }) = tokens.statement(tokens.id_at(tokens.root(), 0))
        else {
            panic!("expected variable");
        };
        assert_eq!(binding.location, VariableLocation::Local(id));
    }

    #[test]
    fn test_declaration_errors() {
        let mut scope = scope();
        let err = recognize(&mut scope, "void nothing").unwrap_err();
        assert_eq!(err.message(), "void variables not allowed");

        let err = recognize(&mut scope, "u8 a").unwrap_err();
        assert_eq!(err.message(), "Variable name already used");

        let err = recognize(&mut scope, "x = u32").unwrap_err();
        assert!(matches!(err, CompileError::Declaration { .. }));
        assert_eq!(err.message(), "Type name must not be the last token");

        let err = recognize(&mut scope, "function 3").unwrap_err();
        assert_eq!(err.message(), "Function keyword must be followed by an identifier");
    }

    #[test]
    fn test_redeclaration_after_scope_closes() {
        let mut scope = scope();
        scope.push_scope();
        recognize(&mut scope, "u8 counter").unwrap();
        scope.pop_scope();

        recognize(&mut scope, "u8 counter").unwrap();
        assert_eq!(scope.local_variables().len(), 3);
        assert!(recognize(&mut scope, "u8 counter").is_err());
    }

    #[test]
    fn test_function_call_and_cast_recognition() {
        let mut scope = scope();
        let tokens = recognize(&mut scope, "abs(u8(a))").unwrap();
        assert_eq!(tokens.render(), "(call abs (u8 (group a)))");

        let err = recognize(&mut scope, "missing(1)").unwrap_err();
        assert!(matches!(err, CompileError::Resolution { .. }));
        assert_eq!(err.message(), "Unknown function name 'missing'");

        assert!(recognize(&mut scope, "base.update(a, b)").is_ok());
    }

    #[test]
    fn test_memory_access_recognition() {
        let mut scope = scope();
        let tokens = recognize(&mut scope, "u16[frame]").unwrap();
        assert_eq!(tokens.render(), "u16[frame]");

        let err = recognize(&mut scope, "u8[a, b]").unwrap_err();
        assert_eq!(err.message(), "Expected statement token inside brackets");

        let err = recognize(&mut scope, "u8[]").unwrap_err();
        assert_eq!(err.message(), "Expected exactly one token inside brackets");
    }

    #[test]
    fn test_identifier_resolution() {
        let mut scope = scope();
        let tokens = recognize(&mut scope, "frame").unwrap();
        let binding = match &tokens.statement(tokens.id_at(tokens.root(), 0)).unwrap().kind {
            StatementKind::Variable(binding) => binding.clone(),
            other => panic!("unexpected {:?}", other),
        };
        assert!(matches!(binding.location, VariableLocation::Global(_)));
        assert_eq!(binding.data_type, DataType::U32);

        let err = recognize(&mut scope, "a + nope").unwrap_err();
        assert_eq!(err.message(), "Unable to resolve identifier: nope");
    }
}
