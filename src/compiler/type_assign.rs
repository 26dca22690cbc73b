//! Type assignment
//!
//! Walks the folded tree top-down, handing each node an optional expected
//! type, and returns the node's type bottom-up. Along the way it picks the
//! function overload for every call, the operator signature for every binary
//! operation, and wraps integer operands whose width differs from the chosen
//! signature in a [`StatementKind::ValueCast`].

use super::casting::{
    best_signature, implicit_cast_cost, overload_priority, CANNOT_CAST, OVERLOAD_PRIORITY_LIMIT,
};
use super::errors::CompileError;
use super::operators::{Operator, OperatorCategory};
use super::processing::{TokenProcessor, ADDRESS_TYPE, BASE_CALL_PREFIX};
use super::token::{SequenceId, Statement, StatementKind, Token, TokenId, TokenList};
use crate::program::globals::FunctionId;
use crate::program::types::DataType;
use log::trace;

impl<'a> TokenProcessor<'a> {
    /// Assign data types to the statement `id` and everything below it.
    ///
    /// `expected` is the type the surrounding expression would like to see;
    /// only constants adopt it directly.
    pub(crate) fn assign_statement_data_type(
        &self,
        tokens: &mut TokenList,
        id: TokenId,
        expected: Option<DataType>,
    ) -> Result<DataType, CompileError> {
        let Some(statement) = tokens.statement(id) else {
            return Err(self.grammar_error(format!(
                "Expected a value, found '{}'",
                tokens.render_token(id)
            )));
        };
        let kind = statement.kind.clone();
        let preset = statement.data_type;

        let data_type = match kind {
            StatementKind::Constant(_) => expected.unwrap_or(DataType::ConstInt),

            StatementKind::Variable(binding) => binding.data_type,

            StatementKind::FunctionCall {
                name, arguments, ..
            } => return self.assign_function_call_type(tokens, id, &name, arguments),

            StatementKind::MemoryAccess { address } => {
                let address_type = self.assign_statement_data_type(tokens, address, Some(ADDRESS_TYPE))?;
                if implicit_cast_cost(address_type, ADDRESS_TYPE) == CANNOT_CAST {
                    return Err(self.type_error(format!(
                        "Memory address of type '{}' can not be used as '{}'",
                        address_type, ADDRESS_TYPE
                    )));
                }
                self.preset_type(preset)?
            }

            StatementKind::Parenthesis { content, .. } => {
                let inner = self.single_statement(tokens, content, "Parenthesis content")?;
                self.assign_statement_data_type(tokens, inner, expected)?
            }

            StatementKind::UnaryOperation { argument, .. } => {
                self.assign_statement_data_type(tokens, argument, expected)?
            }

            StatementKind::BinaryOperation {
                operator,
                left,
                right,
            } => return self.assign_binary_operation_type(tokens, id, operator, left, right, expected),

            StatementKind::ValueCast { argument } => {
                let target = self.preset_type(preset)?;
                let argument_type = self.assign_statement_data_type(tokens, argument, Some(target))?;
                if implicit_cast_cost(argument_type, target) == CANNOT_CAST {
                    return Err(self.type_error("Explicit cast not possible"));
                }
                target
            }
        };

        set_data_type(tokens, id, data_type);
        Ok(data_type)
    }

    /// Type of a node whose type was fixed when it was recognized
    fn preset_type(&self, preset: Option<DataType>) -> Result<DataType, CompileError> {
        preset.ok_or_else(|| self.type_error("Missing data type on typed access"))
    }

    /// The only token of `sequence`, which must be a statement
    fn single_statement(
        &self,
        tokens: &TokenList,
        sequence: SequenceId,
        what: &str,
    ) -> Result<TokenId, CompileError> {
        match tokens.sequence(sequence) {
            [only] if tokens.token(*only).is_statement() => Ok(*only),
            [_] => Err(self.grammar_error(format!("{} must be a statement", what))),
            _ => Err(self.grammar_error(format!("{} must be one token", what))),
        }
    }

    /// Argument statements of a call, in order
    fn call_arguments(
        &self,
        tokens: &TokenList,
        arguments: SequenceId,
    ) -> Result<Vec<TokenId>, CompileError> {
        if tokens.is_empty(arguments) {
            return Ok(Vec::new());
        }
        if let Token::CommaSeparated(items) = tokens.at(arguments, 0) {
            return items
                .iter()
                .map(|&item| self.single_statement(tokens, item, "Function parameter content"))
                .collect();
        }
        Ok(vec![self.single_statement(tokens, arguments, "Function parameter content")?])
    }

    fn assign_function_call_type(
        &self,
        tokens: &mut TokenList,
        id: TokenId,
        name: &str,
        arguments: SequenceId,
    ) -> Result<DataType, CompileError> {
        let argument_ids = self.call_arguments(tokens, arguments)?;
        let mut argument_types = Vec::with_capacity(argument_ids.len());
        for argument in argument_ids {
            argument_types.push(self.assign_statement_data_type(tokens, argument, None)?);
        }

        let current = self.scope.function();
        let is_base_call = name.strip_prefix(BASE_CALL_PREFIX) == Some(current.name.as_str());

        let (function, return_type) = if is_base_call {
            if argument_types.len() != current.parameters.len() {
                return Err(self.type_error("Base function call has different parameter count"));
            }
            for (index, (argument, parameter_type)) in
                argument_types.iter().zip(current.parameter_types()).enumerate()
            {
                if *argument != parameter_type {
                    return Err(self.type_error(format!(
                        "Base function call has different parameter at index {}",
                        index
                    )));
                }
            }
            (None, current.return_type)
        } else {
            let function = self.select_overload(name, &argument_types)?;
            (Some(function), self.globals.function(function).return_type)
        };

        if let Token::Statement(Statement {
            kind:
                StatementKind::FunctionCall {
                    function: resolved,
                    is_base_call: base,
                    ..
                },
            data_type,
        }) = tokens.token_mut(id)
        {
            *resolved = function;
            *base = is_base_call;
            *data_type = Some(return_type);
        }
        Ok(return_type)
    }

    /// Cheapest overload of `name` for the given argument types; the first
    /// registered one wins ties
    fn select_overload(&self, name: &str, argument_types: &[DataType]) -> Result<FunctionId, CompileError> {
        let candidates = self.globals.functions_by_name(name);
        if candidates.is_empty() {
            return Err(self.resolution_error(format!("Unknown function name '{}'", name)));
        }

        let mut best = None;
        let mut best_priority = OVERLOAD_PRIORITY_LIMIT;
        for &candidate in candidates {
            let priority = overload_priority(argument_types, &self.globals.function(candidate).parameters);
            if priority < best_priority {
                best_priority = priority;
                best = Some(candidate);
            }
        }

        let function = best.ok_or_else(|| {
            self.type_error(format!(
                "No appropriate function overload found calling '{}', the number or types of parameters passed are wrong",
                name
            ))
        })?;
        trace!(
            "line {}: call to '{}' resolved to overload #{} (priority {:#010x})",
            self.line_number,
            name,
            function.0,
            best_priority
        );
        Ok(function)
    }

    fn assign_binary_operation_type(
        &self,
        tokens: &mut TokenList,
        id: TokenId,
        operator: Operator,
        left: TokenId,
        right: TokenId,
        expected: Option<DataType>,
    ) -> Result<DataType, CompileError> {
        let Some(category) = operator.category() else {
            return Err(self.grammar_error(operator.not_allowed_message()));
        };

        let operand_hint = match category {
            OperatorCategory::Symmetric => expected,
            _ => None,
        };
        let left_type = self.assign_statement_data_type(tokens, left, operand_hint)?;
        let right_hint = match category {
            OperatorCategory::Assignment => Some(left_type),
            _ => operand_hint,
        };
        let right_type = self.assign_statement_data_type(tokens, right, right_hint)?;

        let signature = best_signature(operator, left_type, right_type).ok_or_else(|| {
            self.type_error(format!(
                "Can not implicitly cast between types '{}' and '{}'",
                left_type, right_type
            ))
        })?;

        let (mut left, mut right) = (left, right);
        if category != OperatorCategory::Ternary && left_type.is_integer() && right_type.is_integer() {
            // Signedness differences need no conversion
            if left_type.bytes() != signature.left.bytes() {
                left = self.insert_cast(tokens, left, left_type, signature.left);
            }
            if right_type.bytes() != signature.right.bytes() {
                right = self.insert_cast(tokens, right, right_type, signature.right);
            }
        }

        if let Token::Statement(Statement {
            kind:
                StatementKind::BinaryOperation {
                    left: left_slot,
                    right: right_slot,
                    ..
                },
            data_type,
        }) = tokens.token_mut(id)
        {
            *left_slot = left;
            *right_slot = right;
            *data_type = Some(signature.result);
        }
        Ok(signature.result)
    }

    /// Wrap `argument` in a cast node converting it to `target`
    fn insert_cast(
        &self,
        tokens: &mut TokenList,
        argument: TokenId,
        from: DataType,
        target: DataType,
    ) -> TokenId {
        trace!(
            "line {}: implicit cast {} -> {}",
            self.line_number,
            from,
            target
        );
        tokens.alloc(Token::statement(StatementKind::ValueCast { argument }, Some(target)))
    }
}

fn set_data_type(tokens: &mut TokenList, id: TokenId, data_type: DataType) {
    if let Token::Statement(statement) = tokens.token_mut(id) {
        statement.data_type = Some(data_type);
    }
}
