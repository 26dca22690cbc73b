//! Operator folding
//!
//! Unary operators are folded first, in two sweeps: postfix `++`/`--` left to
//! right, then prefix operators right to left so that `- ~x` nests inside out.
//! Binary operators are then folded one at a time, always picking the operator
//! that binds tightest:
//!
//! | Priority | Operators                          | Associativity |
//! |----------|------------------------------------|---------------|
//! | 5        | `*` `/` `%`                        | left          |
//! | 6        | `+` `-`                            | left          |
//! | 7        | `<<` `>>`                          | left          |
//! | 8        | `<` `<=` `>` `>=`                  | left          |
//! | 9        | `==` `!=`                          | left          |
//! | 10 - 14  | `&` `^` `\|` `&&` `\|\|`           | left          |
//! | 15       | assignments, `?`, `:`              | right         |

use super::errors::CompileError;
use super::operators::Operator;
use super::processing::TokenProcessor;
use super::token::{SequenceId, StatementKind, Token, TokenList};
use log::trace;

/// Evaluate `left op right` at compile time, for the operators that support it.
///
/// Arithmetic wraps; division and modulo by zero yield zero.
pub fn fold_constants(op: Operator, left: i64, right: i64) -> Option<i64> {
    let value = match op {
        Operator::BinaryPlus => left.wrapping_add(right),
        Operator::BinaryMinus => left.wrapping_sub(right),
        Operator::BinaryMultiply => left.wrapping_mul(right),
        Operator::BinaryDivide if right == 0 => 0,
        Operator::BinaryDivide => left.wrapping_div(right),
        Operator::BinaryModulo if right == 0 => 0,
        Operator::BinaryModulo => left.wrapping_rem(right),
        // Shift amounts are taken modulo 64
        Operator::BinaryShiftLeft => left.wrapping_shl(right as u32),
        Operator::BinaryShiftRight => left.wrapping_shr(right as u32),
        _ => return None,
    };
    Some(value)
}

impl<'a> TokenProcessor<'a> {
    pub(crate) fn process_unary_operations(
        &self,
        tokens: &mut TokenList,
        unit: SequenceId,
    ) -> Result<(), CompileError> {
        // Postfix increment and decrement
        let mut i = 1;
        while i < tokens.len(unit) {
            let postfix = match tokens.at(unit, i).as_operator() {
                Some(op @ (Operator::UnaryIncrement | Operator::UnaryDecrement))
                    if tokens.at(unit, i - 1).is_statement() =>
                {
                    Some(op)
                }
                _ => None,
            };
            if let Some(operator) = postfix {
                self.fold_unary(tokens, unit, i, i - 1, operator, true);
                tokens.erase(unit, i - 1);
                // The token after the folded operator is skipped
                i += 1;
            }
            i += 1;
        }

        // Prefix operators
        let mut i = tokens.len(unit);
        while i > 0 {
            i -= 1;
            let Some(operator) = tokens.at(unit, i).as_operator() else {
                continue;
            };
            let is_last = i + 1 == tokens.len(unit);

            match operator {
                Operator::BinaryMinus | Operator::UnaryNot | Operator::UnaryBitNot => {
                    if is_last {
                        return Err(self.grammar_error("Unary operator not allowed as last"));
                    }
                    // A minus following anything but an operator is a subtraction
                    if operator == Operator::BinaryMinus
                        && i > 0
                        && tokens.at(unit, i - 1).as_operator().is_none()
                    {
                        continue;
                    }
                    if !tokens.at(unit, i + 1).is_statement() {
                        return Err(self.grammar_error("Right of operator is no statement"));
                    }
                }
                Operator::UnaryIncrement | Operator::UnaryDecrement => {
                    if is_last || !tokens.at(unit, i + 1).is_statement() {
                        continue;
                    }
                }
                _ => continue,
            }

            self.fold_unary(tokens, unit, i, i + 1, operator, false);
            tokens.erase(unit, i + 1);
        }
        Ok(())
    }

    /// Replace the operator at `position` with a unary operation on the token at `operand`
    fn fold_unary(
        &self,
        tokens: &mut TokenList,
        unit: SequenceId,
        position: usize,
        operand: usize,
        operator: Operator,
        is_postfix: bool,
    ) {
        let argument = tokens.id_at(unit, operand);
        let kind = StatementKind::UnaryOperation {
            operator,
            argument,
            is_postfix,
        };
        tokens.replace_at(unit, position, Token::statement(kind, None));
    }

    pub(crate) fn process_binary_operations(
        &self,
        tokens: &mut TokenList,
        unit: SequenceId,
    ) -> Result<(), CompileError> {
        loop {
            let len = tokens.len(unit);
            let mut best: Option<(usize, Operator)> = None;

            for i in 0..len {
                let Some(op) = tokens.at(unit, i).as_operator() else {
                    continue;
                };
                if i == 0
                    || i + 1 == len
                    || op == Operator::SemicolonSeparator
                    || op.category().is_none()
                {
                    return Err(self.grammar_error(op.not_allowed_message()));
                }

                let replaces_best = match best {
                    None => true,
                    Some((_, best_op)) if op.priority() == best_op.priority() => {
                        op.is_right_associative()
                    }
                    Some((_, best_op)) => op.priority() < best_op.priority(),
                };
                if replaces_best {
                    best = Some((i, op));
                }
            }

            let Some((position, operator)) = best else {
                return Ok(());
            };

            let left = tokens.id_at(unit, position - 1);
            let right = tokens.id_at(unit, position + 1);
            if !tokens.token(left).is_statement() {
                return Err(self.grammar_error("Left of operator is no statement"));
            }
            if !tokens.token(right).is_statement() {
                return Err(self.grammar_error("Right of operator is no statement"));
            }

            let folded = match (
                tokens.token(left).untyped_constant(),
                tokens.token(right).untyped_constant(),
            ) {
                (Some(l), Some(r)) => fold_constants(operator, l, r),
                _ => None,
            };

            let replacement = match folded {
                Some(value) => {
                    trace!(
                        "line {}: folded constant {} {} {} = {}",
                        self.line_number,
                        tokens.render_token(left),
                        operator,
                        tokens.render_token(right),
                        value
                    );
                    Token::statement(StatementKind::Constant(value), tokens.data_type_of(left))
                }
                None => Token::statement(
                    StatementKind::BinaryOperation {
                        operator,
                        left,
                        right,
                    },
                    None,
                ),
            };

            tokens.replace_at(unit, position, replacement);
            tokens.erase(unit, position + 1);
            tokens.erase(unit, position - 1);
        }
    }
}
