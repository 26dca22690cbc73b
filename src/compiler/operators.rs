//! Operator set, priorities and associativity
//!
//! Priorities are "lower binds tighter": the binary folding pass repeatedly
//! folds the operator with the smallest priority number. Ties are broken by
//! the associativity of that priority level.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Assign,
    AssignPlus,
    AssignMinus,
    AssignMultiply,
    AssignDivide,
    AssignModulo,
    AssignShiftLeft,
    AssignShiftRight,
    AssignAnd,
    AssignOr,
    AssignXor,
    BinaryPlus,
    BinaryMinus,
    BinaryMultiply,
    BinaryDivide,
    BinaryModulo,
    BinaryShiftLeft,
    BinaryShiftRight,
    BinaryAnd,
    BinaryOr,
    BinaryXor,
    LogicalAnd,
    LogicalOr,
    UnaryNot,
    UnaryBitNot,
    UnaryDecrement,
    UnaryIncrement,
    CompareEqual,
    CompareNotEqual,
    CompareLess,
    CompareLessOrEqual,
    CompareGreater,
    CompareGreaterOrEqual,
    QuestionMark,
    Colon,
    SemicolonSeparator,
    CommaSeparator,
    ParenthesisLeft,
    ParenthesisRight,
    BracketLeft,
    BracketRight,
}

/// How a binary operator chooses its signature during type assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorCategory {
    Assignment,
    Symmetric,
    Comparison,
    Ternary,
}

/// Associativity per priority level; `true` means right to left
const RIGHT_ASSOCIATIVE: [bool; 19] = [
    false, // 0: unused
    false, // 1: reserved for scope resolution
    false, // 2: parentheses
    true,  // 3: unary operators
    false, // 4: reserved for element access
    false, // 5: multiplication, division
    false, // 6: addition, subtraction
    false, // 7: shifts
    false, // 8: relational comparisons
    false, // 9: equality comparisons
    false, // 10: bitwise and
    false, // 11: bitwise xor
    false, // 12: bitwise or
    false, // 13: logical and
    false, // 14: logical or
    true,  // 15: assignments and ternary
    true,  // 16: reserved for throw
    false, // 17: comma separator
    false, // 18: semicolon separator
];

impl Operator {
    pub fn priority(self) -> u8 {
        use Operator::*;
        match self {
            Assign | AssignPlus | AssignMinus | AssignMultiply | AssignDivide | AssignModulo
            | AssignShiftLeft | AssignShiftRight | AssignAnd | AssignOr | AssignXor => 15,
            BinaryPlus | BinaryMinus => 6,
            BinaryMultiply | BinaryDivide | BinaryModulo => 5,
            BinaryShiftLeft | BinaryShiftRight => 7,
            BinaryAnd => 10,
            BinaryOr => 12,
            BinaryXor => 11,
            LogicalAnd => 13,
            LogicalOr => 14,
            // Post-increment/decrement would be 2, but they are folded earlier
            UnaryNot | UnaryBitNot | UnaryDecrement | UnaryIncrement => 3,
            CompareEqual | CompareNotEqual => 9,
            CompareLess | CompareLessOrEqual | CompareGreater | CompareGreaterOrEqual => 8,
            QuestionMark | Colon => 15,
            SemicolonSeparator => 18,
            CommaSeparator => 17,
            ParenthesisLeft | ParenthesisRight | BracketLeft | BracketRight => 2,
        }
    }

    pub fn is_right_associative(self) -> bool {
        RIGHT_ASSOCIATIVE[self.priority() as usize]
    }

    /// Category for binary use, `None` for operators that never form a binary operation
    pub fn category(self) -> Option<OperatorCategory> {
        use Operator::*;
        match self {
            // TODO: shift assignments need their own signatures once shift amounts are typed separately
            Assign | AssignPlus | AssignMinus | AssignMultiply | AssignDivide | AssignModulo
            | AssignShiftLeft | AssignShiftRight | AssignAnd | AssignOr | AssignXor => {
                Some(OperatorCategory::Assignment)
            }
            BinaryPlus | BinaryMinus | BinaryMultiply | BinaryDivide | BinaryModulo
            | BinaryShiftLeft | BinaryShiftRight | BinaryAnd | BinaryOr | BinaryXor
            | LogicalAnd | LogicalOr | Colon => Some(OperatorCategory::Symmetric),
            CompareEqual | CompareNotEqual | CompareLess | CompareLessOrEqual | CompareGreater
            | CompareGreaterOrEqual => Some(OperatorCategory::Comparison),
            QuestionMark => Some(OperatorCategory::Ternary),
            UnaryNot | UnaryBitNot | UnaryDecrement | UnaryIncrement | SemicolonSeparator
            | CommaSeparator | ParenthesisLeft | ParenthesisRight | BracketLeft | BracketRight => {
                None
            }
        }
    }

    pub fn is_unary(self) -> bool {
        matches!(
            self,
            Operator::UnaryNot
                | Operator::UnaryBitNot
                | Operator::UnaryDecrement
                | Operator::UnaryIncrement
        )
    }

    pub fn symbol(self) -> &'static str {
        use Operator::*;
        match self {
            Assign => "=",
            AssignPlus => "+=",
            AssignMinus => "-=",
            AssignMultiply => "*=",
            AssignDivide => "/=",
            AssignModulo => "%=",
            AssignShiftLeft => "<<=",
            AssignShiftRight => ">>=",
            AssignAnd => "&=",
            AssignOr => "|=",
            AssignXor => "^=",
            BinaryPlus => "+",
            BinaryMinus => "-",
            BinaryMultiply => "*",
            BinaryDivide => "/",
            BinaryModulo => "%",
            BinaryShiftLeft => "<<",
            BinaryShiftRight => ">>",
            BinaryAnd => "&",
            BinaryOr => "|",
            BinaryXor => "^",
            LogicalAnd => "&&",
            LogicalOr => "||",
            UnaryNot => "!",
            UnaryBitNot => "~",
            UnaryDecrement => "--",
            UnaryIncrement => "++",
            CompareEqual => "==",
            CompareNotEqual => "!=",
            CompareLess => "<",
            CompareLessOrEqual => "<=",
            CompareGreater => ">",
            CompareGreaterOrEqual => ">=",
            QuestionMark => "?",
            Colon => ":",
            SemicolonSeparator => ";",
            CommaSeparator => ",",
            ParenthesisLeft => "(",
            ParenthesisRight => ")",
            BracketLeft => "[",
            BracketRight => "]",
        }
    }

    /// Error message for an operator found where it cannot be folded
    pub fn not_allowed_message(self) -> String {
        use Operator::*;
        match self {
            SemicolonSeparator => "Semicolon ; is only allowed in for-loops".to_string(),
            CommaSeparator => "Comma , is not allowed here".to_string(),
            ParenthesisLeft | ParenthesisRight => {
                format!("Parenthesis {} is not allowed here", self.symbol())
            }
            BracketLeft | BracketRight => format!("Bracket {} is not allowed here", self.symbol()),
            _ if self.is_unary() => format!("Unary operator {} is not allowed here", self.symbol()),
            _ => format!("Binary operator {} is not allowed here", self.symbol()),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
