//! Implicit cast costs and signature selection
//!
//! Costs are small integers where lower is better. They rank both the fixed
//! binary operator signatures and user function overloads:
//!
//! | Conversion                                   | Cost                 |
//! |----------------------------------------------|----------------------|
//! | identical types                              | `0`                  |
//! | from or to `const_int`                       | `1`                  |
//! | same width, signed to unsigned               | `2`                  |
//! | same width, otherwise                        | `1`                  |
//! | widening (signed to unsigned)                | `0x10` (`0x20`) + Δ  |
//! | narrowing (signed to unsigned)               | `0x30` (`0x40`) + Δ  |
//! | anything involving a non-integer             | [`CANNOT_CAST`]      |
//!
//! Δ is the size-class difference target minus source, in wrapping 8-bit
//! arithmetic, so narrowing casts land slightly below their base value.

use super::operators::{Operator, OperatorCategory};
use crate::program::globals::Parameter;
use crate::program::types::{DataType, IntegerSemantics};

/// Cost of a conversion that is not possible at all
pub const CANNOT_CAST: u8 = 0xff;

/// Upper bound (exclusive) for a usable binary signature priority
const SIGNATURE_PRIORITY_LIMIT: u16 = 0xff00;

/// Priority of an overload whose parameter count does not match
pub const OVERLOAD_MISMATCH: u32 = 0xffff_ffff;

/// Upper bound (exclusive) for a usable overload priority
pub const OVERLOAD_PRIORITY_LIMIT: u32 = 0xff00_0000;

/// Cost of implicitly converting `original` into `target`
pub fn implicit_cast_cost(original: DataType, target: DataType) -> u8 {
    if original == target {
        return 0;
    }

    if !original.is_integer() || !target.is_integer() {
        return CANNOT_CAST;
    }

    if original.semantics() == IntegerSemantics::Constant
        || target.semantics() == IntegerSemantics::Constant
    {
        return 1;
    }

    let loses_sign = original.is_signed() && !target.is_signed();
    if original.bytes() == target.bytes() {
        return if loses_sign { 0x02 } else { 0x01 };
    }

    let delta = target.size_class().wrapping_sub(original.size_class());
    let base: u8 = if original.bytes() < target.bytes() {
        if loses_sign { 0x20 } else { 0x10 }
    } else if loses_sign {
        0x40
    } else {
        0x30
    };
    base.wrapping_add(delta)
}

/// Fixed operand and result types of a binary operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryOperatorSignature {
    pub left: DataType,
    pub right: DataType,
    pub result: DataType,
}

const fn sig(left: DataType, right: DataType, result: DataType) -> BinaryOperatorSignature {
    BinaryOperatorSignature { left, right, result }
}

// Shifts and multiplication reuse the symmetric table even where mixed
// signedness would call for dedicated signatures.
const SIGNATURES_SYMMETRIC: [BinaryOperatorSignature; 8] = [
    sig(DataType::S64, DataType::S64, DataType::S64),
    sig(DataType::U64, DataType::U64, DataType::U64),
    sig(DataType::S32, DataType::S32, DataType::S32),
    sig(DataType::U32, DataType::U32, DataType::U32),
    sig(DataType::S16, DataType::S16, DataType::S16),
    sig(DataType::U16, DataType::U16, DataType::U16),
    sig(DataType::S8, DataType::S8, DataType::S8),
    sig(DataType::U8, DataType::U8, DataType::U8),
];

const SIGNATURES_COMPARISON: [BinaryOperatorSignature; 8] = [
    sig(DataType::S64, DataType::S64, DataType::Bool),
    sig(DataType::U64, DataType::U64, DataType::Bool),
    sig(DataType::S32, DataType::S32, DataType::Bool),
    sig(DataType::U32, DataType::U32, DataType::Bool),
    sig(DataType::S16, DataType::S16, DataType::Bool),
    sig(DataType::U16, DataType::U16, DataType::Bool),
    sig(DataType::S8, DataType::S8, DataType::Bool),
    sig(DataType::U8, DataType::U8, DataType::Bool),
];

const SIGNATURES_TERNARY: [BinaryOperatorSignature; 8] = [
    sig(DataType::Bool, DataType::S64, DataType::S64),
    sig(DataType::Bool, DataType::U64, DataType::U64),
    sig(DataType::Bool, DataType::S32, DataType::S32),
    sig(DataType::Bool, DataType::U32, DataType::U32),
    sig(DataType::Bool, DataType::S16, DataType::S16),
    sig(DataType::Bool, DataType::U16, DataType::U16),
    sig(DataType::Bool, DataType::S8, DataType::S8),
    sig(DataType::Bool, DataType::U8, DataType::U8),
];

/// Combined cost of using `signature` for operands of type `left` and `right`.
///
/// The worse of the two costs occupies the high byte, so a signature with one
/// bad conversion always ranks behind one with two mediocre ones.
pub fn signature_priority(signature: &BinaryOperatorSignature, left: DataType, right: DataType) -> u16 {
    let prio_left = implicit_cast_cost(left, signature.left) as u16;
    let prio_right = implicit_cast_cost(right, signature.right) as u16;
    if prio_left < prio_right {
        (prio_right << 8) + prio_left
    } else {
        (prio_left << 8) + prio_right
    }
}

/// Best-fitting signature of `op` for the given operand types
pub fn best_signature(op: Operator, left: DataType, right: DataType) -> Option<BinaryOperatorSignature> {
    let (signatures, exact_left): (&[BinaryOperatorSignature], bool) = match op.category()? {
        OperatorCategory::Assignment => (&SIGNATURES_SYMMETRIC, true),
        OperatorCategory::Symmetric => (&SIGNATURES_SYMMETRIC, false),
        OperatorCategory::Comparison => (&SIGNATURES_COMPARISON, false),
        OperatorCategory::Ternary => (&SIGNATURES_TERNARY, false),
    };

    let mut best = None;
    let mut best_priority = SIGNATURE_PRIORITY_LIMIT;
    for signature in signatures {
        if exact_left && signature.left != left {
            continue;
        }
        let priority = signature_priority(signature, left, right);
        if priority < best_priority {
            best_priority = priority;
            best = Some(*signature);
        }
    }
    best
}

/// Priority of calling an overload with `parameters` using arguments of type `arguments`.
///
/// Per-argument costs are sorted worst first and the top four packed into one
/// key, most significant byte first.
pub fn overload_priority(arguments: &[DataType], parameters: &[Parameter]) -> u32 {
    if arguments.len() != parameters.len() {
        return OVERLOAD_MISMATCH;
    }

    let mut costs: Vec<u8> = arguments
        .iter()
        .zip(parameters)
        .map(|(&arg, param)| implicit_cast_cost(arg, param.data_type))
        .collect();
    costs.sort_unstable_by(|a, b| b.cmp(a));

    costs
        .iter()
        .take(4)
        .enumerate()
        .fold(0u32, |key, (i, &cost)| key | ((cost as u32) << (24 - i * 8)))
}
