//! Primitive data types of the scripting language
//!
//! The language only knows fixed-width integers, `bool` and `void`, plus the
//! `const_int` pseudo-type given to integer literals that have not yet been
//! bound to a concrete width.
//!
//! | Type       | Bytes | Signed | Size class |
//! |------------|-------|--------|------------|
//! | `u8`/`s8`  | 1     | no/yes | 0          |
//! | `u16`/`s16`| 2     | no/yes | 1          |
//! | `u32`/`s32`| 4     | no/yes | 2          |
//! | `u64`/`s64`| 8     | no/yes | 3          |
//! | `bool`     | 1     | no     | 0          |
//! | `const_int`| 8     | yes    | 3          |
//! | `void`     | 0     | -      | -          |

use std::fmt;

/// Broad classification used by the cast rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeClass {
    Void,
    Integer,
}

/// Meaning attached to an integer type beyond its width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerSemantics {
    Default,
    Boolean,
    Constant,
}

/// The predefined data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Void,
    Bool,
    U8,
    U16,
    U32,
    U64,
    S8,
    S16,
    S32,
    S64,
    ConstInt,
}

impl DataType {
    /// All types that can be named in script source
    pub const NAMED: [DataType; 10] = [
        DataType::Void,
        DataType::Bool,
        DataType::U8,
        DataType::U16,
        DataType::U32,
        DataType::U64,
        DataType::S8,
        DataType::S16,
        DataType::S32,
        DataType::S64,
    ];

    /// Look up a type by its source name (`u8`, `s32`, `bool`, ...)
    pub fn from_name(name: &str) -> Option<DataType> {
        DataType::NAMED.iter().copied().find(|t| t.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Void => "void",
            DataType::Bool => "bool",
            DataType::U8 => "u8",
            DataType::U16 => "u16",
            DataType::U32 => "u32",
            DataType::U64 => "u64",
            DataType::S8 => "s8",
            DataType::S16 => "s16",
            DataType::S32 => "s32",
            DataType::S64 => "s64",
            DataType::ConstInt => "const_int",
        }
    }

    pub fn class(self) -> TypeClass {
        match self {
            DataType::Void => TypeClass::Void,
            _ => TypeClass::Integer,
        }
    }

    pub fn is_integer(self) -> bool {
        self.class() == TypeClass::Integer
    }

    /// Width in bytes
    pub fn bytes(self) -> usize {
        match self {
            DataType::Void => 0,
            DataType::Bool | DataType::U8 | DataType::S8 => 1,
            DataType::U16 | DataType::S16 => 2,
            DataType::U32 | DataType::S32 => 4,
            DataType::U64 | DataType::S64 | DataType::ConstInt => 8,
        }
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            DataType::S8 | DataType::S16 | DataType::S32 | DataType::S64 | DataType::ConstInt
        )
    }

    pub fn semantics(self) -> IntegerSemantics {
        match self {
            DataType::Bool => IntegerSemantics::Boolean,
            DataType::ConstInt => IntegerSemantics::Constant,
            _ => IntegerSemantics::Default,
        }
    }

    /// Base-2 logarithm of the byte width (0 for one byte, 3 for eight)
    pub fn size_class(self) -> u8 {
        match self.bytes() {
            2 => 1,
            4 => 2,
            8 => 3,
            _ => 0,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_types_round_trip() {
        for t in DataType::NAMED {
            assert_eq!(DataType::from_name(t.name()), Some(t));
        }
        assert_eq!(DataType::from_name("const_int"), None);
        assert_eq!(DataType::from_name("int"), None);
    }

    #[test]
    fn test_type_properties() {
        assert_eq!(DataType::U16.bytes(), 2);
        assert!(!DataType::U16.is_signed());
        assert!(DataType::S64.is_signed());
        assert_eq!(DataType::S32.size_class(), 2);
        assert_eq!(DataType::Bool.semantics(), IntegerSemantics::Boolean);
        assert_eq!(DataType::Void.class(), TypeClass::Void);
        assert!(DataType::ConstInt.is_integer());
    }
}
