//! Dynamic value type
//!
//! [`Value`] is the runtime representation the engine converts from and
//! into. Its `Display` output is the engine's "stringify" operation: strings
//! render raw, numbers in plain decimal, enumeration constants by name.

use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::array::TypedArray;
use crate::enums::EnumConstant;
use crate::sequence::Sequence;
use crate::types::{NumericKind, TypeDesc};

/// Dynamic value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value
    Null,

    // ========== Scalars ==========
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    BigInt(BigInt),
    Decimal(BigDecimal),
    Str(String),
    Enum(EnumConstant),

    // ========== Containers ==========
    Array(TypedArray),
    Seq(Sequence),
}

impl Value {
    /// Short name of this value's runtime kind
    pub fn type_name(&self) -> &str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Char(_) => "char",
            Value::I8(_) => "i8",
            Value::I16(_) => "i16",
            Value::I32(_) => "i32",
            Value::I64(_) => "i64",
            Value::F32(_) => "f32",
            Value::F64(_) => "f64",
            Value::BigInt(_) => "BigInt",
            Value::Decimal(_) => "BigDecimal",
            Value::Str(_) => "string",
            Value::Enum(constant) => constant.enum_type().name(),
            Value::Array(_) => "array",
            Value::Seq(seq) => seq.kind().name(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric kind of this value, if it is a number
    pub fn numeric_kind(&self) -> Option<NumericKind> {
        match self {
            Value::I8(_) => Some(NumericKind::I8),
            Value::I16(_) => Some(NumericKind::I16),
            Value::I32(_) => Some(NumericKind::I32),
            Value::I64(_) => Some(NumericKind::I64),
            Value::F32(_) => Some(NumericKind::F32),
            Value::F64(_) => Some(NumericKind::F64),
            Value::BigInt(_) => Some(NumericKind::BigInt),
            Value::Decimal(_) => Some(NumericKind::Decimal),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric_kind().is_some()
    }

    /// Arrays and sequences
    pub fn is_container(&self) -> bool {
        matches!(self, Value::Array(_) | Value::Seq(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Elements of an array or sequence, in iteration order
    pub fn elements(&self) -> Option<Vec<Value>> {
        match self {
            Value::Array(array) => Some(array.values()),
            Value::Seq(seq) => Some(seq.items().to_vec()),
            _ => None,
        }
    }

    /// Whether this value already has the exact representation `target`.
    ///
    /// Sequences only match a sequence target of the same kind whose
    /// element descriptor is `Any`, since their elements are untyped.
    pub fn is_instance_of(&self, target: &TypeDesc) -> bool {
        match (self, target) {
            (_, TypeDesc::Any) => true,
            (Value::Bool(_), TypeDesc::Bool) => true,
            (Value::Char(_), TypeDesc::Char) => true,
            (Value::Str(_), TypeDesc::Str) => true,
            (Value::Enum(constant), TypeDesc::Enum(ty)) => constant.enum_type() == ty,
            (Value::Array(array), TypeDesc::Array(element)) => array.element_desc() == **element,
            (Value::Seq(seq), TypeDesc::Sequence(kind, element)) => {
                seq.kind() == kind && **element == TypeDesc::Any
            }
            (value, TypeDesc::Numeric(kind)) => value.numeric_kind() == Some(*kind),
            _ => false,
        }
    }

    /// Diagnostic rendering: like `Display`, but quotes text and characters
    pub fn describe(&self) -> String {
        match self {
            Value::Str(s) => format!("{:?}", s),
            Value::Char(c) => format!("{:?}", c),
            other => other.to_string(),
        }
    }
}

// ========== From implementations ==========

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    BigInt => BigInt,
    BigDecimal => Decimal,
    String => Str,
    EnumConstant => Enum,
    TypedArray => Array,
    Sequence => Seq,
}

/// Extraction of a Rust value from the matching [`Value`] variant.
///
/// No conversion happens here: `i32::from_value(Value::I64(1))` is `None`.
/// Use [`Morph::to`](crate::dispatch::Morph::to) to convert first.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_value! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    BigInt => BigInt,
    BigDecimal => Decimal,
    String => Str,
    EnumConstant => Enum,
    TypedArray => Array,
    Sequence => Seq,
}

impl FromValue for Value {
    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ========== Display implementation ==========

fn write_joined<'a, I>(f: &mut fmt::Formatter<'_>, items: I) -> fmt::Result
where
    I: IntoIterator<Item = &'a Value>,
{
    write!(f, "[")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    write!(f, "]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Char(v) => write!(f, "{}", v),
            Value::I8(v) => write!(f, "{}", v),
            Value::I16(v) => write!(f, "{}", v),
            Value::I32(v) => write!(f, "{}", v),
            Value::I64(v) => write!(f, "{}", v),
            Value::F32(v) => write!(f, "{}", v),
            Value::F64(v) => write!(f, "{}", v),
            Value::BigInt(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Str(s) => f.write_str(s),
            Value::Enum(constant) => f.write_str(constant.name()),
            Value::Array(array) => write_joined(f, &array.values()),
            Value::Seq(seq) => write_joined(f, seq.items()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_from_primitives() {
        assert!(matches!(Value::from(42i64), Value::I64(42)));
        assert!(matches!(Value::from(7i8), Value::I8(7)));
        assert!(matches!(Value::from(3.125f64), Value::F64(_)));
        assert!(matches!(Value::from(true), Value::Bool(true)));
        assert!(matches!(Value::from("hello"), Value::Str(_)));
        assert!(matches!(Value::from(None::<i32>), Value::Null));
    }

    #[test]
    fn test_value_numeric_kind() {
        assert_eq!(Value::I16(1).numeric_kind(), Some(NumericKind::I16));
        assert_eq!(
            Value::BigInt(BigInt::from(5)).numeric_kind(),
            Some(NumericKind::BigInt)
        );
        assert_eq!(Value::Char('1').numeric_kind(), None);
        assert!(!Value::from("1").is_numeric());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::I64(42).to_string(), "42");
        assert_eq!(Value::F64(1.5).to_string(), "1.5");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::from("raw text").to_string(), "raw text");
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(
            Value::Array(TypedArray::I32(vec![1, 2, 3])).to_string(),
            "[1, 2, 3]"
        );
    }

    #[test]
    fn test_value_describe_quotes_text() {
        assert_eq!(Value::from("a b").describe(), "\"a b\"");
        assert_eq!(Value::Char('x').describe(), "'x'");
        assert_eq!(Value::I8(-3).describe(), "-3");
    }

    #[test]
    fn test_is_instance_of() {
        assert!(Value::I32(1).is_instance_of(&TypeDesc::I32));
        assert!(!Value::I32(1).is_instance_of(&TypeDesc::I64));
        assert!(Value::Null.is_instance_of(&TypeDesc::Any));
        assert!(Value::Array(TypedArray::Char(vec!['a']))
            .is_instance_of(&TypeDesc::array(TypeDesc::Char)));
        assert!(!Value::Array(TypedArray::Char(vec!['a']))
            .is_instance_of(&TypeDesc::array(TypeDesc::Str)));
    }
}
