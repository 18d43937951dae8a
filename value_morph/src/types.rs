//! Type descriptors
//!
//! A [`TypeDesc`] names the representation a caller wants a value converted
//! into. Descriptors are immutable, cheap to clone and compare structurally
//! (enumeration types compare by identity).

use std::fmt;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::array::TypedArray;
use crate::enums::EnumType;
use crate::sequence::{Sequence, SequenceKind};
use crate::value::Value;

/// The numeric representations understood by the lattice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NumericKind {
    /// 8-bit signed integer (also the byte kind)
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 32-bit IEEE float
    F32,
    /// 64-bit IEEE float
    F64,
    /// Arbitrary-precision integer
    BigInt,
    /// Arbitrary-precision decimal
    Decimal,
}

impl NumericKind {
    /// Every kind, narrowest integer first
    pub const ALL: [NumericKind; 8] = [
        NumericKind::I8,
        NumericKind::I16,
        NumericKind::I32,
        NumericKind::I64,
        NumericKind::F32,
        NumericKind::F64,
        NumericKind::BigInt,
        NumericKind::Decimal,
    ];

    /// The fixed-width integer kinds
    pub const FIXED_INTEGERS: [NumericKind; 4] = [
        NumericKind::I8,
        NumericKind::I16,
        NumericKind::I32,
        NumericKind::I64,
    ];

    /// Display name of the kind
    pub fn name(&self) -> &'static str {
        match self {
            NumericKind::I8 => "i8",
            NumericKind::I16 => "i16",
            NumericKind::I32 => "i32",
            NumericKind::I64 => "i64",
            NumericKind::F32 => "f32",
            NumericKind::F64 => "f64",
            NumericKind::BigInt => "BigInt",
            NumericKind::Decimal => "BigDecimal",
        }
    }

    /// Fixed-width integer kind
    pub fn is_fixed_integer(&self) -> bool {
        matches!(
            self,
            NumericKind::I8 | NumericKind::I16 | NumericKind::I32 | NumericKind::I64
        )
    }

    /// Binary floating-point kind
    pub fn is_float(&self) -> bool {
        matches!(self, NumericKind::F32 | NumericKind::F64)
    }

    /// Zero of this kind
    pub fn zero(&self) -> Value {
        match self {
            NumericKind::I8 => Value::I8(0),
            NumericKind::I16 => Value::I16(0),
            NumericKind::I32 => Value::I32(0),
            NumericKind::I64 => Value::I64(0),
            NumericKind::F32 => Value::F32(0.0),
            NumericKind::F64 => Value::F64(0.0),
            NumericKind::BigInt => Value::BigInt(BigInt::from(0)),
            NumericKind::Decimal => Value::Decimal(BigDecimal::from(0)),
        }
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target representation descriptor
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeDesc {
    /// Accept any value as is
    Any,
    /// Boolean
    Bool,
    /// Single character
    Char,
    /// Text
    Str,
    /// One of the numeric kinds
    Numeric(NumericKind),
    /// Enumeration type
    Enum(EnumType),
    /// Array with the given element descriptor
    Array(Box<TypeDesc>),
    /// Sequence of a particular kind with the given element descriptor
    Sequence(SequenceKind, Box<TypeDesc>),
}

impl TypeDesc {
    pub const I8: TypeDesc = TypeDesc::Numeric(NumericKind::I8);
    pub const I16: TypeDesc = TypeDesc::Numeric(NumericKind::I16);
    pub const I32: TypeDesc = TypeDesc::Numeric(NumericKind::I32);
    pub const I64: TypeDesc = TypeDesc::Numeric(NumericKind::I64);
    pub const F32: TypeDesc = TypeDesc::Numeric(NumericKind::F32);
    pub const F64: TypeDesc = TypeDesc::Numeric(NumericKind::F64);
    pub const BIG_INT: TypeDesc = TypeDesc::Numeric(NumericKind::BigInt);
    pub const DECIMAL: TypeDesc = TypeDesc::Numeric(NumericKind::Decimal);

    /// Array-of-`element` descriptor
    pub fn array(element: TypeDesc) -> Self {
        TypeDesc::Array(Box::new(element))
    }

    /// Sequence descriptor
    pub fn sequence(kind: SequenceKind, element: TypeDesc) -> Self {
        TypeDesc::Sequence(kind, Box::new(element))
    }

    /// `List` of `element`
    pub fn list(element: TypeDesc) -> Self {
        Self::sequence(SequenceKind::List, element)
    }

    /// Enumeration descriptor
    pub fn enumeration(ty: &EnumType) -> Self {
        TypeDesc::Enum(ty.clone())
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeDesc::Numeric(_))
    }

    pub fn numeric_kind(&self) -> Option<NumericKind> {
        match self {
            TypeDesc::Numeric(kind) => Some(*kind),
            _ => None,
        }
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeDesc::Array(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, TypeDesc::Sequence(..))
    }

    /// Element descriptor of an array or sequence descriptor
    pub fn element(&self) -> Option<&TypeDesc> {
        match self {
            TypeDesc::Array(element) | TypeDesc::Sequence(_, element) => Some(element),
            _ => None,
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, TypeDesc::Enum(_))
    }

    pub fn enum_type(&self) -> Option<&EnumType> {
        match self {
            TypeDesc::Enum(ty) => Some(ty),
            _ => None,
        }
    }

    /// Ordered constant names of an enumeration descriptor
    pub fn enum_constants(&self) -> Option<&[String]> {
        self.enum_type().map(|ty| ty.constant_names())
    }

    /// Targets that hold exactly one value (everything but containers and `Any`)
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            TypeDesc::Bool
                | TypeDesc::Char
                | TypeDesc::Str
                | TypeDesc::Numeric(_)
                | TypeDesc::Enum(_)
        )
    }

    /// Value used when an empty container is converted to this target
    pub fn default_value(&self) -> Value {
        match self {
            TypeDesc::Bool => Value::Bool(false),
            TypeDesc::Char => Value::Char('\0'),
            TypeDesc::Numeric(kind) => kind.zero(),
            TypeDesc::Array(element) => Value::Array(TypedArray::empty(element)),
            TypeDesc::Sequence(kind, _) => Value::Seq(Sequence::empty(kind.clone())),
            TypeDesc::Any | TypeDesc::Str | TypeDesc::Enum(_) => Value::Null,
        }
    }
}

impl fmt::Display for TypeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDesc::Any => write!(f, "any"),
            TypeDesc::Bool => write!(f, "bool"),
            TypeDesc::Char => write!(f, "char"),
            TypeDesc::Str => write!(f, "string"),
            TypeDesc::Numeric(kind) => write!(f, "{}", kind),
            TypeDesc::Enum(ty) => write!(f, "{}", ty.name()),
            TypeDesc::Array(element) => write!(f, "[{}]", element),
            TypeDesc::Sequence(kind, element) => write!(f, "{}<{}>", kind.name(), element),
        }
    }
}
