//! Shared helpers for integration tests
// Each integration test target uses a different subset of these helpers.
#![allow(dead_code)]

use value_morph::prelude::*;

/// The three-colour enumeration used throughout the tests
pub fn rgb() -> EnumType {
    EnumType::new("Color", ["RED", "GREEN", "BLUE"])
}

/// Array of text elements
pub fn strs(items: &[&str]) -> Value {
    Value::Array(TypedArray::Str(items.iter().map(|s| s.to_string()).collect()))
}

/// Untyped array holding `items` as-is
pub fn anys(items: Vec<Value>) -> Value {
    Value::Array(TypedArray::Values {
        element: TypeDesc::Any,
        items,
    })
}

/// Unwrap a failed conversion and return its reason
pub fn reason_of<T: std::fmt::Debug>(result: ConversionResult<T>) -> ConversionReason {
    match result {
        Ok(value) => panic!("expected a conversion failure, got {:?}", value),
        Err(err) => err.reason,
    }
}

/// Smallest and largest value of each fixed-width integer kind
pub fn integer_bounds() -> Vec<(NumericKind, Value, Value)> {
    vec![
        (NumericKind::I8, Value::I8(i8::MIN), Value::I8(i8::MAX)),
        (NumericKind::I16, Value::I16(i16::MIN), Value::I16(i16::MAX)),
        (NumericKind::I32, Value::I32(i32::MIN), Value::I32(i32::MAX)),
        (NumericKind::I64, Value::I64(i64::MIN), Value::I64(i64::MAX)),
    ]
}
