//! Numeric conversion lattice.
//!
//! Answers "does this value fit losslessly into kind T?" for every pair of
//! [`NumericKind`]s and performs the conversion when it does. Value
//! conversion and text parsing share one path: both project the source
//! into a [`BigDecimal`] and narrow it with [`narrow_decimal`], so bounds
//! are decided in exactly one place.
//!
//! | target          | fits when                                              |
//! |-----------------|--------------------------------------------------------|
//! | `I8`..`I64`     | round, and within range without wrapping               |
//! | `F32`, `F64`    | zero, or `|v|` within the literal float range          |
//! | `BigInt`        | round, with at most 100 001 digits                     |
//! | `Decimal`       | always (finite sources)                                |
//!
//! Non-finite floats (NaN, infinities) have no decimal projection; they fit
//! the float kinds and nothing else.

mod bounds;
mod decimal;

use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

use crate::error::{ConversionError, ConversionResult};
use crate::types::{NumericKind, TypeDesc};
use crate::value::{FromValue, Value};

pub use bounds::{
    FloatRange, F32_MAX_LITERAL, F32_MIN_POSITIVE_LITERAL, F32_RANGE, F64_MAX_LITERAL,
    F64_MIN_POSITIVE_LITERAL, F64_RANGE,
};
pub use decimal::{is_decimal_numeral, is_round_decimal, parse_decimal, to_decimal};

/// Rust types that correspond to a [`NumericKind`]
pub trait Numeric: FromValue + Into<Value> {
    const KIND: NumericKind;
}

macro_rules! impl_numeric {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl Numeric for $ty {
                const KIND: NumericKind = NumericKind::$kind;
            }
        )*
    };
}

impl_numeric! {
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    BigInt => BigInt,
    BigDecimal => Decimal,
}

/// Whether a numeric value has a zero fractional part.
///
/// Non-numeric values and non-finite floats are never round.
pub fn is_round(value: &Value) -> bool {
    to_decimal(value).is_some_and(|d| is_round_decimal(&d))
}

/// Total order over numeric values.
///
/// Negative infinity sorts first, then finite values by magnitude, then
/// positive infinity and NaN. Equal values of different kinds order by kind,
/// and floats of one kind that are still equal order by bit pattern, so
/// `-0.0` and `0.0` stay distinct.
pub fn compare_numeric(a: &Value, b: &Value) -> Ordering {
    float_class(a)
        .cmp(&float_class(b))
        .then_with(|| match (to_decimal(a), to_decimal(b)) {
            (Some(x), Some(y)) => compare_decimal(&x, &y),
            _ => Ordering::Equal,
        })
        .then_with(|| a.numeric_kind().cmp(&b.numeric_kind()))
        .then_with(|| match (a, b) {
            (Value::F32(x), Value::F32(y)) => x.total_cmp(y),
            (Value::F64(x), Value::F64(y)) => x.total_cmp(y),
            _ => Ordering::Equal,
        })
}

fn float_class(value: &Value) -> u8 {
    let v = match value {
        Value::F32(v) => f64::from(*v),
        Value::F64(v) => *v,
        _ => return 1,
    };
    if v.is_nan() {
        3
    } else if v == f64::NEG_INFINITY {
        0
    } else if v == f64::INFINITY {
        2
    } else {
        1
    }
}

fn compare_decimal(x: &BigDecimal, y: &BigDecimal) -> Ordering {
    match (x.sign(), y.sign()) {
        (Sign::Plus, Sign::Plus) => decimal::cmp_abs(x, y),
        (Sign::Minus, Sign::Minus) => decimal::cmp_abs(y, x),
        (sx, sy) => sx.cmp(&sy),
    }
}

/// Narrow a decimal into `kind`, or `None` if it does not fit
pub fn narrow_decimal(value: &BigDecimal, kind: NumericKind) -> Option<Value> {
    match kind {
        NumericKind::I8 => decimal::integral_i64(value)
            .and_then(|v| i8::try_from(v).ok())
            .map(Value::I8),
        NumericKind::I16 => decimal::integral_i64(value)
            .and_then(|v| i16::try_from(v).ok())
            .map(Value::I16),
        NumericKind::I32 => decimal::integral_i64(value)
            .and_then(|v| i32::try_from(v).ok())
            .map(Value::I32),
        NumericKind::I64 => decimal::integral_i64(value).map(Value::I64),
        NumericKind::F32 => {
            if !F32_RANGE.contains(value) {
                return None;
            }
            decimal::scientific_text(value)
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::F32)
        }
        NumericKind::F64 => {
            if !F64_RANGE.contains(value) {
                return None;
            }
            decimal::scientific_text(value)
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::F64)
        }
        NumericKind::BigInt => decimal::integral_bigint(value).map(Value::BigInt),
        NumericKind::Decimal => Some(Value::Decimal(value.clone())),
    }
}

/// Why `value` does not fit `kind`, when there is more to say than the
/// reason itself
fn narrowing_detail(value: &BigDecimal, kind: NumericKind) -> Option<&'static str> {
    match kind {
        NumericKind::BigInt if decimal::exceeds_bigint_limit(value) => {
            Some("magnitude exceeds the BigInt limit")
        }
        _ => None,
    }
}

fn too_narrow(source: &Value, target: &TypeDesc, detail: Option<&str>) -> ConversionError {
    let err = ConversionError::too_narrow(source, target);
    match detail {
        Some(detail) => err.with_detail(detail),
        None => err,
    }
}

/// Outcome of narrowing a value, before it is turned into an error
enum Narrowed {
    Fits(Value),
    TooNarrow(Option<&'static str>),
    NotNumeric,
}

fn narrow_value(value: &Value, kind: NumericKind) -> Narrowed {
    if value.numeric_kind() == Some(kind) {
        return Narrowed::Fits(value.clone());
    }
    match value {
        Value::F32(v) if !v.is_finite() => narrow_non_finite(f64::from(*v), kind),
        Value::F64(v) if !v.is_finite() => narrow_non_finite(*v, kind),
        _ => match to_decimal(value) {
            Some(decimal) => match narrow_decimal(&decimal, kind) {
                Some(narrowed) => Narrowed::Fits(narrowed),
                None => Narrowed::TooNarrow(narrowing_detail(&decimal, kind)),
            },
            None => Narrowed::NotNumeric,
        },
    }
}

#[allow(clippy::cast_possible_truncation)]
fn narrow_non_finite(v: f64, kind: NumericKind) -> Narrowed {
    match kind {
        // NaN and infinities survive the f64 -> f32 cast unchanged
        NumericKind::F32 => Narrowed::Fits(Value::F32(v as f32)),
        NumericKind::F64 => Narrowed::Fits(Value::F64(v)),
        _ => Narrowed::TooNarrow(Some("non-finite value")),
    }
}

/// Whether `value` converts into `kind` without loss
pub fn fits_lossless(value: &Value, kind: NumericKind) -> bool {
    matches!(narrow_value(value, kind), Narrowed::Fits(_))
}

/// Convert a numeric value into `kind`.
///
/// Fails with `UnsupportedSourceType` for non-numeric input and
/// `TargetTooNarrow` when [`fits_lossless`] is false.
pub fn convert_numeric(value: &Value, kind: NumericKind) -> ConversionResult<Value> {
    let target = TypeDesc::Numeric(kind);
    match narrow_value(value, kind) {
        Narrowed::Fits(v) => Ok(v),
        Narrowed::TooNarrow(detail) => Err(too_narrow(value, &target, detail)),
        Narrowed::NotNumeric => Err(ConversionError::unsupported_source(value, &target)
            .with_detail(format!("{} is not a numeric kind", value.type_name()))),
    }
}

/// Parse decimal text into `kind`.
///
/// Fails with `NotNumericText` when the text is not a numeral and
/// `TargetTooNarrow` when it is one but does not fit.
pub fn parse_numeric(text: &str, kind: NumericKind) -> ConversionResult<Value> {
    let target = TypeDesc::Numeric(kind);
    let decimal = parse_decimal(text).map_err(|reason| {
        ConversionError::not_numeric(&Value::from(text), &target).with_detail(reason)
    })?;
    narrow_decimal(&decimal, kind).ok_or_else(|| {
        too_narrow(&Value::from(text), &target, narrowing_detail(&decimal, kind))
    })
}

/// Whether [`parse_numeric`] would succeed
pub fn can_parse(text: &str, kind: NumericKind) -> bool {
    parse_decimal(text).is_ok_and(|d| narrow_decimal(&d, kind).is_some())
}

/// Typed form of [`convert_numeric`]
pub fn convert_to<N: Numeric>(value: &Value) -> ConversionResult<N> {
    let converted = convert_numeric(value, N::KIND)?;
    N::from_value(converted)
        .ok_or_else(|| ConversionError::unsupported_target(value, &TypeDesc::Numeric(N::KIND)))
}

/// Typed form of [`parse_numeric`]
pub fn parse_to<N: Numeric>(text: &str) -> ConversionResult<N> {
    let parsed = parse_numeric(text, N::KIND)?;
    N::from_value(parsed).ok_or_else(|| {
        ConversionError::unsupported_target(&Value::from(text), &TypeDesc::Numeric(N::KIND))
    })
}
