//! Arbitrary-precision decimal helpers.
//!
//! Everything the lattice knows about magnitudes goes through these
//! functions. None of them scale a decimal by its exponent unless the
//! result is known to be small, so a numeral such as `1e-1000000000`
//! is classified without materialising a billion-digit integer.
//!
//! Two limits keep that true:
//!
//! - parsed numerals must have a scale that fits in an `i32`
//! - [`integral_bigint`] refuses results with more than
//!   [`BIGINT_MAX_EXPONENT`] + 1 digits
//!
//! Exponent arithmetic is done in `i128`, so decimals built directly
//! with an `i64` scale never overflow it.

use std::cmp::Ordering;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::value::Value;

/// Optional sign, digits with an optional fraction (or a bare fraction),
/// optional exponent. ASCII digits only, no separators or whitespace.
static DECIMAL_NUMERAL: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^([+-]?)([0-9]*)(?:\.([0-9]*))?(?:[eE]([+-]?[0-9]+))?$").unwrap()
});

/// Largest power of ten below `i64::MAX`; anything with a higher adjusted
/// exponent cannot be a 64-bit integer.
const I64_MAX_EXPONENT: i128 = 18;

/// Largest adjusted exponent [`integral_bigint`] will expand. Larger
/// values are too wide for the `BigInt` target.
pub const BIGINT_MAX_EXPONENT: i128 = 100_000;

/// Whether `text` follows the decimal numeral grammar
pub fn is_decimal_numeral(text: &str) -> bool {
    match DECIMAL_NUMERAL.captures(text) {
        Some(caps) => has_digits(caps.get(2)) || has_digits(caps.get(3)),
        None => false,
    }
}

fn has_digits(group: Option<regex::Match<'_>>) -> bool {
    group.is_some_and(|m| !m.as_str().is_empty())
}

/// Parse a decimal numeral. The error is a human-readable reason.
pub fn parse_decimal(text: &str) -> Result<BigDecimal, String> {
    if text.is_empty() {
        return Err("empty text".to_string());
    }
    let caps = match DECIMAL_NUMERAL.captures(text) {
        Some(caps) if has_digits(caps.get(2)) || has_digits(caps.get(3)) => caps,
        _ => return Err("not a decimal numeral".to_string()),
    };
    let sign = caps.get(1).map_or("", |m| m.as_str());
    let integer = caps.get(2).map_or("", |m| m.as_str());
    let fraction = caps.get(3).map_or("", |m| m.as_str());
    let exponent = match caps.get(4) {
        Some(m) => m
            .as_str()
            .parse::<i64>()
            .map_err(|_| "exponent out of range".to_string())?,
        None => 0,
    };

    let magnitude =
        BigInt::from_str(&format!("{}{}", integer, fraction)).map_err(|e| e.to_string())?;
    let digits = if sign == "-" { -magnitude } else { magnitude };
    // scale must fit in 32 bits
    let scale = i64::try_from(fraction.len())
        .ok()
        .and_then(|len| len.checked_sub(exponent))
        .filter(|scale| i32::try_from(*scale).is_ok())
        .ok_or_else(|| "exponent out of range".to_string())?;
    Ok(BigDecimal::new(digits, scale))
}

/// Exact decimal projection of a numeric value.
///
/// Binary floats project through their shortest round-trip text, so
/// `0.1f32` projects to `0.1` and `f64::MAX` to `1.7976931348623157e308`.
/// Returns `None` for non-numeric values and non-finite floats.
pub fn to_decimal(value: &Value) -> Option<BigDecimal> {
    match value {
        Value::I8(v) => Some(BigDecimal::from(i64::from(*v))),
        Value::I16(v) => Some(BigDecimal::from(i64::from(*v))),
        Value::I32(v) => Some(BigDecimal::from(i64::from(*v))),
        Value::I64(v) => Some(BigDecimal::from(*v)),
        Value::F32(v) if v.is_finite() => parse_decimal(&format!("{:e}", v)).ok(),
        Value::F64(v) if v.is_finite() => parse_decimal(&format!("{:e}", v)).ok(),
        Value::BigInt(v) => Some(BigDecimal::new(v.clone(), 0)),
        Value::Decimal(v) => Some(v.clone()),
        _ => None,
    }
}

/// Digits and scale with trailing zeros stripped from the digits.
///
/// Zero normalises to `(0, 0)`.
pub fn normalize(value: &BigDecimal) -> (BigInt, i128) {
    let (digits, scale) = value.as_bigint_and_exponent();
    if digits.is_zero() {
        return (digits, 0);
    }
    let text = digits.magnitude().to_string();
    let zeros = text.len() - text.trim_end_matches('0').len();
    if zeros == 0 {
        return (digits, i128::from(scale));
    }
    let (quotient, _) = digits.div_rem(&num_traits::pow(BigInt::from(10), zeros));
    (quotient, i128::from(scale) - zeros as i128)
}

/// Fractional part is exactly zero.
///
/// Equivalent to comparing the value with its own integral truncation:
/// once trailing zeros are stripped, a round value has no digits right of
/// the decimal point.
pub fn is_round_decimal(value: &BigDecimal) -> bool {
    let (_, scale) = normalize(value);
    scale <= 0
}

/// Integral value of a round decimal.
///
/// `None` when the value has a fractional part or exceeds the `BigInt`
/// limit (see [`exceeds_bigint_limit`]).
pub fn integral_bigint(value: &BigDecimal) -> Option<BigInt> {
    let (digits, scale) = normalize(value);
    if scale > 0 || exceeds_bigint_limit(value) {
        return None;
    }
    let shift = usize::try_from(-scale).ok()?;
    Some(digits * num_traits::pow(BigInt::from(10), shift))
}

/// Integral value of a round decimal, narrowed to 64 bits without wrapping
pub fn integral_i64(value: &BigDecimal) -> Option<i64> {
    if !is_round_decimal(value) {
        return None;
    }
    if value.is_zero() {
        return Some(0);
    }
    if adjusted_exponent(value) > I64_MAX_EXPONENT {
        return None;
    }
    integral_bigint(value)?.to_i64()
}

/// Whether `|value|` is at least `10^(BIGINT_MAX_EXPONENT + 1)`
pub fn exceeds_bigint_limit(value: &BigDecimal) -> bool {
    !value.is_zero() && adjusted_exponent(value) > BIGINT_MAX_EXPONENT
}

/// `floor(log10(|value|))` for a non-zero value
fn adjusted_exponent(value: &BigDecimal) -> i128 {
    let (digits, scale) = value.as_bigint_and_exponent();
    let digit_count = digits.magnitude().to_string().len() as i128;
    digit_count - 1 - i128::from(scale)
}

/// Compare absolute values
pub fn cmp_abs(a: &BigDecimal, b: &BigDecimal) -> Ordering {
    match (a.is_zero(), b.is_zero()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }
    let by_exponent = adjusted_exponent(a).cmp(&adjusted_exponent(b));
    if by_exponent != Ordering::Equal {
        return by_exponent;
    }
    a.abs().cmp(&b.abs())
}

/// Scientific text of a decimal (`<digits>e<exponent>`), accepted by the
/// standard float parsers
pub fn scientific_text(value: &BigDecimal) -> String {
    let (digits, scale) = value.as_bigint_and_exponent();
    format!("{}e{}", digits, -i128::from(scale))
}
