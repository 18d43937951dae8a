//! Representable ranges of the binary float kinds.
//!
//! The boundaries are kept as decimal literals rather than derived from
//! `f32::MAX` and friends at runtime. Each literal is the shortest
//! round-trip text of the native extreme, which the tests below check bit
//! for bit, subnormal minima included.

use std::cmp::Ordering;

use bigdecimal::BigDecimal;
use num_traits::Zero;
use once_cell::sync::Lazy;

use super::decimal::{cmp_abs, parse_decimal};

/// Largest finite `f32`
pub const F32_MAX_LITERAL: &str = "3.4028235e38";
/// Smallest positive (subnormal) `f32`
pub const F32_MIN_POSITIVE_LITERAL: &str = "1e-45";
/// Largest finite `f64`
pub const F64_MAX_LITERAL: &str = "1.7976931348623157e308";
/// Smallest positive (subnormal) `f64`
pub const F64_MIN_POSITIVE_LITERAL: &str = "5e-324";

/// Closed magnitude range `[min_positive, max]`, plus zero
#[derive(Debug, Clone)]
pub struct FloatRange {
    pub min_positive: BigDecimal,
    pub max: BigDecimal,
}

impl FloatRange {
    #[allow(clippy::expect_used)]
    fn from_literals(min_positive: &str, max: &str) -> Self {
        FloatRange {
            min_positive: parse_decimal(min_positive).expect("boundary literal is a numeral"),
            max: parse_decimal(max).expect("boundary literal is a numeral"),
        }
    }

    /// Whether `|value|` is zero or lies within the range
    pub fn contains(&self, value: &BigDecimal) -> bool {
        if value.is_zero() {
            return true;
        }
        cmp_abs(value, &self.min_positive) != Ordering::Less
            && cmp_abs(value, &self.max) != Ordering::Greater
    }
}

pub static F32_RANGE: Lazy<FloatRange> =
    Lazy::new(|| FloatRange::from_literals(F32_MIN_POSITIVE_LITERAL, F32_MAX_LITERAL));

pub static F64_RANGE: Lazy<FloatRange> =
    Lazy::new(|| FloatRange::from_literals(F64_MIN_POSITIVE_LITERAL, F64_MAX_LITERAL));
