//! Tests for the numeric conversion lattice.

mod common;

use common::{integer_bounds, reason_of};
use num_bigint::BigInt;
use pretty_assertions::assert_eq;
use value_morph::numeric::{
    can_parse, convert_numeric, fits_lossless, parse_decimal, parse_numeric, to_decimal,
    F32_MAX_LITERAL, F32_MIN_POSITIVE_LITERAL, F64_MAX_LITERAL, F64_MIN_POSITIVE_LITERAL,
};
use value_morph::prelude::*;

// ==================== Round trips ====================

#[test]
fn test_integer_bounds_round_trip_through_wider_kinds() {
    for (index, (kind, min, max)) in integer_bounds().into_iter().enumerate() {
        let wider = NumericKind::FIXED_INTEGERS[index..]
            .iter()
            .copied()
            .chain([NumericKind::BigInt, NumericKind::Decimal]);
        for target in wider {
            for bound in [&min, &max] {
                let parsed = parse_numeric(&bound.to_string(), kind).unwrap();
                let widened = convert_numeric(&parsed, target).unwrap();
                assert_eq!(
                    to_decimal(&widened),
                    to_decimal(bound),
                    "{} via {} into {}",
                    bound,
                    kind,
                    target
                );
            }
        }
    }
}

#[test]
fn test_integer_bounds_do_not_fit_narrower_kinds() {
    let bounds = integer_bounds();
    for (index, (_, min, max)) in bounds.iter().enumerate().skip(1) {
        let narrower = bounds[index - 1].0;
        assert!(!fits_lossless(min, narrower), "{} into {}", min, narrower);
        assert!(!fits_lossless(max, narrower), "{} into {}", max, narrower);
    }
}

#[test]
fn test_one_point_zero_fits_every_kind() {
    for kind in NumericKind::ALL {
        assert!(fits_lossless(&Value::F64(1.0), kind), "1.0 into {}", kind);
        assert!(can_parse("1.0", kind), "\"1.0\" into {}", kind);
    }
}

// ==================== Narrowing ====================

#[test]
fn test_large_double_does_not_fit_f32() {
    let result = convert_numeric(&Value::F64(1e300), NumericKind::F32);
    assert_eq!(reason_of(result), ConversionReason::TargetTooNarrow);
    assert!(fits_lossless(&Value::F64(1e300), NumericKind::F64));
    assert!(fits_lossless(&Value::F64(1e300), NumericKind::BigInt));
}

#[test]
fn test_fractional_text_never_fits_integers() {
    for kind in NumericKind::FIXED_INTEGERS.into_iter().chain([NumericKind::BigInt]) {
        assert_eq!(
            reason_of(parse_numeric("3.5", kind)),
            ConversionReason::TargetTooNarrow,
            "3.5 into {}",
            kind
        );
    }
    assert_eq!(parse_numeric("3.0", NumericKind::I8).unwrap(), Value::I8(3));
    assert_eq!(parse_numeric("3.0", NumericKind::I64).unwrap(), Value::I64(3));
    assert_eq!(
        parse_numeric("3.0", NumericKind::BigInt).unwrap(),
        Value::BigInt(BigInt::from(3))
    );
}

#[test]
fn test_big_integer_magnitudes() {
    let huge: BigInt = "123456789012345678901234567890".parse().unwrap();
    let value = Value::BigInt(huge.clone());
    assert!(!fits_lossless(&value, NumericKind::I64));
    assert!(fits_lossless(&value, NumericKind::F32));
    assert_eq!(
        convert_numeric(&value, NumericKind::Decimal).unwrap(),
        Value::Decimal(bigdecimal::BigDecimal::new(huge, 0))
    );
    assert!(!can_parse("9223372036854775808", NumericKind::I64));
    assert!(can_parse("-9223372036854775808", NumericKind::I64));
}

#[test]
fn test_extreme_exponents_stay_cheap() {
    let tiny = "1e-1000000000";
    assert!(can_parse(tiny, NumericKind::Decimal));
    assert!(!can_parse(tiny, NumericKind::F64));
    assert!(!can_parse(tiny, NumericKind::I64));
    assert!(!can_parse(tiny, NumericKind::BigInt));

    let vast = "7e1000000000";
    assert!(can_parse(vast, NumericKind::Decimal));
    assert!(!can_parse(vast, NumericKind::F64));
    assert!(!can_parse(vast, NumericKind::I64));
    assert!(!can_parse(vast, NumericKind::BigInt));
    let err = parse_numeric(vast, NumericKind::BigInt).unwrap_err();
    assert_eq!(err.reason, ConversionReason::TargetTooNarrow);
    assert_eq!(err.detail.as_deref(), Some("magnitude exceeds the BigInt limit"));
}

#[test]
fn test_exponents_beyond_scale_range_are_rejected() {
    for text in ["1000e9223372036854775807", "100e9223372036854775806", "1e-9223372036854775808"] {
        for kind in NumericKind::ALL {
            assert!(!can_parse(text, kind), "{} as {:?}", text, kind);
            let err = parse_numeric(text, kind).unwrap_err();
            assert_eq!(err.reason, ConversionReason::NotNumericText, "{} as {:?}", text, kind);
            assert_eq!(err.detail.as_deref(), Some("exponent out of range"));
        }
    }
}

#[test]
fn test_rejected_numerals() {
    for text in ["", " 1", "1 ", "1,000", "1_000", "NaN", "Infinity", "0x10", "+", "-.", "e5", "1e"] {
        assert_eq!(
            reason_of(parse_numeric(text, NumericKind::Decimal)),
            ConversionReason::NotNumericText,
            "{:?}",
            text
        );
    }
    assert!(can_parse(".5", NumericKind::F32));
    assert!(can_parse("5.", NumericKind::I8));
    assert!(can_parse("+12E-1", NumericKind::Decimal));
}

#[test]
fn test_non_finite_floats() {
    for v in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        assert!(fits_lossless(&Value::F64(v), NumericKind::F32));
        for kind in NumericKind::ALL.into_iter().filter(|k| !k.is_float()) {
            assert_eq!(
                reason_of(convert_numeric(&Value::F64(v), kind)),
                ConversionReason::TargetTooNarrow
            );
        }
    }
}

// ==================== Float boundaries ====================

#[test]
fn test_boundary_literals_match_native_extremes() {
    let literal = |text: &str| parse_decimal(text).unwrap();
    assert_eq!(to_decimal(&Value::F32(f32::MAX)), Some(literal(F32_MAX_LITERAL)));
    assert_eq!(
        to_decimal(&Value::F32(f32::from_bits(1))),
        Some(literal(F32_MIN_POSITIVE_LITERAL))
    );
    assert_eq!(to_decimal(&Value::F64(f64::MAX)), Some(literal(F64_MAX_LITERAL)));
    assert_eq!(
        to_decimal(&Value::F64(f64::from_bits(1))),
        Some(literal(F64_MIN_POSITIVE_LITERAL))
    );
}

#[test]
fn test_subnormal_minimum_fits_its_own_width_only() {
    let smallest_f64 = Value::F64(f64::from_bits(1));
    assert!(fits_lossless(&smallest_f64, NumericKind::F64));
    assert!(!fits_lossless(&smallest_f64, NumericKind::F32));
    assert!(fits_lossless(&Value::F32(f32::from_bits(1)), NumericKind::F64));
    assert_eq!(
        parse_numeric(F64_MIN_POSITIVE_LITERAL, NumericKind::F64).unwrap(),
        smallest_f64
    );
}

// ==================== Error messages ====================

#[test]
fn test_lattice_error_messages() {
    let err = parse_numeric("300", NumericKind::I8).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r###"TARGET_TOO_NARROW: cannot convert "300" to i8"###);

    let err = convert_numeric(&Value::from("7"), NumericKind::I32).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @r###"UNSUPPORTED_SOURCE_TYPE: cannot convert "7" to i32 (string is not a numeric kind)"###);

    let err = convert_numeric(&Value::F64(f64::INFINITY), NumericKind::I64).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"TARGET_TOO_NARROW: cannot convert inf to i64 (non-finite value)");
}
