//! Scalar coercion: booleans, single characters and numbers.

use serde::{Deserialize, Serialize};

use crate::enums::ordinal_value;
use crate::error::{ConfigError, ConversionError, ConversionResult};
use crate::numeric::{convert_numeric, narrow_decimal, parse_numeric, to_decimal};
use crate::types::{NumericKind, TypeDesc};
use crate::value::Value;

/// Tokens read as `true` unless configured otherwise
pub const DEFAULT_TRUTHY: [&str; 5] = ["true", "1", "yes", "on", "enabled"];

/// Tokens read as `false` unless configured otherwise
pub const DEFAULT_FALSY: [&str; 5] = ["false", "0", "no", "off", "disabled"];

/// Words accepted as booleans, matched case-insensitively
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoolVocabulary {
    pub truthy: Vec<String>,
    pub falsy: Vec<String>,
}

impl Default for BoolVocabulary {
    fn default() -> Self {
        BoolVocabulary::new(DEFAULT_TRUTHY, DEFAULT_FALSY)
    }
}

impl BoolVocabulary {
    pub fn new<I, J, S, T>(truthy: I, falsy: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        BoolVocabulary {
            truthy: truthy.into_iter().map(Into::into).collect(),
            falsy: falsy.into_iter().map(Into::into).collect(),
        }
    }

    /// Reject empty tokens and tokens that are both truthy and falsy
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(token) = self
            .truthy
            .iter()
            .chain(&self.falsy)
            .find(|token| token.is_empty())
        {
            return Err(ConfigError::Vocabulary(format!(
                "empty token {:?} is not allowed",
                token
            )));
        }
        if let Some(token) = self
            .truthy
            .iter()
            .find(|t| contains_token(&self.falsy, &t.to_lowercase()))
        {
            return Err(ConfigError::Vocabulary(format!(
                "{:?} is listed as both truthy and falsy",
                token
            )));
        }
        Ok(())
    }

    /// `Some(true)` for a truthy token, `Some(false)` for a falsy one
    pub fn classify(&self, text: &str) -> Option<bool> {
        let lowered = text.to_lowercase();
        if contains_token(&self.truthy, &lowered) {
            Some(true)
        } else if contains_token(&self.falsy, &lowered) {
            Some(false)
        } else {
            None
        }
    }
}

fn contains_token(tokens: &[String], lowered: &str) -> bool {
    tokens.iter().any(|token| token.to_lowercase() == lowered)
}

/// Coerce a value to a boolean.
///
/// Null is false. Numbers must be exactly 1 or 0, characters `'1'` or
/// `'0'` (or a one-letter vocabulary token). Text is matched against the
/// vocabulary.
pub fn to_bool(value: &Value, vocabulary: &BoolVocabulary) -> ConversionResult<bool> {
    let target = TypeDesc::Bool;
    let unrecognized = |text: &str| {
        vocabulary.classify(text).ok_or_else(|| {
            ConversionError::not_numeric(value, &target).with_detail("unrecognized boolean token")
        })
    };

    match value {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(*b),
        Value::Char('1') => Ok(true),
        Value::Char('0') => Ok(false),
        Value::Char(c) => unrecognized(&c.to_string()),
        Value::Str(text) => unrecognized(text),
        Value::Enum(constant) => unrecognized(constant.name()),
        value if value.is_numeric() => {
            let as_bit = to_decimal(value).and_then(|d| narrow_decimal(&d, NumericKind::I8));
            match as_bit {
                Some(Value::I8(1)) => Ok(true),
                Some(Value::I8(0)) => Ok(false),
                _ => Err(ConversionError::too_narrow(value, &target)
                    .with_detail("only 1 and 0 are booleans")),
            }
        }
        other => Err(ConversionError::unsupported_source(other, &target)),
    }
}

/// Coerce a value to a single character.
///
/// Booleans become `'1'`/`'0'`; anything else must stringify to exactly
/// one character.
pub fn to_char(value: &Value) -> ConversionResult<char> {
    match value {
        Value::Bool(b) => Ok(if *b { '1' } else { '0' }),
        Value::Char(c) => Ok(*c),
        Value::Null => Err(ConversionError::unsupported_source(value, &TypeDesc::Char)),
        other => {
            let text = other.to_string();
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(c),
                _ => Err(ConversionError::length_exceeded(other, &TypeDesc::Char)
                    .with_detail(format!(
                        "expected exactly one character, found {}",
                        text.chars().count()
                    ))),
            }
        }
    }
}

/// Coerce a scalar to the numeric kind `kind`.
///
/// Numbers go straight to the lattice; enumeration constants contribute
/// their ordinal, booleans 1 or 0, digit characters their digit value.
/// Text is parsed, other values are stringified and parsed.
pub fn to_number(value: &Value, kind: NumericKind) -> ConversionResult<Value> {
    let target = TypeDesc::Numeric(kind);
    let through_lattice =
        |v: Value| convert_numeric(&v, kind).map_err(|e| e.reattach(value, &target));

    match value {
        v if v.is_numeric() => convert_numeric(v, kind),
        Value::Enum(constant) => through_lattice(ordinal_value(constant)),
        Value::Bool(b) => through_lattice(Value::I8(i8::from(*b))),
        Value::Char(c) => match c.to_digit(10) {
            Some(digit) => through_lattice(Value::I64(i64::from(digit))),
            None => Err(ConversionError::not_numeric(value, &target).with_detail("not a digit")),
        },
        Value::Str(text) => parse_numeric(text, kind),
        Value::Null => Err(ConversionError::unsupported_source(value, &target)),
        other => parse_numeric(&other.to_string(), kind).map_err(|e| e.reattach(other, &target)),
    }
}
