//! Conversion failure types
//!
//! Every component of the engine reports failure through a single error
//! type, [`ConversionError`], tagged with a [`ConversionReason`].

use std::fmt;

use thiserror::Error;

use crate::types::TypeDesc;
use crate::value::Value;

/// Why a conversion could not produce a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionReason {
    /// The input is of a kind the requested conversion does not accept
    UnsupportedSourceType,
    /// The requested target cannot be produced at all
    UnsupportedTargetType,
    /// Text that should have been a number (or boolean token) is not
    NotNumericText,
    /// The value exists but does not fit the target without loss
    TargetTooNarrow,
    /// A single character was requested from longer (or empty) text
    LengthExceeded,
    /// No enumeration constant matches the ordinal or name
    NoMatchingEnumConstant,
}

impl ConversionReason {
    /// Stable upper-case code for this reason
    pub fn code(&self) -> &'static str {
        match self {
            ConversionReason::UnsupportedSourceType => "UNSUPPORTED_SOURCE_TYPE",
            ConversionReason::UnsupportedTargetType => "UNSUPPORTED_TARGET_TYPE",
            ConversionReason::NotNumericText => "NOT_NUMERIC_TEXT",
            ConversionReason::TargetTooNarrow => "TARGET_TOO_NARROW",
            ConversionReason::LengthExceeded => "LENGTH_EXCEEDED",
            ConversionReason::NoMatchingEnumConstant => "NO_MATCHING_ENUM_CONSTANT",
        }
    }
}

impl fmt::Display for ConversionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A failed conversion.
///
/// Carries the offending input (`None` when the input was null), the
/// requested target and an optional free-text detail such as the
/// underlying numeral syntax error.
#[derive(Debug, Clone, Error)]
#[error("{reason}: cannot convert {} to {target}{}", describe_input(.input), describe_detail(.detail))]
pub struct ConversionError {
    /// Failure category
    pub reason: ConversionReason,
    /// The value that failed to convert
    pub input: Option<Value>,
    /// The requested target representation
    pub target: TypeDesc,
    /// Extra context, if any
    pub detail: Option<String>,
}

fn describe_input(input: &Option<Value>) -> String {
    match input {
        Some(value) => value.describe(),
        None => "null".to_string(),
    }
}

fn describe_detail(detail: &Option<String>) -> String {
    match detail {
        Some(detail) => format!(" ({})", detail),
        None => String::new(),
    }
}

impl ConversionError {
    /// Create an error for `input` with the given reason
    pub fn new(reason: ConversionReason, input: &Value, target: &TypeDesc) -> Self {
        ConversionError {
            reason,
            input: if input.is_null() {
                None
            } else {
                Some(input.clone())
            },
            target: target.clone(),
            detail: None,
        }
    }

    /// Attach a free-text detail
    pub fn with_detail<S: Into<String>>(mut self, detail: S) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Create an unsupported-source error
    pub fn unsupported_source(input: &Value, target: &TypeDesc) -> Self {
        Self::new(ConversionReason::UnsupportedSourceType, input, target)
    }

    /// Create an unsupported-target error
    pub fn unsupported_target(input: &Value, target: &TypeDesc) -> Self {
        Self::new(ConversionReason::UnsupportedTargetType, input, target)
    }

    /// Create a not-numeric-text error
    pub fn not_numeric(input: &Value, target: &TypeDesc) -> Self {
        Self::new(ConversionReason::NotNumericText, input, target)
    }

    /// Create a narrowing error
    pub fn too_narrow(input: &Value, target: &TypeDesc) -> Self {
        Self::new(ConversionReason::TargetTooNarrow, input, target)
    }

    /// Create a length-exceeded error
    pub fn length_exceeded(input: &Value, target: &TypeDesc) -> Self {
        Self::new(ConversionReason::LengthExceeded, input, target)
    }

    /// Create a no-matching-constant error
    pub fn no_enum_constant(input: &Value, target: &TypeDesc) -> Self {
        Self::new(ConversionReason::NoMatchingEnumConstant, input, target)
    }

    /// Rewrite the input and target, keeping reason and detail.
    ///
    /// Used when a failure from a nested conversion should be reported
    /// against the caller's value.
    pub fn reattach(mut self, input: &Value, target: &TypeDesc) -> Self {
        self.input = if input.is_null() {
            None
        } else {
            Some(input.clone())
        };
        self.target = target.clone();
        self
    }
}

/// Result type alias for conversions
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Failure to load a [`MorphConfig`](crate::config::MorphConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document is malformed or has the wrong shape
    #[error("invalid morph configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A token list is unusable
    #[error("invalid boolean vocabulary: {0}")]
    Vocabulary(String),
}
