//! value_morph: lossless runtime value conversion
//!
//! Converts a dynamic [`Value`] into the representation named by a
//! [`TypeDesc`], or fails with a [`ConversionError`] when no lossless
//! equivalent exists. It includes:
//!
//! - a numeric lattice over fixed-width integers, floats, `BigInt` and
//!   `BigDecimal`
//! - boolean, character and enumeration coercion
//! - element-wise array and sequence coercion
//! - TOML-loadable configuration for the boolean vocabulary

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

pub mod array;
pub mod config;
pub mod dispatch;
pub mod enums;
pub mod error;
pub mod numeric;
pub mod scalar;
pub mod sequence;
pub mod types;
pub mod value;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use value_morph::prelude::*;
///
/// let n: i16 = Morph::new().to(&Value::from("120")).unwrap();
/// assert_eq!(n, 120);
/// ```
pub mod prelude {
    pub use super::array::{ArrayElement, TypedArray};
    pub use super::config::MorphConfig;
    pub use super::dispatch::{convert, Morph, Target};
    pub use super::enums::{EnumConstant, EnumType, MorphEnum};
    pub use super::error::{ConfigError, ConversionError, ConversionReason, ConversionResult};
    pub use super::scalar::BoolVocabulary;
    pub use super::sequence::{CustomSequence, Sequence, SequenceKind};
    pub use super::types::{NumericKind, TypeDesc};
    pub use super::value::{FromValue, Value};
}

pub use prelude::*;
