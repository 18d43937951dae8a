//! Top-level conversion dispatch
//!
//! [`Morph::convert`] short-circuits identity and null, then routes to
//! text, array, sequence or scalar coercion based on the target.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use once_cell::sync::Lazy;

use crate::array::{array_text, to_array, ArrayElement};
use crate::config::MorphConfig;
use crate::enums::{to_enum, EnumType, MorphEnum};
use crate::error::{ConfigError, ConversionError, ConversionResult};
use crate::scalar::{to_bool, to_char, to_number, BoolVocabulary};
use crate::sequence::to_sequence;
use crate::types::TypeDesc;
use crate::value::{FromValue, Value};

/// Conversion engine
#[derive(Debug, Clone, Default)]
pub struct Morph {
    config: MorphConfig,
}

impl Morph {
    /// Engine with the built-in configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine with a caller-built configuration.
    ///
    /// The vocabulary is validated the same way
    /// [`MorphConfig::from_toml_str`] validates it.
    pub fn with_config(config: MorphConfig) -> Result<Self, ConfigError> {
        config.boolean.validate()?;
        Ok(Morph { config })
    }

    pub fn config(&self) -> &MorphConfig {
        &self.config
    }

    /// Tokens used for boolean coercion
    pub fn vocabulary(&self) -> &BoolVocabulary {
        &self.config.boolean
    }

    /// Convert `value` into the representation named by `target`.
    ///
    /// # Examples
    /// ```
    /// use value_morph::prelude::*;
    ///
    /// let morph = Morph::new();
    /// assert_eq!(morph.convert(&Value::from("3.0"), &TypeDesc::I8).unwrap(), Value::I8(3));
    /// assert!(morph.convert(&Value::from("3.5"), &TypeDesc::I8).is_err());
    /// ```
    pub fn convert(&self, value: &Value, target: &TypeDesc) -> ConversionResult<Value> {
        let result = self.route(value, target);
        if let Err(err) = &result {
            log::debug!("conversion failed: {}", err);
        }
        result
    }

    fn route(&self, value: &Value, target: &TypeDesc) -> ConversionResult<Value> {
        if value.is_instance_of(target) {
            log::trace!("identity: {} is already {}", value.type_name(), target);
            return Ok(value.clone());
        }
        if value.is_null() {
            return Ok(match target {
                TypeDesc::Bool => Value::Bool(false),
                _ => Value::Null,
            });
        }

        log::trace!("routing {} to {}", value.type_name(), target);
        match target {
            TypeDesc::Any => Ok(value.clone()),
            TypeDesc::Str => match value {
                Value::Array(array) => match array_text(array) {
                    Some(text) => text.map(Value::Str),
                    None => self.first_element(value, target),
                },
                Value::Seq(_) => self.first_element(value, target),
                scalar => Ok(Value::Str(scalar.to_string())),
            },
            TypeDesc::Array(element) => to_array(self, value, element).map(Value::Array),
            TypeDesc::Sequence(kind, element) => {
                to_sequence(self, value, kind, element).map(Value::Seq)
            }
            _ if value.is_container() => self.first_element(value, target),
            TypeDesc::Bool => to_bool(value, self.vocabulary()).map(Value::Bool),
            TypeDesc::Char => to_char(value).map(Value::Char),
            TypeDesc::Numeric(kind) => to_number(value, *kind),
            TypeDesc::Enum(ty) => to_enum(value, ty).map(Value::Enum),
        }
    }

    /// Container to scalar: the first element converted, or the target's
    /// default when the container is empty
    fn first_element(&self, container: &Value, target: &TypeDesc) -> ConversionResult<Value> {
        let first = match container {
            Value::Array(array) => array.get(0),
            Value::Seq(seq) => seq.items().first().cloned(),
            _ => None,
        };
        match first {
            Some(element) => self.convert(&element, target),
            None => {
                log::trace!("empty {} yields the default {}", container.type_name(), target);
                Ok(target.default_value())
            }
        }
    }

    /// Convert into a Rust type.
    ///
    /// ```
    /// use value_morph::prelude::*;
    ///
    /// let morph = Morph::new();
    /// let numbers: Vec<i32> = morph.to(&Value::Array(TypedArray::Str(vec!["1".into(), "2".into()]))).unwrap();
    /// assert_eq!(numbers, vec![1, 2]);
    /// assert!(morph.to::<bool>(&Value::from("on")).unwrap());
    /// ```
    pub fn to<T: Target>(&self, value: &Value) -> ConversionResult<T> {
        let target = T::type_desc();
        let converted = self.convert(value, &target)?;
        T::from_value(converted).ok_or_else(|| {
            ConversionError::unsupported_source(value, &target).with_detail("conversion produced null")
        })
    }

    /// Convert into a constant of the Rust enumeration `E`
    pub fn to_enum<E: MorphEnum>(&self, value: &Value) -> ConversionResult<E> {
        let ty = EnumType::of::<E>();
        let constant = to_enum(value, &ty)?;
        constant.cast::<E>().ok_or_else(|| {
            ConversionError::no_enum_constant(value, &TypeDesc::Enum(ty.clone()))
        })
    }
}

/// Rust types with a fixed [`TypeDesc`]
pub trait Target: FromValue {
    fn type_desc() -> TypeDesc;
}

macro_rules! impl_target {
    ($($ty:ty => $desc:expr),* $(,)?) => {
        $(
            impl Target for $ty {
                fn type_desc() -> TypeDesc {
                    $desc
                }
            }
        )*
    };
}

impl_target! {
    Value => TypeDesc::Any,
    bool => TypeDesc::Bool,
    char => TypeDesc::Char,
    String => TypeDesc::Str,
    i8 => TypeDesc::I8,
    i16 => TypeDesc::I16,
    i32 => TypeDesc::I32,
    i64 => TypeDesc::I64,
    f32 => TypeDesc::F32,
    f64 => TypeDesc::F64,
    BigInt => TypeDesc::BIG_INT,
    BigDecimal => TypeDesc::DECIMAL,
}

impl<T: Target + ArrayElement> Target for Vec<T> {
    fn type_desc() -> TypeDesc {
        TypeDesc::array(T::type_desc())
    }
}

static DEFAULT_MORPH: Lazy<Morph> = Lazy::new(Morph::new);

/// Convert with the default engine
pub fn convert(value: &Value, target: &TypeDesc) -> ConversionResult<Value> {
    DEFAULT_MORPH.convert(value, target)
}
