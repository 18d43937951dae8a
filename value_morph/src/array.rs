//! Typed arrays and element-wise array coercion.
//!
//! Primitive element kinds are stored unboxed in their own vector; every
//! other element kind (enumerations, nested containers, `Any`) lives in
//! [`TypedArray::Values`] next to its element descriptor.

use bigdecimal::BigDecimal;
use num_bigint::BigInt;

use crate::dispatch::Morph;
use crate::error::{ConversionError, ConversionResult};
use crate::types::{NumericKind, TypeDesc};
use crate::value::{FromValue, Value};

/// Homogeneous array storage
#[derive(Debug, Clone, PartialEq)]
pub enum TypedArray {
    Bool(Vec<bool>),
    Char(Vec<char>),
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    BigInt(Vec<BigInt>),
    Decimal(Vec<BigDecimal>),
    Str(Vec<String>),
    /// Elements without a dedicated vector, tagged with their descriptor
    Values { element: TypeDesc, items: Vec<Value> },
}

/// Apply `$body` to the element vector of whichever variant `$array` holds.
macro_rules! typed_array_dispatch {
    ($array:expr, $v:ident => $body:expr) => {
        match $array {
            TypedArray::Bool($v) => $body,
            TypedArray::Char($v) => $body,
            TypedArray::I8($v) => $body,
            TypedArray::I16($v) => $body,
            TypedArray::I32($v) => $body,
            TypedArray::I64($v) => $body,
            TypedArray::F32($v) => $body,
            TypedArray::F64($v) => $body,
            TypedArray::BigInt($v) => $body,
            TypedArray::Decimal($v) => $body,
            TypedArray::Str($v) => $body,
            TypedArray::Values { items: $v, .. } => $body,
        }
    };
}

impl TypedArray {
    /// Empty array whose element descriptor is `element`
    pub fn empty(element: &TypeDesc) -> Self {
        match element {
            TypeDesc::Bool => TypedArray::Bool(Vec::new()),
            TypeDesc::Char => TypedArray::Char(Vec::new()),
            TypeDesc::Str => TypedArray::Str(Vec::new()),
            TypeDesc::Numeric(kind) => match kind {
                NumericKind::I8 => TypedArray::I8(Vec::new()),
                NumericKind::I16 => TypedArray::I16(Vec::new()),
                NumericKind::I32 => TypedArray::I32(Vec::new()),
                NumericKind::I64 => TypedArray::I64(Vec::new()),
                NumericKind::F32 => TypedArray::F32(Vec::new()),
                NumericKind::F64 => TypedArray::F64(Vec::new()),
                NumericKind::BigInt => TypedArray::BigInt(Vec::new()),
                NumericKind::Decimal => TypedArray::Decimal(Vec::new()),
            },
            TypeDesc::Any | TypeDesc::Enum(_) | TypeDesc::Array(_) | TypeDesc::Sequence(..) => {
                TypedArray::Values {
                    element: element.clone(),
                    items: Vec::new(),
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        typed_array_dispatch!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        typed_array_dispatch!(self, v => v.is_empty())
    }

    /// Descriptor of the elements this array holds
    pub fn element_desc(&self) -> TypeDesc {
        match self {
            TypedArray::Bool(_) => TypeDesc::Bool,
            TypedArray::Char(_) => TypeDesc::Char,
            TypedArray::I8(_) => TypeDesc::I8,
            TypedArray::I16(_) => TypeDesc::I16,
            TypedArray::I32(_) => TypeDesc::I32,
            TypedArray::I64(_) => TypeDesc::I64,
            TypedArray::F32(_) => TypeDesc::F32,
            TypedArray::F64(_) => TypeDesc::F64,
            TypedArray::BigInt(_) => TypeDesc::BIG_INT,
            TypedArray::Decimal(_) => TypeDesc::DECIMAL,
            TypedArray::Str(_) => TypeDesc::Str,
            TypedArray::Values { element, .. } => element.clone(),
        }
    }

    /// Element at `index` as a dynamic value
    pub fn get(&self, index: usize) -> Option<Value> {
        typed_array_dispatch!(self, v => v.get(index).cloned().map(Value::from))
    }

    /// All elements as dynamic values, in order
    pub fn values(&self) -> Vec<Value> {
        typed_array_dispatch!(self, v => v.iter().cloned().map(Value::from).collect())
    }
}

/// Element types with a dedicated [`TypedArray`] variant.
///
/// ```
/// use value_morph::array::{ArrayElement, TypedArray};
///
/// let array = i16::into_array(vec![1, 2]);
/// assert_eq!(array, TypedArray::I16(vec![1, 2]));
/// assert_eq!(i16::from_array(array), Some(vec![1, 2]));
/// ```
pub trait ArrayElement: FromValue {
    fn into_array(items: Vec<Self>) -> TypedArray;
    fn from_array(array: TypedArray) -> Option<Vec<Self>>;
}

macro_rules! impl_array_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl ArrayElement for $ty {
                fn into_array(items: Vec<Self>) -> TypedArray {
                    TypedArray::$variant(items)
                }

                fn from_array(array: TypedArray) -> Option<Vec<Self>> {
                    match array {
                        TypedArray::$variant(items) => Some(items),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_array_element! {
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    BigInt => BigInt,
    BigDecimal => Decimal,
    String => Str,
}

impl<T: ArrayElement> FromValue for Vec<T> {
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Array(array) => T::from_array(array),
            _ => None,
        }
    }
}

/// Convert every item to `element` and store the results in a `T` slot
fn collect<T: ArrayElement>(
    morph: &Morph,
    items: &[Value],
    element: &TypeDesc,
) -> ConversionResult<TypedArray> {
    let mut slots = Vec::with_capacity(items.len());
    for item in items {
        let converted = morph.convert(item, element)?;
        let slot = T::from_value(converted).ok_or_else(|| {
            ConversionError::unsupported_source(item, element)
                .with_detail("null cannot occupy a primitive element slot")
        })?;
        slots.push(slot);
    }
    Ok(T::into_array(slots))
}

/// Convert `items` element-wise into an array of `element`
pub(crate) fn collect_elements(
    morph: &Morph,
    items: &[Value],
    element: &TypeDesc,
) -> ConversionResult<TypedArray> {
    match element {
        TypeDesc::Bool => collect::<bool>(morph, items, element),
        TypeDesc::Char => collect::<char>(morph, items, element),
        TypeDesc::Str => collect::<String>(morph, items, element),
        TypeDesc::Numeric(kind) => match kind {
            NumericKind::I8 => collect::<i8>(morph, items, element),
            NumericKind::I16 => collect::<i16>(morph, items, element),
            NumericKind::I32 => collect::<i32>(morph, items, element),
            NumericKind::I64 => collect::<i64>(morph, items, element),
            NumericKind::F32 => collect::<f32>(morph, items, element),
            NumericKind::F64 => collect::<f64>(morph, items, element),
            NumericKind::BigInt => collect::<BigInt>(morph, items, element),
            NumericKind::Decimal => collect::<BigDecimal>(morph, items, element),
        },
        TypeDesc::Any | TypeDesc::Enum(_) | TypeDesc::Array(_) | TypeDesc::Sequence(..) => {
            let items = items
                .iter()
                .map(|item| morph.convert(item, element))
                .collect::<ConversionResult<Vec<_>>>()?;
            Ok(TypedArray::Values {
                element: element.clone(),
                items,
            })
        }
    }
}

/// Convert `value` into an array of `element`.
///
/// Arrays and sequences convert element by element. Text becomes its
/// characters for a `char` element and its UTF-8 bytes for an `i8`
/// element. Anything else becomes a one-element array.
pub fn to_array(morph: &Morph, value: &Value, element: &TypeDesc) -> ConversionResult<TypedArray> {
    match (value, element) {
        (Value::Array(array), _) => collect_elements(morph, &array.values(), element),
        (Value::Seq(seq), _) => collect_elements(morph, seq.items(), element),
        (Value::Str(text), TypeDesc::Char) => Ok(TypedArray::Char(text.chars().collect())),
        (Value::Str(text), TypeDesc::Numeric(NumericKind::I8)) => {
            Ok(TypedArray::I8(text.bytes().map(|b| b as i8).collect()))
        }
        (scalar, _) => collect_elements(morph, std::slice::from_ref(scalar), element),
    }
}

/// Text held by a `char` or byte array.
///
/// `None` for other arrays; byte arrays that are not valid UTF-8 fail with
/// `UnsupportedSourceType`.
// Byte arrays store UTF-8 bytes reinterpreted as i8; the cast back is bit-exact.
#[allow(clippy::cast_sign_loss)]
pub(crate) fn array_text(array: &TypedArray) -> Option<ConversionResult<String>> {
    match array {
        TypedArray::Char(chars) => Some(Ok(chars.iter().collect())),
        TypedArray::I8(bytes) => {
            let bytes = bytes.iter().map(|&b| b as u8).collect::<Vec<u8>>();
            Some(String::from_utf8(bytes).map_err(|e| {
                ConversionError::unsupported_source(&Value::Array(array.clone()), &TypeDesc::Str)
                    .with_detail(e.to_string())
            }))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::EnumType;
    use crate::error::ConversionReason;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_matches_element() {
        assert_eq!(TypedArray::empty(&TypeDesc::F32), TypedArray::F32(vec![]));
        let nested = TypeDesc::array(TypeDesc::I8);
        let empty = TypedArray::empty(&nested);
        assert_eq!(empty.element_desc(), nested);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_get_and_values() {
        let array = TypedArray::Str(vec!["a".into(), "b".into()]);
        assert_eq!(array.len(), 2);
        assert_eq!(array.get(1), Some(Value::from("b")));
        assert_eq!(array.get(2), None);
        assert_eq!(array.values(), vec![Value::from("a"), Value::from("b")]);
    }

    #[test]
    fn test_strings_to_int_array() {
        let morph = Morph::new();
        let source = Value::Array(TypedArray::Str(vec!["1".into(), "2".into(), "3".into()]));
        let array = to_array(&morph, &source, &TypeDesc::I32).unwrap();
        assert_eq!(array, TypedArray::I32(vec![1, 2, 3]));
    }

    #[test]
    fn test_text_to_chars_and_bytes() {
        let morph = Morph::new();
        let text = Value::from("hé");
        assert_eq!(
            to_array(&morph, &text, &TypeDesc::Char).unwrap(),
            TypedArray::Char(vec!['h', 'é'])
        );
        assert_eq!(
            to_array(&morph, &text, &TypeDesc::I8).unwrap(),
            TypedArray::I8(vec![104, -61, -87])
        );
        // Other element kinds take the single-element path
        assert_eq!(
            to_array(&morph, &Value::from("42"), &TypeDesc::I64).unwrap(),
            TypedArray::I64(vec![42])
        );
    }

    #[test]
    fn test_scalar_wraps_in_one_element_array() {
        let morph = Morph::new();
        assert_eq!(
            to_array(&morph, &Value::I8(5), &TypeDesc::F64).unwrap(),
            TypedArray::F64(vec![5.0])
        );
    }

    #[test]
    fn test_null_element_in_primitive_slot() {
        let morph = Morph::new();
        let source = Value::Array(TypedArray::Values {
            element: TypeDesc::Any,
            items: vec![Value::I32(1), Value::Null],
        });
        let err = to_array(&morph, &source, &TypeDesc::I32).unwrap_err();
        assert_eq!(err.reason, ConversionReason::UnsupportedSourceType);

        let kept = to_array(&morph, &source, &TypeDesc::Any).unwrap();
        assert_eq!(kept.values(), vec![Value::I32(1), Value::Null]);
    }

    #[test]
    fn test_enum_elements() {
        let morph = Morph::new();
        let ty = EnumType::new("Dir", ["N", "E", "S", "W"]);
        let source = Value::Array(TypedArray::Str(vec!["W".into(), "1".into()]));
        let array = to_array(&morph, &source, &TypeDesc::Enum(ty.clone())).unwrap();
        let names: Vec<String> = array.values().iter().map(|v| v.to_string()).collect();
        assert_eq!(names, vec!["W", "E"]);
        assert_eq!(array.element_desc(), TypeDesc::Enum(ty));
    }

    #[test]
    fn test_array_text() {
        let bytes = TypedArray::I8(vec![104, 105]);
        assert_eq!(array_text(&bytes).unwrap().unwrap(), "hi");
        let invalid = TypedArray::I8(vec![-1]);
        assert_eq!(
            array_text(&invalid).unwrap().unwrap_err().reason,
            ConversionReason::UnsupportedSourceType
        );
        assert!(array_text(&TypedArray::I32(vec![1])).is_none());
    }
}
