//! Ordered sequences and sequence coercion.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::dispatch::Morph;
use crate::error::{ConversionError, ConversionResult};
use crate::numeric::compare_numeric;
use crate::types::TypeDesc;
use crate::value::Value;

/// Kind of sequence a value is collected into
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// Unique elements
    HashSet,
    /// Unique elements in insertion order
    LinkedHashSet,
    /// Unique elements in ascending order
    TreeSet,
    List,
    LinkedList,
    /// Plain iteration order, no further guarantees
    Iterable,
    /// Caller-defined sequence kind
    Custom(CustomSequence),
}

impl SequenceKind {
    pub fn name(&self) -> &str {
        match self {
            SequenceKind::HashSet => "HashSet",
            SequenceKind::LinkedHashSet => "LinkedHashSet",
            SequenceKind::TreeSet => "TreeSet",
            SequenceKind::List => "List",
            SequenceKind::LinkedList => "LinkedList",
            SequenceKind::Iterable => "Iterable",
            SequenceKind::Custom(custom) => custom.name(),
        }
    }
}

/// A caller-defined sequence kind.
///
/// Conversion into a custom kind starts from the storage returned by its
/// zero-argument constructor and appends the converted elements. Kinds
/// without a constructor cannot be targeted.
#[derive(Clone)]
pub struct CustomSequence {
    name: Arc<str>,
    constructor: Option<fn() -> Vec<Value>>,
}

impl CustomSequence {
    pub fn new(name: impl Into<Arc<str>>, constructor: fn() -> Vec<Value>) -> Self {
        CustomSequence {
            name: name.into(),
            constructor: Some(constructor),
        }
    }

    /// A kind that can describe values but cannot be constructed
    pub fn abstract_kind(name: impl Into<Arc<str>>) -> Self {
        CustomSequence {
            name: name.into(),
            constructor: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_constructible(&self) -> bool {
        self.constructor.is_some()
    }
}

impl PartialEq for CustomSequence {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CustomSequence {}

impl Hash for CustomSequence {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for CustomSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSequence")
            .field("name", &self.name)
            .field("constructible", &self.is_constructible())
            .finish()
    }
}

/// How elements are copied into a sequence kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyStrategy {
    Plain,
    Unique,
    Sorted,
}

fn blueprint(kind: &SequenceKind) -> CopyStrategy {
    match kind {
        SequenceKind::HashSet | SequenceKind::LinkedHashSet => CopyStrategy::Unique,
        SequenceKind::TreeSet => CopyStrategy::Sorted,
        SequenceKind::List
        | SequenceKind::LinkedList
        | SequenceKind::Iterable
        | SequenceKind::Custom(_) => CopyStrategy::Plain,
    }
}

/// An ordered sequence of dynamic values
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    kind: SequenceKind,
    items: Vec<Value>,
}

impl Sequence {
    /// Collect `items` into `kind`, dropping duplicates or sorting as the
    /// kind requires
    pub fn new(kind: SequenceKind, items: Vec<Value>) -> Self {
        let items = copy_items(blueprint(&kind), items);
        Sequence { kind, items }
    }

    pub fn empty(kind: SequenceKind) -> Self {
        Sequence {
            kind,
            items: Vec::new(),
        }
    }

    pub fn kind(&self) -> &SequenceKind {
        &self.kind
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<Value> {
        self.items
    }
}

fn copy_items(strategy: CopyStrategy, items: Vec<Value>) -> Vec<Value> {
    match strategy {
        CopyStrategy::Plain => items,
        CopyStrategy::Unique => {
            // `seen` stays sorted so membership is a binary search
            let mut seen: Vec<Value> = Vec::with_capacity(items.len());
            let mut unique = Vec::with_capacity(items.len());
            for item in items {
                if let Err(at) = seen.binary_search_by(|kept| compare_values(kept, &item)) {
                    seen.insert(at, item.clone());
                    unique.push(item);
                }
            }
            unique
        }
        CopyStrategy::Sorted => {
            let mut sorted = items;
            sorted.sort_by(compare_values);
            sorted.dedup_by(|a, b| compare_values(a, b) == Ordering::Equal);
            sorted
        }
    }
}

fn category(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::I8(_)
        | Value::I16(_)
        | Value::I32(_)
        | Value::I64(_)
        | Value::F32(_)
        | Value::F64(_)
        | Value::BigInt(_)
        | Value::Decimal(_) => 2,
        Value::Char(_) => 3,
        Value::Str(_) => 4,
        Value::Enum(_) => 5,
        Value::Array(_) => 6,
        Value::Seq(_) => 7,
    }
}

/// Total order over values, used for sorted sequences.
///
/// Values group by category (null, booleans, numbers, characters, text,
/// enumeration constants, arrays, sequences). Numbers compare by magnitude,
/// constants by enumeration then ordinal, containers lexicographically.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Char(x), Value::Char(y)) => x.cmp(y),
        (Value::Str(x), Value::Str(y)) => x.cmp(y),
        (Value::Enum(x), Value::Enum(y)) => x
            .enum_type()
            .name()
            .cmp(y.enum_type().name())
            .then_with(|| x.enum_type().id().cmp(&y.enum_type().id()))
            .then_with(|| x.ordinal().cmp(&y.ordinal())),
        (Value::Array(x), Value::Array(y)) => compare_slices(&x.values(), &y.values())
            .then_with(|| {
                x.element_desc()
                    .to_string()
                    .cmp(&y.element_desc().to_string())
            }),
        (Value::Seq(x), Value::Seq(y)) => x
            .kind()
            .name()
            .cmp(y.kind().name())
            .then_with(|| compare_slices(x.items(), y.items())),
        (x, y) if x.is_numeric() && y.is_numeric() => compare_numeric(x, y),
        (x, y) => category(x).cmp(&category(y)),
    }
}

fn compare_slices(a: &[Value], b: &[Value]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| compare_values(x, y))
        .find(|ordering| *ordering != Ordering::Equal)
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Convert `value` into a sequence of `kind` whose elements are converted
/// to `element`.
///
/// Arrays and sequences contribute their elements; any other value,
/// including text, becomes a single element.
pub fn to_sequence(
    morph: &Morph,
    value: &Value,
    kind: &SequenceKind,
    element: &TypeDesc,
) -> ConversionResult<Sequence> {
    let mut storage = match kind {
        SequenceKind::Custom(custom) => match custom.constructor {
            Some(constructor) => constructor(),
            None => {
                let target = TypeDesc::sequence(kind.clone(), element.clone());
                return Err(ConversionError::unsupported_target(value, &target)
                    .with_detail(format!("{} has no zero-argument constructor", custom.name())));
            }
        },
        _ => Vec::new(),
    };

    let sources = match value {
        Value::Array(array) => array.values(),
        Value::Seq(seq) => seq.items().to_vec(),
        scalar => vec![scalar.clone()],
    };
    storage.reserve(sources.len());
    for item in &sources {
        storage.push(morph.convert(item, element)?);
    }

    Ok(Sequence {
        kind: kind.clone(),
        items: copy_items(blueprint(kind), storage),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::TypedArray;
    use crate::error::ConversionReason;
    use pretty_assertions::assert_eq;

    fn ints(values: &[i64]) -> Vec<Value> {
        values.iter().copied().map(Value::I64).collect()
    }

    #[test]
    fn test_blueprints() {
        let source = ints(&[3, 1, 3, 2, 1]);
        assert_eq!(
            Sequence::new(SequenceKind::List, source.clone()).items(),
            ints(&[3, 1, 3, 2, 1]).as_slice()
        );
        assert_eq!(
            Sequence::new(SequenceKind::LinkedHashSet, source.clone()).items(),
            ints(&[3, 1, 2]).as_slice()
        );
        assert_eq!(
            Sequence::new(SequenceKind::HashSet, source.clone()).items(),
            ints(&[3, 1, 2]).as_slice()
        );
        assert_eq!(
            Sequence::new(SequenceKind::TreeSet, source).items(),
            ints(&[1, 2, 3]).as_slice()
        );
    }

    #[test]
    fn test_compare_values_groups_categories() {
        let mut values = vec![
            Value::from("b"),
            Value::I32(2),
            Value::Null,
            Value::Char('z'),
            Value::Bool(true),
            Value::from("a"),
            Value::F64(-1.5),
        ];
        values.sort_by(compare_values);
        assert_eq!(
            values,
            vec![
                Value::Null,
                Value::Bool(true),
                Value::F64(-1.5),
                Value::I32(2),
                Value::Char('z'),
                Value::from("a"),
                Value::from("b"),
            ]
        );
    }

    #[test]
    fn test_unique_keeps_distinct_kinds() {
        let seq = Sequence::new(
            SequenceKind::HashSet,
            vec![Value::I32(1), Value::I64(1), Value::I32(1)],
        );
        assert_eq!(seq.items(), &[Value::I32(1), Value::I64(1)]);
    }

    #[test]
    fn test_sets_keep_signed_zeros_apart() {
        fn bits(items: &[Value]) -> Vec<u64> {
            items
                .iter()
                .map(|v| match v {
                    Value::F64(x) => x.to_bits(),
                    other => panic!("unexpected {other:?}"),
                })
                .collect()
        }
        let source = vec![Value::F64(0.0), Value::F64(-0.0), Value::F64(0.0)];

        let hashed = Sequence::new(SequenceKind::HashSet, source.clone());
        assert_eq!(bits(hashed.items()), vec![0.0f64.to_bits(), (-0.0f64).to_bits()]);

        let sorted = Sequence::new(SequenceKind::TreeSet, source);
        assert_eq!(bits(sorted.items()), vec![(-0.0f64).to_bits(), 0.0f64.to_bits()]);
    }

    #[test]
    fn test_array_to_tree_set() {
        let morph = Morph::new();
        let source = Value::Array(TypedArray::Str(vec!["10".into(), "9".into(), "10".into()]));
        let seq = to_sequence(&morph, &source, &SequenceKind::TreeSet, &TypeDesc::I32).unwrap();
        assert_eq!(seq.items(), &[Value::I32(9), Value::I32(10)]);
    }

    #[test]
    fn test_text_is_a_single_element() {
        let morph = Morph::new();
        let seq = to_sequence(&morph, &Value::from("abc"), &SequenceKind::List, &TypeDesc::Any)
            .unwrap();
        assert_eq!(seq.items(), &[Value::from("abc")]);
    }

    #[test]
    fn test_custom_kinds() {
        fn seeded() -> Vec<Value> {
            vec![Value::from("head")]
        }
        let morph = Morph::new();
        let source = Value::Array(TypedArray::I8(vec![1, 2]));

        let kind = SequenceKind::Custom(CustomSequence::new("Deque", seeded));
        let seq = to_sequence(&morph, &source, &kind, &TypeDesc::Str).unwrap();
        assert_eq!(seq.kind().name(), "Deque");
        assert_eq!(
            seq.items(),
            &[Value::from("head"), Value::from("1"), Value::from("2")]
        );

        let kind = SequenceKind::Custom(CustomSequence::abstract_kind("Collection"));
        let err = to_sequence(&morph, &source, &kind, &TypeDesc::Str).unwrap_err();
        assert_eq!(err.reason, ConversionReason::UnsupportedTargetType);
        assert_eq!(
            err.detail.as_deref(),
            Some("Collection has no zero-argument constructor")
        );
    }

    #[test]
    fn test_custom_kind_identity_is_by_name() {
        fn empty() -> Vec<Value> {
            Vec::new()
        }
        assert_eq!(
            CustomSequence::new("Bag", empty),
            CustomSequence::abstract_kind("Bag")
        );
    }
}
