//! Enumeration types and enumeration coercion.
//!
//! An [`EnumType`] is a runtime descriptor: a name plus an ordered list of
//! constant names. Descriptors are compared by identity, never by content,
//! so two independently declared enums with the same constants stay
//! distinct. Rust enums join in through [`MorphEnum`].
//!
//! Lookups go through an [`EnumTable`] built once per type and cached for
//! the life of the process.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use once_cell::sync::Lazy;

use crate::error::{ConversionError, ConversionResult};
use crate::numeric::convert_numeric;
use crate::types::{NumericKind, TypeDesc};
use crate::value::Value;

static NEXT_ENUM_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`EnumType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnumTypeId(u64);

#[derive(Debug)]
struct EnumDef {
    id: EnumTypeId,
    name: String,
    constants: Vec<String>,
}

/// Enumeration type descriptor
#[derive(Clone)]
pub struct EnumType(Arc<EnumDef>);

impl EnumType {
    /// Declare a new enumeration type.
    ///
    /// Every call yields a distinct type, even for identical constants.
    pub fn new<N, I, S>(name: N, constants: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = EnumTypeId(NEXT_ENUM_ID.fetch_add(1, Ordering::Relaxed));
        EnumType(Arc::new(EnumDef {
            id,
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }))
    }

    /// Descriptor of a Rust enum. Repeated calls return the same type.
    pub fn of<E: MorphEnum>() -> Self {
        let key = TypeId::of::<E>();
        if let Some(ty) = rust_types_read().get(&key) {
            return ty.clone();
        }
        rust_types_write()
            .entry(key)
            .or_insert_with(|| EnumType::new(E::NAME, E::VARIANTS.iter().map(|v| v.name())))
            .clone()
    }

    pub fn id(&self) -> EnumTypeId {
        self.0.id
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Constant names in declaration order
    pub fn constant_names(&self) -> &[String] {
        &self.0.constants
    }

    pub fn len(&self) -> usize {
        self.0.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.constants.is_empty()
    }

    /// Constant at `ordinal`
    pub fn constant(&self, ordinal: usize) -> Option<EnumConstant> {
        (ordinal < self.len()).then(|| EnumConstant {
            ty: self.clone(),
            ordinal,
        })
    }

    /// All constants in declaration order
    pub fn constants(&self) -> impl Iterator<Item = EnumConstant> + '_ {
        (0..self.len()).map(move |ordinal| EnumConstant {
            ty: self.clone(),
            ordinal,
        })
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for EnumType {}

impl Hash for EnumType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Debug for EnumType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnumType({}#{})", self.0.name, self.0.id.0)
    }
}

/// A constant of an [`EnumType`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumConstant {
    ty: EnumType,
    ordinal: usize,
}

impl EnumConstant {
    /// Constant for a Rust enum variant, or `None` when the variant is
    /// missing from `E::VARIANTS`
    pub fn of<E: MorphEnum>(variant: E) -> Option<Self> {
        let ordinal = E::VARIANTS.iter().position(|v| *v == variant)?;
        Some(EnumConstant {
            ty: EnumType::of::<E>(),
            ordinal,
        })
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.ty
    }

    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    pub fn name(&self) -> &str {
        self.ty
            .constant_names()
            .get(self.ordinal)
            .map_or("", String::as_str)
    }

    /// Back to the Rust enum, if this constant belongs to `E`
    pub fn cast<E: MorphEnum>(&self) -> Option<E> {
        if self.ty != EnumType::of::<E>() {
            return None;
        }
        E::VARIANTS.get(self.ordinal).copied()
    }
}

/// A Rust enum usable as a conversion target.
///
/// ```
/// use value_morph::enums::MorphEnum;
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Color { Red, Green }
///
/// impl MorphEnum for Color {
///     const NAME: &'static str = "Color";
///     const VARIANTS: &'static [Self] = &[Color::Red, Color::Green];
///     fn name(&self) -> &'static str {
///         match self {
///             Color::Red => "RED",
///             Color::Green => "GREEN",
///         }
///     }
/// }
/// ```
pub trait MorphEnum: Copy + PartialEq + 'static {
    const NAME: &'static str;
    /// Every variant, in ordinal order
    const VARIANTS: &'static [Self];
    /// Display name of the variant
    fn name(&self) -> &'static str;
}

// ========== Lookup tables ==========

/// Ordinal and name index of one enumeration type
#[derive(Debug)]
pub struct EnumTable {
    ty: EnumType,
    by_name: HashMap<String, usize>,
}

impl EnumTable {
    fn build(ty: &EnumType) -> Self {
        let mut by_name = HashMap::with_capacity(ty.len());
        for (ordinal, name) in ty.constant_names().iter().enumerate() {
            // first declaration wins on duplicate names
            by_name.entry(name.clone()).or_insert(ordinal);
        }
        EnumTable {
            ty: ty.clone(),
            by_name,
        }
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.ty
    }

    /// Constant at a (possibly negative) ordinal
    pub fn by_ordinal(&self, ordinal: i64) -> Option<EnumConstant> {
        usize::try_from(ordinal)
            .ok()
            .and_then(|ordinal| self.ty.constant(ordinal))
    }

    /// Constant with exactly this name (case-sensitive)
    pub fn by_name(&self, name: &str) -> Option<EnumConstant> {
        self.by_name
            .get(name)
            .and_then(|&ordinal| self.ty.constant(ordinal))
    }
}

static ENUM_TABLES: Lazy<RwLock<HashMap<EnumTypeId, Arc<EnumTable>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

static RUST_ENUM_TYPES: Lazy<RwLock<HashMap<TypeId, EnumType>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

fn tables_read() -> RwLockReadGuard<'static, HashMap<EnumTypeId, Arc<EnumTable>>> {
    ENUM_TABLES
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn tables_write() -> RwLockWriteGuard<'static, HashMap<EnumTypeId, Arc<EnumTable>>> {
    ENUM_TABLES
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn rust_types_read() -> RwLockReadGuard<'static, HashMap<TypeId, EnumType>> {
    RUST_ENUM_TYPES
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn rust_types_write() -> RwLockWriteGuard<'static, HashMap<TypeId, EnumType>> {
    RUST_ENUM_TYPES
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Lookup table for `ty`, built on first use.
///
/// Construction happens under the write lock, so concurrent first callers
/// all receive the same `Arc`.
pub fn lookup_table(ty: &EnumType) -> Arc<EnumTable> {
    if let Some(table) = tables_read().get(&ty.id()) {
        return Arc::clone(table);
    }
    let mut tables = tables_write();
    let table = tables.entry(ty.id()).or_insert_with(|| {
        log::debug!(
            "building lookup table for enum {} ({} constants)",
            ty.name(),
            ty.len()
        );
        Arc::new(EnumTable::build(ty))
    });
    Arc::clone(table)
}

// ========== Coercion ==========

/// Convert `value` into a constant of `ty`.
///
/// Digit characters and integer text are ordinals, numbers are ordinals,
/// constants of another enum match by name, and everything else matches
/// the exact (case-sensitive) constant name of its text.
pub fn to_enum(value: &Value, ty: &EnumType) -> ConversionResult<EnumConstant> {
    let target = TypeDesc::Enum(ty.clone());
    let table = lookup_table(ty);
    let no_match = || ConversionError::no_enum_constant(value, &target);

    match value {
        Value::Enum(constant) if constant.enum_type() == ty => Ok(constant.clone()),
        Value::Enum(constant) => table.by_name(constant.name()).ok_or_else(no_match),
        Value::Char(c) => match c.to_digit(10) {
            Some(digit) => table
                .by_ordinal(i64::from(digit))
                .ok_or_else(|| no_match().with_detail("ordinal out of range")),
            None => table.by_name(&c.to_string()).ok_or_else(no_match),
        },
        Value::Str(text) => match text.parse::<i64>() {
            Ok(ordinal) => table
                .by_ordinal(ordinal)
                .ok_or_else(|| no_match().with_detail("ordinal out of range")),
            Err(_) => table.by_name(text).ok_or_else(no_match),
        },
        value if value.is_numeric() => {
            let ordinal = match convert_numeric(value, NumericKind::I32) {
                Ok(Value::I32(ordinal)) => i64::from(ordinal),
                _ => return Err(no_match().with_detail("not an integral ordinal")),
            };
            table
                .by_ordinal(ordinal)
                .ok_or_else(|| no_match().with_detail("ordinal out of range"))
        }
        Value::Null => Err(no_match()),
        other => table.by_name(&other.to_string()).ok_or_else(no_match),
    }
}

/// Ordinal of an enumeration constant as a numeric value
pub fn ordinal_value(constant: &EnumConstant) -> Value {
    Value::I64(constant.ordinal() as i64)
}
