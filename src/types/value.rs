//! Dynamic field values carried by structured errors.
//!
//! A [`Value`] is what a template placeholder resolves to and what
//! [`StructuredError::as_dict`](crate::StructuredError::as_dict) hands back.
//! Most variants are plain data and are cloned by value; [`Value::Shared`]
//! models a mutable object whose identity survives a shallow copy.

use core::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Insertion-ordered keyword fields, the Rust counterpart of `**kwargs`.
pub type Fields = IndexMap<String, Value>;

/// A dynamically typed field value.
#[derive(Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Value {
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Shared(SharedValue),
}

impl Value {
    /// Wraps a value in a fresh shared cell.
    #[inline]
    pub fn shared(value: impl Into<Value>) -> Self {
        Self::Shared(SharedValue::new(value.into()))
    }

    /// Short name of the variant, used in formatting errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Shared(_) => "shared",
        }
    }

    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_shared(&self) -> Option<&SharedValue> {
        match self {
            Self::Shared(cell) => Some(cell),
            _ => None,
        }
    }

    /// Clones the value, replacing every shared cell with a fresh one.
    pub fn deep_clone(&self) -> Self {
        match self {
            Self::List(items) => Self::List(items.iter().map(Value::deep_clone).collect()),
            Self::Map(map) => {
                Self::Map(map.iter().map(|(k, v)| (k.clone(), v.deep_clone())).collect())
            },
            Self::Shared(cell) => Self::Shared(SharedValue::new(cell.get().deep_clone())),
            other => other.clone(),
        }
    }

    /// Resolves `.name` / `[name]` access on maps and `[n]` access on lists.
    pub fn lookup(&self, key: &str) -> Option<Value> {
        match self {
            Self::Map(map) => map.get(key).cloned(),
            Self::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i).cloned()),
            Self::Shared(cell) => cell.read().lookup(key),
            _ => None,
        }
    }
}

/// Mutable value cell shared between a structured error and its shallow copies.
#[derive(Clone, Default)]
pub struct SharedValue(Arc<RwLock<Value>>);

impl SharedValue {
    #[inline]
    pub fn new(value: Value) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }

    /// Returns a snapshot of the current contents.
    #[inline]
    pub fn get(&self) -> Value {
        self.read().clone()
    }

    /// Replaces the contents, visible through every handle of this cell.
    #[inline]
    pub fn set(&self, value: impl Into<Value>) {
        *self.write() = value.into();
    }

    /// Mutates the contents in place.
    #[inline]
    pub fn update<R>(&self, f: impl FnOnce(&mut Value) -> R) -> R {
        f(&mut self.write())
    }

    /// Returns `true` when both handles point to the same cell.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, Value> {
        self.0.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Value> {
        self.0.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PartialEq for SharedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.read() == *other.read()
    }
}

impl fmt::Debug for SharedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.read(), f)
    }
}

#[cfg(feature = "serde")]
impl Serialize for SharedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.read().serialize(serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for SharedValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(SharedValue::new)
    }
}

/// Values compare through shared cells, so `Shared(x) == x`.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Shared(a), Self::Shared(b)) => a == b,
            (Self::Shared(a), b) => *a.read() == *b,
            (a, Self::Shared(b)) => *a == *b.read(),
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

/// Shortest round-tripping form: `1.0`, `1e+16`, `1e-05`, `nan`, `-inf`.
pub(crate) fn float_repr(x: f64) -> String {
    if x.is_nan() {
        return "nan".to_owned();
    }
    if x.is_infinite() {
        return if x < 0.0 { "-inf" } else { "inf" }.to_owned();
    }
    let repr = format!("{x:?}");
    match repr.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            let mantissa = mantissa.strip_suffix(".0").unwrap_or(mantissa);
            format!("{mantissa}e{sign}{digits:0>2}")
        },
        None => repr,
    }
}

fn bool_repr(b: bool) -> &'static str {
    if b {
        "True"
    } else {
        "False"
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(b) => f.write_str(bool_repr(*b)),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => f.write_str(&float_repr(*x)),
            Self::Str(s) => f.write_str(s),
            Self::List(_) | Self::Map(_) => fmt::Debug::fmt(self, f),
            Self::Shared(cell) => fmt::Display::fmt(&*cell.read(), f),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(b) => f.write_str(bool_repr(*b)),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => f.write_str(&float_repr(*x)),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::List(items) => f.debug_list().entries(items).finish(),
            Self::Map(map) => f.debug_map().entries(map).finish(),
            Self::Shared(cell) => fmt::Debug::fmt(cell, f),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident $(as $cast:ty)?),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(v: $ty) -> Self {
                    Self::$variant(v $(as $cast)?)
                }
            }
        )*
    };
}

value_from! {
    bool => Bool,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int,
    u8 => Int as i64,
    u16 => Int as i64,
    u32 => Int as i64,
    u64 => Int as i64,
    usize => Int as i64,
    isize => Int as i64,
    f32 => Float as f64,
    f64 => Float,
    String => Str,
    SharedValue => Shared,
}

impl From<&str> for Value {
    #[inline]
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<&String> for Value {
    #[inline]
    fn from(v: &String) -> Self {
        Self::Str(v.clone())
    }
}

impl From<char> for Value {
    #[inline]
    fn from(v: char) -> Self {
        Self::Str(v.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::None, Into::into)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Self::List(vec![a.into(), b.into()])
    }
}

impl From<IndexMap<String, Value>> for Value {
    #[inline]
    fn from(v: IndexMap<String, Value>) -> Self {
        Self::Map(v)
    }
}

impl From<()> for Value {
    #[inline]
    fn from(_: ()) -> Self {
        Self::None
    }
}

/// Deep-clones every value of a field map.
pub fn deep_clone_fields(fields: &Fields) -> Fields {
    fields.iter().map(|(k, v)| (k.clone(), v.deep_clone())).collect()
}

/// Renders fields as `key=value` pairs using each value's debug form.
pub fn join_kwargs(fields: &Fields) -> String {
    let mut out = String::new();
    for (i, (k, v)) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(k);
        out.push('=');
        out.push_str(&format!("{v:?}"));
    }
    out
}
