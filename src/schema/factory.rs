//! Deferred default values for instance fields.

use core::fmt;
use std::sync::Arc;

use crate::schema::ErrorClass;
use crate::types::{Fields, Value};

type PlainFn = dyn Fn() -> Value + Send + Sync;
type SelfFn = dyn for<'a> Fn(&Draft<'a>) -> Value + Send + Sync;

/// Produces a default value for an instance field at construction time.
///
/// A factory runs at most once per error instance, and only when the field
/// was not supplied. [`Factory::with_self`] receives a [`Draft`] of the
/// instance being built, so defaults can be derived from sibling fields.
///
/// # Examples
///
/// ```
/// use error_mold::{fields, ErrorClass, Factory};
///
/// let class = ErrorClass::builder("UserError")
///     .template("{full_name} failed")
///     .field::<String>("name")
///     .field::<String>("surname")
///     .field_factory::<String>(
///         "full_name",
///         Factory::with_self(|draft| {
///             let name = draft.get_str("name").unwrap_or("");
///             format!("{name} {}", draft.get_str("surname").unwrap_or(""))
///         }),
///     )
///     .build()
///     .unwrap();
///
/// let err = class.create(fields! { name: "John", surname: "Brown" }).unwrap();
/// assert_eq!(err.to_string(), "John Brown failed");
/// ```
#[derive(Clone)]
pub enum Factory {
    /// Called without arguments.
    Plain(Arc<PlainFn>),
    /// Called with the partially built instance.
    WithSelf(Arc<SelfFn>),
}

impl Factory {
    pub fn new<F, V>(f: F) -> Self
    where
        F: Fn() -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self::Plain(Arc::new(move || f().into()))
    }

    pub fn with_self<F, V>(f: F) -> Self
    where
        F: for<'a> Fn(&Draft<'a>) -> V + Send + Sync + 'static,
        V: Into<Value>,
    {
        Self::WithSelf(Arc::new(move |draft: &Draft<'_>| f(draft).into()))
    }

    pub(crate) fn produce(&self, draft: &Draft<'_>) -> Value {
        match self {
            Self::Plain(f) => f(),
            Self::WithSelf(f) => f(draft),
        }
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Plain(_) => f.write_str("Factory::Plain(..)"),
            Self::WithSelf(_) => f.write_str("Factory::WithSelf(..)"),
        }
    }
}

/// Read-only view of an error instance while its defaults are resolved.
///
/// Only attributes populated so far are visible: supplied fields, plus
/// defaults declared before the one being produced.
pub struct Draft<'a> {
    class: &'a ErrorClass,
    attrs: &'a Fields,
}

impl<'a> Draft<'a> {
    pub(crate) fn new(class: &'a ErrorClass, attrs: &'a Fields) -> Self {
        Self { class, attrs }
    }

    #[inline]
    pub fn class(&self) -> &'a ErrorClass {
        self.class
    }

    /// Looks up an attribute, falling back to class constants.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.attrs.get(name).or_else(|| self.class.store().consts().get(name))
    }

    pub fn get_str(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(Value::as_str)
    }
}
