use core::fmt;
use std::collections::BTreeSet;
use std::error::Error;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

use crate::error::ConstructionError;
use crate::schema::{
    check_kwarg_consts, check_missing_fields, check_undeclared_fields, Bound, Draft, ErrorClass,
    Reduced, Toggles,
};
use crate::template::format_template;
use crate::tools::{iterate_causes, Causes};
use crate::types::{deep_clone_fields, join_kwargs, Fields, Raised, Value};

/// An instance of an [`ErrorClass`].
///
/// Holds the keyword fields it was built from, the resolved instance
/// attributes and the rendered message. `Display` prints the message;
/// `Debug` prints `Name(field=value, ...)`.
///
/// # Examples
///
/// ```
/// use error_mold::{fields, ErrorClass, Value};
///
/// let class = ErrorClass::builder("AgeError")
///     .template("The {name} is {age} years old")
///     .field::<String>("name")
///     .field_default("age", 0)
///     .build()
///     .unwrap();
///
/// let err = class.create(fields! { name: "John" }).unwrap();
/// assert_eq!(err.message(), "The John is 0 years old");
/// assert_eq!(err.get("age"), Some(&Value::Int(0)));
/// assert_eq!(format!("{err:?}"), "AgeError(name=\"John\", age=0)");
/// ```
#[derive(Clone)]
pub struct StructuredError {
    class: ErrorClass,
    kwargs: Fields,
    attrs: Fields,
    message: String,
    cause: Option<Box<Raised>>,
}

impl StructuredError {
    pub(crate) fn construct(class: ErrorClass, kwargs: Fields) -> Result<Self, ConstructionError> {
        let store = class.store();
        let toggles = class.toggles();
        let names: BTreeSet<&str> = kwargs.keys().map(String::as_str).collect();
        if toggles.contains(Toggles::FORBID_MISSING_FIELDS) {
            check_missing_fields(store, &names)?;
        }
        if toggles.contains(Toggles::FORBID_UNDECLARED_FIELDS) {
            check_undeclared_fields(store, &names)?;
        }
        if toggles.contains(Toggles::FORBID_KWARG_CONSTS) {
            check_kwarg_consts(store, &names)?;
        }

        let mut attrs: Fields = kwargs
            .iter()
            .filter(|(name, _)| store.inst_hints().contains_key(*name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        for name in store.defaults() {
            if attrs.contains_key(name) {
                continue;
            }
            let value = match class.bound(name) {
                Some(Bound::Static(value)) => value.clone(),
                Some(Bound::Factory(factory)) => factory.produce(&Draft::new(&class, &attrs)),
                None => continue,
            };
            attrs.insert(name.clone(), value);
        }

        let mut err = Self { class, kwargs, attrs, message: String::new(), cause: None };
        let mut mapping = err.class.store().consts().clone();
        mapping.extend(err.as_dict(false));
        let message = format_template(err.class.template(), &mapping).map_err(|source| {
            ConstructionError::Template { kwargs: join_kwargs(&mapping), source }
        })?;
        err.message = match err.class.message_hook() {
            Some(hook) => hook(err.class.store(), &err.kwargs, message),
            None => message,
        };
        Ok(err)
    }

    #[inline]
    pub fn class(&self) -> &ErrorClass {
        &self.class
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Instance attribute, falling back to a class constant.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name).or_else(|| self.class.store().consts().get(name))
    }

    /// The keyword fields exactly as supplied.
    #[inline]
    pub fn kwargs(&self) -> &Fields {
        &self.kwargs
    }

    pub fn as_kwargs(&self) -> Fields {
        self.kwargs.clone()
    }

    /// Supplied fields plus resolved defaults; `wide` also adds constants.
    ///
    /// Supplied values always win over defaults and constants.
    pub fn as_dict(&self, wide: bool) -> Fields {
        let mut dict = self.kwargs.clone();
        for name in self.class.store().defaults() {
            if let Some(value) = self.attrs.get(name) {
                dict.entry(name.clone()).or_insert_with(|| value.clone());
            }
        }
        if wide {
            for (name, value) in self.class.store().consts() {
                dict.entry(name.clone()).or_insert_with(|| value.clone());
            }
        }
        dict
    }

    /// `ClassName: message`.
    pub fn as_str(&self) -> String {
        format!("{}: {}", self.class.name(), self.message)
    }

    pub fn is_instance_of(&self, class: &ErrorClass) -> bool {
        self.class.is_subclass_of(class)
    }

    /// The error this one was raised from.
    #[inline]
    pub fn cause(&self) -> Option<&Raised> {
        self.cause.as_deref()
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<Raised>) -> Self {
        self.cause = Some(Box::new(cause.into()));
        self
    }

    pub fn take_cause(&mut self) -> Option<Raised> {
        self.cause.take().map(|c| *c)
    }

    /// Iterates over this error and its causes.
    pub fn causes(&self) -> Causes<'_> {
        iterate_causes(self, true)
    }

    /// Rebuilds the error from its fields; mutable shared values stay shared.
    pub fn copy(&self) -> Result<Self, ConstructionError> {
        self.class.create(self.as_dict(false))
    }

    /// Rebuilds the error from deep clones of its fields.
    pub fn deep_copy(&self) -> Result<Self, ConstructionError> {
        self.class.create(deep_clone_fields(&self.as_dict(false)))
    }

    /// Reduces the error to its class and fields; see [`Registry::revive`].
    ///
    /// [`Registry::revive`]: crate::Registry::revive
    pub fn reduce(&self) -> Reduced {
        Reduced {
            namespace: self.class.namespace().map(str::to_owned),
            class: self.class.name().to_owned(),
            kwargs: self.as_dict(false),
        }
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.class.qualname(), join_kwargs(&self.as_dict(false)))
    }
}

impl Error for StructuredError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_deref().map(|c| c as &(dyn Error + 'static))
    }
}

#[cfg(feature = "serde")]
impl Serialize for StructuredError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.reduce().serialize(serializer)
    }
}
