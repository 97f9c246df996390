use core::any::type_name;
use core::fmt;
use std::error::Error;
use std::sync::Arc;

use crate::error::{ConstructionError, DefinitionError, TemplateError, UsageError};
use crate::schema::ErrorClass;
use crate::types::StructuredError;

type DynError = dyn Error + Send + Sync + 'static;

/// Any error that was not built from an [`ErrorClass`].
///
/// The wrapped value is shared, so cloning a `ForeignError` is cheap and
/// keeps downcasting intact.
#[derive(Clone)]
pub struct ForeignError {
    type_name: &'static str,
    inner: Arc<DynError>,
    context: Option<Box<Raised>>,
}

impl ForeignError {
    pub fn new<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self { type_name: short_type_name(type_name::<E>()), inner: Arc::new(error), context: None }
    }

    /// Wraps an already boxed error; its concrete type name is unknown.
    pub fn from_boxed(error: Box<DynError>) -> Self {
        Self { type_name: "Error", inner: Arc::from(error), context: None }
    }

    /// Short name of the wrapped type, e.g. `ParseIntError`.
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline]
    pub fn get_ref(&self) -> &DynError {
        &*self.inner
    }

    #[inline]
    pub fn is<E: Error + 'static>(&self) -> bool {
        self.inner.is::<E>()
    }

    #[inline]
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// The error that was being handled when this one occurred.
    ///
    /// Context is not a cause: it is not reported by `source()`.
    #[inline]
    pub fn context(&self) -> Option<&Raised> {
        self.context.as_deref()
    }

    pub fn with_context(mut self, context: Raised) -> Self {
        self.context = Some(Box::new(context));
        self
    }
}

impl fmt::Display for ForeignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl fmt::Debug for ForeignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl Error for ForeignError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.inner.source()
    }
}

/// An error escaping a guarded region: structured or foreign.
///
/// This is the error type of every reraise entry point. Anything
/// implementing [`Error`] converts into it through [`Raised::foreign`];
/// common standard library errors and the toolkit's own errors convert
/// with `?` directly.
#[derive(Clone)]
pub enum Raised {
    Structured(StructuredError),
    Foreign(ForeignError),
}

impl Raised {
    #[inline]
    pub fn foreign<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::Foreign(ForeignError::new(error))
    }

    /// Class name for structured errors, short type name otherwise.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Structured(e) => e.class().name(),
            Self::Foreign(e) => e.type_name(),
        }
    }

    #[inline]
    pub fn as_structured(&self) -> Option<&StructuredError> {
        match self {
            Self::Structured(e) => Some(e),
            Self::Foreign(_) => None,
        }
    }

    pub fn into_structured(self) -> Result<StructuredError, Self> {
        match self {
            Self::Structured(e) => Ok(e),
            other => Err(other),
        }
    }

    #[inline]
    pub fn as_foreign(&self) -> Option<&ForeignError> {
        match self {
            Self::Foreign(e) => Some(e),
            Self::Structured(_) => None,
        }
    }

    /// Downcasts a foreign error to its concrete type.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.as_foreign().and_then(ForeignError::downcast_ref)
    }

    /// True for structured errors of `class` or one of its subclasses.
    pub fn is_instance_of(&self, class: &ErrorClass) -> bool {
        self.as_structured().is_some_and(|e| e.class().is_subclass_of(class))
    }

    /// Structured errors of a fatal class are never remapped.
    pub fn is_fatal(&self) -> bool {
        self.as_structured().is_some_and(|e| e.class().is_fatal())
    }
}

impl fmt::Display for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(e) => fmt::Display::fmt(e, f),
            Self::Foreign(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl fmt::Debug for Raised {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(e) => fmt::Debug::fmt(e, f),
            Self::Foreign(e) => fmt::Debug::fmt(e, f),
        }
    }
}

impl Error for Raised {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Structured(e) => e.source(),
            Self::Foreign(e) => e.source(),
        }
    }
}

impl From<StructuredError> for Raised {
    #[inline]
    fn from(error: StructuredError) -> Self {
        Self::Structured(error)
    }
}

impl From<ForeignError> for Raised {
    #[inline]
    fn from(error: ForeignError) -> Self {
        Self::Foreign(error)
    }
}

impl From<Box<DynError>> for Raised {
    #[inline]
    fn from(error: Box<DynError>) -> Self {
        Self::Foreign(ForeignError::from_boxed(error))
    }
}

crate::impl_raised!(
    ConstructionError,
    DefinitionError,
    TemplateError,
    UsageError,
    std::io::Error,
    std::fmt::Error,
    std::num::ParseIntError,
    std::num::ParseFloatError,
    std::num::TryFromIntError,
    std::str::Utf8Error,
    std::string::FromUtf8Error,
);

/// `core::num::error::ParseIntError` -> `ParseIntError`.
fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
