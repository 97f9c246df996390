use indexmap::IndexMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, UsageError};
use crate::schema::{ErrorClass, ErrorClassBuilder};
use crate::types::{Fields, StructuredError};

/// A structured error reduced to "class plus keyword fields".
///
/// Rebuilding is a plain construction call, so a revived instance is
/// equivalent to the original one, including its rendered message.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Reduced {
    pub namespace: Option<String>,
    pub class: String,
    pub kwargs: Fields,
}

/// Named error classes of one namespace.
///
/// Classes are kept in definition order, which is also the order in which
/// [`Registry::subclasses`] reports direct children.
///
/// # Examples
///
/// ```
/// use error_mold::{fields, Registry};
///
/// let mut registry = Registry::new("billing");
/// let base = registry.define(
///     error_mold::ErrorClass::builder("BillingError").template("billing failed"),
/// ).unwrap();
///
/// let err = base.create(fields! {}).unwrap();
/// let revived = registry.revive(&err.reduce()).unwrap();
/// assert_eq!(revived.class(), &base);
/// assert_eq!(revived.message(), "billing failed");
/// ```
#[derive(Debug, Default)]
pub struct Registry {
    namespace: String,
    classes: IndexMap<String, ErrorClass>,
}

impl Registry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self { namespace: namespace.into(), classes: IndexMap::new() }
    }

    #[inline]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Builds a class inside this namespace and registers it.
    ///
    /// A builder carrying another namespace is rejected.
    pub fn define(&mut self, builder: ErrorClassBuilder) -> Result<ErrorClass, DefinitionError> {
        if self.classes.contains_key(builder.name()) {
            return Err(self.duplicate(builder.name()));
        }
        self.check_namespace(builder.name(), builder.namespace_ref())?;
        let class = builder.namespace_or(&self.namespace).build()?;
        self.classes.insert(class.name().to_owned(), class.clone());
        Ok(class)
    }

    /// Registers a class that was built elsewhere.
    ///
    /// The class must be unscoped or scoped to this registry's namespace,
    /// otherwise its reductions could never be revived here.
    pub fn insert(&mut self, class: ErrorClass) -> Result<(), DefinitionError> {
        if self.classes.contains_key(class.name()) {
            return Err(self.duplicate(class.name()));
        }
        self.check_namespace(class.name(), class.namespace())?;
        self.classes.insert(class.name().to_owned(), class);
        Ok(())
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&ErrorClass> {
        self.classes.get(name)
    }

    /// Like [`get`](Registry::get), failing with [`DefinitionError::UnknownClass`].
    pub fn resolve(&self, name: &str) -> Result<&ErrorClass, DefinitionError> {
        self.get(name).ok_or_else(|| DefinitionError::UnknownClass {
            namespace: self.namespace.clone(),
            name: name.to_owned(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ErrorClass> {
        self.classes.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Registered classes whose direct parent is `class`.
    pub fn subclasses(&self, class: &ErrorClass) -> Vec<ErrorClass> {
        self.classes.values().filter(|c| c.parent() == Some(class)).cloned().collect()
    }

    /// Rebuilds an instance from its reduction.
    pub fn revive(&self, reduced: &Reduced) -> Result<StructuredError, UsageError> {
        if let Some(ns) = &reduced.namespace {
            if ns != &self.namespace {
                return Err(DefinitionError::UnknownClass {
                    namespace: ns.clone(),
                    name: reduced.class.clone(),
                }
                .into());
            }
        }
        let class = self.resolve(&reduced.class)?;
        Ok(class.create(reduced.kwargs.clone())?)
    }

    fn check_namespace(&self, name: &str, found: Option<&str>) -> Result<(), DefinitionError> {
        match found {
            Some(found) if found != self.namespace => Err(DefinitionError::ForeignNamespace {
                namespace: self.namespace.clone(),
                name: name.to_owned(),
                found: found.to_owned(),
            }),
            _ => Ok(()),
        }
    }

    fn duplicate(&self, name: &str) -> DefinitionError {
        DefinitionError::DuplicateClass { namespace: self.namespace.clone(), name: name.to_owned() }
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a ErrorClass;
    type IntoIter = indexmap::map::Values<'a, String, ErrorClass>;

    fn into_iter(self) -> Self::IntoIter {
        self.classes.values()
    }
}
