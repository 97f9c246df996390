//! Frozen per-class field metadata and the checks run against it.

use core::fmt;
use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};

use crate::error::{ConstructionError, DefinitionError, FieldNames};
use crate::types::Value;

/// Declared type of a field, recorded as the Rust type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeHint(&'static str);

impl TypeHint {
    #[inline]
    pub fn of<T: ?Sized>() -> Self {
        Self(core::any::type_name::<T>())
    }

    #[inline]
    pub const fn named(name: &'static str) -> Self {
        Self(name)
    }

    #[inline]
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Field metadata computed once when an error class is built.
///
/// `registered` is the union of template fields and instance hints: every
/// name an instance of the class recognises.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    fields: BTreeSet<String>,
    const_hints: IndexMap<String, TypeHint>,
    inst_hints: IndexMap<String, TypeHint>,
    consts: IndexMap<String, Value>,
    defaults: IndexSet<String>,
    registered: BTreeSet<String>,
}

impl Store {
    pub fn new(
        fields: BTreeSet<String>,
        const_hints: IndexMap<String, TypeHint>,
        inst_hints: IndexMap<String, TypeHint>,
        consts: IndexMap<String, Value>,
        defaults: IndexSet<String>,
    ) -> Self {
        let registered = fields.iter().chain(inst_hints.keys()).cloned().collect();
        Self { fields, const_hints, inst_hints, consts, defaults, registered }
    }

    /// Names referenced by the template.
    #[inline]
    pub fn fields(&self) -> &BTreeSet<String> {
        &self.fields
    }

    #[inline]
    pub fn const_hints(&self) -> &IndexMap<String, TypeHint> {
        &self.const_hints
    }

    #[inline]
    pub fn inst_hints(&self) -> &IndexMap<String, TypeHint> {
        &self.inst_hints
    }

    #[inline]
    pub fn consts(&self) -> &IndexMap<String, Value> {
        &self.consts
    }

    /// Instance fields carrying a static default or a factory.
    #[inline]
    pub fn defaults(&self) -> &IndexSet<String> {
        &self.defaults
    }

    #[inline]
    pub fn registered(&self) -> &BTreeSet<String> {
        &self.registered
    }
}

/// Registered fields must be supplied, defaulted or constant.
pub fn check_missing_fields(store: &Store, kws: &BTreeSet<&str>) -> Result<(), ConstructionError> {
    let missing: Vec<&String> = store
        .registered
        .iter()
        .filter(|name| {
            !store.defaults.contains(*name)
                && !store.consts.contains_key(*name)
                && !kws.contains(name.as_str())
        })
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ConstructionError::MissingFields(FieldNames::new(missing.into_iter().cloned())))
}

/// Supplied fields must be registered or declared as constants.
pub fn check_undeclared_fields(
    store: &Store,
    kws: &BTreeSet<&str>,
) -> Result<(), ConstructionError> {
    let undeclared: Vec<&str> = kws
        .iter()
        .copied()
        .filter(|name| !store.registered.contains(*name) && !store.const_hints.contains_key(*name))
        .collect();
    if undeclared.is_empty() {
        return Ok(());
    }
    Err(ConstructionError::UndeclaredFields(FieldNames::new(undeclared)))
}

/// Constants belong to the class and may not be supplied per instance.
pub fn check_kwarg_consts(store: &Store, kws: &BTreeSet<&str>) -> Result<(), ConstructionError> {
    let consts: Vec<&str> =
        kws.iter().copied().filter(|name| store.const_hints.contains_key(*name)).collect();
    if consts.is_empty() {
        return Ok(());
    }
    Err(ConstructionError::ConstsInKwargs(FieldNames::new(consts)))
}

/// Template fields must have a non-empty, non-numeric name.
pub fn check_non_named_fields(store: &Store) -> Result<(), DefinitionError> {
    for field in &store.fields {
        if field.is_empty() {
            return Err(DefinitionError::EmptyFieldName);
        }
        if field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DefinitionError::DigitFieldName(field.clone()));
        }
    }
    Ok(())
}

/// Template fields must be declared as instance fields or constants.
pub fn check_unannotated_fields(store: &Store) -> Result<(), DefinitionError> {
    let unannotated: Vec<&String> = store
        .fields
        .iter()
        .filter(|name| {
            !store.inst_hints.contains_key(*name) && !store.const_hints.contains_key(*name)
        })
        .collect();
    if unannotated.is_empty() {
        return Ok(());
    }
    Err(DefinitionError::UnannotatedFields(FieldNames::new(unannotated.into_iter().cloned())))
}
