use core::fmt;
use core::hash::{Hash, Hasher};
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

use indexmap::{IndexMap, IndexSet};

use crate::error::{ConstructionError, DefinitionError};
use crate::reraise::compile::{compile, CompiledRules};
use crate::reraise::{RemapFn, RemapResult, Reraising};
use crate::schema::factory::Factory;
use crate::schema::store::{check_non_named_fields, check_unannotated_fields, Store, TypeHint};
use crate::schema::Toggles;
use crate::template::iter_fields;
use crate::types::{Fields, Raised, StructuredError, Value};

/// Names reserved for class machinery; never collected as field hints.
const RESERVED: [&str; 4] = ["__template__", "__toggles__", "__features__", "__reraising__"];

const ROOT_NAME: &str = "Error";
const ROOT_TEMPLATE: &str = "Unspecified error";

/// Rewrites a freshly rendered message: `(store, kwargs, message) -> message`.
pub type MessageHook = Arc<dyn Fn(&Store, &Fields, String) -> String + Send + Sync>;

/// Declared kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    /// Per-instance field, supplied at construction or defaulted.
    Instance(TypeHint),
    /// Class-level constant, never supplied at construction.
    Constant(TypeHint),
}

impl Hint {
    #[inline]
    pub fn type_hint(&self) -> TypeHint {
        match self {
            Self::Instance(t) | Self::Constant(t) => *t,
        }
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }
}

/// A value bound on the class: a static default or constant, or a factory.
#[derive(Debug, Clone)]
pub(crate) enum Bound {
    Static(Value),
    Factory(Factory),
}

struct ClassInner {
    name: String,
    namespace: Option<String>,
    parent: Option<ErrorClass>,
    template: String,
    toggles: Toggles,
    hints: IndexMap<String, Hint>,
    bound: IndexMap<String, Bound>,
    store: Store,
    rules: CompiledRules,
    fatal: bool,
    methods: IndexMap<String, RemapFn>,
    message_hook: Option<MessageHook>,
}

static ROOT: LazyLock<ErrorClass> = LazyLock::new(|| {
    ErrorClass(Arc::new(ClassInner {
        name: ROOT_NAME.to_owned(),
        namespace: None,
        parent: None,
        template: ROOT_TEMPLATE.to_owned(),
        toggles: Toggles::DEFAULT,
        hints: IndexMap::new(),
        bound: IndexMap::new(),
        store: Store::default(),
        rules: CompiledRules::Never,
        fatal: false,
        methods: IndexMap::new(),
        message_hook: None,
    }))
});

/// A declared kind of structured error.
///
/// An `ErrorClass` is a cheap, clonable handle. Two handles are equal only
/// when they refer to the same declaration; subclassing is expressed with
/// [`ErrorClassBuilder::extends`] and checked with [`is_subclass_of`].
///
/// Every class descends from [`ErrorClass::root`].
///
/// [`is_subclass_of`]: ErrorClass::is_subclass_of
///
/// # Examples
///
/// ```
/// use error_mold::{fields, ErrorClass};
///
/// let age_error = ErrorClass::builder("AgeError")
///     .template("The {name} is {age} years old")
///     .field::<String>("name")
///     .field::<i64>("age")
///     .build()
///     .unwrap();
///
/// let err = age_error.create(fields! { name: "John", age: 42 }).unwrap();
/// assert_eq!(err.to_string(), "The John is 42 years old");
/// assert!(age_error.is_subclass_of(&ErrorClass::root()));
/// ```
#[derive(Clone)]
pub struct ErrorClass(Arc<ClassInner>);

impl ErrorClass {
    #[inline]
    pub fn builder(name: impl Into<String>) -> ErrorClassBuilder {
        ErrorClassBuilder::new(name)
    }

    /// The base of every hierarchy: template `"Unspecified error"`, default toggles.
    pub fn root() -> Self {
        ROOT.clone()
    }

    /// Builds an instance from keyword fields.
    #[inline]
    pub fn create(&self, kwargs: Fields) -> Result<StructuredError, ConstructionError> {
        StructuredError::construct(self.clone(), kwargs)
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[inline]
    pub fn namespace(&self) -> Option<&str> {
        self.0.namespace.as_deref()
    }

    /// `namespace::Name`, or the bare name outside a namespace.
    pub fn qualname(&self) -> String {
        match &self.0.namespace {
            Some(ns) => format!("{ns}::{}", self.0.name),
            None => self.0.name.clone(),
        }
    }

    #[inline]
    pub fn parent(&self) -> Option<&ErrorClass> {
        self.0.parent.as_ref()
    }

    #[inline]
    pub fn template(&self) -> &str {
        &self.0.template
    }

    #[inline]
    pub fn toggles(&self) -> Toggles {
        self.0.toggles
    }

    #[inline]
    pub fn store(&self) -> &Store {
        &self.0.store
    }

    /// Effective hints, own declarations overriding inherited ones.
    #[inline]
    pub fn hints(&self) -> &IndexMap<String, Hint> {
        &self.0.hints
    }

    /// Whether this class was itself declared fatal.
    #[inline]
    pub fn is_fatal(&self) -> bool {
        self.0.fatal
    }

    /// Iterates over this class and then its ancestors up to the root.
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors { next: Some(self) }
    }

    /// True when `other` is this class or one of its ancestors.
    pub fn is_subclass_of(&self, other: &ErrorClass) -> bool {
        self.ancestors().any(|class| class == other)
    }

    /// Finds a remap method by name, searching ancestors as well.
    pub fn method(&self, name: &str) -> Option<&RemapFn> {
        self.ancestors().find_map(|class| class.0.methods.get(name))
    }

    pub fn message_hook(&self) -> Option<&MessageHook> {
        self.ancestors().find_map(|class| class.0.message_hook.as_ref())
    }

    pub(crate) fn bound(&self, name: &str) -> Option<&Bound> {
        self.0.bound.get(name)
    }

    pub(crate) fn rules(&self) -> &CompiledRules {
        &self.0.rules
    }
}

impl PartialEq for ErrorClass {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ErrorClass {}

impl Hash for ErrorClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Debug for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<class '{}'>", self.qualname())
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.name)
    }
}

/// Iterator returned by [`ErrorClass::ancestors`].
pub struct Ancestors<'a> {
    next: Option<&'a ErrorClass>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a ErrorClass;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

/// Declares an [`ErrorClass`].
///
/// Everything not declared is inherited from the parent class (the root by
/// default): template, toggles, hints, defaults, constants, methods and the
/// message hook. Reraise rules are never inherited.
#[must_use]
pub struct ErrorClassBuilder {
    name: String,
    namespace: Option<String>,
    parent: Option<ErrorClass>,
    template: Option<String>,
    toggles: Option<Toggles>,
    hints: Vec<(String, Hint)>,
    bound: Vec<(String, Bound)>,
    reraising: Reraising,
    fatal: bool,
    methods: IndexMap<String, RemapFn>,
    message_hook: Option<MessageHook>,
}

impl ErrorClassBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: None,
            parent: None,
            template: None,
            toggles: None,
            hints: Vec::new(),
            bound: Vec::new(),
            reraising: Reraising::Never,
            fatal: false,
            methods: IndexMap::new(),
            message_hook: None,
        }
    }

    pub fn extends(mut self, parent: &ErrorClass) -> Self {
        self.parent = Some(parent.clone());
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn template(mut self, template: impl Into<String>) -> Self {
        self.template = Some(template.into());
        self
    }

    pub fn toggles(mut self, toggles: Toggles) -> Self {
        self.toggles = Some(toggles);
        self
    }

    /// Declares a required instance field of type `T`.
    pub fn field<T: ?Sized>(mut self, name: impl Into<String>) -> Self {
        self.hints.push((name.into(), Hint::Instance(TypeHint::of::<T>())));
        self
    }

    /// Declares an instance field with a static default.
    pub fn field_default<V: Into<Value>>(mut self, name: impl Into<String>, value: V) -> Self {
        let name = name.into();
        self.hints.push((name.clone(), Hint::Instance(TypeHint::of::<V>())));
        self.bound.push((name, Bound::Static(value.into())));
        self
    }

    /// Declares an instance field whose default is produced per instance.
    pub fn field_factory<T: ?Sized>(mut self, name: impl Into<String>, factory: Factory) -> Self {
        let name = name.into();
        self.hints.push((name.clone(), Hint::Instance(TypeHint::of::<T>())));
        self.bound.push((name, Bound::Factory(factory)));
        self
    }

    /// Declares a class constant with its value.
    pub fn constant<V: Into<Value>>(mut self, name: impl Into<String>, value: V) -> Self {
        let name = name.into();
        self.hints.push((name.clone(), Hint::Constant(TypeHint::of::<V>())));
        self.bound.push((name, Bound::Static(value.into())));
        self
    }

    /// Declares a class constant without binding a value.
    pub fn constant_hint<T: ?Sized>(mut self, name: impl Into<String>) -> Self {
        self.hints.push((name.into(), Hint::Constant(TypeHint::of::<T>())));
        self
    }

    /// Binds a value to a name without redeclaring its hint.
    ///
    /// Typically used to give an inherited field a default or an inherited
    /// constant a new value.
    pub fn set<V: Into<Value>>(mut self, name: impl Into<String>, value: V) -> Self {
        self.bound.push((name.into(), Bound::Static(value.into())));
        self
    }

    pub fn reraising(mut self, reraising: impl Into<Reraising>) -> Self {
        self.reraising = reraising.into();
        self
    }

    /// Marks the class fatal: its instances are never remapped.
    pub fn fatal(mut self) -> Self {
        self.fatal = true;
        self
    }

    /// Registers a remap method usable as `Action::Method(name)`.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&ErrorClass, &Raised, &Fields) -> RemapResult + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    pub fn message_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Store, &Fields, String) -> String + Send + Sync + 'static,
    {
        self.message_hook = Some(Arc::new(hook));
        self
    }

    pub(crate) fn namespace_or(mut self, namespace: &str) -> Self {
        if self.namespace.is_none() {
            self.namespace = Some(namespace.to_owned());
        }
        self
    }

    #[inline]
    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub(crate) fn namespace_ref(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Freezes the declaration, running definition-time checks.
    pub fn build(self) -> Result<ErrorClass, DefinitionError> {
        let parent = self.parent.unwrap_or_else(ErrorClass::root);
        if !self.fatal && parent.ancestors().any(ErrorClass::is_fatal) {
            return Err(DefinitionError::IndirectFatal(self.name));
        }

        let template = self.template.unwrap_or_else(|| parent.template().to_owned());
        let toggles = self.toggles.unwrap_or_else(|| parent.toggles());

        let mut hints = parent.0.hints.clone();
        for (name, hint) in self.hints {
            if !RESERVED.contains(&name.as_str()) {
                hints.insert(name, hint);
            }
        }
        let mut bound = parent.0.bound.clone();
        bound.extend(self.bound);

        let store = build_store(&template, &hints, &bound);
        if toggles.contains(Toggles::FORBID_NON_NAMED_FIELDS) {
            check_non_named_fields(&store)?;
        }
        if toggles.contains(Toggles::FORBID_UNANNOTATED_FIELDS) {
            check_unannotated_fields(&store)?;
        }

        let methods = self.methods;
        let rules = compile(&self.name, &self.reraising, |name| {
            methods.contains_key(name) || parent.method(name).is_some()
        })?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            class = %self.name,
            parent = %parent.name(),
            fields = ?store.fields(),
            fatal = self.fatal,
            "error class defined"
        );

        Ok(ErrorClass(Arc::new(ClassInner {
            name: self.name,
            namespace: self.namespace,
            parent: Some(parent),
            template,
            toggles,
            hints,
            bound,
            store,
            rules,
            fatal: self.fatal,
            methods,
            message_hook: self.message_hook,
        })))
    }
}

impl fmt::Debug for ErrorClassBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorClassBuilder")
            .field("name", &self.name)
            .field("namespace", &self.namespace)
            .field("parent", &self.parent)
            .field("template", &self.template)
            .field("fatal", &self.fatal)
            .finish_non_exhaustive()
    }
}

fn build_store(
    template: &str,
    hints: &IndexMap<String, Hint>,
    bound: &IndexMap<String, Bound>,
) -> Store {
    let fields: BTreeSet<String> = iter_fields(template).iter().map(|f| f.key()).collect();

    let mut const_hints = IndexMap::new();
    let mut inst_hints = IndexMap::new();
    for (name, hint) in hints {
        match hint {
            Hint::Constant(t) => const_hints.insert(name.clone(), *t),
            Hint::Instance(t) => inst_hints.insert(name.clone(), *t),
        };
    }

    let consts = const_hints
        .keys()
        .filter_map(|name| match bound.get(name) {
            Some(Bound::Static(value)) => Some((name.clone(), value.clone())),
            _ => None,
        })
        .collect();
    let defaults: IndexSet<String> =
        inst_hints.keys().filter(|name| bound.contains_key(*name)).cloned().collect();

    Store::new(fields, const_hints, inst_hints, consts, defaults)
}
