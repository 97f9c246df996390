//! Error class declarations and their frozen field metadata.
//!
//! - [`ErrorClass`] / [`ErrorClassBuilder`]: declaring kinds of errors with a
//!   template, typed fields, defaults, constants and reraise rules.
//! - [`Store`] and the `check_*` functions: field bookkeeping and validation.
//! - [`Toggles`]: which checks a class enforces.
//! - [`Registry`]: namespace-scoped lookup of classes by name.

mod class;
mod factory;
mod registry;
mod store;
mod toggles;

pub use class::{Ancestors, ErrorClass, ErrorClassBuilder, Hint, MessageHook};
pub(crate) use class::Bound;
pub use factory::{Draft, Factory};
pub use registry::{Reduced, Registry};
pub use store::{
    check_kwarg_consts, check_missing_fields, check_non_named_fields, check_unannotated_fields,
    check_undeclared_fields, Store, TypeHint,
};
pub use toggles::Toggles;
