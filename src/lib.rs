//! Declarative structured errors with rule-based remapping.
//!
//! An [`ErrorClass`] declares a kind of error once: a message template,
//! typed fields, defaults and constants. Instances are built from keyword
//! fields, validated against the declaration and rendered eagerly. Each
//! class can also carry reraise rules deciding how errors escaping a guarded
//! region are translated into the class's own hierarchy.
//!
//! Each submodule re-exports its public surface from here, so consumers can
//! simply depend on `error_mold::*` or pick focused pieces as needed.
//!
//! # Examples
//!
//! ## Declaring and Building an Error
//!
//! ```
//! use error_mold::{fields, ErrorClass};
//!
//! let age_error = ErrorClass::builder("AgeError")
//!     .template("The {name} is {age} years old")
//!     .field::<String>("name")
//!     .field::<i64>("age")
//!     .build()
//!     .unwrap();
//!
//! let err = age_error.create(fields! { name: "John", age: 42 }).unwrap();
//! assert_eq!(err.to_string(), "The John is 42 years old");
//! assert_eq!(err.as_str(), "AgeError: The John is 42 years old");
//! ```
//!
//! ## Validation
//!
//! ```
//! use error_mold::{fields, ErrorClass};
//!
//! let class = ErrorClass::builder("AgeError")
//!     .template("The {name} is {age} years old")
//!     .field::<String>("name")
//!     .field::<i64>("age")
//!     .build()
//!     .unwrap();
//!
//! let err = class.create(fields! { name: "John", height: 180 }).unwrap_err();
//! assert_eq!(err.to_string(), "Missing arguments: 'age'");
//! ```
//!
//! ## Remapping
//!
//! ```
//! use error_mold::reraise::{catch, skip, Matcher};
//! use error_mold::{ErrorClass, Raised, Reraising};
//!
//! let storage = ErrorClass::builder("StorageError")
//!     .template("storage unavailable")
//!     .reraising(
//!         Reraising::from(skip(Matcher::foreign::<std::fmt::Error>()))
//!             .then(catch(Matcher::foreign::<std::io::Error>())),
//!     )
//!     .build()
//!     .unwrap();
//!
//! let err = storage.reraise(|| Err::<(), _>(std::io::Error::other("disk"))).unwrap_err();
//! assert!(err.is_instance_of(&storage));
//! assert_eq!(err.as_structured().unwrap().cause().unwrap().to_string(), "disk");
//!
//! let err = storage.reraise(|| Err::<(), _>(std::fmt::Error)).unwrap_err();
//! assert!(err.downcast_ref::<std::fmt::Error>().is_some());
//! ```

/// Toolkit errors raised on misuse
pub mod error;
/// Keyword-field and bridging macros
pub mod macros;
/// Convenience re-exports for quick starts
pub mod prelude;
/// Remap rules, compilation and the reraise engine
pub mod reraise;
/// Error class declarations and field metadata
pub mod schema;
/// Message template parsing and rendering
pub mod template;
/// Cause iteration, dumping and suppression helpers
pub mod tools;
/// Extension traits for `Result`
pub mod traits;
/// Structured and foreign error values
pub mod types;

/// Async extensions for remapping (requires `async` feature)
#[cfg(feature = "async")]
pub mod async_ext;

/// Tower integration - Layer and Service implementations (requires `tower` feature)
#[cfg(feature = "tower")]
pub mod tower;

pub use error::{ConstructionError, DefinitionError, TemplateError, UsageError, UsageKind};
pub use reraise::{Chain, RemapOptions, Reraising};
pub use schema::{ErrorClass, ErrorClassBuilder, Factory, Registry, Store, Toggles};
pub use traits::ResultReraiseExt;
pub use types::{Fields, ForeignError, Raised, SharedValue, StructuredError, Value};
