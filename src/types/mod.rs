//! Runtime error values.
//!
//! - [`StructuredError`]: an instance of an [`ErrorClass`](crate::ErrorClass).
//! - [`Raised`]: what escapes a guarded region, structured or foreign.
//! - [`Value`] / [`Fields`]: dynamically typed keyword fields.
//!
//! # Examples
//!
//! ```
//! use error_mold::{fields, ErrorClass, Raised};
//!
//! let class = ErrorClass::builder("Timeout")
//!     .template("timed out after {secs}s")
//!     .field::<u32>("secs")
//!     .build()
//!     .unwrap();
//!
//! let raised: Raised = class.create(fields! { secs: 30 }).unwrap().into();
//! assert!(raised.is_instance_of(&class));
//! assert_eq!(raised.to_string(), "timed out after 30s");
//! ```

mod raised;
mod structured_error;
mod value;

pub use raised::{ForeignError, Raised};
pub use structured_error::StructuredError;
pub(crate) use value::float_repr;
pub use value::{deep_clone_fields, join_kwargs, Fields, SharedValue, Value};
