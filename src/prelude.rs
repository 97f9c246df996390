//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use error_mold::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - **Macros**: [`fields!`], [`impl_raised!`]
//! - **Types**: [`ErrorClass`], [`StructuredError`], [`Raised`], [`Value`], [`Fields`]
//! - **Rules**: [`catch`], [`skip`], [`Matcher`], [`Action`], [`Reraising`], [`Chain`]
//! - **Traits**: [`ResultReraiseExt`], plus `FutureReraiseExt` with the `async` feature
//!
//! # Examples
//!
//! ```
//! use error_mold::prelude::*;
//!
//! let class = ErrorClass::builder("InputError")
//!     .template("bad input: {raw!r}")
//!     .field::<String>("raw")
//!     .build()
//!     .unwrap();
//!
//! fn parse(class: &ErrorClass, raw: &str) -> Result<u16, Raised> {
//!     match raw.parse::<u16>() {
//!         Ok(port) => Ok(port),
//!         Err(_) => Err(class.create(fields! { raw: raw })?.into()),
//!     }
//! }
//!
//! assert_eq!(parse(&class, "70000").unwrap_err().to_string(), "bad input: \"70000\"");
//! ```

pub use crate::reraise::{catch, skip, Action, Chain, MatchSet, Matcher, RemapOptions, Reraising};
pub use crate::traits::ResultReraiseExt;
pub use crate::types::{Fields, Raised, StructuredError, Value};
pub use crate::{fields, impl_raised, ErrorClass, Registry, Toggles};

#[cfg(feature = "async")]
pub use crate::async_ext::FutureReraiseExt;
