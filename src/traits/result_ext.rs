//! Extension trait for remapping errors of `Result` values.
//!
//! # Examples
//!
//! ```
//! use error_mold::traits::ResultReraiseExt;
//! use error_mold::ErrorClass;
//!
//! let class = ErrorClass::builder("LoadError")
//!     .template("could not load")
//!     .reraising(true)
//!     .build()
//!     .unwrap();
//!
//! let res = std::fs::read_to_string("/definitely/missing.toml").reraise_as(&class);
//! assert_eq!(res.unwrap_err().to_string(), "could not load");
//! ```

use crate::reraise::RemapOptions;
use crate::schema::ErrorClass;
use crate::types::Raised;

/// Applies an [`ErrorClass`]'s remap to the error of a `Result`.
///
/// Equivalent to running the code that produced the result inside
/// [`ErrorClass::reraise`], without a closure.
pub trait ResultReraiseExt<T, E> {
    /// Remaps the error with the class's own rules.
    fn reraise_as(self, class: &ErrorClass) -> Result<T, Raised>;

    /// Remaps the error with per-call options.
    fn reraise_as_with(self, class: &ErrorClass, options: &RemapOptions) -> Result<T, Raised>;
}

impl<T, E: Into<Raised>> ResultReraiseExt<T, E> for Result<T, E> {
    #[inline]
    fn reraise_as(self, class: &ErrorClass) -> Result<T, Raised> {
        class.reraise(|| self)
    }

    #[inline]
    fn reraise_as_with(self, class: &ErrorClass, options: &RemapOptions) -> Result<T, Raised> {
        class.reraise_with(options, || self)
    }
}
