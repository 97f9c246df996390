//! Ergonomic macros for building keyword fields and bridging foreign errors.
//!
//! - [`macro@crate::fields`] - Builds an insertion-ordered [`Fields`](crate::types::Fields)
//!   map from `name: value` pairs, the Rust spelling of `**kwargs`.
//! - [`macro@crate::impl_raised`] - Lets a user-defined error type flow into a
//!   guarded region with `?` by implementing `From<T> for Raised`.
//!
//! # Examples
//!
//! ```
//! use error_mold::{fields, Value};
//!
//! let kwargs = fields! { name: "John", age: 42 };
//! assert_eq!(kwargs["name"], Value::from("John"));
//! assert_eq!(kwargs.get_index(1).map(|(k, _)| k.as_str()), Some("age"));
//! ```

/// Builds a [`Fields`](crate::types::Fields) map from `name: value` pairs.
///
/// Keys are identifiers (use string literals for names that are not valid
/// identifiers); values are anything convertible into [`Value`](crate::types::Value).
///
/// # Examples
///
/// ```
/// use error_mold::fields;
///
/// let empty = fields! {};
/// assert!(empty.is_empty());
///
/// let kwargs = fields! { name: "John", "first-name": "J", box_: vec![1, 2] };
/// assert_eq!(kwargs.len(), 3);
/// assert!(kwargs.contains_key("first-name"));
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::types::Fields::new()
    };
    ($($key:tt : $value:expr),+ $(,)?) => {{
        let mut fields = $crate::types::Fields::new();
        $(
            fields.insert(
                $crate::__field_key!($key).to_owned(),
                $crate::types::Value::from($value),
            );
        )+
        fields
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_key {
    ($key:ident) => {
        stringify!($key)
    };
    ($key:literal) => {
        $key
    };
}

/// Implements `From<T> for Raised` for a custom error type.
///
/// The value is wrapped as a foreign error, so it can be returned with `?`
/// from a region guarded by [`ErrorClass::reraise`](crate::ErrorClass::reraise).
///
/// # Examples
///
/// ```
/// use error_mold::{impl_raised, Raised};
/// use std::fmt;
///
/// #[derive(Debug)]
/// struct DiskFull;
///
/// impl fmt::Display for DiskFull {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         f.write_str("disk full")
///     }
/// }
///
/// impl std::error::Error for DiskFull {}
///
/// impl_raised!(DiskFull);
///
/// let raised: Raised = DiskFull.into();
/// assert_eq!(raised.to_string(), "disk full");
/// ```
#[macro_export]
macro_rules! impl_raised {
    ($($type:ty),+ $(,)?) => {
        $(
            impl ::core::convert::From<$type> for $crate::Raised {
                fn from(error: $type) -> Self {
                    $crate::Raised::foreign(error)
                }
            }
        )+
    };
}
