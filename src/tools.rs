//! Helpers around errors: cause iteration, dumping and suppression.
//!
//! # Examples
//!
//! ```
//! use error_mold::{fields, tools, ErrorClass, Raised};
//!
//! let class = ErrorClass::builder("Outer").template("outer failed").build().unwrap();
//! let err = class
//!     .create(fields! {})
//!     .unwrap()
//!     .with_cause(Raised::foreign(std::io::Error::other("disk")));
//!
//! let reasons: Vec<String> = tools::iterate_causes(&err, true).map(|e| e.to_string()).collect();
//! assert_eq!(reasons, ["outer failed", "disk"]);
//!
//! let dumped = tools::dump(&err);
//! assert_eq!(dumped.r#type, "Outer");
//! assert_eq!(dumped.reason, "outer failed");
//! ```

use std::error::Error;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::reraise::MatchSet;
use crate::types::{Fields, ForeignError, Raised, StructuredError};

/// Iterator over an error and the errors it was caused by.
#[derive(Clone)]
pub struct Causes<'a> {
    next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Iterator for Causes<'a> {
    type Item = &'a (dyn Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

/// Walks the `source()` chain of `error`, optionally starting with `error` itself.
pub fn iterate_causes<'a>(error: &'a (dyn Error + 'static), include_self: bool) -> Causes<'a> {
    let next = if include_self { Some(error) } else { error.source() };
    Causes { next }
}

/// The whole chain, `error` first.
#[inline]
pub fn error_chain<'a>(error: &'a (dyn Error + 'static)) -> Causes<'a> {
    iterate_causes(error, true)
}

/// Plain-data representation of an error.
///
/// `fields` is present only for structured errors and includes constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ErrorDump {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub r#type: String,
    pub reason: String,
    pub fields: Option<Fields>,
    pub details: Fields,
}

pub fn dump(error: &(dyn Error + 'static)) -> ErrorDump {
    let structured = |e: &StructuredError| ErrorDump {
        r#type: e.class().name().to_owned(),
        reason: e.to_string(),
        fields: Some(e.as_dict(true)),
        details: Fields::new(),
    };
    if let Some(e) = error.downcast_ref::<StructuredError>() {
        return structured(e);
    }
    if let Some(Raised::Structured(e)) = error.downcast_ref::<Raised>() {
        return structured(e);
    }
    let r#type = if let Some(raised) = error.downcast_ref::<Raised>() {
        raised.type_name().to_owned()
    } else if let Some(foreign) = error.downcast_ref::<ForeignError>() {
        foreign.type_name().to_owned()
    } else {
        "Error".to_owned()
    };
    ErrorDump { r#type, reason: error.to_string(), fields: None, details: Fields::new() }
}

pub fn dump_all<'a, I>(errors: I) -> Vec<ErrorDump>
where
    I: IntoIterator<Item = &'a (dyn Error + 'static)>,
{
    errors.into_iter().map(dump).collect()
}

/// Runs `body`, swallowing errors that match `matches` but not `exclude`.
///
/// An empty `matches` set matches everything. Swallowed errors are logged
/// and turn the result into `Ok(None)`.
///
/// # Examples
///
/// ```
/// use error_mold::reraise::{MatchSet, Matcher};
/// use error_mold::tools::suppress;
///
/// let res = suppress(Matcher::foreign::<std::num::ParseIntError>(), None, || "x".parse::<i32>());
/// assert!(matches!(res, Ok(None)));
///
/// let res = suppress(MatchSet::new(), None, || "7".parse::<i32>());
/// assert!(matches!(res, Ok(Some(7))));
/// ```
pub fn suppress<T, E, F>(
    matches: impl Into<MatchSet>,
    exclude: Option<MatchSet>,
    body: F,
) -> Result<Option<T>, Raised>
where
    F: FnOnce() -> Result<T, E>,
    E: Into<Raised>,
{
    let matches = matches.into();
    match body() {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            let err = err.into();
            let targeted = matches.is_empty() || matches.matches(&err);
            let excluded = exclude.as_ref().is_some_and(|ex| ex.matches(&err));
            if !targeted || excluded {
                return Err(err);
            }
            #[cfg(feature = "tracing")]
            tracing::error!("Error suppressed: {err}");
            Ok(None)
        },
    }
}
