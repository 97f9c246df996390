//! Remapping errors that escape a guarded region.
//!
//! A class's [`Reraising`] policy decides what happens to an error: propagate
//! it unchanged or replace it with a structured error whose cause is the
//! original. Rules are checked in order and the first match decides, so a
//! [`skip`] rule placed before a broader [`catch`] carves out exceptions.
//!
//! # Examples
//!
//! ```
//! use error_mold::reraise::{catch, Matcher};
//! use error_mold::{fields, ErrorClass, Raised};
//!
//! let parse_error = ErrorClass::builder("ConfigError")
//!     .template("bad config value")
//!     .reraising(catch(Matcher::foreign::<std::num::ParseIntError>()))
//!     .build()
//!     .unwrap();
//!
//! let res: Result<i32, Raised> = parse_error.reraise(|| "12a".parse::<i32>());
//! let err = res.unwrap_err();
//! assert_eq!(err.to_string(), "bad config value");
//!
//! // unmatched errors propagate as they are
//! let res = parse_error.reraise(|| Err::<(), _>(std::io::Error::other("io")));
//! assert_eq!(res.unwrap_err().type_name(), "Error");
//! ```

mod chain;
pub(crate) mod compile;
mod engine;
mod rules;

pub use chain::Chain;
pub use engine::RemapOptions;
pub use rules::{
    catch, skip, Action, Catch, ForeignCheck, MatchSet, Matcher, RemapFn, RemapResult, Reraising,
    Rule,
};
