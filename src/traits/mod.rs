//! Extension traits bringing remapping to standard types.
//!
//! - [`ResultReraiseExt`]: `.reraise_as(&class)` on any `Result` whose error
//!   converts into [`Raised`](crate::Raised).
//!
//! The async counterpart lives in `async_ext` behind the `async` feature.

pub mod result_ext;

pub use result_ext::ResultReraiseExt;
