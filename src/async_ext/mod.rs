//! Async extensions for remapping.
//!
//! # Feature Flag
//!
//! Requires the `async` feature to be enabled:
//!
//! ```toml
//! [dependencies]
//! error-mold = { version = "0.3", features = ["async"] }
//! ```

mod future_ext;
mod reraise_future;

pub use future_ext::FutureReraiseExt;
pub use reraise_future::ReraiseFuture;
