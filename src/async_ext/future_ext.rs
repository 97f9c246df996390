//! Extension trait for `Future<Output = Result<T, E>>`.
//!
//! Provides `.reraise_as()` for futures, mirroring the sync
//! [`ResultReraiseExt`](crate::traits::ResultReraiseExt) trait.

use core::future::Future;

use crate::reraise::RemapOptions;
use crate::schema::ErrorClass;
use crate::types::Raised;

use super::reraise_future::ReraiseFuture;

/// Extension trait remapping the error of a result-returning future.
///
/// # Examples
///
/// ```rust,no_run
/// use error_mold::async_ext::FutureReraiseExt;
/// use error_mold::{ErrorClass, Raised};
///
/// async fn read_config(class: &ErrorClass) -> Result<String, Raised> {
///     async { std::fs::read_to_string("app.toml") }.reraise_as(class).await
/// }
/// ```
pub trait FutureReraiseExt<T, E>: Future<Output = Result<T, E>> + Sized
where
    E: Into<Raised>,
{
    /// Remaps the future's error with the class's own rules.
    #[inline]
    fn reraise_as(self, class: &ErrorClass) -> ReraiseFuture<Self> {
        class.reraise_async(self)
    }

    /// Remaps the future's error with per-call options.
    #[inline]
    fn reraise_as_with(self, class: &ErrorClass, options: RemapOptions) -> ReraiseFuture<Self> {
        class.reraise_async_with(options, self)
    }
}

impl<Fut, T, E> FutureReraiseExt<T, E> for Fut
where
    Fut: Future<Output = Result<T, E>>,
    E: Into<Raised>,
{
}
