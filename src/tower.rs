//! Tower integration.
//!
//! Provides a Tower `Layer` and `Service` that run every service error
//! through an [`ErrorClass`]'s remap, so a service boundary can translate
//! foreign errors into its own structured ones.
//!
//! # Feature Flag
//!
//! Requires the `tower` feature:
//!
//! ```toml
//! [dependencies]
//! error-mold = { version = "0.3", features = ["tower"] }
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use error_mold::tower::RemapLayer;
//! use tower::ServiceBuilder;
//!
//! let service = ServiceBuilder::new()
//!     .layer(RemapLayer::new(&gateway_error))
//!     .service(my_service);
//! ```

use core::task::{Context, Poll};

use tower::{Layer, Service};

use crate::async_ext::ReraiseFuture;
use crate::reraise::RemapOptions;
use crate::schema::ErrorClass;
use crate::types::Raised;

/// A Tower [`Layer`] remapping service errors with an [`ErrorClass`].
#[derive(Clone, Debug)]
pub struct RemapLayer {
    class: ErrorClass,
    options: RemapOptions,
}

impl RemapLayer {
    #[inline]
    pub fn new(class: &ErrorClass) -> Self {
        Self { class: class.clone(), options: RemapOptions::default() }
    }

    #[inline]
    pub fn with_options(class: &ErrorClass, options: RemapOptions) -> Self {
        Self { class: class.clone(), options }
    }

    #[inline]
    pub fn class(&self) -> &ErrorClass {
        &self.class
    }
}

impl<S> Layer<S> for RemapLayer {
    type Service = RemapService<S>;

    #[inline]
    fn layer(&self, inner: S) -> Self::Service {
        RemapService { inner, class: self.class.clone(), options: self.options.clone() }
    }
}

/// A Tower [`Service`] whose errors go through an [`ErrorClass`]'s remap.
///
/// Created by [`RemapLayer`] or [`ServiceRemapExt::remap_errors`].
#[derive(Clone, Debug)]
pub struct RemapService<S> {
    inner: S,
    class: ErrorClass,
    options: RemapOptions,
}

impl<S> RemapService<S> {
    #[inline]
    pub fn new(inner: S, class: &ErrorClass) -> Self {
        Self { inner, class: class.clone(), options: RemapOptions::default() }
    }

    #[inline]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    #[inline]
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, Request> Service<Request> for RemapService<S>
where
    S: Service<Request>,
    S::Error: Into<Raised>,
{
    type Response = S::Response;
    type Error = Raised;
    type Future = RemapFuture<S::Future>;

    #[inline]
    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx).map_err(|e| self.class.escalate(e.into(), &self.options))
    }

    #[inline]
    fn call(&mut self, request: Request) -> Self::Future {
        ReraiseFuture::new(self.inner.call(request), self.class.clone(), self.options.clone())
    }
}

/// Future returned by [`RemapService`].
pub type RemapFuture<F> = ReraiseFuture<F>;

/// Extension trait for wrapping a service with remapping.
pub trait ServiceRemapExt<Request>: Service<Request> + Sized {
    fn remap_errors(self, class: &ErrorClass) -> RemapService<Self> {
        RemapService::new(self, class)
    }
}

impl<S, Request> ServiceRemapExt<Request> for S where S: Service<Request> {}
