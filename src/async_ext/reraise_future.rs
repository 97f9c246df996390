//! Future wrapper remapping the error a future resolves to.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_core::future::FusedFuture;
use pin_project_lite::pin_project;

use crate::reraise::RemapOptions;
use crate::schema::ErrorClass;
use crate::types::Raised;

pin_project! {
    /// A future whose error output goes through an [`ErrorClass`]'s remap.
    ///
    /// The remap runs once, when the inner future resolves to an error.
    /// `ReraiseFuture` is cancel-safe if the inner future is.
    ///
    /// # Examples
    ///
    /// ```
    /// use error_mold::async_ext::FutureReraiseExt;
    /// use error_mold::ErrorClass;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let class =
    ///     ErrorClass::builder("Fetch").template("fetch failed").reraising(true).build().unwrap();
    ///
    /// let err = async { "x".parse::<u8>() }.reraise_as(&class).await.unwrap_err();
    /// assert_eq!(err.to_string(), "fetch failed");
    /// # }
    /// ```
    #[must_use = "futures do nothing unless polled"]
    pub struct ReraiseFuture<Fut> {
        #[pin]
        future: Fut,
        class: ErrorClass,
        options: RemapOptions,
        done: bool,
    }
}

impl<Fut> ReraiseFuture<Fut> {
    #[inline]
    pub fn new(future: Fut, class: ErrorClass, options: RemapOptions) -> Self {
        Self { future, class, options, done: false }
    }
}

impl<Fut, T, E> Future for ReraiseFuture<Fut>
where
    Fut: Future<Output = Result<T, E>>,
    E: Into<Raised>,
{
    type Output = Result<T, Raised>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        this.future.poll(cx).map(|res| {
            *this.done = true;
            res.map_err(|err| this.class.escalate(err.into(), this.options))
        })
    }
}

impl<Fut, T, E> FusedFuture for ReraiseFuture<Fut>
where
    Fut: FusedFuture<Output = Result<T, E>>,
    E: Into<Raised>,
{
    fn is_terminated(&self) -> bool {
        self.done || self.future.is_terminated()
    }
}

impl ErrorClass {
    /// Async counterpart of [`reraise`](ErrorClass::reraise).
    #[inline]
    pub fn reraise_async<Fut>(&self, future: Fut) -> ReraiseFuture<Fut> {
        ReraiseFuture::new(future, self.clone(), RemapOptions::default())
    }

    #[inline]
    pub fn reraise_async_with<Fut>(
        &self,
        options: RemapOptions,
        future: Fut,
    ) -> ReraiseFuture<Fut> {
        ReraiseFuture::new(future, self.clone(), options)
    }
}
