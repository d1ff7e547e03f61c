//! Interceptor chains and the handle-keyed registry behind them.
//!
//! # Registry
//!
//! [`Registry`] stores entries under monotonically increasing ids, so iteration order is
//! registration order. Every registration hands back a [`Registration`] that removes exactly
//! that entry. Traversals work on a snapshot taken when they start: entries registered or
//! disposed while a chain is running only affect later calls.
//!
//! # Failure Policy
//!
//! Interceptors are a best-effort side channel. An interceptor that returns `Err` or panics
//! is logged at `warn` level and skipped; the value it received flows on unchanged to the
//! next step. Callers never observe interceptor failures.
//!
//! | Chain | Input | Output |
//! |-------|-------|--------|
//! | request | [`RequestContext`] snapshot | `Option<`[`RequestPatch`]`>` merged into the context |
//! | response | [`Decoded`], [`ResponseMeta`], [`RequestContext`] | `Option<`[`Decoded`]`>` replacing the body |
//!
//! `None` leaves the running value as it is.

use crate::types::{Decoded, RequestContext, RequestPatch, ResponseMeta};
use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// Request-side interceptor.
pub type RequestInterceptor =
    dyn Fn(RequestContext) -> BoxFuture<'static, anyhow::Result<Option<RequestPatch>>> + Send + Sync;

/// Response-side interceptor.
pub type ResponseInterceptor = dyn Fn(Decoded, ResponseMeta, RequestContext) -> BoxFuture<'static, anyhow::Result<Option<Decoded>>>
    + Send
    + Sync;

/// Ordered request interceptors.
pub type RequestChain = Registry<RequestInterceptor>;

/// Ordered response interceptors.
pub type ResponseChain = Registry<ResponseInterceptor>;

trait Unregister: Send + Sync {
    fn unregister(&self, id: u64) -> bool;
}

struct RegistryInner<T: ?Sized> {
    next_id: AtomicU64,
    entries: RwLock<BTreeMap<u64, Arc<T>>>,
}

impl<T: ?Sized + Send + Sync> Unregister for RegistryInner<T> {
    fn unregister(&self, id: u64) -> bool {
        self.entries.write().remove(&id).is_some()
    }
}

/// Ordered collection of callbacks keyed by registration handle.
pub struct Registry<T: ?Sized> {
    inner: Arc<RegistryInner<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Registry {
            inner: Arc::new(RegistryInner {
                next_id: AtomicU64::new(0),
                entries: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    /// Append an entry and return its disposer.
    pub fn register(&self, entry: Arc<T>) -> Registration {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.entries.write().insert(id, entry);

        let weak: Weak<RegistryInner<T>> = Arc::downgrade(&self.inner);
        Registration { id, registry: weak }
    }

    /// Entries in registration order, detached from later mutation.
    pub fn snapshot(&self) -> Vec<Arc<T>> {
        self.inner.entries.read().values().cloned().collect()
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.inner.entries.read().len()
    }

    /// Whether there are no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: ?Sized + Send + Sync + 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Disposer returned by every registration.
///
/// Dropping it does nothing; call [`dispose`](Self::dispose) to remove the entry.
pub struct Registration {
    id: u64,
    registry: Weak<dyn Unregister>,
}

impl Registration {
    /// Remove the entry. Returns `false` if it was already removed or the registry is gone.
    pub fn dispose(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.unregister(self.id))
    }

    /// Handle of the registered entry.
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration").field("id", &self.id).finish()
    }
}

impl Registry<RequestInterceptor> {
    /// Run every request interceptor over `context`, in order.
    pub async fn run(&self, mut context: RequestContext) -> RequestContext {
        for (index, interceptor) in self.snapshot().into_iter().enumerate() {
            let input = context.clone();
            let outcome = AssertUnwindSafe(async move { interceptor(input).await })
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(Some(patch))) => context.apply(patch),
                Ok(Ok(None)) => {}
                Ok(Err(error)) => {
                    tracing::warn!(index, error = %error, "request interceptor failed, skipping");
                }
                Err(_) => {
                    tracing::warn!(index, "request interceptor panicked, skipping");
                }
            }
        }
        context
    }
}

impl Registry<ResponseInterceptor> {
    /// Run every response interceptor over `decoded`, in order.
    pub async fn run(
        &self,
        mut decoded: Decoded,
        response: &ResponseMeta,
        context: &RequestContext,
    ) -> Decoded {
        for (index, interceptor) in self.snapshot().into_iter().enumerate() {
            let (body, meta, ctx) = (decoded.clone(), response.clone(), context.clone());
            let outcome = AssertUnwindSafe(async move { interceptor(body, meta, ctx).await })
                .catch_unwind()
                .await;

            match outcome {
                Ok(Ok(Some(next))) => decoded = next,
                Ok(Ok(None)) => {}
                Ok(Err(error)) => {
                    tracing::warn!(index, error = %error, "response interceptor failed, skipping");
                }
                Err(_) => {
                    tracing::warn!(index, "response interceptor panicked, skipping");
                }
            }
        }
        decoded
    }
}
