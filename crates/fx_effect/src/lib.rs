//! Deferred computations.
//!
//! An [`Effect`] is a description of work that has not happened yet. It is
//! started the first time someone drives it with [`Effect::run`]; every clone
//! refers to the same computation, and once it settles the outcome is kept.
//!
//! ```text
//! suspend(f)      succeed(a) / fail(e)
//!     │                  │
//!     ▼                  ▼
//!  Pending ──run──▶ Succeeded | Failed   (terminal)
//! ```

use futures::future::{BoxFuture, FutureExt, Shared};
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Observable state of a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Not driven yet, or driven but not settled.
    Pending,
    Succeeded,
    Failed,
}

/// A lazily-started, cloneable computation yielding `Result<A, E>`.
pub struct Effect<A, E> {
    inner: Inner<A, E>,
}

enum Inner<A, E> {
    /// Built from an outcome that was already known.
    Settled(Arc<Result<A, E>>),
    Deferred(Shared<BoxFuture<'static, Result<A, E>>>),
}

impl<A, E> Effect<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// A computation that is already settled with `value`.
    pub fn succeed(value: A) -> Self {
        Self::from_result(Ok(value))
    }

    /// A computation that is already settled with `error`.
    pub fn fail(error: E) -> Self {
        Self::from_result(Err(error))
    }

    pub fn from_result(result: Result<A, E>) -> Self {
        Self {
            inner: Inner::Settled(Arc::new(result)),
        }
    }

    /// Suspend `f` until the computation is first driven.
    ///
    /// Neither `f` nor the future it returns is touched before the first
    /// [`run`](Self::run). Whatever the future resolves to settles the
    /// computation for every holder.
    pub fn suspend<F, Fut>(f: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<A, E>> + Send + 'static,
    {
        Self {
            inner: Inner::Deferred(async move { f().await }.boxed().shared()),
        }
    }

    /// Drive the computation to completion.
    ///
    /// Concurrent and repeated runs share one execution.
    pub async fn run(&self) -> Result<A, E> {
        match &self.inner {
            Inner::Settled(outcome) => (**outcome).clone(),
            Inner::Deferred(fut) => fut.clone().await,
        }
    }

    pub fn status(&self) -> Status {
        match self.peek() {
            None => Status::Pending,
            Some(Ok(_)) => Status::Succeeded,
            Some(Err(_)) => Status::Failed,
        }
    }

    /// The settled outcome, if any, without driving the computation.
    pub fn peek(&self) -> Option<&Result<A, E>> {
        match &self.inner {
            Inner::Settled(outcome) => Some(outcome.as_ref()),
            Inner::Deferred(fut) => fut.peek(),
        }
    }

    /// True when both handles refer to the same computation object.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.inner, &other.inner) {
            (Inner::Settled(a), Inner::Settled(b)) => Arc::ptr_eq(a, b),
            (Inner::Deferred(a), Inner::Deferred(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl<A, E> Clone for Effect<A, E> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            Inner::Settled(outcome) => Inner::Settled(Arc::clone(outcome)),
            Inner::Deferred(fut) => Inner::Deferred(fut.clone()),
        };
        Self { inner }
    }
}

impl<A, E> fmt::Debug for Effect<A, E>
where
    A: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Effect")
            .field("status", &self.status())
            .finish()
    }
}
