//! The interception adapter.
//!
//! Reads of plain properties pass straight through to the target. Reads of
//! methods hand back an [`Intercepted`] wrapper whose invocation returns a
//! deferred [`Effect`] instead of running the method: the method runs when
//! the effect is driven, and every failure (an `Err`, a rejected future, a
//! panic) goes through the error table and surfaces as a failed effect.
//!
//! Zero-argument invocations are memoized per method name when caching is
//! enabled. Entries live as long as the adapter and are never refreshed.

use crate::config::AdapterConfig;
use crate::error::{AdapterError, Result};
use crate::fault::{Fault, PanicPayload};
use crate::target::{Args, Member, MethodFn, Returned, Target};
use crate::errors::ErrorTable;
use futures::FutureExt;
use fx_effect::Effect;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, trace};

/// Member name that always resolves to the wrapped target.
pub const ESCAPE_HATCH: &str = "unsafe";

type MethodCache<E> = Mutex<HashMap<String, Effect<Value, E>>>;

struct State<E> {
    errors: ErrorTable<E>,
    cache: Option<MethodCache<E>>,
}

/// Wraps a [`Target`] so its methods return effects.
pub struct Adapter<T, E> {
    target: Arc<T>,
    state: Arc<State<E>>,
}

/// Result of reading a member through the adapter.
pub enum Access<T, E> {
    /// The escape hatch: the wrapped target itself.
    Target(Arc<T>),
    /// A non-callable member, exactly as the target holds it right now.
    Property(Value),
    Method(Intercepted<T, E>),
}

impl<T, E> Access<T, E> {
    pub fn into_property(self) -> Option<Value> {
        match self {
            Self::Property(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_method(self) -> Option<Intercepted<T, E>> {
        match self {
            Self::Method(m) => Some(m),
            _ => None,
        }
    }
}

impl<T, E> Adapter<T, E>
where
    T: Target,
    E: Clone + Send + Sync + 'static,
{
    pub fn new(target: T, config: AdapterConfig<E>) -> Self {
        Self::from_arc(Arc::new(target), config)
    }

    /// Wrap a target that is already shared; the adapter keeps a reference
    /// to it and never copies it.
    pub fn from_arc(target: Arc<T>, config: AdapterConfig<E>) -> Self {
        let (errors, cache_enabled) = config.into_parts();
        let cache = cache_enabled.then(|| Mutex::new(HashMap::new()));
        Self {
            target,
            state: Arc::new(State { errors, cache }),
        }
    }

    /// Read `name`. Classification happens now, against the target's
    /// current value; `None` when neither the target nor the escape hatch
    /// knows the name.
    pub fn get(&self, name: &str) -> Option<Access<T, E>> {
        if name == ESCAPE_HATCH {
            return Some(Access::Target(Arc::clone(&self.target)));
        }
        let access = match self.target.member(name)? {
            Member::Property(v) => Access::Property(v),
            Member::Method(method) => Access::Method(Intercepted {
                name: name.to_string(),
                method,
                target: Arc::clone(&self.target),
                state: Arc::clone(&self.state),
            }),
        };
        trace!(member = name, method = matches!(access, Access::Method(_)), "member read");
        Some(access)
    }

    /// Look `name` up and invoke it with `args`.
    pub fn call(&self, name: &str, args: Args) -> Result<Effect<Value, E>> {
        match self.get(name) {
            Some(Access::Method(m)) => Ok(m.invoke(args)),
            Some(Access::Property(_)) => Err(AdapterError::NotCallable(name.to_string())),
            Some(Access::Target(_)) => Err(AdapterError::EscapeHatch(name.to_string())),
            None => Err(AdapterError::MemberNotFound(name.to_string())),
        }
    }

    /// Current value of a property, passed through from the target.
    pub fn property(&self, name: &str) -> Result<Value> {
        match self.get(name) {
            Some(Access::Property(v)) => Ok(v),
            Some(Access::Method(_)) => Err(AdapterError::NotAProperty(name.to_string())),
            Some(Access::Target(_)) => Err(AdapterError::EscapeHatch(name.to_string())),
            None => Err(AdapterError::MemberNotFound(name.to_string())),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        name == ESCAPE_HATCH || self.target.has(name)
    }

    /// The target's own member names plus the escape hatch.
    pub fn keys(&self) -> Vec<String> {
        let mut keys = self.target.keys();
        if !keys.iter().any(|k| k == ESCAPE_HATCH) {
            keys.push(ESCAPE_HATCH.to_string());
        }
        keys
    }

    /// The escape hatch as a typed accessor.
    pub fn unsafe_target(&self) -> &Arc<T> {
        &self.target
    }

    pub fn cache_enabled(&self) -> bool {
        self.state.cache.is_some()
    }

    /// The memoized zero-argument computation for `name`, if one exists.
    pub fn cached(&self, name: &str) -> Option<Effect<Value, E>> {
        let cache = self.state.cache.as_ref()?;
        lock(cache).get(name).cloned()
    }

    pub fn errors(&self) -> &ErrorTable<E> {
        &self.state.errors
    }
}

impl<T, E> fmt::Debug for Adapter<T, E>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("target", &self.target)
            .field("errors", &self.state.errors)
            .field("cache_enabled", &self.state.cache.is_some())
            .finish()
    }
}

/// A method read through an [`Adapter`].
///
/// Holds the method value seen at read time, the target as receiver and the
/// adapter's error table and cache.
pub struct Intercepted<T, E> {
    name: String,
    method: MethodFn<T>,
    target: Arc<T>,
    state: Arc<State<E>>,
}

impl<T, E> Intercepted<T, E>
where
    T: Target,
    E: Clone + Send + Sync + 'static,
{
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Build the deferred computation for a call with `args`.
    ///
    /// Never fails and never runs the method: that happens when the returned
    /// effect is driven.
    pub fn invoke(&self, args: Args) -> Effect<Value, E> {
        let cache = match &self.state.cache {
            Some(cache) if args.is_empty() => cache,
            _ => return self.defer(args),
        };
        // Lookup and insert happen under one lock: one computation per name.
        let mut entries = lock(cache);
        if let Some(hit) = entries.get(&self.name) {
            debug!(method = %self.name, "zero-arg cache hit");
            return hit.clone();
        }
        let effect = self.defer(args);
        entries.insert(self.name.clone(), effect.clone());
        debug!(method = %self.name, "zero-arg computation cached");
        effect
    }

    fn defer(&self, args: Args) -> Effect<Value, E> {
        let transform = Arc::clone(self.state.errors.resolve(&self.name));
        let method = Arc::clone(&self.method);
        let target = Arc::clone(&self.target);
        let name = self.name.clone();

        Effect::suspend(move || async move {
            let fail = |fault: Fault| {
                debug!(method = %name, origin = %fault.origin(), "method failed");
                transform(fault)
            };
            let called = panic::catch_unwind(AssertUnwindSafe(|| method(&target, args)));
            let pending = match called {
                Ok(Ok(Returned::Ready(value))) => return Ok(value),
                Ok(Ok(Returned::Pending(fut))) => fut,
                Ok(Err(e)) => return Err(fail(Fault::Thrown(e))),
                Err(payload) => return Err(fail(Fault::Panicked(PanicPayload::from_any(payload)))),
            };
            match AssertUnwindSafe(pending).catch_unwind().await {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(fail(Fault::Rejected(e))),
                Err(payload) => Err(fail(Fault::Panicked(PanicPayload::from_any(payload)))),
            }
        })
    }
}

impl<T, E> fmt::Debug for Intercepted<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intercepted")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn lock<E>(cache: &MethodCache<E>) -> std::sync::MutexGuard<'_, HashMap<String, Effect<Value, E>>> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}
