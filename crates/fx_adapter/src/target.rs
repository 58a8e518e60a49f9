//! The wrapped-object model.
//!
//! A target exposes named members. Each member is, at the moment it is
//! looked up, either a method or a plain property value; nothing about that
//! classification is remembered between lookups.

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Positional arguments of a method call.
pub type Args = Vec<Value>;

/// A callable member. The first argument is the receiver, which is always
/// the object the member was read from.
pub type MethodFn<T> = Arc<dyn Fn(&Arc<T>, Args) -> anyhow::Result<Returned> + Send + Sync>;

/// What a method hands back when called.
pub enum Returned {
    /// A plain value, available immediately.
    Ready(Value),
    /// An asynchronous result that settles later.
    Pending(BoxFuture<'static, anyhow::Result<Value>>),
}

impl Returned {
    pub fn ready(value: impl Into<Value>) -> Self {
        Self::Ready(value.into())
    }

    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self::Pending(fut.boxed())
    }
}

impl fmt::Debug for Returned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(v) => f.debug_tuple("Ready").field(v).finish(),
            Self::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// The current value of one member.
pub enum Member<T> {
    Method(MethodFn<T>),
    Property(Value),
}

impl<T> Member<T> {
    pub fn is_method(&self) -> bool {
        matches!(self, Self::Method(_))
    }
}

impl<T> Clone for Member<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Method(m) => Self::Method(Arc::clone(m)),
            Self::Property(v) => Self::Property(v.clone()),
        }
    }
}

impl<T> fmt::Debug for Member<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(_) => f.write_str("Method(..)"),
            Self::Property(v) => f.debug_tuple("Property").field(v).finish(),
        }
    }
}

/// An object whose members can be intercepted.
pub trait Target: Send + Sync + Sized + 'static {
    /// Current value of `name`, or `None` if the target has no such member.
    fn member(&self, name: &str) -> Option<Member<Self>>;

    /// Names of the target's own members.
    fn keys(&self) -> Vec<String>;

    fn has(&self, name: &str) -> bool {
        self.member(name).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn member_classification() {
        let m: Member<()> = Member::Property(json!(1));
        assert!(!m.is_method());
        let f: MethodFn<()> = Arc::new(|_: &Arc<()>, _: Args| Ok(Returned::ready(1)));
        let m: Member<()> = Member::Method(f);
        assert!(m.is_method());
        assert_eq!(format!("{m:?}"), "Method(..)");
    }

    #[test]
    fn returned_debug_hides_futures() {
        let r = Returned::pending(async { Ok(json!("later")) });
        assert_eq!(format!("{r:?}"), "Pending(..)");
        let r = Returned::ready("now");
        assert_eq!(format!("{r:?}"), "Ready(String(\"now\"))");
    }
}
