//! A dynamic target whose members can change after it has been wrapped.

use crate::target::{Args, Member, MethodFn, Returned, Target};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A bag of named members, methods and properties alike.
///
/// Keys enumerate in sorted order. Methods receive the object itself as
/// their receiver, so they can read and update its properties.
#[derive(Default)]
pub struct Object {
    members: RwLock<BTreeMap<String, Member<Object>>>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_property(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn with_method<F>(self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Arc<Object>, Args) -> anyhow::Result<Returned> + Send + Sync + 'static,
    {
        self.set_method(name, f);
        self
    }

    /// Insert or replace `name` with a plain value.
    pub fn set_property(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.write().insert(name.into(), Member::Property(value.into()));
    }

    /// Insert or replace `name` with a method.
    pub fn set_method<F>(&self, name: impl Into<String>, f: F)
    where
        F: Fn(&Arc<Object>, Args) -> anyhow::Result<Returned> + Send + Sync + 'static,
    {
        let f: MethodFn<Object> = Arc::new(f);
        self.write().insert(name.into(), Member::Method(f));
    }

    /// Remove `name`. Returns whether it was present.
    pub fn remove(&self, name: &str) -> bool {
        self.write().remove(name).is_some()
    }

    /// Current value of a property; `None` for methods and missing names.
    pub fn property(&self, name: &str) -> Option<Value> {
        match self.read().get(name)? {
            Member::Property(v) => Some(v.clone()),
            Member::Method(_) => None,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, Member<Object>>> {
        self.members.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, Member<Object>>> {
        self.members.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Target for Object {
    fn member(&self, name: &str) -> Option<Member<Self>> {
        self.read().get(name).cloned()
    }

    fn keys(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    fn has(&self, name: &str) -> bool {
        self.read().contains_key(name)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.read().iter()).finish()
    }
}
