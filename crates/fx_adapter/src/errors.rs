//! Error resolution table: method name → error transform, with one fallback.

use crate::fault::Fault;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Maps a raw failure to the caller's error type.
pub type ErrorTransform<E> = Arc<dyn Fn(Fault) -> E + Send + Sync>;

/// Per-adapter lookup of error transforms.
///
/// Every name resolves to some transform; names without an override fall
/// through to the default.
pub struct ErrorTable<E> {
    methods: HashMap<String, ErrorTransform<E>>,
    default: ErrorTransform<E>,
}

impl<E> ErrorTable<E> {
    pub fn new<F>(default: F) -> Self
    where
        F: Fn(Fault) -> E + Send + Sync + 'static,
    {
        Self::from_parts(Arc::new(default), HashMap::new())
    }

    pub(crate) fn from_parts(
        default: ErrorTransform<E>,
        methods: HashMap<String, ErrorTransform<E>>,
    ) -> Self {
        Self { methods, default }
    }

    /// Register (or replace) the transform used for `name`.
    pub fn with_method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Fault) -> E + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Arc::new(f));
        self
    }

    pub fn resolve(&self, name: &str) -> &ErrorTransform<E> {
        self.methods.get(name).unwrap_or(&self.default)
    }

    /// Resolve the transform for `name` and apply it to `fault`.
    pub fn transform(&self, name: &str, fault: Fault) -> E {
        (self.resolve(name))(fault)
    }

    /// True when `name` has its own transform instead of the default.
    pub fn overrides(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }
}

impl<E> fmt::Debug for ErrorTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ErrorTable")
            .field("overrides", &names)
            .finish_non_exhaustive()
    }
}
