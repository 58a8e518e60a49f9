//! Construction-time configuration for an [`Adapter`](crate::Adapter).

use crate::fault::{Fault, UnknownError};
use crate::errors::{ErrorTable, ErrorTransform};
use std::collections::HashMap;
use std::sync::Arc;

/// Environment override for [`AdapterConfig::cache_no_arg_methods`].
pub const CACHE_ENV: &str = "FX_CACHE_NO_ARG_METHODS";

/// Options fixed when an adapter is built.
///
/// - `default_error`: fallback transform (defaults to wrapping in
///   [`UnknownError`])
/// - `method_error`: per-method overrides (defaults to none)
/// - `cache_no_arg_methods`: memoize zero-argument calls (defaults to on)
pub struct AdapterConfig<E> {
    default_error: ErrorTransform<E>,
    method_errors: HashMap<String, ErrorTransform<E>>,
    cache_no_arg_methods: bool,
}

impl<E: From<UnknownError> + 'static> Default for AdapterConfig<E> {
    fn default() -> Self {
        Self::with_default_error(|fault| E::from(UnknownError::new(fault)))
    }
}

impl<E: From<UnknownError> + 'static> AdapterConfig<E> {
    /// Defaults, with caching overridable through [`CACHE_ENV`].
    pub fn from_env() -> Self {
        let cache = std::env::var(CACHE_ENV)
            .ok()
            .and_then(|v| parse_flag(&v))
            .unwrap_or(true);
        Self::default().cache_no_arg_methods(cache)
    }
}

impl<E> AdapterConfig<E> {
    /// Start from an explicit fallback transform, for error types that have
    /// no conversion from [`UnknownError`].
    pub fn with_default_error<F>(f: F) -> Self
    where
        F: Fn(Fault) -> E + Send + Sync + 'static,
    {
        Self {
            default_error: Arc::new(f),
            method_errors: HashMap::new(),
            cache_no_arg_methods: true,
        }
    }

    pub fn default_error<F>(mut self, f: F) -> Self
    where
        F: Fn(Fault) -> E + Send + Sync + 'static,
    {
        self.default_error = Arc::new(f);
        self
    }

    pub fn method_error<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(Fault) -> E + Send + Sync + 'static,
    {
        self.method_errors.insert(name.into(), Arc::new(f));
        self
    }

    pub fn cache_no_arg_methods(mut self, enabled: bool) -> Self {
        self.cache_no_arg_methods = enabled;
        self
    }

    pub fn caches_no_arg_methods(&self) -> bool {
        self.cache_no_arg_methods
    }

    pub(crate) fn into_parts(self) -> (ErrorTable<E>, bool) {
        (
            ErrorTable::from_parts(self.default_error, self.method_errors),
            self.cache_no_arg_methods,
        )
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "0" | "false" | "off" | "no" => Some(false),
        "1" | "true" | "on" | "yes" => Some(true),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cache_and_wrap_unknown() {
        let cfg: AdapterConfig<UnknownError> = AdapterConfig::default();
        assert!(cfg.caches_no_arg_methods());
        let (table, cache) = cfg.into_parts();
        assert!(cache);
        let e = table.transform("anything", Fault::Thrown(anyhow::anyhow!("boom")));
        assert_eq!(e.to_string(), "unknown error (thrown): boom");
    }

    #[test]
    fn builder_sets_overrides_and_flag() {
        let cfg = AdapterConfig::with_default_error(|_| 0u8)
            .method_error("fetch", |_| 1u8)
            .cache_no_arg_methods(false);
        assert!(!cfg.caches_no_arg_methods());
        let (table, _) = cfg.into_parts();
        assert_eq!(table.transform("fetch", Fault::Thrown(anyhow::anyhow!("x"))), 1);
        assert_eq!(table.transform("other", Fault::Thrown(anyhow::anyhow!("x"))), 0);
    }

    #[test]
    fn replacing_the_default_keeps_overrides() {
        let cfg = AdapterConfig::with_default_error(|_| "a")
            .method_error("m", |_| "m")
            .default_error(|_| "b");
        let (table, _) = cfg.into_parts();
        assert_eq!(table.transform("m", Fault::Thrown(anyhow::anyhow!("x"))), "m");
        assert_eq!(table.transform("z", Fault::Thrown(anyhow::anyhow!("x"))), "b");
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag(" Off "), Some(false));
        assert_eq!(parse_flag("yes"), Some(true));
        assert_eq!(parse_flag("maybe"), None);
    }
}
