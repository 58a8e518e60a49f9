use thiserror::Error;

/// Errors from looking members up on an adapter.
///
/// Failures of the wrapped methods never show up here; those are data,
/// carried by the failed computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("member '{0}' not found on target")]
    MemberNotFound(String),

    #[error("member '{0}' is not callable")]
    NotCallable(String),

    #[error("member '{0}' is a method, not a property")]
    NotAProperty(String),

    #[error("'{0}' is the escape hatch and cannot be used as a method or property")]
    EscapeHatch(String),
}

pub type Result<T> = std::result::Result<T, AdapterError>;
