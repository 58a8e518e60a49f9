//! Raw failures of wrapped methods and the generic error they default to.

use serde::Serialize;
use serde_json::{json, Value};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Where a raw failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultOrigin {
    /// The method returned `Err` while being called.
    Thrown,
    /// The future returned by the method settled with `Err`.
    Rejected,
    /// The method panicked, either when called or when polled.
    Panicked,
}

impl fmt::Display for FaultOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Thrown => "thrown",
            Self::Rejected => "rejected",
            Self::Panicked => "panicked",
        };
        f.write_str(s)
    }
}

/// Message recovered from a caught panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanicPayload {
    message: String,
}

impl PanicPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Extract a message from the payload handed out by `catch_unwind`.
    pub fn from_any(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(s) => *s,
            Err(payload) => match payload.downcast::<&'static str>() {
                Ok(s) => (*s).to_string(),
                Err(_) => "non-string panic payload".to_string(),
            },
        };
        Self { message }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PanicPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "panic: {}", self.message)
    }
}

/// A raw failure, before any error transform has looked at it.
#[derive(Error, Debug)]
pub enum Fault {
    #[error("{0}")]
    Thrown(anyhow::Error),

    #[error("{0}")]
    Rejected(anyhow::Error),

    #[error("{0}")]
    Panicked(PanicPayload),
}

impl Fault {
    pub fn origin(&self) -> FaultOrigin {
        match self {
            Self::Thrown(_) => FaultOrigin::Thrown,
            Self::Rejected(_) => FaultOrigin::Rejected,
            Self::Panicked(_) => FaultOrigin::Panicked,
        }
    }

    /// The underlying error, when the method produced one.
    pub fn error(&self) -> Option<&anyhow::Error> {
        match self {
            Self::Thrown(e) | Self::Rejected(e) => Some(e),
            Self::Panicked(_) => None,
        }
    }

    /// Downcast the underlying error to a concrete type.
    pub fn downcast_ref<T>(&self) -> Option<&T>
    where
        T: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error().and_then(|e| e.downcast_ref::<T>())
    }
}

/// The tagged error the default transform wraps every fault into.
///
/// The original fault is kept as payload; it is shared so the error value
/// itself stays `Clone`.
#[derive(Error, Debug, Clone)]
#[error("unknown error ({}): {cause}", .cause.origin())]
pub struct UnknownError {
    cause: Arc<Fault>,
}

impl UnknownError {
    pub const TAG: &'static str = "UnknownError";

    pub fn new(cause: Fault) -> Self {
        Self {
            cause: Arc::new(cause),
        }
    }

    pub fn cause(&self) -> &Fault {
        &self.cause
    }

    pub fn origin(&self) -> FaultOrigin {
        self.cause.origin()
    }
}

impl From<UnknownError> for Value {
    fn from(e: UnknownError) -> Self {
        json!({
            "_tag": UnknownError::TAG,
            "origin": e.origin(),
            "message": e.cause.to_string(),
        })
    }
}
