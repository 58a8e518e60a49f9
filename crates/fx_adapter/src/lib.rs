//! fx adapter: intercepts a target's methods and turns each call into a
//! deferred, error-normalized computation.
//!
//! # Architecture
//!
//! ```text
//! caller
//!   │  adapter.get(name)
//!   ▼
//! Adapter ── "unsafe" ──────────────▶ target itself
//!   │ ── property ──────────────────▶ live value from target
//!   │ ── method ────▶ Intercepted
//!   │                    │ invoke(args)
//!   │                    ▼
//!   │         zero args + cache on? ── hit ──▶ cached Effect
//!   │                    │ miss
//!   │                    ▼
//!   │         Effect::suspend(call method on target)
//!   │             Ok / Ready / resolved future ──▶ succeeded
//!   │             Err / rejected future / panic ─▶ ErrorTable ─▶ failed
//! ```
//!
//! The adapter never runs a method itself; the returned [`Effect`] does so
//! when driven.

pub mod adapter;
pub mod config;
pub mod error;
pub mod errors;
pub mod fault;
pub mod object;
pub mod target;

pub use adapter::{Access, Adapter, Intercepted, ESCAPE_HATCH};
pub use config::AdapterConfig;
pub use error::{AdapterError, Result};
pub use errors::{ErrorTable, ErrorTransform};
pub use fault::{Fault, FaultOrigin, PanicPayload, UnknownError};
pub use fx_effect::{Effect, Status};
pub use object::Object;
pub use target::{Args, Member, MethodFn, Returned, Target};
