//! Invocation errors: the error value, its contracts, and the capability
//! that builds it.
//!
//! Foundation crate -- no logging, async, or I/O dependencies.

pub mod args;
pub mod callable;
pub mod chain;
pub mod error;
pub mod factory;
pub mod report;

pub use args::{ArgKey, Args};
pub use callable::CallableRef;
pub use chain::{chain, root_cause, Chain};
pub use error::{
    Cause, ChainableError, InvocationError, InvocationErrorBuilder, InvocationFailure,
    InvocationResult,
};
pub use factory::{create_invocation_error, ErrorFactory, InvocationErrorFactory, Translate, Verbatim};
pub use report::InvocationReport;

/// Argument values are plain JSON values.
pub use serde_json::Value;
