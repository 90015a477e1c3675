//! The invocation error value and the traits it is read through.

use crate::args::Args;
use crate::callable::CallableRef;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a prior error in a cause chain.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

pub type InvocationResult<T> = Result<T, InvocationError>;

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// An error with a message, a numeric code, and an optional prior cause.
pub trait ChainableError: StdError + Send + Sync + 'static {
    fn message(&self) -> &str;

    /// Caller-assigned; opaque to this crate.
    fn code(&self) -> i64;

    /// The error this one wraps, if any. Same value `source()` exposes.
    fn previous(&self) -> Option<&Cause>;
}

/// A failure raised while invoking a callable.
pub trait InvocationFailure: ChainableError {
    /// The target whose invocation failed.
    fn callable(&self) -> Option<&CallableRef>;

    /// The arguments the failed invocation was attempted with.
    fn args(&self) -> &Args;
}

// ---------------------------------------------------------------------------
// InvocationError
// ---------------------------------------------------------------------------

/// Immutable record of a failed invocation.
///
/// Every accessor returns exactly what was supplied at construction; nothing
/// is normalised, truncated, or copied on the way in or out.
#[derive(Debug, Clone, Default)]
pub struct InvocationError {
    message: String,
    code: i64,
    previous: Option<Cause>,
    callable: Option<CallableRef>,
    args: Args,
}

impl InvocationError {
    pub fn new(
        message: impl Into<String>,
        code: i64,
        previous: Option<Cause>,
        callable: Option<CallableRef>,
        args: Args,
    ) -> Self {
        Self {
            message: message.into(),
            code,
            previous,
            callable,
            args,
        }
    }

    /// Starts from the defaults: empty message, code `0`, no cause, no
    /// callable, no arguments.
    pub fn builder() -> InvocationErrorBuilder {
        InvocationErrorBuilder::default()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn previous(&self) -> Option<&Cause> {
        self.previous.as_ref()
    }

    pub fn callable(&self) -> Option<&CallableRef> {
        self.callable.as_ref()
    }

    pub fn args(&self) -> &Args {
        &self.args
    }
}

impl fmt::Display for InvocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for InvocationError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.previous
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn StdError + 'static))
    }
}

/// Lets a failed nested invocation become the cause of an outer one with `?`.
impl From<InvocationError> for Cause {
    fn from(err: InvocationError) -> Self {
        Arc::new(err)
    }
}

impl ChainableError for InvocationError {
    fn message(&self) -> &str {
        &self.message
    }

    fn code(&self) -> i64 {
        self.code
    }

    fn previous(&self) -> Option<&Cause> {
        self.previous.as_ref()
    }
}

impl InvocationFailure for InvocationError {
    fn callable(&self) -> Option<&CallableRef> {
        self.callable.as_ref()
    }

    fn args(&self) -> &Args {
        &self.args
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects the optional parts of an [`InvocationError`] before it is frozen.
#[derive(Debug, Default)]
#[must_use]
pub struct InvocationErrorBuilder {
    message: String,
    code: i64,
    previous: Option<Cause>,
    callable: Option<CallableRef>,
    args: Args,
}

impl InvocationErrorBuilder {
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn code(mut self, code: i64) -> Self {
        self.code = code;
        self
    }

    /// Attaches an existing, possibly shared, cause.
    pub fn previous(mut self, previous: Cause) -> Self {
        self.previous = Some(previous);
        self
    }

    /// Attaches an owned error as the cause.
    pub fn cause<E: StdError + Send + Sync + 'static>(self, error: E) -> Self {
        self.previous(Arc::new(error))
    }

    pub fn callable(mut self, callable: CallableRef) -> Self {
        self.callable = Some(callable);
        self
    }

    pub fn args(mut self, args: Args) -> Self {
        self.args = args;
        self
    }

    pub fn build(self) -> InvocationError {
        InvocationError::new(
            self.message,
            self.code,
            self.previous,
            self.callable,
            self.args,
        )
    }
}
