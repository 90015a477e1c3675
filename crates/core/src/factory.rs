//! Construction capability for invocation errors.
//!
//! Code that performs dynamic invocation holds an [`InvocationErrorFactory`]
//! and asks it for an error whenever a call fails, instead of building error
//! values itself. The factory forwards the message through a [`Translate`]
//! pass-through and stores everything else verbatim.

use crate::args::Args;
use crate::callable::CallableRef;
use crate::error::{Cause, InvocationError, InvocationFailure};

// ---------------------------------------------------------------------------
// Message pass-through
// ---------------------------------------------------------------------------

/// Renders a message before it is stored on an error.
pub trait Translate: Send + Sync {
    fn text(&self, candidate: &str) -> String;
}

/// Identity translation: returns the candidate unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Translate for Verbatim {
    fn text(&self, candidate: &str) -> String {
        candidate.to_owned()
    }
}

impl<F> Translate for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn text(&self, candidate: &str) -> String {
        self(candidate)
    }
}

// ---------------------------------------------------------------------------
// Factory
// ---------------------------------------------------------------------------

/// Produces errors describing failed invocations.
pub trait InvocationErrorFactory: Send + Sync {
    type Error: InvocationFailure;

    /// Builds a new error. Never fails and performs no validation: whatever
    /// callable and arguments are passed in are stored as given.
    fn create_invocation_error(
        &self,
        message: &str,
        code: i64,
        previous: Option<Cause>,
        callable: Option<CallableRef>,
        args: Args,
    ) -> Self::Error;
}

/// The stock factory, producing [`InvocationError`] values.
#[derive(Debug, Clone, Default)]
pub struct ErrorFactory<T = Verbatim> {
    translator: T,
}

impl ErrorFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: Translate> ErrorFactory<T> {
    pub fn with_translator(translator: T) -> Self {
        Self { translator }
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }
}

impl<T: Translate> InvocationErrorFactory for ErrorFactory<T> {
    type Error = InvocationError;

    fn create_invocation_error(
        &self,
        message: &str,
        code: i64,
        previous: Option<Cause>,
        callable: Option<CallableRef>,
        args: Args,
    ) -> InvocationError {
        InvocationError::new(
            self.translator.text(message),
            code,
            previous,
            callable,
            args,
        )
    }
}

impl<F: InvocationErrorFactory + ?Sized> InvocationErrorFactory for &F {
    type Error = F::Error;

    fn create_invocation_error(
        &self,
        message: &str,
        code: i64,
        previous: Option<Cause>,
        callable: Option<CallableRef>,
        args: Args,
    ) -> F::Error {
        (**self).create_invocation_error(message, code, previous, callable, args)
    }
}

impl<F: InvocationErrorFactory + ?Sized> InvocationErrorFactory for std::sync::Arc<F> {
    type Error = F::Error;

    fn create_invocation_error(
        &self,
        message: &str,
        code: i64,
        previous: Option<Cause>,
        callable: Option<CallableRef>,
        args: Args,
    ) -> F::Error {
        (**self).create_invocation_error(message, code, previous, callable, args)
    }
}

/// Builds an [`InvocationError`] with the message stored untranslated.
pub fn create_invocation_error(
    message: &str,
    code: i64,
    previous: Option<Cause>,
    callable: Option<CallableRef>,
    args: Args,
) -> InvocationError {
    ErrorFactory::new().create_invocation_error(message, code, previous, callable, args)
}
