//! Native functions callable through the [`Invoker`](crate::Invoker).

use crate::signature::Signature;
use invocate_core::{Cause, Value};
use std::fmt;

/// Body of a native function. Receives one value per declared parameter.
pub type Body = dyn Fn(&[Value]) -> Result<Value, Cause> + Send + Sync;

/// A named function with a declared signature.
pub struct NativeFunction {
    name: String,
    signature: Signature,
    body: Box<Body>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Cause> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            body: Box::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Runs the body with already-bound arguments.
    pub fn call(&self, bound: &[Value]) -> Result<Value, Cause> {
        (self.body)(bound)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.signature)
    }
}
