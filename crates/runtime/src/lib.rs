//! Function registry and dynamic invoker.
//!
//! Every failed call is reported as an invocation error built by the
//! invoker's [`InvocationErrorFactory`](invocate_core::InvocationErrorFactory).

pub mod builtins;
pub mod function;
pub mod invoker;
pub mod registry;
pub mod signature;

pub use function::NativeFunction;
pub use invoker::{Call, Invoker, Panicked};
pub use registry::{Registry, RegistryError, RegistryResult};
pub use signature::{BindError, Param, ParamKind, Signature};

/// Codes stamped on invocation errors raised by the [`Invoker`].
pub mod codes {
    /// No function is registered under the requested name.
    pub const NOT_CALLABLE: i64 = 1;
    /// Too many, too few, unknown, or doubly-bound arguments.
    pub const ARITY_MISMATCH: i64 = 2;
    /// An argument does not have the declared shape.
    pub const TYPE_MISMATCH: i64 = 3;
    /// The function body returned an error.
    pub const INTERNAL: i64 = 4;
    /// The function body panicked.
    pub const PANICKED: i64 = 5;
}
