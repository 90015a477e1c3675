//! Dynamic invocation by name, with failures reported through an
//! [`InvocationErrorFactory`].

use crate::codes;
use crate::function::NativeFunction;
use crate::registry::Registry;
use invocate_core::{Args, CallableRef, Cause, ErrorFactory, InvocationErrorFactory, Value};
use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// A function body panicked; the payload text is kept when it was a string.
#[derive(Debug, Clone, Error)]
#[error("panicked: {0}")]
pub struct Panicked(pub String);

impl Panicked {
    fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let text = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string payload".to_owned());
        Panicked(text)
    }
}

/// One call in a batch.
#[derive(Debug, Clone)]
pub struct Call {
    pub name: String,
    pub args: Args,
}

impl Call {
    pub fn new(name: impl Into<String>, args: Args) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

/// Calls registered functions, turning every failure into `F::Error`.
#[derive(Debug, Clone)]
pub struct Invoker<F = ErrorFactory> {
    registry: Registry,
    factory: F,
}

impl Invoker {
    pub fn new(registry: Registry) -> Self {
        Self::with_factory(registry, ErrorFactory::new())
    }
}

impl<F: InvocationErrorFactory> Invoker<F> {
    pub fn with_factory(registry: Registry, factory: F) -> Self {
        Self { registry, factory }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Invokes `name` with `args`.
    ///
    /// The error always carries `args` exactly as passed. When `name`
    /// resolves, the callable is the registry's own `Arc<NativeFunction>`;
    /// otherwise it is a [`CallableRef::named`] handle for the name.
    pub fn invoke(&self, name: &str, args: Args) -> Result<Value, F::Error> {
        let Some(function) = self.registry.get(name) else {
            return Err(self.fail(
                &format!("`{name}` is not callable"),
                codes::NOT_CALLABLE,
                None,
                CallableRef::named(name.to_owned()),
                args,
            ));
        };

        tracing::debug!(name, args = args.len(), "invoking");
        let callable = callable_for(function);

        let bound = match function.signature().bind(&args) {
            Ok(bound) => bound,
            Err(err) => {
                return Err(self.fail(
                    &format!("cannot invoke `{name}`"),
                    err.code(),
                    Some(Arc::new(err)),
                    callable,
                    args,
                ))
            }
        };

        match panic::catch_unwind(AssertUnwindSafe(|| function.call(&bound))) {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(cause)) => Err(self.fail(
                &format!("`{name}` failed"),
                codes::INTERNAL,
                Some(cause),
                callable,
                args,
            )),
            Err(payload) => Err(self.fail(
                &format!("`{name}` panicked"),
                codes::PANICKED,
                Some(Arc::new(Panicked::from_payload(payload))),
                callable,
                args,
            )),
        }
    }

    /// Runs `calls` in parallel. Results are in the same order as `calls`.
    pub fn invoke_batch(&self, calls: Vec<Call>) -> Vec<Result<Value, F::Error>> {
        tracing::info!(calls = calls.len(), "batch invocation");
        calls
            .into_par_iter()
            .map(|call| self.invoke(&call.name, call.args))
            .collect()
    }

    fn fail(
        &self,
        message: &str,
        code: i64,
        previous: Option<Cause>,
        callable: CallableRef,
        args: Args,
    ) -> F::Error {
        tracing::warn!(callable = %callable, code, error = message, "invocation failed");
        self.factory
            .create_invocation_error(message, code, previous, Some(callable), args)
    }
}

fn callable_for(function: &Arc<NativeFunction>) -> CallableRef {
    CallableRef::from_arc(Arc::clone(function)).with_label(function.name().to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::{self, BuiltinError};
    use crate::signature::{BindError, Param, ParamKind, Signature};
    use invocate_core::{args, ChainableError, InvocationError, InvocationFailure};
    use serde_json::json;

    fn invoker() -> Invoker {
        Invoker::new(builtins::standard().unwrap())
    }

    #[derive(Clone, Default)]
    struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failure_log_keeps_the_message_field_distinct() {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let _ = invoker().invoke("nope", args![]);
        });

        let bytes = captured.0.lock().unwrap().clone();
        let line = String::from_utf8(bytes).unwrap();
        assert!(line.contains("invocation failed"), "{line}");
        assert!(line.contains("error="), "{line}");
        assert!(line.contains("`nope` is not callable"), "{line}");
        assert!(line.contains("code=1"), "{line}");
        assert!(!line.contains("message="), "{line}");
    }

    #[test]
    fn successful_call_returns_the_value() {
        let value = invoker().invoke("concat", args!["a", "b", "sep" => "+"]).unwrap();
        assert_eq!(value, json!("a+b"));
    }

    #[test]
    fn unknown_name_is_not_callable() {
        let err = invoker().invoke("strlne", args!["abc"]).unwrap_err();
        assert_eq!(err.code(), codes::NOT_CALLABLE);
        assert_eq!(err.message(), "`strlne` is not callable");
        assert_eq!(err.callable().unwrap().label(), "strlne");
        assert_eq!(err.args(), &args!["abc"]);
        assert!(err.previous().is_none());
    }

    #[test]
    fn arity_failure_carries_the_registered_function() {
        let invoker = invoker();
        let err = invoker.invoke("strlen", args!["a", "b"]).unwrap_err();

        assert_eq!(err.code(), codes::ARITY_MISMATCH);
        let function = invoker.registry().get("strlen").unwrap();
        assert!(err.callable().unwrap().is(function));
        assert_eq!(err.args(), &args!["a", "b"]);
        let cause = err.previous().unwrap().downcast_ref::<BindError>().unwrap();
        assert!(matches!(cause, BindError::TooMany { expected: 1, found: 2 }));
    }

    #[test]
    fn type_failure() {
        let err = invoker().invoke("add", args![1, "two"]).unwrap_err();
        assert_eq!(err.code(), codes::TYPE_MISMATCH);
        assert_eq!(err.message(), "cannot invoke `add`");
    }

    #[test]
    fn internal_failure_keeps_the_body_error() {
        let err = invoker().invoke("divide", args![1, 0]).unwrap_err();
        assert_eq!(err.code(), codes::INTERNAL);
        assert_eq!(
            err.previous().unwrap().downcast_ref::<BuiltinError>(),
            Some(&BuiltinError::DivisionByZero)
        );
    }

    #[test]
    fn panics_are_caught() {
        let mut registry = Registry::new();
        registry
            .register(NativeFunction::new(
                "explode",
                Signature::new().param(Param::required("why", ParamKind::String)),
                |args| panic!("{}", args[0]),
            ))
            .unwrap();

        let err = Invoker::new(registry)
            .invoke("explode", args!["fuse"])
            .unwrap_err();
        assert_eq!(err.code(), codes::PANICKED);
        assert_eq!(err.previous().unwrap().to_string(), r#"panicked: "fuse""#);
    }

    #[test]
    fn custom_factory_translates_messages() {
        let factory = ErrorFactory::with_translator(|m: &str| m.to_uppercase());
        let invoker = Invoker::with_factory(builtins::standard().unwrap(), factory);
        let err = invoker.invoke("nope", Args::new()).unwrap_err();
        assert_eq!(err.message(), "`NOPE` IS NOT CALLABLE");
    }

    #[test]
    fn batch_preserves_order() {
        let calls = vec![
            Call::new("strlen", args!["four"]),
            Call::new("missing", Args::new()),
            Call::new("add", args![1, 2]),
        ];
        let results: Vec<Result<Value, InvocationError>> = invoker().invoke_batch(calls);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap(), &json!(4));
        assert_eq!(
            ChainableError::code(results[1].as_ref().unwrap_err()),
            codes::NOT_CALLABLE
        );
        assert_eq!(results[2].as_ref().unwrap(), &json!(3));
    }

    #[test]
    fn errors_satisfy_the_failure_contract() {
        fn check<E: InvocationFailure>(err: &E) -> usize {
            err.args().len()
        }
        let err = invoker().invoke("upper", args![]).unwrap_err();
        assert_eq!(check(&err), 0);
        assert_eq!(err.code(), codes::ARITY_MISMATCH);
    }
}
