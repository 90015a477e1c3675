//! Standard function set.

use crate::function::NativeFunction;
use crate::registry::{Registry, RegistryResult};
use crate::signature::{Param, ParamKind, Signature};
use invocate_core::{Cause, Value};
use std::sync::Arc;
use thiserror::Error;

/// Failures raised by builtin bodies. These become the `previous` cause of
/// the resulting invocation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuiltinError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("argument {0} has an unexpected shape")]
    Argument(usize),

    #[error("{0}")]
    Raised(String),
}

impl From<BuiltinError> for Cause {
    fn from(err: BuiltinError) -> Self {
        Arc::new(err)
    }
}

/// A registry holding every builtin.
pub fn standard() -> RegistryResult<Registry> {
    let mut registry = Registry::new();
    install(&mut registry)?;
    Ok(registry)
}

/// Registers the builtins into an existing registry.
pub fn install(registry: &mut Registry) -> RegistryResult<()> {
    registry.register(NativeFunction::new(
        "strlen",
        Signature::new().param(Param::required("text", ParamKind::String)),
        |args| Ok(Value::from(text(args, 0)?.len())),
    ))?;

    registry.register(NativeFunction::new(
        "upper",
        Signature::new().param(Param::required("text", ParamKind::String)),
        |args| Ok(Value::from(text(args, 0)?.to_uppercase())),
    ))?;

    registry.register(NativeFunction::new(
        "add",
        Signature::new()
            .param(Param::required("a", ParamKind::Number))
            .param(Param::required("b", ParamKind::Number)),
        add,
    ))?;

    registry.register(NativeFunction::new(
        "divide",
        Signature::new()
            .param(Param::required("dividend", ParamKind::Number))
            .param(Param::required("divisor", ParamKind::Number)),
        |args| {
            let divisor = number(args, 1)?;
            if divisor == 0.0 {
                return Err(BuiltinError::DivisionByZero.into());
            }
            Ok(Value::from(number(args, 0)? / divisor))
        },
    ))?;

    registry.register(NativeFunction::new(
        "concat",
        Signature::new()
            .param(Param::required("a", ParamKind::String))
            .param(Param::required("b", ParamKind::String))
            .param(Param::optional("sep", ParamKind::String, "")),
        |args| {
            let joined = format!("{}{}{}", text(args, 0)?, text(args, 2)?, text(args, 1)?);
            Ok(Value::from(joined))
        },
    ))?;

    registry.register(NativeFunction::new(
        "fail",
        Signature::new().param(Param::optional(
            "message",
            ParamKind::String,
            "failure requested",
        )),
        |args| Err(BuiltinError::Raised(text(args, 0)?.to_owned()).into()),
    ))?;

    Ok(())
}

fn add(args: &[Value]) -> Result<Value, Cause> {
    let (a, b) = (arg(args, 0)?, arg(args, 1)?);
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a
            .checked_add(b)
            .map(Value::from)
            .ok_or_else(|| BuiltinError::Overflow.into());
    }
    Ok(Value::from(number(args, 0)? + number(args, 1)?))
}

fn arg(args: &[Value], index: usize) -> Result<&Value, BuiltinError> {
    args.get(index).ok_or(BuiltinError::Argument(index))
}

fn text(args: &[Value], index: usize) -> Result<&str, BuiltinError> {
    arg(args, index)?
        .as_str()
        .ok_or(BuiltinError::Argument(index))
}

fn number(args: &[Value], index: usize) -> Result<f64, BuiltinError> {
    arg(args, index)?
        .as_f64()
        .ok_or(BuiltinError::Argument(index))
}
