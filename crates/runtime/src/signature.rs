//! Declared parameters and argument binding.

use crate::codes;
use invocate_core::{ArgKey, Args, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

/// Accepted JSON shape of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Any,
    String,
    Number,
    Bool,
    Array,
    Object,
}

impl ParamKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            ParamKind::Any => true,
            ParamKind::String => value.is_string(),
            ParamKind::Number => value.is_number(),
            ParamKind::Bool => value.is_boolean(),
            ParamKind::Array => value.is_array(),
            ParamKind::Object => value.is_object(),
        }
    }

    /// Short name of the shape of `value`, for diagnostics.
    pub fn describe(value: &Value) -> &'static str {
        match value {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamKind::Any => "any",
            ParamKind::String => "string",
            ParamKind::Number => "number",
            ParamKind::Bool => "bool",
            ParamKind::Array => "array",
            ParamKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// One declared parameter. A parameter with a default is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Param {
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            default: None,
        }
    }

    pub fn optional(name: impl Into<String>, kind: ParamKind, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            kind,
            default: Some(default.into()),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.kind)?;
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

/// Ordered parameter list of a function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Signature {
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn required_count(&self) -> usize {
        self.params.iter().filter(|p| p.is_required()).count()
    }

    /// Resolves `args` against the declared parameters.
    ///
    /// Integer-keyed arguments fill parameters left to right in insertion
    /// order; string-keyed arguments bind by parameter name. Omitted
    /// optional parameters take their default. The result holds one value
    /// per parameter, in declaration order.
    pub fn bind(&self, args: &Args) -> Result<Vec<Value>, BindError> {
        let mut slots: Vec<Option<&Value>> = vec![None; self.params.len()];
        let mut next_positional = 0;

        for (key, value) in args {
            let index = match key {
                ArgKey::Index(_) => {
                    let index = next_positional;
                    next_positional += 1;
                    if index >= self.params.len() {
                        return Err(BindError::TooMany {
                            expected: self.params.len(),
                            found: args.positional().count(),
                        });
                    }
                    index
                }
                ArgKey::Name(name) => self
                    .params
                    .iter()
                    .position(|p| p.name == *name)
                    .ok_or_else(|| BindError::UnknownParam(name.clone()))?,
            };

            if slots[index].is_some() {
                return Err(BindError::BoundTwice(self.params[index].name.clone()));
            }
            slots[index] = Some(value);
        }

        self.params
            .iter()
            .zip(slots)
            .map(|(param, slot)| {
                let value = slot
                    .or(param.default.as_ref())
                    .ok_or_else(|| BindError::Missing(param.name.clone()))?;
                if !param.kind.accepts(value) {
                    return Err(BindError::Type {
                        param: param.name.clone(),
                        expected: param.kind,
                        found: ParamKind::describe(value),
                    });
                }
                Ok(value.clone())
            })
            .collect()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}

// ---------------------------------------------------------------------------
// Binding failures
// ---------------------------------------------------------------------------

/// Why a set of arguments does not fit a signature.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    #[error("expected at most {expected} positional arguments, got {found}")]
    TooMany { expected: usize, found: usize },

    #[error("unknown parameter `{0}`")]
    UnknownParam(String),

    #[error("parameter `{0}` bound more than once")]
    BoundTwice(String),

    #[error("missing required parameter `{0}`")]
    Missing(String),

    #[error("parameter `{param}` expects {expected}, got {found}")]
    Type {
        param: String,
        expected: ParamKind,
        found: &'static str,
    },
}

impl BindError {
    /// Invocation error code for this failure.
    pub fn code(&self) -> i64 {
        match self {
            BindError::Type { .. } => codes::TYPE_MISMATCH,
            _ => codes::ARITY_MISMATCH,
        }
    }
}
