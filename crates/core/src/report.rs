//! Serializable snapshot of an invocation error for logs and tooling.

use crate::args::Args;
use crate::chain::chain;
use crate::error::InvocationFailure;
use serde::{Deserialize, Serialize};

/// Flattened view of an [`InvocationFailure`] and its causes.
///
/// `causes` lists the messages of the `source()` chain in order, excluding
/// the reported error itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationReport {
    pub message: String,
    pub code: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub callable: Option<String>,
    pub args: Args,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub causes: Vec<String>,
}

impl InvocationReport {
    pub fn from_error<E: InvocationFailure>(err: &E) -> Self {
        Self {
            message: err.message().to_owned(),
            code: err.code(),
            callable: err.callable().map(|c| c.label().to_owned()),
            args: err.args().clone(),
            causes: chain(err).skip(1).map(|e| e.to_string()).collect(),
        }
    }

    /// Human-readable multi-line rendering.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "invocation failed [{}]: {}\n",
            self.code, self.message
        ));
        if let Some(callable) = &self.callable {
            out.push_str(&format!("  callable: {callable}\n"));
        }
        if !self.args.is_empty() {
            out.push_str("  args:\n");
            for (key, value) in &self.args {
                out.push_str(&format!("    {key} = {value}\n"));
            }
        }
        for (depth, cause) in self.causes.iter().enumerate() {
            out.push_str(&format!("  caused by ({}): {cause}\n", depth + 1));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{args, CallableRef, InvocationError};
    use std::sync::Arc;

    #[test]
    fn report_collects_the_cause_chain() {
        let root = Arc::new(std::io::Error::other("connection reset"));
        let inner = InvocationError::builder()
            .message("fetch failed")
            .code(4)
            .previous(root)
            .build();
        let outer = InvocationError::builder()
            .message("sync failed")
            .code(4)
            .previous(Arc::new(inner))
            .callable(CallableRef::named("sync"))
            .args(args!["remote", "retries" => 3])
            .build();

        let report = InvocationReport::from_error(&outer);
        assert_eq!(report.message, "sync failed");
        assert_eq!(report.callable.as_deref(), Some("sync"));
        assert_eq!(report.causes, ["fetch failed", "connection reset"]);
    }

    #[test]
    fn render_lists_args_in_order() {
        let err = InvocationError::builder()
            .message("bad arity")
            .code(2)
            .callable(CallableRef::named("strlen"))
            .args(args!["a", "k" => "b"])
            .build();

        let text = InvocationReport::from_error(&err).render();
        assert_eq!(
            text,
            "invocation failed [2]: bad arity\n  callable: strlen\n  args:\n    0 = \"a\"\n    k = \"b\"\n"
        );
    }

    #[test]
    fn json_omits_empty_parts() {
        let report = InvocationReport::from_error(&InvocationError::default());
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"message":"","code":0,"args":{}}"#);

        let back: InvocationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
