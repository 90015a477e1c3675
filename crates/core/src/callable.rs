//! Opaque, identity-compared references to invocation targets.

use std::any::{type_name, Any};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Handle to whatever was being invoked when a failure occurred.
///
/// The target is held behind an `Arc` and is never called through this
/// handle. Clones share the target, so [`CallableRef::ptr_eq`] holds between
/// a handle and every clone of it.
#[derive(Clone)]
pub struct CallableRef {
    target: Arc<dyn Any + Send + Sync>,
    label: Cow<'static, str>,
}

impl CallableRef {
    /// Wraps `target`, labelling it with its type name.
    pub fn new<T: Any + Send + Sync>(target: T) -> Self {
        Self {
            target: Arc::new(target),
            label: Cow::Borrowed(type_name::<T>()),
        }
    }

    /// Shares an existing `Arc`; the handle points at the same allocation.
    pub fn from_arc<T: Any + Send + Sync>(target: Arc<T>) -> Self {
        Self {
            target,
            label: Cow::Borrowed(type_name::<T>()),
        }
    }

    /// A callable addressed by name only, such as an unresolved function name.
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        Self {
            target: Arc::new(name.clone().into_owned()),
            label: name,
        }
    }

    /// Replaces the display label, keeping identity.
    pub fn with_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = label.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// True when both handles point at the same target.
    pub fn ptr_eq(&self, other: &CallableRef) -> bool {
        Arc::ptr_eq(&self.target, &other.target)
    }

    /// True when this handle points at the allocation behind `target`.
    pub fn is<T: Any + Send + Sync>(&self, target: &Arc<T>) -> bool {
        let target: Arc<dyn Any + Send + Sync> = target.clone();
        Arc::ptr_eq(&self.target, &target)
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.target.downcast_ref::<T>()
    }
}

impl fmt::Debug for CallableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CallableRef").field(&self.label).finish()
    }
}

impl fmt::Display for CallableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}
