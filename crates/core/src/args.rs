//! Argument collections attached to invocation errors.
//!
//! An [`Args`] keeps the exact shape a failed call was attempted with:
//! positional and named arguments may be mixed in one collection, and both
//! insertion order and key types survive untouched.

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Key of a single argument: an integer position or a parameter name.
///
/// String conversions normalise canonical decimal text (`"0"`, `"-3"`) to
/// [`ArgKey::Index`], so `"1"` and `1` address the same slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArgKey {
    Index(i64),
    Name(String),
}

impl ArgKey {
    /// Interprets `raw` as an index when it is canonical decimal, else as a name.
    pub fn parse(raw: &str) -> Self {
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => ArgKey::Index(n),
            _ => ArgKey::Name(raw.to_owned()),
        }
    }

    pub fn as_index(&self) -> Option<i64> {
        match self {
            ArgKey::Index(n) => Some(*n),
            ArgKey::Name(_) => None,
        }
    }

    pub fn as_name(&self) -> Option<&str> {
        match self {
            ArgKey::Index(_) => None,
            ArgKey::Name(name) => Some(name),
        }
    }
}

impl fmt::Display for ArgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgKey::Index(n) => write!(f, "{n}"),
            ArgKey::Name(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ArgKey {
    fn from(n: i64) -> Self {
        ArgKey::Index(n)
    }
}

impl From<i32> for ArgKey {
    fn from(n: i32) -> Self {
        ArgKey::Index(i64::from(n))
    }
}

impl From<usize> for ArgKey {
    fn from(n: usize) -> Self {
        ArgKey::Index(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

impl From<&str> for ArgKey {
    fn from(raw: &str) -> Self {
        ArgKey::parse(raw)
    }
}

impl From<String> for ArgKey {
    fn from(raw: String) -> Self {
        ArgKey::parse(&raw)
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// Inline storage for the common case of a handful of arguments.
type Entries = SmallVec<[(ArgKey, Value); 4]>;

/// Insertion-ordered argument collection with integer and string keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    entries: Entries,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `value` under the next free index: one past the greatest
    /// integer key present, or `0` when there is none.
    ///
    /// Returns the index used. When the greatest key is already `i64::MAX`
    /// there is no next index; the value is not stored and `None` is returned.
    pub fn push(&mut self, value: impl Into<Value>) -> Option<i64> {
        let index = self.next_index()?;
        self.entries.push((ArgKey::Index(index), value.into()));
        Some(index)
    }

    /// Sets `key` to `value`. An existing key keeps its position and the old
    /// value is returned; a new key is appended.
    pub fn insert(&mut self, key: impl Into<ArgKey>, value: impl Into<Value>) -> Option<Value> {
        let key = normalize(key.into());
        let value = value.into();
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: impl Into<ArgKey>) -> Option<&Value> {
        let key = normalize(key.into());
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArgKey, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &ArgKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Values stored under integer keys, in insertion order.
    pub fn positional(&self) -> impl Iterator<Item = &Value> {
        self.entries
            .iter()
            .filter(|(k, _)| k.as_index().is_some())
            .map(|(_, v)| v)
    }

    /// `(name, value)` pairs stored under string keys, in insertion order.
    pub fn named(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .filter_map(|(k, v)| k.as_name().map(|name| (name, v)))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn next_index(&self) -> Option<i64> {
        match self.entries.iter().filter_map(|(k, _)| k.as_index()).max() {
            Some(n) => n.checked_add(1),
            None => Some(0),
        }
    }
}

/// A `Name` holding canonical decimal text addresses the same slot as the
/// matching `Index`, so stored keys never collide once serialised.
fn normalize(key: ArgKey) -> ArgKey {
    match key {
        ArgKey::Name(name) => ArgKey::parse(&name),
        index => index,
    }
}

impl From<Vec<Value>> for Args {
    fn from(values: Vec<Value>) -> Self {
        let mut args = Args::new();
        for value in values {
            args.push(value);
        }
        args
    }
}

impl<K: Into<ArgKey>, V: Into<Value>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Args::new();
        args.extend(iter);
        args
    }
}

impl<K: Into<ArgKey>, V: Into<Value>> Extend<(K, V)> for Args {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

type Split<'a> = fn(&'a (ArgKey, Value)) -> (&'a ArgKey, &'a Value);

impl<'a> IntoIterator for &'a Args {
    type Item = (&'a ArgKey, &'a Value);
    type IntoIter = std::iter::Map<std::slice::Iter<'a, (ArgKey, Value)>, Split<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        let split: Split<'a> = |(k, v)| (k, v);
        self.entries.iter().map(split)
    }
}

// ---------------------------------------------------------------------------
// Serde
// ---------------------------------------------------------------------------

/// Serialized as a map in insertion order; integer keys become decimal text.
impl Serialize for Args {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(&key.to_string(), value)?;
        }
        map.end()
    }
}

/// Accepts a map (keys parsed with [`ArgKey::parse`]) or a plain sequence of
/// positional values.
impl<'de> Deserialize<'de> for Args {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ArgsVisitor;

        impl<'de> Visitor<'de> for ArgsVisitor {
            type Value = Args;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of arguments or a sequence of positional arguments")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Args, A::Error> {
                let mut args = Args::new();
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    args.insert(ArgKey::parse(&key), value);
                }
                Ok(args)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Args, A::Error> {
                let mut args = Args::new();
                while let Some(value) = access.next_element::<Value>()? {
                    args.push(value);
                }
                Ok(args)
            }
        }

        deserializer.deserialize_any(ArgsVisitor)
    }
}

// ---------------------------------------------------------------------------
// Macro
// ---------------------------------------------------------------------------

/// Builds an [`Args`] from positional values and `key => value` pairs.
///
/// ```
/// use invocate_core::args;
///
/// let args = args!["x", "k" => "y", 7];
/// assert_eq!(args.len(), 3);
/// assert_eq!(args.get(1), Some(&serde_json::json!(7)));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($tail:tt)+) => {{
        let mut args = $crate::Args::new();
        $crate::__args_push!(args; $($tail)+);
        args
    }};
}

#[doc(hidden)]
#[macro_export]
macro_rules! __args_push {
    ($args:ident;) => {};
    ($args:ident; $key:literal => $value:expr $(, $($rest:tt)*)?) => {
        $args.insert($key, $value);
        $crate::__args_push!($args; $($($rest)*)?);
    };
    ($args:ident; $value:expr $(, $($rest:tt)*)?) => {
        $args.push($value);
        $crate::__args_push!($args; $($($rest)*)?);
    };
}
