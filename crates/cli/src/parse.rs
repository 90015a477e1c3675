//! Command-line argument parsing into [`Args`].

use invocate_core::{ArgKey, Args, Value};

/// Builds [`Args`] from `value` and `key=value` words.
///
/// A word is named when the text before the first `=` is a non-empty run of
/// ASCII letters, digits, and underscores. Values are parsed as JSON and fall
/// back to a plain string.
pub fn parse_args(words: &[String]) -> Args {
    let mut args = Args::new();
    for word in words {
        match split_named(word) {
            Some((key, raw)) => {
                args.insert(ArgKey::parse(key), parse_value(raw));
            }
            None => {
                args.push(parse_value(word));
            }
        }
    }
    args
}

fn split_named(word: &str) -> Option<(&str, &str)> {
    let (key, value) = word.split_once('=')?;
    let is_key = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    is_key.then_some((key, value))
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_owned()))
}
