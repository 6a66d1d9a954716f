//! Literal values and the value-escaping layer.
//!
//! [`Value`] models everything a migration author can pass where SQL
//! expects a literal. [`escape_value`] turns one into SQL literal text,
//! dollar-quoting strings with a delimiter tag picked so that it cannot
//! occur inside the string being quoted.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A raw SQL fragment to be emitted verbatim, bypassing escaping.
///
/// The marker field is part of the serialized form so the wrapper is
/// recognized structurally after a round-trip through JSON, not only by
/// its Rust type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PgLiteral {
    literal: bool,
    /// The raw fragment text.
    pub value: String,
}

impl PgLiteral {
    /// Wraps a raw SQL fragment.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            literal: true,
            value: value.into(),
        }
    }
}

/// A literal value in a migration definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL.
    Null,
    /// Boolean literal.
    Bool(bool),
    /// Integer literal, passed through unconverted.
    Int(i64),
    /// Floating-point literal, passed through unconverted.
    Float(f64),
    /// String literal; dollar-quoted on escape.
    String(String),
    /// Verbatim fragment; never escaped.
    Literal(PgLiteral),
    /// Array literal; renders as an `ARRAY[...]` constructor.
    Array(Vec<Value>),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<PgLiteral> for Value {
    fn from(l: PgLiteral) -> Self {
        Self::Literal(l)
    }
}

/// Infinite sequence of increasing-length alphabetic tags.
///
/// Yields all length-1 combinations first, then all length-2, and so on:
/// `a, b, .., z, aa, ab, ..`. A fresh generator is constructed per escape
/// call; it is never shared.
#[derive(Debug, Clone)]
pub struct TagGenerator {
    chars: Vec<char>,
    ids: Vec<usize>,
}

impl TagGenerator {
    /// Creates a generator over the given alphabet.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyAlphabet`] if the alphabet has no
    /// characters.
    pub fn with_alphabet(alphabet: &str) -> Result<Self> {
        let chars: Vec<char> = alphabet.chars().collect();
        if chars.is_empty() {
            return Err(CoreError::EmptyAlphabet);
        }
        Ok(Self {
            chars,
            ids: vec![0],
        })
    }

    fn increment(&mut self) {
        for id in self.ids.iter_mut().rev() {
            *id += 1;
            if *id < self.chars.len() {
                return;
            }
            *id = 0;
        }
        self.ids.insert(0, 0);
    }
}

impl Default for TagGenerator {
    fn default() -> Self {
        Self::with_alphabet("abcdefghijklmnopqrstuvwxyz").expect("default alphabet is non-empty")
    }
}

impl Iterator for TagGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let tag: String = self.ids.iter().map(|&id| self.chars[id]).collect();
        self.increment();
        Some(tag)
    }
}

/// Dollar-quotes a string with a delimiter that does not occur inside it.
#[must_use]
pub fn escape_string(s: &str) -> String {
    for tag in TagGenerator::default() {
        let delimiter = format!("$pg{tag}$");
        if !s.contains(&delimiter) {
            return format!("{delimiter}{s}{delimiter}");
        }
    }
    unreachable!("tag generator is infinite")
}

/// Converts a value into SQL literal text.
#[must_use]
pub fn escape_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) => escape_string(s),
        Value::Literal(l) => l.value.clone(),
        Value::Array(items) => {
            // Nested arrays render their own constructor keyword; strip it
            // from element output so only the outermost ARRAY remains.
            let elements = items
                .iter()
                .map(escape_value)
                .collect::<Vec<_>>()
                .join(",")
                .replace("ARRAY", "");
            format!("ARRAY[{elements}]")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_sequence() {
        let tags: Vec<String> = TagGenerator::default().take(28).collect();
        assert_eq!(tags[0], "a");
        assert_eq!(tags[1], "b");
        assert_eq!(tags[25], "z");
        assert_eq!(tags[26], "aa");
        assert_eq!(tags[27], "ab");
    }

    #[test]
    fn test_tag_sequence_length_rollover() {
        let mut generator = TagGenerator::with_alphabet("ab").unwrap();
        let tags: Vec<String> = generator.by_ref().take(7).collect();
        assert_eq!(tags, ["a", "b", "aa", "ab", "ba", "bb", "aaa"]);
    }

    #[test]
    fn test_empty_alphabet_rejected() {
        assert!(matches!(
            TagGenerator::with_alphabet(""),
            Err(CoreError::EmptyAlphabet)
        ));
    }

    #[test]
    fn test_escape_scalars() {
        assert_eq!(escape_value(&Value::Null), "NULL");
        assert_eq!(escape_value(&Value::Bool(true)), "true");
        assert_eq!(escape_value(&Value::Bool(false)), "false");
        assert_eq!(escape_value(&Value::Int(-7)), "-7");
        assert_eq!(escape_value(&Value::Float(1.5)), "1.5");
    }

    #[test]
    fn test_escape_string_dollar_quotes() {
        assert_eq!(escape_value(&Value::from("abc")), "$pga$abc$pga$");
    }

    #[test]
    fn test_escape_string_avoids_collision() {
        assert_eq!(
            escape_value(&Value::from("string with $pga$ inside")),
            "$pgb$string with $pga$ inside$pgb$"
        );
        assert_eq!(
            escape_value(&Value::from("$pga$ and $pgb$")),
            "$pgc$$pga$ and $pgb$$pgc$"
        );
    }

    #[test]
    fn test_escape_collision_freedom_over_many_tags() {
        // A string containing the first 30 candidate delimiters forces the
        // generator past the length-1 tags.
        let hostile: String = TagGenerator::default()
            .take(30)
            .map(|t| format!("$pg{t}$"))
            .collect();
        let escaped = escape_value(&Value::from(hostile.as_str()));
        let delimiter = escaped.split('$').nth(1).map(|t| format!("${t}$"));
        let delimiter = delimiter.unwrap();
        assert!(!hostile.contains(&delimiter));
        assert!(escaped.starts_with(&delimiter));
        assert!(escaped.ends_with(&delimiter));
    }

    #[test]
    fn test_escape_literal_passthrough() {
        let value = Value::Literal(PgLiteral::new("now()"));
        assert_eq!(escape_value(&value), "now()");
    }

    #[test]
    fn test_literal_survives_json_round_trip() {
        let value = Value::Literal(PgLiteral::new("DEFAULT"));
        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(escape_value(&back), "DEFAULT");
    }

    #[test]
    fn test_escape_nested_number_arrays() {
        let value = Value::Array(vec![
            Value::Array(vec![Value::Int(1)]),
            Value::Array(vec![Value::Int(2)]),
        ]);
        assert_eq!(escape_value(&value), "ARRAY[[1],[2]]");
    }

    #[test]
    fn test_escape_nested_string_arrays() {
        let value = Value::Array(vec![
            Value::Array(vec![Value::from("a")]),
            Value::Array(vec![Value::from("b")]),
        ]);
        // Each element is escaped with a fresh generator, so both pick the
        // first tag.
        assert_eq!(
            escape_value(&value),
            "ARRAY[[$pga$a$pga$],[$pga$b$pga$]]"
        );
    }
}
