//! Object names and the identifier transform pipeline.
//!
//! Every schema object is addressed by a [`Name`], which is either a bare
//! identifier or a schema-qualified pair. Rendering a name to SQL goes
//! through an [`IdentWriter`], which applies the configured case fold and
//! quoting policy.

use serde::{Deserialize, Serialize};

/// A possibly schema-qualified object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    /// Schema the object lives in, if qualified.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub schema: Option<String>,
    /// The object name itself.
    pub name: String,
}

impl Name {
    /// Creates a bare (unqualified) name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Creates a schema-qualified name.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Name {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl From<(&str, &str)> for Name {
    fn from((schema, name): (&str, &str)) -> Self {
        Self::qualified(schema, name)
    }
}

/// Identifier rendering policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentPolicy {
    /// Fold camelCase identifiers to snake_case.
    pub fold_case: bool,
    /// Wrap identifiers in double quotes.
    pub quote: bool,
}

/// Renders [`Name`]s as SQL identifier text under a fixed [`IdentPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentWriter {
    policy: IdentPolicy,
}

impl IdentWriter {
    /// Creates a writer for the given policy.
    #[must_use]
    pub const fn new(policy: IdentPolicy) -> Self {
        Self { policy }
    }

    /// Renders a single identifier segment.
    #[must_use]
    pub fn render_str(&self, ident: &str) -> String {
        let folded = if self.policy.fold_case {
            decamelize(ident)
        } else {
            ident.to_string()
        };
        if self.policy.quote {
            quote_ident(&folded)
        } else {
            folded
        }
    }

    /// Renders a name, joining schema and name with a dot when qualified.
    #[must_use]
    pub fn render(&self, name: &Name) -> String {
        match &name.schema {
            Some(schema) => format!(
                "{}.{}",
                self.render_str(schema),
                self.render_str(&name.name)
            ),
            None => self.render_str(&name.name),
        }
    }
}

/// Wraps an identifier in double quotes, doubling embedded quotes.
#[must_use]
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Folds a camelCase identifier to snake_case.
///
/// Two passes over the character sequence, mirroring the two boundary
/// rules: a lowercase letter or digit followed by an uppercase letter, and
/// an uppercase run followed by an uppercase-then-lowercase pair. The
/// result is lowercased.
#[must_use]
pub fn decamelize(ident: &str) -> String {
    // Pass 1: split at lower/digit -> upper boundaries.
    let chars: Vec<char> = ident.chars().collect();
    let mut first = String::with_capacity(ident.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            if prev.is_lowercase() || prev.is_ascii_digit() {
                first.push('_');
            }
        }
        first.push(c);
    }

    // Pass 2: split an uppercase run before its final letter when that
    // letter starts a new lowercase word.
    let chars: Vec<char> = first.chars().collect();
    let mut second = String::with_capacity(first.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && i + 1 < chars.len() {
            let prev = chars[i - 1];
            let next = chars[i + 1];
            if c.is_uppercase() && prev.is_uppercase() && next.is_lowercase() && next.is_alphabetic()
            {
                second.push('_');
            }
        }
        second.push(c);
    }

    second.to_lowercase()
}
