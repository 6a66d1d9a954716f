//! Lightweight `{placeholder}` substitution over SQL templates.

use crate::name::{IdentWriter, Name};
use crate::value::{escape_value, Value};

/// An argument bound to a template placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateArg {
    /// Rendered through the identifier transform.
    Ident(Name),
    /// Rendered through the value escaper.
    Value(Value),
    /// Rendered as nothing; "no value" is a valid, if unusual, input.
    Omitted,
}

impl From<Name> for TemplateArg {
    fn from(name: Name) -> Self {
        Self::Ident(name)
    }
}

impl From<&str> for TemplateArg {
    fn from(name: &str) -> Self {
        Self::Ident(Name::new(name))
    }
}

impl From<Value> for TemplateArg {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Substitutes `{key}` placeholders in `template`.
///
/// Identifiers go through `literal` (the quoting transform); other values
/// go through the value escaper. Placeholders with no mapping entry are
/// left as-is.
#[must_use]
pub fn render_template(
    literal: &IdentWriter,
    template: &str,
    mapping: &[(&str, TemplateArg)],
) -> String {
    let mut rendered = template.to_string();
    for (key, arg) in mapping {
        let replacement = match arg {
            TemplateArg::Ident(name) => literal.render(name),
            TemplateArg::Value(value) => escape_value(value),
            TemplateArg::Omitted => String::new(),
        };
        rendered = rendered.replace(&format!("{{{key}}}"), &replacement);
    }
    rendered
}
