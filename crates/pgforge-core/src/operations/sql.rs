//! Raw SQL with placeholder substitution.

use crate::options::FormattingOptions;
use crate::template::{render_template, TemplateArg};

/// Renders a raw SQL template, substituting `{key}` placeholders, and
/// normalizes it to end with a single semicolon.
#[must_use]
pub fn run_sql(
    opts: &FormattingOptions,
    template: &str,
    mapping: &[(&str, TemplateArg)],
) -> String {
    let rendered = render_template(&opts.literal, template, mapping);
    let trimmed = rendered.trim_end();
    if trimmed.ends_with(';') {
        trimmed.to_string()
    } else {
        format!("{trimmed};")
    }
}
