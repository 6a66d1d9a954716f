//! Extension operations. Each listed extension gets its own statement.

use serde::{Deserialize, Serialize};

use crate::options::FormattingOptions;

/// Options for `CREATE EXTENSION`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtensionOptions {
    /// Add `IF NOT EXISTS`.
    pub if_not_exists: bool,
    /// Install into this schema.
    pub schema: Option<String>,
}

/// Builds one `CREATE EXTENSION` statement per name.
#[must_use]
pub fn create_extension(
    opts: &FormattingOptions,
    extensions: &[String],
    options: &ExtensionOptions,
) -> Vec<String> {
    let if_not_exists = if options.if_not_exists {
        "IF NOT EXISTS "
    } else {
        ""
    };
    let schema = options.schema.as_ref().map_or_else(String::new, |s| {
        format!(" SCHEMA {}", opts.literal.render_str(s))
    });
    extensions
        .iter()
        .map(|extension| {
            format!(
                "CREATE EXTENSION {if_not_exists}{}{schema};",
                opts.literal.render_str(extension)
            )
        })
        .collect()
}

/// Builds one `DROP EXTENSION` statement per name.
#[must_use]
pub fn drop_extension(
    opts: &FormattingOptions,
    extensions: &[String],
    options: super::DropOptions,
) -> Vec<String> {
    extensions
        .iter()
        .map(|extension| {
            format!(
                "DROP EXTENSION{} {}{};",
                options.if_exists_sql(),
                opts.literal.render_str(extension),
                options.cascade_sql()
            )
        })
        .collect()
}
