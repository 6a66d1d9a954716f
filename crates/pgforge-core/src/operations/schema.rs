//! Schema operations. Schema names are single identifiers, never
//! qualified.

use serde::{Deserialize, Serialize};

use crate::options::FormattingOptions;

use super::DropOptions;

/// Options for `CREATE SCHEMA`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SchemaOptions {
    /// Add `IF NOT EXISTS`.
    pub if_not_exists: bool,
    /// `AUTHORIZATION` role.
    pub authorization: Option<String>,
}

/// Builds `CREATE SCHEMA`.
#[must_use]
pub fn create_schema(opts: &FormattingOptions, name: &str, options: &SchemaOptions) -> String {
    let if_not_exists = if options.if_not_exists {
        "IF NOT EXISTS "
    } else {
        ""
    };
    let authorization = options
        .authorization
        .as_ref()
        .map_or_else(String::new, |role| {
            format!(" AUTHORIZATION {}", opts.literal.render_str(role))
        });
    format!(
        "CREATE SCHEMA {if_not_exists}{}{authorization};",
        opts.literal.render_str(name)
    )
}

/// Builds `DROP SCHEMA`.
#[must_use]
pub fn drop_schema(opts: &FormattingOptions, name: &str, options: DropOptions) -> String {
    format!(
        "DROP SCHEMA{} {}{};",
        options.if_exists_sql(),
        opts.literal.render_str(name),
        options.cascade_sql()
    )
}

/// Builds `ALTER SCHEMA .. RENAME TO`.
#[must_use]
pub fn rename_schema(opts: &FormattingOptions, name: &str, new_name: &str) -> String {
    format!(
        "ALTER SCHEMA {} RENAME TO {};",
        opts.literal.render_str(name),
        opts.literal.render_str(new_name)
    )
}
