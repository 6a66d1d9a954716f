//! Materialized-view operations.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;

use super::DropOptions;

/// Options for `CREATE MATERIALIZED VIEW`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaterializedViewOptions {
    /// Add `IF NOT EXISTS`.
    pub if_not_exists: bool,
    /// Explicit output column names.
    pub columns: Vec<String>,
    /// `TABLESPACE` clause.
    pub tablespace: Option<String>,
    /// Storage parameters for `WITH (..)`, as `key` or `key = value`.
    pub storage_parameters: Vec<(String, Option<String>)>,
    /// `WITH DATA` / `WITH NO DATA` (three-state).
    pub data: Option<bool>,
}

/// Options for `ALTER MATERIALIZED VIEW`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterMaterializedViewOptions {
    /// `CLUSTER ON index` when `Some(Some(..))`, `SET WITHOUT CLUSTER`
    /// when `Some(None)`.
    pub cluster: Option<Option<String>>,
    /// Storage parameters for `SET (..)`, as `key` or `key = value`.
    pub set_storage_parameters: Vec<(String, Option<String>)>,
    /// Storage parameter names for `RESET (..)`.
    pub reset_storage_parameters: Vec<String>,
}

/// Options for `REFRESH MATERIALIZED VIEW`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RefreshOptions {
    /// Refresh without locking reads. The statement cannot run inside a
    /// transaction.
    pub concurrently: bool,
    /// `WITH DATA` / `WITH NO DATA` (three-state).
    pub data: Option<bool>,
}

fn storage_parameters_sql(parameters: &[(String, Option<String>)]) -> String {
    if parameters.is_empty() {
        return String::new();
    }
    let rendered: Vec<String> = parameters
        .iter()
        .map(|(key, value)| {
            value
                .as_ref()
                .map_or_else(|| key.clone(), |v| format!("{key} = {v}"))
        })
        .collect();
    format!(" WITH ({})", rendered.join(", "))
}

const fn data_sql(data: Option<bool>) -> &'static str {
    match data {
        Some(true) => " WITH DATA",
        Some(false) => " WITH NO DATA",
        None => "",
    }
}

/// Builds `CREATE MATERIALIZED VIEW`.
#[must_use]
pub fn create_materialized_view(
    opts: &FormattingOptions,
    name: &Name,
    options: &MaterializedViewOptions,
    definition: &str,
) -> String {
    let if_not_exists = if options.if_not_exists {
        "IF NOT EXISTS "
    } else {
        ""
    };
    let columns = if options.columns.is_empty() {
        String::new()
    } else {
        let columns: Vec<String> = options
            .columns
            .iter()
            .map(|c| opts.literal.render_str(c))
            .collect();
        format!(" ({})", columns.join(", "))
    };
    let tablespace = options
        .tablespace
        .as_ref()
        .map_or_else(String::new, |t| format!(" TABLESPACE {t}"));
    format!(
        "CREATE MATERIALIZED VIEW {if_not_exists}{}{columns}{}{tablespace} AS {definition}{};",
        opts.literal.render(name),
        storage_parameters_sql(&options.storage_parameters),
        data_sql(options.data)
    )
}

/// Builds `ALTER MATERIALIZED VIEW` with clustering and storage-parameter
/// actions.
///
/// # Errors
///
/// At least one action is required.
pub fn alter_materialized_view(
    opts: &FormattingOptions,
    name: &Name,
    options: &AlterMaterializedViewOptions,
) -> Result<String> {
    let mut actions = Vec::new();
    match &options.cluster {
        Some(Some(index)) => actions.push(format!("CLUSTER ON {}", opts.literal.render_str(index))),
        Some(None) => actions.push("SET WITHOUT CLUSTER".to_string()),
        None => {}
    }
    if !options.set_storage_parameters.is_empty() {
        let rendered: Vec<String> = options
            .set_storage_parameters
            .iter()
            .map(|(key, value)| {
                value
                    .as_ref()
                    .map_or_else(|| key.clone(), |v| format!("{key} = {v}"))
            })
            .collect();
        actions.push(format!("SET ({})", rendered.join(", ")));
    }
    if !options.reset_storage_parameters.is_empty() {
        actions.push(format!(
            "RESET ({})",
            options.reset_storage_parameters.join(", ")
        ));
    }
    if actions.is_empty() {
        return Err(CoreError::InvalidOption {
            operation: "alterMaterializedView",
            message: "no alterations specified".to_string(),
        });
    }
    Ok(format!(
        "ALTER MATERIALIZED VIEW {}\n  {};",
        opts.literal.render(name),
        actions.join(",\n  ")
    ))
}

/// Builds `REFRESH MATERIALIZED VIEW`. Refreshing is its own inverse.
#[must_use]
pub fn refresh_materialized_view(
    opts: &FormattingOptions,
    name: &Name,
    options: RefreshOptions,
) -> String {
    let concurrently = if options.concurrently {
        " CONCURRENTLY"
    } else {
        ""
    };
    format!(
        "REFRESH MATERIALIZED VIEW{concurrently} {}{};",
        opts.literal.render(name),
        data_sql(options.data)
    )
}

/// Builds `DROP MATERIALIZED VIEW`.
#[must_use]
pub fn drop_materialized_view(
    opts: &FormattingOptions,
    name: &Name,
    options: DropOptions,
) -> String {
    format!(
        "DROP MATERIALIZED VIEW{} {}{};",
        options.if_exists_sql(),
        opts.literal.render(name),
        options.cascade_sql()
    )
}

/// Builds `ALTER MATERIALIZED VIEW .. RENAME TO`.
#[must_use]
pub fn rename_materialized_view(
    opts: &FormattingOptions,
    name: &Name,
    new_name: &Name,
) -> String {
    format!(
        "ALTER MATERIALIZED VIEW {} RENAME TO {};",
        opts.literal.render(name),
        opts.literal.render(new_name)
    )
}
