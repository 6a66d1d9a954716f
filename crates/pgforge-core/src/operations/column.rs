//! Column operations: add, drop, rename, alter.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;
use crate::typing::{ColumnSpec, IdentityOptions, IdentityPrecedence};
use crate::value::{escape_value, Value};

use super::sequence::sequence_clauses;
use super::table::parse_columns;
use super::{format_lines, make_comment, DropOptions};

/// Options for `ALTER TABLE .. ADD COLUMN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddColumnsOptions {
    /// Add `IF NOT EXISTS` to each added column.
    pub if_not_exists: bool,
}

/// Per-column alterations for `ALTER TABLE .. ALTER COLUMN`.
///
/// Nested options distinguish "leave alone" from "reset": `default:
/// Some(None)` emits `DROP DEFAULT`, `default: None` emits nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterColumnOptions {
    /// New data type.
    #[serde(rename = "type")]
    pub type_name: Option<String>,
    /// `USING` expression for the type change.
    pub using: Option<String>,
    /// New collation, applied with the type change.
    pub collation: Option<String>,
    /// New default; `Some(None)` drops the default.
    pub default: Option<Option<Value>>,
    /// Set or drop NOT NULL.
    pub not_null: Option<bool>,
    /// Add or (`Some(None)`) drop an identity clause.
    pub sequence_generated: Option<Option<IdentityOptions>>,
    /// New column comment.
    pub comment: Option<String>,
}

/// Builds `ALTER TABLE .. ADD` for one or more columns, plus any
/// `COMMENT ON` statements the definitions carry.
///
/// # Errors
///
/// Fails on unresolvable column types.
pub fn add_columns(
    opts: &FormattingOptions,
    table: &Name,
    columns: &[(String, ColumnSpec)],
    options: AddColumnsOptions,
) -> Result<Vec<String>> {
    let parsed = parse_columns(opts, table, columns)?;
    let if_not_exists = if options.if_not_exists {
        "IF NOT EXISTS "
    } else {
        ""
    };
    let actions: Vec<String> = parsed
        .lines
        .iter()
        .map(|line| format!("ADD {if_not_exists}{line}"))
        .collect();

    let mut statements = vec![format!(
        "ALTER TABLE {}\n{};",
        opts.literal.render(table),
        format_lines(&actions, "  ")
    )];
    statements.extend(parsed.comments);
    Ok(statements)
}

/// Builds `ALTER TABLE .. DROP` for one or more columns.
#[must_use]
pub fn drop_columns(
    opts: &FormattingOptions,
    table: &Name,
    columns: &[String],
    options: DropOptions,
) -> String {
    let if_exists = if options.if_exists { "IF EXISTS " } else { "" };
    let cascade = if options.cascade { " CASCADE" } else { "" };
    let actions: Vec<String> = columns
        .iter()
        .map(|column| format!("DROP {if_exists}{}{cascade}", opts.literal.render_str(column)))
        .collect();
    format!(
        "ALTER TABLE {}\n{};",
        opts.literal.render(table),
        format_lines(&actions, "  ")
    )
}

/// Builds `ALTER TABLE .. RENAME COLUMN`.
#[must_use]
pub fn rename_column(
    opts: &FormattingOptions,
    table: &Name,
    old_name: &str,
    new_name: &str,
) -> String {
    format!(
        "ALTER TABLE {} RENAME {} TO {};",
        opts.literal.render(table),
        opts.literal.render_str(old_name),
        opts.literal.render_str(new_name)
    )
}

/// Builds `ALTER TABLE .. ALTER COLUMN` plus an optional `COMMENT ON`.
///
/// # Errors
///
/// Fails when no alteration is specified.
pub fn alter_column(
    opts: &FormattingOptions,
    table: &Name,
    column: &str,
    options: &AlterColumnOptions,
) -> Result<Vec<String>> {
    let column_ident = opts.literal.render_str(column);
    let mut actions = Vec::new();

    if let Some(type_name) = &options.type_name {
        let resolved = crate::typing::apply_type_adapters(type_name);
        let collation = options
            .collation
            .as_ref()
            .map_or_else(String::new, |c| format!(" COLLATE {c}"));
        let using = options
            .using
            .as_ref()
            .map_or_else(String::new, |u| format!(" USING {u}"));
        actions.push(format!(
            "ALTER {column_ident} SET DATA TYPE {resolved}{collation}{using}"
        ));
    }
    match &options.default {
        Some(Some(default)) => actions.push(format!(
            "ALTER {column_ident} SET DEFAULT {}",
            escape_value(default)
        )),
        Some(None) => actions.push(format!("ALTER {column_ident} DROP DEFAULT")),
        None => {}
    }
    match options.not_null {
        Some(true) => actions.push(format!("ALTER {column_ident} SET NOT NULL")),
        Some(false) => actions.push(format!("ALTER {column_ident} DROP NOT NULL")),
        None => {}
    }
    match &options.sequence_generated {
        Some(Some(identity)) => {
            let precedence = identity
                .precedence
                .map_or("ALWAYS", IdentityPrecedence::as_sql);
            let clauses = sequence_clauses(opts, &identity.sequence);
            let clauses = if clauses.is_empty() {
                String::new()
            } else {
                format!(" ({})", clauses.join(" "))
            };
            actions.push(format!(
                "ALTER {column_ident} ADD GENERATED {precedence} AS IDENTITY{clauses}"
            ));
        }
        Some(None) => actions.push(format!("ALTER {column_ident} DROP IDENTITY")),
        None => {}
    }

    if actions.is_empty() && options.comment.is_none() {
        return Err(CoreError::InvalidOption {
            operation: "alterColumn",
            message: "no alterations specified".to_string(),
        });
    }

    let mut statements = Vec::new();
    if !actions.is_empty() {
        statements.push(format!(
            "ALTER TABLE {}\n{};",
            opts.literal.render(table),
            format_lines(&actions, "  ")
        ));
    }
    if let Some(comment) = &options.comment {
        statements.push(make_comment(
            "COLUMN",
            &format!("{}.{column_ident}", opts.literal.render(table)),
            Some(comment),
        ));
    }
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_columns() {
        let opts = FormattingOptions::default();
        let statements = add_columns(
            &opts,
            &Name::new("users"),
            &[
                ("age".to_string(), ColumnSpec::from("integer")),
                ("bio".to_string(), ColumnSpec::from("text")),
            ],
            AddColumnsOptions::default(),
        )
        .unwrap();
        assert_eq!(
            statements,
            vec!["ALTER TABLE \"users\"\n  ADD \"age\" integer,\n  ADD \"bio\" text;".to_string()]
        );
    }

    #[test]
    fn test_add_columns_if_not_exists() {
        let opts = FormattingOptions::default();
        let statements = add_columns(
            &opts,
            &Name::new("users"),
            &[("age".to_string(), ColumnSpec::from("integer"))],
            AddColumnsOptions {
                if_not_exists: true,
            },
        )
        .unwrap();
        assert!(statements[0].contains("ADD IF NOT EXISTS \"age\" integer"));
    }

    #[test]
    fn test_drop_columns() {
        let opts = FormattingOptions::default();
        assert_eq!(
            drop_columns(
                &opts,
                &Name::new("users"),
                &["age".to_string(), "bio".to_string()],
                DropOptions {
                    if_exists: true,
                    cascade: false,
                }
            ),
            "ALTER TABLE \"users\"\n  DROP IF EXISTS \"age\",\n  DROP IF EXISTS \"bio\";"
        );
    }

    #[test]
    fn test_rename_column() {
        let opts = FormattingOptions::default();
        assert_eq!(
            rename_column(&opts, &Name::new("users"), "name", "full_name"),
            "ALTER TABLE \"users\" RENAME \"name\" TO \"full_name\";"
        );
    }

    #[test]
    fn test_alter_column_type_and_nullability() {
        let opts = FormattingOptions::default();
        let statements = alter_column(
            &opts,
            &Name::new("users"),
            "age",
            &AlterColumnOptions {
                type_name: Some("string".to_string()),
                using: Some("age::text".to_string()),
                not_null: Some(true),
                ..AlterColumnOptions::default()
            },
        )
        .unwrap();
        assert_eq!(
            statements,
            vec![
                "ALTER TABLE \"users\"\n  ALTER \"age\" SET DATA TYPE text USING age::text,\n  ALTER \"age\" SET NOT NULL;"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_alter_column_drop_default_and_identity() {
        let opts = FormattingOptions::default();
        let statements = alter_column(
            &opts,
            &Name::new("users"),
            "id",
            &AlterColumnOptions {
                default: Some(None),
                sequence_generated: Some(None),
                ..AlterColumnOptions::default()
            },
        )
        .unwrap();
        assert_eq!(
            statements,
            vec![
                "ALTER TABLE \"users\"\n  ALTER \"id\" DROP DEFAULT,\n  ALTER \"id\" DROP IDENTITY;"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_alter_column_comment_only() {
        let opts = FormattingOptions::default();
        let statements = alter_column(
            &opts,
            &Name::new("users"),
            "age",
            &AlterColumnOptions {
                comment: Some("age in years".to_string()),
                ..AlterColumnOptions::default()
            },
        )
        .unwrap();
        assert_eq!(
            statements,
            vec!["COMMENT ON COLUMN \"users\".\"age\" IS $pga$age in years$pga$;".to_string()]
        );
    }

    #[test]
    fn test_alter_column_rejects_empty_options() {
        let opts = FormattingOptions::default();
        assert!(
            alter_column(&opts, &Name::new("users"), "age", &AlterColumnOptions::default())
                .is_err()
        );
    }
}
