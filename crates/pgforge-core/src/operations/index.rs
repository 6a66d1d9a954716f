//! Index operations.
//!
//! Index names may be derived from the table and column names, so create
//! and drop agree on the name without the caller repeating it.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;

use super::DropOptions;

/// Sort direction for an index column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

/// Null placement for an index column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NullsPlacement {
    /// `NULLS FIRST`.
    First,
    /// `NULLS LAST`.
    Last,
}

/// A single indexed column or expression with per-column modifiers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexColumnOptions {
    /// Column name or raw expression.
    pub name: String,
    /// Operator class.
    pub opclass: Option<Name>,
    /// Sort direction.
    pub sort: Option<SortOrder>,
    /// Null placement.
    pub nulls: Option<NullsPlacement>,
}

/// An indexed column: a bare name or a name with modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexColumn {
    /// Bare column name or expression.
    Name(String),
    /// Column with per-column modifiers.
    Options(IndexColumnOptions),
}

impl From<&str> for IndexColumn {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl IndexColumn {
    fn name(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Options(options) => &options.name,
        }
    }
}

/// Options for `CREATE INDEX`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexOptions {
    /// Explicit index name; derived from table and columns when absent.
    pub name: Option<String>,
    /// Create a unique index.
    pub unique: bool,
    /// Build the index without locking writes. The statement cannot run
    /// inside a transaction.
    pub concurrently: bool,
    /// Add `IF NOT EXISTS`.
    pub if_not_exists: bool,
    /// Index method for `USING`, e.g. `gin`.
    pub method: Option<String>,
    /// Partial-index predicate.
    #[serde(rename = "where")]
    pub where_clause: Option<String>,
    /// Non-key `INCLUDE` columns.
    pub include: Vec<String>,
    /// Index-wide operator class, applied to the last column. Deprecated,
    /// set `opclass` on the index column instead; emits a warning when used.
    pub opclass: Option<Name>,
}

/// A column name containing whitespace, parens or a dot past the first
/// character is treated as a raw expression and left unquoted.
fn is_expression(name: &str) -> bool {
    name.char_indices()
        .any(|(i, c)| i >= 1 && (c.is_whitespace() || c == '(' || c == ')' || c == '.'))
}

fn render_index_column(opts: &FormattingOptions, column: &IndexColumn) -> String {
    let name = column.name();
    let mut rendered = if is_expression(name) {
        name.to_string()
    } else {
        opts.literal.render_str(name)
    };
    if let IndexColumn::Options(options) = column {
        if let Some(opclass) = &options.opclass {
            rendered.push_str(&format!(" {}", opts.schemalize.render(opclass)));
        }
        if let Some(sort) = options.sort {
            rendered.push_str(match sort {
                SortOrder::Asc => " ASC",
                SortOrder::Desc => " DESC",
            });
        }
        if let Some(nulls) = options.nulls {
            rendered.push_str(match nulls {
                NullsPlacement::First => " NULLS FIRST",
                NullsPlacement::Last => " NULLS LAST",
            });
        }
    }
    rendered
}

/// Resolves the index name, deriving `{table}_{columns}[_unique]_index`
/// when no explicit name was given.
///
/// # Errors
///
/// Derivation needs plain column names; an expression column without an
/// explicit index name is an error.
fn index_name(
    table: &Name,
    columns: &[IndexColumn],
    name: Option<&str>,
    unique: bool,
) -> Result<Name> {
    let name = match name {
        Some(name) => name.to_string(),
        None => {
            if columns.iter().any(|c| is_expression(c.name())) {
                return Err(CoreError::MissingParameter {
                    operation: "createIndex",
                    parameter: "name",
                });
            }
            let column_names: Vec<&str> = columns.iter().map(IndexColumn::name).collect();
            let suffix = if unique { "_unique_index" } else { "_index" };
            format!("{}_{}{suffix}", table.name, column_names.join("_"))
        }
    };
    Ok(match &table.schema {
        Some(schema) => Name::qualified(schema.clone(), name),
        None => Name::new(name),
    })
}

/// Builds `CREATE INDEX`.
///
/// # Errors
///
/// Fails when the name cannot be derived from an expression column.
pub fn create_index(
    opts: &FormattingOptions,
    table: &Name,
    columns: &[IndexColumn],
    options: &IndexOptions,
) -> Result<String> {
    let name = index_name(table, columns, options.name.as_deref(), options.unique)?;

    let mut rendered: Vec<String> = columns
        .iter()
        .map(|column| render_index_column(opts, column))
        .collect();
    if let Some(opclass) = &options.opclass {
        tracing::warn!(
            opclass = %opts.schemalize.render(opclass),
            "index-wide opclass is deprecated, set it on the index column"
        );
        if let Some(last) = rendered.last_mut() {
            last.push_str(&format!(" {}", opts.schemalize.render(opclass)));
        }
    }

    let unique = if options.unique { " UNIQUE" } else { "" };
    let concurrently = if options.concurrently {
        " CONCURRENTLY"
    } else {
        ""
    };
    let if_not_exists = if options.if_not_exists {
        "IF NOT EXISTS "
    } else {
        ""
    };
    let method = options
        .method
        .as_ref()
        .map_or_else(String::new, |m| format!(" USING {m}"));
    let include = if options.include.is_empty() {
        String::new()
    } else {
        let columns: Vec<String> = options
            .include
            .iter()
            .map(|c| opts.literal.render_str(c))
            .collect();
        format!(" INCLUDE ({})", columns.join(", "))
    };
    let where_clause = options
        .where_clause
        .as_ref()
        .map_or_else(String::new, |w| format!(" WHERE {w}"));

    Ok(format!(
        "CREATE{unique} INDEX{concurrently} {if_not_exists}{} ON {}{method} ({}){include}{where_clause};",
        // Index names never carry a schema in CREATE INDEX.
        opts.literal.render_str(&name.name),
        opts.literal.render(table),
        rendered.join(", ")
    ))
}

/// Builds `DROP INDEX`, deriving the name the same way as [`create_index`].
///
/// # Errors
///
/// Fails when the name cannot be derived from an expression column.
pub fn drop_index(
    opts: &FormattingOptions,
    table: &Name,
    columns: &[IndexColumn],
    options: &IndexOptions,
    drop: DropOptions,
) -> Result<String> {
    let name = index_name(table, columns, options.name.as_deref(), options.unique)?;
    let concurrently = if options.concurrently {
        " CONCURRENTLY"
    } else {
        ""
    };
    Ok(format!(
        "DROP INDEX{concurrently}{} {}{};",
        drop.if_exists_sql(),
        opts.literal.render(&name),
        drop.cascade_sql()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_index_derived_name() {
        let opts = FormattingOptions::default();
        let sql = create_index(
            &opts,
            &Name::new("users"),
            &[IndexColumn::from("email")],
            &IndexOptions::default(),
        )
        .unwrap();
        assert_eq!(sql, "CREATE INDEX \"users_email_index\" ON \"users\" (\"email\");");
    }

    #[test]
    fn test_create_unique_index_name_suffix() {
        let opts = FormattingOptions::default();
        let sql = create_index(
            &opts,
            &Name::new("users"),
            &[IndexColumn::from("email"), IndexColumn::from("tenant")],
            &IndexOptions {
                unique: true,
                ..IndexOptions::default()
            },
        )
        .unwrap();
        assert_eq!(
            sql,
            "CREATE UNIQUE INDEX \"users_email_tenant_unique_index\" ON \"users\" (\"email\", \"tenant\");"
        );
    }

    #[test]
    fn test_expression_column_left_unquoted() {
        let opts = FormattingOptions::default();
        let sql = create_index(
            &opts,
            &Name::new("users"),
            &[IndexColumn::from("lower(email)")],
            &IndexOptions {
                name: Some("users_lower_email_index".to_string()),
                ..IndexOptions::default()
            },
        )
        .unwrap();
        assert!(sql.contains("(lower(email))"));
    }

    #[test]
    fn test_leading_paren_is_still_a_column() {
        // The heuristic only looks past the first character.
        assert!(!is_expression("(odd"));
        assert!(is_expression("a b"));
        assert!(is_expression("tbl.col"));
    }

    #[test]
    fn test_expression_column_requires_explicit_name() {
        let opts = FormattingOptions::default();
        let err = create_index(
            &opts,
            &Name::new("users"),
            &[IndexColumn::from("lower(email)")],
            &IndexOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::MissingParameter { .. }));
    }

    #[test]
    fn test_create_index_full_options() {
        let opts = FormattingOptions::default();
        let sql = create_index(
            &opts,
            &Name::qualified("app", "docs"),
            &[IndexColumn::Options(IndexColumnOptions {
                name: "body".to_string(),
                opclass: None,
                sort: Some(SortOrder::Desc),
                nulls: Some(NullsPlacement::Last),
            })],
            &IndexOptions {
                concurrently: true,
                if_not_exists: true,
                method: Some("gin".to_string()),
                where_clause: Some("deleted_at IS NULL".to_string()),
                include: vec!["title".to_string()],
                ..IndexOptions::default()
            },
        )
        .unwrap();
        assert_eq!(
            sql,
            "CREATE INDEX CONCURRENTLY IF NOT EXISTS \"docs_body_index\" ON \"app\".\"docs\" USING gin (\"body\" DESC NULLS LAST) INCLUDE (\"title\") WHERE deleted_at IS NULL;"
        );
    }

    #[test]
    fn test_drop_index_schema_qualified() {
        let opts = FormattingOptions::default();
        let sql = drop_index(
            &opts,
            &Name::qualified("app", "users"),
            &[IndexColumn::from("email")],
            &IndexOptions::default(),
            DropOptions {
                if_exists: true,
                cascade: false,
            },
        )
        .unwrap();
        assert_eq!(sql, "DROP INDEX IF EXISTS \"app\".\"users_email_index\";");
    }
}
