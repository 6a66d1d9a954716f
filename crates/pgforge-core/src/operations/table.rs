//! Table operations: create, drop, rename, alter.
//!
//! This module also owns column-definition emission and table-constraint
//! parsing, which the column and constraint operations reuse.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;
use crate::typing::{resolve_type, ColumnSpec, MatchType, References, ReferentialAction};
use crate::value::escape_value;

use super::sequence::sequence_clauses;
use super::{format_lines, make_comment, DropOptions};

/// Foreign-key constraint spec for table-level constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyOptions {
    /// Referencing columns.
    pub columns: Vec<String>,
    /// Referenced table.
    pub references: Name,
    /// Referenced columns; empty means the referenced table's primary key.
    #[serde(default)]
    pub references_columns: Vec<String>,
    /// Match type clause.
    #[serde(default)]
    pub match_type: Option<MatchType>,
    /// `ON DELETE` action.
    #[serde(default)]
    pub on_delete: Option<ReferentialAction>,
    /// `ON UPDATE` action.
    #[serde(default)]
    pub on_update: Option<ReferentialAction>,
}

/// Table-level constraint specs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ConstraintOptions {
    /// Raw CHECK expressions.
    pub check: Vec<String>,
    /// Unique constraints, each over a column list.
    pub unique: Vec<Vec<String>>,
    /// Composite primary key columns.
    pub primary_key: Vec<String>,
    /// Raw EXCLUDE specification.
    pub exclude: Option<String>,
    /// Foreign keys.
    pub foreign_keys: Vec<ForeignKeyOptions>,
    /// Deferrability; `Some(false)` emits `NOT DEFERRABLE`.
    pub deferrable: Option<bool>,
    /// Initially deferred (only meaningful with `deferrable`).
    pub deferred: Option<bool>,
    /// Comment on the (explicitly named) constraint.
    pub comment: Option<String>,
}

impl ConstraintOptions {
    /// Returns true when no constraint of any kind is specified.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.check.is_empty()
            && self.unique.is_empty()
            && self.primary_key.is_empty()
            && self.exclude.is_none()
            && self.foreign_keys.is_empty()
    }
}

/// Options for `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableOptions {
    /// Create a temporary table.
    pub temporary: bool,
    /// Add `IF NOT EXISTS`.
    pub if_not_exists: bool,
    /// `INHERITS` parent table.
    pub inherits: Option<Name>,
    /// `LIKE` source table, emitted inside the column list.
    pub like: Option<Name>,
    /// Table-level constraints.
    pub constraints: ConstraintOptions,
    /// Table comment, emitted as a separate `COMMENT ON` statement.
    pub comment: Option<String>,
}

/// Row-level security actions for `ALTER TABLE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowSecurity {
    /// `DISABLE ROW LEVEL SECURITY`.
    Disable,
    /// `ENABLE ROW LEVEL SECURITY`.
    Enable,
    /// `FORCE ROW LEVEL SECURITY`.
    Force,
    /// `NO FORCE ROW LEVEL SECURITY`.
    NoForce,
}

impl RowSecurity {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Disable => "DISABLE",
            Self::Enable => "ENABLE",
            Self::Force => "FORCE",
            Self::NoForce => "NO FORCE",
        }
    }
}

/// Options for `ALTER TABLE`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterTableOptions {
    /// `SET UNLOGGED` / `SET LOGGED` (three-state).
    pub unlogged: Option<bool>,
    /// Row-level security action.
    pub level_security: Option<RowSecurity>,
}

pub(crate) struct ParsedColumns {
    /// One rendered line per column.
    pub lines: Vec<String>,
    /// Trailing `COMMENT ON` statements.
    pub comments: Vec<String>,
    /// Composite primary key synthesized from demoted column flags.
    pub primary_key: Vec<String>,
}

/// Renders the deferrability suffix for a constraint.
fn deferrable_suffix(deferrable: Option<bool>, deferred: Option<bool>) -> String {
    match deferrable {
        Some(true) => format!(
            " DEFERRABLE INITIALLY {}",
            if deferred == Some(true) {
                "DEFERRED"
            } else {
                "IMMEDIATE"
            }
        ),
        Some(false) => " NOT DEFERRABLE".to_string(),
        None => String::new(),
    }
}

/// Renders a column-level `REFERENCES` clause (without the CONSTRAINT
/// prefix).
fn references_clause(opts: &FormattingOptions, references: &References) -> Result<String> {
    let table = references
        .table
        .as_ref()
        .ok_or(CoreError::MissingParameter {
            operation: "references",
            parameter: "table",
        })?;
    let mut clause = format!("REFERENCES {}", opts.literal.render(table));
    if !references.columns.is_empty() {
        let columns: Vec<String> = references
            .columns
            .iter()
            .map(|c| opts.literal.render_str(c))
            .collect();
        clause.push_str(&format!(" ({})", columns.join(", ")));
    }
    if let Some(match_type) = references.match_type {
        clause.push_str(&format!(" MATCH {}", match_type.as_sql()));
    }
    if let Some(action) = references.on_delete {
        clause.push_str(&format!(" ON DELETE {}", action.as_sql()));
    }
    if let Some(action) = references.on_update {
        clause.push_str(&format!(" ON UPDATE {}", action.as_sql()));
    }
    Ok(clause)
}

/// Renders column definitions and collects their comments.
///
/// When more than one column carries the primary-key flag, the flags are
/// demoted and returned as a composite table-level primary key instead,
/// since column-level `PRIMARY KEY` cannot express composite keys.
pub(crate) fn parse_columns(
    opts: &FormattingOptions,
    table: &Name,
    columns: &[(String, ColumnSpec)],
) -> Result<ParsedColumns> {
    let resolved: Vec<(String, crate::typing::ColumnDefinition)> = columns
        .iter()
        .map(|(name, spec)| Ok((name.clone(), resolve_type(spec, &opts.shorthands)?)))
        .collect::<Result<_>>()?;

    let primary_key_count = resolved
        .iter()
        .filter(|(_, d)| d.primary_key == Some(true))
        .count();
    let demote = primary_key_count > 1;

    let mut lines = Vec::new();
    let mut comments = Vec::new();
    let mut primary_key = Vec::new();

    for (column_name, definition) in &resolved {
        let mut parts = vec![
            opts.literal.render_str(column_name),
            definition.type_name.clone(),
        ];
        if let Some(collation) = &definition.collation {
            parts.push(format!("COLLATE {collation}"));
        }
        if let Some(default) = &definition.default {
            parts.push(format!("DEFAULT {}", escape_value(default)));
        }
        if definition.unique == Some(true) {
            parts.push("UNIQUE".to_string());
        }
        if definition.primary_key == Some(true) {
            if demote {
                primary_key.push(column_name.clone());
            } else {
                parts.push("PRIMARY KEY".to_string());
            }
        }
        if definition.not_null == Some(true) {
            parts.push("NOT NULL".to_string());
        }
        if let Some(check) = &definition.check {
            parts.push(format!("CHECK ({check})"));
        }
        if let Some(references) = &definition.references {
            let clause = references_clause(opts, references)?;
            match &references.constraint_name {
                Some(constraint_name) => {
                    parts.push(format!(
                        "CONSTRAINT {} {clause}",
                        opts.literal.render_str(constraint_name)
                    ));
                    if let Some(comment) = &references.constraint_comment {
                        comments.push(make_comment(
                            "CONSTRAINT",
                            &format!(
                                "{} ON {}",
                                opts.literal.render_str(constraint_name),
                                opts.literal.render(table)
                            ),
                            Some(comment),
                        ));
                    }
                }
                None => parts.push(clause),
            }
        }
        let deferrable = deferrable_suffix(definition.deferrable, definition.deferred);
        if !deferrable.is_empty() {
            parts.push(deferrable.trim_start().to_string());
        }
        if let Some(identity) = &definition.identity {
            let precedence = identity
                .precedence
                .map_or("ALWAYS", crate::typing::IdentityPrecedence::as_sql);
            let clauses = sequence_clauses(opts, &identity.sequence);
            let clauses = if clauses.is_empty() {
                String::new()
            } else {
                format!(" ({})", clauses.join(" "))
            };
            parts.push(format!("GENERATED {precedence} AS IDENTITY{clauses}"));
        }
        if let Some(expression) = &definition.expression_generated {
            parts.push(format!("GENERATED ALWAYS AS ({expression}) STORED"));
        }
        lines.push(parts.join(" "));

        if let Some(comment) = &definition.comment {
            comments.push(make_comment(
                "COLUMN",
                &format!(
                    "{}.{}",
                    opts.literal.render(table),
                    opts.literal.render_str(column_name)
                ),
                Some(comment),
            ));
        }
    }

    Ok(ParsedColumns {
        lines,
        comments,
        primary_key,
    })
}

/// Renders table-level constraints and collects their comments.
///
/// Constraints without an explicit name get one derived from the table
/// name, the participating columns and a kind-specific suffix, so a later
/// drop/rename by the derived name is deterministic.
pub(crate) fn parse_constraints(
    opts: &FormattingOptions,
    table: &Name,
    constraints: &ConstraintOptions,
    explicit_name: Option<&str>,
) -> (Vec<String>, Vec<String>) {
    let deferrable = deferrable_suffix(constraints.deferrable, constraints.deferred);
    let mut lines = Vec::new();
    let mut comments = Vec::new();
    let mut named = |name: String, body: String| {
        lines.push(format!(
            "CONSTRAINT {} {body}{deferrable}",
            opts.literal.render_str(&name)
        ));
        if let Some(comment) = &constraints.comment {
            if explicit_name.is_some() {
                comments.push(make_comment(
                    "CONSTRAINT",
                    &format!(
                        "{} ON {}",
                        opts.literal.render_str(&name),
                        opts.literal.render(table)
                    ),
                    Some(comment),
                ));
            }
        }
    };

    let base = explicit_name.map_or_else(|| table.name.clone(), ToString::to_string);

    if constraints.check.len() == 1 {
        named(base.clone(), format!("CHECK ({})", constraints.check[0]));
    } else {
        for (i, check) in constraints.check.iter().enumerate() {
            named(format!("{base}{}", i + 1), format!("CHECK ({check})"));
        }
    }

    for unique_columns in &constraints.unique {
        let name = explicit_name.map_or_else(
            || format!("{}_uniq_{}", table.name, unique_columns.join("_")),
            ToString::to_string,
        );
        let columns: Vec<String> = unique_columns
            .iter()
            .map(|c| opts.literal.render_str(c))
            .collect();
        named(name, format!("UNIQUE ({})", columns.join(", ")));
    }

    if !constraints.primary_key.is_empty() {
        let name = explicit_name.map_or_else(|| format!("{}_pkey", table.name), ToString::to_string);
        let columns: Vec<String> = constraints
            .primary_key
            .iter()
            .map(|c| opts.literal.render_str(c))
            .collect();
        named(name, format!("PRIMARY KEY ({})", columns.join(", ")));
    }

    for foreign_key in &constraints.foreign_keys {
        let name = explicit_name.map_or_else(
            || format!("{}_fk_{}", table.name, foreign_key.columns.join("_")),
            ToString::to_string,
        );
        let columns: Vec<String> = foreign_key
            .columns
            .iter()
            .map(|c| opts.literal.render_str(c))
            .collect();
        let references = references_clause(
            opts,
            &References {
                table: Some(foreign_key.references.clone()),
                columns: foreign_key.references_columns.clone(),
                match_type: foreign_key.match_type,
                on_delete: foreign_key.on_delete,
                on_update: foreign_key.on_update,
                constraint_name: None,
                constraint_comment: None,
            },
        )
        .unwrap_or_default();
        named(
            name,
            format!("FOREIGN KEY ({}) {references}", columns.join(", ")),
        );
    }

    if let Some(exclude) = &constraints.exclude {
        let name =
            explicit_name.map_or_else(|| format!("{}_excl", table.name), ToString::to_string);
        named(name, format!("EXCLUDE {exclude}"));
    }

    (lines, comments)
}

/// Builds `CREATE TABLE` plus any `COMMENT ON` statements.
///
/// # Errors
///
/// Fails on unresolvable column types, and when a primary key is defined
/// both at table level and on columns.
pub fn create_table(
    opts: &FormattingOptions,
    name: &Name,
    columns: &[(String, ColumnSpec)],
    options: &TableOptions,
) -> Result<Vec<String>> {
    let parsed = parse_columns(opts, name, columns)?;

    let column_level_pk = !parsed.primary_key.is_empty()
        || columns.iter().any(|(_, spec)| {
            matches!(spec, ColumnSpec::Full(definition) if definition.primary_key == Some(true))
        });
    if !options.constraints.primary_key.is_empty() && column_level_pk {
        return Err(CoreError::DuplicateConstraint {
            table: name.name.clone(),
            kind: "primaryKey".to_string(),
        });
    }

    let mut constraints = options.constraints.clone();
    if !parsed.primary_key.is_empty() {
        constraints.primary_key.clone_from(&parsed.primary_key);
    }
    let (constraint_lines, constraint_comments) =
        parse_constraints(opts, name, &constraints, None);

    let mut definition_lines = parsed.lines;
    if let Some(like) = &options.like {
        definition_lines.push(format!("LIKE {}", opts.literal.render(like)));
    }
    definition_lines.extend(constraint_lines);

    let temporary = if options.temporary { " TEMPORARY" } else { "" };
    let if_not_exists = if options.if_not_exists {
        "IF NOT EXISTS "
    } else {
        ""
    };
    let inherits = options.inherits.as_ref().map_or_else(String::new, |parent| {
        format!(" INHERITS ({})", opts.literal.render(parent))
    });

    let mut statements = vec![format!(
        "CREATE{temporary} TABLE {if_not_exists}{} (\n{}\n){inherits};",
        opts.literal.render(name),
        format_lines(&definition_lines, "  "),
    )];
    if let Some(comment) = &options.comment {
        statements.push(make_comment(
            "TABLE",
            &opts.literal.render(name),
            Some(comment),
        ));
    }
    statements.extend(parsed.comments);
    statements.extend(constraint_comments);
    Ok(statements)
}

/// Builds `DROP TABLE`.
#[must_use]
pub fn drop_table(opts: &FormattingOptions, name: &Name, options: DropOptions) -> String {
    format!(
        "DROP TABLE{} {}{};",
        options.if_exists_sql(),
        opts.literal.render(name),
        options.cascade_sql()
    )
}

/// Builds `ALTER TABLE .. RENAME TO`.
#[must_use]
pub fn rename_table(opts: &FormattingOptions, name: &Name, new_name: &Name) -> String {
    format!(
        "ALTER TABLE {} RENAME TO {};",
        opts.literal.render(name),
        opts.literal.render(new_name)
    )
}

/// Builds `ALTER TABLE` for table-wide options.
///
/// # Errors
///
/// Fails when no alteration is specified.
pub fn alter_table(
    opts: &FormattingOptions,
    name: &Name,
    options: &AlterTableOptions,
) -> Result<String> {
    let mut actions = Vec::new();
    match options.unlogged {
        Some(true) => actions.push("SET UNLOGGED".to_string()),
        Some(false) => actions.push("SET LOGGED".to_string()),
        None => {}
    }
    if let Some(level_security) = options.level_security {
        actions.push(format!(
            "{} ROW LEVEL SECURITY",
            level_security.as_sql()
        ));
    }
    if actions.is_empty() {
        return Err(CoreError::InvalidOption {
            operation: "alterTable",
            message: "no alterations specified".to_string(),
        });
    }
    Ok(format!(
        "ALTER TABLE {}\n{};",
        opts.literal.render(name),
        format_lines(&actions, "  ")
    ))
}
