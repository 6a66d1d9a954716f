//! Standalone constraint operations on existing tables.

use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::options::FormattingOptions;

use super::table::{parse_constraints, ConstraintOptions};
use super::{format_lines, DropOptions};

/// Argument to `ADD CONSTRAINT`: either a raw SQL body or structured
/// constraint options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintArg {
    /// Raw constraint body, e.g. `CHECK (price > 0)`.
    Expression(String),
    /// Structured constraint options.
    Options(ConstraintOptions),
}

impl From<&str> for ConstraintArg {
    fn from(expression: &str) -> Self {
        Self::Expression(expression.to_string())
    }
}

impl From<ConstraintOptions> for ConstraintArg {
    fn from(options: ConstraintOptions) -> Self {
        Self::Options(options)
    }
}

/// Builds `ALTER TABLE .. ADD CONSTRAINT` plus any comment statements.
///
/// A raw expression without a name is emitted as a bare `ADD <expr>`,
/// leaving the server to pick a constraint name.
#[must_use]
pub fn add_constraint(
    opts: &FormattingOptions,
    table: &Name,
    name: Option<&str>,
    constraint: &ConstraintArg,
) -> Vec<String> {
    let (lines, comments) = match constraint {
        ConstraintArg::Expression(expression) => {
            let line = name.map_or_else(
                || expression.clone(),
                |n| format!("CONSTRAINT {} {expression}", opts.literal.render_str(n)),
            );
            (vec![line], Vec::new())
        }
        ConstraintArg::Options(options) => parse_constraints(opts, table, options, name),
    };
    let actions: Vec<String> = lines.iter().map(|line| format!("ADD {line}")).collect();

    let mut statements = vec![format!(
        "ALTER TABLE {}\n{};",
        opts.literal.render(table),
        format_lines(&actions, "  ")
    )];
    statements.extend(comments);
    statements
}

/// Builds `ALTER TABLE .. DROP CONSTRAINT`.
#[must_use]
pub fn drop_constraint(
    opts: &FormattingOptions,
    table: &Name,
    name: &str,
    options: DropOptions,
) -> String {
    format!(
        "ALTER TABLE {} DROP CONSTRAINT{} {}{};",
        opts.literal.render(table),
        options.if_exists_sql(),
        opts.literal.render_str(name),
        options.cascade_sql()
    )
}

/// Builds `ALTER TABLE .. RENAME CONSTRAINT`.
#[must_use]
pub fn rename_constraint(
    opts: &FormattingOptions,
    table: &Name,
    old_name: &str,
    new_name: &str,
) -> String {
    format!(
        "ALTER TABLE {} RENAME CONSTRAINT {} TO {};",
        opts.literal.render(table),
        opts.literal.render_str(old_name),
        opts.literal.render_str(new_name)
    )
}
