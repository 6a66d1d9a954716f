//! Column definitions and the type-shorthand resolution algorithm.
//!
//! A column's type may be written as a shorthand that expands, possibly
//! transitively, to a fuller definition. [`resolve_type`] follows that
//! chain, rejecting cycles, and finally applies a small fixed table of
//! convenience aliases to the terminal type name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::operations::sequence::SequenceOptions;
use crate::value::Value;

/// Referential action for `ON DELETE` / `ON UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferentialAction {
    /// Error if referenced rows still exist (checked at end of statement).
    NoAction,
    /// Error if referenced rows still exist (checked immediately).
    Restrict,
    /// Cascade the delete/update to referencing rows.
    Cascade,
    /// Set the referencing column to NULL.
    SetNull,
    /// Set the referencing column to its default.
    SetDefault,
}

impl ReferentialAction {
    /// SQL keyword text for the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// Foreign-key match type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchType {
    /// `MATCH FULL`.
    Full,
    /// `MATCH PARTIAL`.
    Partial,
    /// `MATCH SIMPLE`.
    Simple,
}

impl MatchType {
    /// SQL keyword text for the match type.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Full => "FULL",
            Self::Partial => "PARTIAL",
            Self::Simple => "SIMPLE",
        }
    }
}

/// Foreign-key reference attached to a single column.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct References {
    /// Referenced table.
    pub table: Option<Name>,
    /// Referenced columns; empty means the referenced table's primary key.
    pub columns: Vec<String>,
    /// Match type clause.
    pub match_type: Option<MatchType>,
    /// `ON DELETE` action.
    pub on_delete: Option<ReferentialAction>,
    /// `ON UPDATE` action.
    pub on_update: Option<ReferentialAction>,
    /// Explicit name for the generated foreign-key constraint.
    pub constraint_name: Option<String>,
    /// Comment attached to the generated constraint.
    pub constraint_comment: Option<String>,
}

/// Identity clause precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IdentityPrecedence {
    /// `GENERATED ALWAYS AS IDENTITY`.
    Always,
    /// `GENERATED BY DEFAULT AS IDENTITY`.
    ByDefault,
}

impl IdentityPrecedence {
    /// SQL keyword text for the precedence.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Always => "ALWAYS",
            Self::ByDefault => "BY DEFAULT",
        }
    }
}

/// Identity column specification.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IdentityOptions {
    /// Whether the identity is `ALWAYS` or `BY DEFAULT`.
    pub precedence: Option<IdentityPrecedence>,
    /// Options for the backing sequence.
    #[serde(flatten)]
    pub sequence: SequenceOptions,
}

/// A fully specifiable column definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// Base type name, possibly a shorthand before resolution.
    #[serde(rename = "type")]
    pub type_name: String,
    /// `COLLATE` clause.
    pub collation: Option<String>,
    /// Column-level UNIQUE constraint.
    pub unique: Option<bool>,
    /// Column-level PRIMARY KEY flag.
    pub primary_key: Option<bool>,
    /// NOT NULL flag.
    pub not_null: Option<bool>,
    /// Default value.
    pub default: Option<Value>,
    /// Raw CHECK expression.
    pub check: Option<String>,
    /// Foreign-key reference.
    pub references: Option<References>,
    /// Constraint deferrability; `Some(false)` emits `NOT DEFERRABLE`.
    pub deferrable: Option<bool>,
    /// Initially deferred (only meaningful with `deferrable`).
    pub deferred: Option<bool>,
    /// `GENERATED .. AS IDENTITY` clause.
    pub identity: Option<IdentityOptions>,
    /// `GENERATED ALWAYS AS (expr) STORED` clause.
    pub expression_generated: Option<String>,
    /// Column comment, emitted as a separate `COMMENT ON` statement.
    pub comment: Option<String>,
}

impl ColumnDefinition {
    /// Creates a definition carrying only a type name.
    #[must_use]
    pub fn of_type(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            ..Self::default()
        }
    }

    /// Fills every unset modifier from `shorthand`, leaving set fields
    /// (closer to the original request) untouched. The type name is
    /// tracked separately by the resolver.
    fn merge_from(&mut self, shorthand: &Self) {
        macro_rules! fill {
            ($($field:ident),*) => {
                $(if self.$field.is_none() {
                    self.$field = shorthand.$field.clone();
                })*
            };
        }
        fill!(
            collation,
            unique,
            primary_key,
            not_null,
            default,
            check,
            references,
            deferrable,
            deferred,
            identity,
            expression_generated,
            comment
        );
    }
}

/// A column type as written by the migration author: either a bare type
/// name or a full definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    /// Shorthand for `ColumnDefinition { type_name, .. }`.
    Type(String),
    /// Full definition.
    Full(ColumnDefinition),
}

impl From<&str> for ColumnSpec {
    fn from(type_name: &str) -> Self {
        Self::Type(type_name.to_string())
    }
}

impl From<ColumnDefinition> for ColumnSpec {
    fn from(definition: ColumnDefinition) -> Self {
        Self::Full(definition)
    }
}

impl ColumnSpec {
    fn to_definition(&self) -> ColumnDefinition {
        match self {
            Self::Type(type_name) => ColumnDefinition::of_type(type_name.clone()),
            Self::Full(definition) => definition.clone(),
        }
    }
}

/// User- and built-in type shorthands, merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TypeShorthands {
    entries: HashMap<String, ColumnDefinition>,
}

impl TypeShorthands {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in baseline: `id` expands to an auto-incrementing integer
    /// primary key.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        table.insert(
            "id",
            ColumnDefinition {
                type_name: "serial".to_string(),
                primary_key: Some(true),
                ..ColumnDefinition::default()
            },
        );
        table
    }

    /// Adds or overrides a shorthand.
    pub fn insert(&mut self, name: impl Into<String>, definition: ColumnDefinition) {
        self.entries.insert(name.into(), definition);
    }

    /// Merges `overrides` into this table, caller-supplied entries winning.
    #[must_use]
    pub fn merged_with(mut self, overrides: Self) -> Self {
        self.entries.extend(overrides.entries);
        self
    }

    /// Looks up a shorthand.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ColumnDefinition> {
        self.entries.get(name)
    }
}

/// Fixed aliases applied to the terminal type name after shorthand
/// resolution.
#[must_use]
pub fn apply_type_adapters(type_name: &str) -> String {
    match type_name {
        "int" => "integer",
        "string" => "text",
        "float" => "real",
        "double" => "double precision",
        "datetime" => "timestamp",
        "bool" => "boolean",
        other => other,
    }
    .to_string()
}

/// Expands a requested column type into a fully resolved definition.
///
/// The shorthand chain is followed transitively; fields closer to the
/// original request win on conflict. The chain must be acyclic.
///
/// # Errors
///
/// Returns [`CoreError::CyclicType`] when a type name reappears in its own
/// expansion chain, naming the full chain.
pub fn resolve_type(spec: &ColumnSpec, shorthands: &TypeShorthands) -> Result<ColumnDefinition> {
    let mut resolved = spec.to_definition();
    let mut chain = vec![resolved.type_name.clone()];

    while let Some(shorthand) = shorthands.get(chain.last().map_or("", String::as_str)) {
        resolved.merge_from(shorthand);
        if chain.contains(&shorthand.type_name) {
            chain.push(shorthand.type_name.clone());
            return Err(CoreError::CyclicType { chain });
        }
        chain.push(shorthand.type_name.clone());
        resolved.type_name.clone_from(&shorthand.type_name);
    }

    resolved.type_name = apply_type_adapters(&resolved.type_name);
    Ok(resolved)
}
