//! Trigger operations.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;
use crate::value::{escape_value, Value};

use super::func::{create_function, FunctionOptions};
use super::DropOptions;

/// When the trigger fires relative to the triggering statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerTiming {
    /// `BEFORE`.
    Before,
    /// `AFTER`.
    After,
    /// `INSTEAD OF` (views only).
    InsteadOf,
}

impl TriggerTiming {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::InsteadOf => "INSTEAD OF",
        }
    }
}

/// Triggering event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriggerEvent {
    /// `INSERT`.
    Insert,
    /// `UPDATE`.
    Update,
    /// `DELETE`.
    Delete,
    /// `TRUNCATE`.
    Truncate,
}

impl TriggerEvent {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
        }
    }
}

/// Row- or statement-level firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TriggerLevel {
    /// `FOR EACH ROW`.
    Row,
    /// `FOR EACH STATEMENT` (the default).
    Statement,
}

/// Options for `CREATE TRIGGER`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerOptions {
    /// Firing time. Required.
    pub when: TriggerTiming,
    /// Triggering events, joined with `OR`. At least one required.
    pub operations: Vec<TriggerEvent>,
    /// Create a `CONSTRAINT TRIGGER`; requires `AFTER`.
    #[serde(default)]
    pub constraint: bool,
    /// Trigger function; defaults to the trigger's own name.
    #[serde(default)]
    pub function: Option<Name>,
    /// Arguments passed to the trigger function.
    #[serde(default)]
    pub function_params: Vec<Value>,
    /// Firing level.
    #[serde(default)]
    pub level: Option<TriggerLevel>,
    /// `WHEN` condition; not allowed with `INSTEAD OF`.
    #[serde(default)]
    pub condition: Option<String>,
    /// Constraint-trigger deferrability.
    #[serde(default)]
    pub deferrable: Option<bool>,
    /// Initially deferred.
    #[serde(default)]
    pub deferred: Option<bool>,
    /// Body for a trigger function created alongside the trigger. When
    /// set, a `CREATE FUNCTION` statement precedes the trigger and its
    /// return type is forced to `trigger`.
    #[serde(default)]
    pub definition: Option<String>,
    /// Options for the inline trigger function; ignored without
    /// `definition`.
    #[serde(default)]
    pub function_options: Option<FunctionOptions>,
}

/// Builds `CREATE TRIGGER`, preceded by `CREATE FUNCTION` when a
/// function body is supplied inline.
///
/// # Errors
///
/// At least one event is required; `INSTEAD OF` excludes a `WHEN`
/// condition; constraint triggers fire `AFTER` only. An inline
/// function body needs a language in `function_options`.
pub fn create_trigger(
    opts: &FormattingOptions,
    table: &Name,
    name: &str,
    options: &TriggerOptions,
) -> Result<Vec<String>> {
    if options.operations.is_empty() {
        return Err(CoreError::MissingParameter {
            operation: "createTrigger",
            parameter: "operations",
        });
    }
    if options.when == TriggerTiming::InsteadOf && options.condition.is_some() {
        return Err(CoreError::MutuallyExclusive {
            first: "INSTEAD OF",
            second: "condition",
        });
    }
    if options.constraint && options.when != TriggerTiming::After {
        return Err(CoreError::InvalidOption {
            operation: "createTrigger",
            message: "constraint triggers must fire AFTER".to_string(),
        });
    }

    let constraint = if options.constraint { " CONSTRAINT" } else { "" };
    let events: Vec<&str> = options
        .operations
        .iter()
        .map(|e| e.as_sql())
        .collect();
    let deferrable = match options.deferrable {
        Some(true) => format!(
            "\n  DEFERRABLE INITIALLY {}",
            if options.deferred == Some(true) {
                "DEFERRED"
            } else {
                "IMMEDIATE"
            }
        ),
        Some(false) => "\n  NOT DEFERRABLE".to_string(),
        None => String::new(),
    };
    let level = match options.level {
        Some(TriggerLevel::Row) => "ROW",
        Some(TriggerLevel::Statement) | None => "STATEMENT",
    };
    let condition = options
        .condition
        .as_ref()
        .map_or_else(String::new, |c| format!("\n  WHEN ({c})"));
    let function = options
        .function
        .clone()
        .unwrap_or_else(|| Name::new(name));
    let params: Vec<String> = options.function_params.iter().map(escape_value).collect();

    let mut statements = Vec::new();
    if let Some(body) = &options.definition {
        let mut function_options = options.function_options.clone().unwrap_or_default();
        function_options.returns = Some("trigger".to_string());
        statements.push(create_function(opts, &function, &[], &function_options, body)?);
    }
    statements.push(format!(
        "CREATE{constraint} TRIGGER {}\n  {} {} ON {}{deferrable}\n  FOR EACH {level}{condition}\n  EXECUTE PROCEDURE {}({});",
        opts.literal.render_str(name),
        options.when.as_sql(),
        events.join(" OR "),
        opts.literal.render(table),
        opts.literal.render(&function),
        params.join(", ")
    ));
    Ok(statements)
}

/// Builds `DROP TRIGGER`.
#[must_use]
pub fn drop_trigger(
    opts: &FormattingOptions,
    table: &Name,
    name: &str,
    options: DropOptions,
) -> String {
    format!(
        "DROP TRIGGER{} {} ON {}{};",
        options.if_exists_sql(),
        opts.literal.render_str(name),
        opts.literal.render(table),
        options.cascade_sql()
    )
}

/// Builds `ALTER TRIGGER .. RENAME TO`.
#[must_use]
pub fn rename_trigger(
    opts: &FormattingOptions,
    table: &Name,
    old_name: &str,
    new_name: &str,
) -> String {
    format!(
        "ALTER TRIGGER {} ON {} RENAME TO {};",
        opts.literal.render_str(old_name),
        opts.literal.render(table),
        opts.literal.render_str(new_name)
    )
}
