//! Domain operations.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;
use crate::value::{escape_value, Value};

use super::DropOptions;

/// Options for `CREATE DOMAIN`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DomainOptions {
    /// `COLLATE` clause.
    pub collation: Option<String>,
    /// Default value.
    pub default: Option<Value>,
    /// NOT NULL flag.
    pub not_null: Option<bool>,
    /// CHECK expression; exclusive with `not_null`.
    pub check: Option<String>,
    /// Name for the generated constraint.
    pub constraint_name: Option<String>,
}

/// Options for `ALTER DOMAIN`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterDomainOptions {
    /// New default; `Some(None)` drops the default.
    pub default: Option<Option<Value>>,
    /// Set or drop NOT NULL.
    pub not_null: Option<bool>,
    /// New CHECK constraint to add.
    pub check: Option<String>,
    /// Name for the added constraint.
    pub constraint_name: Option<String>,
}

fn constraint_clause(
    opts: &FormattingOptions,
    options_not_null: Option<bool>,
    check: Option<&str>,
    constraint_name: Option<&str>,
) -> Result<String> {
    if options_not_null == Some(true) && check.is_some() {
        return Err(CoreError::MutuallyExclusive {
            first: "notNull",
            second: "check",
        });
    }
    let prefix = constraint_name.map_or_else(String::new, |n| {
        format!(" CONSTRAINT {}", opts.literal.render_str(n))
    });
    Ok(match (options_not_null, check) {
        (Some(true), None) => format!("{prefix} NOT NULL"),
        (Some(false), None) => format!("{prefix} NULL"),
        (_, Some(check)) => format!("{prefix} CHECK ({check})"),
        (None, None) => String::new(),
    })
}

/// Builds `CREATE DOMAIN`.
///
/// # Errors
///
/// `notNull` and `check` are mutually exclusive.
pub fn create_domain(
    opts: &FormattingOptions,
    name: &Name,
    type_name: &str,
    options: &DomainOptions,
) -> Result<String> {
    let collation = options
        .collation
        .as_ref()
        .map_or_else(String::new, |c| format!(" COLLATE {c}"));
    let default = options
        .default
        .as_ref()
        .map_or_else(String::new, |d| format!(" DEFAULT {}", escape_value(d)));
    let constraint = constraint_clause(
        opts,
        options.not_null,
        options.check.as_deref(),
        options.constraint_name.as_deref(),
    )?;
    Ok(format!(
        "CREATE DOMAIN {} AS {}{collation}{default}{constraint};",
        opts.literal.render(name),
        crate::typing::apply_type_adapters(type_name)
    ))
}

/// Builds `ALTER DOMAIN`, one statement per requested alteration.
///
/// # Errors
///
/// Fails when no alteration is specified.
pub fn alter_domain(
    opts: &FormattingOptions,
    name: &Name,
    options: &AlterDomainOptions,
) -> Result<Vec<String>> {
    let domain = opts.literal.render(name);
    let mut statements = Vec::new();
    match &options.default {
        Some(Some(default)) => statements.push(format!(
            "ALTER DOMAIN {domain} SET DEFAULT {};",
            escape_value(default)
        )),
        Some(None) => statements.push(format!("ALTER DOMAIN {domain} DROP DEFAULT;")),
        None => {}
    }
    match options.not_null {
        Some(true) => statements.push(format!("ALTER DOMAIN {domain} SET NOT NULL;")),
        Some(false) => statements.push(format!("ALTER DOMAIN {domain} DROP NOT NULL;")),
        None => {}
    }
    if let Some(check) = &options.check {
        let prefix = options.constraint_name.as_ref().map_or_else(String::new, |n| {
            format!(" CONSTRAINT {}", opts.literal.render_str(n))
        });
        statements.push(format!("ALTER DOMAIN {domain} ADD{prefix} CHECK ({check});"));
    }
    if statements.is_empty() {
        return Err(CoreError::InvalidOption {
            operation: "alterDomain",
            message: "no alterations specified".to_string(),
        });
    }
    Ok(statements)
}

/// Builds `DROP DOMAIN`.
#[must_use]
pub fn drop_domain(opts: &FormattingOptions, name: &Name, options: DropOptions) -> String {
    format!(
        "DROP DOMAIN{} {}{};",
        options.if_exists_sql(),
        opts.literal.render(name),
        options.cascade_sql()
    )
}

/// Builds `ALTER DOMAIN .. RENAME TO`.
#[must_use]
pub fn rename_domain(opts: &FormattingOptions, name: &Name, new_name: &Name) -> String {
    format!(
        "ALTER DOMAIN {} RENAME TO {};",
        opts.literal.render(name),
        opts.literal.render(new_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_domain_with_check() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_domain(
                &opts,
                &Name::new("positive_int"),
                "int",
                &DomainOptions {
                    check: Some("VALUE > 0".to_string()),
                    constraint_name: Some("positive".to_string()),
                    ..DomainOptions::default()
                }
            )
            .unwrap(),
            "CREATE DOMAIN \"positive_int\" AS integer CONSTRAINT \"positive\" CHECK (VALUE > 0);"
        );
    }

    #[test]
    fn test_create_domain_not_null_with_default() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_domain(
                &opts,
                &Name::new("code"),
                "text",
                &DomainOptions {
                    default: Some(Value::from("??")),
                    not_null: Some(true),
                    ..DomainOptions::default()
                }
            )
            .unwrap(),
            "CREATE DOMAIN \"code\" AS text DEFAULT $pga$??$pga$ NOT NULL;"
        );
    }

    #[test]
    fn test_not_null_and_check_conflict() {
        let opts = FormattingOptions::default();
        let err = create_domain(
            &opts,
            &Name::new("d"),
            "int",
            &DomainOptions {
                not_null: Some(true),
                check: Some("VALUE > 0".to_string()),
                ..DomainOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::MutuallyExclusive { .. }));
    }

    #[test]
    fn test_alter_domain_statements() {
        let opts = FormattingOptions::default();
        let statements = alter_domain(
            &opts,
            &Name::new("code"),
            &AlterDomainOptions {
                default: Some(None),
                not_null: Some(false),
                ..AlterDomainOptions::default()
            },
        )
        .unwrap();
        assert_eq!(
            statements,
            vec![
                "ALTER DOMAIN \"code\" DROP DEFAULT;".to_string(),
                "ALTER DOMAIN \"code\" DROP NOT NULL;".to_string(),
            ]
        );
    }

    #[test]
    fn test_drop_and_rename_domain() {
        let opts = FormattingOptions::default();
        assert_eq!(
            drop_domain(&opts, &Name::new("code"), DropOptions::default()),
            "DROP DOMAIN \"code\";"
        );
        assert_eq!(
            rename_domain(&opts, &Name::new("code"), &Name::new("sku")),
            "ALTER DOMAIN \"code\" RENAME TO \"sku\";"
        );
    }
}
