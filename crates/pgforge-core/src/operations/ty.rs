//! `CREATE TYPE` operations for enum and composite types.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;
use crate::value::escape_string;

use super::DropOptions;

/// The shape of a created type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeShape {
    /// Enum type with a list of labels.
    Enum(Vec<String>),
    /// Composite type with named, typed attributes.
    Composite(Vec<(String, String)>),
}

/// Options for `ALTER TYPE .. ADD VALUE`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddTypeValueOptions {
    /// Add `IF NOT EXISTS`.
    pub if_not_exists: bool,
    /// Insert before this existing label.
    pub before: Option<String>,
    /// Insert after this existing label.
    pub after: Option<String>,
}

/// Builds `CREATE TYPE`.
#[must_use]
pub fn create_type(opts: &FormattingOptions, name: &Name, shape: &TypeShape) -> String {
    match shape {
        TypeShape::Enum(labels) => {
            let labels: Vec<String> = labels.iter().map(|l| escape_string(l)).collect();
            format!(
                "CREATE TYPE {} AS ENUM ({});",
                opts.literal.render(name),
                labels.join(", ")
            )
        }
        TypeShape::Composite(attributes) => {
            let attributes: Vec<String> = attributes
                .iter()
                .map(|(attribute, type_name)| {
                    format!(
                        "{} {}",
                        opts.literal.render_str(attribute),
                        crate::typing::apply_type_adapters(type_name)
                    )
                })
                .collect();
            format!(
                "CREATE TYPE {} AS ({});",
                opts.literal.render(name),
                attributes.join(", ")
            )
        }
    }
}

/// Builds `DROP TYPE`.
#[must_use]
pub fn drop_type(opts: &FormattingOptions, name: &Name, options: DropOptions) -> String {
    format!(
        "DROP TYPE{} {}{};",
        options.if_exists_sql(),
        opts.literal.render(name),
        options.cascade_sql()
    )
}

/// Builds `ALTER TYPE .. RENAME TO`.
#[must_use]
pub fn rename_type(opts: &FormattingOptions, name: &Name, new_name: &Name) -> String {
    format!(
        "ALTER TYPE {} RENAME TO {};",
        opts.literal.render(name),
        opts.literal.render(new_name)
    )
}

/// Builds `ALTER TYPE .. ADD VALUE`.
///
/// # Errors
///
/// `before` and `after` are mutually exclusive.
pub fn add_type_value(
    opts: &FormattingOptions,
    name: &Name,
    value: &str,
    options: &AddTypeValueOptions,
) -> Result<String> {
    if options.before.is_some() && options.after.is_some() {
        return Err(CoreError::MutuallyExclusive {
            first: "before",
            second: "after",
        });
    }
    let if_not_exists = if options.if_not_exists {
        "IF NOT EXISTS "
    } else {
        ""
    };
    let position = match (&options.before, &options.after) {
        (Some(before), None) => format!(" BEFORE {}", escape_string(before)),
        (None, Some(after)) => format!(" AFTER {}", escape_string(after)),
        _ => String::new(),
    };
    Ok(format!(
        "ALTER TYPE {} ADD VALUE {if_not_exists}{}{position};",
        opts.literal.render(name),
        escape_string(value)
    ))
}

/// Builds `ALTER TYPE .. RENAME VALUE`.
#[must_use]
pub fn rename_type_value(
    opts: &FormattingOptions,
    name: &Name,
    value: &str,
    new_value: &str,
) -> String {
    format!(
        "ALTER TYPE {} RENAME VALUE {} TO {};",
        opts.literal.render(name),
        escape_string(value),
        escape_string(new_value)
    )
}

/// Builds `ALTER TYPE .. ADD ATTRIBUTE`.
#[must_use]
pub fn add_type_attribute(
    opts: &FormattingOptions,
    name: &Name,
    attribute: &str,
    type_name: &str,
) -> String {
    format!(
        "ALTER TYPE {} ADD ATTRIBUTE {} {};",
        opts.literal.render(name),
        opts.literal.render_str(attribute),
        crate::typing::apply_type_adapters(type_name)
    )
}

/// Builds `ALTER TYPE .. DROP ATTRIBUTE`.
#[must_use]
pub fn drop_type_attribute(
    opts: &FormattingOptions,
    name: &Name,
    attribute: &str,
    options: DropOptions,
) -> String {
    format!(
        "ALTER TYPE {} DROP ATTRIBUTE {}{};",
        opts.literal.render(name),
        opts.literal.render_str(attribute),
        options.if_exists_sql()
    )
}

/// Builds `ALTER TYPE .. ALTER ATTRIBUTE .. SET DATA TYPE`.
#[must_use]
pub fn set_type_attribute(
    opts: &FormattingOptions,
    name: &Name,
    attribute: &str,
    type_name: &str,
) -> String {
    format!(
        "ALTER TYPE {} ALTER ATTRIBUTE {} SET DATA TYPE {};",
        opts.literal.render(name),
        opts.literal.render_str(attribute),
        crate::typing::apply_type_adapters(type_name)
    )
}

/// Builds `ALTER TYPE .. RENAME ATTRIBUTE`.
#[must_use]
pub fn rename_type_attribute(
    opts: &FormattingOptions,
    name: &Name,
    attribute: &str,
    new_attribute: &str,
) -> String {
    format!(
        "ALTER TYPE {} RENAME ATTRIBUTE {} TO {};",
        opts.literal.render(name),
        opts.literal.render_str(attribute),
        opts.literal.render_str(new_attribute)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_enum_type() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_type(
                &opts,
                &Name::new("mood"),
                &TypeShape::Enum(vec!["sad".to_string(), "ok".to_string(), "happy".to_string()])
            ),
            "CREATE TYPE \"mood\" AS ENUM ($pga$sad$pga$, $pga$ok$pga$, $pga$happy$pga$);"
        );
    }

    #[test]
    fn test_create_composite_type() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_type(
                &opts,
                &Name::new("pair"),
                &TypeShape::Composite(vec![
                    ("a".to_string(), "int".to_string()),
                    ("b".to_string(), "string".to_string()),
                ])
            ),
            "CREATE TYPE \"pair\" AS (\"a\" integer, \"b\" text);"
        );
    }

    #[test]
    fn test_add_type_value_before() {
        let opts = FormattingOptions::default();
        assert_eq!(
            add_type_value(
                &opts,
                &Name::new("mood"),
                "meh",
                &AddTypeValueOptions {
                    if_not_exists: true,
                    before: Some("ok".to_string()),
                    after: None,
                }
            )
            .unwrap(),
            "ALTER TYPE \"mood\" ADD VALUE IF NOT EXISTS $pga$meh$pga$ BEFORE $pga$ok$pga$;"
        );
    }

    #[test]
    fn test_add_type_value_before_and_after_conflict() {
        let opts = FormattingOptions::default();
        let err = add_type_value(
            &opts,
            &Name::new("mood"),
            "meh",
            &AddTypeValueOptions {
                if_not_exists: false,
                before: Some("ok".to_string()),
                after: Some("sad".to_string()),
            },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::MutuallyExclusive {
                first: "before",
                second: "after",
            }
        ));
    }

    #[test]
    fn test_rename_type_value() {
        let opts = FormattingOptions::default();
        assert_eq!(
            rename_type_value(&opts, &Name::new("mood"), "ok", "fine"),
            "ALTER TYPE \"mood\" RENAME VALUE $pga$ok$pga$ TO $pga$fine$pga$;"
        );
    }

    #[test]
    fn test_attribute_operations() {
        let opts = FormattingOptions::default();
        assert_eq!(
            add_type_attribute(&opts, &Name::new("pair"), "c", "bool"),
            "ALTER TYPE \"pair\" ADD ATTRIBUTE \"c\" boolean;"
        );
        assert_eq!(
            set_type_attribute(&opts, &Name::new("pair"), "c", "int"),
            "ALTER TYPE \"pair\" ALTER ATTRIBUTE \"c\" SET DATA TYPE integer;"
        );
        assert_eq!(
            drop_type_attribute(
                &opts,
                &Name::new("pair"),
                "c",
                DropOptions {
                    if_exists: true,
                    cascade: false,
                }
            ),
            "ALTER TYPE \"pair\" DROP ATTRIBUTE \"c\" IF EXISTS;"
        );
        assert_eq!(
            rename_type_attribute(&opts, &Name::new("pair"), "a", "x"),
            "ALTER TYPE \"pair\" RENAME ATTRIBUTE \"a\" TO \"x\";"
        );
    }

    #[test]
    fn test_drop_and_rename_type() {
        let opts = FormattingOptions::default();
        assert_eq!(
            drop_type(&opts, &Name::new("mood"), DropOptions::default()),
            "DROP TYPE \"mood\";"
        );
        assert_eq!(
            rename_type(&opts, &Name::new("mood"), &Name::new("feeling")),
            "ALTER TYPE \"mood\" RENAME TO \"feeling\";"
        );
    }
}
