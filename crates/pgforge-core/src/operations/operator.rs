//! Operator, operator-class and operator-family operations.
//!
//! Operator names are symbols, not identifiers, so they render through
//! the non-quoting writer even when schema-qualified.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;

use super::{format_lines, DropOptions};

/// Options for `CREATE OPERATOR`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperatorOptions {
    /// Implementing function. Required.
    pub procedure: Option<Name>,
    /// Left operand type; absent for prefix operators.
    pub left: Option<String>,
    /// Right operand type.
    pub right: Option<String>,
    /// `COMMUTATOR` operator.
    pub commutator: Option<String>,
    /// `NEGATOR` operator.
    pub negator: Option<String>,
    /// `RESTRICT` selectivity estimator.
    pub restrict: Option<Name>,
    /// `JOIN` selectivity estimator.
    pub join: Option<Name>,
    /// `HASHES` flag.
    pub hashes: bool,
    /// `MERGES` flag.
    pub merges: bool,
}

/// An item in an operator class or family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum OperatorListItem {
    /// `OPERATOR <number> <name>(params) [FOR ORDER BY <family>]`.
    Operator {
        /// Strategy number.
        number: u32,
        /// Operator symbol.
        name: Name,
        /// Operand types.
        #[serde(default)]
        params: Vec<String>,
        /// Sort family for ordering operators.
        #[serde(default, rename = "sortFamily")]
        sort_family: Option<Name>,
    },
    /// `FUNCTION <number> <name>(params)`.
    Function {
        /// Support function number.
        number: u32,
        /// Function name.
        name: Name,
        /// Parameter types.
        #[serde(default)]
        params: Vec<String>,
    },
    /// `STORAGE <type>`.
    Storage {
        /// Storage type.
        #[serde(rename = "type")]
        type_name: String,
    },
}

/// Options for `CREATE OPERATOR CLASS`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperatorClassOptions {
    /// Mark the class as the default for its type.
    pub default: bool,
    /// Containing operator family.
    pub family: Option<Name>,
}

fn render_types(types: &[String]) -> String {
    types
        .iter()
        .map(|t| crate::typing::apply_type_adapters(t))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_item(opts: &FormattingOptions, item: &OperatorListItem) -> String {
    match item {
        OperatorListItem::Operator {
            number,
            name,
            params,
            sort_family,
        } => {
            let params = if params.is_empty() {
                String::new()
            } else {
                format!("({})", render_types(params))
            };
            let order_by = sort_family.as_ref().map_or_else(String::new, |f| {
                format!(" FOR ORDER BY {}", opts.literal.render(f))
            });
            format!(
                "OPERATOR {number} {}{params}{order_by}",
                opts.schemalize.render(name)
            )
        }
        OperatorListItem::Function {
            number,
            name,
            params,
        } => format!(
            "FUNCTION {number} {}({})",
            opts.literal.render(name),
            render_types(params)
        ),
        OperatorListItem::Storage { type_name } => {
            format!("STORAGE {}", crate::typing::apply_type_adapters(type_name))
        }
    }
}

/// Builds `CREATE OPERATOR`.
///
/// # Errors
///
/// The implementing procedure is required.
pub fn create_operator(
    opts: &FormattingOptions,
    name: &Name,
    options: &OperatorOptions,
) -> Result<String> {
    let procedure = options
        .procedure
        .as_ref()
        .ok_or(CoreError::MissingParameter {
            operation: "createOperator",
            parameter: "procedure",
        })?;

    let mut clauses = vec![format!("PROCEDURE = {}", opts.literal.render(procedure))];
    if let Some(left) = &options.left {
        clauses.push(format!(
            "LEFTARG = {}",
            crate::typing::apply_type_adapters(left)
        ));
    }
    if let Some(right) = &options.right {
        clauses.push(format!(
            "RIGHTARG = {}",
            crate::typing::apply_type_adapters(right)
        ));
    }
    if let Some(commutator) = &options.commutator {
        clauses.push(format!("COMMUTATOR = {commutator}"));
    }
    if let Some(negator) = &options.negator {
        clauses.push(format!("NEGATOR = {negator}"));
    }
    if let Some(restrict) = &options.restrict {
        clauses.push(format!("RESTRICT = {}", opts.literal.render(restrict)));
    }
    if let Some(join) = &options.join {
        clauses.push(format!("JOIN = {}", opts.literal.render(join)));
    }
    if options.hashes {
        clauses.push("HASHES".to_string());
    }
    if options.merges {
        clauses.push("MERGES".to_string());
    }

    Ok(format!(
        "CREATE OPERATOR {} ({});",
        opts.schemalize.render(name),
        clauses.join(", ")
    ))
}

/// Builds `DROP OPERATOR` with the `(left, right)` signature; a missing
/// operand side renders as `none`.
#[must_use]
pub fn drop_operator(
    opts: &FormattingOptions,
    name: &Name,
    left: Option<&str>,
    right: Option<&str>,
    options: DropOptions,
) -> String {
    let side = |operand: Option<&str>| {
        operand.map_or_else(
            || "none".to_string(),
            |t| crate::typing::apply_type_adapters(t),
        )
    };
    format!(
        "DROP OPERATOR{} {}({}, {}){};",
        options.if_exists_sql(),
        opts.schemalize.render(name),
        side(left),
        side(right),
        options.cascade_sql()
    )
}

/// Builds `CREATE OPERATOR CLASS`.
#[must_use]
pub fn create_operator_class(
    opts: &FormattingOptions,
    name: &Name,
    type_name: &str,
    index_method: &str,
    items: &[OperatorListItem],
    options: &OperatorClassOptions,
) -> String {
    let default = if options.default { " DEFAULT" } else { "" };
    let family = options.family.as_ref().map_or_else(String::new, |f| {
        format!(" FAMILY {}", opts.literal.render(f))
    });
    let items: Vec<String> = items.iter().map(|i| render_item(opts, i)).collect();
    format!(
        "CREATE OPERATOR CLASS {}{default} FOR TYPE {} USING {index_method}{family} AS\n{};",
        opts.literal.render(name),
        crate::typing::apply_type_adapters(type_name),
        format_lines(&items, "  ")
    )
}

/// Builds `DROP OPERATOR CLASS`.
#[must_use]
pub fn drop_operator_class(
    opts: &FormattingOptions,
    name: &Name,
    index_method: &str,
    options: DropOptions,
) -> String {
    format!(
        "DROP OPERATOR CLASS{} {} USING {index_method}{};",
        options.if_exists_sql(),
        opts.literal.render(name),
        options.cascade_sql()
    )
}

/// Builds `ALTER OPERATOR CLASS .. RENAME TO`.
#[must_use]
pub fn rename_operator_class(
    opts: &FormattingOptions,
    name: &Name,
    index_method: &str,
    new_name: &Name,
) -> String {
    format!(
        "ALTER OPERATOR CLASS {} USING {index_method} RENAME TO {};",
        opts.literal.render(name),
        opts.literal.render(new_name)
    )
}

/// Builds `CREATE OPERATOR FAMILY`.
#[must_use]
pub fn create_operator_family(opts: &FormattingOptions, name: &Name, index_method: &str) -> String {
    format!(
        "CREATE OPERATOR FAMILY {} USING {index_method};",
        opts.literal.render(name)
    )
}

/// Builds `DROP OPERATOR FAMILY`.
#[must_use]
pub fn drop_operator_family(
    opts: &FormattingOptions,
    name: &Name,
    index_method: &str,
    options: DropOptions,
) -> String {
    format!(
        "DROP OPERATOR FAMILY{} {} USING {index_method}{};",
        options.if_exists_sql(),
        opts.literal.render(name),
        options.cascade_sql()
    )
}

/// Builds `ALTER OPERATOR FAMILY .. RENAME TO`.
#[must_use]
pub fn rename_operator_family(
    opts: &FormattingOptions,
    name: &Name,
    index_method: &str,
    new_name: &Name,
) -> String {
    format!(
        "ALTER OPERATOR FAMILY {} USING {index_method} RENAME TO {};",
        opts.literal.render(name),
        opts.literal.render(new_name)
    )
}

/// Builds `ALTER OPERATOR FAMILY .. ADD`.
#[must_use]
pub fn add_to_operator_family(
    opts: &FormattingOptions,
    name: &Name,
    index_method: &str,
    items: &[OperatorListItem],
) -> String {
    let items: Vec<String> = items.iter().map(|i| render_item(opts, i)).collect();
    format!(
        "ALTER OPERATOR FAMILY {} USING {index_method} ADD\n{};",
        opts.literal.render(name),
        format_lines(&items, "  ")
    )
}

/// Builds `ALTER OPERATOR FAMILY .. DROP`. Items are dropped by number
/// and operand types; names are ignored by the server. Storage items
/// cannot be dropped and are skipped.
#[must_use]
pub fn remove_from_operator_family(
    opts: &FormattingOptions,
    name: &Name,
    index_method: &str,
    items: &[OperatorListItem],
) -> String {
    let items: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            OperatorListItem::Operator { number, params, .. } => {
                Some(format!("OPERATOR {number} ({})", render_types(params)))
            }
            OperatorListItem::Function { number, params, .. } => {
                Some(format!("FUNCTION {number} ({})", render_types(params)))
            }
            OperatorListItem::Storage { .. } => None,
        })
        .collect();
    format!(
        "ALTER OPERATOR FAMILY {} USING {index_method} DROP\n{};",
        opts.literal.render(name),
        format_lines(&items, "  ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_operator_unquoted_symbol() {
        let opts = FormattingOptions::default();
        let sql = create_operator(
            &opts,
            &Name::qualified("app", "~~>"),
            &OperatorOptions {
                procedure: Some(Name::new("path_match")),
                left: Some("text".to_string()),
                right: Some("text".to_string()),
                commutator: Some("<~~".to_string()),
                hashes: true,
                ..OperatorOptions::default()
            },
        )
        .unwrap();
        assert_eq!(
            sql,
            "CREATE OPERATOR app.~~> (PROCEDURE = \"path_match\", LEFTARG = text, RIGHTARG = text, COMMUTATOR = <~~, HASHES);"
        );
    }

    #[test]
    fn test_create_operator_requires_procedure() {
        let opts = FormattingOptions::default();
        let err =
            create_operator(&opts, &Name::new("=>"), &OperatorOptions::default()).unwrap_err();
        assert!(matches!(err, CoreError::MissingParameter { .. }));
    }

    #[test]
    fn test_drop_operator_prefix_signature() {
        let opts = FormattingOptions::default();
        assert_eq!(
            drop_operator(&opts, &Name::new("!"), None, Some("int"), DropOptions::default()),
            "DROP OPERATOR !(none, integer);"
        );
    }

    #[test]
    fn test_create_operator_class() {
        let opts = FormattingOptions::default();
        let sql = create_operator_class(
            &opts,
            &Name::new("text_pattern"),
            "text",
            "btree",
            &[
                OperatorListItem::Operator {
                    number: 1,
                    name: Name::new("<"),
                    params: vec!["text".to_string(), "text".to_string()],
                    sort_family: None,
                },
                OperatorListItem::Function {
                    number: 1,
                    name: Name::new("text_cmp"),
                    params: vec!["text".to_string(), "text".to_string()],
                },
                OperatorListItem::Storage {
                    type_name: "text".to_string(),
                },
            ],
            &OperatorClassOptions {
                default: true,
                family: None,
            },
        );
        assert_eq!(
            sql,
            "CREATE OPERATOR CLASS \"text_pattern\" DEFAULT FOR TYPE text USING btree AS\n  OPERATOR 1 <(text, text),\n  FUNCTION 1 \"text_cmp\"(text, text),\n  STORAGE text;"
        );
    }

    #[test]
    fn test_ordering_operator_renders_sort_family() {
        let opts = FormattingOptions::default();
        let sql = add_to_operator_family(
            &opts,
            &Name::new("point_ops"),
            "gist",
            &[OperatorListItem::Operator {
                number: 15,
                name: Name::new("<->"),
                params: vec!["point".to_string(), "point".to_string()],
                sort_family: Some(Name::new("float_ops")),
            }],
        );
        assert_eq!(
            sql,
            "ALTER OPERATOR FAMILY \"point_ops\" USING gist ADD\n  OPERATOR 15 <->(point, point) FOR ORDER BY \"float_ops\";"
        );
    }

    #[test]
    fn test_operator_family_lifecycle() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_operator_family(&opts, &Name::new("integer_ops"), "btree"),
            "CREATE OPERATOR FAMILY \"integer_ops\" USING btree;"
        );
        assert_eq!(
            rename_operator_family(
                &opts,
                &Name::new("integer_ops"),
                "btree",
                &Name::new("number_ops")
            ),
            "ALTER OPERATOR FAMILY \"integer_ops\" USING btree RENAME TO \"number_ops\";"
        );
        assert_eq!(
            drop_operator_family(&opts, &Name::new("number_ops"), "btree", DropOptions::default()),
            "DROP OPERATOR FAMILY \"number_ops\" USING btree;"
        );
    }

    #[test]
    fn test_remove_from_operator_family_drops_by_signature() {
        let opts = FormattingOptions::default();
        let sql = remove_from_operator_family(
            &opts,
            &Name::new("integer_ops"),
            "btree",
            &[
                OperatorListItem::Operator {
                    number: 1,
                    name: Name::new("<"),
                    params: vec!["int".to_string(), "int".to_string()],
                    sort_family: None,
                },
                OperatorListItem::Storage {
                    type_name: "int".to_string(),
                },
            ],
        );
        assert_eq!(
            sql,
            "ALTER OPERATOR FAMILY \"integer_ops\" USING btree DROP\n  OPERATOR 1 (integer, integer);"
        );
    }
}
