//! Function operations.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;
use crate::value::{escape_string, escape_value, Value};

use super::DropOptions;

/// Parameter mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParamMode {
    /// Input parameter (the default).
    In,
    /// Output parameter.
    Out,
    /// Both.
    Inout,
    /// Variadic trailing parameter.
    Variadic,
}

impl ParamMode {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Inout => "INOUT",
            Self::Variadic => "VARIADIC",
        }
    }
}

/// A function parameter, either a bare type or a full declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionParam {
    /// Bare type name.
    Type(String),
    /// Full declaration.
    Full {
        /// Parameter mode, defaults to `IN`.
        #[serde(default)]
        mode: Option<ParamMode>,
        /// Parameter name.
        #[serde(default)]
        name: Option<String>,
        /// Parameter type.
        #[serde(rename = "type")]
        type_name: String,
        /// Default value.
        #[serde(default)]
        default: Option<Value>,
    },
}

impl From<&str> for FunctionParam {
    fn from(type_name: &str) -> Self {
        Self::Type(type_name.to_string())
    }
}

/// Volatility class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Volatility {
    /// `IMMUTABLE`.
    Immutable,
    /// `STABLE`.
    Stable,
    /// `VOLATILE` (the default).
    Volatile,
}

/// Options for `CREATE FUNCTION`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FunctionOptions {
    /// Return type; defaults to `void`.
    pub returns: Option<String>,
    /// Implementation language, e.g. `plpgsql`. Required.
    pub language: Option<String>,
    /// `CREATE OR REPLACE`.
    pub replace: bool,
    /// `WINDOW` function.
    pub window: bool,
    /// Volatility class.
    pub behavior: Option<Volatility>,
    /// `RETURNS NULL ON NULL INPUT` when true, `CALLED ON NULL INPUT`
    /// when false.
    pub on_null: Option<bool>,
    /// `PARALLEL` mode: `UNSAFE`, `RESTRICTED` or `SAFE`.
    pub parallel: Option<String>,
    /// `SECURITY DEFINER` when true.
    pub security_definer: Option<bool>,
}

fn render_param(opts: &FormattingOptions, param: &FunctionParam) -> String {
    match param {
        FunctionParam::Type(type_name) => crate::typing::apply_type_adapters(type_name),
        FunctionParam::Full {
            mode,
            name,
            type_name,
            default,
        } => {
            let mut parts = Vec::new();
            if let Some(mode) = mode {
                parts.push(mode.as_sql().to_string());
            }
            if let Some(name) = name {
                parts.push(opts.literal.render_str(name));
            }
            parts.push(crate::typing::apply_type_adapters(type_name));
            if let Some(default) = default {
                parts.push(format!("DEFAULT {}", escape_value(default)));
            }
            parts.join(" ")
        }
    }
}

fn render_params(opts: &FormattingOptions, params: &[FunctionParam]) -> String {
    params
        .iter()
        .map(|p| render_param(opts, p))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A function's drop/rename signature only lists parameter types, never
/// names or defaults.
fn render_signature(params: &[FunctionParam]) -> String {
    params
        .iter()
        .map(|p| match p {
            FunctionParam::Type(type_name) | FunctionParam::Full { type_name, .. } => {
                crate::typing::apply_type_adapters(type_name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds `CREATE FUNCTION`, dollar-quoting the body.
///
/// # Errors
///
/// The language is required.
pub fn create_function(
    opts: &FormattingOptions,
    name: &Name,
    params: &[FunctionParam],
    options: &FunctionOptions,
    body: &str,
) -> Result<String> {
    let language = options
        .language
        .as_ref()
        .ok_or(CoreError::MissingParameter {
            operation: "createFunction",
            parameter: "language",
        })?;

    let mut clauses = vec![
        format!(
            "RETURNS {}",
            options.returns.as_deref().unwrap_or("void")
        ),
        format!("AS {}", escape_string(body)),
        format!("LANGUAGE {language}"),
    ];
    if options.window {
        clauses.push("WINDOW".to_string());
    }
    if let Some(behavior) = options.behavior {
        clauses.push(
            match behavior {
                Volatility::Immutable => "IMMUTABLE",
                Volatility::Stable => "STABLE",
                Volatility::Volatile => "VOLATILE",
            }
            .to_string(),
        );
    }
    match options.on_null {
        Some(true) => clauses.push("RETURNS NULL ON NULL INPUT".to_string()),
        Some(false) => clauses.push("CALLED ON NULL INPUT".to_string()),
        None => {}
    }
    if let Some(parallel) = &options.parallel {
        clauses.push(format!("PARALLEL {parallel}"));
    }
    match options.security_definer {
        Some(true) => clauses.push("SECURITY DEFINER".to_string()),
        Some(false) => clauses.push("SECURITY INVOKER".to_string()),
        None => {}
    }

    let replace = if options.replace { " OR REPLACE" } else { "" };
    let clauses: Vec<String> = clauses.iter().map(|c| format!("  {c}")).collect();
    Ok(format!(
        "CREATE{replace} FUNCTION {}({})\n{};",
        opts.literal.render(name),
        render_params(opts, params),
        clauses.join("\n")
    ))
}

/// Builds `DROP FUNCTION` with the type-only signature.
#[must_use]
pub fn drop_function(
    opts: &FormattingOptions,
    name: &Name,
    params: &[FunctionParam],
    options: DropOptions,
) -> String {
    format!(
        "DROP FUNCTION{} {}({}){};",
        options.if_exists_sql(),
        opts.literal.render(name),
        render_signature(params),
        options.cascade_sql()
    )
}

/// Builds `ALTER FUNCTION .. RENAME TO`.
#[must_use]
pub fn rename_function(
    opts: &FormattingOptions,
    name: &Name,
    params: &[FunctionParam],
    new_name: &Name,
) -> String {
    format!(
        "ALTER FUNCTION {}({}) RENAME TO {};",
        opts.literal.render(name),
        render_signature(params),
        opts.literal.render(new_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_function() {
        let opts = FormattingOptions::default();
        let sql = create_function(
            &opts,
            &Name::new("add_one"),
            &[FunctionParam::from("int")],
            &FunctionOptions {
                returns: Some("integer".to_string()),
                language: Some("sql".to_string()),
                behavior: Some(Volatility::Immutable),
                ..FunctionOptions::default()
            },
            "SELECT $1 + 1",
        )
        .unwrap();
        assert_eq!(
            sql,
            "CREATE FUNCTION \"add_one\"(integer)\n  RETURNS integer\n  AS $pga$SELECT $1 + 1$pga$\n  LANGUAGE sql\n  IMMUTABLE;"
        );
    }

    #[test]
    fn test_create_function_requires_language() {
        let opts = FormattingOptions::default();
        let err = create_function(
            &opts,
            &Name::new("f"),
            &[],
            &FunctionOptions::default(),
            "SELECT 1",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::MissingParameter {
                parameter: "language",
                ..
            }
        ));
    }

    #[test]
    fn test_named_params_with_modes() {
        let opts = FormattingOptions::default();
        let sql = create_function(
            &opts,
            &Name::new("split"),
            &[
                FunctionParam::Full {
                    mode: Some(ParamMode::In),
                    name: Some("input".to_string()),
                    type_name: "text".to_string(),
                    default: Some(Value::from("")),
                },
                FunctionParam::Full {
                    mode: Some(ParamMode::Out),
                    name: Some("head".to_string()),
                    type_name: "text".to_string(),
                    default: None,
                },
            ],
            &FunctionOptions {
                language: Some("plpgsql".to_string()),
                replace: true,
                ..FunctionOptions::default()
            },
            "BEGIN head := input; END;",
        )
        .unwrap();
        assert!(sql.starts_with(
            "CREATE OR REPLACE FUNCTION \"split\"(IN \"input\" text DEFAULT $pga$$pga$, OUT \"head\" text)"
        ));
    }

    #[test]
    fn test_drop_function_signature_is_types_only() {
        let opts = FormattingOptions::default();
        let sql = drop_function(
            &opts,
            &Name::new("split"),
            &[FunctionParam::Full {
                mode: None,
                name: Some("input".to_string()),
                type_name: "text".to_string(),
                default: None,
            }],
            DropOptions {
                if_exists: true,
                cascade: false,
            },
        );
        assert_eq!(sql, "DROP FUNCTION IF EXISTS \"split\"(text);");
    }

    #[test]
    fn test_rename_function() {
        let opts = FormattingOptions::default();
        assert_eq!(
            rename_function(
                &opts,
                &Name::new("add_one"),
                &[FunctionParam::from("integer")],
                &Name::new("increment")
            ),
            "ALTER FUNCTION \"add_one\"(integer) RENAME TO \"increment\";"
        );
    }
}
