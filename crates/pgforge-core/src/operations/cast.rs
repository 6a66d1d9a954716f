//! Cast operations.

use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::options::FormattingOptions;

/// How the cast converts its input.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CastMethod {
    /// `WITH FUNCTION name(params)`.
    Function {
        /// Conversion function.
        name: Name,
        /// Parameter types; defaults to the source type.
        #[serde(default)]
        params: Vec<String>,
    },
    /// `WITH INOUT`.
    Inout,
    /// `WITHOUT FUNCTION` (binary-coercible).
    #[default]
    None,
}

/// When the cast may be applied implicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CastContext {
    /// `AS ASSIGNMENT`.
    Assignment,
    /// `AS IMPLICIT`.
    Implicit,
}

/// Options for `CREATE CAST`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CastOptions {
    /// Conversion method.
    pub method: CastMethod,
    /// Implicit-application context.
    pub context: Option<CastContext>,
}

/// Builds `CREATE CAST`.
#[must_use]
pub fn create_cast(
    opts: &FormattingOptions,
    from_type: &str,
    to_type: &str,
    options: &CastOptions,
) -> String {
    let method = match &options.method {
        CastMethod::Function { name, params } => {
            let params = if params.is_empty() {
                crate::typing::apply_type_adapters(from_type)
            } else {
                params
                    .iter()
                    .map(|p| crate::typing::apply_type_adapters(p))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            format!("WITH FUNCTION {}({params})", opts.literal.render(name))
        }
        CastMethod::Inout => "WITH INOUT".to_string(),
        CastMethod::None => "WITHOUT FUNCTION".to_string(),
    };
    let context = match options.context {
        Some(CastContext::Assignment) => " AS ASSIGNMENT",
        Some(CastContext::Implicit) => " AS IMPLICIT",
        None => "",
    };
    format!(
        "CREATE CAST ({} AS {}) {method}{context};",
        crate::typing::apply_type_adapters(from_type),
        crate::typing::apply_type_adapters(to_type)
    )
}

/// Builds `DROP CAST`.
#[must_use]
pub fn drop_cast(from_type: &str, to_type: &str, if_exists: bool) -> String {
    let if_exists = if if_exists { " IF EXISTS" } else { "" };
    format!(
        "DROP CAST{if_exists} ({} AS {});",
        crate::typing::apply_type_adapters(from_type),
        crate::typing::apply_type_adapters(to_type)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_cast_with_function() {
        let opts = FormattingOptions::default();
        let sql = create_cast(
            &opts,
            "text",
            "int",
            &CastOptions {
                method: CastMethod::Function {
                    name: Name::new("text_to_int"),
                    params: vec![],
                },
                context: Some(CastContext::Implicit),
            },
        );
        assert_eq!(
            sql,
            "CREATE CAST (text AS integer) WITH FUNCTION \"text_to_int\"(text) AS IMPLICIT;"
        );
    }

    #[test]
    fn test_create_binary_coercible_cast() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_cast(&opts, "varchar", "text", &CastOptions::default()),
            "CREATE CAST (varchar AS text) WITHOUT FUNCTION;"
        );
    }

    #[test]
    fn test_drop_cast() {
        assert_eq!(
            drop_cast("text", "int", true),
            "DROP CAST IF EXISTS (text AS integer);"
        );
    }
}
