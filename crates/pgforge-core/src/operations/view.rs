//! View operations.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;

use super::DropOptions;

/// `WITH CHECK OPTION` scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheckOption {
    /// `LOCAL CHECK OPTION`.
    Local,
    /// `CASCADED CHECK OPTION`.
    Cascaded,
}

impl CheckOption {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Local => "LOCAL",
            Self::Cascaded => "CASCADED",
        }
    }
}

/// Options for `CREATE VIEW`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewOptions {
    /// Create a temporary view.
    pub temporary: bool,
    /// `CREATE OR REPLACE`.
    pub replace: bool,
    /// `RECURSIVE` view.
    pub recursive: bool,
    /// Explicit output column names.
    pub columns: Vec<String>,
    /// `WITH .. CHECK OPTION`.
    pub check_option: Option<CheckOption>,
}

/// Options for `ALTER VIEW`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlterViewOptions {
    /// Set or (`Some(None)`) reset the check option.
    pub check_option: Option<Option<CheckOption>>,
}

/// Builds `CREATE VIEW`.
#[must_use]
pub fn create_view(
    opts: &FormattingOptions,
    name: &Name,
    options: &ViewOptions,
    definition: &str,
) -> String {
    let replace = if options.replace { " OR REPLACE" } else { "" };
    let temporary = if options.temporary { " TEMPORARY" } else { "" };
    let recursive = if options.recursive { " RECURSIVE" } else { "" };
    let columns = if options.columns.is_empty() {
        String::new()
    } else {
        let columns: Vec<String> = options
            .columns
            .iter()
            .map(|c| opts.literal.render_str(c))
            .collect();
        format!(" ({})", columns.join(", "))
    };
    let check_option = options.check_option.map_or_else(String::new, |c| {
        format!(" WITH {} CHECK OPTION", c.as_sql())
    });
    format!(
        "CREATE{replace}{temporary}{recursive} VIEW {}{columns} AS {definition}{check_option};",
        opts.literal.render(name)
    )
}

/// Builds `ALTER VIEW`.
///
/// # Errors
///
/// Fails when no alteration is specified.
pub fn alter_view(
    opts: &FormattingOptions,
    name: &Name,
    options: &AlterViewOptions,
) -> Result<String> {
    let action = match options.check_option {
        Some(Some(check_option)) => format!(
            "SET (check_option = {})",
            check_option.as_sql().to_lowercase()
        ),
        Some(None) => "RESET (check_option)".to_string(),
        None => {
            return Err(CoreError::InvalidOption {
                operation: "alterView",
                message: "no alterations specified".to_string(),
            })
        }
    };
    Ok(format!(
        "ALTER VIEW {} {action};",
        opts.literal.render(name)
    ))
}

/// Builds `DROP VIEW`.
#[must_use]
pub fn drop_view(opts: &FormattingOptions, name: &Name, options: DropOptions) -> String {
    format!(
        "DROP VIEW{} {}{};",
        options.if_exists_sql(),
        opts.literal.render(name),
        options.cascade_sql()
    )
}

/// Builds `ALTER VIEW .. RENAME TO`.
#[must_use]
pub fn rename_view(opts: &FormattingOptions, name: &Name, new_name: &Name) -> String {
    format!(
        "ALTER VIEW {} RENAME TO {};",
        opts.literal.render(name),
        opts.literal.render(new_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_view() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_view(
                &opts,
                &Name::new("active_users"),
                &ViewOptions::default(),
                "SELECT * FROM users WHERE active"
            ),
            "CREATE VIEW \"active_users\" AS SELECT * FROM users WHERE active;"
        );
    }

    #[test]
    fn test_create_view_full_options() {
        let opts = FormattingOptions::default();
        let sql = create_view(
            &opts,
            &Name::new("v"),
            &ViewOptions {
                replace: true,
                columns: vec!["id".to_string(), "label".to_string()],
                check_option: Some(CheckOption::Cascaded),
                ..ViewOptions::default()
            },
            "SELECT id, name FROM t",
        );
        assert_eq!(
            sql,
            "CREATE OR REPLACE VIEW \"v\" (\"id\", \"label\") AS SELECT id, name FROM t WITH CASCADED CHECK OPTION;"
        );
    }

    #[test]
    fn test_alter_view_check_option() {
        let opts = FormattingOptions::default();
        assert_eq!(
            alter_view(
                &opts,
                &Name::new("v"),
                &AlterViewOptions {
                    check_option: Some(Some(CheckOption::Local)),
                }
            )
            .unwrap(),
            "ALTER VIEW \"v\" SET (check_option = local);"
        );
        assert_eq!(
            alter_view(
                &opts,
                &Name::new("v"),
                &AlterViewOptions {
                    check_option: Some(None),
                }
            )
            .unwrap(),
            "ALTER VIEW \"v\" RESET (check_option);"
        );
    }

    #[test]
    fn test_drop_and_rename_view() {
        let opts = FormattingOptions::default();
        assert_eq!(
            drop_view(&opts, &Name::new("v"), DropOptions::default()),
            "DROP VIEW \"v\";"
        );
        assert_eq!(
            rename_view(&opts, &Name::new("v"), &Name::new("w")),
            "ALTER VIEW \"v\" RENAME TO \"w\";"
        );
    }
}
