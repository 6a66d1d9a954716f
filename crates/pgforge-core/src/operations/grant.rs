//! Privilege grant and revoke operations.

use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::options::FormattingOptions;

/// Table privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TablePrivilege {
    /// `SELECT`.
    Select,
    /// `INSERT`.
    Insert,
    /// `UPDATE`.
    Update,
    /// `DELETE`.
    Delete,
    /// `TRUNCATE`.
    Truncate,
    /// `REFERENCES`.
    References,
    /// `TRIGGER`.
    Trigger,
    /// `ALL`.
    All,
}

impl TablePrivilege {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Truncate => "TRUNCATE",
            Self::References => "REFERENCES",
            Self::Trigger => "TRIGGER",
            Self::All => "ALL",
        }
    }
}

/// Schema privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaPrivilege {
    /// `CREATE`.
    Create,
    /// `USAGE`.
    Usage,
    /// `ALL`.
    All,
}

impl SchemaPrivilege {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Usage => "USAGE",
            Self::All => "ALL",
        }
    }
}

/// Tables a grant applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TableTarget {
    /// An explicit list of tables.
    Tables(Vec<Name>),
    /// Every table in a schema.
    AllInSchema(String),
}

/// Options for `GRANT .. ON .. TO`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrantOptions {
    /// `WITH GRANT OPTION`.
    pub with_grant_option: bool,
}

/// Options for `REVOKE`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RevokeOptions {
    /// Revoke only the grant option, not the privilege itself.
    pub only_grant_option: bool,
    /// Add `CASCADE`.
    pub cascade: bool,
}

fn roles_sql(opts: &FormattingOptions, roles: &[String]) -> String {
    if roles.is_empty() {
        "PUBLIC".to_string()
    } else {
        roles
            .iter()
            .map(|r| opts.literal.render_str(r))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn table_target_sql(opts: &FormattingOptions, target: &TableTarget) -> String {
    match target {
        TableTarget::Tables(tables) => tables
            .iter()
            .map(|t| opts.literal.render(t))
            .collect::<Vec<_>>()
            .join(", "),
        TableTarget::AllInSchema(schema) => {
            format!("ALL TABLES IN SCHEMA {}", opts.literal.render_str(schema))
        }
    }
}

fn table_privileges_sql(privileges: &[TablePrivilege]) -> String {
    privileges
        .iter()
        .map(|p| p.as_sql())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds `GRANT .. ON .. TO`.
#[must_use]
pub fn grant_on_tables(
    opts: &FormattingOptions,
    privileges: &[TablePrivilege],
    target: &TableTarget,
    roles: &[String],
    options: GrantOptions,
) -> String {
    let with_grant_option = if options.with_grant_option {
        " WITH GRANT OPTION"
    } else {
        ""
    };
    format!(
        "GRANT {} ON {} TO {}{with_grant_option};",
        table_privileges_sql(privileges),
        table_target_sql(opts, target),
        roles_sql(opts, roles)
    )
}

/// Builds `REVOKE .. ON .. FROM`.
#[must_use]
pub fn revoke_on_tables(
    opts: &FormattingOptions,
    privileges: &[TablePrivilege],
    target: &TableTarget,
    roles: &[String],
    options: &RevokeOptions,
) -> String {
    let only_grant_option = if options.only_grant_option {
        "GRANT OPTION FOR "
    } else {
        ""
    };
    let cascade = if options.cascade { " CASCADE" } else { "" };
    format!(
        "REVOKE {only_grant_option}{} ON {} FROM {}{cascade};",
        table_privileges_sql(privileges),
        table_target_sql(opts, target),
        roles_sql(opts, roles)
    )
}

/// Builds `GRANT .. ON SCHEMA .. TO`.
#[must_use]
pub fn grant_on_schemas(
    opts: &FormattingOptions,
    privileges: &[SchemaPrivilege],
    schemas: &[String],
    roles: &[String],
    options: GrantOptions,
) -> String {
    let with_grant_option = if options.with_grant_option {
        " WITH GRANT OPTION"
    } else {
        ""
    };
    let privileges: Vec<&str> = privileges.iter().map(|p| p.as_sql()).collect();
    let schemas: Vec<String> = schemas.iter().map(|s| opts.literal.render_str(s)).collect();
    format!(
        "GRANT {} ON SCHEMA {} TO {}{with_grant_option};",
        privileges.join(", "),
        schemas.join(", "),
        roles_sql(opts, roles)
    )
}

/// Builds `REVOKE .. ON SCHEMA .. FROM`.
#[must_use]
pub fn revoke_on_schemas(
    opts: &FormattingOptions,
    privileges: &[SchemaPrivilege],
    schemas: &[String],
    roles: &[String],
    options: &RevokeOptions,
) -> String {
    let only_grant_option = if options.only_grant_option {
        "GRANT OPTION FOR "
    } else {
        ""
    };
    let cascade = if options.cascade { " CASCADE" } else { "" };
    let privileges: Vec<&str> = privileges.iter().map(|p| p.as_sql()).collect();
    let schemas: Vec<String> = schemas.iter().map(|s| opts.literal.render_str(s)).collect();
    format!(
        "REVOKE {only_grant_option}{} ON SCHEMA {} FROM {}{cascade};",
        privileges.join(", "),
        schemas.join(", "),
        roles_sql(opts, roles)
    )
}

/// Builds `GRANT <roles> TO <roles>`.
#[must_use]
pub fn grant_roles(
    opts: &FormattingOptions,
    roles_from: &[Name],
    roles_to: &[String],
    with_admin_option: bool,
) -> String {
    let with_admin_option = if with_admin_option {
        " WITH ADMIN OPTION"
    } else {
        ""
    };
    let roles_from: Vec<String> = roles_from.iter().map(|r| opts.literal.render(r)).collect();
    format!(
        "GRANT {} TO {}{with_admin_option};",
        roles_from.join(", "),
        roles_sql(opts, roles_to)
    )
}

/// Builds `REVOKE <roles> FROM <roles>`.
#[must_use]
pub fn revoke_roles(
    opts: &FormattingOptions,
    roles_from: &[Name],
    roles_to: &[String],
    options: &RevokeOptions,
) -> String {
    let only_admin_option = if options.only_grant_option {
        "ADMIN OPTION FOR "
    } else {
        ""
    };
    let cascade = if options.cascade { " CASCADE" } else { "" };
    let roles_from: Vec<String> = roles_from.iter().map(|r| opts.literal.render(r)).collect();
    format!(
        "REVOKE {only_admin_option}{} FROM {}{cascade};",
        roles_from.join(", "),
        roles_sql(opts, roles_to)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_on_tables() {
        let opts = FormattingOptions::default();
        let sql = grant_on_tables(
            &opts,
            &[TablePrivilege::Select, TablePrivilege::Insert],
            &TableTarget::Tables(vec![Name::new("docs"), Name::new("users")]),
            &["editor".to_string()],
            GrantOptions {
                with_grant_option: true,
            },
        );
        assert_eq!(
            sql,
            "GRANT SELECT, INSERT ON \"docs\", \"users\" TO \"editor\" WITH GRANT OPTION;"
        );
    }

    #[test]
    fn test_grant_all_tables_in_schema() {
        let opts = FormattingOptions::default();
        let sql = grant_on_tables(
            &opts,
            &[TablePrivilege::All],
            &TableTarget::AllInSchema("app".to_string()),
            &[],
            GrantOptions::default(),
        );
        assert_eq!(sql, "GRANT ALL ON ALL TABLES IN SCHEMA \"app\" TO PUBLIC;");
    }

    #[test]
    fn test_revoke_grant_option_only() {
        let opts = FormattingOptions::default();
        let sql = revoke_on_tables(
            &opts,
            &[TablePrivilege::Select],
            &TableTarget::Tables(vec![Name::new("docs")]),
            &["editor".to_string()],
            &RevokeOptions {
                only_grant_option: true,
                cascade: true,
            },
        );
        assert_eq!(
            sql,
            "REVOKE GRANT OPTION FOR SELECT ON \"docs\" FROM \"editor\" CASCADE;"
        );
    }

    #[test]
    fn test_grant_on_schemas() {
        let opts = FormattingOptions::default();
        assert_eq!(
            grant_on_schemas(
                &opts,
                &[SchemaPrivilege::Usage],
                &["app".to_string()],
                &["reader".to_string()],
                GrantOptions::default()
            ),
            "GRANT USAGE ON SCHEMA \"app\" TO \"reader\";"
        );
    }

    #[test]
    fn test_grant_and_revoke_roles() {
        let opts = FormattingOptions::default();
        assert_eq!(
            grant_roles(&opts, &[Name::new("readers")], &["alice".to_string()], true),
            "GRANT \"readers\" TO \"alice\" WITH ADMIN OPTION;"
        );
        assert_eq!(
            revoke_roles(
                &opts,
                &[Name::new("readers")],
                &["alice".to_string()],
                &RevokeOptions::default()
            ),
            "REVOKE \"readers\" FROM \"alice\";"
        );
    }
}
