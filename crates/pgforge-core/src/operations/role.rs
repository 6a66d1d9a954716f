//! Role operations.
//!
//! Role flags are three-state: unset emits nothing, `true` the positive
//! keyword, `false` the `NO`-prefixed form.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::name::Name;
use crate::options::FormattingOptions;
use crate::value::escape_string;

/// Options shared by `CREATE ROLE` and `ALTER ROLE`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RoleOptions {
    /// `SUPERUSER` / `NOSUPERUSER`.
    pub superuser: Option<bool>,
    /// `CREATEDB` / `NOCREATEDB`.
    pub createdb: Option<bool>,
    /// `CREATEROLE` / `NOCREATEROLE`.
    pub createrole: Option<bool>,
    /// `INHERIT` / `NOINHERIT`.
    pub inherit: Option<bool>,
    /// `LOGIN` / `NOLOGIN`.
    pub login: Option<bool>,
    /// `REPLICATION` / `NOREPLICATION`.
    pub replication: Option<bool>,
    /// `BYPASSRLS` / `NOBYPASSRLS`.
    pub bypassrls: Option<bool>,
    /// `PASSWORD`; `Some(None)` emits `PASSWORD NULL`.
    pub password: Option<Option<String>>,
    /// `ENCRYPTED` / `UNENCRYPTED` prefix for the password clause.
    pub encrypted: Option<bool>,
    /// `VALID UNTIL` timestamp, passed through as a string value.
    pub valid_until: Option<String>,
    /// `CONNECTION LIMIT`.
    pub connection_limit: Option<i64>,
    /// `IN ROLE` memberships.
    pub in_role: Vec<Name>,
    /// `ROLE` members.
    pub role: Vec<Name>,
    /// `ADMIN` members.
    pub admin: Vec<Name>,
}

fn flag(clauses: &mut Vec<String>, value: Option<bool>, keyword: &str) {
    match value {
        Some(true) => clauses.push(keyword.to_string()),
        Some(false) => clauses.push(format!("NO{keyword}")),
        None => {}
    }
}

fn role_list(opts: &FormattingOptions, roles: &[Name]) -> String {
    roles
        .iter()
        .map(|r| opts.literal.render(r))
        .collect::<Vec<_>>()
        .join(", ")
}

fn role_clauses(opts: &FormattingOptions, options: &RoleOptions) -> Vec<String> {
    let mut clauses = Vec::new();
    flag(&mut clauses, options.superuser, "SUPERUSER");
    flag(&mut clauses, options.createdb, "CREATEDB");
    flag(&mut clauses, options.createrole, "CREATEROLE");
    flag(&mut clauses, options.inherit, "INHERIT");
    flag(&mut clauses, options.login, "LOGIN");
    flag(&mut clauses, options.replication, "REPLICATION");
    flag(&mut clauses, options.bypassrls, "BYPASSRLS");
    match &options.password {
        Some(Some(password)) => {
            let prefix = match options.encrypted {
                Some(false) => "UNENCRYPTED ",
                // ENCRYPTED is the server default but kept explicit when asked.
                Some(true) => "ENCRYPTED ",
                None => "",
            };
            clauses.push(format!("{prefix}PASSWORD {}", escape_string(password)));
        }
        Some(None) => clauses.push("PASSWORD NULL".to_string()),
        None => {}
    }
    if let Some(valid_until) = &options.valid_until {
        clauses.push(format!("VALID UNTIL {}", escape_string(valid_until)));
    }
    if let Some(limit) = options.connection_limit {
        clauses.push(format!("CONNECTION LIMIT {limit}"));
    }
    if !options.in_role.is_empty() {
        clauses.push(format!("IN ROLE {}", role_list(opts, &options.in_role)));
    }
    if !options.role.is_empty() {
        clauses.push(format!("ROLE {}", role_list(opts, &options.role)));
    }
    if !options.admin.is_empty() {
        clauses.push(format!("ADMIN {}", role_list(opts, &options.admin)));
    }
    clauses
}

/// Builds `CREATE ROLE`.
#[must_use]
pub fn create_role(opts: &FormattingOptions, name: &Name, options: &RoleOptions) -> String {
    let clauses = role_clauses(opts, options);
    let with = if clauses.is_empty() {
        String::new()
    } else {
        format!(" WITH {}", clauses.join(" "))
    };
    format!("CREATE ROLE {}{with};", opts.literal.render(name))
}

/// Builds `ALTER ROLE`.
///
/// # Errors
///
/// Fails when no role option is specified. Membership lists are only
/// valid at creation time.
pub fn alter_role(opts: &FormattingOptions, name: &Name, options: &RoleOptions) -> Result<String> {
    if !options.in_role.is_empty() || !options.role.is_empty() || !options.admin.is_empty() {
        return Err(CoreError::InvalidOption {
            operation: "alterRole",
            message: "role memberships cannot be altered here, use GRANT".to_string(),
        });
    }
    let clauses = role_clauses(opts, options);
    if clauses.is_empty() {
        return Err(CoreError::InvalidOption {
            operation: "alterRole",
            message: "no role options specified".to_string(),
        });
    }
    Ok(format!(
        "ALTER ROLE {} WITH {};",
        opts.literal.render(name),
        clauses.join(" ")
    ))
}

/// Builds `DROP ROLE`.
#[must_use]
pub fn drop_role(opts: &FormattingOptions, name: &Name, if_exists: bool) -> String {
    let if_exists = if if_exists { " IF EXISTS" } else { "" };
    format!("DROP ROLE{if_exists} {};", opts.literal.render(name))
}

/// Builds `ALTER ROLE .. RENAME TO`.
#[must_use]
pub fn rename_role(opts: &FormattingOptions, name: &Name, new_name: &Name) -> String {
    format!(
        "ALTER ROLE {} RENAME TO {};",
        opts.literal.render(name),
        opts.literal.render(new_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_role_bare() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_role(&opts, &Name::new("reporting"), &RoleOptions::default()),
            "CREATE ROLE \"reporting\";"
        );
    }

    #[test]
    fn test_create_role_three_state_flags() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_role(
                &opts,
                &Name::new("app"),
                &RoleOptions {
                    login: Some(true),
                    superuser: Some(false),
                    connection_limit: Some(10),
                    ..RoleOptions::default()
                }
            ),
            "CREATE ROLE \"app\" WITH NOSUPERUSER LOGIN CONNECTION LIMIT 10;"
        );
    }

    #[test]
    fn test_create_role_password_and_memberships() {
        let opts = FormattingOptions::default();
        let sql = create_role(
            &opts,
            &Name::new("app"),
            &RoleOptions {
                password: Some(Some("s3cret".to_string())),
                valid_until: Some("2027-01-01".to_string()),
                in_role: vec![Name::new("readers")],
                ..RoleOptions::default()
            },
        );
        assert_eq!(
            sql,
            "CREATE ROLE \"app\" WITH PASSWORD $pga$s3cret$pga$ VALID UNTIL $pga$2027-01-01$pga$ IN ROLE \"readers\";"
        );
    }

    #[test]
    fn test_alter_role_rejects_memberships() {
        let opts = FormattingOptions::default();
        let err = alter_role(
            &opts,
            &Name::new("app"),
            &RoleOptions {
                in_role: vec![Name::new("readers")],
                ..RoleOptions::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidOption { .. }));
    }

    #[test]
    fn test_alter_role_password_null() {
        let opts = FormattingOptions::default();
        assert_eq!(
            alter_role(
                &opts,
                &Name::new("app"),
                &RoleOptions {
                    password: Some(None),
                    ..RoleOptions::default()
                }
            )
            .unwrap(),
            "ALTER ROLE \"app\" WITH PASSWORD NULL;"
        );
    }

    #[test]
    fn test_drop_and_rename_role() {
        let opts = FormattingOptions::default();
        assert_eq!(
            drop_role(&opts, &Name::new("app"), true),
            "DROP ROLE IF EXISTS \"app\";"
        );
        assert_eq!(
            rename_role(&opts, &Name::new("app"), &Name::new("service")),
            "ALTER ROLE \"app\" RENAME TO \"service\";"
        );
    }
}
