//! Row-level security policy operations.

use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::options::FormattingOptions;

/// Command a policy applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PolicyCommand {
    /// `ALL` (the default).
    All,
    /// `SELECT`.
    Select,
    /// `INSERT`.
    Insert,
    /// `UPDATE`.
    Update,
    /// `DELETE`.
    Delete,
}

impl PolicyCommand {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::Select => "SELECT",
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

/// Options for `CREATE POLICY` and `ALTER POLICY`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyOptions {
    /// Command the policy applies to; create-only.
    pub command: Option<PolicyCommand>,
    /// Roles the policy applies to; empty means `PUBLIC`.
    pub roles: Vec<String>,
    /// `USING` visibility expression.
    pub using: Option<String>,
    /// `WITH CHECK` write expression.
    pub check: Option<String>,
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

/// Builds `CREATE POLICY`.
#[must_use]
pub fn create_policy(
    opts: &FormattingOptions,
    table: &Name,
    name: &str,
    options: &PolicyOptions,
) -> String {
    let command = options.command.unwrap_or(PolicyCommand::All);
    let using = options
        .using
        .as_ref()
        .map_or_else(String::new, |u| format!(" USING ({u})"));
    let check = options
        .check
        .as_ref()
        .map_or_else(String::new, |c| format!(" WITH CHECK ({c})"));
    format!(
        "CREATE POLICY {} ON {} FOR {} TO {}{using}{check};",
        opts.literal.render_str(name),
        opts.literal.render(table),
        command.as_sql(),
        roles_sql(opts, &options.roles)
    )
}

/// Builds `ALTER POLICY`. The command cannot be altered, only roles and
/// expressions.
#[must_use]
pub fn alter_policy(
    opts: &FormattingOptions,
    table: &Name,
    name: &str,
    options: &PolicyOptions,
) -> String {
    let mut clauses = Vec::new();
    if !options.roles.is_empty() {
        clauses.push(format!("TO {}", roles_sql(opts, &options.roles)));
    }
    if let Some(using) = &options.using {
        clauses.push(format!("USING ({using})"));
    }
    if let Some(check) = &options.check {
        clauses.push(format!("WITH CHECK ({check})"));
    }
    format!(
        "ALTER POLICY {} ON {} {};",
        opts.literal.render_str(name),
        opts.literal.render(table),
        clauses.join(" ")
    )
}

/// Builds `DROP POLICY`.
#[must_use]
pub fn drop_policy(opts: &FormattingOptions, table: &Name, name: &str, if_exists: bool) -> String {
    let if_exists = if if_exists { " IF EXISTS" } else { "" };
    format!(
        "DROP POLICY{if_exists} {} ON {};",
        opts.literal.render_str(name),
        opts.literal.render(table)
    )
}

/// Builds `ALTER POLICY .. RENAME TO`.
#[must_use]
pub fn rename_policy(
    opts: &FormattingOptions,
    table: &Name,
    old_name: &str,
    new_name: &str,
) -> String {
    format!(
        "ALTER POLICY {} ON {} RENAME TO {};",
        opts.literal.render_str(old_name),
        opts.literal.render(table),
        opts.literal.render_str(new_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_policy_defaults() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_policy(&opts, &Name::new("docs"), "docs_select", &PolicyOptions::default()),
            "CREATE POLICY \"docs_select\" ON \"docs\" FOR ALL TO PUBLIC;"
        );
    }

    #[test]
    fn test_create_policy_full() {
        let opts = FormattingOptions::default();
        let sql = create_policy(
            &opts,
            &Name::new("docs"),
            "docs_owner",
            &PolicyOptions {
                command: Some(PolicyCommand::Update),
                roles: vec!["editor".to_string(), "admin".to_string()],
                using: Some("owner = current_user".to_string()),
                check: Some("owner = current_user".to_string()),
            },
        );
        assert_eq!(
            sql,
            "CREATE POLICY \"docs_owner\" ON \"docs\" FOR UPDATE TO \"editor\", \"admin\" USING (owner = current_user) WITH CHECK (owner = current_user);"
        );
    }

    #[test]
    fn test_alter_policy() {
        let opts = FormattingOptions::default();
        assert_eq!(
            alter_policy(
                &opts,
                &Name::new("docs"),
                "docs_owner",
                &PolicyOptions {
                    using: Some("true".to_string()),
                    ..PolicyOptions::default()
                }
            ),
            "ALTER POLICY \"docs_owner\" ON \"docs\" USING (true);"
        );
    }

    #[test]
    fn test_drop_and_rename_policy() {
        let opts = FormattingOptions::default();
        assert_eq!(
            drop_policy(&opts, &Name::new("docs"), "docs_owner", true),
            "DROP POLICY IF EXISTS \"docs_owner\" ON \"docs\";"
        );
        assert_eq!(
            rename_policy(&opts, &Name::new("docs"), "docs_owner", "docs_write"),
            "ALTER POLICY \"docs_owner\" ON \"docs\" RENAME TO \"docs_write\";"
        );
    }
}
