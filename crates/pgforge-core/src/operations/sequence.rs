//! Sequence operations.

use serde::{Deserialize, Serialize};

use crate::name::Name;
use crate::options::FormattingOptions;

use super::DropOptions;

/// Options shared by `CREATE SEQUENCE`, `ALTER SEQUENCE` and identity
/// columns.
///
/// `min_value` and `max_value` are three-state: `None` omits the clause,
/// `Some(None)` emits the negated keyword (`NO MINVALUE`), `Some(Some(n))`
/// emits the bound.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SequenceOptions {
    /// Sequence data type (`AS` clause).
    pub data_type: Option<String>,
    /// `INCREMENT BY`.
    pub increment: Option<i64>,
    /// `MINVALUE n` / `NO MINVALUE`.
    pub min_value: Option<Option<i64>>,
    /// `MAXVALUE n` / `NO MAXVALUE`.
    pub max_value: Option<Option<i64>>,
    /// `START WITH`.
    pub start: Option<i64>,
    /// `RESTART` (`true`) or `RESTART WITH n`; only meaningful on alter.
    pub restart: Option<Option<i64>>,
    /// `CACHE`.
    pub cache: Option<i64>,
    /// `CYCLE` / `NO CYCLE`.
    pub cycle: Option<bool>,
    /// `OWNED BY table.column` / `OWNED BY NONE` (`None` inner value).
    pub owned_by: Option<Option<Name>>,
}

/// Renders the option clauses in dialect order.
pub(crate) fn sequence_clauses(opts: &FormattingOptions, options: &SequenceOptions) -> Vec<String> {
    let mut clauses = Vec::new();
    if let Some(data_type) = &options.data_type {
        clauses.push(format!("AS {data_type}"));
    }
    if let Some(increment) = options.increment {
        clauses.push(format!("INCREMENT BY {increment}"));
    }
    match options.min_value {
        Some(Some(min)) => clauses.push(format!("MINVALUE {min}")),
        Some(None) => clauses.push("NO MINVALUE".to_string()),
        None => {}
    }
    match options.max_value {
        Some(Some(max)) => clauses.push(format!("MAXVALUE {max}")),
        Some(None) => clauses.push("NO MAXVALUE".to_string()),
        None => {}
    }
    if let Some(start) = options.start {
        clauses.push(format!("START WITH {start}"));
    }
    match options.restart {
        Some(Some(restart)) => clauses.push(format!("RESTART WITH {restart}")),
        Some(None) => clauses.push("RESTART".to_string()),
        None => {}
    }
    if let Some(cache) = options.cache {
        clauses.push(format!("CACHE {cache}"));
    }
    match options.cycle {
        Some(true) => clauses.push("CYCLE".to_string()),
        Some(false) => clauses.push("NO CYCLE".to_string()),
        None => {}
    }
    match &options.owned_by {
        Some(Some(owner)) => clauses.push(format!("OWNED BY {}", opts.literal.render(owner))),
        Some(None) => clauses.push("OWNED BY NONE".to_string()),
        None => {}
    }
    clauses
}

/// Options for `CREATE SEQUENCE`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreateSequenceOptions {
    /// Create a temporary sequence.
    pub temporary: bool,
    /// Add `IF NOT EXISTS`.
    pub if_not_exists: bool,
    /// Sequence option clauses.
    #[serde(flatten)]
    pub options: SequenceOptions,
}

/// Builds `CREATE SEQUENCE`.
#[must_use]
pub fn create_sequence(
    opts: &FormattingOptions,
    name: &Name,
    options: &CreateSequenceOptions,
) -> String {
    let temporary = if options.temporary { " TEMPORARY" } else { "" };
    let if_not_exists = if options.if_not_exists {
        " IF NOT EXISTS"
    } else {
        ""
    };
    let clauses = sequence_clauses(opts, &options.options);
    let clauses = if clauses.is_empty() {
        String::new()
    } else {
        format!("\n  {}", clauses.join("\n  "))
    };
    format!(
        "CREATE{temporary} SEQUENCE{if_not_exists} {}{clauses};",
        opts.literal.render(name)
    )
}

/// Builds `ALTER SEQUENCE`.
#[must_use]
pub fn alter_sequence(opts: &FormattingOptions, name: &Name, options: &SequenceOptions) -> String {
    let clauses = sequence_clauses(opts, options);
    format!(
        "ALTER SEQUENCE {}\n  {};",
        opts.literal.render(name),
        clauses.join("\n  ")
    )
}

/// Builds `DROP SEQUENCE`.
#[must_use]
pub fn drop_sequence(opts: &FormattingOptions, name: &Name, options: DropOptions) -> String {
    format!(
        "DROP SEQUENCE{} {}{};",
        options.if_exists_sql(),
        opts.literal.render(name),
        options.cascade_sql()
    )
}

/// Builds `ALTER SEQUENCE .. RENAME TO`.
#[must_use]
pub fn rename_sequence(opts: &FormattingOptions, name: &Name, new_name: &Name) -> String {
    format!(
        "ALTER SEQUENCE {} RENAME TO {};",
        opts.literal.render(name),
        opts.literal.render(new_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sequence_minimal() {
        let opts = FormattingOptions::default();
        assert_eq!(
            create_sequence(&opts, &Name::new("order_seq"), &CreateSequenceOptions::default()),
            "CREATE SEQUENCE \"order_seq\";"
        );
    }

    #[test]
    fn test_create_sequence_with_options() {
        let opts = FormattingOptions::default();
        let options = CreateSequenceOptions {
            temporary: true,
            if_not_exists: true,
            options: SequenceOptions {
                increment: Some(10),
                min_value: Some(None),
                max_value: Some(Some(10_000)),
                cycle: Some(true),
                ..SequenceOptions::default()
            },
        };
        assert_eq!(
            create_sequence(&opts, &Name::new("order_seq"), &options),
            "CREATE TEMPORARY SEQUENCE IF NOT EXISTS \"order_seq\"\n  INCREMENT BY 10\n  NO MINVALUE\n  MAXVALUE 10000\n  CYCLE;"
        );
    }

    #[test]
    fn test_three_state_cycle_flag() {
        let opts = FormattingOptions::default();
        let negated = SequenceOptions {
            cycle: Some(false),
            ..SequenceOptions::default()
        };
        assert_eq!(
            alter_sequence(&opts, &Name::new("s"), &negated),
            "ALTER SEQUENCE \"s\"\n  NO CYCLE;"
        );
    }

    #[test]
    fn test_alter_sequence_restart_and_owner() {
        let opts = FormattingOptions::default();
        let options = SequenceOptions {
            restart: Some(None),
            owned_by: Some(Some(Name::qualified("orders", "id"))),
            ..SequenceOptions::default()
        };
        assert_eq!(
            alter_sequence(&opts, &Name::new("order_seq"), &options),
            "ALTER SEQUENCE \"order_seq\"\n  RESTART\n  OWNED BY \"orders\".\"id\";"
        );
    }

    #[test]
    fn test_drop_sequence() {
        let opts = FormattingOptions::default();
        assert_eq!(
            drop_sequence(
                &opts,
                &Name::new("order_seq"),
                DropOptions {
                    if_exists: true,
                    cascade: true,
                }
            ),
            "DROP SEQUENCE IF EXISTS \"order_seq\" CASCADE;"
        );
    }
}
