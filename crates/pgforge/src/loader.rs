//! Migration file discovery and parsing.
//!
//! Two file formats are supported. Plain `.sql` files are split into up
//! and down sections by marker comments (`-- Up Migration` and
//! `-- Down Migration`, matched case-insensitively with arbitrary
//! hyphen/whitespace padding). `.json` files hold a list of typed
//! operations whose SQL, and down SQL, are generated.

use std::fs;
use std::path::{Path, PathBuf};

use pgforge_core::operations::Operation;
use pgforge_core::options::FormattingOptions;
use tracing::debug;

use crate::error::{MigrateError, Result};

/// A migration loaded from disk, ready to run.
#[derive(Debug, Clone)]
pub struct Migration {
    /// Migration name (the file stem). Ordering is lexicographic, so
    /// names should carry a timestamp or sequence prefix.
    pub name: String,
    /// Forward SQL statements.
    pub up: Vec<String>,
    /// Reverse SQL statements; `None` makes the migration irreversible.
    pub down: Option<Vec<String>>,
    /// True when the statements must run outside a transaction.
    pub no_transaction: bool,
}

/// Matches a section marker line: `--`, then hyphens/whitespace, then
/// the direction word, whitespace, and `migration`.
fn is_marker(line: &str, direction: &str) -> bool {
    let Some(rest) = line.trim_start().strip_prefix("--") else {
        return false;
    };
    let rest = rest
        .trim_start_matches(|c: char| c.is_whitespace() || c == '-')
        .to_lowercase();
    let Some(rest) = rest.strip_prefix(direction) else {
        return false;
    };
    rest.trim_start().starts_with("migration")
}

fn parse_sql(name: &str, content: &str) -> Migration {
    let lines: Vec<&str> = content.lines().collect();
    let up_index = lines.iter().position(|l| is_marker(l, "up"));
    let down_index = lines.iter().position(|l| is_marker(l, "down"));

    let section = |range: std::ops::Range<usize>| lines[range].join("\n").trim().to_string();

    let (up, down) = match (up_index, down_index) {
        (_, None) => (content.trim().to_string(), None),
        (Some(up_index), Some(down_index)) if down_index < up_index => (
            section(up_index + 1..lines.len()),
            Some(section(down_index + 1..up_index)),
        ),
        (up_index, Some(down_index)) => (
            section(up_index.map_or(0, |i| i + 1)..down_index),
            Some(section(down_index + 1..lines.len())),
        ),
    };

    Migration {
        name: name.to_string(),
        up: vec![up],
        down: down.filter(|d| !d.is_empty()).map(|d| vec![d]),
        no_transaction: false,
    }
}

fn parse_operations(name: &str, content: &str, opts: &FormattingOptions) -> Result<Migration> {
    let operations: Vec<Operation> = serde_json::from_str(content)?;

    let mut up = Vec::new();
    for operation in &operations {
        up.extend(operation.up(opts)?);
    }

    let mut down = Some(Vec::new());
    for operation in operations.iter().rev() {
        match operation.reverse() {
            Ok(reversed) => {
                if let Some(down) = down.as_mut() {
                    down.extend(reversed.up(opts)?);
                }
            }
            Err(err) => {
                debug!(migration = name, %err, "migration is not reversible");
                down = None;
                break;
            }
        }
    }

    Ok(Migration {
        name: name.to_string(),
        up,
        down,
        no_transaction: operations.iter().any(Operation::requires_no_transaction),
    })
}

/// Loads a single migration file, dispatching on its extension.
///
/// # Errors
///
/// Fails on IO errors, malformed JSON, or SQL generation errors.
pub fn load_file(path: &Path, opts: &FormattingOptions) -> Result<Migration> {
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .ok_or_else(|| MigrateError::ParseError {
            path: path.to_path_buf(),
            message: "file has no name".to_string(),
        })?;
    let content = fs::read_to_string(path)?;

    match path.extension().and_then(|e| e.to_str()) {
        Some("sql") => Ok(parse_sql(&name, &content)),
        Some("json") => parse_operations(&name, &content, opts),
        _ => Err(MigrateError::ParseError {
            path: path.to_path_buf(),
            message: "unsupported migration file extension".to_string(),
        }),
    }
}

/// Discovers all migrations in a directory, ordered lexicographically by
/// file name.
///
/// # Errors
///
/// Fails when the directory does not exist or a file cannot be parsed.
pub fn load_dir(dir: &Path, opts: &FormattingOptions) -> Result<Vec<Migration>> {
    if !dir.is_dir() {
        return Err(MigrateError::MigrationsDirNotFound(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("sql" | "json")
            )
        })
        .collect();
    paths.sort();

    paths.iter().map(|path| load_file(path, opts)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_matching_is_lenient() {
        assert!(is_marker("-- Up Migration", "up"));
        assert!(is_marker("  ---- UP   MIGRATION ----", "up"));
        assert!(is_marker("-- down migration", "down"));
        assert!(!is_marker("-- pick up migrations later", "up"));
        assert!(!is_marker("CREATE TABLE t (id int);", "up"));
    }

    #[test]
    fn test_sql_split_up_then_down() {
        let migration = parse_sql(
            "0001_init",
            "-- Up Migration\nCREATE TABLE t (id int);\n-- Down Migration\nDROP TABLE t;\n",
        );
        assert_eq!(migration.up, vec!["CREATE TABLE t (id int);".to_string()]);
        assert_eq!(migration.down, Some(vec!["DROP TABLE t;".to_string()]));
    }

    #[test]
    fn test_sql_split_down_first() {
        let migration = parse_sql(
            "0002_swap",
            "-- Down Migration\nDROP TABLE t;\n-- Up Migration\nCREATE TABLE t (id int);\n",
        );
        assert_eq!(migration.up, vec!["CREATE TABLE t (id int);".to_string()]);
        assert_eq!(migration.down, Some(vec!["DROP TABLE t;".to_string()]));
    }

    #[test]
    fn test_sql_without_down_marker_is_irreversible() {
        let migration = parse_sql("0003_data", "UPDATE t SET v = 1;\n");
        assert_eq!(migration.up, vec!["UPDATE t SET v = 1;".to_string()]);
        assert_eq!(migration.down, None);
    }

    #[test]
    fn test_operations_file_generates_up_and_down() {
        let opts = FormattingOptions::default();
        let content = r#"[
            {"op": "createTable", "name": {"name": "names"}, "columns": [["id", "id"]], "options": {}}
        ]"#;
        let migration = parse_operations("0004_names", content, &opts).unwrap();
        assert_eq!(
            migration.up,
            vec!["CREATE TABLE \"names\" (\n  \"id\" serial PRIMARY KEY\n);".to_string()]
        );
        assert_eq!(migration.down, Some(vec!["DROP TABLE \"names\";".to_string()]));
        assert!(!migration.no_transaction);
    }

    #[test]
    fn test_operations_file_with_drop_is_irreversible() {
        let opts = FormattingOptions::default();
        let content = r#"[
            {"op": "dropTable", "name": {"name": "names"}, "options": {}}
        ]"#;
        let migration = parse_operations("0005_drop", content, &opts).unwrap();
        assert_eq!(migration.down, None);
    }

    #[test]
    fn test_load_dir_orders_lexicographically() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("0002_second.sql"),
            "-- Up Migration\nSELECT 2;",
        )
        .unwrap();
        fs::write(
            dir.path().join("0001_first.sql"),
            "-- Up Migration\nSELECT 1;",
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let opts = FormattingOptions::default();
        let migrations = load_dir(dir.path(), &opts).unwrap();
        let names: Vec<&str> = migrations.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["0001_first", "0002_second"]);
    }

    #[test]
    fn test_missing_dir_is_an_error() {
        let opts = FormattingOptions::default();
        let err = load_dir(Path::new("/nonexistent/migrations"), &opts).unwrap_err();
        assert!(matches!(err, MigrateError::MigrationsDirNotFound(_)));
    }
}
