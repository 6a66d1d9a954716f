//! Migration history tracking.
//!
//! This module manages the `pgforge_migrations` table that records which
//! migrations have been applied to the database.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;

use crate::error::{MigrateError, Result};

/// SQL to create the migrations history table.
pub const CREATE_MIGRATIONS_TABLE_SQL: &str = r"
CREATE TABLE IF NOT EXISTS pgforge_migrations (
    id SERIAL PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    run_on TIMESTAMPTZ NOT NULL DEFAULT now()
)
";

/// A record of an applied migration.
#[derive(Debug, Clone)]
pub struct AppliedMigration {
    /// Unique ID in the migrations table.
    pub id: i32,
    /// Migration name.
    pub name: String,
    /// When the migration was applied.
    pub run_on: DateTime<Utc>,
}

/// Manages the migration history in the database.
pub struct MigrationHistory {
    pool: PgPool,
}

impl MigrationHistory {
    /// Creates a new migration history manager.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Ensures the migrations table exists.
    ///
    /// # Errors
    ///
    /// Fails on database errors.
    pub async fn ensure_table(&self) -> Result<()> {
        sqlx::query(CREATE_MIGRATIONS_TABLE_SQL)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Records a migration as applied.
    ///
    /// # Errors
    ///
    /// Fails on database errors, including a duplicate name.
    pub async fn record_applied(&self, name: &str) -> Result<()> {
        sqlx::query("INSERT INTO pgforge_migrations (name) VALUES ($1)")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Removes a migration record after rollback.
    ///
    /// # Errors
    ///
    /// Fails when the migration was never recorded.
    pub async fn record_unapplied(&self, name: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM pgforge_migrations WHERE name = $1")
            .bind(name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(MigrateError::MigrationNotFound(name.to_string()));
        }
        Ok(())
    }

    /// Checks whether a migration has been applied.
    ///
    /// # Errors
    ///
    /// Fails on database errors.
    pub async fn is_applied(&self, name: &str) -> Result<bool> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM pgforge_migrations WHERE name = $1")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    /// Returns all applied migrations in application order.
    ///
    /// # Errors
    ///
    /// Fails on database errors.
    pub async fn get_applied(&self) -> Result<Vec<AppliedMigration>> {
        let rows: Vec<(i32, String, DateTime<Utc>)> =
            sqlx::query_as("SELECT id, name, run_on FROM pgforge_migrations ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, run_on)| AppliedMigration { id, name, run_on })
            .collect())
    }

    /// Returns the most recently applied migration.
    ///
    /// # Errors
    ///
    /// Fails on database errors.
    pub async fn get_last_applied(&self) -> Result<Option<AppliedMigration>> {
        let row: Option<(i32, String, DateTime<Utc>)> =
            sqlx::query_as("SELECT id, name, run_on FROM pgforge_migrations ORDER BY id DESC LIMIT 1")
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(id, name, run_on)| AppliedMigration { id, name, run_on }))
    }
}
