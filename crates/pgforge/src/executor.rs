//! Migration execution.
//!
//! This module applies and rolls back loaded migrations against a
//! database, tracking history and wrapping each migration in its own
//! transaction unless its statements forbid one.

use sqlx::postgres::PgPool;
use tracing::{debug, info, warn};

use crate::error::{MigrateError, Result};
use crate::history::MigrationHistory;
use crate::loader::Migration;

/// Applies and rolls back migrations.
pub struct MigrationRunner {
    pool: PgPool,
    history: MigrationHistory,
    dry_run: bool,
}

impl MigrationRunner {
    /// Creates a new runner over a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let history = MigrationHistory::new(pool.clone());
        Self {
            pool,
            history,
            dry_run: false,
        }
    }

    /// Print SQL without executing it.
    #[must_use]
    pub const fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Access to the migration history.
    #[must_use]
    pub const fn history(&self) -> &MigrationHistory {
        &self.history
    }

    /// Ensures the history table exists.
    ///
    /// # Errors
    ///
    /// Fails on database errors.
    pub async fn init(&self) -> Result<()> {
        self.history.ensure_table().await
    }

    /// Filters out migrations that have already been applied, preserving
    /// order.
    ///
    /// # Errors
    ///
    /// Fails on database errors.
    pub async fn pending<'a>(&self, migrations: &'a [Migration]) -> Result<Vec<&'a Migration>> {
        let mut pending = Vec::new();
        for migration in migrations {
            if !self.history.is_applied(&migration.name).await? {
                pending.push(migration);
            }
        }
        Ok(pending)
    }

    async fn execute(&self, name: &str, statements: &[String], no_transaction: bool) -> Result<()> {
        if self.dry_run {
            for statement in statements {
                println!("{statement}");
            }
            return Ok(());
        }

        if no_transaction {
            warn!(
                migration = name,
                "running outside a transaction, a failure will not roll back"
            );
            for statement in statements {
                debug!(migration = name, statement, "executing");
                sqlx::raw_sql(statement).execute(&self.pool).await?;
            }
        } else {
            let mut tx = self.pool.begin().await?;
            for statement in statements {
                debug!(migration = name, statement, "executing");
                sqlx::raw_sql(statement.as_str()).execute(&mut *tx).await?;
            }
            tx.commit().await?;
        }
        Ok(())
    }

    /// Applies pending migrations in order, up to `count` of them.
    ///
    /// # Errors
    ///
    /// Fails on database errors; a failed migration leaves earlier ones
    /// applied and recorded.
    pub async fn apply(&self, migrations: &[Migration], count: Option<usize>) -> Result<usize> {
        let pending = self.pending(migrations).await?;
        let limit = count.unwrap_or(pending.len());

        let mut applied = 0;
        for migration in pending.into_iter().take(limit) {
            info!(migration = %migration.name, "applying");
            self.execute(&migration.name, &migration.up, migration.no_transaction)
                .await?;
            if !self.dry_run {
                self.history.record_applied(&migration.name).await?;
            }
            applied += 1;
        }
        Ok(applied)
    }

    /// Rolls back the last `count` applied migrations, newest first.
    ///
    /// # Errors
    ///
    /// Fails when an applied migration is missing from the loaded set,
    /// or has no down section.
    pub async fn rollback(&self, migrations: &[Migration], count: usize) -> Result<usize> {
        let applied = self.history.get_applied().await?;

        let mut rolled_back = 0;
        for record in applied.iter().rev().take(count) {
            let migration = migrations
                .iter()
                .find(|m| m.name == record.name)
                .ok_or_else(|| MigrateError::MigrationNotFound(record.name.clone()))?;
            let down = migration
                .down
                .as_ref()
                .ok_or_else(|| MigrateError::NotReversible(migration.name.clone()))?;

            info!(migration = %migration.name, "rolling back");
            self.execute(&migration.name, down, migration.no_transaction)
                .await?;
            if !self.dry_run {
                self.history.record_unapplied(&migration.name).await?;
            }
            rolled_back += 1;
        }
        Ok(rolled_back)
    }
}
