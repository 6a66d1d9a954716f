//! pgforge CLI
//!
//! Command-line tool for managing PostgreSQL schema migrations.

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use pgforge_core::options::FormattingOptions;
use pgforge_core::typing::TypeShorthands;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod error;
mod executor;
mod history;
mod loader;

use executor::MigrationRunner;

/// PostgreSQL schema migrations.
#[derive(Parser)]
#[command(name = "pgforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Database connection string.
    #[arg(
        short,
        long,
        env = "DATABASE_URL",
        default_value = "postgres://localhost/postgres"
    )]
    database: String,

    /// Migrations directory.
    #[arg(short, long, default_value = "migrations")]
    migrations_dir: PathBuf,

    /// Fold unquoted identifiers to lower case.
    #[arg(long)]
    decamelize: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the migrations system (create history table).
    Init,

    /// Apply pending migrations.
    Migrate {
        /// Number of migrations to apply (all if not specified).
        #[arg(short, long)]
        count: Option<usize>,

        /// Roll back migrations instead of applying.
        #[arg(short, long)]
        reverse: bool,

        /// Show SQL without executing (dry run).
        #[arg(long)]
        dry_run: bool,
    },

    /// Show migration status.
    ShowMigrations,

    /// Show SQL for pending migrations without executing.
    SqlMigrate {
        /// Show rollback SQL instead of forward SQL.
        #[arg(short, long)]
        reverse: bool,
    },

    /// Create a timestamped stub migration file.
    Create {
        /// Migration name, appended to the timestamp prefix.
        name: String,
    },
}

const MIGRATION_STUB: &str = "-- Up Migration\n\n-- Down Migration\n";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let opts = FormattingOptions::new(cli.decamelize, TypeShorthands::new());

    // `create` needs no database connection.
    if let Commands::Create { name } = &cli.command {
        let file_name = format!("{}_{name}.sql", Utc::now().format("%Y%m%d%H%M%S"));
        let path = cli.migrations_dir.join(&file_name);
        std::fs::create_dir_all(&cli.migrations_dir)?;
        std::fs::write(&path, MIGRATION_STUB)?;
        info!("Created migration: {}", path.display());
        return Ok(());
    }

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&cli.database)
        .await?;

    match cli.command {
        Commands::Init => {
            info!("Initializing migrations system...");
            MigrationRunner::new(pool).init().await?;
            info!("Migrations table created successfully.");
        }

        Commands::Migrate {
            count,
            reverse,
            dry_run,
        } => {
            let runner = MigrationRunner::new(pool).dry_run(dry_run);
            runner.init().await?;

            if dry_run {
                info!("Dry run mode - SQL will be printed but not executed.");
            }

            let migrations = loader::load_dir(&cli.migrations_dir, &opts)?;
            if reverse {
                let rolled_back = runner.rollback(&migrations, count.unwrap_or(1)).await?;
                info!("Rolled back {rolled_back} migration(s).");
            } else {
                let applied = runner.apply(&migrations, count).await?;
                info!("Applied {applied} migration(s).");
            }
        }

        Commands::ShowMigrations => {
            let runner = MigrationRunner::new(pool);
            runner.init().await?;

            let migrations = loader::load_dir(&cli.migrations_dir, &opts)?;
            let applied = runner.history().get_applied().await?;

            println!("\nMigrations:");
            println!("{:-<60}", "");
            for migration in &migrations {
                let marker = if applied.iter().any(|a| a.name == migration.name) {
                    "X"
                } else {
                    " "
                };
                println!(" [{marker}] {}", migration.name);
            }
            println!();
        }

        Commands::SqlMigrate { reverse } => {
            let runner = MigrationRunner::new(pool);
            runner.init().await?;

            let migrations = loader::load_dir(&cli.migrations_dir, &opts)?;
            for migration in runner.pending(&migrations).await? {
                println!("-- {}", migration.name);
                if reverse {
                    match &migration.down {
                        Some(down) => {
                            for statement in down {
                                println!("{statement}");
                            }
                        }
                        None => println!("-- not reversible"),
                    }
                } else {
                    for statement in &migration.up {
                        println!("{statement}");
                    }
                }
            }
        }

        Commands::Create { .. } => unreachable!("handled above"),
    }

    Ok(())
}
