//! Command-line interface for pgarchive: archive landing tables into
//! timestamped archive tables.
//!
//! This file implements the CLI entry point for pgarchive, allowing users to
//! run the configured archival batch, archive a single table, and inspect the
//! archival plan or a table's columns.
//!
//! ## What
//!
//! - Provides commands for batch runs, single-table archival, and inspection.
//! - Supports output in JSON and table formats.
//!
//! ## How
//!
//! Run the CLI with various subcommands to interact with pgarchive. See
//! `--help` for usage details.
//!
//! ### Example
//!
//! ```sh
//! pgarchive run
//! pgarchive table orders
//! pgarchive columns orders
//! ```
use clap::{Parser, Subcommand};
use pgarchive::config::Config;
use pgarchive::types::TableSpec;
use pgarchive::BatchRunner;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::fs::File;
use std::process;

mod output;

use crate::output::{JsonOutputWriter, OutputWriter, TableOutputWriter};

#[derive(Parser)]
#[command(name = "pgarchive")]
#[command(about = "Archive PostgreSQL landing tables into timestamped archive tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database URL (highest priority, overrides all other config sources)
    #[arg(long, short = 'd')]
    dsn: Option<String>,

    /// Config file path (overrides environment variables and defaults)
    #[arg(long, short = 'c')]
    config: Option<String>,

    /// Log destination: stderr or file path
    #[arg(long, default_value = "stderr")]
    log_dest: String,

    /// Log level: error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output format: json, table
    #[arg(long, default_value = "table")]
    format: String,

    /// Output destination: stdout or file path
    #[arg(long, default_value = "stdout")]
    out: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Archive every configured landing table, in configuration order
    Run {
        /// Print the synthesized statements without executing them
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },
    /// Archive a single landing table
    Table {
        /// Name of the landing table
        name: String,
        /// Print the synthesized statement without executing it
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },
    /// Show the resolved archival plan from configuration
    Tables,
    /// Show the ordered column list of a landing table
    Columns {
        /// Name of the landing table
        table: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.log_level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" => tracing::Level::WARN,
        "info" => tracing::Level::INFO,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        other => {
            eprintln!("Unknown log level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let writer: Box<dyn Fn() -> Box<dyn std::io::Write + Send> + Send + Sync> =
        if cli.log_dest == "stderr" {
            Box::new(|| Box::new(std::io::stderr()))
        } else {
            let file = std::fs::File::create(&cli.log_dest).expect("Failed to create log file");
            Box::new(move || Box::new(file.try_clone().expect("Failed to clone log file")))
        };

    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(writer)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    if let Err(e) = run_cli(cli).await {
        tracing::error!("Error: {}", e);
        process::exit(1);
    }
}

/// Run the CLI with the provided arguments and configuration.
///
/// This function handles loading configuration from multiple sources,
/// opening the connection pool, and dispatching to the appropriate command
/// handler. Configuration or connection failures are fatal; per-table
/// archival failures are not.
///
/// # Arguments
/// * `cli` - Parsed CLI arguments and options
///
/// # Returns
/// Ok if the command executed successfully, error otherwise.
async fn run_cli(cli: Cli) -> anyhow::Result<()> {
    // Load configuration using the prioritized loading system
    // Priority order:
    // 1. --dsn CLI argument (if provided)
    // 2. --config CLI argument (if provided)
    // 3. PGARCHIVE_CONFIG_FILE environment variable
    // 4. PGARCHIVE_DSN and other environment variables
    // 5. Default config files (pgarchive.yaml, pgarchive.yml)
    let config = Config::load_with_options(cli.dsn, cli.config)
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    let pool = connect(&config).await?;
    let runner = BatchRunner::new(pool);

    let writer = match cli.format.to_lowercase().as_str() {
        "json" => OutputWriter::Json(JsonOutputWriter),
        _ => OutputWriter::Table(TableOutputWriter),
    };
    // Use an owned boxed writer so the underlying writer lives long enough for borrows
    let mut out_writer: Box<dyn std::io::Write> = match cli.out.as_str() {
        "stdout" => Box::new(std::io::stdout()),
        _ => Box::new(File::create(&cli.out)?),
    };
    let out: &mut dyn std::io::Write = out_writer.as_mut();

    match cli.command {
        Commands::Run { dry_run } => {
            let specs = config.table_specs()?;
            if specs.is_empty() {
                tracing::warn!("No tables configured, nothing to archive");
                return Ok(());
            }
            if dry_run {
                print_statements(&runner, &specs).await;
                return Ok(());
            }
            tracing::info!("Archiving {} tables...", specs.len());
            let summary = runner.run_all(&specs).await;
            tracing::info!("{}", summary);
            writer.write_list(&summary.outcomes, out)?;
        }

        Commands::Table { name, dry_run } => {
            pgarchive::config::validate_identifier("table", &name)?;
            let spec = TableSpec::new(&config.landing_schema, &name, &config.archive_schema);
            if dry_run {
                print_statements(&runner, std::slice::from_ref(&spec)).await;
                return Ok(());
            }
            let summary = runner.run_all(std::slice::from_ref(&spec)).await;
            writer.write_list(&summary.outcomes, out)?;
        }

        Commands::Tables => {
            let specs = config.table_specs()?;
            tracing::info!("{} tables configured", specs.len());
            writer.write_list(&specs, out)?;
        }

        Commands::Columns { table } => {
            let columns = runner
                .archiver()
                .inspector()
                .columns_of(&config.landing_schema, &table)
                .await?;
            if columns.is_empty() {
                return Err(anyhow::anyhow!(
                    "No columns found for table '{}.{}'",
                    config.landing_schema,
                    table
                ));
            }
            match cli.format.to_lowercase().as_str() {
                "json" => writeln!(out, "{}", serde_json::to_string_pretty(&columns)?)?,
                _ => {
                    for column in &columns {
                        writeln!(out, "{}", column)?;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Open the connection pool for the run.
///
/// The pool is opened once before the batch and dropped after; tables are
/// processed sequentially over it.
async fn connect(config: &Config) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.dsn)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;
    Ok(pool)
}

/// Log each table's synthesized statement without executing it.
async fn print_statements(runner: &BatchRunner, specs: &[TableSpec]) {
    for spec in specs {
        match runner.archiver().statement_for(spec).await {
            Ok(sql) => tracing::info!("Archive statement for {} (dry run): {}", spec, sql),
            Err(e) => tracing::error!("Failed to resolve {}: {}", spec, e),
        }
    }
}
