//! PostgreSQL schema diagram tool.
//!
//! Reads the catalog of a PostgreSQL database and writes PlantUML
//! entity-relationship diagrams, either as one combined diagram or as a
//! directory tree with one diagram per schema and table plus
//! reStructuredText table documentation.
//!
//! # Security Guarantees
//! - Read-only database sessions, catalog queries only
//! - Connection strings are redacted in logs and errors

use anyhow::Context;
use clap::Parser;
use pgplanter_core::{
    OutputTarget, RunConfig, SkipFlags, TableFilter, adapters::postgres::PostgresCatalog,
    config::DEFAULT_SCHEMA, create_catalog, error::redact_database_url, init_logging,
};
use std::path::PathBuf;
use tracing::{error, info};

/// Label used in directory mode when neither `--dbname` nor the URL names one.
const FALLBACK_DATABASE_LABEL: &str = "db";

#[derive(Parser, Debug)]
#[command(name = "pgplanter")]
#[command(about = "Render PostgreSQL schemas as PlantUML ER diagrams")]
#[command(version)]
#[command(long_about = "
pgplanter - PostgreSQL schemas as PlantUML ER diagrams

Reads tables, columns and foreign keys from the catalog and writes either one
combined diagram or, with --output-dir, a directory tree:

  erd.iuml, legend.iuml          shared include fragments
  sql-db-<dbname>-er.puml        every schema, cross-schema relations
  description.rst                reStructuredText table documentation
  <schema>/_schema.puml          every table of the schema
  <schema>/<table>.puml          column detail of one table

EXAMPLES:
  pgplanter postgres://reader@localhost/shop > shop.puml
  pgplanter -s public -s audit -p docs/erd postgres://reader@localhost/shop
  pgplanter -x schema_migrations -f _history -q f postgres://localhost/shop
")]
pub struct Cli {
    /// Database connection URL
    #[arg(
        value_name = "CONN",
        help = "PostgreSQL connection string (credentials will be sanitized in logs)"
    )]
    pub database_url: String,

    /// Schemas to load, in output order
    #[arg(short, long = "schema", value_name = "NAME", default_value = DEFAULT_SCHEMA)]
    pub schemas: Vec<String>,

    /// Single diagram output file
    #[arg(
        short,
        long,
        conflicts_with = "output_dir",
        help = "Write the combined diagram to this file instead of stdout"
    )]
    pub output: Option<PathBuf>,

    /// Directory tree output
    #[arg(
        short = 'p',
        long,
        alias = "output_dir",
        help = "Write one diagram per schema and table under this directory"
    )]
    pub output_dir: Option<PathBuf>,

    /// Database label in directory mode
    #[arg(
        short = 'd',
        long = "dbname",
        value_name = "LABEL",
        help = "Database label for the top-level diagram (defaults to the database name)"
    )]
    pub database_label: Option<String>,

    /// Tables to keep
    #[arg(short = 't', long = "table", value_name = "NAME")]
    pub tables: Vec<String>,

    /// Tables to drop
    #[arg(short = 'x', long = "exclude", value_name = "NAME")]
    pub excluded: Vec<String>,

    /// Drop tables whose name ends with this suffix
    #[arg(short = 'f', long, alias = "exclude_suffix", value_name = "SUFFIX")]
    pub exclude_suffix: Option<String>,

    /// Loading steps to skip
    #[arg(
        short = 'q',
        long,
        alias = "skip_flags",
        value_name = "FLAGS",
        default_value = "",
        help = "Loading steps to skip ('f' skips foreign keys)"
    )]
    pub skip_flags: String,

    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(long, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

impl Cli {
    /// Builds the run configuration from the parsed arguments.
    fn run_config(&self) -> RunConfig {
        let mut filter = TableFilter::new()
            .with_include(self.tables.clone())
            .with_exclude(self.excluded.clone());
        if let Some(suffix) = &self.exclude_suffix {
            filter = filter.with_exclude_suffix(suffix.as_str());
        }

        let output = match (&self.output_dir, &self.output) {
            (Some(root), _) => OutputTarget::Directory {
                root: root.clone(),
                database_label: self.database_label(),
            },
            (None, Some(path)) => OutputTarget::File(path.clone()),
            (None, None) => OutputTarget::Stdout,
        };

        RunConfig::new(self.schemas.clone())
            .with_filter(filter)
            .with_skip(SkipFlags::parse(&self.skip_flags))
            .with_output(output)
    }

    /// `--dbname`, else the database named in the URL, else `db`.
    fn database_label(&self) -> String {
        self.database_label
            .clone()
            .or_else(|| {
                PostgresCatalog::parse_connection_config(&self.database_url)
                    .ok()
                    .and_then(|config| config.database)
            })
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| FALLBACK_DATABASE_LABEL.to_string())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = render_schemas(&cli).await {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Connects, then renders every configured schema.
async fn render_schemas(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.run_config();
    config.validate()?;

    info!("Target: {}", redact_database_url(&cli.database_url));
    let catalog = create_catalog(&cli.database_url)
        .await
        .context("Failed to create database catalog")?;
    catalog.test_connection().await?;

    let summary = pgplanter_core::run(catalog.as_ref(), &config).await?;
    info!(
        "✓ Wrote {} tables and {} relations",
        summary.tables, summary.relations
    );
    Ok(())
}
