//! Command-line interface for fixture-forge
//!
//! # Usage Examples
//!
//! ```bash
//! # Valid fixtures, one JSON document per line
//! fixture-forge generate --schema types.yaml --type User --count 3 --seed 42
//!
//! # Fixtures that break at least one constraint
//! fixture-forge generate --schema types.yaml --type User --mode anti-expected
//!
//! # Zero-valued fixture with generation parameters from a file
//! fixture-forge generate --schema types.yaml --type User --mode default-value \
//!   --config generation.toml --pretty
//!
//! # Report unknown type references and invalid patterns
//! fixture-forge check --schema types.yaml
//! ```
//!
//! Logging is controlled through `RUST_LOG`, e.g. `RUST_LOG=fixture_generator=debug`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use fixture_core::FixtureSchema;
use fixture_forge::{check_schema, generate_documents, load_config, Mode};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fixture-forge")]
#[command(about = "Generate valid, invalid and default-value test fixtures from type schemas")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate fixtures for a type and print them as JSON
    Generate {
        /// Schema file describing the types (YAML)
        #[arg(long, value_name = "PATH")]
        schema: PathBuf,

        /// Name of the type to generate
        #[arg(long = "type", value_name = "NAME")]
        type_name: String,

        /// Generation mode
        #[arg(long, value_enum, default_value = "expected")]
        mode: Mode,

        /// Number of fixtures to generate
        #[arg(long, default_value = "1")]
        count: u64,

        /// Seed for reproducible output (overrides the config file)
        #[arg(long, env = "FIXTURE_FORGE_SEED")]
        seed: Option<u64>,

        /// Generation config file (YAML, or TOML by extension)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Pretty-print each document
        #[arg(long)]
        pretty: bool,
    },

    /// Validate a schema file
    Check {
        /// Schema file describing the types (YAML)
        #[arg(long, value_name = "PATH")]
        schema: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            schema,
            type_name,
            mode,
            count,
            seed,
            config,
            pretty,
        } => run_generate(schema, type_name, mode, count, seed, config, pretty),
        Commands::Check { schema } => run_check(schema),
    }
}

fn load_schema(path: &Path) -> anyhow::Result<FixtureSchema> {
    FixtureSchema::from_file(path).with_context(|| format!("Failed to load schema from {path:?}"))
}

fn run_generate(
    schema: PathBuf,
    type_name: String,
    mode: Mode,
    count: u64,
    seed: Option<u64>,
    config: Option<PathBuf>,
    pretty: bool,
) -> anyhow::Result<()> {
    let fixture_schema = load_schema(&schema)?;
    let config = load_config(config.as_deref(), seed)?;

    let documents = generate_documents(fixture_schema, &type_name, mode, count, config)?;
    for document in documents {
        let rendered = if pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        println!("{rendered}");
    }
    Ok(())
}

fn run_check(schema: PathBuf) -> anyhow::Result<()> {
    let fixture_schema = load_schema(&schema)?;
    let type_count = fixture_schema.types.len();
    let issues = check_schema(fixture_schema)?;

    if issues.is_empty() {
        tracing::info!("Schema {:?} is valid", schema);
        println!("OK: {type_count} type(s)");
        return Ok(());
    }

    for issue in &issues {
        println!("{issue}");
    }
    anyhow::bail!("{} issue(s) found in {:?}", issues.len(), schema)
}
