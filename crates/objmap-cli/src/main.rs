//! # objmap-cli
//!
//! Command-line front end for `objmap` mapping documents.
//!
//! `objmap map` reshapes a JSON document (or every element of a JSON array)
//! with a YAML or JSON mapping file; `objmap check` loads and compiles a
//! mapping file and lists its fields.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use objmap::{MappingConfig, Value, map_object};
use objmap_dsl::registry::string_utils;
use objmap_dsl::{MappingDocument, MappingDsl};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "objmap")]
#[command(about = "Reshape JSON documents with declarative mapping files")]
#[command(version)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a JSON document, or each element of a JSON array
    Map {
        /// Input JSON file (stdin when omitted)
        input: Option<PathBuf>,

        /// Mapping file path (.json for JSON, YAML otherwise)
        #[arg(short, long)]
        mapping: PathBuf,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print the mapped JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Load and compile a mapping file, then list its fields
    Check {
        /// Mapping file path
        #[arg(short, long)]
        mapping: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Map {
            input,
            mapping,
            output,
            pretty,
        } => run_map(input.as_deref(), &mapping, output.as_deref(), pretty),
        Commands::Check { mapping } => run_check(&mapping),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_mapping(path: &Path) -> anyhow::Result<(MappingDocument, MappingConfig)> {
    let document = MappingDsl::parse_file(path)
        .with_context(|| format!("Failed to load mapping {}", path.display()))?;
    let config = document
        .compile(&string_utils())
        .with_context(|| format!("Failed to compile mapping '{}'", document.name))?;
    Ok((document, config))
}

fn run_map(
    input: Option<&Path>,
    mapping: &Path,
    output: Option<&Path>,
    pretty: bool,
) -> anyhow::Result<()> {
    let (document, config) = load_mapping(mapping)?;
    let source = read_input(input)?;

    let mapped = match &source {
        Value::Array(items) => {
            tracing::info!(mapping = %document.name, records = items.len(), "Mapping array input");
            let records = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    map_object(&config, item)
                        .with_context(|| format!("Failed to map element {index}"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            Value::Array(records)
        }
        single => {
            tracing::info!(mapping = %document.name, "Mapping input");
            map_object(&config, single).context("Failed to map input")?
        }
    };

    let rendered = if pretty {
        serde_json::to_string_pretty(&mapped)?
    } else {
        serde_json::to_string(&mapped)?
    };
    write_output(output, &rendered)
}

fn run_check(mapping: &Path) -> anyhow::Result<()> {
    let (document, config) = load_mapping(mapping)?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}: {} fields", document.name, config.len())?;
    if let Some(description) = &document.description {
        writeln!(stdout, "  {description}")?;
    }
    for (key, descriptor) in config.iter() {
        writeln!(stdout, "  {key}: {}", descriptor.kind())?;
    }
    Ok(())
}

fn read_input(input: Option<&Path>) -> anyhow::Result<Value> {
    let content = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };
    serde_json::from_str(&content).context("Input is not valid JSON")
}

fn write_output(output: Option<&Path>, rendered: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("Failed to write output {}", path.display()))?;
            tracing::info!(path = %path.display(), "Wrote mapped output");
        }
        None => writeln!(io::stdout().lock(), "{rendered}")?,
    }
    Ok(())
}
