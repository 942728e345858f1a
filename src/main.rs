//! argstream - classify command-line tokens against a JSON argument schema.

use anyhow::{bail, Context, Result};
use argstream::{missing_required, ErrorPolicy, Schema};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Classify command-line tokens into a typed event stream.
#[derive(Parser, Debug)]
#[command(name = "argstream", version, about, disable_help_subcommand = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where the argument schema comes from.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SchemaSource {
    /// JSON argument schema
    #[arg(long)]
    config: Option<String>,

    /// Path to a JSON argument schema
    #[arg(long)]
    config_file: Option<PathBuf>,
}

impl SchemaSource {
    fn load(&self) -> Result<Schema> {
        match (&self.config, &self.config_file) {
            (Some(json), _) => Schema::from_json(json).context("failed to parse schema JSON"),
            (None, Some(path)) => Schema::from_file(path).context("failed to load schema file"),
            (None, None) => bail!("either --config or --config-file is required"),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read tokens and print one JSON event per line
    Read {
        #[command(flatten)]
        schema: SchemaSource,

        /// Keep reading after an input error and report every error
        #[arg(long)]
        keep_going: bool,

        /// Tokens to classify
        #[arg(last = true)]
        args: Vec<String>,
    },

    /// Print the registered arguments as JSON
    Describe {
        #[command(flatten)]
        schema: SchemaSource,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Read {
            schema,
            keep_going,
            args,
        } => {
            let reader = schema.load()?.to_reader().context("invalid schema")?;
            let policy = if keep_going {
                ErrorPolicy::CollectAll
            } else {
                ErrorPolicy::StopAtFirst
            };
            tracing::debug!(tokens = args.len(), ?policy, "executing read command");

            let mut events = Vec::new();
            let mut failed = 0usize;
            for event in reader.read(args) {
                println!("{}", serde_json::to_string(&event)?);
                if !event.is_ok() {
                    failed += 1;
                    if policy == ErrorPolicy::StopAtFirst {
                        break;
                    }
                }
                events.push(event);
            }
            if failed > 0 {
                bail!("{} input error(s)", failed);
            }

            let missing = missing_required(&reader, &events);
            if !missing.is_empty() {
                let names: Vec<&str> = missing.iter().map(|m| m.id().as_str()).collect();
                bail!("missing required argument(s): {}", names.join(", "));
            }
        }
        Commands::Describe { schema } => {
            let reader = schema.load()?.to_reader().context("invalid schema")?;
            tracing::debug!("executing describe command");
            println!("{}", serde_json::to_string_pretty(reader.ordered_all())?);
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
