//! Command-line interface for numsynth
//!
//! # Usage Examples
//!
//! ```bash
//! # Sample single values
//! numsynth sample --schema expressions.yaml --count 20
//!
//! # Sample batches with a fixed seed
//! numsynth sample --schema expressions.yaml --expression score \
//!   --count 3 --batch-size 1000 --seed 7 --format json
//!
//! # Full output of a finite expression
//! numsynth all --schema expressions.yaml --expression ratios
//!
//! # Inspect a schema
//! numsynth describe --schema expressions.yaml
//! ```
//!
//! Set `RUST_LOG=debug` to trace expression construction.

use clap::{Parser, Subcommand};
use numsynth::{run_all, run_describe, run_sample, OutputFormat, SampleOptions, SchemaOpts};

#[derive(Parser)]
#[command(name = "numsynth")]
#[command(about = "Sample values from lazy numeric generator expressions")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pull single values or batches from an expression
    Sample {
        #[command(flatten)]
        schema: SchemaOpts,

        /// Number of values (or batches with --batch-size)
        #[arg(long, default_value = "10")]
        count: usize,

        /// Pull batches of this size instead of single values
        #[arg(long)]
        batch_size: Option<usize>,

        /// Seed for random leaves (overrides the schema seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the complete output of a finite expression
    All {
        #[command(flatten)]
        schema: SchemaOpts,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Print the type and finiteness of every expression
    Describe {
        #[command(flatten)]
        schema: SchemaOpts,
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
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Sample {
            schema,
            count,
            batch_size,
            seed,
            format,
        } => {
            let options = SampleOptions {
                count,
                batch_size,
                seed,
                format,
            };
            run_sample(&schema.load()?, schema.expression.as_deref(), &options, &mut out)?;
        }
        Commands::All { schema, format } => {
            run_all(&schema.load()?, schema.expression.as_deref(), format, &mut out)?;
        }
        Commands::Describe { schema } => {
            run_describe(&schema.load()?, &mut out)?;
        }
    }

    Ok(())
}
