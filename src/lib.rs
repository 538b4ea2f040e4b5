//! numsynth library
//!
//! Command handlers behind the `numsynth` binary. Each handler loads an
//! expression from a [`SynthSchema`], pulls values from it and writes them
//! to any [`std::io::Write`], so the same code serves the CLI and tests.
//!
//! # CLI Usage
//!
//! ```bash
//! # Ten single values from the first expression
//! numsynth sample --schema expressions.yaml
//!
//! # Five batches of 100 values as JSON arrays
//! numsynth sample --schema expressions.yaml --expression score \
//!   --count 5 --batch-size 100 --format json
//!
//! # Complete output of a finite expression
//! numsynth all --schema expressions.yaml --expression ratios
//!
//! # Types and finiteness of every expression
//! numsynth describe --schema expressions.yaml
//! ```

use anyhow::Context;
use std::path::PathBuf;
use synth_core::SynthSchema;

pub mod commands;
pub mod output;

// Re-exports for convenience
pub use commands::{run_all, run_describe, run_sample, SampleOptions};
pub use output::OutputFormat;

/// Schema selection options shared by every subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct SchemaOpts {
    /// Path to the expression schema (YAML)
    #[arg(long, env = "NUMSYNTH_SCHEMA")]
    pub schema: PathBuf,

    /// Name of the expression to use (default: first in the schema)
    #[arg(long)]
    pub expression: Option<String>,
}

impl SchemaOpts {
    /// Load the schema file.
    pub fn load(&self) -> anyhow::Result<SynthSchema> {
        let schema = SynthSchema::from_file(&self.schema)
            .with_context(|| format!("Failed to load schema from {:?}", self.schema))?;
        tracing::info!(
            "Loaded schema {:?} with {} expressions",
            self.schema,
            schema.expressions.len()
        );
        Ok(schema)
    }
}
