//! Rendering of values and batches.

use std::io::Write;
use synth_core::{Batch, Value};

/// Output format for generated values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Plain text, batches comma separated
    #[default]
    Text,
    /// JSON numbers and arrays
    Json,
}

/// JSON form of a value.
///
/// JSON has no infinities or NaN, so non-finite floats are written as the
/// strings `"inf"`, `"-inf"` and `"NaN"`.
fn to_json(value: Value) -> serde_json::Value {
    match value {
        Value::Int(i) => serde_json::Value::from(i),
        Value::Float(f) if f.is_finite() => serde_json::Value::from(f),
        Value::Float(_) => serde_json::Value::String(value.to_string()),
    }
}

/// Write one value on its own line.
pub fn write_value<W: Write>(out: &mut W, format: OutputFormat, value: Value) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{value}")?,
        OutputFormat::Json => writeln!(out, "{}", to_json(value))?,
    }
    Ok(())
}

/// Write one batch on its own line.
pub fn write_batch<W: Write>(out: &mut W, format: OutputFormat, batch: &Batch) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            let line = batch
                .iter()
                .map(|value| value.to_string())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(out, "{line}")?;
        }
        OutputFormat::Json => {
            let array: Vec<_> = batch.iter().map(to_json).collect();
            writeln!(out, "{}", serde_json::Value::Array(array))?;
        }
    }
    Ok(())
}
