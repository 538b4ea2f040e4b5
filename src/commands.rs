//! Subcommand handlers.

use crate::output::{write_batch, write_value, OutputFormat};
use anyhow::Context;
use std::io::Write;
use synth_core::{Finiteness, Generator, SynthSchema};
use synth_generator::{build_expression, ExpressionBuilder};
use tracing::info;

/// Options for the `sample` subcommand.
#[derive(Debug, Clone)]
pub struct SampleOptions {
    /// Number of values, or batches when `batch_size` is set
    pub count: usize,
    /// Pull batches of this size instead of single values
    pub batch_size: Option<usize>,
    /// Seed overriding the schema seed
    pub seed: Option<u64>,
    /// Output format
    pub format: OutputFormat,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            count: 10,
            batch_size: None,
            seed: None,
            format: OutputFormat::Text,
        }
    }
}

/// Pull values from an expression and write one per line.
pub fn run_sample<W: Write>(
    schema: &SynthSchema,
    expression: Option<&str>,
    options: &SampleOptions,
    out: &mut W,
) -> anyhow::Result<()> {
    let name = schema.select(expression)?.name.clone();
    let expr = build_expression(schema, Some(&name), options.seed)
        .with_context(|| format!("Failed to build expression '{name}'"))?;

    info!(
        "Sampling {} {} from '{}'",
        options.count,
        if options.batch_size.is_some() { "batches" } else { "values" },
        name
    );

    match options.batch_size {
        Some(batch_size) => {
            for batch in expr.stream_batch(batch_size).take(options.count) {
                let batch = batch.with_context(|| format!("Failed to evaluate '{name}'"))?;
                write_batch(out, options.format, &batch)?;
            }
        }
        None => {
            for value in expr.stream_single().take(options.count) {
                let value = value.with_context(|| format!("Failed to evaluate '{name}'"))?;
                write_value(out, options.format, value)?;
            }
        }
    }
    Ok(())
}

/// Write the complete output of a finite expression.
pub fn run_all<W: Write>(
    schema: &SynthSchema,
    expression: Option<&str>,
    format: OutputFormat,
    out: &mut W,
) -> anyhow::Result<()> {
    let name = schema.select(expression)?.name.clone();
    let expr = build_expression(schema, Some(&name), None)
        .with_context(|| format!("Failed to build expression '{name}'"))?;

    let all = expr
        .get_all()
        .with_context(|| format!("Failed to evaluate '{name}'"))?;
    info!("Expression '{}' produced {} values", name, all.len());

    for value in all.iter() {
        write_value(out, format, value)?;
    }
    Ok(())
}

/// Describe every expression of a schema, one per line.
pub fn run_describe<W: Write>(schema: &SynthSchema, out: &mut W) -> anyhow::Result<()> {
    let seed = schema.seed.unwrap_or(0);
    for definition in &schema.expressions {
        let expr = ExpressionBuilder::new(seed)
            .build(&definition.generator)
            .with_context(|| format!("Failed to build expression '{}'", definition.name))?;

        let finiteness = match expr.finiteness() {
            Some(Finiteness::Finite) => "finite",
            Some(Finiteness::Infinite) => "infinite",
            None => "unknown",
        };
        writeln!(
            out,
            "{}: dtype={} finiteness={} root={} nodes={}",
            definition.name,
            expr.dtype(),
            finiteness,
            expr.name(),
            definition.generator.node_count()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
seed: 5
expressions:
  - name: counter
    generator:
      type: reduce
      op: mul
      operands:
        - { type: sequential, start: 1 }
        - { type: constant, value: 10 }
  - name: list
    generator:
      type: apply
      function: neg
      generator: { type: sequence, values: [1, 2] }
"#;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> anyhow::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_sample_single_values() {
        let schema = SynthSchema::from_yaml(SCHEMA).unwrap();
        let options = SampleOptions {
            count: 3,
            ..Default::default()
        };
        let text = output(|out| run_sample(&schema, None, &options, out));
        assert_eq!(text, "10\n20\n30\n");
    }

    #[test]
    fn test_sample_batches_json() {
        let schema = SynthSchema::from_yaml(SCHEMA).unwrap();
        let options = SampleOptions {
            count: 2,
            batch_size: Some(2),
            format: OutputFormat::Json,
            ..Default::default()
        };
        let text = output(|out| run_sample(&schema, Some("counter"), &options, out));
        assert_eq!(text, "[10,20]\n[30,40]\n");
    }

    #[test]
    fn test_all_requires_finite_expression() {
        let schema = SynthSchema::from_yaml(SCHEMA).unwrap();
        let text = output(|out| run_all(&schema, Some("list"), OutputFormat::Text, out));
        assert_eq!(text, "-1\n-2\n");

        let mut out = Vec::new();
        let err = run_all(&schema, Some("counter"), OutputFormat::Text, &mut out).unwrap_err();
        assert!(format!("{err:#}").contains("not implemented"));
    }

    #[test]
    fn test_describe() {
        let schema = SynthSchema::from_yaml(SCHEMA).unwrap();
        let text = output(|out| run_describe(&schema, out));
        assert_eq!(
            text,
            "counter: dtype=int finiteness=infinite root=mul nodes=3\n\
             list: dtype=int finiteness=finite root=neg nodes=2\n"
        );
    }

    #[test]
    fn test_unknown_expression() {
        let schema = SynthSchema::from_yaml(SCHEMA).unwrap();
        let mut out = Vec::new();
        assert!(run_sample(&schema, Some("missing"), &SampleOptions::default(), &mut out).is_err());
    }
}
