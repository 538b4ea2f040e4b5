//! Builds expression trees from schema configuration.

use crate::generators::{FloatRange, IntRange, Sequential, ValueSequence};
use synth_core::{
    ApplyFunctionOperator, BoundedGenerator, Expr, GeneratorConfig, GeneratorError,
    ReduceOperator, SchemaError, SynthSchema, UniqueValueGenerator,
};

/// Errors that can occur while building an expression.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A node rejected its configuration
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// The schema could not supply the expression
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Turns [`GeneratorConfig`] trees into [`Expr`] trees.
///
/// Nodes are visited depth-first, left to right. Each random leaf gets
/// its own seed derived from the base seed and the number of random
/// leaves built before it, so a tree always draws the same values for the
/// same base seed.
#[derive(Debug)]
pub struct ExpressionBuilder {
    seed: u64,
    leaf_index: u64,
}

impl ExpressionBuilder {
    /// Create a builder with the given base seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            leaf_index: 0,
        }
    }

    /// Number of random leaves built so far.
    pub fn leaf_count(&self) -> u64 {
        self.leaf_index
    }

    /// Build one expression tree.
    pub fn build(&mut self, config: &GeneratorConfig) -> Result<Expr, BuildError> {
        let expr = match config {
            GeneratorConfig::Constant { value, dtype } => match dtype {
                Some(dtype) => Expr::new(UniqueValueGenerator::with_dtype(*value, *dtype)?),
                None => Expr::new(UniqueValueGenerator::new(*value)),
            },
            GeneratorConfig::IntRange { min, max } => {
                Expr::new(IntRange::new(*min, *max, self.next_leaf_seed())?)
            }
            GeneratorConfig::FloatRange { min, max } => {
                Expr::new(FloatRange::new(*min, *max, self.next_leaf_seed())?)
            }
            GeneratorConfig::Sequential { start } => Expr::new(Sequential::new(*start)),
            GeneratorConfig::Sequence { values } => {
                Expr::new(ValueSequence::new(values.clone())?)
            }
            GeneratorConfig::Bounded { generator, lb, ub } => {
                let inner = self.build(generator)?;
                Expr::new(BoundedGenerator::new(inner, *lb, *ub)?)
            }
            GeneratorConfig::Apply {
                function,
                generator,
            } => {
                let inner = self.build(generator)?;
                Expr::new(ApplyFunctionOperator::from_function(inner, *function))
            }
            GeneratorConfig::Reduce { op, operands } => {
                let children = operands
                    .iter()
                    .map(|operand| self.build(operand))
                    .collect::<Result<Vec<_>, _>>()?;
                Expr::new(ReduceOperator::new(*op, children)?)
            }
        };
        Ok(expr)
    }

    /// Compute the seed for the next random leaf.
    fn next_leaf_seed(&mut self) -> u64 {
        let seed = self
            .seed
            .wrapping_add(self.leaf_index.wrapping_mul(0x9E3779B97F4A7C15));
        tracing::debug!("Random leaf {} seeded with {}", self.leaf_index, seed);
        self.leaf_index += 1;
        seed
    }
}

/// Build a named expression from a schema.
///
/// `name` of `None` selects the first expression. The seed is taken from
/// `seed_override`, then the schema, then defaults to 0.
pub fn build_expression(
    schema: &SynthSchema,
    name: Option<&str>,
    seed_override: Option<u64>,
) -> Result<Expr, BuildError> {
    let definition = schema.select(name)?;
    let seed = seed_override.or(schema.seed).unwrap_or(0);

    let mut builder = ExpressionBuilder::new(seed);
    let expr = builder.build(&definition.generator)?;
    tracing::debug!(
        "Built expression '{}' ({} nodes, {} random leaves, seed {})",
        definition.name,
        definition.generator.node_count(),
        builder.leaf_count(),
        seed
    );
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use synth_core::{BinaryOp, Generator, NumericType, UnaryFunction, Value};

    fn int_range(min: i64, max: i64) -> GeneratorConfig {
        GeneratorConfig::IntRange { min, max }
    }

    fn constant(value: impl Into<Value>) -> GeneratorConfig {
        GeneratorConfig::Constant {
            value: value.into(),
            dtype: None,
        }
    }

    #[test]
    fn test_build_constant() {
        let expr = ExpressionBuilder::new(0).build(&constant(3)).unwrap();
        assert_eq!(expr.get_single().unwrap(), Value::Int(3));
        assert_eq!(expr.name(), "UniqueValueGenerator");
    }

    #[test]
    fn test_build_constant_with_dtype() {
        let config = GeneratorConfig::Constant {
            value: Value::Int(2),
            dtype: Some(NumericType::Float),
        };
        let expr = ExpressionBuilder::new(0).build(&config).unwrap();
        assert_eq!(expr.get_single().unwrap(), Value::Float(2.0));

        let config = GeneratorConfig::Constant {
            value: Value::Float(2.5),
            dtype: Some(NumericType::Int),
        };
        assert!(matches!(
            ExpressionBuilder::new(0).build(&config),
            Err(BuildError::Generator(GeneratorError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn test_build_nested_tree() {
        let config = GeneratorConfig::Bounded {
            generator: Box::new(GeneratorConfig::Reduce {
                op: BinaryOp::Sub,
                operands: vec![constant(3), constant(10)],
            }),
            lb: Value::Int(-5),
            ub: Value::Int(5),
        };
        let expr = ExpressionBuilder::new(0).build(&config).unwrap();
        assert_eq!(expr.get_single().unwrap(), Value::Int(-5));

        let config = GeneratorConfig::Apply {
            function: UnaryFunction::Abs,
            generator: Box::new(config),
        };
        let expr = ExpressionBuilder::new(0).build(&config).unwrap();
        assert_eq!(expr.get_single().unwrap(), Value::Int(5));
    }

    #[test]
    fn test_leaf_seeds_are_distinct() {
        let config = GeneratorConfig::Reduce {
            op: BinaryOp::Sub,
            operands: vec![int_range(0, 1_000_000), int_range(0, 1_000_000)],
        };
        let mut builder = ExpressionBuilder::new(42);
        let expr = builder.build(&config).unwrap();
        assert_eq!(builder.leaf_count(), 2);

        // Identically seeded leaves would always cancel out
        let batch = expr.get_batch(16).unwrap();
        assert!(batch.iter().any(|v| v != Value::Int(0)));
    }

    #[test]
    fn test_same_seed_same_values() {
        let config = GeneratorConfig::Reduce {
            op: BinaryOp::Mul,
            operands: vec![
                int_range(-100, 100),
                GeneratorConfig::FloatRange { min: 0.0, max: 1.0 },
            ],
        };
        let a = ExpressionBuilder::new(9).build(&config).unwrap();
        let b = ExpressionBuilder::new(9).build(&config).unwrap();
        assert_eq!(a.get_batch(50).unwrap(), b.get_batch(50).unwrap());
    }

    #[test]
    fn test_invalid_configs() {
        assert!(matches!(
            ExpressionBuilder::new(0).build(&int_range(5, 1)),
            Err(BuildError::Generator(GeneratorError::InvalidBounds { .. }))
        ));

        let config = GeneratorConfig::Reduce {
            op: BinaryOp::Add,
            operands: vec![constant(1)],
        };
        assert!(matches!(
            ExpressionBuilder::new(0).build(&config),
            Err(BuildError::Generator(GeneratorError::ArityError { .. }))
        ));

        let config = GeneratorConfig::Reduce {
            op: BinaryOp::BitAnd,
            operands: vec![constant(1), constant(0.5)],
        };
        assert!(matches!(
            ExpressionBuilder::new(0).build(&config),
            Err(BuildError::Generator(GeneratorError::TypeMismatch { .. }))
        ));

        let config = GeneratorConfig::Sequence { values: vec![] };
        assert!(ExpressionBuilder::new(0).build(&config).is_err());
    }

    #[test]
    fn test_build_expression_selects_by_name() {
        let schema = SynthSchema::from_yaml(
            r#"
seed: 1
expressions:
  - name: first
    generator: { type: constant, value: 1 }
  - name: second
    generator: { type: sequential, start: 10 }
"#,
        )
        .unwrap();

        let first = build_expression(&schema, None, None).unwrap();
        assert_eq!(first.get_single().unwrap(), Value::Int(1));

        let second = build_expression(&schema, Some("second"), Some(99)).unwrap();
        assert_eq!(second.get_single().unwrap(), Value::Int(10));

        assert!(matches!(
            build_expression(&schema, Some("third"), None),
            Err(BuildError::Schema(SchemaError::ExpressionNotFound(_)))
        ));
    }
}
