//! Clamping combinator.

use crate::error::{GeneratorError, GeneratorResult};
use crate::expr::Expr;
use crate::generator::{
    check_batch, pull_batch, pull_single, FiniteGenerator, Finiteness, Generator,
};
use crate::values::{Batch, NumericType, Value};
use std::cmp::Ordering;

/// Clamps every value of an inner generator into `[lb, ub]`.
#[derive(Debug, Clone)]
pub struct BoundedGenerator {
    generator: Expr,
    lb: Value,
    ub: Value,
    dtype: NumericType,
}

impl BoundedGenerator {
    /// Wrap `generator` with inclusive bounds.
    ///
    /// Fails with `InvalidBounds` when `lb > ub` or either bound is NaN.
    /// The output type is the promotion of the inner type and both bounds.
    pub fn new(
        generator: Expr,
        lb: impl Into<Value>,
        ub: impl Into<Value>,
    ) -> GeneratorResult<Self> {
        let lb = lb.into();
        let ub = ub.into();
        match lb.partial_cmp_numeric(&ub) {
            Some(Ordering::Less | Ordering::Equal) => {}
            _ => return Err(GeneratorError::InvalidBounds { lb, ub }),
        }

        let dtype = generator.dtype().promote(lb.dtype()).promote(ub.dtype());
        tracing::debug!("Bounding {} to [{}, {}]", generator.name(), lb, ub);

        Ok(Self {
            generator,
            lb,
            ub,
            dtype,
        })
    }

    /// Get the lower bound.
    pub fn lb(&self) -> Value {
        self.lb
    }

    /// Get the upper bound.
    pub fn ub(&self) -> Value {
        self.ub
    }

    fn clamp(&self, value: Value) -> Value {
        match (value, self.lb, self.ub) {
            (Value::Int(v), Value::Int(lb), Value::Int(ub)) => Value::Int(v.clamp(lb, ub)),
            (v, lb, ub) => Value::Float(v.as_f64().clamp(lb.as_f64(), ub.as_f64())),
        }
    }

    fn clamp_batch(&self, batch: Batch) -> Batch {
        match (batch, self.lb, self.ub) {
            (Batch::Int(values), Value::Int(lb), Value::Int(ub)) => {
                Batch::Int(values.into_iter().map(|v| v.clamp(lb, ub)).collect())
            }
            (batch, lb, ub) => {
                let (lb, ub) = (lb.as_f64(), ub.as_f64());
                Batch::Float(batch.into_float().into_iter().map(|v| v.clamp(lb, ub)).collect())
            }
        }
    }
}

impl Generator for BoundedGenerator {
    fn dtype(&self) -> NumericType {
        self.dtype
    }

    fn get_single(&self) -> GeneratorResult<Value> {
        pull_single(&self.generator).map(|value| self.clamp(value))
    }

    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
        pull_batch(&self.generator, batch_size).map(|batch| self.clamp_batch(batch))
    }

    fn name(&self) -> &str {
        "BoundedGenerator"
    }

    fn finiteness(&self) -> Option<Finiteness> {
        self.generator.finiteness()
    }

    fn as_finite(&self) -> Option<&dyn FiniteGenerator> {
        self.generator.as_finite().map(|_| self as &dyn FiniteGenerator)
    }
}

impl FiniteGenerator for BoundedGenerator {
    fn get_all(&self) -> GeneratorResult<Batch> {
        let all = check_batch(&self.generator, self.generator.get_all()?, None)?;
        Ok(self.clamp_batch(all))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_above_upper_bound() {
        let bounded = BoundedGenerator::new(Expr::constant(15), 0, 10).unwrap();
        assert_eq!(bounded.get_single().unwrap(), Value::Int(10));
        assert_eq!(bounded.get_batch(3).unwrap(), Batch::Int(vec![10, 10, 10]));
    }

    #[test]
    fn test_clamps_below_lower_bound() {
        let bounded = BoundedGenerator::new(Expr::constant(-5), 0, 10).unwrap();
        assert_eq!(bounded.get_single().unwrap(), Value::Int(0));
        assert_eq!(bounded.get_batch(2).unwrap(), Batch::Int(vec![0, 0]));
    }

    #[test]
    fn test_passes_values_in_range() {
        let bounded = BoundedGenerator::new(Expr::constant(4), 0, 10).unwrap();
        assert_eq!(bounded.get_single().unwrap(), Value::Int(4));
        let bounded = BoundedGenerator::new(Expr::constant(10), 0, 10).unwrap();
        assert_eq!(bounded.get_single().unwrap(), Value::Int(10));
    }

    #[test]
    fn test_float_bounds_promote() {
        let bounded = BoundedGenerator::new(Expr::constant(3), 0.5, 2.5).unwrap();
        assert_eq!(bounded.dtype(), NumericType::Float);
        assert_eq!(bounded.get_single().unwrap(), Value::Float(2.5));
        assert_eq!(bounded.get_batch(2).unwrap(), Batch::Float(vec![2.5, 2.5]));
    }

    #[test]
    fn test_invalid_bounds() {
        let err = BoundedGenerator::new(Expr::constant(1), 10, 0).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::InvalidBounds {
                lb: Value::Int(10),
                ub: Value::Int(0),
            }
        );
        assert!(BoundedGenerator::new(Expr::constant(1), f64::NAN, 0).is_err());
    }

    #[test]
    fn test_equal_bounds_pin_value() {
        let bounded = BoundedGenerator::new(Expr::constant(-3), 2, 2).unwrap();
        assert_eq!(bounded.get_single().unwrap(), Value::Int(2));
    }
}
