//! Constant value generator.

use crate::error::GeneratorResult;
use crate::generator::{Finiteness, Generator, InfiniteGenerator};
use crate::values::{Batch, NumericType, Value};

/// Generator that broadcasts one fixed value.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueValueGenerator {
    value: Value,
}

impl UniqueValueGenerator {
    /// Create a generator whose type is inferred from `value`.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Create a generator of the declared type.
    ///
    /// The value is converted once, here; a float that is not an exact
    /// integer cannot be declared `Int`.
    pub fn with_dtype(value: impl Into<Value>, dtype: NumericType) -> GeneratorResult<Self> {
        let value = value.into().cast(dtype)?;
        Ok(Self { value })
    }

    /// Get the broadcast value.
    pub fn value(&self) -> Value {
        self.value
    }
}

impl Generator for UniqueValueGenerator {
    fn dtype(&self) -> NumericType {
        self.value.dtype()
    }

    fn get_single(&self) -> GeneratorResult<Value> {
        Ok(self.value)
    }

    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
        Ok(Batch::filled(self.value, batch_size))
    }

    fn name(&self) -> &str {
        "UniqueValueGenerator"
    }

    fn finiteness(&self) -> Option<Finiteness> {
        Some(Finiteness::Infinite)
    }
}

impl InfiniteGenerator for UniqueValueGenerator {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeneratorError;

    #[test]
    fn test_single_is_constant() {
        let generator = UniqueValueGenerator::new(7);
        for _ in 0..10 {
            assert_eq!(generator.get_single().unwrap(), Value::Int(7));
        }
    }

    #[test]
    fn test_batch_is_filled() {
        let generator = UniqueValueGenerator::new(7);
        assert_eq!(generator.get_batch(5).unwrap(), Batch::Int(vec![7, 7, 7, 7, 7]));
        assert_eq!(generator.get_batch(0).unwrap(), Batch::Int(vec![]));
    }

    #[test]
    fn test_declared_float_type() {
        let generator = UniqueValueGenerator::with_dtype(7, NumericType::Float).unwrap();
        assert_eq!(generator.dtype(), NumericType::Float);
        assert_eq!(generator.get_single().unwrap(), Value::Float(7.0));
        assert_eq!(generator.get_batch(2).unwrap(), Batch::Float(vec![7.0, 7.0]));
    }

    #[test]
    fn test_declared_int_type() {
        let generator = UniqueValueGenerator::with_dtype(3.0, NumericType::Int).unwrap();
        assert_eq!(generator.get_batch(2).unwrap(), Batch::Int(vec![3, 3]));

        let err = UniqueValueGenerator::with_dtype(3.5, NumericType::Int).unwrap_err();
        assert!(matches!(err, GeneratorError::TypeMismatch { .. }));
    }

    #[test]
    fn test_is_infinite() {
        let generator = UniqueValueGenerator::new(1.5);
        assert_eq!(generator.finiteness(), Some(Finiteness::Infinite));
        assert!(generator.as_finite().is_none());
    }
}
