//! Error types for generator construction and evaluation.

use crate::values::{NumericType, Value};

/// Result type for generator operations
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors that can occur while building or pulling from a generator.
///
/// Every error surfaces synchronously to the caller of the constructor or
/// pull that triggered it. A failed pull never exposes a partial result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeneratorError {
    /// A capability was invoked on a generator that does not provide it
    #[error("{operation} is not implemented by {generator}")]
    NotImplemented {
        generator: String,
        operation: &'static str,
    },

    /// Lower bound greater than upper bound, or a NaN bound
    #[error("invalid bounds: [{lb}, {ub}]")]
    InvalidBounds { lb: Value, ub: Value },

    /// A child produced a batch of the wrong length
    #[error("{generator} produced {actual} values, expected {expected}")]
    LengthMismatch {
        generator: String,
        expected: usize,
        actual: usize,
    },

    /// A reduce operator was built with fewer than two operands
    #[error("{operator} requires at least 2 operands, got {actual}")]
    ArityError { operator: String, actual: usize },

    /// An operand or produced value has the wrong numeric type
    #[error("type mismatch in {context}: expected {expected}, got {actual}")]
    TypeMismatch {
        context: String,
        expected: NumericType,
        actual: NumericType,
    },

    /// Integer division or modulo by zero
    #[error("integer division by zero in {operator}")]
    DivisionByZero { operator: &'static str },

    /// Integer power with an exponent outside `0..=u32::MAX`
    #[error("invalid integer exponent: {exponent}")]
    InvalidExponent { exponent: i64 },

    /// Invalid generator configuration
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
