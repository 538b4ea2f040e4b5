//! Numeric value representations for generator expressions.
//!
//! This module defines the closed numeric domain every generator works in:
//! a [`NumericType`] tag, a single [`Value`], and a homogeneously typed
//! [`Batch`] of values produced in one evaluation pass.

use crate::error::{GeneratorError, GeneratorResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric type tag carried by every generator node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericType {
    /// 64-bit signed integer
    Int,

    /// 64-bit floating point
    Float,
}

impl NumericType {
    /// Result type of an arithmetic combination of `self` and `other`.
    ///
    /// Integers stay integers; any floating-point operand promotes to float.
    pub fn promote(self, other: NumericType) -> NumericType {
        match (self, other) {
            (NumericType::Int, NumericType::Int) => NumericType::Int,
            _ => NumericType::Float,
        }
    }

    /// Get the lowercase name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            NumericType::Int => "int",
            NumericType::Float => "float",
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single generated value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),
}

impl Value {
    /// Get the numeric type of this value.
    pub fn dtype(&self) -> NumericType {
        match self {
            Value::Int(_) => NumericType::Int,
            Value::Float(_) => NumericType::Float,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(_) => None,
        }
    }

    /// Get this value as an f64, widening integers.
    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Int(i) => *i as f64,
            Value::Float(f) => *f,
        }
    }

    /// Check if this value is a floating-point NaN.
    pub fn is_nan(&self) -> bool {
        matches!(self, Value::Float(f) if f.is_nan())
    }

    /// Convert this value to the given numeric type.
    ///
    /// Widening an integer to float always succeeds. Narrowing a float to an
    /// integer only succeeds for finite, integral values in range.
    pub fn cast(self, dtype: NumericType) -> GeneratorResult<Value> {
        match (self, dtype) {
            (Value::Int(i), NumericType::Float) => Ok(Value::Float(i as f64)),
            (Value::Float(f), NumericType::Int) => {
                if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64
                {
                    Ok(Value::Int(f as i64))
                } else {
                    Err(GeneratorError::TypeMismatch {
                        context: format!("conversion of {self}"),
                        expected: NumericType::Int,
                        actual: NumericType::Float,
                    })
                }
            }
            (value, _) => Ok(value),
        }
    }

    /// Absolute value. Integers wrap at `i64::MIN`.
    pub fn abs(self) -> Value {
        match self {
            Value::Int(i) => Value::Int(i.wrapping_abs()),
            Value::Float(f) => Value::Float(f.abs()),
        }
    }

    /// Compare two values numerically.
    ///
    /// Integers are compared exactly; mixed pairs are compared as floats.
    /// Returns `None` when either side is NaN.
    pub fn partial_cmp_numeric(&self, other: &Value) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

/// A fixed-length, homogeneously typed batch of values.
///
/// Element `i` of one batch always corresponds to element `i` of any other
/// batch produced in the same evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Batch {
    /// Batch of integers
    Int(Vec<i64>),

    /// Batch of floats
    Float(Vec<f64>),
}

impl Batch {
    /// Create a batch of `len` copies of `value`.
    pub fn filled(value: Value, len: usize) -> Self {
        match value {
            Value::Int(i) => Batch::Int(vec![i; len]),
            Value::Float(f) => Batch::Float(vec![f; len]),
        }
    }

    /// Collect fallible values into a batch of the given type.
    ///
    /// Fails on the first error, or on the first value whose type is not
    /// `dtype`. `context` names the producer in the resulting error.
    pub fn try_from_values<I>(dtype: NumericType, values: I, context: &str) -> GeneratorResult<Self>
    where
        I: IntoIterator<Item = GeneratorResult<Value>>,
    {
        let mismatch = |actual: NumericType| GeneratorError::TypeMismatch {
            context: context.to_string(),
            expected: dtype,
            actual,
        };

        match dtype {
            NumericType::Int => values
                .into_iter()
                .map(|value| match value? {
                    Value::Int(i) => Ok(i),
                    other => Err(mismatch(other.dtype())),
                })
                .collect::<GeneratorResult<Vec<_>>>()
                .map(Batch::Int),
            NumericType::Float => values
                .into_iter()
                .map(|value| match value? {
                    Value::Float(f) => Ok(f),
                    other => Err(mismatch(other.dtype())),
                })
                .collect::<GeneratorResult<Vec<_>>>()
                .map(Batch::Float),
        }
    }

    /// Get the numeric type of this batch.
    pub fn dtype(&self) -> NumericType {
        match self {
            Batch::Int(_) => NumericType::Int,
            Batch::Float(_) => NumericType::Float,
        }
    }

    /// Get the number of values in this batch.
    pub fn len(&self) -> usize {
        match self {
            Batch::Int(v) => v.len(),
            Batch::Float(v) => v.len(),
        }
    }

    /// Check if this batch is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the value at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        match self {
            Batch::Int(v) => v.get(index).copied().map(Value::Int),
            Batch::Float(v) => v.get(index).copied().map(Value::Float),
        }
    }

    /// Iterate over the values of this batch in order.
    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Copy the values of this batch into a vector.
    pub fn to_values(&self) -> Vec<Value> {
        self.iter().collect()
    }

    /// Convert this batch into floats, widening integers.
    pub fn into_float(self) -> Vec<f64> {
        match self {
            Batch::Int(v) => v.into_iter().map(|i| i as f64).collect(),
            Batch::Float(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promote() {
        assert_eq!(NumericType::Int.promote(NumericType::Int), NumericType::Int);
        assert_eq!(NumericType::Int.promote(NumericType::Float), NumericType::Float);
        assert_eq!(NumericType::Float.promote(NumericType::Int), NumericType::Float);
    }

    #[test]
    fn test_cast_widening() {
        assert_eq!(Value::Int(3).cast(NumericType::Float).unwrap(), Value::Float(3.0));
        assert_eq!(Value::Int(3).cast(NumericType::Int).unwrap(), Value::Int(3));
    }

    #[test]
    fn test_cast_narrowing() {
        assert_eq!(Value::Float(7.0).cast(NumericType::Int).unwrap(), Value::Int(7));
        assert!(matches!(
            Value::Float(7.5).cast(NumericType::Int),
            Err(GeneratorError::TypeMismatch { .. })
        ));
        assert!(Value::Float(f64::NAN).cast(NumericType::Int).is_err());
        assert!(Value::Float(f64::INFINITY).cast(NumericType::Int).is_err());
    }

    #[test]
    fn test_abs_wraps_at_min() {
        assert_eq!(Value::Int(-4).abs(), Value::Int(4));
        assert_eq!(Value::Int(i64::MIN).abs(), Value::Int(i64::MIN));
        assert_eq!(Value::Float(-2.5).abs(), Value::Float(2.5));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Int(7).to_string(), "7");
        assert_eq!(Value::Float(7.0).to_string(), "7.0");
        assert_eq!(Value::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_value_json() {
        let int: Value = serde_json::from_str("5").unwrap();
        let float: Value = serde_json::from_str("5.5").unwrap();
        assert_eq!(int, Value::Int(5));
        assert_eq!(float, Value::Float(5.5));
        assert_eq!(serde_json::to_string(&Value::Int(5)).unwrap(), "5");
    }

    #[test]
    fn test_batch_filled() {
        assert_eq!(Batch::filled(Value::Int(7), 3), Batch::Int(vec![7, 7, 7]));
        assert_eq!(Batch::filled(Value::Float(1.5), 2), Batch::Float(vec![1.5, 1.5]));
        assert!(Batch::filled(Value::Int(1), 0).is_empty());
    }

    #[test]
    fn test_batch_try_from_values_rejects_wrong_type() {
        let values = vec![Ok(Value::Int(1)), Ok(Value::Float(2.0))];
        let err = Batch::try_from_values(NumericType::Int, values, "test").unwrap_err();
        assert_eq!(
            err,
            GeneratorError::TypeMismatch {
                context: "test".to_string(),
                expected: NumericType::Int,
                actual: NumericType::Float,
            }
        );
    }

    #[test]
    fn test_batch_iter_preserves_order() {
        let batch = Batch::Int(vec![3, 1, 2]);
        assert_eq!(
            batch.to_values(),
            vec![Value::Int(3), Value::Int(1), Value::Int(2)]
        );
        assert_eq!(batch.get(1), Some(Value::Int(1)));
        assert_eq!(batch.get(3), None);
        assert_eq!(batch.into_float(), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_partial_cmp_numeric() {
        use std::cmp::Ordering;
        assert_eq!(
            Value::Int(1).partial_cmp_numeric(&Value::Float(1.5)),
            Some(Ordering::Less)
        );
        assert_eq!(Value::Int(2).partial_cmp_numeric(&Value::Int(2)), Some(Ordering::Equal));
        assert_eq!(Value::Float(f64::NAN).partial_cmp_numeric(&Value::Int(0)), None);
    }
}
