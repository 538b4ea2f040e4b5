//! Elementwise unary function application.

use crate::error::{GeneratorError, GeneratorResult};
use crate::expr::Expr;
use crate::generator::{
    check_batch, pull_batch, pull_single, FiniteGenerator, Finiteness, Generator,
};
use crate::values::{Batch, NumericType, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// Signature of an elementwise function.
pub type UnaryFn = dyn Fn(Value) -> GeneratorResult<Value>;

/// Named elementwise functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryFunction {
    Abs,
    Neg,
    Floor,
    Ceil,
    Round,
    Sqrt,
    Exp,
    Ln,
}

impl UnaryFunction {
    /// Get the snake_case name of this function.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryFunction::Abs => "abs",
            UnaryFunction::Neg => "neg",
            UnaryFunction::Floor => "floor",
            UnaryFunction::Ceil => "ceil",
            UnaryFunction::Round => "round",
            UnaryFunction::Sqrt => "sqrt",
            UnaryFunction::Exp => "exp",
            UnaryFunction::Ln => "ln",
        }
    }

    /// Output type for an input of type `input`.
    ///
    /// Rounding functions and sign changes keep the type; transcendental
    /// functions always produce floats.
    pub fn output_type(&self, input: NumericType) -> NumericType {
        match self {
            UnaryFunction::Sqrt | UnaryFunction::Exp | UnaryFunction::Ln => NumericType::Float,
            _ => input,
        }
    }

    /// Apply this function to one value.
    pub fn apply(&self, value: Value) -> Value {
        match (self, value) {
            (UnaryFunction::Abs, v) => v.abs(),
            (UnaryFunction::Neg, Value::Int(i)) => Value::Int(i.wrapping_neg()),
            (UnaryFunction::Neg, Value::Float(f)) => Value::Float(-f),
            (UnaryFunction::Floor | UnaryFunction::Ceil | UnaryFunction::Round, Value::Int(i)) => {
                Value::Int(i)
            }
            (UnaryFunction::Floor, Value::Float(f)) => Value::Float(f.floor()),
            (UnaryFunction::Ceil, Value::Float(f)) => Value::Float(f.ceil()),
            (UnaryFunction::Round, Value::Float(f)) => Value::Float(f.round_ties_even()),
            (UnaryFunction::Sqrt, v) => Value::Float(v.as_f64().sqrt()),
            (UnaryFunction::Exp, v) => Value::Float(v.as_f64().exp()),
            (UnaryFunction::Ln, v) => Value::Float(v.as_f64().ln()),
        }
    }
}

impl fmt::Display for UnaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Applies an elementwise function to the output of an inner generator.
#[derive(Clone)]
pub struct ApplyFunctionOperator {
    name: String,
    generator: Expr,
    function: Rc<UnaryFn>,
    dtype: NumericType,
}

impl ApplyFunctionOperator {
    /// Wrap `generator` with `function`.
    ///
    /// The output type defaults to the inner type; use
    /// [`with_output_type`](Self::with_output_type) for functions that
    /// change it. Every result is checked against the declared type.
    pub fn new<F>(name: impl Into<String>, generator: Expr, function: F) -> Self
    where
        F: Fn(Value) -> GeneratorResult<Value> + 'static,
    {
        let dtype = generator.dtype();
        Self {
            name: name.into(),
            generator,
            function: Rc::new(function),
            dtype,
        }
    }

    /// Wrap `generator` with a named function.
    pub fn from_function(generator: Expr, function: UnaryFunction) -> Self {
        let dtype = function.output_type(generator.dtype());
        Self::new(function.as_str(), generator, move |value| Ok(function.apply(value)))
            .with_output_type(dtype)
    }

    /// Declare the type of the values produced by the function.
    pub fn with_output_type(mut self, dtype: NumericType) -> Self {
        self.dtype = dtype;
        self
    }

    fn apply(&self, value: Value) -> GeneratorResult<Value> {
        let result = (self.function)(value)?;
        if result.dtype() != self.dtype {
            return Err(GeneratorError::TypeMismatch {
                context: self.name.clone(),
                expected: self.dtype,
                actual: result.dtype(),
            });
        }
        Ok(result)
    }

    fn apply_batch(&self, batch: Batch) -> GeneratorResult<Batch> {
        let values = batch.iter().map(|value| (self.function)(value));
        Batch::try_from_values(self.dtype, values, &self.name)
    }
}

impl fmt::Debug for ApplyFunctionOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApplyFunctionOperator")
            .field("name", &self.name)
            .field("generator", &self.generator)
            .field("dtype", &self.dtype)
            .finish_non_exhaustive()
    }
}

impl Generator for ApplyFunctionOperator {
    fn dtype(&self) -> NumericType {
        self.dtype
    }

    fn get_single(&self) -> GeneratorResult<Value> {
        self.apply(pull_single(&self.generator)?)
    }

    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
        self.apply_batch(pull_batch(&self.generator, batch_size)?)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn finiteness(&self) -> Option<Finiteness> {
        self.generator.finiteness()
    }

    fn as_finite(&self) -> Option<&dyn FiniteGenerator> {
        self.generator.as_finite().map(|_| self as &dyn FiniteGenerator)
    }
}

impl FiniteGenerator for ApplyFunctionOperator {
    fn get_all(&self) -> GeneratorResult<Batch> {
        let all = check_batch(&self.generator, self.generator.get_all()?, None)?;
        self.apply_batch(all)
    }
}

/// Elementwise absolute value of an inner generator.
#[derive(Debug, Clone)]
pub struct AbsoluteOperator(ApplyFunctionOperator);

impl AbsoluteOperator {
    /// Wrap `generator`.
    pub fn new(generator: Expr) -> Self {
        Self(ApplyFunctionOperator::from_function(
            generator,
            UnaryFunction::Abs,
        ))
    }
}

impl Generator for AbsoluteOperator {
    fn dtype(&self) -> NumericType {
        self.0.dtype()
    }

    fn get_single(&self) -> GeneratorResult<Value> {
        self.0.get_single()
    }

    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
        self.0.get_batch(batch_size)
    }

    fn name(&self) -> &str {
        "AbsoluteOperator"
    }

    fn finiteness(&self) -> Option<Finiteness> {
        self.0.finiteness()
    }

    fn as_finite(&self) -> Option<&dyn FiniteGenerator> {
        self.0.as_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_operator() {
        let abs = AbsoluteOperator::new(Expr::constant(-4));
        assert_eq!(abs.get_single().unwrap(), Value::Int(4));
        for size in [1, 3, 8] {
            assert_eq!(abs.get_batch(size).unwrap(), Batch::Int(vec![4; size]));
        }
    }

    #[test]
    fn test_absolute_operator_float() {
        let abs = AbsoluteOperator::new(Expr::constant(-2.5));
        assert_eq!(abs.dtype(), NumericType::Float);
        assert_eq!(abs.get_single().unwrap(), Value::Float(2.5));
    }

    #[test]
    fn test_custom_function() {
        let double = ApplyFunctionOperator::new("double", Expr::constant(21), |value| {
            Ok(Value::Int(value.as_i64().unwrap_or(0) * 2))
        });
        assert_eq!(double.get_single().unwrap(), Value::Int(42));
        assert_eq!(double.get_batch(2).unwrap(), Batch::Int(vec![42, 42]));
        assert_eq!(double.name(), "double");
    }

    #[test]
    fn test_declared_output_type_is_enforced() {
        let halve = ApplyFunctionOperator::new("halve", Expr::constant(3), |value| {
            Ok(Value::Float(value.as_f64() / 2.0))
        });
        assert!(matches!(
            halve.get_single(),
            Err(GeneratorError::TypeMismatch { .. })
        ));

        let halve = halve.with_output_type(NumericType::Float);
        assert_eq!(halve.get_single().unwrap(), Value::Float(1.5));
        assert_eq!(halve.get_batch(2).unwrap(), Batch::Float(vec![1.5, 1.5]));
    }

    #[test]
    fn test_function_errors_propagate() {
        let failing = ApplyFunctionOperator::new("fail", Expr::constant(1), |_| {
            Err(GeneratorError::InvalidConfig("boom".to_string()))
        });
        assert!(failing.get_single().is_err());
        assert!(failing.get_batch(3).is_err());
    }

    #[test]
    fn test_named_functions() {
        assert_eq!(UnaryFunction::Neg.apply(Value::Int(3)), Value::Int(-3));
        assert_eq!(UnaryFunction::Floor.apply(Value::Float(-1.5)), Value::Float(-2.0));
        assert_eq!(UnaryFunction::Ceil.apply(Value::Float(1.2)), Value::Float(2.0));
        assert_eq!(UnaryFunction::Round.apply(Value::Float(2.5)), Value::Float(2.0));
        assert_eq!(UnaryFunction::Round.apply(Value::Int(7)), Value::Int(7));
        assert_eq!(UnaryFunction::Sqrt.apply(Value::Int(9)), Value::Float(3.0));
        assert_eq!(UnaryFunction::Exp.output_type(NumericType::Int), NumericType::Float);
        assert_eq!(UnaryFunction::Abs.output_type(NumericType::Int), NumericType::Int);
    }
}
