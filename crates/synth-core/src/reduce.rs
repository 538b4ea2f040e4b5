//! N-ary left fold over child generators.
//!
//! A [`ReduceOperator`] pulls one fresh output from each child, strictly
//! left to right, and folds them with a binary [`Combine`] function:
//!
//! ```text
//! children:  c1    c2    c3    c4
//!             \    /     |     |
//!              f(.,.)    |     |
//!                 \     /      |
//!                  f(.,.)      |
//!                     \       /
//!                      f(.,.)  -> result
//! ```
//!
//! The order is load-bearing for non-commutative operators: `a - b - c`
//! evaluates as `(a - b) - c`.

use crate::error::{GeneratorError, GeneratorResult};
use crate::expr::Expr;
use crate::generator::{
    check_batch, pull_batch, pull_single, FiniteGenerator, Finiteness, Generator,
};
use crate::values::{Batch, NumericType, Value};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

/// A binary function used to fold child outputs.
pub trait Combine: fmt::Debug {
    /// Get the name of this function for errors and logging.
    fn name(&self) -> &str;

    /// Result type for operands of the given types.
    ///
    /// Fails when the combination is not allowed, e.g. bitwise operators on
    /// floats. Called once per operand at construction time.
    fn output_type(&self, lhs: NumericType, rhs: NumericType) -> GeneratorResult<NumericType>;

    /// Combine two values.
    fn combine(&self, lhs: Value, rhs: Value) -> GeneratorResult<Value>;

    /// Combine two batches of equal length element by element.
    fn combine_batch(&self, lhs: Batch, rhs: Batch) -> GeneratorResult<Batch> {
        if lhs.len() != rhs.len() {
            return Err(GeneratorError::LengthMismatch {
                generator: self.name().to_string(),
                expected: lhs.len(),
                actual: rhs.len(),
            });
        }
        let dtype = self.output_type(lhs.dtype(), rhs.dtype())?;
        let values = lhs
            .iter()
            .zip(rhs.iter())
            .map(|(a, b)| self.combine(a, b));
        Batch::try_from_values(dtype, values, self.name())
    }
}

/// Built-in binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    TrueDiv,
    FloorDiv,
    Mul,
    Pow,
    #[serde(rename = "mod", alias = "rem")]
    Rem,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinaryOp {
    /// Get the snake_case name of this operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::TrueDiv => "true_div",
            BinaryOp::FloorDiv => "floor_div",
            BinaryOp::Mul => "mul",
            BinaryOp::Pow => "pow",
            BinaryOp::Rem => "mod",
            BinaryOp::BitAnd => "bit_and",
            BinaryOp::BitOr => "bit_or",
            BinaryOp::BitXor => "bit_xor",
        }
    }

    /// Check if this is a bitwise operator.
    pub fn is_bitwise(&self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }

    fn combine_int(&self, a: i64, b: i64) -> GeneratorResult<Value> {
        let value = match self {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Sub => a.wrapping_sub(b),
            BinaryOp::Mul => a.wrapping_mul(b),
            BinaryOp::TrueDiv => return Ok(Value::Float(a as f64 / b as f64)),
            BinaryOp::FloorDiv => {
                if b == 0 {
                    return Err(GeneratorError::DivisionByZero {
                        operator: self.as_str(),
                    });
                }
                let quotient = a.wrapping_div(b);
                if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
                    quotient.wrapping_sub(1)
                } else {
                    quotient
                }
            }
            BinaryOp::Rem => {
                if b == 0 {
                    return Err(GeneratorError::DivisionByZero {
                        operator: self.as_str(),
                    });
                }
                let remainder = a.wrapping_rem(b);
                if remainder != 0 && ((remainder < 0) != (b < 0)) {
                    remainder + b
                } else {
                    remainder
                }
            }
            BinaryOp::Pow => {
                let exponent =
                    u32::try_from(b).map_err(|_| GeneratorError::InvalidExponent { exponent: b })?;
                a.wrapping_pow(exponent)
            }
            BinaryOp::BitAnd => a & b,
            BinaryOp::BitOr => a | b,
            BinaryOp::BitXor => a ^ b,
        };
        Ok(Value::Int(value))
    }

    fn combine_float(&self, a: f64, b: f64) -> GeneratorResult<f64> {
        let value = match self {
            BinaryOp::Add => a + b,
            BinaryOp::Sub => a - b,
            BinaryOp::Mul => a * b,
            BinaryOp::TrueDiv => a / b,
            BinaryOp::FloorDiv => floor_div_float(a, b),
            BinaryOp::Rem => {
                let remainder = a % b;
                if remainder != 0.0 && ((remainder < 0.0) != (b < 0.0)) {
                    remainder + b
                } else {
                    remainder
                }
            }
            BinaryOp::Pow => a.powf(b),
            BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor => {
                return Err(GeneratorError::TypeMismatch {
                    context: self.as_str().to_string(),
                    expected: NumericType::Int,
                    actual: NumericType::Float,
                })
            }
        };
        Ok(value)
    }
}

/// Floored float division; division by zero follows IEEE-754.
fn floor_div_float(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return a / b;
    }
    let remainder = a % b;
    let mut quotient = (a - remainder) / b;
    if remainder != 0.0 && ((b < 0.0) != (remainder < 0.0)) {
        quotient -= 1.0;
    }
    if quotient == 0.0 {
        return 0.0_f64.copysign(a / b);
    }
    let floored = quotient.floor();
    if quotient - floored > 0.5 {
        floored + 1.0
    } else {
        floored
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Combine for BinaryOp {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn output_type(&self, lhs: NumericType, rhs: NumericType) -> GeneratorResult<NumericType> {
        match self {
            BinaryOp::TrueDiv => Ok(NumericType::Float),
            op if op.is_bitwise() => match (lhs, rhs) {
                (NumericType::Int, NumericType::Int) => Ok(NumericType::Int),
                _ => Err(GeneratorError::TypeMismatch {
                    context: self.as_str().to_string(),
                    expected: NumericType::Int,
                    actual: NumericType::Float,
                }),
            },
            _ => Ok(lhs.promote(rhs)),
        }
    }

    fn combine(&self, lhs: Value, rhs: Value) -> GeneratorResult<Value> {
        match (lhs, rhs) {
            (Value::Int(a), Value::Int(b)) => self.combine_int(a, b),
            (a, b) => self
                .combine_float(a.as_f64(), b.as_f64())
                .map(Value::Float),
        }
    }
}

/// Signature of a custom combining function.
pub type CombineFn = dyn Fn(Value, Value) -> GeneratorResult<Value>;

/// A user-supplied binary function with a declared output type.
#[derive(Clone)]
pub struct FnCombiner {
    name: String,
    output: NumericType,
    function: Rc<CombineFn>,
}

impl FnCombiner {
    /// Create a combiner whose results are always of type `output`.
    pub fn new<F>(name: impl Into<String>, output: NumericType, function: F) -> Self
    where
        F: Fn(Value, Value) -> GeneratorResult<Value> + 'static,
    {
        Self {
            name: name.into(),
            output,
            function: Rc::new(function),
        }
    }
}

impl fmt::Debug for FnCombiner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCombiner")
            .field("name", &self.name)
            .field("output", &self.output)
            .finish_non_exhaustive()
    }
}

impl Combine for FnCombiner {
    fn name(&self) -> &str {
        &self.name
    }

    fn output_type(&self, _lhs: NumericType, _rhs: NumericType) -> GeneratorResult<NumericType> {
        Ok(self.output)
    }

    fn combine(&self, lhs: Value, rhs: Value) -> GeneratorResult<Value> {
        let value = (self.function)(lhs, rhs)?;
        if value.dtype() != self.output {
            return Err(GeneratorError::TypeMismatch {
                context: self.name.clone(),
                expected: self.output,
                actual: value.dtype(),
            });
        }
        Ok(value)
    }
}

/// Composite generator folding its children with a binary function.
#[derive(Debug, Clone)]
pub struct ReduceOperator {
    children: Vec<Expr>,
    combiner: Rc<dyn Combine>,
    dtype: NumericType,
}

macro_rules! builtin_reduce {
    ($($(#[$doc:meta])* $method:ident => $op:ident),* $(,)?) => {
        $(
            $(#[$doc])*
            pub fn $method(children: Vec<Expr>) -> GeneratorResult<Self> {
                Self::new(BinaryOp::$op, children)
            }
        )*
    };
}

impl ReduceOperator {
    /// Create a fold of `children` under `combiner`.
    ///
    /// Fails with `ArityError` for fewer than two children, and with the
    /// combiner's error when an operand type is not allowed.
    pub fn new(combiner: impl Combine + 'static, children: Vec<Expr>) -> GeneratorResult<Self> {
        Self::with_combiner(Rc::new(combiner), children)
    }

    /// Create a fold from a shared combiner.
    pub fn with_combiner(combiner: Rc<dyn Combine>, children: Vec<Expr>) -> GeneratorResult<Self> {
        let Some((first, rest)) = children.split_first() else {
            return Err(GeneratorError::ArityError {
                operator: combiner.name().to_string(),
                actual: 0,
            });
        };
        if rest.is_empty() {
            return Err(GeneratorError::ArityError {
                operator: combiner.name().to_string(),
                actual: 1,
            });
        }

        let mut dtype = first.dtype();
        for child in rest {
            dtype = combiner.output_type(dtype, child.dtype())?;
        }

        tracing::debug!(
            "Built {} over {} operands producing {}",
            combiner.name(),
            children.len(),
            dtype
        );

        Ok(Self {
            children,
            combiner,
            dtype,
        })
    }

    /// Two-operand fold for an arithmetic operator.
    ///
    /// Arithmetic promotion is total over the numeric types, so unlike
    /// [`ReduceOperator::new`] this cannot fail.
    pub(crate) fn arithmetic_pair(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        debug_assert!(!op.is_bitwise());
        let dtype = match op {
            BinaryOp::TrueDiv => NumericType::Float,
            _ => lhs.dtype().promote(rhs.dtype()),
        };
        tracing::debug!("Built {} over 2 operands producing {}", op, dtype);
        Self {
            children: vec![lhs, rhs],
            combiner: Rc::new(op),
            dtype,
        }
    }

    builtin_reduce! {
        /// Fold with addition.
        add => Add,
        /// Fold with subtraction.
        sub => Sub,
        /// Fold with true (float) division.
        true_div => TrueDiv,
        /// Fold with floored division.
        floor_div => FloorDiv,
        /// Fold with multiplication.
        mul => Mul,
        /// Fold with exponentiation.
        pow => Pow,
        /// Fold with floored modulo.
        rem => Rem,
        /// Fold with bitwise and.
        bitand => BitAnd,
        /// Fold with bitwise or.
        bitor => BitOr,
        /// Fold with bitwise xor.
        bitxor => BitXor,
    }

    /// Get the children of this fold, in evaluation order.
    pub fn children(&self) -> &[Expr] {
        &self.children
    }

    /// Get the combining function.
    pub fn combiner(&self) -> &dyn Combine {
        self.combiner.as_ref()
    }

    fn split(&self) -> GeneratorResult<(&Expr, &[Expr])> {
        self.children
            .split_first()
            .ok_or_else(|| GeneratorError::ArityError {
                operator: self.combiner.name().to_string(),
                actual: 0,
            })
    }

    fn all_finite(&self) -> bool {
        self.children.iter().all(|child| child.as_finite().is_some())
    }
}

impl Generator for ReduceOperator {
    fn dtype(&self) -> NumericType {
        self.dtype
    }

    fn get_single(&self) -> GeneratorResult<Value> {
        let (first, rest) = self.split()?;
        let mut acc = pull_single(first)?;
        for child in rest {
            let next = pull_single(child)?;
            acc = self.combiner.combine(acc, next)?;
            tracing::trace!("{} step -> {}", self.combiner.name(), acc);
        }
        Ok(acc)
    }

    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
        let (first, rest) = self.split()?;
        let mut acc = pull_batch(first, batch_size)?;
        for child in rest {
            let next = pull_batch(child, batch_size)?;
            acc = self.combiner.combine_batch(acc, next)?;
        }
        Ok(acc)
    }

    fn name(&self) -> &str {
        self.combiner.name()
    }

    fn finiteness(&self) -> Option<Finiteness> {
        Finiteness::combine(self.children.iter().map(|child| child.finiteness()))
    }

    fn as_finite(&self) -> Option<&dyn FiniteGenerator> {
        if self.all_finite() {
            Some(self)
        } else {
            None
        }
    }
}

impl FiniteGenerator for ReduceOperator {
    /// Fold the complete outputs of all children.
    ///
    /// Every child must be finite and produce the same number of values.
    fn get_all(&self) -> GeneratorResult<Batch> {
        let (first, rest) = self.split()?;
        let mut acc = check_batch(first, first.get_all()?, None)?;
        let len = acc.len();
        for child in rest {
            let next = check_batch(child, child.get_all()?, Some(len))?;
            acc = self.combiner.combine_batch(acc, next)?;
        }
        Ok(acc)
    }
}
