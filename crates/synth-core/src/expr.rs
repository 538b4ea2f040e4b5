//! Shared handles to expression nodes and operator overloads.
//!
//! Applying an operator to two [`Expr`] handles does not compute anything:
//! it builds a new [`ReduceOperator`] node whose children are the operands.
//! All evaluation is deferred to a later pull.
//!
//! ```
//! use synth_core::{Expr, Generator, Value};
//!
//! let a = Expr::constant(10);
//! let b = Expr::constant(3);
//! let c = Expr::constant(2);
//!
//! let expr = &a - &b - &c;
//! assert_eq!(expr.get_single().unwrap(), Value::Int(5));
//! ```
//!
//! Rust has no `//` or `**` operators; use [`Expr::floor_div`] and
//! [`Expr::pow`]. Bitwise operators return `Result<Expr>` because their
//! operands must be integers.

use crate::error::{GeneratorError, GeneratorResult};
use crate::generator::{FiniteGenerator, Finiteness, Generator};
use crate::generators::apply::{AbsoluteOperator, ApplyFunctionOperator, UnaryFunction};
use crate::generators::bounded::BoundedGenerator;
use crate::generators::unique::UniqueValueGenerator;
use crate::reduce::{BinaryOp, ReduceOperator};
use crate::values::{Batch, NumericType, Value};
use std::fmt;
use std::ops::{Add, BitAnd, BitOr, BitXor, Div, Mul, Rem, Sub};
use std::rc::Rc;

/// Cheaply clonable handle to a generator node.
///
/// Cloning shares the node. A node referenced from two places in a tree is
/// pulled once per reference on every evaluation.
#[derive(Clone)]
pub struct Expr {
    node: Rc<dyn Generator>,
}

impl Expr {
    /// Wrap a generator into a shared handle.
    pub fn new<G: Generator + 'static>(generator: G) -> Self {
        Self {
            node: Rc::new(generator),
        }
    }

    /// Wrap an already shared generator.
    pub fn from_rc(node: Rc<dyn Generator>) -> Self {
        Self { node }
    }

    /// Generator that always produces `value`.
    pub fn constant(value: impl Into<Value>) -> Self {
        Self::new(UniqueValueGenerator::new(value))
    }

    /// Build a binary arithmetic node.
    fn arithmetic(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Self::new(ReduceOperator::arithmetic_pair(op, lhs, rhs))
    }

    /// Build a binary bitwise node, checking that both operands are integers.
    fn bitwise(op: BinaryOp, lhs: Expr, rhs: Expr) -> GeneratorResult<Expr> {
        ReduceOperator::new(op, vec![lhs, rhs]).map(Self::new)
    }

    /// Floored division (`//`).
    pub fn floor_div(&self, rhs: &Expr) -> Expr {
        Self::arithmetic(BinaryOp::FloorDiv, self.clone(), rhs.clone())
    }

    /// Exponentiation (`**`).
    pub fn pow(&self, rhs: &Expr) -> Expr {
        Self::arithmetic(BinaryOp::Pow, self.clone(), rhs.clone())
    }

    /// Clamp every value into `[lb, ub]`.
    pub fn clip(&self, lb: impl Into<Value>, ub: impl Into<Value>) -> GeneratorResult<Expr> {
        BoundedGenerator::new(self.clone(), lb, ub).map(Self::new)
    }

    /// Absolute value of every value.
    pub fn abs(&self) -> Expr {
        Self::new(AbsoluteOperator::new(self.clone()))
    }

    /// Apply a named elementwise function.
    pub fn apply(&self, function: UnaryFunction) -> Expr {
        Self::new(ApplyFunctionOperator::from_function(self.clone(), function))
    }

    /// Check if this expression can produce its complete output.
    pub fn is_finite(&self) -> bool {
        self.node.as_finite().is_some()
    }

    /// Produce the complete output of a finite expression.
    ///
    /// Fails with `NotImplemented` when the root is not finite.
    pub fn get_all(&self) -> GeneratorResult<Batch> {
        match self.node.as_finite() {
            Some(finite) => finite.get_all(),
            None => Err(GeneratorError::NotImplemented {
                generator: self.node.name().to_string(),
                operation: "get_all",
            }),
        }
    }

    /// Check if two handles share the same node.
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.node, f)
    }
}

impl Generator for Expr {
    fn dtype(&self) -> NumericType {
        self.node.dtype()
    }

    fn get_single(&self) -> GeneratorResult<Value> {
        self.node.get_single()
    }

    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
        self.node.get_batch(batch_size)
    }

    fn name(&self) -> &str {
        self.node.name()
    }

    fn finiteness(&self) -> Option<Finiteness> {
        self.node.finiteness()
    }

    fn as_finite(&self) -> Option<&dyn FiniteGenerator> {
        self.node.as_finite()
    }
}

macro_rules! arithmetic_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::arithmetic(BinaryOp::$op, self, rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                Expr::arithmetic(BinaryOp::$op, self, rhs.clone())
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::arithmetic(BinaryOp::$op, self.clone(), rhs)
            }
        }

        impl $trait<&Expr> for &Expr {
            type Output = Expr;

            fn $method(self, rhs: &Expr) -> Expr {
                Expr::arithmetic(BinaryOp::$op, self.clone(), rhs.clone())
            }
        }
    };
}

macro_rules! bitwise_operator {
    ($trait:ident, $method:ident, $op:ident) => {
        impl $trait for Expr {
            type Output = GeneratorResult<Expr>;

            fn $method(self, rhs: Expr) -> GeneratorResult<Expr> {
                Expr::bitwise(BinaryOp::$op, self, rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = GeneratorResult<Expr>;

            fn $method(self, rhs: &Expr) -> GeneratorResult<Expr> {
                Expr::bitwise(BinaryOp::$op, self, rhs.clone())
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = GeneratorResult<Expr>;

            fn $method(self, rhs: Expr) -> GeneratorResult<Expr> {
                Expr::bitwise(BinaryOp::$op, self.clone(), rhs)
            }
        }

        impl $trait<&Expr> for &Expr {
            type Output = GeneratorResult<Expr>;

            fn $method(self, rhs: &Expr) -> GeneratorResult<Expr> {
                Expr::bitwise(BinaryOp::$op, self.clone(), rhs.clone())
            }
        }
    };
}

arithmetic_operator!(Add, add, Add);
arithmetic_operator!(Sub, sub, Sub);
arithmetic_operator!(Mul, mul, Mul);
arithmetic_operator!(Div, div, TrueDiv);
arithmetic_operator!(Rem, rem, Rem);

bitwise_operator!(BitAnd, bitand, BitAnd);
bitwise_operator!(BitOr, bitor, BitOr);
bitwise_operator!(BitXor, bitxor, BitXor);
