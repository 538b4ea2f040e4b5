//! Named combinator functions, one per binary operator.
//!
//! Each function builds a two-operand [`ReduceOperator`] node; nothing is
//! evaluated until the result is pulled. They mirror the infix operators on
//! [`Expr`] and cover `floor_div` and `pow`, which have no Rust operator.

use crate::error::GeneratorResult;
use crate::expr::Expr;
use crate::reduce::ReduceOperator;

/// `a + b`
pub fn add(a: &Expr, b: &Expr) -> Expr {
    a + b
}

/// `a - b`
pub fn sub(a: &Expr, b: &Expr) -> Expr {
    a - b
}

/// `a / b`, always producing floats.
pub fn true_div(a: &Expr, b: &Expr) -> Expr {
    a / b
}

/// `a // b`, rounding toward negative infinity.
pub fn floor_div(a: &Expr, b: &Expr) -> Expr {
    a.floor_div(b)
}

/// `a * b`
pub fn mul(a: &Expr, b: &Expr) -> Expr {
    a * b
}

/// `a ** b`
pub fn pow(a: &Expr, b: &Expr) -> Expr {
    a.pow(b)
}

/// `a % b`, with the sign of the divisor.
pub fn rem(a: &Expr, b: &Expr) -> Expr {
    a % b
}

/// `a & b`; both operands must be integers.
pub fn bitand(a: &Expr, b: &Expr) -> GeneratorResult<Expr> {
    a & b
}

/// `a | b`; both operands must be integers.
pub fn bitor(a: &Expr, b: &Expr) -> GeneratorResult<Expr> {
    a | b
}

/// `a ^ b`; both operands must be integers.
pub fn bitxor(a: &Expr, b: &Expr) -> GeneratorResult<Expr> {
    a ^ b
}

/// Sum of two or more operands as a single n-ary node.
pub fn sum(operands: Vec<Expr>) -> GeneratorResult<Expr> {
    ReduceOperator::add(operands).map(Expr::new)
}

/// Product of two or more operands as a single n-ary node.
pub fn product(operands: Vec<Expr>) -> GeneratorResult<Expr> {
    ReduceOperator::mul(operands).map(Expr::new)
}
