//! Built-in generator nodes.
//!
//! This module provides the constant leaf and the single-child combinators
//! that wrap another generator:
//!
//! - [`UniqueValueGenerator`] - the same value on every pull
//! - [`BoundedGenerator`] - clamps values into `[lb, ub]`
//! - [`ApplyFunctionOperator`] - elementwise unary function
//! - [`AbsoluteOperator`] - elementwise absolute value

pub mod apply;
pub mod bounded;
pub mod unique;

pub use apply::{AbsoluteOperator, ApplyFunctionOperator, UnaryFunction};
pub use bounded::BoundedGenerator;
pub use unique::UniqueValueGenerator;
