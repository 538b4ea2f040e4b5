//! Lazy generator expressions over numeric values.
//!
//! This crate provides the evaluation engine of numsynth: a generator
//! contract, combinators that wrap generators, and operator overloads that
//! turn algebraic expressions over generators into trees of lazy nodes.
//!
//! - [`Generator`] - the contract every node implements
//! - [`FiniteGenerator`] / [`InfiniteGenerator`] - finiteness capabilities
//! - [`Expr`] - shared handle to a node, with `+ - * / % & | ^`
//! - [`ReduceOperator`] - n-ary left fold over child generators
//! - [`BoundedGenerator`], [`UniqueValueGenerator`],
//!   [`ApplyFunctionOperator`], [`AbsoluteOperator`] - built-in nodes
//! - [`SynthSchema`] - YAML definitions of expression trees
//!
//! # Architecture
//!
//! ```text
//! synth-core (this crate)
//!    │
//!    ├─── synth-generator  (random leaves, schema -> Expr builder)
//!    │
//!    └─── numsynth         (command-line sampler)
//! ```
//!
//! Evaluation is single-threaded and pull-based. Every `get_single` or
//! `get_batch` call recursively pulls fresh values from every leaf of the
//! tree; nothing is cached and nothing is evaluated ahead of a pull.
//!
//! # Example
//!
//! ```rust
//! use synth_core::{Batch, Expr, Generator, Value};
//!
//! let base = Expr::constant(15);
//! let offset = Expr::constant(-4);
//!
//! // Builds a tree; nothing is computed yet
//! let expr = (&base + &offset).abs().clip(0, 10).unwrap();
//!
//! assert_eq!(expr.get_single().unwrap(), Value::Int(10));
//! assert_eq!(expr.get_batch(3).unwrap(), Batch::Int(vec![10, 10, 10]));
//! ```

pub mod error;
pub mod expr;
pub mod generator;
pub mod generators;
pub mod ops;
pub mod reduce;
pub mod schema;
pub mod stream;
pub mod values;

// Re-exports for convenience
pub use error::{GeneratorError, GeneratorResult};
pub use expr::Expr;
pub use generator::{FiniteGenerator, Finiteness, Generator, InfiniteGenerator};
pub use generators::{
    AbsoluteOperator, ApplyFunctionOperator, BoundedGenerator, UnaryFunction,
    UniqueValueGenerator,
};
pub use reduce::{BinaryOp, Combine, FnCombiner, ReduceOperator};
pub use schema::{ExpressionDefinition, GeneratorConfig, SchemaError, SynthSchema};
pub use stream::{BatchStream, SingleStream};
pub use values::{Batch, NumericType, Value};
