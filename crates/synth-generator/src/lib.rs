//! Seeded leaf generators and schema-driven expression building for numsynth.
//!
//! This crate supplies the random and sequential leaves that feed
//! `synth-core` expression trees, and the [`ExpressionBuilder`] that turns a
//! YAML [`SynthSchema`](synth_core::SynthSchema) into a ready-to-pull
//! [`Expr`](synth_core::Expr). Every random leaf owns its own `StdRng`, seeded
//! from the schema seed and the leaf's position in the tree, so the same
//! schema and seed always produce the same values.
//!
//! # Architecture
//!
//! ```text
//! SynthSchema (YAML)
//!        │
//!        ▼
//! ┌──────────────────────┐
//! │  ExpressionBuilder   │
//! │                      │
//! │  - seed              │
//! │  - leaf_index        │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!    Expr (tree of Generator nodes)
//! ```
//!
//! # Example
//!
//! ```rust
//! use synth_core::{Generator, SynthSchema};
//! use synth_generator::build_expression;
//!
//! let schema = SynthSchema::from_yaml(r#"
//! seed: 7
//! expressions:
//!   - name: dice
//!     generator:
//!       type: reduce
//!       op: add
//!       operands:
//!         - { type: int_range, min: 1, max: 6 }
//!         - { type: int_range, min: 1, max: 6 }
//! "#).unwrap();
//!
//! let dice = build_expression(&schema, None, None).unwrap();
//! let rolls = dice.get_batch(100).unwrap();
//! assert!(rolls.iter().all(|v| (2..=12).contains(&v.as_i64().unwrap())));
//! ```
//!
//! # Generators
//!
//! - `constant` - The same value on every pull
//! - `int_range` - Random integers in a range
//! - `float_range` - Random floats in a range
//! - `sequential` - Sequential integers
//! - `sequence` - A finite list of values, cycled
//! - `bounded` - Clamp an inner generator
//! - `apply` - Named elementwise function
//! - `reduce` - Left fold of two or more operands

pub mod builder;
pub mod generators;

// Re-exports for convenience
pub use builder::{build_expression, BuildError, ExpressionBuilder};
pub use generators::{FloatRange, IntRange, Sequential, ValueSequence};
