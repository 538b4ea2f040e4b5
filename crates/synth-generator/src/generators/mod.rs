//! Leaf generator implementations.

pub mod numeric;
pub mod sequence;

pub use numeric::{FloatRange, IntRange};
pub use sequence::{Sequential, ValueSequence};
