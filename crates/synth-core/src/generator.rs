//! The generator contract shared by leaf and composite nodes.

use crate::error::{GeneratorError, GeneratorResult};
use crate::stream::{BatchStream, SingleStream};
use crate::values::{Batch, NumericType, Value};
use std::fmt::Debug;

/// Whether a generator has a complete, bounded output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finiteness {
    /// The full output is well defined and can be produced with `get_all`
    Finite,

    /// The output is conceptually unbounded
    Infinite,
}

impl Finiteness {
    /// Classify a composite from the classifications of its children.
    ///
    /// Any infinite child makes the composite infinite. All-finite children
    /// make it finite. Otherwise the composite is unclassified.
    pub fn combine<I>(children: I) -> Option<Finiteness>
    where
        I: IntoIterator<Item = Option<Finiteness>>,
    {
        let mut all_finite = true;
        for child in children {
            match child {
                Some(Finiteness::Infinite) => return Some(Finiteness::Infinite),
                Some(Finiteness::Finite) => {}
                None => all_finite = false,
            }
        }
        all_finite.then_some(Finiteness::Finite)
    }
}

/// A node of a generator expression tree.
///
/// Leaves produce values directly; composites pull from their children on
/// every call. Nothing is cached between pulls: calling `get_single` twice
/// performs two independent evaluations of the whole subtree.
///
/// Pulls take `&self` so that one node can be shared by several parents.
/// Leaves with internal state (an RNG, a cursor) use interior mutability.
pub trait Generator: Debug {
    /// Numeric type of every value this generator produces.
    fn dtype(&self) -> NumericType;

    /// Produce exactly one value.
    fn get_single(&self) -> GeneratorResult<Value>;

    /// Produce `batch_size` independent values in one call.
    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch>;

    /// Get the name of this generator for errors and logging.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Static finiteness classification, `None` when unclassified.
    fn finiteness(&self) -> Option<Finiteness> {
        None
    }

    /// View this generator as a finite one, if it can produce `get_all`.
    fn as_finite(&self) -> Option<&dyn FiniteGenerator> {
        None
    }

    /// Unbounded lazy sequence of single values.
    ///
    /// Each element is a fresh `get_single` pull. The sequence never ends on
    /// its own; after yielding an error it is exhausted.
    fn stream_single(&self) -> SingleStream<'_, Self>
    where
        Self: Sized,
    {
        SingleStream::new(self)
    }

    /// Unbounded lazy sequence of batches, each a fresh `get_batch` pull.
    fn stream_batch(&self, batch_size: usize) -> BatchStream<'_, Self>
    where
        Self: Sized,
    {
        BatchStream::new(self, batch_size)
    }
}

/// A generator whose complete output is bounded and well defined.
pub trait FiniteGenerator: Generator {
    /// Produce the complete output of this generator.
    fn get_all(&self) -> GeneratorResult<Batch>;
}

/// Marker for generators that are conceptually unbounded.
pub trait InfiniteGenerator: Generator {}

/// Pull a single value from a child and check it against the child's dtype.
pub(crate) fn pull_single<G: Generator + ?Sized>(child: &G) -> GeneratorResult<Value> {
    let value = child.get_single()?;
    if value.dtype() != child.dtype() {
        return Err(GeneratorError::TypeMismatch {
            context: child.name().to_string(),
            expected: child.dtype(),
            actual: value.dtype(),
        });
    }
    Ok(value)
}

/// Pull a batch from a child and check its length and dtype.
pub(crate) fn pull_batch<G: Generator + ?Sized>(
    child: &G,
    batch_size: usize,
) -> GeneratorResult<Batch> {
    let batch = child.get_batch(batch_size)?;
    check_batch(child, batch, Some(batch_size))
}

/// Check a batch produced by `child`, optionally against an expected length.
pub(crate) fn check_batch<G: Generator + ?Sized>(
    child: &G,
    batch: Batch,
    expected_len: Option<usize>,
) -> GeneratorResult<Batch> {
    if let Some(expected) = expected_len {
        if batch.len() != expected {
            return Err(GeneratorError::LengthMismatch {
                generator: child.name().to_string(),
                expected,
                actual: batch.len(),
            });
        }
    }
    if batch.dtype() != child.dtype() {
        return Err(GeneratorError::TypeMismatch {
            context: child.name().to_string(),
            expected: child.dtype(),
            actual: batch.dtype(),
        });
    }
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Lying;

    impl Generator for Lying {
        fn dtype(&self) -> NumericType {
            NumericType::Int
        }

        fn get_single(&self) -> GeneratorResult<Value> {
            Ok(Value::Float(1.0))
        }

        fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
            Ok(Batch::Int(vec![0; batch_size + 1]))
        }
    }

    #[test]
    fn test_finiteness_combine() {
        use Finiteness::*;
        assert_eq!(Finiteness::combine([Some(Finite), Some(Finite)]), Some(Finite));
        assert_eq!(Finiteness::combine([Some(Finite), Some(Infinite)]), Some(Infinite));
        assert_eq!(Finiteness::combine([None, Some(Infinite)]), Some(Infinite));
        assert_eq!(Finiteness::combine([Some(Finite), None]), None);
    }

    #[test]
    fn test_pull_single_checks_dtype() {
        assert!(matches!(
            pull_single(&Lying),
            Err(GeneratorError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_pull_batch_checks_length() {
        let err = pull_batch(&Lying, 4).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::LengthMismatch {
                expected: 4,
                actual: 5,
                ..
            }
        ));
    }

    #[test]
    fn test_defaults() {
        assert!(Lying.finiteness().is_none());
        assert!(Lying.as_finite().is_none());
        assert!(Lying.name().ends_with("Lying"));
    }
}
