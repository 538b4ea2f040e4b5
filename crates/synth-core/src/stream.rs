//! Lazy, unbounded sequences over repeated pulls.
//!
//! Streams produce on demand and hold no buffer. They never end on their
//! own; the caller bounds consumption, e.g. with [`Iterator::take`].

use crate::error::GeneratorResult;
use crate::generator::Generator;
use crate::values::{Batch, Value};
use std::iter::FusedIterator;

/// Iterator that pulls a single value on every `next`.
#[derive(Debug)]
pub struct SingleStream<'a, G: ?Sized> {
    generator: &'a G,
    failed: bool,
}

impl<'a, G: Generator + ?Sized> SingleStream<'a, G> {
    /// Create a stream over `generator`.
    pub fn new(generator: &'a G) -> Self {
        Self {
            generator,
            failed: false,
        }
    }
}

impl<G: Generator + ?Sized> Iterator for SingleStream<'_, G> {
    type Item = GeneratorResult<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.generator.get_single();
        self.failed = item.is_err();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (usize::MAX, None)
        }
    }
}

impl<G: Generator + ?Sized> FusedIterator for SingleStream<'_, G> {}

/// Iterator that pulls a batch of fixed size on every `next`.
#[derive(Debug)]
pub struct BatchStream<'a, G: ?Sized> {
    generator: &'a G,
    batch_size: usize,
    failed: bool,
}

impl<'a, G: Generator + ?Sized> BatchStream<'a, G> {
    /// Create a stream of `batch_size` batches over `generator`.
    pub fn new(generator: &'a G, batch_size: usize) -> Self {
        Self {
            generator,
            batch_size,
            failed: false,
        }
    }

    /// Get the size of each batch.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }
}

impl<G: Generator + ?Sized> Iterator for BatchStream<'_, G> {
    type Item = GeneratorResult<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let item = self.generator.get_batch(self.batch_size);
        self.failed = item.is_err();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.failed {
            (0, Some(0))
        } else {
            (usize::MAX, None)
        }
    }
}

impl<G: Generator + ?Sized> FusedIterator for BatchStream<'_, G> {}
