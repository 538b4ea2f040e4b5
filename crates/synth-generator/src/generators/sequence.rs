//! Deterministic leaves: counters and cycled value lists.

use std::cell::Cell;
use synth_core::{
    Batch, FiniteGenerator, Finiteness, Generator, GeneratorError, GeneratorResult,
    InfiniteGenerator, NumericType, Value,
};

/// Sequential integers starting at `start`.
#[derive(Debug)]
pub struct Sequential {
    start: i64,
    next: Cell<i64>,
}

impl Sequential {
    /// Create a counter whose first value is `start`.
    pub fn new(start: i64) -> Self {
        Self {
            start,
            next: Cell::new(start),
        }
    }

    /// Restart the counter at its starting value.
    pub fn reset(&self) {
        self.next.set(self.start);
    }

    fn advance(&self) -> i64 {
        let current = self.next.get();
        self.next.set(current.wrapping_add(1));
        current
    }
}

impl Generator for Sequential {
    fn dtype(&self) -> NumericType {
        NumericType::Int
    }

    fn get_single(&self) -> GeneratorResult<Value> {
        Ok(Value::Int(self.advance()))
    }

    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
        Ok(Batch::Int((0..batch_size).map(|_| self.advance()).collect()))
    }

    fn name(&self) -> &str {
        "Sequential"
    }

    fn finiteness(&self) -> Option<Finiteness> {
        Some(Finiteness::Infinite)
    }
}

impl InfiniteGenerator for Sequential {}

/// A fixed list of values.
///
/// Pulls walk the list in order and wrap around at the end. `get_all`
/// returns the whole list and does not move the cursor.
#[derive(Debug)]
pub struct ValueSequence {
    values: Batch,
    cursor: Cell<usize>,
}

impl ValueSequence {
    /// Create a sequence from `values`.
    ///
    /// The type is `Int` when every value is an integer and `Float`
    /// otherwise; integers in a mixed list are widened.
    pub fn new(values: Vec<Value>) -> GeneratorResult<Self> {
        if values.is_empty() {
            return Err(GeneratorError::InvalidConfig(
                "sequence requires at least one value".to_string(),
            ));
        }

        let dtype = values
            .iter()
            .map(Value::dtype)
            .fold(NumericType::Int, NumericType::promote);
        let values = Batch::try_from_values(
            dtype,
            values.into_iter().map(|value| value.cast(dtype)),
            "ValueSequence",
        )?;

        Ok(Self {
            values,
            cursor: Cell::new(0),
        })
    }

    /// Number of values before the sequence repeats.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false; empty sequences are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn advance(&self) -> GeneratorResult<Value> {
        let index = self.cursor.get();
        self.cursor.set((index + 1) % self.values.len());
        self.values
            .get(index)
            .ok_or_else(|| GeneratorError::InvalidConfig(format!("sequence index {index} out of range")))
    }
}

impl Generator for ValueSequence {
    fn dtype(&self) -> NumericType {
        self.values.dtype()
    }

    fn get_single(&self) -> GeneratorResult<Value> {
        self.advance()
    }

    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
        Batch::try_from_values(
            self.dtype(),
            (0..batch_size).map(|_| self.advance()),
            "ValueSequence",
        )
    }

    fn name(&self) -> &str {
        "ValueSequence"
    }

    fn finiteness(&self) -> Option<Finiteness> {
        Some(Finiteness::Finite)
    }

    fn as_finite(&self) -> Option<&dyn FiniteGenerator> {
        Some(self)
    }
}

impl FiniteGenerator for ValueSequence {
    fn get_all(&self) -> GeneratorResult<Batch> {
        Ok(self.values.clone())
    }
}
