//! Random numeric leaves.

use rand::distr::Uniform;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use synth_core::{
    Batch, Finiteness, Generator, GeneratorError, GeneratorResult, InfiniteGenerator,
    NumericType, Value,
};

/// Random integers drawn uniformly from `[min, max]`.
#[derive(Debug)]
pub struct IntRange {
    dist: Uniform<i64>,
    rng: RefCell<StdRng>,
}

impl IntRange {
    /// Create a generator seeded with `seed`.
    pub fn new(min: i64, max: i64, seed: u64) -> GeneratorResult<Self> {
        let dist = Uniform::new_inclusive(min, max).map_err(|_| GeneratorError::InvalidBounds {
            lb: Value::Int(min),
            ub: Value::Int(max),
        })?;
        Ok(Self {
            dist,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        })
    }
}

impl Generator for IntRange {
    fn dtype(&self) -> NumericType {
        NumericType::Int
    }

    fn get_single(&self) -> GeneratorResult<Value> {
        Ok(Value::Int(self.rng.borrow_mut().sample(&self.dist)))
    }

    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
        let mut rng = self.rng.borrow_mut();
        Ok(Batch::Int(
            (0..batch_size).map(|_| rng.sample(&self.dist)).collect(),
        ))
    }

    fn name(&self) -> &str {
        "IntRange"
    }

    fn finiteness(&self) -> Option<Finiteness> {
        Some(Finiteness::Infinite)
    }
}

impl InfiniteGenerator for IntRange {}

/// Random floats drawn uniformly from `[min, max]`.
#[derive(Debug)]
pub struct FloatRange {
    dist: Uniform<f64>,
    rng: RefCell<StdRng>,
}

impl FloatRange {
    /// Create a generator seeded with `seed`.
    ///
    /// Both bounds must be finite, and so must the width of the range.
    pub fn new(min: f64, max: f64, seed: u64) -> GeneratorResult<Self> {
        let invalid = || GeneratorError::InvalidBounds {
            lb: Value::Float(min),
            ub: Value::Float(max),
        };
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(invalid());
        }
        let dist = Uniform::new_inclusive(min, max).map_err(|_| invalid())?;
        Ok(Self {
            dist,
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        })
    }
}

impl Generator for FloatRange {
    fn dtype(&self) -> NumericType {
        NumericType::Float
    }

    fn get_single(&self) -> GeneratorResult<Value> {
        Ok(Value::Float(self.rng.borrow_mut().sample(&self.dist)))
    }

    fn get_batch(&self, batch_size: usize) -> GeneratorResult<Batch> {
        let mut rng = self.rng.borrow_mut();
        Ok(Batch::Float(
            (0..batch_size).map(|_| rng.sample(&self.dist)).collect(),
        ))
    }

    fn name(&self) -> &str {
        "FloatRange"
    }

    fn finiteness(&self) -> Option<Finiteness> {
        Some(Finiteness::Infinite)
    }
}

impl InfiniteGenerator for FloatRange {}
