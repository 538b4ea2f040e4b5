//! Schema definitions for generator expressions.
//!
//! A schema is a YAML document naming one or more expressions. Each
//! expression is a tree of [`GeneratorConfig`] nodes that a builder turns
//! into an [`Expr`](crate::Expr).
//!
//! ```yaml
//! version: 1
//! seed: 42
//! expressions:
//!   - name: score
//!     generator:
//!       type: bounded
//!       lb: 0
//!       ub: 100
//!       generator:
//!         type: reduce
//!         op: add
//!         operands:
//!           - { type: int_range, min: 0, max: 80 }
//!           - { type: constant, value: 30 }
//! ```

use crate::generators::apply::UnaryFunction;
use crate::reduce::BinaryOp;
use crate::values::{NumericType, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Expression not found in schema
    #[error("Expression not found: {0}")]
    ExpressionNotFound(String),

    /// Schema defines no expressions
    #[error("Schema defines no expressions")]
    Empty,

    /// Two expressions share a name
    #[error("Duplicate expression name: {0}")]
    DuplicateExpression(String),
}

// ============================================================================
// Generator Configuration
// ============================================================================

/// Configuration of one node of an expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeneratorConfig {
    /// The same value on every pull
    Constant {
        /// Value to broadcast
        value: Value,
        /// Declared type, inferred from the value when absent
        #[serde(default)]
        dtype: Option<NumericType>,
    },

    /// Random integers in a range
    IntRange {
        /// Minimum value (inclusive)
        min: i64,
        /// Maximum value (inclusive)
        max: i64,
    },

    /// Random floats in a range
    FloatRange {
        /// Minimum value (inclusive)
        min: f64,
        /// Maximum value (inclusive)
        max: f64,
    },

    /// Sequential integers
    Sequential {
        /// Starting value
        #[serde(default)]
        start: i64,
    },

    /// A finite list of values, cycled on pull
    Sequence {
        /// Values in order
        values: Vec<Value>,
    },

    /// Clamp an inner generator into `[lb, ub]`
    Bounded {
        /// Inner generator
        generator: Box<GeneratorConfig>,
        /// Lower bound (inclusive)
        lb: Value,
        /// Upper bound (inclusive)
        ub: Value,
    },

    /// Apply a named elementwise function
    Apply {
        /// Function to apply
        function: UnaryFunction,
        /// Inner generator
        generator: Box<GeneratorConfig>,
    },

    /// Left fold of two or more operands
    Reduce {
        /// Binary operator
        op: BinaryOp,
        /// Operands, evaluated left to right
        operands: Vec<GeneratorConfig>,
    },
}

impl GeneratorConfig {
    /// Count the nodes of this tree.
    pub fn node_count(&self) -> usize {
        match self {
            GeneratorConfig::Bounded { generator, .. } | GeneratorConfig::Apply { generator, .. } => {
                1 + generator.node_count()
            }
            GeneratorConfig::Reduce { operands, .. } => {
                1 + operands.iter().map(GeneratorConfig::node_count).sum::<usize>()
            }
            _ => 1,
        }
    }
}

// ============================================================================
// Schema
// ============================================================================

/// A named expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionDefinition {
    /// Expression name
    pub name: String,

    /// Root of the expression tree
    pub generator: GeneratorConfig,
}

fn default_version() -> u32 {
    1
}

/// Full schema of named expressions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthSchema {
    /// Schema version
    #[serde(default = "default_version")]
    pub version: u32,

    /// Seed for random leaves
    #[serde(default)]
    pub seed: Option<u64>,

    /// Expression definitions
    pub expressions: Vec<ExpressionDefinition>,

    /// Cached expression lookup (not serialized)
    #[serde(skip)]
    expression_map: HashMap<String, usize>,
}

impl SynthSchema {
    /// Create a schema from expression definitions.
    pub fn new(
        seed: Option<u64>,
        expressions: Vec<ExpressionDefinition>,
    ) -> Result<Self, SchemaError> {
        let mut schema = Self {
            version: default_version(),
            seed,
            expressions,
            expression_map: HashMap::new(),
        };
        schema.build_expression_map()?;
        Ok(schema)
    }

    /// Load schema from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse schema from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: SynthSchema = serde_yaml::from_str(yaml)?;
        schema.build_expression_map()?;
        Ok(schema)
    }

    /// Serialize schema to a YAML string.
    pub fn to_yaml(&self) -> Result<String, SchemaError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Build the internal expression lookup map.
    fn build_expression_map(&mut self) -> Result<(), SchemaError> {
        if self.expressions.is_empty() {
            return Err(SchemaError::Empty);
        }
        self.expression_map.clear();
        for (idx, expression) in self.expressions.iter().enumerate() {
            if self
                .expression_map
                .insert(expression.name.clone(), idx)
                .is_some()
            {
                return Err(SchemaError::DuplicateExpression(expression.name.clone()));
            }
        }
        Ok(())
    }

    /// Get an expression by name.
    pub fn get_expression(&self, name: &str) -> Option<&ExpressionDefinition> {
        self.expression_map
            .get(name)
            .map(|&idx| &self.expressions[idx])
    }

    /// Get an expression by name, or the first one when `name` is `None`.
    pub fn select(&self, name: Option<&str>) -> Result<&ExpressionDefinition, SchemaError> {
        match name {
            Some(name) => self
                .get_expression(name)
                .ok_or_else(|| SchemaError::ExpressionNotFound(name.to_string())),
            None => self.expressions.first().ok_or(SchemaError::Empty),
        }
    }

    /// Get all expression names.
    pub fn expression_names(&self) -> Vec<&str> {
        self.expressions.iter().map(|e| e.name.as_str()).collect()
    }
}
