//! Builds expressions from schema files and checks their output.

use std::io::Write;
use synth_core::{Batch, Finiteness, Generator, SynthSchema, Value};
use synth_generator::{build_expression, BuildError};

const SCHEMA: &str = r#"
version: 1
seed: 42

expressions:
  - name: score
    generator:
      type: bounded
      lb: 0
      ub: 100
      generator:
        type: reduce
        op: add
        operands:
          - { type: int_range, min: 0, max: 80 }
          - { type: constant, value: 30 }

  - name: halves
    generator:
      type: reduce
      op: true_div
      operands:
        - { type: sequence, values: [1, 2, 3] }
        - { type: sequence, values: [2, 4, 6] }

  - name: offsets
    generator:
      type: reduce
      op: mod
      operands:
        - { type: sequential, start: -3 }
        - { type: constant, value: 4 }
"#;

fn write_schema(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_score_stays_in_bounds() {
    let file = write_schema(SCHEMA);
    let schema = SynthSchema::from_file(file.path()).unwrap();
    let score = build_expression(&schema, Some("score"), None).unwrap();

    let batch = score.get_batch(200).unwrap();
    assert_eq!(batch.len(), 200);
    for value in batch.iter() {
        let v = value.as_i64().unwrap();
        assert!((30..=100).contains(&v), "score {v} out of range");
    }
    assert_eq!(score.finiteness(), Some(Finiteness::Infinite));
}

#[test]
fn test_seed_reproducibility() {
    let schema = SynthSchema::from_yaml(SCHEMA).unwrap();

    let a = build_expression(&schema, Some("score"), None).unwrap();
    let b = build_expression(&schema, Some("score"), None).unwrap();
    assert_eq!(a.get_batch(32).unwrap(), b.get_batch(32).unwrap());

    let c = build_expression(&schema, Some("score"), Some(7)).unwrap();
    let d = build_expression(&schema, Some("score"), Some(7)).unwrap();
    assert_eq!(c.get_batch(32).unwrap(), d.get_batch(32).unwrap());
}

#[test]
fn test_finite_expression_get_all() {
    let schema = SynthSchema::from_yaml(SCHEMA).unwrap();
    let halves = build_expression(&schema, Some("halves"), None).unwrap();

    assert!(halves.is_finite());
    assert_eq!(halves.get_all().unwrap(), Batch::Float(vec![0.5, 0.5, 0.5]));
}

#[test]
fn test_mod_follows_divisor_sign() {
    let schema = SynthSchema::from_yaml(SCHEMA).unwrap();
    let offsets = build_expression(&schema, Some("offsets"), None).unwrap();

    assert_eq!(
        offsets.get_batch(6).unwrap(),
        Batch::Int(vec![1, 2, 3, 0, 1, 2])
    );
    assert_eq!(offsets.get_single().unwrap(), Value::Int(3));
}

#[test]
fn test_infinite_expression_has_no_get_all() {
    let schema = SynthSchema::from_yaml(SCHEMA).unwrap();
    let score = build_expression(&schema, None, None).unwrap();
    assert!(score.get_all().is_err());
}

#[test]
fn test_invalid_bounds_in_schema() {
    let schema = SynthSchema::from_yaml(
        r#"
expressions:
  - name: broken
    generator:
      type: bounded
      lb: 10
      ub: 0
      generator: { type: constant, value: 1 }
"#,
    )
    .unwrap();

    let err = build_expression(&schema, None, None).unwrap_err();
    assert!(matches!(err, BuildError::Generator(_)));
    assert!(err.to_string().contains("invalid bounds"));
}
