//! Structural snapshot backend.
//!
//! Serializes the captured values as one ordered JSON sequence and diffs
//! recursively, listing only changed paths. The on-disk format is
//! pretty-printed JSON with sorted object keys and a trailing newline.
//!
//! Format-precision caveat: values round-trip through JSON numbers, so the
//! integer/float distinction of the original Rust type is not preserved by
//! `read`. The differ absorbs this by comparing all numbers as `f64` within
//! an absolute tolerance, which also soaks up serialization round-trip noise.

use std::io::{Read, Write};

use serde_json::Value;

use crate::backend::{wrong_variant, Snapshot, SnapshotBackend};
use crate::errors::SnapshotError;
use crate::value::ValueSet;

/// Absolute tolerance used for numeric comparison.
pub const FLOAT_TOLERANCE: f64 = 1e-11;

/// Backend that stores snapshots as an ordered JSON sequence and computes
/// recursive structural diffs.
pub struct StructuralBackend {
    tolerance: f64,
}

impl StructuralBackend {
    pub fn new() -> Self {
        Self {
            tolerance: FLOAT_TOLERANCE,
        }
    }

    /// Overrides the numeric comparison tolerance.
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }
}

impl Default for StructuralBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotBackend for StructuralBackend {
    fn serialize(&self, values: &ValueSet) -> Result<Snapshot, SnapshotError> {
        Ok(Snapshot::Tree(values.items().to_vec()))
    }

    fn write(&self, dest: &mut dyn Write, snapshot: &Snapshot) -> Result<u64, SnapshotError> {
        let Snapshot::Tree(tree) = snapshot else {
            return Err(wrong_variant("tree", snapshot));
        };
        let mut text = serde_json::to_string_pretty(tree)?;
        text.push('\n');
        dest.write_all(text.as_bytes())
            .map_err(|e| SnapshotError::storage("writing snapshot bytes", e))?;
        Ok(text.len() as u64)
    }

    fn read(&self, src: &mut dyn Read) -> Result<Snapshot, SnapshotError> {
        let mut text = String::new();
        src.read_to_string(&mut text)
            .map_err(|e| SnapshotError::malformed(format!("snapshot is not valid UTF-8: {e}")))?;
        let tree: Vec<Value> = serde_json::from_str(&text)
            .map_err(|e| SnapshotError::malformed(format!("snapshot is not a JSON sequence: {e}")))?;
        Ok(Snapshot::Tree(tree))
    }

    fn diff(&self, previous: Option<&Snapshot>, current: &Snapshot) -> String {
        let empty: Vec<Value> = Vec::new();
        let prev_tree = match previous {
            Some(Snapshot::Tree(tree)) => tree.as_slice(),
            Some(Snapshot::Text(_)) | None => empty.as_slice(),
        };
        let cur_tree = match current {
            Snapshot::Tree(tree) => tree.as_slice(),
            Snapshot::Text(_) => empty.as_slice(),
        };

        let mut changes = Vec::new();
        diff_sequences("", prev_tree, cur_tree, self.tolerance, &mut changes);
        changes.join("\n")
    }
}

fn diff_sequences(path: &str, previous: &[Value], current: &[Value], tol: f64, out: &mut Vec<String>) {
    let common = previous.len().min(current.len());
    for i in 0..common {
        diff_nodes(&format!("{path}[{i}]"), &previous[i], &current[i], tol, out);
    }
    for (i, value) in previous.iter().enumerate().skip(common) {
        out.push(format!("- {path}[{i}]: {value}"));
    }
    for (i, value) in current.iter().enumerate().skip(common) {
        out.push(format!("+ {path}[{i}]: {value}"));
    }
}

fn diff_nodes(path: &str, previous: &Value, current: &Value, tol: f64, out: &mut Vec<String>) {
    match (previous, current) {
        (Value::Number(a), Value::Number(b)) => {
            if !numbers_equal(a, b, tol) {
                push_change(path, previous, current, out);
            }
        }
        (Value::Array(a), Value::Array(b)) => diff_sequences(path, a, b, tol, out),
        (Value::Object(a), Value::Object(b)) => {
            let mut keys: Vec<&String> = a.keys().chain(b.keys()).collect();
            keys.sort();
            keys.dedup();
            for key in keys {
                let child = format!("{path}.{key}");
                match (a.get(key.as_str()), b.get(key.as_str())) {
                    (Some(pv), Some(cv)) => diff_nodes(&child, pv, cv, tol, out),
                    (Some(pv), None) => out.push(format!("- {child}: {pv}")),
                    (None, Some(cv)) => out.push(format!("+ {child}: {cv}")),
                    (None, None) => {}
                }
            }
        }
        (p, c) => {
            if p != c {
                push_change(path, p, c, out);
            }
        }
    }
}

fn push_change(path: &str, previous: &Value, current: &Value, out: &mut Vec<String>) {
    out.push(format!("{path}:"));
    out.push(format!("  - {previous}"));
    out.push(format!("  + {current}"));
}

fn numbers_equal(a: &serde_json::Number, b: &serde_json::Number, tol: f64) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => (x - y).abs() <= tol,
        // numbers outside f64 range fall back to exact comparison
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(values: &ValueSet) -> Snapshot {
        StructuralBackend::new().serialize(values).unwrap()
    }

    #[test]
    fn float_noise_below_tolerance_diffs_to_empty() {
        let backend = StructuralBackend::new();
        let a = snap(&ValueSet::of(&1.0_f64).unwrap());
        let b = snap(&ValueSet::of(&(1.0_f64 + 1e-12)).unwrap());
        assert_eq!(backend.diff(Some(&a), &b), "");
    }

    #[test]
    fn integer_and_float_of_same_magnitude_are_equal() {
        let backend = StructuralBackend::new();
        let a = snap(&ValueSet::of(&1_u32).unwrap());
        let b = snap(&ValueSet::of(&1.0_f64).unwrap());
        assert_eq!(backend.diff(Some(&a), &b), "");
    }

    #[test]
    fn changed_list_position_is_explicit() {
        let backend = StructuralBackend::new();
        let a = snap(&ValueSet::of(&vec!["keep", "old", "keep"]).unwrap());
        let b = snap(&ValueSet::of(&vec!["keep", "new", "keep"]).unwrap());
        let diff = backend.diff(Some(&a), &b);
        assert!(diff.contains("[0][1]:"));
        assert!(diff.contains("- \"old\""));
        assert!(diff.contains("+ \"new\""));
        assert!(!diff.contains("keep"));
    }

    #[test]
    fn absent_previous_is_an_empty_sequence() {
        let backend = StructuralBackend::new();
        let current = snap(&ValueSet::of(&"fresh").unwrap());
        let diff = backend.diff(None, &current);
        assert!(diff.contains("+ [0]: \"fresh\""));
    }

    #[test]
    fn read_rejects_non_json_bytes() {
        let backend = StructuralBackend::new();
        let err = backend.read(&mut "hello\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SnapshotError::Malformed { .. }));
    }
}
