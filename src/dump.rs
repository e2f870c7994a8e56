//! Deterministic recursive textual dump of captured values.
//!
//! This is the legacy on-disk format: top-level strings are appended
//! verbatim with a trailing line break, anything else is rendered as an
//! indented recursive dump with sorted map keys and element counts. The
//! lifecycle engine also recomputes this dump on every compare for the
//! byte-exact legacy-compatibility check, so the output must never depend
//! on iteration order or anything else nondeterministic.

use serde_json::Value;

const INDENT: &str = "  ";

/// Renders a whole value set as one concatenated dump string.
pub fn dump_value_set(values: &crate::value::ValueSet) -> String {
    let mut out = String::new();
    for value in values.items() {
        match value {
            // Raw text goes in verbatim, one trailing line break.
            Value::String(text) => {
                out.push_str(text);
                out.push('\n');
            }
            other => {
                dump_node(other, 0, &mut out);
                out.push('\n');
            }
        }
    }
    out
}

/// Writes one node at the given indent depth, without a trailing newline.
fn dump_node(value: &Value, depth: usize, out: &mut String) {
    match value {
        Value::Null => out.push_str("(nil)"),
        Value::Bool(b) => {
            out.push_str("(bool) ");
            out.push_str(if *b { "true" } else { "false" });
        }
        Value::Number(n) => {
            out.push_str("(number) ");
            out.push_str(&n.to_string());
        }
        Value::String(s) => {
            out.push_str("(string) ");
            out.push_str(&format!("{:?}", s));
        }
        Value::Array(items) => {
            out.push_str(&format!("(list len={}) [", items.len()));
            for item in items {
                out.push('\n');
                push_indent(depth + 1, out);
                dump_node(item, depth + 1, out);
            }
            out.push('\n');
            push_indent(depth, out);
            out.push(']');
        }
        Value::Object(map) => {
            out.push_str(&format!("(map len={}) {{", map.len()));
            // sorted explicitly so the dump stays stable even when the map
            // preserves insertion order
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                out.push('\n');
                push_indent(depth + 1, out);
                out.push_str(&format!("{:?}: ", key));
                dump_node(&map[key], depth + 1, out);
            }
            out.push('\n');
            push_indent(depth, out);
            out.push('}');
        }
    }
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueSet;
    use std::collections::BTreeMap;

    #[test]
    fn strings_are_verbatim_with_trailing_newline() {
        let values = ValueSet::of(&"hello").unwrap();
        assert_eq!(dump_value_set(&values), "hello\n");
    }

    #[test]
    fn maps_dump_with_sorted_keys_and_element_count() {
        let mut map = BTreeMap::new();
        map.insert("zebra", 1);
        map.insert("apple", 2);
        let values = ValueSet::of(&map).unwrap();
        let dump = dump_value_set(&values);
        assert_eq!(
            dump,
            "(map len=2) {\n  \"apple\": (number) 2\n  \"zebra\": (number) 1\n}\n"
        );
    }

    #[test]
    fn nested_lists_indent_recursively() {
        let values = ValueSet::of(&vec![vec![1], vec![2, 3]]).unwrap();
        let dump = dump_value_set(&values);
        assert_eq!(
            dump,
            "(list len=2) [\n  (list len=1) [\n    (number) 1\n  ]\n  (list len=2) [\n    (number) 2\n    (number) 3\n  ]\n]\n"
        );
    }

    #[test]
    fn dump_is_identical_across_calls() {
        let mut map = std::collections::HashMap::new();
        for key in ["d", "a", "c", "b"] {
            map.insert(key.to_string(), key.len());
        }
        let values = ValueSet::of(&map).unwrap();
        let first = dump_value_set(&values);
        let second = dump_value_set(&values);
        assert_eq!(first, second);
        assert!(first.find("\"a\"").unwrap() < first.find("\"b\"").unwrap());
    }
}
