//! Unified line-diff rendering for the textual backend.

use difference::{Changeset, Difference};

const NO_NEWLINE_MARKER: &str = "\\ No newline at end of file";

/// Renders a unified line diff with one line of context around each change
/// hunk. Returns an empty string when the inputs are equal.
pub fn unified(previous: &str, current: &str) -> String {
    if previous == current {
        return String::new();
    }

    // Diff over whole lines. Stripping the trailing separator up front keeps
    // the changeset from producing a phantom empty segment whenever a change
    // touches the last line; a genuinely missing final newline is called out
    // with an explicit marker line instead.
    let prev_text = normalize(previous);
    let cur_text = normalize(current);
    let prev_lines = split_lines(&prev_text);
    let cur_lines = split_lines(&cur_text);

    let changeset: Changeset;
    let mut ops: Vec<(char, &str)> = Vec::new();
    if prev_lines.is_empty() {
        ops.extend(cur_lines.iter().map(|line| ('+', *line)));
    } else if cur_lines.is_empty() {
        ops.extend(prev_lines.iter().map(|line| ('-', *line)));
    } else {
        changeset = Changeset::new(&prev_text, &cur_text, "\n");
        for diff in &changeset.diffs {
            let (tag, text) = match diff {
                Difference::Same(text) => (' ', text),
                Difference::Add(text) => ('+', text),
                Difference::Rem(text) => ('-', text),
            };
            for line in text.split('\n') {
                ops.push((tag, line));
            }
        }
    }

    // Keep every changed line plus one context line on each side.
    let mut keep = vec![false; ops.len()];
    for i in 0..ops.len() {
        if ops[i].0 != ' ' {
            keep[i] = true;
            if i > 0 {
                keep[i - 1] = true;
            }
            if i + 1 < ops.len() {
                keep[i + 1] = true;
            }
        }
    }

    let mut out = String::from("--- previous\n+++ current\n");
    let mut prev_line = 1usize;
    let mut cur_line = 1usize;
    let mut i = 0;
    while i < ops.len() {
        if !keep[i] {
            prev_line += 1;
            cur_line += 1;
            i += 1;
            continue;
        }

        let hunk_start = i;
        let mut hunk_end = i;
        while hunk_end < ops.len() && keep[hunk_end] {
            hunk_end += 1;
        }

        let prev_start = prev_line;
        let cur_start = cur_line;
        let mut prev_count = 0usize;
        let mut cur_count = 0usize;
        let mut body = String::new();
        for &(tag, line) in &ops[hunk_start..hunk_end] {
            body.push(tag);
            body.push_str(line);
            body.push('\n');
            match tag {
                '-' => prev_count += 1,
                '+' => cur_count += 1,
                _ => {
                    prev_count += 1;
                    cur_count += 1;
                }
            }
        }

        out.push_str(&format!(
            "@@ -{},{} +{},{} @@\n",
            prev_start, prev_count, cur_start, cur_count
        ));
        out.push_str(&body);

        prev_line = prev_start + prev_count;
        cur_line = cur_start + cur_count;
        i = hunk_end;
    }

    out
}

/// Drops the conventional trailing separator, or flags its absence.
fn normalize(text: &str) -> String {
    match text.strip_suffix('\n') {
        Some(stripped) => stripped.to_string(),
        None if text.is_empty() => String::new(),
        None => format!("{text}\n{NO_NEWLINE_MARKER}"),
    }
}

/// Empty text has zero lines, not one empty line.
fn split_lines(text: &str) -> Vec<&str> {
    if text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_inputs_diff_to_empty() {
        assert_eq!(unified("hello\n", "hello\n"), "");
        assert_eq!(unified("", ""), "");
    }

    #[test]
    fn single_line_replacement() {
        let diff = unified("hello\n", "world\n");
        assert!(diff.contains("-hello"));
        assert!(diff.contains("+world"));
        assert!(diff.contains("@@ -1,1 +1,1 @@"));
    }

    #[test]
    fn change_on_the_last_line_adds_no_phantom_blank_line() {
        let diff = unified("a\nhello\n", "a\nworld\n");
        assert!(diff.contains(" a\n-hello\n+world\n"));
        assert!(diff.contains("@@ -1,2 +1,2 @@"));
        // no bare removal/addition of an empty line
        assert!(!diff.contains("-\n"));
        assert!(!diff.contains("+\n"));
    }

    #[test]
    fn absent_previous_adds_every_line_without_phantom_removals() {
        let diff = unified("", "hello\nworld\n");
        assert!(diff.contains("+hello\n+world\n"));
        assert!(!diff.contains("-\n"));
    }

    #[test]
    fn missing_final_newline_is_called_out() {
        let diff = unified("hello\n", "hello");
        assert!(diff.contains("No newline at end of file"));
    }

    #[test]
    fn far_away_unchanged_lines_are_elided() {
        let previous = "a\nb\nc\nd\ne\n";
        let current = "a\nb\nc\nd\nE\n";
        let diff = unified(previous, current);
        // one context line before the change, nothing from the unchanged head
        assert!(diff.contains(" d\n-e\n+E\n"));
        assert!(diff.contains("@@ -4,2 +4,2 @@"));
        assert!(!diff.contains(" a\n"));
        assert!(!diff.contains(" b\n"));
    }

    #[test]
    fn separate_changes_produce_separate_hunks() {
        let previous = "a\nb\nc\nd\ne\nf\ng\n";
        let current = "A\nb\nc\nd\ne\nf\nG\n";
        let diff = unified(previous, current);
        assert_eq!(diff.matches("@@").count(), 4); // two hunks, two markers each
        assert!(diff.contains("-a\n+A\n b\n"));
        assert!(diff.contains(" f\n-g\n+G\n"));
    }
}
