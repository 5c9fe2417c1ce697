//! Line buffer for Markdown generation.
//!
//! Output is assembled as a sequence of "lines", where a pushed line may
//! itself contain embedded newlines (a fenced block body, a rendered table
//! with its surrounding blank lines). Blank lines are collapsed as lines are
//! pushed and once more over the joined text in [`MarkdownLines::finish`],
//! since concatenating multi-line fragments can reintroduce blank runs.

/// A line is blank when nothing but whitespace remains after trimming.
#[inline]
fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Accumulates output lines without ever holding two consecutive blank
/// entries.
#[derive(Debug, Default, Clone)]
pub struct MarkdownLines {
    lines: Vec<String>,
}

impl MarkdownLines {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self {
            lines: Vec::with_capacity(64),
        }
    }

    /// Append a line. A blank line is dropped when the buffer already ends
    /// in a blank line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        let line = line.into();
        if is_blank(&line) && self.lines.last().is_some_and(|last| is_blank(last)) {
            return;
        }
        self.lines.push(line);
    }

    /// Number of buffered entries.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join the buffered lines and run the final normalization pass.
    pub fn finish(self) -> String {
        normalize_blank_lines(&self.lines.join("\n"))
    }
}

/// Collapse every run of blank lines in `text` to a single blank line.
///
/// The first line of each run is kept as-is. Applying the function twice
/// yields the same string as applying it once.
///
/// # Examples
///
/// ```
/// use confluence_markdown::markdown::normalize_blank_lines;
/// assert_eq!(normalize_blank_lines("a\n\n\n\nb"), "a\n\nb");
/// assert_eq!(normalize_blank_lines("\n## T\n\n\n"), "\n## T\n");
/// ```
pub fn normalize_blank_lines(text: &str) -> String {
    let mut cleaned: Vec<&str> = Vec::new();
    let mut prev_blank = false;

    for line in text.split('\n') {
        let blank = is_blank(line);
        if !(blank && prev_blank) {
            cleaned.push(line);
        }
        prev_blank = blank;
    }

    cleaned.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn has_blank_run(text: &str) -> bool {
        text.split('\n')
            .collect::<Vec<_>>()
            .windows(2)
            .any(|pair| is_blank(pair[0]) && is_blank(pair[1]))
    }

    #[test]
    fn test_push_collapses_blank_lines() {
        let mut lines = MarkdownLines::new();
        lines.push_line("a");
        lines.push_line("");
        lines.push_line("   ");
        lines.push_line("\n");
        lines.push_line("b");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines.finish(), "a\n\nb");
    }

    #[test]
    fn test_leading_blank_is_kept_once() {
        let mut lines = MarkdownLines::new();
        lines.push_line("");
        lines.push_line("");
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn test_finish_collapses_embedded_runs() {
        let mut lines = MarkdownLines::new();
        lines.push_line("```\n");
        lines.push_line("\n## Next\n");
        assert_eq!(lines.finish(), "```\n\n## Next\n");
    }

    #[test]
    fn test_empty_buffer() {
        let lines = MarkdownLines::new();
        assert!(lines.is_empty());
        assert_eq!(lines.finish(), "");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn prop_normalize_leaves_no_blank_runs(text in "[a \n]{0,40}") {
            let once = normalize_blank_lines(&text);
            prop_assert!(!has_blank_run(&once), "blank run in {:?}", once);
        }

        #[test]
        fn prop_normalize_is_idempotent(text in "[ab# \t\n]{0,40}") {
            let once = normalize_blank_lines(&text);
            prop_assert_eq!(normalize_blank_lines(&once), once);
        }

        #[test]
        fn prop_buffer_output_has_no_blank_runs(
            parts in prop::collection::vec("[x \n]{0,6}", 0..12)
        ) {
            let mut lines = MarkdownLines::new();
            for part in parts {
                lines.push_line(part);
            }
            let out = lines.finish();
            prop_assert!(!has_blank_run(&out), "blank run in {:?}", out);
        }
    }
}
