//! Table model and Markdown grid rendering.
//!
//! Storage tables carry `rowspan`/`colspan`, which Markdown tables cannot
//! express. Rendering keeps the grid rectangular instead: a spanned cell's
//! text appears once and every other slot it covers becomes a blank
//! placeholder cell.

use std::iter;

/// Text of a slot covered by a spanning cell.
const SPAN_PLACEHOLDER: &str = "   ";

/// HTML limits for span attributes; larger values are clamped.
const MAX_COL_SPAN: usize = 1000;
const MAX_ROW_SPAN: usize = 65534;

/// Whether a cell came from `<th>` or `<td>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Header,
    Data,
}

/// One table cell and the text accumulated inside it.
///
/// Spans are always at least 1; every constructor and setter clamps them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub kind: CellKind,
    row_span: usize,
    col_span: usize,
}

impl Cell {
    pub fn new(kind: CellKind) -> Self {
        Self {
            text: String::new(),
            kind,
            row_span: 1,
            col_span: 1,
        }
    }

    /// Build a cell from raw `rowspan`/`colspan` attribute values.
    ///
    /// Missing, unparsable or zero spans become 1.
    pub fn with_spans(kind: CellKind, row_span: Option<&str>, col_span: Option<&str>) -> Self {
        Self {
            row_span: parse_span(row_span, MAX_ROW_SPAN),
            col_span: parse_span(col_span, MAX_COL_SPAN),
            ..Self::new(kind)
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set both spans, clamping each into `1..=max`.
    pub fn with_span(mut self, row_span: usize, col_span: usize) -> Self {
        self.row_span = row_span.clamp(1, MAX_ROW_SPAN);
        self.col_span = col_span.clamp(1, MAX_COL_SPAN);
        self
    }

    #[inline]
    pub fn row_span(&self) -> usize {
        self.row_span
    }

    #[inline]
    pub fn col_span(&self) -> usize {
        self.col_span
    }

    /// Cell text as it appears between the pipes of a Markdown row.
    fn markdown_text(&self) -> String {
        self.text.trim().replace('\n', " ")
    }
}

fn parse_span(raw: Option<&str>, max: usize) -> usize {
    raw.and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|span| *span >= 1)
        .map_or(1, |span| span.min(max))
}

/// An ordered sequence of cells.
pub type Row = Vec<Cell>;

/// A table under construction: completed rows plus the row being filled.
#[derive(Debug, Default, Clone)]
pub struct Table {
    rows: Vec<Row>,
    current: Row,
    row_open: bool,
    /// Upcoming rows still covered by a rowspan from a completed row
    spanned_rows: usize,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new row, completing any row left open.
    pub fn start_row(&mut self) {
        self.end_row();
        self.row_open = true;
    }

    /// Complete the current row.
    ///
    /// Empty rows are discarded unless a rowspan from above covers them, in
    /// which case they are kept so the spanned slot gets its placeholder.
    pub fn end_row(&mut self) {
        let was_open = std::mem::take(&mut self.row_open);
        if self.current.is_empty() {
            if was_open && self.spanned_rows > 0 {
                self.spanned_rows -= 1;
                self.rows.push(Row::new());
            }
            return;
        }

        let row = std::mem::take(&mut self.current);
        let tallest = row.iter().map(|cell| cell.row_span - 1).max().unwrap_or(0);
        self.spanned_rows = self.spanned_rows.saturating_sub(1).max(tallest);
        self.rows.push(row);
    }

    pub fn push_cell(&mut self, cell: Cell) {
        self.current.push(cell);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Complete the table and render it.
    pub fn finish(mut self) -> String {
        self.end_row();
        render_table(&self.rows)
    }
}

/// Emit a placeholder for every column from `col` onward that is still
/// covered by a cell spanning down from an earlier row.
fn fill_spanned(remaining: &mut [usize], col: &mut usize, out: &mut Vec<String>) {
    while *col < remaining.len() && remaining[*col] > 0 {
        out.push(SPAN_PLACEHOLDER.to_string());
        remaining[*col] -= 1;
        *col += 1;
    }
}

/// Render rows as a Markdown table.
///
/// Every row becomes `| a | b |`. When there is more than one row, a
/// `| --- |` separator sized to the first row follows it. The result ends
/// with a newline; an empty table renders as an empty string.
///
/// # Examples
///
/// ```
/// use confluence_markdown::markdown::{render_table, Cell, CellKind};
///
/// let rows = vec![
///     vec![Cell::new(CellKind::Header).with_text("Name")],
///     vec![Cell::new(CellKind::Data).with_text("storage2md")],
/// ];
/// assert_eq!(render_table(&rows), "| Name |\n| --- |\n| storage2md |\n");
/// ```
pub fn render_table(rows: &[Row]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    // Rows still to be covered, per column, by a cell spanning from above
    let mut remaining: Vec<usize> = Vec::new();
    let mut lines: Vec<String> = Vec::with_capacity(rows.len() + 1);
    let mut header_width = 0;

    for row in rows {
        let mut cells: Vec<String> = Vec::with_capacity(row.len());
        let mut col = 0;

        fill_spanned(&mut remaining, &mut col, &mut cells);
        for cell in row {
            fill_spanned(&mut remaining, &mut col, &mut cells);

            cells.push(cell.markdown_text());
            cells.extend(iter::repeat_n(SPAN_PLACEHOLDER.to_string(), cell.col_span - 1));

            let carry = cell.row_span - 1;
            for _ in 0..cell.col_span {
                match remaining.get_mut(col) {
                    Some(slot) => *slot = carry,
                    None => remaining.push(carry),
                }
                col += 1;
            }
        }
        fill_spanned(&mut remaining, &mut col, &mut cells);

        if lines.is_empty() {
            header_width = cells.len();
        }
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    if lines.len() > 1 {
        let separator = vec!["---"; header_width].join(" | ");
        lines.insert(1, format!("| {} |", separator));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn data(text: &str) -> Cell {
        Cell::new(CellKind::Data).with_text(text)
    }

    fn spanning(text: &str, row_span: usize, col_span: usize) -> Cell {
        data(text).with_span(row_span, col_span)
    }

    #[test]
    fn test_simple_grid() {
        let rows = vec![vec![data("a"), data("b")], vec![data("c"), data("d")]];
        assert_eq!(render_table(&rows), "| a | b |\n| --- | --- |\n| c | d |\n");
    }

    #[test]
    fn test_single_row_has_no_separator() {
        let rows = vec![vec![data("only")]];
        assert_eq!(render_table(&rows), "| only |\n");
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(render_table(&[]), "");
    }

    #[test]
    fn test_rowspan_leaves_placeholder() {
        // Second row has no cells of its own; its only slot is covered
        let rows = vec![vec![spanning("tall", 2, 1)], vec![]];
        assert_eq!(render_table(&rows), "| tall |\n| --- |\n|     |\n");
    }

    #[test]
    fn test_rowspan_in_first_column() {
        let rows = vec![
            vec![spanning("A", 2, 1), data("B")],
            vec![data("C")],
        ];
        assert_eq!(render_table(&rows), "| A | B |\n| --- | --- |\n|     | C |\n");
    }

    #[test]
    fn test_rowspan_in_middle_column() {
        let rows = vec![
            vec![data("a"), spanning("m", 3, 1), data("z")],
            vec![data("b"), data("y")],
            vec![data("c"), data("x")],
        ];
        assert_eq!(
            render_table(&rows),
            "| a | m | z |\n| --- | --- | --- |\n| b |     | y |\n| c |     | x |\n"
        );
    }

    #[test]
    fn test_colspan_pads_to_the_right() {
        let rows = vec![
            vec![spanning("wide", 1, 2), data("c")],
            vec![data("a"), data("b"), data("c")],
        ];
        assert_eq!(
            render_table(&rows),
            "| wide |     | c |\n| --- | --- | --- |\n| a | b | c |\n"
        );
    }

    #[test]
    fn test_row_and_col_span_block() {
        let rows = vec![
            vec![spanning("X", 2, 2), data("1")],
            vec![data("2")],
            vec![data("p"), data("q"), data("r")],
        ];
        assert_eq!(
            render_table(&rows),
            "| X |     | 1 |\n| --- | --- | --- |\n|     |     | 2 |\n| p | q | r |\n"
        );
    }

    #[test]
    fn test_trailing_spanned_columns_flushed() {
        let rows = vec![vec![data("a"), spanning("b", 2, 1)], vec![data("c")]];
        assert_eq!(render_table(&rows), "| a | b |\n| --- | --- |\n| c |     |\n");
    }

    #[test]
    fn test_cell_text_trimmed_and_flattened() {
        let rows = vec![vec![data("  line one\nline two \n")]];
        assert_eq!(render_table(&rows), "| line one line two |\n");
    }

    #[test]
    fn test_span_attribute_parsing() {
        let cell = Cell::with_spans(CellKind::Header, Some(" 3 "), Some("0"));
        assert_eq!((cell.row_span(), cell.col_span()), (3, 1));

        let cell = Cell::with_spans(CellKind::Data, Some("x"), None);
        assert_eq!((cell.row_span(), cell.col_span()), (1, 1));

        let cell = Cell::with_spans(CellKind::Data, None, Some("5000"));
        assert_eq!(cell.col_span(), MAX_COL_SPAN);
    }

    #[test]
    fn test_zero_spans_render_as_single_slot() {
        let cell = data("z").with_span(0, 0);
        assert_eq!((cell.row_span(), cell.col_span()), (1, 1));
        assert_eq!(render_table(&[vec![cell], vec![data("next")]]), "| z |\n| --- |\n| next |\n");

        let wide = data("w").with_span(usize::MAX, usize::MAX);
        assert_eq!((wide.row_span(), wide.col_span()), (MAX_ROW_SPAN, MAX_COL_SPAN));
    }

    #[test]
    fn test_table_builder_discards_empty_rows() {
        let mut table = Table::new();
        table.start_row();
        table.end_row();
        table.start_row();
        table.push_cell(data("kept"));
        // Unclosed final row is completed by finish
        assert_eq!(table.rows().len(), 0);
        assert_eq!(table.finish(), "| kept |\n");
    }

    #[test]
    fn test_table_builder_keeps_spanned_empty_row() {
        let mut table = Table::new();
        table.start_row();
        table.push_cell(spanning("A", 2, 1));
        table.end_row();
        table.start_row();
        table.end_row();
        // Span is used up; a further empty row is dropped
        table.start_row();
        table.end_row();
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.finish(), "| A |\n| --- |\n|     |\n");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_unspanned_grid_is_rectangular(rows in 1usize..6, cols in 1usize..6) {
            let grid: Vec<Row> = (0..rows)
                .map(|r| (0..cols).map(|c| data(&format!("{}{}", r, c))).collect())
                .collect();
            let out = render_table(&grid);
            let expected_lines = if rows > 1 { rows + 1 } else { rows };
            prop_assert_eq!(out.lines().count(), expected_lines);
            for line in out.lines() {
                prop_assert_eq!(line.matches('|').count(), cols + 1);
            }
        }

        #[test]
        fn prop_full_height_rowspan_keeps_width(rows in 2usize..6, cols in 2usize..5) {
            // First column spans every row; later rows omit it.
            let mut grid: Vec<Row> = Vec::new();
            let mut first = vec![spanning("s", rows, 1)];
            first.extend((1..cols).map(|c| data(&c.to_string())));
            grid.push(first);
            for _ in 1..rows {
                grid.push((1..cols).map(|c| data(&c.to_string())).collect());
            }
            let out = render_table(&grid);
            for line in out.lines() {
                prop_assert_eq!(line.matches('|').count(), cols + 1);
            }
        }
    }
}
