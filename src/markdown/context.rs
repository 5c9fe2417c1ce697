//! Parse-context frames for the storage converter.
//!
//! Each open structural element that affects where text goes is one
//! [`Frame`] on the converter's stack. Routing decisions look at the stack
//! from the top down, so a combination such as "code block inside a cell of
//! a table nested in another cell" is simply the sequence of frames that
//! describes it.

use super::table::{Cell, CellKind, Table};

/// Storage-format tags the converter reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag {
    Table,
    Row,
    Cell(CellKind),
    Heading(u8),
    Paragraph,
    LineBreak,
    Preformatted,
    InlineCode,
    StructuredMacro,
    Parameter,
    PlainTextBody,
    Other,
}

impl Tag {
    /// Classify a lowercased tag name.
    pub(crate) fn classify(name: &str) -> Self {
        match name {
            "table" => Tag::Table,
            "tr" => Tag::Row,
            "td" => Tag::Cell(CellKind::Data),
            "th" => Tag::Cell(CellKind::Header),
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "br" => Tag::LineBreak,
            "pre" => Tag::Preformatted,
            "code" => Tag::InlineCode,
            "ac:structured-macro" => Tag::StructuredMacro,
            "ac:parameter" => Tag::Parameter,
            "ac:plain-text-body" => Tag::PlainTextBody,
            _ => Tag::Other,
        }
    }
}

/// Which markup produced a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CodeSource {
    /// A bare `<pre>`
    Preformatted,
    /// The `<pre>` inside a `<table data-macro-name="code">` wrapper
    MacroTable,
    /// `<ac:plain-text-body>` of an `<ac:structured-macro ac:name="code">`
    MacroBody,
}

/// Where a finished code block is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Placement {
    /// Top-level fenced block
    Fence,
    /// Single-line code span appended to the enclosing cell
    Inline,
}

/// A code block being accumulated.
#[derive(Debug, Clone)]
pub(crate) struct CodeBlock {
    pub(crate) source: CodeSource,
    pub(crate) language: Option<String>,
    pub(crate) placement: Placement,
    text: String,
    /// Inside a `[CDATA[` marker delivered as plain text
    in_cdata: bool,
}

impl CodeBlock {
    pub(crate) fn open(source: CodeSource, language: Option<String>, placement: Placement) -> Self {
        Self {
            source,
            language,
            placement,
            text: String::new(),
            in_cdata: false,
        }
    }

    /// Whether an end tag of kind `tag` closes this block.
    pub(crate) fn closes_on(&self, tag: Tag) -> bool {
        match self.source {
            CodeSource::Preformatted | CodeSource::MacroTable => tag == Tag::Preformatted,
            CodeSource::MacroBody => tag == Tag::PlainTextBody,
        }
    }

    /// Append character data.
    ///
    /// A macro body may receive its CDATA wrapper as ordinary text when the
    /// tokenizer does not split it out; the `[CDATA[` and `]]` markers are
    /// stripped from such fragments.
    pub(crate) fn push_text(&mut self, data: &str) {
        if self.source != CodeSource::MacroBody {
            self.text.push_str(data);
            return;
        }

        let mut data = data;
        if let Some((_, rest)) = data.split_once("[CDATA[") {
            self.in_cdata = true;
            data = rest;
        }
        if self.in_cdata
            && let Some((content, _)) = data.split_once("]]")
        {
            self.in_cdata = false;
            data = content;
        }
        self.text.push_str(data);
    }

    /// Append the content of an unparsed declaration.
    pub(crate) fn push_unparsed(&mut self, data: &str) {
        let content = data.strip_prefix("CDATA[").unwrap_or(data);
        self.text.push_str(content);
    }

    pub(crate) fn push_line_break(&mut self) {
        self.text.push('\n');
    }

    /// Opening fence line, preceded by a blank line.
    pub(crate) fn fence_open(&self) -> String {
        format!("\n```{}", self.language.as_deref().unwrap_or(""))
    }

    pub(crate) fn body(&self) -> &str {
        &self.text
    }

    /// The block flattened to one line: `` `lang code` `` or `` `code` ``.
    pub(crate) fn inline_span(&self) -> String {
        let body = self.text.replace('\n', " ");
        match self.language.as_deref() {
            Some(language) => format!("`{} {}`", language, body),
            None => format!("`{}`", body),
        }
    }
}

/// One open structural element.
#[derive(Debug, Clone)]
pub(crate) enum Frame {
    Table(Table),
    Cell(Cell),
    Heading(u8),
    InlineCode,
    /// `<table data-macro-name="code">`; only its `<pre>` matters
    CodeTable {
        language: String,
        /// Tables opened (and ignored) inside the wrapper
        nested: usize,
    },
    /// `<ac:structured-macro>`; `language` is set once by its parameter
    Macro {
        is_code: bool,
        language: Option<String>,
    },
    /// `<ac:parameter>`; `language` marks the language parameter of a code macro
    Parameter { language: bool },
    Code(CodeBlock),
}

/// Where character data goes, given the current stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sink {
    Discard,
    /// Language of the macro frame at this index
    Language(usize),
    Code(usize),
    Cell(usize),
    Text,
}

/// Resolve the data sink for `stack`, innermost frame first.
pub(crate) fn data_sink(stack: &[Frame]) -> Sink {
    for (index, frame) in stack.iter().enumerate().rev() {
        match frame {
            Frame::Parameter { language: true } => {
                return innermost_macro(&stack[..index])
                    .map_or(Sink::Discard, Sink::Language);
            },
            Frame::Parameter { language: false } | Frame::CodeTable { .. } => return Sink::Discard,
            Frame::Code(_) => return Sink::Code(index),
            Frame::Cell(_) => return Sink::Cell(index),
            Frame::Table(_) => return Sink::Text,
            Frame::Heading(_) | Frame::InlineCode | Frame::Macro { .. } => {},
        }
    }
    Sink::Text
}

/// Index of the innermost structured-macro frame.
pub(crate) fn innermost_macro(stack: &[Frame]) -> Option<usize> {
    stack
        .iter()
        .rposition(|frame| matches!(frame, Frame::Macro { .. }))
}

/// The cell of the innermost table, if that table currently has one open.
pub(crate) fn innermost_cell(stack: &mut [Frame]) -> Option<&mut Cell> {
    for frame in stack.iter_mut().rev() {
        match frame {
            Frame::Cell(cell) => return Some(cell),
            Frame::Table(_) => return None,
            _ => {},
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(Tag::classify("h4"), Tag::Heading(4));
        assert_eq!(Tag::classify("th"), Tag::Cell(CellKind::Header));
        assert_eq!(Tag::classify("ac:plain-text-body"), Tag::PlainTextBody);
        assert_eq!(Tag::classify("h7"), Tag::Other);
        assert_eq!(Tag::classify("tbody"), Tag::Other);
    }

    #[test]
    fn test_cdata_markers_stripped_from_text() {
        let mut block = CodeBlock::open(CodeSource::MacroBody, None, Placement::Fence);
        block.push_text("<![CDATA[a = 1\n");
        block.push_text("b = 2]]>");
        block.push_text("\n");
        assert_eq!(block.body(), "a = 1\nb = 2\n");

        // The marker closes at the first "]]" seen while inside CDATA
        let mut block = CodeBlock::open(CodeSource::MacroBody, None, Placement::Fence);
        block.push_text("[CDATA[x = y[z[0]]]]");
        assert_eq!(block.body(), "x = y[z[0");
    }

    #[test]
    fn test_preformatted_text_untouched() {
        let mut block = CodeBlock::open(CodeSource::Preformatted, None, Placement::Fence);
        block.push_text("x[CDATA[y]]");
        assert_eq!(block.body(), "x[CDATA[y]]");
    }

    #[test]
    fn test_unparsed_prefix_stripped() {
        let mut block = CodeBlock::open(CodeSource::MacroBody, None, Placement::Fence);
        block.push_unparsed("CDATA[print(1)");
        block.push_unparsed("\nprint(2)");
        assert_eq!(block.body(), "print(1)\nprint(2)");
    }

    #[test]
    fn test_inline_span() {
        let mut block = CodeBlock::open(
            CodeSource::MacroTable,
            Some("java".to_string()),
            Placement::Inline,
        );
        block.push_text("int a;\nint b;");
        assert_eq!(block.inline_span(), "`java int a; int b;`");

        let mut bare = CodeBlock::open(CodeSource::Preformatted, None, Placement::Inline);
        bare.push_text("ls\n-la");
        assert_eq!(bare.inline_span(), "`ls -la`");
        assert_eq!(bare.fence_open(), "\n```");
    }

    #[test]
    fn test_data_sink_routing() {
        let stack = vec![
            Frame::Table(Table::new()),
            Frame::Cell(Cell::new(CellKind::Data)),
            Frame::Macro {
                is_code: true,
                language: None,
            },
            Frame::Parameter { language: true },
        ];
        assert_eq!(data_sink(&stack), Sink::Language(2));
        assert_eq!(data_sink(&stack[..3]), Sink::Cell(1));
        assert_eq!(data_sink(&stack[..1]), Sink::Text);
        assert_eq!(data_sink(&[]), Sink::Text);
    }

    #[test]
    fn test_innermost_cell_stops_at_table() {
        let mut stack = vec![
            Frame::Table(Table::new()),
            Frame::Cell(Cell::new(CellKind::Data)),
            Frame::Table(Table::new()),
        ];
        assert!(innermost_cell(&mut stack).is_none());
        assert!(innermost_cell(&mut stack[..2]).is_some());
    }
}
