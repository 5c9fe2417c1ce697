//! Streaming storage-format to Markdown conversion.
//!
//! [`StorageConverter`] consumes [`StorageEvent`]s in document order and keeps
//! a stack of [`Frame`]s describing what is currently open. Malformed input
//! never raises an error: unknown tags are ignored, unmatched end tags are
//! no-ops, and anything still open when the stream ends is closed so its
//! content is emitted.

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use super::config::ConvertOptions;
use super::context::{
    CodeBlock, CodeSource, Frame, Placement, Sink, Tag, data_sink, innermost_cell,
    innermost_macro,
};
use super::language::{DEFAULT_LANGUAGE, extract_language};
use super::table::{Cell, Table};
use super::writer::MarkdownLines;
use crate::storage::{StartTag, StorageEvent, StorageReader};

/// Attribute marking a table as a code-macro wrapper.
const MACRO_NAME_ATTR: &str = "data-macro-name";
const MACRO_PARAMETERS_ATTR: &str = "data-macro-parameters";
/// Attribute naming a structured macro or one of its parameters.
const AC_NAME_ATTR: &str = "ac:name";
const CODE_MACRO: &str = "code";
const LANGUAGE_PARAMETER: &str = "language";

/// Single-pass converter from storage-format events to Markdown.
///
/// # Examples
///
/// ```
/// use confluence_markdown::markdown::{ConvertOptions, StorageConverter};
/// use confluence_markdown::storage::StorageEvent;
///
/// let mut converter = StorageConverter::new(ConvertOptions::default());
/// converter.process(StorageEvent::start("h2", &[]));
/// converter.process(StorageEvent::text("Title"));
/// converter.process(StorageEvent::end("h2"));
/// assert_eq!(converter.finish(), "\n## Title\n");
/// ```
#[derive(Debug)]
pub struct StorageConverter {
    options: ConvertOptions,
    lines: MarkdownLines,
    /// Pending top-level text (paragraph or heading content)
    text: String,
    stack: SmallVec<[Frame; 8]>,
}

impl StorageConverter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            lines: MarkdownLines::new(),
            text: String::new(),
            stack: SmallVec::new(),
        }
    }

    /// Feed one tokenizer event.
    pub fn process(&mut self, event: StorageEvent) {
        match event {
            StorageEvent::Start(tag) => self.start_tag(&tag),
            StorageEvent::End(name) => self.end_tag(Tag::classify(&name), &name),
            StorageEvent::Text(data) => self.character_data(&data),
            StorageEvent::CData(data) => self.unparsed(&data),
        }
    }

    /// Close everything still open and return the normalized Markdown.
    pub fn finish(mut self) -> String {
        if !self.stack.is_empty() {
            debug!(open = self.stack.len(), "closing unterminated elements");
        }
        while let Some(frame) = self.stack.pop() {
            self.close_frame(frame);
        }
        self.flush_text();
        self.lines.finish()
    }

    /// Whether a start tag may act given the innermost frame. Code bodies,
    /// parameters and code-table wrappers own everything inside them.
    fn admits_start(&self, tag: Tag) -> bool {
        match self.stack.last() {
            Some(Frame::Code(_)) => tag == Tag::LineBreak,
            Some(Frame::Parameter { .. }) => false,
            Some(Frame::CodeTable { .. }) => matches!(tag, Tag::Preformatted | Tag::Table),
            _ => true,
        }
    }

    /// End-tag counterpart of [`Self::admits_start`].
    fn admits_end(&self, tag: Tag) -> bool {
        match self.stack.last() {
            Some(Frame::Code(block)) => block.closes_on(tag),
            Some(Frame::Parameter { .. }) => tag == Tag::Parameter,
            Some(Frame::CodeTable { .. }) => tag == Tag::Table,
            _ => true,
        }
    }

    fn start_tag(&mut self, start: &StartTag) {
        let tag = Tag::classify(&start.name);
        if !self.admits_start(tag) {
            trace!(tag = %start.name, "ignoring start tag inside exclusive block");
            return;
        }

        match tag {
            Tag::Table => self.open_table(start),
            Tag::StructuredMacro => {
                let is_code = start.attribute(AC_NAME_ATTR) == Some(CODE_MACRO);
                self.stack.push(Frame::Macro {
                    is_code,
                    language: None,
                });
            },
            Tag::Parameter => {
                let language = self.in_code_macro()
                    && start.attribute(AC_NAME_ATTR) == Some(LANGUAGE_PARAMETER);
                self.stack.push(Frame::Parameter { language });
            },
            Tag::PlainTextBody => {
                if let Some(language) = self.code_macro_language() {
                    self.open_code(CodeSource::MacroBody, Some(language));
                }
            },
            Tag::Heading(level) => {
                if self.in_cell() {
                    self.break_cell_line();
                } else {
                    self.flush_text();
                }
                self.stack.push(Frame::Heading(level));
            },
            Tag::Paragraph => {
                if !self.in_cell() {
                    self.flush_text();
                }
            },
            Tag::LineBreak => self.line_break(),
            Tag::Preformatted => match self.stack.last() {
                Some(Frame::CodeTable { language, .. }) => {
                    let language = language.clone();
                    self.open_code(CodeSource::MacroTable, Some(language));
                },
                _ => self.open_code(CodeSource::Preformatted, None),
            },
            Tag::InlineCode => {
                self.text_sink().push('`');
                self.stack.push(Frame::InlineCode);
            },
            Tag::Row => {
                self.close_stray_cell();
                if let Some(Frame::Table(table)) = self.stack.last_mut() {
                    table.start_row();
                }
            },
            Tag::Cell(kind) => {
                self.close_stray_cell();
                if matches!(self.stack.last(), Some(Frame::Table(_))) {
                    let cell =
                        Cell::with_spans(kind, start.attribute("rowspan"), start.attribute("colspan"));
                    self.stack.push(Frame::Cell(cell));
                }
            },
            Tag::Other => {},
        }
    }

    fn end_tag(&mut self, tag: Tag, name: &str) {
        if !self.admits_end(tag) {
            trace!(tag = %name, "ignoring end tag inside exclusive block");
            return;
        }

        match tag {
            Tag::Table => self.close_table(),
            Tag::Row => {
                self.close_stray_cell();
                if let Some(Frame::Table(table)) = self.stack.last_mut() {
                    table.end_row();
                }
            },
            Tag::Cell(_) => {
                if let Some(index) = self.find_within_table(|f| matches!(f, Frame::Cell(_))) {
                    self.close_from(index);
                }
            },
            Tag::Heading(_) => {
                if let Some(index) = self.find_within_table(|f| matches!(f, Frame::Heading(_))) {
                    self.close_from(index);
                }
            },
            Tag::InlineCode => {
                if let Some(index) = self.find_within_table(|f| matches!(f, Frame::InlineCode)) {
                    self.close_from(index);
                }
            },
            Tag::Paragraph => {
                if self.in_cell() {
                    self.break_cell_line();
                } else {
                    let line = format!("{}\n", self.text.trim());
                    self.text.clear();
                    self.lines.push_line(line);
                }
            },
            Tag::Preformatted | Tag::PlainTextBody => {
                if matches!(self.stack.last(), Some(Frame::Code(block)) if block.closes_on(tag)) {
                    self.close_from(self.stack.len() - 1);
                }
            },
            Tag::StructuredMacro => {
                if let Some(index) = innermost_macro(&self.stack) {
                    self.close_from(index);
                }
            },
            Tag::Parameter => {
                if matches!(self.stack.last(), Some(Frame::Parameter { .. })) {
                    self.stack.pop();
                }
            },
            Tag::LineBreak | Tag::Other => {},
        }
    }

    fn character_data(&mut self, data: &str) {
        match data_sink(&self.stack) {
            Sink::Language(index) => {
                if let Frame::Macro { language, .. } = &mut self.stack[index]
                    && language.is_none()
                {
                    *language = Some(data.trim().to_string());
                }
            },
            Sink::Code(index) => {
                if let Frame::Code(block) = &mut self.stack[index] {
                    block.push_text(data);
                }
            },
            Sink::Cell(index) => {
                if let Frame::Cell(cell) = &mut self.stack[index] {
                    cell.text.push_str(data);
                }
            },
            Sink::Text => self.text.push_str(data),
            Sink::Discard => {},
        }
    }

    /// CDATA content only means something inside a code body.
    fn unparsed(&mut self, data: &str) {
        match data_sink(&self.stack) {
            Sink::Code(index) => {
                if let Frame::Code(block) = &mut self.stack[index] {
                    block.push_unparsed(data);
                }
            },
            _ => trace!(len = data.len(), "dropping unparsed declaration outside code"),
        }
    }

    fn open_table(&mut self, start: &StartTag) {
        if let Some(Frame::CodeTable { nested, .. }) = self.stack.last_mut() {
            *nested += 1;
            return;
        }

        self.flush_text();
        if start.attribute(MACRO_NAME_ATTR) == Some(CODE_MACRO) {
            let language = extract_language(start.attribute(MACRO_PARAMETERS_ATTR).unwrap_or(""));
            self.stack.push(Frame::CodeTable {
                language,
                nested: 0,
            });
        } else {
            self.stack.push(Frame::Table(Table::new()));
        }
    }

    fn close_table(&mut self) {
        match self.stack.last_mut() {
            Some(Frame::CodeTable { nested, .. }) if *nested > 0 => *nested -= 1,
            Some(Frame::CodeTable { .. }) => {
                self.stack.pop();
            },
            _ => {
                if let Some(index) = self
                    .stack
                    .iter()
                    .rposition(|frame| matches!(frame, Frame::Table(_)))
                {
                    self.close_from(index);
                }
            },
        }
    }

    /// Open a code block; inside a cell it will be written as a code span.
    fn open_code(&mut self, source: CodeSource, language: Option<String>) {
        let placement = if self.in_cell() {
            Placement::Inline
        } else {
            self.flush_text();
            Placement::Fence
        };
        self.stack
            .push(Frame::Code(CodeBlock::open(source, language, placement)));
    }

    /// Pop and close every frame from `index` to the top, innermost first.
    fn close_from(&mut self, index: usize) {
        while self.stack.len() > index {
            if let Some(frame) = self.stack.pop() {
                self.close_frame(frame);
            }
        }
    }

    fn close_frame(&mut self, frame: Frame) {
        match frame {
            Frame::Table(table) => {
                self.flush_text();
                let rows = table.rows().len();
                let markdown = table.finish();
                debug!(rows, "rendered table");
                match self.cell_mut() {
                    Some(cell) => {
                        cell.text.push('\n');
                        cell.text.push_str(&markdown);
                        cell.text.push('\n');
                    },
                    None => self.lines.push_line(format!("\n{}\n", markdown)),
                }
            },
            Frame::Cell(cell) => match self.stack.last_mut() {
                Some(Frame::Table(table)) => table.push_cell(cell),
                _ => warn!("table cell closed outside of a table"),
            },
            Frame::Heading(level) => {
                if self.in_cell() {
                    self.break_cell_line();
                } else {
                    self.emit_heading(level);
                }
            },
            Frame::InlineCode => self.text_sink().push('`'),
            Frame::Code(block) => self.emit_code(block),
            Frame::CodeTable { .. } | Frame::Macro { .. } | Frame::Parameter { .. } => {},
        }
    }

    fn emit_heading(&mut self, level: u8) {
        let text = std::mem::take(&mut self.text);
        let hashes = "#".repeat(usize::from(level));
        let line = match self.options.heading_mark(level) {
            Some(mark) => format!("\n{} {} {}\n", hashes, mark, text.trim()),
            None => format!("\n{} {}\n", hashes, text.trim()),
        };
        self.lines.push_line(line);
    }

    fn emit_code(&mut self, block: CodeBlock) {
        debug!(source = ?block.source, language = ?block.language, "closing code block");
        if block.placement == Placement::Inline
            && let Some(cell) = self.cell_mut()
        {
            cell.text.push_str(&block.inline_span());
            return;
        }

        self.lines.push_line(block.fence_open());
        self.lines.push_line(block.body());
        self.lines.push_line("```\n");
    }

    fn line_break(&mut self) {
        if let Some(Frame::Code(block)) = self.stack.last_mut() {
            block.push_line_break();
            return;
        }
        self.text_sink().push('\n');
    }

    /// Separate block-level content inside a cell.
    fn break_cell_line(&mut self) {
        if let Some(cell) = self.cell_mut()
            && !cell.text.is_empty()
            && !cell.text.ends_with('\n')
        {
            cell.text.push('\n');
        }
    }

    /// Close a cell left open by a following `<td>`/`<tr>`/`</tr>`.
    fn close_stray_cell(&mut self) {
        if let Some(index) = self.find_within_table(|f| matches!(f, Frame::Cell(_))) {
            self.close_from(index);
        }
    }

    fn flush_text(&mut self) {
        let trimmed = self.text.trim();
        if !trimmed.is_empty() {
            let line = trimmed.to_string();
            self.lines.push_line(line);
        }
        self.text.clear();
    }

    /// Innermost frame matching `pred`, without looking past the innermost
    /// table (a match inside the table's own cell is still found).
    fn find_within_table(&self, pred: impl Fn(&Frame) -> bool) -> Option<usize> {
        for (index, frame) in self.stack.iter().enumerate().rev() {
            if pred(frame) {
                return Some(index);
            }
            if matches!(frame, Frame::Table(_)) {
                return None;
            }
        }
        None
    }

    fn in_cell(&self) -> bool {
        for frame in self.stack.iter().rev() {
            match frame {
                Frame::Cell(_) => return true,
                Frame::Table(_) => return false,
                _ => {},
            }
        }
        false
    }

    fn cell_mut(&mut self) -> Option<&mut Cell> {
        innermost_cell(&mut self.stack)
    }

    /// The cell text when inside a cell, otherwise the pending top-level text.
    fn text_sink(&mut self) -> &mut String {
        match innermost_cell(&mut self.stack) {
            Some(cell) => &mut cell.text,
            None => &mut self.text,
        }
    }

    fn in_code_macro(&self) -> bool {
        innermost_macro(&self.stack)
            .is_some_and(|index| matches!(self.stack[index], Frame::Macro { is_code: true, .. }))
    }

    /// Language for a body opening in the innermost code macro, or `None`
    /// when the innermost macro is not a code macro. An unset or blank
    /// language parameter falls back to the default.
    fn code_macro_language(&self) -> Option<String> {
        let index = innermost_macro(&self.stack)?;
        match &self.stack[index] {
            Frame::Macro {
                is_code: true,
                language,
            } => Some(
                language
                    .as_deref()
                    .filter(|language| !language.is_empty())
                    .unwrap_or(DEFAULT_LANGUAGE)
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// Convert storage-format markup to Markdown.
///
/// Tokenizer errors are logged and end the input early; whatever was read
/// up to that point is still converted.
///
/// # Examples
///
/// ```
/// use confluence_markdown::markdown::{convert_storage, ConvertOptions};
///
/// let markdown = convert_storage("<p>Use <code>cargo</code> here</p>", &ConvertOptions::default());
/// assert_eq!(markdown, "Use `cargo` here\n");
/// ```
pub fn convert_storage(markup: &str, options: &ConvertOptions) -> String {
    let mut converter = StorageConverter::new(options.clone());
    for event in StorageReader::new(markup) {
        match event {
            Ok(event) => converter.process(event),
            Err(e) => {
                warn!(error = %e, "stopping at unreadable markup");
                break;
            },
        }
    }
    converter.finish()
}
