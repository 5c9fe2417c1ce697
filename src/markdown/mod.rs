//! Storage-format to Markdown conversion.
//!
//! This module converts Confluence storage-format page bodies into Markdown
//! in a single streaming pass over tokenizer events.
//!
//! # Supported markup
//!
//! - **Headings** `<h1>`..`<h6>`, optionally tagged with a level mark (`## L_2 Title`)
//! - **Paragraphs and line breaks**
//! - **Inline code** `<code>` as backtick spans
//! - **Code blocks** from `<pre>`, code-macro tables and `ac:structured-macro`
//!   code macros, fenced at top level and flattened to code spans in table cells
//! - **Tables** with `rowspan`/`colspan`, including tables nested in cells
//!
//! # Quick Start
//!
//! ```rust
//! use confluence_markdown::markdown::{convert_storage, ConvertOptions};
//!
//! let markup = r#"<h2>Install</h2>
//! <ac:structured-macro ac:name="code">
//!   <ac:parameter ac:name="language">bash</ac:parameter>
//!   <ac:plain-text-body><![CDATA[cargo install storage2md]]></ac:plain-text-body>
//! </ac:structured-macro>"#;
//!
//! let markdown = convert_storage(markup, &ConvertOptions::default());
//! assert!(markdown.contains("## Install"));
//! assert!(markdown.contains("```bash\ncargo install storage2md\n```"));
//! ```
//!
//! # Architecture
//!
//! - [`StorageConverter`]: the event-driven state machine
//! - [`ConvertOptions`]: heading level-mark configuration
//! - [`render_table`]: span-aware Markdown table rendering
//! - [`MarkdownLines`]: blank-line collapsing output buffer
//! - [`ToMarkdown`]: trait for anything carrying storage markup

// Module declarations
mod config;
mod context;
mod converter;
mod document;
mod language;
mod table;
mod traits;
mod writer;

// Re-export public API
pub use config::{ConvertOptions, DEFAULT_MARK_PREFIX};
pub use converter::{StorageConverter, convert_storage};
pub use document::StorageDocument;
pub use language::{DEFAULT_LANGUAGE, extract_language};
pub use table::{Cell, CellKind, Row, Table, render_table};
pub use traits::ToMarkdown;
pub use writer::{MarkdownLines, normalize_blank_lines};
