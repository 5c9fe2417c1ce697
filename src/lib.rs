//! Confluence Markdown - convert wiki storage-format page bodies to Markdown
//!
//! Confluence stores page bodies in an HTML-like "storage format" with its
//! own macro tags. This library converts that markup to Markdown in a single
//! streaming pass, covering headings, paragraphs, inline code, code macros
//! and tables with row/column spans, including code and tables nested inside
//! table cells.
//!
//! # Features
//!
//! - **Streaming**: one pass over tokenizer events, no DOM
//! - **Best effort**: malformed markup degrades, it never aborts conversion
//! - **Span-aware tables**: `rowspan`/`colspan` keep the Markdown grid rectangular
//! - **Heading level marks**: optional `## L_2 Title` tagging for downstream chunking
//! - **Page artifacts**: turn a fetched page into inline text or a `<title>.md` file
//!
//! # Example - Converting markup
//!
//! ```rust
//! use confluence_markdown::{ConvertOptions, convert_storage};
//!
//! let markup = r#"<h2>Limits</h2>
//! <table><tbody>
//!   <tr><th>Plan</th><th>Quota</th></tr>
//!   <tr><td>Free</td><td>10</td></tr>
//! </tbody></table>"#;
//!
//! let markdown = convert_storage(markup, &ConvertOptions::default());
//! assert!(markdown.contains("## Limits"));
//! assert!(markdown.contains("| Plan | Quota |\n| --- | --- |\n| Free | 10 |"));
//! ```
//!
//! # Example - Converting a fetched page
//!
//! ```rust
//! use confluence_markdown::{ConvertOptions, Page};
//! use confluence_markdown::page::{MarkdownOutput, OutputMode};
//!
//! # fn main() -> Result<(), confluence_markdown::Error> {
//! let page = Page::from_json(r#"{"success": true, "title": "FAQ", "content": "<p>Ask away</p>"}"#)?;
//! match page.render(&ConvertOptions::default(), OutputMode::File)? {
//!     MarkdownOutput::File(artifact) => assert_eq!(artifact.filename, "FAQ.md"),
//!     MarkdownOutput::Text(_) => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod markdown;
pub mod page;
pub mod storage;

pub use common::{Error, Result};
pub use markdown::{ConvertOptions, StorageConverter, StorageDocument, ToMarkdown, convert_storage};
pub use page::{MarkdownArtifact, OutputMode, Page};
