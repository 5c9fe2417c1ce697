//! Fetched wiki pages and their Markdown output.
//!
//! A page fetcher reports `{success, title, content, message}`; this module
//! turns such a payload into Markdown, either as inline text or as a
//! `<title>.md` file artifact.

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::{Error, Result};
use crate::markdown::{ConvertOptions, ToMarkdown, convert_storage};

const UNTITLED: &str = "untitled";
const UNKNOWN_ERROR: &str = "unknown error";
pub const MARKDOWN_MIME_TYPE: &str = "text/markdown";

fn untitled() -> String {
    UNTITLED.to_string()
}

/// A page as reported by the fetcher.
///
/// # Examples
///
/// ```
/// use confluence_markdown::page::Page;
///
/// let page: Page = serde_json::from_str(
///     r#"{"success": true, "title": "Runbook", "results": "<h1>Steps</h1>"}"#,
/// ).unwrap();
/// assert_eq!(page.markdown(&Default::default()).unwrap(), "\n# Steps\n");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub success: bool,
    #[serde(default = "untitled")]
    pub title: String,
    /// Storage-format body
    #[serde(default, alias = "results")]
    pub content: String,
    #[serde(default)]
    pub message: Option<String>,
}

impl Page {
    /// A successfully fetched page.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            success: true,
            title: title.into(),
            content: content.into(),
            message: None,
        }
    }

    /// A fetch failure carrying the fetcher's message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            title: untitled(),
            content: String::new(),
            message: Some(message.into()),
        }
    }

    /// Parse the fetcher's JSON payload.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert the page body, or report why the fetch failed.
    pub fn markdown(&self, options: &ConvertOptions) -> Result<String> {
        if !self.success {
            let message = self
                .message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(UNKNOWN_ERROR);
            warn!(title = %self.title, reason = message, "page fetch failed");
            return Err(Error::PageFetch(message.to_string()));
        }
        Ok(convert_storage(&self.content, options))
    }

    /// Convert the page and package it according to `mode`.
    pub fn render(&self, options: &ConvertOptions, mode: OutputMode) -> Result<MarkdownOutput> {
        let markdown = self.markdown(options)?;
        Ok(match mode {
            OutputMode::Text => MarkdownOutput::Text(markdown),
            OutputMode::File => MarkdownOutput::File(MarkdownArtifact::new(&self.title, markdown)),
        })
    }
}

impl ToMarkdown for Page {
    fn to_markdown_with_options(&self, options: &ConvertOptions) -> Result<String> {
        self.markdown(options)
    }
}

/// How converted Markdown is handed back to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    #[default]
    Text,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkdownOutput {
    Text(String),
    File(MarkdownArtifact),
}

/// Markdown packaged as a named file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkdownArtifact {
    pub filename: String,
    pub original_filename: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl MarkdownArtifact {
    pub fn new(title: &str, markdown: String) -> Self {
        Self {
            filename: format!("{}.md", file_stem(title)),
            original_filename: title.to_string(),
            mime_type: MARKDOWN_MIME_TYPE.to_string(),
            data: Bytes::from(markdown),
        }
    }

    /// Write the artifact into `dir` and return the file's path.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.filename);
        fs::write(&path, &self.data)?;
        debug!(path = %path.display(), bytes = self.data.len(), "wrote markdown artifact");
        Ok(path)
    }
}

/// Title made safe for use as a single path component.
fn file_stem(title: &str) -> String {
    let stem: String = title
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if stem.is_empty() || stem == "." || stem == ".." {
        untitled()
    } else {
        stem
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_payload_defaults() {
        let page = Page::from_json(r#"{"success": true, "content": "<p>x</p>"}"#).unwrap();
        assert_eq!(page.title, "untitled");
        assert_eq!(page.message, None);
        assert_eq!(page.markdown(&ConvertOptions::default()).unwrap(), "x\n");
    }

    #[test]
    fn test_results_alias() {
        let page = Page::from_json(r#"{"success": true, "title": "T", "results": "<h2>R</h2>"}"#)
            .unwrap();
        assert_eq!(page.content, "<h2>R</h2>");
    }

    #[test]
    fn test_invalid_payload() {
        assert!(matches!(Page::from_json("{not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_failed_fetch() {
        let page = Page::failed("401 Unauthorized");
        match page.markdown(&ConvertOptions::default()) {
            Err(Error::PageFetch(message)) => assert_eq!(message, "401 Unauthorized"),
            other => panic!("expected fetch error, got {:?}", other),
        }

        let page = Page::from_json(r#"{"success": false}"#).unwrap();
        match page.to_markdown() {
            Err(Error::PageFetch(message)) => assert_eq!(message, "unknown error"),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[test]
    fn test_render_text() {
        let page = Page::new("Notes", "<p>hello</p>");
        let output = page.render(&ConvertOptions::default(), OutputMode::Text).unwrap();
        assert_eq!(output, MarkdownOutput::Text("hello\n".to_string()));
    }

    #[test]
    fn test_render_file_artifact() {
        let page = Page::new("Ops/Runbook", "<h1>Steps</h1>");
        let options = ConvertOptions::new().with_level_mark(true);
        let MarkdownOutput::File(artifact) = page.render(&options, OutputMode::File).unwrap() else {
            panic!("expected a file artifact");
        };
        assert_eq!(artifact.filename, "Ops_Runbook.md");
        assert_eq!(artifact.original_filename, "Ops/Runbook");
        assert_eq!(artifact.mime_type, "text/markdown");
        assert_eq!(&artifact.data[..], b"\n# L_1 Steps\n");
    }

    #[test]
    fn test_artifact_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = MarkdownArtifact::new("Design", "# D\n".to_string());
        let path = artifact.write_to(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("Design.md"));
        assert_eq!(fs::read_to_string(path).unwrap(), "# D\n");
    }

    #[test]
    fn test_output_mode_serde() {
        let mode: OutputMode = serde_json::from_str("\"file\"").unwrap();
        assert_eq!(mode, OutputMode::File);
        assert_eq!(OutputMode::default(), OutputMode::Text);
    }

    #[test]
    fn test_file_stem_fallback() {
        assert_eq!(file_stem("  "), "untitled");
        assert_eq!(file_stem(".."), "untitled");
        assert_eq!(file_stem("a\\b"), "a_b");
    }
}
