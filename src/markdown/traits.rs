//! Core trait for Markdown conversion.
//!
//! This module defines the `ToMarkdown` trait implemented by everything that
//! carries storage-format markup.

use super::config::ConvertOptions;
use crate::common::Result;

/// Core trait for types that can be converted to Markdown.
///
/// # Examples
///
/// ```rust
/// use confluence_markdown::markdown::{StorageDocument, ToMarkdown};
///
/// # fn main() -> Result<(), confluence_markdown::Error> {
/// let doc = StorageDocument::new("<h1>Release notes</h1>");
/// assert_eq!(doc.to_markdown()?, "\n# Release notes\n");
/// # Ok(())
/// # }
/// ```
pub trait ToMarkdown {
    /// Convert this item to Markdown with default options.
    fn to_markdown(&self) -> Result<String> {
        self.to_markdown_with_options(&ConvertOptions::default())
    }

    /// Convert this item to Markdown with custom options.
    ///
    /// # Arguments
    ///
    /// * `options` - Configuration for the conversion
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confluence_markdown::markdown::{ConvertOptions, StorageDocument, ToMarkdown};
    ///
    /// # fn main() -> Result<(), confluence_markdown::Error> {
    /// let doc = StorageDocument::new("<h3>Setup</h3>");
    /// let options = ConvertOptions::new().with_level_mark(true);
    /// assert_eq!(doc.to_markdown_with_options(&options)?, "\n### L_3 Setup\n");
    /// # Ok(())
    /// # }
    /// ```
    fn to_markdown_with_options(&self, options: &ConvertOptions) -> Result<String>;
}
