//! Configuration types for storage-format conversion.
//!
//! This module defines the options that customize the Markdown produced
//! by [`super::StorageConverter`].

use serde::Deserialize;

/// Default prefix for heading level marks.
pub const DEFAULT_MARK_PREFIX: &str = "L_";

/// Configuration options for Markdown conversion.
///
/// The options deserialize from tool parameters, so a payload such as
/// `{"add_level_mark": true}` maps directly onto this struct with the
/// remaining fields defaulted.
///
/// # Examples
///
/// ```rust
/// use confluence_markdown::markdown::ConvertOptions;
///
/// // Create with defaults
/// let options = ConvertOptions::default();
/// assert!(!options.add_level_mark);
///
/// // Or customize
/// let options = ConvertOptions::new()
///     .with_level_mark(true)
///     .with_mark_prefix("H");
/// assert_eq!(options.heading_mark(2).as_deref(), Some("H2"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Whether heading lines carry a level mark after the `#` markers
    pub add_level_mark: bool,
    /// Prefix placed before the level number in the mark
    pub mark_prefix: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            add_level_mark: false,
            mark_prefix: DEFAULT_MARK_PREFIX.to_string(),
        }
    }
}

impl ConvertOptions {
    /// Create a new `ConvertOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether headings get a level mark (`## L_2 Title`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confluence_markdown::markdown::ConvertOptions;
    ///
    /// let options = ConvertOptions::new().with_level_mark(true);
    /// assert!(options.add_level_mark);
    /// ```
    #[inline]
    pub fn with_level_mark(mut self, enabled: bool) -> Self {
        self.add_level_mark = enabled;
        self
    }

    /// Set the prefix used in heading level marks.
    #[inline]
    pub fn with_mark_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.mark_prefix = prefix.into();
        self
    }

    /// The mark inserted after the `#` markers of a level-`level` heading,
    /// or `None` when marks are disabled.
    pub fn heading_mark(&self, level: u8) -> Option<String> {
        self.add_level_mark
            .then(|| format!("{}{}", self.mark_prefix, level))
    }
}
