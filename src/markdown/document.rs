//! ToMarkdown implementation for raw storage-format bodies.

use super::config::ConvertOptions;
use super::converter::convert_storage;
use super::traits::ToMarkdown;
use crate::common::Result;

/// A page body in storage format, borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct StorageDocument<'a> {
    markup: &'a str,
}

impl<'a> StorageDocument<'a> {
    pub fn new(markup: &'a str) -> Self {
        Self { markup }
    }

    pub fn markup(&self) -> &'a str {
        self.markup
    }
}

impl ToMarkdown for StorageDocument<'_> {
    fn to_markdown_with_options(&self, options: &ConvertOptions) -> Result<String> {
        Ok(convert_storage(self.markup, options))
    }
}
