//! Tokenizer for Confluence storage-format markup.
//!
//! Storage format is an XHTML dialect with `ac:`/`ri:` macro elements. The
//! [`StorageReader`] turns raw markup into a flat stream of [`StorageEvent`]s
//! that [`crate::markdown::StorageConverter`] consumes one at a time.
//!
//! ```
//! use confluence_markdown::storage::{StorageEvent, StorageReader};
//!
//! let events: Vec<StorageEvent> = StorageReader::new("<p>a &amp; b</p>")
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(events.len(), 5);
//! ```

mod event;
mod reader;

pub use event::{StartTag, StorageEvent};
pub use reader::StorageReader;
