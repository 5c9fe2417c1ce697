//! Lenient quick-xml driver producing [`StorageEvent`]s.

use std::borrow::Cow;
use std::io::Cursor;

use crate::common::xml::{decode_entities, decode_reference, escape_bare_ampersands};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::event::{StartTag, StorageEvent};

/// Lenient pull tokenizer over storage-format markup.
///
/// End-tag names are not checked against their start tags and stray end
/// tags are passed through, so HTML-ish input (`<br>` without a close)
/// still tokenizes. A lone `&` is read as literal text. Any other syntax
/// error is yielded once and ends the stream.
pub struct StorageReader<'a> {
    reader: Reader<Cursor<Cow<'a, [u8]>>>,
    buf: Vec<u8>,
    /// End half of a self-closing element, emitted on the next call
    pending_end: Option<String>,
    done: bool,
}

impl<'a> StorageReader<'a> {
    pub fn new(markup: &'a str) -> Self {
        let source = match escape_bare_ampersands(markup) {
            Cow::Borrowed(text) => Cow::Borrowed(text.as_bytes()),
            Cow::Owned(text) => Cow::Owned(text.into_bytes()),
        };
        let mut reader = Reader::from_reader(Cursor::new(source));
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;

        Self {
            reader,
            buf: Vec::new(),
            pending_end: None,
            done: false,
        }
    }

    fn read_next(&mut self) -> Result<Option<StorageEvent>> {
        loop {
            self.buf.clear();
            let position = self.reader.buffer_position() as u64;
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(e) => return Err(Error::xml(position, e)),
            };

            match event {
                Event::Start(ref e) => return Ok(Some(StorageEvent::Start(start_tag(e)))),
                Event::Empty(ref e) => {
                    let tag = start_tag(e);
                    self.pending_end = Some(tag.name.clone());
                    return Ok(Some(StorageEvent::Start(tag)));
                },
                Event::End(ref e) => {
                    let name = lowercase_name(e.name().as_ref());
                    return Ok(Some(StorageEvent::End(name)));
                },
                Event::Text(ref t) => {
                    let text = String::from_utf8_lossy(t);
                    if text.is_empty() {
                        continue;
                    }
                    return Ok(Some(StorageEvent::Text(text.into_owned())));
                },
                Event::GeneralRef(ref r) => {
                    let name = String::from_utf8_lossy(r);
                    return Ok(Some(StorageEvent::Text(decode_reference(&name))));
                },
                Event::CData(ref c) => {
                    let text = String::from_utf8_lossy(c);
                    return Ok(Some(StorageEvent::CData(text.into_owned())));
                },
                Event::Eof => return Ok(None),
                // Comments, declarations, processing instructions, doctype
                _ => continue,
            }
        }
    }
}

impl Iterator for StorageReader<'_> {
    type Item = Result<StorageEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(name) = self.pending_end.take() {
            return Some(Ok(StorageEvent::End(name)));
        }
        if self.done {
            return None;
        }

        match self.read_next() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => {
                self.done = true;
                None
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            },
        }
    }
}

fn lowercase_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn start_tag(e: &BytesStart) -> StartTag {
    let mut tag = StartTag::new(lowercase_name(e.name().as_ref()));
    for attr in e.html_attributes().with_checks(false).flatten() {
        let key = lowercase_name(attr.key.as_ref());
        let raw = String::from_utf8_lossy(&attr.value);
        let value = decode_entities(&raw).into_owned();
        tag.attributes.push((key, value));
    }
    tag
}
