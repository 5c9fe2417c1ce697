//! Owned tokenizer events.

/// A start tag with its (lowercased) name and decoded attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StartTag {
    pub name: String,
    pub attributes: Vec<(String, String)>,
}

impl StartTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Value of the first attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// One tokenizer event, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageEvent {
    /// `<name attr="...">`, also emitted for the opening half of `<name/>`
    Start(StartTag),
    /// `</name>`
    End(String),
    /// Character data. Entity references arrive as their own events.
    Text(String),
    /// Content of an unparsed `<![CDATA[...]]>` declaration
    CData(String),
}

impl StorageEvent {
    pub fn start(name: &str, attributes: &[(&str, &str)]) -> Self {
        let tag = attributes
            .iter()
            .fold(StartTag::new(name), |tag, (k, v)| tag.with_attribute(*k, *v));
        StorageEvent::Start(tag)
    }

    pub fn end(name: &str) -> Self {
        StorageEvent::End(name.to_string())
    }

    pub fn text(text: &str) -> Self {
        StorageEvent::Text(text.to_string())
    }

    pub fn cdata(text: &str) -> Self {
        StorageEvent::CData(text.to_string())
    }
}
