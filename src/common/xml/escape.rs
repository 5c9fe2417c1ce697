//! Entity handling for storage-format text.

use std::borrow::Cow;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Decode HTML5 named and numeric entities in `s`.
///
/// Storage markup is XHTML with the full HTML entity set (`&nbsp;`,
/// `&rsquo;`, ...), not just the five XML entities. Unknown or malformed
/// entities are left unchanged.
///
/// # Examples
///
/// ```
/// use confluence_markdown::common::xml::decode_entities;
/// assert_eq!(decode_entities("a &amp; b"), "a & b");
/// assert_eq!(decode_entities("&lt;tag&gt;"), "<tag>");
/// assert_eq!(decode_entities("&#65;&#x42;"), "AB");
/// assert_eq!(decode_entities("&invalid;"), "&invalid;");
/// ```
#[inline]
pub fn decode_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    html_escape::decode_html_entities(s)
}

/// Decode a single reference as reported by the tokenizer, i.e. the text
/// between `&` and `;` (`amp`, `nbsp`, `#60`, `#x3C`).
///
/// Unknown references are returned in their literal `&name;` form.
///
/// # Examples
///
/// ```
/// use confluence_markdown::common::xml::decode_reference;
/// assert_eq!(decode_reference("amp"), "&");
/// assert_eq!(decode_reference("nbsp"), "\u{a0}");
/// assert_eq!(decode_reference("#x41"), "A");
/// assert_eq!(decode_reference("bogus"), "&bogus;");
/// ```
pub fn decode_reference(name: &str) -> String {
    let literal = format!("&{};", name);
    html_escape::decode_html_entities(&literal).into_owned()
}

/// Rewrite every `&` that does not begin a reference (`&name;`, `&#60;`,
/// `&#x3C;`) as `&amp;`.
///
/// HTML treats a lone `&` as literal text while an XML reader rejects it.
/// CDATA sections are copied unchanged.
///
/// # Examples
///
/// ```
/// use confluence_markdown::common::xml::escape_bare_ampersands;
/// assert_eq!(escape_bare_ampersands("a & b &amp; c"), "a &amp; b &amp; c");
/// assert_eq!(escape_bare_ampersands("<![CDATA[x && y]]>"), "<![CDATA[x && y]]>");
/// ```
pub fn escape_bare_ampersands(markup: &str) -> Cow<'_, str> {
    if !markup.contains('&') {
        return Cow::Borrowed(markup);
    }

    let mut out = String::with_capacity(markup.len() + 16);
    let mut changed = false;
    let mut rest = markup;
    while let Some(pos) = rest.find(['&', '<']) {
        let (head, tail) = rest.split_at(pos);
        out.push_str(head);
        if tail.starts_with(CDATA_OPEN) {
            let end = tail
                .find(CDATA_CLOSE)
                .map_or(tail.len(), |i| i + CDATA_CLOSE.len());
            out.push_str(&tail[..end]);
            rest = &tail[end..];
        } else if let Some(after) = tail.strip_prefix('&') {
            if starts_reference(after) {
                out.push('&');
            } else {
                out.push_str("&amp;");
                changed = true;
            }
            rest = after;
        } else {
            out.push('<');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(markup)
    }
}

/// Whether `s` (the text after an `&`) starts with `name;`, `#digits;` or
/// `#xhex;`.
fn starts_reference(s: &str) -> bool {
    let len = s
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || *b == b'#')
        .count();
    let (name, after) = s.split_at(len);
    if !after.starts_with(';') {
        return false;
    }

    match name.strip_prefix('#') {
        Some(number) => match number.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.bytes().all(|b| b.is_ascii_hexdigit()),
            None => !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit()),
        },
        None => {
            name.bytes().next().is_some_and(|b| b.is_ascii_alphabetic())
                && name.bytes().all(|b| b.is_ascii_alphanumeric())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(decode_entities("no entities"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_typographic_entities() {
        assert_eq!(decode_entities("it&rsquo;s &mdash; ok"), "it\u{2019}s \u{2014} ok");
    }

    #[test]
    fn test_references_kept() {
        let markup = "&amp; &nbsp; &#60; &#x3c; &rsquo;";
        assert!(matches!(escape_bare_ampersands(markup), Cow::Borrowed(_)));
    }

    #[test]
    fn test_lone_ampersands_escaped() {
        assert_eq!(escape_bare_ampersands("R&D"), "R&amp;D");
        assert_eq!(escape_bare_ampersands("a &"), "a &amp;");
        assert_eq!(escape_bare_ampersands("&# x; &#xZ; &1a;"), "&amp;# x; &amp;#xZ; &amp;1a;");
        assert_eq!(
            escape_bare_ampersands("<a href=\"?a=1&b=2\">"),
            "<a href=\"?a=1&amp;b=2\">"
        );
    }

    #[test]
    fn test_cdata_untouched() {
        let markup = "<p>&</p><![CDATA[if a && b]]><p>&</p>";
        assert_eq!(
            escape_bare_ampersands(markup),
            "<p>&amp;</p><![CDATA[if a && b]]><p>&amp;</p>"
        );
        assert_eq!(escape_bare_ampersands("<![CDATA[& unterminated"), "<![CDATA[& unterminated");
    }

    #[test]
    fn test_bare_ampersand() {
        assert_eq!(decode_entities("a & b"), "a & b");
    }
}
