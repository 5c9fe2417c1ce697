//! Code-macro language hints.

use once_cell::sync::Lazy;
use regex::Regex;

/// Fence language used when a code macro names none.
pub const DEFAULT_LANGUAGE: &str = "plaintext";

static LANGUAGE_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"language=(\w+)").expect("language pattern is valid"));

/// Extract the `language=<word>` hint from a macro-parameter string such as
/// `language=java|linenumbers=true`, falling back to [`DEFAULT_LANGUAGE`].
///
/// # Examples
///
/// ```
/// use confluence_markdown::markdown::extract_language;
/// assert_eq!(extract_language("language=java|linenumbers=true"), "java");
/// assert_eq!(extract_language("theme=Eclipse"), "plaintext");
/// ```
pub fn extract_language(parameters: &str) -> String {
    LANGUAGE_PARAM
        .captures(parameters)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| DEFAULT_LANGUAGE.to_string(), |m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_in_middle() {
        assert_eq!(extract_language("title=x|language=python|collapse=true"), "python");
    }

    #[test]
    fn test_first_match_wins() {
        assert_eq!(extract_language("language=sql|language=bash"), "sql");
    }

    #[test]
    fn test_empty_value_falls_back() {
        assert_eq!(extract_language("language=|theme=Midnight"), DEFAULT_LANGUAGE);
        assert_eq!(extract_language(""), DEFAULT_LANGUAGE);
    }

    #[test]
    fn test_word_stops_at_punctuation() {
        assert_eq!(extract_language("language=c++"), "c");
    }
}
