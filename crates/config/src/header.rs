use std::collections::BTreeMap;
use std::fmt;

const SENTINEL: &str = "---";

/// Metadata declared at the top of a content file.
///
/// ```text
/// ---
/// title: Hello
/// summary: A first post
/// ---
/// Body
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    values: BTreeMap<String, String>,
}

impl Header {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the header block at the start of `text`.
    ///
    /// Returns the header and the byte offset where the body starts (0 when
    /// `text` does not open with a header block).
    pub fn parse(text: &str) -> Result<(Self, usize), HeaderError> {
        let mut header = Self::new();

        let mut lines = text.split('\n');
        let opening = lines.next().unwrap_or_default();
        if opening.trim() != SENTINEL {
            return Ok((header, 0));
        }

        let mut end = opening.len() + 1;
        for line in lines {
            end += line.len() + 1;
            if line.trim() == SENTINEL {
                // The closing line may be the last one, without a newline.
                return Ok((header, end.min(text.len())));
            }
            if let Some((key, value)) = line.split_once(':') {
                header.insert(key, value);
            }
        }

        Err(HeaderError::Unclosed)
    }

    fn insert(&mut self, key: &str, value: &str) {
        let key = key.trim();
        if key.is_empty() {
            return;
        }
        self.values.insert(key.to_owned(), value.trim().to_owned());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Separate the header from the body of a content file.
pub fn split_header(text: &str) -> Result<(Header, &str), HeaderError> {
    let (header, end) = Header::parse(text)?;
    Ok((header, &text[end..]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderError {
    /// The opening `---` line has no matching closing line.
    Unclosed,
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unclosed => write!(f, "header block opened with `{SENTINEL}` is never closed"),
        }
    }
}

impl std::error::Error for HeaderError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_empty() {
        let (header, end) = Header::parse("").unwrap();
        assert!(header.is_empty());
        assert_eq!(end, 0);
    }

    #[test]
    fn parse_no_header() {
        let (header, end) = Header::parse("Body\n---\nkey: value\n---\n").unwrap();
        assert!(header.is_empty());
        assert_eq!(end, 0);
    }

    #[test]
    fn parse_header_and_body() {
        let text = "---\ntitle: Hello\nsummary: first post\n---\nBody";
        let (header, end) = Header::parse(text).unwrap();
        assert_eq!(header.get("title"), Some("Hello"));
        assert_eq!(header.get("summary"), Some("first post"));
        assert_eq!(&text[end..], "Body");
    }

    #[test]
    fn parse_trims_keys_values_and_sentinels() {
        let text = "  ---  \n  title :  Hello World  \n---\t\nBody";
        let (header, end) = Header::parse(text).unwrap();
        assert_eq!(header.get("title"), Some("Hello World"));
        assert_eq!(&text[end..], "Body");
    }

    #[test]
    fn parse_value_keeps_later_colons() {
        let (header, _) = Header::parse("---\nlink: https://example.com:8080/\n---\n").unwrap();
        assert_eq!(header.get("link"), Some("https://example.com:8080/"));
    }

    #[test]
    fn parse_duplicate_keys_overwrite() {
        let (header, _) = Header::parse("---\ntitle: one\ntitle: two\n---\n").unwrap();
        assert_eq!(header.get("title"), Some("two"));
        assert_eq!(header.len(), 1);
    }

    #[test]
    fn parse_skips_unrecognized_lines() {
        let (header, _) = Header::parse("---\njust text\n: no key\n\ntitle: ok\n---\n").unwrap();
        assert_eq!(header.iter().collect::<Vec<_>>(), [("title", "ok")]);
    }

    #[test]
    fn parse_empty_header() {
        let text = "---\n---\nBody";
        let (header, end) = Header::parse(text).unwrap();
        assert!(header.is_empty());
        assert_eq!(&text[end..], "Body");
    }

    #[test]
    fn parse_closing_sentinel_without_newline() {
        let text = "---\ntitle: Hello\n---";
        let (header, end) = Header::parse(text).unwrap();
        assert_eq!(header.get("title"), Some("Hello"));
        assert_eq!(end, text.len());
    }

    #[test]
    fn parse_crlf() {
        let text = "---\r\ntitle: Hello\r\n---\r\nBody\r\n";
        let (header, end) = Header::parse(text).unwrap();
        assert_eq!(header.get("title"), Some("Hello"));
        assert_eq!(&text[end..], "Body\r\n");
    }

    #[test]
    fn parse_offset_counts_bytes() {
        let text = "---\ntitle: Él señor\n---\nñ";
        let (header, end) = Header::parse(text).unwrap();
        assert_eq!(header.get("title"), Some("Él señor"));
        assert_eq!(&text[end..], "ñ");
    }

    #[test]
    fn parse_unclosed() {
        let err = Header::parse("---\ntitle: Hello\nBody").unwrap_err();
        assert_eq!(err, HeaderError::Unclosed);
        assert!(err.to_string().contains("never closed"));
    }

    #[test]
    fn parse_only_opening_sentinel() {
        assert_eq!(Header::parse("---").unwrap_err(), HeaderError::Unclosed);
    }

    #[test]
    fn reparse_remainder_finds_no_header() {
        let text = "---\ntitle: Hello\n---\n# Heading\n\nSome text: with a colon\n";
        let (_, body) = split_header(text).unwrap();
        let (header, end) = Header::parse(body).unwrap();
        assert!(header.is_empty());
        assert_eq!(end, 0);
    }
}
