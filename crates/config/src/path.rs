//! Deriving page metadata from content file names.

/// Date given to content whose file name has no date prefix.
pub const DEFAULT_DATE: &str = "1970-01-01";

static DATE_PREFIX_REF: once_cell::sync::Lazy<regex::Regex> = once_cell::sync::Lazy::new(|| {
    regex::Regex::new(r"^(?:(\d\d\d\d-\d\d-\d\d)-)?(.+)$").unwrap()
});

/// The part of a file name before its first `.`.
pub fn file_stem(file_name: &str) -> &str {
    file_name
        .split_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name)
}

/// Split a file stem into its date and slug.
///
/// `2023-05-01-hello` gives `("2023-05-01", "hello")`; a stem without a date
/// prefix gets [`DEFAULT_DATE`].  The date is only checked for shape, not for
/// being a real calendar day.  Returns `None` for an empty stem.
pub fn parse_file_stem(stem: &str) -> Option<(String, String)> {
    let caps = DATE_PREFIX_REF.captures(stem)?;
    let date = caps
        .get(1)
        .map(|m| m.as_str())
        .unwrap_or(DEFAULT_DATE)
        .to_owned();
    let slug = caps.get(2)?.as_str().to_owned();
    Some((date, slug))
}
