use std::path;

use anyhow::Context as _;
use makesite_config::path::{file_stem, parse_file_stem};

use crate::datetime::FormattedDates;
use crate::error::*;
use crate::params::SiteParams;
use crate::report::Report;

/// Number of words kept when a summary is derived from the content.
pub const SUMMARY_WORDS: usize = 25;

/// A content file and every variable its templates can see.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    source: path::PathBuf,
    params: SiteParams,
}

impl ContentItem {
    pub fn source(&self) -> &path::Path {
        &self.source
    }

    pub fn params(&self) -> &SiteParams {
        &self.params
    }

    pub fn slug(&self) -> String {
        self.params.get_str("slug").unwrap_or_default()
    }

    pub fn date(&self) -> String {
        self.params.get_str("date").unwrap_or_default()
    }

    pub fn content(&self) -> String {
        self.params.get_str("content").unwrap_or_default()
    }

    pub(crate) fn set_content(&mut self, content: String) {
        self.params.insert("content", liquid::model::Value::scalar(content));
    }

    /// The layout this item asks for instead of the default one.
    pub fn template(&self) -> Option<String> {
        self.params.get_non_empty("template")
    }

    pub fn description(&self) -> Option<String> {
        self.params.get_non_empty("description")
    }

    /// The `summary` variable, else `description`, else the first words of the
    /// content.
    pub fn summary(&self) -> String {
        self.params
            .get_non_empty("summary")
            .or_else(|| self.description())
            .unwrap_or_else(|| crate::index::truncate(&self.content(), SUMMARY_WORDS))
    }

    pub fn is_markdown(&self) -> bool {
        crate::mark::is_markdown_file(&self.source)
    }
}

/// Read a content file, layering its variables on top of `base`.
///
/// The file name gives `date` and `slug`, the header can override them and
/// the body becomes `content`.
pub fn read_content(
    source: &path::Path,
    base: &SiteParams,
    report: &mut Report,
) -> Result<ContentItem> {
    let text = makesite_core::read_file(source)?;

    let file_name = source
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let (date, slug) = parse_file_stem(file_stem(file_name))
        .ok_or_else(|| anyhow::format_err!("Cannot derive a slug from {}", source.display()))?;

    let (header, body) = makesite_config::split_header(&text)
        .with_context(|| format!("Unable to read contents from {}", source.display()))?;

    let mut params = base.clone();
    params.insert_str("date", &date);
    params.insert_str("slug", &slug);
    for (key, value) in header.iter() {
        params.insert(key.to_owned(), liquid::model::Value::scalar(value.to_owned()));
    }
    params.insert_str("content", body);

    let date = params.get_str("date").unwrap_or_default();
    let human_format = params.get_str("date_human_format").unwrap_or_default();
    let dates = FormattedDates::new(&date, &human_format, report);
    params.insert("short_date", liquid::model::Value::scalar(dates.short_date));
    params.insert("human_date", liquid::model::Value::scalar(dates.human_date));
    params.insert(
        "rfc_2822_date",
        liquid::model::Value::scalar(dates.rfc_2822_date),
    );

    Ok(ContentItem {
        source: source.to_owned(),
        params,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    fn write(dir: &path::Path, name: &str, text: &str) -> path::PathBuf {
        let file = dir.join(name);
        std::fs::write(&file, text).unwrap();
        file
    }

    #[test]
    fn read_dated_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(
            dir.path(),
            "2023-05-01-hello.md",
            "---\ntitle: Hello\n---\nBody text\n",
        );
        let mut report = Report::new();
        let item = read_content(&file, &SiteParams::defaults(2024), &mut report).unwrap();
        assert_eq!(item.slug(), "hello");
        assert_eq!(item.date(), "2023-05-01");
        assert_eq!(item.content(), "Body text\n");
        assert_eq!(item.params().get_str("title").as_deref(), Some("Hello"));
        assert_eq!(item.params().get_str("author").as_deref(), Some("Admin"));
        assert_eq!(item.params().get_str("short_date").as_deref(), Some("2023-05-01"));
        assert_eq!(item.params().get_str("human_date").as_deref(), Some("01 May, 2023"));
        assert_eq!(
            item.params().get_str("rfc_2822_date").as_deref(),
            Some("Mon, 01 May 2023 00:00:00 +0000")
        );
        assert!(item.is_markdown());
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn read_header_overrides_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(
            dir.path(),
            "2023-05-01-hello.html",
            "---\nslug: greeting\ndate: 2020-02-02\nauthor: Jane\n---\n<p>Hi</p>",
        );
        let mut report = Report::new();
        let item = read_content(&file, &SiteParams::defaults(2024), &mut report).unwrap();
        assert_eq!(item.slug(), "greeting");
        assert_eq!(item.date(), "2020-02-02");
        assert_eq!(item.params().get_str("author").as_deref(), Some("Jane"));
        assert_eq!(item.params().get_str("short_date").as_deref(), Some("2020-02-02"));
        assert!(!item.is_markdown());
    }

    #[test]
    fn read_undated_without_header() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "about.md", "Just text");
        let mut report = Report::new();
        let item = read_content(&file, &SiteParams::defaults(2024), &mut report).unwrap();
        assert_eq!(item.slug(), "about");
        assert_eq!(item.date(), "1970-01-01");
        assert_eq!(item.content(), "Just text");
        assert_eq!(item.params().get_str("human_date").as_deref(), Some("01 Jan, 1970"));
    }

    #[test]
    fn read_unparseable_date_warns() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "post.md", "---\ndate: someday\n---\n");
        let mut report = Report::new();
        let item = read_content(&file, &SiteParams::defaults(2024), &mut report).unwrap();
        assert_eq!(item.params().get_str("human_date").as_deref(), Some(""));
        assert_eq!(item.params().get_str("rfc_2822_date").as_deref(), Some(""));
        assert_eq!(report.warnings().len(), 1);
    }

    #[test]
    fn read_unclosed_header_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), "broken.md", "---\ntitle: Oops\nno end");
        let mut report = Report::new();
        let err = read_content(&file, &SiteParams::defaults(2024), &mut report).unwrap_err();
        assert!(format!("{err:#}").contains("broken.md"));
        assert!(err.downcast_ref::<makesite_config::HeaderError>().is_some());
    }

    #[test]
    fn read_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = Report::new();
        let result = read_content(
            &dir.path().join("missing.md"),
            &SiteParams::defaults(2024),
            &mut report,
        );
        assert!(result.is_err());
    }

    #[test]
    fn read_empty_stem_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = write(dir.path(), ".md", "text");
        let mut report = Report::new();
        assert!(read_content(&file, &SiteParams::defaults(2024), &mut report).is_err());
    }

    #[test]
    fn summary_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = Report::new();
        let base = SiteParams::defaults(2024);

        let file = write(dir.path(), "a.md", "---\nsummary: S\ndescription: D\n---\nC");
        let item = read_content(&file, &base, &mut report).unwrap();
        assert_eq!(item.summary(), "S");

        let file = write(dir.path(), "b.md", "---\ndescription: D\n---\nC");
        let item = read_content(&file, &base, &mut report).unwrap();
        assert_eq!(item.summary(), "D");

        let file = write(dir.path(), "c.md", "<p>Some \"quoted\"\ncontent</p>");
        let item = read_content(&file, &base, &mut report).unwrap();
        assert_eq!(item.summary(), "Some 'quoted' content");
    }
}
