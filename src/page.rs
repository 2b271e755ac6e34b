use std::path;

use anyhow::Context as _;

use crate::content::{ContentItem, read_content};
use crate::error::*;
use crate::params::SiteParams;
use crate::report::Report;
use crate::template::Liquid;

/// Render the first file matching `pattern`.
///
/// Returns `None` when nothing matches, as for an optional `_index` file.
pub fn render_page(
    pattern: &str,
    params: &SiteParams,
    liquid: &Liquid,
    report: &mut Report,
) -> Result<Option<ContentItem>> {
    let Some(source) = makesite_core::expand_files(pattern, 1)?.into_iter().next() else {
        report.info(format_args!("No files match pattern {pattern}"));
        return Ok(None);
    };
    render_file(&source, params, liquid, report).map(Some)
}

/// Read `source` and render its body: template variables first, then Markdown.
pub fn render_file(
    source: &path::Path,
    params: &SiteParams,
    liquid: &Liquid,
    report: &mut Report,
) -> Result<ContentItem> {
    let mut item = read_content(source, params, report)?;

    let content = liquid
        .render_str(&item.content(), item.params())
        .with_context(|| format!("Failed to render {}", source.display()))?;
    let content = if item.is_markdown() {
        crate::mark::to_html(&content)
            .with_context(|| format!("Cannot render Markdown in {}", source.display()))?
    } else {
        content
    };
    item.set_content(content);

    Ok(item)
}
