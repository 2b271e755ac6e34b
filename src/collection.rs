use std::path;

use anyhow::Context as _;

use crate::content::ContentItem;
use crate::error::*;
use crate::page::render_file;
use crate::params::SiteParams;
use crate::report::Report;
use crate::template::{Layout, Layouts};

/// Render and write every file matching `pattern`.
///
/// An item's `template` variable names a layout to use instead of
/// `default_layout`.  `dest_pattern` is a template rendered with the item's
/// variables, so `{{ slug }}` gives each item its own path.
///
/// Returns the items newest first; items with the same date keep the order
/// they were found in.
pub fn make_pages(
    pattern: &str,
    dest_pattern: &str,
    default_layout: Layout,
    params: &SiteParams,
    layouts: &Layouts,
    report: &mut Report,
) -> Result<Vec<ContentItem>> {
    let mut items = Vec::new();

    for source in makesite_core::expand_files(pattern, 0)? {
        let item = render_file(&source, params, layouts.liquid(), report)?;

        let output = match item.template() {
            Some(name) => layouts.render_custom(&name, item.params()),
            None => layouts.render(default_layout, item.params()),
        }
        .with_context(|| format!("Failed to render layout for {}", source.display()))?;

        let dest = layouts
            .liquid()
            .render_str(dest_pattern, item.params())
            .with_context(|| format!("Invalid destination `{dest_pattern}`"))?;
        let dest = path::PathBuf::from(dest);
        report.info(format_args!(
            "Rendering {} > {} ...",
            source.display(),
            dest.display()
        ));
        let written = makesite_core::write_file(&output, &dest)?;
        report.wrote(&dest, written);

        items.push(item);
    }

    items.sort_by_key(|item| std::cmp::Reverse(item.date()));
    Ok(items)
}
