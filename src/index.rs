use std::path;

use anyhow::Context as _;
use itertools::Itertools as _;

use crate::content::ContentItem;
use crate::error::*;
use crate::params::SiteParams;
use crate::report::Report;
use crate::template::{Layout, Layouts};

static TAG_RE: once_cell::sync::Lazy<regex::Regex> =
    once_cell::sync::Lazy::new(|| regex::Regex::new(r"(?s)<.*?>").unwrap());

/// Strip tags and keep the first `words` words of `text`.
///
/// Double quotes become single quotes so the result can sit inside an HTML
/// attribute.
pub fn truncate(text: &str, words: usize) -> String {
    let clean = text.replace('"', "'").replace('\n', " ");
    TAG_RE
        .replace_all(&clean, " ")
        .split_whitespace()
        .take(words)
        .join(" ")
}

/// The pair of layouts an index is built from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndexLayouts {
    /// Wraps the whole listing.
    pub list: Layout,
    /// Rendered once per item.
    pub item: Layout,
}

impl IndexLayouts {
    pub const HTML: IndexLayouts = IndexLayouts {
        list: Layout::List,
        item: Layout::Item,
    };
    pub const FEED: IndexLayouts = IndexLayouts {
        list: Layout::Feed,
        item: Layout::FeedItem,
    };
}

/// Write a listing of `items`, such as a collection's index page or feed.
///
/// Each item is rendered with `params` overlaid by its own variables plus
/// `summary`.  The list layout then receives `params` plus `content` (the
/// rendered items, in order) and `front_content` when `front` is given.
pub fn make_index(
    front: Option<&ContentItem>,
    items: &[ContentItem],
    dest_pattern: &str,
    index_layouts: IndexLayouts,
    params: &SiteParams,
    layouts: &Layouts,
    report: &mut Report,
) -> Result<path::PathBuf> {
    let mut rendered = String::new();
    for item in items {
        let mut item_params = params.layer(item.params());
        item_params.insert_str("summary", &item.summary());
        let output = layouts.render(index_layouts.item, &item_params).with_context(|| {
            format!(
                "Failed to render `{}` for {}",
                index_layouts.item.file_name(),
                item.source().display()
            )
        })?;
        rendered.push_str(&output);
    }

    let mut list_params = params.clone();
    if let Some(front) = front {
        list_params.insert_str("front_content", &front.content());
    }
    list_params.insert("content", liquid::model::Value::scalar(rendered));
    let output = layouts
        .render(index_layouts.list, &list_params)
        .with_context(|| format!("Failed to render `{}`", index_layouts.list.file_name()))?;

    let dest = layouts
        .liquid()
        .render_str(dest_pattern, &list_params)
        .with_context(|| format!("Invalid destination `{dest_pattern}`"))?;
    let dest = path::PathBuf::from(dest);
    report.info(format_args!("Rendering {} items ...", items.len()));
    let written = makesite_core::write_file(&output, &dest)?;
    report.wrote(&dest, written);

    Ok(dest)
}
