use std::borrow::Cow;
use std::fmt;
use std::path;

use anyhow::Context as _;
use liquid_core::model::{DisplayCow, KStringCow, ObjectView, State, ValueView};

use crate::error::*;
use crate::params::SiteParams;

/// The layouts every site provides.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layout {
    Page,
    Post,
    List,
    Item,
    Feed,
    FeedItem,
}

impl Layout {
    pub const ALL: [Layout; 6] = [
        Layout::Page,
        Layout::Post,
        Layout::List,
        Layout::Item,
        Layout::Feed,
        Layout::FeedItem,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Layout::Page => "page.html",
            Layout::Post => "post.html",
            Layout::List => "list.html",
            Layout::Item => "item.html",
            Layout::Feed => "feed.xml",
            Layout::FeedItem => "item.xml",
        }
    }
}

pub struct Liquid {
    parser: liquid::Parser,
}

impl Liquid {
    pub fn new() -> Result<Self> {
        let parser = liquid::ParserBuilder::with_stdlib()
            .filter(liquid_lib::extra::DateInTz)
            .filter(liquid_lib::shopify::Pluralize)
            .filter(liquid_lib::jekyll::Slugify)
            .filter(liquid_lib::jekyll::Pop)
            .filter(liquid_lib::jekyll::Push)
            .filter(liquid_lib::jekyll::Shift)
            .filter(liquid_lib::jekyll::Unshift)
            .filter(liquid_lib::jekyll::ArrayToSentenceString)
            .build()?;
        Ok(Self { parser })
    }

    pub fn parse(&self, template: &str) -> Result<liquid::Template> {
        let template = self.parser.parse(template)?;
        Ok(template)
    }

    /// Render template text that has not been parsed yet, such as a content body
    /// or a destination path.
    pub fn render_str(&self, template: &str, params: &SiteParams) -> Result<String> {
        let template = self.parse(template)?;
        render(&template, params)
    }
}

impl fmt::Debug for Liquid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Liquid{{}}")
    }
}

/// Render `template` against `params`.
///
/// Variables missing from `params` render as nil instead of failing.
pub fn render(template: &liquid::Template, params: &SiteParams) -> Result<String> {
    let globals = LenientGlobals(params.as_object());
    let output = template.render(&globals)?;
    Ok(output)
}

/// Variables holding rendered markup, passed to layouts unescaped.
const RAW_VARIABLES: &[&str] = &["content", "front_content"];

/// Whether values are HTML-escaped when rendered through the layout `name`.
pub fn is_autoescaped(name: &str) -> bool {
    path::Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| matches!(ext, "html" | "htm" | "xml"))
        .unwrap_or(false)
}

/// Render the layout file `name`, escaping text values for HTML and XML
/// layouts.
pub fn render_layout(
    template: &liquid::Template,
    name: &str,
    params: &SiteParams,
) -> Result<String> {
    if !is_autoescaped(name) {
        return render(template, params);
    }
    let mut escaped = SiteParams::new();
    for (key, value) in params.as_object().iter() {
        let value = if RAW_VARIABLES.contains(&key.as_str()) {
            value.clone()
        } else {
            escape_value(value)
        };
        escaped.insert(key.clone(), value);
    }
    render(template, &escaped)
}

fn escape_value(value: &liquid::model::Value) -> liquid::model::Value {
    match value {
        liquid::model::Value::Scalar(scalar) => {
            let text = scalar.to_kstr();
            match html_escape(text.as_str()) {
                Cow::Borrowed(_) => value.clone(),
                Cow::Owned(escaped) => liquid::model::Value::scalar(escaped),
            }
        }
        liquid::model::Value::Array(items) => {
            liquid::model::Value::Array(items.iter().map(escape_value).collect())
        }
        liquid::model::Value::Object(object) => {
            let mut escaped = liquid::Object::new();
            for (key, value) in object.iter() {
                escaped.insert(key.clone(), escape_value(value));
            }
            liquid::model::Value::Object(escaped)
        }
        _ => value.clone(),
    }
}

fn html_escape(input: &str) -> Cow<'_, str> {
    if !input.contains(['<', '>', '&', '"', '\'']) {
        return Cow::Borrowed(input);
    }
    let mut result = String::with_capacity(input.len() + 8);
    for c in input.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            c => result.push(c),
        }
    }
    Cow::Owned(result)
}

/// The site's layouts, parsed once per build.
pub struct Layouts {
    dir: path::PathBuf,
    liquid: Liquid,
    page: liquid::Template,
    post: liquid::Template,
    list: liquid::Template,
    item: liquid::Template,
    feed: liquid::Template,
    feed_item: liquid::Template,
}

impl Layouts {
    /// Parse the layouts in `dir`; each one is required.
    pub fn load<P: Into<path::PathBuf>>(dir: P) -> Result<Self> {
        Self::load_internal(dir.into())
    }

    fn load_internal(dir: path::PathBuf) -> Result<Self> {
        let liquid = Liquid::new()?;
        let load = |layout: Layout| load_layout(&liquid, &dir, layout.file_name());
        let page = load(Layout::Page)?;
        let post = load(Layout::Post)?;
        let list = load(Layout::List)?;
        let item = load(Layout::Item)?;
        let feed = load(Layout::Feed)?;
        let feed_item = load(Layout::FeedItem)?;
        Ok(Self {
            dir,
            liquid,
            page,
            post,
            list,
            item,
            feed,
            feed_item,
        })
    }

    pub fn dir(&self) -> &path::Path {
        &self.dir
    }

    pub fn liquid(&self) -> &Liquid {
        &self.liquid
    }

    pub fn get(&self, layout: Layout) -> &liquid::Template {
        match layout {
            Layout::Page => &self.page,
            Layout::Post => &self.post,
            Layout::List => &self.list,
            Layout::Item => &self.item,
            Layout::Feed => &self.feed,
            Layout::FeedItem => &self.feed_item,
        }
    }

    /// Load a layout named by a content item, from the layout directory.
    pub fn custom(&self, name: &str) -> Result<liquid::Template> {
        load_layout(&self.liquid, &self.dir, name)
    }

    pub fn render(&self, layout: Layout, params: &SiteParams) -> Result<String> {
        render_layout(self.get(layout), layout.file_name(), params)
    }

    pub fn render_custom(&self, name: &str, params: &SiteParams) -> Result<String> {
        let template = self.custom(name)?;
        render_layout(&template, name, params)
    }
}

impl fmt::Debug for Layouts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layouts")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

fn load_layout(liquid: &Liquid, dir: &path::Path, name: &str) -> Result<liquid::Template> {
    let layout_path = dir.join(name);
    log::trace!("Loading layout {}", layout_path.display());
    let content = makesite_core::read_file(&layout_path)
        .with_context(|| format!("Layout `{name}` is missing"))?;
    liquid
        .parse(&content)
        .with_context(|| format!("Failed to parse layout {}", layout_path.display()))
}

static NIL: liquid::model::Value = liquid::model::Value::Nil;

/// Exposes a parameter mapping to Liquid, resolving unknown top-level names to
/// nil.
#[derive(Debug)]
struct LenientGlobals<'o>(&'o liquid::Object);

impl ValueView for LenientGlobals<'_> {
    fn as_debug(&self) -> &dyn fmt::Debug {
        self
    }

    fn render(&self) -> DisplayCow<'_> {
        self.0.render()
    }

    fn source(&self) -> DisplayCow<'_> {
        self.0.source()
    }

    fn type_name(&self) -> &'static str {
        self.0.type_name()
    }

    fn query_state(&self, state: State) -> bool {
        self.0.query_state(state)
    }

    fn to_kstr(&self) -> KStringCow<'_> {
        self.0.to_kstr()
    }

    fn to_value(&self) -> liquid::model::Value {
        self.0.to_value()
    }

    fn as_object(&self) -> Option<&dyn ObjectView> {
        Some(self)
    }
}

impl ObjectView for LenientGlobals<'_> {
    fn as_value(&self) -> &dyn ValueView {
        self
    }

    fn size(&self) -> i64 {
        ObjectView::size(self.0)
    }

    fn keys<'k>(&'k self) -> Box<dyn Iterator<Item = KStringCow<'k>> + 'k> {
        ObjectView::keys(self.0)
    }

    fn values<'k>(&'k self) -> Box<dyn Iterator<Item = &'k dyn ValueView> + 'k> {
        ObjectView::values(self.0)
    }

    fn iter<'k>(&'k self) -> Box<dyn Iterator<Item = (KStringCow<'k>, &'k dyn ValueView)> + 'k> {
        ObjectView::iter(self.0)
    }

    fn contains_key(&self, _index: &str) -> bool {
        true
    }

    fn get<'s>(&'s self, index: &str) -> Option<&'s dyn ValueView> {
        ObjectView::get(self.0, index).or(Some(&NIL as &dyn ValueView))
    }
}
