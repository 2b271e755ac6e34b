use std::io;
use std::io::Write as _;
use std::path;
use std::process;

use anyhow::Context as _;
use pulldown_cmark as cmark;
use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd};

use crate::error::*;

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "mkd", "mkdn", "mdown", "markdown"];

/// Graphviz layout programs accepted as the language of a fenced code block.
const DIAGRAM_ENGINES: &[&str] = &["dot", "neato", "fdp", "sfdp", "twopi", "circo"];

pub fn is_markdown_file(path: &path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| MARKDOWN_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Convert Markdown to HTML.
///
/// Fenced code blocks tagged with a Graphviz engine (`dot`, `neato`, ...) are
/// replaced by the SVG that engine draws for them.
pub fn to_html(content: &str) -> Result<String> {
    to_html_with(content, Diagram::render)
}

fn to_html_with<R>(content: &str, render_diagram: R) -> Result<String>
where
    R: FnMut(&Diagram) -> Result<String>,
{
    let mut buf = String::new();
    let options = cmark::Options::ENABLE_STRIKETHROUGH | cmark::Options::ENABLE_TASKLISTS;
    let parser = cmark::Parser::new_ext(content, options);
    cmark::html::push_html(&mut buf, decorate_markdown(parser, render_diagram)?.into_iter());
    Ok(buf)
}

fn decorate_markdown<R>(parser: cmark::Parser<'_>, mut render_diagram: R) -> Result<Vec<Event<'_>>>
where
    R: FnMut(&Diagram) -> Result<String>,
{
    let mut events = Vec::new();
    let mut diagram: Option<Diagram> = None;
    for event in parser {
        if let Some(current) = diagram.as_mut() {
            match event {
                Event::Text(text) => current.source.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    let svg = render_diagram(current)?;
                    events.push(Event::Html(svg.into()));
                    diagram = None;
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                match Diagram::from_info(&info) {
                    Some(started) => diagram = Some(started),
                    None => events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))),
                }
            }
            event => events.push(event),
        }
    }
    Ok(events)
}

#[derive(Debug)]
struct Diagram {
    engine: &'static str,
    source: String,
}

impl Diagram {
    fn from_info(info: &str) -> Option<Self> {
        let lang = info.split_whitespace().next()?;
        let engine = DIAGRAM_ENGINES.iter().copied().find(|e| *e == lang)?;
        Some(Self {
            engine,
            source: String::new(),
        })
    }

    fn render(&self) -> Result<String> {
        let mut command = process::Command::new(self.engine);
        command.arg("-Tsvg");
        self.render_with(command)
    }

    fn render_with(&self, mut command: process::Command) -> Result<String> {
        log::trace!("Rendering {} diagram", self.engine);
        let mut child = command
            .stdin(process::Stdio::piped())
            .stdout(process::Stdio::piped())
            .stderr(process::Stdio::piped())
            .spawn()
            .with_context(|| format!("Could not run `{}` to render a diagram", self.engine))?;

        // The engine may fill its output pipes before it has read all of stdin.
        let stdin = child.stdin.take();
        let (output, sent) = std::thread::scope(|scope| {
            let writer = stdin.map(|mut stdin| {
                scope.spawn(move || stdin.write_all(self.source.as_bytes()))
            });
            let output = child.wait_with_output();
            let sent = match writer.map(|writer| writer.join()) {
                Some(Ok(sent)) => sent,
                Some(Err(_)) => Err(io::Error::other("writer thread panicked")),
                None => Ok(()),
            };
            (output, sent)
        });

        let output = output.with_context(|| format!("`{}` did not finish", self.engine))?;
        if !output.status.success() {
            anyhow::bail!(
                "`{} -Tsvg` failed: {}",
                self.engine,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        sent.with_context(|| format!("Could not send a diagram to `{}`", self.engine))?;
        let svg = String::from_utf8(output.stdout)
            .with_context(|| format!("`{}` produced invalid UTF-8", self.engine))?;
        Ok(svg)
    }
}
