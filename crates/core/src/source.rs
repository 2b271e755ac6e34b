use std::path;

use anyhow::Context as _;

use crate::Result;

/// Expand a file pattern into the existing files it names.
///
/// Brace groups are expanded first (see [`expand_braces`]); each alternative is
/// then matched with [`FilePattern`].  Alternatives keep their expansion order
/// and files within one alternative are sorted by name.  `max_results == 0`
/// means no limit.
pub fn expand_files(pattern: &str, max_results: usize) -> Result<Vec<path::PathBuf>> {
    let mut files = Vec::new();
    for alternative in expand_braces(pattern) {
        let source = FilePattern::new(&alternative)?;
        files.extend(source.iter());
        if max_results != 0 && max_results <= files.len() {
            files.truncate(max_results);
            break;
        }
    }
    Ok(files)
}

/// Shell-style brace expansion.
///
/// `post.{md,html}` becomes `post.md`, `post.html`.  Groups nest and expand
/// left to right; a brace pair without a top-level comma is kept literally.
pub fn expand_braces(pattern: &str) -> Vec<String> {
    let Some((open, close)) = find_brace_group(pattern) else {
        return vec![pattern.to_owned()];
    };

    let prefix = &pattern[..open];
    let suffixes = expand_braces(&pattern[close + 1..]);
    split_alternatives(&pattern[open + 1..close])
        .into_iter()
        .flat_map(expand_braces)
        .flat_map(|alt| {
            suffixes
                .iter()
                .map(move |suffix| format!("{prefix}{alt}{suffix}"))
        })
        .collect()
}

/// Byte offsets of the first `{`..`}` pair holding a top-level comma.
fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
    let bytes = pattern.as_bytes();
    for (open, _) in bytes.iter().enumerate().filter(|(_, b)| **b == b'{') {
        let mut depth = 0;
        let mut has_comma = false;
        for (i, b) in bytes.iter().enumerate().skip(open) {
            match b {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        if has_comma {
                            return Some((open, i));
                        }
                        break;
                    }
                }
                b',' if depth == 1 => has_comma = true,
                _ => {}
            }
        }
    }
    None
}

fn split_alternatives(body: &str) -> Vec<&str> {
    let mut alternatives = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in body.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                alternatives.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    alternatives.push(&body[start..]);
    alternatives
}

/// A brace-free pattern: a literal directory plus a glob over the names of the
/// files directly inside it.
///
/// The glob supports `*`, `?`, `[abc]` and `[!abc]`.  Names starting with `.`
/// only match globs that start with `.`.
#[derive(Debug, Clone)]
pub struct FilePattern {
    root: path::PathBuf,
    glob: String,
    matcher: ignore::gitignore::Gitignore,
}

impl FilePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern_path = path::Path::new(pattern);
        let glob = pattern_path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::format_err!("Pattern `{pattern}` does not name files"))?
            .to_owned();
        let root = match pattern_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_owned(),
            _ => path::PathBuf::from("."),
        };

        // `!` and `#` are special at the start of an ignore line.
        let line = if glob.starts_with('!') || glob.starts_with('#') {
            format!("\\{glob}")
        } else {
            glob.clone()
        };
        let mut builder = ignore::gitignore::GitignoreBuilder::new(&root);
        builder
            .add_line(None, &line)
            .with_context(|| format!("Invalid pattern `{pattern}`"))?;
        let matcher = builder
            .build()
            .with_context(|| format!("Invalid pattern `{pattern}`"))?;

        Ok(Self {
            root,
            glob,
            matcher,
        })
    }

    pub fn root(&self) -> &path::Path {
        &self.root
    }

    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// Matching files, sorted by name.  A missing directory matches nothing.
    pub fn iter(&self) -> impl Iterator<Item = path::PathBuf> + '_ {
        walkdir::WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(move |e| self.includes_file(e.path()))
            .map(|e| e.into_path())
    }

    pub fn includes_file(&self, file: &path::Path) -> bool {
        let Some(name) = file.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        if name.starts_with('.') && !self.glob.starts_with('.') {
            return false;
        }
        match self.matcher.matched(file, false) {
            ignore::Match::Ignore(glob) => {
                log::trace!("{:?}: matched {:?}", file, glob.original());
                true
            }
            ignore::Match::None | ignore::Match::Whitelist(_) => false,
        }
    }
}
