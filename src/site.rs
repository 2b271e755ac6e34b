use std::path;

use anyhow::Context as _;
use chrono::Datelike as _;
use makesite_config::{Config, ContentDir};

use crate::collection::make_pages;
use crate::error::*;
use crate::index::{IndexLayouts, make_index};
use crate::page::render_page;
use crate::params::SiteParams;
use crate::report::Report;
use crate::template::{Layout, Layouts};

/// Where a build reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct BuildOptions {
    /// Include `_`-prefixed files in content directories.
    pub all: bool,
    pub config: path::PathBuf,
    pub layout_dir: path::PathBuf,
    pub content_dir: path::PathBuf,
    pub output_dir: path::PathBuf,
    /// Build into an existing output directory.
    pub overwrite_output: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            all: false,
            config: makesite_config::DEFAULT_CONFIG_FILE.into(),
            layout_dir: "layout".into(),
            content_dir: "content".into(),
            output_dir: "public".into(),
            overwrite_output: false,
        }
    }
}

impl BuildOptions {
    /// Options rooted at `root`, using the default file and directory names.
    pub fn with_root<P: AsRef<path::Path>>(root: P) -> Self {
        let root = root.as_ref();
        let defaults = Self::default();
        Self {
            config: root.join(defaults.config),
            layout_dir: root.join(defaults.layout_dir),
            content_dir: root.join(defaults.content_dir),
            output_dir: root.join(defaults.output_dir),
            ..defaults
        }
    }

    pub fn all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    pub fn overwrite_output(mut self, overwrite_output: bool) -> Self {
        self.overwrite_output = overwrite_output;
        self
    }
}

/// Generate the site described by `options`.
pub fn build(options: &BuildOptions) -> Result<Report> {
    let mut report = Report::new();

    create_output_dir(&options.output_dir, options.overwrite_output)?;

    let mut site_params = SiteParams::defaults(chrono::Local::now().year());
    let content_dirs = match Config::from_path_if_exists(&options.config)? {
        Some(config) => {
            report.info(format_args!(
                "Reading configuration from {}",
                options.config.display()
            ));
            site_params.merge(&SiteParams::from_json(&config.params)?);
            config.content_dirs
        }
        None => {
            report.warn(format_args!(
                "Configuration file {} not found. Using defaults.",
                options.config.display()
            ));
            Vec::new()
        }
    };
    report.debug(format_args!(
        "Generating site with params: {}",
        site_params.to_json_pretty()?
    ));

    let layouts = Layouts::load(&options.layout_dir)?;

    let content = options.content_dir.display();
    let output = options.output_dir.display();
    make_pages(
        &format!("{content}/[!_]*.{{md,html}}"),
        &format!("{output}/{{{{ slug }}}}/index.html"),
        Layout::Page,
        &site_params,
        &layouts,
        &mut report,
    )?;
    make_pages(
        &format!("{content}/_index.{{md,html}}"),
        &format!("{output}/index.html"),
        Layout::Page,
        &site_params,
        &layouts,
        &mut report,
    )?;

    for dir in &content_dirs {
        build_content_dir(dir, options, &site_params, &layouts, &mut report)?;
    }

    Ok(report)
}

fn create_output_dir(output_dir: &path::Path, overwrite_output: bool) -> Result<()> {
    if output_dir.exists() && !overwrite_output {
        anyhow::bail!(
            "Error creating output directory {}: it already exists",
            output_dir.display()
        );
    }
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Error creating output directory {}", output_dir.display()))?;
    Ok(())
}

fn build_content_dir(
    dir: &ContentDir,
    options: &BuildOptions,
    site_params: &SiteParams,
    layouts: &Layouts,
    report: &mut Report,
) -> Result<()> {
    report.info(format_args!(
        "Rendering content dir {} => {} ...",
        dir.title, dir.slug
    ));

    let mut dir_layer = SiteParams::new();
    dir_layer.insert_str("dir", &dir.slug);
    dir_layer.insert_str("title", &dir.title);
    dir_layer.insert(
        "current_content_dir",
        liquid::model::to_value(&dir.settings)?,
    );
    let dir_params = site_params.layer(&dir_layer);

    let source = options.content_dir.join(&dir.name);
    let source = source.display();
    let dest = options.output_dir.join(&dir.slug);
    let dest = dest.display();
    let exclusion_prefix = if options.all { "" } else { "[!_]" };

    let posts = make_pages(
        &format!("{source}/{exclusion_prefix}*.{{md,html}}"),
        &format!("{dest}/{{{{ slug }}}}/index.html"),
        Layout::Post,
        &dir_params,
        layouts,
        report,
    )?;

    let index_pattern = format!("{source}/_index.{{md,html}}");
    let index_dest = format!("{dest}/index.html");
    if dir.generate_index {
        report.info("Generating index ...");
        let front = render_page(&index_pattern, site_params, layouts.liquid(), report)?;
        if front.is_some() {
            report.info(format_args!("Found front content for {}", dir.title));
        }
        make_index(
            front.as_ref(),
            &posts,
            &index_dest,
            IndexLayouts::HTML,
            &dir_params,
            layouts,
            report,
        )?;
    } else {
        make_pages(
            &index_pattern,
            &index_dest,
            Layout::Page,
            site_params,
            layouts,
            report,
        )?;
    }

    if dir.generate_rss {
        report.info("Generating RSS ...");
        make_index(
            None,
            &posts,
            &format!("{dest}/rss.xml"),
            IndexLayouts::FEED,
            &dir_params,
            layouts,
            report,
        )?;
    }

    Ok(())
}
