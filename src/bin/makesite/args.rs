use std::io::Write as _;
use std::path;

use clap_verbosity_flag::{InfoLevel, Verbosity};

/// A static site generator for flat content trees.
#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub(crate) struct Cli {
    /// Generate all content, including drafts
    #[arg(long)]
    pub(crate) all: bool,

    /// Path to the configuration file
    #[arg(long, value_name = "FILE", default_value = "site.json", value_parser = config_file)]
    pub(crate) config: path::PathBuf,

    /// Path to the layout directory
    #[arg(long, value_name = "DIR", default_value = "layout", value_parser = existing_dir)]
    pub(crate) layout: path::PathBuf,

    /// Path to the content directory
    #[arg(long, value_name = "DIR", default_value = "content", value_parser = existing_dir)]
    pub(crate) content: path::PathBuf,

    /// Path to the output directory
    #[arg(long, value_name = "DIR", default_value = "public", value_parser = output_dir)]
    pub(crate) output: path::PathBuf,

    /// Build into the output directory even if it already exists
    #[arg(long)]
    pub(crate) overwrite_output: bool,

    #[command(flatten)]
    pub(crate) color: colorchoice_clap::Color,

    #[command(flatten)]
    pub(crate) verbose: Verbosity<InfoLevel>,
}

impl Cli {
    pub(crate) fn build_options(&self) -> makesite::BuildOptions {
        let mut options = makesite::BuildOptions::default()
            .all(self.all)
            .overwrite_output(self.overwrite_output);
        options.config = self.config.clone();
        options.layout_dir = self.layout.clone();
        options.content_dir = self.content.clone();
        options.output_dir = self.output.clone();
        options
    }
}

fn existing_dir(raw: &str) -> Result<path::PathBuf, String> {
    let dir = path::PathBuf::from(raw);
    if dir.is_dir() {
        Ok(dir)
    } else if dir.exists() {
        Err(format!("`{raw}` is not a directory"))
    } else {
        Err(format!("directory `{raw}` does not exist"))
    }
}

fn config_file(raw: &str) -> Result<path::PathBuf, String> {
    let file = path::PathBuf::from(raw);
    if file.is_dir() {
        Err(format!("`{raw}` is a directory"))
    } else {
        Ok(file)
    }
}

fn output_dir(raw: &str) -> Result<path::PathBuf, String> {
    let dir = path::PathBuf::from(raw);
    if dir.exists() && !dir.is_dir() {
        Err(format!("`{raw}` is not a directory"))
    } else {
        Ok(dir)
    }
}

pub(crate) fn init_logging(level: log::LevelFilter) {
    let mut builder = env_logger::Builder::new();
    builder.filter(None, level);

    if level == log::LevelFilter::Trace {
        builder.format_timestamp_secs();
    } else {
        builder.format(|f, record| {
            let style = level_style(record.level());
            let level = format!("[{}]", record.level()).to_lowercase();
            writeln!(f, "{style}{level:8}{style:#} {}", record.args())
        });
    }

    builder.init();
}

fn level_style(level: log::Level) -> anstyle::Style {
    match level {
        log::Level::Error => anstyle::AnsiColor::Red.on_default().bold(),
        log::Level::Warn => anstyle::AnsiColor::Yellow.on_default(),
        log::Level::Info => anstyle::AnsiColor::Green.on_default(),
        log::Level::Debug => anstyle::AnsiColor::Blue.on_default(),
        log::Level::Trace => anstyle::AnsiColor::Cyan.on_default(),
    }
}
