use std::fmt;
use std::path;

use anyhow::Context as _;

use super::*;

pub const DEFAULT_CONFIG_FILE: &str = "site.json";

/// The site configuration file.
///
/// Every top-level key is kept in [`Config::params`] (in file order) so that it
/// reaches the templates; `content_dirs` is additionally interpreted into
/// [`ContentDir`]s.
#[derive(Debug, Clone, Default, PartialEq)]
#[non_exhaustive]
pub struct Config {
    pub params: serde_json::Map<String, serde_json::Value>,
    pub content_dirs: Vec<ContentDir>,
}

impl Config {
    pub fn from_file<P: Into<path::PathBuf>>(path: P) -> Result<Config> {
        Self::from_file_internal(path.into())
    }

    fn from_file_internal(path: path::PathBuf) -> Result<Config> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Error reading from {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Load `path` when it names an existing file.
    ///
    /// `Ok(None)` means there is nothing to load and defaults apply.
    pub fn from_path_if_exists<P: AsRef<path::Path>>(path: P) -> Result<Option<Config>> {
        let path = path.as_ref();
        if path.is_file() {
            log::debug!("Using config file `{}`", path.display());
            Self::from_file(path).map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn from_json(content: &str) -> Result<Config> {
        let value: serde_json::Value = serde_json::from_str(content)?;
        let params = match value {
            serde_json::Value::Object(params) => params,
            _ => anyhow::bail!("Config must be a JSON object"),
        };

        let content_dirs = match params.get("content_dirs") {
            None | Some(serde_json::Value::Null) => Vec::new(),
            Some(serde_json::Value::Object(dirs)) => dirs
                .iter()
                .map(|(name, settings)| ContentDir::from_json(name, settings))
                .collect::<Result<Vec<_>>>()?,
            Some(_) => anyhow::bail!("`content_dirs` must map directory names to settings"),
        };

        Ok(Config {
            params,
            content_dirs,
        })
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let converted = serde_json::to_string_pretty(&self.params).map_err(|_| fmt::Error)?;
        write!(f, "{converted}")
    }
}
