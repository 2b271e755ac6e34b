use anyhow::Context as _;

use super::*;

/// Settings for one content subdirectory, as written in the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
#[serde(rename_all = "snake_case")]
struct ContentDirSettings {
    slug: Option<String>,
    title: Option<String>,
    #[serde(deserialize_with = "deserialize_loose_bool")]
    generate_index: bool,
    #[serde(deserialize_with = "deserialize_loose_bool")]
    generate_rss: bool,
}

/// A content subdirectory and how it is published.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ContentDir {
    /// Directory name under the content root.
    pub name: String,
    /// Directory name under the output root.
    pub slug: String,
    pub title: String,
    pub generate_index: bool,
    pub generate_rss: bool,
    /// The settings mapping exactly as configured, exposed to templates.
    pub settings: serde_json::Map<String, serde_json::Value>,
}

impl ContentDir {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::new_internal(name.into())
    }

    fn new_internal(name: String) -> Self {
        let title = capitalize(&name);
        Self {
            slug: name.clone(),
            title,
            name,
            generate_index: false,
            generate_rss: false,
            settings: Default::default(),
        }
    }

    pub fn from_json(name: &str, settings: &serde_json::Value) -> Result<Self> {
        let map = match settings {
            serde_json::Value::Object(map) => map.clone(),
            serde_json::Value::Null => Default::default(),
            _ => anyhow::bail!("Settings for content dir `{name}` must be a mapping"),
        };
        let parsed: ContentDirSettings = serde_json::from_value(serde_json::Value::Object(
            map.clone(),
        ))
        .with_context(|| format!("Invalid settings for content dir `{name}`"))?;

        let mut dir = Self::new(name);
        if let Some(slug) = parsed.slug {
            dir.slug = slug;
        }
        if let Some(title) = parsed.title {
            dir.title = title;
        }
        dir.generate_index = parsed.generate_index;
        dir.generate_rss = parsed.generate_rss;
        dir.settings = map;
        Ok(dir)
    }
}

/// Upper-case the first character, lower-case the rest.
fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f
            .to_uppercase()
            .chain(c.flat_map(|t| t.to_lowercase()))
            .collect(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use serde_json::json;

    #[test]
    fn defaults_from_name() {
        let dir = ContentDir::from_json("blog", &json!({})).unwrap();
        assert_eq!(dir.name, "blog");
        assert_eq!(dir.slug, "blog");
        assert_eq!(dir.title, "Blog");
        assert!(!dir.generate_index);
        assert!(!dir.generate_rss);
    }

    #[test]
    fn default_title_lowercases_tail() {
        let dir = ContentDir::new("myPosts");
        assert_eq!(dir.title, "Myposts");
    }

    #[test]
    fn explicit_settings() {
        let dir = ContentDir::from_json(
            "blog",
            &json!({
                "slug": "news",
                "title": "Latest News",
                "generate_index": "yes",
                "generate_rss": 1,
                "extra": "kept"
            }),
        )
        .unwrap();
        assert_eq!(dir.slug, "news");
        assert_eq!(dir.title, "Latest News");
        assert!(dir.generate_index);
        assert!(dir.generate_rss);
        assert_eq!(dir.settings.get("extra"), Some(&json!("kept")));
    }

    #[test]
    fn null_settings_use_defaults() {
        let dir = ContentDir::from_json("notes", &json!(null)).unwrap();
        assert_eq!(dir, ContentDir::new("notes"));
    }

    #[test]
    fn non_mapping_settings_fail() {
        assert!(ContentDir::from_json("blog", &json!("oops")).is_err());
    }

    #[test]
    fn non_string_slug_fails() {
        assert!(ContentDir::from_json("blog", &json!({"slug": 3})).is_err());
    }
}
