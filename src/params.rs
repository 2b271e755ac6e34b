use liquid_core::model::ValueView as _;

use crate::error::*;

/// The variables handed to templates.
///
/// Built up in layers with [`SiteParams::layer`]; a key set by a later layer
/// replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteParams {
    values: liquid::Object,
}

impl SiteParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Site-wide values available even without a config file.
    pub fn defaults(current_year: i32) -> Self {
        let mut params = Self::new();
        params.insert_str("author", "Admin");
        params.insert_str("site_subtitle", "");
        params.insert_str("site_description", "");
        params.insert_str("date_human_format", "%d %b, %Y");
        params.insert("current_year", liquid::model::Value::scalar(i64::from(current_year)));
        params
    }

    /// Convert JSON values, keeping their key order.
    pub fn from_json(values: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let mut params = Self::new();
        for (key, value) in values {
            let value = liquid::model::to_value(value)
                .map_err(|e| anyhow::format_err!("Invalid value for `{key}`: {e}"))?;
            params.insert(key.clone(), value);
        }
        Ok(params)
    }

    pub fn insert<K: Into<liquid::model::KString>>(&mut self, key: K, value: liquid::model::Value) {
        self.values.insert(key.into(), value);
    }

    pub fn insert_str<K: Into<liquid::model::KString>>(&mut self, key: K, value: &str) {
        self.insert(key, liquid::model::Value::scalar(value.to_owned()));
    }

    /// A copy of `self` with `overlay` applied on top.
    pub fn layer(&self, overlay: &SiteParams) -> SiteParams {
        let mut layered = self.clone();
        layered.merge(overlay);
        layered
    }

    pub fn merge(&mut self, overlay: &SiteParams) {
        for (key, value) in overlay.values.iter() {
            self.values.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&liquid::model::Value> {
        self.values.get(key)
    }

    /// The value of `key` rendered as text; `None` when unset or nil.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|v| !v.is_nil())
            .map(|v| v.to_kstr().as_str().to_owned())
    }

    /// Like [`SiteParams::get_str`] but treats an empty value as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get_str(key).filter(|s| !s.is_empty())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn as_object(&self) -> &liquid::Object {
        &self.values
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        let pretty = serde_json::to_string_pretty(&self.values)?;
        Ok(pretty)
    }
}
