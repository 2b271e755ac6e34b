/// Words accepted as `true` when a setting is given as a string.
const TRUTHY: &[&str] = &["true", "yes", "ok", "si", "sí", "bai", "oui", "da", "1"];

/// Loosely interpret a configuration value as a boolean.
///
/// Booleans are taken as-is, integers are `true` when non-zero and strings are
/// `true` when they spell one of a handful of "yes" words.  Everything else,
/// including `null`, is `false`.
pub fn to_bool(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i != 0
            } else if let Some(u) = n.as_u64() {
                u != 0
            } else {
                false
            }
        }
        serde_json::Value::String(s) => {
            let s = s.to_lowercase();
            TRUTHY.contains(&s.as_str())
        }
        _ => false,
    }
}

pub(crate) fn deserialize_loose_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: serde_json::Value = serde::Deserialize::deserialize(deserializer)?;
    Ok(to_bool(&value))
}
