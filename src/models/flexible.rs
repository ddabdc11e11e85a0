//! Lenient field deserializers for form values that arrive either as typed
//! text or as JSON numbers.

use serde::de::{self, Deserialize, Deserializer};
use serde_json::Value;

/// Text field that also accepts numbers and booleans. `null` reads as "".
pub fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {other}"
        ))),
    }
}

/// Age in years from a number or numeric string. Blank or unparseable
/// values read as `None`.
pub fn optional_age<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let years = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(years
        .filter(|y| y.is_finite() && *y >= 0.0 && *y <= f64::from(u16::MAX))
        .map(|y| y.round() as u16))
}

/// Optional enum given as text. An empty string reads as `None`; any other
/// value must parse.
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s.trim().parse().map(Some).map_err(de::Error::custom),
    }
}
