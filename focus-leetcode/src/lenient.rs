//! Lossy cross-type decoding.
//!
//! The judge API is inconsistent about field types: the same field arrives
//! as `"true"`, `true`, or `1` depending on the endpoint and the day. Each
//! helper tries the native type first and then the other representations.
//! A value that fits none of them decodes as `None` instead of failing the
//! whole payload.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

const TRUE_WORDS: &[&str] = &["true", "1", "yes", "y", "t"];
const FALSE_WORDS: &[&str] = &["false", "0", "no", "n", "f"];

/// String from string, number, or bool.
pub fn lossy_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Integer from integer, float, numeric string, or bool.
#[allow(clippy::cast_possible_truncation)]
pub fn lossy_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed.parse::<i64>().ok().or_else(|| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f as i64)
            })
        }
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Float from float, integer, numeric string, or bool.
pub fn lossy_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

/// Bool from bool, nonzero number, or a yes/no style word.
pub fn lossy_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n
            .as_i64()
            .map(|i| i != 0)
            .or_else(|| n.as_f64().map(|f| f != 0.0)),
        Value::String(s) => {
            let lowered = s.trim().to_ascii_lowercase();
            if TRUE_WORDS.contains(&lowered.as_str()) {
                Some(true)
            } else if FALSE_WORDS.contains(&lowered.as_str()) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// `deserialize_with` adapters for `Option<T>` fields.
///
/// Use together with `#[serde(default)]` so missing keys decode as `None`.
pub mod de {
    use super::{Deserialize, Deserializer, Value};

    fn lossy<'de, D, T>(deserializer: D, f: fn(&Value) -> Option<T>) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(f))
    }

    /// Lossy `Option<String>`.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON.
    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        lossy(d, super::lossy_string)
    }

    /// Lossy `Option<i64>`.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON.
    pub fn int<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
        lossy(d, super::lossy_i64)
    }

    /// Lossy `Option<f64>`.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON.
    pub fn float<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        lossy(d, super::lossy_f64)
    }

    /// Lossy `Option<bool>`.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON.
    pub fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<Option<bool>, D::Error> {
        lossy(d, super::lossy_bool)
    }
}

/// Slices `bytes` from the first `{` through the last `}`.
///
/// Salvages a JSON object wrapped in junk such as an HTML error prefix or a
/// trailing proxy banner.
pub fn brace_slice(bytes: &[u8]) -> Option<&[u8]> {
    let start = bytes.iter().position(|b| *b == b'{')?;
    let end = bytes.iter().rposition(|b| *b == b'}')?;
    (end > start).then(|| &bytes[start..=end])
}

/// Up to `max` bytes of `bytes` as lossy UTF-8, for error messages.
pub fn preview(bytes: &[u8], max: usize) -> String {
    let cut = &bytes[..bytes.len().min(max)];
    String::from_utf8_lossy(cut).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lossy_string() {
        assert_eq!(lossy_string(&json!("a")), Some("a".to_string()));
        assert_eq!(lossy_string(&json!(42)), Some("42".to_string()));
        assert_eq!(lossy_string(&json!(1.5)), Some("1.5".to_string()));
        assert_eq!(lossy_string(&json!(true)), Some("true".to_string()));
        assert_eq!(lossy_string(&json!(null)), None);
        assert_eq!(lossy_string(&json!([1])), None);
    }

    #[test]
    fn test_lossy_int() {
        assert_eq!(lossy_i64(&json!(7)), Some(7));
        assert_eq!(lossy_i64(&json!(7.9)), Some(7));
        assert_eq!(lossy_i64(&json!(" 12 ")), Some(12));
        assert_eq!(lossy_i64(&json!("3.0")), Some(3));
        assert_eq!(lossy_i64(&json!(true)), Some(1));
        assert_eq!(lossy_i64(&json!(false)), Some(0));
        assert_eq!(lossy_i64(&json!("abc")), None);
    }

    #[test]
    fn test_lossy_float() {
        assert_eq!(lossy_f64(&json!(2)), Some(2.0));
        assert_eq!(lossy_f64(&json!("97.5")), Some(97.5));
        assert_eq!(lossy_f64(&json!(false)), Some(0.0));
        assert_eq!(lossy_f64(&json!({})), None);
    }

    #[test]
    fn test_lossy_bool() {
        assert_eq!(lossy_bool(&json!(true)), Some(true));
        assert_eq!(lossy_bool(&json!(0)), Some(false));
        assert_eq!(lossy_bool(&json!(2)), Some(true));
        assert_eq!(lossy_bool(&json!(0.0)), Some(false));
        assert_eq!(lossy_bool(&json!("TRUE")), Some(true));
        assert_eq!(lossy_bool(&json!(" yes ")), Some(true));
        assert_eq!(lossy_bool(&json!("f")), Some(false));
        assert_eq!(lossy_bool(&json!("maybe")), None);
    }

    #[test]
    fn test_brace_slice() {
        assert_eq!(brace_slice(b"junk{\"a\":1}tail"), Some(&b"{\"a\":1}"[..]));
        assert_eq!(brace_slice(b"{\"a\":{\"b\":2}}"), Some(&b"{\"a\":{\"b\":2}}"[..]));
        assert_eq!(brace_slice(b"no braces"), None);
        assert_eq!(brace_slice(b"}{"), None);
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview(b"abcdef", 3), "abc");
        assert_eq!(preview(b"ab", 10), "ab");
    }
}
