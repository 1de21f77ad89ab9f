//! Helpers for pulling typed parameters out of a `serde_json::Value` object.
//!
//! A missing key or a value of the wrong JSON type falls back to the
//! supplied default, so a partial params object is always usable.

use serde_json::Value;

/// Extracts an `f64` from `params[name]`, returning `default` if missing or wrong type.
///
/// JSON integers are accepted and converted.
pub fn param_f64(params: &Value, name: &str, default: f64) -> f64 {
    params.get(name).and_then(Value::as_f64).unwrap_or(default)
}

/// Like [`param_f64`], but tries each name in order and takes the first hit.
///
/// Used where a parameter is known under more than one name
/// (`dt` / `growth_rate`).
pub fn param_f64_any(params: &Value, names: &[&str], default: f64) -> f64 {
    names
        .iter()
        .find_map(|name| params.get(*name).and_then(Value::as_f64))
        .unwrap_or(default)
}

/// Extracts a string from `params[name]`, returning `default` if missing or wrong type.
pub fn param_string(params: &Value, name: &str, default: &str) -> String {
    params
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| default.to_owned())
}
