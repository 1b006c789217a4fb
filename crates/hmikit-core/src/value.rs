//! Raw attribute values and fail-soft conversion.
//!
//! The host delivers attribute values as JSON-shaped data, with `None` as the
//! null/absent sentinel. Conversion never fails hard: an unconvertible value
//! yields `None` and the caller substitutes the attribute's declared default.

use serde::de::DeserializeOwned;

/// A raw attribute value as delivered by the host.
pub type RawValue = serde_json::Value;

/// Coerce a raw value to a boolean.
///
/// Accepts JSON booleans, numbers (zero is false, any other finite value is
/// true) and the string forms `"true"`/`"false"` (case-insensitive) and
/// `"1"`/`"0"`.
pub fn to_boolean(raw: Option<&RawValue>) -> Option<bool> {
    match raw? {
        RawValue::Bool(value) => Some(*value),
        RawValue::Number(number) => number.as_f64().map(|v| v != 0.0),
        RawValue::String(text) => {
            let text = text.trim();
            if text.eq_ignore_ascii_case("true") || text == "1" {
                Some(true)
            } else if text.eq_ignore_ascii_case("false") || text == "0" {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Coerce a raw value to a string.
///
/// Strings pass through; booleans and numbers render to their display form.
/// Arrays, objects and null are not coercible.
pub fn to_string(raw: Option<&RawValue>) -> Option<String> {
    match raw? {
        RawValue::String(text) => Some(text.clone()),
        RawValue::Bool(value) => Some(value.to_string()),
        RawValue::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Schema-validated conversion into a structured type.
///
/// The attribute's type descriptor is the target type's serde schema; any
/// value that does not deserialize is treated as invalid.
pub fn to_schema<T: DeserializeOwned>(raw: Option<&RawValue>) -> Option<T> {
    serde_json::from_value(raw?.clone()).ok()
}
