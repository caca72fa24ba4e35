//! Options from `data-*` attributes
//!
//! Widgets take their defaults from a serializable options struct and let
//! markup override individual fields:
//!
//! ```text
//! <div id="slider" data-wb-pause-on-hover="false" data-wb-interval="4000">
//! ```
//!
//! Field names are matched in hyphenated lower case, so `pauseOnHover` and
//! `pause_on_hover` both read `data-wb-pause-on-hover`. Attributes without a
//! matching field are ignored.

use crate::error::{CoreError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use tracing::trace;
use whiteboard_platform::{Document, ElementId};

/// Prefix used when none is given
pub const DEFAULT_DATA_PREFIX: &str = "wb-";

/// Build options from `defaults`, overriding each field present as a
/// `data-<prefix><field>` attribute on `element`.
pub fn options_from_data<D, T>(
    document: &D,
    element: ElementId,
    defaults: &T,
    prefix: Option<&str>,
) -> Result<T>
where
    D: Document + ?Sized,
    T: Serialize + DeserializeOwned,
{
    let prefix = prefix.unwrap_or(DEFAULT_DATA_PREFIX);
    let fields: Map<String, Value> = match serde_json::to_value(defaults)? {
        Value::Object(fields) => fields,
        other => return Err(CoreError::DefaultsNotObject(json_kind(&other))),
    };

    let options: Map<String, Value> = fields
        .into_iter()
        .map(|(key, default)| {
            let attribute = format!("{prefix}{}", hyphenate(&key));
            match document.data_attribute(element, &attribute) {
                Some(raw) => {
                    trace!(%attribute, %raw, "option from data attribute");
                    let value = if default.is_string() {
                        Value::String(raw)
                    } else {
                        coerce_data_value(&raw)
                    };
                    (key, value)
                }
                None => (key, default),
            }
        })
        .collect();

    Ok(serde_json::from_value(Value::Object(options))?)
}

/// `pauseOnHover` / `pause_on_hover` -> `pause-on-hover`
pub fn hyphenate(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    let mut prev_lower = false;

    for c in key.chars() {
        if c == '_' {
            out.push('-');
            prev_lower = false;
            continue;
        }
        if prev_lower && c.is_ascii_uppercase() {
            out.push('-');
        }
        prev_lower = c.is_ascii_lowercase();
        out.push(c.to_ascii_lowercase());
    }

    out
}

/// Convert a raw attribute string the way page scripts read `data-*` values:
/// booleans, `null`, numbers and JSON objects/arrays are parsed, anything
/// else stays a string. A number is only taken when it prints back as the
/// exact same text, so `"010"`, `"1e3"` and `"+5"` stay strings.
pub fn coerce_data_value(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" => return Value::Null,
        _ => {}
    }

    if let Some(number) = canonical_number(raw) {
        return Value::Number(number);
    }

    if raw.starts_with('{') || raw.starts_with('[') {
        if let Ok(value) = serde_json::from_str(raw) {
            return value;
        }
    }

    Value::String(raw.to_string())
}

/// Integers up to 2^53 keep exact integer form
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn canonical_number(raw: &str) -> Option<Number> {
    let value = raw.parse::<f64>().ok().filter(|n| n.is_finite())?;

    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        let int = value as i64;
        return (int.to_string() == raw).then(|| Number::from(int));
    }

    if value.to_string() == raw {
        Number::from_f64(value)
    } else {
        None
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
