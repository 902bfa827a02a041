//! Transient form values held while a CRUD modal is open.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Metadata for a file chosen in the browser.
///
/// The file bytes stay in the browser; `handle` is the key the web adapter uses to look the
/// original `File` object back up when a multipart body is assembled.
pub struct FileUpload {
    /// Original file name.
    pub file_name: String,
    /// Reported MIME type (may be empty).
    pub mime_type: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Opaque browser-side handle.
    pub handle: u64,
}

impl FileUpload {
    /// Lower-cased extension without the dot, when the name has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

fn number_is_zero(number: &Number) -> bool {
    number.as_f64().is_some_and(|value| value == 0.0)
}

#[derive(Debug, Clone, PartialEq, Default)]
/// One field value in [`FormData`].
pub enum FieldValue {
    /// Absent / cleared value.
    #[default]
    Empty,
    /// Text, select values, dates, colors.
    Text(String),
    /// Numeric input kept in JSON form so integer payloads stay integers.
    Number(Number),
    /// Checkbox and switch state.
    Bool(bool),
    /// Multi-select values.
    List(Vec<String>),
    /// Newly chosen upload.
    File(FileUpload),
    /// Any other structured value carried through unchanged.
    Json(Value),
}

impl FieldValue {
    /// Creates a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Reads numeric input text: integers and decimals become [`Self::Number`], blank input is
    /// [`Self::Empty`], and anything else stays text for validation to reject.
    pub fn parse_number(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if let Ok(integer) = trimmed.parse::<i64>() {
            return Self::Number(integer.into());
        }
        trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map_or_else(|| Self::Text(raw.to_string()), Self::Number)
    }

    /// Converts a JSON value without reshaping it.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Empty,
            Value::Bool(flag) => Self::Bool(*flag),
            Value::Number(number) => Self::Number(number.clone()),
            Value::String(text) => Self::Text(text.clone()),
            Value::Array(items) if items.iter().all(Value::is_string) => Self::List(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            other => Self::Json(other.clone()),
        }
    }

    /// Converts back into JSON for request bodies.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Text(text) => Value::String(text.clone()),
            Self::Number(number) => Value::Number(number.clone()),
            Self::Bool(flag) => Value::Bool(*flag),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            Self::File(upload) => serde_json::json!({
                "name": upload.file_name,
                "type": upload.mime_type,
                "size": upload.size_bytes,
            }),
            Self::Json(value) => value.clone(),
        }
    }

    /// Returns `true` when the value counts as missing for a required field.
    ///
    /// Falsy values are missing: zero, `false`, blank text, and empty collections.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(number) => number_is_zero(number),
            Self::File(_) => false,
            Self::Bool(flag) => !flag,
            Self::List(items) => items.is_empty(),
            Self::Json(value) => match value {
                Value::Null => true,
                Value::Array(items) => items.is_empty(),
                Value::Object(map) => map.is_empty(),
                Value::String(text) => text.trim().is_empty(),
                Value::Bool(flag) => !flag,
                Value::Number(number) => number_is_zero(number),
            },
        }
    }

    /// Scalar text form used by select/date/color controls; empty for non-scalars.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
            Self::Bool(flag) => flag.to_string(),
            Self::Json(Value::String(text)) => text.clone(),
            Self::Json(Value::Number(number)) => number.to_string(),
            _ => String::new(),
        }
    }

    /// Coerces the value into a list of strings (`scalar -> [String(scalar)]`).
    pub fn into_list(self) -> Vec<String> {
        match self {
            Self::Empty => Vec::new(),
            Self::List(items) => items,
            Self::Json(Value::Array(items)) => items.iter().filter_map(json_scalar_text).collect(),
            Self::Json(Value::Null) => Vec::new(),
            Self::File(upload) => vec![upload.file_name],
            Self::Json(other) => json_scalar_text(&other).into_iter().collect(),
            scalar => vec![scalar.as_text()],
        }
    }

    /// Returns `true` for a freshly chosen upload.
    pub fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }
}

fn json_scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Object(map) => map
            .get("id")
            .or_else(|| map.get("value"))
            .and_then(json_scalar_text),
        _ => None,
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Number(Number::from(value))
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
/// Field name to value mapping for the record being edited.
pub struct FormData(BTreeMap<String, FieldValue>);

impl FormData {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from the top-level keys of a JSON object; other JSON shapes yield empty
    /// data.
    pub fn from_json(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        Self(
            map.iter()
                .map(|(key, entry)| (key.clone(), FieldValue::from_json(entry)))
                .collect(),
        )
    }

    /// Serializes the record into a JSON object.
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect::<Map<String, Value>>(),
        )
    }

    /// Returns the value for `name`.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    /// Returns `true` when `name` holds a value (including [`FieldValue::Empty`]).
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Sets `name`.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Removes `name` and returns the previous value.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.0.remove(name)
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` when any entry is a new upload.
    pub fn has_files(&self) -> bool {
        self.0.values().any(FieldValue::is_file)
    }
}

impl FromIterator<(String, FieldValue)> for FormData {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for FormData {
    type Item = (String, FieldValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn json_conversion_keeps_integer_numbers_and_objects() {
        let source = json!({
            "id": 7,
            "name": "Civil",
            "is_active": true,
            "tags": ["a", "b"],
            "owner": { "id": 3 },
            "ids": [1, 2],
            "deleted_at": null,
        });
        let data = FormData::from_json(&source);
        assert_eq!(data.get("tags"), Some(&FieldValue::List(vec!["a".into(), "b".into()])));
        assert_eq!(data.get("deleted_at"), Some(&FieldValue::Empty));
        assert_eq!(data.to_json(), source);
    }

    #[test]
    fn falsy_values_count_as_blank() {
        assert!(FieldValue::Empty.is_blank());
        assert!(FieldValue::text("  ").is_blank());
        assert!(FieldValue::Bool(false).is_blank());
        assert!(FieldValue::List(Vec::new()).is_blank());
        assert!(FieldValue::from(0_i64).is_blank());
        assert!(FieldValue::Json(json!(0.0)).is_blank());
        assert!(!FieldValue::from(3_i64).is_blank());
        assert!(!FieldValue::text("0").is_blank());
        assert!(!FieldValue::text("x").is_blank());
    }

    #[test]
    fn numeric_input_parses_into_numbers() {
        assert_eq!(FieldValue::parse_number(" 0 "), FieldValue::from(0_i64));
        assert_eq!(FieldValue::parse_number(""), FieldValue::Empty);
        assert_eq!(FieldValue::parse_number("12.5").to_json(), json!(12.5));
        assert_eq!(FieldValue::parse_number("1e"), FieldValue::text("1e"));
        assert!(FieldValue::parse_number("0").is_blank());
    }

    #[test]
    fn scalar_values_coerce_to_single_element_lists() {
        assert_eq!(FieldValue::from(5_i64).into_list(), vec!["5".to_string()]);
        assert_eq!(FieldValue::text("x").into_list(), vec!["x".to_string()]);
        assert_eq!(
            FieldValue::Json(json!([{ "id": 1 }, 2])).into_list(),
            vec!["1".to_string(), "2".to_string()]
        );
        assert!(FieldValue::Empty.into_list().is_empty());
    }

    #[test]
    fn upload_extension_is_lowercased() {
        let upload = FileUpload {
            file_name: "Brief.PDF".into(),
            mime_type: "application/pdf".into(),
            size_bytes: 10,
            handle: 1,
        };
        assert_eq!(upload.extension().as_deref(), Some("pdf"));
    }
}
