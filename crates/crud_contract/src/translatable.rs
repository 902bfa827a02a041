//! Bilingual display values and the locale-preference resolution chain.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Locale used when the active locale has no translation.
pub const FALLBACK_LOCALE: &str = "en";
/// Locale tried after [`FALLBACK_LOCALE`].
pub const SECONDARY_LOCALE: &str = "ar";
/// Locales the admin surfaces ship translations for.
pub const SUPPORTED_LOCALES: [&str; 2] = [FALLBACK_LOCALE, SECONDARY_LOCALE];

/// Returns `true` for locales rendered right-to-left.
pub fn is_rtl_locale(locale: &str) -> bool {
    matches!(locale, "ar" | "fa" | "he" | "ur")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
/// A label or API value that is either plain text or a per-locale map (`{ en?, ar? }`).
pub enum TranslatableValue {
    /// Untranslated text shown for every locale.
    Plain(String),
    /// Translations keyed by locale code.
    Localized(BTreeMap<String, String>),
}

impl Default for TranslatableValue {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

impl From<&str> for TranslatableValue {
    fn from(value: &str) -> Self {
        Self::Plain(value.to_string())
    }
}

impl From<String> for TranslatableValue {
    fn from(value: String) -> Self {
        Self::Plain(value)
    }
}

impl TranslatableValue {
    /// Builds an English/Arabic pair.
    pub fn bilingual(en: impl Into<String>, ar: impl Into<String>) -> Self {
        let mut map = BTreeMap::new();
        map.insert(FALLBACK_LOCALE.to_string(), en.into());
        map.insert(SECONDARY_LOCALE.to_string(), ar.into());
        Self::Localized(map)
    }

    /// Resolves the display string through `locale -> en -> ar -> ""`.
    pub fn resolve(&self, locale: &str) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Localized(map) => resolve_chain(locale, |code| map.get(code).map(String::as_str)),
        }
    }

    /// Parses a JSON value when it has a translatable shape.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(Self::Plain(text.clone())),
            Value::Object(_) if is_translatable_object(value) => {
                serde_json::from_value(strip_null_entries(value)).ok()
            }
            _ => None,
        }
    }
}

fn resolve_chain<'a>(locale: &str, lookup: impl Fn(&str) -> Option<&'a str>) -> String {
    [locale, FALLBACK_LOCALE, SECONDARY_LOCALE]
        .into_iter()
        .filter_map(|code| lookup(code))
        .find(|text| !text.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn strip_null_entries(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, entry)| !entry.is_null())
                .map(|(key, entry)| (key.clone(), entry.clone()))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Returns `true` when `value` is a `{ en?, ar? }` object with string (or null) entries.
pub fn is_translatable_object(value: &Value) -> bool {
    let Value::Object(map) = value else {
        return false;
    };
    !map.is_empty()
        && map.iter().all(|(key, entry)| {
            SUPPORTED_LOCALES.contains(&key.as_str()) && (entry.is_string() || entry.is_null())
        })
}

/// Resolves any JSON value to display text, applying the locale chain to translatable objects.
///
/// Returns `None` for null and for non-translatable objects/arrays so callers can decide how to
/// render them; they are never stringified raw.
pub fn resolve_json_text(value: &Value, locale: &str) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Object(map) if is_translatable_object(value) => Some(resolve_chain(locale, |code| {
            map.get(code).and_then(Value::as_str)
        })),
        Value::Object(_) | Value::Array(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn active_locale_wins_when_present() {
        let value = TranslatableValue::bilingual("Draft", "مسودة");
        assert_eq!(value.resolve("ar"), "مسودة");
        assert_eq!(value.resolve("en"), "Draft");
    }

    #[test]
    fn unsupported_locale_falls_back_to_english_then_arabic() {
        let value = TranslatableValue::bilingual("Draft", "مسودة");
        assert_eq!(value.resolve("fr"), "Draft");

        let arabic_only = TranslatableValue::from_json(&json!({ "ar": "مسودة" })).unwrap();
        assert_eq!(arabic_only.resolve("fr"), "مسودة");
        assert_eq!(TranslatableValue::Localized(BTreeMap::new()).resolve("en"), "");
    }

    #[test]
    fn empty_translation_is_skipped_in_chain() {
        let value = TranslatableValue::from_json(&json!({ "en": "Open", "ar": "" })).unwrap();
        assert_eq!(value.resolve("ar"), "Open");
    }

    #[test]
    fn json_text_resolution_never_renders_objects_raw() {
        assert_eq!(
            resolve_json_text(&json!({ "en": "Civil", "ar": "مدني" }), "ar").as_deref(),
            Some("مدني")
        );
        assert_eq!(resolve_json_text(&json!({ "id": 4 }), "en"), None);
        assert_eq!(resolve_json_text(&json!(12), "en").as_deref(), Some("12"));
        assert_eq!(resolve_json_text(&Value::Null, "en"), None);
    }

    #[test]
    fn translatable_detection_rejects_foreign_keys() {
        assert!(is_translatable_object(&json!({ "en": "A", "ar": null })));
        assert!(!is_translatable_object(&json!({ "en": "A", "label": "B" })));
        assert!(!is_translatable_object(&json!({})));
    }
}
