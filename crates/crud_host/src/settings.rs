//! Persisted CRUD-layer settings.

use serde::{Deserialize, Serialize};

use crate::prefs::{load_pref_with, PrefsStore};

/// Prefs key holding [`CrudSettings`].
pub const CRUD_SETTINGS_KEY: &str = "crud.settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// What happens when a relation option list fails to load.
pub enum RelationFailurePolicy {
    /// Show an empty list and log a warning.
    #[default]
    Silent,
    /// Show an empty list, log, and put an error on the field.
    Surface,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Tunables shared by every CRUD page.
pub struct CrudSettings {
    /// Rows per page when the URL does not say.
    pub default_per_page: u32,
    /// Choices offered by the page-size selector.
    pub per_page_options: Vec<u32>,
    /// Locale used before a `languageChanged` event arrives.
    pub default_locale: String,
    /// Relation load failure handling.
    pub relation_failure_policy: RelationFailurePolicy,
    /// Auto-dismiss delay for toasts.
    pub toast_timeout_ms: u32,
    /// Prefix prepended to relative endpoints.
    pub api_base_url: String,
}

impl Default for CrudSettings {
    fn default() -> Self {
        Self {
            default_per_page: 15,
            per_page_options: vec![10, 15, 25, 50, 100],
            default_locale: "en".to_string(),
            relation_failure_policy: RelationFailurePolicy::Silent,
            toast_timeout_ms: 4000,
            api_base_url: String::new(),
        }
    }
}

impl CrudSettings {
    /// Clamps values a hand-edited store could break.
    pub fn sanitized(mut self) -> Self {
        self.default_per_page = self.default_per_page.max(1);
        self.per_page_options.retain(|option| *option > 0);
        self.per_page_options.sort_unstable();
        self.per_page_options.dedup();
        if !self.per_page_options.contains(&self.default_per_page) {
            self.per_page_options.push(self.default_per_page);
            self.per_page_options.sort_unstable();
        }
        if self.default_locale.trim().is_empty() {
            self.default_locale = "en".to_string();
        }
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        self
    }

    /// Joins a relative endpoint onto [`Self::api_base_url`]; absolute URLs pass through.
    pub fn resolve_url(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!("{}{endpoint}", self.api_base_url)
    }
}

/// Loads settings, falling back to defaults when absent.
///
/// # Errors
///
/// Returns an error when the store fails or the stored JSON is malformed.
pub async fn load_settings_with<S: PrefsStore + ?Sized>(store: &S) -> Result<CrudSettings, String> {
    Ok(load_pref_with::<S, CrudSettings>(store, CRUD_SETTINGS_KEY)
        .await?
        .unwrap_or_default()
        .sanitized())
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::prefs::MemoryPrefsStore;

    #[test]
    fn missing_settings_use_defaults() {
        let store = MemoryPrefsStore::default();
        let settings = block_on(load_settings_with(&store)).expect("settings");
        assert_eq!(settings, CrudSettings::default());
        assert_eq!(settings.default_per_page, 15);
    }

    #[test]
    fn partial_settings_are_filled_and_sanitized() {
        let store = MemoryPrefsStore::default().with_raw(
            CRUD_SETTINGS_KEY,
            r#"{"default_per_page":20,"per_page_options":[50,0,10,10],"relation_failure_policy":"surface","api_base_url":"https://api.example.test/"}"#,
        );
        let settings = block_on(load_settings_with(&store)).expect("settings");
        assert_eq!(settings.per_page_options, vec![10, 20, 50]);
        assert_eq!(settings.relation_failure_policy, RelationFailurePolicy::Surface);
        assert_eq!(settings.default_locale, "en");
        assert_eq!(
            settings.resolve_url("/api/cases"),
            "https://api.example.test/api/cases"
        );
    }

    #[test]
    fn malformed_settings_are_an_error() {
        let store = MemoryPrefsStore::default()
            .with_raw(CRUD_SETTINGS_KEY, r#"{"default_per_page":"x"}"#);
        let err = block_on(load_settings_with(&store)).unwrap_err();
        assert!(err.contains(CRUD_SETTINGS_KEY));
    }
}
