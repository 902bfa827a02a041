//! Read-only preference lookup used to seed [`crate::CrudSettings`].

use std::{collections::HashMap, future::Future, pin::Pin};

use serde::de::DeserializeOwned;

/// Object-safe boxed future used by [`PrefsStore`].
pub type PrefsStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service returning raw JSON preferences by key.
pub trait PrefsStore {
    /// Raw JSON stored under `key`, if any.
    fn load_pref<'a>(&'a self, key: &'a str)
        -> PrefsStoreFuture<'a, Result<Option<String>, String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Store with no preferences.
pub struct NoopPrefsStore;

impl PrefsStore for NoopPrefsStore {
    fn load_pref<'a>(
        &'a self,
        _key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async { Ok(None) })
    }
}

#[derive(Debug, Clone, Default)]
/// Fixed in-memory preferences for tests and non-browser targets.
pub struct MemoryPrefsStore {
    entries: HashMap<String, String>,
}

impl MemoryPrefsStore {
    /// Seeds a raw JSON value.
    pub fn with_raw(mut self, key: impl Into<String>, raw_json: impl Into<String>) -> Self {
        self.entries.insert(key.into(), raw_json.into());
        self
    }
}

impl PrefsStore for MemoryPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        Box::pin(async move { Ok(self.entries.get(key).cloned()) })
    }
}

/// Loads and deserializes a typed preference.
///
/// # Errors
///
/// Returns an error when the store fails or the stored JSON does not match `T`.
pub async fn load_pref_with<S: PrefsStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, String> {
    let Some(raw) = store.load_pref(key).await? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|e| format!("invalid `{key}` preference: {e}"))
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn seeded_values_load_by_key_only() {
        let store = MemoryPrefsStore::default().with_raw("crud.settings", "[10,20]");
        let store_obj: &dyn PrefsStore = &store;
        let loaded: Option<Vec<u32>> =
            block_on(load_pref_with(store_obj, "crud.settings")).expect("load");
        assert_eq!(loaded, Some(vec![10, 20]));
        assert_eq!(block_on(store_obj.load_pref("crud.other")).expect("load"), None);
    }

    #[test]
    fn malformed_json_reports_the_key() {
        let store = MemoryPrefsStore::default().with_raw("crud.settings", "{");
        let err = block_on(load_pref_with::<_, Vec<u32>>(&store, "crud.settings")).unwrap_err();
        assert!(err.contains("crud.settings"));
    }

    #[test]
    fn noop_store_is_empty() {
        assert_eq!(block_on(NoopPrefsStore.load_pref("k")).expect("load"), None);
    }
}
