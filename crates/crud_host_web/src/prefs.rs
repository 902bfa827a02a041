//! `localStorage`-backed preference lookup.
//!
//! Keys are namespaced so several admin builds on one origin do not collide.

use crud_host::{PrefsStore, PrefsStoreFuture};

/// Prefix prepended to every stored key.
pub const PREFS_NAMESPACE: &str = "crud-admin";

/// Storage key for a preference key.
pub fn storage_key(key: &str) -> String {
    format!("{PREFS_NAMESPACE}:{key}")
}

#[derive(Debug, Clone, Copy, Default)]
/// Browser preference store backed by `window.localStorage`.
pub struct WebPrefsStore;

impl WebPrefsStore {
    /// Raw JSON stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error when the read throws (for example, storage disabled by the user).
    pub fn load_json(self, key: &str) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten())
            else {
                return Ok(None);
            };
            storage
                .get_item(&storage_key(key))
                .map_err(|e| format!("localStorage get_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }
}

impl PrefsStore for WebPrefsStore {
    fn load_pref<'a>(
        &'a self,
        key: &'a str,
    ) -> PrefsStoreFuture<'a, Result<Option<String>, String>> {
        let store = *self;
        Box::pin(async move { store.load_json(key) })
    }
}
