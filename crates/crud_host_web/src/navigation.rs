//! Address-bar query access through `location` and `history.replaceState`.

use crud_host::QueryNavigator;

#[derive(Debug, Clone, Copy, Default)]
/// Navigator that rewrites the query string in place, keeping the path and history length.
pub struct HistoryQueryNavigator;

impl QueryNavigator for HistoryQueryNavigator {
    fn current_query(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|window| window.location().search().ok())
                .map(|search| search.trim_start_matches('?').to_string())
                .unwrap_or_default()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            String::new()
        }
    }

    fn replace_query(&self, query: &str) {
        #[cfg(target_arch = "wasm32")]
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let path = window.location().pathname().unwrap_or_default();
            let url = query_url(&path, query);
            let result = window.history().and_then(|history| {
                history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&url))
            });
            if let Err(err) = result {
                web_sys::console::warn_1(&format!("history.replaceState failed: {err:?}").into());
            }
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = query;
        }
    }
}

/// `path?query`, or the bare path when the query is empty.
pub fn query_url(path: &str, query: &str) -> String {
    let query = query.trim_start_matches('?');
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_queries_keep_the_bare_path() {
        assert_eq!(query_url("/admin/case-types", ""), "/admin/case-types");
        assert_eq!(
            query_url("/admin/case-types", "?page=2&per_page=15"),
            "/admin/case-types?page=2&per_page=15"
        );
    }
}
