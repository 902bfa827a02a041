//! Paginated list envelope returned by CRUD list endpoints.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// One pagination link (`« Previous`, `1`, `2`, `Next »`).
pub struct PageLink {
    /// Target URL; `None` for disabled links.
    #[serde(default)]
    pub url: Option<String>,
    /// Display label (may contain HTML entities from the backend).
    #[serde(default)]
    pub label: String,
    /// Whether this is the current page.
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// `{ data, links, from, to, total }` list envelope.
pub struct Paginated<T> {
    /// Rows on this page.
    pub data: Vec<T>,
    /// Pagination links.
    #[serde(default)]
    pub links: Vec<PageLink>,
    /// 1-based index of the first row, `None` when empty.
    #[serde(default)]
    pub from: Option<u64>,
    /// 1-based index of the last row, `None` when empty.
    #[serde(default)]
    pub to: Option<u64>,
    /// Total matching rows.
    #[serde(default)]
    pub total: u64,
    /// Current page when reported.
    #[serde(default)]
    pub current_page: Option<u32>,
    /// Last page when reported.
    #[serde(default)]
    pub last_page: Option<u32>,
    /// Page size when reported.
    #[serde(default)]
    pub per_page: Option<u32>,
}

impl<T> Default for Paginated<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            links: Vec::new(),
            from: None,
            to: None,
            total: 0,
            current_page: None,
            last_page: None,
            per_page: None,
        }
    }
}

impl<T> Paginated<T> {
    /// Last page number, derived from `total` and `per_page` when the backend omits it.
    pub fn page_count(&self, fallback_per_page: u32) -> u32 {
        if let Some(last_page) = self.last_page {
            return last_page.max(1);
        }
        let per_page = u64::from(self.per_page.unwrap_or(fallback_per_page).max(1));
        let pages = self.total.div_ceil(per_page);
        u32::try_from(pages).unwrap_or(u32::MAX).max(1)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    #[test]
    fn envelope_parses_minimal_payload_and_derives_page_count() {
        let page: Paginated<Value> = serde_json::from_value(json!({
            "data": [{ "id": 1 }],
            "total": 31,
            "from": 1,
            "to": 15,
        }))
        .expect("envelope");
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.page_count(15), 3);
        assert!(page.links.is_empty());
    }
}
