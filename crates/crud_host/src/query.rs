//! List query encoding shared by the list fetch and the address bar.

use std::collections::BTreeMap;

use crud_contract::{SortDirection, SortState};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

const RESERVED_KEYS: [&str; 5] = ["search", "page", "per_page", "sort_field", "sort_direction"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Search, filter, sort, and pagination state of a list page.
pub struct ListQuery {
    /// Free-text search; empty means none.
    pub search: String,
    /// 1-based page.
    pub page: u32,
    /// Page size.
    pub per_page: u32,
    /// Active sort.
    pub sort: Option<SortState>,
    /// Filter values by key; empty values are not sent.
    pub filters: BTreeMap<String, String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::with_per_page(15)
    }
}

impl ListQuery {
    /// First page with the given page size.
    pub fn with_per_page(per_page: u32) -> Self {
        Self {
            search: String::new(),
            page: 1,
            per_page: per_page.max(1),
            sort: None,
            filters: BTreeMap::new(),
        }
    }

    /// Query pairs in wire order: `search, page, per_page, sort_field, sort_direction, filters`.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.search.trim().is_empty() {
            pairs.push(("search".to_string(), self.search.trim().to_string()));
        }
        pairs.push(("page".to_string(), self.page.max(1).to_string()));
        pairs.push(("per_page".to_string(), self.per_page.max(1).to_string()));
        if let Some(sort) = &self.sort {
            pairs.push(("sort_field".to_string(), sort.field.clone()));
            pairs.push((
                "sort_direction".to_string(),
                sort.direction.token().to_string(),
            ));
        }
        pairs.extend(
            self.filters
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        pairs
    }

    /// URL-encoded query string without the leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_pairs() {
            serializer.append_pair(&key, &value);
        }
        serializer.finish()
    }

    /// Restores a query from a query string (leading `?` optional).
    ///
    /// Unknown keys become filters; malformed numbers fall back to `defaults`.
    pub fn from_query_string(raw: &str, defaults: &Self) -> Self {
        let mut query = defaults.clone();
        let mut sort_field = None;
        let mut sort_direction = None;
        for (key, value) in form_urlencoded::parse(raw.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "search" => query.search = value.into_owned(),
                "page" => {
                    query.page = value.parse().ok().filter(|page| *page > 0).unwrap_or(query.page)
                }
                "per_page" => {
                    query.per_page = value
                        .parse()
                        .ok()
                        .filter(|per_page| *per_page > 0)
                        .unwrap_or(query.per_page)
                }
                "sort_field" => sort_field = Some(value.into_owned()),
                "sort_direction" => sort_direction = SortDirection::parse(&value),
                other if !RESERVED_KEYS.contains(&other) && !value.is_empty() => {
                    query.filters.insert(other.to_string(), value.into_owned());
                }
                _ => {}
            }
        }
        if let Some(field) = sort_field.filter(|field| !field.is_empty()) {
            query.sort = Some(SortState {
                field,
                direction: sort_direction.unwrap_or_default(),
            });
        }
        query
    }

    /// `endpoint?query`, appending with `&` when the endpoint already has a query.
    pub fn list_url(&self, endpoint: &str) -> String {
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!("{endpoint}{separator}{}", self.to_query_string())
    }

    /// Merges a filter delta; empty values remove the filter. Resets to page 1.
    pub fn merge_filters(&mut self, delta: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in delta {
            if value.is_empty() {
                self.filters.remove(&key);
            } else {
                self.filters.insert(key, value);
            }
        }
        self.page = 1;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn query_string_uses_wire_order_and_encodes_values() {
        let mut query = ListQuery::with_per_page(15);
        query.search = "أحمد & co".into();
        query.page = 2;
        query.sort = Some(SortState {
            field: "created_at".into(),
            direction: SortDirection::Desc,
        });
        query.filters.insert("status".into(), "open".into());
        query.filters.insert("court_id".into(), String::new());

        let encoded = query.to_query_string();
        assert!(encoded.starts_with("search="));
        assert!(encoded
            .ends_with("page=2&per_page=15&sort_field=created_at&sort_direction=desc&status=open"));
        assert!(!encoded.contains("court_id"));

        let restored = ListQuery::from_query_string(&format!("?{encoded}"), &ListQuery::default());
        query.filters.remove("court_id");
        assert_eq!(restored, query);
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let defaults = ListQuery::with_per_page(25);
        let restored =
            ListQuery::from_query_string("page=abc&per_page=0&sort_direction=up", &defaults);
        assert_eq!(restored.page, 1);
        assert_eq!(restored.per_page, 25);
        assert_eq!(restored.sort, None);
    }

    #[test]
    fn merging_filters_resets_page_and_drops_empty_values() {
        let mut query = ListQuery::default();
        query.page = 4;
        query.filters.insert("status".into(), "open".into());
        query.merge_filters([
            ("status".to_string(), String::new()),
            ("client_id".to_string(), "9".to_string()),
        ]);
        assert_eq!(query.page, 1);
        assert_eq!(
            query.list_url("/api/cases"),
            "/api/cases?page=1&per_page=15&client_id=9"
        );
        assert_eq!(
            query.list_url("/api/cases?archived=1"),
            "/api/cases?archived=1&page=1&per_page=15&client_id=9"
        );
    }
}
