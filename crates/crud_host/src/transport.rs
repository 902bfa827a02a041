//! CRUD transport contract, in-memory REST adapter, and typed fetch helpers.

use std::{
    cell::RefCell, cmp::Ordering, collections::BTreeMap, future::Future, pin::Pin, rc::Rc,
};

use crud_contract::{
    resolve_json_text, Paginated, RelationSource, Row, SelectOption, SortDirection,
    TranslatableValue,
};
use serde_json::{json, Map, Value};
use url::form_urlencoded;

use crate::{
    http::{CrudBody, CrudError, CrudRequest, CrudResponse, HttpMethod, MultipartValue},
    query::ListQuery,
};

/// Object-safe boxed future used by [`CrudTransport`].
pub type CrudFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service performing CRUD round trips against the REST backend.
pub trait CrudTransport {
    /// Sends one request.
    ///
    /// Non-success statuses resolve to [`CrudError::from_response`].
    fn send<'a>(&'a self, request: CrudRequest) -> CrudFuture<'a, Result<CrudResponse, CrudError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Transport for targets without a backend; every request fails.
pub struct NoopCrudTransport;

impl CrudTransport for NoopCrudTransport {
    fn send<'a>(&'a self, request: CrudRequest) -> CrudFuture<'a, Result<CrudResponse, CrudError>> {
        Box::pin(async move {
            Err(CrudError::Transport(format!(
                "no transport configured for {} {}",
                request.method.as_str(),
                request.url
            )))
        })
    }
}

#[derive(Debug, Default)]
struct MemoryBackend {
    collections: BTreeMap<String, Vec<Row>>,
    next_id: u64,
    fail_next: Option<CrudError>,
    requests: Vec<CrudRequest>,
}

#[derive(Debug, Clone, Default)]
/// In-memory REST backend used by tests and the offline demo.
///
/// Collections are keyed by endpoint path. List requests carrying a `page` parameter answer with
/// the paginated envelope; other list requests answer `{ data: [...] }` like relation endpoints.
pub struct MemoryCrudTransport {
    inner: Rc<RefCell<MemoryBackend>>,
}

impl MemoryCrudTransport {
    /// Seeds `endpoint` with rows; ids continue after the largest numeric `id` seen.
    pub fn with_collection(self, endpoint: impl Into<String>, rows: Vec<Row>) -> Self {
        {
            let mut backend = self.inner.borrow_mut();
            let max_id = rows
                .iter()
                .filter_map(|row| row.get("id").and_then(Value::as_u64))
                .max()
                .unwrap_or(0);
            backend.next_id = backend.next_id.max(max_id);
            backend.collections.insert(endpoint.into(), rows);
        }
        self
    }

    /// Makes the next request fail with `error`.
    pub fn fail_next(&self, error: CrudError) {
        self.inner.borrow_mut().fail_next = Some(error);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<CrudRequest> {
        self.inner.borrow().requests.clone()
    }

    /// Current rows of `endpoint`.
    pub fn rows(&self, endpoint: &str) -> Vec<Row> {
        self.inner
            .borrow()
            .collections
            .get(endpoint)
            .cloned()
            .unwrap_or_default()
    }

    fn handle(&self, request: CrudRequest) -> Result<CrudResponse, CrudError> {
        let mut backend = self.inner.borrow_mut();
        backend.requests.push(request.clone());
        if let Some(error) = backend.fail_next.take() {
            return Err(error);
        }

        let (path, raw_query) = request
            .url
            .split_once('?')
            .unwrap_or((request.url.as_str(), ""));
        let params: Vec<(String, String)> = form_urlencoded::parse(raw_query.as_bytes())
            .into_owned()
            .collect();
        let method = match (request.method, params.iter().find(|(key, _)| key == "_method")) {
            (HttpMethod::Post, Some((_, spoofed))) if spoofed.eq_ignore_ascii_case("put") => {
                HttpMethod::Put
            }
            (method, _) => method,
        };

        if backend.collections.contains_key(path) {
            return match method {
                HttpMethod::Get => {
                    let rows = backend.collections.get(path).cloned().unwrap_or_default();
                    Ok(list_response(rows, raw_query, &params))
                }
                HttpMethod::Post => {
                    let mut record = body_to_json(request.body.as_ref());
                    backend.next_id += 1;
                    record.insert("id".to_string(), json!(backend.next_id));
                    let row = Value::Object(record);
                    if let Some(rows) = backend.collections.get_mut(path) {
                        rows.push(row.clone());
                    }
                    Ok(CrudResponse {
                        status: 201,
                        body: json!({ "data": row }),
                    })
                }
                _ => Err(not_found(path)),
            };
        }

        let Some((collection, id)) = path.rsplit_once('/') else {
            return Err(not_found(path));
        };
        let Some(rows) = backend.collections.get_mut(collection) else {
            return Err(not_found(path));
        };
        let Some(position) = rows.iter().position(|row| row_id(row).as_deref() == Some(id)) else {
            return Err(not_found(path));
        };
        match method {
            HttpMethod::Get => Ok(CrudResponse {
                status: 200,
                body: json!({ "data": rows[position] }),
            }),
            HttpMethod::Put => {
                let changes = body_to_json(request.body.as_ref());
                if let Value::Object(existing) = &mut rows[position] {
                    for (key, value) in changes {
                        if key != "id" && key != "_method" {
                            existing.insert(key, value);
                        }
                    }
                }
                Ok(CrudResponse {
                    status: 200,
                    body: json!({ "data": rows[position] }),
                })
            }
            HttpMethod::Delete => {
                rows.remove(position);
                Ok(CrudResponse {
                    status: 200,
                    body: json!({ "message": "Deleted" }),
                })
            }
            HttpMethod::Post => Err(not_found(path)),
        }
    }
}

impl CrudTransport for MemoryCrudTransport {
    fn send<'a>(&'a self, request: CrudRequest) -> CrudFuture<'a, Result<CrudResponse, CrudError>> {
        Box::pin(async move { self.handle(request) })
    }
}

fn not_found(path: &str) -> CrudError {
    CrudError::from_response(404, json!({ "message": format!("No query results for {path}") }))
}

fn row_id(row: &Row) -> Option<String> {
    match row.get("id")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

fn searchable_text(value: &Value) -> String {
    match value {
        Value::Object(map) => map.values().map(searchable_text).collect::<Vec<_>>().join(" "),
        Value::Array(items) => items.iter().map(searchable_text).collect::<Vec<_>>().join(" "),
        other => resolve_json_text(other, "en").unwrap_or_default(),
    }
}

fn compare_cells(left: Option<&Value>, right: Option<&Value>) -> Ordering {
    match (left, right) {
        (Some(Value::Number(left)), Some(Value::Number(right))) => left
            .as_f64()
            .partial_cmp(&right.as_f64())
            .unwrap_or(Ordering::Equal),
        (left, right) => {
            let text = |value: Option<&Value>| {
                value
                    .and_then(|value| resolve_json_text(value, "en"))
                    .unwrap_or_default()
                    .to_lowercase()
            };
            text(left).cmp(&text(right))
        }
    }
}

fn list_response(mut rows: Vec<Row>, raw_query: &str, params: &[(String, String)]) -> CrudResponse {
    let has_page = params.iter().any(|(key, _)| key == "page");
    let query = ListQuery::from_query_string(raw_query, &ListQuery::default());

    let needle = query.search.trim().to_lowercase();
    if !needle.is_empty() {
        rows.retain(|row| searchable_text(row).to_lowercase().contains(&needle));
    }
    for (key, expected) in &query.filters {
        if key == "_method" {
            continue;
        }
        rows.retain(|row| {
            row.get(key)
                .and_then(|value| resolve_json_text(value, "en"))
                .is_some_and(|actual| &actual == expected)
        });
    }
    if let Some(sort) = &query.sort {
        rows.sort_by(|left, right| {
            let ordering = compare_cells(left.get(&sort.field), right.get(&sort.field));
            match sort.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    if !has_page {
        return CrudResponse {
            status: 200,
            body: json!({ "data": rows }),
        };
    }

    let total = rows.len() as u64;
    let per_page = u64::from(query.per_page.max(1));
    let last_page = total.div_ceil(per_page).max(1);
    let start = (u64::from(query.page.max(1)) - 1) * per_page;
    let data: Vec<Row> = rows
        .into_iter()
        .skip(start as usize)
        .take(per_page as usize)
        .collect();
    let (from, to) = if data.is_empty() {
        (Value::Null, Value::Null)
    } else {
        (json!(start + 1), json!(start + data.len() as u64))
    };
    CrudResponse {
        status: 200,
        body: json!({
            "data": data,
            "links": [],
            "from": from,
            "to": to,
            "total": total,
            "current_page": query.page,
            "last_page": last_page,
            "per_page": per_page,
        }),
    }
}

/// Flattens a request body into a JSON object, folding `key[sub]` and `key[]` multipart names.
fn body_to_json(body: Option<&CrudBody>) -> Map<String, Value> {
    match body {
        Some(CrudBody::Json(Value::Object(map))) => map.clone(),
        Some(CrudBody::Json(_)) | None => Map::new(),
        Some(CrudBody::Multipart(entries)) => {
            let mut out = Map::new();
            for (name, value) in entries {
                let value = match value {
                    MultipartValue::Text(text) => Value::String(text.clone()),
                    MultipartValue::File(upload) => json!({
                        "name": upload.file_name,
                        "type": upload.mime_type,
                        "size": upload.size_bytes,
                    }),
                };
                if let Some(key) = name.strip_suffix("[]") {
                    if let Value::Array(items) = out
                        .entry(key.to_string())
                        .or_insert_with(|| Value::Array(Vec::new()))
                    {
                        items.push(value);
                    }
                } else if let Some((key, sub)) = name
                    .strip_suffix(']')
                    .and_then(|name| name.split_once('['))
                {
                    if let Value::Object(nested) = out
                        .entry(key.to_string())
                        .or_insert_with(|| Value::Object(Map::new()))
                    {
                        nested.insert(sub.to_string(), value);
                    }
                } else {
                    out.insert(name.clone(), value);
                }
            }
            out
        }
    }
}

/// Fetches one page of rows.
///
/// # Errors
///
/// Returns transport errors, or [`CrudError::Decode`] when the envelope does not parse.
pub async fn fetch_list_with<T: CrudTransport + ?Sized>(
    transport: &T,
    endpoint: &str,
    query: &ListQuery,
) -> Result<Paginated<Row>, CrudError> {
    let response = transport.send(CrudRequest::get(query.list_url(endpoint))).await?;
    serde_json::from_value(response.body).map_err(|e| CrudError::Decode(e.to_string()))
}

/// Parses a relation response (`[...]` or `{ data: [...] }`) into options.
///
/// Values come from `value_key`, then `id`, then `value`; labels from `label_key`, then `name`,
/// then `label`. Items without a usable value are skipped.
///
/// # Errors
///
/// Returns [`CrudError::Decode`] when the body holds no list.
pub fn parse_relation_options(
    source: &RelationSource,
    body: &Value,
) -> Result<Vec<SelectOption>, CrudError> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("data") {
            Some(Value::Array(items)) => items,
            _ => return Err(CrudError::Decode("relation response has no data list".into())),
        },
        _ => return Err(CrudError::Decode("relation response is not a list".into())),
    };
    Ok(items
        .iter()
        .filter_map(|item| {
            let value = [source.value_key.as_str(), "id", "value"]
                .into_iter()
                .find_map(|key| item.get(key).and_then(|value| resolve_json_text(value, "en")))?;
            let label = [source.label_key.as_str(), "name", "label"]
                .into_iter()
                .find_map(|key| item.get(key).and_then(TranslatableValue::from_json))
                .unwrap_or_else(|| TranslatableValue::Plain(value.clone()));
            Some(SelectOption::new(value, label))
        })
        .collect())
}

/// Fetches relation options for a select-like field.
///
/// # Errors
///
/// Returns transport or decode errors; callers apply their relation-failure policy.
pub async fn fetch_options_with<T: CrudTransport + ?Sized>(
    transport: &T,
    source: &RelationSource,
) -> Result<Vec<SelectOption>, CrudError> {
    let response = transport.send(CrudRequest::get(source.endpoint.clone())).await?;
    parse_relation_options(source, &response.body)
}

#[cfg(test)]
mod tests {
    use crud_contract::{FileUpload, SortState};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    fn case_types() -> MemoryCrudTransport {
        MemoryCrudTransport::default().with_collection(
            "/api/case-types",
            (1..=20)
                .map(|id| {
                    json!({
                        "id": id,
                        "name": { "en": format!("Type {id:02}"), "ar": format!("نوع {id}") },
                        "is_active": id % 2 == 0,
                    })
                })
                .collect(),
        )
    }

    #[test]
    fn memory_transport_paginates_sorts_and_filters() {
        let transport = case_types();
        let mut query = ListQuery::with_per_page(5);
        query.page = 2;
        query.sort = Some(SortState {
            field: "id".into(),
            direction: SortDirection::Desc,
        });
        query.filters.insert("is_active".into(), "true".into());

        let page = block_on(fetch_list_with(&transport, "/api/case-types", &query)).expect("list");
        assert_eq!(page.total, 10);
        assert_eq!(page.from, Some(6));
        assert_eq!(page.last_page, Some(2));
        let ids: Vec<u64> = page
            .data
            .iter()
            .filter_map(|row| row["id"].as_u64())
            .collect();
        assert_eq!(ids, vec![10, 8, 6, 4, 2]);
    }

    #[test]
    fn memory_transport_searches_translated_values() {
        let transport = case_types();
        let mut query = ListQuery::default();
        query.search = "نوع 7".into();
        let page = block_on(fetch_list_with(&transport, "/api/case-types", &query)).expect("list");
        assert_eq!(page.total, 1);
        assert_eq!(page.data[0]["id"], json!(7));
    }

    #[test]
    fn multipart_update_with_method_spoofing_merges_fields() {
        let transport = case_types();
        let request = CrudRequest::with_body(
            HttpMethod::Post,
            "/api/case-types/3?_method=PUT",
            CrudBody::Multipart(vec![
                ("name[en]".into(), MultipartValue::Text("Civil".into())),
                ("name[ar]".into(), MultipartValue::Text("مدني".into())),
                ("tags[]".into(), MultipartValue::Text("a".into())),
                (
                    "icon".into(),
                    MultipartValue::File(FileUpload {
                        file_name: "icon.png".into(),
                        mime_type: "image/png".into(),
                        size_bytes: 42,
                        handle: 1,
                    }),
                ),
            ]),
        );
        let response = block_on(transport.send(request)).expect("update");
        assert_eq!(response.body["data"]["name"], json!({ "en": "Civil", "ar": "مدني" }));
        assert_eq!(response.body["data"]["tags"], json!(["a"]));
        assert_eq!(response.body["data"]["icon"]["size"], json!(42));
    }

    #[test]
    fn create_assigns_next_id_and_delete_missing_row_is_not_found() {
        let transport = case_types();
        let created = block_on(transport.send(CrudRequest::with_body(
            HttpMethod::Post,
            "/api/case-types",
            CrudBody::Json(json!({ "name": "Labor" })),
        )))
        .expect("create");
        assert_eq!(created.status, 201);
        assert_eq!(created.body["data"]["id"], json!(21));

        let err = block_on(transport.send(CrudRequest::delete("/api/case-types/99"))).unwrap_err();
        assert!(matches!(err, CrudError::Http { status: 404, .. }));
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn fail_next_applies_once() {
        let transport = case_types();
        transport.fail_next(CrudError::Transport("offline".into()));
        let source = RelationSource::new("/api/case-types");
        assert!(block_on(fetch_options_with(&transport, &source)).is_err());
        let options = block_on(fetch_options_with(&transport, &source)).expect("options");
        assert_eq!(options.len(), 20);
        assert_eq!(options[0].value, "1");
        assert_eq!(options[0].label.resolve("ar"), "نوع 1");
    }

    #[test]
    fn relation_options_accept_bare_arrays_and_alternate_keys() {
        let source = RelationSource::new("/api/statuses");
        let options = parse_relation_options(
            &source,
            &json!([
                { "value": "open", "label": "Open" },
                { "id": 2, "name": "Closed" },
                { "label": "no value" },
            ]),
        )
        .expect("options");
        assert_eq!(
            options,
            vec![SelectOption::new("open", "Open"), SelectOption::new("2", "Closed")]
        );
        assert!(parse_relation_options(&source, &json!({ "rows": [] })).is_err());
    }
}
