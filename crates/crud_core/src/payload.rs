//! Request payload shaping: translation keys, entity-specific shapes, JSON vs multipart.

use crud_contract::{FieldValue, FormData, Row, SUPPORTED_LOCALES};
use crud_host::{CrudBody, CrudRequest, HttpMethod, MultipartValue};
use serde_json::{Map, Value};

/// Key carrying role permissions.
pub const PERMISSIONS_KEY: &str = "permissions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Entity-specific payload shape.
pub enum PayloadShape {
    /// Values sent as entered.
    #[default]
    Generic,
    /// `permissions` normalized to a list of permission names.
    Roles,
    /// `permissions` sent as a `{ "0": name, "1": name }` map.
    NumericPermissionMap,
}

/// Record id as text (numeric or string `id`).
pub fn record_id(row: &Row) -> Option<String> {
    match row.get("id")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Splits `name.en` into `("name", "en")` for supported locales.
pub fn split_translation_key(key: &str) -> Option<(&str, &str)> {
    let (base, locale) = key.rsplit_once('.')?;
    (!base.is_empty() && SUPPORTED_LOCALES.contains(&locale)).then_some((base, locale))
}

/// Converts a row into form data, flattening `{ en, ar }` objects into `key.en` / `key.ar`.
pub fn flatten_translations(row: &Row) -> FormData {
    let Value::Object(map) = row else {
        return FormData::new();
    };
    let mut data = FormData::new();
    for (key, value) in map {
        if crud_contract::is_translatable_object(value) {
            for locale in SUPPORTED_LOCALES {
                let text = value
                    .get(locale)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                data.set(format!("{key}.{locale}"), FieldValue::Text(text));
            }
        } else {
            data.set(key.clone(), FieldValue::from_json(value));
        }
    }
    data
}

/// Permission names from a role's `permissions` value (names, ids, or `{ id, name }` objects).
pub fn permission_names(value: &FieldValue) -> Vec<String> {
    match value {
        FieldValue::Json(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(name) => Some(name.clone()),
                Value::Number(id) => Some(id.to_string()),
                Value::Object(map) => map
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .or_else(|| map.get("id").map(|id| id.to_string())),
                _ => None,
            })
            .collect(),
        other => other.clone().into_list(),
    }
}

fn apply_shape(mut payload: FormData, shape: PayloadShape) -> FormData {
    let Some(permissions) = payload.get(PERMISSIONS_KEY).cloned() else {
        return payload;
    };
    match shape {
        PayloadShape::Generic => {}
        PayloadShape::Roles => {
            payload.set(PERMISSIONS_KEY, FieldValue::List(permission_names(&permissions)));
        }
        PayloadShape::NumericPermissionMap => {
            let map: Map<String, Value> = permission_names(&permissions)
                .into_iter()
                .enumerate()
                .map(|(index, name)| (index.to_string(), Value::String(name)))
                .collect();
            payload.set(PERMISSIONS_KEY, FieldValue::Json(Value::Object(map)));
        }
    }
    payload
}

/// JSON body with translation keys nested back into `{ en, ar }` objects.
pub fn json_body(payload: &FormData) -> Value {
    let mut body = Map::new();
    for (key, value) in payload.iter() {
        match split_translation_key(key) {
            Some((base, locale)) => {
                let entry = body
                    .entry(base.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !entry.is_object() {
                    *entry = Value::Object(Map::new());
                }
                if let Value::Object(translations) = entry {
                    translations.insert(locale.to_string(), value.to_json());
                }
            }
            None => {
                if !body.contains_key(key) {
                    body.insert(key.clone(), value.to_json());
                }
            }
        }
    }
    Value::Object(body)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => Some(String::new()),
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(if *flag { "1" } else { "0" }.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn push_json(entries: &mut Vec<(String, MultipartValue)>, name: &str, value: &Value) {
    match value {
        Value::Array(items) => {
            for item in items {
                push_json(entries, &format!("{name}[]"), item);
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                push_json(entries, &format!("{name}[{key}]"), item);
            }
        }
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                entries.push((name.to_string(), MultipartValue::Text(text)));
            }
        }
    }
}

/// Multipart entries: `name[en]` for translations, `key[]` for lists, booleans as `1`/`0`.
pub fn multipart_entries(payload: &FormData) -> Vec<(String, MultipartValue)> {
    let mut entries = Vec::new();
    for (key, value) in payload.iter() {
        let name = match split_translation_key(key) {
            Some((base, locale)) => format!("{base}[{locale}]"),
            None => key.clone(),
        };
        match value {
            FieldValue::File(upload) => entries.push((name, MultipartValue::File(upload.clone()))),
            FieldValue::List(items) => entries.extend(
                items
                    .iter()
                    .map(|item| (format!("{name}[]"), MultipartValue::Text(item.clone()))),
            ),
            other => push_json(&mut entries, &name, &other.to_json()),
        }
    }
    entries
}

/// Builds the create (`id == None`) or update request.
///
/// Multipart bodies update through `POST {endpoint}/{id}?_method=PUT`; JSON bodies use `POST` to
/// create and `PUT {endpoint}/{id}` to update.
pub fn build_submit_request(
    endpoint: &str,
    id: Option<&str>,
    payload: FormData,
    shape: PayloadShape,
    multipart: bool,
) -> CrudRequest {
    let payload = apply_shape(payload, shape);
    let endpoint = endpoint.trim_end_matches('/');
    match (id, multipart) {
        (None, false) => {
            CrudRequest::with_body(HttpMethod::Post, endpoint, CrudBody::Json(json_body(&payload)))
        }
        (Some(id), false) => CrudRequest::with_body(
            HttpMethod::Put,
            format!("{endpoint}/{}", urlencoding::encode(id)),
            CrudBody::Json(json_body(&payload)),
        ),
        (None, true) => CrudRequest::with_body(
            HttpMethod::Post,
            endpoint,
            CrudBody::Multipart(multipart_entries(&payload)),
        ),
        (Some(id), true) => CrudRequest::with_body(
            HttpMethod::Post,
            format!("{endpoint}/{}?_method=PUT", urlencoding::encode(id)),
            CrudBody::Multipart(multipart_entries(&payload)),
        ),
    }
}

/// `DELETE {endpoint}/{id}`.
pub fn build_delete_request(endpoint: &str, id: &str) -> CrudRequest {
    CrudRequest::delete(format!(
        "{}/{}",
        endpoint.trim_end_matches('/'),
        urlencoding::encode(id)
    ))
}

#[cfg(test)]
mod tests {
    use crud_contract::FileUpload;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn translations_flatten_for_editing_and_nest_for_json() {
        let row = json!({ "id": 4, "name": { "en": "Civil", "ar": null }, "color": "#ff0000" });
        let data = flatten_translations(&row);
        assert_eq!(data.get("name.en"), Some(&FieldValue::text("Civil")));
        assert_eq!(data.get("name.ar"), Some(&FieldValue::text("")));
        assert!(!data.contains("name"));

        let request = build_submit_request(
            "/api/case-types/",
            Some("4"),
            data,
            PayloadShape::Generic,
            false,
        );
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url, "/api/case-types/4");
        assert_eq!(
            request.body,
            Some(CrudBody::Json(json!({
                "id": 4,
                "name": { "en": "Civil", "ar": "" },
                "color": "#ff0000",
            })))
        );
    }

    #[test]
    fn role_permissions_normalize_to_names() {
        let mut data = FormData::new();
        data.set("name", "Paralegal");
        data.set(
            PERMISSIONS_KEY,
            FieldValue::Json(json!([{ "id": 1, "name": "view-any-cases" }, "manage-own-tasks", 9])),
        );
        let roles =
            build_submit_request("/api/roles", None, data.clone(), PayloadShape::Roles, false);
        assert_eq!(
            roles.body,
            Some(CrudBody::Json(json!({
                "name": "Paralegal",
                "permissions": ["view-any-cases", "manage-own-tasks", "9"],
            })))
        );

        let numeric = build_submit_request(
            "/api/roles",
            None,
            data,
            PayloadShape::NumericPermissionMap,
            true,
        );
        let Some(CrudBody::Multipart(entries)) = numeric.body else {
            panic!("multipart body expected");
        };
        assert!(entries.contains(&(
            "permissions[1]".to_string(),
            MultipartValue::Text("manage-own-tasks".into())
        )));
    }

    #[test]
    fn multipart_update_spoofs_put_and_encodes_values() {
        let mut data = FormData::new();
        data.set("title.en", "Hearing");
        data.set("is_urgent", true);
        data.set("lawyer_ids", FieldValue::List(vec!["3".into(), "7".into()]));
        data.set("notes", FieldValue::Empty);
        let upload = FileUpload {
            file_name: "minutes.pdf".into(),
            mime_type: "application/pdf".into(),
            size_bytes: 5,
            handle: 2,
        };
        data.set("minutes", FieldValue::File(upload.clone()));

        let request = build_submit_request(
            "/api/hearings",
            Some("15"),
            data,
            PayloadShape::Generic,
            true,
        );
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "/api/hearings/15?_method=PUT");
        assert_eq!(
            request.body,
            Some(CrudBody::Multipart(vec![
                ("is_urgent".into(), MultipartValue::Text("1".into())),
                ("lawyer_ids[]".into(), MultipartValue::Text("3".into())),
                ("lawyer_ids[]".into(), MultipartValue::Text("7".into())),
                ("minutes".into(), MultipartValue::File(upload)),
                ("notes".into(), MultipartValue::Text(String::new())),
                ("title[en]".into(), MultipartValue::Text("Hearing".into())),
            ]))
        );
    }

    #[test]
    fn delete_and_record_ids() {
        assert_eq!(record_id(&json!({ "id": 5 })).as_deref(), Some("5"));
        assert_eq!(record_id(&json!({ "id": "" })), None);
        assert_eq!(build_delete_request("/api/tasks", "5").url, "/api/tasks/5");
        assert_eq!(split_translation_key("client.name"), None);
        assert_eq!(split_translation_key("name.ar"), Some(("name", "ar")));
    }
}
