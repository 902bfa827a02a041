//! Request, response, and error model for CRUD REST round trips.

use std::collections::BTreeMap;

use crud_contract::FileUpload;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// HTTP verbs used by CRUD endpoints.
pub enum HttpMethod {
    /// List / options.
    Get,
    /// Create, or multipart update with `_method=PUT`.
    Post,
    /// JSON update.
    Put,
    /// Delete.
    Delete,
}

impl HttpMethod {
    /// Wire token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// One multipart form entry.
pub enum MultipartValue {
    /// Text entry.
    Text(String),
    /// File entry resolved through the browser file registry.
    File(FileUpload),
}

#[derive(Debug, Clone, PartialEq)]
/// Request body.
pub enum CrudBody {
    /// `application/json`.
    Json(Value),
    /// `multipart/form-data`, entries in insertion order.
    Multipart(Vec<(String, MultipartValue)>),
}

#[derive(Debug, Clone, PartialEq)]
/// Transport-neutral request.
pub struct CrudRequest {
    /// Verb.
    pub method: HttpMethod,
    /// Path plus query, relative to the API base URL.
    pub url: String,
    /// Optional body.
    pub body: Option<CrudBody>,
}

impl CrudRequest {
    /// `GET url`.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            body: None,
        }
    }

    /// `DELETE url`.
    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Delete,
            url: url.into(),
            body: None,
        }
    }

    /// Request with a body.
    pub fn with_body(method: HttpMethod, url: impl Into<String>, body: CrudBody) -> Self {
        Self {
            method,
            url: url.into(),
            body: Some(body),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Successful response.
pub struct CrudResponse {
    /// HTTP status.
    pub status: u16,
    /// Parsed JSON body (`Null` for empty bodies).
    pub body: Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Server-side validation messages keyed by field.
pub struct ServerErrors(BTreeMap<String, Vec<String>>);

impl ServerErrors {
    /// Parses `{ field: [msg, ...] | msg }`; other shapes yield an empty set.
    pub fn from_json(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return Self::default();
        };
        Self(
            map.iter()
                .filter_map(|(field, messages)| {
                    let messages = match messages {
                        Value::String(message) => vec![message.clone()],
                        Value::Array(items) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect(),
                        _ => Vec::new(),
                    };
                    (!messages.is_empty()).then(|| (field.clone(), messages))
                })
                .collect(),
        )
    }

    /// Adds a message for `field`.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// First message for `field`.
    pub fn first(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(|messages| messages.first()).map(String::as_str)
    }

    /// `(field, first message)` pairs.
    pub fn first_messages(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().filter_map(|(field, messages)| {
            messages
                .first()
                .map(|message| (field.as_str(), message.as_str()))
        })
    }

    /// Every message joined by newlines.
    pub fn concatenated(&self) -> String {
        self.0
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Returns `true` when no field has a message.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
/// Failures of a CRUD round trip.
pub enum CrudError {
    /// 422 response carrying per-field messages.
    #[error("{message}")]
    Validation {
        /// Summary message.
        message: String,
        /// Per-field messages.
        errors: ServerErrors,
    },
    /// Non-success response.
    #[error("request failed with status {status}: {message}")]
    Http {
        /// HTTP status.
        status: u16,
        /// Best-effort message.
        message: String,
        /// Raw error body.
        body: Value,
    },
    /// Network or browser failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),
    /// Response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl CrudError {
    /// Classifies a non-success response.
    pub fn from_response(status: u16, body: Value) -> Self {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .filter(|message| !message.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {status}"));
        let errors = body
            .get("errors")
            .map(ServerErrors::from_json)
            .unwrap_or_default();
        if status == 422 && !errors.is_empty() {
            return Self::Validation { message, errors };
        }
        Self::Http {
            status,
            message,
            body,
        }
    }

    /// Per-field messages, when the failure carries any.
    pub fn field_errors(&self) -> Option<&ServerErrors> {
        match self {
            Self::Validation { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Toast text: `errors.error` when present, else the concatenated messages, else the summary.
    pub fn toast_message(&self) -> String {
        match self {
            Self::Validation { message, errors } => errors
                .first("error")
                .map(str::to_string)
                .or_else(|| Some(errors.concatenated()).filter(|text| !text.is_empty()))
                .unwrap_or_else(|| message.clone()),
            Self::Http { message, body, .. } => {
                let errors = body
                    .get("errors")
                    .map(ServerErrors::from_json)
                    .unwrap_or_default();
                errors
                    .first("error")
                    .map(str::to_string)
                    .or_else(|| Some(errors.concatenated()).filter(|text| !text.is_empty()))
                    .or_else(|| body.get("error").and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_else(|| message.clone())
            }
            Self::Transport(message) | Self::Decode(message) => message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn unprocessable_response_becomes_validation_error() {
        let err = CrudError::from_response(
            422,
            json!({
                "message": "The given data was invalid.",
                "errors": { "name.en": ["The name field is required."], "color": "Bad color" },
            }),
        );
        let errors = err.field_errors().expect("field errors");
        assert_eq!(errors.first("name.en"), Some("The name field is required."));
        assert_eq!(errors.first("color"), Some("Bad color"));
        assert_eq!(
            err.toast_message(),
            "Bad color\nThe name field is required."
        );
    }

    #[test]
    fn toast_prefers_error_key() {
        let err = CrudError::from_response(
            500,
            json!({ "message": "Server Error", "errors": { "error": ["Case type is in use"] } }),
        );
        assert_eq!(err.toast_message(), "Case type is in use");
        assert!(err.field_errors().is_none());
    }

    #[test]
    fn toast_falls_back_to_message_and_status() {
        assert_eq!(
            CrudError::from_response(403, json!({ "message": "Forbidden" })).toast_message(),
            "Forbidden"
        );
        assert_eq!(
            CrudError::from_response(502, Value::Null).toast_message(),
            "HTTP 502"
        );
    }
}
