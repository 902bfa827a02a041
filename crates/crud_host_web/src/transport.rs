//! `fetch`-backed [`CrudTransport`] sending JSON or multipart bodies.

use crud_host::{CrudError, CrudFuture, CrudRequest, CrudResponse, CrudTransport};

#[derive(Debug, Clone, Copy, Default)]
/// Browser transport using `window.fetch` with same-origin credentials.
///
/// Non-success statuses are classified through [`CrudError::from_response`] so `422` bodies keep
/// their per-field messages.
pub struct WebCrudTransport;

impl CrudTransport for WebCrudTransport {
    fn send<'a>(&'a self, request: CrudRequest) -> CrudFuture<'a, Result<CrudResponse, CrudError>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            {
                imp::send(request).await
            }

            #[cfg(not(target_arch = "wasm32"))]
            {
                Err(CrudError::Transport(format!(
                    "browser fetch is only available when compiled for wasm32 ({} {})",
                    request.method.as_str(),
                    request.url
                )))
            }
        })
    }
}

#[cfg(target_arch = "wasm32")]
mod imp {
    use crud_host::{CrudBody, CrudError, CrudRequest, CrudResponse, MultipartValue};
    use serde_json::Value;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{FormData, Headers, Request, RequestCredentials, RequestInit, Response};

    fn js_error(err: JsValue) -> CrudError {
        if let Some(text) = err.as_string() {
            return CrudError::Transport(text);
        }
        if let Ok(message) = js_sys::Reflect::get(&err, &JsValue::from_str("message")) {
            if let Some(text) = message.as_string() {
                return CrudError::Transport(text);
            }
        }
        CrudError::Transport(format!("{err:?}"))
    }

    fn form_data(entries: &[(String, MultipartValue)]) -> Result<FormData, CrudError> {
        let form = FormData::new().map_err(js_error)?;
        for (name, value) in entries {
            match value {
                MultipartValue::Text(text) => form.append_with_str(name, text).map_err(js_error)?,
                MultipartValue::File(upload) => {
                    let file = crate::files::lookup_file(upload.handle).ok_or_else(|| {
                        CrudError::Transport(format!(
                            "file `{}` is no longer available",
                            upload.file_name
                        ))
                    })?;
                    form.append_with_blob_and_filename(name, &file, &upload.file_name)
                        .map_err(js_error)?;
                }
            }
        }
        Ok(form)
    }

    pub(super) async fn send(request: CrudRequest) -> Result<CrudResponse, CrudError> {
        let headers = Headers::new().map_err(js_error)?;
        headers.set("Accept", "application/json").map_err(js_error)?;
        headers
            .set("X-Requested-With", "XMLHttpRequest")
            .map_err(js_error)?;

        let init = RequestInit::new();
        init.set_method(request.method.as_str());
        init.set_credentials(RequestCredentials::SameOrigin);
        match &request.body {
            Some(CrudBody::Json(value)) => {
                headers
                    .set("Content-Type", "application/json")
                    .map_err(js_error)?;
                let raw =
                    serde_json::to_string(value).map_err(|e| CrudError::Decode(e.to_string()))?;
                init.set_body(&JsValue::from_str(&raw));
            }
            // The browser sets the multipart boundary header itself.
            Some(CrudBody::Multipart(entries)) => init.set_body(&form_data(entries)?.into()),
            None => {}
        }
        init.set_headers(&headers.into());

        let fetch_request =
            Request::new_with_str_and_init(&request.url, &init).map_err(js_error)?;
        let window =
            web_sys::window().ok_or_else(|| CrudError::Transport("window unavailable".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_request(&fetch_request))
            .await
            .map_err(js_error)?
            .dyn_into()
            .map_err(js_error)?;

        let status = response.status();
        let text = JsFuture::from(response.text().map_err(js_error)?)
            .await
            .map_err(js_error)?
            .as_string()
            .unwrap_or_default();
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        if response.ok() {
            Ok(CrudResponse { status, body })
        } else {
            Err(CrudError::from_response(status, body))
        }
    }
}
