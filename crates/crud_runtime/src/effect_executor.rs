//! Effect-queue executor for reducer-emitted page effects.

use crud_contract::{Paginated, RelationSource, Row};
use crud_core::{OptionRequest, PageAction, PageEffect};
use crud_host::{
    fetch_options_with, CrudError, CrudRequest, CrudResponse, CrudSettings, Toast,
};
use crud_host_web::release_file;
use leptos::*;

use crate::runtime_context::CrudPageContext;

/// Installs the executor that drains the page effect queue in order.
pub fn install(page: CrudPageContext) {
    // Clear the queue before running so effects dispatched from here enqueue a fresh batch.
    create_effect(move |_| {
        let queued = page.effects.get();
        if queued.is_empty() {
            return;
        }

        page.effects.set(Vec::new());

        for effect in queued {
            run_page_effect(page, effect);
        }
    });
}

/// Decodes a list response into the pagination envelope.
///
/// # Errors
///
/// Returns [`CrudError::Decode`] when the body is not a paginated envelope.
pub fn decode_list(response: CrudResponse) -> Result<Paginated<Row>, CrudError> {
    serde_json::from_value(response.body).map_err(|err| CrudError::Decode(err.to_string()))
}

/// Relation source with its endpoint joined onto the configured API base.
pub fn resolve_relation(settings: &CrudSettings, source: &RelationSource) -> RelationSource {
    RelationSource {
        endpoint: settings.resolve_url(&source.endpoint),
        ..source.clone()
    }
}

fn run_page_effect(page: CrudPageContext, effect: PageEffect) {
    match effect {
        PageEffect::FetchList { request, url, .. } => fetch_list(page, request, url),
        PageEffect::Navigate { query } => page
            .admin
            .host
            .with_value(|host| host.navigator.replace_query(&query)),
        PageEffect::LoadOptions(request) => load_options(page, request),
        PageEffect::Save(request) => send(page, request, PageAction::SubmitFinished),
        PageEffect::Delete(request) => send(page, request, PageAction::DeleteFinished),
        PageEffect::Toast { kind, message } => {
            page.admin
                .host
                .with_value(|host| host.toasts.show(Toast::new(kind, message)));
        }
        PageEffect::Hook { hook, record } => {
            if !page.hooks.with_value(|hooks| hooks.run(hook, record)) {
                logging::log!("crud page hook `{}` has no handler", hook.token());
            }
        }
        PageEffect::CustomAction { action, row } => {
            let token = action.clone();
            if !page.hooks.with_value(|hooks| hooks.custom(action, row)) {
                logging::warn!("custom row action `{token}` has no handler");
            }
        }
        PageEffect::RelationFailed { key, message } => {
            logging::warn!("relation options for `{key}` failed to load: {message}");
        }
        PageEffect::ReleaseFiles(handles) => handles.into_iter().for_each(release_file),
        PageEffect::ResourceChanged { resource } => page.admin.announce_change(resource),
    }
}

fn fetch_list(page: CrudPageContext, request: u64, url: String) {
    let transport = page.admin.host.with_value(|host| host.transport.clone());
    spawn_local(async move {
        let result = transport
            .send(CrudRequest::get(url))
            .await
            .and_then(decode_list);
        if let Err(err) = &result {
            logging::warn!("list fetch failed: {err}");
        }
        page.dispatch_action(PageAction::ListLoaded { request, result });
    });
}

fn load_options(page: CrudPageContext, request: OptionRequest) {
    let transport = page.admin.host.with_value(|host| host.transport.clone());
    let source = page
        .admin
        .settings
        .with_untracked(|settings| resolve_relation(settings, &request.source));
    spawn_local(async move {
        let result = fetch_options_with(transport.as_ref(), &source).await;
        page.dispatch_action(PageAction::OptionsLoaded { request, result });
    });
}

fn send(
    page: CrudPageContext,
    request: CrudRequest,
    finished: fn(Result<CrudResponse, CrudError>) -> PageAction,
) {
    let transport = page.admin.host.with_value(|host| host.transport.clone());
    spawn_local(async move {
        let result = transport.send(request).await;
        if let Err(err) = &result {
            logging::warn!("crud write failed: {err}");
        }
        page.dispatch_action(finished(result));
    });
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn list_bodies_decode_or_report_decode_errors() {
        let response = CrudResponse {
            status: 200,
            body: json!({
                "data": [{ "id": 1, "name": "Acme" }],
                "current_page": 1,
                "last_page": 1,
                "per_page": 15,
                "total": 1,
                "from": 1,
                "to": 1
            }),
        };
        let list = decode_list(response).expect("list");
        assert_eq!(list.total, 1);
        assert_eq!(list.data[0]["name"], "Acme");

        let broken = CrudResponse {
            status: 200,
            body: json!(["not", "paginated"]),
        };
        assert!(matches!(decode_list(broken), Err(CrudError::Decode(_))));
    }

    #[test]
    fn relation_endpoints_join_the_api_base() {
        let settings = CrudSettings {
            api_base_url: "https://api.example.test".into(),
            ..CrudSettings::default()
        };
        let source = RelationSource::new("/api/courts");
        let resolved = resolve_relation(&settings, &source);
        assert_eq!(resolved.endpoint, "https://api.example.test/api/courts");
        assert_eq!(resolved.value_key, source.value_key);

        let absolute = RelationSource::new("https://other.test/api/courts");
        assert_eq!(resolve_relation(&settings, &absolute).endpoint, absolute.endpoint);
    }
}
