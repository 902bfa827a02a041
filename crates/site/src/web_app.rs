use std::rc::Rc;

use admin_ui::{Button, ButtonSize, ButtonVariant, Cluster, EmptyState, IconName, LayoutGap};
use crud_contract::{GlobalEvent, PermissionSet, QuickActionKey, SUPPORTED_LOCALES};
use crud_core::PageConfig;
use crud_host::{CrudSettings, Toast, ToastKind, ToastService};
use crud_host_web::build_host_services;
use crud_runtime::{
    use_admin, AdminProvider, PageCrud, PageHooks, QuickActionHost, Renderers,
    SignalToastService, ToastHost,
};
use leptos::*;
use leptos_meta::*;
use leptos_router::*;
use serde_json::Value;

use crate::{
    demo_backend::seeded_backend,
    pages::{all_pages, ARCHIVE_ACTION, PERMISSION_COUNT_CELL},
};

/// Grants of the signed-in demo viewer.
const VIEWER_PERMISSIONS: [&str; 7] = [
    "manage-case-types",
    "manage-clients",
    "view-any-hearings",
    "manage-own-hearings",
    "view-roles",
    "create-roles",
    "edit-roles",
];
const VIEWER_ID: &str = "1";

fn viewer_permissions() -> PermissionSet {
    let (permissions, rejected) = PermissionSet::from_names(VIEWER_PERMISSIONS);
    for name in rejected {
        logging::warn!("ignoring unknown permission `{name}`");
    }
    permissions
}

fn route_path(config: &PageConfig) -> String {
    format!("/{}", config.resource)
}

fn permission_count(value: &Value) -> String {
    match value {
        Value::Array(items) => items.len().to_string(),
        Value::Object(map) => map.len().to_string(),
        _ => "0".to_string(),
    }
}

fn locale_label(locale: &str) -> &'static str {
    match locale {
        "ar" => "العربية",
        _ => "English",
    }
}

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    let toasts = SignalToastService::new(CrudSettings::default().toast_timeout_ms);
    let host_services = build_host_services(Rc::new(toasts), seeded_backend);

    let pages = match all_pages() {
        Ok(pages) => pages,
        Err(err) => {
            logging::error!("admin pages failed to build: {err}");
            return view! {
                <EmptyState>{format!("Admin pages failed to build: {err}")}</EmptyState>
            }
            .into_view();
        }
    };
    let pages = store_value(pages);

    view! {
        <Title text="Admin" />
        <Meta name="description" content="Declarative CRUD administration screens." />

        <Router>
            <AdminProvider
                host_services
                toasts
                permissions=viewer_permissions()
                viewer_id=VIEWER_ID
            >
                <AdminShell pages=pages.get_value() toasts />
            </AdminProvider>
        </Router>
        <ToastHost service=toasts />
    }
    .into_view()
}

#[component]
fn AdminShell(pages: Vec<PageConfig>, toasts: SignalToastService) -> impl IntoView {
    let admin = use_admin();
    let quick_keys: Vec<QuickActionKey> = pages.iter().filter_map(|page| page.quick_action).collect();
    let pages = store_value(pages);

    let nav_links = move || {
        let locale = admin.locale.get();
        pages.with_value(|pages| {
            pages
                .iter()
                .map(|page| {
                    let title = page.title.resolve(&locale);
                    view! { <A href=route_path(page) class="admin-nav-link">{title}</A> }
                })
                .collect_view()
        })
    };

    let language_buttons = SUPPORTED_LOCALES
        .into_iter()
        .map(|locale| {
            view! {
                <Button
                    size=ButtonSize::Sm
                    variant=ButtonVariant::Quiet
                    on_click=Callback::new(move |_| {
                        admin.emit(&GlobalEvent::LanguageChanged {
                            locale: Some(locale.to_string()),
                        })
                    })
                >
                    {locale_label(locale)}
                </Button>
            }
        })
        .collect_view();

    let quick_buttons = quick_keys
        .into_iter()
        .map(|key| {
            view! {
                <Button
                    size=ButtonSize::Sm
                    leading_icon=IconName::Plus
                    on_click=Callback::new(move |_| {
                        admin.emit(&GlobalEvent::QuickActionOpenModal { key })
                    })
                >
                    {key.token()}
                </Button>
            }
        })
        .collect_view();

    let default_route = move || {
        let resource = pages.with_value(|pages| pages.first().map(|page| page.resource.clone()));
        view! { <AdminPage resource=resource.unwrap_or_default() pages toasts /> }
    };
    let resource_route = move || {
        let params = use_params_map();
        let resource = create_memo(move |_| params.with(|map| map.get("resource").cloned().unwrap_or_default()));
        move || view! { <AdminPage resource=resource.get() pages toasts /> }
    };

    view! {
        <div class="admin-shell">
            <header class="admin-header">
                <nav class="admin-nav" aria-label="Admin pages">{nav_links}</nav>
                <Cluster gap=LayoutGap::Sm ui_slot="quick-actions">{quick_buttons}</Cluster>
                <Cluster gap=LayoutGap::Sm ui_slot="languages">{language_buttons}</Cluster>
            </header>
            <main class="admin-main">
                <Routes>
                    <Route path="" view=default_route />
                    <Route path="/:resource" view=resource_route />
                </Routes>
            </main>
            <QuickActionHost pages=pages.get_value() />
        </div>
    }
}

#[component]
fn AdminPage(
    resource: String,
    pages: StoredValue<Vec<PageConfig>>,
    toasts: SignalToastService,
) -> impl IntoView {
    let Some(config) = pages.with_value(|pages| {
        pages.iter().find(|page| page.resource == resource).cloned()
    }) else {
        return view! { <EmptyState>{format!("Unknown admin page `{resource}`")}</EmptyState> }
            .into_view();
    };
    let renderers = Renderers::default().with_cell(PERMISSION_COUNT_CELL, |value, _row| {
        view! { <span data-ui-slot="count">{permission_count(value)}</span> }.into_view()
    });
    let hooks = PageHooks {
        custom_action: Some(Callback::new(move |(action, row): (String, Value)| {
            if action == ARCHIVE_ACTION {
                let name = row.get("name").and_then(Value::as_str).unwrap_or_default();
                toasts.show(Toast::new(ToastKind::Info, format!("{name} archived")));
            }
        })),
        after_delete: Some(Callback::new(|record: Value| {
            logging::log!("deleted record {}", record.get("id").cloned().unwrap_or(Value::Null));
        })),
        ..PageHooks::default()
    };

    view! { <PageCrud config hooks renderers /> }.into_view()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn permission_cells_count_lists_and_maps() {
        assert_eq!(permission_count(&json!(["a", "b"])), "2");
        assert_eq!(permission_count(&json!({ "0": "a" })), "1");
        assert_eq!(permission_count(&Value::Null), "0");
    }

    #[test]
    fn viewer_grants_all_parse() {
        let permissions = viewer_permissions();
        assert_eq!(permissions.iter().count(), VIEWER_PERMISSIONS.len());
        assert_eq!(locale_label("ar"), "العربية");
    }
}
