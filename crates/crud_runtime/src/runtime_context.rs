//! Admin-wide and per-page contexts.
//!
//! [`AdminProvider`] owns the host bundle, loaded settings, viewer capabilities, and the active
//! locale. Each CRUD page builds a [`CrudPageContext`] holding its reducer state and effect queue;
//! UI composition stays in [`crate::components`].
#![allow(clippy::clone_on_copy)]

use crud_contract::{
    is_rtl_locale, GlobalEvent, PermissionSet, Row, LANGUAGE_CHANGED_EVENT,
};
use crud_core::{reduce_page, PageAction, PageConfig, PageEffect, PageHook, PageState};
use crud_host::{load_settings_with, CrudSettings, HostServices};
use crud_host_web::parse_window_event;
use leptos::*;
use serde_json::Value;

use crate::{display::resolve_locale, effect_executor, renderers::Renderers, toasts::SignalToastService};

#[derive(Clone, Copy)]
/// Leptos context shared by every CRUD page under [`AdminProvider`].
pub struct AdminContext {
    /// Injected host bundle.
    pub host: StoredValue<HostServices>,
    /// Settings loaded from prefs.
    pub settings: RwSignal<CrudSettings>,
    /// Viewer capabilities.
    pub permissions: StoredValue<PermissionSet>,
    /// Viewer id for ownership-scoped grants.
    pub viewer_id: StoredValue<Option<String>>,
    /// Active locale, following `languageChanged` events.
    pub locale: RwSignal<String>,
    /// Resource most recently written by a page that does not list it.
    pub changed_resource: RwSignal<Option<String>>,
}

impl AdminContext {
    /// Creates the context under the current reactive owner with default settings.
    pub fn new(
        host_services: HostServices,
        permissions: PermissionSet,
        viewer_id: Option<String>,
    ) -> Self {
        let settings = CrudSettings::default();
        Self {
            host: store_value(host_services),
            locale: create_rw_signal(settings.default_locale.clone()),
            settings: create_rw_signal(settings),
            permissions: store_value(permissions),
            viewer_id: store_value(viewer_id),
            changed_resource: create_rw_signal(None),
        }
    }

    /// Applies settings loaded from prefs; the locale resets to the configured default.
    pub fn apply_settings(&self, settings: CrudSettings) {
        self.locale.set(settings.default_locale.clone());
        self.settings.set(settings);
    }

    /// Switches the locale for a `languageChanged` event; a missing locale keeps the current one.
    pub fn change_locale(&self, requested: Option<&str>) {
        let next = resolve_locale(requested, &self.locale.get_untracked());
        if next != self.locale.get_untracked() {
            self.locale.set(next);
        }
    }

    /// Tells every page listing `resource` to refresh.
    pub fn announce_change(&self, resource: String) {
        self.changed_resource.set(Some(resource));
    }

    /// Emits a global event through the host event bus.
    pub fn emit(&self, event: &GlobalEvent) {
        self.host.with_value(|host| host.events.dispatch(event));
    }
}

/// `dir` attribute value for `locale`.
pub fn text_direction(locale: &str) -> &'static str {
    if is_rtl_locale(locale) {
        "rtl"
    } else {
        "ltr"
    }
}

fn apply_document_locale(locale: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        let root = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element());
        if let Some(root) = root {
            let _ = root.set_attribute("lang", locale);
            let _ = root.set_attribute("dir", text_direction(locale));
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = locale;
    }
}

fn install_settings_hydration(admin: AdminContext, toasts: SignalToastService, ready: RwSignal<bool>) {
    let prefs = admin.host.with_value(|host| host.prefs.clone());
    spawn_local(async move {
        match load_settings_with(prefs.as_ref()).await {
            Ok(settings) => {
                toasts.timeout_ms.set(settings.toast_timeout_ms);
                admin.apply_settings(settings);
            }
            Err(err) => logging::warn!("crud settings load failed, using defaults: {err}"),
        }
        ready.set(true);
    });
}

fn install_language_listener(admin: AdminContext) {
    let handle = window_event_listener_untyped(LANGUAGE_CHANGED_EVENT, move |event| {
        if let Some(GlobalEvent::LanguageChanged { locale }) =
            parse_window_event(LANGUAGE_CHANGED_EVENT, &event)
        {
            admin.change_locale(locale.as_deref());
        }
    });
    on_cleanup(move || handle.remove());

    create_effect(move |_| apply_document_locale(&admin.locale.get()));
}

#[component]
/// Provides [`AdminContext`] and renders its children once settings are loaded.
pub fn AdminProvider(
    /// Host bundle assembled by the entry layer.
    host_services: HostServices,
    /// Toast service also referenced by `host_services.toasts`.
    toasts: SignalToastService,
    /// Viewer capabilities.
    #[prop(optional)]
    permissions: PermissionSet,
    /// Viewer id.
    #[prop(optional, into)]
    viewer_id: Option<String>,
    children: ChildrenFn,
) -> impl IntoView {
    let admin = AdminContext::new(host_services, permissions, viewer_id);
    let ready = create_rw_signal(false);
    provide_context(admin);

    install_settings_hydration(admin, toasts, ready);
    install_language_listener(admin);

    view! {
        <Show when=move || ready.get() fallback=|| view! { <admin_ui::Spinner /> }>
            {children()}
        </Show>
    }
}

/// Returns the current [`AdminContext`].
///
/// # Panics
///
/// Panics if called outside [`AdminProvider`].
pub fn use_admin() -> AdminContext {
    use_context::<AdminContext>().expect("AdminContext not provided")
}

#[derive(Clone, Copy, Default)]
/// Page-level callbacks for successful writes and custom row actions.
pub struct PageHooks {
    /// Called with the create response body.
    pub after_create: Option<Callback<Value>>,
    /// Called with the update response body.
    pub after_update: Option<Callback<Value>>,
    /// Called with the deleted row.
    pub after_delete: Option<Callback<Value>>,
    /// Called with the action token and row of a custom row action.
    pub custom_action: Option<Callback<(String, Row)>>,
}

impl PageHooks {
    /// Runs the callback registered for `hook`; returns `false` when none is.
    pub fn run(&self, hook: PageHook, record: Value) -> bool {
        let callback = match hook {
            PageHook::AfterCreate => self.after_create,
            PageHook::AfterUpdate => self.after_update,
            PageHook::AfterDelete => self.after_delete,
        };
        match callback {
            Some(callback) => {
                callback.call(record);
                true
            }
            None => false,
        }
    }

    /// Runs the custom-action callback; returns `false` when none is registered.
    pub fn custom(&self, action: String, row: Row) -> bool {
        match self.custom_action {
            Some(callback) => {
                callback.call((action, row));
                true
            }
            None => false,
        }
    }
}

#[derive(Clone, Copy)]
/// Leptos context for one CRUD page: reducer state, effect queue, and dispatch.
pub struct CrudPageContext {
    /// Admin-wide services and locale.
    pub admin: AdminContext,
    /// Static page description.
    pub config: StoredValue<PageConfig>,
    /// Reactive page state.
    pub state: RwSignal<PageState>,
    /// Queue of effects emitted by the reducer and drained by the executor.
    pub effects: RwSignal<Vec<PageEffect>>,
    /// Write hooks.
    pub hooks: StoredValue<PageHooks>,
    /// Custom field and cell renderers.
    pub renderers: StoredValue<Renderers>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<PageAction>,
}

impl CrudPageContext {
    /// Dispatches a reducer action through the page callback.
    pub fn dispatch_action(&self, action: PageAction) {
        self.dispatch.call(action);
    }

    /// Current locale of the page.
    pub fn locale(&self) -> String {
        self.state.with(|state| state.locale.clone())
    }
}

/// Builds the page context without installing the executor.
pub fn create_crud_page(
    admin: AdminContext,
    config: PageConfig,
    hooks: PageHooks,
    renderers: Renderers,
) -> CrudPageContext {
    let mut initial = PageState::new(
        &config,
        admin.settings.get_untracked(),
        admin.permissions.get_value(),
    );
    if let Some(viewer_id) = admin.viewer_id.get_value() {
        initial = initial.with_viewer(viewer_id);
    }
    initial.locale = admin.locale.get_untracked();

    let config = store_value(config);
    let state = create_rw_signal(initial);
    let effects = create_rw_signal(Vec::<PageEffect>::new());

    let dispatch = Callback::new(move |action: PageAction| {
        let mut page = state.get_untracked();
        match config.with_value(|config| reduce_page(&mut page, config, action)) {
            Ok(new_effects) => {
                state.set(page);
                if !new_effects.is_empty() {
                    let mut queue = effects.get_untracked();
                    queue.extend(new_effects);
                    effects.set(queue);
                }
            }
            Err(err) => logging::warn!("crud page reducer error: {err}"),
        }
    });

    CrudPageContext {
        admin,
        config,
        state,
        effects,
        hooks: store_value(hooks),
        renderers: store_value(renderers),
        dispatch,
    }
}

/// Refreshes `page` whenever another page announces a write to the same resource.
pub fn follow_resource_changes(page: CrudPageContext) {
    let resource = page.config.with_value(|config| config.resource.clone());
    create_effect(move |seen: Option<()>| {
        let changed = page.admin.changed_resource.get();
        if seen.is_some() && changed.as_deref() == Some(resource.as_str()) {
            page.dispatch_action(PageAction::Refresh);
        }
    });
}

/// Builds the page context, provides it, installs the executor, and follows locale and resource
/// changes.
pub fn provide_crud_page(
    admin: AdminContext,
    config: PageConfig,
    hooks: PageHooks,
    renderers: Renderers,
) -> CrudPageContext {
    let page = create_crud_page(admin, config, hooks, renderers);
    provide_context(page);
    effect_executor::install(page);
    follow_resource_changes(page);

    create_effect(move |previous: Option<String>| {
        let locale = admin.locale.get();
        if previous.is_some_and(|previous| previous != locale) {
            page.dispatch_action(PageAction::LanguageChanged(locale.clone()));
        }
        locale
    });

    page
}

/// Returns the current [`CrudPageContext`].
///
/// # Panics
///
/// Panics if called outside a CRUD page.
pub fn use_crud_page() -> CrudPageContext {
    use_context::<CrudPageContext>().expect("CrudPageContext not provided")
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use crud_contract::{ColumnDescriptor, FieldDescriptor, FieldKind, FieldSet};
    use crud_host::MemoryEventBus;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn config() -> PageConfig {
        let fields = FieldSet::new(vec![FieldDescriptor::new("name", "Name", FieldKind::text())])
            .expect("fields");
        PageConfig::new("clients", "/api/clients", "Clients", "Client", fields)
            .with_columns(vec![ColumnDescriptor::new("name", "Name").sortable()])
    }

    fn admin() -> AdminContext {
        let (permissions, _) = PermissionSet::from_names(["manage-clients"]);
        AdminContext::new(HostServices::noop(), permissions, Some("7".into()))
    }

    #[test]
    fn dispatch_applies_reducer_and_queues_effects() {
        let runtime = create_runtime();
        let admin = admin();
        admin.apply_settings(CrudSettings {
            api_base_url: "https://api.example.test".into(),
            ..CrudSettings::default()
        });
        let page = create_crud_page(admin, config(), PageHooks::default(), Renderers::default());

        page.dispatch_action(PageAction::Init {
            query_string: "?page=2&status=open".into(),
        });

        let state = page.state.get_untracked();
        assert!(state.loading);
        assert_eq!(state.query.page, 2);
        assert_eq!(state.viewer_id.as_deref(), Some("7"));
        assert_eq!(
            page.effects.get_untracked(),
            vec![PageEffect::FetchList {
                request: 1,
                url: "https://api.example.test/api/clients?page=2&per_page=15&status=open".into(),
                silent: false,
            }]
        );

        runtime.dispose();
    }

    #[test]
    fn rejected_actions_leave_state_and_queue_untouched() {
        let runtime = create_runtime();
        let page = create_crud_page(admin(), config(), PageHooks::default(), Renderers::default());

        page.dispatch_action(PageAction::Sort("created_at".into()));
        page.dispatch_action(PageAction::ConfirmDelete);

        assert_eq!(page.state.get_untracked().query.sort, None);
        assert!(page.effects.get_untracked().is_empty());

        runtime.dispose();
    }

    #[test]
    fn hooks_report_whether_a_callback_ran() {
        let runtime = create_runtime();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let hooks = PageHooks {
            after_delete: Some(Callback::new(move |record: Value| sink.borrow_mut().push(record))),
            ..PageHooks::default()
        };

        assert!(hooks.run(PageHook::AfterDelete, json!({ "id": 3 })));
        assert!(!hooks.run(PageHook::AfterCreate, json!({ "id": 4 })));
        assert!(!hooks.custom("archive".into(), json!({ "id": 3 })));
        assert_eq!(*seen.borrow(), vec![json!({ "id": 3 })]);

        runtime.dispose();
    }

    #[test]
    fn announced_writes_refresh_only_listing_pages_of_that_resource() {
        let runtime = create_runtime();
        let admin = admin();
        let listing = create_crud_page(admin, config(), PageHooks::default(), Renderers::default());
        let dialog = create_crud_page(admin, config(), PageHooks::default(), Renderers::default());
        follow_resource_changes(listing);
        follow_resource_changes(dialog);
        listing.dispatch_action(PageAction::Init {
            query_string: String::new(),
        });
        listing.effects.set(Vec::new());

        admin.announce_change("hearings".into());
        assert!(listing.effects.get_untracked().is_empty());

        admin.announce_change("clients".into());
        assert!(matches!(
            listing.effects.get_untracked().as_slice(),
            [PageEffect::FetchList { request: 2, .. }]
        ));
        assert!(dialog.effects.get_untracked().is_empty());

        runtime.dispose();
    }

    #[test]
    fn locale_changes_ignore_blank_requests_and_set_direction() {
        let runtime = create_runtime();
        let admin = admin();

        admin.change_locale(Some("ar"));
        assert_eq!(admin.locale.get_untracked(), "ar");
        admin.change_locale(None);
        assert_eq!(admin.locale.get_untracked(), "ar");
        assert_eq!(text_direction("ar"), "rtl");
        assert_eq!(text_direction("en"), "ltr");

        runtime.dispose();
    }

    #[test]
    fn emitted_events_reach_the_host_bus() {
        let runtime = create_runtime();
        let events = MemoryEventBus::default();
        let host = HostServices {
            events: Rc::new(events.clone()),
            ..HostServices::noop()
        };
        let admin = AdminContext::new(host, PermissionSet::default(), None);

        admin.emit(&GlobalEvent::LanguageChanged {
            locale: Some("ar".into()),
        });
        assert_eq!(
            events.events(),
            vec![GlobalEvent::LanguageChanged {
                locale: Some("ar".into())
            }]
        );

        runtime.dispose();
    }
}
