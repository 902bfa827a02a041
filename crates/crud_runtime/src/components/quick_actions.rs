//! Global quick-create dialogs opened by `quickAction:openModal`.

use crud_contract::{GlobalEvent, QuickActionKey, QUICK_ACTION_OPEN_MODAL_EVENT};
use crud_core::{PageAction, PageConfig};
use crud_host_web::parse_window_event;
use leptos::*;

use super::form_modal::CrudFormModal;
use crate::{
    renderers::Renderers,
    runtime_context::{provide_crud_page, use_admin, PageHooks},
};

/// Returns `true` when `event` asks to open the create form registered under `key`.
pub(crate) fn opens(event: &GlobalEvent, key: QuickActionKey) -> bool {
    matches!(event, GlobalEvent::QuickActionOpenModal { key: requested } if *requested == key)
}

#[component]
fn QuickActionSlot(config: PageConfig, key: QuickActionKey) -> impl IntoView {
    let admin = use_admin();
    let page = provide_crud_page(admin, config, PageHooks::default(), Renderers::default());

    let handle = window_event_listener_untyped(QUICK_ACTION_OPEN_MODAL_EVENT, move |event| {
        let Some(event) = parse_window_event(QUICK_ACTION_OPEN_MODAL_EVENT, &event) else {
            return;
        };
        if !opens(&event, key) {
            return;
        }
        let allowed = page.state.with_untracked(|state| {
            page.config.with_value(|config| config.can_create(&state.permissions))
        });
        if allowed {
            page.dispatch_action(PageAction::OpenCreate);
        } else {
            logging::warn!("quick action `{}` is not permitted for this viewer", key.token());
        }
    });
    on_cleanup(move || handle.remove());

    view! { <CrudFormModal /> }
}

#[component]
/// Mounts one hidden create dialog per page config that declares a quick action.
pub fn QuickActionHost(
    /// Candidate page configs; those without `quick_action` are skipped.
    pages: Vec<PageConfig>,
) -> impl IntoView {
    pages
        .into_iter()
        .filter_map(|config| {
            let key = config.quick_action?;
            Some(view! { <QuickActionSlot config key /> })
        })
        .collect_view()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_matching_keys_open() {
        let event = GlobalEvent::QuickActionOpenModal {
            key: QuickActionKey::Hearings,
        };
        assert!(opens(&event, QuickActionKey::Hearings));
        assert!(!opens(&event, QuickActionKey::Cases));
        assert!(!opens(
            &GlobalEvent::LanguageChanged { locale: None },
            QuickActionKey::Hearings
        ));
    }
}
