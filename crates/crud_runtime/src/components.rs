//! CRUD page composition: toolbar, table, pagination, and dialogs.

mod delete_confirm;
mod field_control;
mod filters;
mod form_modal;
mod quick_actions;
mod table;

use admin_ui::{
    Button, ButtonVariant, Cluster, Heading, IconName, LayoutGap, Pagination, SearchField, Stack,
    ToolBar,
};
use crud_core::{PageAction, PageConfig, PageState};
use leptos::*;

pub use self::{
    delete_confirm::DeleteConfirmModal,
    field_control::FieldControl,
    filters::FilterControl,
    form_modal::CrudFormModal,
    quick_actions::QuickActionHost,
    table::CrudTable,
};

use crate::{
    display::{page_summary, UiText},
    renderers::Renderers,
    runtime_context::{provide_crud_page, text_direction, use_admin, PageHooks},
};

/// Returns `true` when search or any filter narrows the list.
fn has_active_filters(state: &PageState) -> bool {
    !state.query.search.trim().is_empty() || state.query.filters.values().any(|value| !value.is_empty())
}

#[component]
/// Full CRUD page for `config`: list, search, filters, sort, pagination, and the modal form.
///
/// The list query is restored from the address bar on mount and written back on every change.
pub fn PageCrud(
    /// Static page description.
    config: PageConfig,
    /// Write hooks and custom action handlers.
    #[prop(optional)]
    hooks: PageHooks,
    /// Custom field and cell renderers.
    #[prop(optional)]
    renderers: Renderers,
) -> impl IntoView {
    let page = provide_crud_page(use_admin(), config, hooks, renderers);
    let query_string = page.admin.host.with_value(|host| host.navigator.current_query());
    page.dispatch_action(PageAction::Init { query_string });

    let (resource, title, filters) = page.config.with_value(|config| {
        (config.resource.clone(), config.title.clone(), config.filters.clone())
    });
    let locale = create_memo(move |_| page.state.with(|state| state.locale.clone()));
    let can_create = Signal::derive(move || {
        page.state
            .with(|state| page.config.with_value(|config| config.can_create(&state.permissions)))
    });
    let filtered = Signal::derive(move || page.state.with(has_active_filters));
    let search = Signal::derive(move || page.state.with(|state| state.query.search.clone()));
    let current = Signal::derive(move || page.state.with(|state| state.query.page));
    let last_page = Signal::derive(move || page.state.with(PageState::page_count));
    let per_page = Signal::derive(move || page.state.with(|state| state.query.per_page));
    let summary = Signal::derive(move || page.state.with(|state| page_summary(&state.list, &state.locale)));
    let per_page_options = page
        .admin
        .settings
        .with_untracked(|settings| settings.per_page_options.clone());

    let filter_controls = filters
        .into_iter()
        .map(|filter| view! { <FilterControl filter /> })
        .collect_view();

    view! {
        <section
            class="crud-page"
            data-ui-resource=resource
            lang=move || locale.get()
            dir=move || text_direction(&locale.get())
        >
            <Stack gap=LayoutGap::Md>
                <Cluster gap=LayoutGap::Sm layout_class="crud-page-header">
                    <Heading>{move || title.resolve(&locale.get())}</Heading>
                    <Show when=move || can_create.get() fallback=|| ()>
                        <Button
                            variant=ButtonVariant::Primary
                            leading_icon=IconName::Plus
                            on_click=Callback::new(move |_| page.dispatch_action(PageAction::OpenCreate))
                        >
                            {move || UiText::Create.resolve(&locale.get())}
                        </Button>
                    </Show>
                </Cluster>
                <ToolBar layout_class="crud-toolbar">
                    <SearchField
                        placeholder=UiText::Search.resolve(&locale.get_untracked())
                        aria_label=UiText::Search.resolve(&locale.get_untracked())
                        value=search
                        on_commit=Callback::new(move |term| page.dispatch_action(PageAction::Search(term)))
                    />
                    {filter_controls}
                    <Show when=move || filtered.get() fallback=|| ()>
                        <Button
                            variant=ButtonVariant::Quiet
                            on_click=Callback::new(move |_| page.dispatch_action(PageAction::ClearFilters))
                        >
                            {move || UiText::ClearFilters.resolve(&locale.get())}
                        </Button>
                    </Show>
                </ToolBar>
                <CrudTable />
                <Pagination
                    current
                    last_page
                    summary
                    per_page
                    per_page_options
                    on_page=Callback::new(move |target| page.dispatch_action(PageAction::GoToPage(target)))
                    on_per_page=Callback::new(move |size| page.dispatch_action(PageAction::PerPage(size)))
                />
            </Stack>
            <CrudFormModal />
            <DeleteConfirmModal />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use crud_contract::{FieldDescriptor, FieldKind, FieldSet, PermissionSet};
    use crud_host::CrudSettings;

    use super::*;

    #[test]
    fn clear_filters_shows_only_for_narrowed_lists() {
        let fields = FieldSet::new(vec![FieldDescriptor::new("name", "Name", FieldKind::text())])
            .expect("fields");
        let config = PageConfig::new("clients", "/api/clients", "Clients", "Client", fields);
        let mut state = PageState::new(&config, CrudSettings::default(), PermissionSet::default());
        assert!(!has_active_filters(&state));

        state.query.search = "  ".into();
        assert!(!has_active_filters(&state));

        state.query.filters.insert("status".into(), String::new());
        assert!(!has_active_filters(&state));

        state.query.filters.insert("status".into(), "open".into());
        assert!(has_active_filters(&state));
    }
}
