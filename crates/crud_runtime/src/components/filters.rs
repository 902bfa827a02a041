//! List filter controls shown in the page toolbar.

use admin_ui::{FieldGroup, SearchField, SelectField, SelectOptionItem, TextField};
use crud_contract::SelectOption;
use crud_core::{FilterDescriptor, FilterKind, PageAction};
use crud_host::fetch_options_with;
use leptos::*;

use crate::{
    display::UiText,
    effect_executor::resolve_relation,
    runtime_context::{use_crud_page, CrudPageContext},
};

/// Choices for a select-style filter; filter values travel raw, so no DOM encoding applies.
pub(crate) fn filter_choices(
    kind: &FilterKind,
    fetched: &[SelectOption],
    locale: &str,
) -> Vec<SelectOptionItem> {
    let item = |option: &SelectOption| SelectOptionItem::new(option.value.clone(), option.label.resolve(locale));
    match kind {
        FilterKind::Select(options) => options.iter().map(item).collect(),
        FilterKind::Relation(_) => fetched.iter().map(item).collect(),
        FilterKind::Boolean => vec![
            SelectOptionItem::new("1", UiText::Yes.resolve(locale)),
            SelectOptionItem::new("0", UiText::No.resolve(locale)),
        ],
        FilterKind::Text | FilterKind::Date => Vec::new(),
    }
}

fn filter_id(key: &str) -> String {
    format!("crud-filter-{key}")
}

fn load_relation_filter(page: CrudPageContext, filter: &FilterDescriptor, into: RwSignal<Vec<SelectOption>>) {
    let FilterKind::Relation(source) = &filter.kind else {
        return;
    };
    let transport = page.admin.host.with_value(|host| host.transport.clone());
    let source = page
        .admin
        .settings
        .with_untracked(|settings| resolve_relation(settings, source));
    let key = filter.key.clone();
    spawn_local(async move {
        match fetch_options_with(transport.as_ref(), &source).await {
            Ok(options) => into.set(options),
            Err(err) => logging::warn!("filter options for `{key}` failed to load: {err}"),
        }
    });
}

#[component]
/// One toolbar filter bound to `query.filters[key]`.
pub fn FilterControl(filter: FilterDescriptor) -> impl IntoView {
    let page = use_crud_page();
    let key = store_value(filter.key.clone());
    let locale = Signal::derive(move || page.state.with(|state| state.locale.clone()));
    let current = Signal::derive(move || {
        page.state.with(|state| {
            key.with_value(|key| state.query.filters.get(key).cloned().unwrap_or_default())
        })
    });
    let change = Callback::new(move |value: String| {
        page.dispatch_action(PageAction::FilterChanged {
            key: key.get_value(),
            value,
        })
    });

    let fetched = create_rw_signal(Vec::<SelectOption>::new());
    load_relation_filter(page, &filter, fetched);

    let id = filter_id(&filter.key);
    let label = filter.label.clone();
    let control = match filter.kind.clone() {
        FilterKind::Text => view! {
            <SearchField
                aria_label=label.resolve(&locale.get_untracked())
                placeholder=label.resolve(&locale.get_untracked())
                value=current
                on_commit=change
            />
        }
        .into_view(),
        FilterKind::Date => view! {
            <TextField id=id.clone() input_type="date" value=current on_input=change />
        }
        .into_view(),
        kind => {
            let options = Signal::derive(move || {
                fetched.with(|fetched| filter_choices(&kind, fetched, &locale.get()))
            });
            view! {
                <SelectField
                    id=id.clone()
                    placeholder=UiText::SelectPlaceholder.resolve(&locale.get_untracked())
                    options
                    value=current
                    on_change=change
                />
            }
            .into_view()
        }
    };

    view! {
        <FieldGroup layout_class="crud-filter" label=label.resolve(&locale.get_untracked()) for_id=id ui_slot="filter">
            {control}
        </FieldGroup>
    }
}

#[cfg(test)]
mod tests {
    use crud_contract::{RelationSource, TranslatableValue};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn choice_filters_list_raw_values() {
        let status = FilterKind::Select(vec![
            SelectOption::new("open", TranslatableValue::bilingual("Open", "مفتوح")),
            SelectOption::new("closed", "Closed"),
        ]);
        let items = filter_choices(&status, &[], "ar");
        assert_eq!(items[0].value, "open");
        assert_eq!(items[0].label, "مفتوح");
        assert_eq!(items[1].label, "Closed");

        let courts = FilterKind::Relation(RelationSource::new("/api/courts"));
        let fetched = vec![SelectOption::new("7", "Cairo")];
        assert_eq!(filter_choices(&courts, &fetched, "en")[0].value, "7");

        let values: Vec<_> = filter_choices(&FilterKind::Boolean, &[], "en")
            .into_iter()
            .map(|item| item.value)
            .collect();
        assert_eq!(values, vec!["1".to_string(), "0".to_string()]);
        assert!(filter_choices(&FilterKind::Text, &fetched, "en").is_empty());
    }
}
