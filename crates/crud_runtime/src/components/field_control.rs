//! Field renderer: one descriptor to one input control, or formatted text in view mode.

use admin_ui::{
    CheckboxField, ColorField, ComboField, FieldGroup, FileField, RadioGroup, SelectField,
    SelectOptionItem, Switch, Text, TextArea, TextField, TextRole,
};
use crud_contract::{DependentLevel, FieldDescriptor, FieldKind, FieldValue, FormMode};
use crud_core::{OptionState, PageAction};
use crud_host_web::register_input_files;
use leptos::*;

use crate::{
    display::{
        decode_selection, display_value, input_type, option_items, selected_dom_values, UiText,
    },
    renderers::CustomFieldProps,
    runtime_context::{use_crud_page, CrudPageContext},
};

/// DOM id of the control for `name`; dots and brackets from translation keys become dashes.
pub(crate) fn field_dom_id(name: &str) -> String {
    let slug: String = name
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '_' { ch } else { '-' })
        .collect();
    format!("crud-field-{}", slug.trim_end_matches('-'))
}

fn number_attr(value: Option<f64>) -> Option<String> {
    value.map(|value| value.to_string())
}

#[derive(Clone, Copy)]
struct OptionSignals {
    items: Memo<Vec<SelectOptionItem>>,
    loading: Memo<bool>,
    selected: Memo<String>,
    selected_many: Memo<Vec<String>>,
}

fn option_signals(page: CrudPageContext, key: &str) -> OptionSignals {
    let items_key = key.to_string();
    let loading_key = key.to_string();
    let selected_key = key.to_string();
    let many_key = key.to_string();
    OptionSignals {
        items: create_memo(move |_| {
            page.state.with(|state| {
                option_items(&state.form.ready_options(&items_key), &items_key, &state.locale)
            })
        }),
        loading: create_memo(move |_| {
            page.state.with(|state| {
                matches!(
                    state.form.options(&loading_key),
                    Some(OptionState::Loading { .. })
                )
            })
        }),
        selected: create_memo(move |_| {
            page.state
                .with(|state| state.form.selected_dom_value(&selected_key).unwrap_or_default())
        }),
        selected_many: create_memo(move |_| {
            page.state.with(|state| {
                selected_dom_values(
                    &state.form.ready_options(&many_key),
                    &many_key,
                    &state.form.value(&many_key),
                )
            })
        }),
    }
}

fn field_error(page: CrudPageContext, key: &str) -> Memo<Option<String>> {
    let key = key.to_string();
    create_memo(move |_| page.state.with(|state| state.form.error(&key).map(str::to_string)))
}

fn field_value(page: CrudPageContext, key: &str) -> Memo<FieldValue> {
    let key = key.to_string();
    create_memo(move |_| page.state.with(|state| state.form.value(&key)))
}

fn select_callback(page: CrudPageContext, key: &str) -> Callback<String> {
    let key = key.to_string();
    Callback::new(move |dom_value: String| {
        page.dispatch_action(PageAction::SelectChanged {
            key: key.clone(),
            dom_value,
        })
    })
}

fn value_callback(page: CrudPageContext, key: &str) -> Callback<FieldValue> {
    let key = key.to_string();
    Callback::new(move |value: FieldValue| {
        page.dispatch_action(PageAction::FieldChanged {
            name: key.clone(),
            value,
        })
    })
}

#[component]
/// Renders one form field of the current page's modal.
pub fn FieldControl(field: FieldDescriptor) -> impl IntoView {
    let page = use_crud_page();
    let (mode, locale) = page
        .state
        .with_untracked(|state| (state.form.mode(), state.locale.clone()));

    if let FieldKind::DependentDropdown { levels } = &field.kind {
        return levels
            .iter()
            .map(|level| dependent_level(page, level.clone(), mode, &locale))
            .collect_view();
    }

    let label = field.label.resolve(&locale);
    let help = field.help_text.as_ref().map(|help| help.resolve(&locale));
    let error = field_error(page, &field.name);
    let required = field.required && !(field.kind.is_file() && mode == FormMode::Edit);
    let dom_id = field_dom_id(&field.name);
    let kind = field.kind.token();

    let control = if mode.is_read_only() && !matches!(field.kind, FieldKind::Custom { .. }) {
        read_only_view(page, &field, &locale)
    } else {
        editable_control(page, &field, mode, &locale, &dom_id)
    };

    view! {
        <div data-field-kind=kind data-field-name=field.name.clone()>
            <FieldGroup
                label=label
                for_id=dom_id
                required=required && !mode.is_read_only()
                help=help.unwrap_or_default()
                error=Signal::from(error)
            >
                {control}
            </FieldGroup>
        </div>
    }
    .into_view()
}

fn read_only_view(page: CrudPageContext, field: &FieldDescriptor, locale: &str) -> View {
    let field = field.clone();
    let locale = locale.to_string();
    let shown = move || {
        page.state.with(|state| {
            let options = state.form.ready_options(&field.name);
            page.admin.host.with_value(|host| {
                display_value(
                    &field,
                    &state.form.value(&field.name),
                    &options,
                    &locale,
                    host.formatter.as_ref(),
                )
            })
        })
    };
    view! { <Text ui_slot="value">{shown}</Text> }.into_view()
}

fn dependent_level(page: CrudPageContext, level: DependentLevel, mode: FormMode, locale: &str) -> View {
    let key = level.name.clone();
    let label = level.label.resolve(locale);
    let error = field_error(page, &key);
    let dom_id = field_dom_id(&key);

    let control = if mode.is_read_only() {
        let locale = locale.to_string();
        let key = key.clone();
        let shown = move || {
            page.state.with(|state| {
                let raw = state.form.value(&key).as_text();
                if raw.is_empty() {
                    "-".to_string()
                } else {
                    state.form.ready_options(&key).label_for(&raw, &locale)
                }
            })
        };
        view! { <Text ui_slot="value">{shown}</Text> }.into_view()
    } else {
        let options = option_signals(page, &key);
        view! {
            <SelectField
                id=dom_id.clone()
                name=key.clone()
                placeholder=UiText::SelectPlaceholder.resolve(locale)
                options=Signal::from(options.items)
                value=Signal::from(options.selected)
                loading=Signal::from(options.loading)
                invalid=Signal::derive(move || error.with(Option::is_some))
                on_change=select_callback(page, &key)
            />
        }
        .into_view()
    };

    view! {
        <div data-field-kind="dependent-level" data-field-name=key>
            <FieldGroup
                label=label
                for_id=dom_id
                required=level.required && !mode.is_read_only()
                error=Signal::from(error)
            >
                {control}
            </FieldGroup>
        </div>
    }
    .into_view()
}

fn editable_control(
    page: CrudPageContext,
    field: &FieldDescriptor,
    mode: FormMode,
    locale: &str,
    dom_id: &str,
) -> View {
    let name = field.name.clone();
    let value = field_value(page, &name);
    let error = field_error(page, &name);
    let invalid = Signal::derive(move || error.with(Option::is_some));
    let on_value = value_callback(page, &name);
    let disabled = field.read_only;
    let placeholder = field
        .placeholder
        .as_ref()
        .map(|placeholder| placeholder.resolve(locale))
        .unwrap_or_default();
    let text = Signal::derive(move || value.with(FieldValue::as_text));
    let on_text = Callback::new(move |raw: String| on_value.call(FieldValue::Text(raw)));
    let on_number = Callback::new(move |raw: String| on_value.call(FieldValue::parse_number(&raw)));
    let dom_id = dom_id.to_string();

    match &field.kind {
        FieldKind::Text { .. } | FieldKind::Date | FieldKind::Time | FieldKind::DateTime => view! {
            <TextField
                id=dom_id
                name=name
                input_type=input_type(&field.kind)
                placeholder=placeholder
                value=text
                disabled=disabled
                invalid=invalid
                on_input=on_text
            />
        }
        .into_view(),
        FieldKind::Number { min, max, step } => view! {
            <TextField
                id=dom_id
                name=name
                input_type="number"
                min=number_attr(*min).unwrap_or_default()
                max=number_attr(*max).unwrap_or_default()
                step=number_attr(*step).unwrap_or_else(|| "any".to_string())
                placeholder=placeholder
                value=text
                disabled=disabled
                invalid=invalid
                on_input=on_number
            />
        }
        .into_view(),
        FieldKind::Currency { .. } => view! {
            <TextField
                id=dom_id
                name=name
                input_type="number"
                step="0.01"
                placeholder=placeholder
                value=text
                disabled=disabled
                invalid=invalid
                on_input=on_number
            />
        }
        .into_view(),
        FieldKind::TextArea { rows } => view! {
            <TextArea
                id=dom_id
                name=name
                rows=u32::from(*rows)
                placeholder=placeholder
                value=text
                disabled=disabled
                invalid=invalid
                on_input=on_text
            />
        }
        .into_view(),
        FieldKind::Select { .. } | FieldKind::Combobox { allow_custom: false, .. } => {
            let options = option_signals(page, &name);
            view! {
                <SelectField
                    id=dom_id
                    name=name.clone()
                    placeholder=UiText::SelectPlaceholder.resolve(locale)
                    options=Signal::from(options.items)
                    value=Signal::from(options.selected)
                    loading=Signal::from(options.loading)
                    disabled=disabled
                    invalid=invalid
                    on_change=select_callback(page, &name)
                />
            }
            .into_view()
        }
        FieldKind::Combobox { allow_custom: true, .. } => {
            let suggestions_key = name.clone();
            let suggestions = create_memo(move |_| {
                page.state.with(|state| {
                    state
                        .form
                        .ready_options(&suggestions_key)
                        .iter()
                        .map(|option| {
                            SelectOptionItem::new(option.value.clone(), option.label.resolve(&state.locale))
                        })
                        .collect::<Vec<_>>()
                })
            });
            view! {
                <ComboField
                    id=dom_id
                    placeholder=placeholder
                    suggestions=Signal::from(suggestions)
                    value=text
                    disabled=disabled
                    invalid=invalid
                    on_input=on_text
                />
            }
            .into_view()
        }
        FieldKind::MultiSelect { .. } => {
            let options = option_signals(page, &name);
            let key = name.clone();
            let on_many = Callback::new(move |dom_values: Vec<String>| {
                let picked = page.state.with_untracked(|state| {
                    decode_selection(&state.form.ready_options(&key), &key, &dom_values)
                });
                on_value.call(FieldValue::List(picked));
            });
            view! {
                <SelectField
                    id=dom_id
                    name=name
                    multiple=true
                    options=Signal::from(options.items)
                    values=Signal::from(options.selected_many)
                    loading=Signal::from(options.loading)
                    disabled=disabled
                    invalid=invalid
                    on_change_many=on_many
                />
            }
            .into_view()
        }
        FieldKind::Radio { .. } => {
            let choices = page.state.with_untracked(|state| {
                option_items(&state.form.ready_options(&name), &name, &state.locale)
            });
            let options = option_signals(page, &name);
            view! {
                <RadioGroup
                    name=dom_id
                    options=choices
                    value=Signal::from(options.selected)
                    disabled=disabled
                    on_change=select_callback(page, &name)
                />
            }
            .into_view()
        }
        FieldKind::Color => view! {
            <ColorField
                id=dom_id
                value=Signal::derive(move || {
                    let color = text.get();
                    if color.is_empty() { "#000000".to_string() } else { color }
                })
                disabled=disabled
                on_input=on_text
            />
        }
        .into_view(),
        FieldKind::Checkbox => view! {
            <CheckboxField
                id=dom_id
                checked=Signal::derive(move || !value.with(FieldValue::is_blank))
                disabled=disabled
                on_toggle=Callback::new(move |checked: bool| on_value.call(FieldValue::Bool(checked)))
            />
        }
        .into_view(),
        FieldKind::Switch => view! {
            <Switch
                aria_label=field.label.resolve(locale)
                checked=Signal::derive(move || !value.with(FieldValue::is_blank))
                disabled=disabled
                on_toggle=Callback::new(move |checked: bool| on_value.call(FieldValue::Bool(checked)))
            />
        }
        .into_view(),
        FieldKind::File { validation, .. } | FieldKind::MediaPicker { validation, .. } => {
            let file_names = Signal::derive(move || match value.get() {
                FieldValue::File(upload) => vec![upload.file_name],
                FieldValue::Empty => Vec::new(),
                other => other.into_list(),
            });
            let on_files = Callback::new(move |ev: web_sys::Event| {
                let input = event_target::<web_sys::HtmlInputElement>(&ev);
                if let Some(upload) = register_input_files(&input).into_iter().next() {
                    on_value.call(FieldValue::File(upload));
                }
            });
            let picker = view! {
                <FileField
                    id=dom_id.clone()
                    accept=validation.accept_attribute()
                    disabled=disabled
                    file_names=file_names
                    on_change=on_files
                />
            };
            let library = matches!(field.kind, FieldKind::MediaPicker { library: Some(_), .. }).then(|| {
                let options = option_signals(page, &name);
                view! {
                    <SelectField
                        name=name.clone()
                        placeholder=UiText::SelectPlaceholder.resolve(locale)
                        options=Signal::from(options.items)
                        value=Signal::from(options.selected)
                        loading=Signal::from(options.loading)
                        disabled=disabled
                        on_change=select_callback(page, &name)
                    />
                }
            });
            view! { {picker} {library} }.into_view()
        }
        FieldKind::Custom { renderer } => custom_control(page, field, renderer, mode, value, error, on_value),
        FieldKind::DependentDropdown { .. } => ().into_view(),
    }
}

fn custom_control(
    page: CrudPageContext,
    field: &FieldDescriptor,
    renderer: &str,
    mode: FormMode,
    value: Memo<FieldValue>,
    error: Memo<Option<String>>,
    on_change: Callback<FieldValue>,
) -> View {
    match page.renderers.with_value(|renderers| renderers.field(renderer)) {
        Some(render) => render(CustomFieldProps {
            field: field.clone(),
            value: value.into(),
            mode,
            locale: Signal::derive(move || page.state.with(|state| state.locale.clone())),
            error: error.into(),
            on_change,
        }),
        None => {
            logging::warn!("no field renderer registered for `{renderer}`");
            view! {
                <Text role=TextRole::Code>{move || value.with(FieldValue::as_text)}</Text>
            }
            .into_view()
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn dom_ids_are_attribute_safe() {
        assert_eq!(field_dom_id("name.en"), "crud-field-name-en");
        assert_eq!(field_dom_id("name[ar]"), "crud-field-name-ar");
        assert_eq!(field_dom_id("court_id"), "crud-field-court_id");
    }

    #[test]
    fn numeric_bounds_render_as_attributes() {
        assert_eq!(number_attr(Some(0.5)), Some("0.5".to_string()));
        assert_eq!(number_attr(Some(10.0)), Some("10".to_string()));
        assert_eq!(number_attr(None), None);
    }
}
