use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
/// One `<option>` of a [`SelectField`]; `value` is the DOM value, not necessarily the record id.
pub struct SelectOptionItem {
    /// DOM value.
    pub value: String,
    /// Visible label.
    pub label: String,
    /// Whether the option can be picked.
    pub disabled: bool,
}

impl SelectOptionItem {
    /// Enabled option.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }
}

fn selected_values(ev: &web_sys::Event) -> Vec<String> {
    let select = event_target::<web_sys::HtmlSelectElement>(ev);
    let options = select.selected_options();
    (0..options.length())
        .filter_map(|index| options.item(index))
        .filter_map(|option| option.get_attribute("value"))
        .collect()
}

#[component]
/// Button primitive with variant, busy, and icon slots.
pub fn Button(
    #[prop(default = ButtonVariant::Standard)] variant: ButtonVariant,
    #[prop(default = ButtonSize::Md)] size: ButtonSize,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional, into)] title: MaybeSignal<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional)] submit: bool,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] busy: MaybeSignal<bool>,
    #[prop(optional)] leading_icon: Option<IconName>,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
    children: Children,
) -> impl IntoView {
    view! {
        <button
            type=if submit { "submit" } else { "button" }
            class=merge_layout_class("ui-button", layout_class)
            id=id
            aria-label=move || aria_label.get()
            aria-busy=move || bool_token(busy.get())
            title=move || title.get()
            disabled=move || disabled.get() || busy.get()
            data-ui-primitive="true"
            data-ui-kind="button"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-size=size.token()
            data-ui-state=move || if busy.get() { "busy" } else { "idle" }
            data-ui-disabled=move || bool_token(disabled.get())
            on:click=move |ev| call_optional(on_click.as_ref(), ev)
        >
            {move || busy.get().then(|| view! { <Spinner /> })}
            {leading_icon.map(|icon| view! { <Icon icon size=IconSize::Sm /> })}
            {children()}
        </button>
    }
}

#[component]
/// Compact icon-only button used for row actions and dialog dismissal.
pub fn IconButton(
    icon: IconName,
    #[prop(default = ButtonVariant::Icon)] variant: ButtonVariant,
    #[prop(default = ButtonSize::Sm)] size: ButtonSize,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional, into)] title: MaybeSignal<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_click: Option<Callback<MouseEvent>>,
) -> impl IntoView {
    view! {
        <button
            type="button"
            class=merge_layout_class("ui-icon-button", layout_class)
            aria-label=move || aria_label.get()
            title=move || title.get()
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="icon-button"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-size=size.token()
            data-ui-icon=icon.token()
            data-ui-disabled=move || bool_token(disabled.get())
            on:click=move |ev| call_optional(on_click.as_ref(), ev)
        >
            <Icon icon size=IconSize::Sm />
        </button>
    }
}

#[component]
/// Labeled field wrapper with required marker, help copy, and an error slot.
pub fn FieldGroup(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] label: Option<String>,
    #[prop(optional, into)] for_id: Option<String>,
    #[prop(optional)] required: bool,
    #[prop(optional, into)] help: Option<String>,
    #[prop(optional, into)] error: MaybeSignal<Option<String>>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    children: Children,
) -> impl IntoView {
    let error = Signal::derive(move || error.get());
    view! {
        <div
            class=merge_layout_class("ui-field-group", layout_class)
            data-ui-primitive="true"
            data-ui-kind="field-group"
            data-ui-slot=ui_slot
            data-ui-invalid=move || bool_token(error.get().is_some())
        >
            {label.map(|label| view! {
                <label data-ui-slot="label" for=for_id>
                    {label}
                    {required.then(|| view! { <span data-ui-slot="required" aria-hidden="true">"*"</span> })}
                </label>
            })}
            <div data-ui-slot="control">{children()}</div>
            {help
                .filter(|help| !help.is_empty())
                .map(|help| view! { <small data-ui-slot="help">{help}</small> })}
            {move || error.get().map(|message| view! {
                <small data-ui-slot="error" role="alert">{message}</small>
            })}
        </div>
    }
}

#[component]
/// Single-line input primitive; `input_type` covers text, number, email, password, date, and friends.
pub fn TextField(
    #[prop(default = FieldVariant::Standard)] variant: FieldVariant,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] name: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] input_type: Option<&'static str>,
    #[prop(optional, into)] min: Option<String>,
    #[prop(optional, into)] max: Option<String>,
    #[prop(optional, into)] step: Option<String>,
    #[prop(optional)] autocomplete: Option<&'static str>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] readonly: MaybeSignal<bool>,
    #[prop(optional, into)] invalid: MaybeSignal<bool>,
    #[prop(optional)] on_input: Option<Callback<String>>,
    #[prop(optional)] on_keydown: Option<Callback<KeyboardEvent>>,
) -> impl IntoView {
    view! {
        <input
            class=merge_layout_class("ui-field", layout_class)
            id=id
            name=name
            placeholder=placeholder
            aria-label=aria_label
            aria-invalid=move || bool_token(invalid.get())
            type=input_type.unwrap_or("text")
            min=min
            max=max
            step=step
            autocomplete=autocomplete
            prop:value=move || value.get()
            disabled=move || disabled.get()
            readonly=move || readonly.get()
            data-ui-primitive="true"
            data-ui-kind="text-field"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-disabled=move || bool_token(disabled.get())
            on:input=move |ev| call_optional(on_input.as_ref(), event_target_value(&ev))
            on:keydown=move |ev| call_optional(on_keydown.as_ref(), ev)
        />
    }
}

#[component]
/// Search input that reports every keystroke and commits on Enter.
pub fn SearchField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional)] on_input: Option<Callback<String>>,
    #[prop(optional)] on_commit: Option<Callback<String>>,
) -> impl IntoView {
    view! {
        <div
            class=merge_layout_class("ui-search-field", layout_class)
            role="search"
            data-ui-primitive="true"
            data-ui-kind="search-field"
        >
            <Icon icon=IconName::Search size=IconSize::Sm />
            <input
                class="ui-field"
                type="search"
                placeholder=placeholder
                aria-label=aria_label
                prop:value=move || value.get()
                data-ui-variant=FieldVariant::Inset.token()
                on:input=move |ev| call_optional(on_input.as_ref(), event_target_value(&ev))
                on:keydown=move |ev: KeyboardEvent| {
                    if ev.key() == "Enter" {
                        ev.prevent_default();
                        call_optional(on_commit.as_ref(), event_target_value(&ev));
                    }
                }
            />
        </div>
    }
}

#[component]
/// Multiline text area primitive.
pub fn TextArea(
    #[prop(default = FieldVariant::Standard)] variant: FieldVariant,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] name: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(default = 4)] rows: u32,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] readonly: MaybeSignal<bool>,
    #[prop(optional, into)] invalid: MaybeSignal<bool>,
    #[prop(optional)] on_input: Option<Callback<String>>,
) -> impl IntoView {
    view! {
        <textarea
            class=merge_layout_class("ui-textarea", layout_class)
            id=id
            name=name
            placeholder=placeholder
            aria-label=aria_label
            aria-invalid=move || bool_token(invalid.get())
            rows=rows
            prop:value=move || value.get()
            disabled=move || disabled.get()
            readonly=move || readonly.get()
            data-ui-primitive="true"
            data-ui-kind="text-area"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            on:input=move |ev| call_optional(on_input.as_ref(), event_target_value(&ev))
        ></textarea>
    }
}

#[component]
/// Select primitive over a reactive option list.
///
/// Single selects report the chosen DOM value through `on_change`; `multiple` selects report the
/// full selection through `on_change_many` and read their state from `values`.
pub fn SelectField(
    #[prop(default = FieldVariant::Standard)] variant: FieldVariant,
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] name: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional)] ui_slot: Option<&'static str>,
    #[prop(optional)] multiple: bool,
    #[prop(optional, into)] options: MaybeSignal<Vec<SelectOptionItem>>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] values: MaybeSignal<Vec<String>>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] loading: MaybeSignal<bool>,
    #[prop(optional, into)] invalid: MaybeSignal<bool>,
    #[prop(optional)] on_change: Option<Callback<String>>,
    #[prop(optional)] on_change_many: Option<Callback<Vec<String>>>,
) -> impl IntoView {
    let value = Signal::derive(move || value.get());
    let values = Signal::derive(move || values.get());
    let render_options = move || {
        options
            .get()
            .into_iter()
            .map(|option| {
                let option_value = option.value.clone();
                let is_selected = move || {
                    if multiple {
                        values.with(|values| values.contains(&option_value))
                    } else {
                        value.with(|value| *value == option_value)
                    }
                };
                view! {
                    <option value=option.value.clone() disabled=option.disabled prop:selected=is_selected>
                        {option.label}
                    </option>
                }
            })
            .collect_view()
    };

    view! {
        <select
            class=merge_layout_class("ui-field", layout_class)
            id=id
            name=name
            aria-label=aria_label
            aria-invalid=move || bool_token(invalid.get())
            aria-busy=move || bool_token(loading.get())
            multiple=multiple
            disabled=move || disabled.get() || loading.get()
            data-ui-primitive="true"
            data-ui-kind="select"
            data-ui-slot=ui_slot
            data-ui-variant=variant.token()
            data-ui-state=move || if loading.get() { "loading" } else { "idle" }
            on:change=move |ev| {
                if multiple {
                    call_optional(on_change_many.as_ref(), selected_values(&ev));
                } else {
                    call_optional(on_change.as_ref(), event_target_value(&ev));
                }
            }
        >
            {(!multiple).then(|| view! {
                <option value="" prop:selected=move || value.with(String::is_empty)>
                    {placeholder.unwrap_or_default()}
                </option>
            })}
            {render_options}
        </select>
    }
}

#[component]
/// Checkbox input with an inline label.
pub fn CheckboxField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] label: Option<String>,
    #[prop(optional, into)] checked: MaybeSignal<bool>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_toggle: Option<Callback<bool>>,
) -> impl IntoView {
    view! {
        <label
            class=merge_layout_class("ui-checkbox", layout_class)
            data-ui-primitive="true"
            data-ui-kind="checkbox"
            data-ui-selected=move || bool_token(checked.get())
        >
            <input
                type="checkbox"
                id=id
                prop:checked=move || checked.get()
                disabled=move || disabled.get()
                on:change=move |ev| call_optional(on_toggle.as_ref(), event_target_checked(&ev))
            />
            {label.map(|label| view! { <span data-ui-slot="label">{label}</span> })}
        </label>
    }
}

#[component]
/// Switch with explicit `role="switch"` semantics.
pub fn Switch(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] aria_label: MaybeSignal<String>,
    #[prop(optional, into)] checked: MaybeSignal<bool>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_toggle: Option<Callback<bool>>,
) -> impl IntoView {
    let toggle = move || {
        if !disabled.get_untracked() {
            call_optional(on_toggle.as_ref(), !checked.get_untracked());
        }
    };

    view! {
        <button
            type="button"
            class=merge_layout_class("ui-switch", layout_class)
            role="switch"
            aria-label=move || aria_label.get()
            aria-checked=move || checked.get().to_string()
            disabled=move || disabled.get()
            data-ui-primitive="true"
            data-ui-kind="switch"
            data-ui-selected=move || bool_token(checked.get())
            on:click=move |_| toggle()
            on:keydown=move |ev| {
                if ev.key() == " " {
                    ev.prevent_default();
                    toggle();
                }
            }
        >
            <span data-ui-slot="track">
                <span data-ui-slot="thumb"></span>
            </span>
        </button>
    }
}

#[component]
/// Radio group over a fixed option list.
pub fn RadioGroup(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(into)] name: String,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional)] options: Vec<SelectOptionItem>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_change: Option<Callback<String>>,
) -> impl IntoView {
    let value = Signal::derive(move || value.get());
    let disabled = Signal::derive(move || disabled.get());
    view! {
        <div
            class=merge_layout_class("ui-radio-group", layout_class)
            role="radiogroup"
            aria-label=aria_label
            data-ui-primitive="true"
            data-ui-kind="radio-group"
        >
            {options
                .into_iter()
                .map(|option| {
                    let option_value = option.value.clone();
                    let picked = option.value.clone();
                    view! {
                        <label data-ui-slot="option">
                            <input
                                type="radio"
                                name=name.clone()
                                value=option.value
                                prop:checked=move || value.with(|value| *value == option_value)
                                disabled=move || disabled.get() || option.disabled
                                on:change=move |_| call_optional(on_change.as_ref(), picked.clone())
                            />
                            <span data-ui-slot="label">{option.label}</span>
                        </label>
                    }
                })
                .collect_view()}
        </div>
    }
}

#[component]
/// Free-text input with suggested values.
pub fn ComboField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(into)] id: String,
    #[prop(optional, into)] placeholder: Option<String>,
    #[prop(optional, into)] suggestions: MaybeSignal<Vec<SelectOptionItem>>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] invalid: MaybeSignal<bool>,
    #[prop(optional)] on_input: Option<Callback<String>>,
) -> impl IntoView {
    let list_id = format!("{id}-suggestions");
    view! {
        <span
            class=merge_layout_class("ui-combo-field", layout_class)
            data-ui-primitive="true"
            data-ui-kind="combo-field"
        >
            <input
                class="ui-field"
                id=id
                list=list_id.clone()
                placeholder=placeholder
                aria-invalid=move || bool_token(invalid.get())
                prop:value=move || value.get()
                disabled=move || disabled.get()
                on:input=move |ev| call_optional(on_input.as_ref(), event_target_value(&ev))
            />
            <datalist id=list_id>
                {move || {
                    suggestions
                        .get()
                        .into_iter()
                        .map(|option| view! { <option value=option.value>{option.label}</option> })
                        .collect_view()
                }}
            </datalist>
        </span>
    }
}

#[component]
/// Color picker with the hex value echoed beside it.
pub fn ColorField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] aria_label: Option<String>,
    #[prop(optional, into)] value: MaybeSignal<String>,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional)] on_input: Option<Callback<String>>,
) -> impl IntoView {
    let value = Signal::derive(move || value.get());
    view! {
        <span
            class=merge_layout_class("ui-color-field", layout_class)
            data-ui-primitive="true"
            data-ui-kind="color-field"
        >
            <input
                class="ui-field"
                type="color"
                id=id
                aria-label=aria_label
                prop:value=move || value.get()
                disabled=move || disabled.get()
                on:input=move |ev| call_optional(on_input.as_ref(), event_target_value(&ev))
            />
            <code data-ui-slot="value">{move || value.get()}</code>
        </span>
    }
}

#[component]
/// File input; hands the raw change event to the owner, which reads `files` off the target.
pub fn FileField(
    #[prop(optional)] layout_class: Option<&'static str>,
    #[prop(optional, into)] id: Option<String>,
    #[prop(optional, into)] accept: Option<String>,
    #[prop(optional)] multiple: bool,
    #[prop(optional, into)] disabled: MaybeSignal<bool>,
    #[prop(optional, into)] file_names: MaybeSignal<Vec<String>>,
    #[prop(optional)] on_change: Option<Callback<web_sys::Event>>,
) -> impl IntoView {
    view! {
        <span
            class=merge_layout_class("ui-file-field", layout_class)
            data-ui-primitive="true"
            data-ui-kind="file-field"
        >
            <label data-ui-slot="picker">
                <Icon icon=IconName::Upload size=IconSize::Sm />
                <input
                    type="file"
                    id=id
                    accept=accept
                    multiple=multiple
                    disabled=move || disabled.get()
                    on:change=move |ev| call_optional(on_change.as_ref(), ev)
                />
            </label>
            <ul data-ui-slot="files">
                {move || {
                    file_names
                        .get()
                        .into_iter()
                        .map(|name| view! { <li>{name}</li> })
                        .collect_view()
                }}
            </ul>
        </span>
    }
}
