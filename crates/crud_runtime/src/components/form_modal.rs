//! Create/edit/view modal laying out the page's fields.

use std::rc::Rc;

use admin_ui::{Button, ButtonVariant, Modal, ModalSize};
use crud_contract::FormMode;
use crud_core::{arrange_fields, FormLayout, PageAction, PageConfig, PageState};
use leptos::*;

use super::field_control::FieldControl;
use crate::{
    display::{modal_title, UiText},
    runtime_context::use_crud_page,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// What the modal body depends on; value edits that keep visibility unchanged do not re-render.
pub(crate) struct FormShape {
    pub session: u64,
    pub mode: FormMode,
    pub locale: String,
    pub lines: Vec<Vec<String>>,
}

pub(crate) fn form_shape(state: &PageState, config: &PageConfig) -> FormShape {
    let form = &state.form;
    FormShape {
        session: form.session(),
        mode: form.mode(),
        locale: state.locale.clone(),
        lines: arrange_fields(form.fields(), config.layout, form.mode(), form.data())
            .into_iter()
            .map(|line| line.into_iter().map(|field| field.name.clone()).collect())
            .collect(),
    }
}

fn modal_size(layout: FormLayout) -> ModalSize {
    match layout {
        FormLayout::Grid { columns } if columns >= 3 => ModalSize::Xl,
        FormLayout::Grid { .. } => ModalSize::Lg,
        FormLayout::Rows | FormLayout::Flex => ModalSize::Md,
    }
}

fn grid_columns(layout: FormLayout) -> Option<String> {
    match layout {
        FormLayout::Grid { columns } => Some(format!("--crud-form-columns: {}", columns.max(1))),
        FormLayout::Rows | FormLayout::Flex => None,
    }
}

#[component]
/// Modal form of the current page; submits through [`PageAction::SubmitForm`].
pub fn CrudFormModal() -> impl IntoView {
    let page = use_crud_page();
    let layout = page.config.with_value(|config| config.layout);
    let open = Signal::derive(move || page.state.with(|state| state.modal_open));
    let submitting = Signal::derive(move || page.state.with(|state| state.submitting.is_some()));
    let shape = create_memo(move |_| {
        page.state
            .with(|state| page.config.with_value(|config| form_shape(state, config)))
    });
    let title = Signal::derive(move || {
        shape.with(|shape| {
            let entity = page
                .config
                .with_value(|config| config.entity_label.resolve(&shape.locale));
            modal_title(shape.mode, &entity, &shape.locale)
        })
    });
    let locale = Signal::derive(move || shape.with(|shape| shape.locale.clone()));
    let read_only = Signal::derive(move || shape.with(|shape| shape.mode.is_read_only()));
    let close = Callback::new(move |()| page.dispatch_action(PageAction::CloseModal));
    let submit = move || page.dispatch_action(PageAction::SubmitForm);

    let body = move || {
        let shape = shape.get();
        shape
            .lines
            .into_iter()
            .map(|line| {
                let fields = line
                    .into_iter()
                    .filter_map(|name| page.config.with_value(|config| config.fields.get(&name).cloned()))
                    .map(|field| {
                        let width = field.layout.width.token();
                        view! {
                            <div class="crud-form-cell" data-ui-width=width>
                                <FieldControl field />
                            </div>
                        }
                    })
                    .collect_view();
                view! { <div class="crud-form-line" data-ui-slot="line">{fields}</div> }
            })
            .collect_view()
    };

    let footer: ChildrenFn = Rc::new(move || {
        view! {
            <>
                <Button
                    variant=ButtonVariant::Quiet
                    disabled=submitting
                    on_click=Callback::new(move |_| close.call(()))
                >
                    {move || {
                        let text = if read_only.get() { UiText::Close } else { UiText::Cancel };
                        text.resolve(&locale.get())
                    }}
                </Button>
                <Show when=move || !read_only.get() fallback=|| ()>
                    <Button
                        variant=ButtonVariant::Primary
                        busy=submitting
                        on_click=Callback::new(move |_| submit())
                    >
                        {move || UiText::Save.resolve(&locale.get())}
                    </Button>
                </Show>
            </>
        }
    });

    view! {
        <Modal
            open=open
            title=title
            size=modal_size(layout)
            dismissible=Signal::derive(move || !submitting.get())
            layout_class="crud-form-modal"
            on_close=close
            footer=footer
        >
            <form
                class="crud-form"
                novalidate=true
                data-ui-layout=layout.token()
                data-form-mode=move || shape.with(|shape| shape.mode.token())
                style=grid_columns(layout)
                on:submit=move |ev| {
                    ev.prevent_default();
                    if !read_only.get_untracked() {
                        submit();
                    }
                }
            >
                {body}
            </form>
        </Modal>
    }
}

#[cfg(test)]
mod tests {
    use crud_contract::{FieldCondition, FieldDescriptor, FieldKind, FieldSet, FieldValue, FormData, PermissionSet};
    use crud_host::CrudSettings;
    use pretty_assertions::assert_eq;

    use super::*;

    fn config(layout: FormLayout) -> PageConfig {
        let fields = FieldSet::new(vec![
            FieldDescriptor::new("name", "Name", FieldKind::text()).at(1, 1),
            FieldDescriptor::new("kind", "Kind", FieldKind::text()).at(1, 2),
            FieldDescriptor::new("company", "Company", FieldKind::text()).when(
                FieldCondition::FieldEquals {
                    field: "kind".into(),
                    value: "company".into(),
                },
            ),
        ])
        .expect("fields");
        PageConfig::new("clients", "/api/clients", "Clients", "Client", fields).with_layout(layout)
    }

    #[test]
    fn shape_tracks_conditional_visibility() {
        let config = config(FormLayout::Rows);
        let mut state = PageState::new(&config, CrudSettings::default(), PermissionSet::default());
        state.form.load(FormData::new(), FormMode::Create);

        let shape = form_shape(&state, &config);
        assert_eq!(shape.lines, vec![vec!["name".to_string(), "kind".to_string()]]);
        assert_eq!(shape.mode, FormMode::Create);

        state.form.set_field("kind", FieldValue::text("company"));
        let shape = form_shape(&state, &config);
        assert_eq!(
            shape.lines,
            vec![
                vec!["name".to_string(), "kind".to_string()],
                vec!["company".to_string()],
            ]
        );
    }

    #[test]
    fn value_edits_keep_the_shape_equal() {
        let config = config(FormLayout::Rows);
        let mut state = PageState::new(&config, CrudSettings::default(), PermissionSet::default());
        state.form.load(FormData::new(), FormMode::Edit);
        let before = form_shape(&state, &config);

        state.form.set_field("name", FieldValue::text("Acme"));
        assert_eq!(form_shape(&state, &config), before);
    }

    #[test]
    fn grid_layouts_widen_the_dialog() {
        assert_eq!(modal_size(FormLayout::Rows), ModalSize::Md);
        assert_eq!(modal_size(FormLayout::Grid { columns: 2 }), ModalSize::Lg);
        assert_eq!(modal_size(FormLayout::Grid { columns: 3 }), ModalSize::Xl);
        assert_eq!(
            grid_columns(FormLayout::Grid { columns: 0 }).as_deref(),
            Some("--crud-form-columns: 1")
        );
        assert_eq!(grid_columns(FormLayout::Flex), None);
    }
}
