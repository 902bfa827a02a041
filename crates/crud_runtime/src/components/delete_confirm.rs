use std::rc::Rc;

use admin_ui::{Button, ButtonVariant, IconName, Modal, ModalSize, Text, TextTone};
use crud_core::PageAction;
use leptos::*;

use crate::{display::UiText, runtime_context::use_crud_page};

#[component]
/// Confirmation dialog for the row held in `delete_target`.
pub fn DeleteConfirmModal() -> impl IntoView {
    let page = use_crud_page();
    let open = Signal::derive(move || page.state.with(|state| state.delete_target.is_some()));
    let deleting = Signal::derive(move || page.state.with(|state| state.deleting));
    let locale = Signal::derive(move || page.state.with(|state| state.locale.clone()));
    let title = Signal::derive(move || {
        let locale = locale.get();
        let entity = page.config.with_value(|config| config.entity_label.resolve(&locale));
        format!("{} {entity}", UiText::Delete.resolve(&locale))
    });
    let cancel = Callback::new(move |()| page.dispatch_action(PageAction::CancelDelete));

    let footer: ChildrenFn = Rc::new(move || {
        view! {
            <>
                <Button
                    variant=ButtonVariant::Quiet
                    disabled=deleting
                    on_click=Callback::new(move |_| cancel.call(()))
                >
                    {move || UiText::Cancel.resolve(&locale.get())}
                </Button>
                <Button
                    variant=ButtonVariant::Danger
                    busy=deleting
                    leading_icon=IconName::Trash
                    on_click=Callback::new(move |_| page.dispatch_action(PageAction::ConfirmDelete))
                >
                    {move || UiText::Delete.resolve(&locale.get())}
                </Button>
            </>
        }
    });

    view! {
        <Modal
            open
            title
            size=ModalSize::Sm
            dismissible=Signal::derive(move || !deleting.get())
            layout_class="crud-delete-modal"
            on_close=cancel
            footer
        >
            <Text tone=TextTone::Secondary>
                {move || UiText::ConfirmDelete.resolve(&locale.get())}
            </Text>
        </Modal>
    }
}
