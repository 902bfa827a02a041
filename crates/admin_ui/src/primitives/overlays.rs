use super::*;

#[component]
/// Modal dialog rendered while `open` is true.
///
/// Escape and backdrop clicks call `on_close` unless `dismissible` is false (for example while a
/// save is in flight).
pub fn Modal(
    #[prop(into)] open: Signal<bool>,
    #[prop(optional, into)] title: MaybeSignal<String>,
    #[prop(default = ModalSize::Md)] size: ModalSize,
    #[prop(default = MaybeSignal::Static(true), into)] dismissible: MaybeSignal<bool>,
    #[prop(optional)] layout_class: Option<&'static str>,
    on_close: Callback<()>,
    #[prop(optional)] footer: Option<ChildrenFn>,
    children: ChildrenFn,
) -> impl IntoView {
    let title = Signal::derive(move || title.get());
    let request_close = move || {
        if dismissible.get_untracked() {
            on_close.call(());
        }
    };

    let escape = window_event_listener(ev::keydown, move |ev| {
        if open.get_untracked() && ev.key() == "Escape" {
            request_close();
        }
    });
    on_cleanup(move || escape.remove());

    let class = merge_layout_class("ui-modal", layout_class);
    view! {
        <Show when=move || open.get() fallback=|| ()>
            <div
                class="ui-modal-backdrop"
                data-ui-primitive="true"
                data-ui-kind="modal-backdrop"
                on:click=move |_| request_close()
            >
                <div
                    class=class.clone()
                    role="dialog"
                    aria-modal="true"
                    aria-label=move || title.get()
                    data-ui-primitive="true"
                    data-ui-kind="modal"
                    data-ui-size=size.token()
                    on:click=|ev: MouseEvent| ev.stop_propagation()
                >
                    <header data-ui-slot="header">
                        <h2 data-ui-slot="title">{move || title.get()}</h2>
                        <IconButton
                            icon=IconName::Close
                            aria_label="Close"
                            disabled=Signal::derive(move || !dismissible.get())
                            on_click=Callback::new(move |_| request_close())
                        />
                    </header>
                    <div data-ui-slot="body">{children()}</div>
                    {footer.as_ref().map(|footer| view! { <footer data-ui-slot="footer">{footer()}</footer> })}
                </div>
            </div>
        </Show>
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One notification shown by [`ToastRegion`].
pub struct ToastItem {
    /// Identifier used for dismissal.
    pub id: u64,
    /// Visual tone.
    pub tone: TextTone,
    /// Message body.
    pub message: String,
}

#[component]
/// Fixed-position live region listing toasts, newest last.
pub fn ToastRegion(
    #[prop(into)] toasts: Signal<Vec<ToastItem>>,
    on_dismiss: Callback<u64>,
) -> impl IntoView {
    view! {
        <div
            class="ui-toast-region"
            role="status"
            aria-live="polite"
            data-ui-primitive="true"
            data-ui-kind="toast-region"
        >
            <For each=move || toasts.get() key=|toast| toast.id let:toast>
                <div
                    class="ui-toast"
                    data-ui-primitive="true"
                    data-ui-kind="toast"
                    data-ui-tone=toast.tone.token()
                >
                    <Icon
                        icon=match toast.tone {
                            TextTone::Success => IconName::Check,
                            TextTone::Danger | TextTone::Warning => IconName::Warning,
                            _ => IconName::Info,
                        }
                        size=IconSize::Sm
                    />
                    <span data-ui-slot="message">{toast.message.clone()}</span>
                    <IconButton
                        icon=IconName::Close
                        aria_label="Dismiss"
                        on_click=Callback::new(move |_| on_dismiss.call(toast.id))
                    />
                </div>
            </For>
        </div>
    }
}
