//! Signal-backed toast service and the region that renders it.

#[cfg(target_arch = "wasm32")]
use std::time::Duration;

use admin_ui::{ToastItem, ToastRegion};
use crud_host::{Toast, ToastService};
use leptos::*;

use crate::display::toast_tone;

#[derive(Debug, Clone, Copy)]
/// [`ToastService`] that keeps toasts in a signal; [`ToastHost`] renders them.
pub struct SignalToastService {
    /// Toasts currently shown, oldest first.
    pub toasts: RwSignal<Vec<Toast>>,
    /// Auto-dismiss delay, updated when settings load.
    pub timeout_ms: RwSignal<u32>,
}

impl SignalToastService {
    /// Creates the service under the current reactive owner.
    pub fn new(timeout_ms: u32) -> Self {
        Self {
            toasts: create_rw_signal(Vec::new()),
            timeout_ms: create_rw_signal(timeout_ms),
        }
    }
}

impl ToastService for SignalToastService {
    fn show(&self, toast: Toast) -> u64 {
        let id = toast.id;
        let auto_dismiss = toast.kind.auto_dismisses();
        self.toasts.update(|toasts| toasts.push(toast));
        #[cfg(target_arch = "wasm32")]
        {
            if auto_dismiss {
                let service = *self;
                let delay = Duration::from_millis(u64::from(self.timeout_ms.get_untracked()));
                set_timeout(move || service.dismiss(id), delay);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = auto_dismiss;
        }
        id
    }

    fn dismiss(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
    }
}

#[component]
/// Renders the toasts of a [`SignalToastService`].
pub fn ToastHost(service: SignalToastService) -> impl IntoView {
    let items = Signal::derive(move || {
        service
            .toasts
            .get()
            .into_iter()
            .map(|toast| ToastItem {
                id: toast.id,
                tone: toast_tone(toast.kind),
                message: toast.message,
            })
            .collect::<Vec<_>>()
    });

    view! {
        <ToastRegion toasts=items on_dismiss=Callback::new(move |id| service.dismiss(id)) />
    }
}

#[cfg(test)]
mod tests {
    use crud_host::{toast_error, ToastKind};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn sticky_toasts_stay_until_dismissed() {
        let runtime = create_runtime();
        let service = SignalToastService::new(4000);

        let id = service.show(Toast::new(ToastKind::Loading, "Uploading"));
        assert_eq!(service.toasts.get_untracked().len(), 1);
        service.dismiss(id);
        assert!(service.toasts.get_untracked().is_empty());

        runtime.dispose();
    }

    #[test]
    fn error_helper_records_an_error_toast() {
        let runtime = create_runtime();
        let service = SignalToastService::new(0);

        toast_error(&service, "offline");
        let toasts = service.toasts.get_untracked();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].message, "offline");

        runtime.dispose();
    }
}
