//! Toast notification contract and adapters.

use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::time::next_monotonic_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Toast severity.
pub enum ToastKind {
    /// Operation succeeded.
    Success,
    /// Operation failed.
    Error,
    /// Neutral information.
    Info,
    /// Operation in progress; stays until dismissed.
    Loading,
}

impl ToastKind {
    /// Token written to `data-ui-tone`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Loading => "loading",
        }
    }

    /// Loading toasts do not auto-dismiss.
    pub const fn auto_dismisses(self) -> bool {
        !matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A toast currently shown (or recorded).
pub struct Toast {
    /// Process-unique id.
    pub id: u64,
    /// Severity.
    pub kind: ToastKind,
    /// Message text.
    pub message: String,
}

impl Toast {
    /// Creates a toast with a fresh id.
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            id: next_monotonic_id(),
            kind,
            message: message.into(),
        }
    }
}

/// Host service for transient user-visible toasts.
pub trait ToastService {
    /// Shows a toast and returns its id.
    fn show(&self, toast: Toast) -> u64;

    /// Removes a toast.
    fn dismiss(&self, id: u64);
}

#[derive(Debug, Clone, Copy, Default)]
/// Toast service that drops every toast.
pub struct NoopToastService;

impl ToastService for NoopToastService {
    fn show(&self, toast: Toast) -> u64 {
        toast.id
    }

    fn dismiss(&self, _id: u64) {}
}

#[derive(Debug, Clone, Default)]
/// Toast service that keeps shown toasts in memory.
pub struct MemoryToastService {
    inner: Rc<RefCell<Vec<Toast>>>,
}

impl MemoryToastService {
    /// Toasts still shown, oldest first.
    pub fn toasts(&self) -> Vec<Toast> {
        self.inner.borrow().clone()
    }
}

impl ToastService for MemoryToastService {
    fn show(&self, toast: Toast) -> u64 {
        let id = toast.id;
        self.inner.borrow_mut().push(toast);
        id
    }

    fn dismiss(&self, id: u64) {
        self.inner.borrow_mut().retain(|toast| toast.id != id);
    }
}

/// Shows a success toast.
pub fn toast_success(service: &dyn ToastService, message: impl Into<String>) -> u64 {
    service.show(Toast::new(ToastKind::Success, message))
}

/// Shows an error toast.
pub fn toast_error(service: &dyn ToastService, message: impl Into<String>) -> u64 {
    service.show(Toast::new(ToastKind::Error, message))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn memory_toasts_record_and_dismiss() {
        let service = MemoryToastService::default();
        let first = toast_success(&service, "Saved");
        let second = toast_error(&service, "Failed");
        assert!(second > first);
        service.dismiss(first);
        let toasts = service.toasts();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts[0].kind, ToastKind::Error);
        assert_eq!(toasts[0].message, "Failed");
    }

    #[test]
    fn loading_toasts_are_sticky() {
        assert!(!ToastKind::Loading.auto_dismisses());
        assert!(ToastKind::Success.auto_dismisses());
    }
}
