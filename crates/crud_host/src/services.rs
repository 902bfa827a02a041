//! Host service bundle injected into the CRUD runtime, plus the small browser-shell seams.

use std::{cell::RefCell, rc::Rc};

use crud_contract::GlobalEvent;

use crate::{
    format::{ChronoFormatter, ValueFormatter},
    notifications::{MemoryToastService, NoopToastService, ToastService},
    prefs::{MemoryPrefsStore, NoopPrefsStore, PrefsStore},
    transport::{CrudTransport, MemoryCrudTransport, NoopCrudTransport},
};

/// Reads and rewrites the page query string without a reload.
pub trait QueryNavigator {
    /// Current query string without the leading `?`.
    fn current_query(&self) -> String;

    /// Replaces the query string, keeping the path and history length.
    fn replace_query(&self, query: &str);
}

#[derive(Debug, Clone, Default)]
/// Navigator keeping the query in memory.
pub struct MemoryQueryNavigator {
    inner: Rc<RefCell<String>>,
}

impl QueryNavigator for MemoryQueryNavigator {
    fn current_query(&self) -> String {
        self.inner.borrow().clone()
    }

    fn replace_query(&self, query: &str) {
        *self.inner.borrow_mut() = query.trim_start_matches('?').to_string();
    }
}

/// Emits window-level custom events.
pub trait EventBus {
    /// Dispatches `event`.
    fn dispatch(&self, event: &GlobalEvent);
}

#[derive(Debug, Clone, Copy, Default)]
/// Event bus that drops events.
pub struct NoopEventBus;

impl EventBus for NoopEventBus {
    fn dispatch(&self, _event: &GlobalEvent) {}
}

#[derive(Debug, Clone, Default)]
/// Event bus recording dispatched events.
pub struct MemoryEventBus {
    inner: Rc<RefCell<Vec<GlobalEvent>>>,
}

impl MemoryEventBus {
    /// Events dispatched so far.
    pub fn events(&self) -> Vec<GlobalEvent> {
        self.inner.borrow().clone()
    }
}

impl EventBus for MemoryEventBus {
    fn dispatch(&self, event: &GlobalEvent) {
        self.inner.borrow_mut().push(event.clone());
    }
}

/// Which adapter family a [`HostServices`] bundle was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser `fetch`, `localStorage`, and `window` events.
    Browser,
    /// In-memory adapters (tests, offline demo).
    Memory,
    /// Nothing wired.
    Noop,
}

impl HostStrategy {
    /// Stable token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::Memory => "memory",
            Self::Noop => "noop",
        }
    }
}

/// Host services consumed by the CRUD runtime.
///
/// Adapter selection happens before the bundle reaches `crud_runtime`, so the components never
/// import browser APIs directly.
#[derive(Clone)]
pub struct HostServices {
    /// REST round trips.
    pub transport: Rc<dyn CrudTransport>,
    /// Toast display.
    pub toasts: Rc<dyn ToastService>,
    /// Date/number/currency display.
    pub formatter: Rc<dyn ValueFormatter>,
    /// Persisted preferences.
    pub prefs: Rc<dyn PrefsStore>,
    /// Address-bar query state.
    pub navigator: Rc<dyn QueryNavigator>,
    /// Outgoing window events.
    pub events: Rc<dyn EventBus>,
    /// Adapter family.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Bundle where every service is inert.
    pub fn noop() -> Self {
        Self {
            transport: Rc::new(NoopCrudTransport),
            toasts: Rc::new(NoopToastService),
            formatter: Rc::new(ChronoFormatter::default()),
            prefs: Rc::new(NoopPrefsStore),
            navigator: Rc::new(MemoryQueryNavigator::default()),
            events: Rc::new(NoopEventBus),
            host_strategy: HostStrategy::Noop,
        }
    }

    /// Bundle over in-memory adapters; the concrete handles stay with the caller for assertions.
    pub fn memory(
        transport: MemoryCrudTransport,
        toasts: MemoryToastService,
        events: MemoryEventBus,
    ) -> Self {
        Self {
            transport: Rc::new(transport),
            toasts: Rc::new(toasts),
            formatter: Rc::new(ChronoFormatter::default()),
            prefs: Rc::new(MemoryPrefsStore::default()),
            navigator: Rc::new(MemoryQueryNavigator::default()),
            events: Rc::new(events),
            host_strategy: HostStrategy::Memory,
        }
    }
}

#[cfg(test)]
mod tests {
    use crud_contract::QuickActionKey;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{http::CrudRequest, notifications::toast_success};

    #[test]
    fn memory_bundle_shares_handles_with_caller() {
        let transport = MemoryCrudTransport::default().with_collection("/api/tasks", Vec::new());
        let toasts = MemoryToastService::default();
        let events = MemoryEventBus::default();
        let services = HostServices::memory(transport.clone(), toasts.clone(), events.clone());

        block_on(services.transport.send(CrudRequest::get("/api/tasks"))).expect("list");
        toast_success(services.toasts.as_ref(), "ok");
        services.events.dispatch(&GlobalEvent::QuickActionOpenModal {
            key: QuickActionKey::Tasks,
        });
        services.navigator.replace_query("?page=2");

        assert_eq!(transport.requests().len(), 1);
        assert_eq!(toasts.toasts().len(), 1);
        assert_eq!(events.events().len(), 1);
        assert_eq!(services.navigator.current_query(), "page=2");
        assert_eq!(services.host_strategy.as_str(), "memory");
    }

    #[test]
    fn noop_transport_rejects_requests() {
        let services = HostServices::noop();
        assert!(block_on(services.transport.send(CrudRequest::get("/api/tasks"))).is_err());
    }
}
