use std::rc::Rc;

use crud_host::{
    ChronoFormatter, CrudError, CrudFuture, CrudRequest, CrudResponse, CrudTransport,
    HostServices, HostStrategy, MemoryCrudTransport, ToastService,
};

use crate::{HistoryQueryNavigator, WebCrudTransport, WebPrefsStore, WindowEventBus};

/// Returns the compile-time selected host strategy.
///
/// The `memory-backend` feature swaps the REST transport for an in-memory backend so the admin
/// runs without a server.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "memory-backend")]
    {
        HostStrategy::Memory
    }

    #[cfg(not(feature = "memory-backend"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    selected_host_strategy().as_str()
}

/// Adapter enum that erases the concrete transport behind [`CrudTransport`].
#[derive(Debug, Clone)]
pub enum CrudTransportAdapter {
    /// Browser `fetch` against the REST backend.
    Browser(WebCrudTransport),
    /// In-memory backend.
    Memory(MemoryCrudTransport),
}

impl CrudTransport for CrudTransportAdapter {
    fn send<'a>(&'a self, request: CrudRequest) -> CrudFuture<'a, Result<CrudResponse, CrudError>> {
        match self {
            Self::Browser(transport) => transport.send(request),
            Self::Memory(transport) => transport.send(request),
        }
    }
}

/// Builds the transport for the selected strategy; `demo_backend` is only called for
/// [`HostStrategy::Memory`].
pub fn crud_transport(demo_backend: impl FnOnce() -> MemoryCrudTransport) -> CrudTransportAdapter {
    match selected_host_strategy() {
        HostStrategy::Memory => CrudTransportAdapter::Memory(demo_backend()),
        HostStrategy::Browser | HostStrategy::Noop => {
            CrudTransportAdapter::Browser(WebCrudTransport)
        }
    }
}

/// Wires the browser host services.
///
/// Toasts are rendered by the UI layer, which supplies its own [`ToastService`].
pub fn build_host_services(
    toasts: Rc<dyn ToastService>,
    demo_backend: impl FnOnce() -> MemoryCrudTransport,
) -> HostServices {
    HostServices {
        transport: Rc::new(crud_transport(demo_backend)),
        toasts,
        formatter: Rc::new(ChronoFormatter::default()),
        prefs: Rc::new(WebPrefsStore),
        navigator: Rc::new(HistoryQueryNavigator),
        events: Rc::new(WindowEventBus),
        host_strategy: selected_host_strategy(),
    }
}

#[cfg(test)]
mod tests {
    use crud_host::{fetch_list_with, ListQuery, NoopToastService};
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn demo() -> MemoryCrudTransport {
        MemoryCrudTransport::default()
            .with_collection("/api/clients", vec![json!({ "id": 1, "name": "Acme" })])
    }

    #[cfg(not(feature = "memory-backend"))]
    #[test]
    fn browser_strategy_never_builds_the_demo_backend() {
        let services = build_host_services(Rc::new(NoopToastService), || {
            panic!("demo backend must not be built for the browser strategy")
        });
        assert_eq!(services.host_strategy, HostStrategy::Browser);
        assert_eq!(host_strategy_name(), "browser");

        let result = block_on(fetch_list_with(
            services.transport.as_ref(),
            "/api/clients",
            &ListQuery::default(),
        ));
        assert!(matches!(result, Err(CrudError::Transport(_))));
    }

    #[test]
    fn memory_adapter_delegates_to_the_backend() {
        let transport = CrudTransportAdapter::Memory(demo());
        let list = block_on(fetch_list_with(&transport, "/api/clients", &ListQuery::default()))
            .expect("list");
        assert_eq!(list.total, 1);
        assert_eq!(list.data[0]["name"], "Acme");
    }
}
