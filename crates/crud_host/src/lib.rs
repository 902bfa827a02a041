//! Typed host-service contracts for the CRUD admin layer.
//!
//! This crate is the boundary between the headless CRUD logic and whatever environment runs it.
//! It owns the REST request/response/error model, list-query encoding, and the service traits
//! (transport, toasts, formatting, prefs, navigation, events) together with in-memory and no-op
//! adapters. Browser adapters live in `crud_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod format;
pub mod http;
pub mod notifications;
pub mod prefs;
pub mod query;
pub mod services;
pub mod settings;
pub mod time;
pub mod transport;

pub use format::{ChronoFormatter, ValueFormatter};
pub use http::{
    CrudBody, CrudError, CrudRequest, CrudResponse, HttpMethod, MultipartValue, ServerErrors,
};
pub use notifications::{
    toast_error, toast_success, MemoryToastService, NoopToastService, Toast, ToastKind,
    ToastService,
};
pub use prefs::{load_pref_with, MemoryPrefsStore, NoopPrefsStore, PrefsStore, PrefsStoreFuture};
pub use query::ListQuery;
pub use services::{
    EventBus, HostServices, HostStrategy, MemoryEventBus, MemoryQueryNavigator, NoopEventBus,
    QueryNavigator,
};
pub use settings::{load_settings_with, CrudSettings, RelationFailurePolicy, CRUD_SETTINGS_KEY};
pub use time::{next_monotonic_id, unix_time_ms_now};
pub use transport::{
    fetch_list_with, fetch_options_with, parse_relation_options, CrudFuture, CrudTransport,
    MemoryCrudTransport, NoopCrudTransport,
};
