//! Browser (`wasm32`) implementations of [`crud_host`] service contracts.
//!
//! This crate wires the REST transport (`fetch` with JSON or multipart bodies), the registry of
//! chosen upload files, `localStorage` preferences, window `CustomEvent` dispatch and parsing,
//! and address-bar query rewriting. Non-wasm builds compile to inert fallbacks so the workspace
//! tests run natively.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Compile-time host-strategy selection and concrete adapter factories for runtime wiring.
pub mod adapters;
pub mod events;
pub mod files;
pub mod navigation;
pub mod prefs;
pub mod transport;

pub use adapters::{
    build_host_services, crud_transport, host_strategy_name, selected_host_strategy,
    CrudTransportAdapter,
};
pub use events::{event_detail, parse_window_event, WindowEventBus};
pub use files::{register_file, register_input_files, release_file};
pub use navigation::{query_url, HistoryQueryNavigator};
pub use prefs::{storage_key, WebPrefsStore, PREFS_NAMESPACE};
pub use transport::WebCrudTransport;
