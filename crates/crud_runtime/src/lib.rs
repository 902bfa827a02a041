//! Leptos runtime for declarative admin CRUD pages.
//!
//! [`AdminProvider`] hosts the injected services, settings, viewer capabilities, and locale.
//! [`PageCrud`] renders one resource from a [`crud_core::PageConfig`]; its reducer effects are
//! executed by [`effect_executor`]. [`QuickActionHost`] mounts the global create dialogs.

pub mod components;
pub mod display;
pub mod effect_executor;
pub mod renderers;
pub mod runtime_context;
pub mod toasts;

pub use components::{
    CrudFormModal, CrudTable, DeleteConfirmModal, FieldControl, FilterControl, PageCrud,
    QuickActionHost,
};
pub use renderers::{CellRenderer, CustomFieldProps, FieldRenderer, Renderers};
pub use runtime_context::{
    text_direction, use_admin, use_crud_page, AdminContext, AdminProvider, CrudPageContext,
    PageHooks,
};
pub use toasts::{SignalToastService, ToastHost};
