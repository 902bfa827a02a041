//! Browser entry crate: admin page descriptions, the offline demo backend, and the app shell.

mod demo_backend;
mod pages;
mod web_app;

pub use demo_backend::seeded_backend;
pub use pages::{all_pages, case_types_page, clients_page, hearings_page, roles_page};
pub use web_app::SiteApp;

#[cfg(all(feature = "csr", target_arch = "wasm32"))]
pub fn mount() {
    console_error_panic_hook::set_once();
    leptos::mount_to_body(|| leptos::view! { <SiteApp /> })
}
