//! Headless CRUD page logic.
//!
//! Everything here is pure state transition: the form state manager, option identity, the
//! dependent-dropdown cascade, client validation, the table model, payload shaping, and the page
//! reducer. Network, toasts, and navigation are requested through [`reducer::PageEffect`] values
//! that `crud_runtime` executes.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod cascade;
pub mod form;
pub mod layout;
pub mod model;
pub mod options;
pub mod payload;
pub mod reducer;
pub mod table;
pub mod validation;

pub use cascade::{child_level_options, expand_endpoint, root_level_options, LevelOptions};
pub use form::{FormState, OptionRequest, OptionState, OptionsOutcome};
pub use layout::{arrange_fields, FormLayout};
pub use model::{FilterDescriptor, FilterKind, FormTarget, PageConfig, PageState};
pub use options::{decode_option_value, encode_option_value, IndexedOption, OptionList};
pub use payload::{
    build_delete_request, build_submit_request, flatten_translations, record_id, PayloadShape,
};
pub use reducer::{reduce_page, PageAction, PageEffect, PageError, PageHook};
pub use table::{
    action_target, action_visible, empty_row_colspan, lookup_path, render_cell, row_ownership,
    sort_indicator, toggle_sort, visible_actions, ActionTarget, CellContent, SortIndicator,
    MISSING_CELL,
};
pub use validation::{validate_form, FieldErrors, FieldIssue, NONE_SENTINEL};
