//! Shared descriptor and value types for the declarative CRUD admin layer.
//!
//! Pages describe their forms ([`FieldDescriptor`]), tables ([`ColumnDescriptor`],
//! [`TableAction`]), and gating ([`Capability`]) statically. The headless core, the host adapters,
//! and the Leptos components all speak these types, so nothing here depends on a UI framework.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

mod capability;
mod events;
mod field;
mod pagination;
mod table;
mod translatable;
mod value;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use capability::{Capability, CapabilityAction, CapabilityScope, Ownership, PermissionSet};
pub use events::{
    GlobalEvent, QuickActionKey, LANGUAGE_CHANGED_EVENT, QUICK_ACTION_OPEN_MODAL_EVENT,
};
pub use field::{
    DependentLevel, DependentSource, FieldCondition, FieldDescriptor, FieldKind, FieldLayout,
    FieldSet, FieldWidth, FileValidation, OptionSource, RelationSource, SelectOption, TextInput,
};
pub use pagination::{PageLink, Paginated};
pub use table::{
    ActionKind, ActionLabel, BadgeTone, ColumnDescriptor, ColumnKind, Row, RowCondition,
    SortDirection, SortState, TableAction,
};
pub use translatable::{
    is_rtl_locale, is_translatable_object, resolve_json_text, TranslatableValue, FALLBACK_LOCALE,
    SECONDARY_LOCALE, SUPPORTED_LOCALES,
};
pub use value::{FieldValue, FileUpload, FormData};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Mode a CRUD form is opened in.
pub enum FormMode {
    /// New record.
    #[default]
    Create,
    /// Existing record, editable.
    Edit,
    /// Existing record, read-only.
    View,
}

impl FormMode {
    /// Stable token for DOM attributes.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Edit => "edit",
            Self::View => "view",
        }
    }

    /// Returns `true` for view mode.
    pub const fn is_read_only(self) -> bool {
        matches!(self, Self::View)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors raised while building descriptors.
pub enum DescriptorError {
    /// Two fields (or dependent levels) share a form key.
    #[error("duplicate form field `{0}`")]
    DuplicateField(String),
    /// A dependent dropdown was declared without levels.
    #[error("dependent dropdown `{0}` has no levels")]
    EmptyDependentDropdown(String),
    /// A backend permission name does not follow `action[-scope]-resource`.
    #[error("invalid permission name `{0}`")]
    InvalidPermission(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_view_mode_is_read_only() {
        assert!(FormMode::View.is_read_only());
        assert!(!FormMode::Edit.is_read_only());
        assert!(!FormMode::Create.is_read_only());
    }
}
