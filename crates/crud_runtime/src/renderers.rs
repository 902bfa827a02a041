//! Registry of page-supplied renderers for `Custom` fields and columns.

use std::{collections::HashMap, rc::Rc};

use crud_contract::{FieldDescriptor, FieldValue, FormMode, Row};
use leptos::*;
use serde_json::Value;

#[derive(Clone)]
/// Inputs handed to a custom field renderer.
pub struct CustomFieldProps {
    /// Field being rendered.
    pub field: FieldDescriptor,
    /// Current value.
    pub value: Signal<FieldValue>,
    /// Form mode; renderers show read-only output in view mode.
    pub mode: FormMode,
    /// Active locale.
    pub locale: Signal<String>,
    /// Field error, if any.
    pub error: Signal<Option<String>>,
    /// Reports a new value for the field.
    pub on_change: Callback<FieldValue>,
}

/// Renders a `Custom` form field.
pub type FieldRenderer = Rc<dyn Fn(CustomFieldProps) -> View>;

/// Renders a `Custom` table cell from the raw cell value and its row.
pub type CellRenderer = Rc<dyn Fn(&Value, &Row) -> View>;

#[derive(Clone, Default)]
/// Custom renderers keyed by the name used in field and column descriptors.
pub struct Renderers {
    fields: HashMap<String, FieldRenderer>,
    cells: HashMap<String, CellRenderer>,
}

impl Renderers {
    /// Registers a field renderer.
    pub fn with_field(
        mut self,
        key: impl Into<String>,
        renderer: impl Fn(CustomFieldProps) -> View + 'static,
    ) -> Self {
        self.fields.insert(key.into(), Rc::new(renderer));
        self
    }

    /// Registers a cell renderer.
    pub fn with_cell(
        mut self,
        key: impl Into<String>,
        renderer: impl Fn(&Value, &Row) -> View + 'static,
    ) -> Self {
        self.cells.insert(key.into(), Rc::new(renderer));
        self
    }

    /// Field renderer registered under `key`.
    pub fn field(&self, key: &str) -> Option<FieldRenderer> {
        self.fields.get(key).cloned()
    }

    /// Cell renderer registered under `key`.
    pub fn cell(&self, key: &str) -> Option<CellRenderer> {
        self.cells.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookups_only_find_registered_keys() {
        let renderers = Renderers::default()
            .with_field("color-swatch", |_props| ().into_view())
            .with_cell("avatar", |_value, _row| ().into_view());

        assert!(renderers.field("color-swatch").is_some());
        assert!(renderers.field("avatar").is_none());
        assert!(renderers.cell("avatar").is_some());
        assert!(renderers.cell("color-swatch").is_none());
    }
}
