//! Form field descriptors.
//!
//! A page declares its form as a list of [`FieldDescriptor`] values. The field type is a tagged
//! union ([`FieldKind`]) so the renderer and the validator dispatch exhaustively over it.

use std::{collections::BTreeMap, fmt, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{DescriptorError, FieldValue, FormData, FormMode, TranslatableValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One selectable option.
pub struct SelectOption {
    /// Raw value submitted to the backend.
    pub value: String,
    /// Display label.
    pub label: TranslatableValue,
}

impl SelectOption {
    /// Creates an option.
    pub fn new(value: impl Into<String>, label: impl Into<TranslatableValue>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Remote option list fetched once per field when a form opens.
pub struct RelationSource {
    /// Endpoint returning `[...]` or `{ data: [...] }`.
    pub endpoint: String,
    /// Preferred key holding the option value (falls back to `id`, then `value`).
    pub value_key: String,
    /// Preferred key holding the option label (falls back to `name`, then `label`).
    pub label_key: String,
}

impl RelationSource {
    /// Creates a relation source with the conventional `id`/`name` keys.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            value_key: "id".to_string(),
            label_key: "name".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where a choice field gets its options.
pub enum OptionSource {
    /// Options declared with the page.
    Static(Vec<SelectOption>),
    /// Options fetched from an endpoint.
    Relation(RelationSource),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Options source for one level of a dependent dropdown.
pub enum DependentSource {
    /// Fixed options (root level).
    Static(Vec<SelectOption>),
    /// Fetched options (root level).
    Relation(RelationSource),
    /// Options keyed by the parent level's value.
    ByParent(BTreeMap<String, Vec<SelectOption>>),
    /// Endpoint template containing a `{parent_name}` placeholder.
    Endpoint(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One linked select inside a dependent dropdown.
pub struct DependentLevel {
    /// Form key the level writes to.
    pub name: String,
    /// Display label.
    pub label: TranslatableValue,
    /// Whether the level must be chosen.
    pub required: bool,
    /// Options source.
    pub source: DependentSource,
}

impl DependentLevel {
    /// Creates a required level.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<TranslatableValue>,
        source: DependentSource,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            required: true,
            source,
        }
    }

    /// Marks the level optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Client-side constraints for uploads.
pub struct FileValidation {
    /// Maximum accepted size.
    pub max_size_bytes: Option<u64>,
    /// Accepted MIME types; `image/*` style wildcards match a whole family.
    pub allowed_mime_types: Vec<String>,
    /// Accepted extensions without the dot.
    pub allowed_extensions: Vec<String>,
}

impl FileValidation {
    /// Returns the HTML `accept` attribute value.
    pub fn accept_attribute(&self) -> String {
        self.allowed_mime_types
            .iter()
            .cloned()
            .chain(self.allowed_extensions.iter().map(|ext| format!(".{ext}")))
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// HTML input flavour for text fields.
pub enum TextInput {
    /// Plain text.
    #[default]
    Text,
    /// Email address.
    Email,
    /// Password.
    Password,
    /// URL.
    Url,
    /// Telephone number.
    Tel,
}

impl TextInput {
    /// HTML `type` attribute.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Password => "password",
            Self::Url => "url",
            Self::Tel => "tel",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Field type with its type-specific configuration.
pub enum FieldKind {
    /// Single-line text input.
    Text {
        /// HTML input flavour.
        input: TextInput,
    },
    /// Multi-line text.
    TextArea {
        /// Visible rows.
        rows: u16,
    },
    /// Single choice.
    Select {
        /// Options source.
        source: OptionSource,
    },
    /// Multiple choices; values are always lists.
    MultiSelect {
        /// Options source.
        source: OptionSource,
    },
    /// Searchable single choice.
    Combobox {
        /// Options source.
        source: OptionSource,
        /// Whether free text outside the options is accepted.
        allow_custom: bool,
    },
    /// Radio group.
    Radio {
        /// Declared options.
        options: Vec<SelectOption>,
    },
    /// Calendar date (`YYYY-MM-DD`).
    Date,
    /// Time of day (`HH:MM`).
    Time,
    /// Local date and time.
    DateTime,
    /// Numeric input.
    Number {
        /// Lower bound.
        min: Option<f64>,
        /// Upper bound.
        max: Option<f64>,
        /// Step.
        step: Option<f64>,
    },
    /// Monetary amount.
    Currency {
        /// ISO currency code; the formatter default applies when absent.
        currency: Option<String>,
    },
    /// Color picker (`#rrggbb`).
    Color,
    /// Checkbox.
    Checkbox,
    /// Toggle switch.
    Switch,
    /// Upload.
    File {
        /// Client-side constraints.
        validation: FileValidation,
        /// Whether several files may be chosen.
        multiple: bool,
    },
    /// Upload or pick an existing media item.
    MediaPicker {
        /// Media library listing, when picking existing items is allowed.
        library: Option<RelationSource>,
        /// Client-side constraints for new uploads.
        validation: FileValidation,
    },
    /// Linked selects where each level filters the next.
    DependentDropdown {
        /// Levels from root to leaf.
        levels: Vec<DependentLevel>,
    },
    /// Control rendered by a renderer registered under this key.
    Custom {
        /// Renderer registry key.
        renderer: String,
    },
}

impl FieldKind {
    /// Plain text input.
    pub const fn text() -> Self {
        Self::Text {
            input: TextInput::Text,
        }
    }

    /// Static single select.
    pub fn select(options: Vec<SelectOption>) -> Self {
        Self::Select {
            source: OptionSource::Static(options),
        }
    }

    /// Relation-backed single select.
    pub fn relation_select(endpoint: impl Into<String>) -> Self {
        Self::Select {
            source: OptionSource::Relation(RelationSource::new(endpoint)),
        }
    }

    /// Stable type token, also used as the `data-field-kind` DOM attribute.
    pub const fn token(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::TextArea { .. } => "textarea",
            Self::Select { .. } => "select",
            Self::MultiSelect { .. } => "multi-select",
            Self::Combobox { .. } => "combobox",
            Self::Radio { .. } => "radio",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Number { .. } => "number",
            Self::Currency { .. } => "currency",
            Self::Color => "color",
            Self::Checkbox => "checkbox",
            Self::Switch => "switch",
            Self::File { .. } => "file",
            Self::MediaPicker { .. } => "media-picker",
            Self::DependentDropdown { .. } => "dependent-dropdown",
            Self::Custom { .. } => "custom",
        }
    }

    /// Upload-capable kinds.
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File { .. } | Self::MediaPicker { .. })
    }

    /// Kinds whose value is a list.
    pub const fn is_multi(&self) -> bool {
        matches!(
            self,
            Self::MultiSelect { .. } | Self::File { multiple: true, .. }
        )
    }

    /// Option source for choice kinds.
    pub fn option_source(&self) -> Option<&OptionSource> {
        match self {
            Self::Select { source }
            | Self::MultiSelect { source }
            | Self::Combobox { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Upload constraints for file kinds.
    pub fn file_validation(&self) -> Option<&FileValidation> {
        match self {
            Self::File { validation, .. } | Self::MediaPicker { validation, .. } => {
                Some(validation)
            }
            _ => None,
        }
    }
}

#[derive(Clone)]
/// Visibility rule for a field.
pub enum FieldCondition {
    /// Arbitrary predicate over the mode and the current record.
    Predicate(Rc<dyn Fn(FormMode, &FormData) -> bool>),
    /// Visible when another field currently holds this text value.
    FieldEquals {
        /// Field to inspect.
        field: String,
        /// Expected value.
        value: String,
    },
    /// Visible only in these modes.
    Modes(Vec<FormMode>),
}

impl FieldCondition {
    /// Wraps a predicate closure.
    pub fn predicate(predicate: impl Fn(FormMode, &FormData) -> bool + 'static) -> Self {
        Self::Predicate(Rc::new(predicate))
    }

    /// Evaluates the rule.
    pub fn is_met(&self, mode: FormMode, data: &FormData) -> bool {
        match self {
            Self::Predicate(predicate) => predicate(mode, data),
            Self::FieldEquals { field, value } => data
                .get(field)
                .map(|current| current.as_text() == *value)
                .unwrap_or(false),
            Self::Modes(modes) => modes.contains(&mode),
        }
    }
}

impl fmt::Debug for FieldCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Predicate(..)"),
            Self::FieldEquals { field, value } => f
                .debug_struct("FieldEquals")
                .field("field", field)
                .field("value", value)
                .finish(),
            Self::Modes(modes) => f.debug_tuple("Modes").field(modes).finish(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Horizontal share of the form row a field occupies.
pub enum FieldWidth {
    /// Whole row.
    #[default]
    Full,
    /// Half row.
    Half,
    /// One third.
    Third,
    /// One quarter.
    Quarter,
}

impl FieldWidth {
    /// Layout token written to `data-ui-width`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Half => "half",
            Self::Third => "third",
            Self::Quarter => "quarter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// Placement hints consumed by the form layout strategy.
pub struct FieldLayout {
    /// Row index for row layout.
    pub row: Option<u16>,
    /// Column index for grid layout.
    pub column: Option<u16>,
    /// Width share.
    pub width: FieldWidth,
}

#[derive(Debug, Clone)]
/// Declarative description of one form field.
pub struct FieldDescriptor {
    /// Unique key inside the form.
    pub name: String,
    /// Display label.
    pub label: TranslatableValue,
    /// Type and type-specific configuration.
    pub kind: FieldKind,
    /// Whether a value is mandatory.
    pub required: bool,
    /// Value applied in create mode when the record has none.
    pub default_value: Option<FieldValue>,
    /// Input placeholder.
    pub placeholder: Option<TranslatableValue>,
    /// Help text under the control.
    pub help_text: Option<TranslatableValue>,
    /// Visibility rule.
    pub conditional: Option<FieldCondition>,
    /// Placement hints.
    pub layout: FieldLayout,
    /// Rendered disabled in create/edit mode.
    pub read_only: bool,
}

impl FieldDescriptor {
    /// Creates an optional field.
    pub fn new(
        name: impl Into<String>,
        label: impl Into<TranslatableValue>,
        kind: FieldKind,
    ) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            default_value: None,
            placeholder: None,
            help_text: None,
            conditional: None,
            layout: FieldLayout::default(),
            read_only: false,
        }
    }

    /// Marks the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the create-mode default.
    pub fn with_default(mut self, value: impl Into<FieldValue>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Sets the placeholder.
    pub fn with_placeholder(mut self, placeholder: impl Into<TranslatableValue>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Sets the help text.
    pub fn with_help(mut self, help: impl Into<TranslatableValue>) -> Self {
        self.help_text = Some(help.into());
        self
    }

    /// Attaches a visibility rule.
    pub fn when(mut self, condition: FieldCondition) -> Self {
        self.conditional = Some(condition);
        self
    }

    /// Places the field at `row`/`column`.
    pub fn at(mut self, row: u16, column: u16) -> Self {
        self.layout.row = Some(row);
        self.layout.column = Some(column);
        self
    }

    /// Sets the width share.
    pub fn width(mut self, width: FieldWidth) -> Self {
        self.layout.width = width;
        self
    }

    /// Renders the field disabled.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// Evaluates [`Self::conditional`]; fields without a rule are always visible.
    pub fn is_visible(&self, mode: FormMode, data: &FormData) -> bool {
        self.conditional
            .as_ref()
            .map(|condition| condition.is_met(mode, data))
            .unwrap_or(true)
    }

    /// Every form key the field writes (dependent dropdowns write one key per level).
    pub fn keys(&self) -> Vec<&str> {
        match &self.kind {
            FieldKind::DependentDropdown { levels } => {
                levels.iter().map(|level| level.name.as_str()).collect()
            }
            _ => vec![self.name.as_str()],
        }
    }
}

#[derive(Debug, Clone)]
/// Ordered, name-unique set of form fields.
pub struct FieldSet(Rc<[FieldDescriptor]>);

impl FieldSet {
    /// Validates uniqueness of every form key, including dependent-dropdown levels.
    ///
    /// # Errors
    ///
    /// Returns [`DescriptorError::DuplicateField`] naming the first repeated key.
    pub fn new(fields: Vec<FieldDescriptor>) -> Result<Self, DescriptorError> {
        let mut seen = std::collections::BTreeSet::new();
        for field in &fields {
            if let FieldKind::DependentDropdown { levels } = &field.kind {
                if levels.is_empty() {
                    return Err(DescriptorError::EmptyDependentDropdown(field.name.clone()));
                }
            }
            let mut keys = field.keys();
            if !keys.contains(&field.name.as_str()) {
                keys.push(field.name.as_str());
            }
            for key in keys {
                if !seen.insert(key.to_string()) {
                    return Err(DescriptorError::DuplicateField(key.to_string()));
                }
            }
        }
        Ok(Self(fields.into()))
    }

    /// Iterates fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.0.iter()
    }

    /// Looks up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.0.iter().find(|field| field.name == name)
    }

    /// Finds the dependent dropdown owning level `key` and the level's index.
    pub fn dependent_level(&self, key: &str) -> Option<(&FieldDescriptor, usize)> {
        self.0.iter().find_map(|field| match &field.kind {
            FieldKind::DependentDropdown { levels } => levels
                .iter()
                .position(|level| level.name == key)
                .map(|index| (field, index)),
            _ => None,
        })
    }

    /// Returns `true` when any field accepts uploads.
    pub fn has_file_fields(&self) -> bool {
        self.0.iter().any(|field| field.kind.is_file())
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` when the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn court_cascade() -> FieldDescriptor {
        FieldDescriptor::new(
            "location",
            "Location",
            FieldKind::DependentDropdown {
                levels: vec![
                    DependentLevel::new(
                        "court_id",
                        "Court",
                        DependentSource::Relation(RelationSource::new("/api/courts")),
                    ),
                    DependentLevel::new(
                        "branch_id",
                        "Branch",
                        DependentSource::Endpoint("/api/courts/{court_id}/branches".into()),
                    ),
                ],
            },
        )
    }

    #[test]
    fn field_set_rejects_duplicate_names_across_dependent_levels() {
        let err = FieldSet::new(vec![
            court_cascade(),
            FieldDescriptor::new("branch_id", "Branch", FieldKind::text()),
        ])
        .unwrap_err();
        assert_eq!(err, DescriptorError::DuplicateField("branch_id".into()));
    }

    #[test]
    fn dependent_level_lookup_returns_owner_and_index() {
        let fields = FieldSet::new(vec![court_cascade()]).expect("fields");
        let (owner, index) = fields.dependent_level("branch_id").expect("level");
        assert_eq!(owner.name, "location");
        assert_eq!(index, 1);
    }

    #[test]
    fn conditions_evaluate_against_mode_and_data() {
        let mut data = FormData::new();
        data.set("billing_type", "hourly");
        let currency = FieldKind::Currency { currency: None };
        let rate = FieldDescriptor::new("rate", "Rate", currency).when(FieldCondition::FieldEquals {
            field: "billing_type".into(),
            value: "hourly".into(),
        });
        assert!(rate.is_visible(FormMode::Create, &data));
        data.set("billing_type", "fixed");
        assert!(!rate.is_visible(FormMode::Create, &data));

        let created_at = FieldDescriptor::new("created_at", "Created", FieldKind::DateTime)
            .when(FieldCondition::Modes(vec![FormMode::View]));
        assert!(!created_at.is_visible(FormMode::Edit, &data));
        assert!(created_at.is_visible(FormMode::View, &data));
    }

    #[test]
    fn accept_attribute_joins_mimes_and_extensions() {
        let validation = FileValidation {
            max_size_bytes: None,
            allowed_mime_types: vec!["image/*".into()],
            allowed_extensions: vec!["pdf".into()],
        };
        assert_eq!(validation.accept_attribute(), "image/*,.pdf");
    }
}
