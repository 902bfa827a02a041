//! Table column, row action, and sort descriptors.

use std::{collections::BTreeMap, fmt, rc::Rc};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Capability, TranslatableValue};

/// Row payload as returned by list endpoints.
pub type Row = Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Semantic badge colors.
pub enum BadgeTone {
    /// Default grey.
    #[default]
    Neutral,
    /// Informational blue.
    Info,
    /// Positive green.
    Success,
    /// Attention amber.
    Warning,
    /// Destructive red.
    Danger,
}

impl BadgeTone {
    /// Tone token written to `data-ui-tone`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Danger => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Cell rendering strategy.
pub enum ColumnKind {
    /// Plain (locale-resolved) text.
    Text,
    /// Pill with a tone chosen by raw value.
    Badge {
        /// Tone per raw value.
        tones: BTreeMap<String, BadgeTone>,
    },
    /// Thumbnail from a URL value.
    Image,
    /// Calendar date.
    Date,
    /// Date and time.
    DateTime,
    /// Monetary amount.
    Currency {
        /// ISO currency code; the formatter default applies when absent.
        currency: Option<String>,
    },
    /// Yes/no indicator.
    Boolean,
    /// Anchor; the template may contain `{id}` or `{field.path}` placeholders.
    Link {
        /// Href template.
        href: String,
    },
    /// Cell rendered by a renderer registered under this key.
    Custom(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Declarative description of one table column.
pub struct ColumnDescriptor {
    /// Dot path into the row (`client.name`).
    pub key: String,
    /// Header label.
    pub label: TranslatableValue,
    /// Cell rendering strategy.
    pub kind: ColumnKind,
    /// Whether clicking the header sorts.
    pub sortable: bool,
    /// Backend sort field when it differs from `key`.
    pub sort_field: Option<String>,
}

impl ColumnDescriptor {
    /// Creates a text column.
    pub fn new(key: impl Into<String>, label: impl Into<TranslatableValue>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind: ColumnKind::Text,
            sortable: false,
            sort_field: None,
        }
    }

    /// Sets the rendering strategy.
    pub fn kind(mut self, kind: ColumnKind) -> Self {
        self.kind = kind;
        self
    }

    /// Enables header sorting.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Enables header sorting on a backend field other than `key`.
    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sortable = true;
        self.sort_field = Some(field.into());
        self
    }

    /// Field name sent as `sort_field`.
    pub fn sort_key(&self) -> &str {
        self.sort_field.as_deref().unwrap_or(&self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Row action identity.
pub enum ActionKind {
    /// Open the form read-only.
    View,
    /// Open the form for editing.
    Edit,
    /// Ask for delete confirmation.
    Delete,
    /// Page-specific action handled by a hook.
    Custom(String),
}

impl ActionKind {
    /// Stable token.
    pub fn as_str(&self) -> &str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Delete => "delete",
            Self::Custom(name) => name,
        }
    }

    /// Parses a token; unknown tokens become [`ActionKind::Custom`].
    pub fn parse(raw: &str) -> Self {
        match raw {
            "view" => Self::View,
            "edit" => Self::Edit,
            "delete" => Self::Delete,
            other => Self::Custom(other.to_string()),
        }
    }
}

#[derive(Clone)]
/// Tooltip label for an action button.
pub enum ActionLabel {
    /// Same label on every row.
    Static(TranslatableValue),
    /// Label computed from the row.
    PerRow(Rc<dyn Fn(&Row) -> String>),
}

impl ActionLabel {
    /// Resolves the label for `row`.
    pub fn resolve(&self, row: &Row, locale: &str) -> String {
        match self {
            Self::Static(label) => label.resolve(locale),
            Self::PerRow(label) => label(row),
        }
    }
}

impl fmt::Debug for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(label) => f.debug_tuple("Static").field(label).finish(),
            Self::PerRow(_) => f.write_str("PerRow(..)"),
        }
    }
}

#[derive(Clone)]
/// Row-specific visibility predicate.
pub struct RowCondition(Rc<dyn Fn(&Row) -> bool>);

impl RowCondition {
    /// Wraps a predicate.
    pub fn new(predicate: impl Fn(&Row) -> bool + 'static) -> Self {
        Self(Rc::new(predicate))
    }

    /// Evaluates the predicate.
    pub fn test(&self, row: &Row) -> bool {
        (self.0)(row)
    }
}

impl fmt::Debug for RowCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RowCondition(..)")
    }
}

#[derive(Debug, Clone)]
/// Declarative row action button.
pub struct TableAction {
    /// Action identity.
    pub action: ActionKind,
    /// Icon token understood by the UI icon set.
    pub icon: &'static str,
    /// Tooltip label.
    pub label: ActionLabel,
    /// Capability the viewer needs.
    pub required_permission: Option<Capability>,
    /// Row predicate.
    pub condition: Option<RowCondition>,
    /// Link template; when present the button navigates instead of dispatching.
    pub href: Option<String>,
}

impl TableAction {
    /// Creates an action.
    pub fn new(
        action: ActionKind,
        icon: &'static str,
        label: impl Into<TranslatableValue>,
    ) -> Self {
        Self {
            action,
            icon,
            label: ActionLabel::Static(label.into()),
            required_permission: None,
            condition: None,
            href: None,
        }
    }

    /// Standard view action.
    pub fn view() -> Self {
        Self::new(
            ActionKind::View,
            "eye",
            TranslatableValue::bilingual("View", "عرض"),
        )
    }

    /// Standard edit action.
    pub fn edit() -> Self {
        Self::new(
            ActionKind::Edit,
            "pencil",
            TranslatableValue::bilingual("Edit", "تعديل"),
        )
    }

    /// Standard delete action.
    pub fn delete() -> Self {
        Self::new(
            ActionKind::Delete,
            "trash",
            TranslatableValue::bilingual("Delete", "حذف"),
        )
    }

    /// Requires a capability.
    pub fn requires(mut self, capability: Capability) -> Self {
        self.required_permission = Some(capability);
        self
    }

    /// Adds a row predicate.
    pub fn when(mut self, condition: impl Fn(&Row) -> bool + 'static) -> Self {
        self.condition = Some(RowCondition::new(condition));
        self
    }

    /// Renders the action as a link.
    pub fn linking_to(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    /// Uses a per-row label.
    pub fn labelled_by(mut self, label: impl Fn(&Row) -> String + 'static) -> Self {
        self.label = ActionLabel::PerRow(Rc::new(label));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Sort direction.
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Query-string token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    /// Parses a query-string token.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Opposite direction.
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Active sort.
pub struct SortState {
    /// Backend sort field.
    pub field: String,
    /// Direction.
    pub direction: SortDirection,
}

impl SortState {
    /// Ascending sort on `field`.
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }
}
