//! Page configuration and runtime state for a declarative CRUD page.

use crud_contract::{
    Capability, CapabilityAction, ColumnDescriptor, FieldSet, FormMode, Ownership, Paginated,
    PermissionSet, QuickActionKey, RelationSource, Row, SelectOption, TableAction,
    TranslatableValue,
};
use crud_host::{CrudSettings, ListQuery, ServerErrors};

use crate::{form::FormState, layout::FormLayout, payload::PayloadShape};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Form a set of server errors was reported for.
pub struct FormTarget {
    /// Mode of the failed submit.
    pub mode: FormMode,
    /// Record id, `None` for create.
    pub record_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Input control of a list filter.
pub enum FilterKind {
    /// Free text.
    Text,
    /// Fixed choices.
    Select(Vec<SelectOption>),
    /// Choices fetched from an endpoint.
    Relation(RelationSource),
    /// Yes / no / any.
    Boolean,
    /// Calendar date.
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One filter shown above the table; its value is sent as `key=value`.
pub struct FilterDescriptor {
    /// Query parameter name.
    pub key: String,
    /// Label.
    pub label: TranslatableValue,
    /// Control.
    pub kind: FilterKind,
}

impl FilterDescriptor {
    /// Creates a filter.
    pub fn new(
        key: impl Into<String>,
        label: impl Into<TranslatableValue>,
        kind: FilterKind,
    ) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone)]
/// Static description of a CRUD page.
pub struct PageConfig {
    /// Capability resource slug (`case-types`).
    pub resource: String,
    /// REST collection endpoint.
    pub endpoint: String,
    /// Page heading.
    pub title: TranslatableValue,
    /// Singular entity name used in toasts and modal titles.
    pub entity_label: TranslatableValue,
    /// Form fields.
    pub fields: FieldSet,
    /// Table columns.
    pub columns: Vec<ColumnDescriptor>,
    /// Row actions.
    pub actions: Vec<TableAction>,
    /// List filters.
    pub filters: Vec<FilterDescriptor>,
    /// Entity-specific payload shape.
    pub payload_shape: PayloadShape,
    /// Keys never sent to the backend.
    pub payload_exclusions: Vec<String>,
    /// Modal layout.
    pub layout: FormLayout,
    /// Global quick-action key opening this page's create form.
    pub quick_action: Option<QuickActionKey>,
    /// Dot path to the owner id used for `own` scoped capabilities.
    pub owner_key: Option<String>,
}

impl PageConfig {
    /// Creates a page with view/edit/delete actions gated on `resource`.
    pub fn new(
        resource: impl Into<String>,
        endpoint: impl Into<String>,
        title: impl Into<TranslatableValue>,
        entity_label: impl Into<TranslatableValue>,
        fields: FieldSet,
    ) -> Self {
        let resource = resource.into();
        let actions = vec![
            TableAction::view().requires(Capability::new(CapabilityAction::View, resource.clone())),
            TableAction::edit().requires(Capability::new(CapabilityAction::Edit, resource.clone())),
            TableAction::delete()
                .requires(Capability::new(CapabilityAction::Delete, resource.clone())),
        ];
        Self {
            resource,
            endpoint: endpoint.into(),
            title: title.into(),
            entity_label: entity_label.into(),
            fields,
            columns: Vec::new(),
            actions,
            filters: Vec::new(),
            payload_shape: PayloadShape::Generic,
            payload_exclusions: Vec::new(),
            layout: FormLayout::Rows,
            quick_action: None,
            owner_key: None,
        }
    }

    /// Sets the columns.
    pub fn with_columns(mut self, columns: Vec<ColumnDescriptor>) -> Self {
        self.columns = columns;
        self
    }

    /// Replaces the row actions.
    pub fn with_actions(mut self, actions: Vec<TableAction>) -> Self {
        self.actions = actions;
        self
    }

    /// Sets the filters.
    pub fn with_filters(mut self, filters: Vec<FilterDescriptor>) -> Self {
        self.filters = filters;
        self
    }

    /// Sets the payload shape.
    pub fn with_payload_shape(mut self, shape: PayloadShape) -> Self {
        self.payload_shape = shape;
        self
    }

    /// Excludes keys from the payload.
    pub fn excluding(mut self, keys: &[&str]) -> Self {
        self.payload_exclusions
            .extend(keys.iter().map(|key| key.to_string()));
        self
    }

    /// Sets the modal layout.
    pub fn with_layout(mut self, layout: FormLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Registers the page for a global quick action.
    pub fn with_quick_action(mut self, key: QuickActionKey) -> Self {
        self.quick_action = Some(key);
        self
    }

    /// Tracks ownership through `path`.
    pub fn owned_by(mut self, path: impl Into<String>) -> Self {
        self.owner_key = Some(path.into());
        self
    }

    /// Capability needed for the "new" button.
    pub fn create_capability(&self) -> Capability {
        Capability::new(CapabilityAction::Create, self.resource.clone())
    }

    /// Whether the viewer may create records.
    pub fn can_create(&self, permissions: &PermissionSet) -> bool {
        permissions.allows(&self.create_capability(), Ownership::NoRow)
    }
}

#[derive(Debug, Clone)]
/// Mutable state of one CRUD page.
pub struct PageState {
    /// Search, filters, sort, and pagination.
    pub query: ListQuery,
    /// Last loaded page of rows.
    pub list: Paginated<Row>,
    /// A non-silent list fetch is in flight.
    pub loading: bool,
    /// Id of the newest list fetch; older responses are dropped.
    pub list_request: u64,
    /// Modal form.
    pub form: FormState,
    /// Modal visibility.
    pub modal_open: bool,
    /// Row being viewed or edited.
    pub current_item: Option<Row>,
    /// Row awaiting delete confirmation.
    pub delete_target: Option<Row>,
    /// Mode of the submit in flight.
    pub submitting: Option<FormMode>,
    /// Form session the submit in flight was sent from.
    pub submit_session: u64,
    /// A delete is in flight.
    pub deleting: bool,
    /// Field messages from the last failed submit.
    pub server_errors: ServerErrors,
    /// Form the server errors belong to; they are re-applied when that form opens again.
    pub server_errors_for: Option<FormTarget>,
    /// Set by [`crate::PageAction::Init`]; pages that never listed do not fetch.
    pub initialized: bool,
    /// Active locale.
    pub locale: String,
    /// Viewer capabilities.
    pub permissions: PermissionSet,
    /// Viewer id for ownership checks.
    pub viewer_id: Option<String>,
    /// Shared settings.
    pub settings: CrudSettings,
}

impl PageState {
    /// Fresh state for `config`.
    pub fn new(config: &PageConfig, settings: CrudSettings, permissions: PermissionSet) -> Self {
        let settings = settings.sanitized();
        Self {
            query: ListQuery::with_per_page(settings.default_per_page),
            list: Paginated::default(),
            loading: false,
            list_request: 0,
            form: FormState::new(config.fields.clone())
                .with_payload_exclusions(config.payload_exclusions.clone()),
            modal_open: false,
            current_item: None,
            delete_target: None,
            submitting: None,
            submit_session: 0,
            deleting: false,
            server_errors: ServerErrors::default(),
            server_errors_for: None,
            initialized: false,
            locale: settings.default_locale.clone(),
            permissions,
            viewer_id: None,
            settings,
        }
    }

    /// Sets the viewer id.
    pub fn with_viewer(mut self, viewer_id: impl Into<String>) -> Self {
        self.viewer_id = Some(viewer_id.into());
        self
    }

    /// Query used when the address bar carries none.
    pub fn default_query(&self) -> ListQuery {
        ListQuery::with_per_page(self.settings.default_per_page)
    }

    /// Last page number of the loaded list.
    pub fn page_count(&self) -> u32 {
        self.list.page_count(self.query.per_page)
    }
}
