//! Form state manager: record being edited, per-field errors, and option lists.

use std::collections::{BTreeMap, BTreeSet};

use crud_contract::{
    FieldKind, FieldSet, FieldValue, FormData, FormMode, OptionSource, RelationSource, SelectOption,
};
use crud_host::{CrudError, RelationFailurePolicy, ServerErrors};

use crate::{
    cascade::{child_level_options, root_level_options, LevelOptions},
    options::OptionList,
    validation::{validate_form, FieldErrors},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Relation fetch the caller must perform for the current form session.
pub struct OptionRequest {
    /// Form session the request belongs to.
    pub session: u64,
    /// Field (or dependent level) key receiving the options.
    pub key: String,
    /// Endpoint and key mapping.
    pub source: RelationSource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Load state of one option list.
pub enum OptionState {
    /// Fetch in flight from this endpoint.
    Loading {
        /// Requested endpoint.
        endpoint: String,
    },
    /// Options available (possibly empty after a failure).
    Ready(OptionList),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of [`FormState::apply_options`].
pub enum OptionsOutcome {
    /// Options stored.
    Applied,
    /// The modal closed, reopened, or the cascade moved on; the result was dropped.
    Stale,
    /// The fetch failed; an empty list was stored.
    Failed {
        /// Field key.
        key: String,
        /// Failure description for logs.
        message: String,
    },
}

#[derive(Debug, Clone)]
/// In-progress record of a CRUD modal.
pub struct FormState {
    fields: FieldSet,
    session: u64,
    mode: FormMode,
    data: FormData,
    errors: FieldErrors,
    options: BTreeMap<String, OptionState>,
    touched_files: BTreeSet<String>,
    exclusions: Vec<String>,
}

impl FormState {
    /// Creates an empty create-mode form over `fields`.
    pub fn new(fields: FieldSet) -> Self {
        Self {
            fields,
            session: 0,
            mode: FormMode::Create,
            data: FormData::new(),
            errors: FieldErrors::new(),
            options: BTreeMap::new(),
            touched_files: BTreeSet::new(),
            exclusions: Vec::new(),
        }
    }

    /// Keys never sent to the backend.
    pub fn with_payload_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Field descriptors.
    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    /// Counter bumped by every [`Self::load`].
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Current mode.
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    /// Current record.
    pub fn data(&self) -> &FormData {
        &self.data
    }

    /// Current value of `key`.
    pub fn value(&self, key: &str) -> FieldValue {
        self.data.get(key).cloned().unwrap_or_default()
    }

    /// Browser handles of every upload currently held in the record.
    pub fn file_handles(&self) -> Vec<u64> {
        self.data
            .iter()
            .filter_map(|(_, value)| match value {
                FieldValue::File(upload) => Some(upload.handle),
                _ => None,
            })
            .collect()
    }

    /// Current errors.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Error for `key`.
    pub fn error(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    /// Option list state for `key`.
    pub fn options(&self, key: &str) -> Option<&OptionState> {
        self.options.get(key)
    }

    /// Loaded options for `key`; empty while loading.
    pub fn ready_options(&self, key: &str) -> OptionList {
        match self.options.get(key) {
            Some(OptionState::Ready(list)) => list.clone(),
            _ => OptionList::default(),
        }
    }

    /// DOM value prefix for option values of `key`.
    pub fn dom_prefix(key: &str) -> String {
        format!("{key}_")
    }

    /// DOM value of the option matching the current value, once options are loaded.
    pub fn selected_dom_value(&self, key: &str) -> Option<String> {
        let Some(OptionState::Ready(list)) = self.options.get(key) else {
            return None;
        };
        let value = self.data.get(key)?;
        list.selected(value)
            .first()
            .map(|option| option.dom_value(&Self::dom_prefix(key)))
    }

    /// Starts a new session with a clean copy of `initial`.
    ///
    /// Defaults apply only in create mode and only where the record has no value. Multi-select
    /// values are coerced into lists. Returns the relation fetches the form needs.
    pub fn load(&mut self, initial: FormData, mode: FormMode) -> Vec<OptionRequest> {
        self.session += 1;
        self.mode = mode;
        self.errors.clear();
        self.options.clear();
        self.touched_files.clear();

        let mut data = initial;
        for field in self.fields.iter() {
            if mode == FormMode::Create {
                if let Some(default) = &field.default_value {
                    let absent = matches!(data.get(&field.name), None | Some(FieldValue::Empty));
                    if absent {
                        data.set(field.name.clone(), default.clone());
                    }
                }
            }
            if matches!(field.kind, FieldKind::MultiSelect { .. }) {
                if let Some(value) = data.remove(&field.name) {
                    data.set(field.name.clone(), FieldValue::List(value.into_list()));
                }
            }
        }
        self.data = data;
        self.initial_option_loads()
    }

    /// Ends the session; option results still in flight become stale.
    pub fn close(&mut self) {
        self.session += 1;
        self.options.clear();
        self.touched_files.clear();
    }

    fn start_fetch(&mut self, key: &str, source: RelationSource) -> OptionRequest {
        self.options.insert(
            key.to_string(),
            OptionState::Loading {
                endpoint: source.endpoint.clone(),
            },
        );
        OptionRequest {
            session: self.session,
            key: key.to_string(),
            source,
        }
    }

    fn apply_level_options(&mut self, key: &str, options: LevelOptions) -> Option<OptionRequest> {
        match options {
            LevelOptions::Ready(options) => {
                self.options
                    .insert(key.to_string(), OptionState::Ready(OptionList::new(options)));
                None
            }
            LevelOptions::Fetch(source) => Some(self.start_fetch(key, source)),
            LevelOptions::Blocked => None,
        }
    }

    fn initial_option_loads(&mut self) -> Vec<OptionRequest> {
        let fields = self.fields.clone();
        let mut requests = Vec::new();
        for field in fields.iter() {
            match &field.kind {
                FieldKind::Select { source }
                | FieldKind::MultiSelect { source }
                | FieldKind::Combobox { source, .. } => match source {
                    OptionSource::Static(options) => {
                        self.options.insert(
                            field.name.clone(),
                            OptionState::Ready(OptionList::new(options.clone())),
                        );
                    }
                    OptionSource::Relation(relation) => {
                        requests.push(self.start_fetch(&field.name, relation.clone()));
                    }
                },
                FieldKind::Radio { options } => {
                    self.options.insert(
                        field.name.clone(),
                        OptionState::Ready(OptionList::new(options.clone())),
                    );
                }
                FieldKind::MediaPicker {
                    library: Some(library),
                    ..
                } => requests.push(self.start_fetch(&field.name, library.clone())),
                FieldKind::DependentDropdown { levels } => {
                    for (index, level) in levels.iter().enumerate() {
                        let parent = index.checked_sub(1).and_then(|parent| levels.get(parent));
                        let options = match parent {
                            None => root_level_options(level),
                            Some(parent) => {
                                let parent_value = self.value(&parent.name).as_text();
                                child_level_options(level, parent, Some(&parent_value))
                            }
                        };
                        requests.extend(self.apply_level_options(&level.name, options));
                    }
                }
                _ => {}
            }
        }
        requests
    }

    /// Relation fetches still in flight for this session.
    pub fn relation_requests(&self) -> Vec<OptionRequest> {
        let fields = &self.fields;
        self.options
            .iter()
            .filter_map(|(key, state)| match state {
                OptionState::Loading { endpoint } => {
                    let source = fields
                        .get(key)
                        .and_then(|field| field.kind.option_source())
                        .and_then(|source| match source {
                            OptionSource::Relation(relation)
                                if relation.endpoint == *endpoint =>
                            {
                                Some(relation.clone())
                            }
                            _ => None,
                        })
                        .unwrap_or_else(|| RelationSource::new(endpoint.clone()));
                    Some(OptionRequest {
                        session: self.session,
                        key: key.clone(),
                        source,
                    })
                }
                OptionState::Ready(_) => None,
            })
            .collect()
    }

    /// Updates one value and clears its error.
    ///
    /// Multi-select values are coerced to lists. Changing a dependent-dropdown level clears every
    /// deeper level (value, error, options) and returns the fetch for the immediate child, if any.
    /// View-mode forms ignore changes.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Vec<OptionRequest> {
        if self.mode.is_read_only() {
            return Vec::new();
        }
        let fields = self.fields.clone();
        let value = match fields.get(name).map(|field| &field.kind) {
            Some(FieldKind::MultiSelect { .. }) => FieldValue::List(value.into_list()),
            Some(kind) if kind.is_file() => {
                self.touched_files.insert(name.to_string());
                value
            }
            _ => value,
        };
        let parent_text = value.as_text();
        self.data.set(name, value);
        self.errors.remove(name);

        let Some((owner, index)) = fields.dependent_level(name) else {
            return Vec::new();
        };
        let FieldKind::DependentDropdown { levels } = &owner.kind else {
            return Vec::new();
        };
        for level in levels.iter().skip(index + 1) {
            self.data.set(level.name.clone(), FieldValue::Empty);
            self.errors.remove(&level.name);
            self.options.remove(&level.name);
        }
        let Some(child) = levels.get(index + 1) else {
            return Vec::new();
        };
        let options = child_level_options(child, &levels[index], Some(&parent_text));
        self.apply_level_options(&child.name, options)
            .into_iter()
            .collect()
    }

    /// Applies a `<select>` DOM value by decoding it against the loaded options.
    ///
    /// Unknown DOM values (including the empty placeholder) clear the field.
    pub fn select_dom_value(&mut self, key: &str, dom_value: &str) -> Vec<OptionRequest> {
        let raw = self
            .ready_options(key)
            .find_dom(&Self::dom_prefix(key), dom_value)
            .map(|option| option.value.clone());
        let value = raw.map(FieldValue::Text).unwrap_or_default();
        self.set_field(key, value)
    }

    /// Stores a relation fetch result.
    pub fn apply_options(
        &mut self,
        request: &OptionRequest,
        result: Result<Vec<SelectOption>, CrudError>,
        policy: RelationFailurePolicy,
        locale: &str,
    ) -> OptionsOutcome {
        let expected = matches!(
            self.options.get(&request.key),
            Some(OptionState::Loading { endpoint }) if *endpoint == request.source.endpoint
        );
        if request.session != self.session || !expected {
            return OptionsOutcome::Stale;
        }
        match result {
            Ok(options) => {
                self.options
                    .insert(request.key.clone(), OptionState::Ready(OptionList::new(options)));
                OptionsOutcome::Applied
            }
            Err(err) => {
                self.options
                    .insert(request.key.clone(), OptionState::Ready(OptionList::default()));
                if policy == RelationFailurePolicy::Surface {
                    let message = if locale == "ar" {
                        "تعذر تحميل الخيارات".to_string()
                    } else {
                        "Could not load options".to_string()
                    };
                    self.errors.insert(request.key.clone(), message);
                }
                OptionsOutcome::Failed {
                    key: request.key.clone(),
                    message: err.to_string(),
                }
            }
        }
    }

    /// Merges server-side messages (first message per field) over the local errors.
    pub fn merge_external_errors(&mut self, errors: &ServerErrors) {
        for (field, message) in errors.first_messages() {
            self.errors.insert(field.to_string(), message.to_string());
        }
    }

    /// Runs client validation, stores the result, and returns it.
    pub fn validate(&mut self, locale: &str) -> FieldErrors {
        self.errors = validate_form(&self.fields, self.mode, &self.data, locale);
        self.errors.clone()
    }

    fn hidden_keys(&self) -> BTreeSet<String> {
        self.fields
            .iter()
            .filter(|field| !field.is_visible(self.mode, &self.data))
            .flat_map(|field| {
                let mut keys: Vec<String> = field.keys().into_iter().map(str::to_string).collect();
                keys.push(field.name.clone());
                keys
            })
            .collect()
    }

    /// Validates and produces the cleaned payload.
    ///
    /// Hidden conditional fields, excluded keys, and (in edit mode) file fields the user did not
    /// touch are dropped; multi-selects are coerced to lists.
    ///
    /// # Errors
    ///
    /// Returns the field errors when validation fails.
    pub fn submit(&mut self, locale: &str) -> Result<FormData, FieldErrors> {
        let errors = self.validate(locale);
        if !errors.is_empty() {
            return Err(errors);
        }
        let hidden = self.hidden_keys();
        let mut payload = FormData::new();
        for (key, value) in self.data.iter() {
            if hidden.contains(key) || self.exclusions.contains(key) {
                continue;
            }
            let value = match self.fields.get(key).map(|field| &field.kind) {
                Some(FieldKind::MultiSelect { .. }) => FieldValue::List(value.clone().into_list()),
                Some(kind)
                    if kind.is_file()
                        && self.mode == FormMode::Edit
                        && !self.touched_files.contains(key) =>
                {
                    continue;
                }
                _ => value.clone(),
            };
            payload.set(key.clone(), value);
        }
        Ok(payload)
    }
}
