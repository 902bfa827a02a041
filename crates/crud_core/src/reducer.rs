//! Page actions, side-effect intents, and transition logic for a CRUD page.

use crud_contract::{ActionKind, FieldValue, FormData, FormMode, Paginated, Row, SelectOption};
use crud_host::{CrudError, CrudResponse, CrudRequest, ListQuery, ToastKind};
use serde_json::Value;
use thiserror::Error;

use crate::{
    form::{OptionRequest, OptionsOutcome},
    model::{FormTarget, PageConfig, PageState},
    payload::{build_delete_request, build_submit_request, flatten_translations, record_id},
    table::{action_visible, row_ownership, toggle_sort},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_page`].
pub enum PageAction {
    /// Restore the list query from the address bar and load the first list.
    Init {
        /// Raw query string (leading `?` optional).
        query_string: String,
    },
    /// Replace the search term.
    Search(String),
    /// Change one filter; an empty value removes it.
    FilterChanged {
        /// Filter key.
        key: String,
        /// New value.
        value: String,
    },
    /// Merge a batch of filter values.
    ApplyFilters(Vec<(String, String)>),
    /// Drop search and every filter.
    ClearFilters,
    /// Header click on a sortable column (backend sort field).
    Sort(String),
    /// Jump to a page.
    GoToPage(u32),
    /// Change the page size.
    PerPage(u32),
    /// Reload the current list.
    Refresh,
    /// A list fetch finished.
    ListLoaded {
        /// Fetch id from [`PageEffect::FetchList`].
        request: u64,
        /// Page of rows or the failure.
        result: Result<Paginated<Row>, CrudError>,
    },
    /// Open an empty create form.
    OpenCreate,
    /// Row action button.
    RowAction {
        /// Action clicked.
        action: ActionKind,
        /// Row it was clicked on.
        row: Row,
    },
    /// Field control change.
    FieldChanged {
        /// Form key.
        name: String,
        /// New value.
        value: FieldValue,
    },
    /// `<select>` change carrying an encoded option value.
    SelectChanged {
        /// Form key.
        key: String,
        /// DOM option value.
        dom_value: String,
    },
    /// A relation option fetch finished.
    OptionsLoaded {
        /// Request from [`PageEffect::LoadOptions`].
        request: OptionRequest,
        /// Parsed options or the failure.
        result: Result<Vec<SelectOption>, CrudError>,
    },
    /// Submit the modal form.
    SubmitForm,
    /// The save request finished.
    SubmitFinished(Result<CrudResponse, CrudError>),
    /// Close the modal without saving.
    CloseModal,
    /// Delete the row held by the confirmation.
    ConfirmDelete,
    /// Dismiss the delete confirmation.
    CancelDelete,
    /// The delete request finished.
    DeleteFinished(Result<CrudResponse, CrudError>),
    /// The global `languageChanged` event fired.
    LanguageChanged(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Page-level callbacks run after successful writes.
pub enum PageHook {
    /// After a record was created.
    AfterCreate,
    /// After a record was updated.
    AfterUpdate,
    /// After a record was deleted.
    AfterDelete,
}

impl PageHook {
    /// Stable token.
    pub const fn token(self) -> &'static str {
        match self {
            Self::AfterCreate => "after-create",
            Self::AfterUpdate => "after-update",
            Self::AfterDelete => "after-delete",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_page`] for the runtime to execute.
pub enum PageEffect {
    /// Fetch a page of rows and report back with [`PageAction::ListLoaded`].
    FetchList {
        /// Fetch id.
        request: u64,
        /// Full list URL.
        url: String,
        /// Whether the table keeps its rows visible while loading.
        silent: bool,
    },
    /// Replace the address-bar query without adding a history entry.
    Navigate {
        /// Encoded query string.
        query: String,
    },
    /// Fetch relation options and report back with [`PageAction::OptionsLoaded`].
    LoadOptions(OptionRequest),
    /// Send a create/update request and report back with [`PageAction::SubmitFinished`].
    Save(CrudRequest),
    /// Send a delete request and report back with [`PageAction::DeleteFinished`].
    Delete(CrudRequest),
    /// Show a toast.
    Toast {
        /// Severity.
        kind: ToastKind,
        /// Text.
        message: String,
    },
    /// Run a page hook.
    Hook {
        /// Which hook.
        hook: PageHook,
        /// Saved record (response body) or deleted row.
        record: Value,
    },
    /// Page-specific row action.
    CustomAction {
        /// Action token.
        action: String,
        /// Row it was clicked on.
        row: Row,
    },
    /// A relation list failed and was replaced by an empty list.
    RelationFailed {
        /// Field key.
        key: String,
        /// Failure description.
        message: String,
    },
    /// Browser file handles no form references any more.
    ReleaseFiles(Vec<u64>),
    /// A page that does not list (a quick-action dialog) wrote to its resource; visible pages of
    /// the same resource should refresh.
    ResourceChanged {
        /// Resource slug.
        resource: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions the page cannot honor.
pub enum PageError {
    /// The viewer lacks the capability.
    #[error("missing capability `{0}`")]
    Forbidden(String),
    /// The action is not declared for this page or hidden for this row.
    #[error("action `{0}` is not available for this row")]
    ActionNotAllowed(String),
    /// The column is not sortable.
    #[error("column `{0}` is not sortable")]
    NotSortable(String),
    /// The page size is not one of the configured options.
    #[error("page size {0} is not offered")]
    InvalidPageSize(u32),
    /// The record has no usable `id`.
    #[error("record has no id")]
    MissingRecordId,
    /// No form is open.
    #[error("no form is open")]
    ModalClosed,
    /// The form is open in view mode.
    #[error("form is read-only")]
    ReadOnlyForm,
    /// No delete confirmation is open.
    #[error("no delete confirmation is open")]
    NoDeleteTarget,
}

fn fetch_list(state: &mut PageState, config: &PageConfig, silent: bool) -> PageEffect {
    state.list_request += 1;
    if !silent {
        state.loading = true;
    }
    PageEffect::FetchList {
        request: state.list_request,
        url: state
            .query
            .list_url(&state.settings.resolve_url(&config.endpoint)),
        silent,
    }
}

fn requery(state: &mut PageState, config: &PageConfig, effects: &mut Vec<PageEffect>) {
    effects.push(PageEffect::Navigate {
        query: state.query.to_query_string(),
    });
    effects.push(fetch_list(state, config, false));
}

fn form_target(state: &PageState, mode: FormMode) -> FormTarget {
    FormTarget {
        mode,
        record_id: state.current_item.as_ref().and_then(record_id),
    }
}

fn open_form(
    state: &mut PageState,
    data: FormData,
    mode: FormMode,
    effects: &mut Vec<PageEffect>,
) {
    let requests = state.form.load(data, mode);
    state.modal_open = true;
    let target = form_target(state, mode);
    if !state.server_errors.is_empty() && state.server_errors_for.as_ref() == Some(&target) {
        state.form.merge_external_errors(&state.server_errors);
    } else {
        state.server_errors = Default::default();
        state.server_errors_for = None;
    }
    effects.extend(requests.into_iter().map(PageEffect::LoadOptions));
}

fn open_row(state: &mut PageState, row: Row, mode: FormMode, effects: &mut Vec<PageEffect>) {
    let data = flatten_translations(&row);
    state.current_item = Some(row);
    open_form(state, data, mode, effects);
}

fn release_files(handles: Vec<u64>, effects: &mut Vec<PageEffect>) {
    if !handles.is_empty() {
        effects.push(PageEffect::ReleaseFiles(handles));
    }
}

fn close_form(state: &mut PageState, effects: &mut Vec<PageEffect>) {
    release_files(state.form.file_handles(), effects);
    state.modal_open = false;
    state.current_item = None;
    state.form.close();
}

fn refresh_after_write(state: &mut PageState, config: &PageConfig, effects: &mut Vec<PageEffect>) {
    if state.initialized {
        effects.push(fetch_list(state, config, false));
    } else {
        effects.push(PageEffect::ResourceChanged {
            resource: config.resource.clone(),
        });
    }
}

fn success_message(hook: PageHook, entity: &str, locale: &str) -> String {
    match (hook, locale) {
        (PageHook::AfterCreate, "ar") => format!("تم إنشاء {entity} بنجاح"),
        (PageHook::AfterUpdate, "ar") => format!("تم تحديث {entity} بنجاح"),
        (PageHook::AfterDelete, "ar") => format!("تم حذف {entity} بنجاح"),
        (PageHook::AfterCreate, _) => format!("{entity} created successfully"),
        (PageHook::AfterUpdate, _) => format!("{entity} updated successfully"),
        (PageHook::AfterDelete, _) => format!("{entity} deleted successfully"),
    }
}

fn error_toast(err: &CrudError) -> PageEffect {
    PageEffect::Toast {
        kind: ToastKind::Error,
        message: err.toast_message(),
    }
}

/// Applies a [`PageAction`] to the page state and collects resulting side effects.
///
/// Query changes (search, filters, sort, pagination) reset to page 1 where the user would expect
/// it, rewrite the address bar, and refetch. A submit while another is in flight is ignored. A page
/// that was never initialised does not fetch its list.
///
/// # Errors
///
/// Returns [`PageError`] when the action references something the page or the viewer cannot use.
pub fn reduce_page(
    state: &mut PageState,
    config: &PageConfig,
    action: PageAction,
) -> Result<Vec<PageEffect>, PageError> {
    let mut effects = Vec::new();
    match action {
        PageAction::Init { query_string } => {
            state.query = ListQuery::from_query_string(&query_string, &state.default_query());
            state.initialized = true;
            effects.push(fetch_list(state, config, false));
        }
        PageAction::Search(term) => {
            state.query.search = term;
            state.query.page = 1;
            requery(state, config, &mut effects);
        }
        PageAction::FilterChanged { key, value } => {
            state.query.merge_filters([(key, value)]);
            requery(state, config, &mut effects);
        }
        PageAction::ApplyFilters(delta) => {
            state.query.merge_filters(delta);
            requery(state, config, &mut effects);
        }
        PageAction::ClearFilters => {
            state.query.search.clear();
            state.query.filters.clear();
            state.query.page = 1;
            requery(state, config, &mut effects);
        }
        PageAction::Sort(field) => {
            let sortable = config
                .columns
                .iter()
                .any(|column| column.sortable && column.sort_key() == field);
            if !sortable {
                return Err(PageError::NotSortable(field));
            }
            state.query.sort = Some(toggle_sort(state.query.sort.as_ref(), &field));
            state.query.page = 1;
            requery(state, config, &mut effects);
        }
        PageAction::GoToPage(page) => {
            let page = page.clamp(1, state.page_count());
            if page != state.query.page {
                state.query.page = page;
                requery(state, config, &mut effects);
            }
        }
        PageAction::PerPage(per_page) => {
            if !state.settings.per_page_options.contains(&per_page) {
                return Err(PageError::InvalidPageSize(per_page));
            }
            state.query.per_page = per_page;
            state.query.page = 1;
            requery(state, config, &mut effects);
        }
        PageAction::Refresh => {
            if state.initialized {
                effects.push(fetch_list(state, config, false));
            }
        }
        PageAction::ListLoaded { request, result } => {
            if request != state.list_request {
                return Ok(effects);
            }
            state.loading = false;
            match result {
                Ok(list) => state.list = list,
                Err(err) => effects.push(error_toast(&err)),
            }
        }
        PageAction::OpenCreate => {
            if !config.can_create(&state.permissions) {
                return Err(PageError::Forbidden(config.create_capability().to_string()));
            }
            state.current_item = None;
            open_form(state, FormData::new(), FormMode::Create, &mut effects);
        }
        PageAction::RowAction { action, row } => {
            let ownership = row_ownership(
                &row,
                config.owner_key.as_deref(),
                state.viewer_id.as_deref(),
            );
            let allowed = config.actions.iter().any(|declared| {
                declared.action == action
                    && action_visible(declared, &row, &state.permissions, ownership)
            });
            if !allowed {
                return Err(PageError::ActionNotAllowed(action.as_str().to_string()));
            }
            match action {
                ActionKind::View => open_row(state, row, FormMode::View, &mut effects),
                ActionKind::Edit => open_row(state, row, FormMode::Edit, &mut effects),
                ActionKind::Delete => state.delete_target = Some(row),
                ActionKind::Custom(name) => {
                    effects.push(PageEffect::CustomAction { action: name, row })
                }
            }
        }
        PageAction::FieldChanged { name, value } => {
            if !state.modal_open {
                return Err(PageError::ModalClosed);
            }
            let before = state.form.file_handles();
            let requests = state.form.set_field(&name, value);
            let after = state.form.file_handles();
            let replaced = before.into_iter().filter(|handle| !after.contains(handle)).collect();
            release_files(replaced, &mut effects);
            effects.extend(requests.into_iter().map(PageEffect::LoadOptions));
        }
        PageAction::SelectChanged { key, dom_value } => {
            if !state.modal_open {
                return Err(PageError::ModalClosed);
            }
            let requests = state.form.select_dom_value(&key, &dom_value);
            effects.extend(requests.into_iter().map(PageEffect::LoadOptions));
        }
        PageAction::OptionsLoaded { request, result } => {
            let outcome = state.form.apply_options(
                &request,
                result,
                state.settings.relation_failure_policy,
                &state.locale,
            );
            if let OptionsOutcome::Failed { key, message } = outcome {
                effects.push(PageEffect::RelationFailed { key, message });
            }
        }
        PageAction::SubmitForm => {
            if state.submitting.is_some() {
                return Ok(effects);
            }
            if !state.modal_open {
                return Err(PageError::ModalClosed);
            }
            let mode = state.form.mode();
            if mode.is_read_only() {
                return Err(PageError::ReadOnlyForm);
            }
            let id = match mode {
                FormMode::Edit => Some(
                    state
                        .current_item
                        .as_ref()
                        .and_then(record_id)
                        .ok_or(PageError::MissingRecordId)?,
                ),
                FormMode::Create | FormMode::View => None,
            };
            let Ok(payload) = state.form.submit(&state.locale) else {
                return Ok(effects);
            };
            let request = build_submit_request(
                &state.settings.resolve_url(&config.endpoint),
                id.as_deref(),
                payload,
                config.payload_shape,
                config.fields.has_file_fields(),
            );
            state.submitting = Some(mode);
            state.submit_session = state.form.session();
            effects.push(PageEffect::Save(request));
        }
        PageAction::SubmitFinished(result) => {
            let Some(mode) = state.submitting.take() else {
                return Ok(effects);
            };
            // The modal was closed (and maybe reopened) while the save was in flight.
            let current = state.modal_open && state.submit_session == state.form.session();
            match result {
                Ok(response) => {
                    if current {
                        close_form(state, &mut effects);
                    }
                    state.server_errors = Default::default();
                    state.server_errors_for = None;
                    let hook = if mode == FormMode::Edit {
                        PageHook::AfterUpdate
                    } else {
                        PageHook::AfterCreate
                    };
                    effects.push(PageEffect::Hook {
                        hook,
                        record: response.body,
                    });
                    effects.push(PageEffect::Toast {
                        kind: ToastKind::Success,
                        message: success_message(
                            hook,
                            &config.entity_label.resolve(&state.locale),
                            &state.locale,
                        ),
                    });
                    refresh_after_write(state, config, &mut effects);
                }
                Err(err) => {
                    if let Some(errors) = err.field_errors().filter(|_| current) {
                        state.server_errors = errors.clone();
                        state.server_errors_for = Some(form_target(state, mode));
                        state.form.merge_external_errors(errors);
                    }
                    effects.push(error_toast(&err));
                }
            }
        }
        PageAction::CloseModal => close_form(state, &mut effects),
        PageAction::ConfirmDelete => {
            if state.deleting {
                return Ok(effects);
            }
            let target = state.delete_target.as_ref().ok_or(PageError::NoDeleteTarget)?;
            let id = record_id(target).ok_or(PageError::MissingRecordId)?;
            state.deleting = true;
            effects.push(PageEffect::Delete(build_delete_request(
                &state.settings.resolve_url(&config.endpoint),
                &id,
            )));
        }
        PageAction::CancelDelete => {
            if !state.deleting {
                state.delete_target = None;
            }
        }
        PageAction::DeleteFinished(result) => {
            if !state.deleting {
                return Ok(effects);
            }
            state.deleting = false;
            match result {
                Ok(_) => {
                    let record = state.delete_target.take().unwrap_or(Value::Null);
                    effects.push(PageEffect::Hook {
                        hook: PageHook::AfterDelete,
                        record,
                    });
                    effects.push(PageEffect::Toast {
                        kind: ToastKind::Success,
                        message: success_message(
                            PageHook::AfterDelete,
                            &config.entity_label.resolve(&state.locale),
                            &state.locale,
                        ),
                    });
                    if state.list.data.len() == 1 && state.query.page > 1 {
                        state.query.page -= 1;
                        requery(state, config, &mut effects);
                    } else {
                        effects.push(fetch_list(state, config, false));
                    }
                }
                Err(err) => effects.push(error_toast(&err)),
            }
        }
        PageAction::LanguageChanged(locale) => {
            state.locale = locale;
            if state.initialized {
                effects.push(fetch_list(state, config, true));
            }
        }
    }
    Ok(effects)
}

#[cfg(test)]
mod tests {
    use crud_contract::{
        ColumnDescriptor, FieldDescriptor, FieldKind, FieldSet, FileUpload, FileValidation,
        PermissionSet, RelationSource, TranslatableValue,
    };
    use crud_host::{CrudBody, CrudSettings, HttpMethod};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn config() -> PageConfig {
        let fields = FieldSet::new(vec![
            FieldDescriptor::new(
                "name.en",
                TranslatableValue::bilingual("Name (English)", "الاسم (إنجليزي)"),
                FieldKind::text(),
            )
            .required(),
            FieldDescriptor::new("name.ar", "Name (Arabic)", FieldKind::text()),
            FieldDescriptor::new("color", "Color", FieldKind::Color),
            FieldDescriptor::new("group_id", "Group", FieldKind::relation_select("/api/groups")),
        ])
        .expect("fields");
        PageConfig::new(
            "case-types",
            "/api/case-types",
            "Case types",
            TranslatableValue::bilingual("Case type", "نوع القضية"),
            fields,
        )
        .with_columns(vec![
            ColumnDescriptor::new("name", "Name").sortable(),
            ColumnDescriptor::new("created_at", "Created"),
        ])
    }

    fn state(permissions: &[&str]) -> PageState {
        let (permissions, rejected) = PermissionSet::from_names(permissions.iter().copied());
        assert!(rejected.is_empty());
        let mut state = PageState::new(&config(), CrudSettings::default(), permissions);
        state.initialized = true;
        state
    }

    fn manager() -> PageState {
        state(&["manage-any-case-types"])
    }

    fn row() -> Row {
        json!({
            "id": 7,
            "name": { "en": "Civil", "ar": "مدني" },
            "color": "#112233",
            "group_id": 2,
        })
    }

    fn reduce(state: &mut PageState, action: PageAction) -> Vec<PageEffect> {
        reduce_page(state, &config(), action).expect("reduce")
    }

    #[test]
    fn init_restores_query_from_address_bar() {
        let mut state = manager();
        let effects = reduce(
            &mut state,
            PageAction::Init {
                query_string: "?search=civil&page=2&sort_field=name&sort_direction=desc&status=active"
                    .into(),
            },
        );
        assert_eq!(
            effects,
            vec![PageEffect::FetchList {
                request: 1,
                url: "/api/case-types?search=civil&page=2&per_page=15&sort_field=name&sort_direction=desc&status=active".into(),
                silent: false,
            }]
        );
        assert!(state.loading);
    }

    #[test]
    fn filter_changes_reset_to_first_page_and_navigate() {
        let mut state = manager();
        state.query.page = 3;
        let effects = reduce(
            &mut state,
            PageAction::FilterChanged {
                key: "status".into(),
                value: "active".into(),
            },
        );
        assert_eq!(state.query.page, 1);
        assert_eq!(
            effects[0],
            PageEffect::Navigate {
                query: "page=1&per_page=15&status=active".into()
            }
        );

        reduce(
            &mut state,
            PageAction::FilterChanged {
                key: "status".into(),
                value: String::new(),
            },
        );
        assert!(state.query.filters.is_empty());
    }

    #[test]
    fn sort_toggles_active_column_and_rejects_unsortable_ones() {
        let mut state = manager();
        state.query.page = 4;
        reduce(&mut state, PageAction::Sort("name".into()));
        assert_eq!(state.query.sort, Some(crud_contract::SortState::ascending("name")));
        assert_eq!(state.query.page, 1);

        reduce(&mut state, PageAction::Sort("name".into()));
        assert_eq!(
            state.query.sort.as_ref().map(|sort| sort.direction),
            Some(crud_contract::SortDirection::Desc)
        );

        assert_eq!(
            reduce_page(&mut state, &config(), PageAction::Sort("created_at".into())),
            Err(PageError::NotSortable("created_at".into()))
        );
    }

    #[test]
    fn stale_list_responses_are_dropped() {
        let mut state = manager();
        reduce(&mut state, PageAction::Refresh);
        reduce(&mut state, PageAction::Refresh);
        let older = Paginated {
            data: vec![row()],
            total: 1,
            ..Paginated::default()
        };
        reduce(
            &mut state,
            PageAction::ListLoaded {
                request: 1,
                result: Ok(older),
            },
        );
        assert!(state.list.data.is_empty());
        assert!(state.loading);

        let effects = reduce(
            &mut state,
            PageAction::ListLoaded {
                request: 2,
                result: Err(CrudError::Transport("offline".into())),
            },
        );
        assert!(!state.loading);
        assert_eq!(
            effects,
            vec![PageEffect::Toast {
                kind: ToastKind::Error,
                message: "offline".into(),
            }]
        );
    }

    #[test]
    fn unchanged_edit_round_trips_the_record() {
        let mut state = manager();
        let effects = reduce(
            &mut state,
            PageAction::RowAction {
                action: ActionKind::Edit,
                row: row(),
            },
        );
        assert_eq!(
            effects,
            vec![PageEffect::LoadOptions(OptionRequest {
                session: 1,
                key: "group_id".into(),
                source: RelationSource::new("/api/groups"),
            })]
        );
        assert_eq!(state.form.value("name.ar"), FieldValue::text("مدني"));

        let effects = reduce(&mut state, PageAction::SubmitForm);
        let [PageEffect::Save(request)] = effects.as_slice() else {
            panic!("save effect expected, got {effects:?}");
        };
        assert_eq!(request.method, HttpMethod::Put);
        assert_eq!(request.url, "/api/case-types/7");
        assert_eq!(request.body, Some(CrudBody::Json(row())));

        assert!(reduce(&mut state, PageAction::SubmitForm).is_empty());
        assert_eq!(state.submitting, Some(FormMode::Edit));
    }

    #[test]
    fn successful_save_closes_modal_and_refetches() {
        let mut state = manager();
        reduce(
            &mut state,
            PageAction::RowAction {
                action: ActionKind::Edit,
                row: row(),
            },
        );
        reduce(&mut state, PageAction::SubmitForm);
        let effects = reduce(
            &mut state,
            PageAction::SubmitFinished(Ok(CrudResponse {
                status: 200,
                body: json!({ "id": 7 }),
            })),
        );
        assert!(!state.modal_open);
        assert_eq!(state.submitting, None);
        assert_eq!(
            effects,
            vec![
                PageEffect::Hook {
                    hook: PageHook::AfterUpdate,
                    record: json!({ "id": 7 }),
                },
                PageEffect::Toast {
                    kind: ToastKind::Success,
                    message: "Case type updated successfully".into(),
                },
                PageEffect::FetchList {
                    request: 1,
                    url: "/api/case-types?page=1&per_page=15".into(),
                    silent: false,
                },
            ]
        );
    }

    #[test]
    fn server_validation_keeps_modal_open_with_field_errors() {
        let mut state = manager();
        reduce(&mut state, PageAction::OpenCreate);
        reduce(
            &mut state,
            PageAction::FieldChanged {
                name: "name.en".into(),
                value: FieldValue::text("Civil"),
            },
        );
        let effects = reduce(&mut state, PageAction::SubmitForm);
        assert!(matches!(
            effects.as_slice(),
            [PageEffect::Save(request)] if request.method == HttpMethod::Post
        ));

        let error = CrudError::from_response(
            422,
            json!({
                "message": "The given data was invalid.",
                "errors": { "name.en": ["The name has already been taken."] },
            }),
        );
        let effects = reduce(&mut state, PageAction::SubmitFinished(Err(error)));
        assert!(state.modal_open);
        assert_eq!(state.form.error("name.en"), Some("The name has already been taken."));
        assert_eq!(
            effects,
            vec![PageEffect::Toast {
                kind: ToastKind::Error,
                message: "The name has already been taken.".into(),
            }]
        );
    }

    #[test]
    fn required_fields_block_create_submission() {
        let mut state = manager();
        reduce(&mut state, PageAction::OpenCreate);
        let effects = reduce(&mut state, PageAction::SubmitForm);
        assert!(effects.is_empty());
        assert_eq!(state.submitting, None);
        assert_eq!(state.form.errors().len(), 1);
        assert_eq!(state.form.error("name.en"), Some("Name (English) is required"));
    }

    #[test]
    fn delete_flow_confirms_then_refetches() {
        let mut state = manager();
        reduce(
            &mut state,
            PageAction::RowAction {
                action: ActionKind::Delete,
                row: row(),
            },
        );
        assert_eq!(state.delete_target, Some(row()));
        let effects = reduce(&mut state, PageAction::ConfirmDelete);
        assert_eq!(
            effects,
            vec![PageEffect::Delete(CrudRequest::delete("/api/case-types/7"))]
        );
        assert!(reduce(&mut state, PageAction::ConfirmDelete).is_empty());

        let effects = reduce(
            &mut state,
            PageAction::DeleteFinished(Ok(CrudResponse {
                status: 204,
                body: Value::Null,
            })),
        );
        assert_eq!(state.delete_target, None);
        assert_eq!(
            effects[0],
            PageEffect::Hook {
                hook: PageHook::AfterDelete,
                record: row(),
            }
        );
        assert!(matches!(effects[2], PageEffect::FetchList { silent: false, .. }));
    }

    #[test]
    fn capabilities_gate_create_and_row_actions() {
        let mut state = state(&["view-any-case-types"]);
        assert_eq!(
            reduce_page(&mut state, &config(), PageAction::OpenCreate),
            Err(PageError::Forbidden("create-any-case-types".into()))
        );
        assert_eq!(
            reduce_page(
                &mut state,
                &config(),
                PageAction::RowAction {
                    action: ActionKind::Edit,
                    row: row(),
                },
            ),
            Err(PageError::ActionNotAllowed("edit".into()))
        );
        reduce(
            &mut state,
            PageAction::RowAction {
                action: ActionKind::View,
                row: row(),
            },
        );
        assert_eq!(
            reduce_page(&mut state, &config(), PageAction::SubmitForm),
            Err(PageError::ReadOnlyForm)
        );
    }

    #[test]
    fn language_change_refetches_silently_in_place() {
        let mut state = manager();
        state.query.page = 2;
        state.query.search = "civil".into();
        let effects = reduce(&mut state, PageAction::LanguageChanged("ar".into()));
        assert_eq!(state.locale, "ar");
        assert!(!state.loading);
        assert_eq!(
            effects,
            vec![PageEffect::FetchList {
                request: 1,
                url: "/api/case-types?search=civil&page=2&per_page=15".into(),
                silent: true,
            }]
        );
    }

    #[test]
    fn option_results_for_a_closed_modal_are_dropped() {
        let mut state = manager();
        let effects = reduce(&mut state, PageAction::OpenCreate);
        let [PageEffect::LoadOptions(request)] = effects.as_slice() else {
            panic!("option load expected");
        };
        let request = request.clone();
        reduce(&mut state, PageAction::CloseModal);
        let effects = reduce(
            &mut state,
            PageAction::OptionsLoaded {
                request,
                result: Err(CrudError::Transport("offline".into())),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(state.form.options("group_id"), None);
    }

    fn taken_name() -> CrudError {
        CrudError::from_response(
            422,
            json!({
                "message": "The given data was invalid.",
                "errors": { "name.en": ["The name has already been taken."] },
            }),
        )
    }

    fn open_edit(state: &mut PageState, row: Row) {
        reduce(
            state,
            PageAction::RowAction {
                action: ActionKind::Edit,
                row,
            },
        );
    }

    #[test]
    fn own_scope_reaches_only_rows_the_viewer_owns() {
        let mut state = state(&["manage-own-case-types"]).with_viewer("1");
        let foreign = json!({ "id": 9, "user_id": 2, "name": "Labour" });
        let mine = json!({ "id": 10, "user_id": 1, "name": "Tax" });
        let edit = |row: &Row| PageAction::RowAction {
            action: ActionKind::Edit,
            row: row.clone(),
        };

        assert_eq!(
            reduce_page(&mut state, &config(), edit(&foreign)),
            Err(PageError::ActionNotAllowed("edit".into()))
        );
        assert_eq!(
            reduce_page(&mut state, &config(), edit(&mine)),
            Err(PageError::ActionNotAllowed("edit".into()))
        );

        let owned = config().owned_by("user_id");
        assert_eq!(
            reduce_page(&mut state, &owned, edit(&foreign)),
            Err(PageError::ActionNotAllowed("edit".into()))
        );
        assert!(reduce_page(&mut state, &owned, edit(&mine)).is_ok());
        assert_eq!(state.form.mode(), FormMode::Edit);
        assert!(reduce_page(&mut state, &owned, PageAction::OpenCreate).is_ok());
    }

    #[test]
    fn server_errors_return_when_the_same_form_reopens() {
        let mut state = manager();
        open_edit(&mut state, row());
        reduce(&mut state, PageAction::SubmitForm);
        reduce(&mut state, PageAction::SubmitFinished(Err(taken_name())));
        reduce(&mut state, PageAction::CloseModal);
        assert!(!state.server_errors.is_empty());

        open_edit(&mut state, row());
        assert_eq!(state.form.error("name.en"), Some("The name has already been taken."));

        reduce(&mut state, PageAction::CloseModal);
        reduce(&mut state, PageAction::OpenCreate);
        assert!(state.form.errors().is_empty());
        assert!(state.server_errors.is_empty());
    }

    #[test]
    fn late_save_result_leaves_a_reopened_form_alone() {
        let mut state = manager();
        open_edit(&mut state, row());
        reduce(&mut state, PageAction::SubmitForm);
        reduce(&mut state, PageAction::CloseModal);
        let other = json!({ "id": 8, "name": { "en": "Labour", "ar": "عمالي" } });
        open_edit(&mut state, other.clone());

        let effects = reduce(
            &mut state,
            PageAction::SubmitFinished(Ok(CrudResponse {
                status: 200,
                body: json!({ "id": 7 }),
            })),
        );
        assert!(state.modal_open);
        assert_eq!(state.current_item, Some(other));
        assert_eq!(state.submitting, None);
        assert!(matches!(
            effects.as_slice(),
            [
                PageEffect::Hook {
                    hook: PageHook::AfterUpdate,
                    ..
                },
                PageEffect::Toast { .. },
                PageEffect::FetchList { .. },
            ]
        ));

        reduce(&mut state, PageAction::SubmitForm);
        reduce(&mut state, PageAction::CloseModal);
        open_edit(&mut state, row());
        reduce(&mut state, PageAction::SubmitFinished(Err(taken_name())));
        assert!(state.form.errors().is_empty());
    }

    #[test]
    fn chosen_files_are_released_when_replaced_saved_or_abandoned() {
        let fields = FieldSet::new(vec![FieldDescriptor::new(
            "logo",
            "Logo",
            FieldKind::File {
                validation: FileValidation::default(),
                multiple: false,
            },
        )])
        .expect("fields");
        let config = PageConfig::new("brands", "/api/brands", "Brands", "Brand", fields);
        let (permissions, _) = PermissionSet::from_names(["manage-brands"]);
        let mut state = PageState::new(&config, CrudSettings::default(), permissions);
        let upload = |handle: u64| FileUpload {
            file_name: format!("logo-{handle}.png"),
            mime_type: "image/png".into(),
            size_bytes: 10,
            handle,
        };
        let choose = |handle: u64| PageAction::FieldChanged {
            name: "logo".into(),
            value: FieldValue::File(upload(handle)),
        };

        reduce_page(&mut state, &config, PageAction::OpenCreate).expect("open");
        assert!(reduce_page(&mut state, &config, choose(1)).expect("choose").is_empty());
        assert_eq!(
            reduce_page(&mut state, &config, choose(2)).expect("replace"),
            vec![PageEffect::ReleaseFiles(vec![1])]
        );
        assert_eq!(
            reduce_page(&mut state, &config, PageAction::CloseModal).expect("close"),
            vec![PageEffect::ReleaseFiles(vec![2])]
        );

        reduce_page(&mut state, &config, PageAction::OpenCreate).expect("open");
        reduce_page(&mut state, &config, choose(3)).expect("choose");
        reduce_page(&mut state, &config, PageAction::SubmitForm).expect("submit");
        let effects = reduce_page(
            &mut state,
            &config,
            PageAction::SubmitFinished(Ok(CrudResponse {
                status: 201,
                body: json!({ "id": 1 }),
            })),
        )
        .expect("saved");
        assert_eq!(effects[0], PageEffect::ReleaseFiles(vec![3]));
    }

    #[test]
    fn pages_that_never_listed_do_not_fetch() {
        let (permissions, _) = PermissionSet::from_names(["manage-case-types"]);
        let mut state = PageState::new(&config(), CrudSettings::default(), permissions);

        assert!(reduce(&mut state, PageAction::LanguageChanged("ar".into())).is_empty());
        assert_eq!(state.locale, "ar");
        assert!(reduce(&mut state, PageAction::Refresh).is_empty());

        reduce(&mut state, PageAction::OpenCreate);
        reduce(
            &mut state,
            PageAction::FieldChanged {
                name: "name.en".into(),
                value: FieldValue::text("Tax"),
            },
        );
        reduce(&mut state, PageAction::SubmitForm);
        let effects = reduce(
            &mut state,
            PageAction::SubmitFinished(Ok(CrudResponse {
                status: 201,
                body: json!({ "id": 11 }),
            })),
        );
        assert_eq!(
            effects.last(),
            Some(&PageEffect::ResourceChanged {
                resource: "case-types".into()
            })
        );
        assert_eq!(state.list_request, 0);
    }
}
