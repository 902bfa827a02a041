//! Table renderer: typed cells, sort headers, gated row actions, and the empty row.

use admin_ui::{
    Badge, ButtonVariant, DataTable, EmptyState, Icon, IconButton, IconName, IconSize, SortHeader,
    TableCell, TableRow,
};
use crud_contract::{ActionKind, ColumnDescriptor, Row, TableAction};
use crud_core::{
    action_target, empty_row_colspan, record_id, render_cell, row_ownership, sort_indicator,
    visible_actions, ActionTarget, CellContent, PageAction, MISSING_CELL,
};
use leptos::*;

use crate::{
    display::{badge_tone, sort_icon, UiText},
    runtime_context::{use_crud_page, CrudPageContext},
};

/// Icon for a configured action token; unknown tokens fall back to the info glyph.
pub(crate) fn action_icon(token: &str) -> IconName {
    IconName::from_token(token).unwrap_or(IconName::Info)
}

fn action_variant(action: &ActionKind) -> ButtonVariant {
    match action {
        ActionKind::Delete => ButtonVariant::Danger,
        _ => ButtonVariant::Icon,
    }
}

fn cell_view(page: CrudPageContext, column: &ColumnDescriptor, row: &Row, locale: &str) -> View {
    let content = page
        .admin
        .host
        .with_value(|host| render_cell(column, row, locale, host.formatter.as_ref()));
    match content {
        CellContent::Text(text) => text.into_view(),
        CellContent::Badge { text, tone } => view! { <Badge tone=badge_tone(tone)>{text}</Badge> }.into_view(),
        CellContent::Image { src } => {
            view! { <img src=src alt="" loading="lazy" data-ui-slot="thumbnail" /> }.into_view()
        }
        CellContent::Boolean(flag) => {
            let (icon, label) = if flag {
                (IconName::Check, UiText::Yes)
            } else {
                (IconName::Cross, UiText::No)
            };
            view! {
                <span data-ui-slot="boolean" data-ui-selected=flag.to_string() title=label.resolve(locale)>
                    <Icon icon size=IconSize::Sm />
                </span>
            }
            .into_view()
        }
        CellContent::Link { href, text } => view! { <a href=href data-ui-slot="link">{text}</a> }.into_view(),
        CellContent::Custom { renderer, value } => {
            match page.renderers.with_value(|renderers| renderers.cell(&renderer)) {
                Some(render) => render(&value, row),
                None => {
                    logging::warn!("no cell renderer registered for `{renderer}`");
                    MISSING_CELL.into_view()
                }
            }
        }
        CellContent::Missing => MISSING_CELL.into_view(),
    }
}

fn action_view(page: CrudPageContext, action: &TableAction, row: &Row, locale: &str) -> View {
    let label = action.label.resolve(row, locale);
    let icon = action_icon(action.icon);
    match action_target(action, row) {
        ActionTarget::Link(href) => view! {
            <a
                href=href
                class="ui-icon-button"
                aria-label=label.clone()
                title=label
                data-ui-kind="icon-link"
                data-ui-icon=icon.token()
            >
                <Icon icon size=IconSize::Sm />
            </a>
        }
        .into_view(),
        ActionTarget::Dispatch(kind) => {
            let variant = action_variant(&kind);
            let row = row.clone();
            view! {
                <IconButton
                    icon
                    variant
                    aria_label=label.clone()
                    title=label
                    on_click=Callback::new(move |_| {
                        page.dispatch_action(PageAction::RowAction {
                            action: kind.clone(),
                            row: row.clone(),
                        })
                    })
                />
            }
            .into_view()
        }
    }
}

fn row_view(page: CrudPageContext, columns: &[ColumnDescriptor], row: Row, locale: &str) -> View {
    let (actions, owner_key, permissions, viewer_id) = page.state.with_untracked(|state| {
        page.config.with_value(|config| {
            (
                config.actions.clone(),
                config.owner_key.clone(),
                state.permissions.clone(),
                state.viewer_id.clone(),
            )
        })
    });
    let cells = columns
        .iter()
        .map(|column| {
            let cell = cell_view(page, column, &row, locale);
            view! {
                <TableCell>{cell}</TableCell>
            }
        })
        .collect_view();
    let actions_cell = (!actions.is_empty()).then(|| {
        let ownership = row_ownership(&row, owner_key.as_deref(), viewer_id.as_deref());
        let buttons = visible_actions(&actions, &row, &permissions, ownership)
            .into_iter()
            .map(|action| action_view(page, action, &row, locale))
            .collect_view();
        view! { <TableCell ui_slot="actions">{buttons}</TableCell> }
    });

    view! {
        <TableRow row_key=record_id(&row).unwrap_or_default()>
            {cells}
            {actions_cell}
        </TableRow>
    }
    .into_view()
}

#[component]
/// List table of the current page.
pub fn CrudTable() -> impl IntoView {
    let page = use_crud_page();
    let (columns, has_actions, colspan, title) = page.config.with_value(|config| {
        (
            config.columns.clone(),
            !config.actions.is_empty(),
            empty_row_colspan(&config.columns, &config.actions),
            config.title.clone(),
        )
    });
    let columns = store_value(columns);
    let rows = create_memo(move |_| page.state.with(|state| state.list.data.clone()));
    let locale = create_memo(move |_| page.state.with(|state| state.locale.clone()));
    let sort = create_memo(move |_| page.state.with(|state| state.query.sort.clone()));
    let loading = Signal::derive(move || page.state.with(|state| state.loading));

    let header = move || {
        let locale = locale.get();
        let headers = columns.with_value(|columns| {
            columns
                .iter()
                .map(|column| {
                    let indicator_column = column.clone();
                    let indicator = Signal::derive(move || {
                        sort.with(|sort| sort_indicator(&indicator_column, sort.as_ref()).map(sort_icon))
                    });
                    let field = column.sort_key().to_string();
                    let on_sort = column.sortable.then(|| {
                        Callback::new(move |()| page.dispatch_action(PageAction::Sort(field.clone())))
                    });
                    match on_sort {
                        Some(on_sort) => view! {
                            <SortHeader label=column.label.resolve(&locale) indicator on_sort />
                        }
                        .into_view(),
                        None => view! { <SortHeader label=column.label.resolve(&locale) /> }.into_view(),
                    }
                })
                .collect_view()
        });
        let actions_header = has_actions.then(|| {
            view! { <th scope="col" data-ui-slot="actions">{UiText::Actions.resolve(&locale)}</th> }
        });
        view! { <tr>{headers}{actions_header}</tr> }
    };

    let body = move || {
        let locale = locale.get();
        let rows = rows.get();
        if rows.is_empty() {
            return view! {
                <TableRow>
                    <TableCell colspan=colspan ui_slot="empty">
                        <EmptyState>{UiText::NoResults.resolve(&locale)}</EmptyState>
                    </TableCell>
                </TableRow>
            }
            .into_view();
        }
        columns.with_value(|columns| {
            rows.into_iter()
                .map(|row| row_view(page, columns, row, &locale))
                .collect_view()
        })
    };

    view! {
        <DataTable
            layout_class="crud-table"
            aria_label=title.resolve(&page.locale())
            busy=loading
        >
            <thead>{header}</thead>
            <tbody>{body}</tbody>
        </DataTable>
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn action_tokens_map_to_icons() {
        assert_eq!(action_icon("trash"), IconName::Trash);
        assert_eq!(action_icon("pencil"), IconName::Pencil);
        assert_eq!(action_icon("archive"), IconName::Info);
        assert_eq!(action_variant(&ActionKind::Delete), ButtonVariant::Danger);
        assert_eq!(action_variant(&ActionKind::Custom("archive".into())), ButtonVariant::Icon);
    }
}
