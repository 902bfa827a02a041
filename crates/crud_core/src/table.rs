//! Table model: cell content, visible row actions, and the sort state machine.

use crud_contract::{
    resolve_json_text, ActionKind, BadgeTone, ColumnDescriptor, ColumnKind, Ownership,
    PermissionSet, Row, SortDirection, SortState, TableAction,
};
use crud_host::ValueFormatter;
use serde_json::Value;

/// Text shown for missing cell values.
pub const MISSING_CELL: &str = "-";

/// Follows a dot path (`client.name`, `tags.0`) into a row; `None` when any segment is missing.
pub fn lookup_path<'a>(row: &'a Row, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(row, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    })
    .filter(|value| !value.is_null())
}

/// Replaces `{path}` placeholders with URL-encoded row values; unknown paths become empty.
pub fn expand_row_template(template: &str, row: &Row) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        out.push_str(&rest[..start]);
        let path = &rest[start + 1..start + end];
        let value = lookup_path(row, path)
            .and_then(|value| resolve_json_text(value, "en"))
            .unwrap_or_default();
        out.push_str(&urlencoding::encode(&value));
        rest = &rest[start + end + 1..];
    }
    out.push_str(rest);
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Typed content of one cell.
pub enum CellContent {
    /// Plain text.
    Text(String),
    /// Pill.
    Badge {
        /// Display text.
        text: String,
        /// Color.
        tone: BadgeTone,
    },
    /// Thumbnail.
    Image {
        /// Image URL.
        src: String,
    },
    /// Yes/no indicator.
    Boolean(bool),
    /// Anchor.
    Link {
        /// Expanded href.
        href: String,
        /// Anchor text.
        text: String,
    },
    /// Delegated to a registered renderer.
    Custom {
        /// Renderer key.
        renderer: String,
        /// Raw cell value.
        value: Value,
    },
    /// No value; rendered as [`MISSING_CELL`].
    Missing,
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(text.as_str(), "1" | "true" | "yes"),
        _ => false,
    }
}

fn raw_token(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    }
}

/// Computes the content of one cell.
pub fn render_cell(
    column: &ColumnDescriptor,
    row: &Row,
    locale: &str,
    formatter: &dyn ValueFormatter,
) -> CellContent {
    let value = lookup_path(row, &column.key);
    if let ColumnKind::Custom(renderer) = &column.kind {
        return CellContent::Custom {
            renderer: renderer.clone(),
            value: value.cloned().unwrap_or(Value::Null),
        };
    }
    let Some(value) = value else {
        return CellContent::Missing;
    };
    if let ColumnKind::Boolean = column.kind {
        return CellContent::Boolean(truthy(value));
    }
    let Some(text) = resolve_json_text(value, locale).filter(|text| !text.trim().is_empty()) else {
        return CellContent::Missing;
    };
    match &column.kind {
        ColumnKind::Text => CellContent::Text(text),
        ColumnKind::Badge { tones } => CellContent::Badge {
            tone: tones.get(&raw_token(value)).copied().unwrap_or_default(),
            text,
        },
        ColumnKind::Image => CellContent::Image { src: text },
        ColumnKind::Date => CellContent::Text(formatter.format_date(&text)),
        ColumnKind::DateTime => CellContent::Text(formatter.format_datetime(&text)),
        ColumnKind::Currency { currency } => match text.trim().parse::<f64>() {
            Ok(amount) => CellContent::Text(formatter.format_currency(amount, currency.as_deref())),
            Err(_) => CellContent::Text(text),
        },
        ColumnKind::Link { href } => CellContent::Link {
            href: expand_row_template(href, row),
            text,
        },
        ColumnKind::Boolean | ColumnKind::Custom(_) => CellContent::Text(text),
    }
}

/// Ownership of `row` for the viewer, using `owner_key` as the dot path to the owner id.
pub fn row_ownership(row: &Row, owner_key: Option<&str>, viewer_id: Option<&str>) -> Ownership {
    let (Some(owner_key), Some(viewer_id)) = (owner_key, viewer_id) else {
        return Ownership::Unknown;
    };
    match lookup_path(row, owner_key).map(raw_token) {
        Some(owner) if owner == viewer_id => Ownership::Owned,
        Some(_) => Ownership::NotOwned,
        None => Ownership::Unknown,
    }
}

/// Returns `true` when the viewer may see `action` on `row`: permission first, then the row
/// condition.
pub fn action_visible(
    action: &TableAction,
    row: &Row,
    permissions: &PermissionSet,
    ownership: Ownership,
) -> bool {
    let permitted = action
        .required_permission
        .as_ref()
        .map_or(true, |required| permissions.allows(required, ownership));
    permitted
        && action
            .condition
            .as_ref()
            .map_or(true, |condition| condition.test(row))
}

/// Actions visible for `row`, in declaration order.
pub fn visible_actions<'a>(
    actions: &'a [TableAction],
    row: &Row,
    permissions: &PermissionSet,
    ownership: Ownership,
) -> Vec<&'a TableAction> {
    actions
        .iter()
        .filter(|action| action_visible(action, row, permissions, ownership))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What clicking an action button does.
pub enum ActionTarget {
    /// Navigate to this URL.
    Link(String),
    /// Dispatch the action to the page.
    Dispatch(ActionKind),
}

/// Resolves an action's click behavior for `row`.
pub fn action_target(action: &TableAction, row: &Row) -> ActionTarget {
    match &action.href {
        Some(template) => ActionTarget::Link(expand_row_template(template, row)),
        None => ActionTarget::Dispatch(action.action.clone()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Header sort indicator.
pub enum SortIndicator {
    /// Sortable, not the active sort.
    Neutral,
    /// Active, ascending.
    Ascending,
    /// Active, descending.
    Descending,
}

impl SortIndicator {
    /// Icon token.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Neutral => "sort",
            Self::Ascending => "sort-up",
            Self::Descending => "sort-down",
        }
    }

    /// `aria-sort` value.
    pub const fn aria_sort(self) -> &'static str {
        match self {
            Self::Neutral => "none",
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// Indicator for `column`; `None` for unsortable columns.
pub fn sort_indicator(
    column: &ColumnDescriptor,
    sort: Option<&SortState>,
) -> Option<SortIndicator> {
    if !column.sortable {
        return None;
    }
    Some(match sort {
        Some(sort) if sort.field == column.sort_key() => match sort.direction {
            SortDirection::Asc => SortIndicator::Ascending,
            SortDirection::Desc => SortIndicator::Descending,
        },
        _ => SortIndicator::Neutral,
    })
}

/// Next sort after clicking `field`: the active field toggles, any other field starts ascending.
pub fn toggle_sort(current: Option<&SortState>, field: &str) -> SortState {
    match current {
        Some(sort) if sort.field == field => SortState {
            field: field.to_string(),
            direction: sort.direction.toggled(),
        },
        _ => SortState::ascending(field),
    }
}

/// Columns spanned by the "no results" row, including the actions column.
pub fn empty_row_colspan(columns: &[ColumnDescriptor], actions: &[TableAction]) -> usize {
    columns.len() + usize::from(!actions.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crud_contract::{Capability, CapabilityAction};
    use crud_host::ChronoFormatter;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn row() -> Row {
        json!({
            "id": 12,
            "name": { "en": "Draft", "ar": "مسودة" },
            "client": { "id": 3, "name": "Nour" },
            "status": "open",
            "fee": "1500.5",
            "is_active": 1,
            "deleted_at": null,
            "owner_id": 3,
        })
    }

    #[test]
    fn dot_paths_resolve_and_missing_values_render_dash() {
        let formatter = ChronoFormatter::default();
        let client = ColumnDescriptor::new("client.name", "Client");
        assert_eq!(
            render_cell(&client, &row(), "en", &formatter),
            CellContent::Text("Nour".into())
        );
        let missing = ColumnDescriptor::new("client.phone", "Phone");
        assert_eq!(render_cell(&missing, &row(), "en", &formatter), CellContent::Missing);
        let deleted = ColumnDescriptor::new("deleted_at", "Deleted").kind(ColumnKind::Date);
        assert_eq!(render_cell(&deleted, &row(), "en", &formatter), CellContent::Missing);
    }

    #[test]
    fn translatable_cells_follow_locale() {
        let formatter = ChronoFormatter::default();
        let name = ColumnDescriptor::new("name", "Name");
        assert_eq!(
            render_cell(&name, &row(), "ar", &formatter),
            CellContent::Text("مسودة".into())
        );
        assert_eq!(
            render_cell(&name, &row(), "fr", &formatter),
            CellContent::Text("Draft".into())
        );
    }

    #[test]
    fn typed_columns_dispatch_on_kind() {
        let formatter = ChronoFormatter::default();
        let mut tones = BTreeMap::new();
        tones.insert("open".to_string(), BadgeTone::Success);
        let status = ColumnDescriptor::new("status", "Status").kind(ColumnKind::Badge { tones });
        assert_eq!(
            render_cell(&status, &row(), "en", &formatter),
            CellContent::Badge {
                text: "open".into(),
                tone: BadgeTone::Success
            }
        );
        let fee = ColumnDescriptor::new("fee", "Fee").kind(ColumnKind::Currency {
            currency: Some("EGP".into()),
        });
        assert_eq!(
            render_cell(&fee, &row(), "en", &formatter),
            CellContent::Text("EGP 1,500.50".into())
        );
        let active = ColumnDescriptor::new("is_active", "Active").kind(ColumnKind::Boolean);
        assert_eq!(render_cell(&active, &row(), "en", &formatter), CellContent::Boolean(true));
        let link = ColumnDescriptor::new("client.name", "Client").kind(ColumnKind::Link {
            href: "/clients/{client.id}?from={name}".into(),
        });
        assert_eq!(
            render_cell(&link, &row(), "en", &formatter),
            CellContent::Link {
                href: "/clients/3?from=Draft".into(),
                text: "Nour".into()
            }
        );
    }

    #[test]
    fn actions_need_permission_and_condition() {
        let (permissions, _) = PermissionSet::from_names(["manage-own-cases"]);
        let actions = vec![
            TableAction::view(),
            TableAction::edit().requires(Capability::new(CapabilityAction::Edit, "cases")),
            TableAction::delete()
                .requires(Capability::new(CapabilityAction::Delete, "cases"))
                .when(|row| row["status"] != "open"),
        ];
        let owned = row_ownership(&row(), Some("owner_id"), Some("3"));
        assert_eq!(owned, Ownership::Owned);
        let visible: Vec<_> = visible_actions(&actions, &row(), &permissions, owned)
            .into_iter()
            .map(|action| action.action.clone())
            .collect();
        assert_eq!(visible, vec![ActionKind::View, ActionKind::Edit]);

        let foreign = row_ownership(&row(), Some("owner_id"), Some("4"));
        assert_eq!(visible_actions(&actions, &row(), &permissions, foreign).len(), 1);
    }

    #[test]
    fn link_actions_expand_the_row_id() {
        let action = TableAction::view().linking_to("/cases/{id}");
        assert_eq!(action_target(&action, &row()), ActionTarget::Link("/cases/12".into()));
        assert_eq!(
            action_target(&TableAction::edit(), &row()),
            ActionTarget::Dispatch(ActionKind::Edit)
        );
    }

    #[test]
    fn sort_cycles_between_directions_and_resets_on_new_field() {
        let name = ColumnDescriptor::new("name", "Name").sortable();
        assert_eq!(sort_indicator(&name, None), Some(SortIndicator::Neutral));
        let first = toggle_sort(None, "name");
        assert_eq!(sort_indicator(&name, Some(&first)), Some(SortIndicator::Ascending));
        let second = toggle_sort(Some(&first), "name");
        assert_eq!(sort_indicator(&name, Some(&second)), Some(SortIndicator::Descending));
        assert_eq!(toggle_sort(Some(&second), "name").direction, SortDirection::Asc);
        assert_eq!(toggle_sort(Some(&second), "created_at"), SortState::ascending("created_at"));
        assert_eq!(sort_indicator(&ColumnDescriptor::new("id", "#"), None), None);
    }

    #[test]
    fn empty_row_spans_actions_column() {
        let columns = vec![ColumnDescriptor::new("id", "#"), ColumnDescriptor::new("name", "Name")];
        assert_eq!(empty_row_colspan(&columns, &[TableAction::view()]), 3);
        assert_eq!(empty_row_colspan(&columns, &[]), 2);
    }
}
