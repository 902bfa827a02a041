//! Form layout strategies.

use crud_contract::{FieldDescriptor, FieldSet, FormData, FormMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// How a form modal arranges its fields.
pub enum FormLayout {
    /// One line per `layout.row`; fields without a row get a line each.
    #[default]
    Rows,
    /// Fixed column grid ordered by `(row, column)`.
    Grid {
        /// Columns per line.
        columns: u16,
    },
    /// Single wrapping line sized by field widths.
    Flex,
}

impl FormLayout {
    /// Token written to `data-ui-layout`.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Rows => "rows",
            Self::Grid { .. } => "grid",
            Self::Flex => "flex",
        }
    }
}

/// Groups the visible fields into display lines.
pub fn arrange_fields<'a>(
    fields: &'a FieldSet,
    layout: FormLayout,
    mode: FormMode,
    data: &FormData,
) -> Vec<Vec<&'a FieldDescriptor>> {
    let visible: Vec<&FieldDescriptor> = fields
        .iter()
        .filter(|field| field.is_visible(mode, data))
        .collect();
    match layout {
        FormLayout::Flex => {
            if visible.is_empty() {
                Vec::new()
            } else {
                vec![visible]
            }
        }
        FormLayout::Rows => {
            let mut lines: Vec<(Option<u16>, Vec<&FieldDescriptor>)> = Vec::new();
            for field in visible {
                match field.layout.row {
                    Some(row) => match lines.iter_mut().find(|(key, _)| *key == Some(row)) {
                        Some((_, line)) => line.push(field),
                        None => lines.push((Some(row), vec![field])),
                    },
                    None => lines.push((None, vec![field])),
                }
            }
            lines.into_iter().map(|(_, line)| line).collect()
        }
        FormLayout::Grid { columns } => {
            let mut ordered = visible;
            ordered.sort_by_key(|field| {
                (
                    field.layout.row.unwrap_or(u16::MAX),
                    field.layout.column.unwrap_or(u16::MAX),
                )
            });
            ordered
                .chunks(usize::from(columns.max(1)))
                .map(<[&FieldDescriptor]>::to_vec)
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use crud_contract::{FieldCondition, FieldKind};
    use pretty_assertions::assert_eq;

    use super::*;

    fn names(lines: Vec<Vec<&FieldDescriptor>>) -> Vec<Vec<&str>> {
        lines
            .into_iter()
            .map(|line| line.into_iter().map(|field| field.name.as_str()).collect())
            .collect()
    }

    fn client_fields() -> FieldSet {
        FieldSet::new(vec![
            FieldDescriptor::new("first_name", "First name", FieldKind::text()).at(0, 0),
            FieldDescriptor::new("notes", "Notes", FieldKind::TextArea { rows: 4 }),
            FieldDescriptor::new("last_name", "Last name", FieldKind::text()).at(0, 1),
            FieldDescriptor::new("created_at", "Created", FieldKind::DateTime)
                .when(FieldCondition::Modes(vec![FormMode::View])),
        ])
        .expect("fields")
    }

    #[test]
    fn rows_group_by_row_index_in_first_seen_order() {
        let fields = client_fields();
        let lines = arrange_fields(&fields, FormLayout::Rows, FormMode::Create, &FormData::new());
        assert_eq!(names(lines), vec![vec!["first_name", "last_name"], vec!["notes"]]);
    }

    #[test]
    fn grid_orders_by_position_and_chunks() {
        let fields = client_fields();
        let lines = arrange_fields(
            &fields,
            FormLayout::Grid { columns: 2 },
            FormMode::View,
            &FormData::new(),
        );
        assert_eq!(
            names(lines),
            vec![vec!["first_name", "last_name"], vec!["notes", "created_at"]]
        );
    }
}
