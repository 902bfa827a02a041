//! Pure presentation helpers shared by the CRUD components.
//!
//! Nothing here touches signals or the DOM, so the text and option mapping is unit-tested
//! natively.

use admin_ui::{IconName, SelectOptionItem, TextTone};
use crud_contract::{
    BadgeTone, FieldDescriptor, FieldKind, FieldValue, FormMode, Paginated, Row, TextInput,
};
use crud_core::{FormState, OptionList, SortIndicator};
use crud_host::{ToastKind, ValueFormatter};

/// Fixed interface strings in both supported locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiText {
    /// Primary create button.
    Create,
    /// Save button.
    Save,
    /// Cancel button.
    Cancel,
    /// Close button.
    Close,
    /// Delete button.
    Delete,
    /// Search placeholder.
    Search,
    /// Reset search and filters.
    ClearFilters,
    /// Actions column header.
    Actions,
    /// Empty list row.
    NoResults,
    /// Delete confirmation question.
    ConfirmDelete,
    /// Placeholder for selects.
    SelectPlaceholder,
    /// Boolean true.
    Yes,
    /// Boolean false.
    No,
    /// Loading indicator label.
    Loading,
}

impl UiText {
    /// Text for `locale`; every locale other than Arabic reads English.
    pub fn resolve(self, locale: &str) -> &'static str {
        let arabic = locale == "ar";
        match self {
            Self::Create if arabic => "إضافة",
            Self::Create => "Add new",
            Self::Save if arabic => "حفظ",
            Self::Save => "Save",
            Self::Cancel if arabic => "إلغاء",
            Self::Cancel => "Cancel",
            Self::Close if arabic => "إغلاق",
            Self::Close => "Close",
            Self::Delete if arabic => "حذف",
            Self::Delete => "Delete",
            Self::Search if arabic => "بحث...",
            Self::Search => "Search...",
            Self::ClearFilters if arabic => "مسح الفلاتر",
            Self::ClearFilters => "Clear filters",
            Self::Actions if arabic => "الإجراءات",
            Self::Actions => "Actions",
            Self::NoResults if arabic => "لا توجد نتائج",
            Self::NoResults => "No results found",
            Self::ConfirmDelete if arabic => "هل أنت متأكد من حذف هذا السجل؟ لا يمكن التراجع عن هذا الإجراء.",
            Self::ConfirmDelete => "Are you sure you want to delete this record? This cannot be undone.",
            Self::SelectPlaceholder if arabic => "اختر...",
            Self::SelectPlaceholder => "Select...",
            Self::Yes if arabic => "نعم",
            Self::Yes => "Yes",
            Self::No if arabic => "لا",
            Self::No => "No",
            Self::Loading if arabic => "جار التحميل...",
            Self::Loading => "Loading...",
        }
    }
}

/// Dialog title for the form modal.
pub fn modal_title(mode: FormMode, entity: &str, locale: &str) -> String {
    match (mode, locale) {
        (FormMode::Create, "ar") => format!("إضافة {entity}"),
        (FormMode::Edit, "ar") => format!("تعديل {entity}"),
        (FormMode::View, "ar") => format!("عرض {entity}"),
        (FormMode::Create, _) => format!("Create {entity}"),
        (FormMode::Edit, _) => format!("Edit {entity}"),
        (FormMode::View, _) => format!("View {entity}"),
    }
}

/// "Showing 1 to 15 of 42 results" line under the table.
pub fn page_summary(list: &Paginated<Row>, locale: &str) -> String {
    match (list.from, list.to) {
        (Some(from), Some(to)) if list.total > 0 => {
            if locale == "ar" {
                format!("عرض {from} إلى {to} من {} نتيجة", list.total)
            } else {
                format!("Showing {from} to {to} of {} results", list.total)
            }
        }
        _ => UiText::NoResults.resolve(locale).to_string(),
    }
}

/// Locale to apply after a `languageChanged` event; events without a locale keep the current one.
pub fn resolve_locale(event_locale: Option<&str>, current: &str) -> String {
    event_locale
        .map(str::trim)
        .filter(|locale| !locale.is_empty())
        .unwrap_or(current)
        .to_string()
}

/// Toast severity to primitive tone.
pub fn toast_tone(kind: ToastKind) -> TextTone {
    match kind {
        ToastKind::Success => TextTone::Success,
        ToastKind::Error => TextTone::Danger,
        ToastKind::Info => TextTone::Accent,
        ToastKind::Loading => TextTone::Secondary,
    }
}

/// Badge color to primitive tone.
pub fn badge_tone(tone: BadgeTone) -> TextTone {
    match tone {
        BadgeTone::Neutral => TextTone::Secondary,
        BadgeTone::Info => TextTone::Accent,
        BadgeTone::Success => TextTone::Success,
        BadgeTone::Warning => TextTone::Warning,
        BadgeTone::Danger => TextTone::Danger,
    }
}

/// Header icon for a sort indicator.
pub fn sort_icon(indicator: SortIndicator) -> IconName {
    IconName::from_token(indicator.icon()).unwrap_or(IconName::Sort)
}

/// `<option>` list for `key`, with DOM values encoded for option identity.
pub fn option_items(options: &OptionList, key: &str, locale: &str) -> Vec<SelectOptionItem> {
    let prefix = FormState::dom_prefix(key);
    options
        .iter()
        .map(|option| SelectOptionItem::new(option.dom_value(&prefix), option.label.resolve(locale)))
        .collect()
}

/// DOM values of the options matching `value`.
pub fn selected_dom_values(options: &OptionList, key: &str, value: &FieldValue) -> Vec<String> {
    let prefix = FormState::dom_prefix(key);
    options
        .selected(value)
        .into_iter()
        .map(|option| option.dom_value(&prefix))
        .collect()
}

/// Raw values for a multi-select DOM selection; unknown DOM values are dropped.
pub fn decode_selection(options: &OptionList, key: &str, dom_values: &[String]) -> Vec<String> {
    let prefix = FormState::dom_prefix(key);
    dom_values
        .iter()
        .filter_map(|dom_value| options.find_dom(&prefix, dom_value))
        .map(|option| option.value.clone())
        .collect()
}

/// HTML `type` for kinds rendered through a single-line input.
pub fn input_type(kind: &FieldKind) -> &'static str {
    match kind {
        FieldKind::Text { input } => input.token(),
        FieldKind::Date => "date",
        FieldKind::Time => "time",
        FieldKind::DateTime => "datetime-local",
        FieldKind::Number { .. } | FieldKind::Currency { .. } => "number",
        _ => TextInput::Text.token(),
    }
}

/// Read-only text for `value` in view mode.
///
/// Choice kinds show option labels, temporal and numeric kinds go through the formatter, and
/// missing values render as `-`.
pub fn display_value(
    field: &FieldDescriptor,
    value: &FieldValue,
    options: &OptionList,
    locale: &str,
    formatter: &dyn ValueFormatter,
) -> String {
    const MISSING: &str = "-";
    if matches!(value, FieldValue::Empty) {
        return MISSING.to_string();
    }
    let text = value.as_text();
    let shown = match &field.kind {
        FieldKind::Checkbox | FieldKind::Switch => {
            let flag = matches!(value, FieldValue::Bool(true))
                || matches!(text.as_str(), "1" | "true");
            let label = if flag { UiText::Yes } else { UiText::No };
            return label.resolve(locale).to_string();
        }
        FieldKind::Select { .. }
        | FieldKind::Combobox { .. }
        | FieldKind::Radio { .. }
        | FieldKind::MultiSelect { .. } => value
            .clone()
            .into_list()
            .iter()
            .map(|raw| options.label_for(raw, locale))
            .collect::<Vec<_>>()
            .join(", "),
        FieldKind::Date => formatter.format_date(&text),
        FieldKind::Time => formatter.format_time(&text),
        FieldKind::DateTime => formatter.format_datetime(&text),
        FieldKind::Number { .. } => text
            .parse::<f64>()
            .map(|number| formatter.format_number(number))
            .unwrap_or(text),
        FieldKind::Currency { currency } => text
            .parse::<f64>()
            .map(|amount| formatter.format_currency(amount, currency.as_deref()))
            .unwrap_or(text),
        FieldKind::File { .. } | FieldKind::MediaPicker { .. } => match value {
            FieldValue::File(upload) => upload.file_name.clone(),
            other => other.clone().into_list().join(", "),
        },
        _ => text,
    };
    if shown.trim().is_empty() {
        MISSING.to_string()
    } else {
        shown
    }
}
